use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scrim::dismiss::{ListenerHook, OverlayStack};
use scrim::event::EventResult;
use scrim::geometry::{Point, Region};
use scrim::widgets::{Dialog, DropdownMenu, MenuItem, Popover};

#[derive(Default)]
struct CountingHook {
    attached: AtomicUsize,
    detached: AtomicUsize,
}

struct SharedHook(Arc<CountingHook>);

impl ListenerHook for SharedHook {
    fn attach(&self) {
        self.0.attached.fetch_add(1, Ordering::SeqCst);
    }
    fn detach(&self) {
        self.0.detached.fetch_add(1, Ordering::SeqCst);
    }
}

fn dialog_panel() -> Region {
    Region::new(100.0, 100.0, 400.0, 300.0)
}

// a popover anchored inside the dialog panel
fn nested_popover_panel() -> Region {
    Region::new(150.0, 150.0, 120.0, 80.0)
}

#[test]
fn test_escape_unwinds_nested_overlays_one_at_a_time() {
    let stack = OverlayStack::new();
    let dialog = Dialog::new(&stack).with_content_boundary(dialog_panel());
    let popover = Popover::new(&stack).with_boundaries(nested_popover_panel(), None);

    dialog.open();
    popover.open();
    assert_eq!(stack.len(), 2);

    assert_eq!(stack.escape(), EventResult::Consumed);
    assert!(!popover.is_open());
    assert!(dialog.is_open());

    assert_eq!(stack.escape(), EventResult::Consumed);
    assert!(!dialog.is_open());
    assert_eq!(stack.escape(), EventResult::Ignored);
}

#[test]
fn test_click_inside_dialog_closes_only_the_nested_popover() {
    let stack = OverlayStack::new();
    let dialog = Dialog::new(&stack).with_content_boundary(dialog_panel());
    let popover = Popover::new(&stack).with_boundaries(nested_popover_panel(), None);

    dialog.open();
    popover.open();

    // inside the dialog panel, outside the popover panel
    stack.pointer_down(Point::new(450.0, 350.0));
    assert!(!popover.is_open());
    assert!(dialog.is_open());
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_one_outside_click_closes_unrelated_siblings() {
    let stack = OverlayStack::new();
    let popover = Popover::new(&stack).with_boundaries(Region::new(0.0, 0.0, 50.0, 50.0), None);
    let menu = DropdownMenu::new(&stack)
        .with_items(vec![MenuItem::new("edit", "Edit")])
        .with_boundaries(Region::new(200.0, 0.0, 50.0, 50.0), None);

    popover.open();
    menu.open();
    assert_eq!(stack.len(), 2);

    let dismissed = stack.pointer_down(Point::new(500.0, 500.0));
    assert_eq!(dismissed, 2);
    assert!(!popover.is_open());
    assert!(!menu.is_open());
    assert!(stack.is_empty());
}

#[test]
fn test_listener_pair_spans_overlapping_overlays() {
    let hook = Arc::new(CountingHook::default());
    let stack = OverlayStack::with_hook(SharedHook(Arc::clone(&hook)));
    let dialog = Dialog::new(&stack).with_content_boundary(dialog_panel());
    let popover = Popover::new(&stack).with_boundaries(nested_popover_panel(), None);

    dialog.open();
    popover.open();
    assert_eq!(hook.attached.load(Ordering::SeqCst), 1);

    popover.close();
    assert_eq!(hook.detached.load(Ordering::SeqCst), 0);
    dialog.close();
    assert_eq!(hook.detached.load(Ordering::SeqCst), 1);

    // reopening starts a fresh pair
    dialog.open();
    assert_eq!(hook.attached.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dropping_an_open_widget_releases_its_listener_share() {
    let hook = Arc::new(CountingHook::default());
    let stack = OverlayStack::with_hook(SharedHook(Arc::clone(&hook)));

    {
        let dialog = Dialog::new(&stack).with_content_boundary(dialog_panel());
        dialog.open();
        assert_eq!(stack.len(), 1);
    }
    assert!(stack.is_empty());
    assert_eq!(hook.detached.load(Ordering::SeqCst), 1);
}

#[test]
fn test_escape_reaches_reopened_overlays() {
    let stack = OverlayStack::new();
    let popover = Popover::new(&stack).with_boundaries(nested_popover_panel(), None);

    popover.open();
    stack.escape();
    assert!(!popover.is_open());

    popover.open();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.escape(), EventResult::Consumed);
    assert!(!popover.is_open());
}
