//! Layered Overlays Example
//!
//! Demonstrates the overlay stack's dismissal protocol:
//! - Escape dismisses only the most-recently-opened overlay
//! - An outside pointer-down closes every overlay it misses, so siblings
//!   close together while enclosing overlays stay open
//! - A popover's trigger is excluded from "outside"
//! - Document listeners attach with the first overlay and detach with the last

use std::fs::File;

use scrim::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

struct PrintingHook;

impl ListenerHook for PrintingHook {
    fn attach(&self) {
        println!("  [hook] document listeners attached");
    }
    fn detach(&self) {
        println!("  [hook] document listeners detached");
    }
}

fn main() {
    // Set up file logging
    let log_file = File::create("layered_overlays.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let stack = OverlayStack::with_hook(PrintingHook);

    // a settings dialog filling the middle of the viewport
    let dialog = Dialog::new(&stack).with_content_boundary(Region::new(100.0, 100.0, 400.0, 300.0));

    // a popover anchored to a button inside the dialog panel
    let popover = Popover::new(&stack).with_boundaries(
        Region::new(140.0, 170.0, 200.0, 120.0),
        Some(Region::new(140.0, 140.0, 80.0, 20.0)),
    );

    // a dropdown menu anchored to a toolbar button outside the dialog
    let menu = DropdownMenu::new(&stack)
        .with_items(vec![
            MenuItem::new("rename", "Rename"),
            MenuItem::new("copy", "Duplicate"),
            MenuItem::new("delete", "Delete")
                .with_disabled(true)
                .with_destructive(true),
        ])
        .with_boundaries(
            Region::new(600.0, 50.0, 160.0, 90.0),
            Some(Region::new(600.0, 20.0, 120.0, 20.0)),
        );
    menu.set_on_select(|value| println!("  [on_select] {value}"));

    println!("opening the dialog, then a popover inside it:");
    dialog.open();
    popover.open();
    println!("  stack depth {}", stack.len());

    println!("\nEscape dismisses only the top overlay:");
    stack.escape();
    println!(
        "  popover open: {}, dialog open: {}",
        popover.is_open(),
        dialog.is_open()
    );

    println!("\nreopened the popover; clicking the dialog panel beside it:");
    popover.open();
    stack.pointer_down(Point::new(450.0, 350.0));
    println!(
        "  popover open: {}, dialog open: {}",
        popover.is_open(),
        dialog.is_open()
    );

    println!("\nreopened the popover; its own trigger does not count as outside:");
    popover.open();
    let dismissed = stack.pointer_down(Point::new(150.0, 150.0));
    println!("  dismissed {dismissed} overlay(s)");

    println!("\nclicking the backdrop clears everything:");
    let dismissed = stack.pointer_down(Point::new(20.0, 500.0));
    println!("  dismissed {dismissed} overlay(s), stack depth {}", stack.len());

    println!("\nsibling overlays close from a single outside click:");
    popover.open();
    menu.open();
    let dismissed = stack.pointer_down(Point::new(20.0, 500.0));
    println!("  dismissed {dismissed} overlay(s)");

    println!("\nactivating a menu item closes the menu:");
    menu.open();
    menu.activate("rename");
    println!("  menu open: {}", menu.is_open());

    println!("\ndisabled items refuse activation:");
    menu.open();
    let accepted = menu.activate("delete");
    println!("  activation accepted: {accepted}, menu open: {}", menu.is_open());
    stack.escape();
    println!("  final stack depth {}", stack.len());
}
