use std::sync::{Arc, Mutex};
use std::time::Duration;

use scrim::combobox::Combobox;
use scrim::error::SearchError;
use scrim::event::{EventResult, Key};
use scrim::search::{SearchSession, SuggestionItem};

fn countries() -> Vec<SuggestionItem> {
    vec![
        SuggestionItem::new("pt", "Portugal"),
        SuggestionItem::new("pl", "Poland"),
        SuggestionItem::new("py", "Paraguay"),
        SuggestionItem::new("pe", "Peru"),
        SuggestionItem::new("pa", "Panama"),
    ]
}

#[test]
fn test_min_chars_gates_the_list_not_the_text() {
    let combobox =
        Combobox::single(SearchSession::sync(countries()).with_min_chars(3));

    combobox.input("ab");
    assert_eq!(combobox.query(), "ab");
    assert!(!combobox.is_open());
    assert_eq!(combobox.key(Key::ArrowDown), EventResult::Ignored);

    combobox.input("pan");
    assert!(combobox.is_open());
    assert_eq!(combobox.session().len(), 1);
}

#[test]
fn test_cursor_survives_nothing_when_the_list_shrinks() {
    let combobox = Combobox::single(SearchSession::sync(countries()));
    combobox.input("p");
    assert_eq!(combobox.session().len(), 5);

    for _ in 0..5 {
        combobox.key(Key::ArrowDown);
    }
    assert_eq!(combobox.highlighted(), Some(4));

    combobox.input("pe");
    assert_eq!(combobox.session().len(), 1);
    assert_eq!(combobox.highlighted(), None);

    // Enter with no highlight commits nothing
    assert_eq!(combobox.key(Key::Enter), EventResult::Consumed);
    assert!(combobox.values().is_empty());
}

#[test]
fn test_keyboard_pick_flow_in_single_mode() {
    let combobox = Combobox::single(SearchSession::sync(countries()));
    let committed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&committed);
    combobox.set_on_value_change(move |value| {
        sink.lock().unwrap().push(value.to_string());
    });

    combobox.input("po");
    combobox.key(Key::ArrowDown);
    combobox.key(Key::ArrowDown);
    combobox.key(Key::Enter);

    assert_eq!(committed.lock().unwrap().as_slice(), ["pl"]);
    assert_eq!(combobox.query(), "Poland");
    assert!(!combobox.is_open());

    // refocusing reopens over the committed label
    combobox.focus();
    assert!(combobox.is_open());
    assert_eq!(combobox.session().len(), 1);
}

#[test]
fn test_tag_flow_in_multi_mode() {
    let combobox = Combobox::multi(SearchSession::sync(countries()));
    let emitted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&emitted);
    combobox.set_on_values_change(move |values| {
        sink.lock().unwrap().push(values.to_vec());
    });

    combobox.input("p");
    combobox.commit(0);
    combobox.commit(1);
    combobox.commit(2);
    assert_eq!(combobox.values().values(), ["pt", "pl", "py"]);
    assert!(combobox.is_open());
    assert_eq!(combobox.query(), "p");

    combobox.commit(0);
    assert_eq!(combobox.values().values(), ["pl", "py"]);

    combobox.remove_tag("py");
    assert_eq!(combobox.values().values(), ["pl"]);

    let emitted = emitted.lock().unwrap();
    assert_eq!(emitted.len(), 5);
    assert_eq!(emitted[4], ["pl"]);
}

#[test]
fn test_disabled_suggestions_can_be_highlighted_but_not_committed() {
    let options = vec![
        SuggestionItem::new("pt", "Portugal").with_disabled(true),
        SuggestionItem::new("pl", "Poland"),
    ];
    let combobox = Combobox::single(SearchSession::sync(options));
    combobox.input("p");

    combobox.key(Key::ArrowDown);
    assert_eq!(combobox.highlighted(), Some(0));
    assert_eq!(combobox.key(Key::Enter), EventResult::Consumed);
    assert!(combobox.values().is_empty());
    assert!(combobox.is_open());

    combobox.key(Key::ArrowDown);
    combobox.key(Key::Enter);
    assert_eq!(combobox.value().as_deref(), Some("pl"));
}

#[tokio::test(start_paused = true)]
async fn test_async_combobox_round_trip() {
    let combobox = Combobox::single(
        SearchSession::with_provider(|query: String| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let all = countries();
            let needle = query.to_lowercase();
            Ok::<_, SearchError>(
                all.into_iter()
                    .filter(|option| option.label.to_lowercase().contains(&needle))
                    .collect(),
            )
        })
        .with_min_chars(2),
    );

    combobox.input("po");
    assert!(combobox.is_open());
    assert!(combobox.session().is_empty());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!combobox.is_loading());
    assert_eq!(combobox.session().len(), 2);

    combobox.key(Key::ArrowDown);
    combobox.key(Key::Enter);
    assert_eq!(combobox.value().as_deref(), Some("pt"));
    assert_eq!(combobox.query(), "Portugal");
    assert!(!combobox.is_open());

    // the committed label replacing the text must not fire a new search
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!combobox.is_loading());
    assert_eq!(combobox.query(), "Portugal");
}

#[tokio::test(start_paused = true)]
async fn test_results_arriving_reset_the_highlight() {
    let combobox = Combobox::single(
        SearchSession::with_provider(|_query: String| async move {
            Ok::<_, SearchError>(vec![
                SuggestionItem::new("a", "Alpha"),
                SuggestionItem::new("b", "Beta"),
            ])
        }),
    );

    combobox.input("x");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(combobox.session().len(), 2);

    // stale results stay visible while the next search runs; a highlight
    // placed over them must not survive the replacement
    combobox.input("xy");
    combobox.hover(1);
    assert_eq!(combobox.highlighted(), Some(1));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(combobox.session().len(), 2);
    assert_eq!(combobox.highlighted(), None);
}

#[test]
fn test_host_pushed_results_flow_through() {
    // hosts that own the search pipeline bypass providers entirely
    let combobox = Combobox::single(SearchSession::with_provider(
        |_query: String| async move { Ok::<_, SearchError>(Vec::new()) },
    ));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    combobox.set_on_results(move |results| {
        sink.lock().unwrap().push(results.len());
    });

    combobox.session().set_results(vec![
        SuggestionItem::new("a", "Alpha"),
        SuggestionItem::new("b", "Beta"),
    ]);
    assert_eq!(combobox.results().len(), 2);
    assert_eq!(seen.lock().unwrap().as_slice(), [2]);
}
