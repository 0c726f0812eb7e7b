//! Country Search Example
//!
//! Demonstrates the Combobox engine over an async search provider:
//! - Keystroke bursts are debounced; the provider sees only the final query
//! - The minimum query length gates the list, not the text
//! - ArrowDown/ArrowUp walk the results, Enter commits the highlighted one
//! - Committing writes the option label into the input without re-searching

use std::fs::File;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scrim::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("uk", "United Kingdom"),
    ("ua", "Ukraine"),
    ("de", "Germany"),
    ("fr", "France"),
    ("es", "Spain"),
    ("it", "Italy"),
    ("nl", "Netherlands"),
    ("pt", "Portugal"),
    ("pl", "Poland"),
    ("hu", "Hungary"),
    ("jp", "Japan"),
    ("au", "Australia"),
    ("ca", "Canada"),
    ("br", "Brazil"),
];

fn directory_matches(query: &str) -> Vec<SuggestionItem> {
    let needle = query.to_lowercase();
    COUNTRIES
        .iter()
        .filter(|(_, label)| label.to_lowercase().contains(&needle))
        .map(|(value, label)| SuggestionItem::new(*value, *label))
        .collect()
}

fn print_list(combobox: &Combobox) {
    if !combobox.is_open() {
        println!("  (list closed)");
        return;
    }
    if combobox.is_loading() {
        println!("  (searching...)");
        return;
    }
    for (index, option) in combobox.results().iter().enumerate() {
        let marker = if combobox.is_highlighted(index) { '>' } else { ' ' };
        println!("  {marker} {}", option.label);
    }
}

#[tokio::main]
async fn main() {
    // Set up file logging
    let log_file = File::create("country_search.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let provider_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&provider_calls);
    let session = SearchSession::with_provider(move |query: String| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            // simulated backend latency
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok::<_, SearchError>(directory_matches(&query))
        }
    })
    .with_min_chars(2)
    .with_debounce(Duration::from_millis(150));

    let combobox = Combobox::single(session);
    combobox.set_on_value_change(|value| println!("  [on_value_change] {value:?}"));

    println!("Country search: 2-char minimum, 150ms debounce, 80ms backend\n");

    combobox.input("u");
    println!(
        "typed \"u\": list {} (below the minimum)",
        if combobox.is_open() { "open" } else { "closed" }
    );

    println!("\ntyping \"un\" -> \"uni\" -> \"unit\" in a quick burst...");
    for text in ["un", "uni", "unit"] {
        combobox.input(text);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;
    println!(
        "provider was called {} time(s), for the final query only:",
        provider_calls.load(Ordering::SeqCst)
    );
    print_list(&combobox);

    println!("\npressing ArrowDown twice:");
    combobox.key(Key::ArrowDown);
    combobox.key(Key::ArrowDown);
    print_list(&combobox);

    println!("\npressing Enter:");
    combobox.key(Key::Enter);
    println!(
        "  input now reads {:?}, committed value {:?}, list {}",
        combobox.query(),
        combobox.value(),
        if combobox.is_open() { "open" } else { "closed" }
    );

    // the label landing in the input scheduled no new search
    tokio::time::sleep(Duration::from_millis(400)).await;
    println!(
        "  provider still at {} call(s) after the label replaced the text",
        provider_calls.load(Ordering::SeqCst)
    );

    combobox.clear();
    println!(
        "\ncleared: query {:?}, selection empty: {}",
        combobox.query(),
        combobox.values().is_empty()
    );
}
