#![allow(dead_code)]

use hashlog::{Entry, EventStore};
use serde_json::json;

/// Build a store with one `ADD` entry per label, payload `{"label": label}`.
/// Returns the store and the entry hashes in append order.
pub fn store_of(labels: &[&str]) -> (EventStore, Vec<String>) {
    let mut store = EventStore::new("test");
    let hashes = labels
        .iter()
        .map(|label| store.add(json!({"label": label})).unwrap().hash)
        .collect();
    (store, hashes)
}

/// Build a store with `n` entries whose payload is their append position.
pub fn store_with_n(n: usize) -> (EventStore, Vec<String>) {
    let mut store = EventStore::new("test");
    let hashes = (0..n).map(|i| store.add(json!(i)).unwrap().hash).collect();
    (store, hashes)
}

pub fn labels(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.payload["label"].as_str().unwrap_or("").to_string())
        .collect()
}

/// The five-entry log `A, B, C, D, E` used by most window tests.
pub fn abcde() -> (EventStore, Vec<String>) {
    store_of(&["A", "B", "C", "D", "E"])
}
