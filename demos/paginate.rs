//! Paging backwards through a feed with hash cursors.
//!
//! Each page asks for the entries before the oldest hash of the previous
//! page, newest first, the way an infinite-scroll UI would.

use hashlog::{EventStore, QueryDescriptor};
use serde_json::json;

const PAGE_SIZE: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = EventStore::new("feed");

    let mut posted = Vec::new();
    for i in 0..10 {
        posted.push(store.add(json!({"text": format!("post #{i}")}))?);
    }
    // Retract one post; the retraction is itself an entry in the feed
    store.remove(&posted[3].hash)?;

    let mut query = QueryDescriptor::latest().with_limit(PAGE_SIZE).reversed();
    let mut page_no = 1;
    loop {
        let page = store.query(&query);
        let Some(oldest) = page.last() else { break };

        println!("page {page_no}:");
        for entry in &page {
            println!("  {} {} {}", entry.hash, entry.op, entry.payload);
        }

        query = QueryDescriptor::lt(&oldest.hash)
            .with_limit(PAGE_SIZE)
            .reversed();
        page_no += 1;
    }

    // The same walk driven by a JSON option bag
    let newest = store.iterator_json(r#"{"limit": 2, "reverse": true}"#)?;
    for entry in newest {
        println!("latest: {}", entry.payload);
    }

    Ok(())
}
