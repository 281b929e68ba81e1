use crate::entry::Entry;
use crate::index::LogSnapshot;
use crate::query::{Direction, QueryDescriptor};
use std::iter::{FusedIterator, Rev};
use std::slice;

/// Windowed extraction over a [`LogSnapshot`].
///
/// A query scans the snapshot in the direction its bound selects, skips to
/// the cursor, optionally drops the cursor itself, and takes up to the
/// resolved limit. A backward scan is flipped back into append order, and a
/// reversed query flips the result once more.
///
/// The engine holds no state between calls: the same snapshot and
/// descriptor always produce the same window.
///
/// # Examples
///
/// ```
/// use hashlog::{LogIndex, Operation, QueryDescriptor, RangeQueryEngine};
/// use serde_json::json;
///
/// let mut index = LogIndex::new();
/// let mut hashes = Vec::new();
/// for p in ["a", "b", "c", "d", "e"] {
///     hashes.push(index.append(Operation::Add, json!(p))?.hash);
/// }
/// let snapshot = index.snapshot();
///
/// let page = RangeQueryEngine::query(&snapshot, &QueryDescriptor::gt(&hashes[1]).with_limit(2));
/// let payloads: Vec<_> = page.iter().map(|e| e.payload.clone()).collect();
/// assert_eq!(payloads, vec![json!("c"), json!("d")]);
/// # Ok::<(), hashlog::IndexError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeQueryEngine;

impl RangeQueryEngine {
    /// The lazy scan behind a query, in scan order (newest first for
    /// backward scans). Nothing is read from the snapshot until the window
    /// is polled.
    pub fn window<'a>(snapshot: &'a LogSnapshot, query: &'a QueryDescriptor) -> Window<'a> {
        let entries = snapshot.entries();
        let scan = match query.direction() {
            Direction::Forward => Scan::Forward(entries.iter()),
            Direction::Backward => Scan::Backward(entries.iter().rev()),
        };
        let seek = match query.bound().cursor() {
            Some(hash) => Seek::Pending(hash),
            None => Seek::Found,
        };
        Window {
            scan,
            seek,
            include_cursor: query.bound().includes_cursor(),
            remaining: query.limit().resolve(entries.len()),
            scanned: 0,
        }
    }

    /// Run a query and return its window in final order.
    pub fn query(snapshot: &LogSnapshot, query: &QueryDescriptor) -> Vec<Entry> {
        Self::iterate(snapshot, query).into_entries()
    }

    /// Run a query and return a one-shot [`Cursor`] over its window.
    pub fn iterate(snapshot: &LogSnapshot, query: &QueryDescriptor) -> Cursor {
        let mut window = Self::window(snapshot, query);
        let mut entries: Vec<Entry> = window.by_ref().cloned().collect();

        if window.cursor_missing() {
            log::warn!(
                "hashlog: cursor {:?} not found in snapshot of {} entries",
                query.bound().cursor(),
                snapshot.len()
            );
        }

        if query.direction() == Direction::Backward {
            entries.reverse();
        }
        if query.is_reversed() {
            entries.reverse();
        }

        log::debug!(
            "hashlog: {:?} scanned {} of {} entries, returned {}",
            query,
            window.scanned(),
            snapshot.len(),
            entries.len()
        );

        Cursor::new(entries)
    }
}

enum Scan<'a> {
    Forward(slice::Iter<'a, Entry>),
    Backward(Rev<slice::Iter<'a, Entry>>),
}

impl<'a> Iterator for Scan<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        match self {
            Scan::Forward(it) => it.next(),
            Scan::Backward(it) => it.next(),
        }
    }
}

enum Seek<'a> {
    Pending(&'a str),
    Found,
    Missing,
}

/// Lazy skip / drop / take over a snapshot, yielding entries in scan order.
///
/// Reads at most the skip distance to the cursor plus the limit (plus one
/// for an exclusive cursor) before it is exhausted.
pub struct Window<'a> {
    scan: Scan<'a>,
    seek: Seek<'a>,
    include_cursor: bool,
    remaining: usize,
    scanned: usize,
}

impl<'a> Window<'a> {
    /// Number of snapshot entries read so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// `true` once the whole snapshot was read without meeting the cursor.
    pub fn cursor_missing(&self) -> bool {
        matches!(self.seek, Seek::Missing)
    }

    fn pull(&mut self) -> Option<&'a Entry> {
        let entry = self.scan.next()?;
        self.scanned += 1;
        Some(entry)
    }

    fn emit(&mut self, entry: &'a Entry) -> Option<&'a Entry> {
        self.remaining -= 1;
        Some(entry)
    }
}

impl<'a> Iterator for Window<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        if self.remaining == 0 {
            return None;
        }

        if let Seek::Pending(hash) = self.seek {
            loop {
                let Some(entry) = self.pull() else {
                    self.seek = Seek::Missing;
                    return None;
                };
                if entry.hash == hash {
                    self.seek = Seek::Found;
                    if self.include_cursor {
                        return self.emit(entry);
                    }
                    break;
                }
            }
        }

        if matches!(self.seek, Seek::Missing) {
            return None;
        }
        let entry = self.pull()?;
        self.emit(entry)
    }
}

impl FusedIterator for Window<'_> {}

/// A single-pass iterator over a materialized query window.
///
/// Yields each entry once, then `None` forever. [`Cursor::entries`] exposes
/// the whole window regardless of how far iteration has progressed; to
/// iterate again, run the query again.
#[derive(Debug, Clone)]
pub struct Cursor {
    entries: Vec<Entry>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(entries: Vec<Entry>) -> Self {
        Cursor { entries, pos: 0 }
    }

    /// The full window, in final order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries not yet yielded.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.pos
    }

    /// Consume the cursor and return the full window.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl Iterator for Cursor {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let entry = self.entries.get(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Cursor {}

impl FusedIterator for Cursor {}
