use crate::entry::{entry_hash, Entry, Operation};
use crate::error::IndexError;
use serde_json::Value;
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// The canonical, ordered sequence of log entries, oldest first.
///
/// Entries are held behind an [`Arc`] and copied on write: taking a
/// [`LogSnapshot`] is O(1), and an append after a snapshot was taken clones
/// the sequence once so the snapshot never observes it.
#[derive(Debug, Clone, Default)]
pub struct LogIndex {
    entries: Arc<Vec<Entry>>,
    hashes: HashSet<String>,
}

impl LogIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from already-ordered entries (e.g. a replica's merged
    /// sequence).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateHash`] if two entries share a hash,
    /// [`IndexError::HashMismatch`] if an entry's hash does not match its
    /// content, or [`IndexError::BrokenChain`] if an entry does not link to
    /// the entry before it.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, IndexError> {
        let mut hashes = HashSet::with_capacity(entries.len());
        let mut prev: Option<&Entry> = None;
        for entry in &entries {
            if !hashes.insert(entry.hash.clone()) {
                return Err(IndexError::DuplicateHash(entry.hash.clone()));
            }
            if entry_hash(entry.next.as_deref(), entry.op, &entry.payload) != entry.hash {
                return Err(IndexError::HashMismatch(entry.hash.clone()));
            }
            // The first entry may link into history this index does not hold
            if let Some(p) = prev {
                if entry.next.as_deref() != Some(p.hash.as_str()) {
                    return Err(IndexError::BrokenChain(entry.hash.clone()));
                }
            }
            prev = Some(entry);
        }
        Ok(LogIndex {
            entries: Arc::new(entries),
            hashes,
        })
    }

    /// Append a new operation, chained onto the current head, and return the
    /// resulting entry.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateHash`] if the new entry's hash is
    /// already in the index. The index is left unchanged.
    pub fn append(&mut self, op: Operation, payload: Value) -> Result<Entry, IndexError> {
        let entry = Entry::new(op, payload, self.head());
        if !self.hashes.insert(entry.hash.clone()) {
            return Err(IndexError::DuplicateHash(entry.hash));
        }
        Arc::make_mut(&mut self.entries).push(entry.clone());
        Ok(entry)
    }

    /// A point-in-time view of every entry, oldest first.
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            entries: Arc::clone(&self.entries),
        }
    }

    /// The most recently appended entry.
    pub fn head(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Returns `true` if an entry with this hash is in the index.
    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable, ordered view of a [`LogIndex`] at one point in time.
///
/// Dereferences to `[Entry]`, oldest first.
///
/// # Examples
///
/// ```
/// use hashlog::{LogIndex, Operation};
/// use serde_json::json;
///
/// let mut index = LogIndex::new();
/// index.append(Operation::Add, json!(1))?;
/// let snapshot = index.snapshot();
///
/// index.append(Operation::Add, json!(2))?;
/// assert_eq!(snapshot.len(), 1);
/// assert_eq!(index.snapshot().len(), 2);
/// # Ok::<(), hashlog::IndexError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogSnapshot {
    entries: Arc<Vec<Entry>>,
}

impl LogSnapshot {
    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Append-order position of the entry with this hash.
    pub fn position(&self, hash: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.hash == hash)
    }
}

impl Deref for LogSnapshot {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.entries
    }
}
