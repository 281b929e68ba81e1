use crate::engine::{Cursor, RangeQueryEngine};
use crate::entry::{Entry, Operation};
use crate::error::{IndexError, QueryError};
use crate::index::{LogIndex, LogSnapshot};
use crate::query::{QueryDescriptor, QueryOptions};
use serde_json::Value;

/// A named event log with cursor-based range queries.
///
/// The store owns a [`LogIndex`] and runs every query against a fresh
/// snapshot of it, so a [`Cursor`] handed out earlier is unaffected by later
/// appends.
///
/// # Examples
///
/// ```
/// use hashlog::{EventStore, QueryOptions};
/// use serde_json::json;
///
/// let mut store = EventStore::new("feed");
/// for i in 0..5 {
///     store.add(json!({"n": i}))?;
/// }
///
/// // Newest entry only
/// let latest: Vec<_> = store.iterator(QueryOptions::default()).unwrap().collect();
/// assert_eq!(latest.len(), 1);
/// assert_eq!(latest[0].payload, json!({"n": 4}));
///
/// // Everything, newest first
/// let all = store.iterator_json(r#"{"limit": -1, "reverse": true}"#).unwrap();
/// assert_eq!(all.entries()[0].payload, json!({"n": 4}));
/// assert_eq!(all.len(), 5);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventStore {
    dbname: String,
    index: LogIndex,
}

impl EventStore {
    /// Create an empty store.
    pub fn new(dbname: impl Into<String>) -> Self {
        EventStore {
            dbname: dbname.into(),
            index: LogIndex::new(),
        }
    }

    /// Create a store over an existing index.
    pub fn with_index(dbname: impl Into<String>, index: LogIndex) -> Self {
        EventStore {
            dbname: dbname.into(),
            index,
        }
    }

    /// Append an `ADD` operation carrying `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateHash`] if the new entry's hash is
    /// already in the log.
    pub fn add(&mut self, payload: Value) -> Result<Entry, IndexError> {
        self.append(Operation::Add, payload)
    }

    /// Append a `DEL` operation targeting the entry with `hash`.
    ///
    /// The target is not checked: removal is recorded as an operation, and
    /// interpreting it is up to whoever reads the log.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateHash`] as for [`EventStore::add`].
    pub fn remove(&mut self, hash: &str) -> Result<Entry, IndexError> {
        self.append(Operation::Del, Value::String(hash.to_string()))
    }

    /// Append an arbitrary operation.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateHash`] as for [`EventStore::add`].
    pub fn append(&mut self, op: Operation, payload: Value) -> Result<Entry, IndexError> {
        let entry = self.index.append(op, payload)?;
        log::trace!("hashlog: '{}' appended {} {}", self.dbname, entry.op, entry.hash);
        Ok(entry)
    }

    /// Validate `options` and return a cursor over the selected window.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ConflictingBounds`] if more than one of `gt`,
    /// `gte`, `lt`, `lte` is set. A cursor hash that is not in the log is not
    /// an error; it selects an empty window.
    pub fn iterator(&self, options: QueryOptions) -> Result<Cursor, QueryError> {
        let query = QueryDescriptor::try_from(options)?;
        Ok(self.iterate(&query))
    }

    /// Parse a JSON option bag and run it as [`EventStore::iterator`] does.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Options`] if `json` is not a valid option bag,
    /// or [`QueryError::ConflictingBounds`] as for [`EventStore::iterator`].
    pub fn iterator_json(&self, json: &str) -> Result<Cursor, QueryError> {
        let options: QueryOptions = serde_json::from_str(json)?;
        self.iterator(options)
    }

    /// Run an already-validated query and return a cursor over its window.
    pub fn iterate(&self, query: &QueryDescriptor) -> Cursor {
        RangeQueryEngine::iterate(&self.index.snapshot(), query)
    }

    /// Run an already-validated query and return its window.
    pub fn query(&self, query: &QueryDescriptor) -> Vec<Entry> {
        RangeQueryEngine::query(&self.index.snapshot(), query)
    }

    /// A point-in-time view of every entry, oldest first.
    pub fn snapshot(&self) -> LogSnapshot {
        self.index.snapshot()
    }

    /// Drop every entry by replacing the index with an empty one. Snapshots
    /// and cursors taken before the reset keep their entries.
    pub fn reset(&mut self) {
        log::debug!(
            "hashlog: '{}' reset, dropping {} entries",
            self.dbname,
            self.index.len()
        );
        self.index = LogIndex::new();
    }

    /// The logical database name this store was created with.
    pub fn dbname(&self) -> &str {
        &self.dbname
    }

    /// The index backing this store.
    pub fn index(&self) -> &LogIndex {
        &self.index
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
