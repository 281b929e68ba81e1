use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use xxhash_rust::xxh64::Xxh64;

/// The kind of operation an [`Entry`] records.
///
/// Serialized as `"ADD"` / `"DEL"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// A new payload was added to the log.
    Add,
    /// A previously added entry was marked as removed. The payload holds the
    /// hash of the removed entry.
    Del,
}

impl Operation {
    /// The wire name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Del => "DEL",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, hash-addressed record appended to the log.
///
/// The `hash` is derived from the entry's content and from the hash of the
/// entry appended before it (`next`), so identical payloads appended at
/// different positions still get distinct hashes. Hashes are the cursor
/// currency of range queries; they carry no ordering information.
///
/// Entries are built by [`LogIndex::append`](crate::LogIndex::append); the
/// fields are public for inspection only.
///
/// # Examples
///
/// ```
/// use hashlog::{Entry, Operation};
/// use serde_json::json;
///
/// let first = Entry::new(Operation::Add, json!({"text": "hello"}), None);
/// let second = Entry::new(Operation::Add, json!({"text": "hello"}), Some(&first));
///
/// assert_eq!(first.hash.len(), 16);
/// assert_ne!(first.hash, second.hash);
/// assert_eq!(second.next.as_deref(), Some(first.hash.as_str()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Entry {
    /// Hex-encoded xxh64 content hash.
    pub hash: String,

    /// What this entry does.
    pub op: Operation,

    /// Operation-specific data. Opaque to the log and to queries.
    pub payload: Value,

    /// Hash of the entry appended immediately before this one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Entry {
    /// Build an entry chained onto `prev` and compute its hash.
    pub fn new(op: Operation, payload: Value, prev: Option<&Entry>) -> Self {
        let next = prev.map(|p| p.hash.clone());
        let hash = entry_hash(next.as_deref(), op, &payload);
        Entry {
            hash,
            op,
            payload,
            next,
        }
    }

    /// Returns `true` for [`Operation::Add`] entries.
    pub fn is_add(&self) -> bool {
        self.op == Operation::Add
    }

    /// Returns `true` for [`Operation::Del`] entries.
    pub fn is_del(&self) -> bool {
        self.op == Operation::Del
    }
}

/// Compute the content hash of an entry, hex-encoded.
///
/// The input is the operation name, the previous entry's hash (empty for the
/// first entry) and the compact JSON encoding of the payload, separated by
/// newlines.
pub fn entry_hash(prev: Option<&str>, op: Operation, payload: &Value) -> String {
    let mut hasher = Xxh64::new(0);
    hasher.update(op.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(prev.unwrap_or("").as_bytes());
    hasher.update(b"\n");
    hasher.update(payload.to_string().as_bytes());
    format!("{:016x}", hasher.digest())
}
