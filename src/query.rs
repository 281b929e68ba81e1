//! Query descriptors: the typed form of a range query and the option bag it
//! is parsed from.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// The untyped option bag callers hand to
/// [`EventStore::iterator`](crate::EventStore::iterator).
///
/// Every field is optional. At most one of `gt`, `gte`, `lt`, `lte` may be
/// set; the combination is checked once when converting into a
/// [`QueryDescriptor`].
///
/// | option    | effect                                                    |
/// |-----------|-----------------------------------------------------------|
/// | `limit`   | absent ⇒ 1, `<= -1` ⇒ everything, `N >= 0` ⇒ at most `N`  |
/// | `gt`      | entries after the cursor hash                             |
/// | `gte`     | entries from the cursor hash onwards                      |
/// | `lt`      | entries before the cursor hash                            |
/// | `lte`     | entries up to and including the cursor hash               |
/// | `reverse` | reverse the final window                                  |
///
/// # Examples
///
/// ```
/// use hashlog::{QueryDescriptor, QueryOptions};
///
/// let opts: QueryOptions = serde_json::from_str(r#"{"lt": "abc", "limit": 2}"#).unwrap();
/// let descriptor = QueryDescriptor::try_from(opts).unwrap();
/// assert_eq!(descriptor, QueryDescriptor::lt("abc").with_limit(2));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
    #[serde(default)]
    pub reverse: bool,
}

/// How many entries a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    /// No limit was given: return the single closest entry.
    #[default]
    Default,
    /// Return every entry the window reaches.
    Unbounded,
    /// Return at most this many entries. Zero yields an empty window.
    Count(usize),
}

impl Limit {
    /// Map the raw `limit` option onto a [`Limit`]. Any negative value means
    /// "no limit".
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            None => Limit::Default,
            Some(n) => match usize::try_from(n) {
                Ok(n) => Limit::Count(n),
                Err(_) => Limit::Unbounded,
            },
        }
    }

    /// The concrete amount against a snapshot of `len` entries.
    pub fn resolve(self, len: usize) -> usize {
        match self {
            Limit::Default => 1,
            Limit::Unbounded => len,
            Limit::Count(n) => n,
        }
    }
}

/// Which way the snapshot is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Oldest to newest.
    Forward,
    /// Newest to oldest.
    Backward,
}

/// Where a query window starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Bound {
    /// No cursor: the window ends at the most recent entry.
    #[default]
    Latest,
    /// Entries appended after the cursor (`gt`), or from it (`gte`).
    After { hash: String, inclusive: bool },
    /// Entries appended before the cursor (`lt`), or up to it (`lte`).
    Before { hash: String, inclusive: bool },
}

impl Bound {
    /// Greater bounds scan forward; lesser bounds and [`Bound::Latest`] scan
    /// backward from the newest entry.
    pub fn direction(&self) -> Direction {
        match self {
            Bound::After { .. } => Direction::Forward,
            Bound::Latest | Bound::Before { .. } => Direction::Backward,
        }
    }

    /// The cursor hash, if any.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            Bound::Latest => None,
            Bound::After { hash, .. } | Bound::Before { hash, .. } => Some(hash.as_str()),
        }
    }

    /// Whether the entry at the cursor belongs to the window. Always `true`
    /// without a cursor, so the scan starts at the first entry it sees.
    pub fn includes_cursor(&self) -> bool {
        match self {
            Bound::Latest => true,
            Bound::After { inclusive, .. } | Bound::Before { inclusive, .. } => *inclusive,
        }
    }
}

/// A validated range query.
///
/// The default descriptor returns the single most recent entry.
///
/// # Examples
///
/// ```
/// use hashlog::{Bound, Limit, QueryDescriptor};
///
/// let q = QueryDescriptor::gte("abc").unbounded().reversed();
/// assert_eq!(q.bound(), &Bound::After { hash: "abc".into(), inclusive: true });
/// assert_eq!(q.limit(), Limit::Unbounded);
/// assert!(q.is_reversed());
///
/// assert_eq!(QueryDescriptor::default(), QueryDescriptor::latest());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryDescriptor {
    bound: Bound,
    limit: Limit,
    reverse: bool,
}

impl QueryDescriptor {
    /// The newest entry only. Same as [`QueryDescriptor::default`].
    pub fn latest() -> Self {
        Self::default()
    }

    /// Entries appended after `hash`.
    pub fn gt(hash: impl Into<String>) -> Self {
        Self::with_bound(Bound::After {
            hash: hash.into(),
            inclusive: false,
        })
    }

    /// Entries from `hash` onwards, `hash` included.
    pub fn gte(hash: impl Into<String>) -> Self {
        Self::with_bound(Bound::After {
            hash: hash.into(),
            inclusive: true,
        })
    }

    /// Entries appended before `hash`.
    pub fn lt(hash: impl Into<String>) -> Self {
        Self::with_bound(Bound::Before {
            hash: hash.into(),
            inclusive: false,
        })
    }

    /// Entries up to and including `hash`.
    pub fn lte(hash: impl Into<String>) -> Self {
        Self::with_bound(Bound::Before {
            hash: hash.into(),
            inclusive: true,
        })
    }

    /// A query over `bound` with the default limit and no reversal.
    pub fn with_bound(bound: Bound) -> Self {
        QueryDescriptor {
            bound,
            ..Self::default()
        }
    }

    /// Return at most `n` entries.
    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = Limit::Count(n);
        self
    }

    /// Return every entry the window reaches.
    pub fn unbounded(mut self) -> Self {
        self.limit = Limit::Unbounded;
        self
    }

    /// Reverse the final window.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Where the window starts.
    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    /// How many entries the window may hold.
    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Whether the final window is reversed.
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// The scan direction selected by the bound.
    pub fn direction(&self) -> Direction {
        self.bound.direction()
    }
}

impl TryFrom<QueryOptions> for QueryDescriptor {
    type Error = QueryError;

    fn try_from(opts: QueryOptions) -> Result<Self, QueryError> {
        let limit = Limit::from_raw(opts.limit);
        let candidates = [
            ("gt", opts.gt.map(|hash| Bound::After { hash, inclusive: false })),
            ("gte", opts.gte.map(|hash| Bound::After { hash, inclusive: true })),
            ("lt", opts.lt.map(|hash| Bound::Before { hash, inclusive: false })),
            ("lte", opts.lte.map(|hash| Bound::Before { hash, inclusive: true })),
        ];

        let mut chosen: Option<(&'static str, Bound)> = None;
        for (name, bound) in candidates {
            let Some(bound) = bound else { continue };
            if let Some((first, _)) = chosen {
                return Err(QueryError::ConflictingBounds {
                    first,
                    second: name,
                });
            }
            chosen = Some((name, bound));
        }

        Ok(QueryDescriptor {
            bound: chosen.map(|(_, b)| b).unwrap_or_default(),
            limit,
            reverse: opts.reverse,
        })
    }
}

impl From<&QueryDescriptor> for QueryOptions {
    fn from(q: &QueryDescriptor) -> Self {
        let mut opts = QueryOptions {
            limit: match q.limit {
                Limit::Default => None,
                Limit::Unbounded => Some(-1),
                Limit::Count(n) => Some(i64::try_from(n).unwrap_or(i64::MAX)),
            },
            reverse: q.reverse,
            ..QueryOptions::default()
        };
        match &q.bound {
            Bound::Latest => {}
            Bound::After { hash, inclusive: false } => opts.gt = Some(hash.clone()),
            Bound::After { hash, inclusive: true } => opts.gte = Some(hash.clone()),
            Bound::Before { hash, inclusive: false } => opts.lt = Some(hash.clone()),
            Bound::Before { hash, inclusive: true } => opts.lte = Some(hash.clone()),
        }
        opts
    }
}
