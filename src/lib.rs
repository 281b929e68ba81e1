mod engine;
mod entry;
pub mod error;
mod index;
pub mod query;
mod store;

pub use engine::{Cursor, RangeQueryEngine, Window};
pub use entry::{entry_hash, Entry, Operation};
pub use error::{IndexError, QueryError};
pub use index::{LogIndex, LogSnapshot};
pub use query::{Bound, Direction, Limit, QueryDescriptor, QueryOptions};
pub use store::EventStore;
