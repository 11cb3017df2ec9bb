pub mod category_index;
pub mod kv;
pub mod quote_store;

pub use category_index::{categories, CategoryIndex};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use quote_store::{LoadOutcome, QuoteStore};
