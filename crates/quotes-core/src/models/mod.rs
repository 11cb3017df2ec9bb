pub mod filter;
pub mod quote;

pub use filter::CategoryFilter;
pub use quote::{seed_quotes, QuoteRecord};
