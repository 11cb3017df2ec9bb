pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod models;
pub mod remote;
pub mod runtime;
pub mod selector;
pub mod store;
pub mod sync;
pub mod tracing_setup;

// Re-export the types every caller needs at crate root
pub use config::CoreConfig;
pub use error::QuoteError;
pub use events::{AppEvent, CoreEvent, QuoteDisplay};
pub use models::{CategoryFilter, QuoteRecord};
pub use runtime::QuoteApp;
