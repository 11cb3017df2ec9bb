pub mod commands;
pub mod options;
pub mod protocol;
pub mod render;
pub mod session;

pub use commands::execute;
pub use options::{open_app, remote_source, CliOptions};
pub use protocol::{CliCommand, SessionCommand};
pub use session::run_session;
