pub mod cmd;
pub mod content_type;
pub mod errors;
pub mod fs;
pub mod settings;
pub mod store;
pub mod walker;
pub mod wallet;

pub use errors::{CliResult, PermadeployCliError};
