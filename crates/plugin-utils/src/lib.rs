//! Shared utilities for chat plugins
//!
//! Logging setup and environment loading used by the plugin binaries.

pub mod config;
pub mod logging;

pub use config::{LogFormat, ParseLogFormatError, load_dotenv};
pub use logging::init_tracing_with;
