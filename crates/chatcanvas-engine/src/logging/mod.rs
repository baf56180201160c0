//! Logging utilities.
//!
//! Everything logs through the `log` facade. This module only installs the
//! backend: `env_logger` on desktop, the browser console on wasm.

mod init;

pub use init::{init_logging, LoggingConfig};
