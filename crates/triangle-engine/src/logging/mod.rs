//! Logging setup over the `log` facade with `env_logger` as the backend.

mod init;

pub use init::{init_logging, LogTarget, LoggingConfig, DEFAULT_FILTER};
