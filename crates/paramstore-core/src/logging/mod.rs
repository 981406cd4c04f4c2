//! Logging abstractions
//!
//! The `Store` takes an injected [`Logger`]; the HTTP transport writes to the
//! global file logger, which is off unless `PARAMSTORE_DEBUG` is set.

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
#[cfg(test)]
pub(crate) use traits::test_support;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::{
    log, debug, info, warn, error,
    log_file_path, LogLevel,
};
