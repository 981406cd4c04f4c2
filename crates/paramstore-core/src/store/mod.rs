//! The placeholder-resolving store and its environment overlay

mod resolve;
mod environment;

pub use resolve::Store;
pub use environment::{Environment, MemoryEnvironment, ProcessEnvironment};
