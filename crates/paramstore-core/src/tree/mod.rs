//! Configuration trees and placeholder syntax

mod config_tree;
mod placeholder;

pub use config_tree::ConfigTree;
pub use placeholder::{is_placeholder, placeholder_name};
