//! In-memory configuration tree.
//!
//! This module handles:
//! - The tagged node type bound to each key
//! - Dotted-path reads with default and coercion fallback
//! - Guarded writes that never change a node's kind

pub mod node;
pub mod path_tree;

pub use node::Node;
pub use path_tree::PathTree;
