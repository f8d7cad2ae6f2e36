//! Command-line overlay for layerconf.
//!
//! This module handles:
//! - Classifying raw argument tokens
//! - Collecting bare tokens into the root `default` list
//! - Applying `--dotted.path=value` assignments onto a loaded tree

pub mod apply;
pub mod argument;

pub use apply::{DEFAULT_KEY, OverlayReport, apply};
pub use argument::Argument;
