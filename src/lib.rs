//! layerconf - hierarchical configuration overlay engine.
//!
//! This library provides:
//! - A dotted-path configuration tree with kind-preserving writes
//! - Module sub-documents resolved from the base document's `modules` key
//! - A command-line overlay for `--dotted.path=value` arguments
//! - Typed reads with default and coercion fallback
//!
//! # Example
//!
//! ```no_run
//! use layerconf::coerce;
//! use layerconf::config::{ConfigOptions, Configuration};
//!
//! let config = Configuration::open(ConfigOptions::new().config_dir("conf")).unwrap();
//!
//! let port = config
//! 	.get_as("server.port", Some(8080), coerce::parse::<u16>, None)
//! 	.unwrap();
//! let user = config.get_as("user", None, coerce::string, Some("mal"));
//!
//! println!("port {port}, mal user {user:?}");
//! ```

pub mod coerce;
pub mod config;
pub mod error;
pub mod overlay;
pub mod tree;

pub use config::{ConfigOptions, Configuration, LoadIssues, LoadState};
pub use error::{ConfError, FormatError, Result};
pub use tree::{Node, PathTree};
