//! Configuration loading and resolution for layerconf.
//!
//! This module handles:
//! - JSON and TOML document parsing
//! - Module sub-document resolution
//! - The layered resolver and its read API
//! - The process-wide instance

pub mod instance;
pub mod parser;
pub mod resolver;
pub mod types;

pub use instance::{current, instance};
pub use parser::{DocumentFormat, parse_document_file, parse_document_str};
pub use resolver::{Configuration, resolve_modules};
pub use types::{ConfigOptions, LoadIssues, LoadState, ProgramLocation};
