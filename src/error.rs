use std::path::PathBuf;

/// Library-level structured errors for layerconf.
///
/// Lookup failures (`NotFound`, `Format`) are returned to callers. Structural
/// conflicts are returned by tree mutations and absorbed by the overlay and the
/// resolver, which log them and move on.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to parse config file: {path}")]
	TomlParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Config document root is not an object: {path}")]
	NotAnObject { path: PathBuf },

	#[error("Key not present: {path}")]
	NotFound { path: String },

	#[error("Key {path} has a wrong format")]
	Format {
		path: String,
		#[source]
		source: FormatError,
	},

	#[error("Invalid assignment to {path}: would replace a {existing} with a {attempted}")]
	StructuralConflict {
		path: String,
		existing: &'static str,
		attempted: &'static str,
	},

	#[error("Invalid key path: {path:?}")]
	InvalidPath { path: String },
}

impl ConfError {
	/// True for the two lookup failures a caller treats as "no usable value".
	pub fn is_lookup_failure(&self) -> bool {
		matches!(self, ConfError::NotFound { .. } | ConfError::Format { .. })
	}
}

/// A leaf value could not be coerced into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FormatError {
	message: String,
}

impl FormatError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Result type alias using ConfError.
pub type Result<T> = std::result::Result<T, ConfError>;
