use std::path::{Path, PathBuf};

/// Default base document name inside the config directory.
pub const DEFAULT_CONFIG_NAME: &str = "main.json";

/// Default config directory, relative to the program's own directory.
pub const DEFAULT_CONFIG_DIR: &str = "conf";

/// Reserved root key mapping module names to their documents.
pub const MODULES_KEY: &str = "modules";

/// Construction parameters for a [`Configuration`](crate::config::Configuration).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOptions {
	/// Skip the base document and start from an empty tree.
	pub in_memory: bool,

	/// Directory holding the base and module documents.
	/// Defaults to `<program dir>/conf`.
	pub config_dir: Option<PathBuf>,

	/// File name of the base document. Defaults to `main.json`.
	pub config_name: Option<String>,

	/// Argument vector for the overlay, program name first.
	/// Defaults to the process arguments at load time.
	pub args: Option<Vec<String>>,
}

impl ConfigOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn in_memory(mut self, in_memory: bool) -> Self {
		self.in_memory = in_memory;
		self
	}

	pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.config_dir = Some(dir.into());
		self
	}

	pub fn config_name(mut self, name: impl Into<String>) -> Self {
		self.config_name = Some(name.into());
		self
	}

	pub fn args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.args = Some(args.into_iter().map(Into::into).collect());
		self
	}
}

/// Progress of a load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
	Unloaded,
	BaseLoaded,
	ModulesResolved,
	Overlaid,
	Ready,
	Failed,
}

impl LoadState {
	pub fn as_str(&self) -> &'static str {
		match self {
			LoadState::Unloaded => "unloaded",
			LoadState::BaseLoaded => "base-loaded",
			LoadState::ModulesResolved => "modules-resolved",
			LoadState::Overlaid => "overlaid",
			LoadState::Ready => "ready",
			LoadState::Failed => "failed",
		}
	}
}

/// Problems a load cycle absorbed instead of failing on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadIssues {
	/// Modules whose document could not be loaded, with the reason.
	pub failed_modules: Vec<(String, String)>,

	/// Command-line assignments the tree refused, with the reason.
	pub rejected_overrides: Vec<(String, String)>,
}

impl LoadIssues {
	pub fn is_empty(&self) -> bool {
		self.failed_modules.is_empty() && self.rejected_overrides.is_empty()
	}
}

/// Render an error with its source chain on one line.
pub(crate) fn describe(err: &dyn std::error::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

/// Where the program lives, derived from the first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLocation {
	/// Directory of the program path, `.` when it has none.
	pub dir: PathBuf,

	/// Base name of the program path.
	pub script: String,
}

impl ProgramLocation {
	pub fn from_program(program: Option<&str>) -> Self {
		let path = Path::new(program.unwrap_or_default());
		let dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};
		let script = path
			.file_name()
			.map(|name| name.to_string_lossy().to_string())
			.unwrap_or_else(|| "__main__".to_string());

		Self { dir, script }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_options_builder() {
		let options = ConfigOptions::new()
			.config_dir("/etc/app")
			.config_name("app.json")
			.args(["prog", "--a=1"]);

		assert!(!options.in_memory);
		assert_eq!(options.config_dir, Some(PathBuf::from("/etc/app")));
		assert_eq!(options.config_name.as_deref(), Some("app.json"));
		assert_eq!(
			options.args,
			Some(vec!["prog".to_string(), "--a=1".to_string()])
		);
	}

	#[test]
	fn test_program_location_with_dir() {
		let location = ProgramLocation::from_program(Some("/opt/app/bin/tool"));

		assert_eq!(location.dir, PathBuf::from("/opt/app/bin"));
		assert_eq!(location.script, "tool");
	}

	#[test]
	fn test_program_location_bare_name() {
		let location = ProgramLocation::from_program(Some("tool"));

		assert_eq!(location.dir, PathBuf::from("."));
		assert_eq!(location.script, "tool");
	}

	#[test]
	fn test_program_location_missing() {
		let location = ProgramLocation::from_program(None);

		assert_eq!(location.dir, PathBuf::from("."));
		assert_eq!(location.script, "__main__");
	}
}
