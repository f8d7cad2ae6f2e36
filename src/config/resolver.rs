use crate::config::parser::parse_document_file;
use crate::config::types::{
	ConfigOptions, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_NAME, LoadIssues, LoadState, MODULES_KEY,
	ProgramLocation, describe,
};
use crate::error::{ConfError, FormatError, Result};
use crate::overlay;
use crate::tree::path_tree::fallback;
use crate::tree::{Node, PathTree};
use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Layered configuration: base document, then module documents, then the
/// command-line overlay.
///
/// Reads never panic. Until a load succeeds, and after a load fails, every
/// read behaves as if the key were absent.
pub struct Configuration {
	options: ConfigOptions,
	location: ProgramLocation,
	conf_location: PathBuf,
	config_name: String,
	tree: ArcSwapOption<PathTree>,
	state: Mutex<LoadState>,
	issues: Mutex<LoadIssues>,
}

impl fmt::Debug for Configuration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Configuration")
			.field("conf_location", &self.conf_location)
			.field("config_name", &self.config_name)
			.field("state", &self.state())
			.finish_non_exhaustive()
	}
}

impl Configuration {
	/// Create an unloaded resolver. Nothing is read until [`Configuration::load`].
	pub fn new(options: ConfigOptions) -> Self {
		let program = match &options.args {
			Some(args) => args.first().cloned(),
			None => std::env::args().next(),
		};
		let location = ProgramLocation::from_program(program.as_deref());
		let conf_location = options
			.config_dir
			.clone()
			.unwrap_or_else(|| location.dir.join(DEFAULT_CONFIG_DIR));
		let config_name = options
			.config_name
			.clone()
			.unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());

		Self {
			options,
			location,
			conf_location,
			config_name,
			tree: ArcSwapOption::empty(),
			state: Mutex::new(LoadState::Unloaded),
			issues: Mutex::new(LoadIssues::default()),
		}
	}

	/// Create a resolver and run the first load cycle.
	pub fn open(options: ConfigOptions) -> Result<Self> {
		let config = Self::new(options);
		config.load()?;
		Ok(config)
	}

	/// Run a full load cycle and publish the resulting tree.
	///
	/// A missing or unparseable base document leaves the resolver `Failed` and
	/// inert. Module failures are logged and leave the module reference as is.
	pub fn load(&self) -> Result<()> {
		let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
		advance(&mut state, LoadState::Unloaded);

		let mut issues = LoadIssues::default();
		let resolved = self.resolve(&mut state, &mut issues);
		*self.issues.lock().unwrap_or_else(PoisonError::into_inner) = issues;

		match resolved {
			Ok(tree) => {
				self.tree.store(Some(Arc::new(tree)));
				advance(&mut state, LoadState::Ready);
				Ok(())
			}
			Err(err) => {
				self.tree.store(None);
				advance(&mut state, LoadState::Failed);
				tracing::error!("Error in parsing or open config file: {}", err);
				Err(err)
			}
		}
	}

	/// Re-read every document and re-apply the overlay.
	pub fn reload(&self) -> Result<()> {
		tracing::info!("Reloading configuration from {}", self.base_path().display());
		self.load()
	}

	fn resolve(&self, state: &mut LoadState, issues: &mut LoadIssues) -> Result<PathTree> {
		let mut tree = if self.options.in_memory {
			PathTree::new()
		} else {
			let tree = parse_document_file(&self.base_path())?;
			tracing::info!("Loaded main settings: {}", self.config_name);
			tree
		};
		advance(state, LoadState::BaseLoaded);

		if !self.options.in_memory {
			issues.failed_modules = resolve_modules(&mut tree, &self.conf_location)
				.into_iter()
				.map(|(name, err)| (name, describe(&err)))
				.collect();
		}
		advance(state, LoadState::ModulesResolved);

		let args = match &self.options.args {
			Some(args) => args.clone(),
			None => std::env::args().collect(),
		};
		let report = overlay::apply(args, &mut tree);
		tracing::debug!(
			"Applied {} overrides and {} default tokens, rejected {}",
			report.assigned.len(),
			report.defaults,
			report.rejected.len()
		);
		issues.rejected_overrides = report
			.rejected
			.into_iter()
			.map(|(name, err)| (name, describe(&err)))
			.collect();
		advance(state, LoadState::Overlaid);

		Ok(tree)
	}

	pub fn state(&self) -> LoadState {
		*self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// What the last load cycle absorbed: failed modules and refused overrides.
	pub fn issues(&self) -> LoadIssues {
		self.issues
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Modules the last load could not resolve, with the reason.
	pub fn failed_modules(&self) -> Vec<(String, String)> {
		self.issues().failed_modules
	}

	pub fn options(&self) -> &ConfigOptions {
		&self.options
	}

	/// Directory the base and module documents are read from.
	pub fn conf_location(&self) -> &Path {
		&self.conf_location
	}

	/// Directory of the running program.
	pub fn location(&self) -> &Path {
		&self.location.dir
	}

	pub fn script_filename(&self) -> &str {
		&self.location.script
	}

	pub fn base_path(&self) -> PathBuf {
		self.conf_location.join(&self.config_name)
	}

	/// The resolved tree, if a load has succeeded.
	pub fn snapshot(&self) -> Option<Arc<PathTree>> {
		self.tree.load_full()
	}

	pub fn exists(&self, path: &str) -> bool {
		self.snapshot().is_some_and(|tree| tree.exists(path))
	}

	/// Read a node, optionally scoped to a resolved module.
	pub fn get(&self, path: &str, default: Option<Node>, module: Option<&str>) -> Result<Node> {
		let Some(tree) = self.snapshot() else {
			return fallback(path, default, not_found(path, module));
		};
		match module {
			None => tree.get(path, default),
			Some(name) => match module_tree(&tree, name) {
				Some(scope) => scope.get(path, default),
				None => fallback(path, default, not_found(path, module)),
			},
		}
	}

	/// Read and coerce a scalar, optionally scoped to a resolved module.
	pub fn get_as<T, F>(
		&self,
		path: &str,
		default: Option<T>,
		coerce: F,
		module: Option<&str>,
	) -> Result<T>
	where
		T: fmt::Debug,
		F: FnOnce(&str) -> std::result::Result<T, FormatError>,
	{
		let Some(tree) = self.snapshot() else {
			return fallback(path, default, not_found(path, module));
		};
		match module {
			None => tree.get_as(path, default, coerce),
			Some(name) => match module_tree(&tree, name) {
				Some(scope) => scope.get_as(path, default, coerce),
				None => fallback(path, default, not_found(path, module)),
			},
		}
	}

	/// Deserialize the node at `path`, optionally scoped to a resolved module.
	pub fn get_section<T>(&self, path: &str, default: Option<T>, module: Option<&str>) -> Result<T>
	where
		T: DeserializeOwned + fmt::Debug,
	{
		let Some(tree) = self.snapshot() else {
			return fallback(path, default, not_found(path, module));
		};
		match module {
			None => tree.get_section(path, default),
			Some(name) => match module_tree(&tree, name) {
				Some(scope) => scope.get_section(path, default),
				None => fallback(path, default, not_found(path, module)),
			},
		}
	}

	/// A resolved module's sub-tree. `None` if absent or still a file name.
	pub fn module(&self, name: &str) -> Option<PathTree> {
		tracing::debug!("Getting module configuration {}", name);
		let tree = self.snapshot()?;
		module_tree(&tree, name).cloned()
	}
}

fn advance(state: &mut LoadState, next: LoadState) {
	tracing::debug!("Configuration {} -> {}", state.as_str(), next.as_str());
	*state = next;
}

fn module_tree<'a>(tree: &'a PathTree, name: &str) -> Option<&'a PathTree> {
	tree.get_key(MODULES_KEY)?.as_tree()?.get_key(name)?.as_tree()
}

fn not_found(path: &str, module: Option<&str>) -> ConfError {
	let path = match module {
		Some(name) => format!("{MODULES_KEY}.{name}.{path}"),
		None => path.to_string(),
	};
	ConfError::NotFound { path }
}

/// Replace every `modules.<name>` file name with the parsed document.
///
/// Returns the modules that failed to load; their references stay untouched.
pub fn resolve_modules(tree: &mut PathTree, dir: &Path) -> Vec<(String, ConfError)> {
	let mut failures = Vec::new();
	let modules = match tree.get_key_mut(MODULES_KEY) {
		Some(Node::Tree(modules)) => modules,
		Some(other) => {
			tracing::warn!(
				"Ignoring '{}': expected a tree, found a {}",
				MODULES_KEY,
				other.kind()
			);
			return failures;
		}
		None => return failures,
	};

	let pending: Vec<(String, String)> = modules
		.iter()
		.filter_map(|(name, node)| node.as_str().map(|file| (name.to_string(), file.to_string())))
		.collect();

	for (name, file) in pending {
		match parse_document_file(&dir.join(&file)) {
			Ok(document) => {
				modules.insert(name.clone(), Node::Tree(document));
				tracing::info!("Loaded module settings: {}", name);
			}
			Err(err) => {
				tracing::error!(
					"Couldn't load module {} configuration from {}: {}",
					name,
					file,
					err
				);
				failures.push((name, err));
			}
		}
	}

	failures
}
