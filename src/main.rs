use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use layerconf::config::types::MODULES_KEY;
use layerconf::config::{ConfigOptions, Configuration};
use layerconf::{Node, coerce};

#[derive(Parser)]
#[command(name = "layerconf")]
#[command(
	author,
	version,
	about = "Inspect layered configuration built from a base document, modules and command-line overrides"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Directory holding the base and module documents
	#[arg(long, global = true, value_name = "DIR")]
	conf_dir: Option<PathBuf>,

	/// File name of the base document
	#[arg(long, global = true, value_name = "FILE")]
	name: Option<String>,

	/// Start from an empty tree instead of reading any document
	#[arg(long, global = true)]
	in_memory: bool,

	/// Enable verbose logging (sets log level to DEBUG)
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the resolved tree as JSON
	Show {
		/// Print only this module's sub-tree
		#[arg(long)]
		module: Option<String>,

		#[command(flatten)]
		overlay: OverlayArgs,
	},
	/// Print the value at a dotted path
	Get {
		/// Dotted path, e.g. server.port
		path: String,

		/// Resolve the path inside this module
		#[arg(long)]
		module: Option<String>,

		/// Value to print when the path is missing or has the wrong format
		#[arg(long)]
		default: Option<String>,

		/// Coerce the value before printing
		#[arg(long = "as", value_enum, default_value_t = ValueType::Raw)]
		as_type: ValueType,

		#[command(flatten)]
		overlay: OverlayArgs,
	},
	/// Exit successfully if the dotted path is bound
	Exists {
		/// Dotted path, e.g. modules.mal
		path: String,

		#[command(flatten)]
		overlay: OverlayArgs,
	},
	/// List modules and whether each one was resolved
	Modules {
		#[command(flatten)]
		overlay: OverlayArgs,
	},
}

#[derive(Args)]
struct OverlayArgs {
	/// Overrides applied on top of the documents, e.g. -- --server.port=9000
	#[arg(last = true, value_name = "OVERRIDE")]
	overrides: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
	Raw,
	#[value(name = "string")]
	Text,
	Int,
	Float,
	Bool,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// A set RUST_LOG replaces the level chosen by --verbose.
	let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.try_init();

	let base = ConfigOptions {
		in_memory: cli.in_memory,
		config_dir: cli.conf_dir,
		config_name: cli.name,
		args: None,
	};

	match cli.command {
		Commands::Show { module, overlay } => {
			let config = open(base, overlay)?;
			handle_show(&config, module.as_deref())
		}
		Commands::Get {
			path,
			module,
			default,
			as_type,
			overlay,
		} => {
			let config = open(base, overlay)?;
			handle_get(&config, &path, module.as_deref(), default, as_type)
		}
		Commands::Exists { path, overlay } => {
			let config = open(base, overlay)?;
			handle_exists(&config, &path)
		}
		Commands::Modules { overlay } => {
			let config = open(base, overlay)?;
			handle_modules(&config)
		}
	}
}

fn open(options: ConfigOptions, overlay: OverlayArgs) -> Result<Configuration> {
	let program = std::env::args()
		.next()
		.unwrap_or_else(|| "layerconf".to_string());
	let options = options.args(std::iter::once(program).chain(overlay.overrides));
	let config = Configuration::new(options);
	config
		.load()
		.with_context(|| format!("Failed to load {}", config.base_path().display()))?;
	Ok(config)
}

fn handle_show(config: &Configuration, module: Option<&str>) -> Result<ExitCode> {
	let json = match module {
		Some(name) => config
			.module(name)
			.ok_or_else(|| anyhow::anyhow!("Module not resolved: {}", name))?
			.to_json(),
		None => config
			.snapshot()
			.map(|tree| tree.to_json())
			.unwrap_or_default(),
	};

	println!("{}", serde_json::to_string_pretty(&json)?);
	Ok(ExitCode::SUCCESS)
}

fn handle_get(
	config: &Configuration,
	path: &str,
	module: Option<&str>,
	default: Option<String>,
	as_type: ValueType,
) -> Result<ExitCode> {
	let rendered = match as_type {
		ValueType::Raw => render(&config.get(path, default.map(Node::String), module)?),
		ValueType::Text => config.get_as(path, default, coerce::string, module)?,
		ValueType::Int => {
			let default = default.map(|d| coerce::parse::<i64>(&d)).transpose()?;
			config
				.get_as(path, default, coerce::parse::<i64>, module)?
				.to_string()
		}
		ValueType::Float => {
			let default = default.map(|d| coerce::parse::<f64>(&d)).transpose()?;
			config
				.get_as(path, default, coerce::parse::<f64>, module)?
				.to_string()
		}
		ValueType::Bool => {
			let default = default.map(|d| coerce::boolean(&d)).transpose()?;
			config
				.get_as(path, default, coerce::boolean, module)?
				.to_string()
		}
	};

	println!("{}", rendered);
	Ok(ExitCode::SUCCESS)
}

fn handle_exists(config: &Configuration, path: &str) -> Result<ExitCode> {
	if config.exists(path) {
		println!("true");
		Ok(ExitCode::SUCCESS)
	} else {
		println!("false");
		Ok(ExitCode::FAILURE)
	}
}

fn handle_modules(config: &Configuration) -> Result<ExitCode> {
	let modules = config
		.snapshot()
		.and_then(|tree| tree.get_key(MODULES_KEY).and_then(Node::as_tree).cloned());

	let Some(modules) = modules else {
		println!("No modules configured.");
		return Ok(ExitCode::SUCCESS);
	};

	let failures = config.failed_modules();
	for (name, node) in modules.iter() {
		match node {
			Node::Tree(tree) => println!("{}: resolved ({} keys)", name, tree.len()),
			Node::String(file) => {
				match failures.iter().find(|(failed, _)| failed == name) {
					Some((_, reason)) => println!("{}: unresolved ({}): {}", name, file, reason),
					None => println!("{}: unresolved ({})", name, file),
				}
			}
			other => println!("{}: invalid ({})", name, other.kind()),
		}
	}

	Ok(ExitCode::SUCCESS)
}

/// Strings print bare; everything else prints as JSON.
fn render(node: &Node) -> String {
	match node {
		Node::String(s) => s.clone(),
		other => other.to_json().to_string(),
	}
}
