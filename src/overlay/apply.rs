use crate::error::ConfError;
use crate::overlay::argument::Argument;
use crate::tree::{Node, PathTree};

/// Reserved root key holding bare command-line tokens.
pub const DEFAULT_KEY: &str = "default";

/// What happened to each token during [`apply`].
#[derive(Debug, Default)]
pub struct OverlayReport {
	/// Dotted paths that were written, in argument order.
	pub assigned: Vec<String>,

	/// Number of bare tokens appended to the default list.
	pub defaults: usize,

	/// Tokens dropped because they could not be split into name and value.
	pub dropped: Vec<String>,

	/// Assignments the tree refused, with the reason.
	pub rejected: Vec<(String, ConfError)>,
}

/// Overlay command-line arguments onto `tree`.
///
/// The first argument is the program name and is skipped. The root `default`
/// list is reset once before any token is processed. A rejected assignment
/// is logged and skipped; it never stops the remaining arguments.
pub fn apply<I, S>(args: I, tree: &mut PathTree) -> OverlayReport
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut report = OverlayReport::default();
	tree.insert(DEFAULT_KEY, Node::List(Vec::new()));

	let args: Vec<S> = args.into_iter().skip(1).collect();
	tracing::info!(
		"Passed commandline arguments: {:?}",
		args.iter().map(|s| s.as_ref()).collect::<Vec<&str>>()
	);

	for raw in &args {
		match Argument::classify(raw.as_ref()) {
			Argument::Default(token) => {
				if push_default(tree, token) {
					report.defaults += 1;
				} else {
					tracing::error!(
						"Couldn't append '{}': '{}' is no longer a list",
						token,
						DEFAULT_KEY
					);
					report.dropped.push(token.to_string());
				}
			}
			Argument::Assignment { name, value } => {
				tracing::debug!("Parse param '{}' with value '{}'", name, value);
				match assign(tree, name, value) {
					Ok(()) => report.assigned.push(name.to_string()),
					Err(err) => {
						tracing::error!("Couldn't recognise parameter '{}': {}", name, err);
						report.rejected.push((name.to_string(), err));
					}
				}
			}
			Argument::Malformed(token) => {
				tracing::debug!("Dropping malformed argument '{}'", token);
				report.dropped.push(token.to_string());
			}
		}
	}

	report
}

fn push_default(tree: &mut PathTree, token: &str) -> bool {
	match tree.get_key_mut(DEFAULT_KEY) {
		Some(Node::List(items)) => {
			items.push(Node::from(token));
			true
		}
		_ => false,
	}
}

fn assign(tree: &mut PathTree, name: &str, value: &str) -> crate::Result<()> {
	let segments: Vec<&str> = name.split('.').collect();
	if segments.len() == 1 {
		tracing::debug!("Replacing param '{}' to value '{}'", name, value);
		tree.assign(name, Node::from(value))
	} else {
		tree.set(&segments, Node::from(value))
	}
}
