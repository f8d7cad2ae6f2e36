use crate::error::{ConfError, FormatError, Result};
use crate::tree::Node;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

/// Hierarchical key-value tree addressed by dotted paths.
///
/// The one structural rule: a key never changes kind through [`PathTree::set`]
/// or [`PathTree::assign`]. A tree stays a tree and a leaf stays a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathTree {
	entries: BTreeMap<String, Node>,
}

impl PathTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a tree from a JSON value. Returns `None` unless the value is an object.
	pub fn from_json(value: serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::Object(map) => Some(Self::from_map(map)),
			_ => None,
		}
	}

	pub(crate) fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
		Self {
			entries: map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
		}
	}

	pub(crate) fn from_toml(table: toml::Table) -> Self {
		Self {
			entries: table.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.entries
				.iter()
				.map(|(k, v)| (k.clone(), v.to_json()))
				.collect(),
		)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Direct child lookup, no path splitting.
	pub fn get_key(&self, key: &str) -> Option<&Node> {
		self.entries.get(key)
	}

	pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Node> {
		self.entries.get_mut(key)
	}

	/// Bind a direct child without the kind guard. Returns the previous value.
	///
	/// Module resolution uses this to swap a filename reference for its tree.
	pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
		self.entries.insert(key.into(), value)
	}

	/// Bind a direct child, rejecting a change between tree and leaf.
	pub fn assign(&mut self, key: &str, value: Node) -> Result<()> {
		if key.is_empty() {
			return Err(ConfError::InvalidPath {
				path: key.to_string(),
			});
		}
		self.bind(key, value, key)
	}

	/// Walk `segments`, creating intermediate trees, and bind `value` at the end.
	///
	/// Fails without touching the tree when an intermediate segment is bound to
	/// a leaf or when the final segment would change kind.
	pub fn set(&mut self, segments: &[&str], value: Node) -> Result<()> {
		let full_path = segments.join(".");
		let Some((last, parents)) = segments.split_last() else {
			return Err(ConfError::InvalidPath { path: full_path });
		};
		if segments.iter().any(|s| s.is_empty()) {
			return Err(ConfError::InvalidPath { path: full_path });
		}

		// Trees are only created below the deepest existing node, so a conflict
		// never leaves a half-built branch behind.
		let mut current = self;
		for (depth, segment) in parents.iter().enumerate() {
			let entry = current
				.entries
				.entry((*segment).to_string())
				.or_insert_with(|| Node::Tree(PathTree::new()));
			match entry {
				Node::Tree(tree) => current = tree,
				other => {
					return Err(ConfError::StructuralConflict {
						path: segments[..=depth].join("."),
						existing: other.kind(),
						attempted: "tree",
					});
				}
			}
		}
		current.bind(last, value, &full_path)
	}

	/// Split a dotted path and delegate to [`PathTree::set`].
	pub fn set_path(&mut self, path: &str, value: Node) -> Result<()> {
		let segments: Vec<&str> = path.split('.').collect();
		self.set(&segments, value)
	}

	/// Resolve a dotted path to its node.
	pub fn lookup(&self, path: &str) -> Result<&Node> {
		let not_found = || ConfError::NotFound {
			path: path.to_string(),
		};

		let mut current = self;
		let mut segments = path.split('.').peekable();
		while let Some(segment) = segments.next() {
			let node = current.entries.get(segment).ok_or_else(not_found)?;
			if segments.peek().is_none() {
				return Ok(node);
			}
			match node {
				Node::Tree(tree) => current = tree,
				_ => return Err(not_found()),
			}
		}
		Err(not_found())
	}

	/// Whether every segment of the dotted path is bound.
	pub fn exists(&self, path: &str) -> bool {
		self.lookup(path).is_ok()
	}

	/// Read a node by dotted path, falling back to `default` when it is absent.
	pub fn get(&self, path: &str, default: Option<Node>) -> Result<Node> {
		match self.lookup(path) {
			Ok(node) => Ok(node.clone()),
			Err(err) => fallback(path, default, err),
		}
	}

	/// Read a scalar by dotted path and coerce its text with `coerce`.
	///
	/// A missing key and a failed coercion both fall back to `default`; without
	/// one they surface as `NotFound` and `Format` respectively.
	pub fn get_as<T, F>(&self, path: &str, default: Option<T>, coerce: F) -> Result<T>
	where
		T: fmt::Debug,
		F: FnOnce(&str) -> std::result::Result<T, FormatError>,
	{
		let coerced = self.lookup(path).and_then(|node| {
			let text = node.as_text().ok_or_else(|| ConfError::Format {
				path: path.to_string(),
				source: FormatError::new(format!("expected a scalar, found a {}", node.kind())),
			})?;
			coerce(&*text).map_err(|source| ConfError::Format {
				path: path.to_string(),
				source,
			})
		});

		match coerced {
			Ok(value) => Ok(value),
			Err(err) => fallback(path, default, err),
		}
	}

	/// Bind the node at `path` to a deserializable type.
	///
	/// Follows the same fallback rules as [`PathTree::get_as`]; a node that does
	/// not match the shape of `T` is a `Format` failure.
	pub fn get_section<T>(&self, path: &str, default: Option<T>) -> Result<T>
	where
		T: DeserializeOwned + fmt::Debug,
	{
		let bound = self.lookup(path).and_then(|node| {
			serde_json::from_value(node.to_json()).map_err(|err| ConfError::Format {
				path: path.to_string(),
				source: FormatError::new(err.to_string()),
			})
		});

		match bound {
			Ok(value) => Ok(value),
			Err(err) => fallback(path, default, err),
		}
	}

	fn bind(&mut self, key: &str, value: Node, full_path: &str) -> Result<()> {
		if let Some(existing) = self.entries.get(key)
			&& existing.is_tree() != value.is_tree()
		{
			return Err(ConfError::StructuralConflict {
				path: full_path.to_string(),
				existing: existing.kind(),
				attempted: value.kind(),
			});
		}
		self.entries.insert(key.to_string(), value);
		Ok(())
	}
}

/// Shared default-or-fail policy for reads.
pub(crate) fn fallback<T: fmt::Debug>(path: &str, default: Option<T>, err: ConfError) -> Result<T> {
	match default {
		Some(value) => {
			match &err {
				ConfError::Format { .. } => {
					tracing::warn!("Key {} has a wrong format, using default {:?}", path, value)
				}
				_ => tracing::warn!("Key {} not present, using default {:?}", path, value),
			}
			Ok(value)
		}
		None => {
			tracing::error!("{}", err);
			Err(err)
		}
	}
}
