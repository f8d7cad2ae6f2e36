use crate::tree::PathTree;
use serde::Serialize;
use std::borrow::Cow;

/// A value bound to a key in a [`PathTree`].
///
/// `Tree` is the only container kind. Everything else is a leaf, lists
/// included: the overlay can replace a list but never descend into one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
	Null,
	Bool(bool),
	Number(serde_json::Number),
	String(String),
	List(Vec<Node>),
	Tree(PathTree),
}

impl Node {
	/// Short kind name used in conflict diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Node::Null => "null",
			Node::Bool(_) => "bool",
			Node::Number(_) => "number",
			Node::String(_) => "string",
			Node::List(_) => "list",
			Node::Tree(_) => "tree",
		}
	}

	pub fn is_tree(&self) -> bool {
		matches!(self, Node::Tree(_))
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Node::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_tree(&self) -> Option<&PathTree> {
		match self {
			Node::Tree(tree) => Some(tree),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Node]> {
		match self {
			Node::List(items) => Some(items),
			_ => None,
		}
	}

	/// Textual form of a scalar, fed to coercion functions on read.
	///
	/// Returns `None` for null, lists and trees.
	pub fn as_text(&self) -> Option<Cow<'_, str>> {
		match self {
			Node::String(s) => Some(Cow::Borrowed(s)),
			Node::Bool(b) => Some(Cow::Owned(b.to_string())),
			Node::Number(n) => Some(Cow::Owned(number_text(n))),
			Node::Null | Node::List(_) | Node::Tree(_) => None,
		}
	}

	/// Render the node back into a JSON value.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Node::Null => serde_json::Value::Null,
			Node::Bool(b) => serde_json::Value::Bool(*b),
			Node::Number(n) => serde_json::Value::Number(n.clone()),
			Node::String(s) => serde_json::Value::String(s.clone()),
			Node::List(items) => serde_json::Value::Array(items.iter().map(Node::to_json).collect()),
			Node::Tree(tree) => tree.to_json(),
		}
	}
}

impl From<serde_json::Value> for Node {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Node::Null,
			serde_json::Value::Bool(b) => Node::Bool(b),
			serde_json::Value::Number(n) => Node::Number(n),
			serde_json::Value::String(s) => Node::String(s),
			serde_json::Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
			serde_json::Value::Object(map) => Node::Tree(PathTree::from_map(map)),
		}
	}
}

impl From<toml::Value> for Node {
	fn from(value: toml::Value) -> Self {
		match value {
			toml::Value::String(s) => Node::String(s),
			toml::Value::Integer(n) => Node::Number(n.into()),
			toml::Value::Float(f) => match serde_json::Number::from_f64(f) {
				Some(n) => Node::Number(n),
				None => Node::String(f.to_string()),
			},
			toml::Value::Boolean(b) => Node::Bool(b),
			// Dates and times are kept as their RFC 3339 text so they stay leaves.
			toml::Value::Datetime(dt) => Node::String(dt.to_string()),
			toml::Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
			toml::Value::Table(table) => Node::Tree(PathTree::from_toml(table)),
		}
	}
}

impl From<PathTree> for Node {
	fn from(tree: PathTree) -> Self {
		Node::Tree(tree)
	}
}

impl From<String> for Node {
	fn from(s: String) -> Self {
		Node::String(s)
	}
}

impl From<&str> for Node {
	fn from(s: &str) -> Self {
		Node::String(s.to_string())
	}
}

impl From<bool> for Node {
	fn from(b: bool) -> Self {
		Node::Bool(b)
	}
}

impl From<i64> for Node {
	fn from(n: i64) -> Self {
		Node::Number(n.into())
	}
}

/// An integral float such as `1e3` or `8080.0` renders without its fraction.
fn number_text(n: &serde_json::Number) -> String {
	if n.is_f64()
		&& let Some(f) = n.as_f64()
		&& f.fract() == 0.0
		&& f.abs() < i64::MAX as f64
	{
		return (f as i64).to_string();
	}
	n.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_nested_objects_become_trees() {
		let node = Node::from(json!({"a": {"b": 1}, "list": [1, "x", {"c": true}]}));
		let tree = node.as_tree().unwrap();

		assert!(tree.get_key("a").unwrap().is_tree());
		let list = tree.get_key("list").unwrap().as_list().unwrap();
		assert_eq!(list.len(), 3);
		assert!(list[2].is_tree());
	}

	#[test]
	fn test_as_text_for_scalars() {
		assert_eq!(Node::from("abc").as_text().unwrap(), "abc");
		assert_eq!(Node::from(42_i64).as_text().unwrap(), "42");
		assert_eq!(Node::from(false).as_text().unwrap(), "false");
		assert_eq!(Node::from(json!(1.5)).as_text().unwrap(), "1.5");
		assert!(Node::Null.as_text().is_none());
		assert!(Node::List(vec![]).as_text().is_none());
		assert!(Node::Tree(PathTree::new()).as_text().is_none());
	}

	#[test]
	fn test_as_text_drops_fraction_of_integral_floats() {
		let exponent: serde_json::Value = serde_json::from_str("1e3").unwrap();
		let trailing: serde_json::Value = serde_json::from_str("8080.0").unwrap();

		assert_eq!(Node::from(exponent).as_text().unwrap(), "1000");
		assert_eq!(Node::from(trailing).as_text().unwrap(), "8080");
		assert_eq!(Node::from(json!(-2.0)).as_text().unwrap(), "-2");
		assert_eq!(Node::from(json!(0.25)).as_text().unwrap(), "0.25");
	}

	#[test]
	fn test_toml_values_convert_to_leaves() {
		let table: toml::Table = toml::from_str(
			"when = 1979-05-27T07:32:00Z\nday = 1979-05-27\nratio = 0.5\nports = [1, 2]\n[sub]\nok = true\n",
		)
		.unwrap();
		let node = Node::from(toml::Value::Table(table));
		let tree = node.as_tree().unwrap();

		assert_eq!(tree.get_key("when").unwrap(), &Node::from("1979-05-27T07:32:00Z"));
		assert_eq!(tree.get_key("day").unwrap(), &Node::from("1979-05-27"));
		assert_eq!(tree.get_key("ratio").unwrap(), &Node::from(json!(0.5)));
		assert_eq!(tree.get_key("ports").unwrap().as_list().unwrap().len(), 2);
		assert!(tree.get_key("sub").unwrap().is_tree());
	}

	#[test]
	fn test_serializes_untagged() {
		let value = json!({"a": {"b": [1, null, "s"]}, "c": false});
		let node = Node::from(value.clone());

		assert_eq!(serde_json::to_value(&node).unwrap(), value);
		assert_eq!(node.to_json(), value);
	}
}
