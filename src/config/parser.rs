use crate::error::{ConfError, Result};
use crate::tree::PathTree;
use std::path::Path;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
	Json,
	Toml,
}

impl DocumentFormat {
	/// `.toml` files are TOML, everything else is JSON.
	pub fn from_path(path: &Path) -> Self {
		match path.extension().and_then(|e| e.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
			_ => DocumentFormat::Json,
		}
	}
}

/// Read and parse a configuration document from the given path.
pub fn parse_document_file(path: &Path) -> Result<PathTree> {
	if !path.exists() {
		return Err(ConfError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|source| ConfError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_document_str(&content, path)
}

/// Parse a document from a string; `path` picks the format and labels errors.
pub fn parse_document_str(content: &str, path: &Path) -> Result<PathTree> {
	match DocumentFormat::from_path(path) {
		DocumentFormat::Json => {
			let value: serde_json::Value =
				serde_json::from_str(content).map_err(|source| ConfError::ConfigParseError {
					path: path.to_path_buf(),
					source,
				})?;
			PathTree::from_json(value).ok_or_else(|| ConfError::NotAnObject {
				path: path.to_path_buf(),
			})
		}
		// A TOML document root is always a table.
		DocumentFormat::Toml => {
			let table: toml::Table =
				toml::from_str(content).map_err(|source| ConfError::TomlParseError {
					path: path.to_path_buf(),
					source,
				})?;
			Ok(PathTree::from_toml(table))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coerce;
	use crate::overlay;
	use crate::tree::Node;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_object() {
		let path = PathBuf::from("main.json");
		let tree = parse_document_str("{}", &path).unwrap();

		assert!(tree.is_empty());
	}

	#[test]
	fn test_parse_nested_json() {
		let content = r#"
{
	"logging": {"level": "info"},
	"modules": {"mal": "myanimelist.json"},
	"threads": 4
}
"#;
		let path = PathBuf::from("main.json");
		let tree = parse_document_str(content, &path).unwrap();

		assert_eq!(tree.get("logging.level", None).unwrap(), Node::from("info"));
		assert_eq!(
			tree.get("modules.mal", None).unwrap(),
			Node::from("myanimelist.json")
		);
		assert_eq!(tree.get("threads", None).unwrap(), Node::from(4_i64));
	}

	#[test]
	fn test_parse_toml_document() {
		let content = r#"
name = "app"

[server]
port = 8080
"#;
		let path = PathBuf::from("main.toml");
		let tree = parse_document_str(content, &path).unwrap();

		assert_eq!(tree.get("name", None).unwrap(), Node::from("app"));
		assert_eq!(tree.get("server.port", None).unwrap(), Node::from(8080_i64));
	}

	#[test]
	fn test_toml_datetime_is_a_string_leaf() {
		let path = PathBuf::from("main.toml");
		let tree = parse_document_str("created = 1979-05-27T07:32:00Z\n", &path).unwrap();

		assert_eq!(
			tree.get_as("created", None, coerce::string).unwrap(),
			"1979-05-27T07:32:00Z"
		);
	}

	#[test]
	fn test_toml_datetime_can_be_overridden() {
		let path = PathBuf::from("main.toml");
		let mut tree = parse_document_str("created = 1979-05-27T07:32:00Z\n", &path).unwrap();

		let report = overlay::apply(["prog", "--created=2020-01-01"], &mut tree);

		assert!(report.rejected.is_empty());
		assert_eq!(report.assigned, vec!["created".to_string()]);
		assert_eq!(tree.get("created", None).unwrap(), Node::from("2020-01-01"));
	}

	#[test]
	fn test_invalid_json_is_parse_error() {
		let path = PathBuf::from("main.json");
		let result = parse_document_str("{ not json", &path);

		match result.unwrap_err() {
			ConfError::ConfigParseError { path, .. } => assert_eq!(path, PathBuf::from("main.json")),
			other => panic!("Expected ConfigParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_invalid_toml_is_parse_error() {
		let path = PathBuf::from("main.toml");
		let result = parse_document_str("invalid toml [[[", &path);

		assert!(matches!(result, Err(ConfError::TomlParseError { .. })));
	}

	#[test]
	fn test_non_object_root_is_rejected() {
		let path = PathBuf::from("main.json");
		let result = parse_document_str("[1, 2, 3]", &path);

		assert!(matches!(result, Err(ConfError::NotAnObject { .. })));
	}

	#[test]
	fn test_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.json");

		assert!(matches!(
			parse_document_file(&path),
			Err(ConfError::ConfigNotFound { .. })
		));
	}

	#[test]
	fn test_format_from_path() {
		assert_eq!(
			DocumentFormat::from_path(Path::new("a/b.TOML")),
			DocumentFormat::Toml
		);
		assert_eq!(
			DocumentFormat::from_path(Path::new("a/b.json")),
			DocumentFormat::Json
		);
		assert_eq!(
			DocumentFormat::from_path(Path::new("noext")),
			DocumentFormat::Json
		);
	}
}
