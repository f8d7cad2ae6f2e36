//! Coercion functions for typed reads.
//!
//! Each function takes the textual form of a leaf and either produces a typed
//! value or a [`FormatError`]. Pass them to `get_as`, or write your own with the
//! same signature.

use crate::error::FormatError;
use std::fmt::Display;
use std::str::FromStr;

/// Return the text unchanged.
pub fn string(text: &str) -> Result<String, FormatError> {
	Ok(text.to_string())
}

/// Parse the text with [`FromStr`], e.g. `coerce::parse::<u16>`.
pub fn parse<T>(text: &str) -> Result<T, FormatError>
where
	T: FromStr,
	T::Err: Display,
{
	text.trim().parse::<T>().map_err(|e| {
		FormatError::new(format!(
			"cannot read {:?} as {}: {}",
			text,
			std::any::type_name::<T>(),
			e
		))
	})
}

/// Lenient boolean: `1/0`, `true/false`, `yes/no`, `on/off`, any case.
pub fn boolean(text: &str) -> Result<bool, FormatError> {
	match text.trim().to_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(FormatError::new(format!("cannot read {:?} as bool", text))),
	}
}

/// Comma-separated list with surrounding whitespace and empty items dropped.
pub fn list(text: &str) -> Result<Vec<String>, FormatError> {
	Ok(text
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_string)
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_numbers() {
		assert_eq!(parse::<u16>("8080").unwrap(), 8080);
		assert_eq!(parse::<i64>(" -3 ").unwrap(), -3);
		assert_eq!(parse::<f64>("1.5").unwrap(), 1.5);

		let err = parse::<u8>("300").unwrap_err();
		assert!(err.message().contains("u8"));
		assert!(parse::<u32>("abc").is_err());
	}

	#[test]
	fn test_boolean_spellings() {
		for text in ["1", "true", "TRUE", "yes", "On"] {
			assert!(boolean(text).unwrap(), "{text}");
		}
		for text in ["0", "false", "No", "off"] {
			assert!(!boolean(text).unwrap(), "{text}");
		}
		assert!(boolean("maybe").is_err());
		assert!(boolean("").is_err());
	}

	#[test]
	fn test_list_splits_on_commas() {
		assert_eq!(list("a, b,,c ").unwrap(), vec!["a", "b", "c"]);
		assert!(list("").unwrap().is_empty());
	}
}
