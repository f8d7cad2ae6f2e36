/// A single command-line token after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'a> {
	/// Bare token with neither `-` nor `=`, collected into the default list.
	Default(&'a str),

	/// `-*name=value`, with leading hyphens stripped and split on the first `=`.
	Assignment { name: &'a str, value: &'a str },

	/// Contains `-` or `=` but has no `=` to split on.
	Malformed(&'a str),
}

impl<'a> Argument<'a> {
	/// Classify a raw token. Surrounding whitespace is ignored.
	pub fn classify(raw: &'a str) -> Self {
		let token = raw.trim();
		if !token.contains(['=', '-']) {
			return Argument::Default(token);
		}

		match token.trim_start_matches('-').split_once('=') {
			Some((name, value)) => Argument::Assignment { name, value },
			None => Argument::Malformed(token),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bare_tokens_are_defaults() {
		assert_eq!(Argument::classify("foo"), Argument::Default("foo"));
		assert_eq!(Argument::classify("  bar \n"), Argument::Default("bar"));
		assert_eq!(Argument::classify("a.b"), Argument::Default("a.b"));
	}

	#[test]
	fn test_assignments_strip_leading_hyphens() {
		assert_eq!(
			Argument::classify("--a.b.c=5"),
			Argument::Assignment {
				name: "a.b.c",
				value: "5"
			}
		);
		assert_eq!(
			Argument::classify("-x=1"),
			Argument::Assignment {
				name: "x",
				value: "1"
			}
		);
		assert_eq!(
			Argument::classify("key=value"),
			Argument::Assignment {
				name: "key",
				value: "value"
			}
		);
	}

	#[test]
	fn test_split_on_first_equals_only() {
		assert_eq!(
			Argument::classify("--query=a=b"),
			Argument::Assignment {
				name: "query",
				value: "a=b"
			}
		);
		assert_eq!(
			Argument::classify("--empty="),
			Argument::Assignment {
				name: "empty",
				value: ""
			}
		);
	}

	#[test]
	fn test_hyphen_inside_value_is_kept() {
		assert_eq!(
			Argument::classify("--range=1-5"),
			Argument::Assignment {
				name: "range",
				value: "1-5"
			}
		);
	}

	#[test]
	fn test_no_equals_is_malformed() {
		assert_eq!(Argument::classify("--novalue"), Argument::Malformed("--novalue"));
		assert_eq!(Argument::classify("foo-bar"), Argument::Malformed("foo-bar"));
		assert_eq!(Argument::classify("-"), Argument::Malformed("-"));
	}
}
