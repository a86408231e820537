/*!
# Codepoint classification for XML names and whitespace

Static range tables for the `NameStartChar` and `NameChar` productions of
XML 1.0 § 2.3, plus the small ASCII predicates the lexer and the node API
need. The tables are sorted and disjoint, so classification is a binary
search over inclusive ranges.
*/
use std::cmp::Ordering;
use std::fmt;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

impl CharSelector for &'_ [char] {
	fn select(&self, c: char) -> bool {
		self.contains(&c)
	}
}

/// Selects all chars from a range (including both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange(pub char, pub char);

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		(self.0 <= c) && (c <= self.1)
	}
}

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

/// Selects all chars from any of the contained ranges.
///
/// The ranges must be sorted and non-overlapping; `select` relies on that
/// to binary-search instead of scanning.
#[derive(Clone, Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		self.0
			.binary_search_by(|r| {
				if r.1 < c {
					Ordering::Less
				} else if r.0 > c {
					Ordering::Greater
				} else {
					Ordering::Equal
				}
			})
			.is_ok()
	}
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

const VALID_XML_NAME_START_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

const VALID_XML_NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange('-', '-'),
	CodepointRange('.', '.'),
	CodepointRange('0', '9'),
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{300}', '\u{36f}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

/// Valid first characters for an XML Name (XML 1.0 § 2.3 \[4\])
pub static CLASS_XML_NAMESTART: CodepointRanges = CodepointRanges(VALID_XML_NAME_START_RANGES);

/// Valid non-first characters for an XML Name (XML 1.0 § 2.3 \[4a\])
pub static CLASS_XML_NAME: CodepointRanges = CodepointRanges(VALID_XML_NAME_RANGES);

/// Return true if `c` may start an XML Name.
pub fn is_name_start_char(c: char) -> bool {
	CLASS_XML_NAMESTART.select(c)
}

/// Return true if `c` may continue an XML Name.
pub fn is_name_char(c: char) -> bool {
	CLASS_XML_NAME.select(c)
}

/// Return true if `c` is XML whitespace (XML 1.0 § 2.3 \[3\]).
///
/// Note that this is much stricter than Unicode whitespace: only space,
/// tab, line feed and carriage return qualify.
pub fn is_space(c: char) -> bool {
	c == ' ' || c == '\t' || c == '\n' || c == '\r'
}

/// Return true if `c` is an ASCII decimal digit.
pub fn is_digit(c: char) -> bool {
	c >= '0' && c <= '9'
}

/**
Error condition from validating an XML string.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum NameError {
	/// A Name was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for NameError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("Name must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04x} is not allowed", *c as u32),
		}
	}
}

impl std::error::Error for NameError {}

/**
Check whether a str is a valid XML 1.0 Name

# Example

```rust
use minixml::selectors::{validate_name, NameError};

assert!(validate_name("foobar").is_ok());
assert!(validate_name("foo-bar.baz").is_ok());
assert!(matches!(validate_name("foo bar"), Err(NameError::InvalidChar(' '))));
assert!(matches!(validate_name(""), Err(NameError::EmptyName)));
```
*/
pub fn validate_name(s: &str) -> Result<(), NameError> {
	let mut chars = s.chars();
	match chars.next() {
		// must have at least one char
		None => return Err(NameError::EmptyName),
		Some(c) => {
			if !is_name_start_char(c) {
				return Err(NameError::InvalidChar(c));
			}
		}
	}
	for ch in chars {
		if !is_name_char(ch) {
			return Err(NameError::InvalidChar(ch));
		}
	}
	Ok(())
}

/**
Check whether a str is a strict ASCII token

This is a deliberately narrower predicate than [`validate_name`], for
contexts which need to stay compatible with common identifier syntax: the
first character must be an ASCII letter or underscore, the remaining
characters may be ASCII letters, digits, underscores or hyphens, and the
token must not end in a hyphen.

# Example

```rust
use minixml::selectors::is_token;

assert!(is_token("foo_bar-2"));
assert!(!is_token("2fast"));
assert!(!is_token("trailing-"));
assert!(!is_token(""));
```
*/
pub fn is_token(s: &str) -> bool {
	let mut chars = s.chars();
	match chars.next() {
		None => return false,
		Some(c) => {
			if !(c.is_ascii_alphabetic() || c == '_') {
				return false;
			}
		}
	}
	for c in chars {
		if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
			return false;
		}
	}
	!s.ends_with('-')
}
