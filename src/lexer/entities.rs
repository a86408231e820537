/*!
# Entity and character reference expansion

Quoted attribute values and text runs may use the five predefined entities
(`&amp;` `&lt;` `&gt;` `&quot;` `&apos;`) as well as decimal (`&#110;`) and
hexadecimal (`&#x6E;` / `&#X6E;`) character references. No other entities
exist; in particular there is no DTD to declare new ones, so any other name
is an error.

A lone `&` with no `;` anywhere later in the string ends expansion: the
remainder is copied through verbatim. This matches the long-standing
behavior of the format and is relied on by documents in the wild.
*/
use std::result::Result as StdResult;

use crate::error::ParseError;

fn resolve(name: &str) -> StdResult<char, ParseError> {
	match name {
		"amp" => return Ok('&'),
		"quot" => return Ok('"'),
		"lt" => return Ok('<'),
		"gt" => return Ok('>'),
		"apos" => return Ok('\''),
		"" => {
			return Err(ParseError::InvalidEntity(
				"the name of an entity cannot be empty (\"&;\" is not valid XML).".to_string(),
			))
		}
		_ => (),
	}
	if let Some(body) = name.strip_prefix('#') {
		if body.is_empty() {
			return Err(ParseError::InvalidEntity(
				"a numeric entity must have a number (\"&#;\" is not valid XML).".to_string(),
			));
		}
		let invalid_number = || {
			ParseError::InvalidNumber(format!(
				"the number found in numeric entity, \"{}\", is not considered valid.",
				name
			))
		};
		let (digits, base) = match body.strip_prefix(|c| c == 'x' || c == 'X') {
			Some(digits) => (digits, 16),
			None => (body, 10),
		};
		// only bare digits: no sign, no whitespace, not empty
		if digits.is_empty()
			|| !digits.chars().all(|c| c.is_digit(base))
		{
			return Err(invalid_number());
		}
		let cp = u32::from_str_radix(digits, base).map_err(|_| invalid_number())?;
		char::from_u32(cp).ok_or_else(invalid_number)
	} else {
		Err(ParseError::InvalidEntity(format!(
			"unsupported entity (\"&{};\").",
			name
		)))
	}
}

/// Expand all entity and character references in `raw`.
pub fn unescape(raw: &str) -> StdResult<String, ParseError> {
	let mut out = String::with_capacity(raw.len());
	let mut rest = raw;
	loop {
		let pos = match rest.find('&') {
			None => {
				out.push_str(rest);
				return Ok(out);
			}
			Some(pos) => pos,
		};
		out.push_str(&rest[..pos]);
		let after = &rest[pos + 1..];
		match after.find(';') {
			None => {
				// dangling reference, keep the rest as-is
				out.push_str(&rest[pos..]);
				return Ok(out);
			}
			Some(end) => {
				out.push(resolve(&after[..end])?);
				rest = &after[end + 1..];
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_named_entities() {
		assert_eq!(
			unescape("a &amp; b &lt;&gt; &quot;c&quot; &apos;d&apos;").unwrap(),
			"a & b <> \"c\" 'd'"
		);
	}

	#[test]
	fn expands_numeric_references() {
		assert_eq!(unescape("&#110;&#x6E;&#X6E;").unwrap(), "nnn");
		assert_eq!(unescape("&#x1F600;").unwrap(), "\u{1f600}");
	}

	#[test]
	fn expanded_text_is_not_rescanned() {
		assert_eq!(unescape("&amp;lt;").unwrap(), "&lt;");
	}

	#[test]
	fn dangling_ampersand_is_kept_verbatim() {
		assert_eq!(unescape("salt & pepper").unwrap(), "salt & pepper");
		assert_eq!(unescape("one &amp; two & three").unwrap(), "one & two & three");
	}

	#[test]
	fn empty_entity_name() {
		assert_eq!(
			unescape("a&;b"),
			Err(ParseError::InvalidEntity(
				"the name of an entity cannot be empty (\"&;\" is not valid XML).".to_string()
			))
		);
	}

	#[test]
	fn empty_numeric_reference() {
		assert_eq!(
			unescape("&#;"),
			Err(ParseError::InvalidEntity(
				"a numeric entity must have a number (\"&#;\" is not valid XML).".to_string()
			))
		);
	}

	#[test]
	fn malformed_numbers() {
		for s in ["&#12ab34;", "&#x10abz4;", "&#x;", "&# 12;", "&#+12;", "&#-12;"] {
			match unescape(s) {
				Err(ParseError::InvalidNumber(_)) => (),
				other => panic!("{}: unexpected result: {:?}", s, other),
			}
		}
	}

	#[test]
	fn out_of_range_references() {
		for s in ["&#x110000;", "&#xD800;", "&#1114112;"] {
			match unescape(s) {
				Err(ParseError::InvalidNumber(_)) => (),
				other => panic!("{}: unexpected result: {:?}", s, other),
			}
		}
	}

	#[test]
	fn unknown_entity() {
		assert_eq!(
			unescape("&copy;"),
			Err(ParseError::InvalidEntity(
				"unsupported entity (\"&copy;\").".to_string()
			))
		);
	}
}
