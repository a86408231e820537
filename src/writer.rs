/*!
# Serialization of node trees

A [`Node`] renders through [`std::fmt::Display`], recursively, on a single
line with no indentation.

Attribute values are delimited with double quotes, switching to single
quotes only when the value contains a `"` and no `'`; with that rule
`&apos;` is never needed on output. `&`, `<` and `>` are always escaped in
both attribute values and text, `"` only inside double-quoted values.

An element with no children, no text and a parent renders self-closing.
The root element always gets an explicit closing tag, matching what the
parser accepts. A node's text renders after all of its children; the
original interleaving of text and child elements is not preserved.
*/
use std::fmt;

use crate::node::Node;

/// Escape every character of `raw` which occurs in `which` as its
/// predefined entity.
///
/// `which` selects among `&`, `<`, `>`, `"` and `'`; characters of `which`
/// outside that set have no effect.
pub fn convert_to_entity(raw: &str, which: &str) -> String {
	let mut result = String::with_capacity(raw.len());
	for c in raw.chars() {
		if !which.contains(c) {
			result.push(c);
			continue;
		}
		match c {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&apos;"),
			_ => result.push(c),
		}
	}
	result
}

impl fmt::Display for Node {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<{}", self.tag_name())?;
		for (name, value) in self.all_attributes().iter() {
			// use attr='...' if the value includes one or more '"' and no
			// apostrophe, otherwise use attr="..." and convert any '"' to
			// &quot;; that way we never need &apos;
			let quote = if value.contains('"') && !value.contains('\'') {
				'\''
			} else {
				'"'
			};
			let value = if quote == '"' {
				convert_to_entity(value, "&<>\"")
			} else {
				convert_to_entity(value, "&<>")
			};
			write!(f, " {}={}{}{}", name, quote, value, quote)?;
		}
		let text = self.text();
		let empty = self.first_child().is_none() && text.is_empty() && self.parent().is_some();
		if empty {
			f.write_str("/")?;
		}
		f.write_str(">")?;
		let mut child = self.first_child();
		while let Some(c) = child {
			fmt::Display::fmt(&c, f)?;
			child = c.next();
		}
		if !text.is_empty() {
			// safe to keep any '"' as is here
			f.write_str(&convert_to_entity(&text, "&<>"))?;
		}
		if !empty {
			write!(f, "</{}>", self.tag_name())?;
		}
		Ok(())
	}
}
