/*!
# Slash-path lookup over a parsed tree

A query path is a slash-separated list of tag names, optionally ending in
`@attribute-name`:

```text
root/server/listen
root/server/listen@port
```

The first segment must equal the root's tag name. Each following segment
descends to the first child (in sibling order) carrying that tag name.
The trailing `@` segment, when present, selects an attribute of the node
the path ends on; without it the query yields the node itself.

Lookup only consumes the tree's public traversal contract: `first_child`,
`next` and `attribute`.
*/
use std::rc::Rc;

use crate::node::Node;

/// Locate the node a path points at, ignoring any trailing `@attribute`.
pub fn find(root: &Rc<Node>, path: &str) -> Option<Rc<Node>> {
	let path = match path.find('@') {
		Some(at) => &path[..at],
		None => path,
	};
	let mut segments = path.split('/').filter(|s| !s.is_empty());
	if segments.next()? != root.tag_name().as_ref() {
		return None;
	}
	let mut current = root.clone();
	for segment in segments {
		let mut child = current.first_child();
		current = loop {
			match child {
				None => return None,
				Some(c) if c.tag_name() == segment => break c,
				Some(c) => child = c.next(),
			}
		};
	}
	Some(current)
}

/// Evaluate a path to a string value.
///
/// With a trailing `@attribute` segment this is the attribute's value;
/// otherwise it is the located node's trimmed text. `None` when the path
/// does not match or the attribute is not set.
pub fn value(root: &Rc<Node>, path: &str) -> Option<String> {
	let node = find(root, path)?;
	match path.find('@') {
		Some(at) => node.attribute(&path[at + 1..]),
		None => Some(node.text()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse;

	fn tree() -> Rc<Node> {
		parse(
			"test.xml",
			concat!(
				"<config>",
				"<server name='alpha'><listen port='8080'>0.0.0.0</listen></server>",
				"<server name='beta'/>",
				"</config>",
			)
			.as_bytes(),
		)
		.unwrap()
	}

	#[test]
	fn finds_nested_nodes() {
		let root = tree();
		let listen = find(&root, "config/server/listen").unwrap();
		assert_eq!(listen.tag_name(), "listen");
		assert_eq!(listen.attribute("port").unwrap(), "8080");
	}

	#[test]
	fn first_matching_sibling_wins() {
		let root = tree();
		let server = find(&root, "config/server").unwrap();
		assert_eq!(server.attribute("name").unwrap(), "alpha");
	}

	#[test]
	fn value_returns_text_without_attribute_segment() {
		let root = tree();
		assert_eq!(
			value(&root, "config/server/listen").unwrap(),
			"0.0.0.0"
		);
	}

	#[test]
	fn value_returns_attribute_with_at_segment() {
		let root = tree();
		assert_eq!(
			value(&root, "config/server/listen@port").unwrap(),
			"8080"
		);
		assert_eq!(value(&root, "config/server@name").unwrap(), "alpha");
	}

	#[test]
	fn root_segment_must_match() {
		let root = tree();
		assert!(find(&root, "wrong/server").is_none());
	}

	#[test]
	fn missing_path_or_attribute_is_none() {
		let root = tree();
		assert!(find(&root, "config/client").is_none());
		assert!(value(&root, "config/server@missing").is_none());
		assert!(value(&root, "config/server/listen/deeper").is_none());
	}

	#[test]
	fn path_to_root_itself() {
		let root = tree();
		let found = find(&root, "config").unwrap();
		assert!(Rc::ptr_eq(&found, &root));
	}
}
