/*!
# Minimal, strict XML subset parsing

This crate parses and serializes a deliberately restricted subset of XML
1.0: elements with attributes and text content, comments, CDATA sections,
processing instructions (skipped), and the five predefined entities plus
numeric character references.

## Features (some call them restrictions)

* No external resources
* No custom entities
* No DTD whatsoever
* No namespace handling; a `:` is just a name character
* UTF-8 input only
* The whole document is parsed into one in-memory tree before use
* Precise error locations (`filename:line`) for every malformed input
* Strict about structure: one root element, explicitly closed, and
  nothing but whitespace, comments and processing instructions around it

## Example

```
let doc = "<?xml version='1.0'?><hello planet=\"Earth\">World!</hello>";
let doc = minixml::Document::parse_str("greeting.xml", doc).unwrap();
let root = doc.root();
assert_eq!(root.tag_name(), "hello");
assert_eq!(root.attribute("planet").unwrap(), "Earth");
assert_eq!(root.text(), "World!");
// serialization is Display
assert_eq!(root.to_string(), "<hello planet=\"Earth\">World!</hello>");
```

## Structure

[`Document`] is the entry point for parsing a file, reader or string. The
resulting tree of [`Node`]s is traversed through `first_child`/`next`/
`parent` links, queried with [`query`], and rendered back to markup through
[`std::fmt::Display`]. The lower layers ([`lexer`], [`parser`]) are public
for callers who want to consume the token stream directly.
*/
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

pub mod error;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod query;
pub mod selectors;
pub mod strings;
pub mod writer;


pub use error::{Error, ParseError, Result};
pub use lexer::{Lexer, Token};
pub use node::Node;
pub use strings::{Name, NameStr};
pub use writer::convert_to_entity;

/// Version of the crate, for the CLI and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed document, owning the root of its node tree.
#[derive(Debug, Clone)]
pub struct Document {
	root: Rc<Node>,
}

impl Document {
	/// Parse the file at `path`.
	///
	/// The path is also the name used in error messages. Fails with
	/// [`Error::FileNotFound`] when the file cannot be opened.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
		let filename = path.as_ref().display().to_string();
		let file = fs::File::open(path.as_ref()).map_err(|e| Error::open(&filename, &e))?;
		Self::parse_reader(&filename, file)
	}

	/// Parse a document out of any [`io::Read`] source.
	///
	/// `filename` is only used in error messages.
	pub fn parse_reader<R: io::Read>(filename: &str, source: R) -> Result<Document> {
		let root = parser::parse(filename, io::BufReader::new(source))?;
		Ok(Document { root })
	}

	/// Parse a document held in memory.
	///
	/// `filename` is only used in error messages.
	pub fn parse_str(filename: &str, data: &str) -> Result<Document> {
		let root = parser::parse(filename, data.as_bytes())?;
		Ok(Document { root })
	}

	/// The root element of the document.
	pub fn root(&self) -> Rc<Node> {
		self.root.clone()
	}

	/// Evaluate a slash-separated query path against the tree.
	///
	/// See [`query`] for the path syntax.
	pub fn query(&self, path: &str) -> Option<String> {
		query::value(&self.root, path)
	}
}

impl fmt::Display for Document {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&self.root, f)
	}
}
