/*!
# Tree-building parser

The parser drives the [`Lexer`] and assembles the tokens into a [`Node`]
tree. The grammar is small:

- Before the root element, a single processing instruction, comments and
  whitespace-only text are permitted; anything else is fatal.
- The root element must be explicitly closed; `<root/>` is rejected.
- Inside the root, opening tags push a new active parent (unless
  self-closing), closing tags must match the active parent's name exactly
  and pop it, and text accumulates on the active parent.
- After the root closes, only whitespace text, processing instructions and
  the end of the file may follow.

All errors are fatal; the parser never resumes after the first one, and no
partial tree is returned.
*/
use std::io;
use std::rc::Rc;

use crate::error::{Error, ParseError, Result};
use crate::lexer::{CodepointRead, DecodingReader, Lexer, Token};
use crate::node::Node;

/// Parse a complete document from a buffered byte source.
///
/// `filename` is only used in error messages.
pub fn parse<T: io::BufRead>(filename: &str, source: T) -> Result<Rc<Node>> {
	Parser::new(Lexer::new(filename, DecodingReader::new(source))).load()
}

/// Grammar state machine over a token stream.
pub struct Parser<T: CodepointRead> {
	lexer: Lexer<T>,
}

impl<T: CodepointRead> Parser<T> {
	pub fn new(lexer: Lexer<T>) -> Self {
		Self { lexer }
	}

	/// Parse the whole document and return the root node.
	pub fn load(mut self) -> Result<Rc<Node>> {
		let mut tok = self.lexer.next_token(false)?;
		tok = self.skip_empty(tok)?;
		// allow <?xml ... ?>
		if tok == Token::Processor {
			tok = self.lexer.next_token(false)?;
		}
		tok = self.skip_empty(tok)?;

		// now we have to have the root tag
		let root = match tok {
			Token::OpenTag(name) => Node::with_name(name),
			_ => {
				return Err(self.lexer.error(ParseError::UnexpectedToken(
					"cannot be empty or include anything other than a processor tag and comments before the root tag."
						.to_string(),
				)))
			}
		};
		if self.read_tag_attributes(&root)? == Token::EmptyTag {
			return Err(self.lexer.error(ParseError::UnexpectedToken(
				"root tag cannot be an empty tag.".to_string(),
			)));
		}

		let mut parent = root.clone();
		loop {
			match self.lexer.next_token(false)? {
				Token::OpenTag(name) => {
					let child = Node::with_name(name);
					parent.append_child(child.clone())?;
					if self.read_tag_attributes(&child)? == Token::EndTag {
						parent = child;
					}
				}
				Token::CloseTag(name) => {
					if parent.tag_name() != &*name {
						return Err(self.lexer.error(ParseError::UnexpectedToken(format!(
							"unexpected token \"{}\" in this closing tag; expected \"{}\" instead.",
							name,
							parent.tag_name()
						))));
					}
					match parent.parent() {
						Some(p) => parent = p,
						// the root just closed
						None => return self.finish(root),
					}
				}
				Token::Text(text) => parent.append_text(&text),
				Token::Processor => (),
				Token::Eof => {
					return Err(self.lexer.error(ParseError::UnexpectedToken(
						"reached the end of the file without first closing the root tag."
							.to_string(),
					)))
				}
				other => {
					// the lexer only emits these while reading attributes
					return Err(Error::Logic(format!(
						"received an unexpected {} token in the document body.",
						other.name()
					)));
				}
			}
		}
	}

	/// Consume whitespace-only text tokens; non-whitespace text outside the
	/// root element is fatal.
	fn skip_empty(&mut self, mut tok: Token) -> Result<Token> {
		while let Token::Text(text) = &tok {
			if !text.trim().is_empty() {
				return Err(self.lexer.error(ParseError::UnexpectedToken(
					"cannot include text data before or after the root tag.".to_string(),
				)));
			}
			tok = self.lexer.next_token(false)?;
		}
		Ok(tok)
	}

	/// Everything after the closing root tag.
	fn finish(&mut self, root: Rc<Node>) -> Result<Rc<Node>> {
		let mut tok = self.lexer.next_token(false)?;
		loop {
			tok = self.skip_empty(tok)?;
			match tok {
				Token::Eof => return Ok(root),
				Token::Processor => tok = self.lexer.next_token(false)?,
				other => {
					return Err(self.lexer.error(ParseError::UnexpectedToken(format!(
						"we reached the end of the XML file, but still found a token of type {} after the closing root tag instead of the end of the file.",
						other.name()
					))))
				}
			}
		}
	}

	/// Read `identifier="value"` triples up to the `>` or `/>` closing the
	/// tag, which is returned.
	fn read_tag_attributes(&mut self, tag: &Rc<Node>) -> Result<Token> {
		loop {
			let name = match self.lexer.next_token(true)? {
				tok @ (Token::EndTag | Token::EmptyTag) => return Ok(tok),
				Token::Identifier(name) => name,
				_ => {
					return Err(self.lexer.error(ParseError::InvalidXml(
						"expected the end of the tag (>) or an attribute name.".to_string(),
					)))
				}
			};
			if self.lexer.next_token(true)? != Token::Eq {
				return Err(self.lexer.error(ParseError::InvalidXml(
					"expected the '=' character between the attribute name and value.".to_string(),
				)));
			}
			let value = match self.lexer.next_token(true)? {
				Token::QuotedString(value) => value,
				_ => {
					return Err(self.lexer.error(ParseError::InvalidXml(
						"expected a quoted value after the '=' sign.".to_string(),
					)))
				}
			};
			if tag.has_attribute(&name) {
				return Err(self.lexer.error(ParseError::InvalidXml(format!(
					"attribute \"{}\" defined twice; we do not allow such.",
					name
				))));
			}
			tag.set_attribute(&name, &value)?;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ParseError;

	fn parse_str(data: &str) -> Result<Rc<Node>> {
		parse("input.xml", data.as_bytes())
	}

	fn parse_err(data: &str) -> String {
		parse_str(data).unwrap_err().to_string()
	}

	#[test]
	fn parses_an_empty_root() {
		let root = parse_str("<empty></empty>").unwrap();
		assert_eq!(root.tag_name(), "empty");
		assert_eq!(root.text(), "");
		assert!(root.all_attributes().is_empty());
		assert!(root.first_child().is_none());
	}

	#[test]
	fn parses_attributes_and_children() {
		let root =
			parse_str("<root even-root=\"can have an &quot;attribute&quot;\"><a/></root>")
				.unwrap();
		assert_eq!(
			root.attribute("even-root").unwrap(),
			"can have an \"attribute\""
		);
		let a = root.first_child().unwrap();
		assert_eq!(a.tag_name(), "a");
		assert!(a.first_child().is_none());
		assert!(a.next().is_none());
	}

	#[test]
	fn parses_nested_tree() {
		let root =
			parse_str("<tree><branch level='1'><leaf level='2'>text</leaf></branch></tree>")
				.unwrap();
		let leaf = root.first_child().unwrap().first_child().unwrap();
		assert_eq!(leaf.attribute("level").unwrap(), "2");
		assert_eq!(leaf.text(), "text");
	}

	#[test]
	fn text_interleaved_with_children_accumulates() {
		let root = parse_str("<r>one<child/>two</r>").unwrap();
		assert_eq!(root.text(), "onetwo");
		assert_eq!(root.first_child().unwrap().tag_name(), "child");
	}

	#[test]
	fn mismatched_closing_tag_names_both_tags() {
		assert_eq!(
			parse_err("<root><this>x</that></root>"),
			"input.xml:1: unexpected token \"that\" in this closing tag; expected \"this\" instead."
		);
	}

	#[test]
	fn empty_input_fails_at_line_one() {
		assert_eq!(
			parse_err(""),
			"input.xml:1: cannot be empty or include anything other than a processor tag and comments before the root tag."
		);
	}

	#[test]
	fn root_may_not_be_self_closing() {
		assert_eq!(
			parse_err("<root/>"),
			"input.xml:1: root tag cannot be an empty tag."
		);
	}

	#[test]
	fn nested_empty_tags_are_fine() {
		let root = parse_str("<root><a/><b/></root>").unwrap();
		let a = root.first_child().unwrap();
		assert_eq!(a.tag_name(), "a");
		assert_eq!(a.next().unwrap().tag_name(), "b");
	}

	#[test]
	fn leading_processor_comments_and_whitespace() {
		let root = parse_str(
			"<?xml version=\"1.0\"?>\n<!-- hello -->\n\n<root></root>\n<?done?>\n",
		)
		.unwrap();
		assert_eq!(root.tag_name(), "root");
	}

	#[test]
	fn text_before_root_is_fatal() {
		assert_eq!(
			parse_err("hello<root></root>"),
			"input.xml:1: cannot include text data before or after the root tag."
		);
	}

	#[test]
	fn text_after_root_is_fatal() {
		assert_eq!(
			parse_err("<root></root>\ntrailing"),
			"input.xml:2: cannot include text data before or after the root tag."
		);
	}

	#[test]
	fn tag_after_root_is_fatal() {
		assert_eq!(
			parse_err("<root></root><again></again>"),
			"input.xml:1: we reached the end of the XML file, but still found a token of type OpenTag after the closing root tag instead of the end of the file."
		);
	}

	#[test]
	fn unclosed_root_is_fatal() {
		assert_eq!(
			parse_err("<root><child></child>"),
			"input.xml:1: reached the end of the file without first closing the root tag."
		);
	}

	#[test]
	fn duplicate_attribute_is_fatal() {
		assert_eq!(
			parse_err("<root><tag attr=\"one\" attr=\"two\"></tag></root>"),
			"input.xml:1: attribute \"attr\" defined twice; we do not allow such."
		);
	}

	#[test]
	fn duplicate_attribute_even_when_first_is_empty() {
		// key presence decides, not value emptiness
		match parse_str("<root><tag attr=\"\" attr=\"two\"></tag></root>") {
			Err(Error::Parse {
				error: ParseError::InvalidXml(_),
				..
			}) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn missing_equal_sign() {
		assert_eq!(
			parse_err("<root attr\"value\"></root>"),
			"input.xml:1: expected the '=' character between the attribute name and value."
		);
	}

	#[test]
	fn unquoted_attribute_value() {
		assert_eq!(
			parse_err("<root attr=value></root>"),
			"input.xml:1: expected a quoted value after the '=' sign."
		);
	}

	#[test]
	fn error_lines_are_tracked() {
		assert_eq!(
			parse_err("<root>\n<a>\n<b>\n</a>\n</root>"),
			"input.xml:4: unexpected token \"a\" in this closing tag; expected \"b\" instead."
		);
	}

	#[test]
	fn processing_instruction_inside_body_is_skipped() {
		let root = parse_str("<root><?php echo(); ?>text</root>").unwrap();
		assert_eq!(root.text(), "text");
	}

	#[test]
	fn cdata_becomes_node_text() {
		let root = parse_str("<root><![CDATA[a < b &amp; c]]></root>").unwrap();
		assert_eq!(root.text(), "a < b &amp; c");
	}

	#[test]
	fn entity_error_is_located() {
		assert_eq!(
			parse_err("<root>\n&nope;</root>"),
			"input.xml:2: unsupported entity (\"&nope;\")."
		);
	}
}
