/*!
# Tokenizer for the minimal XML subset

The [`Lexer`] pulls codepoints out of a [`CodepointRead`] source and groups
them into [`Token`]s. It is a pull lexer: the parser calls
[`Lexer::next_token`] once per token and tells it through the
`parsing_attributes` flag whether the scan position is inside a tag, where
`=`, `/>`, `>` and quoted values carry structure, or outside, where those
characters are ordinary text.

The lexer tracks a 1-based line counter for diagnostics. `\r` and `\r\n`
are normalized to a single `\n` and count one line each. A small fixed
pushback buffer covers the few places where the grammar needs to look one
codepoint ahead.

Comments (`<!--...-->`) are consumed silently and never surface as tokens.
Processing instructions surface as [`Token::Processor`] with their content
dropped. CDATA sections surface as [`Token::Text`] with their content kept
verbatim; all other text and all quoted values have entity references
expanded through [`entities::unescape`].
*/
use std::fmt;

pub mod entities;
pub mod read;

use crate::error::{Error, ParseError, Result};
use crate::selectors::{is_name_char, is_name_start_char, is_space};
use crate::strings::Name;

pub use read::{CodepointRead, DecodingReader};

/// A single token of the document grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	/// `<name`, with any attributes still unread.
	OpenTag(Name),
	/// `</name>`.
	CloseTag(Name),
	/// `/>`, closing the tag currently being read.
	EmptyTag,
	/// `>`, closing the tag currently being read.
	EndTag,
	/// `=` between an attribute name and its value.
	Eq,
	/// A quoted attribute value, entities expanded.
	QuotedString(String),
	/// An attribute name.
	Identifier(String),
	/// A run of character data.
	Text(String),
	/// A processing instruction (`<?...?>`); the content is discarded.
	Processor,
	/// End of the source.
	Eof,
}

impl Token {
	/// Name of the token kind, for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::OpenTag(..) => "OpenTag",
			Self::CloseTag(..) => "CloseTag",
			Self::EmptyTag => "EmptyTag",
			Self::EndTag => "EndTag",
			Self::Eq => "Eq",
			Self::QuotedString(..) => "QuotedString",
			Self::Identifier(..) => "Identifier",
			Self::Text(..) => "Text",
			Self::Processor => "Processor",
			Self::Eof => "Eof",
		}
	}
}

impl fmt::Display for Token {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Pull lexer over a codepoint source.
pub struct Lexer<T: CodepointRead> {
	source: T,
	filename: String,
	line: usize,
	pushback: [char; 4],
	pushback_len: usize,
}

impl<T: CodepointRead> Lexer<T> {
	pub fn new(filename: &str, source: T) -> Self {
		Self {
			source,
			filename: filename.to_string(),
			line: 1,
			pushback: ['\0'; 4],
			pushback_len: 0,
		}
	}

	/// The name of the source, as used in diagnostics.
	pub fn filename(&self) -> &str {
		&self.filename
	}

	/// The line the lexer is currently on, 1-based.
	pub fn line(&self) -> usize {
		self.line
	}

	/// Attach the current source location to a parse error.
	pub fn error(&self, error: ParseError) -> Error {
		Error::Parse {
			filename: self.filename.clone(),
			line: self.line,
			error,
		}
	}

	fn getc(&mut self) -> Result<Option<char>> {
		if self.pushback_len > 0 {
			self.pushback_len -= 1;
			return Ok(Some(self.pushback[self.pushback_len]));
		}

		match self.source.read()? {
			None => Ok(None),
			Some('\r') => {
				self.line += 1;
				match self.source.read()? {
					Some('\n') | None => (),
					Some(other) => self.ungetc(other)?,
				}
				Ok(Some('\n'))
			}
			Some('\n') => {
				self.line += 1;
				Ok(Some('\n'))
			}
			Some(c) => Ok(Some(c)),
		}
	}

	fn ungetc(&mut self, c: char) -> Result<()> {
		if self.pushback_len >= self.pushback.len() {
			return Err(Error::Logic(format!(
				"{}:{}: somehow the pushback buffer was overflowed.",
				self.filename, self.line
			)));
		}
		self.pushback[self.pushback_len] = c;
		self.pushback_len += 1;
		Ok(())
	}

	/// Read the next token.
	///
	/// `parsing_attributes` must be true while the scan position is inside
	/// a tag, between the tag name and the closing `>` or `/>`.
	pub fn next_token(&mut self, parsing_attributes: bool) -> Result<Token> {
		loop {
			let c = match self.getc()? {
				None => return Ok(Token::Eof),
				Some(c) => c,
			};
			match c {
				c if parsing_attributes && is_space(c) => continue,
				'<' => match self.getc()? {
					Some('?') => return self.read_processor(),
					Some('!') => {
						// comments yield no token at all
						if let Some(tok) = self.read_declaration()? {
							return Ok(tok);
						}
						continue;
					}
					Some('/') => return self.read_close_tag(),
					other => return self.read_open_tag(other),
				},
				'>' if parsing_attributes => return Ok(Token::EndTag),
				'/' if parsing_attributes => match self.getc()? {
					Some('>') => return Ok(Token::EmptyTag),
					other => {
						if let Some(other) = other {
							self.ungetc(other)?;
						}
						return self.read_text('/');
					}
				},
				'=' if parsing_attributes => return Ok(Token::Eq),
				'"' | '\'' if parsing_attributes => return self.read_quoted(c),
				c if parsing_attributes && is_name_char(c) => {
					return self.read_identifier(c)
				}
				c => return self.read_text(c),
			}
		}
	}

	/// Scan past `<?`. The content is not interpreted.
	fn read_processor(&mut self) -> Result<Token> {
		loop {
			let mut c = self.getc()?;
			while c == Some('?') {
				c = self.getc()?;
				if c == Some('>') {
					return Ok(Token::Processor);
				}
			}
			if c.is_none() {
				return Err(self.error(ParseError::UnexpectedEof(
					"reached the end of the file while reading a processor (\"<?...?>\") tag."
						.to_string(),
				)));
			}
		}
	}

	/// Scan past `<!`: reject declarations, consume comments (returning
	/// `None`), read CDATA sections as verbatim text.
	fn read_declaration(&mut self) -> Result<Option<Token>> {
		let c = match self.getc()? {
			None => {
				return Err(self.error(ParseError::UnexpectedEof(
					"found EOF after a \"<!\" sequence.".to_string(),
				)))
			}
			Some(c) => c,
		};
		if c.is_ascii_alphabetic() {
			// <!DOCTYPE, <!ELEMENT, <!ENTITY, ... none are supported
			return Err(self.error(ParseError::InvalidXml(
				"found an element definition (such as an \"<!ELEMENT...>\" sequence), which is not supported."
					.to_string(),
			)));
		}
		if c == '[' {
			return Ok(Some(self.read_cdata()?));
		}
		let mut c = c;
		if c == '-' {
			match self.getc()? {
				Some('-') => {
					self.skip_comment()?;
					return Ok(None);
				}
				Some(other) => c = other,
				None => {
					return Err(self.error(ParseError::UnexpectedEof(
						"found EOF after a \"<!\" sequence.".to_string(),
					)))
				}
			}
		}
		Err(self.error(ParseError::InvalidToken(format!(
			"character '{}' was not expected after a \"<!\" sequence.",
			c
		))))
	}

	/// Scan a `<![CDATA[...]]>` section; `<![` is already consumed.
	fn read_cdata(&mut self) -> Result<Token> {
		for expected in "CDATA[".chars() {
			if self.getc()? != Some(expected) {
				return Err(self.error(ParseError::InvalidXml(
					"found an unexpected sequence of character in a \"<![CDATA[...\" sequence."
						.to_string(),
				)));
			}
		}
		let mut value = String::new();
		loop {
			let c = match self.getc()? {
				None => {
					return Err(self.error(ParseError::UnexpectedEof(
						"found EOF while parsing a \"<![CDATA[...]]>\" sequence.".to_string(),
					)))
				}
				Some(c) => c,
			};
			if c != ']' {
				value.push(c);
				continue;
			}
			let c = self.getc()?;
			if c != Some(']') {
				value.push(']');
				match c {
					Some(c) => value.push(c),
					None => (),
				}
				continue;
			}
			// at "]]"; any further ']' belongs to the content
			let mut c = self.getc()?;
			while c == Some(']') {
				value.push(']');
				c = self.getc()?;
			}
			if c == Some('>') {
				// like text, but entities are not expanded
				return Ok(Token::Text(value));
			}
			value.push_str("]]");
			match c {
				Some(c) => value.push(c),
				None => (),
			}
		}
	}

	/// Consume a comment; `<!--` is already consumed.
	fn skip_comment(&mut self) -> Result<()> {
		loop {
			let mut c = match self.getc()? {
				None => {
					return Err(self.error(ParseError::UnexpectedEof(
						"found EOF while parsing a comment (\"<!--...-->\") sequence.".to_string(),
					)))
				}
				Some(c) => c,
			};
			if c != '-' {
				continue;
			}
			loop {
				c = match self.getc()? {
					None => {
						return Err(self.error(ParseError::UnexpectedEof(
							"found EOF while parsing a comment (\"<!--...-->\") sequence."
								.to_string(),
						)))
					}
					Some(c) => c,
				};
				if c != '-' {
					break;
				}
				if self.getc_if_gt()? {
					return Ok(());
				}
			}
		}
	}

	fn getc_if_gt(&mut self) -> Result<bool> {
		match self.getc()? {
			Some('>') => Ok(true),
			Some(other) => {
				self.ungetc(other)?;
				Ok(false)
			}
			None => Ok(false),
		}
	}

	/// Scan `</ name >`; `</` is already consumed.
	fn read_close_tag(&mut self) -> Result<Token> {
		let mut c = self.getc()?;
		while matches!(c, Some(ch) if is_space(ch)) {
			c = self.getc()?;
		}
		let mut ch = match c {
			None => {
				return Err(self.error(ParseError::UnexpectedEof(
					"expected a tag name after \"</\", not EOF.".to_string(),
				)))
			}
			Some(ch) => ch,
		};
		if !is_name_start_char(ch) {
			return Err(self.error(ParseError::InvalidToken(format!(
				"character '{}' is not valid for a tag name.",
				ch
			))));
		}
		let mut value = String::new();
		let mut c = loop {
			value.push(ch);
			match self.getc()? {
				Some(next) if is_name_char(next) => ch = next,
				other => break other,
			}
		};
		while matches!(c, Some(ch) if is_space(ch)) {
			c = self.getc()?;
		}
		match c {
			None => Err(self.error(ParseError::UnexpectedEof(
				"expected '>', not EOF.".to_string(),
			))),
			Some('>') => {
				// SAFETY: the scanner only accepted a NameStartChar followed
				// by NameChars, which is exactly the Name production.
				Ok(Token::CloseTag(unsafe {
					Name::from_string_unchecked(value)
				}))
			}
			Some(other) => Err(self.error(ParseError::InvalidXml(format!(
				"found an unexpected '{}' in a closing tag, expected '>' instead.",
				other
			)))),
		}
	}

	/// Scan the name of an opening tag; `<` is already consumed and `first`
	/// is the codepoint right after it. The attributes are read by the
	/// parser, token by token.
	fn read_open_tag(&mut self, first: Option<char>) -> Result<Token> {
		let mut c = first;
		while matches!(c, Some(ch) if is_space(ch)) {
			c = self.getc()?;
		}
		let mut ch = match c {
			None => {
				return Err(self.error(ParseError::UnexpectedEof(
					"expected a tag name after '<', not EOF.".to_string(),
				)))
			}
			Some(ch) => ch,
		};
		if !is_name_start_char(ch) {
			return Err(self.error(ParseError::InvalidToken(format!(
				"character '{}' is not valid for a tag name.",
				ch
			))));
		}
		let mut value = String::new();
		let mut c = loop {
			value.push(ch);
			match self.getc()? {
				Some(next) if is_name_char(next) => ch = next,
				other => break other,
			}
		};
		match c {
			Some(ch) if is_space(ch) => {
				// the attributes (or the closing '>') follow; the parser
				// reads them token by token
				while matches!(c, Some(ch) if is_space(ch)) {
					c = self.getc()?;
				}
			}
			None | Some('>') | Some('/') => (),
			Some(ch) => {
				return Err(self.error(ParseError::InvalidToken(format!(
					"character '{}' is not valid right after a tag name.",
					ch
				))))
			}
		}
		if let Some(ch) = c {
			self.ungetc(ch)?;
		}
		// SAFETY: the scanner only accepted a NameStartChar followed by
		// NameChars, which is exactly the Name production.
		Ok(Token::OpenTag(unsafe { Name::from_string_unchecked(value) }))
	}

	/// Scan a quoted attribute value; `quote` is already consumed.
	fn read_quoted(&mut self, quote: char) -> Result<Token> {
		let mut value = String::new();
		loop {
			let c = match self.getc()? {
				None => {
					return Err(self.error(ParseError::UnexpectedEof(
						"found EOF while reading a quoted attribute value.".to_string(),
					)))
				}
				Some(c) => c,
			};
			if c == quote {
				let value = entities::unescape(&value).map_err(|e| self.error(e))?;
				return Ok(Token::QuotedString(value));
			}
			if c == '>' {
				return Err(self.error(ParseError::InvalidToken(
					"character '>' not expected inside a tag value; please use \"&gt;\" instead."
						.to_string(),
				)));
			}
			value.push(c);
		}
	}

	/// Scan an attribute name; `first` is its first codepoint.
	fn read_identifier(&mut self, first: char) -> Result<Token> {
		let mut value = String::new();
		let mut ch = first;
		loop {
			value.push(ch);
			match self.getc()? {
				Some(next) if is_name_char(next) => ch = next,
				other => {
					if let Some(other) = other {
						self.ungetc(other)?;
					}
					return Ok(Token::Identifier(value));
				}
			}
		}
	}

	/// Scan a run of text up to the next `<` or the end of the source;
	/// `first` is its first codepoint.
	fn read_text(&mut self, first: char) -> Result<Token> {
		let mut value = String::new();
		let mut ch = first;
		loop {
			value.push(ch);
			match self.getc()? {
				Some('<') => {
					self.ungetc('<')?;
					break;
				}
				None => break,
				Some(next) => ch = next,
			}
		}
		let value = entities::unescape(&value).map_err(|e| self.error(e))?;
		Ok(Token::Text(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lexer(data: &str) -> Lexer<DecodingReader<&[u8]>> {
		Lexer::new("test.xml", DecodingReader::new(data.as_bytes()))
	}

	fn tag_name(tok: Token) -> String {
		match tok {
			Token::OpenTag(name) | Token::CloseTag(name) => name.to_string(),
			other => panic!("expected a tag token, got {:?}", other),
		}
	}

	#[test]
	fn tokenizes_a_simple_element() {
		let mut lx = lexer("<greet>hello</greet>");
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "greet");
		assert_eq!(lx.next_token(true).unwrap(), Token::EndTag);
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("hello".to_string())
		);
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "greet");
		assert_eq!(lx.next_token(false).unwrap(), Token::Eof);
	}

	#[test]
	fn tokenizes_attributes() {
		let mut lx = lexer("<a x=\"1\" y='two &amp; three'/>");
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "a");
		assert_eq!(
			lx.next_token(true).unwrap(),
			Token::Identifier("x".to_string())
		);
		assert_eq!(lx.next_token(true).unwrap(), Token::Eq);
		assert_eq!(
			lx.next_token(true).unwrap(),
			Token::QuotedString("1".to_string())
		);
		assert_eq!(
			lx.next_token(true).unwrap(),
			Token::Identifier("y".to_string())
		);
		assert_eq!(lx.next_token(true).unwrap(), Token::Eq);
		assert_eq!(
			lx.next_token(true).unwrap(),
			Token::QuotedString("two & three".to_string())
		);
		assert_eq!(lx.next_token(true).unwrap(), Token::EmptyTag);
	}

	#[test]
	fn spaces_allowed_around_tag_names() {
		let mut lx = lexer("<  spaced  ></ spaced >");
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "spaced");
		assert_eq!(lx.next_token(true).unwrap(), Token::EndTag);
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "spaced");
	}

	#[test]
	fn crlf_counts_a_single_line() {
		let mut lx = lexer("<a>\r\n\r\n<b>\n");
		lx.next_token(false).unwrap();
		lx.next_token(true).unwrap();
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("\n\n".to_string())
		);
		assert_eq!(lx.line(), 3);
		lx.next_token(false).unwrap();
		lx.next_token(true).unwrap();
		lx.next_token(false).unwrap();
		assert_eq!(lx.line(), 4);
	}

	#[test]
	fn carriage_return_normalized_to_newline() {
		let mut lx = lexer("<a>x\ry</a>");
		lx.next_token(false).unwrap();
		lx.next_token(true).unwrap();
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("x\ny".to_string())
		);
		assert_eq!(lx.line(), 2);
	}

	#[test]
	fn comments_produce_no_token() {
		let mut lx = lexer("<!-- one --- two -->rest");
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("rest".to_string())
		);
	}

	#[test]
	fn processor_token() {
		let mut lx = lexer("<?xml version=\"1.0\"?><r>");
		assert_eq!(lx.next_token(false).unwrap(), Token::Processor);
		assert_eq!(tag_name(lx.next_token(false).unwrap()), "r");
	}

	#[test]
	fn cdata_is_verbatim_text() {
		let mut lx = lexer("<![CDATA[a < b &amp; c ]] ]]]>");
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("a < b &amp; c ]] ]".to_string())
		);
	}

	#[test]
	fn doctype_is_rejected() {
		let mut lx = lexer("<!DOCTYPE html><html/>");
		match lx.next_token(false) {
			Err(Error::Parse {
				error: ParseError::InvalidXml(_),
				..
			}) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn broken_cdata_marker_is_rejected() {
		let mut lx = lexer("<![CDAT[oops]]>");
		match lx.next_token(false) {
			Err(Error::Parse {
				error: ParseError::InvalidXml(_),
				..
			}) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn eof_inside_constructs_is_reported() {
		for src in [
			"<?xml never ends",
			"<!-- never ends",
			"<![CDATA[never ends",
			"</",
			"<",
			"<tag attr=\"never ends",
		] {
			let mut lx = lexer(src);
			loop {
				match lx.next_token(src.starts_with("<tag")) {
					Err(Error::Parse {
						error: ParseError::UnexpectedEof(_),
						..
					}) => break,
					Ok(Token::Eof) => panic!("{}: lexer hit eof without error", src),
					Ok(_) => continue,
					Err(other) => panic!("{}: unexpected error: {:?}", src, other),
				}
			}
		}
	}

	#[test]
	fn gt_inside_quoted_value_is_rejected() {
		let mut lx = lexer("a=\"x > y\"");
		lx.next_token(true).unwrap();
		lx.next_token(true).unwrap();
		match lx.next_token(true) {
			Err(Error::Parse { error: ParseError::InvalidToken(msg), .. }) => {
				assert_eq!(
					msg,
					"character '>' not expected inside a tag value; please use \"&gt;\" instead."
				);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn text_entities_are_expanded() {
		let mut lx = lexer("tom &amp; jerry<");
		assert_eq!(
			lx.next_token(false).unwrap(),
			Token::Text("tom & jerry".to_string())
		);
	}

	#[test]
	fn slash_outside_empty_tag_is_text() {
		let mut lx = lexer("/x<");
		assert_eq!(lx.next_token(false).unwrap(), Token::Text("/x".to_string()));
	}
}
