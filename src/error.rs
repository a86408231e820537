/*!
# Error types

This module holds the error types returned by the various functions of this
crate.

Syntax problems discovered while reading a document are classified as
[`ParseError`] and wrapped in [`Error::Parse`] together with the name of the
source and the line on which the problem was found; the combination renders
as `filename:line: message`.
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

/// Violation of the grammar or of a well-formedness constraint, found while
/// reading a document.
///
/// Parse errors carry a human-readable message; the message contents are
/// not meant to be interpreted by user code. The variant tells the class of
/// problem apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
	/// End-of-file encountered inside a construct where more data was
	/// expected.
	UnexpectedEof(String),

	/// A sequence of characters which does not form a valid token, such as
	/// a malformed tag name or a stray `<!DOCTYPE`.
	InvalidToken(String),

	/// Structurally invalid input, such as content after the root element.
	InvalidXml(String),

	/// A valid token which was not expected at that point in the grammar.
	UnexpectedToken(String),

	/// A malformed or unknown entity reference.
	InvalidEntity(String),

	/// A malformed numeric character reference.
	InvalidNumber(String),
}

impl ParseError {
	fn message(&self) -> &str {
		match self {
			Self::UnexpectedEof(msg) => msg,
			Self::InvalidToken(msg) => msg,
			Self::InvalidXml(msg) => msg,
			Self::UnexpectedToken(msg) => msg,
			Self::InvalidEntity(msg) => msg,
			Self::InvalidNumber(msg) => msg,
		}
	}
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.message())
	}
}

/// [`std::sync::Arc`]-based wrapper around [`std::io::Error`] to allow
/// cloning.
#[derive(Clone)]
pub struct IOErrorWrapper(Arc<io::Error>);

impl IOErrorWrapper {
	fn wrap(e: io::Error) -> IOErrorWrapper {
		IOErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IOErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl AsRef<io::Error> for IOErrorWrapper {
	fn as_ref(&self) -> &io::Error {
		&*self.0
	}
}

impl Deref for IOErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

impl std::borrow::Borrow<io::Error> for IOErrorWrapper {
	fn borrow(&self) -> &io::Error {
		&*self.0
	}
}

/// Error types which may be returned from this crate.
///
/// All errors are fatal: after the first error the parser does not resume.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// An I/O error was encountered while reading the source.
	Io(IOErrorWrapper),

	/// The document source could not be opened.
	///
	/// The message names the file and carries the operating system error
	/// text.
	FileNotFound(String),

	/// A syntax or well-formedness problem in the document, located by
	/// source name and 1-based line number.
	Parse {
		filename: String,
		line: usize,
		error: ParseError,
	},

	/// A string which does not conform to the Name production was used as a
	/// tag or attribute name.
	InvalidName(String),

	/// Attempt to append a node which is already linked into a tree.
	NodeAlreadyInTree,

	/// Attempt to append the root of a tree below one of its own nodes.
	NodeIsRoot,

	/// Internal invariant violation. Indicates a bug in this crate.
	Logic(String),
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub fn io(e: io::Error) -> Error {
		Error::Io(IOErrorWrapper::wrap(e))
	}

	/// Construct the error reported when a file cannot be opened.
	pub fn open(filename: &str, e: &io::Error) -> Error {
		Error::FileNotFound(format!(
			"could not open XML file \"{}\": {}.",
			filename, e
		))
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::io(e)
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "I/O error: {}", e),
			Error::FileNotFound(msg) => f.write_str(msg),
			Error::Parse {
				filename,
				line,
				error,
			} => write!(f, "{}:{}: {}", filename, line, error),
			Error::InvalidName(msg) => f.write_str(msg),
			Error::NodeAlreadyInTree => f.write_str(
				"Somehow you are trying to add a child node of a node that was already added to a tree of nodes.",
			),
			Error::NodeIsRoot => {
				f.write_str("Trying to append the root node within the sub-tree.")
			}
			Error::Logic(msg) => write!(f, "logic error: {}", msg),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(&**e),
			Error::Parse { error, .. } => Some(error),
			Error::FileNotFound(_)
			| Error::InvalidName(_)
			| Error::NodeAlreadyInTree
			| Error::NodeIsRoot
			| Error::Logic(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_error_renders_with_location() {
		let e = Error::Parse {
			filename: "input.xml".to_string(),
			line: 3,
			error: ParseError::InvalidXml("we found a second root tag.".to_string()),
		};
		assert_eq!(e.to_string(), "input.xml:3: we found a second root tag.");
	}

	#[test]
	fn open_error_carries_os_message() {
		let ioe = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
		let e = Error::open("missing.xml", &ioe);
		assert_eq!(
			e.to_string(),
			"could not open XML file \"missing.xml\": No such file or directory."
		);
	}

	#[test]
	fn io_errors_compare_by_identity() {
		let a = Error::io(io::Error::new(io::ErrorKind::Other, "x"));
		let b = Error::io(io::Error::new(io::ErrorKind::Other, "x"));
		assert_ne!(a, b);
		assert_eq!(a, a.clone());
	}
}
