/*!
# Decoding of UTF-8 byte streams into codepoints

The lexer works on [`char`]s, one at a time. [`DecodingReader`] pulls bytes
out of any [`io::BufRead`] and assembles them into codepoints. Malformed
sequences do not fail the read; each offending byte decodes to U+FFFD so
that a stray byte in an otherwise well-formed document still produces a
diagnosable parse instead of an I/O failure.
*/
use std::io;

/// Read individual codepoints from a byte source.
pub trait CodepointRead {
	/// Read a single codepoint, or `None` at end of file.
	fn read(&mut self) -> io::Result<Option<char>>;
}

/// UTF-8 decoder over an arbitrary [`io::BufRead`].
pub struct DecodingReader<T: io::BufRead> {
	backend: T,
}

impl<T: io::BufRead> DecodingReader<T> {
	pub fn new(backend: T) -> Self {
		Self { backend }
	}

	fn next_byte(&mut self) -> io::Result<Option<u8>> {
		let buf = self.backend.fill_buf()?;
		if buf.is_empty() {
			return Ok(None);
		}
		let b = buf[0];
		self.backend.consume(1);
		Ok(Some(b))
	}

	/// Look at the next byte without consuming it.
	fn peek_byte(&mut self) -> io::Result<Option<u8>> {
		let buf = self.backend.fill_buf()?;
		Ok(buf.first().copied())
	}
}

impl<T: io::BufRead> CodepointRead for DecodingReader<T> {
	fn read(&mut self) -> io::Result<Option<char>> {
		let lead = match self.next_byte()? {
			None => return Ok(None),
			Some(b) => b,
		};

		let (mut cp, ncont) = match lead {
			0x00..=0x7f => return Ok(Some(lead as char)),
			0xc0..=0xdf => ((lead & 0x1f) as u32, 1),
			0xe0..=0xef => ((lead & 0x0f) as u32, 2),
			0xf0..=0xf7 => ((lead & 0x07) as u32, 3),
			// continuation byte without a preceding lead
			_ => return Ok(Some('\u{fffd}')),
		};

		for _ in 0..ncont {
			// a non-continuation byte stays in the buffer; it may be the
			// lead of the next codepoint
			match self.peek_byte()? {
				Some(b) if b & 0xc0 == 0x80 => {
					cp = (cp << 6) | (b & 0x3f) as u32;
					self.backend.consume(1);
				}
				_ => return Ok(Some('\u{fffd}')),
			}
		}

		// reject overlong encodings and non-scalar values
		let min = match ncont {
			1 => 0x80,
			2 => 0x800,
			_ => 0x10000,
		};
		if cp < min {
			return Ok(Some('\u{fffd}'));
		}
		Ok(Some(char::from_u32(cp).unwrap_or('\u{fffd}')))
	}
}
