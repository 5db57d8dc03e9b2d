/*!
In-situ string scanning.

Strings are decoded with two cursors into the input buffer: a read cursor
and a write cursor that starts at the same place. Every escape and every
multi-byte sequence is at least as long as its decoded form, so the write
cursor never overtakes the read cursor and the decoded bytes land over the
source bytes. The scanner returns the `(begin, end)` range of the decoded
content.

Raw multi-byte sequences are validated as they are copied: the lead byte
picks a 2, 3, or 4 byte length, continuations are checked in place, and
overlong forms, encoded surrogates, and out-of-range scalars are rejected.
That makes every decoded string valid UTF-8, which the navigation API
relies on to hand out `&str`.
*/

use super::{
    error::{ErrorCode, RawError},
    Parser,
};

impl<'input> Parser<'input> {
    /**
    Scan the string whose opening quote is at the cursor, decoding it in
    place. Returns the decoded byte range.
    */
    pub(super) fn scan_string(&mut self) -> Result<(usize, usize), RawError> {
        // skip the opening quote
        self.p += 1;

        let begin = self.p;
        let mut read = self.p;
        let mut write = self.p;

        loop {
            if read >= self.input.len() {
                return Err(RawError::new(ErrorCode::UnexpectedEnd, self.input.len()));
            }

            let curr = *get_unchecked!(self.input, read);

            match curr {
                b'"' => {
                    self.p = read + 1;
                    return Ok((begin, write));
                }
                b'\\' => {
                    let (r, w) = self.scan_escape(read, write)?;
                    read = r;
                    write = w;
                }
                0x00..=0x1F => {
                    return Err(RawError::with_argument(
                        ErrorCode::IllegalCodepoint,
                        read,
                        curr as usize,
                    ));
                }
                0x20..=0x7F => {
                    *get_unchecked_mut!(self.input, write) = curr;
                    read += 1;
                    write += 1;
                }
                _ => {
                    let (r, w) = self.copy_utf8(read, write)?;
                    read = r;
                    write = w;
                }
            }
        }
    }

    /**
    Decode the escape whose `\` is at `read`.
    */
    fn scan_escape(&mut self, read: usize, write: usize) -> Result<(usize, usize), RawError> {
        let escaped_at = read + 1;

        let escaped = match self.input.get(escaped_at) {
            Some(&b) => b,
            None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.input.len())),
        };

        let decoded = match escaped {
            b'"' | b'\\' | b'/' => escaped,
            b'b' => 0x08,
            b't' => 0x09,
            b'n' => 0x0A,
            b'f' => 0x0C,
            b'r' => 0x0D,
            b'u' => return self.scan_unicode_escape(read, write),
            _ => return Err(RawError::new(ErrorCode::UnknownEscape, escaped_at)),
        };

        *get_unchecked_mut!(self.input, write) = decoded;

        Ok((read + 2, write + 1))
    }

    /**
    Decode the `\uXXXX` escape whose `\` is at `read`, pairing surrogates.
    */
    fn scan_unicode_escape(&mut self, read: usize, write: usize) -> Result<(usize, usize), RawError> {
        let code = self.hex_code(read + 2, ErrorCode::UnexpectedEnd)?;

        if let 0xD800..=0xDBFF = code {
            // lead surrogate: a `\u` trail escape must follow immediately
            let next = read + 6;

            if next >= self.input.len() {
                return Err(RawError::new(
                    ErrorCode::UnexpectedEndOfUtf16,
                    self.input.len(),
                ));
            }
            if *get_unchecked!(self.input, next) != b'\\' {
                return Err(RawError::new(ErrorCode::ExpectedU, next));
            }
            if next + 1 >= self.input.len() {
                return Err(RawError::new(
                    ErrorCode::UnexpectedEndOfUtf16,
                    self.input.len(),
                ));
            }
            if *get_unchecked!(self.input, next + 1) != b'u' {
                return Err(RawError::new(ErrorCode::ExpectedU, next + 1));
            }

            let trail = self.hex_code(next + 2, ErrorCode::UnexpectedEndOfUtf16)?;

            if !(0xDC00..=0xDFFF).contains(&trail) {
                return Err(RawError::new(ErrorCode::InvalidUtf16TrailSurrogate, next + 2));
            }

            let scalar = 0x10000 + ((code - 0xD800) << 10) + (trail - 0xDC00);
            let written = self.write_scalar(write, scalar);

            return Ok((read + 12, write + written));
        }

        if let 0xDC00..=0xDFFF = code {
            // trail surrogate with no lead before it
            return Err(RawError::new(ErrorCode::InvalidUtf16TrailSurrogate, read + 2));
        }

        let written = self.write_scalar(write, code);

        Ok((read + 6, write + written))
    }

    fn hex_code(&self, at: usize, end_of_input: ErrorCode) -> Result<u32, RawError> {
        let mut code = 0;

        for offset in at..at + 4 {
            let digit = match self.input.get(offset) {
                Some(&b) => (b as char).to_digit(16),
                None => return Err(RawError::new(end_of_input, self.input.len())),
            };

            match digit {
                Some(digit) => code = code << 4 | digit,
                None => return Err(RawError::new(ErrorCode::InvalidUnicodeEscape, offset)),
            }
        }

        Ok(code)
    }

    /**
    Encode a unicode scalar at the write cursor, returning the byte count.

    The escape that produced the scalar is always at least as long as its
    encoding, so the target range is inside the buffer.
    */
    fn write_scalar(&mut self, write: usize, scalar: u32) -> usize {
        if scalar < 0x80 {
            *get_unchecked_mut!(self.input, write) = scalar as u8;
            1
        } else if scalar < 0x800 {
            *get_unchecked_mut!(self.input, write) = 0xC0 | (scalar >> 6) as u8;
            *get_unchecked_mut!(self.input, write + 1) = 0x80 | (scalar & 0x3F) as u8;
            2
        } else if scalar < 0x10000 {
            *get_unchecked_mut!(self.input, write) = 0xE0 | (scalar >> 12) as u8;
            *get_unchecked_mut!(self.input, write + 1) = 0x80 | ((scalar >> 6) & 0x3F) as u8;
            *get_unchecked_mut!(self.input, write + 2) = 0x80 | (scalar & 0x3F) as u8;
            3
        } else {
            *get_unchecked_mut!(self.input, write) = 0xF0 | (scalar >> 18) as u8;
            *get_unchecked_mut!(self.input, write + 1) = 0x80 | ((scalar >> 12) & 0x3F) as u8;
            *get_unchecked_mut!(self.input, write + 2) = 0x80 | ((scalar >> 6) & 0x3F) as u8;
            *get_unchecked_mut!(self.input, write + 3) = 0x80 | (scalar & 0x3F) as u8;
            4
        }
    }

    /**
    Validate and copy the raw multi-byte sequence whose lead is at `read`.
    */
    fn copy_utf8(&mut self, read: usize, write: usize) -> Result<(usize, usize), RawError> {
        let lead = *get_unchecked!(self.input, read);

        let len = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(RawError::new(ErrorCode::InvalidUtf8, read)),
        };

        let mut scalar = (lead as u32) & (0x7F >> len);

        for offset in read + 1..read + len {
            let cont = match self.input.get(offset) {
                Some(&b) => b,
                None => return Err(RawError::new(ErrorCode::InvalidUtf8, self.input.len())),
            };

            if cont & 0xC0 != 0x80 {
                return Err(RawError::new(ErrorCode::InvalidUtf8, offset));
            }

            scalar = scalar << 6 | (cont & 0x3F) as u32;
        }

        let in_range = match len {
            2 => scalar >= 0x80,
            3 => scalar >= 0x800 && !(0xD800..=0xDFFF).contains(&scalar),
            _ => (0x10000..=0x10FFFF).contains(&scalar),
        };

        if !in_range {
            // overlong form, encoded surrogate, or out-of-range scalar
            return Err(RawError::new(ErrorCode::InvalidUtf8, read));
        }

        for offset in 0..len {
            let byte = *get_unchecked!(self.input, read + offset);
            *get_unchecked_mut!(self.input, write + offset) = byte;
        }

        Ok((read + len, write + len))
    }
}
