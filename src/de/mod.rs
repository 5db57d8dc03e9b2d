/*!
Parsing JSON documents into tape ASTs.

The driver is a linear scan with an explicit stack: open composites live as
frames on the structure tape, so nesting depth is bounded by arena space
rather than the host stack. Scalars emit their AST words as they complete;
composites collect element words on the structure tape and move them behind
a length word when they close.

There is a single failure path. The first detected error records a code and
byte offset, the arena goes back to the allocator, and the offset is
resolved to a line and column over the buffer as it stands, including any
string content already decoded in place.
*/

mod document;
mod error;
mod number;
mod string;
mod tape;

use crate::alloc::{Allocator, Heap};

use self::tape::{Frame, FrameKind, Tag};

pub use self::{
    document::{Document, Kind, Value},
    error::{ErrorCode, ParseError},
};

use self::error::RawError;

/**
Parse a JSON document using the default heap allocator.

The root must be an array or an object. The parser may overwrite `input`
while decoding strings; the document borrows it for its whole lifetime.
*/
pub fn parse(input: &mut [u8]) -> Result<Document<'_>, ParseError> {
    parse_with(input, Heap)
}

/**
Parse a JSON document, drawing arena space from `allocator`.

One block of one word per input byte is reserved up front. On success the
document owns it and releases it when dropped; on error it is released
before the error returns, so reservations and releases balance either way.
*/
pub fn parse_with<A: Allocator>(
    input: &mut [u8],
    allocator: A,
) -> Result<Document<'_, A>, ParseError> {
    let words = match allocator.allocate(input.len()) {
        Some(words) => words,
        None => {
            return Err(RawError::new(ErrorCode::OutOfMemory, 0).locate(input));
        }
    };

    let mut parser = Parser {
        input,
        p: 0,
        tape: tape::Tape::new(words),
    };

    let outcome = parser.scan_document();

    let Parser { input, tape, .. } = parser;

    match outcome {
        Ok(root) => {
            let (arena, ast_len) = tape.into_parts();

            Ok(Document::new(input, arena, ast_len, root, allocator))
        }
        Err(raw) => {
            allocator.deallocate(tape.into_words());

            Err(raw.locate(input))
        }
    }
}

/**
The state of a parse in progress.
*/
pub(crate) struct Parser<'input> {
    pub(super) input: &'input mut [u8],
    /// The current byte offset.
    pub(super) p: usize,
    pub(super) tape: tape::Tape,
}

/// What scanning one value produced: a finished word, or a composite that
/// just opened.
enum Scanned {
    Word(usize),
    Open(FrameKind),
}

/// A composite that just closed: its value word and the restored parent.
struct Closed {
    word: usize,
    parent: Option<Frame>,
}

impl<'input> Parser<'input> {
    fn scan_document(&mut self) -> Result<usize, RawError> {
        self.skip_whitespace();

        let kind = match self.peek() {
            None => return Err(RawError::new(ErrorCode::MissingRootElement, self.p)),
            Some(b'[') => FrameKind::Array,
            Some(b'{') => FrameKind::Object,
            Some(_) => return Err(RawError::new(ErrorCode::BadRoot, self.p)),
        };

        self.p += 1;
        let mut frame = self.open_frame(kind, None)?;
        let mut entered = true;

        let root = 'document: loop {
            let closed = 'frame: loop {
                self.skip_whitespace();

                match frame.kind {
                    FrameKind::Array => {
                        if entered {
                            match self.peek() {
                                Some(b']') => {
                                    self.p += 1;
                                    break 'frame self.close(frame);
                                }
                                Some(b',') => {
                                    return Err(RawError::new(ErrorCode::UnexpectedComma, self.p));
                                }
                                // end of input surfaces from `scan_value`
                                _ => (),
                            }
                        } else {
                            match self.peek() {
                                None => {
                                    return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p));
                                }
                                Some(b']') => {
                                    self.p += 1;
                                    break 'frame self.close(frame);
                                }
                                Some(b',') => {
                                    self.p += 1;
                                    self.skip_whitespace();
                                }
                                Some(_) => {
                                    return Err(RawError::new(ErrorCode::ExpectedComma, self.p));
                                }
                            }
                        }
                    }
                    FrameKind::Object => {
                        if entered {
                            match self.peek() {
                                None => {
                                    return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p));
                                }
                                Some(b'}') => {
                                    self.p += 1;
                                    break 'frame self.close(frame);
                                }
                                Some(b'"') => (),
                                Some(_) => {
                                    return Err(RawError::new(ErrorCode::MissingObjectKey, self.p));
                                }
                            }
                        } else {
                            match self.peek() {
                                None => {
                                    return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p));
                                }
                                Some(b'}') => {
                                    self.p += 1;
                                    break 'frame self.close(frame);
                                }
                                Some(b',') => {
                                    self.p += 1;
                                    self.skip_whitespace();

                                    match self.peek() {
                                        None => {
                                            return Err(RawError::new(
                                                ErrorCode::UnexpectedEnd,
                                                self.p,
                                            ));
                                        }
                                        Some(b'"') => (),
                                        Some(_) => {
                                            return Err(RawError::new(
                                                ErrorCode::MissingObjectKey,
                                                self.p,
                                            ));
                                        }
                                    }
                                }
                                Some(_) => {
                                    return Err(RawError::new(ErrorCode::ExpectedComma, self.p));
                                }
                            }
                        }

                        // the member key lands directly in its triple
                        let (begin, end) = self.scan_string()?;
                        self.push_element(begin)?;
                        self.push_element(end - begin)?;

                        self.skip_whitespace();
                        match self.peek() {
                            None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.p)),
                            Some(b':') => self.p += 1,
                            Some(_) => return Err(RawError::new(ErrorCode::ExpectedColon, self.p)),
                        }
                        self.skip_whitespace();
                    }
                }

                match self.scan_value()? {
                    Scanned::Word(word) => {
                        self.push_element(word)?;
                        entered = false;
                    }
                    Scanned::Open(kind) => {
                        frame = self.open_frame(kind, Some(frame))?;
                        entered = true;
                    }
                }
            };

            match closed.parent {
                None => {
                    self.skip_whitespace();

                    if self.p < self.input.len() {
                        return Err(RawError::new(ErrorCode::ExpectedEndOfInput, self.p));
                    }

                    break 'document closed.word;
                }
                Some(parent) => {
                    self.push_element(closed.word)?;
                    frame = parent;
                    entered = false;
                }
            }
        };

        Ok(root)
    }

    /**
    Scan a single value at the cursor: a scalar emits its word, `[` or `{`
    opens a frame.
    */
    fn scan_value(&mut self) -> Result<Scanned, RawError> {
        match self.peek() {
            None => Err(RawError::new(ErrorCode::UnexpectedEnd, self.p)),
            Some(b'"') => {
                let (begin, end) = self.scan_string()?;

                let index = match self.tape.push_ast(begin) {
                    Some(index) => index,
                    None => return Err(RawError::new(ErrorCode::OutOfMemory, self.p)),
                };
                if self.tape.push_ast(end).is_none() {
                    return Err(RawError::new(ErrorCode::OutOfMemory, self.p));
                }

                Ok(Scanned::Word(tape::pack(Tag::Str, index)))
            }
            Some(b'0'..=b'9' | b'-') => Ok(Scanned::Word(self.scan_number()?)),
            Some(b't') => {
                self.scan_literal(b"true", ErrorCode::ExpectedTrue)?;
                Ok(Scanned::Word(tape::pack(Tag::Bool, 1)))
            }
            Some(b'f') => {
                self.scan_literal(b"false", ErrorCode::ExpectedFalse)?;
                Ok(Scanned::Word(tape::pack(Tag::Bool, 0)))
            }
            Some(b'n') => {
                self.scan_literal(b"null", ErrorCode::ExpectedNull)?;
                Ok(Scanned::Word(tape::pack(Tag::Null, 0)))
            }
            Some(b'[') => {
                self.p += 1;
                Ok(Scanned::Open(FrameKind::Array))
            }
            Some(b'{') => {
                self.p += 1;
                Ok(Scanned::Open(FrameKind::Object))
            }
            Some(b',') => Err(RawError::new(ErrorCode::UnexpectedComma, self.p)),
            Some(_) => Err(RawError::new(ErrorCode::ExpectedValue, self.p)),
        }
    }

    fn scan_literal(&mut self, text: &'static [u8], mismatch: ErrorCode) -> Result<(), RawError> {
        let start = self.p;

        for (at, &expected) in text.iter().enumerate() {
            match self.input.get(start + at) {
                None => return Err(RawError::new(ErrorCode::UnexpectedEnd, self.input.len())),
                Some(&b) if b == expected => (),
                Some(_) => return Err(RawError::new(mismatch, start)),
            }
        }

        self.p = start + text.len();

        Ok(())
    }

    fn open_frame(&mut self, kind: FrameKind, parent: Option<Frame>) -> Result<Frame, RawError> {
        match self.tape.open_frame(kind, parent) {
            Some(frame) => Ok(frame),
            None => Err(RawError::new(ErrorCode::OutOfMemory, self.p)),
        }
    }

    fn close(&mut self, frame: Frame) -> Closed {
        let tag = match frame.kind {
            FrameKind::Array => Tag::Array,
            FrameKind::Object => Tag::Object,
        };

        let input: &[u8] = self.input;
        let (header, parent) = self.tape.close_frame(frame, input);

        Closed {
            word: tape::pack(tag, header),
            parent,
        }
    }

    #[inline]
    fn push_element(&mut self, word: usize) -> Result<(), RawError> {
        match self.tape.push_structure(word) {
            Some(()) => Ok(()),
            None => Err(RawError::new(ErrorCode::OutOfMemory, self.p)),
        }
    }

    #[inline]
    pub(super) fn peek(&self) -> Option<u8> {
        self.input.get(self.p).copied()
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.p += 1;
        }
    }
}
