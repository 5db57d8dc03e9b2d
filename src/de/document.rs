/*!
Documents and value navigation.

A document owns the input buffer it was parsed from and the arena holding
its AST. Values are single words: a tag plus either an immediate value or a
tape index, so navigation is tag dispatch and slice reads. Nothing here
mutates; a document is safe to share across threads once built.
*/

use std::{cmp::Ordering, fmt, mem};

use crate::alloc::{Allocator, Heap};

use super::tape::{self, Tag};

/**
A parsed JSON document.

Owns the (mutably borrowed) input buffer and the tape arena for its whole
lifetime. The arena goes back to the allocator when the document drops.
*/
pub struct Document<'input, A: Allocator = Heap> {
    input: &'input mut [u8],
    arena: Vec<usize>,
    ast_len: usize,
    root: usize,
    allocator: A,
}

impl<'input, A: Allocator> Document<'input, A> {
    pub(super) fn new(
        input: &'input mut [u8],
        arena: Vec<usize>,
        ast_len: usize,
        root: usize,
        allocator: A,
    ) -> Self {
        Document {
            input,
            arena,
            ast_len,
            root,
            allocator,
        }
    }

    /**
    The root value. Always an array or an object.
    */
    #[inline]
    pub fn root(&self) -> Value<'_> {
        Value {
            input: &*self.input,
            ast: get_unchecked!(self.arena, ..self.ast_len),
            word: self.root,
        }
    }

    /// Used by tests to check the tape halves never crossed.
    #[cfg(test)]
    pub(crate) fn tape_partition(&self) -> (usize, usize) {
        (self.ast_len, self.arena.len())
    }
}

impl<'input, A: Allocator> Drop for Document<'input, A> {
    fn drop(&mut self) {
        self.allocator.deallocate(mem::take(&mut self.arena));
    }
}

impl<'input, A: Allocator> fmt::Debug for Document<'input, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Document").field("root", &self.root()).finish()
    }
}

/**
The kind of a value within a document.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Double,
    Null,
    False,
    True,
    String,
    Array,
    Object,
}

/**
A single value within a document.

Values are cheap to copy: a word plus two borrowed slices. Accessors for
the wrong kind, and indexes past a composite's length, are programmer
errors and panic.
*/
#[derive(Clone, Copy)]
pub struct Value<'doc> {
    input: &'doc [u8],
    ast: &'doc [usize],
    word: usize,
}

impl<'doc> Value<'doc> {
    /**
    The kind of this value. A tag read, so always cheap.
    */
    #[inline]
    pub fn kind(&self) -> Kind {
        match tape::tag(self.word) {
            Tag::Integer | Tag::IntTape => Kind::Integer,
            Tag::Double => Kind::Double,
            Tag::Null => Kind::Null,
            Tag::Bool => {
                if tape::payload(self.word) == 0 {
                    Kind::False
                } else {
                    Kind::True
                }
            }
            Tag::Str => Kind::String,
            Tag::Array => Kind::Array,
            Tag::Object => Kind::Object,
        }
    }

    /**
    The number of elements of an array or members of an object.
    */
    pub fn len(&self) -> usize {
        *get_unchecked!(self.ast, self.composite_header())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
    The array element at `index` in document order.
    */
    pub fn array_element(&self, index: usize) -> Value<'doc> {
        let header = self.array_header();
        let length = *get_unchecked!(self.ast, header);
        assert!(index < length, "array index out of bounds");

        self.at(*get_unchecked!(self.ast, header + 1 + index))
    }

    /**
    Iterate over the elements of an array.
    */
    pub fn elements(&self) -> impl Iterator<Item = Value<'doc>> {
        let value = *self;

        (0..value.len()).map(move |index| value.array_element(index))
    }

    /**
    The object key at `index` in sorted member order.
    */
    pub fn object_key(&self, index: usize) -> &'doc str {
        let (key_offset, key_len, _) = self.member(index);

        from_utf8_unchecked!(get_unchecked!(self.input, key_offset..key_offset + key_len))
    }

    /**
    The object value at `index` in sorted member order.
    */
    pub fn object_value(&self, index: usize) -> Value<'doc> {
        let (_, _, value) = self.member(index);

        self.at(value)
    }

    /**
    Iterate over the members of an object in sorted order.
    */
    pub fn members(&self) -> impl Iterator<Item = (&'doc str, Value<'doc>)> {
        let value = *self;

        (0..value.len()).map(move |index| (value.object_key(index), value.object_value(index)))
    }

    /**
    Binary-search an object for `key`, comparing key length before key
    bytes. Returns the member index on a hit and `len()` on a miss.

    With duplicate keys it is unspecified which of the equal members the
    search lands on.
    */
    pub fn find_object_key(&self, key: &str) -> usize {
        let key = key.as_bytes();
        let header = self.object_header();
        let length = *get_unchecked!(self.ast, header);

        let mut lo = 0;
        let mut hi = length;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;

            let at = header + 1 + mid * 3;
            let key_offset = *get_unchecked!(self.ast, at);
            let key_len = *get_unchecked!(self.ast, at + 1);
            let probe = get_unchecked!(self.input, key_offset..key_offset + key_len);

            match (probe.len(), probe).cmp(&(key.len(), key)) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return mid,
            }
        }

        length
    }

    /**
    Look up `key` in an object. `None` when the key is missing.
    */
    pub fn value_of_key(&self, key: &str) -> Option<Value<'doc>> {
        let index = self.find_object_key(key);

        if index == self.len() {
            None
        } else {
            Some(self.object_value(index))
        }
    }

    /**
    The value of an integer. Integers always fit an i32; anything wider
    parses as a double.
    */
    pub fn integer_value(&self) -> i32 {
        match tape::tag(self.word) {
            Tag::Integer => tape::payload_signed(self.word) as i32,
            Tag::IntTape => *get_unchecked!(self.ast, tape::payload(self.word)) as isize as i32,
            _ => panic!("value is not an integer"),
        }
    }

    /**
    The double view of a numeric value; an integer is widened.
    */
    pub fn double_value(&self) -> f64 {
        match tape::tag(self.word) {
            Tag::Integer | Tag::IntTape => self.integer_value() as f64,
            Tag::Double => self.load_double(),
            _ => panic!("value is not a number"),
        }
    }

    /**
    The double view of any numeric value.
    */
    #[inline]
    pub fn number_value(&self) -> f64 {
        self.double_value()
    }

    /**
    Recover an exact integer from a numeric value.

    Succeeds iff the double view is integral and within `[-(2^53), 2^53]`,
    the range where doubles hold exact integers.
    */
    pub fn int53_value(&self) -> Option<i64> {
        const MAX: f64 = 9_007_199_254_740_992.0;

        match tape::tag(self.word) {
            Tag::Integer | Tag::IntTape => Some(self.integer_value() as i64),
            Tag::Double => {
                let value = self.load_double();

                if value.fract() == 0.0 && (-MAX..=MAX).contains(&value) {
                    Some(value as i64)
                } else {
                    None
                }
            }
            _ => panic!("value is not a number"),
        }
    }

    /**
    The decoded content of a string.
    */
    pub fn string(&self) -> &'doc str {
        from_utf8_unchecked!(self.string_bytes())
    }

    /**
    The decoded content of a string as raw bytes. The range lies within the
    original input buffer.
    */
    pub fn string_bytes(&self) -> &'doc [u8] {
        match tape::tag(self.word) {
            Tag::Str => {
                let pair = tape::payload(self.word);
                let begin = *get_unchecked!(self.ast, pair);
                let end = *get_unchecked!(self.ast, pair + 1);

                get_unchecked!(self.input, begin..end)
            }
            _ => panic!("value is not a string"),
        }
    }

    /**
    The decoded byte length of a string.
    */
    pub fn string_len(&self) -> usize {
        self.string_bytes().len()
    }

    #[inline]
    fn at(&self, word: usize) -> Value<'doc> {
        Value { word, ..*self }
    }

    #[inline]
    fn load_double(&self) -> f64 {
        let index = tape::payload(self.word);
        let lo = *get_unchecked!(self.ast, index) as u32 as u64;
        let hi = *get_unchecked!(self.ast, index + 1) as u32 as u64;

        f64::from_bits(hi << 32 | lo)
    }

    #[inline]
    fn composite_header(&self) -> usize {
        match tape::tag(self.word) {
            Tag::Array | Tag::Object => tape::payload(self.word),
            _ => panic!("value is not an array or object"),
        }
    }

    #[inline]
    fn array_header(&self) -> usize {
        match tape::tag(self.word) {
            Tag::Array => tape::payload(self.word),
            _ => panic!("value is not an array"),
        }
    }

    #[inline]
    fn object_header(&self) -> usize {
        match tape::tag(self.word) {
            Tag::Object => tape::payload(self.word),
            _ => panic!("value is not an object"),
        }
    }

    #[inline]
    fn member(&self, index: usize) -> (usize, usize, usize) {
        let header = self.object_header();
        let length = *get_unchecked!(self.ast, header);
        assert!(index < length, "object index out of bounds");

        let at = header + 1 + index * 3;

        (
            *get_unchecked!(self.ast, at),
            *get_unchecked!(self.ast, at + 1),
            *get_unchecked!(self.ast, at + 2),
        )
    }
}

impl<'doc> fmt::Debug for Value<'doc> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            Kind::Integer => write!(f, "{}", self.integer_value()),
            Kind::Double => write!(f, "{}", self.double_value()),
            Kind::Null => f.write_str("null"),
            Kind::False => f.write_str("false"),
            Kind::True => f.write_str("true"),
            Kind::String => write!(f, "{:?}", self.string()),
            Kind::Array => f.debug_list().entries(self.elements()).finish(),
            Kind::Object => f.debug_map().entries(self.members()).finish(),
        }
    }
}

#[cfg(any(test, feature = "serde_json"))]
impl<'input, A: Allocator> Document<'input, A> {
    /**
    Convert the document into a [`serde_json::Value`].

    With duplicate keys it is unspecified which member survives the
    conversion.
    */
    pub fn to_value(&self) -> serde_json::Value {
        self.root().to_value()
    }
}

#[cfg(any(test, feature = "serde_json"))]
impl<'doc> Value<'doc> {
    /**
    Convert a value into a [`serde_json::Value`].
    */
    pub fn to_value(&self) -> serde_json::Value {
        match self.kind() {
            Kind::Integer => serde_json::Value::from(self.integer_value()),
            Kind::Double => match serde_json::Number::from_f64(self.double_value()) {
                Some(number) => serde_json::Value::Number(number),
                None => serde_json::Value::Null,
            },
            Kind::Null => serde_json::Value::Null,
            Kind::False => serde_json::Value::Bool(false),
            Kind::True => serde_json::Value::Bool(true),
            Kind::String => serde_json::Value::String(self.string().to_owned()),
            Kind::Array => {
                serde_json::Value::Array(self.elements().map(|element| element.to_value()).collect())
            }
            Kind::Object => {
                let mut map = serde_json::Map::with_capacity(self.len());

                for (key, value) in self.members() {
                    map.insert(key.to_owned(), value.to_value());
                }

                serde_json::Value::Object(map)
            }
        }
    }
}
