/*!
# `tape-json`

A single-allocation, in-situ JSON parser.

This library is optimized for reading very large numbers of documents where
predictable memory use matters: the entire parsed representation lives in one
arena sized to the input, decoded strings are written back into the input
buffer in place, and no per-node allocation is performed.

[`parse`] takes a mutable byte buffer containing a single JSON document whose
root is an array or object and returns a [`Document`] over a tape-encoded
AST. Values are navigated by type, by array index, or by object key lookup;
object members are sorted by `(key length, key bytes)` at parse time so key
lookup is a binary search.

```
let mut buf = br#"{"answer": 42}"#.to_vec();

let document = tape_json::parse(&mut buf)?;
let root = document.root();

assert_eq!(42, root.value_of_key("answer").unwrap().integer_value());
# Ok::<(), tape_json::ParseError>(())
```

## The in-situ contract

The parser may overwrite the input buffer while decoding string escapes. The
buffer is borrowed mutably for the lifetime of the document and must be
treated as garbage once the document is gone.

## Allocation

All arena space goes through the two-method [`Allocator`] contract: exactly
one reservation per parse attempt and exactly one release per document drop
(or before an error returns). [`Heap`] is the default implementation.
*/

#[macro_use]
mod macros;

mod alloc;

pub mod de;

pub use crate::{
    alloc::{Allocator, Heap},
    de::{parse, parse_with, Document, ErrorCode, Kind, ParseError, Value},
};
