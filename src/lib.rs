//! Incremental JSON parsing over chunked text.
//!
//! Feed a lazy sequence of text chunks in, iterate a lazy sequence of
//! increasingly complete [`Value`]s out. Consumers can start rendering or
//! inspecting a document long before the producer on the other end of the
//! stream has finished writing it; the last yielded value is exactly what a
//! conventional parser would return for the whole input.
//!
//! ```
//! use jsonrill::{Value, parse};
//!
//! let chunks = ["{\"name\":\"Al", "ex\",\"keys\":[1,20,300]}"];
//! let final_value = parse(chunks).last().unwrap().unwrap();
//! assert_eq!(final_value.to_string(), r#"{"name":"Alex","keys":[1,20,300]}"#);
//! ```
//!
//! Strict JSON only: no comments, trailing commas, or other extensions; the
//! first violation ends the stream with an error.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod builder;
mod escape;
mod token;
mod tokenizer;

mod error;
mod options;
mod parse;
mod path;
mod value;

pub use error::{InvariantError, ParseError};
pub use options::{CompleteCallback, ParserOptions};
pub use parse::{ValueStream, parse, parse_with_options};
pub use path::{Path, PathSegment};
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;
