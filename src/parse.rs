//! The outer driver: from a stream of text chunks to a stream of values.
//!
//! [`parse`] couples the tokenizer and the value builder into a lazy iterator
//! of snapshots of the top-level value. Every yielded snapshot is a strictly
//! more complete rendition of the same document; the last one equals what a
//! conventional parser would produce from the concatenated input.
use crate::{
    builder::TreeBuilder,
    error::ParseError,
    options::ParserOptions,
    tokenizer::{Pump, Tokenizer},
    value::Value,
};

/// Parses a chunked JSON document incrementally.
///
/// Yields the top-level value each time it visibly changes, then ends after
/// the final, complete value. Upstream may chunk the text arbitrarily, down
/// to one character at a time; chunk boundaries only affect how often
/// intermediate snapshots appear, never the final value.
///
/// Exactly one top-level value is accepted. Trailing whitespace is tolerated;
/// anything else after the value, or an input that ends mid-value, fails. A
/// failure is yielded once as `Err` and the stream ends.
///
/// Note on duplicate keys: the last occurrence wins and keeps the key's
/// original position, like a conventional non-streaming parser. At such a
/// key, consecutive snapshots may change the value's type.
///
/// # Examples
///
/// ```
/// use jsonrill::{Value, parse};
///
/// let mut values = parse(["[1", ",2]"]);
/// let first = values.next().unwrap().unwrap();
/// assert_eq!(first, Value::Array(vec![]));
/// let last = values.last().unwrap().unwrap();
/// assert_eq!(last.to_string(), "[1,2]");
/// ```
pub fn parse<I>(chunks: I) -> ValueStream<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    parse_with_options(chunks, ParserOptions::default())
}

/// Like [`parse`], with [`ParserOptions`].
pub fn parse_with_options<I>(chunks: I, options: ParserOptions) -> ValueStream<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    ValueStream {
        tokenizer: Tokenizer::new(chunks.into_iter()),
        builder: TreeBuilder::new(options),
        finished: false,
    }
}

/// Lazy stream of increasingly complete top-level values.
///
/// Returned by [`parse`]; single-use. After yielding an `Err` the stream is
/// exhausted.
pub struct ValueStream<I: Iterator> {
    tokenizer: Tokenizer<I>,
    builder: TreeBuilder,
    finished: bool,
}

impl<I> Iterator for ValueStream<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Value, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            self.builder.clear_progress();
            match self.tokenizer.pump(&mut self.builder) {
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                Ok(Pump::Tokens) => {
                    debug_assert_eq!(
                        self.tokenizer.is_done(),
                        self.builder.is_done(),
                        "lexer and builder stacks must empty together"
                    );
                    if self.builder.progressed() {
                        let snapshot = self
                            .builder
                            .root()
                            .cloned()
                            .expect("progress implies a root value");
                        return Some(Ok(snapshot));
                    }
                    if self.builder.is_done() {
                        // The value is closed; one more pump enforces that
                        // nothing but whitespace follows.
                        let result = self.tokenizer.pump(&mut self.builder);
                        self.finished = true;
                        return match result {
                            Ok(_) => None,
                            Err(e) => Some(Err(e)),
                        };
                    }
                    // Tokens that changed nothing visible (key fragments,
                    // container ends): keep pumping.
                }
                Ok(Pump::Done) => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}
