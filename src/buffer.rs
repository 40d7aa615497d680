//! The input side of the pipeline: buffered, pull-on-demand chunk text.
//!
//! `ChunkBuffer` owns the unconsumed tail of every chunk received so far and
//! the upstream chunk source itself. The tokenizer peeks and consumes through
//! it; when the buffered text runs out, [`ChunkBuffer::expand`] pulls one more
//! chunk from upstream. That pull is the only point in the whole pipeline
//! where the parse waits on the outside world.
use alloc::{string::String, vec::Vec};

use crate::error::ParseError;

/// Outcome of matching the buffer against an expected literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixMatch {
    /// The whole literal is buffered and matches.
    Full,
    /// The buffer ran out while still matching; more input could complete it.
    Partial,
    /// Mismatch within the buffered text.
    No,
}

/// Why a string-body scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStop {
    /// Stopped on an unescaped `"`.
    Quote,
    /// Stopped on a `\`.
    Backslash,
    /// Stopped on a code unit below U+0020, which may not appear raw.
    Control(char),
    /// Consumed the whole buffer without hitting a delimiter.
    EndOfBuffer,
}

pub(crate) struct ChunkBuffer<I: Iterator> {
    source: core::iter::Fuse<I>,
    data: Vec<char>,
    pos: usize,
    upstream_exhausted: bool,
    /// Cleared only while the tokenizer sits inside a number, which has no
    /// terminator; everywhere else an upstream end mid-value is an error.
    more_content_expected: bool,
    line: usize,
    column: usize,
}

impl<I> ChunkBuffer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub(crate) fn new(source: I) -> Self {
        Self {
            source: source.fuse(),
            data: Vec::new(),
            pos: 0,
            upstream_exhausted: false,
            more_content_expected: true,
            line: 1,
            column: 1,
        }
    }

    /// Remaining unread characters.
    pub(crate) fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub(crate) fn peek(&self, offset: usize) -> Option<char> {
        self.data.get(self.pos + offset).copied()
    }

    /// Consumes `n` characters, updating the line/column cursor.
    pub(crate) fn advance(&mut self, n: usize) {
        for i in 0..n {
            match self.data.get(self.pos + i) {
                Some('\n') => {
                    self.line += 1;
                    self.column = 1;
                }
                Some(_) => self.column += 1,
                None => break,
            }
        }
        self.pos = core::cmp::min(self.pos + n, self.data.len());
    }

    /// Consumes and returns `n` characters as a string.
    pub(crate) fn take(&mut self, n: usize) -> String {
        let end = core::cmp::min(self.pos + n, self.data.len());
        let s: String = self.data[self.pos..end].iter().collect();
        self.advance(n);
        s
    }

    /// Matches the buffered text against `literal` without consuming.
    pub(crate) fn match_prefix(&self, literal: &str) -> PrefixMatch {
        let mut offset = 0;
        for expected in literal.chars() {
            match self.peek(offset) {
                Some(c) if c == expected => offset += 1,
                Some(_) => return PrefixMatch::No,
                None => return PrefixMatch::Partial,
            }
        }
        PrefixMatch::Full
    }

    /// Consumes a run of JSON whitespace: space, tab, line feed, carriage
    /// return. No other character counts, Unicode whitespace included.
    pub(crate) fn skip_whitespace(&mut self) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek(n) {
            if matches!(c, ' ' | '\t' | '\n' | '\r') {
                n += 1;
            } else {
                break;
            }
        }
        self.advance(n);
        n
    }

    /// Scans the maximal string-body run: characters that are neither `"` nor
    /// `\` nor a raw control code. Returns the run length and the stop reason
    /// without consuming anything.
    pub(crate) fn scan_string_body(&self) -> (usize, ScanStop) {
        let mut n = 0;
        loop {
            match self.peek(n) {
                None => return (n, ScanStop::EndOfBuffer),
                Some('"') => return (n, ScanStop::Quote),
                Some('\\') => return (n, ScanStop::Backslash),
                Some(c) if (c as u32) < 0x20 => return (n, ScanStop::Control(c)),
                Some(_) => n += 1,
            }
        }
    }

    /// Discards the consumed prefix. Called between pump cycles so that the
    /// buffer never retains more than the current in-progress token.
    pub(crate) fn commit(&mut self) {
        if self.pos > 0 {
            self.data.drain(..self.pos);
            self.pos = 0;
        }
    }

    /// Pulls one chunk from upstream and appends it.
    ///
    /// Returns `Ok(true)` if a chunk was delivered (possibly empty), and
    /// `Ok(false)` if upstream is exhausted and that is tolerable — i.e. a
    /// number is the only thing left open. An upstream end anywhere else is
    /// an `UnexpectedEndOfContent` error.
    pub(crate) fn expand(&mut self) -> Result<bool, ParseError> {
        if !self.upstream_exhausted {
            if let Some(chunk) = self.source.next() {
                self.data.extend(chunk.as_ref().chars());
                return Ok(true);
            }
            self.upstream_exhausted = true;
        }
        if self.more_content_expected {
            Err(ParseError::UnexpectedEndOfContent)
        } else {
            Ok(false)
        }
    }

    /// Requires that nothing but whitespace remains, in the buffer and in
    /// every chunk upstream still holds.
    pub(crate) fn expect_end_of_content(&mut self) -> Result<(), ParseError> {
        self.more_content_expected = false;
        loop {
            self.skip_whitespace();
            if self.len() > 0 {
                return Err(ParseError::TrailingContent {
                    line: self.line,
                    column: self.column,
                });
            }
            self.commit();
            if !self.expand()? {
                return Ok(());
            }
        }
    }

    pub(crate) fn upstream_exhausted(&self) -> bool {
        self.upstream_exhausted
    }

    pub(crate) fn set_more_content_expected(&mut self, expected: bool) {
        self.more_content_expected = expected;
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec};

    use super::{ChunkBuffer, ParseError, PrefixMatch, ScanStop};

    fn buf(chunks: &[&str]) -> ChunkBuffer<std::vec::IntoIter<String>> {
        let chunks: vec::Vec<String> = chunks.iter().map(|c| String::from(*c)).collect();
        ChunkBuffer::new(chunks.into_iter())
    }

    #[test]
    fn peek_and_advance_track_position() {
        let mut b = buf(&["ab\ncd"]);
        assert!(b.expand().unwrap());
        assert_eq!(b.peek(0), Some('a'));
        assert_eq!(b.peek(4), Some('d'));
        b.advance(3);
        assert_eq!((b.line(), b.column()), (2, 1));
        assert_eq!(b.take(2), "cd");
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn match_prefix_spans_buffered_text_only() {
        let mut b = buf(&["tr", "ue"]);
        b.expand().unwrap();
        assert_eq!(b.match_prefix("true"), PrefixMatch::Partial);
        b.expand().unwrap();
        assert_eq!(b.match_prefix("true"), PrefixMatch::Full);
        assert_eq!(b.match_prefix("null"), PrefixMatch::No);
    }

    #[test]
    fn scan_string_body_stops_on_delimiters() {
        let mut b = buf(&["abc\\n\"rest"]);
        b.expand().unwrap();
        assert_eq!(b.scan_string_body(), (3, ScanStop::Backslash));
        b.advance(5);
        assert_eq!(b.scan_string_body(), (0, ScanStop::Quote));
    }

    #[test]
    fn scan_string_body_rejects_controls() {
        let mut b = buf(&["ab\u{1}"]);
        b.expand().unwrap();
        assert_eq!(b.scan_string_body(), (2, ScanStop::Control('\u{1}')));
    }

    #[test]
    fn expand_errors_when_content_expected() {
        let mut b = buf(&[]);
        assert_eq!(b.expand(), Err(ParseError::UnexpectedEndOfContent));
        let mut b = buf(&[]);
        b.set_more_content_expected(false);
        assert_eq!(b.expand(), Ok(false));
    }

    #[test]
    fn end_of_content_tolerates_whitespace_chunks() {
        let mut b = buf(&["  \n", "\t ", ""]);
        assert!(b.expect_end_of_content().is_ok());

        let mut b = buf(&[" ", "x"]);
        assert!(matches!(
            b.expect_end_of_content(),
            Err(ParseError::TrailingContent { .. })
        ));
    }

    #[test]
    fn commit_compacts_consumed_prefix() {
        let mut b = buf(&["hello"]);
        b.expand().unwrap();
        b.advance(4);
        b.commit();
        assert_eq!(b.len(), 1);
        assert_eq!(b.peek(0), Some('o'));
    }
}
