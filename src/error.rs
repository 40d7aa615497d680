use alloc::string::String;

use thiserror::Error;

/// A terminal parse failure.
///
/// Surfaced once on the value stream's next pull; the stream yields nothing
/// further afterwards. Message strings are informational only and not part of
/// the stable contract; `line` and `column` are 1-based positions in the
/// concatenated input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Invalid character, escape, control code, or malformed number.
    #[error("{message} at {line}:{column}")]
    Lexical {
        message: String,
        line: usize,
        column: usize,
    },

    /// Token valid on its own but not in the current state: wrong closing
    /// bracket, missing colon or comma, and the like.
    #[error("{message} at {line}:{column}")]
    Structural {
        message: String,
        line: usize,
        column: usize,
    },

    /// The upstream chunk source ended while a value was still open.
    #[error("unexpected end of content")]
    UnexpectedEndOfContent,

    /// Non-whitespace input after the top-level value was closed.
    #[error("unexpected trailing content at {line}:{column}")]
    TrailingContent { line: usize, column: usize },

    /// An internal consistency check failed. Not recoverable; indicates a bug
    /// in the parser itself.
    #[error("internal invariant violated: {0}")]
    Internal(#[from] InvariantError),
}

/// Builder-side invariant breakage: the token stream and the value tree
/// disagreed about the shape of the current container.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("expected an array at the current frame")]
    ExpectedArray,
    #[error("expected an object at the current frame")]
    ExpectedObject,
    #[error("expected a string at the current frame")]
    ExpectedString,
    #[error("token arrived with no frame to receive it")]
    NoFrame,
    #[error("token not valid for the current frame")]
    UnexpectedToken,
}
