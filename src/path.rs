//! Paths to values inside the document under construction.
//!
//! A [`Path`] is handed to the completion callback (see
//! [`ParserOptions::on_complete`](crate::ParserOptions)) and describes where
//! the newly completed value sits in the top-level value. It is a lazy view
//! over the builder's live frame stack: [`Path::segments`] materializes the
//! segments at call time, and the view must not be retained past the callback.
use alloc::{string::String, vec::Vec};

use crate::builder::Frame;

/// One step in a path: an object key or an array index.
///
/// # Examples
///
/// ```
/// use jsonrill::PathSegment;
///
/// let key = PathSegment::Key("foo".to_string());
/// assert_eq!(key.as_key(), Some("foo"));
///
/// let idx = PathSegment::Index(3);
/// assert_eq!(idx.as_index(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl PathSegment {
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(k) = self {
            Some(k)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        if let Self::Index(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

/// Lazy view of the path to the value just reported complete.
///
/// Borrowed from the parser; valid only for the duration of the callback
/// invocation. The root value has an empty path.
#[derive(Debug)]
pub struct Path<'a> {
    frames: &'a [Frame],
}

impl<'a> Path<'a> {
    pub(crate) fn new(frames: &'a [Frame]) -> Self {
        Self { frames }
    }

    /// Materializes the path segments, root-first.
    ///
    /// Array frames contribute their current tail index and object frames
    /// their current key, so the result is only meaningful while the callback
    /// that received this `Path` is running.
    #[must_use]
    pub fn segments(&self) -> Vec<PathSegment> {
        self.frames
            .iter()
            .filter_map(Frame::to_path_segment)
            .collect()
    }
}
