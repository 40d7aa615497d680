//! The incremental value builder.
//!
//! `TreeBuilder` consumes tokens synchronously from the tokenizer and keeps
//! the growing top-level value up to date in place. It maintains one frame
//! per value under construction and a `progressed` flag the driver uses to
//! decide when the consumer should see a fresh snapshot.
//!
//! The tree is owned by a boxed root; container frames hold raw pointers to
//! their container value inside it. This is sound for the same reason the
//! classic zipper is: tokens only ever mutate the container of the *top*
//! frame, so a pointer held by a lower frame cannot be invalidated while it
//! is live — nothing reallocates an ancestor's storage until every frame
//! above it has been popped.
use alloc::{boxed::Box, string::String, vec, vec::Vec};
use core::ptr::NonNull;

use crate::{
    error::InvariantError,
    options::{CompleteCallback, ParserOptions},
    path::{Path, PathSegment},
    token::{Token, TokenSink},
    value::{Map, Value},
};

/// One frame per value currently being built.
#[derive(Debug)]
pub(crate) enum Frame {
    /// Bottom-only, present until the first value token arrives.
    Initial,
    /// A string body (value or property name); holds the decoded text so far.
    Text { buf: String },
    /// Appending into this array. `len` mirrors the array length for path
    /// reporting.
    Array { target: NonNull<Value>, len: usize },
    /// Between properties: expecting the next key or the closing brace.
    /// `last_key` is the most recent key, kept for path reporting; `pending`
    /// is that key's completed value, held back from the completion callback
    /// until the key is known not to be re-assigned.
    ObjectKey {
        last_key: Option<String>,
        pending: Option<NonNull<Value>>,
        target: NonNull<Value>,
    },
    /// Key complete; the next tokens build its value.
    ObjectValue { key: String, target: NonNull<Value> },
}

impl Frame {
    /// The segment this frame contributes to the path of the value currently
    /// completing beneath it. String and bottom frames contribute nothing.
    pub(crate) fn to_path_segment(&self) -> Option<PathSegment> {
        match self {
            Frame::Initial | Frame::Text { .. } => None,
            Frame::Array { len, .. } => Some(PathSegment::Index(len.saturating_sub(1))),
            Frame::ObjectKey { last_key, .. } => {
                Some(PathSegment::Key(last_key.clone().unwrap_or_default()))
            }
            Frame::ObjectValue { key, .. } => Some(PathSegment::Key(key.clone())),
        }
    }
}

pub(crate) struct TreeBuilder {
    root: Option<Box<Value>>,
    frames: Vec<Frame>,
    progressed: bool,
    on_complete: Option<CompleteCallback>,
}

impl TreeBuilder {
    pub(crate) fn new(options: ParserOptions) -> Self {
        Self {
            root: None,
            frames: vec![Frame::Initial],
            progressed: false,
            on_complete: options.on_complete,
        }
    }

    /// True once the top-level value is fully built.
    pub(crate) fn is_done(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn progressed(&self) -> bool {
        self.progressed
    }

    pub(crate) fn clear_progress(&mut self) {
        self.progressed = false;
    }

    /// The top-level value as built so far.
    pub(crate) fn root(&self) -> Option<&Value> {
        self.root.as_deref()
    }

    /// Installs `value` at the current insertion point and returns a pointer
    /// to it inside the tree. Consumes the `Initial` frame if this is the
    /// first value.
    fn place(&mut self, value: Value) -> Result<NonNull<Value>, InvariantError> {
        match self.frames.last_mut() {
            None => Err(InvariantError::NoFrame),
            Some(Frame::Initial) => {
                self.frames.pop();
                let root = self.root.insert(Box::new(value));
                Ok(NonNull::from(&mut **root))
            }
            Some(Frame::Array { target, len }) => {
                let Value::Array(arr) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedArray);
                };
                arr.push(value);
                *len = arr.len();
                Ok(NonNull::from(arr.last_mut().expect("just pushed")))
            }
            Some(Frame::ObjectValue { key, target }) => {
                let Value::Object(map) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedObject);
                };
                // Last key wins; IndexMap keeps the original position.
                map.insert(key.clone(), value);
                let slot = map.get_mut(key.as_str()).expect("just inserted");
                Ok(NonNull::from(slot))
            }
            Some(_) => Err(InvariantError::UnexpectedToken),
        }
    }

    /// Pointer to the value that was just finished at the current insertion
    /// point (used when a string value closes).
    fn tail_value(&mut self) -> Result<NonNull<Value>, InvariantError> {
        match self.frames.last_mut() {
            None => {
                let root = self.root.as_deref_mut().ok_or(InvariantError::NoFrame)?;
                Ok(NonNull::from(root))
            }
            Some(Frame::Array { target, .. }) => {
                let Value::Array(arr) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedArray);
                };
                arr.last_mut()
                    .map(NonNull::from)
                    .ok_or(InvariantError::UnexpectedToken)
            }
            Some(Frame::ObjectValue { key, target }) => {
                let Value::Object(map) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedObject);
                };
                map.get_mut(key.as_str())
                    .map(NonNull::from)
                    .ok_or(InvariantError::UnexpectedToken)
            }
            Some(_) => Err(InvariantError::UnexpectedToken),
        }
    }

    /// Reports a value as complete. The callback sees the path derived from
    /// the live frame stack at this moment.
    fn notify(&mut self, value: NonNull<Value>) {
        if let Some(mut cb) = self.on_complete.take() {
            let path = Path::new(&self.frames);
            cb(unsafe { value.as_ref() }, &path);
            self.on_complete = Some(cb);
        }
    }

    /// A value at the current insertion point finished. Object members are
    /// not reported yet: a later duplicate key may override them, in which
    /// case the replaced value is never reported complete. The member is held
    /// in the parent frame and resolved when the next key (or the closing
    /// brace) arrives.
    fn finish_value(&mut self, value: NonNull<Value>) {
        if matches!(self.frames.last(), Some(Frame::ObjectValue { .. })) {
            let Some(Frame::ObjectValue { key, target }) = self.frames.pop() else {
                unreachable!()
            };
            self.frames.push(Frame::ObjectKey {
                last_key: Some(key),
                pending: Some(value),
                target,
            });
        } else {
            self.notify(value);
        }
    }

    fn leaf(&mut self, value: Value) -> Result<(), InvariantError> {
        let ptr = self.place(value)?;
        self.progressed = true;
        self.finish_value(ptr);
        Ok(())
    }

    fn container_start(&mut self, empty: Value) -> Result<(), InvariantError> {
        let is_object = empty.is_object();
        let target = self.place(empty)?;
        self.frames.push(if is_object {
            Frame::ObjectKey {
                last_key: None,
                pending: None,
                target,
            }
        } else {
            Frame::Array { target, len: 0 }
        });
        self.progressed = true;
        Ok(())
    }

    fn string_start(&mut self) -> Result<(), InvariantError> {
        if matches!(self.frames.last(), Some(Frame::ObjectKey { .. })) {
            // A property name: not a value, nothing visible changes yet.
            self.frames.push(Frame::Text { buf: String::new() });
            return Ok(());
        }
        self.place(Value::String(String::new()))?;
        self.frames.push(Frame::Text { buf: String::new() });
        self.progressed = true;
        Ok(())
    }

    fn string_middle(&mut self, fragment: &str) -> Result<(), InvariantError> {
        let Some(Frame::Text { buf }) = self.frames.last_mut() else {
            return Err(InvariantError::UnexpectedToken);
        };
        buf.push_str(fragment);

        // Mirror the growth into the tree so the consumer's snapshot shows
        // the partial string. Keys have no tree location yet.
        let parent = self.frames.len().checked_sub(2);
        match parent.map(|i| &mut self.frames[i]) {
            None => {
                let Some(Value::String(text)) = self.root.as_deref_mut() else {
                    return Err(InvariantError::ExpectedString);
                };
                text.push_str(fragment);
                self.progressed = true;
            }
            Some(Frame::Array { target, .. }) => {
                let Value::Array(arr) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedArray);
                };
                let Some(Value::String(text)) = arr.last_mut() else {
                    return Err(InvariantError::ExpectedString);
                };
                text.push_str(fragment);
                self.progressed = true;
            }
            Some(Frame::ObjectValue { key, target }) => {
                let Value::Object(map) = (unsafe { target.as_mut() }) else {
                    return Err(InvariantError::ExpectedObject);
                };
                let Some(Value::String(text)) = map.get_mut(key.as_str()) else {
                    return Err(InvariantError::ExpectedString);
                };
                text.push_str(fragment);
                self.progressed = true;
            }
            Some(Frame::ObjectKey { .. }) => {}
            Some(_) => return Err(InvariantError::UnexpectedToken),
        }
        Ok(())
    }

    fn string_end(&mut self) -> Result<(), InvariantError> {
        let Some(Frame::Text { buf }) = self.frames.pop() else {
            return Err(InvariantError::UnexpectedToken);
        };

        if matches!(self.frames.last(), Some(Frame::ObjectKey { .. })) {
            // A property name completed. Resolve the previous member's held
            // callback: fired if this is a different key, dropped if the key
            // is being re-assigned. Fire before the frame transition so the
            // path still names the previous key.
            let fire = match self.frames.last_mut() {
                Some(Frame::ObjectKey {
                    last_key, pending, ..
                }) => {
                    let overridden = last_key.as_deref() == Some(buf.as_str());
                    let pend = pending.take();
                    if overridden { None } else { pend }
                }
                _ => unreachable!(),
            };
            if let Some(ptr) = fire {
                self.notify(ptr);
            }
            let Some(Frame::ObjectKey { target, .. }) = self.frames.pop() else {
                unreachable!()
            };
            self.frames.push(Frame::ObjectValue { key: buf, target });
            return Ok(());
        }

        // A string value completed.
        let ptr = self.tail_value()?;
        self.finish_value(ptr);
        Ok(())
    }

    fn array_end(&mut self) -> Result<(), InvariantError> {
        match self.frames.pop() {
            Some(Frame::Array { target, .. }) => {
                self.finish_value(target);
                Ok(())
            }
            _ => Err(InvariantError::UnexpectedToken),
        }
    }

    fn object_end(&mut self) -> Result<(), InvariantError> {
        // The last member's held callback fires first, while its frame is
        // still on the stack, then the object itself.
        let pend = match self.frames.last_mut() {
            Some(Frame::ObjectKey { pending, .. }) => pending.take(),
            _ => return Err(InvariantError::UnexpectedToken),
        };
        if let Some(ptr) = pend {
            self.notify(ptr);
        }
        let Some(Frame::ObjectKey { target, .. }) = self.frames.pop() else {
            unreachable!()
        };
        self.finish_value(target);
        Ok(())
    }
}

impl TokenSink for TreeBuilder {
    type Error = InvariantError;

    fn on_token(&mut self, token: Token) -> Result<(), Self::Error> {
        match token {
            Token::Null => self.leaf(Value::Null),
            Token::Boolean(b) => self.leaf(Value::Boolean(b)),
            Token::Number(n) => self.leaf(Value::Number(n)),
            Token::StringStart => self.string_start(),
            Token::StringMiddle(s) => self.string_middle(&s),
            Token::StringEnd => self.string_end(),
            Token::ArrayStart => self.container_start(Value::Array(Vec::new())),
            Token::ObjectStart => self.container_start(Value::Object(Map::default())),
            Token::ArrayEnd => self.array_end(),
            Token::ObjectEnd => self.object_end(),
        }
    }
}
