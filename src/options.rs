use alloc::boxed::Box;

use crate::{path::Path, value::Value};

/// Callback invoked once per subvalue at the moment it becomes final:
/// scalars on their token, strings on their closing quote, containers on
/// their closing bracket. Children are reported before parents, in stream
/// order. A value overridden by a later duplicate key is never reported.
///
/// The [`Path`] argument is a lazy view over live parser state and must not
/// be retained; call [`Path::segments`] during the callback if the location
/// is needed later.
pub type CompleteCallback = Box<dyn FnMut(&Value, &Path<'_>)>;

/// Configuration options for a parse.
///
/// # Examples
///
/// ```
/// use jsonrill::{ParserOptions, parse_with_options};
///
/// let options = ParserOptions {
///     on_complete: Some(Box::new(|value, path| {
///         println!("{:?} done at {:?}", value, path.segments());
///     })),
/// };
/// let values = parse_with_options(["[1,2]"], options);
/// assert_eq!(values.count(), 3);
/// ```
#[derive(Default)]
pub struct ParserOptions {
    /// Completion callback; `None` disables completion reporting.
    pub on_complete: Option<CompleteCallback>,
}

impl core::fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParserOptions")
            .field(
                "on_complete",
                if self.on_complete.is_some() {
                    &"Some(..)"
                } else {
                    &"None"
                },
            )
            .finish()
    }
}
