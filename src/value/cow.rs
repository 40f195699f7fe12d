use std::ops::Deref;

use crate::value::Value;

/// A clone-on-write [`Value`] used during rendering.
///
/// Borrowed where the context allows it, owned where a value had to be
/// constructed, e.g. a literal or a cloned edge of an owned scope.
#[derive(Clone)]
pub enum ValueCow<'a> {
    Borrowed(&'a Value),
    Owned(Value),
}

impl Deref for ValueCow<'_> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(v) => v,
            Self::Owned(v) => v,
        }
    }
}
