// Interop with std errors
// Free-function queries over any std error and conversions into causes

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::{Cause, Error};
use crate::property::Property;
use crate::traits::Trait;
use crate::types::ErrorType;

/// Deepest `source()` chain searched for a typed error.
pub(crate) const MAX_CAST_DEPTH: usize = 64;

/// Find the typed error in `err`.
///
/// `err` itself is checked first, then its `source()` chain, so a foreign
/// error that wraps a typed one is seen through.
pub fn cast<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
    let mut current = Some(err);
    for _ in 0..MAX_CAST_DEPTH {
        let candidate = current?;
        if let Some(typed) = candidate.downcast_ref::<Error>() {
            return Some(typed);
        }
        current = candidate.source();
    }
    None
}

/// Type check for any std error. Errors that are not typed are of no type.
pub fn is_of_type(err: &(dyn StdError + 'static), error_type: &ErrorType) -> bool {
    cast(err).is_some_and(|typed| typed.is_of_type(error_type))
}

/// Trait check for any std error.
pub fn has_trait(err: &(dyn StdError + 'static), key: &Trait) -> bool {
    cast(err).is_some_and(|typed| typed.has_trait(key))
}

/// Property lookup for any std error.
pub fn extract_property<'a, T: Any + Send + Sync>(
    err: &'a (dyn StdError + 'static),
    key: &Property<T>,
) -> Option<&'a T> {
    cast(err)?.property(key)
}

/// Values that may or may not carry a cause, for [`crate::decorate_many`].
pub trait IntoOptionalCause {
    fn into_optional_cause(self) -> Option<Cause>;
}

impl IntoOptionalCause for Cause {
    fn into_optional_cause(self) -> Option<Cause> {
        Some(self)
    }
}

impl IntoOptionalCause for Error {
    fn into_optional_cause(self) -> Option<Cause> {
        Some(Cause::Error(self))
    }
}

impl IntoOptionalCause for Option<Cause> {
    fn into_optional_cause(self) -> Option<Cause> {
        self
    }
}

impl IntoOptionalCause for Option<Error> {
    fn into_optional_cause(self) -> Option<Cause> {
        self.map(Cause::Error)
    }
}

impl Cause {
    /// Take over an `anyhow::Error`, keeping a typed error typed.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(typed) => Cause::Error(typed),
            Err(other) => {
                let boxed: Box<dyn StdError + Send + Sync + 'static> = other.into();
                Cause::Foreign(Arc::from(boxed))
            }
        }
    }
}
