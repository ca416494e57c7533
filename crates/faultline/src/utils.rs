// Error utilities
// Filtering errors by type or trait and naming them

use std::error::Error as StdError;

use crate::common::FOREIGN_TYPE;
use crate::conversion::cast;
use crate::traits::Trait;
use crate::types::ErrorType;

/// Drop `err` if it is of any of `types`, otherwise hand it back.
pub fn ignore<E: StdError + 'static>(err: E, types: &[&ErrorType]) -> Option<E> {
    let ignored = cast(&err).is_some_and(|typed| types.iter().any(|t| typed.is_of_type(t)));
    (!ignored).then_some(err)
}

/// Drop `err` if it has any of `traits`, otherwise hand it back.
pub fn ignore_with_trait<E: StdError + 'static>(err: E, traits: &[&Trait]) -> Option<E> {
    let ignored = cast(&err).is_some_and(|typed| traits.iter().any(|t| typed.has_trait(t)));
    (!ignored).then_some(err)
}

/// Full name of the type `err` reports, or an empty string for errors that
/// have no type of their own.
pub fn type_name(err: &(dyn StdError + 'static)) -> String {
    match cast(err) {
        Some(typed) if typed.error_type() != &*FOREIGN_TYPE => typed.error_type().full_name().to_string(),
        _ => String::new(),
    }
}
