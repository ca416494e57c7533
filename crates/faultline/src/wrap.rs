// Decoration helpers
// Transparent wrapping, multi-cause decoration and stack trace enhancement

use crate::builder::ErrorBuilder;
use crate::common::{DECORATE_WRAPPER, STACK_TRACE_WRAPPER, SYNTHETIC_WRAP};
use crate::conversion::IntoOptionalCause;
use crate::error::{Cause, Error};

/// Add context to `cause` without changing how it classifies.
///
/// The result is transparent: type, trait and property queries answer for
/// the cause.
pub fn decorate(cause: impl Into<Cause>, message: impl Into<String>) -> Error {
    ErrorBuilder::new(&DECORATE_WRAPPER)
        .with_message(message)
        .with_cause(cause)
        .transparent()
        .create()
}

/// Decorate several errors at once.
///
/// The first present cause becomes the cause; the rest are attached as
/// underlying errors. Returns `None` if no cause is present. When all causes
/// report the same type the result is transparent and reports that type,
/// otherwise it is an opaque `synthetic.wrap`.
pub fn decorate_many<I>(message: impl Into<String>, causes: I) -> Option<Error>
where
    I: IntoIterator,
    I::Item: IntoOptionalCause,
{
    let mut causes = causes
        .into_iter()
        .filter_map(IntoOptionalCause::into_optional_cause);
    let first = causes.next()?;
    let rest: Vec<Cause> = causes.collect();

    let builder = if all_of_same_type(&first, &rest) {
        ErrorBuilder::new(&DECORATE_WRAPPER).transparent()
    } else {
        ErrorBuilder::new(&SYNTHETIC_WRAP).opaque()
    };

    Some(
        builder
            .with_message(message)
            .with_cause(first)
            .with_underlying_errors(rest)
            .create(),
    )
}

fn all_of_same_type(first: &Cause, rest: &[Cause]) -> bool {
    if rest.is_empty() {
        return true;
    }

    let Some(first) = first.as_error() else {
        return false;
    };
    let expected = first.error_type();
    rest.iter()
        .all(|cause| cause.as_error().is_some_and(|err| err.error_type() == expected))
}

/// Record the current call site in the stack trace of `cause`.
///
/// Use this right after an error has crossed a thread or task boundary, on
/// the receiving side. The trace of the result shows the receiving stack,
/// then the original one; frames the two share are printed once.
#[inline(never)]
pub fn enhance_stack_trace(cause: impl Into<Cause>, message: impl Into<String>) -> Error {
    ErrorBuilder::new(&STACK_TRACE_WRAPPER)
        .with_message(message)
        .with_cause(cause)
        .transparent()
        .enhance_stack_trace()
        .create()
}

/// Return `cause` if it is a typed error with a stack trace, otherwise wrap it
/// transparently in one with a trace of the current stack.
#[inline(never)]
pub fn ensure_stack_trace(cause: impl Into<Cause>) -> Error {
    let cause = cause.into();
    if let Cause::Error(err) = &cause {
        if err.stack_trace().is_some() {
            return err.clone();
        }
    }

    ErrorBuilder::new(&STACK_TRACE_WRAPPER)
        .with_cause(cause)
        .transparent()
        .enhance_stack_trace()
        .create()
}
