// Panic bridge
// Unwinding with typed errors and recovering them from panic payloads

use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::builder::{ErrorBuilder, StackTraceMode};
use crate::common::{INTERNAL_ERROR, PANIC_WRAPPER};
use crate::error::{Cause, Error};

/// Unwind with `err` as the panic payload.
///
/// The call site is added to the stack trace of `err` before unwinding, so
/// whoever recovers the error sees where the unwind began.
#[inline(never)]
pub fn raise(err: impl Into<Cause>) -> ! {
    let payload = ErrorBuilder::new(&PANIC_WRAPPER)
        .with_cause(err)
        .transparent()
        .enhance_stack_trace()
        .create();

    debug!(error = %payload, "Raising error as panic");
    panic::panic_any(payload)
}

/// Return the value of `result`, or [`raise`] its error.
#[inline(never)]
pub fn unwrap_or_raise<T, E: Into<Cause>>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => raise(err),
    }
}

/// Recover an error from a panic payload.
///
/// Payloads raised by [`raise`] come back as raised, stack trace included.
/// String messages and boxed errors are wrapped as `common.internal_error`
/// without a stack trace of their own; a borrowed boxed error only lends its
/// message. Any other payload yields `None`.
pub fn error_from_panic(payload: &(dyn Any + Send)) -> Option<Error> {
    let recovered = if let Some(err) = payload.downcast_ref::<Error>() {
        err.clone()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        internal_error(message.clone())
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        internal_error(*message)
    } else if let Some(err) = payload.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
        internal_error(err.to_string())
    } else {
        return None;
    };

    debug!(error = %recovered, "Recovered error from panic payload");
    Some(recovered)
}

fn internal_error(message: impl Into<String>) -> Error {
    ErrorBuilder::new(&INTERNAL_ERROR)
        .with_message(message)
        .stack_trace_mode(StackTraceMode::Omit)
        .create()
}

/// Run `f`, turning a panic into an error.
///
/// Unlike [`error_from_panic`], this always produces an error: unknown
/// payloads become a `common.internal_error`. A boxed error payload is kept
/// as the cause, so `source()` and [`Error::find`] still reach it. `f` is
/// treated as unwind safe; do not observe state it may have left
/// half-updated.
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, Error> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(recover_owned)
}

fn recover_owned(payload: Box<dyn Any + Send>) -> Error {
    let payload = match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
        Ok(boxed) => {
            let recovered = match Cause::from_boxed(*boxed) {
                Cause::Error(err) => err,
                foreign => ErrorBuilder::new(&INTERNAL_ERROR)
                    .with_cause(foreign)
                    .stack_trace_mode(StackTraceMode::Omit)
                    .create(),
            };
            debug!(error = %recovered, "Recovered boxed error from panic payload");
            return recovered;
        }
        Err(payload) => payload,
    };

    error_from_panic(payload.as_ref())
        .unwrap_or_else(|| internal_error("panic with unrecognised payload"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespace;

    #[test]
    fn string_payloads_become_internal_errors() {
        let err = catch(|| panic!("plain {}", 42)).unwrap_err();
        assert!(err.is_of_type(&INTERNAL_ERROR));
        assert_eq!(err.to_string(), "common.internal_error: plain 42");
        assert!(err.stack_trace().is_none());

        let err = catch(|| panic!("static")).unwrap_err();
        assert_eq!(err.message(), "static");
    }

    #[test]
    fn unknown_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(17u8);
        assert!(error_from_panic(payload.as_ref()).is_none());

        let err = catch(|| panic::panic_any(17u8)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "common.internal_error: panic with unrecognised payload"
        );
    }

    #[test]
    fn raised_errors_keep_their_type() {
        let kind = Namespace::new("panic_unit", &[]).new_type("kind", &[]);
        let err = catch(|| raise(kind.new("bad"))).unwrap_err();
        assert!(err.is_of_type(&kind));
        assert_eq!(err.to_string(), "panic_unit.kind: bad");
        assert!(err.stack_trace().unwrap().cause().is_some());
    }

    #[derive(Debug)]
    struct Disk;

    impl std::fmt::Display for Disk {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("disk on fire")
        }
    }

    impl StdError for Disk {}

    #[test]
    fn boxed_error_payloads_stay_reachable() {
        let err = catch(|| {
            let boxed: Box<dyn StdError + Send + Sync> = Box::new(Disk);
            panic::panic_any(boxed)
        })
        .unwrap_err();

        assert!(err.is_of_type(&INTERNAL_ERROR));
        assert_eq!(err.to_string(), "common.internal_error: disk on fire");
        assert!(err.find::<Disk>().is_some());
        assert!(err.source().is_some());
        assert!(err.stack_trace().is_none());
    }

    #[test]
    fn ok_passes_through() {
        let value = catch(|| unwrap_or_raise(Ok::<_, Error>(5))).unwrap();
        assert_eq!(value, 5);
    }
}
