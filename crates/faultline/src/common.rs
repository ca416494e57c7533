// Common error taxonomy
// General purpose error types ready for use, plus internal synthetic types

use once_cell::sync::Lazy;

use crate::modifier::TypeModifier;
use crate::namespace::Namespace;
use crate::traits::TIMEOUT;
use crate::types::ErrorType;

/// Namespace of general purpose errors.
///
/// These types suit errors that callers are not expected to handle by type.
/// Where handling is needed, prefer a dedicated type or a trait check.
pub static COMMON_ERRORS: Lazy<Namespace> = Lazy::new(|| Namespace::new("common", &[]));

pub static ILLEGAL_ARGUMENT: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("illegal_argument", &[]));
pub static ILLEGAL_STATE: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("illegal_state", &[]));
pub static ILLEGAL_FORMAT: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("illegal_format", &[]));
pub static INITIALIZATION_FAILED: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("initialization_failed", &[]));
pub static DATA_UNAVAILABLE: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("data_unavailable", &[]));
pub static UNSUPPORTED_OPERATION: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("unsupported_operation", &[]));
pub static REJECTED_OPERATION: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("rejected_operation", &[]));
pub static INTERRUPTED: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("interrupted", &[]));
pub static ASSERTION_FAILED: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("assertion_failed", &[]));
pub static INTERNAL_ERROR: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("internal_error", &[]));
pub static EXTERNAL_ERROR: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("external_error", &[]));
pub static CONCURRENT_UPDATE: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("concurrent_update", &[]));
pub static TIMEOUT_ELAPSED: Lazy<ErrorType> =
    Lazy::new(|| COMMON_ERRORS.new_type("timeout", &[&TIMEOUT]));
pub static NOT_IMPLEMENTED: Lazy<ErrorType> =
    Lazy::new(|| UNSUPPORTED_OPERATION.new_subtype("not_implemented", &[]));
pub static UNSUPPORTED_VERSION: Lazy<ErrorType> =
    Lazy::new(|| UNSUPPORTED_OPERATION.new_subtype("version", &[]));

static SYNTHETIC_ERRORS: Lazy<Namespace> = Lazy::new(|| Namespace::new("synthetic", &[]));

/// Type reported by a transparent chain that ends without a typed error.
pub static FOREIGN_TYPE: Lazy<ErrorType> =
    Lazy::new(|| SYNTHETIC_ERRORS.new_type("foreign", &[]));

/// Owner of multi-cause decorations whose causes differ in type.
pub(crate) static SYNTHETIC_WRAP: Lazy<ErrorType> =
    Lazy::new(|| SYNTHETIC_ERRORS.new_type("wrap", &[]));

pub(crate) static DECORATE_WRAPPER: Lazy<ErrorType> =
    Lazy::new(|| transparent_synthetic("decorate"));

pub(crate) static STACK_TRACE_WRAPPER: Lazy<ErrorType> =
    Lazy::new(|| transparent_synthetic("stacktrace"));

pub(crate) static PANIC_WRAPPER: Lazy<ErrorType> =
    Lazy::new(|| transparent_synthetic("panic"));

fn transparent_synthetic(label: &str) -> ErrorType {
    SYNTHETIC_ERRORS
        .type_builder(label)
        .apply_modifiers(&[TypeModifier::Transparent])
        .build()
}

/// Create every built-in namespace and type.
pub(crate) fn init() {
    for error_type in [
        &ILLEGAL_ARGUMENT,
        &ILLEGAL_STATE,
        &ILLEGAL_FORMAT,
        &INITIALIZATION_FAILED,
        &DATA_UNAVAILABLE,
        &UNSUPPORTED_OPERATION,
        &REJECTED_OPERATION,
        &INTERRUPTED,
        &ASSERTION_FAILED,
        &INTERNAL_ERROR,
        &EXTERNAL_ERROR,
        &CONCURRENT_UPDATE,
        &TIMEOUT_ELAPSED,
        &NOT_IMPLEMENTED,
        &UNSUPPORTED_VERSION,
        &FOREIGN_TYPE,
        &SYNTHETIC_WRAP,
        &DECORATE_WRAPPER,
        &STACK_TRACE_WRAPPER,
        &PANIC_WRAPPER,
    ] {
        Lazy::force(error_type);
    }
}
