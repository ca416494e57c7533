// Error handling macros
// Shorthand for returning typed errors and discarding logged ones

/// Return early with a new error of the given type.
///
/// The error is converted with `Into`, so the enclosing function may return
/// `Result<_, faultline::Error>` or any error type that accepts it.
///
/// ```
/// use faultline::{bail, common::ILLEGAL_ARGUMENT};
///
/// fn check(n: i32) -> faultline::Result<i32> {
///     if n < 0 {
///         bail!(ILLEGAL_ARGUMENT, "negative input: {}", n);
///     }
///     Ok(n)
/// }
///
/// assert_eq!(check(-1).unwrap_err().to_string(), "common.illegal_argument: negative input: -1");
/// ```
#[macro_export]
macro_rules! bail {
    ($error_type:expr, $($arg:tt)+) => {
        return ::core::result::Result::Err(
            $crate::ErrorType::new(&$error_type, ::std::format!($($arg)+)).into(),
        )
    };
}

/// Return early with a new error of the given type unless a condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)+);
        }
    };
}

/// Convert a Result to an Option, logging the error if it exists
#[macro_export]
macro_rules! result_to_option {
    ($result:expr) => {
        match $result {
            Ok(val) => Some(val),
            Err(err) => {
                $crate::tracing::error!("Error: {}", err);
                None
            }
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(val) => Some(val),
            Err(err) => {
                $crate::tracing::error!("{}: {}", $message, err);
                None
            }
        }
    };
}
