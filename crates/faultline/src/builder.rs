// Error builder
// Decides opacity, stack trace ownership and underlying errors for a new error

use std::sync::Arc;

use crate::error::{Cause, Error, ErrorInner};
use crate::property::PropertyMap;
use crate::stacktrace::StackTrace;
use crate::types::ErrorType;

/// How a new error obtains its stack trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackTraceMode {
    /// Capture a fresh trace.
    Collect,
    /// No trace at all.
    Omit,
    /// Share the cause's trace if it has one, otherwise go without.
    BorrowOnly,
    /// Share the cause's trace if it has one, otherwise capture.
    BorrowOrCollect,
    /// Capture a fresh trace and link it to the cause's trace.
    Enhance,
}

/// Builder for errors that need more than [`ErrorType::new`] and
/// [`ErrorType::wrap`] offer.
///
/// ```
/// use faultline::{ErrorBuilder, common::ILLEGAL_STATE};
///
/// let err = ErrorBuilder::new(&ILLEGAL_STATE)
///     .with_message("bad state")
///     .with_cause(std::fmt::Error)
///     .transparent()
///     .create();
/// assert_eq!(err.to_string(), "bad state, cause: an error occurred when formatting an argument");
/// ```
#[must_use]
pub struct ErrorBuilder {
    error_type: ErrorType,
    message: String,
    cause: Option<Cause>,
    underlying: Vec<Cause>,
    mode: StackTraceMode,
    transparent: bool,
}

impl ErrorBuilder {
    pub fn new(error_type: &ErrorType) -> Self {
        let modifiers = error_type.modifiers();
        let mode = if modifiers.collect_stack_trace() {
            StackTraceMode::Collect
        } else {
            StackTraceMode::Omit
        };

        Self {
            error_type: error_type.clone(),
            message: String::new(),
            cause: None,
            underlying: Vec::new(),
            mode,
            transparent: modifiers.transparent(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the cause. A typed cause lends its stack trace to the new error
    /// instead of a fresh capture.
    pub fn with_cause(self, cause: impl Into<Cause>) -> Self {
        self.with_optional_cause(Some(cause.into()))
    }

    /// Set the cause if there is one; `None` leaves the builder unchanged.
    pub fn with_optional_cause(mut self, cause: Option<Cause>) -> Self {
        let Some(cause) = cause else {
            return self;
        };

        if cause.as_error().is_some() {
            self.mode = if self.error_type.modifiers().collect_stack_trace() {
                StackTraceMode::BorrowOrCollect
            } else {
                StackTraceMode::BorrowOnly
            };
        }
        self.cause = Some(cause);
        self
    }

    /// Attach display-only errors.
    pub fn with_underlying_errors<I>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = Cause>,
    {
        self.underlying.extend(errors);
        self
    }

    /// Let type, trait and property queries through to the cause.
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Hide the cause from type, trait and property queries.
    pub fn opaque(mut self) -> Self {
        self.transparent = false;
        self
    }

    /// Capture a fresh trace even if the type omits traces or the cause has one.
    pub fn with_stack_trace(self) -> Self {
        self.stack_trace_mode(StackTraceMode::Collect)
    }

    /// Capture the current stack and link it to the cause's trace.
    pub fn enhance_stack_trace(self) -> Self {
        self.stack_trace_mode(StackTraceMode::Enhance)
    }

    pub fn stack_trace_mode(mut self, mode: StackTraceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the error.
    #[inline(never)]
    pub fn create(self) -> Error {
        let stack_trace = self.assemble_stack_trace();
        Error::from_inner(ErrorInner {
            message: self.message,
            error_type: self.error_type,
            cause: self.cause,
            underlying: self.underlying,
            stack_trace,
            transparent: self.transparent,
            properties: PropertyMap::default(),
        })
    }

    fn borrowed_stack_trace(&self) -> Option<Arc<StackTrace>> {
        self.cause.as_ref().and_then(Cause::stack_trace)
    }

    fn assemble_stack_trace(&self) -> Option<Arc<StackTrace>> {
        match self.mode {
            StackTraceMode::Collect => StackTrace::capture(),
            StackTraceMode::Omit => None,
            StackTraceMode::BorrowOnly => self.borrowed_stack_trace(),
            StackTraceMode::BorrowOrCollect => match self.borrowed_stack_trace() {
                Some(borrowed) => Some(borrowed),
                None => StackTrace::capture(),
            },
            StackTraceMode::Enhance => StackTrace::enhance(self.borrowed_stack_trace()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::TypeModifier;
    use crate::namespace::Namespace;
    use std::fmt;

    #[derive(Debug)]
    struct Naked;

    impl fmt::Display for Naked {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("naked error")
        }
    }

    impl std::error::Error for Naked {}

    struct Types {
        plain: ErrorType,
        transparent: ErrorType,
        silent: ErrorType,
        silent_transparent: ErrorType,
    }

    fn types() -> Types {
        let ns = Namespace::new("builder", &[]);
        let plain = ns.new_type("plain", &[]);
        let transparent = ns
            .type_builder("transparent")
            .apply_modifiers(&[TypeModifier::Transparent])
            .build();
        let silent = ns
            .type_builder("silent")
            .apply_modifiers(&[TypeModifier::OmitStackTrace])
            .build();
        let silent_transparent = ns
            .type_builder("silent_transparent")
            .apply_modifiers(&[TypeModifier::OmitStackTrace, TypeModifier::Transparent])
            .build();
        Types {
            plain,
            transparent,
            silent,
            silent_transparent,
        }
    }

    #[test]
    fn transparent_over_foreign_cause() {
        let t = types();
        let err = ErrorBuilder::new(&t.plain)
            .with_cause(Naked)
            .transparent()
            .create();
        assert!(!err.is_of_type(&t.plain));
        assert_ne!(err.error_type(), &t.plain);

        let err = ErrorBuilder::new(&t.transparent).with_cause(Naked).create();
        assert!(!err.is_of_type(&t.transparent));
        assert_ne!(err.error_type(), &t.transparent);
    }

    #[test]
    fn opaque_override() {
        let t = types();
        let cause = t.plain.new("inner");
        let err = ErrorBuilder::new(&t.transparent)
            .with_cause(cause)
            .opaque()
            .create();
        assert_eq!(err.error_type(), &t.transparent);
        assert_eq!(err.to_string(), "builder.transparent: builder.plain: inner");
    }

    #[inline(never)]
    fn traced_marker_frame() -> Error {
        types().plain.new_with_no_message()
    }

    #[test]
    fn silent_types_respect_omission() {
        let t = types();
        for wrapper in [&t.silent, &t.silent_transparent] {
            let naked = ErrorBuilder::new(wrapper).with_cause(Naked).create();
            assert!(naked.stack_trace().is_none());

            let untraced = ErrorBuilder::new(wrapper)
                .with_cause(t.silent.new_with_no_message())
                .create();
            assert!(untraced.stack_trace().is_none());

            let cause = traced_marker_frame();
            let borrowed = ErrorBuilder::new(wrapper).with_cause(cause.clone()).create();
            assert!(Arc::ptr_eq(
                &borrowed.shared_stack_trace().unwrap(),
                &cause.shared_stack_trace().unwrap()
            ));
            assert!(format!("{:#}", borrowed).contains("traced_marker_frame"));
        }
    }

    #[test]
    fn wrap_borrows_or_collects() {
        let t = types();
        let traced = t.plain.new("traced");
        let wrapped = t.plain.wrap(traced.clone(), "outer");
        assert!(Arc::ptr_eq(
            &wrapped.shared_stack_trace().unwrap(),
            &traced.shared_stack_trace().unwrap()
        ));

        let untraced = t.silent.new("untraced");
        assert!(t.plain.wrap(untraced, "outer").stack_trace().is_some());
        assert!(t.plain.wrap(Naked, "outer").stack_trace().is_some());
    }

    #[test]
    fn forced_modes() {
        let t = types();
        assert!(ErrorBuilder::new(&t.silent)
            .with_stack_trace()
            .create()
            .stack_trace()
            .is_some());

        let cause = t.plain.new("cause");
        let fresh = ErrorBuilder::new(&t.plain)
            .with_cause(cause.clone())
            .with_stack_trace()
            .create();
        assert!(!Arc::ptr_eq(
            &fresh.shared_stack_trace().unwrap(),
            &cause.shared_stack_trace().unwrap()
        ));

        let enhanced = ErrorBuilder::new(&t.plain)
            .with_cause(cause.clone())
            .enhance_stack_trace()
            .create();
        let trace = enhanced.stack_trace().unwrap();
        assert!(trace.cause().is_some());

        assert!(ErrorBuilder::new(&t.plain)
            .stack_trace_mode(StackTraceMode::Omit)
            .create()
            .stack_trace()
            .is_none());
    }

    #[test]
    fn underlying_errors_render() {
        let t = types();
        let err = ErrorBuilder::new(&t.plain)
            .with_message("main")
            .with_underlying_errors([Cause::from(Naked), Cause::from(t.silent.new("other"))])
            .create();
        assert_eq!(
            err.to_string(),
            "builder.plain: main (hidden: naked error, builder.silent: other)"
        );
    }
}
