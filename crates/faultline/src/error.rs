// Error values
// Immutable causal-chain nodes and the opacity-aware queries over them

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::common::FOREIGN_TYPE;
use crate::conversion::MAX_CAST_DEPTH;
use crate::property::{Property, PropertyMap};
use crate::stacktrace::StackTrace;
use crate::traits::Trait;
use crate::types::ErrorType;

/// What an error was caused by: another typed error, or any other error.
#[derive(Clone)]
pub enum Cause {
    Error(Error),
    Foreign(Arc<dyn StdError + Send + Sync + 'static>),
}

impl Cause {
    /// The typed error behind this cause.
    ///
    /// For a foreign cause, its `source()` chain is searched for a typed error.
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Cause::Error(err) => Some(err),
            Cause::Foreign(err) => crate::conversion::cast(err.as_ref()),
        }
    }

    pub fn as_std(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Error(err) => err,
            Cause::Foreign(err) => err.as_ref(),
        }
    }

    /// Wrap an already boxed error.
    pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match err.downcast::<Error>() {
            Ok(typed) => Cause::Error(*typed),
            Err(other) => Cause::Foreign(Arc::from(other)),
        }
    }

    pub(crate) fn stack_trace(&self) -> Option<Arc<StackTrace>> {
        self.as_error().and_then(Error::shared_stack_trace)
    }

    fn full_message(&self) -> String {
        match self {
            Cause::Error(err) => err.full_message(),
            Cause::Foreign(err) => err.to_string(),
        }
    }
}

impl<E> From<E> for Cause
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Cause::from_boxed(Box::new(err))
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(err) => fmt::Display::fmt(err, f),
            Cause::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(err) => fmt::Debug::fmt(err, f),
            Cause::Foreign(err) => fmt::Debug::fmt(err, f),
        }
    }
}

/// A typed error.
///
/// Errors are immutable and cheap to clone. Operations that look like
/// mutation, such as [`Error::with_property`], return a new error and leave
/// the receiver untouched.
///
/// `{}` renders the short form, `{:#}` and `{:?}` append the stack trace.
#[derive(Clone)]
pub struct Error(Arc<ErrorInner>);

#[derive(Clone)]
pub(crate) struct ErrorInner {
    pub(crate) message: String,
    pub(crate) error_type: ErrorType,
    pub(crate) cause: Option<Cause>,
    pub(crate) underlying: Vec<Cause>,
    pub(crate) stack_trace: Option<Arc<StackTrace>>,
    pub(crate) transparent: bool,
    pub(crate) properties: PropertyMap,
}

impl Error {
    pub(crate) fn from_inner(inner: ErrorInner) -> Self {
        Error(Arc::new(inner))
    }

    /// The message of this node only.
    pub fn message(&self) -> &str {
        &self.0.message
    }

    /// The immediate cause, without regard to opacity.
    pub fn cause(&self) -> Option<&Cause> {
        self.0.cause.as_ref()
    }

    /// Errors attached for display only.
    pub fn underlying_errors(&self) -> &[Cause] {
        &self.0.underlying
    }

    pub fn is_transparent(&self) -> bool {
        self.0.transparent
    }

    pub fn stack_trace(&self) -> Option<&StackTrace> {
        self.0.stack_trace.as_deref()
    }

    pub(crate) fn shared_stack_trace(&self) -> Option<Arc<StackTrace>> {
        self.0.stack_trace.clone()
    }

    /// Nodes visible to introspection: this one, then causes while the
    /// current node is transparent.
    fn transparent_chain(&self) -> TransparentChain<'_> {
        TransparentChain { next: Some(self) }
    }

    fn first_opaque(&self) -> Option<&Error> {
        self.transparent_chain().find(|err| !err.is_transparent())
    }

    /// The type this error reports.
    ///
    /// A transparent node reports the type of its cause. When the chain ends
    /// before an opaque node is found, the `synthetic.foreign` type is
    /// reported.
    pub fn error_type(&self) -> &ErrorType {
        match self.first_opaque() {
            Some(err) => &err.0.error_type,
            None => &*FOREIGN_TYPE,
        }
    }

    /// Type check that respects opacity and type inheritance.
    pub fn is_of_type(&self, error_type: &ErrorType) -> bool {
        self.first_opaque()
            .is_some_and(|err| err.0.error_type.is_of_type(error_type))
    }

    /// Trait check; opaque wrapping hides the traits of the cause.
    pub fn has_trait(&self, key: &Trait) -> bool {
        self.first_opaque()
            .is_some_and(|err| err.0.error_type.has_trait(key))
    }

    /// Property lookup. Values on this node and on transparent-chain causes
    /// are visible, the nearest one wins.
    pub fn property<T: Any + Send + Sync>(&self, key: &Property<T>) -> Option<&T> {
        self.transparent_chain()
            .find_map(|err| err.0.properties.get(key))
    }

    /// Copy of this error with `key` set to `value`.
    pub fn with_property<T: Any + Send + Sync>(&self, key: &Property<T>, value: T) -> Error {
        let mut inner = (*self.0).clone();
        inner.properties = self.0.properties.with(key, value);
        Error::from_inner(inner)
    }

    /// Copy of this error with more underlying errors attached.
    ///
    /// Underlying errors appear in the text but have no effect on type, trait
    /// or property queries.
    pub fn with_underlying_errors<I, C>(&self, errors: I) -> Error
    where
        I: IntoIterator<Item = C>,
        C: Into<Cause>,
    {
        let mut inner = (*self.0).clone();
        inner.underlying.extend(errors.into_iter().map(Into::into));
        Error::from_inner(inner)
    }

    /// Whether any typed node in the chain is of `target`'s type. Unlike
    /// [`Error::is_of_type`] this looks past opaque wrappers.
    pub fn is(&self, target: &Error) -> bool {
        let target_type = target.error_type();
        let mut current = Some(self);
        while let Some(err) = current {
            if err.is_of_type(target_type) {
                return true;
            }
            current = err.cause().and_then(Cause::as_error);
        }
        false
    }

    /// First error of concrete type `E` in the `source()` chain, starting
    /// with this error. The search gives up after as many steps as [`cast`]
    /// takes.
    ///
    /// [`cast`]: crate::cast
    pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        for _ in 0..MAX_CAST_DEPTH {
            let err = current?;
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// The immediate cause as a std error.
    pub fn unwrap_cause(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(Cause::as_std)
    }

    pub(crate) fn full_message(&self) -> String {
        let body = self.message_with_underlying();
        if self.is_transparent() {
            body
        } else {
            join_non_empty(": ", &[self.0.error_type.full_name(), &body])
        }
    }

    fn message_with_underlying(&self) -> String {
        join_non_empty(" ", &[&self.message_text(), &self.underlying_info()])
    }

    fn message_text(&self) -> String {
        let own = join_non_empty(" ", &[&self.0.message, &self.0.properties.render_printable()]);
        match &self.0.cause {
            Some(cause) => join_non_empty(", cause: ", &[&own, &cause.full_message()]),
            None => own,
        }
    }

    fn underlying_info(&self) -> String {
        if self.0.underlying.is_empty() {
            return String::new();
        }

        let infos: Vec<String> = self.0.underlying.iter().map(Cause::full_message).collect();
        let refs: Vec<&str> = infos.iter().map(String::as_str).collect();
        format!("(hidden: {})", join_non_empty(", ", &refs))
    }
}

fn join_non_empty(delimiter: &str, parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(delimiter)
}

struct TransparentChain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for TransparentChain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current.is_transparent() {
            current.cause().and_then(Cause::as_error)
        } else {
            None
        };
        Some(current)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.unwrap_cause()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())?;
        if f.alternate() {
            if let Some(stack_trace) = self.stack_trace() {
                fmt::Display::fmt(stack_trace, f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())?;
        if let Some(stack_trace) = self.stack_trace() {
            fmt::Display::fmt(stack_trace, f)?;
        }
        Ok(())
    }
}
