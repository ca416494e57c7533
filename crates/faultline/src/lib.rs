// Faultline Error Model
// Structured error taxonomy, opacity-aware causal chains and stack traces

//! Typed errors organised in a taxonomy of namespaces, types and traits.
//!
//! An [`Error`] is an immutable node of a causal chain. It has a type, a
//! message, an optional cause, optional display-only underlying errors,
//! per-instance properties and usually a stack trace. Wrapping is either
//! opaque ([`ErrorType::wrap`]), which hides the cause from type, trait and
//! property queries, or transparent ([`decorate`]), which does not.
//!
//! ```
//! use faultline::{decorate, Namespace};
//!
//! let storage = Namespace::new("storage", &[]);
//! let missing = storage.new_type("missing", &[&faultline::NOT_FOUND]);
//!
//! let err = decorate(missing.new("no such key"), "loading settings");
//! assert_eq!(err.to_string(), "loading settings, cause: storage.missing: no such key");
//! assert!(err.is_of_type(&missing));
//! assert!(faultline::is_not_found(&err));
//! ```

// Re-export for macro expansion and interop
pub use anyhow;
#[doc(hidden)]
pub use tracing;

mod builder;
pub mod common;
pub mod config;
mod conversion;
mod error;
mod id;
mod macros;
mod modifier;
mod namespace;
mod panic;
mod property;
mod registry;
mod stacktrace;
mod switch;
mod traits;
mod types;
mod utils;
mod wrap;

pub use builder::{ErrorBuilder, StackTraceMode};
pub use config::{ConfigError, TraceConfig};
pub use conversion::{cast, extract_property, has_trait, is_of_type, IntoOptionalCause};
pub use error::{Cause, Error};
pub use modifier::TypeModifier;
pub use namespace::{Namespace, NamespaceBuilder, NamespaceKey};
pub use panic::{catch, error_from_panic, raise, unwrap_or_raise};
pub use property::{
    extract_payload, register_printable_property, register_property, with_payload, Payload,
    Property, PROPERTY_PAYLOAD,
};
pub use registry::{register_type_subscriber, TypeSubscriber};
pub use stacktrace::StackTrace;
pub use switch::{trait_switch, type_switch, SwitchCase};
pub use traits::{
    is_duplicate, is_not_found, is_temporary, is_timeout, register_trait, Trait, DUPLICATE,
    NOT_FOUND, TEMPORARY, TIMEOUT,
};
pub use types::{ErrorType, TypeBuilder};
pub use utils::{ignore, ignore_with_trait, type_name};
pub use wrap::{decorate, decorate_many, enhance_stack_trace, ensure_stack_trace};

/// Result type with [`Error`] as the error.
pub type Result<T> = std::result::Result<T, Error>;
