//! Test logging and shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Once;

use faultline::{ErrorType, Namespace, TypeModifier};
use once_cell::sync::Lazy;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

static INIT: Once = Once::new();

/// Initialize test logging (called once per test binary)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = init_tracing_subscriber("info");
    });
}

fn init_tracing_subscriber(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let fmt_layer = fmt::layer().with_test_writer().with_target(true);
    let subscriber = Registry::default().with(env_filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// The `foo` namespace used throughout the tests.
pub static TEST_NAMESPACE: Lazy<Namespace> = Lazy::new(|| Namespace::new("foo", &[]));

/// `foo.bar`
pub static TEST_TYPE: Lazy<ErrorType> = Lazy::new(|| TEST_NAMESPACE.new_type("bar", &[]));

/// `foo.bar1`
pub static TEST_TYPE_BAR1: Lazy<ErrorType> = Lazy::new(|| TEST_NAMESPACE.new_type("bar1", &[]));

/// `foo.bar2`
pub static TEST_TYPE_BAR2: Lazy<ErrorType> = Lazy::new(|| TEST_NAMESPACE.new_type("bar2", &[]));

/// `foo.bar.internal`
pub static TEST_SUBTYPE0: Lazy<ErrorType> = Lazy::new(|| TEST_TYPE.new_subtype("internal", &[]));

/// `foo.bar.internal.wat`
pub static TEST_SUBTYPE1: Lazy<ErrorType> = Lazy::new(|| TEST_SUBTYPE0.new_subtype("wat", &[]));

/// `foo.bar.silent`, never collects a stack trace
pub static TEST_TYPE_SILENT: Lazy<ErrorType> = Lazy::new(|| {
    TEST_TYPE
        .subtype_builder("silent")
        .apply_modifiers(&[TypeModifier::OmitStackTrace])
        .build()
});

/// `foo.transparent`
pub static TEST_TYPE_TRANSPARENT: Lazy<ErrorType> = Lazy::new(|| {
    TEST_NAMESPACE
        .type_builder("transparent")
        .apply_modifiers(&[TypeModifier::Transparent])
        .build()
});

/// Plain std error standing in for errors from other libraries.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RawError(pub &'static str);
