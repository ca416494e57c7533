// Type registry
// Process-wide record of namespaces and types with synchronous subscribers

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::namespace::Namespace;
use crate::types::ErrorType;

/// Observer of taxonomy creation.
///
/// Subscribers are called synchronously on the thread that created the
/// namespace or type. They are meant for introspection tooling and must not
/// rely on being called in any particular order relative to other threads.
pub trait TypeSubscriber: Send + Sync {
    fn on_namespace_created(&self, namespace: &Namespace);
    fn on_type_created(&self, error_type: &ErrorType);
}

#[derive(Default)]
struct Registry {
    namespaces: Vec<Namespace>,
    types: Vec<ErrorType>,
    subscribers: Vec<Arc<dyn TypeSubscriber>>,
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::default()));

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register a subscriber.
///
/// Every namespace and type created so far, the common taxonomy included, is
/// replayed to the subscriber before this returns; everything created later
/// is delivered as it happens. Nothing is delivered twice.
pub fn register_type_subscriber(subscriber: Arc<dyn TypeSubscriber>) {
    crate::common::init();

    let (namespaces, types) = {
        let mut registry = registry();
        registry.subscribers.push(Arc::clone(&subscriber));
        (registry.namespaces.clone(), registry.types.clone())
    };

    debug!(
        namespaces = namespaces.len(),
        types = types.len(),
        "Registered type subscriber, replaying existing taxonomy"
    );

    for namespace in &namespaces {
        subscriber.on_namespace_created(namespace);
    }
    for error_type in &types {
        subscriber.on_type_created(error_type);
    }
}

pub(crate) fn namespace_created(namespace: &Namespace) {
    let subscribers = {
        let mut registry = registry();
        registry.namespaces.push(namespace.clone());
        registry.subscribers.clone()
    };

    debug!(namespace = %namespace.full_name(), key = namespace.key().id(), "Registered namespace");

    for subscriber in subscribers {
        subscriber.on_namespace_created(namespace);
    }
}

pub(crate) fn type_created(error_type: &ErrorType) {
    let subscribers = {
        let mut registry = registry();
        registry.types.push(error_type.clone());
        registry.subscribers.clone()
    };

    debug!(error_type = %error_type.full_name(), id = error_type.id(), "Registered error type");

    for subscriber in subscribers {
        subscriber.on_type_created(error_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ILLEGAL_ARGUMENT;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Recorder {
        namespaces: Mutex<HashSet<u64>>,
        types: Mutex<Vec<u64>>,
    }

    impl TypeSubscriber for Recorder {
        fn on_namespace_created(&self, namespace: &Namespace) {
            self.namespaces.lock().unwrap().insert(namespace.key().id());
        }

        fn on_type_created(&self, error_type: &ErrorType) {
            self.types.lock().unwrap().push(error_type.id());
        }
    }

    #[test]
    fn replays_then_follows() {
        let before_ns = Namespace::new("registry_before", &[]);
        let before = before_ns.new_type("t", &[]);

        let recorder = Arc::new(Recorder::default());
        register_type_subscriber(recorder.clone());

        let after_ns = Namespace::new("registry_after", &[]);
        let after = after_ns.new_type("t", &[]);

        let namespaces = recorder.namespaces.lock().unwrap();
        assert!(namespaces.contains(&before_ns.key().id()));
        assert!(namespaces.contains(&after_ns.key().id()));

        let types = recorder.types.lock().unwrap();
        assert!(types.contains(&before.id()));
        assert!(types.contains(&after.id()));
        assert!(types.contains(&ILLEGAL_ARGUMENT.id()));
        assert_eq!(types.iter().filter(|id| **id == after.id()).count(), 1);
    }
}
