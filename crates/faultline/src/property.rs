// Dynamic properties
// Typed keys for per-instance data attached to errors

use std::any::Any;
use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::Error;
use crate::id::next_internal_id;

type RenderFn = fn(&(dyn Any + Send + Sync)) -> String;

/// Key of a dynamic property holding values of type `T`.
///
/// Property values belong to one error instance and are never inherited from
/// its type. They are visible through transparent wrappers and hidden by
/// opaque ones. Printable properties also appear in the error text.
pub struct Property<T> {
    id: u64,
    label: Arc<str>,
    render: Option<RenderFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> Property<T> {
    /// Register a key whose values are never rendered.
    pub fn register(label: impl Into<String>) -> Self {
        Self {
            id: next_internal_id(),
            label: Arc::from(label.into()),
            render: None,
            _marker: PhantomData,
        }
    }
}

impl<T: Any + Send + Sync + fmt::Display> Property<T> {
    /// Register a key whose values are rendered as `{label: value}`.
    pub fn printable(label: impl Into<String>) -> Self {
        Self {
            id: next_internal_id(),
            label: Arc::from(label.into()),
            render: Some(render_value::<T>),
            _marker: PhantomData,
        }
    }
}

impl<T> Property<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_printable(&self) -> bool {
        self.render.is_some()
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            render: self.render,
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label, self.id)
    }
}

fn render_value<T: Any + fmt::Display>(value: &(dyn Any + Send + Sync)) -> String {
    value
        .downcast_ref::<T>()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Register a non-printable property key.
pub fn register_property<T: Any + Send + Sync>(label: impl Into<String>) -> Property<T> {
    Property::register(label)
}

/// Register a printable property key.
pub fn register_printable_property<T>(label: impl Into<String>) -> Property<T>
where
    T: Any + Send + Sync + fmt::Display,
{
    Property::printable(label)
}

/// Arbitrary user data carried along with an error.
pub type Payload = Arc<dyn Any + Send + Sync>;

pub static PROPERTY_PAYLOAD: Lazy<Property<Payload>> = Lazy::new(|| Property::register("payload"));

/// Attach a payload to `err`.
pub fn with_payload(err: &Error, payload: impl Any + Send + Sync) -> Error {
    err.with_property(&PROPERTY_PAYLOAD, Arc::new(payload) as Payload)
}

/// Extract a payload of type `P`, if `err` carries one and it has that type.
pub fn extract_payload<'a, P: Any + Send + Sync>(err: &'a (dyn StdError + 'static)) -> Option<&'a P> {
    crate::conversion::extract_property(err, &PROPERTY_PAYLOAD)?.downcast_ref::<P>()
}

struct Entry {
    id: u64,
    label: Arc<str>,
    render: Option<RenderFn>,
    value: Arc<dyn Any + Send + Sync>,
}

struct Node {
    entry: Entry,
    next: Option<Arc<Node>>,
}

/// Persistent list of property values, newest first.
///
/// Adding a value creates a new head that shares the rest of the list, so
/// errors derived from one another share their older properties.
#[derive(Clone, Default)]
pub(crate) struct PropertyMap {
    head: Option<Arc<Node>>,
}

impl PropertyMap {
    pub(crate) fn with<T: Any + Send + Sync>(&self, key: &Property<T>, value: T) -> Self {
        let node = Node {
            entry: Entry {
                id: key.id,
                label: Arc::clone(&key.label),
                render: key.render,
                value: Arc::new(value),
            },
            next: self.head.clone(),
        };
        Self {
            head: Some(Arc::new(node)),
        }
    }

    pub(crate) fn get<T: Any + Send + Sync>(&self, key: &Property<T>) -> Option<&T> {
        self.entries()
            .find(|entry| entry.id == key.id)
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        let mut current = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.next.as_deref();
            Some(&node.entry)
        })
    }

    /// Inline rendering `{k: v, ...}` of the printable properties, most
    /// recent first, or an empty string when there are none.
    pub(crate) fn render_printable(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut seen = HashSet::new();
        let parts: Vec<String> = self
            .entries()
            .filter(|entry| seen.insert(entry.id))
            .filter_map(|entry| {
                entry
                    .render
                    .map(|render| format!("{}: {}", entry.label, render(entry.value.as_ref())))
            })
            .collect();

        if parts.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", parts.join(", "))
        }
    }
}
