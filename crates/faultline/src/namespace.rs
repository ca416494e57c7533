// Error namespaces
// Naming scopes for error types, nestable, contributing traits and modifiers

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::id::next_internal_id;
use crate::modifier::{Modifiers, TypeModifier};
use crate::registry;
use crate::traits::{Trait, TraitSet};
use crate::types::{ErrorType, TypeBuilder};

/// Identity of a namespace, cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceKey(u64);

impl NamespaceKey {
    /// Raw id value.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns:{}", self.0)
    }
}

/// A namespace groups error types under a common dotted prefix.
///
/// Namespaces are created once, usually in a `Lazy` static, and never change
/// afterwards. Traits and modifiers given to a namespace are inherited by its
/// sub-namespaces and by every type defined in any of them.
#[derive(Clone)]
pub struct Namespace(Arc<NamespaceInner>);

struct NamespaceInner {
    key: NamespaceKey,
    label: String,
    full_name: String,
    parent: Option<Namespace>,
    traits: TraitSet,
    modifiers: Modifiers,
}

impl Namespace {
    /// Create a root namespace.
    ///
    /// ```
    /// use faultline::Namespace;
    /// let ns = Namespace::new("storage", &[]);
    /// assert_eq!(ns.full_name(), "storage");
    /// ```
    pub fn new(label: impl Into<String>, traits: &[&Trait]) -> Self {
        Self::builder(label).traits(traits).build()
    }

    /// Start building a namespace that needs modifiers or a parent.
    pub fn builder(label: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder {
            label: label.into(),
            parent: None,
            traits: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Create a namespace nested in this one.
    pub fn new_sub_namespace(&self, label: impl Into<String>, traits: &[&Trait]) -> Namespace {
        Self::builder(label).parent(self).traits(traits).build()
    }

    /// Create an error type directly in this namespace.
    pub fn new_type(&self, label: impl Into<String>, traits: &[&Trait]) -> ErrorType {
        ErrorType::builder(self, label).traits(traits).build()
    }

    /// Start building a type in this namespace.
    pub fn type_builder(&self, label: impl Into<String>) -> TypeBuilder {
        ErrorType::builder(self, label)
    }

    pub fn key(&self) -> NamespaceKey {
        self.0.key
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Dotted path from the root namespace, e.g. `a.b`.
    pub fn full_name(&self) -> &str {
        &self.0.full_name
    }

    pub fn parent(&self) -> Option<&Namespace> {
        self.0.parent.as_ref()
    }

    /// Outermost ancestor, or this namespace if it has no parent.
    pub fn root(&self) -> &Namespace {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Whether `error_type` was defined in this namespace or in one nested in it.
    pub fn is_namespace_of(&self, error_type: &ErrorType) -> bool {
        let mut current = Some(error_type.namespace());
        while let Some(ns) = current {
            if ns == self {
                return true;
            }
            current = ns.parent();
        }
        false
    }

    pub(crate) fn traits(&self) -> &TraitSet {
        &self.0.traits
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.0.modifiers
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.0.key == other.0.key
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key.hash(state);
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.0.full_name)
            .field("key", &self.0.key)
            .finish()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.full_name)
    }
}

/// Builder for namespaces that carry modifiers or a parent.
///
/// ```
/// use faultline::{Namespace, TypeModifier};
/// let ns = Namespace::builder("cache")
///     .apply_modifiers(&[TypeModifier::OmitStackTrace])
///     .build();
/// assert_eq!(ns.full_name(), "cache");
/// ```
#[must_use]
pub struct NamespaceBuilder {
    label: String,
    parent: Option<Namespace>,
    traits: Vec<Trait>,
    modifiers: Vec<TypeModifier>,
}

impl NamespaceBuilder {
    /// Nest the namespace under `parent`.
    pub fn parent(mut self, parent: &Namespace) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Add traits contributed to every type in the namespace.
    pub fn traits(mut self, traits: &[&Trait]) -> Self {
        self.traits.extend(traits.iter().map(|t| (*t).clone()));
        self
    }

    /// Add modifiers inherited by every type in the namespace.
    pub fn apply_modifiers(mut self, modifiers: &[TypeModifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    /// Finish the namespace and announce it to registered subscribers.
    pub fn build(self) -> Namespace {
        let full_name = match &self.parent {
            Some(parent) => format!("{}.{}", parent.full_name(), self.label),
            None => self.label.clone(),
        };

        let mut traits: TraitSet = self.traits.into_iter().collect();
        if let Some(parent) = &self.parent {
            traits.extend(parent.traits().iter().cloned());
        }

        let modifiers = Modifiers::inherit(self.parent.as_ref().map(Namespace::modifiers))
            .apply(&self.modifiers);

        let namespace = Namespace(Arc::new(NamespaceInner {
            key: NamespaceKey(next_internal_id()),
            label: self.label,
            full_name,
            parent: self.parent,
            traits,
            modifiers,
        }));

        registry::namespace_created(&namespace);
        namespace
    }
}
