// Error types
// Concrete error kinds with single inheritance inside one namespace root

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::builder::ErrorBuilder;
use crate::error::{Cause, Error};
use crate::id::next_internal_id;
use crate::modifier::{Modifiers, TypeModifier};
use crate::namespace::Namespace;
use crate::registry;
use crate::traits::{Trait, TraitSet};

/// An error type: the unit of type checking.
///
/// Types form single-inheritance hierarchies. A type is "of" another type if
/// it is that type or one of its descendants. Types are compared by id, so two
/// types registered under the same name are unrelated.
#[derive(Clone)]
pub struct ErrorType(Arc<TypeInner>);

struct TypeInner {
    id: u64,
    label: String,
    full_name: String,
    namespace: Namespace,
    parent: Option<ErrorType>,
    traits: TraitSet,
    modifiers: Modifiers,
}

impl ErrorType {
    /// Start building a type in `namespace`.
    pub fn builder(namespace: &Namespace, label: impl Into<String>) -> TypeBuilder {
        TypeBuilder {
            namespace: namespace.clone(),
            label: label.into(),
            parent: None,
            traits: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Create a new error of this type.
    pub fn new(&self, message: impl Into<String>) -> Error {
        ErrorBuilder::new(self).with_message(message).create()
    }

    /// Create a new error of this type with no message of its own.
    pub fn new_with_no_message(&self) -> Error {
        ErrorBuilder::new(self).create()
    }

    /// Wrap `cause` in an error of this type.
    ///
    /// Unless this type is transparent, the wrap is opaque: the cause's text
    /// stays visible but its type, traits and properties do not.
    pub fn wrap(&self, cause: impl Into<Cause>, message: impl Into<String>) -> Error {
        ErrorBuilder::new(self)
            .with_message(message)
            .with_cause(cause)
            .create()
    }

    pub fn wrap_with_no_message(&self, cause: impl Into<Cause>) -> Error {
        ErrorBuilder::new(self).with_cause(cause).create()
    }

    /// Create a subtype that inherits this type's traits and modifiers.
    pub fn new_subtype(&self, label: impl Into<String>, traits: &[&Trait]) -> ErrorType {
        self.subtype_builder(label).traits(traits).build()
    }

    /// Start building a subtype, for subtypes that need extra modifiers.
    pub fn subtype_builder(&self, label: impl Into<String>) -> TypeBuilder {
        ErrorType::builder(&self.0.namespace, label).parent(self)
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Dotted name from the root namespace through parent types, e.g. `foo.bar.baz`.
    pub fn full_name(&self) -> &str {
        &self.0.full_name
    }

    pub fn namespace(&self) -> &Namespace {
        &self.0.namespace
    }

    pub fn root_namespace(&self) -> &Namespace {
        self.0.namespace.root()
    }

    /// Parent type, if this is a subtype.
    pub fn supertype(&self) -> Option<&ErrorType> {
        self.0.parent.as_ref()
    }

    /// Whether this type is `other` or a descendant of it.
    pub fn is_of_type(&self, other: &ErrorType) -> bool {
        let mut current = Some(self);
        while let Some(t) = current {
            if t == other {
                return true;
            }
            current = t.supertype();
        }
        false
    }

    /// Whether the effective trait set contains `key`.
    pub fn has_trait(&self, key: &Trait) -> bool {
        self.0.traits.contains(key)
    }

    /// Effective traits, inheritance included.
    pub fn traits(&self) -> impl Iterator<Item = &Trait> {
        self.0.traits.iter()
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.0.modifiers
    }
}

impl PartialEq for ErrorType {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for ErrorType {}

impl Hash for ErrorType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorType")
            .field("name", &self.0.full_name)
            .field("id", &self.0.id)
            .finish()
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.full_name)
    }
}

/// Builder for error types.
#[must_use]
pub struct TypeBuilder {
    namespace: Namespace,
    label: String,
    parent: Option<ErrorType>,
    traits: Vec<Trait>,
    modifiers: Vec<TypeModifier>,
}

impl TypeBuilder {
    /// Make the new type a subtype of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` lives under a different root namespace.
    pub fn parent(mut self, parent: &ErrorType) -> Self {
        if parent.root_namespace() != self.namespace.root() {
            panic!(
                "error type {}.{} cannot extend {}: namespace roots {} and {} differ",
                self.namespace.full_name(),
                self.label,
                parent.full_name(),
                self.namespace.root().full_name(),
                parent.root_namespace().full_name(),
            );
        }
        self.parent = Some(parent.clone());
        self
    }

    pub fn traits(mut self, traits: &[&Trait]) -> Self {
        self.traits.extend(traits.iter().map(|t| (*t).clone()));
        self
    }

    pub fn apply_modifiers(mut self, modifiers: &[TypeModifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    /// Finish the type and announce it to registered subscribers.
    pub fn build(self) -> ErrorType {
        let full_name = match &self.parent {
            Some(parent) => format!("{}.{}", parent.full_name(), self.label),
            None => format!("{}.{}", self.namespace.full_name(), self.label),
        };

        let mut traits: TraitSet = self.traits.into_iter().collect();
        if let Some(parent) = &self.parent {
            traits.extend(parent.traits().cloned());
        }
        traits.extend(self.namespace.traits().iter().cloned());

        let modifiers = Modifiers::inherit(self.parent.as_ref().map(ErrorType::modifiers))
            .union(self.namespace.modifiers())
            .apply(&self.modifiers);

        let error_type = ErrorType(Arc::new(TypeInner {
            id: next_internal_id(),
            label: self.label,
            full_name,
            namespace: self.namespace,
            parent: self.parent,
            traits,
            modifiers,
        }));

        registry::type_created(&error_type);
        error_type
    }
}
