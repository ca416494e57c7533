// Type modifiers
// Behavioural switches set on namespaces and types and inherited downwards

use std::fmt;

/// A modifier changes how errors of a type are built.
///
/// Modifiers are applied while a namespace or type is being built and are
/// inherited by every namespace, type and subtype created beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeModifier {
    /// Errors of this type never collect a stack trace of their own.
    /// A trace may still be borrowed from a traced cause.
    OmitStackTrace,
    /// Errors of this type are transparent wrappers: type, trait and property
    /// queries pass through to the cause.
    Transparent,
}

impl fmt::Display for TypeModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeModifier::OmitStackTrace => write!(f, "omit_stack_trace"),
            TypeModifier::Transparent => write!(f, "transparent"),
        }
    }
}

/// Effective modifier set of a namespace or type, inheritance already folded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Modifiers {
    omit_stack_trace: bool,
    transparent: bool,
}

impl Modifiers {
    /// Start from the effective modifiers of the enclosing scope.
    pub(crate) fn inherit(parent: Option<Modifiers>) -> Self {
        parent.unwrap_or_default()
    }

    /// Switch on the given modifiers. Modifiers can only be added; a child
    /// never clears what its parent set.
    pub(crate) fn apply(mut self, modifiers: &[TypeModifier]) -> Self {
        for modifier in modifiers {
            match modifier {
                TypeModifier::OmitStackTrace => self.omit_stack_trace = true,
                TypeModifier::Transparent => self.transparent = true,
            }
        }
        self
    }

    /// Combine with another effective set, e.g. a parent type's and the
    /// enclosing namespace's.
    pub(crate) fn union(self, other: Modifiers) -> Self {
        Self {
            omit_stack_trace: self.omit_stack_trace || other.omit_stack_trace,
            transparent: self.transparent || other.transparent,
        }
    }

    pub(crate) fn collect_stack_trace(&self) -> bool {
        !self.omit_stack_trace
    }

    pub(crate) fn transparent(&self) -> bool {
        self.transparent
    }
}
