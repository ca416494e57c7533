// Error traits
// Orthogonal classification tags carried by namespaces and types

use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::id::next_internal_id;

/// A trait is a boolean tag attached to a namespace or type, e.g. "this is a
/// timeout". Unlike a type, a trait cuts across the hierarchy: unrelated types
/// may share it, and it is inherited by every type below the place it was
/// attached.
///
/// Equality is by id. Two traits registered under the same label are distinct.
#[derive(Clone)]
pub struct Trait {
    id: u64,
    label: Arc<str>,
}

impl Trait {
    /// Register a new trait.
    pub fn register(label: impl Into<String>) -> Self {
        Self {
            id: next_internal_id(),
            label: Arc::from(label.into()),
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Unique id of this trait.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Trait {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trait {}

impl Hash for Trait {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label, self.id)
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Effective trait set of a namespace or type.
pub(crate) type TraitSet = HashSet<Trait>;

/// Register a new trait. Shorthand for [`Trait::register`].
pub fn register_trait(label: impl Into<String>) -> Trait {
    Trait::register(label)
}

/// The failure is temporary and the operation may succeed if retried.
pub static TEMPORARY: Lazy<Trait> = Lazy::new(|| Trait::register("temporary"));

/// The operation did not complete in time.
pub static TIMEOUT: Lazy<Trait> = Lazy::new(|| Trait::register("timeout"));

/// The requested entity does not exist.
pub static NOT_FOUND: Lazy<Trait> = Lazy::new(|| Trait::register("not_found"));

/// The entity being created already exists.
pub static DUPLICATE: Lazy<Trait> = Lazy::new(|| Trait::register("duplicate"));

/// Whether `err` carries the [`TEMPORARY`] trait.
pub fn is_temporary(err: &(dyn StdError + 'static)) -> bool {
    crate::conversion::has_trait(err, &TEMPORARY)
}

/// Whether `err` carries the [`TIMEOUT`] trait.
pub fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    crate::conversion::has_trait(err, &TIMEOUT)
}

/// Whether `err` carries the [`NOT_FOUND`] trait.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    crate::conversion::has_trait(err, &NOT_FOUND)
}

/// Whether `err` carries the [`DUPLICATE`] trait.
pub fn is_duplicate(err: &(dyn StdError + 'static)) -> bool {
    crate::conversion::has_trait(err, &DUPLICATE)
}
