// Identity generation
// Process-wide source of ids for namespaces, types, traits and properties

use std::sync::atomic::{AtomicU64, Ordering};

/// Last issued id. Ids start at 1 so that 0 never identifies a live entity.
static INTERNAL_ID: AtomicU64 = AtomicU64::new(0);

/// Issue the next unique id.
///
/// All equality between taxonomy entities goes through these ids, never
/// through labels, since independently written code may reuse a label.
pub(crate) fn next_internal_id() -> u64 {
    INTERNAL_ID.fetch_add(1, Ordering::Relaxed) + 1
}
