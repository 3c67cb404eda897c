//! # Blocked-group registry.
//!
//! Set of groups currently under escalation. A run whose retry tier is
//! exhausted adds its group before re-attempting and removes it when the
//! re-attempt tier ends, whatever the outcome. Any run for a blocked group is
//! rejected before the executor is called.
//!
//! ## Rules
//! - Plain set semantics: adding twice keeps one entry, removing once clears it.
//!   Escalations of the same group by concurrent runs are not counted.
//! - No expiry and no persistence; membership only changes through `add`/`remove`.
//! - One instance is meant to be shared process-wide (`Arc<BlockedGroups>`);
//!   several clients can be built on the same instance.
//!
//! ## Check-then-block race
//! `contains` (at the start of a run) and `add` (at retry exhaustion) are separate
//! steps. Two runs of the same group can both pass the check before either
//! blocks it, and both then escalate. This is accepted: blocking is best-effort
//! throttling, not mutual exclusion.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-wide set of blocked group ids.
#[derive(Debug, Default)]
pub struct BlockedGroups {
    groups: Mutex<BTreeSet<String>>,
}

impl BlockedGroups {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        // The set has no invariant a panicking holder could break.
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks `group`. Returns `false` if it was already blocked.
    pub fn add(&self, group: &str) -> bool {
        self.lock().insert(group.to_owned())
    }

    /// Unblocks `group`. Returns `false` if it was not blocked.
    pub fn remove(&self, group: &str) -> bool {
        self.lock().remove(group)
    }

    /// Whether `group` is currently blocked.
    pub fn contains(&self, group: &str) -> bool {
        self.lock().contains(group)
    }

    /// Sorted list of blocked groups.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
