//! Logical variables and the identity source used to rename them.
//!
//! Role
//! - A [`Variable`] is a name plus an optional identity. Variables straight out of the
//!   parser carry no identity ("template" variables of a rule); renaming gives them one.
//! - Identities come from a single process-wide [`RenameCounter`]. Rule engines reset it
//!   between independent evaluations to keep identities small; identities are only
//!   unique within one epoch.
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First identity handed out after construction or after a reset.
pub const FIRST_IDENTITY: u64 = 1;

/// A logical variable.
///
/// Two variables are the same logical variable iff their names are equal and their
/// identities are equal, where a template variable (no identity) never equals a renamed
/// one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable {
    name: Arc<str>,
    identity: Option<u64>,
}

impl Variable {
    /// Create a template (unrenamed) variable.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            identity: None,
        }
    }

    /// Create a variable with an explicit identity.
    pub fn with_identity(name: impl Into<Arc<str>>, identity: u64) -> Self {
        Self {
            name: name.into(),
            identity: Some(identity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> Option<u64> {
        self.identity
    }

    /// Returns true if the variable has not been renamed yet.
    pub fn is_template(&self) -> bool {
        self.identity.is_none()
    }

    /// Same name, given identity. The name buffer is shared, not copied.
    pub fn renamed(&self, identity: u64) -> Variable {
        Variable {
            name: Arc::clone(&self.name),
            identity: Some(identity),
        }
    }

    /// Same name, fresh identity drawn from the global counter.
    pub fn rename(&self) -> Variable {
        self.renamed(next_identity())
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::new(name)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.identity {
            Some(id) => write!(f, "{}{}", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Monotonic identity source with an explicit reset.
///
/// All requests and resets serialize on one mutex, so a reset is a total ordering point:
/// every identity handed out after it is counted from [`FIRST_IDENTITY`] again.
#[derive(Debug)]
pub struct RenameCounter {
    next: Mutex<u64>,
}

impl RenameCounter {
    pub const fn new() -> Self {
        Self {
            next: parking_lot::const_mutex(FIRST_IDENTITY),
        }
    }

    /// Hand out the next identity.
    pub fn next_identity(&self) -> u64 {
        let mut next = self.next.lock();
        let id = *next;
        *next += 1;
        id
    }

    /// Start a new epoch.
    pub fn reset(&self) {
        let mut next = self.next.lock();
        debug!("Renaming epoch reset after {} identities", *next - FIRST_IDENTITY);
        *next = FIRST_IDENTITY;
    }

    /// The identity the next request will receive.
    pub fn peek(&self) -> u64 {
        *self.next.lock()
    }
}

impl Default for RenameCounter {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_COUNTER: RenameCounter = RenameCounter::new();

/// Draw a fresh identity from the process-wide counter.
pub fn next_identity() -> u64 {
    GLOBAL_COUNTER.next_identity()
}

/// Reset the process-wide counter. Only call this at epoch boundaries of the rule
/// engine: identities drawn before the reset may be handed out again afterwards.
pub fn reset_renaming() {
    GLOBAL_COUNTER.reset()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests touching the process-wide counter hold this lock.
    static GLOBAL_EPOCH: Mutex<()> = parking_lot::const_mutex(());

    #[test]
    fn global_epoch_reset_restarts_identities() {
        let _guard = GLOBAL_EPOCH.lock();
        reset_renaming();
        let x = Variable::new("X");
        let first = x.rename();
        assert_eq!(first, Variable::with_identity("X", FIRST_IDENTITY));
        assert_eq!(x.rename().identity(), Some(FIRST_IDENTITY + 1));
        assert_eq!(next_identity(), FIRST_IDENTITY + 2);

        reset_renaming();
        let again = Variable::new("Y").rename();
        assert_eq!(again.identity(), Some(FIRST_IDENTITY));
        assert_eq!(again.to_string(), "Y1");
        assert_ne!(again, first);
    }

    #[test]
    fn template_and_renamed_variables_differ() {
        let x = Variable::new("X");
        let x1 = x.renamed(1);
        assert_ne!(x, x1);
        assert_eq!(x1, Variable::with_identity("X", 1));
        assert_ne!(x1, Variable::with_identity("Y", 1));
        assert!(x.is_template());
        assert!(!x1.is_template());
    }

    #[test]
    fn display_appends_identity() {
        assert_eq!(Variable::new("Foo").to_string(), "Foo");
        assert_eq!(Variable::with_identity("Foo", 12).to_string(), "Foo12");
    }

    #[test]
    fn local_counter_is_monotonic_and_resettable() {
        let counter = RenameCounter::new();
        assert_eq!(counter.next_identity(), 1);
        assert_eq!(counter.next_identity(), 2);
        assert_eq!(counter.peek(), 3);
        counter.reset();
        assert_eq!(counter.next_identity(), FIRST_IDENTITY);
    }

    #[test]
    fn concurrent_requests_never_collide() {
        let counter = RenameCounter::new();
        let mut all: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..250).map(|_| counter.next_identity()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1000);
        assert_eq!(all.first(), Some(&1));
        assert_eq!(all.last(), Some(&1000));
    }
}
