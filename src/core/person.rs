use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable arena index for a person known to a [`Ledger`](crate::core::ledger::Ledger).
///
/// Ids are handed out in order of first mention, starting at zero, and are
/// only meaningful relative to the ledger that issued them.
///
/// # Examples
///
/// ```
/// use settle_up::core::person::PersonId;
///
/// let first = PersonId::new(0);
/// let second = PersonId::new(1);
/// assert!(first < second);
/// assert_eq!(second.index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(u32);

impl PersonId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of this person in the ledger arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A participant in a shared-expense group.
///
/// The name is the unique key used by callers; the id is what the ledger,
/// partitioner and simplifier work with internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: String,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
