use crate::core::ledger::Ledger;
use crate::core::person::PersonId;
use serde::{Deserialize, Serialize};

/// A maximal set of people connected through nonzero ledger relations.
///
/// Members of one group never hold a nonzero relation with anyone outside
/// it, so each group can be settled on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Members sorted by id.
    pub members: Vec<PersonId>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, person: PersonId) -> bool {
        self.members.binary_search(&person).is_ok()
    }

    /// True if the group has no internal relations to settle.
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Split everyone known to `ledger` into connected groups.
///
/// Connectivity ignores the sign of a relation. The traversal uses an
/// explicit stack and visited table, so group size is bounded only by
/// memory. Groups come out ordered by their smallest member id, which is
/// the order in which their first member was mentioned.
pub fn partition(ledger: &Ledger) -> Vec<Group> {
    let mut visited = vec![false; ledger.len()];
    let mut groups = Vec::new();
    let mut stack: Vec<PersonId> = Vec::new();

    for person in ledger.people() {
        let start = person.id();
        if visited[start.index()] {
            continue;
        }

        visited[start.index()] = true;
        stack.push(start);
        let mut members = Vec::new();

        while let Some(current) = stack.pop() {
            members.push(current);
            for next in ledger.neighbors(current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push(next);
                }
            }
        }

        members.sort_unstable();
        groups.push(Group { members });
    }

    groups
}
