use crate::core::obligation::{Obligation, ObligationError, ObligationSet};
use crate::core::person::{Person, PersonId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Reasons an obligation cannot be folded into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Invalid(#[from] ObligationError),
    #[error("adding {amount} owed by {debtor} to {creditor} overflows the ledger total")]
    Overflow {
        debtor: String,
        creditor: String,
        amount: Decimal,
    },
}

/// Symmetric graph of net pairwise obligations between people.
///
/// Each person holds a relation table keyed by counterparty id:
/// a positive entry means the counterparty owes this person that amount,
/// a negative entry means this person owes the counterparty.
///
/// For every pair `(a, b)`, `entry(a, b) == -entry(b, a)`. The only mutator
/// updates both sides in one call, so the invariant cannot be broken through
/// the public interface. Entries that net to exactly zero are removed from
/// both sides.
///
/// The ledger also tracks the gross total of every amount ever added and
/// refuses an obligation that would overflow it. Every entry, balance and
/// partial sum of balances is bounded by that total, so reads never
/// overflow.
///
/// # Examples
///
/// ```
/// use settle_up::core::ledger::Ledger;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new();
/// let (bob, alice) = ledger.add_obligation("Bob", "Alice", dec!(10)).unwrap();
///
/// assert_eq!(ledger.entry(alice, bob), dec!(10));
/// assert_eq!(ledger.entry(bob, alice), dec!(-10));
/// assert_eq!(ledger.net_balance(bob), dec!(-10));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    /// Arena of people, indexed by `PersonId`.
    people: Vec<Person>,
    /// person -> (counterparty -> signed net amount)
    relations: Vec<BTreeMap<PersonId, Decimal>>,
    /// Sum of every amount recorded so far.
    gross: Decimal,
    #[serde(skip)]
    by_name: HashMap<String, PersonId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger by folding every obligation in order.
    pub fn from_obligations(obligations: &ObligationSet) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for ob in obligations.obligations() {
            ledger.apply(ob)?;
        }
        Ok(ledger)
    }

    /// Look up a person by name, registering them on first mention.
    pub fn intern(&mut self, name: &str) -> PersonId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = PersonId::new(self.people.len() as u32);
        self.people.push(Person::new(id, name));
        self.relations.push(BTreeMap::new());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Record that `debtor` owes `creditor` `amount`.
    ///
    /// Returns the ids of `(debtor, creditor)`. The amount must be positive,
    /// the two names distinct, and the ledger's gross total must stay
    /// representable. A refused obligation leaves the ledger unchanged.
    pub fn add_obligation(
        &mut self,
        debtor: &str,
        creditor: &str,
        amount: Decimal,
    ) -> Result<(PersonId, PersonId), LedgerError> {
        if debtor.is_empty() || creditor.is_empty() {
            return Err(ObligationError::EmptyName.into());
        }
        if amount <= Decimal::ZERO {
            return Err(ObligationError::NonPositiveAmount(amount).into());
        }
        if debtor == creditor {
            return Err(ObligationError::SelfObligation(debtor.to_string()).into());
        }
        let gross = self
            .gross
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow {
                debtor: debtor.to_string(),
                creditor: creditor.to_string(),
                amount,
            })?;

        let d = self.intern(debtor);
        let c = self.intern(creditor);
        self.gross = gross;
        self.record(d, c, amount);
        Ok((d, c))
    }

    /// Apply an obligation record.
    pub fn apply(&mut self, obligation: &Obligation) -> Result<(PersonId, PersonId), LedgerError> {
        self.add_obligation(obligation.debtor(), obligation.creditor(), obligation.amount())
    }

    /// Two-sided update: creditor's entry for debtor rises, debtor's entry
    /// for creditor falls by the same amount. `|entry| <= gross`, so the
    /// addition cannot overflow once `gross` has been accepted.
    fn record(&mut self, debtor: PersonId, creditor: PersonId, amount: Decimal) {
        let updated = {
            let entry = self.relations[creditor.index()]
                .entry(debtor)
                .or_insert(Decimal::ZERO);
            *entry += amount;
            *entry
        };

        if updated.is_zero() {
            self.relations[creditor.index()].remove(&debtor);
            self.relations[debtor.index()].remove(&creditor);
        } else {
            self.relations[debtor.index()].insert(creditor, -updated);
        }
    }

    /// Sum of all of a person's entries. Positive = net receivable.
    pub fn net_balance(&self, person: PersonId) -> Decimal {
        self.relations
            .get(person.index())
            .map(|r| r.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Counterparties with a nonzero entry, in id order.
    pub fn neighbors(&self, person: PersonId) -> impl Iterator<Item = PersonId> + '_ {
        self.relations
            .get(person.index())
            .into_iter()
            .flat_map(|r| r.iter())
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(&id, _)| id)
    }

    /// Signed amount `a` holds against `b` (zero when they have no relation).
    pub fn entry(&self, a: PersonId, b: PersonId) -> Decimal {
        self.relations
            .get(a.index())
            .and_then(|r| r.get(&b))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The raw relation table of one person.
    pub fn relations(&self, person: PersonId) -> impl Iterator<Item = (PersonId, Decimal)> + '_ {
        self.relations
            .get(person.index())
            .into_iter()
            .flat_map(|r| r.iter().map(|(&id, &amount)| (id, amount)))
    }

    /// Sum of every amount recorded so far.
    pub fn gross_total(&self) -> Decimal {
        self.gross
    }

    pub fn person_id(&self, name: &str) -> Option<PersonId> {
        self.by_name.get(name).copied()
    }

    /// Name of a person issued by this ledger.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this ledger.
    pub fn name(&self, id: PersonId) -> &str {
        self.people[id.index()].name()
    }

    /// Everyone known to the ledger, in order of first mention.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Every person's net balance, in id order.
    pub fn balances(&self) -> Vec<(PersonId, Decimal)> {
        self.people
            .iter()
            .map(|p| (p.id(), self.net_balance(p.id())))
            .collect()
    }

    /// True when all net balances sum to exactly zero.
    pub fn is_balanced(&self) -> bool {
        self.balances()
            .iter()
            .map(|(_, b)| *b)
            .sum::<Decimal>()
            .is_zero()
    }

    /// Sum of positive net balances: the total that must change hands.
    pub fn total_net_settlement(&self) -> Decimal {
        self.balances()
            .into_iter()
            .map(|(_, b)| b)
            .filter(|b| *b > Decimal::ZERO)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_basic() {
        let mut ledger = Ledger::new();
        let (a, b) = ledger.add_obligation("A", "B", dec!(100)).unwrap();

        assert_eq!(ledger.net_balance(a), dec!(-100));
        assert_eq!(ledger.net_balance(b), dec!(100));
        assert_eq!(ledger.neighbors(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(ledger.neighbors(b).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_ledger_accumulates_both_directions() {
        let mut ledger = Ledger::new();
        let (a, b) = ledger.add_obligation("A", "B", dec!(100)).unwrap();
        ledger.add_obligation("B", "A", dec!(60)).unwrap();

        assert_eq!(ledger.entry(b, a), dec!(40));
        assert_eq!(ledger.entry(a, b), dec!(-40));
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_mutual_debts_cancel_and_disconnect() {
        let mut ledger = Ledger::new();
        let (a, b) = ledger.add_obligation("A", "B", dec!(10)).unwrap();
        ledger.add_obligation("B", "A", dec!(10)).unwrap();

        assert_eq!(ledger.entry(a, b), Decimal::ZERO);
        assert_eq!(ledger.neighbors(a).count(), 0);
        assert_eq!(ledger.neighbors(b).count(), 0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_ledger_circular_cancels() {
        let mut ledger = Ledger::new();
        ledger.add_obligation("A", "B", dec!(100)).unwrap();
        ledger.add_obligation("B", "C", dec!(100)).unwrap();
        ledger.add_obligation("C", "A", dec!(100)).unwrap();

        let a = ledger.person_id("A").unwrap();
        assert_eq!(ledger.net_balance(a), Decimal::ZERO);
        assert_eq!(ledger.total_net_settlement(), Decimal::ZERO);
        // The relations themselves survive even though every balance is zero.
        assert_eq!(ledger.neighbors(a).count(), 2);
    }

    #[test]
    fn test_rejects_invalid_obligations() {
        let mut ledger = Ledger::new();
        assert!(ledger.add_obligation("A", "B", Decimal::ZERO).is_err());
        assert!(ledger.add_obligation("A", "B", dec!(-1)).is_err());
        assert!(ledger.add_obligation("A", "A", dec!(1)).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ids_follow_first_mention() {
        let mut ledger = Ledger::new();
        ledger.add_obligation("Zed", "Amy", dec!(1)).unwrap();
        ledger.add_obligation("Amy", "Kim", dec!(1)).unwrap();

        let names: Vec<&str> = ledger.people().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
        assert_eq!(ledger.person_id("Kim"), Some(PersonId::new(2)));
        assert_eq!(ledger.person_id("Nobody"), None);
    }

    #[test]
    fn test_from_obligations_matches_manual_fold() {
        let set: ObligationSet = vec![
            Obligation::new("A", "B", dec!(1234.56)),
            Obligation::new("B", "C", dec!(789.12)),
            Obligation::new("C", "A", dec!(445.44)),
        ]
        .into_iter()
        .collect();
        let ledger = Ledger::from_obligations(&set).unwrap();

        let a = ledger.person_id("A").unwrap();
        let b = ledger.person_id("B").unwrap();
        let c = ledger.person_id("C").unwrap();
        assert_eq!(ledger.net_balance(a), dec!(-789.12));
        assert_eq!(ledger.net_balance(b), dec!(445.44));
        assert_eq!(ledger.net_balance(c), dec!(343.68));
        assert!(ledger.is_balanced());
        assert_eq!(ledger.total_net_settlement(), dec!(789.12));
        assert_eq!(ledger.gross_total(), dec!(2469.12));
    }

    #[test]
    fn test_self_obligation_never_reaches_ledger() {
        // Records arriving through serde are validated before the ledger
        // ever sees them.
        let parsed = serde_json::from_str::<ObligationSet>(
            r#"{"obligations":[{"debtor":"A","creditor":"A","amount":"10"}]}"#,
        );
        assert!(parsed.is_err());

        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.add_obligation("A", "A", dec!(10)),
            Err(LedgerError::Invalid(ObligationError::SelfObligation("A".into())))
        );
        assert!(ledger.is_empty());
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_overflow_is_refused_without_partial_update() {
        let mut ledger = Ledger::new();
        let (a, b) = ledger.add_obligation("A", "B", Decimal::MAX).unwrap();

        let err = ledger.add_obligation("A", "B", dec!(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { .. }));
        let err = ledger.add_obligation("C", "D", dec!(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { .. }));

        assert_eq!(ledger.entry(b, a), Decimal::MAX);
        assert_eq!(ledger.net_balance(a), -Decimal::MAX);
        assert_eq!(ledger.person_id("C"), None);
        assert!(ledger.is_balanced());
    }
}
