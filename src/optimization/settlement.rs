use crate::core::ledger::{Ledger, LedgerError};
use crate::core::obligation::{ObligationSet, Payment};
use crate::graph::partition::partition;
use crate::optimization::simplify::{DebtSimplifier, SettlementError};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Reasons a settle call fails. No partial report is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettleError {
    /// An obligation could not be folded into the ledger.
    #[error("obligation {index}: {source}")]
    Ledger {
        /// 1-based position of the refused obligation.
        index: usize,
        #[source]
        source: LedgerError,
    },
    /// One group could not be settled.
    #[error("internal consistency error in group {group}: {source}")]
    Group {
        /// Index of the failing group in partition order.
        group: usize,
        #[source]
        source: SettlementError,
    },
}

/// Direction of a participant's net balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Creditor,
    Debtor,
    Settled,
}

impl BalanceStatus {
    fn of(balance: Decimal) -> Self {
        match balance.cmp(&Decimal::ZERO) {
            Ordering::Greater => Self::Creditor,
            Ordering::Less => Self::Debtor,
            Ordering::Equal => Self::Settled,
        }
    }
}

/// Net balance of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBalance {
    pub name: String,
    pub balance: Decimal,
    pub status: BalanceStatus,
}

/// Outcome of settling a full obligation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Settlement payments, group by group.
    payments: Vec<Payment>,
    /// Every participant's net balance, sorted by name.
    balances: Vec<PersonBalance>,
    /// Number of independent groups found.
    group_count: usize,
    /// Number of input obligations.
    original_count: usize,
    /// Gross value of all input obligations.
    gross_total: Decimal,
}

impl SettlementReport {
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn balances(&self) -> &[PersonBalance] {
        &self.balances
    }

    /// Net balance of a participant by name.
    pub fn balance_of(&self, name: &str) -> Option<Decimal> {
        self.balances
            .binary_search_by(|b| b.name.as_str().cmp(name))
            .ok()
            .map(|i| self.balances[i].balance)
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn settlement_count(&self) -> usize {
        self.payments.len()
    }

    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    /// Total value moved by the settlement payments.
    pub fn settled_total(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Reduction in transaction count, as a percentage rounded to one
    /// decimal place. Zero when there were no obligations.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        let saved = self.original_count as f64 - self.settlement_count() as f64;
        let pct = saved * 100.0 / self.original_count as f64;
        (pct * 10.0).round() / 10.0
    }
}

impl std::fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement ===")?;
        writeln!(f, "Original transactions: {}", self.original_count)?;
        writeln!(f, "New transactions:      {}", self.settlement_count())?;
        writeln!(f, "Reduction:             {:.1}%", self.reduction_percent())?;
        writeln!(f, "Groups:                {}", self.group_count)?;
        writeln!(f, "Gross total:           {}", self.gross_total)?;
        writeln!(f, "Settled total:         {}", self.settled_total())?;

        writeln!(f, "\nPayments:")?;
        if self.payments.is_empty() {
            writeln!(f, "  No transactions necessary. Everyone is already even.")?;
        }
        for payment in &self.payments {
            writeln!(f, "  {}", payment)?;
        }

        writeln!(f, "\nBalances:")?;
        for b in &self.balances {
            writeln!(f, "  {:<20} {:>12}", b.name, b.balance)?;
        }
        Ok(())
    }
}

/// Entry point tying ledger, partitioner and simplifier together.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Settle an obligation set.
    ///
    /// # Algorithm
    ///
    /// 1. Fold every obligation into a fresh [`Ledger`].
    /// 2. Partition the ledger into connected groups.
    /// 3. Simplify each group independently and concatenate the payments.
    ///
    /// Fails on the first group that cannot be settled; no partial report
    /// is returned.
    pub fn settle(obligations: &ObligationSet) -> Result<SettlementReport, SettleError> {
        let mut ledger = Ledger::new();
        for (i, ob) in obligations.obligations().iter().enumerate() {
            ledger
                .apply(ob)
                .map_err(|source| SettleError::Ledger { index: i + 1, source })?;
        }
        Self::settle_ledger(&ledger, obligations.len())
    }

    /// Settle an already-built ledger.
    pub fn settle_ledger(
        ledger: &Ledger,
        original_count: usize,
    ) -> Result<SettlementReport, SettleError> {
        let groups = partition(ledger);
        debug!("{} people in {} groups", ledger.len(), groups.len());

        let mut payments = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            let settled = DebtSimplifier::simplify(ledger, group)
                .map_err(|source| SettleError::Group { group: index, source })?;
            debug!(
                "group {}: {} members, {} payments",
                index,
                group.len(),
                settled.payment_count()
            );
            payments.extend(settled.payments);
        }

        let mut balances: Vec<PersonBalance> = ledger
            .balances()
            .into_iter()
            .map(|(id, balance)| PersonBalance {
                name: ledger.name(id).to_string(),
                balance,
                status: BalanceStatus::of(balance),
            })
            .collect();
        balances.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            "settled {} obligations into {} payments across {} groups",
            original_count,
            payments.len(),
            groups.len()
        );

        Ok(SettlementReport {
            payments,
            balances,
            group_count: groups.len(),
            original_count,
            gross_total: ledger.gross_total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::obligation::Obligation;
    use rust_decimal_macros::dec;

    fn set(obs: &[(&str, &str, Decimal)]) -> ObligationSet {
        obs.iter()
            .map(|(d, c, a)| Obligation::new(*d, *c, *a))
            .collect()
    }

    #[test]
    fn test_empty_obligations() {
        let report = SettlementEngine::settle(&ObligationSet::new()).unwrap();
        assert_eq!(report.group_count(), 0);
        assert_eq!(report.settlement_count(), 0);
        assert_eq!(report.reduction_percent(), 0.0);
        assert!(report.balances().is_empty());
    }

    #[test]
    fn test_single_obligation() {
        let report = SettlementEngine::settle(&set(&[("A", "B", dec!(25))])).unwrap();
        assert_eq!(
            report.payments(),
            &[Payment { debtor: "A".into(), creditor: "B".into(), amount: dec!(25) }]
        );
        assert_eq!(report.balance_of("A"), Some(dec!(-25)));
        assert_eq!(report.balance_of("B"), Some(dec!(25)));
        assert_eq!(report.reduction_percent(), 0.0);
    }

    #[test]
    fn test_reduction_percent() {
        // Everyone owes C through B: 3 obligations become 2 payments.
        let report = SettlementEngine::settle(&set(&[
            ("A", "B", dec!(10)),
            ("B", "C", dec!(30)),
            ("D", "B", dec!(20)),
        ]))
        .unwrap();
        assert_eq!(report.settlement_count(), 2);
        assert_eq!(report.reduction_percent(), 33.3);
    }

    #[test]
    fn test_balanced_pair_needs_nothing() {
        let report = SettlementEngine::settle(&set(&[
            ("A", "B", dec!(10)),
            ("B", "A", dec!(10)),
        ]))
        .unwrap();
        assert_eq!(report.settlement_count(), 0);
        assert_eq!(report.reduction_percent(), 100.0);
        assert!(report
            .balances()
            .iter()
            .all(|b| b.status == BalanceStatus::Settled));
    }

    #[test]
    fn test_groups_settle_independently() {
        let report = SettlementEngine::settle(&set(&[
            ("Alice", "Bob", dec!(10)),
            ("Charlie", "David", dec!(20)),
        ]))
        .unwrap();
        assert_eq!(report.group_count(), 2);
        assert_eq!(report.settlement_count(), 2);
        assert_eq!(report.settled_total(), dec!(30));
        assert_eq!(report.gross_total(), dec!(30));
    }

    #[test]
    fn test_total_past_decimal_range_is_refused() {
        let result = SettlementEngine::settle(&set(&[
            ("A", "B", Decimal::MAX),
            ("A", "B", dec!(1)),
        ]));
        assert!(matches!(
            result,
            Err(SettleError::Ledger { index: 2, source: LedgerError::Overflow { .. } })
        ));
    }

    #[test]
    fn test_largest_representable_total_settles() {
        let report = SettlementEngine::settle(&set(&[
            ("A", "B", Decimal::MAX - dec!(1)),
            ("B", "C", dec!(1)),
        ]))
        .unwrap();
        assert_eq!(report.gross_total(), Decimal::MAX);
        assert_eq!(report.settled_total(), Decimal::MAX - dec!(1));
    }

    #[test]
    fn test_report_display() {
        let report = SettlementEngine::settle(&set(&[("A", "B", dec!(25))])).unwrap();
        let text = report.to_string();
        assert!(text.contains("A pays 25 to B"));
        assert!(text.contains("Reduction:"));
        assert!(text.contains("0.0%"));
    }
}
