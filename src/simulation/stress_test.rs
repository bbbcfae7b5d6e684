//! Stress testing utilities.
//!
//! Generates random shared-expense networks to exercise the settlement
//! pipeline at scale.

use crate::core::obligation::{Obligation, ObligationSet};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random obligation network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of people in the network.
    pub people: usize,
    /// Total number of obligations to generate.
    pub obligations: usize,
    /// Smallest amount, in minor units (cents).
    pub min_cents: i64,
    /// Largest amount, in minor units (cents).
    pub max_cents: i64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            people: 10,
            obligations: 30,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate a random obligation network.
///
/// Amounts carry exactly two decimal places. Fewer than two people yields
/// an empty set.
pub fn generate_random_network(config: &NetworkConfig) -> ObligationSet {
    let mut rng = rand::thread_rng();
    let mut set = ObligationSet::new();
    if config.people < 2 {
        return set;
    }

    let names: Vec<String> = (0..config.people)
        .map(|i| format!("Person-{:03}", i))
        .collect();
    let min = config.min_cents.max(1);
    let max = config.max_cents.max(min);

    for _ in 0..config.obligations {
        let debtor = rng.gen_range(0..names.len());
        let mut creditor = rng.gen_range(0..names.len());
        while creditor == debtor {
            creditor = rng.gen_range(0..names.len());
        }
        let amount = Decimal::new(rng.gen_range(min..=max), 2);
        set.add(Obligation::new(&names[debtor], &names[creditor], amount));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::settlement::SettlementEngine;

    #[test]
    fn test_random_network_generation() {
        let config = NetworkConfig {
            people: 5,
            obligations: 15,
            ..Default::default()
        };

        let set = generate_random_network(&config);
        assert_eq!(set.len(), 15);
        assert!(set.people().len() <= 5);
        assert!(set
            .obligations()
            .iter()
            .all(|o| o.amount().scale() == 2 && o.debtor() != o.creditor()));
    }

    #[test]
    fn test_too_few_people() {
        let config = NetworkConfig {
            people: 1,
            ..Default::default()
        };
        assert!(generate_random_network(&config).is_empty());
    }

    #[test]
    fn test_random_network_settles() {
        let config = NetworkConfig {
            people: 40,
            obligations: 200,
            ..Default::default()
        };

        let set = generate_random_network(&config);
        let report = SettlementEngine::settle(&set).unwrap();
        let nonzero = report
            .balances()
            .iter()
            .filter(|b| !b.balance.is_zero())
            .count();
        assert!(report.settlement_count() <= nonzero.saturating_sub(1));
        assert!(report.settlement_count() <= report.original_count());
    }
}
