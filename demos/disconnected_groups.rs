//! Group partitioning example.
//!
//! Two households that never share an expense are settled independently.

use settle_up::core::ledger::Ledger;
use settle_up::graph::partition::partition;
use settle_up::optimization::simplify::DebtSimplifier;
use rust_decimal_macros::dec;

fn main() {
    let mut ledger = Ledger::new();

    // Household one
    ledger.add_obligation("Alice", "Bob", dec!(10)).expect("valid obligation");
    ledger.add_obligation("Bob", "Erin", dec!(4)).expect("valid obligation");

    // Household two
    ledger.add_obligation("Charlie", "David", dec!(20)).expect("valid obligation");

    let groups = partition(&ledger);
    println!("Found {} independent groups\n", groups.len());

    for (i, group) in groups.iter().enumerate() {
        let names: Vec<&str> = group.members.iter().map(|&id| ledger.name(id)).collect();
        println!("Group {}: {}", i + 1, names.join(", "));

        match DebtSimplifier::simplify(&ledger, group) {
            Ok(settled) => {
                for payment in &settled.payments {
                    println!("  {}", payment);
                }
            }
            Err(e) => eprintln!("  cannot settle: {}", e),
        }
    }
}
