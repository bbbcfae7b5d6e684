//! Basic settlement example.
//!
//! Four friends share a weekend trip and settle up with the fewest payments.

use settle_up::core::obligation::{Obligation, ObligationSet};
use settle_up::optimization::settlement::SettlementEngine;
use rust_decimal_macros::dec;

fn main() {
    println!("settle-up: weekend trip\n");

    let mut set = ObligationSet::new();

    // Alice paid the cabin, split four ways.
    set.add(Obligation::new("Bob", "Alice", dec!(120.00)).with_memo("cabin"));
    set.add(Obligation::new("Carol", "Alice", dec!(120.00)).with_memo("cabin"));
    set.add(Obligation::new("Dave", "Alice", dec!(120.00)).with_memo("cabin"));

    // Bob paid groceries, Carol paid fuel.
    set.add(Obligation::new("Alice", "Bob", dec!(35.50)).with_memo("groceries"));
    set.add(Obligation::new("Carol", "Bob", dec!(35.50)).with_memo("groceries"));
    set.add(Obligation::new("Dave", "Bob", dec!(35.50)).with_memo("groceries"));
    set.add(Obligation::new("Alice", "Carol", dec!(22.25)).with_memo("fuel"));
    set.add(Obligation::new("Dave", "Carol", dec!(22.25)).with_memo("fuel"));

    println!("Obligations:");
    for ob in set.obligations() {
        println!(
            "  {:<6} owes {:<6} {:>8}  ({})",
            ob.debtor(),
            ob.creditor(),
            ob.amount(),
            ob.memo().unwrap_or("-")
        );
    }
    println!();

    match SettlementEngine::settle(&set) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("settlement failed: {}", e),
    }
}
