//! # settle-up
//!
//! Shared-expense debt simplification.
//!
//! Given a list of IOUs ("Bob owes Alice 12.50"), this crate splits the
//! participants into independent groups and replaces each group's IOUs with
//! the fewest payments that leave everyone with the same net balance.
//!
//! ## Architecture
//!
//! - **core** — People, obligations, and the symmetric ledger
//! - **graph** — Partitioning the ledger into connected groups
//! - **optimization** — Greedy debt simplification and the settlement engine
//! - **io** — CSV/JSON ingestion and CSV export
//! - **simulation** — Random network generation for stress testing

pub mod config;
pub mod core;
pub mod graph;
pub mod io;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::SettleConfig;
    pub use crate::core::ledger::{Ledger, LedgerError};
    pub use crate::core::obligation::{Obligation, ObligationSet, Payment};
    pub use crate::core::person::{Person, PersonId};
    pub use crate::graph::partition::{partition, Group};
    pub use crate::optimization::settlement::{SettleError, SettlementEngine, SettlementReport};
    pub use crate::optimization::simplify::{DebtSimplifier, GroupSettlement, SettlementError};
}
