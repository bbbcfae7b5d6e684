pub mod ledger;
pub mod obligation;
pub mod person;
