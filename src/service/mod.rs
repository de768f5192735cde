pub mod aggregator;
pub mod ledger;

pub use ledger::LedgerService;
