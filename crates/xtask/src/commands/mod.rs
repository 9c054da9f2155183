//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod read_ledger;
mod simulate;

pub use read_ledger::ReadLedger;
pub use simulate::Simulate;
