//! File-backed persistence for progression ledgers.
mod store;

pub use store::FileStore;
