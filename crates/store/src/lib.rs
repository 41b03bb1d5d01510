//! Durable JSON persistence for the relay.
//!
//! Two kinds of on-disk state: map documents (webhook cache, sync ledger)
//! with atomic writes, and crash reports (latest + timestamped archive).

pub mod crash;
pub mod error;
pub mod map_store;

pub use {
    crash::CrashLog,
    error::{Error, Result},
    map_store::MapStore,
};
