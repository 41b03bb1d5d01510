//! Core synchronization engine for the mimic relay.
//!
//! Replays source-channel history into target channels through reusable
//! webhook endpoints, deduplicated by a durable ledger. The engine depends
//! only on the narrow capability traits in [`platform`]; the serenity
//! adapter lives in the `mimic-discord` crate.

pub mod endpoints;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod platform;
pub mod transcode;

pub use {
    engine::{ChannelPair, SyncEngine, SyncReport},
    error::{Error, Result},
};
