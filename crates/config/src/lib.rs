//! Configuration loading, validation, and env substitution.
//!
//! Config files: `mimic.toml`, `mimic.yaml`, or `mimic.json`,
//! searched in `./` then `~/.config/mimic/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. Configuration
//! is loaded once at process start and treated as immutable afterwards.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{discover_and_load, load_config},
    schema::{ChannelPairConfig, DiscordConfig, MimicConfig, StorageConfig, SyncConfig},
    validate::{dedup_pairs, validate},
};
