//! Startup validation. Configuration faults are fatal before the bot
//! connects; softer issues are logged and normalized away.

use std::collections::HashSet;

use {secrecy::ExposeSecret, tracing::warn};

use crate::schema::{ChannelPairConfig, MimicConfig};

/// Reject configurations the bot cannot run with.
pub fn validate(config: &MimicConfig) -> anyhow::Result<()> {
    if config.discord.token.expose_secret().trim().is_empty() {
        anyhow::bail!("discord.token is required");
    }
    if config.pairs.is_empty() {
        warn!("no channel pairs configured, sync runs will deliver nothing");
    }
    Ok(())
}

/// Drop pairs whose source channel already appeared earlier in the list.
///
/// A source may only feed one target; first match wins.
pub fn dedup_pairs(pairs: &[ChannelPairConfig]) -> Vec<ChannelPairConfig> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(pairs.len());
    for pair in pairs {
        if seen.insert(pair.source) {
            out.push(*pair);
        } else {
            warn!(
                source = pair.source,
                target = pair.target,
                "duplicate source channel in pairs, keeping the first mapping"
            );
        }
    }
    out
}
