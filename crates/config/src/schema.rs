//! Config schema types.

use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// One source → target relay direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelPairConfig {
    pub source: u64,
    pub target: u64,
}

/// Discord credentials and the trigger allowlist.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token from the developer portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// User IDs allowed to trigger a sync. Members holding the
    /// Administrator permission always pass.
    pub allowlist: Vec<u64>,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("allowlist", &self.allowlist)
            .finish()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            allowlist: Vec::new(),
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// On-disk state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Webhook locator cache.
    pub webhooks_file: PathBuf,
    /// Delivered-message ledger.
    pub ledger_file: PathBuf,
    /// Crash reports: `error.log` plus `archive/`.
    pub log_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            webhooks_file: PathBuf::from("webhooks.json"),
            ledger_file: PathBuf::from("ledger.json"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Sync-run tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay between successive deliveries, in milliseconds. Fixed pacing
    /// is the whole rate-limit policy.
    pub pace_ms: u64,

    /// Display name given to webhooks this bot creates.
    pub webhook_name: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            pace_ms: 1500,
            webhook_name: "mimic".into(),
        }
    }
}

/// Root configuration, immutable for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MimicConfig {
    pub discord: DiscordConfig,
    /// Ordered channel pairs; a duplicated source keeps its first mapping.
    pub pairs: Vec<ChannelPairConfig>,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = MimicConfig::default();
        assert!(cfg.discord.token.expose_secret().is_empty());
        assert!(cfg.pairs.is_empty());
        assert_eq!(cfg.sync.pace_ms, 1500);
        assert_eq!(cfg.sync.webhook_name, "mimic");
        assert_eq!(cfg.storage.ledger_file, PathBuf::from("ledger.json"));
    }

    #[test]
    fn deserialize_from_toml() {
        let toml = r#"
            [discord]
            token = "bot-token"
            allowlist = [111, 222]

            [[pairs]]
            source = 100
            target = 200

            [[pairs]]
            source = 101
            target = 201

            [sync]
            pace_ms = 500
        "#;
        let cfg: MimicConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.discord.token.expose_secret(), "bot-token");
        assert_eq!(cfg.discord.allowlist, vec![111, 222]);
        assert_eq!(cfg.pairs.len(), 2);
        assert_eq!(cfg.pairs[0], ChannelPairConfig { source: 100, target: 200 });
        assert_eq!(cfg.sync.pace_ms, 500);
        // defaults for unspecified sections
        assert_eq!(cfg.storage.webhooks_file, PathBuf::from("webhooks.json"));
    }

    #[test]
    fn serialize_roundtrip_keeps_token() {
        let cfg = MimicConfig {
            discord: DiscordConfig {
                token: Secret::new("tok".into()),
                allowlist: vec![1],
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: MimicConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg2.discord.token.expose_secret(), "tok");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = DiscordConfig {
            token: Secret::new("very-secret".into()),
            allowlist: Vec::new(),
        };
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("very-secret"));
    }
}
