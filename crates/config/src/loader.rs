use std::path::{Path, PathBuf};

use {anyhow::Context, tracing::debug};

use crate::{env_subst::substitute_env, schema::MimicConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["mimic.toml", "mimic.yaml", "mimic.yml", "mimic.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<MimicConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./mimic.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/mimic/mimic.{toml,yaml,yml,json}` (user-global)
///
/// A missing config file is fatal: the bot cannot run without a token and
/// channel pairs.
pub fn discover_and_load() -> anyhow::Result<MimicConfig> {
    let path = find_config_file()
        .context("no config file found (searched ./ and ~/.config/mimic/)")?;
    debug!(path = %path.display(), "loading config");
    load_config(&path)
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(base) = dirs_next::config_dir() {
        let config_dir = base.join("mimic");
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<MimicConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, tempfile::TempDir};

    #[test]
    fn loads_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mimic.toml");
        std::fs::write(
            &path,
            "[discord]\ntoken = \"t\"\n\n[[pairs]]\nsource = 1\ntarget = 2\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.discord.token.expose_secret(), "t");
        assert_eq!(cfg.pairs.len(), 1);
    }

    #[test]
    fn loads_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mimic.json");
        std::fs::write(
            &path,
            r#"{"discord": {"token": "t"}, "pairs": [{"source": 5, "target": 6}]}"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.pairs[0].source, 5);
    }

    #[test]
    fn loads_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mimic.yaml");
        std::fs::write(
            &path,
            "discord:\n  token: t\npairs:\n  - source: 7\n    target: 8\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.pairs[0].target, 8);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config(&tmp.path().join("absent.toml")).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mimic.toml");
        std::fs::write(&path, "this is not toml = = =").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mimic.ini");
        std::fs::write(&path, "token=t").unwrap();
        assert!(load_config(&path).is_err());
    }
}
