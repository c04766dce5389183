use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use importer_core::AccountConfig;
use importer_engine::FetchSettings;
use importer_logging::{importer_info, importer_warn};
use serde::Deserialize;

/// On-disk shape of `importer.ron`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: String,
    accounts: BTreeMap<String, Vec<String>>,
    storage_dir: PathBuf,
    session_dir: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            base_url: FetchSettings::default().base_url,
            accounts: BTreeMap::new(),
            storage_dir: PathBuf::from("storage"),
            session_dir: PathBuf::from("session"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fetch: FetchSettings,
    pub accounts: AccountConfig,
    pub storage_dir: PathBuf,
    pub session_dir: PathBuf,
}

pub fn load(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let config = parse(&content, base)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    importer_info!(
        "Loaded config from {:?}: {} accounts",
        path,
        config.accounts.len()
    );
    Ok(config)
}

/// Relative directories resolve against `base`, the config file's directory.
fn parse(content: &str, base: &Path) -> Result<AppConfig> {
    let file: ConfigFile = ron::from_str(content)?;

    for (account_id, slots) in &file.accounts {
        if account_id.trim().is_empty() {
            anyhow::bail!("account identifiers must not be empty");
        }
        if slots.is_empty() {
            importer_warn!("Account {} has no slots and will be skipped", account_id);
        }
    }

    Ok(AppConfig {
        fetch: FetchSettings {
            base_url: file.base_url,
            ..FetchSettings::default()
        },
        accounts: AccountConfig::new(file.accounts),
        storage_dir: base.join(file.storage_dir),
        session_dir: base.join(file.session_dir),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn full_config_parses() {
        let content = r#"(
            base_url: "http://localhost:8080/inv/",
            accounts: {
                "100000001": ["main-inventory"],
                "100000002": ["account-2-inventory", "backup"],
                "100000003": [],
            },
            storage_dir: "slots",
            session_dir: "/tmp/importer-session",
        )"#;

        let config = parse(content, Path::new("/etc/importer")).unwrap();

        assert_eq!(config.fetch.base_url, "http://localhost:8080/inv/");
        assert_eq!(config.accounts.len(), 3);
        assert_eq!(
            config.accounts.slots("100000002"),
            Some(&["account-2-inventory".to_string(), "backup".to_string()][..])
        );
        assert_eq!(config.accounts.slots("100000003"), Some(&[][..]));
        assert_eq!(config.storage_dir, PathBuf::from("/etc/importer/slots"));
        assert_eq!(config.session_dir, PathBuf::from("/tmp/importer-session"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = parse("(accounts: {})", Path::new("")).unwrap();

        assert!(config.accounts.is_empty());
        assert_eq!(config.fetch.base_url, FetchSettings::default().base_url);
        assert_eq!(config.storage_dir, PathBuf::from("storage"));
        assert_eq!(config.session_dir, PathBuf::from("session"));
    }

    #[test]
    fn unknown_fields_and_blank_ids_are_rejected() {
        assert!(parse("(cookie: \"x\")", Path::new("")).is_err());
        assert!(parse(r#"(accounts: { " ": ["slot"] })"#, Path::new("")).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.ron"));
    }

    #[test]
    fn load_reads_file_relative_to_its_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("importer.ron");
        fs::write(&path, r#"(accounts: { "A": ["slotA"] })"#).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.storage_dir, temp.path().join("storage"));
    }
}
