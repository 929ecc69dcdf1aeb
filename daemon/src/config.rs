//! Daemon configuration, loaded from TOML and overridden by CLI flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cryptobook_types::AccountName;
use cryptobook_utils::LogFormat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// The ledger's own identity; the only account allowed to create tokens.
    #[serde(default = "default_contract")]
    pub contract: AccountName,

    /// Identities known to exist. Transfers to anyone else are rejected.
    #[serde(default)]
    pub accounts: Vec<AccountName>,

    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./cryptobook_data")
}

fn default_contract() -> AccountName {
    AccountName::from_raw(CONTRACT_RAW)
}

fn default_map_size_mb() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Packed form of `cryptobook`.
const CONTRACT_RAW: u64 = 0x45FD_5CD0_F4A4_0000;

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            contract: default_contract(),
            accounts: Vec::new(),
            map_size_mb: default_map_size_mb(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_contract_is_cryptobook() {
        assert_eq!(DaemonConfig::default().contract.to_string(), "cryptobook");
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed = DaemonConfig::from_toml_str("").unwrap();
        assert_eq!(parsed, DaemonConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let parsed = DaemonConfig::from_toml_str(
            r#"
            contract = "token"
            accounts = ["alice", "bob"]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.contract.to_string(), "token");
        assert_eq!(parsed.accounts.len(), 2);
        assert_eq!(parsed.log_format, LogFormat::Json);
        assert_eq!(parsed.map_size_mb, 64);
    }

    #[test]
    fn invalid_account_name_is_rejected() {
        assert!(DaemonConfig::from_toml_str(r#"accounts = ["Alice"]"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cryptobook.toml");
        std::fs::write(&path, "map_size_mb = 8\n").unwrap();
        let parsed = DaemonConfig::from_toml_file(&path).unwrap();
        assert_eq!(parsed.map_size_bytes(), 8 * 1024 * 1024);
    }
}
