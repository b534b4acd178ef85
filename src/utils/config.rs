use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::paths::ContainmentCheck;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum manifest entries mirrored at once (0 = one task per entry, no limit)
    pub max_concurrency: usize,

    /// How sources inside the target folder are detected
    pub containment: ContainmentCheck,

    /// Sync each copied file to stable storage before closing it
    pub sync_files: bool,

    /// Write a timestamped log file into the target folder
    pub log_to_file: bool,

    /// Log file name prefix
    pub log_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            containment: ContainmentCheck::Substring,
            sync_files: true,
            log_to_file: true,
            log_prefix: "backupLog".to_string(),
        }
    }
}

impl Config {
    /// Load config from environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(limit) = lookup("BACKUP_MAX_CONCURRENCY") {
            config.max_concurrency = limit
                .trim()
                .parse()
                .with_context(|| format!("BACKUP_MAX_CONCURRENCY must be a count, got '{}'", limit))?;
        }

        if let Some(check) = lookup("BACKUP_CONTAINMENT") {
            config.containment = check
                .parse()
                .map_err(|e: String| anyhow::anyhow!("BACKUP_CONTAINMENT: {}", e))?;
        }

        if let Some(sync) = lookup("BACKUP_SYNC_FILES") {
            config.sync_files = sync
                .trim()
                .parse()
                .with_context(|| format!("BACKUP_SYNC_FILES must be true or false, got '{}'", sync))?;
        }

        if let Some(log) = lookup("BACKUP_LOG_TO_FILE") {
            config.log_to_file = log
                .trim()
                .parse()
                .with_context(|| format!("BACKUP_LOG_TO_FILE must be true or false, got '{}'", log))?;
        }

        if let Some(prefix) = lookup("BACKUP_LOG_PREFIX") {
            if !prefix.trim().is_empty() {
                config.log_prefix = prefix.trim().to_string();
            }
        }

        Ok(config)
    }
}

pub fn load_config() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_concurrency, 0);
        assert_eq!(config.containment, ContainmentCheck::Substring);
        assert!(config.sync_files);
        assert!(config.log_to_file);
        assert_eq!(config.log_prefix, "backupLog");
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BACKUP_MAX_CONCURRENCY", "8"),
            ("BACKUP_CONTAINMENT", "prefix"),
            ("BACKUP_SYNC_FILES", "false"),
            ("BACKUP_LOG_TO_FILE", "false"),
            ("BACKUP_LOG_PREFIX", "nightly"),
        ]))
        .unwrap();
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.containment, ContainmentCheck::PathPrefix);
        assert!(!config.sync_files);
        assert!(!config.log_to_file);
        assert_eq!(config.log_prefix, "nightly");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("BACKUP_MAX_CONCURRENCY", "many")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BACKUP_CONTAINMENT", "glob")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BACKUP_SYNC_FILES", "yes please")])).is_err());
    }
}
