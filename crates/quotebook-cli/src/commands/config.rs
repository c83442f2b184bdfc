//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quotebook_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str = "data_dir, session_dir, sync_url, sync_enabled, sync_limit, \
                          sync_interval_secs, sync_timeout_secs, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "session_dir": config.session_dir,
                    "sync_url": config.sync_url,
                    "sync_enabled": config.sync_enabled,
                    "sync_limit": config.sync_limit,
                    "sync_interval_secs": config.sync_interval_secs,
                    "sync_timeout_secs": config.sync_timeout_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!("  session_dir:        {}", config.session_dir.display());
            println!("  sync_url:           {}", config.sync_url);
            println!("  sync_enabled:       {}", config.sync_enabled);
            println!("  sync_limit:         {}", config.sync_limit);
            println!("  sync_interval_secs: {}", config.sync_interval_secs);
            println!("  sync_timeout_secs:  {}", config.sync_timeout_secs);
            println!(
                "  log_file:           {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "session_dir" => config.session_dir = value.into(),
        "sync_url" => {
            if value.trim().is_empty() {
                bail!("sync_url cannot be empty. Disable sync with sync_enabled false instead.");
            }
            config.sync_url = value.to_string();
        }
        "sync_enabled" => {
            config.sync_enabled = value
                .parse()
                .context("Invalid value for sync_enabled. Use 'true' or 'false'.")?;
        }
        "sync_limit" => {
            config.sync_limit = value
                .parse()
                .context("Invalid value for sync_limit. Use a whole number.")?;
        }
        "sync_interval_secs" => {
            config.sync_interval_secs = value
                .parse()
                .context("Invalid value for sync_interval_secs. Use a number of seconds.")?;
        }
        "sync_timeout_secs" => {
            config.sync_timeout_secs = value
                .parse()
                .context("Invalid value for sync_timeout_secs. Use a number of seconds.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "sync_enabled", "false").unwrap();
        apply(&mut config, "sync_limit", "10").unwrap();
        apply(&mut config, "sync_interval_secs", "90").unwrap();
        apply(&mut config, "log_file", "/tmp/quotebook.log").unwrap();

        assert!(!config.sync_enabled);
        assert_eq!(config.sync_limit, 10);
        assert_eq!(config.sync_interval_secs, 90);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/quotebook.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply(&mut config, "sync_enabled", "maybe").is_err());
        assert!(apply(&mut config, "sync_limit", "-1").is_err());
        assert!(apply(&mut config, "sync_url", " ").is_err());
        assert!(apply(&mut config, "favorite_color", "blue").is_err());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let output = Output::new(OutputFormat::Quiet);

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        set("sync_limit".to_string(), "7".to_string(), Some(&path), &output).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("sync_limit = 7"));
    }
}
