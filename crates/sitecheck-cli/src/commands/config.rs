//! Config command - View and manage SiteCheck configuration
//!
//! Provides the `sitecheck config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Prints the configuration file path

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use sitecheck_core::config::Config;

use super::CommandContext;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "feed.page_size")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

/// Keys accepted by `config set`, with a short description
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("api.base_url", "REST API root URL"),
    ("api.timeout_secs", "Per-request timeout in seconds"),
    ("api.token_env", "Environment variable holding the bearer token"),
    ("feed.page_size", "Photos per page"),
    ("feed.refetch_after_assignment", "true|false"),
    ("folders.case_sensitive_search", "true|false"),
    ("logging.level", "trace|debug|info|warn|error"),
];

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx).await,
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value).await,
            ConfigCommand::Validate => self.execute_validate(ctx).await,
            ConfigCommand::Path => self.execute_path(ctx).await,
        }
    }

    async fn execute_show(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = ctx.config_path();
        let config = Config::load_or_default(config_path);

        info!(config_path = %config_path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    async fn execute_set(&self, ctx: &CommandContext, key: &str, value: &str) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = ctx.config_path();
        let mut config = Config::load_or_default(config_path);

        info!(key = %key, value = %value, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "value": value,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (name, description) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {name:<32} - {description}"));
                }
            }
            return Ok(());
        }

        // Validate the new config before saving
        let errors = config.validate();
        if !errors.is_empty() {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "value": value,
                    "errors": error_msgs,
                }));
            } else {
                formatter.error(&format!(
                    "Invalid value for '{}': {}",
                    key,
                    error_msgs.join("; ")
                ));
            }
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
        }
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        std::fs::write(config_path, yaml).context("Failed to write configuration file")?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "value": value,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {} = {}", key, value));
            formatter.info(&format!("Saved to {}", config_path.display()));
        }

        Ok(())
    }

    async fn execute_validate(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = ctx.config_path();

        if !config_path.exists() {
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": true,
                    "config_path": config_path.display().to_string(),
                    "errors": [],
                    "note": "Configuration file not found. Using defaults.",
                }));
            } else {
                formatter.info(&format!(
                    "Configuration file not found at {}",
                    config_path.display()
                ));
                formatter.info(
                    "Using default configuration. Run 'sitecheck config set <key> <value>' to create one.",
                );
            }
            return Ok(());
        }

        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if ctx.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [format!("{e:#}")],
                    }));
                } else {
                    formatter.error(&format!("{e:#}"));
                }
                anyhow::bail!("Configuration file is not valid YAML");
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");
        let errors = config.validate();

        if ctx.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Configuration has {} error(s)", errors.len())
        }
    }

    async fn execute_path(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = ctx.config_path();

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "config_path": config_path.display().to_string(),
                "exists": config_path.exists(),
            }));
        } else {
            println!("{}", config_path.display());
        }
        Ok(())
    }
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- api ---
        "api.base_url" => {
            config.api.base_url = value.trim_end_matches('/').to_string();
        }
        "api.timeout_secs" => {
            config.api.timeout_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for api.timeout_secs")?;
        }
        "api.token_env" => {
            config.api.token_env = value.to_string();
        }

        // --- feed ---
        "feed.page_size" => {
            config.feed.page_size = value
                .parse::<u32>()
                .context("Expected a positive integer for feed.page_size")?;
        }
        "feed.refetch_after_assignment" => {
            config.feed.refetch_after_assignment = value
                .parse::<bool>()
                .context("Expected true or false")?;
        }

        // --- folders ---
        "folders.case_sensitive_search" => {
            config.folders.case_sensitive_search = value
                .parse::<bool>()
                .context("Expected true or false")?;
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = value.to_string();
        }

        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}
