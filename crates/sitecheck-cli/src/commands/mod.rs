//! CLI subcommands
//!
//! Each command receives a [`CommandContext`] carrying the output format and
//! the resolved configuration file path.

pub mod assign;
pub mod config;
pub mod folders;
pub mod photos;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use sitecheck_api::client::ApiClient;
use sitecheck_api::provider::{HttpFolderDirectoryProvider, HttpPhotoFeedProvider};
use sitecheck_core::config::Config;
use sitecheck_core::stores::{FolderDirectoryStore, PhotoFeedStore};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub config_path: PathBuf,
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(format: OutputFormat, config_path: PathBuf, quiet: bool) -> Self {
        Self {
            format,
            config_path,
            quiet,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the configuration, falling back to defaults when the file is absent
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_config(&self) -> Result<Config> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        Config::load(&self.config_path)
    }
}

/// Stores wired to the HTTP backend
pub struct Backend {
    pub photo_store: Arc<PhotoFeedStore>,
    pub folder_store: Arc<FolderDirectoryStore>,
}

impl Backend {
    /// Builds the API client and both stores from configuration
    pub fn connect(config: &Config) -> Result<Self> {
        let client = Arc::new(
            ApiClient::from_config(&config.api).context("Failed to create API client")?,
        );
        debug!(base_url = %client.base_url(), "Connecting to SiteCheck API");

        let photo_store = Arc::new(PhotoFeedStore::new(Arc::new(HttpPhotoFeedProvider::new(
            client.clone(),
        ))));
        let folder_store = Arc::new(
            FolderDirectoryStore::new(Arc::new(HttpFolderDirectoryProvider::new(client)))
                .with_case_sensitive_search(config.folders.case_sensitive_search),
        );

        Ok(Self {
            photo_store,
            folder_store,
        })
    }
}
