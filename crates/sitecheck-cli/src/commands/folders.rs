//! Folders command - List candidate target folders

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sitecheck_core::domain::Folder;

use super::{Backend, CommandContext};

#[derive(Debug, Args)]
pub struct FoldersCommand {
    /// Only folders whose title contains this text
    #[arg(long)]
    pub search: Option<String>,
}

impl FoldersCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;
        let backend = Backend::connect(&config)?;

        backend
            .folder_store
            .refetch()
            .await
            .context("Failed to load folders")?;
        let folders = backend.folder_store.list(self.search.as_deref()).await;
        info!(count = folders.len(), search = ?self.search, "Listed folders");

        if ctx.is_json() {
            let items: Vec<serde_json::Value> = folders.iter().map(folder_to_json).collect();
            formatter.print_json(&serde_json::json!({ "folders": items }));
        } else if folders.is_empty() {
            formatter.success("No matching folders");
        } else {
            formatter.success(&format!("{} folder(s)", folders.len()));
            for folder in &folders {
                formatter.info(&format!("{}  {}", folder.id(), folder.display_label()));
            }
        }

        Ok(())
    }
}

fn folder_to_json(folder: &Folder) -> serde_json::Value {
    serde_json::json!({
        "id": folder.id().as_str(),
        "title": folder.title(),
        "code": folder.code(),
        "project_name": folder.project_name(),
        "zone_name": folder.zone_name(),
        "label": folder.display_label(),
    })
}
