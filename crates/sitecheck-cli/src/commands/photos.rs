//! Photos command - List photos from the inbox feed
//!
//! Provides the `sitecheck photos` CLI command which:
//! 1. Loads one page of the feed, optionally filtered by date
//! 2. Optionally keeps only unassigned photos
//! 3. Prints them most recent first

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use sitecheck_core::domain::{DateFilter, PageRequest, Photo};

use super::{Backend, CommandContext};

#[derive(Debug, Args)]
pub struct PhotosCommand {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Photos per page (defaults to feed.page_size)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Only photos taken on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only photos taken on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only show photos not yet assigned to a folder
    #[arg(long)]
    pub unassigned: bool,
}

impl PhotosCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;

        let page = PageRequest::new(self.page, self.per_page.unwrap_or(config.feed.page_size))
            .context("Invalid page")?;
        let filter = build_filter(self.from, self.to)?;

        let backend = Backend::connect(&config)?;
        backend
            .photo_store
            .list(page, filter)
            .await
            .context("Failed to load photos")?;

        let photos = if self.unassigned {
            backend.photo_store.unassigned().await
        } else {
            backend.photo_store.photos().await
        };
        info!(count = photos.len(), page = page.number(), "Listed photos");

        if ctx.is_json() {
            let items: Vec<serde_json::Value> = photos.iter().map(photo_to_json).collect();
            formatter.print_json(&serde_json::json!({
                "page": page.number(),
                "per_page": page.size(),
                "photos": items,
            }));
        } else if photos.is_empty() {
            formatter.success("No photos on this page");
        } else {
            formatter.success(&format!(
                "{} photo{} (page {})",
                photos.len(),
                if photos.len() == 1 { "" } else { "s" },
                page.number()
            ));
            for photo in &photos {
                formatter.info(&photo_line(photo));
            }
        }

        Ok(())
    }
}

fn build_filter(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateFilter>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let filter = DateFilter::new(from, to).context("Invalid date range")?;
    Ok(Some(filter))
}

fn photo_line(photo: &Photo) -> String {
    let assignment = match photo.assigned_folder_id() {
        Some(folder) => format!("{} -> {}", photo.assignment_state(), folder),
        None => photo.assignment_state().to_string(),
    };
    format!(
        "{}  {}  {}  [{}]",
        photo.created_at().format("%Y-%m-%d %H:%M"),
        photo.id(),
        photo.title(),
        assignment
    )
}

fn photo_to_json(photo: &Photo) -> serde_json::Value {
    serde_json::json!({
        "id": photo.id().as_str(),
        "title": photo.title(),
        "created_at": photo.created_at().to_rfc3339(),
        "source_url": photo.source_url(),
        "assignment_state": photo.assignment_state().to_string(),
        "assigned_folder_id": photo.assigned_folder_id().map(|f| f.as_str()),
    })
}
