//! Assign command - Assign a photo to a folder
//!
//! Provides the `sitecheck assign <PHOTO_ID> <FOLDER_ID>` CLI command which
//! replays the drag-and-drop gesture headlessly:
//! 1. Loads the feed page holding the photo and the folder directory
//! 2. Drags the photo onto the folder's drop target
//! 3. Waits for the coordinator to confirm or roll back
//! 4. Prints the notifications it produced and exits non-zero on failure

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use sitecheck_core::dnd::{DragSource, DropTarget};
use sitecheck_core::domain::{FolderId, PageRequest, PhotoId, PhotoRole};
use sitecheck_core::ports::{FirstCandidateSelector, INotificationService, IRoleSelector, Notification};
use sitecheck_core::usecases::{AssignmentCoordinator, AssignmentError};

use crate::output::{get_formatter, OutputFormat};

use super::{Backend, CommandContext};

#[derive(Debug, Args)]
pub struct AssignCommand {
    /// Photo to assign
    pub photo_id: String,

    /// Target folder
    pub folder_id: String,

    /// Feed page the photo is on
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Never prompt; take the first legal role
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl AssignCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;

        let photo_id: PhotoId = self.photo_id.parse().context("Invalid photo ID")?;
        let folder_id: FolderId = self.folder_id.parse().context("Invalid folder ID")?;
        let page = PageRequest::new(self.page, config.feed.page_size).context("Invalid page")?;

        let backend = Backend::connect(&config)?;
        let (photos, folders) = tokio::join!(
            backend.photo_store.list(page, None),
            backend.folder_store.refetch()
        );
        photos.context("Failed to load photos")?;
        folders.context("Failed to load folders")?;

        let photo = backend
            .photo_store
            .get(&photo_id)
            .await
            .with_context(|| format!("Photo {photo_id} is not on page {}", page.number()))?;
        let folder = backend
            .folder_store
            .get(&folder_id)
            .await
            .with_context(|| format!("Folder {folder_id} not found"))?;

        let role_selector: Arc<dyn IRoleSelector> = if self.yes || ctx.is_json() {
            Arc::new(FirstCandidateSelector)
        } else {
            Arc::new(StdinRoleSelector)
        };
        let coordinator = Arc::new(
            AssignmentCoordinator::new(
                backend.photo_store.clone(),
                backend.folder_store.clone(),
                role_selector,
                Arc::new(TerminalNotifier::new(ctx.format, ctx.quiet)),
            )
            .with_options(config.assignment_options()),
        );

        // Replay the gesture
        let mut source = DragSource::for_photo(&photo);
        let payload = source.begin_drag().map_err(|_| {
            anyhow::anyhow!(
                "Photo {photo_id} is already {} and cannot be assigned",
                photo.assignment_state()
            )
        })?;
        let mut target = DropTarget::for_folder(&folder);
        target.drag_enter();
        let task = target.drop_into(&payload.encode(), &coordinator)?;
        source.drop_on_target()?;
        debug!(photo_id = %photo_id, folder = %folder.display_label(), "Drop dispatched");

        let outcome = task.await.context("Assignment task panicked")?;
        source.reset()?;

        match outcome {
            Ok(receipt) => {
                info!(assignment_id = %receipt.assignment_id, "Assignment complete");
                if ctx.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "success": true,
                        "assignment_id": receipt.assignment_id.to_string(),
                        "photo_id": receipt.photo.id().as_str(),
                        "folder_id": receipt.folder_id.as_str(),
                        "role": receipt.role.to_string(),
                        "reconciled": receipt.reconciled,
                    }));
                } else {
                    formatter.info(&format!("Folder: {}", folder.display_label()));
                    if !receipt.reconciled {
                        formatter.info("Displayed data was not refreshed after the assignment");
                    }
                }
                Ok(())
            }
            Err(AssignmentError::RoleSelectionCancelled) => {
                formatter.info("Cancelled, nothing was changed");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Assignment failed")),
        }
    }
}

// ============================================================================
// Terminal adapters for the coordinator's ports
// ============================================================================

/// Renders coordinator notifications on the terminal
struct TerminalNotifier {
    format: OutputFormat,
    quiet: bool,
}

impl TerminalNotifier {
    fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }
}

#[async_trait::async_trait]
impl INotificationService for TerminalNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        get_formatter(self.format, self.quiet).notification(notification);
        Ok(())
    }
}

/// Asks for the role on stdin when more than one is legal
struct StdinRoleSelector;

#[async_trait::async_trait]
impl IRoleSelector for StdinRoleSelector {
    async fn ask(
        &self,
        photo_id: &PhotoId,
        folder_id: &FolderId,
        candidates: &[PhotoRole],
    ) -> Result<Option<PhotoRole>> {
        let prompt = format!(
            "Assign photo {photo_id} to folder {folder_id} as [{}] (empty to cancel): ",
            candidates
                .iter()
                .enumerate()
                .map(|(i, role)| format!("{}={role}", i + 1))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let line = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
            let mut stderr = std::io::stderr();
            stderr.write_all(prompt.as_bytes())?;
            stderr.flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await
        .context("Role prompt task failed")?
        .context("Failed to read role from stdin")?;

        Ok(parse_role_answer(&line, candidates))
    }
}

/// Accepts a role name or its 1-based position; anything else cancels
fn parse_role_answer(input: &str, candidates: &[PhotoRole]) -> Option<PhotoRole> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| candidates.get(i)).copied();
    }
    input
        .parse::<PhotoRole>()
        .ok()
        .filter(|role| candidates.contains(role))
}
