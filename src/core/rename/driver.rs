use async_trait::async_trait;

use super::models::{BatchSummary, FileRef, ItemOutcome, RenameError};
use super::synthesizer::{AnalysisProvider, FilenameSynthesizer};

/// Seam to the external storage collection. Three operations are all the
/// driver needs, independent of the storage vendor.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileRef>, RenameError>;
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, RenameError>;
    async fn rename(&self, file_id: &str, new_name: &str) -> Result<(), RenameError>;
}

/// Sequential batch loop: enumerate, filter to images, and run each item
/// through download → synthesize → rename. Per-item failures are caught at
/// the loop boundary so one bad file never aborts the batch; only the
/// initial enumeration can fail the whole run.
pub struct BatchDriver<P: AnalysisProvider, S: StorageProvider> {
    synthesizer: FilenameSynthesizer<P>,
    storage: S,
}

impl<P, S> BatchDriver<P, S>
where
    P: AnalysisProvider,
    S: StorageProvider,
{
    pub fn new(synthesizer: FilenameSynthesizer<P>, storage: S) -> Self {
        Self {
            synthesizer,
            storage,
        }
    }

    /// Processes every item in the folder, in listing order, and returns the
    /// per-item outcomes. Already-renamed items stay renamed if the run is
    /// killed partway; there is no rollback.
    pub async fn run(&self, folder_id: &str) -> Result<BatchSummary, RenameError> {
        let items = self.storage.list_folder(folder_id).await?;
        tracing::info!("Found {} file(s) in folder", items.len());

        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            if !item.mime_type.starts_with("image/") {
                tracing::info!("Skipping non-image file {} ({})", item.name, item.mime_type);
                outcomes.push(ItemOutcome::Skipped {
                    file_id: item.id,
                    name: item.name,
                    mime_type: item.mime_type,
                });
                continue;
            }

            match self.process_item(&item).await {
                Ok(new_name) => {
                    println!("Processed: {} -> {}", item.name, new_name);
                    outcomes.push(ItemOutcome::Renamed {
                        file_id: item.id,
                        old_name: item.name,
                        new_name,
                    });
                }
                Err(err) => {
                    tracing::warn!("Failed to process {} ({}): {}", item.name, item.id, err);
                    outcomes.push(ItemOutcome::Failed {
                        file_id: item.id,
                        name: item.name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(BatchSummary::new(outcomes))
    }

    async fn process_item(&self, item: &FileRef) -> Result<String, RenameError> {
        let payload = self.storage.download(&item.id).await?;
        if payload.is_empty() {
            return Err(RenameError::StorageService(format!(
                "downloaded empty payload for {}",
                item.id
            )));
        }

        let new_name = self
            .synthesizer
            .synthesize(&payload, &item.mime_type, &item.name)
            .await?;

        self.storage.rename(&item.id, &new_name).await?;
        Ok(new_name)
    }
}
