use std::fmt;

use thiserror::Error;

use super::parse::ParseError;

/// Errors raised anywhere in the rename pipeline.
///
/// `Configuration` is the only variant that aborts a run; everything else is
/// contained to the item that produced it (see `BatchDriver::run`).
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("analysis service error: {0}")]
    AnalysisService(String),
    #[error("invalid analysis response: {0}")]
    InvalidResponseFormat(#[from] ParseError),
    #[error("storage service error: {0}")]
    StorageService(String),
}

/// Reference to one file in the storage collection, as returned by listing.
/// The downloaded payload is never stored here; it lives only for the
/// duration of a single item's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// The structured triple extracted from the model's `DATE_TYPE_SUMMARY`
/// response. The summary may legitimately contain underscores; splitting
/// stops after the first two delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub date: String,
    pub document_type: String,
    pub summary: String,
}

impl AnalysisResult {
    /// Re-joins the triple into the filename base (no extension yet).
    pub fn filename_base(&self) -> String {
        if self.summary.is_empty() {
            format!("{}_{}", self.date, self.document_type)
        } else {
            format!("{}_{}_{}", self.date, self.document_type, self.summary)
        }
    }
}

/// What happened to a single item during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Renamed {
        file_id: String,
        old_name: String,
        new_name: String,
    },
    Skipped {
        file_id: String,
        name: String,
        mime_type: String,
    },
    Failed {
        file_id: String,
        name: String,
        reason: String,
    },
}

/// Per-run report: every item ends up in exactly one outcome bucket.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchSummary {
    pub fn new(outcomes: Vec<ItemOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Renamed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Failed { .. }))
            .count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_base_joins_triple() {
        let result = AnalysisResult {
            date: "12-01-2024".to_string(),
            document_type: "Email".to_string(),
            summary: "short_note".to_string(),
        };
        assert_eq!(result.filename_base(), "12-01-2024_Email_short_note");
    }

    #[test]
    fn filename_base_without_summary() {
        let result = AnalysisResult {
            date: "12-01-2024".to_string(),
            document_type: "Email".to_string(),
            summary: String::new(),
        };
        assert_eq!(result.filename_base(), "12-01-2024_Email");
    }

    #[test]
    fn summary_counts_each_bucket_once() {
        let summary = BatchSummary::new(vec![
            ItemOutcome::Renamed {
                file_id: "1".to_string(),
                old_name: "a.png".to_string(),
                new_name: "b.png".to_string(),
            },
            ItemOutcome::Skipped {
                file_id: "2".to_string(),
                name: "notes.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
            },
            ItemOutcome::Failed {
                file_id: "3".to_string(),
                name: "c.jpg".to_string(),
                reason: "boom".to_string(),
            },
        ]);

        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.to_string(), "1 processed, 1 skipped, 1 failed");
    }
}
