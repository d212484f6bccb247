use async_trait::async_trait;

use super::models::RenameError;
use super::parse::{ensure_extension, is_canonical_date, parse_analysis, sanitize_filename, ParseError};

/// The fixed instruction sent with every image. The model is asked for a
/// single delimited line, not a conversation.
const ANALYSIS_PROMPT: &str = "PERFORM OCR on this image. Then, extract the following three pieces of information to create a structured filename: 1. The most accurate date (DD-MM-YYYY). 2. The type of document (e.g., 'Email', 'Text_Message', 'Medical_Bill'). 3. A short, professional summary of the content (5 words max). Format the output EXACTLY like this: [DATE]_[TYPE]_[SUMMARY]";

/// Seam to the external multimodal analysis service.
///
/// One operation: image bytes plus an instruction in, free text out. Keeping
/// the contract this small lets tests substitute deterministic literal
/// responses for the live service.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<String, RenameError>;
}

/// Turns one image into a validated, extension-complete filename via a
/// single analysis call. No retries: a failed call fails the operation and
/// the caller decides what to do with it.
pub struct FilenameSynthesizer<P: AnalysisProvider> {
    provider: P,
    instruction: String,
}

impl<P: AnalysisProvider> FilenameSynthesizer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            instruction: ANALYSIS_PROMPT.to_string(),
        }
    }

    pub async fn synthesize(
        &self,
        image: &[u8],
        mime_type: &str,
        original_name: &str,
    ) -> Result<String, RenameError> {
        let raw = self
            .provider
            .analyze_image(image, mime_type, &self.instruction)
            .await?;

        let result = parse_analysis(&raw)?;

        if !is_canonical_date(&result.date) {
            tracing::warn!(
                "Date segment {:?} from analysis of {} is not DD-MM-YYYY",
                result.date,
                original_name
            );
        }

        let base = sanitize_filename(&result.filename_base());
        if base.is_empty() {
            return Err(ParseError::NoSafeCharacters.into());
        }

        Ok(ensure_extension(&base, original_name, mime_type))
    }
}
