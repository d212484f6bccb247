//! Parsing and normalization of the model's free-text response.
//!
//! The model is prompted for `[DATE]_[TYPE]_[SUMMARY]` but is not a trusted
//! source: it may return conversational text, refusals, brackets, code
//! fences, or extra underscores inside the summary. Everything here is pure
//! so it can be tested with literal strings, without any network call.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use super::models::AnalysisResult;

/// Why a model response could not be turned into a filename.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,
    #[error("response contains no '_' delimiter")]
    MissingDelimiter,
    #[error("response has an empty date or document type segment")]
    EmptySegment,
    #[error("response contains no filename-safe characters")]
    NoSafeCharacters,
}

/// Parses a raw model response into the structured triple.
///
/// Splits on the first two underscores only; any further underscores belong
/// to the summary. A response with exactly two non-empty segments is accepted
/// with an empty summary. Anything without a delimiter (refusals, chat) is
/// rejected.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ParseError> {
    let cleaned = cleanup_response(text);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut segments = cleaned.splitn(3, '_');
    let date = segments.next().unwrap_or_default();
    let document_type = segments.next().ok_or(ParseError::MissingDelimiter)?;
    if date.is_empty() || document_type.is_empty() {
        return Err(ParseError::EmptySegment);
    }
    let summary = segments.next().unwrap_or_default();

    Ok(AnalysisResult {
        date: date.to_string(),
        document_type: document_type.to_string(),
        summary: summary.to_string(),
    })
}

/// Strips the wrapping the model tends to add around the filename itself:
/// whitespace, markdown code fences, quotes, and the literal brackets from
/// the `[DATE]_[TYPE]_[SUMMARY]` format example.
fn cleanup_response(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '`' || c == '"' || c == '\'')
        .replace(['[', ']'], "")
        .trim()
        .to_string()
}

/// Whether the date segment matches the requested `DD-MM-YYYY` shape.
/// Used for a logged warning only; a malformed date does not reject the
/// response.
pub fn is_canonical_date(segment: &str) -> bool {
    NaiveDate::parse_from_str(segment, "%d-%m-%Y").is_ok()
}

/// Replaces characters that are unsafe in filenames (path separators,
/// reserved punctuation, control characters) and trims leading/trailing
/// dots and spaces.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    replaced.trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// Ensures the candidate filename carries an extension. Preference order:
/// an extension already present on the candidate, then the original file's
/// extension, then one derived from the MIME type.
pub fn ensure_extension(candidate: &str, original_name: &str, mime_type: &str) -> String {
    if Path::new(candidate).extension().is_some() {
        return candidate.to_string();
    }
    if let Some(ext) = Path::new(original_name).extension().and_then(|e| e.to_str()) {
        return format!("{}.{}", candidate, ext);
    }
    format!("{}.{}", candidate, extension_for_mime(mime_type))
}

/// Maps an image MIME type to its canonical extension, with a generic
/// default for anything unrecognized.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/tiff" => "tif",
        "image/bmp" => "bmp",
        "image/heic" => "heic",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_triple() {
        let result = parse_analysis("12-01-2024_Email_short note").unwrap();
        assert_eq!(result.date, "12-01-2024");
        assert_eq!(result.document_type, "Email");
        assert_eq!(result.summary, "short note");
    }

    #[test]
    fn summary_keeps_extra_underscores() {
        let result = parse_analysis("12-01-2024_Text_Message_about_rent").unwrap();
        assert_eq!(result.document_type, "Text");
        assert_eq!(result.summary, "Message_about_rent");
    }

    #[test]
    fn two_segments_accepted_with_empty_summary() {
        let result = parse_analysis("12-01-2024_Email").unwrap();
        assert_eq!(result.date, "12-01-2024");
        assert_eq!(result.document_type, "Email");
        assert_eq!(result.summary, "");
    }

    #[test]
    fn strips_brackets_and_whitespace() {
        let result = parse_analysis("  [12-01-2024]_[Email]_[Rent reminder]\n").unwrap();
        assert_eq!(result.date, "12-01-2024");
        assert_eq!(result.document_type, "Email");
        assert_eq!(result.summary, "Rent reminder");
    }

    #[test]
    fn rejects_empty_response() {
        assert_eq!(parse_analysis("   "), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_response_without_delimiter() {
        assert_eq!(
            parse_analysis("I cannot read this image, sorry."),
            Err(ParseError::MissingDelimiter)
        );
    }

    #[test]
    fn rejects_empty_leading_segments() {
        assert_eq!(parse_analysis("_Email_note"), Err(ParseError::EmptySegment));
        assert_eq!(parse_analysis("12-01-2024_"), Err(ParseError::EmptySegment));
    }

    #[test]
    fn canonical_date_check() {
        assert!(is_canonical_date("12-01-2024"));
        assert!(is_canonical_date("29-02-2024")); // leap day
        assert!(!is_canonical_date("2024-01-12"));
        assert!(!is_canonical_date("32-01-2024"));
        assert!(!is_canonical_date("unknown"));
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(
            sanitize_filename("12-01-2024_Email_a/b:c?d"),
            "12-01-2024_Email_a-b-c-d"
        );
    }

    #[test]
    fn sanitize_trims_dots_and_spaces() {
        assert_eq!(sanitize_filename(" .name. "), "name");
    }

    #[test]
    fn extension_kept_from_original_name() {
        assert_eq!(
            ensure_extension("12-01-2024_Email_short_note", "scan.png", "image/png"),
            "12-01-2024_Email_short_note.png"
        );
    }

    #[test]
    fn extension_derived_from_mime_when_original_has_none() {
        assert_eq!(
            ensure_extension("12-01-2024_Email_short_note", "scan", "image/jpeg"),
            "12-01-2024_Email_short_note.jpg"
        );
    }

    #[test]
    fn existing_extension_not_duplicated() {
        assert_eq!(
            ensure_extension("already_named.png", "scan.jpg", "image/jpeg"),
            "already_named.png"
        );
    }

    #[test]
    fn unknown_mime_falls_back_to_generic_extension() {
        assert_eq!(extension_for_mime("image/x-unknown"), "jpg");
    }
}
