//! Input validation utilities
//!
//! Provides caller-side validation for processing requests:
//! - Copy count bounds (the processor itself does not revalidate them)
//! - Source video checks (existence, container extension, size cap)
//! - Filename sanitization

use std::path::Path;
use thiserror::Error;

use crate::core::config;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Copy count outside the accepted 1-3 range
    #[error("Copy count {0} is out of range ({min}-{max})", min = config::limits::MIN_COPIES, max = config::limits::MAX_COPIES)]
    CopiesOutOfRange(u32),

    /// Source file missing or not a regular file
    #[error("Source video not found: {0}")]
    SourceNotFound(String),

    /// Unsupported container extension
    #[error("Unsupported video format: {0}")]
    UnsupportedFormat(String),

    /// Source exceeds the configured size cap
    #[error("File size exceeds limit: {actual} > {limit}")]
    SizeExceeded { actual: u64, limit: u64 },
}

/// Validates the requested copy count against the accepted bounds.
///
/// The processor trusts this bound and does not re-check it, so every
/// entry point (CLI today, upload/bot callers upstream) must validate
/// before building a request.
///
/// # Examples
/// ```
/// use uniqvid::core::validation::validate_copies;
///
/// assert!(validate_copies(1).is_ok());
/// assert!(validate_copies(3).is_ok());
/// assert!(validate_copies(0).is_err());
/// assert!(validate_copies(4).is_err());
/// ```
pub fn validate_copies(copies: u32) -> Result<(), ValidationError> {
    if !(config::limits::MIN_COPIES..=config::limits::MAX_COPIES).contains(&copies) {
        return Err(ValidationError::CopiesOutOfRange(copies));
    }
    Ok(())
}

/// Validates a source video path: must exist, be a regular file, carry a
/// supported container extension, and fit under the configured size cap.
///
/// # Arguments
/// * `path` - Path to the candidate source video
pub fn validate_source_video(path: &Path) -> Result<(), ValidationError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| ValidationError::SourceNotFound(path.display().to_string()))?;

    if !metadata.is_file() {
        return Err(ValidationError::SourceNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !config::limits::SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedFormat(path.display().to_string()));
    }

    let limit = *config::MAX_FILE_SIZE;
    if metadata.len() > limit {
        return Err(ValidationError::SizeExceeded {
            actual: metadata.len(),
            limit,
        });
    }

    Ok(())
}

/// Escapes filesystem-unsafe characters in a filename.
///
/// Replaces `/` with `_` so a user-supplied stem can never traverse out of
/// the output directory.
///
/// # Examples
/// ```
/// use uniqvid::core::validation::escape_filename;
///
/// assert_eq!(escape_filename("clip/name.mp4"), "clip_name.mp4");
/// ```
pub fn escape_filename(filename: &str) -> String {
    filename.replace('/', "_")
}
