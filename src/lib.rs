//! Uniqvid - Batch video uniquifier driving ffmpeg
//!
//! This library provides the core functionality for producing N
//! near-duplicate copies of a source video (optionally bordered with a
//! colored frame, optionally re-encoded at lower bitrate) with a
//! fallback chain that degrades to a plain file copy so a request always
//! yields exactly the requested number of outputs.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, validation, and process helpers
//! - `processing`: The batch processor, strategy chains, and ffmpeg layer

pub mod cli;
pub mod core;
pub mod processing;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::processing::{CopyFidelity, ProcessedCopy, ProcessingRequest, ProcessorConfig, VideoProcessor};
