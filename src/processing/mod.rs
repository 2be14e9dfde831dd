//! Batch video processing engine — the core feature of uniqvid.
//!
//! Takes one source video and produces N near-duplicate copies, each
//! optionally bordered with a colored frame and optionally re-encoded at
//! lower bitrate. Every stage has a same-or-lower-fidelity fallback
//! ending in a plain file copy, so a request always yields exactly the
//! requested number of outputs even with no working encoder installed.
//!
//! Pipeline per copy: border (or plain re-encode) → optional compression
//! pass → done, with each stage independently able to short-circuit to
//! "copy source as-is" without aborting the remaining copies.

pub mod ffmpeg;
pub mod processor;
pub mod strategy;

pub use processor::{CopyFidelity, ProcessedCopy, ProcessingRequest, ProcessorConfig, VideoProcessor};

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur while driving the external encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Encoder binary missing from the system
    #[error("Encoder binary not available")]
    ToolUnavailable,

    /// Encoder ran but exited non-zero
    #[error("Encoder invocation failed: {command}")]
    CommandFailed {
        command: String,
        stdout: String,
        stderr: String,
    },

    /// Invocation exceeded its wall-clock ceiling
    #[error("Encoder timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    /// Metadata probe output could not be parsed
    #[error("Probe failed: {0}")]
    Probe(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

impl EncodeError {
    /// True for failures the per-copy fallback chain absorbs. Filesystem
    /// errors are the one class allowed to propagate to the caller, since
    /// the plain-copy fallback has no further fallback.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EncodeError::Io(_))
    }
}

/// Check if an encoder binary is available
pub async fn check_encoder(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get video duration in seconds using ffprobe
pub async fn probe_duration<P: AsRef<Path>>(ffprobe_bin: &str, path: P) -> EncodeResult<f64> {
    let output = Command::new(ffprobe_bin)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path.as_ref())
        .output()
        .await?;

    if !output.status.success() {
        return Err(EncodeError::Probe(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    duration_str
        .trim()
        .parse::<f64>()
        .map_err(|_| EncodeError::Probe("Failed to parse duration".to_string()))
}

/// Get frame dimensions of the first video stream using ffprobe
///
/// Returns (width, height). A bordered copy comes out larger than its
/// source by twice the configured margin on each axis.
pub async fn probe_dimensions<P: AsRef<Path>>(ffprobe_bin: &str, path: P) -> EncodeResult<(u32, u32)> {
    let output = Command::new(ffprobe_bin)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ])
        .arg(path.as_ref())
        .output()
        .await?;

    if !output.status.success() {
        return Err(EncodeError::Probe(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    parse_dimensions(text.trim()).ok_or_else(|| EncodeError::Probe(format!("Unexpected ffprobe output: {}", text)))
}

fn parse_dimensions(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Get file size in bytes
pub async fn file_size<P: AsRef<Path>>(path: P) -> EncodeResult<u64> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(metadata.len())
}
