//! Per-copy fallback strategies
//!
//! The try-pad / try-drawbox / plain-copy control flow is modeled as an
//! explicit ordered list of strategies attempted in sequence, each
//! returning success or failure, instead of nested error handling. The
//! last strategy in every chain is a plain file copy, so a copy can only
//! fail outright on a filesystem error during that final copy.

use std::fmt;
use std::path::Path;

use super::ffmpeg::{
    border_command, build_drawbox_filter, build_pad_filter, compress_command, reencode_command, run_encoder,
};
use super::processor::{CopyFidelity, ProcessorConfig};
use super::{EncodeError, EncodeResult};

/// One way of producing an output file from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStrategy {
    /// Pad the frame outward by the fixed margin, filled with `color`
    PadBorder { color: &'static str },
    /// Draw a full-frame outline of the same thickness in `color`
    DrawboxBorder { color: &'static str },
    /// Re-encode at standard quality, no filter
    Reencode,
    /// Byte-for-byte copy of the source
    PlainCopy,
}

impl fmt::Display for CopyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStrategy::PadBorder { color } => write!(f, "pad border ({})", color),
            CopyStrategy::DrawboxBorder { color } => write!(f, "drawbox border ({})", color),
            CopyStrategy::Reencode => write!(f, "re-encode"),
            CopyStrategy::PlainCopy => write!(f, "plain copy"),
        }
    }
}

impl CopyStrategy {
    /// Fidelity of the result this strategy produces when it succeeds
    pub fn fidelity(&self) -> CopyFidelity {
        match self {
            CopyStrategy::PlainCopy => CopyFidelity::Fallback,
            _ => CopyFidelity::Enhanced,
        }
    }

    async fn attempt(&self, config: &ProcessorConfig, input: &Path, output: &Path) -> EncodeResult<()> {
        match self {
            CopyStrategy::PadBorder { color } => {
                let cmd = border_command(config, input, output, &build_pad_filter(color));
                run_encoder(cmd, config.border_timeout).await
            }
            CopyStrategy::DrawboxBorder { color } => {
                let cmd = border_command(config, input, output, &build_drawbox_filter(color));
                run_encoder(cmd, config.border_timeout).await
            }
            CopyStrategy::Reencode => {
                let cmd = reencode_command(config, input, output);
                run_encoder(cmd, config.encode_timeout).await
            }
            CopyStrategy::PlainCopy => {
                tokio::fs::copy(input, output).await?;
                Ok(())
            }
        }
    }
}

/// Build the strategy chain for one copy.
///
/// Border chain retries once with the outline filter (same color) before
/// giving up; a known-absent encoder skips straight to the plain copy.
pub fn chain_for(add_border: bool, encoder_available: bool, color: &'static str) -> Vec<CopyStrategy> {
    if !encoder_available {
        return vec![CopyStrategy::PlainCopy];
    }
    if add_border {
        vec![
            CopyStrategy::PadBorder { color },
            CopyStrategy::DrawboxBorder { color },
            CopyStrategy::PlainCopy,
        ]
    } else {
        vec![CopyStrategy::Reencode, CopyStrategy::PlainCopy]
    }
}

/// Run a strategy chain until one succeeds.
///
/// Recoverable failures (bad filter, non-zero exit, timeout, missing
/// binary) move on to the next strategy; filesystem errors propagate
/// immediately since there is nothing left to fall back to.
pub async fn run_chain(
    config: &ProcessorConfig,
    input: &Path,
    output: &Path,
    chain: &[CopyStrategy],
) -> EncodeResult<CopyFidelity> {
    let mut last_error = EncodeError::ToolUnavailable;

    for strategy in chain {
        match strategy.attempt(config, input, output).await {
            Ok(()) => {
                log::info!("Copy produced via {}: {}", strategy, output.display());
                return Ok(strategy.fidelity());
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("Strategy {} failed, trying next: {}", strategy, e);
                last_error = e;
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error)
}

/// Apply the compression pass to an already-produced output.
///
/// Writes to a side-by-side temp path; on success the uncompressed file is
/// removed and the compressed one renamed into its place. On failure the
/// uncompressed output stays in place, so no file is ever lost to compression.
pub async fn compress_in_place(config: &ProcessorConfig, output: &Path, temp: &Path) -> EncodeResult<bool> {
    let cmd = compress_command(config, output, temp);
    match run_encoder(cmd, config.encode_timeout).await {
        Ok(()) => {
            tokio::fs::remove_file(output).await?;
            tokio::fs::rename(temp, output).await?;
            Ok(true)
        }
        Err(e) if e.is_recoverable() => {
            log::warn!("Compression pass failed, keeping uncompressed output: {}", e);
            let _ = tokio::fs::remove_file(temp).await;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
