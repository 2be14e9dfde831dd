//! Batch processor
//!
//! Runs one processing request to completion: N sequential copies, each
//! through its strategy chain plus the optional compression pass.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ffmpeg::pick_border_color;
use super::strategy::{chain_for, compress_in_place, run_chain};
use super::{check_encoder, EncodeResult};
use crate::core::config;
use crate::core::scratch::ensure_scratch_dir;
use crate::core::validation::escape_filename;

/// Processor configuration.
///
/// An explicit value passed into the processor (encoder binaries, scratch
/// location, per-invocation wall-clock ceilings) rather than ambient
/// process-global environment state. `Default` reads the env-driven
/// statics from [`crate::core::config`].
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Encoder binary (name or path)
    pub ffmpeg_bin: String,
    /// Probe binary (name or path)
    pub ffprobe_bin: String,
    /// Scratch directory exported to encoder children as TMPDIR/TMP/TEMP
    pub scratch_dir: PathBuf,
    /// Ceiling for re-encode and compression passes
    pub encode_timeout: Duration,
    /// Ceiling for border passes
    pub border_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: config::FFMPEG_BIN.clone(),
            ffprobe_bin: config::FFPROBE_BIN.clone(),
            scratch_dir: PathBuf::from(shellexpand::tilde(config::SCRATCH_DIR.as_str()).into_owned()),
            encode_timeout: config::encode::encode_timeout(),
            border_timeout: config::encode::border_timeout(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the encoder binary.
    #[must_use]
    pub fn ffmpeg_bin(mut self, bin: impl Into<String>) -> Self {
        self.ffmpeg_bin = bin.into();
        self
    }

    /// Sets the probe binary.
    #[must_use]
    pub fn ffprobe_bin(mut self, bin: impl Into<String>) -> Self {
        self.ffprobe_bin = bin.into();
        self
    }

    /// Sets the scratch directory.
    #[must_use]
    pub fn scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Sets the re-encode/compression ceiling.
    #[must_use]
    pub fn encode_timeout(mut self, timeout: Duration) -> Self {
        self.encode_timeout = timeout;
        self
    }

    /// Sets the border-pass ceiling.
    #[must_use]
    pub fn border_timeout(mut self, timeout: Duration) -> Self {
        self.border_timeout = timeout;
        self
    }
}

/// One processing request, immutable once submitted.
///
/// The 1-3 copy bound is the caller's responsibility
/// ([`crate::core::validation::validate_copies`]); the processor trusts it.
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    /// Source video, read-only input, never mutated
    pub source: PathBuf,
    /// Directory the outputs are written into (created if missing)
    pub output_dir: PathBuf,
    /// Number of copies to produce
    pub copies: u32,
    /// Apply the compression pass after the primary step
    pub compression: bool,
    /// Add a colored border to each copy
    pub add_border: bool,
}

impl ProcessingRequest {
    /// Creates a request with default options: one copy, no compression,
    /// no border.
    pub fn new(source: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            source,
            output_dir,
            copies: 1,
            compression: false,
            add_border: false,
        }
    }

    /// Sets the copy count.
    #[must_use]
    pub fn copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    /// Enables or disables the compression pass.
    #[must_use]
    pub fn compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Enables or disables the colored border.
    #[must_use]
    pub fn add_border(mut self, add_border: bool) -> Self {
        self.add_border = add_border;
        self
    }
}

/// Whether a copy actually went through the encoder or degraded to a
/// byte-for-byte copy of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFidelity {
    /// Produced by the encoder (bordered, re-encoded, or compressed)
    Enhanced,
    /// Plain file copy of the source
    Fallback,
}

/// One produced output file
#[derive(Debug, Clone)]
pub struct ProcessedCopy {
    /// Absolute or caller-relative path of the output, exists and non-empty
    pub path: PathBuf,
    /// How the file was produced
    pub fidelity: CopyFidelity,
}

/// Batch video processor
pub struct VideoProcessor {
    config: ProcessorConfig,
}

impl VideoProcessor {
    /// Creates a processor, creating its scratch directory once up front.
    pub fn new(mut config: ProcessorConfig) -> EncodeResult<Self> {
        config.scratch_dir = ensure_scratch_dir(&config.scratch_dir.to_string_lossy())?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Deterministic, collision-free output name for copy `index` (1-based).
    /// The source container extension is preserved so a fallback copy's
    /// name still matches its bytes.
    pub fn output_filename(source: &Path, index: u32) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mp4".to_string());
        format!("processed_copy_{}_{}.{}", index, escape_filename(&stem), ext)
    }

    /// Processes a request, returning one output per requested copy in
    /// copy order.
    ///
    /// No encoding failure escapes a single copy's fallback chain; the
    /// only error that propagates is a filesystem failure during the final
    /// plain-copy fallback (or creating the output directory), where
    /// nothing further can be done.
    pub async fn process(&self, request: &ProcessingRequest) -> EncodeResult<Vec<ProcessedCopy>> {
        log::info!(
            "Processing {} -> {} (copies={}, compression={}, border={})",
            request.source.display(),
            request.output_dir.display(),
            request.copies,
            request.compression,
            request.add_border
        );

        tokio::fs::create_dir_all(&request.output_dir).await?;

        // Probe once per request; a dead encoder degrades every copy to a
        // plain file copy instead of failing N times per copy.
        let encoder_available = check_encoder(&self.config.ffmpeg_bin).await;
        if !encoder_available {
            log::warn!(
                "Encoder '{}' unavailable, producing plain copies",
                self.config.ffmpeg_bin
            );
        }

        let mut results = Vec::with_capacity(request.copies as usize);

        for index in 1..=request.copies {
            let filename = Self::output_filename(&request.source, index);
            let output = request.output_dir.join(&filename);
            log::info!("Copy {}/{}: {}", index, request.copies, filename);

            let color = pick_border_color();
            let chain = chain_for(request.add_border, encoder_available, color);
            let mut fidelity = run_chain(&self.config, &request.source, &output, &chain).await?;

            if request.compression && encoder_available {
                let temp = request.output_dir.join(format!("compressed_{}", filename));
                if compress_in_place(&self.config, &output, &temp).await? {
                    fidelity = CopyFidelity::Enhanced;
                }
            }

            results.push(ProcessedCopy { path: output, fidelity });
        }

        log::info!("Processing finished, {} file(s) produced", results.len());
        Ok(results)
    }
}
