//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Encoder configuration validation and logging
//! - Startup diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;
use std::path::Path;

use crate::core::config;
use crate::processing::check_encoder;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs encoder configuration at application startup
///
/// Validates and logs:
/// - ffmpeg/ffprobe binary resolution
/// - Scratch directory location and writability
/// - A reminder that a missing encoder degrades every copy to a plain file copy
pub async fn log_encoder_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🎬 Encoder Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if check_encoder(&config::FFMPEG_BIN).await {
        log::info!("✅ FFMPEG_BIN: {} (responds to -version)", *config::FFMPEG_BIN);
    } else {
        log::warn!("⚠️  FFMPEG_BIN: {} (NOT FOUND)", *config::FFMPEG_BIN);
        log::warn!("   Processing will fall back to plain file copies");
    }

    if check_encoder(&config::FFPROBE_BIN).await {
        log::info!("✅ FFPROBE_BIN: {}", *config::FFPROBE_BIN);
    } else {
        log::warn!("⚠️  FFPROBE_BIN: {} (NOT FOUND, metadata probes disabled)", *config::FFPROBE_BIN);
    }

    let scratch = shellexpand::tilde(config::SCRATCH_DIR.as_str()).into_owned();
    if Path::new(&scratch).is_dir() {
        log::info!("✅ SCRATCH_DIR: {}", scratch);
    } else {
        log::info!("📁 SCRATCH_DIR: {} (will be created on first request)", scratch);
    }

    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
