use anyhow::Result;
use dotenvy::dotenv;
use std::path::Path;

use uniqvid::cli::{Cli, Commands};
use uniqvid::core::{config, init_logger, log_encoder_configuration, scratch, validation};
use uniqvid::processing::{check_encoder, file_size, probe_dimensions, probe_duration};
use uniqvid::{CopyFidelity, ProcessingRequest, ProcessorConfig, VideoProcessor};

/// Main entry point for the uniqvid CLI
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, validation) or a
/// filesystem failure leaves a request without its outputs.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Process {
            input,
            output_dir,
            copies,
            compress,
            border,
        }) => Ok(run_process(&input, output_dir, copies, compress, border).await?),
        Some(Commands::Doctor) | None => {
            log_encoder_configuration().await;
            Ok(())
        }
        Some(Commands::CleanScratch) => {
            let dir = scratch::ensure_scratch_dir(&config::SCRATCH_DIR)?;
            let removed = scratch::cleanup_scratch(&dir);
            log::info!("Scratch cleanup done, {} file(s) removed from {}", removed, dir.display());
            Ok(())
        }
    }
}

/// Validate inputs the way the upstream callers do, then run one request.
async fn run_process(
    input: &Path,
    output_dir: std::path::PathBuf,
    copies: u32,
    compress: bool,
    border: bool,
) -> uniqvid::AppResult<()> {
    validation::validate_copies(copies)?;
    validation::validate_source_video(input)?;

    let processor = VideoProcessor::new(ProcessorConfig::default())?;

    if let Ok(size) = file_size(input).await {
        log::info!("Source size: {} bytes", size);
    }
    if check_encoder(&processor.config().ffprobe_bin).await {
        if let Ok(duration) = probe_duration(&processor.config().ffprobe_bin, input).await {
            log::info!("Source duration: {:.1}s", duration);
        }
        if let Ok((width, height)) = probe_dimensions(&processor.config().ffprobe_bin, input).await {
            log::info!("Source dimensions: {}x{}", width, height);
        }
    }

    let request = ProcessingRequest::new(input.to_path_buf(), output_dir)
        .copies(copies)
        .compression(compress)
        .add_border(border);

    let results = processor.process(&request).await?;

    for copy in &results {
        let tag = match copy.fidelity {
            CopyFidelity::Enhanced => "enhanced",
            CopyFidelity::Fallback => "fallback copy",
        };
        println!("{} ({})", copy.path.display(), tag);
    }

    Ok(())
}
