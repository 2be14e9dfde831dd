use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "uniqvid")]
#[command(author, version, about = "Batch video uniquifier — bordered, optionally compressed near-duplicate copies via ffmpeg", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one source video into uniquified copies
    Process {
        /// Path to the source video (mp4, avi, mov, mkv, wmv, flv)
        input: PathBuf,

        /// Directory the produced copies are written into
        #[arg(short, long, default_value = "results")]
        output_dir: PathBuf,

        /// Number of copies to produce (1-3)
        #[arg(short, long, default_value_t = 1)]
        copies: u32,

        /// Re-encode each copy at lower bitrate after the primary step
        #[arg(long)]
        compress: bool,

        /// Add a randomly colored border to each copy
        #[arg(long)]
        border: bool,
    },

    /// Check encoder binaries and scratch directory configuration
    Doctor,

    /// Delete stale files from the scratch directory
    CleanScratch,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
