//! ffmpeg invocation layer
//!
//! Builds the fixed filter-graph strings and argument lists for the three
//! operations the processor performs (border, plain re-encode, compression
//! pass) and runs them with captured output. Video is always re-encoded
//! with libx264 at a fixed CRF and fast preset; the audio stream is passed
//! through unchanged (`-c:a copy`, no re-encode).

use std::path::Path;
use tokio::process::Command;

use super::processor::ProcessorConfig;
use super::{EncodeError, EncodeResult};
use crate::core::config::encode;
use crate::core::process::{render_command, run_with_timeout};

/// Border color palette.
///
/// Only base named colors every ffmpeg build resolves. The color is drawn
/// uniformly at random per copy: the point is visual de-duplication
/// (changing each copy's fingerprint), not aesthetics.
pub const BORDER_PALETTE: [&str; 10] = [
    "red", "green", "blue", "yellow", "purple", "orange", "pink", "cyan", "magenta", "lime",
];

/// Pick a border color uniformly at random from the fixed palette
pub fn pick_border_color() -> &'static str {
    BORDER_PALETTE[rand::random_range(0..BORDER_PALETTE.len())]
}

/// Pad filter: expands the frame by the fixed margin on each side, filled
/// with the border color
pub fn build_pad_filter(color: &str) -> String {
    let m = encode::BORDER_MARGIN;
    format!("pad=iw+{}:ih+{}:{}:{}:{}", m * 2, m * 2, m, m, color)
}

/// Drawbox filter: full-frame outline of the same thickness, used as the
/// retry when the pad filter is rejected
pub fn build_drawbox_filter(color: &str) -> String {
    format!(
        "drawbox=x=0:y=0:w=iw:h=ih:color={}:t={}",
        color,
        encode::BORDER_MARGIN
    )
}

/// Base ffmpeg invocation: quiet, overwrite output, scratch dir exported
/// as the child's temp location (TMPDIR and the Windows spellings).
fn base_command(config: &ProcessorConfig, input: &Path) -> Command {
    let mut cmd = Command::new(&config.ffmpeg_bin);
    cmd.args(["-hide_banner", "-loglevel", "error", "-y"]);
    cmd.arg("-i").arg(input);
    cmd.env("TMPDIR", &config.scratch_dir)
        .env("TMP", &config.scratch_dir)
        .env("TEMP", &config.scratch_dir);
    cmd
}

/// Build a border invocation with the given filter expression
pub fn border_command(config: &ProcessorConfig, input: &Path, output: &Path, filter: &str) -> Command {
    let mut cmd = base_command(config, input);
    cmd.arg("-vf").arg(filter);
    cmd.args(["-c:v", "libx264", "-preset", encode::PRESET, "-crf"])
        .arg(encode::CRF_STANDARD.to_string())
        .args(["-c:a", "copy"])
        .arg(output);
    cmd
}

/// Build a plain re-encode invocation (no filter)
pub fn reencode_command(config: &ProcessorConfig, input: &Path, output: &Path) -> Command {
    let mut cmd = base_command(config, input);
    cmd.args(["-c:v", "libx264", "-preset", encode::PRESET, "-crf"])
        .arg(encode::CRF_STANDARD.to_string())
        .args(["-c:a", "copy"])
        .arg(output);
    cmd
}

/// Build a compression-pass invocation (higher CRF, smaller file)
pub fn compress_command(config: &ProcessorConfig, input: &Path, output: &Path) -> Command {
    let mut cmd = base_command(config, input);
    cmd.args(["-c:v", "libx264", "-crf"])
        .arg(encode::CRF_COMPRESSED.to_string())
        .args(["-preset", encode::PRESET, "-c:a", "copy"])
        .arg(output);
    cmd
}

/// Run an encoder invocation to completion.
///
/// Exit code 0 is the only success; any other exit, spawn failure, or
/// timeout is an error. Failures are logged with the offending command and
/// captured stdout/stderr, never swallowed without a trace.
pub async fn run_encoder(mut cmd: Command, timeout: std::time::Duration) -> EncodeResult<()> {
    let command_line = render_command(&cmd);
    log::info!("Running encoder: {}", command_line);

    let output = match run_with_timeout(&mut cmd, timeout).await {
        Ok(output) => output,
        Err(e) => {
            log::error!("Encoder invocation failed to run: {} ({})", command_line, e);
            return Err(e);
        }
    };

    if output.status.success() {
        return Ok(());
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    log::error!("Encoder exited with {}: {}", output.status, command_line);
    log::error!("   stdout: {}", stdout.trim());
    log::error!("   stderr: {}", stderr.trim());

    Err(EncodeError::CommandFailed {
        command: command_line,
        stdout,
        stderr,
    })
}
