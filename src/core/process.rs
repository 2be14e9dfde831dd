//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (ffmpeg, ffprobe)
//! with configurable timeouts to prevent hung encodes from blocking the pipeline.

use std::io::ErrorKind;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::processing::EncodeError;

/// Run an async Command with a timeout.
///
/// Returns the process Output on success (any exit code), or an EncodeError
/// when the binary is missing, the spawn fails, or the ceiling is hit.
/// A timed-out child is killed by the dropped future.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, EncodeError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Err(EncodeError::ToolUnavailable),
        Ok(Err(e)) => Err(EncodeError::Io(e)),
        Err(_) => Err(EncodeError::TimedOut {
            seconds: timeout.as_secs(),
        }),
    }
}

/// Render a Command as a single shell-like line for failure logs.
pub fn render_command(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    let mut line = std_cmd.get_program().to_string_lossy().into_owned();
    for arg in std_cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_maps_to_tool_unavailable() {
        let mut cmd = Command::new("/definitely/not/a/real/encoder");
        let err = run_with_timeout(&mut cmd, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EncodeError::ToolUnavailable));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let err = run_with_timeout(&mut cmd, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, EncodeError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error_here() {
        // Exit-code policy belongs to the caller; the runner only fails on
        // spawn problems and timeouts.
        let mut cmd = Command::new("false");
        let output = run_with_timeout(&mut cmd, Duration::from_secs(5)).await.unwrap();
        assert!(!output.status.success());
    }

    #[test]
    fn test_render_command() {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-i", "in.mp4", "out.mp4"]);
        assert_eq!(render_command(&cmd), "ffmpeg -y -i in.mp4 out.mp4");
    }
}
