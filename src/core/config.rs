use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the processor
/// Cached ffmpeg binary path
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Cached ffprobe binary path
/// Read once at startup from FFPROBE_BIN environment variable or defaults to "ffprobe"
pub static FFPROBE_BIN: Lazy<String> =
    Lazy::new(|| env::var("FFPROBE_BIN").unwrap_or_else(|_| "ffprobe".to_string()));

/// Scratch directory for encoder temp files
/// Read from SCRATCH_DIR environment variable
/// Encoder child processes get TMPDIR/TMP/TEMP pointed here so their own
/// scratch files land in a known, cleanable location.
/// Supports tilde (~) expansion for home directory
pub static SCRATCH_DIR: Lazy<String> =
    Lazy::new(|| env::var("SCRATCH_DIR").unwrap_or_else(|_| "temp_processing".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: uniqvid.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "uniqvid.log".to_string()));

/// Maximum accepted source file size in bytes
/// Read from MAX_FILE_SIZE environment variable
/// Default: 52428800 (50 MB)
pub static MAX_FILE_SIZE: Lazy<u64> = Lazy::new(|| {
    env::var("MAX_FILE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50 * 1024 * 1024)
});

/// Encoding configuration
pub mod encode {
    use super::Duration;

    /// CRF for the standard per-copy re-encode (lower = better quality)
    pub const CRF_STANDARD: u32 = 23;

    /// CRF for the compression pass (higher = smaller file, lower quality)
    pub const CRF_COMPRESSED: u32 = 28;

    /// x264 preset for every invocation
    pub const PRESET: &str = "ultrafast";

    /// Border margin added on each side of the frame (pad) and the
    /// drawbox outline thickness, in pixels
    pub const BORDER_MARGIN: u32 = 30;

    /// Timeout for full re-encode and compression passes (in seconds)
    pub const ENCODE_TIMEOUT_SECS: u64 = 300;

    /// Timeout for border passes (in seconds)
    pub const BORDER_TIMEOUT_SECS: u64 = 60;

    /// Timeout for ffprobe metadata queries (in seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 30;

    /// Re-encode/compress timeout duration
    pub fn encode_timeout() -> Duration {
        Duration::from_secs(ENCODE_TIMEOUT_SECS)
    }

    /// Border pass timeout duration
    pub fn border_timeout() -> Duration {
        Duration::from_secs(BORDER_TIMEOUT_SECS)
    }

    /// ffprobe timeout duration
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(PROBE_TIMEOUT_SECS)
    }
}

/// Request limits
pub mod limits {
    /// Minimum number of copies per request
    pub const MIN_COPIES: u32 = 1;

    /// Maximum number of copies per request
    pub const MAX_COPIES: u32 = 3;

    /// Container extensions accepted as source input
    pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp4", "avi", "mov", "mkv", "wmv", "flv"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_timeouts() {
        assert_eq!(encode::encode_timeout(), Duration::from_secs(300));
        assert_eq!(encode::border_timeout(), Duration::from_secs(60));
        assert!(encode::probe_timeout() < encode::border_timeout());
    }

    #[test]
    fn test_copy_limits() {
        assert!(limits::MIN_COPIES <= limits::MAX_COPIES);
        assert_eq!(limits::MAX_COPIES, 3);
    }

    #[test]
    fn test_supported_extensions_are_lowercase() {
        for ext in limits::SUPPORTED_EXTENSIONS {
            assert_eq!(ext, ext.to_lowercase());
        }
    }
}
