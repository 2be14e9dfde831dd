//! Integration tests for the batch processor
//!
//! Run with: cargo test --test processor_test
//!
//! No test needs a real ffmpeg install. Encoder behavior is simulated with
//! tiny shell stubs: one that "encodes" by writing its argument list to the
//! output path, one whose compression pass always fails, and one that fails
//! every encode. The stubs answer `-version` so availability probing works.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use uniqvid::{CopyFidelity, ProcessingRequest, ProcessorConfig, VideoProcessor};

const SOURCE_BYTES: &[u8] = b"not really h264, but good enough for copy semantics";

/// Stub that encodes everything: writes its argv into the output file.
const ENCODER_OK: &str = "#!/bin/sh\n\
if [ \"$1\" = \"-version\" ]; then exit 0; fi\n\
for last in \"$@\"; do :; done\n\
echo \"$@\" > \"$last\"\n\
exit 0\n";

/// Stub whose compression pass fails (temp outputs carry the compressed_ prefix).
const ENCODER_NO_COMPRESS: &str = "#!/bin/sh\n\
if [ \"$1\" = \"-version\" ]; then exit 0; fi\n\
for last in \"$@\"; do :; done\n\
case \"$last\" in *compressed_*) echo \"no space for temp\" >&2; exit 1 ;; esac\n\
echo \"$@\" > \"$last\"\n\
exit 0\n";

/// Stub that answers -version but fails every encode.
const ENCODER_BROKEN: &str = "#!/bin/sh\n\
if [ \"$1\" = \"-version\" ]; then exit 0; fi\n\
echo \"simulated encoder failure\" >&2\n\
exit 1\n";

struct Fixture {
    _dir: TempDir,
    source: PathBuf,
    output_dir: PathBuf,
    config: ProcessorConfig,
    bin_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("holiday_clip.mp4");
        std::fs::write(&source, SOURCE_BYTES).unwrap();

        let output_dir = dir.path().join("results");
        let bin_dir = dir.path().join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();

        let config = ProcessorConfig::default()
            .scratch_dir(dir.path().join("scratch"))
            .encode_timeout(Duration::from_secs(10))
            .border_timeout(Duration::from_secs(10));

        Self {
            _dir: dir,
            source,
            output_dir,
            config,
            bin_dir,
        }
    }

    fn install_encoder(&mut self, script: &str) {
        let path = self.bin_dir.join("fake-ffmpeg");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        self.config = self.config.clone().ffmpeg_bin(path.to_string_lossy().into_owned());
    }

    fn missing_encoder(&mut self) {
        self.config = self
            .config
            .clone()
            .ffmpeg_bin(self.bin_dir.join("no-such-encoder").to_string_lossy().into_owned());
    }

    fn processor(&self) -> VideoProcessor {
        VideoProcessor::new(self.config.clone()).unwrap()
    }

    fn request(&self) -> ProcessingRequest {
        ProcessingRequest::new(self.source.clone(), self.output_dir.clone())
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn returns_exactly_n_existing_nonempty_paths_in_copy_order() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_OK);

    let results = fx
        .processor()
        .process(&fx.request().copies(3).add_border(true))
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for (i, copy) in results.iter().enumerate() {
        let expected = format!("processed_copy_{}_holiday_clip.mp4", i + 1);
        assert_eq!(copy.path.file_name().unwrap().to_string_lossy(), expected);
        assert!(copy.path.exists());
        assert!(std::fs::metadata(&copy.path).unwrap().len() > 0);
        assert_eq!(copy.fidelity, CopyFidelity::Enhanced);
    }
}

#[tokio::test]
async fn absent_encoder_degrades_every_copy_to_byte_identical_source() {
    let mut fx = Fixture::new();
    fx.missing_encoder();

    let results = fx
        .processor()
        .process(&fx.request().copies(3).add_border(true).compression(true))
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for copy in &results {
        assert_eq!(std::fs::read(&copy.path).unwrap(), SOURCE_BYTES);
        assert_eq!(copy.fidelity, CopyFidelity::Fallback);
    }
}

#[tokio::test]
async fn every_invocation_failing_still_yields_n_copies_of_source() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_BROKEN);

    let results = fx
        .processor()
        .process(&fx.request().copies(2).add_border(true).compression(true))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for copy in &results {
        assert_eq!(std::fs::read(&copy.path).unwrap(), SOURCE_BYTES);
        assert_eq!(copy.fidelity, CopyFidelity::Fallback);
    }
    // nothing but the final outputs is left behind
    assert_eq!(
        file_names(&fx.output_dir),
        vec![
            "processed_copy_1_holiday_clip.mp4".to_string(),
            "processed_copy_2_holiday_clip.mp4".to_string(),
        ]
    );
}

#[tokio::test]
async fn bordered_copy_goes_through_the_pad_filter() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_OK);

    let results = fx
        .processor()
        .process(&fx.request().add_border(true))
        .await
        .unwrap();

    // The stub records the argv it was called with; the primary border
    // attempt uses the pad filter with the fixed 30px margin.
    let recorded = std::fs::read_to_string(&results[0].path).unwrap();
    assert!(recorded.contains("pad=iw+60:ih+60:30:30:"), "argv was: {}", recorded);
    assert!(recorded.contains("-c:a copy"), "argv was: {}", recorded);
}

#[tokio::test]
async fn compression_pass_replaces_output_and_removes_temp() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_OK);

    let results = fx
        .processor()
        .process(&fx.request().compression(true))
        .await
        .unwrap();

    // After the swap the surviving file is the compression pass's product:
    // its recorded argv names the copy itself as the input.
    let recorded = std::fs::read_to_string(&results[0].path).unwrap();
    assert!(
        recorded.contains("processed_copy_1_holiday_clip.mp4"),
        "argv was: {}",
        recorded
    );
    assert!(recorded.contains("-crf 28"), "argv was: {}", recorded);
    assert_eq!(
        file_names(&fx.output_dir),
        vec!["processed_copy_1_holiday_clip.mp4".to_string()]
    );
}

#[tokio::test]
async fn compression_failure_keeps_the_uncompressed_output() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_NO_COMPRESS);

    let results = fx
        .processor()
        .process(&fx.request().compression(true))
        .await
        .unwrap();

    let recorded = std::fs::read_to_string(&results[0].path).unwrap();
    // Still the primary re-encode's product, source as input, standard CRF.
    assert!(recorded.contains("holiday_clip.mp4"), "argv was: {}", recorded);
    assert!(recorded.contains("-crf 23"), "argv was: {}", recorded);
    assert_eq!(results[0].fidelity, CopyFidelity::Enhanced);
    // The failed temp file is cleaned up.
    assert_eq!(
        file_names(&fx.output_dir),
        vec!["processed_copy_1_holiday_clip.mp4".to_string()]
    );
}

#[tokio::test]
async fn output_directory_is_created_when_missing() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_OK);
    fx.output_dir = fx.output_dir.join("nested/session");

    let results = fx.processor().process(&fx.request()).await.unwrap();

    assert!(fx.output_dir.is_dir());
    assert!(results[0].path.starts_with(&fx.output_dir));
}

#[tokio::test]
async fn source_file_is_never_mutated() {
    let mut fx = Fixture::new();
    fx.install_encoder(ENCODER_OK);

    fx.processor()
        .process(&fx.request().copies(3).add_border(true).compression(true))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&fx.source).unwrap(), SOURCE_BYTES);
}
