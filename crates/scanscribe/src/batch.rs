//! Batch driver: folder in, CSV report out.
//!
//! Strictly sequential: each file is fully processed before the next
//! begins. Per-file problems become status rows; only output-side
//! failures (creating the output directory, writing the CSV) abort a run,
//! since without them no report can be produced.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::lexicon::Dictionary;
use crate::ocr::OcrBackend;
use crate::pipeline::Pipeline;
use crate::preprocess;
use crate::report::{Report, TranscriptRow};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Image extensions accepted from the input directory, matched
/// case-insensitively. Everything else is ignored.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "tiff", "jpg", "jpeg"];

/// Filename of the visual QA artifact written when `save_preview` is set.
const PREVIEW_FILENAME: &str = "preprocessed_preview.png";

/// Process every supported image in `input_dir` and write the CSV report
/// into `output_dir` (created if absent).
///
/// Returns the path of the written report.
pub fn run_batch(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    csv_name: &str,
    config: &PipelineConfig,
    backend: &dyn OcrBackend,
    dictionary: &Dictionary,
) -> Result<PathBuf> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    config.validate()?;
    std::fs::create_dir_all(output_dir)?;

    let pipeline = Pipeline::new(config, backend, dictionary);
    let mut report = Report::new();

    let files = list_image_files(input_dir)?;
    if config.save_preview {
        write_first_preview(&pipeline, &files, output_dir);
    }

    for path in files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(file = %filename, "processing");

        let transcript = pipeline.process_file(&path);
        report.push(TranscriptRow { filename, transcript });
    }

    let report_path = output_dir.join(csv_name);
    report.save(&report_path, config.write_bom)?;
    info!(report = %report_path.display(), rows = report.rows().len(), "batch complete");
    Ok(report_path)
}

/// Supported image files in `dir`, in directory enumeration order.
/// Ordering here does not matter; the report sorts rows by filename.
fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_supported_extension(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Write the preprocessed form of the first decodable image for visual
/// QA. Failures are logged and ignored; the artifact is advisory, and
/// undecodable files get their own status row in the main loop.
fn write_first_preview(pipeline: &Pipeline<'_>, files: &[PathBuf], output_dir: &Path) {
    for path in files {
        let Ok(image) = preprocess::load_image(path) else {
            continue;
        };
        let preview = pipeline.preprocess_preview(&image);
        let target = output_dir.join(PREVIEW_FILENAME);
        if let Err(err) = preview.save(&target) {
            warn!(path = %target.display(), %err, "failed to write preprocessing preview");
        }
        return;
    }
}
