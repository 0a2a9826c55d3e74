//! End-to-end batch tests.
//!
//! Drive `run_batch` over real directories of synthetic images with a
//! scripted OCR backend, and check the CSV report that comes out.

use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
use scanscribe::error::Result;
use scanscribe::{Dictionary, OcrBackend, PipelineConfig, run_batch};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Backend that returns a scripted string per image size, so different
/// test files get different "recognitions". Unknown sizes come back empty.
struct DimKeyedBackend {
    by_size: HashMap<(u32, u32), &'static str>,
    calls: AtomicUsize,
}

impl DimKeyedBackend {
    fn new(entries: &[((u32, u32), &'static str)]) -> Self {
        Self {
            by_size: entries.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrBackend for DimKeyedBackend {
    fn recognize_raw(&self, image: &GrayImage, _language: &str, _psm: u8) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_size.get(&image.dimensions()).copied().unwrap_or("").to_string())
    }
}

fn write_half_dark_png(path: &Path, width: u32, height: u32) {
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, _| {
        if x < width / 2 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    img.save(path).unwrap();
}

fn write_white_png(path: &Path, width: u32, height: u32) {
    let img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb([255, 255, 255]));
    img.save(path).unwrap();
}

fn dictionary() -> Dictionary {
    Dictionary::from_words(["Hello", "World"])
}

#[test]
fn end_to_end_note_and_blank() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("note.png"), 40, 20);
    write_white_png(&input.path().join("blank.png"), 30, 30);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello World")]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(
        input.path(),
        output.path(),
        "transcriptions.csv",
        &config,
        &backend,
        &dict,
    )
    .unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Filename,Transcribed Text");
    assert_eq!(lines[1], "blank.png,Not enough text density");
    assert_eq!(lines[2], "note.png,includes the text: Hello World");
    assert_eq!(lines.len(), 3);

    // The blank page was short-circuited by the density gate: the backend
    // only ever saw note.png.
    assert_eq!(backend.calls(), 1);
}

#[test]
fn rows_sorted_case_insensitively() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("b.png"), 40, 20);
    write_half_dark_png(&input.path().join("A.png"), 40, 20);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[1].starts_with("A.png,"));
    assert!(lines[2].starts_with("b.png,"));
}

#[test]
fn repeated_runs_produce_identical_bytes() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("note.png"), 40, 20);
    write_white_png(&input.path().join("blank.png"), 30, 30);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello World")]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let first = run_batch(input.path(), output.path(), "run1.csv", &config, &backend, &dict).unwrap();
    let second = run_batch(input.path(), output.path(), "run2.csv", &config, &backend, &dict).unwrap();

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn corrupt_image_recorded_as_no_text_detected() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(input.path().join("bad.png"), b"this is not a png").unwrap();

    let backend = DimKeyedBackend::new(&[]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("bad.png,No text detected"));
    assert_eq!(backend.calls(), 0);
}

#[test]
fn non_image_files_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("note.png"), 40, 20);
    std::fs::write(input.path().join("readme.txt"), b"not a scan").unwrap();

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(!content.contains("readme.txt"));
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn output_directory_created_if_absent() {
    let input = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    let output = base.path().join("nested").join("out");

    write_half_dark_png(&input.path().join("note.png"), 40, 20);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(input.path(), &output, "out.csv", &config, &backend, &dict).unwrap();
    assert!(report_path.exists());
}

#[test]
fn preview_artifact_written_for_first_image() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("note.png"), 40, 20);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig {
        save_preview: true,
        ..Default::default()
    };
    let dict = dictionary();

    run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let preview = output.path().join("preprocessed_preview.png");
    assert!(preview.exists());
    // The artifact is the binarized preprocessor output.
    let saved = image::open(&preview).unwrap().to_luma8();
    assert_eq!(saved.dimensions(), (40, 20));
    assert!(saved.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn preview_written_despite_undecodable_sibling() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(input.path().join("bad.png"), b"this is not a png").unwrap();
    write_half_dark_png(&input.path().join("note.png"), 40, 20);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig {
        save_preview: true,
        ..Default::default()
    };
    let dict = dictionary();

    run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    // The preview comes from the only decodable image, whichever file the
    // directory enumerates first.
    let preview = image::open(output.path().join("preprocessed_preview.png")).unwrap().to_luma8();
    assert_eq!(preview.dimensions(), (40, 20));
}

#[test]
fn preview_skipped_when_nothing_decodes() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(input.path().join("bad.png"), b"this is not a png").unwrap();

    let backend = DimKeyedBackend::new(&[]);
    let config = PipelineConfig {
        save_preview: true,
        ..Default::default()
    };
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    assert!(!output.path().join("preprocessed_preview.png").exists());
    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("bad.png,No text detected"));
}

#[test]
fn bom_prefixed_when_configured() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_half_dark_png(&input.path().join("note.png"), 40, 20);

    let backend = DimKeyedBackend::new(&[((40, 20), "Hello")]);
    let config = PipelineConfig {
        write_bom: true,
        ..Default::default()
    };
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let bytes = std::fs::read(&report_path).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    let rest = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(rest.starts_with("Filename,Transcribed Text"));
}

#[test]
fn empty_input_directory_yields_header_only_report() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let backend = DimKeyedBackend::new(&[]);
    let config = PipelineConfig::default();
    let dict = dictionary();

    let report_path = run_batch(input.path(), output.path(), "out.csv", &config, &backend, &dict).unwrap();

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert_eq!(content.lines().next().unwrap(), "Filename,Transcribed Text");
}
