//! Transcript report assembly and CSV serialization.
//!
//! One row per eligible input file, sorted by filename case-insensitively
//! so output is stable regardless of filesystem enumeration order.

use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// UTF-8 byte-order marker. Spreadsheet tools use it to detect encoding.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const CSV_HEADER: [&str; 2] = ["Filename", "Transcribed Text"];

/// Outcome of the pipeline for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    /// Dictionary-valid words were recognized.
    Text(String),
    /// Decode failure, backend failure, or nothing survived the lexical
    /// filter.
    NoTextDetected,
    /// The density gate rejected the image before OCR.
    InsufficientDensity,
}

impl Transcript {
    /// The report cell for this outcome.
    ///
    /// Double-quote characters are stripped from the transcribed text so
    /// the cell reads cleanly in spreadsheet tools.
    pub fn cell(&self) -> String {
        match self {
            Transcript::Text(text) => {
                let cleaned: String = text.chars().filter(|c| *c != '"').collect();
                format!("includes the text: {}", cleaned)
            }
            Transcript::NoTextDetected => "No text detected".to_string(),
            Transcript::InsufficientDensity => "Not enough text density".to_string(),
        }
    }
}

/// One report row: input filename plus its transcript outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    pub filename: String,
    pub transcript: Transcript,
}

/// Ordered collection of transcript rows.
#[derive(Debug, Default)]
pub struct Report {
    rows: Vec<TranscriptRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: TranscriptRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[TranscriptRow] {
        &self.rows
    }

    /// Sort rows by filename, case-insensitively. Ties on the folded name
    /// fall back to the raw name so the total order stays deterministic.
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| {
            a.filename
                .to_lowercase()
                .cmp(&b.filename.to_lowercase())
                .then_with(|| a.filename.cmp(&b.filename))
        });
    }

    /// Serialize the rows as CSV into `writer`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            csv_writer.write_record([row.filename.as_str(), row.transcript.cell().as_str()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Sort the rows and write the report file.
    ///
    /// With `write_bom` the file is prefixed with a UTF-8 byte-order
    /// marker for clean round-tripping in spreadsheet tools.
    pub fn save(&mut self, path: impl AsRef<Path>, write_bom: bool) -> Result<()> {
        self.sort();
        let mut file = File::create(path.as_ref())?;
        if write_bom {
            file.write_all(UTF8_BOM)?;
        }
        self.write_csv(&mut file)?;
        Ok(())
    }
}

impl From<csv::Error> for crate::error::ScanscribeError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => crate::error::ScanscribeError::Io(io_err),
            other => crate::error::ScanscribeError::Validation {
                message: format!("CSV serialization error: {:?}", other),
            },
        }
    }
}
