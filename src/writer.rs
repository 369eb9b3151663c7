use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Writer, WriterBuilder};

use crate::captioner::CaptionOutcome;
use crate::error::{CaptionerError, Result};

pub const HEADER: [&str; 2] = ["caption", "image_file"];

/// Output CSV, written row by row so already captioned images survive a crash.
///
/// Fields are quoted only when they need it. Captions are sanitized upstream
/// and never do; a filename with a comma or quote does.
pub struct CaptionWriter {
    writer: Writer<File>,
    path: PathBuf,
}

impl CaptionWriter {
    /// Truncates `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_path(path)
            .map_err(|e| CaptionerError::csv(path, e))?;

        let mut writer = Self {
            writer,
            path: path.to_path_buf(),
        };
        writer.write_fields(HEADER)?;
        Ok(writer)
    }

    pub fn write_row(&mut self, outcome: &CaptionOutcome, file_name: &str) -> Result<()> {
        self.write_fields([outcome.to_csv_field(), file_name])
    }

    fn write_fields(&mut self, fields: [&str; 2]) -> Result<()> {
        self.writer
            .write_record(fields)
            .map_err(|e| CaptionerError::csv(&self.path, e))?;
        self.writer
            .flush()
            .map_err(|e| CaptionerError::io(&self.path, e))
    }
}
