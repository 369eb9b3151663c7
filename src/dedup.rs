//! Audit helper: reads a produced CSV back and counts distinct filenames.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{CaptionerError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport {
    /// Data rows read, header excluded.
    pub rows: usize,
    /// Filename to caption, later rows winning.
    pub captions: BTreeMap<String, String>,
}

impl DedupReport {
    pub fn distinct(&self) -> usize {
        self.captions.len()
    }

    pub fn duplicates(&self) -> usize {
        self.rows - self.captions.len()
    }
}

pub fn load_caption_map(path: &Path) -> Result<DedupReport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CaptionerError::csv(path, e))?;

    let mut captions = BTreeMap::new();
    let mut rows = 0;

    for record in reader.records() {
        let record = record.map_err(|e| CaptionerError::csv(path, e))?;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(CaptionerError::csv(
                path,
                format!("line {line}: expected 2 fields, found {}", record.len()),
            ));
        }
        captions.insert(record[1].to_string(), record[0].to_string());
        rows += 1;
    }

    Ok(DedupReport { rows, captions })
}
