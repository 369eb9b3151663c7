//! The captioning run: resolve input, filter, then encode, caption and write
//! each image in turn.

use std::path::Path;

use tracing::{info, warn};

use crate::allow_list::AllowList;
use crate::archive::resolve_input;
use crate::captioner::{CaptionOutcome, CaptionService};
use crate::config::CaptionConfig;
use crate::encode::encode_image;
use crate::error::Result;
use crate::scan::find_images;
use crate::writer::CaptionWriter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub captioned: usize,
    /// Service calls that ended in the sentinel caption.
    pub failed: usize,
    /// Images that could not be read; these also get the sentinel caption.
    pub unreadable: usize,
}

impl RunSummary {
    /// Data rows written to the CSV.
    pub fn rows(&self) -> usize {
        self.captioned + self.failed + self.unreadable
    }
}

/// Runs the whole pipeline. Only configuration, allow-list, archive and
/// output errors abort; per-image failures are written as sentinel rows.
pub fn run<S>(config: &CaptionConfig, service: &S) -> Result<RunSummary>
where
    S: CaptionService + ?Sized,
{
    config.validate()?;
    let allow_list = AllowList::load(&config.allow_list)?;

    let input = resolve_input(&config.input, config.scratch_dir.as_deref())?;
    let result = caption_directory(input.root(), &config.output, &allow_list, service);
    input.close();

    let summary = result?;
    info!(
        "Processing complete. Captions saved to {} ({} captioned, {} failed, {} unreadable)",
        config.output.display(),
        summary.captioned,
        summary.failed,
        summary.unreadable
    );
    Ok(summary)
}

pub fn caption_directory<S>(
    root: &Path,
    output: &Path,
    allow_list: &AllowList,
    service: &S,
) -> Result<RunSummary>
where
    S: CaptionService + ?Sized,
{
    let mut writer = CaptionWriter::create(output)?;
    let images = find_images(root, allow_list);
    info!("Found {} allow-listed images under {}", images.len(), root.display());

    let mut summary = RunSummary::default();
    for image in images {
        info!("{}", image.file_name);

        let outcome = match encode_image(&image.path) {
            Ok(image_b64) => {
                let outcome = service.caption(&image_b64);
                if outcome.is_captioned() {
                    summary.captioned += 1;
                } else {
                    summary.failed += 1;
                }
                outcome
            }
            Err(e) => {
                warn!("Cannot read {}: {}", image.path.display(), e);
                summary.unreadable += 1;
                CaptionOutcome::Failed(format!("cannot read {}: {}", image.path.display(), e))
            }
        };

        info!("Caption: {}", outcome.to_csv_field());
        writer.write_row(&outcome, &image.file_name)?;
    }

    Ok(summary)
}
