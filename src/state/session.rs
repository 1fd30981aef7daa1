//! Review pass
//!
//! A pass turns the uploaded files and the current slider positions into
//! everything the window shows. The UI calls it again after every
//! interaction; nothing survives from one pass to the next except what the
//! caller passes back in.

use log::{debug, info, warn};

use super::data::{FileAnalysis, FileOutcome, FileReport, UploadedFile};
use super::ratings::RatingsTable;
use crate::analysis::{analyze, AnalyzeError, LuminanceHistogram};
use crate::config::QcConfig;
use crate::decode::{decode_upload, display};
use crate::error::QcError;

/// Output of one pass: reports in upload order plus the aggregate ratings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPass {
    pub reports: Vec<FileReport>,
    pub ratings: RatingsTable,
}

impl ReviewPass {
    pub fn analyzed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Analyzed(_)))
            .count()
    }
}

/// Run decode, analysis and histogram for every file
///
/// `widget_ratings` holds the slider positions from the previous pass; files
/// without one start at the configured default. A per-file HDR decode
/// failure is reported in place and the file gets no rating. Any other
/// fault stops the pass.
pub fn run_pass(
    files: &[UploadedFile],
    widget_ratings: &RatingsTable,
    config: &QcConfig,
) -> Result<ReviewPass, QcError> {
    let mut pass = ReviewPass::default();

    for file in files {
        let report = review_file(file, widget_ratings, config)?;
        if let FileOutcome::Analyzed(analysis) = &report.outcome {
            pass.ratings.insert(file.name(), analysis.rating);
        }
        pass.reports.push(report);
    }

    info!(
        "Review pass complete: {} files, {} analyzed",
        pass.reports.len(),
        pass.analyzed_count()
    );
    Ok(pass)
}

fn review_file(
    file: &UploadedFile,
    widget_ratings: &RatingsTable,
    config: &QcConfig,
) -> Result<FileReport, QcError> {
    let extension = file.extension();

    let image = match decode_upload(file) {
        Ok(image) => image,
        Err(err) if err.is_per_file() => {
            warn!("{}: {}", file.name(), err);
            return Ok(FileReport {
                name: file.name().to_string(),
                extension,
                outcome: FileOutcome::DecodeFailed {
                    message: err.to_string(),
                },
            });
        }
        Err(source) => {
            return Err(QcError::Decode {
                file: file.name().to_string(),
                source,
            });
        }
    };

    debug!(
        "{}: shape {} {} ({})",
        file.name(),
        image.shape(),
        image.element_type(),
        image.order().label()
    );

    let preview = display::preview(&image);
    let (stats, luminance) =
        analyze(&image, config.luminance_order).map_err(|source| analyze_error(file, source))?;
    let histogram =
        LuminanceHistogram::from_luminance(&luminance).map_err(|source| analyze_error(file, source))?;

    let rating = widget_ratings
        .get(file.name())
        .unwrap_or_else(|| config.initial_rating());

    Ok(FileReport {
        name: file.name().to_string(),
        extension,
        outcome: FileOutcome::Analyzed(Box::new(FileAnalysis {
            preview,
            stats,
            histogram,
            rating,
        })),
    })
}

fn analyze_error(file: &UploadedFile, source: AnalyzeError) -> QcError {
    QcError::Analyze {
        file: file.name().to_string(),
        source,
    }
}
