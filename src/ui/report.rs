//! Per-file report section
//!
//! Lays out one uploaded file the way the review window shows it: header,
//! preview, QC stats, histogram and the rating slider.

use iced::widget::image::{Handle, Image};
use iced::widget::{canvas, column, slider, text, Column};
use iced::{Color, Element, Font, Length};

use super::histogram::HistogramChart;
use crate::config::QcConfig;
use crate::decode::display::UNSUPPORTED_DISPLAY_MESSAGE;
use crate::state::data::{FileOutcome, FileReport};
use crate::state::ratings::Rating;
use crate::Message;

pub const ERROR_COLOR: Color = Color::from_rgb(0.95, 0.35, 0.35);

/// Build the section for one file
///
/// `preview` is the image handle built from the report's preview, if any.
/// `slider_rating` is the current slider position, which can be ahead of
/// the rating recorded in the report while a new pass is running.
pub fn file_section<'a>(
    report: &'a FileReport,
    preview: Option<&Handle>,
    slider_rating: Option<Rating>,
    config: &QcConfig,
) -> Element<'a, Message> {
    let mut section: Column<'a, Message> =
        column![text(format!("Image: {}", report.name)).size(28)].spacing(12);

    let analysis = match &report.outcome {
        FileOutcome::Analyzed(analysis) => analysis,
        FileOutcome::DecodeFailed { message } => {
            return section.push(text(message).color(ERROR_COLOR)).into();
        }
    };

    section = match (preview, &analysis.preview) {
        (Some(handle), Some(image)) => section
            .push(
                Image::<Handle>::new(handle.clone())
                    .width(Length::Fixed((image.width as f32).min(config.preview_max_width))),
            )
            .push(text(image.caption).size(14)),
        _ => section.push(text(UNSUPPORTED_DISPLAY_MESSAGE)),
    };

    let rating = slider_rating.unwrap_or(analysis.rating);
    let name = report.name.clone();

    section
        .push(text("QC Stats:").size(18))
        .push(json_block(analysis.stats.to_json()))
        .push(
            canvas(HistogramChart::new(analysis.histogram.clone()))
                .width(Length::Fill)
                .height(Length::Fixed(config.histogram_height)),
        )
        .push(text("Rate this image (1 = Bad, 5 = Excellent):"))
        .push(slider(
            Rating::MIN.value()..=Rating::MAX.value(),
            rating.value(),
            move |value| Message::RatingChanged(name.clone(), value),
        ))
        .push(text(format!("Your rating: {}/{}", rating.value(), Rating::MAX.value())))
        .into()
}

/// Monospaced JSON, or the serialization error in its place
pub fn json_block<'a>(json: Result<String, serde_json::Error>) -> Element<'a, Message> {
    match json {
        Ok(json) => text(json).font(Font::MONOSPACE).size(14).into(),
        Err(e) => text(format!("Cannot display JSON: {}", e)).color(ERROR_COLOR).into(),
    }
}
