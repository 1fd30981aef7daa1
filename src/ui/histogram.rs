//! Luminance histogram chart
//!
//! Draws the 256 bins as bars scaled to the tallest bin, with the title,
//! axis labels and the range end points.

use iced::alignment;
use iced::widget::canvas::{self, Path, Stroke, Text};
use iced::{Pixels, Point, Rectangle, Size};

use crate::analysis::histogram::{
    LuminanceHistogram, HISTOGRAM_BINS, HISTOGRAM_TITLE, HISTOGRAM_X_LABEL, HISTOGRAM_Y_LABEL,
};
use crate::Message;

const MARGIN_LEFT: f32 = 64.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 32.0;
const MARGIN_BOTTOM: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct HistogramChart {
    histogram: LuminanceHistogram,
}

impl HistogramChart {
    pub fn new(histogram: LuminanceHistogram) -> Self {
        Self { histogram }
    }
}

impl canvas::Program<Message> for HistogramChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let palette = theme.extended_palette();
        let ink = palette.background.base.text;
        let bar_color = palette.primary.base.color;

        let plot_width = bounds.width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = bounds.height - MARGIN_TOP - MARGIN_BOTTOM;
        if plot_width <= 0.0 || plot_height <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let origin = Point::new(MARGIN_LEFT, MARGIN_TOP + plot_height);
        let axes = Path::new(|builder| {
            builder.move_to(Point::new(MARGIN_LEFT, MARGIN_TOP));
            builder.line_to(origin);
            builder.line_to(Point::new(MARGIN_LEFT + plot_width, origin.y));
        });
        frame.stroke(&axes, Stroke::default().with_color(ink).with_width(1.0));

        // Bars, scaled so the tallest bin fills the plot
        let max_count = self.histogram.max_count();
        let bar_width = plot_width / HISTOGRAM_BINS as f32;
        if max_count > 0 {
            for (i, &count) in self.histogram.counts().iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let bar_height = count as f32 / max_count as f32 * plot_height;
                frame.fill_rectangle(
                    Point::new(MARGIN_LEFT + i as f32 * bar_width, origin.y - bar_height),
                    Size::new(bar_width.max(1.0), bar_height),
                    bar_color,
                );
            }
        }

        let (lower, upper) = self.histogram.range();
        let labels = [
            (
                HISTOGRAM_TITLE.to_string(),
                Point::new(bounds.width / 2.0, 6.0),
                16.0,
                alignment::Horizontal::Center,
            ),
            (
                HISTOGRAM_X_LABEL.to_string(),
                Point::new(MARGIN_LEFT + plot_width / 2.0, origin.y + 20.0),
                13.0,
                alignment::Horizontal::Center,
            ),
            (
                HISTOGRAM_Y_LABEL.to_string(),
                Point::new(4.0, MARGIN_TOP - 18.0),
                13.0,
                alignment::Horizontal::Left,
            ),
            (
                format_tick(lower),
                Point::new(MARGIN_LEFT, origin.y + 4.0),
                11.0,
                alignment::Horizontal::Center,
            ),
            (
                format_tick(upper),
                Point::new(MARGIN_LEFT + plot_width, origin.y + 4.0),
                11.0,
                alignment::Horizontal::Center,
            ),
            (
                max_count.to_string(),
                Point::new(MARGIN_LEFT - 6.0, MARGIN_TOP),
                11.0,
                alignment::Horizontal::Right,
            ),
        ];

        for (content, position, size, horizontal_alignment) in labels {
            frame.fill_text(Text {
                content,
                position,
                color: ink,
                size: Pixels(size),
                horizontal_alignment,
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

/// Axis tick text: fixed point for everyday ranges, scientific otherwise
fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(0.01..10_000.0).contains(&magnitude) {
        format!("{:.2e}", value)
    } else {
        format!("{:.2}", value)
    }
}
