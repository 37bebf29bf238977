//! Traffic chart — hand-drawn requests-per-second line on a canvas.
//!
//! Split in two: [`ChartModel::build`] is a pure function from the
//! traffic window to plot geometry on a fixed virtual canvas, and
//! [`render`] paints that geometry. Keeping the geometry free of any
//! terminal type is what makes the scale and layout rules testable.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders};

use vulpini_core::TrafficHistory;

use crate::theme::Theme;

/// Virtual canvas width in plot units.
pub const CANVAS_WIDTH: f64 = 400.0;
/// Virtual canvas height in plot units.
pub const CANVAS_HEIGHT: f64 = 200.0;
/// Fixed padding on all sides of the plot area.
pub const PADDING: f64 = 40.0;
/// Number of horizontal gridlines.
pub const GRIDLINES: usize = 5;
/// Minimum y-axis scale. Near-zero traffic still gets a visible axis
/// instead of a line squashed against the top of the plot.
pub const MIN_SCALE: u64 = 10;

const PLOT_WIDTH: f64 = CANVAS_WIDTH - 2.0 * PADDING;
const PLOT_HEIGHT: f64 = CANVAS_HEIGHT - 2.0 * PADDING;

/// Plot geometry for one render pass. Coordinates are in canvas units
/// with the origin at the bottom-left, y increasing upward.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// Y-axis scale: `max(MIN_SCALE, max sample)`.
    pub max: u64,
    /// Polyline vertices, oldest sample leftmost, newest rightmost.
    pub points: Vec<(f64, f64)>,
    /// Y positions of the horizontal gridlines, bottom to top.
    pub gridlines: [f64; GRIDLINES],
}

impl ChartModel {
    /// Builds the plot geometry, or `None` when there are fewer than
    /// two samples (a single point cannot define a line).
    pub fn build(history: &TrafficHistory) -> Option<Self> {
        if history.len() < 2 {
            return None;
        }

        let max = history.max_value().max(MIN_SCALE);

        #[allow(clippy::cast_precision_loss)]
        let step = PLOT_WIDTH / (history.len() - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let points = history
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = PADDING + i as f64 * step;
                let y = PADDING + (p.value as f64 / max as f64) * PLOT_HEIGHT;
                (x, y)
            })
            .collect();

        let mut gridlines = [0.0; GRIDLINES];
        #[allow(clippy::cast_precision_loss)]
        for (i, y) in gridlines.iter_mut().enumerate() {
            *y = PADDING + i as f64 * (PLOT_HEIGHT / (GRIDLINES - 1) as f64);
        }

        Some(Self { max, points, gridlines })
    }
}

/// Paints the traffic window into `area`. With too few samples the
/// panel is cleared to the theme background and left empty.
pub fn render(frame: &mut Frame, area: Rect, history: &TrafficHistory, theme: &Theme) {
    let model = ChartModel::build(history);

    let block = Block::default()
        .title(" Traffic (req/s) ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border())
        .style(Style::default().bg(theme.background));

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, CANVAS_HEIGHT])
        .paint(|ctx| {
            let Some(model) = &model else { return };

            for &y in &model.gridlines {
                ctx.draw(&CanvasLine {
                    x1: PADDING,
                    y1: y,
                    x2: CANVAS_WIDTH - PADDING,
                    y2: y,
                    color: theme.muted,
                });
            }

            ctx.layer();
            for pair in model.points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: theme.highlight,
                });
            }

            // Two axis labels only: origin and the computed max.
            ctx.print(
                4.0,
                PADDING,
                Span::styled("0", Style::default().fg(theme.text)),
            );
            ctx.print(
                4.0,
                CANVAS_HEIGHT - PADDING,
                Span::styled(model.max.to_string(), Style::default().fg(theme.text)),
            );
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vulpini_core::TrafficPoint;

    fn history_of(values: &[u64]) -> TrafficHistory {
        let mut history = TrafficHistory::new();
        for (i, &v) in values.iter().enumerate() {
            history.push(TrafficPoint::new(format!("00:00:{i:02}"), v));
        }
        history
    }

    #[test]
    fn scale_follows_data_above_the_floor() {
        let model = ChartModel::build(&history_of(&[5, 95])).unwrap();
        assert_eq!(model.max, 95);
    }

    #[test]
    fn scale_floors_at_ten_for_quiet_traffic() {
        let model = ChartModel::build(&history_of(&[0, 3])).unwrap();
        assert_eq!(model.max, 10);
    }

    #[test]
    fn fewer_than_two_points_draws_nothing() {
        assert_eq!(ChartModel::build(&history_of(&[])), None);
        assert_eq!(ChartModel::build(&history_of(&[42])), None);
    }

    #[test]
    fn points_span_the_plot_width() {
        let model = ChartModel::build(&history_of(&[1, 2, 3, 4, 5])).unwrap();
        let first = model.points.first().unwrap();
        let last = model.points.last().unwrap();
        assert!((first.0 - PADDING).abs() < f64::EPSILON);
        assert!((last.0 - (CANVAS_WIDTH - PADDING)).abs() < f64::EPSILON);

        // Uniform horizontal spacing between consecutive points.
        let step = PLOT_WIDTH / 4.0;
        for (i, p) in model.points.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = PADDING + i as f64 * step;
            assert!((p.0 - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn y_is_linear_in_value_over_scale() {
        let model = ChartModel::build(&history_of(&[0, 50, 100])).unwrap();
        assert_eq!(model.max, 100);
        // Zero sits on the plot floor, the max on the plot ceiling.
        assert!((model.points[0].1 - PADDING).abs() < f64::EPSILON);
        assert!((model.points[1].1 - (PADDING + PLOT_HEIGHT / 2.0)).abs() < 1e-9);
        assert!((model.points[2].1 - (CANVAS_HEIGHT - PADDING)).abs() < f64::EPSILON);
    }

    #[test]
    fn five_evenly_spaced_gridlines() {
        let model = ChartModel::build(&history_of(&[1, 2])).unwrap();
        assert_eq!(model.gridlines.len(), GRIDLINES);
        assert!((model.gridlines[0] - PADDING).abs() < f64::EPSILON);
        assert!((model.gridlines[4] - (CANVAS_HEIGHT - PADDING)).abs() < f64::EPSILON);
        let gap = model.gridlines[1] - model.gridlines[0];
        for pair in model.gridlines.windows(2) {
            assert!((pair[1] - pair[0] - gap).abs() < 1e-9);
        }
    }
}
