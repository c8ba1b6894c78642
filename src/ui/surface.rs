use crate::indicator::color::Rgb;
use crate::indicator::path::Point;
use crate::indicator::surface::IndicatorSurface;
use indicatif::{ProgressBar, ProgressStyle};

// top of the box first
const LEVELS: [char; 8] = ['█', '▇', '▆', '▅', '▄', '▃', '▂', '▁'];

/// Draws the indicator as one line of block glyphs on an indicatif bar.
///
/// The path is sampled at `columns` evenly spaced x positions; a lower y (closer to
/// the top of the indicator box) gives a taller glyph. Columns past the reveal stay blank.
pub struct TerminalSurface {
    bar: ProgressBar,
    columns: usize,
    height: f64,
    points: Vec<Point>,
    stroke: Rgb,
    fraction: f64,
}

impl TerminalSurface {
    pub fn new(bar: ProgressBar, columns: usize, height: f64) -> Self {
        if let Ok(style) = ProgressStyle::with_template("{prefix:>9} {wide_msg}") {
            bar.set_style(style);
        }
        Self {
            bar,
            columns,
            height,
            points: vec![],
            stroke: Rgb::default(),
            fraction: 0.0,
        }
    }

    pub fn hidden(columns: usize, height: f64) -> Self {
        Self::new(ProgressBar::hidden(), columns, height)
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn stroke(&self) -> Rgb {
        self.stroke
    }

    /// The current line without color escapes.
    pub fn line(&self) -> String {
        render_line(&self.points, self.height, self.columns, self.fraction)
    }

    fn redraw(&self) {
        let Rgb { r, g, b } = self.stroke;
        self.bar
            .set_message(format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, self.line()));
    }
}

impl IndicatorSurface for TerminalSurface {
    fn set_path(&mut self, points: &[Point], _d: &str) {
        self.points.clear();
        self.points.extend_from_slice(points);
        self.redraw();
    }

    fn set_stroke(&mut self, color: Rgb) {
        self.stroke = color;
        self.redraw();
    }

    fn set_reveal(&mut self, total: f64, visible: f64) {
        self.fraction = if total > 0.0 { (visible / total).clamp(0.0, 1.0) } else { 0.0 };
        self.redraw();
    }
}

pub fn render_line(points: &[Point], height: f64, columns: usize, fraction: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return " ".repeat(columns);
    };
    let visible = (fraction.clamp(0.0, 1.0) * columns as f64).round() as usize;
    let span = last.x - first.x;

    (0..columns)
        .map(|c| {
            if c >= visible {
                return ' ';
            }
            let x = if columns > 1 { first.x + span * c as f64 / (columns - 1) as f64 } else { first.x };
            let t = if height > 0.0 { (sample_y(points, x) / height).clamp(0.0, 1.0) } else { 0.5 };
            LEVELS[(t * (LEVELS.len() - 1) as f64).round() as usize]
        })
        .collect()
}

/// Piecewise-linear y at `x`; points are sorted by x.
fn sample_y(points: &[Point], x: f64) -> f64 {
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if x <= b.x {
            if b.x <= a.x {
                return b.y;
            }
            let t = ((x - a.x) / (b.x - a.x)).clamp(0.0, 1.0);
            return a.y + (b.y - a.y) * t;
        }
    }
    points.last().map(|p| p.y).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{IndicatorConfig, WhipIndicator};
    use std::time::Duration;

    fn flat(y: f64) -> Vec<Point> {
        (0..5).map(|i| Point { x: i as f64 * 10.0, y }).collect()
    }

    #[test]
    fn baseline_maps_to_glyph_height() {
        assert_eq!(render_line(&flat(0.0), 40.0, 4, 1.0), "████");
        assert_eq!(render_line(&flat(40.0), 40.0, 4, 1.0), "▁▁▁▁");
        assert_eq!(render_line(&flat(20.0), 40.0, 4, 1.0), "▄▄▄▄");
    }

    #[test]
    fn reveal_limits_columns() {
        assert_eq!(render_line(&flat(0.0), 40.0, 4, 0.5), "██  ");
        assert_eq!(render_line(&flat(0.0), 40.0, 4, 0.0), "    ");
        assert_eq!(render_line(&[], 40.0, 3, 1.0), "   ");
    }

    #[test]
    fn interpolates_between_points() {
        let pts = [Point { x: 0.0, y: 0.0 }, Point { x: 10.0, y: 40.0 }];
        let line: Vec<char> = render_line(&pts, 40.0, 3, 1.0).chars().collect();
        assert_eq!(line, vec!['█', '▄', '▁']);
    }

    #[test]
    fn drives_from_indicator() {
        let cfg = IndicatorConfig::default();
        let mut ind = WhipIndicator::new(cfg.clone(), TerminalSurface::hidden(20, cfg.height));
        ind.set_progress(50.0);
        assert_eq!(ind.surface().line().trim_end().chars().count(), 10);

        ind.pause();
        ind.advance(Duration::from_millis(2000));
        assert_eq!(ind.surface().stroke(), cfg.paused_color);
        assert!(ind.surface().line().starts_with("▄▄▄▄"));
    }
}
