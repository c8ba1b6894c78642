use crate::indicator::color::Rgb;
use crate::indicator::path::Point;

/// Where the indicator draws. Only these three operations are ever issued.
pub trait IndicatorSurface {
    /// `d` is SVG path data for `points`; surfaces use whichever form suits them.
    fn set_path(&mut self, points: &[Point], d: &str);
    fn set_stroke(&mut self, color: Rgb);
    /// `visible` of `total` path length is drawn.
    fn set_reveal(&mut self, total: f64, visible: f64);
}

/// Keeps the last value of every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub points: Vec<Point>,
    pub path: String,
    pub stroke: Option<Rgb>,
    pub reveal: (f64, f64),
    pub path_updates: usize,
}

impl IndicatorSurface for RecordingSurface {
    fn set_path(&mut self, points: &[Point], d: &str) {
        self.points = points.to_vec();
        self.path = d.to_string();
        self.path_updates += 1;
    }

    fn set_stroke(&mut self, color: Rgb) {
        self.stroke = Some(color);
    }

    fn set_reveal(&mut self, total: f64, visible: f64) {
        self.reveal = (total, visible);
    }
}
