use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// `count` evenly spaced x positions spanning `[0, width]`.
pub fn anchors_x(count: usize, width: f64) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![0.0],
        _ => {
            let step = width / (count - 1) as f64;
            (0..count).map(|i| i as f64 * step).collect()
        }
    }
}

/// Catmull-Rom style cubic path through `points`, as SVG path data.
pub fn smooth_cubic_path(points: &[Point], tension: f64) -> String {
    if points.len() < 2 {
        return String::new();
    }
    let t = tension.clamp(0.0, 1.0);

    let mut d = format!("M {} {}", points[0].x, points[0].y);
    for i in 0..points.len() - 1 {
        let p0 = if i == 0 { points[i] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points.get(i + 2).copied().unwrap_or(p2);

        let c1x = p1.x + (p2.x - p0.x) * t / 3.0;
        let c1y = p1.y + (p2.y - p0.y) * t / 3.0;
        let c2x = p2.x - (p3.x - p1.x) * t / 3.0;
        let c2y = p2.y - (p3.y - p1.y) * t / 3.0;

        let _ = write!(d, " C {} {}, {} {}, {} {}", c1x, c1y, c2x, c2y, p2.x, p2.y);
    }
    d
}
