use crate::indicator::color::Rgb;
use crate::indicator::path::{anchors_x, smooth_cubic_path, Point};
use crate::indicator::surface::IndicatorSurface;
use std::f64::consts::PI;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    Paused,
    Done,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Done => "done",
        }
    }
}

/// Which end of the curve starts moving first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub width: f64,
    pub height: f64,
    pub points: usize,
    pub duration: Duration,
    pub tension: f64,
    pub bend: f64,
    pub sharpness: f64,
    pub playing_color: Rgb,
    pub paused_color: Rgb,
    pub done_color: Rgb,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 40.0,
            points: 28,
            duration: Duration::from_millis(900),
            tension: 0.65,
            bend: 18.0,
            sharpness: 2.0,
            playing_color: Rgb::new(0x7c, 0x3a, 0xed),
            paused_color: Rgb::new(0x9c, 0xa3, 0xaf),
            done_color: Rgb::new(0x22, 0xc5, 0x5e),
        }
    }
}

impl IndicatorConfig {
    pub fn baseline(&self, mode: Mode) -> f64 {
        let play = self.height * 0.25;
        match mode {
            Mode::Playing | Mode::Done => play,
            Mode::Paused => play + self.height * 0.25,
        }
    }

    pub fn color(&self, mode: Mode) -> Rgb {
        match mode {
            Mode::Playing => self.playing_color,
            Mode::Paused => self.paused_color,
            Mode::Done => self.done_color,
        }
    }
}

#[derive(Debug, Clone)]
struct Tween {
    target: Mode,
    direction: Direction,
    elapsed: Duration,
    from_ys: Vec<f64>,
    to_y: f64,
    from_color: Rgb,
    to_color: Rgb,
    sign: f64,
    /// Mode adopted once the tween settles.
    settle_mode: Option<Mode>,
}

/// GSAP's `power1.inOut`.
fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn smoothstep(x: f64) -> f64 {
    x * x * (3.0 - 2.0 * x)
}

/// Animated progress line with three resting configurations.
///
/// The mode only changes through `play`, `pause`, `reset` and `set_progress`.
/// The animation clock is `advance` and is independent of the upload engine.
pub struct WhipIndicator<S: IndicatorSurface> {
    cfg: IndicatorConfig,
    surface: S,
    anchors: Vec<f64>,
    mode: Mode,
    ys: Vec<f64>,
    color: Rgb,
    progress: f64,
    tween: Option<Tween>,
}

impl<S: IndicatorSurface> WhipIndicator<S> {
    pub fn new(cfg: IndicatorConfig, surface: S) -> Self {
        Self::with_mode(cfg, surface, Mode::Playing)
    }

    pub fn with_mode(mut cfg: IndicatorConfig, surface: S, initial: Mode) -> Self {
        cfg.points = cfg.points.max(2);
        let anchors = anchors_x(cfg.points, cfg.width);
        let mut ind = Self {
            ys: vec![cfg.baseline(initial); cfg.points],
            color: cfg.color(initial),
            cfg,
            surface,
            anchors,
            mode: initial,
            progress: 0.0,
            tween: None,
        };
        ind.render_all();
        ind
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn offsets(&self) -> &[f64] {
        &self.ys
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween_target(&self) -> Option<Mode> {
        self.tween.as_ref().map(|t| t.target)
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.cfg
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn play(&mut self) {
        if self.mode != Mode::Paused || self.tween_target() == Some(Mode::Playing) {
            return;
        }
        self.begin_tween(Mode::Playing, Direction::LeftToRight, Some(Mode::Playing));
    }

    /// Flips to `paused` at once; an in-flight play sweep is turned around.
    pub fn pause(&mut self) {
        let allowed = match self.mode {
            Mode::Playing => true,
            Mode::Paused => self.tween_target() == Some(Mode::Playing),
            Mode::Done => false,
        };
        if !allowed {
            return;
        }
        self.mode = Mode::Paused;
        self.begin_tween(Mode::Paused, Direction::RightToLeft, None);
    }

    pub fn reset(&mut self) {
        self.tween = None;
        self.mode = Mode::Playing;
        self.progress = 0.0;
        self.ys = vec![self.cfg.baseline(Mode::Playing); self.cfg.points];
        self.color = self.cfg.color(Mode::Playing);
        self.render_all();
    }

    /// Sync the reveal length with the aggregate upload progress.
    pub fn set_progress(&mut self, progress: f64) {
        let p = if progress.is_finite() { progress.clamp(0.0, 100.0) } else { 0.0 };
        self.progress = p;
        if p >= 100.0 && self.mode != Mode::Done {
            self.mode = Mode::Done;
            self.begin_tween(Mode::Done, Direction::LeftToRight, None);
            return;
        }
        self.render_reveal();
    }

    pub fn advance(&mut self, dt: Duration) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        tween.elapsed += dt;

        let raw = if self.cfg.duration.is_zero() {
            1.0
        } else {
            (tween.elapsed.as_secs_f64() / self.cfg.duration.as_secs_f64()).min(1.0)
        };
        if raw >= 1.0 {
            self.settle();
            return;
        }

        let p = ease_in_out_quad(raw);
        let n = self.cfg.points;
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            let local = match tween.direction {
                Direction::LeftToRight => t,
                Direction::RightToLeft => 1.0 - t,
            };
            let influence = ((p - local) * self.cfg.sharpness).clamp(0.0, 1.0);
            let s = smoothstep(smoothstep(influence));
            let y = tween.from_ys[i] + (tween.to_y - tween.from_ys[i]) * s;
            let bend = tween.sign * self.cfg.bend * (influence * PI).sin() * (1.0 - s.powf(1.5)) * 0.6;
            self.ys[i] = y + bend;
        }
        self.color = tween.from_color.lerp(tween.to_color, p);

        self.render_path();
        self.surface.set_stroke(self.color);
    }

    fn begin_tween(&mut self, target: Mode, direction: Direction, settle_mode: Option<Mode>) {
        let to_y = self.cfg.baseline(target);
        let from_mean = self.ys.iter().sum::<f64>() / self.ys.len() as f64;
        self.tween = Some(Tween {
            target,
            direction,
            elapsed: Duration::ZERO,
            from_ys: self.ys.clone(),
            to_y,
            from_color: self.color,
            to_color: self.cfg.color(target),
            sign: if to_y > from_mean { 1.0 } else { -1.0 },
            settle_mode,
        });
        self.render_reveal();
        if self.cfg.duration.is_zero() {
            self.settle();
        }
    }

    /// Land exactly on the flat target and drop the tween.
    fn settle(&mut self) {
        let Some(tween) = self.tween.take() else {
            return;
        };
        self.ys = vec![tween.to_y; self.cfg.points];
        self.color = tween.to_color;
        if let Some(m) = tween.settle_mode {
            self.mode = m;
        }
        self.render_all();
    }

    fn render_path(&mut self) {
        let pts: Vec<Point> = self.anchors.iter().zip(&self.ys).map(|(&x, &y)| Point { x, y }).collect();
        let d = smooth_cubic_path(&pts, self.cfg.tension);
        self.surface.set_path(&pts, &d);
    }

    fn render_reveal(&mut self) {
        let total = self.cfg.width;
        self.surface.set_reveal(total, self.progress / 100.0 * total);
    }

    fn render_all(&mut self) {
        self.render_path();
        self.surface.set_stroke(self.color);
        self.render_reveal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::surface::RecordingSurface;

    fn indicator() -> WhipIndicator<RecordingSurface> {
        WhipIndicator::new(IndicatorConfig::default(), RecordingSurface::default())
    }

    fn flat(ind: &WhipIndicator<RecordingSurface>, y: f64) -> bool {
        ind.offsets().iter().all(|v| *v == y) && ind.surface().points.iter().all(|p| p.y == y)
    }

    const HALF: Duration = Duration::from_millis(450);
    const FULL: Duration = Duration::from_millis(900);

    #[test]
    fn starts_flat_and_playing() {
        let ind = indicator();
        assert_eq!(ind.mode(), Mode::Playing);
        assert!(flat(&ind, 10.0));
        assert_eq!(ind.surface().stroke, Some(Rgb::new(0x7c, 0x3a, 0xed)));
        assert_eq!(ind.surface().points.len(), 28);
        assert_eq!(ind.surface().reveal, (320.0, 0.0));
    }

    #[test]
    fn pause_flips_mode_before_the_sweep_ends() {
        let mut ind = indicator();
        ind.pause();
        assert_eq!(ind.mode(), Mode::Paused);
        assert!(ind.is_animating());

        ind.advance(HALF);
        assert_eq!(ind.mode(), Mode::Paused);
        let c = ind.color();
        assert_ne!(c, ind.config().playing_color);
        assert_ne!(c, ind.config().paused_color);

        ind.advance(HALF);
        assert!(!ind.is_animating());
        assert!(flat(&ind, 20.0));
        assert_eq!(ind.color(), ind.config().paused_color);
        assert_eq!(ind.surface().stroke, Some(ind.config().paused_color));
    }

    #[test]
    fn right_to_left_sweep_moves_the_right_end_first() {
        let mut ind = indicator();
        ind.pause();
        ind.advance(Duration::from_millis(200));
        let ys = ind.offsets();
        assert_eq!(ys[0], 10.0);
        assert_ne!(ys[ys.len() - 1], 10.0);
    }

    #[test]
    fn play_settles_mode_only_at_the_end() {
        let mut ind = indicator();
        ind.pause();
        ind.advance(FULL);

        ind.play();
        assert_eq!(ind.tween_target(), Some(Mode::Playing));
        ind.advance(HALF);
        assert_eq!(ind.mode(), Mode::Paused);
        ind.play();
        ind.advance(HALF);
        assert_eq!(ind.mode(), Mode::Playing);
        assert!(!ind.is_animating());
        assert!(flat(&ind, 10.0));
        assert_eq!(ind.color(), ind.config().playing_color);
    }

    #[test]
    fn pause_interrupts_play_without_jumping() {
        let mut ind = indicator();
        ind.pause();
        ind.advance(FULL);
        ind.play();
        ind.advance(Duration::from_millis(300));

        let before = ind.offsets().to_vec();
        let color = ind.color();
        ind.pause();
        assert_eq!(ind.mode(), Mode::Paused);
        assert_eq!(ind.tween_target(), Some(Mode::Paused));
        assert_eq!(ind.offsets(), &before[..]);
        assert_eq!(ind.color(), color);

        ind.advance(FULL);
        assert!(flat(&ind, 20.0));
    }

    #[test]
    fn reset_mid_sweep_is_flat_and_immediate() {
        let mut ind = indicator();
        ind.set_progress(40.0);
        ind.pause();
        ind.advance(Duration::from_millis(300));
        assert!(!flat(&ind, 10.0));

        ind.reset();
        assert_eq!(ind.mode(), Mode::Playing);
        assert!(!ind.is_animating());
        assert!(flat(&ind, 10.0));
        assert_eq!(ind.surface().stroke, Some(ind.config().playing_color));
        assert_eq!(ind.surface().reveal, (320.0, 0.0));

        ind.advance(FULL);
        assert!(flat(&ind, 10.0));
    }

    #[test]
    fn progress_maps_to_reveal_and_forces_done() {
        let mut ind = indicator();
        ind.set_progress(25.0);
        assert_eq!(ind.surface().reveal, (320.0, 80.0));
        ind.set_progress(-5.0);
        assert_eq!(ind.surface().reveal.1, 0.0);

        ind.pause();
        ind.set_progress(100.0);
        assert_eq!(ind.mode(), Mode::Done);
        assert_eq!(ind.tween_target(), Some(Mode::Done));
        assert_eq!(ind.surface().reveal, (320.0, 320.0));

        ind.play();
        ind.pause();
        assert_eq!(ind.mode(), Mode::Done);

        ind.advance(FULL);
        assert!(flat(&ind, 10.0));
        assert_eq!(ind.color(), ind.config().done_color);

        ind.set_progress(50.0);
        assert_eq!(ind.mode(), Mode::Done);
        ind.reset();
        assert_eq!(ind.mode(), Mode::Playing);
    }

    #[test]
    fn zero_duration_settles_immediately() {
        let cfg = IndicatorConfig { duration: Duration::ZERO, ..IndicatorConfig::default() };
        let mut ind = WhipIndicator::new(cfg, RecordingSurface::default());
        ind.pause();
        assert!(!ind.is_animating());
        assert!(flat(&ind, 20.0));
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.25) + ease_in_out_quad(0.75) - 1.0).abs() < 1e-12);
    }
}
