use crate::core::config::UploadConfig;
use rand::Rng;
use std::time::Duration;

/// Draw a task duration uniformly from `[min_seconds, max_seconds]`.
pub fn draw_duration<R: Rng + ?Sized>(rng: &mut R, cfg: &UploadConfig) -> Duration {
    let span = (cfg.max_seconds - cfg.min_seconds).max(0.0);
    let secs = cfg.min_seconds + rng.gen::<f64>() * span;
    Duration::from_secs_f64(secs.max(0.0))
}

/// Number of ticks a task is spread over; never zero.
pub fn steps_for(duration: Duration, tick: Duration) -> u64 {
    let tick_ns = tick.as_nanos();
    if tick_ns == 0 {
        return 1;
    }
    ((duration.as_nanos() / tick_ns) as u64).max(1)
}

/// Upper bound on ticks until a task of `duration` reports completion.
pub fn ticks_to_complete(duration: Duration, tick: Duration) -> u64 {
    let tick_ns = tick.as_nanos();
    if tick_ns == 0 {
        return 1;
    }
    let ticks = (duration.as_nanos() + tick_ns - 1) / tick_ns;
    (ticks as u64).max(1)
}
