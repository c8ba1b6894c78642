pub mod bars;
pub mod surface;

pub use bars::SlotBars;
pub use surface::TerminalSurface;

pub fn fmt_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.2}GiB", f / GB)
    } else if f >= MB {
        format!("{:.2}MiB", f / MB)
    } else if f >= KB {
        format!("{:.2}KiB", f / KB)
    } else {
        format!("{}B", n)
    }
}
