pub mod color;
pub mod path;
pub mod surface;
pub mod whip;

pub use color::Rgb;
pub use surface::{IndicatorSurface, RecordingSurface};
pub use whip::{Direction, IndicatorConfig, Mode, WhipIndicator};
