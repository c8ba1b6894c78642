pub mod core;
pub mod i18n;
pub mod indicator;
pub mod plugins;
pub mod session;
pub mod ui;
