pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod model;
pub mod planner;
pub mod preview;
pub mod projector;
pub mod scheduler;
pub mod slots;
pub mod store;
