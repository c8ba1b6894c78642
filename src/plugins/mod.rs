pub mod control;
pub mod registry;
pub mod restore;
pub mod simulation;
