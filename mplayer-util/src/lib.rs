//! Utility

// Modules
mod duration_display;
mod task;

// Exports
pub use self::{
	duration_display::{DurationDisplay, DurationParseError},
	task::spawn_task,
};
