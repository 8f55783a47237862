//! Player

// Modules
mod command;

// Exports
pub use self::command::CommandPlayer;

// Imports
use std::{future::Future, path::Path, time::Duration};

/// Player
pub trait Player: Send + Sync {
	/// Plays a single media file.
	///
	/// Returns once playback finishes. Dropping the future stops playback.
	fn play(&self, path: &Path) -> impl Future<Output = Result<(), anyhow::Error>> + Send;

	/// Sets whether to play in fullscreen
	fn set_fullscreen(&mut self, fullscreen: bool);

	/// Sets how long images are displayed for.
	///
	/// If `None`, uses the player's default.
	fn set_image_duration(&mut self, duration: Option<Duration>);
}
