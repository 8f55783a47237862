//! Media playback engine
//!
//! Keeps track of the input playlists and an optional time-based schedule
//! that selects which playlist is active, producing the stream of media to
//! play. Inputs may be rescanned at any time without disturbing consumers,
//! since every published state is an immutable snapshot.

// Modules
mod clock;
pub mod context;
mod engine;
mod error;
pub mod filter;
pub mod input_context;
pub mod playlist;
pub mod schedule;
pub mod url;

// Exports
pub use self::{
	clock::Clock,
	context::Context,
	engine::{Core, RescanOutcome},
	error::Error,
	filter::Filter,
	input_context::{InputContext, ScanState},
	playlist::{Playlist, PlaylistSpec, Playlists},
	schedule::{Event, Schedule},
};
