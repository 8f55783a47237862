//! Errors

// Imports
use std::{
	io,
	path::{Path, PathBuf},
};

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Malformed url, or a relative url without a root
	#[error("Invalid url {url:?}: {reason}")]
	InvalidUrl { url: String, reason: &'static str },

	/// Invalid glob pattern
	#[error("Invalid glob pattern {pattern:?}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source:  glob::PatternError,
	},

	/// Unknown filter
	#[error("Unknown filter {name:?}")]
	UnknownFilter { name: String },

	/// Invalid filter arguments
	#[error("Invalid arguments for filter {name:?}")]
	InvalidFilterArgs {
		name:   String,
		#[source]
		source: serde_yaml::Error,
	},

	/// Invalid schedule time
	#[error("Invalid schedule time {after}, expected an epoch timestamp, `YYYY-MM-DD HH:MM` or `now+<seconds>`")]
	InvalidScheduleFormat { after: String },

	/// Schedule refers to a playlist that doesn't exist
	#[error("Schedule refers to unknown playlist {playlist:?}")]
	MissingSchedulePlaylist { playlist: String },

	/// Input path wasn't absolute
	#[error("Input path {path:?} must be absolute")]
	RelativePath { path: PathBuf },

	/// Unable to parse yaml source
	#[error("Unable to parse source")]
	Parse(#[source] serde_yaml::Error),

	/// Error within a source file
	#[error("Error in {path:?}")]
	Source {
		path:   PathBuf,
		#[source]
		source: Box<Self>,
	},

	/// Unable to join a blocking task
	#[error("Unable to join blocking task")]
	Join(#[source] tokio::task::JoinError),

	/// Io error
	#[error("Io error on {path:?}")]
	Io {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},
}

impl Error {
	/// Returns a function to wrap an io error on `path`
	pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
		move |source| Self::Io {
			path: path.to_path_buf(),
			source,
		}
	}

	/// Returns a function to attach the source file `path` to an error
	pub(crate) fn in_file(path: &Path) -> impl FnOnce(Self) -> Self + '_ {
		move |source| match source {
			// Note: Io errors already carry their path
			source @ Self::Io { .. } => source,
			source => Self::Source {
				path:   path.to_path_buf(),
				source: Box::new(source),
			},
		}
	}

	/// Returns whether this error was caused by a missing file
	#[must_use]
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
			Self::Source { source, .. } => source.is_not_found(),
			_ => false,
		}
	}
}
