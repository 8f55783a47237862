//! Playlists
//!
//! A [`Playlist`] is a resolved, named list of media paths. It's usually
//! produced by resolving a [`PlaylistSpec`], loaded from a playlist file.

// Modules
mod ser;
mod spec;

// Exports
pub use self::spec::{PlaylistSpec, SpecEntry};

// Imports
use {
	indexmap::IndexMap,
	std::path::{Path, PathBuf},
};

/// Playlists, by name.
///
/// Iteration order is the order in which playlists were inserted.
pub type Playlists = IndexMap<String, Playlist>;

/// Playlist
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Playlist {
	/// Name
	///
	/// Loose media files are collected into nameless (`""`) playlists.
	name: String,

	/// Entries
	entries: Vec<PathBuf>,
}

impl Playlist {
	/// Creates a new, empty, playlist
	#[must_use]
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name:    name.into(),
			entries: vec![],
		}
	}

	/// Creates a new playlist from entries
	#[must_use]
	pub fn with_entries(name: impl Into<String>, entries: impl IntoIterator<Item = PathBuf>) -> Self {
		Self {
			name:    name.into(),
			entries: entries.into_iter().collect(),
		}
	}

	/// Returns this playlist's name
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns all entries
	#[must_use]
	pub fn entries(&self) -> &[PathBuf] {
		&self.entries
	}

	/// Returns the number of entries
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns if this playlist has no entries
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns if this playlist contains `path`
	#[must_use]
	pub fn contains(&self, path: &Path) -> bool {
		self.entries.iter().any(|entry| entry == path)
	}

	/// Adds an entry
	pub fn push(&mut self, path: PathBuf) {
		self.entries.push(path);
	}

	/// Removes all entries for `path`.
	///
	/// Returns whether any entry was removed.
	pub fn remove(&mut self, path: &Path) -> bool {
		let prev_len = self.entries.len();
		self.entries.retain(|entry| entry != path);
		self.entries.len() != prev_len
	}
}

impl Extend<PathBuf> for Playlist {
	fn extend<T: IntoIterator<Item = PathBuf>>(&mut self, iter: T) {
		self.entries.extend(iter);
	}
}

/// Collects playlists by name.
///
/// If two playlists share a name, the last one wins.
pub fn collect_playlists(playlists: impl IntoIterator<Item = Playlist>) -> Playlists {
	let mut collected = Playlists::new();
	for playlist in playlists {
		let name = playlist.name.clone();
		if let Some(prev) = collected.insert(name, playlist) {
			tracing::warn!(name = %prev.name, "Multiple playlists with the same name, using the last one");
		}
	}

	collected
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn remove() {
		let mut playlist = Playlist::with_entries("a", ["/a", "/b", "/a"].map(PathBuf::from));
		assert!(playlist.remove(Path::new("/a")));
		assert_eq!(playlist.entries(), [PathBuf::from("/b")]);
		assert!(!playlist.remove(Path::new("/a")));
	}

	#[test]
	fn collect_last_wins() {
		let playlists = collect_playlists([
			Playlist::with_entries("a", [PathBuf::from("/1")]),
			Playlist::with_entries("b", [PathBuf::from("/2")]),
			Playlist::with_entries("a", [PathBuf::from("/3")]),
		]);

		assert_eq!(playlists.len(), 2);
		assert_eq!(playlists["a"].entries(), [PathBuf::from("/3")]);
		assert_eq!(playlists.keys().collect::<Vec<_>>(), ["a", "b"]);
	}
}
