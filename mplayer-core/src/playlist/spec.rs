//! Playlist specification

// Imports
use {
	super::{Playlist, ser},
	crate::{Error, Filter, url},
	serde::Deserialize,
	std::{
		fs,
		path::{Path, PathBuf},
	},
};

/// Playlist specification entry
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SpecEntry {
	/// Url
	pub url: String,

	/// Filters, applied in order
	pub filters: Vec<Filter>,
}

/// Playlist specification
///
/// Like a [`Playlist`], but with urls that still need to be resolved.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PlaylistSpec {
	/// Name
	name: String,

	/// Root for relative urls
	root: Option<PathBuf>,

	/// Entries
	entries: Vec<SpecEntry>,
}

impl PlaylistSpec {
	/// Creates a new playlist spec
	#[must_use]
	pub fn new(name: impl Into<String>, root: Option<PathBuf>, entries: Vec<SpecEntry>) -> Self {
		Self {
			name: name.into(),
			root,
			entries,
		}
	}

	/// Parses all playlist specs in a yaml source.
	///
	/// The source may contain multiple documents, each with either a single
	/// playlist or a list of them.
	pub fn from_source(source: &str, root: Option<&Path>) -> Result<Vec<Self>, Error> {
		let mut specs = vec![];
		for document in serde_yaml::Deserializer::from_str(source) {
			let Some(document) = Option::<ser::Document>::deserialize(document).map_err(Error::Parse)? else {
				continue;
			};

			for playlist in document.into_playlists() {
				let entries = playlist
					.media
					.into_iter()
					.map(self::parse_entry)
					.collect::<Result<Vec<_>, Error>>()?;

				specs.push(Self {
					name: playlist.name.unwrap_or_default(),
					root: root.map(Path::to_path_buf),
					entries,
				});
			}
		}

		Ok(specs)
	}

	/// Loads all playlist specs in a file.
	///
	/// Relative urls are resolved against the file's directory.
	pub async fn from_file(path: &Path) -> Result<Vec<Self>, Error> {
		let source = tokio::fs::read_to_string(path).await.map_err(Error::io(path))?;
		Self::from_source(&source, path.parent()).map_err(Error::in_file(path))
	}

	/// Loads all playlist specs in a file, blocking
	pub fn from_file_sync(path: &Path) -> Result<Vec<Self>, Error> {
		let source = fs::read_to_string(path).map_err(Error::io(path))?;
		Self::from_source(&source, path.parent()).map_err(Error::in_file(path))
	}

	/// Returns this spec's name
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the root for relative urls
	#[must_use]
	pub fn root(&self) -> Option<&Path> {
		self.root.as_deref()
	}

	/// Returns all entries
	#[must_use]
	pub fn entries(&self) -> &[SpecEntry] {
		&self.entries
	}

	/// Resolves this spec into a playlist.
	///
	/// Filesystem accesses run on the blocking thread pool, and we yield
	/// after expanding each url and after each filter.
	pub async fn resolve(&self) -> Result<Playlist, Error> {
		let mut playlist = Playlist::new(self.name.clone());
		for entry in &self.entries {
			let url = entry.url.clone();
			let root = self.root.clone();
			let mut paths = tokio::task::spawn_blocking(move || url::resolve(&url, root.as_deref()))
				.await
				.map_err(Error::Join)??;
			tokio::task::yield_now().await;

			for filter in &entry.filters {
				let filter = filter.clone();
				paths = tokio::task::spawn_blocking(move || filter.apply(paths))
					.await
					.map_err(Error::Join)??;
				tokio::task::yield_now().await;
			}

			playlist.extend(paths);
		}

		Ok(playlist)
	}

	/// Resolves this spec into a playlist, blocking
	pub fn resolve_sync(&self) -> Result<Playlist, Error> {
		let mut playlist = Playlist::new(self.name.clone());
		for entry in &self.entries {
			let mut paths = url::resolve(&entry.url, self.root())?;
			for filter in &entry.filters {
				paths = filter.apply(paths)?;
			}
			playlist.extend(paths);
		}

		Ok(playlist)
	}
}

/// Parses a playlist entry
fn parse_entry(media: ser::Media) -> Result<SpecEntry, Error> {
	let (url, filters) = match media {
		ser::Media::Url(url) => (url, serde_yaml::Mapping::new()),
		ser::Media::Filtered { url, filters } => (url, filters),
	};

	let filters = filters
		.into_iter()
		.map(|(name, args)| match name {
			serde_yaml::Value::String(name) => Filter::from_name(&name, args),
			name => Err(Error::UnknownFilter {
				name: format!("{name:?}"),
			}),
		})
		.collect::<Result<Vec<_>, Error>>()?;

	Ok(SpecEntry { url, filters })
}

#[cfg(test)]
mod test {
	use {super::*, std::fmt::Write};

	#[test]
	fn filters() {
		let mut source = "name: test\nmedia:\n".to_owned();
		for idx in 0..100 {
			writeln!(source, "  - \"{idx}\"").expect("Unable to write source");
		}
		source.push_str("  - url: \"100\"\n    filters:\n      newest: 20\n");

		let specs = PlaylistSpec::from_source(&source, None).expect("Unable to parse spec");
		let [spec] = &*specs else {
			panic!("Expected a single spec, found {specs:?}");
		};
		assert_eq!(spec.name(), "test");
		assert_eq!(spec.entries().len(), 101);
		assert_eq!(spec.entries()[0].url, "0");
		assert!(spec.entries()[0].filters.is_empty(), "Expected no filters on plain urls");
		assert_eq!(spec.entries()[100].filters, [Filter::Newest { count: 20 }]);
	}

	#[test]
	fn documents() {
		let source = "\
media: [a.mp4]
---
- name: b
  media: [b.mp4]
- name: c
---
";
		let specs = PlaylistSpec::from_source(source, Some(Path::new("/root"))).expect("Unable to parse spec");
		let names = specs.iter().map(PlaylistSpec::name).collect::<Vec<_>>();
		assert_eq!(names, ["", "b", "c"]);
		assert!(specs[2].entries().is_empty(), "Expected no entries");
		assert!(
			specs.iter().all(|spec| spec.root() == Some(Path::new("/root"))),
			"Expected root to be set on all specs"
		);
	}

	#[test]
	fn unknown_filter() {
		let source = "media:\n  - url: a.mp4\n    filters: { oldest: 1 }\n";
		assert!(matches!(
			PlaylistSpec::from_source(source, None),
			Err(Error::UnknownFilter { .. })
		));
	}

	#[test]
	fn relative_without_root() {
		let spec = PlaylistSpec::new("a", None, vec![SpecEntry {
			url:     "a.mp4".to_owned(),
			filters: vec![],
		}]);
		assert!(matches!(spec.resolve_sync(), Err(Error::InvalidUrl { .. })));
	}

	#[tokio::test]
	async fn resolve() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		for name in ["a.mp4", "b.mp4", "c.png"] {
			fs::write(dir.path().join(name), "").expect("Unable to create file");
		}
		let playlist_path = dir.path().join("playlist.yaml");
		fs::write(
			&playlist_path,
			"name: test\nmedia:\n  - c.png\n  - url: glob://*.mp4\n    filters: { newest: 1 }\n  - file://missing.mp4\n",
		)
		.expect("Unable to write playlist");

		let specs = PlaylistSpec::from_file(&playlist_path).await.expect("Unable to load spec");
		let [spec] = &*specs else {
			panic!("Expected a single spec, found {specs:?}");
		};

		let playlist = spec.resolve().await.expect("Unable to resolve");
		assert_eq!(playlist, spec.resolve_sync().expect("Unable to resolve"));
		assert_eq!(playlist.name(), "test");
		assert_eq!(playlist.len(), 3);
		assert_eq!(playlist.entries()[0], dir.path().join("c.png"));
		assert_eq!(playlist.entries()[2], dir.path().join("missing.mp4"));
	}

	#[tokio::test]
	async fn resolve_filter_missing() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let spec = PlaylistSpec::new("a", Some(dir.path().to_path_buf()), vec![SpecEntry {
			url:     "missing.mp4".to_owned(),
			filters: vec![Filter::Newest { count: 1 }],
		}]);

		let missing = dir.path().join("missing.mp4");
		assert!(matches!(
			spec.resolve().await,
			Err(Error::Io { ref path, .. }) if *path == missing
		));
		assert!(matches!(
			spec.resolve_sync(),
			Err(Error::Io { ref path, .. }) if *path == missing
		));
	}
}
