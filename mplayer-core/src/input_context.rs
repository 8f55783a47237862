//! Input context
//!
//! Keeps track of all input files (media, playlist and schedule files) and
//! allows rescanning them for changes.
//!
//! All scanned state lives in a [`ScanState`], which is never modified once
//! published. A rescan works on a copy and replaces the published state at
//! the end, so anyone holding on to the previous state keeps seeing a
//! consistent snapshot.

// Imports
use {
	crate::{Clock, Context, Error, Playlist, PlaylistSpec, Playlists, Schedule, playlist::collect_playlists},
	chrono::{DateTime, Local},
	std::{
		collections::{BTreeSet, HashMap},
		fs,
		io,
		mem,
		path::{Path, PathBuf},
		sync::Arc,
	},
};

/// Scan state
#[derive(Clone, Debug)]
pub struct ScanState {
	/// All media files
	media_files: BTreeSet<PathBuf>,

	/// All playlist files
	playlist_files: BTreeSet<PathBuf>,

	/// Schedule file
	schedule_file: Option<PathBuf>,

	/// Playlists
	playlists: Playlists,

	/// Where each playlist came from
	origins: HashMap<String, Origin>,

	/// Schedule
	schedule: Option<Schedule>,

	/// Time of the last scan
	last_scan: DateTime<Local>,
}

/// Playlist origin
#[derive(PartialEq, Eq, Clone, Debug)]
enum Origin {
	/// Loose media files
	Loose,

	/// A spec within a playlist file
	Spec { file: PathBuf, idx: usize },
}

impl ScanState {
	/// Returns all media files
	#[must_use]
	pub fn media_files(&self) -> &BTreeSet<PathBuf> {
		&self.media_files
	}

	/// Returns all playlist files
	#[must_use]
	pub fn playlist_files(&self) -> &BTreeSet<PathBuf> {
		&self.playlist_files
	}

	/// Returns the schedule file
	#[must_use]
	pub fn schedule_file(&self) -> Option<&Path> {
		self.schedule_file.as_deref()
	}

	/// Returns all playlists
	#[must_use]
	pub fn playlists(&self) -> &Playlists {
		&self.playlists
	}

	/// Returns the schedule
	#[must_use]
	pub fn schedule(&self) -> Option<&Schedule> {
		self.schedule.as_ref()
	}

	/// Returns the time of the last scan
	#[must_use]
	pub fn last_scan(&self) -> DateTime<Local> {
		self.last_scan
	}

	/// Checks that the schedule only refers to existing playlists
	fn validate(&self) -> Result<(), Error> {
		match &self.schedule {
			Some(schedule) => schedule.validate(&self.playlists),
			None => Ok(()),
		}
	}
}

/// Input context
#[derive(Debug)]
pub struct InputContext {
	/// Clock
	clock: Clock,

	/// Current state
	state: Arc<ScanState>,
}

impl InputContext {
	/// Creates a new input context by loading all files.
	///
	/// Files ending in `.yaml` or `.yml` are playlist files, anything else
	/// is a media file. Consecutive media files are grouped into a nameless
	/// playlist.
	pub fn new(
		files: impl IntoIterator<Item = PathBuf>,
		schedule_file: Option<PathBuf>,
		clock: Clock,
	) -> Result<Self, Error> {
		let files = files.into_iter().collect::<Vec<_>>();
		for path in files.iter().chain(&schedule_file) {
			if !path.is_absolute() {
				return Err(Error::RelativePath { path: path.clone() });
			}
			_ = fs::metadata(path).map_err(Error::io(path))?;
		}

		let now = clock.now();
		let schedule = schedule_file
			.as_deref()
			.map(|path| Schedule::from_file_sync(path, now))
			.transpose()?;

		let mut media_files = BTreeSet::new();
		let mut playlist_files = BTreeSet::new();
		let mut playlists = vec![];
		let mut origins = HashMap::new();
		let mut loose = Playlist::new("");
		for path in files {
			match self::is_playlist_file(&path) {
				true => {
					if !loose.is_empty() {
						_ = origins.insert(String::new(), Origin::Loose);
						playlists.push(mem::replace(&mut loose, Playlist::new("")));
					}

					for (idx, spec) in PlaylistSpec::from_file_sync(&path)?.into_iter().enumerate() {
						let playlist = spec.resolve_sync().map_err(Error::in_file(&path))?;
						media_files.extend(playlist.entries().iter().cloned());

						// Note: Same as the playlists, the last origin wins
						_ = origins.insert(playlist.name().to_owned(), Origin::Spec {
							file: path.clone(),
							idx,
						});
						playlists.push(playlist);
					}
					_ = playlist_files.insert(path);
				},
				false => {
					_ = media_files.insert(path.clone());
					loose.push(path);
				},
			}
		}
		if !loose.is_empty() {
			_ = origins.insert(String::new(), Origin::Loose);
			playlists.push(loose);
		}

		let state = ScanState {
			media_files,
			playlist_files,
			schedule_file,
			playlists: collect_playlists(playlists),
			origins,
			schedule,
			last_scan: now,
		};
		state.validate()?;
		tracing::debug!(
			media_files = state.media_files.len(),
			playlists = state.playlists.len(),
			"Loaded inputs"
		);

		Ok(Self {
			clock,
			state: Arc::new(state),
		})
	}

	/// Returns the current state
	#[must_use]
	pub fn state(&self) -> &Arc<ScanState> {
		&self.state
	}

	/// Creates a context from the current state.
	///
	/// Must be called within a tokio runtime.
	#[must_use]
	pub fn context(&self) -> Context {
		let now = self.clock.now();
		let schedule = self.state.schedule.as_ref().map(|schedule| schedule.non_expired(now));
		Context::new(self.state.playlists.clone(), schedule, &self.clock)
	}

	/// Rescans all inputs.
	///
	/// Returns whether anything changed. On error, the current state is kept.
	pub async fn rescan(&mut self) -> Result<bool, Error> {
		let now = self.clock.now();
		let mut state = ScanState::clone(&self.state);
		let mut changed = false;

		// Reload the schedule, if it changed
		if let Some(schedule_file) = &state.schedule_file {
			match self::reload_schedule(schedule_file, state.last_scan, now).await {
				Ok(Some(schedule)) => {
					tracing::info!(?schedule_file, "Schedule updated");
					state.schedule = Some(schedule);
					changed = true;
				},
				Ok(None) => (),
				Err(err) if err.is_not_found() => tracing::error!(
					?schedule_file,
					"Schedule file not found, continuing with the current schedule"
				),
				Err(err) => return Err(err),
			}
		}

		// Check for changed playlist files
		for path in &state.playlist_files {
			match self::modified_time(path).await {
				Ok(modified) if modified > state.last_scan =>
					tracing::warn!(?path, "Playlist file changed, reloading playlists isn't implemented yet"),
				Ok(_) => (),
				Err(err) if err.is_not_found() => tracing::warn!(?path, "Playlist file not found"),
				Err(err) => return Err(err),
			}
			tokio::task::yield_now().await;
		}

		// Then discard any removed media files
		let removed = self::removed_files(&state.media_files).await?;
		if !removed.is_empty() {
			tracing::info!(?removed, "Media files removed");
			for path in &removed {
				_ = state.media_files.remove(path);
				for playlist in state.playlists.values_mut() {
					_ = playlist.remove(path);
				}
			}
			changed = true;
		}

		// And add any new media files from playlists
		for path in &state.playlist_files {
			let specs = match PlaylistSpec::from_file(path).await {
				Ok(specs) => specs,
				Err(err) if err.is_not_found() => continue,
				Err(err) => return Err(err),
			};

			for (idx, spec) in specs.into_iter().enumerate() {
				let resolved = spec.resolve().await.map_err(Error::in_file(path))?;

				let mut entries = vec![];
				for entry in resolved.entries() {
					if self::is_file(entry).await? {
						entries.push(entry.clone());
					}
				}

				let mut added = vec![];
				for entry in &entries {
					if state.media_files.insert(entry.clone()) {
						added.push(entry.clone());
					}
				}
				if !added.is_empty() {
					tracing::info!(playlist = %spec.name(), ?added, "New media files found");
					changed = true;
				}

				// Note: Specs shadowed by another playlist of the same name only
				//       contribute to the tracked media files.
				let origin = Origin::Spec { file: path.clone(), idx };
				if state.origins.get(spec.name()) != Some(&origin) {
					continue;
				}
				let Some(playlist) = state.playlists.get_mut(spec.name()) else {
					continue;
				};

				let entries = Playlist::with_entries(spec.name(), entries);
				if *playlist != entries {
					tracing::info!(playlist = %spec.name(), "Playlist updated");
					*playlist = entries;
					changed = true;
				}
			}
		}

		state.last_scan = now;
		state.validate()?;
		self.state = Arc::new(state);

		Ok(changed)
	}
}

/// Returns whether `path` is a playlist file
fn is_playlist_file(path: &Path) -> bool {
	path.extension()
		.is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Returns the modification time of `path`
async fn modified_time(path: &Path) -> Result<DateTime<Local>, Error> {
	let metadata = tokio::fs::metadata(path).await.map_err(Error::io(path))?;
	let modified = metadata.modified().map_err(Error::io(path))?;

	Ok(DateTime::from(modified))
}

/// Reloads the schedule at `path`, if it was modified after `last_scan`
async fn reload_schedule(
	path: &Path,
	last_scan: DateTime<Local>,
	now: DateTime<Local>,
) -> Result<Option<Schedule>, Error> {
	if self::modified_time(path).await? <= last_scan {
		return Ok(None);
	}

	Schedule::from_file(path, now).await.map(Some)
}

/// Returns whether `path` is an existing file
async fn is_file(path: &Path) -> Result<bool, Error> {
	match tokio::fs::metadata(path).await {
		Ok(metadata) => Ok(metadata.is_file()),
		Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
		Err(err) => Err(Error::Io {
			path:   path.to_path_buf(),
			source: err,
		}),
	}
}

/// Returns all files in `paths` that no longer exist
async fn removed_files(paths: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>, Error> {
	let mut removed = vec![];
	for path in paths {
		if !self::is_file(path).await? {
			removed.push(path.clone());
		}
	}

	Ok(removed)
}
