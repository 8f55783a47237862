//! Engine core
//!
//! Publishes the current [`Context`] and produces the media stream from it.

// Imports
use {
	crate::{Clock, Context, Error, InputContext, ScanState},
	futures::{Stream, stream},
	std::{path::PathBuf, sync::Arc, vec},
	tokio::sync::{Mutex, OwnedMutexGuard, watch},
};

/// Rescan outcome
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum RescanOutcome {
	/// Inputs changed
	Changed,

	/// Inputs didn't change
	Unchanged,

	/// Another rescan was already in progress, so this one was skipped
	Coalesced,
}

/// Core
#[derive(Debug)]
pub struct Core {
	/// Inputs
	// Note: Only locked while rescanning, so a failed `try_lock`
	//       means a rescan is in progress.
	input: Arc<Mutex<InputContext>>,

	/// Current context
	context: watch::Sender<Arc<Context>>,
}

impl Core {
	/// Creates the core by loading all inputs.
	///
	/// Must be called within a tokio runtime.
	pub fn new(
		files: impl IntoIterator<Item = PathBuf>,
		schedule_file: Option<PathBuf>,
		clock: Clock,
	) -> Result<Self, Error> {
		let input = InputContext::new(files, schedule_file, clock)?;
		let (context, _) = watch::channel(Arc::new(input.context()));

		Ok(Self {
			input: Arc::new(Mutex::new(input)),
			context,
		})
	}

	/// Returns the current context
	#[must_use]
	pub fn context(&self) -> Arc<Context> {
		Arc::clone(&self.context.borrow())
	}

	/// Subscribes to context changes.
	///
	/// A new context is published after every successful rescan.
	#[must_use]
	pub fn subscribe(&self) -> watch::Receiver<Arc<Context>> {
		self.context.subscribe()
	}

	/// Returns the current scan state.
	///
	/// Waits for any rescan in progress.
	pub async fn scan_state(&self) -> Arc<ScanState> {
		Arc::clone(self.input.lock().await.state())
	}

	/// Rescans all inputs and publishes a new context.
	///
	/// If a rescan is already in progress, returns [`RescanOutcome::Coalesced`]
	/// without doing anything.
	pub async fn rescan(&self) -> Result<RescanOutcome, Error> {
		let Ok(input) = Arc::clone(&self.input).try_lock_owned() else {
			tracing::debug!("Rescan already in progress, ignoring");
			return Ok(RescanOutcome::Coalesced);
		};

		self.rescan_locked(input).await
	}

	/// Requests a rescan in the background.
	///
	/// Returns whether the rescan was started. If a rescan is already in
	/// progress, this does nothing.
	pub fn request_rescan(self: &Arc<Self>) -> bool {
		let Ok(input) = Arc::clone(&self.input).try_lock_owned() else {
			tracing::debug!("Rescan already in progress, ignoring request");
			return false;
		};

		let core = Arc::clone(self);
		_ = mplayer_util::spawn_task("Rescan", async move { core.rescan_locked(input).await });

		true
	}

	/// Rescans with the inputs already locked
	async fn rescan_locked(&self, mut input: OwnedMutexGuard<InputContext>) -> Result<RescanOutcome, Error> {
		tracing::debug!("Rescanning inputs");
		let changed = input.rescan().await?;

		// Note: We always publish a new context, even if nothing changed,
		//       so anyone waiting for media re-checks it.
		let prev_context = self.context.send_replace(Arc::new(input.context()));
		prev_context.stop();

		tracing::info!(?changed, "Rescanned inputs");
		Ok(match changed {
			true => RescanOutcome::Changed,
			false => RescanOutcome::Unchanged,
		})
	}

	/// Returns a stream of all media in the active playlists.
	///
	/// Ends once all media has been yielded. If there is no media, ends
	/// immediately, unless `wait` is set, in which case waits until either a
	/// rescan or the schedule provides some.
	pub fn medias(&self, wait: bool) -> impl Stream<Item = PathBuf> + Send + 'static {
		let contexts = self.context.subscribe();
		stream::unfold(
			(contexts, MediasState::Evaluate),
			move |(mut contexts, mut state)| async move {
				loop {
					match state {
						MediasState::Evaluate => {
							let context = Arc::clone(&contexts.borrow_and_update());

							// Note: We subscribe before checking the active playlists so
							//       we don't miss any change in between.
							let mut active = context.subscribe_active();
							_ = active.borrow_and_update();

							let paths = context
								.active_playlists()
								.into_iter()
								.flat_map(|playlist| playlist.entries().iter().cloned())
								.collect::<Vec<_>>();
							if !paths.is_empty() {
								state = MediasState::Yield(paths.into_iter());
								continue;
							}

							if !wait {
								return None;
							}

							tracing::debug!("No media available, waiting");
							tokio::select! {
								res = contexts.changed() => if res.is_err() {
									return None;
								},
								Ok(()) = active.changed() => (),
							}
						},
						MediasState::Yield(ref mut paths) => {
							let path = paths.next()?;
							tokio::task::yield_now().await;
							return Some((path, (contexts, state)));
						},
					}
				}
			},
		)
	}
}

impl Drop for Core {
	fn drop(&mut self) {
		self.context.borrow().stop();
	}
}

/// Media stream state
enum MediasState {
	/// Evaluate the active playlists
	Evaluate,

	/// Yield paths
	Yield(vec::IntoIter<PathBuf>),
}

#[cfg(test)]
mod test {
	use {
		super::*,
		crate::Schedule,
		chrono::Local,
		futures::StreamExt,
		std::{fs, path::Path, time::Duration},
	};

	fn write_file(path: &Path, contents: &str) {
		fs::write(path, contents).expect("Unable to write file");
	}

	#[tokio::test]
	async fn empty_no_wait() {
		let core = Core::new(Vec::<PathBuf>::new(), None, Clock::system()).expect("Unable to create core");
		let paths = core.medias(false).collect::<Vec<_>>().await;
		assert!(paths.is_empty(), "Expected no media, found {paths:?}");
	}

	#[tokio::test]
	async fn medias_in_order() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let [a, b, c] = ["a.mp4", "b.mp4", "c.mp4"].map(|name| dir.path().join(name));
		for path in [&a, &b, &c] {
			self::write_file(path, "");
		}

		let core = Core::new([a.clone(), b.clone(), c.clone()], None, Clock::system()).expect("Unable to create core");
		let paths = core.medias(false).collect::<Vec<_>>().await;
		assert_eq!(paths, [a, b, c]);
	}

	#[tokio::test]
	async fn wait_for_rescan() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let playlist = dir.path().join("playlist.yaml");
		self::write_file(&playlist, "name: p\nmedia: [\"glob://*.mp4\"]\n");

		let core = Core::new([playlist], None, Clock::system()).expect("Unable to create core");
		let medias = tokio::spawn(core.medias(true).collect::<Vec<_>>());

		let media = dir.path().join("a.mp4");
		self::write_file(&media, "");
		assert_eq!(
			core.rescan().await.expect("Unable to rescan"),
			RescanOutcome::Changed
		);

		let paths = medias.await.expect("Media stream panicked");
		assert_eq!(paths, [media]);
	}

	#[tokio::test(start_paused = true)]
	async fn wait_for_schedule() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let media = dir.path().join("x.mp4");
		self::write_file(&media, "");

		let playlist = dir.path().join("playlist.yaml");
		self::write_file(&playlist, "name: a\n---\nname: b\nmedia: [x.mp4]\n");
		let schedule = dir.path().join("schedule.yml");
		self::write_file(
			&schedule,
			"- after: now+0\n  playlist: a\n- after: now+5\n  playlist: b\n",
		);

		let clock = Clock::tokio(Local::now());
		let core = Core::new([playlist], Some(schedule), clock).expect("Unable to create core");
		assert!(
			core.medias(false).collect::<Vec<_>>().await.is_empty(),
			"Playlist `a` should be empty"
		);

		let paths = core.medias(true).collect::<Vec<_>>().await;
		assert_eq!(paths, [media]);
	}

	#[tokio::test(start_paused = true)]
	async fn rescan_after_event() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let playlist = dir.path().join("playlist.yaml");
		self::write_file(&playlist, "name: a\n---\nname: b\n");
		let schedule = dir.path().join("schedule.yml");
		self::write_file(
			&schedule,
			"- after: now+0\n  playlist: a\n- after: now+5\n  playlist: b\n",
		);

		let clock = Clock::tokio(Local::now());
		let core = Core::new([playlist], Some(schedule), clock).expect("Unable to create core");
		assert_eq!(core.context().active().as_deref(), Some("a"));

		// Note: The new context must start with `b`, not wait for it's time again
		tokio::time::advance(Duration::from_secs(10)).await;
		_ = core.rescan().await.expect("Unable to rescan");
		let context = core.context();
		assert_eq!(context.active().as_deref(), Some("b"));
		assert_eq!(context.schedule().map(Schedule::len), Some(1));
	}

	#[tokio::test]
	async fn rescan_coalesces() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let media = dir.path().join("a.mp4");
		self::write_file(&media, "");

		let core = Core::new([media], None, Clock::system()).expect("Unable to create core");
		let (lhs, rhs) = tokio::join!(core.rescan(), core.rescan());
		let outcomes = [lhs.expect("Unable to rescan"), rhs.expect("Unable to rescan")];
		assert!(
			outcomes.contains(&RescanOutcome::Coalesced),
			"Expected a coalesced rescan, found {outcomes:?}"
		);
		assert!(
			outcomes.contains(&RescanOutcome::Unchanged),
			"Expected a full rescan, found {outcomes:?}"
		);
	}

	#[tokio::test]
	async fn request_rescan() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let media = dir.path().join("a.mp4");
		self::write_file(&media, "");

		let core = Arc::new(Core::new([media.clone()], None, Clock::system()).expect("Unable to create core"));
		let mut contexts = core.subscribe();
		let prev_context = core.context();

		assert!(core.request_rescan(), "Rescan should have started");
		assert!(!core.request_rescan(), "Rescan should have been coalesced");

		contexts.changed().await.expect("Core was dropped");
		assert!(!Arc::ptr_eq(&prev_context, &core.context()), "Context wasn't replaced");
		assert!(core.scan_state().await.media_files().contains(&media), "Media file was lost");
	}
}
