//! Context
//!
//! A snapshot of the playlists and schedule. While the snapshot itself is
//! immutable, the active playlist is kept up to date with the schedule by
//! a background task owned by the context.

// Imports
use {
	crate::{Clock, Error, Playlist, Playlists, Schedule},
	std::sync::Arc,
	tokio::{sync::watch, task::AbortHandle},
};

/// Active playlist name
pub type ActivePlaylist = Option<Arc<str>>;

/// Context
#[derive(Debug)]
pub struct Context {
	/// Playlists
	playlists: Playlists,

	/// Schedule
	schedule: Option<Schedule>,

	/// Active playlist
	// Note: Only the scheduler task writes to this.
	active: Arc<watch::Sender<ActivePlaylist>>,

	/// Scheduler task
	scheduler: Option<AbortHandle>,
}

impl Context {
	/// Creates a new context.
	///
	/// If there's a schedule, the active playlist is set from it and a
	/// task is spawned to keep it up to date, so this must be called
	/// within a tokio runtime.
	pub fn new(playlists: Playlists, schedule: Option<Schedule>, clock: &Clock) -> Self {
		let now = clock.now();
		let active = schedule
			.as_ref()
			.and_then(|schedule| schedule.current(now))
			.map(|event| Arc::clone(&event.playlist));
		let (active, _) = watch::channel(active);
		let active = Arc::new(active);

		let scheduler = schedule.as_ref().map(|schedule| {
			let task = tokio::spawn(self::run_scheduler(
				schedule.clone(),
				Arc::clone(&active),
				clock.clone(),
			));
			task.abort_handle()
		});

		Self {
			playlists,
			schedule,
			active,
			scheduler,
		}
	}

	/// Creates an empty context, with no playlists or schedule
	#[must_use]
	pub fn empty() -> Self {
		let (active, _) = watch::channel(None);
		Self {
			playlists: Playlists::new(),
			schedule:  None,
			active:    Arc::new(active),
			scheduler: None,
		}
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

	/// Returns the active playlist's name
	#[must_use]
	pub fn active(&self) -> ActivePlaylist {
		self.active.borrow().clone()
	}

	/// Subscribes to changes of the active playlist
	#[must_use]
	pub fn subscribe_active(&self) -> watch::Receiver<ActivePlaylist> {
		self.active.subscribe()
	}

	/// Returns the currently active playlists.
	///
	/// If a playlist is active, returns just that one, else returns all
	/// playlists, in insertion order.
	#[must_use]
	pub fn active_playlists(&self) -> Vec<&Playlist> {
		match self.active() {
			Some(active) => self.playlists.get(&*active).into_iter().collect(),
			None => self.playlists.values().collect(),
		}
	}

	/// Returns whether the schedule only refers to existing playlists
	#[must_use]
	pub fn valid(&self) -> bool {
		self.validate().is_ok()
	}

	/// Checks that the schedule only refers to existing playlists
	pub fn validate(&self) -> Result<(), Error> {
		match &self.schedule {
			Some(schedule) => schedule.validate(&self.playlists),
			None => Ok(()),
		}
	}

	/// Stops the scheduler task.
	///
	/// The active playlist won't change after this.
	pub fn stop(&self) {
		if let Some(scheduler) = &self.scheduler {
			scheduler.abort();
		}
	}
}

impl Drop for Context {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Keeps the active playlist up to date with the schedule
async fn run_scheduler(schedule: Schedule, active: Arc<watch::Sender<ActivePlaylist>>, clock: Clock) {
	let mut now = clock.now();
	while let Some(next) = schedule.next(now) {
		// Note: If we're already past the event, this doesn't sleep
		let delay = (next.when - clock.now()).to_std().unwrap_or_default();
		tokio::time::sleep(delay).await;

		// Note: We use the last event at or before `next` in case others
		//       share it's time, or we overslept past them.
		now = clock.now().max(next.when);
		if let Some(current) = schedule.current(now) {
			tracing::info!(playlist = %current.playlist, "Switching active playlist");
			_ = active.send_replace(Some(Arc::clone(&current.playlist)));
		}
	}

	tracing::debug!("Schedule exhausted, active playlist is settled");
}
