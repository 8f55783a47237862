//! Clock

// Imports
use {
	chrono::{DateTime, Local, TimeDelta},
	std::{fmt, sync::Arc},
};

/// Wall clock
///
/// Source of "now" for schedule parsing, the scheduler and rescans.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<Local> + Send + Sync>);

impl Clock {
	/// Creates a clock from a function returning the current time
	pub fn new(now: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
		Self(Arc::new(now))
	}

	/// The system clock
	#[must_use]
	pub fn system() -> Self {
		Self::new(Local::now)
	}

	/// A clock stopped at `time`
	#[must_use]
	pub fn fixed(time: DateTime<Local>) -> Self {
		Self::new(move || time)
	}

	/// A clock starting at `start` that advances with tokio's clock.
	///
	/// Follows tokio's time when it's paused, so schedules may be
	/// driven without waiting on the wall clock.
	#[must_use]
	pub fn tokio(start: DateTime<Local>) -> Self {
		let origin = tokio::time::Instant::now();
		Self::new(move || {
			let elapsed = TimeDelta::from_std(origin.elapsed()).unwrap_or(TimeDelta::MAX);
			start.checked_add_signed(elapsed).unwrap_or(start)
		})
	}

	/// Returns the current time
	#[must_use]
	pub fn now(&self) -> DateTime<Local> {
		(self.0)()
	}
}

impl Default for Clock {
	fn default() -> Self {
		Self::system()
	}
}

impl fmt::Debug for Clock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Clock").field(&self.now()).finish()
	}
}
