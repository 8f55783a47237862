//! Schedule
//!
//! A time-ordered list of events, each switching the active playlist.

// Modules
mod ser;

// Imports
use {
	crate::{Error, Playlists},
	chrono::{DateTime, Local, NaiveDateTime, TimeDelta},
	std::{fs, path::Path, sync::Arc},
};

/// Schedule event
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct Event {
	/// When the event takes effect
	pub when: DateTime<Local>,

	/// Playlist that becomes active
	pub playlist: Arc<str>,
}

impl Event {
	/// Creates a new event
	pub fn new(when: DateTime<Local>, playlist: impl Into<Arc<str>>) -> Self {
		Self {
			when,
			playlist: playlist.into(),
		}
	}
}

/// Schedule
///
/// Events are sorted by `when`, with ties kept in their original order.
/// A schedule is never modified, any "changes" produce a new schedule.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Schedule {
	/// Events
	events: Arc<[Event]>,
}

impl Schedule {
	/// Creates a schedule from events, in any order
	pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
		let mut events = events.into_iter().collect::<Vec<_>>();
		events.sort_by_key(|event| event.when);

		Self { events: events.into() }
	}

	/// Parses a schedule from it's yaml source.
	///
	/// Relative times (`now+<seconds>`) are relative to `now`.
	pub fn from_source(source: &str, now: DateTime<Local>) -> Result<Self, Error> {
		let events = serde_yaml::from_str::<Option<Vec<ser::Event>>>(source).map_err(Error::Parse)?;
		let events = events
			.unwrap_or_default()
			.into_iter()
			.map(|event| {
				let when = self::parse_after(event.after, now)?;
				Ok(Event::new(when, event.playlist))
			})
			.collect::<Result<Vec<_>, Error>>()?;

		Ok(Self::new(events))
	}

	/// Loads a schedule from a file
	pub async fn from_file(path: &Path, now: DateTime<Local>) -> Result<Self, Error> {
		let source = tokio::fs::read_to_string(path).await.map_err(Error::io(path))?;
		Self::from_source(&source, now).map_err(Error::in_file(path))
	}

	/// Loads a schedule from a file, blocking
	pub fn from_file_sync(path: &Path, now: DateTime<Local>) -> Result<Self, Error> {
		let source = fs::read_to_string(path).map_err(Error::io(path))?;
		Self::from_source(&source, now).map_err(Error::in_file(path))
	}

	/// Returns all events
	#[must_use]
	pub fn events(&self) -> &[Event] {
		&self.events
	}

	/// Returns the number of events
	#[must_use]
	pub fn len(&self) -> usize {
		self.events.len()
	}

	/// Returns if there are no events
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Returns the currently active event.
	///
	/// This is the last event with `when <= now`.
	#[must_use]
	pub fn current(&self, now: DateTime<Local>) -> Option<&Event> {
		let expired = self.expired_len(now);
		self.events.get(expired.checked_sub(1)?)
	}

	/// Returns the next event, the first with `when > now`
	#[must_use]
	pub fn next(&self, now: DateTime<Local>) -> Option<&Event> {
		self.events.get(self.expired_len(now))
	}

	/// Returns a schedule without the events that no longer matter.
	///
	/// Keeps the current event (the most recent with `when <= now`) and every
	/// event after it. If no event has expired yet, everything is kept.
	#[must_use]
	pub fn non_expired(&self, now: DateTime<Local>) -> Self {
		let start = self.expired_len(now).saturating_sub(1);
		Self {
			events: self.events[start..].into(),
		}
	}

	/// Checks that every event refers to one of `playlists`
	pub fn validate(&self, playlists: &Playlists) -> Result<(), Error> {
		match self
			.events
			.iter()
			.find(|event| !playlists.contains_key(&*event.playlist))
		{
			Some(event) => Err(Error::MissingSchedulePlaylist {
				playlist: event.playlist.to_string(),
			}),
			None => Ok(()),
		}
	}

	/// Returns the number of events with `when <= now`
	fn expired_len(&self, now: DateTime<Local>) -> usize {
		self.events.partition_point(|event| event.when <= now)
	}
}

/// Parses an event's time
fn parse_after(after: ser::After, now: DateTime<Local>) -> Result<DateTime<Local>, Error> {
	let when = match after {
		ser::After::Timestamp(secs) => DateTime::from_timestamp(secs, 0).map(|when| when.with_timezone(&Local)),
		ser::After::Text(ref text) => match text.strip_prefix("now+") {
			Some(secs) => secs
				.trim()
				.parse::<i64>()
				.ok()
				.and_then(TimeDelta::try_seconds)
				.and_then(|delta| now.checked_add_signed(delta)),
			None => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
				.ok()
				.and_then(|when| when.and_local_timezone(Local).earliest()),
		},
		ser::After::Other(_) => None,
	};

	when.ok_or_else(|| Error::InvalidScheduleFormat {
		after: match after {
			ser::After::Timestamp(secs) => secs.to_string(),
			ser::After::Text(text) => format!("{text:?}"),
			ser::After::Other(value) => format!("{value:?}"),
		},
	})
}
