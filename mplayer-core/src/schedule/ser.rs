//! Serialized schedule

/// Schedule event
#[derive(Debug)]
#[derive(serde::Deserialize)]
pub struct Event {
	/// When the event takes effect
	pub after: After,

	/// Playlist name
	pub playlist: String,
}

/// Event time
#[derive(Debug)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum After {
	/// Epoch timestamp, in seconds
	Timestamp(i64),

	/// `YYYY-MM-DD HH:MM` or `now+<seconds>`
	Text(String),

	/// Anything else, which we reject with a proper error
	Other(serde_yaml::Value),
}
