//! Serialized playlist

/// Playlist document
///
/// Each yaml document in a playlist file is one of these.
#[derive(Debug)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum Document {
	Many(Vec<Playlist>),
	One(Playlist),
}

impl Document {
	/// Returns all playlists in this document
	pub fn into_playlists(self) -> Vec<Playlist> {
		match self {
			Self::Many(playlists) => playlists,
			Self::One(playlist) => vec![playlist],
		}
	}
}

/// Playlist
#[derive(Debug)]
#[derive(serde::Deserialize)]
pub struct Playlist {
	#[serde(default)]
	pub name: Option<String>,

	#[serde(default)]
	pub media: Vec<Media>,
}

/// Playlist media
#[derive(Debug)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum Media {
	/// Just the url
	Url(String),

	/// Url with filters
	Filtered {
		url: String,

		/// Filters, by name, with their arguments
		#[serde(default)]
		filters: serde_yaml::Mapping,
	},
}
