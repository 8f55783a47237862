//! Configuration

// Imports
use {
	anyhow::Context,
	mplayer_util::DurationDisplay,
	std::{
		fs,
		num::NonZeroUsize,
		path::{Path, PathBuf},
	},
};

/// Configuration
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
	/// Tokio worker threads
	#[serde(default)]
	pub tokio_worker_threads: Option<NonZeroUsize>,

	/// Log file
	#[serde(default)]
	pub log_file: Option<PathBuf>,

	/// Control socket
	#[serde(default)]
	pub socket: Option<PathBuf>,

	/// Whether to play in fullscreen
	#[serde(default)]
	pub fullscreen: bool,

	/// Image duration
	#[serde(default)]
	pub image_duration: Option<DurationDisplay>,

	/// Player
	#[serde(default)]
	pub player: PlayerConfig,
}

impl Config {
	/// Creates the default config, after failing to load it with `err`.
	///
	/// Attempts to write the default config to `path`.
	pub fn create_default(path: &Path, err: &anyhow::Error) -> Self {
		tracing::warn!(?path, "Unable to load config, using default: {err:?}");
		let config = Self::default();
		if let Err(err) = config.write(path) {
			tracing::warn!(?path, "Unable to write default config: {err:?}");
		}

		config
	}

	/// Loads the config
	pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
		let config_yaml = fs::read(path).context("Unable to open file")?;
		let config = serde_yaml::from_slice(&config_yaml).context("Unable to parse config")?;
		Ok(config)
	}

	/// Writes the config
	fn write(&self, path: &Path) -> Result<(), anyhow::Error> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context("Unable to create config directory")?;
		}

		let config_yaml = serde_yaml::to_string(self).context("Unable to serialize config")?;
		fs::write(path, config_yaml.as_bytes()).context("Unable to write config")?;

		Ok(())
	}
}

#[expect(clippy::derivable_impls, reason = "Better to be explicit with a config")]
impl Default for Config {
	fn default() -> Self {
		Self {
			tokio_worker_threads: None,
			log_file:             None,
			socket:               None,
			fullscreen:           false,
			image_duration:       None,
			player:               PlayerConfig::default(),
		}
	}
}

/// Player configuration
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
	/// Program to run for each media
	pub program: PathBuf,

	/// Arguments, before the media path
	pub args: Vec<String>,

	/// Extra arguments when playing in fullscreen
	pub fullscreen_args: Vec<String>,

	/// Argument to set the image duration.
	///
	/// `{secs}` is replaced with the duration, in seconds.
	pub image_duration_arg: Option<String>,
}

impl Default for PlayerConfig {
	fn default() -> Self {
		Self {
			program:            PathBuf::from("mpv"),
			args:               vec!["--really-quiet".to_owned(), "--no-terminal".to_owned()],
			fullscreen_args:    vec!["--fullscreen".to_owned()],
			image_duration_arg: Some("--image-display-duration={secs}".to_owned()),
		}
	}
}
