//! Arguments

// Imports
use {
	clap::ArgAction,
	mplayer_util::DurationDisplay,
	std::path::PathBuf,
	tracing::metadata::LevelFilter,
};

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
#[clap(about = "Unattended media player")]
pub struct Args {
	/// Config file
	#[clap(long = "config", global = true)]
	pub config: Option<PathBuf>,

	/// Log file
	#[clap(long = "log-file", global = true)]
	pub log_file: Option<PathBuf>,

	/// Log level for the terminal.
	///
	/// Overrides `--verbose` and `--quiet`.
	#[clap(long = "log-level", global = true)]
	pub log_level: Option<LevelFilter>,

	/// Increases the log level
	#[clap(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Decreases the log level
	#[clap(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
	pub quiet: u8,

	/// Command
	#[clap(subcommand)]
	pub command: Command,
}

impl Args {
	/// Returns the log level for the terminal
	#[must_use]
	pub fn log_level(&self) -> LevelFilter {
		const LEVELS: [LevelFilter; 6] = [
			LevelFilter::OFF,
			LevelFilter::ERROR,
			LevelFilter::WARN,
			LevelFilter::INFO,
			LevelFilter::DEBUG,
			LevelFilter::TRACE,
		];

		if let Some(level) = self.log_level {
			return level;
		}

		// Note: Start at `INFO`
		let idx = (3 + usize::from(self.verbose)).saturating_sub(usize::from(self.quiet));
		LEVELS[idx.min(LEVELS.len() - 1)]
	}
}

/// Command
#[derive(Debug)]
#[derive(clap::Subcommand)]
pub enum Command {
	/// Plays files
	Play(PlayArgs),

	/// Controls a running player
	Ctl(CtlArgs),
}

/// Play arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct PlayArgs {
	/// Runs the player in fullscreen.
	///
	/// Defaults to the config's value.
	#[clap(long = "fullscreen", short = 'f')]
	pub fullscreen: bool,

	/// How long to display images for, e.g. `10s` or `1m30s`
	#[clap(long = "image-duration")]
	pub image_duration: Option<DurationDisplay>,

	/// Repeats the files after they've all been played
	#[clap(long = "repeat")]
	pub repeat: bool,

	/// Schedule file.
	///
	/// Selects which playlist is played at what time. Implies `--repeat`.
	#[clap(long = "schedule")]
	pub schedule: Option<PathBuf>,

	/// Control socket
	#[clap(long = "socket", short = 's', env = "MPLAYER_SOCKET")]
	pub socket: Option<PathBuf>,

	/// Files to play.
	///
	/// Files ending in `.yaml` / `.yml` are playlists, anything else is
	/// played directly.
	pub files: Vec<PathBuf>,
}

/// Control arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct CtlArgs {
	/// Control socket
	#[clap(long = "socket", short = 's', env = "MPLAYER_SOCKET")]
	pub socket: Option<PathBuf>,

	/// Request
	#[clap(subcommand)]
	pub request: CtlRequest,
}

/// Control request
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(clap::Subcommand)]
pub enum CtlRequest {
	/// Checks that the player is running
	Ping,

	/// Rescans the player's inputs
	Scan,
}
