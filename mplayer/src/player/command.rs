//! Command player

// Imports
use {
	super::Player,
	crate::config::PlayerConfig,
	anyhow::Context,
	std::{
		path::{Path, PathBuf},
		process::Stdio,
		time::Duration,
	},
	tokio::process::Command,
};

/// Player that runs an external program for each media file
#[derive(Debug)]
pub struct CommandPlayer {
	/// Program
	program: PathBuf,

	/// Arguments
	args: Vec<String>,

	/// Fullscreen arguments
	fullscreen_args: Vec<String>,

	/// Image duration argument
	image_duration_arg: Option<String>,

	/// Whether to play in fullscreen
	fullscreen: bool,

	/// Image duration
	image_duration: Option<Duration>,
}

impl CommandPlayer {
	/// Creates a new player from it's config
	#[must_use]
	pub fn from_config(config: &PlayerConfig) -> Self {
		Self {
			program:            config.program.clone(),
			args:               config.args.clone(),
			fullscreen_args:    config.fullscreen_args.clone(),
			image_duration_arg: config.image_duration_arg.clone(),
			fullscreen:         false,
			image_duration:     None,
		}
	}

	/// Builds the command to play `path`
	fn command(&self, path: &Path) -> Command {
		let mut command = Command::new(&self.program);
		_ = command.args(&self.args);

		if self.fullscreen {
			_ = command.args(&self.fullscreen_args);
		}

		if let (Some(arg), Some(duration)) = (&self.image_duration_arg, self.image_duration) {
			_ = command.arg(arg.replace("{secs}", &duration.as_secs_f64().to_string()));
		}

		_ = command.arg(path).stdin(Stdio::null()).kill_on_drop(true);
		command
	}
}

impl Player for CommandPlayer {
	async fn play(&self, path: &Path) -> Result<(), anyhow::Error> {
		let mut command = self.command(path);
		tracing::debug!(?command, "Running player");

		// Note: If we're cancelled, `kill_on_drop` stops the player
		let status = command
			.status()
			.await
			.with_context(|| format!("Unable to run player {:?}", self.program))?;
		if !status.success() {
			tracing::warn!(?path, %status, "Player exited unsuccessfully");
		}

		Ok(())
	}

	fn set_fullscreen(&mut self, fullscreen: bool) {
		self.fullscreen = fullscreen;
	}

	fn set_image_duration(&mut self, duration: Option<Duration>) {
		self.image_duration = duration;
	}
}

#[cfg(test)]
mod test {
	use {super::*, std::ffi::OsStr};

	fn mk_player(program: &str, args: &[&str]) -> CommandPlayer {
		CommandPlayer::from_config(&PlayerConfig {
			program:            PathBuf::from(program),
			args:               args.iter().map(|&arg| arg.to_owned()).collect(),
			fullscreen_args:    vec!["--fullscreen".to_owned()],
			image_duration_arg: Some("--image-duration={secs}".to_owned()),
		})
	}

	#[test]
	fn command_args() {
		let mut player = self::mk_player("mpv", &["--quiet"]);
		let path = Path::new("/a.png");

		let command = player.command(path);
		let args = command.as_std().get_args().collect::<Vec<_>>();
		assert_eq!(args, [OsStr::new("--quiet"), OsStr::new("/a.png")]);

		player.set_fullscreen(true);
		player.set_image_duration(Some(Duration::from_millis(1500)));
		let command = player.command(path);
		let args = command.as_std().get_args().collect::<Vec<_>>();
		assert_eq!(args, [
			OsStr::new("--quiet"),
			OsStr::new("--fullscreen"),
			OsStr::new("--image-duration=1.5"),
			OsStr::new("/a.png")
		]);
	}

	#[tokio::test]
	async fn play() {
		let player = self::mk_player("sh", &["-c", "exit 0", "sh"]);
		player.play(Path::new("/a.mp4")).await.expect("Unable to play");

		// Note: Failing to play a single file isn't an error
		let player = self::mk_player("sh", &["-c", "exit 1", "sh"]);
		player.play(Path::new("/a.mp4")).await.expect("Unable to play");
	}

	#[tokio::test]
	async fn missing_program() {
		let player = self::mk_player("/nonexistent/player", &[]);
		assert!(player.play(Path::new("/a.mp4")).await.is_err(), "Expected missing program to fail");
	}

	#[tokio::test]
	async fn cancel() {
		let player = self::mk_player("sh", &["-c", "sleep 10", "sh"]);
		let res = tokio::time::timeout(Duration::from_millis(100), player.play(Path::new("/a.mp4"))).await;
		assert!(res.is_err(), "Player should have been cancelled");
	}
}
