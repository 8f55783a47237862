//! App

// Imports
use {
	crate::player::Player,
	anyhow::Context,
	futures::StreamExt,
	mplayer_core::Core,
	std::{pin::pin, sync::Arc},
};

/// App
#[derive(Debug)]
pub struct App<P> {
	/// Core
	core: Arc<Core>,

	/// Player
	player: P,

	/// Whether to repeat after all media has been played
	repeat: bool,
}

impl<P: Player> App<P> {
	/// Creates a new app
	pub fn new(core: Arc<Core>, player: P, repeat: bool) -> Self {
		Self { core, player, repeat }
	}

	/// Plays all media.
	///
	/// If repeating, never returns, unless playing fails.
	pub async fn play(&self) -> Result<(), anyhow::Error> {
		loop {
			let mut medias = pin!(self.core.medias(true));
			while let Some(path) = medias.next().await {
				tracing::info!(?path, "Playing");
				self.player
					.play(&path)
					.await
					.with_context(|| format!("Unable to play {path:?}"))?;
			}

			if !self.repeat {
				break;
			}
			tracing::debug!("Finished playing all media, repeating");
		}

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use {
		super::*,
		mplayer_core::Clock,
		std::{
			fs,
			path::{Path, PathBuf},
			sync::Mutex,
			time::Duration,
		},
	};

	/// Player that records everything it plays
	#[derive(Default)]
	struct RecordingPlayer {
		played: Mutex<Vec<PathBuf>>,

		/// Fails once this many files have been played
		limit: Option<usize>,
	}

	impl Player for RecordingPlayer {
		async fn play(&self, path: &Path) -> Result<(), anyhow::Error> {
			let mut played = self.played.lock().expect("Poisoned");
			if self.limit.is_some_and(|limit| played.len() >= limit) {
				anyhow::bail!("Reached limit");
			}

			played.push(path.to_path_buf());
			Ok(())
		}

		fn set_fullscreen(&mut self, _fullscreen: bool) {}

		fn set_image_duration(&mut self, _duration: Option<Duration>) {}
	}

	fn mk_core(dir: &Path) -> (Arc<Core>, Vec<PathBuf>) {
		let paths = ["a.mp4", "b.png"].map(|name| dir.join(name));
		for path in &paths {
			fs::write(path, "").expect("Unable to create file");
		}

		let core = Core::new(paths.clone(), None, Clock::system()).expect("Unable to create core");
		(Arc::new(core), paths.to_vec())
	}

	#[tokio::test]
	async fn play_once() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let (core, paths) = self::mk_core(dir.path());

		let app = App::new(core, RecordingPlayer::default(), false);
		app.play().await.expect("Unable to play");
		assert_eq!(*app.player.played.lock().expect("Poisoned"), paths);
	}

	#[tokio::test]
	async fn play_repeat() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let (core, paths) = self::mk_core(dir.path());

		let player = RecordingPlayer {
			limit: Some(5),
			..RecordingPlayer::default()
		};
		let app = App::new(core, player, true);
		assert!(app.play().await.is_err(), "Expected the player to fail eventually");

		let played = app.player.played.lock().expect("Poisoned");
		assert_eq!(*played, [&paths[0], &paths[1], &paths[0], &paths[1], &paths[0]].map(PathBuf::clone));
	}
}
