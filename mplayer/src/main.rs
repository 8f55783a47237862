//! Unattended media player
//!
//! Plays media files and playlists, optionally following a schedule that
//! selects which playlist is played at what time.

// Modules
mod app;
mod args;
mod config;
mod control;
mod init;
mod player;

// Imports
use {
	self::{
		app::App,
		args::{Args, Command, CtlArgs, CtlRequest, PlayArgs},
		config::Config,
		control::Client,
		player::{CommandPlayer, Player},
	},
	anyhow::Context,
	clap::Parser,
	directories::ProjectDirs,
	mplayer_core::{Clock, Core},
	std::{
		env,
		path::{self, PathBuf},
		sync::Arc,
	},
	tokio::signal::{
		self,
		unix::SignalKind,
	},
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();

	// Load the config, but only create the default one once we have a logger
	let dirs = ProjectDirs::from("", "", "mplayer").context("Unable to create app directories")?;
	let config_path = args
		.config
		.clone()
		.unwrap_or_else(|| dirs.config_dir().join("config.yaml"));
	let config = Config::load(&config_path);

	// Initialize logging
	let log_file = args
		.log_file
		.clone()
		.or_else(|| config.as_ref().ok().and_then(|config| config.log_file.clone()));
	init::logger::init(log_file.as_deref(), args.log_level());
	tracing::debug!(?args, "Arguments");

	let config = config.unwrap_or_else(|err| Config::create_default(&config_path, &err));
	tracing::debug!(?config, ?config_path, "Config");

	// Then run `run` on the tokio runtime
	let tokio_runtime =
		init::tokio_runtime::create(config.tokio_worker_threads).context("Unable to create tokio runtime")?;
	tokio_runtime.block_on(self::run(args.command, &config))?;

	tracing::info!("Successfully shutting down");
	Ok(())
}

/// Runs a command
async fn run(command: Command, config: &Config) -> Result<(), anyhow::Error> {
	match command {
		Command::Play(args) => self::play(args, config).await,
		Command::Ctl(args) => self::ctl(args, config).await,
	}
}

/// Plays files until finished, or interrupted
async fn play(args: PlayArgs, config: &Config) -> Result<(), anyhow::Error> {
	let files = args
		.files
		.iter()
		.map(path::absolute)
		.collect::<Result<Vec<_>, _>>()
		.context("Unable to get absolute input paths")?;
	let schedule = args
		.schedule
		.as_deref()
		.map(path::absolute)
		.transpose()
		.context("Unable to get absolute schedule path")?;
	let repeat = args.repeat || schedule.is_some();

	let core = Core::new(files, schedule, Clock::system()).context("Unable to load inputs")?;
	let core = Arc::new(core);

	// Rescan on `SIGHUP`
	let mut sighup = signal::unix::signal(SignalKind::hangup()).context("Unable to listen for SIGHUP")?;
	let sighup_task = mplayer_util::spawn_task("SIGHUP handler", {
		let core = Arc::clone(&core);
		async move {
			while sighup.recv().await.is_some() {
				tracing::info!("Received SIGHUP, rescanning");
				_ = core.request_rescan();
			}

			Ok::<_, anyhow::Error>(())
		}
	});

	// Start the control server
	let socket = self::socket_path(args.socket, config);
	let server = control::Server::bind(&socket)?;
	let server_task = mplayer_util::spawn_task("Control server", {
		let core = Arc::clone(&core);
		async move { server.run(core).await }
	});

	let mut player = CommandPlayer::from_config(&config.player);
	player.set_fullscreen(args.fullscreen || config.fullscreen);
	player.set_image_duration(args.image_duration.or(config.image_duration).map(|duration| duration.0));
	let app = App::new(Arc::clone(&core), player, repeat);

	// Note: Dropping the play future stops the current player
	let res = tokio::select! {
		res = app.play() => res.context("Unable to play media"),
		res = signal::ctrl_c() => match res {
			Ok(()) => {
				tracing::info!("Received SIGINT, shutting down");
				Ok(())
			},
			Err(err) => Err(err).context("Unable to listen for SIGINT"),
		},
	};

	sighup_task.abort();
	server_task.abort();
	_ = server_task.await;

	res
}

/// Sends a request to a running player
async fn ctl(args: CtlArgs, config: &Config) -> Result<(), anyhow::Error> {
	let socket = self::socket_path(args.socket, config);
	let client = Client::new(socket);
	match args.request {
		CtlRequest::Ping => {
			client.ping().await.context("Unable to ping player")?;
			tracing::info!("Player is running");
		},
		CtlRequest::Scan => {
			client.scan().await.context("Unable to request rescan")?;
			tracing::info!("Rescanned inputs");
		},
	}

	Ok(())
}

/// Returns the control socket path
fn socket_path(socket: Option<PathBuf>, config: &Config) -> PathBuf {
	socket
		.or_else(|| config.socket.clone())
		.unwrap_or_else(|| env::temp_dir().join("mplayer.sock"))
}
