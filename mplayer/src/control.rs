//! Control socket
//!
//! A request is a verb, optionally followed by `\0`-separated arguments,
//! after which the client shuts down it's write half. The server responds
//! with an empty body once the request is done, then closes the connection.

// Imports
use {
	anyhow::Context,
	itertools::Itertools,
	mplayer_core::{Core, RescanOutcome},
	std::{
		fs,
		future::Future,
		io,
		path::{Path, PathBuf},
		sync::Arc,
	},
	tokio::{
		io::{AsyncReadExt, AsyncWriteExt},
		net::{UnixListener, UnixStream},
	},
};

/// Request handler
pub trait Handler: Clone + Send + Sync + 'static {
	/// Rescans all inputs
	fn scan(&self) -> impl Future<Output = ()> + Send;
}

impl Handler for Arc<Core> {
	async fn scan(&self) {
		match self.rescan().await {
			Ok(RescanOutcome::Coalesced) => tracing::info!("Rescan already in progress"),
			Ok(outcome) => tracing::debug!(?outcome, "Rescanned from control socket"),
			Err(err) => tracing::warn!("Unable to rescan: {:?}", anyhow::Error::new(err)),
		}
	}
}

/// Control server
#[derive(Debug)]
pub struct Server {
	/// Listener
	listener: UnixListener,

	/// Socket path
	path: PathBuf,
}

impl Server {
	/// Binds the server to `path`.
	///
	/// Removes any existing socket file at `path` first.
	pub fn bind(path: &Path) -> Result<Self, anyhow::Error> {
		match fs::remove_file(path) {
			Ok(()) => tracing::debug!(?path, "Removed stale control socket"),
			Err(err) if err.kind() == io::ErrorKind::NotFound => (),
			Err(err) => return Err(err).context("Unable to remove existing control socket"),
		}

		let listener = UnixListener::bind(path).context("Unable to bind control socket")?;
		tracing::info!(?path, "Listening on control socket");

		Ok(Self {
			listener,
			path: path.to_path_buf(),
		})
	}

	/// Runs the server, handling each connection in it's own task
	pub async fn run<H: Handler>(&self, handler: H) -> Result<(), anyhow::Error> {
		loop {
			let (stream, _) = self
				.listener
				.accept()
				.await
				.context("Unable to accept control connection")?;

			let handler = handler.clone();
			_ = mplayer_util::spawn_task("Control connection", self::handle_connection(stream, handler));
		}
	}
}

impl Drop for Server {
	fn drop(&mut self) {
		if let Err(err) = fs::remove_file(&self.path) {
			tracing::warn!(path = ?self.path, "Unable to remove control socket: {err}");
		}
	}
}

/// Handles a single connection
async fn handle_connection<H: Handler>(mut stream: UnixStream, handler: H) -> Result<(), anyhow::Error> {
	let mut request = vec![];
	_ = stream
		.read_to_end(&mut request)
		.await
		.context("Unable to read request")?;

	let mut parts = request.split(|&byte| byte == 0);
	let verb = parts.next().unwrap_or_default();
	let args = parts.map(String::from_utf8_lossy).collect::<Vec<_>>();
	match verb {
		b"ping" => tracing::debug!("Received ping"),
		b"scan" => {
			tracing::info!("Received scan request");
			handler.scan().await;
		},
		_ => tracing::warn!(verb = %String::from_utf8_lossy(verb), ?args, "Ignoring unknown request"),
	}

	stream.shutdown().await.context("Unable to close connection")?;

	Ok(())
}

/// Control client
#[derive(Debug)]
pub struct Client {
	/// Socket path
	path: PathBuf,
}

impl Client {
	/// Creates a new client
	#[must_use]
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Checks that the server is running
	pub async fn ping(&self) -> Result<(), anyhow::Error> {
		_ = self.request("ping", &[]).await?;
		Ok(())
	}

	/// Requests a rescan, waiting for it to finish
	pub async fn scan(&self) -> Result<(), anyhow::Error> {
		_ = self.request("scan", &[]).await?;
		Ok(())
	}

	/// Sends a request, returning the response
	pub async fn request(&self, verb: &str, args: &[&str]) -> Result<Vec<u8>, anyhow::Error> {
		let mut stream = UnixStream::connect(&self.path)
			.await
			.with_context(|| format!("Unable to connect to control socket {:?}", self.path))?;

		let request = [verb].iter().chain(args).join("\0");
		stream
			.write_all(request.as_bytes())
			.await
			.context("Unable to write request")?;
		stream.shutdown().await.context("Unable to finish request")?;

		let mut response = vec![];
		_ = stream
			.read_to_end(&mut response)
			.await
			.context("Unable to read response")?;

		Ok(response)
	}
}
