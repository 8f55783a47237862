//! Tasks

// Imports
use {std::future::Future, tokio::task::JoinHandle};

/// Spawns a named task on the current runtime.
///
/// If the task returns an error, it is logged and the task outputs `None`.
pub fn spawn_task<F, T, E>(name: impl Into<String>, fut: F) -> JoinHandle<Option<T>>
where
	F: Future<Output = Result<T, E>> + Send + 'static,
	T: Send + 'static,
	E: Into<anyhow::Error> + Send + 'static,
{
	let name = name.into();
	tokio::spawn(async move {
		tracing::trace!(%name, "Starting task");
		match fut.await {
			Ok(value) => {
				tracing::trace!(%name, "Task finished");
				Some(value)
			},
			Err(err) => {
				let err = err.into();
				tracing::warn!(%name, "Task returned an error: {err:?}");
				None
			},
		}
	})
}
