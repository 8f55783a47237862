//! Logger

// Imports
use {
	itertools::Itertools,
	std::{
		collections::{BTreeMap, btree_map},
		env::{self, VarError},
		fs,
		io,
		path::Path,
	},
	tracing::metadata::LevelFilter,
	tracing_subscriber::{EnvFilter, prelude::*},
};

/// Initializes the logger
///
/// Logs to both stderr, at `level` unless overridden by `RUST_LOG`, and
/// `log_file`, if any.
pub fn init(log_file: Option<&Path>, level: LevelFilter) {
	// Note: Warnings from before the logger is set up are emitted at the end
	let mut warnings = vec![];

	// Create the terminal layer
	let term_use_colors = self::colors_enabled(&mut warnings);
	let term_env = self::get_env_filters("RUST_LOG", &level.to_string(), &mut warnings);
	let term_layer = tracing_subscriber::fmt::layer()
		.with_ansi(term_use_colors)
		.with_writer(io::stderr)
		.with_filter(
			EnvFilter::builder()
				.with_default_directive(level.into())
				.parse_lossy(&term_env),
		);

	// Create the file layer, if requested
	let file_layer = log_file.and_then(|log_file| {
		// Try to create the file
		let file = match fs::File::create(log_file) {
			Ok(file) => file,
			Err(err) => {
				warnings.push(format!("Unable to create log file {log_file:?}: {err}"));
				return None;
			},
		};

		// Then create the layer
		let env = self::get_env_filters("RUST_FILE_LOG", "debug", &mut warnings);
		let layer = tracing_subscriber::fmt::layer()
			.with_writer(file)
			.with_ansi(false)
			.with_filter(EnvFilter::builder().parse_lossy(env));

		Some(layer)
	});

	// Register all layers to the registry
	tracing_subscriber::registry().with(term_layer).with(file_layer).init();
	tracing::debug!(?log_file, ?term_use_colors, ?term_env, "Initialized logging");

	// And emit all pre-init warnings
	for warning in warnings {
		tracing::warn!("{warning}");
	}
}

/// Returns whether to colors should be enabled for the terminal layer.
fn colors_enabled(warnings: &mut Vec<String>) -> bool {
	match env::var("RUST_LOG_COLOR").map(|var| var.to_lowercase()).as_deref() {
		// By default / `1` / `yes` / `true`, use colors
		Err(VarError::NotPresent) | Ok("1" | "yes" | "true") => true,

		// On `0`, `no`, `false`, don't
		Ok("0" | "no" | "false") => false,

		// Else don't use colors, but warn
		Ok(env) => {
			warnings.push(format!(
				"Ignoring unknown `RUST_LOG_COLOR` value: {env:?}, expected `0`, `1`, `yes`, `no`, `true`, `false`"
			));
			false
		},
		Err(VarError::NotUnicode(err)) => {
			warnings.push(format!("Ignoring non-utf8 `RUST_LOG_COLOR`: {err:?}"));
			false
		},
	}
}

/// Returns the env filters of a variable.
///
/// Adds default filters, if not specified
#[must_use]
fn get_env_filters(env: &str, default: &str, warnings: &mut Vec<String>) -> String {
	match env::var(env) {
		Ok(var) => self::with_default_filters(Some(&var), default),
		Err(err) => {
			if let VarError::NotUnicode(var) = err {
				warnings.push(format!("Ignoring non-utf8 env variable {env:?}: {var:?}"));
			}

			self::with_default_filters(None, default)
		},
	}
}

/// Adds the default filters to `filters`, if not specified
fn with_default_filters(filters: Option<&str>, default: &str) -> String {
	// Default filters
	let default_filters = [(None, default), (Some("mio"), "warn")];

	// Split filters by `,`, then src and level by `=`
	let mut cur_filters = filters
		.into_iter()
		.flat_map(|filters| filters.split(','))
		.filter(|filter| !filter.is_empty())
		.map(|filter| match filter.split_once('=') {
			Some((src, level)) => (Some(src), level),
			None => (None, filter),
		})
		.collect::<BTreeMap<_, _>>();

	// Add all default filters, if not specified
	for (src, level) in default_filters {
		if let btree_map::Entry::Vacant(entry) = cur_filters.entry(src) {
			_ = entry.insert(level);
		}
	}

	// Then re-create it
	cur_filters
		.into_iter()
		.map(|(src, level)| match src {
			Some(src) => format!("{src}={level}"),
			None => level.to_owned(),
		})
		.join(",")
}
