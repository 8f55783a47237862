//! Media urls
//!
//! Urls have the format `<scheme>://<path>`, where the scheme is either
//! `file` (the default, if no scheme is given) or `glob`.

// Imports
use {
	crate::Error,
	std::path::{Path, PathBuf},
};

/// Url scheme
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Scheme {
	File,
	Glob,
}

/// Resolves a url into paths.
///
/// Relative paths are resolved against `root`. For globs, the pattern
/// may match at any depth under `root`. Without a root, the path must
/// be absolute.
pub fn resolve(url: &str, root: Option<&Path>) -> Result<Vec<PathBuf>, Error> {
	let invalid = |reason| Error::InvalidUrl {
		url: url.to_owned(),
		reason,
	};

	let (scheme, path) = match url.split_once("://") {
		Some((scheme, path)) => {
			let scheme = match scheme {
				"file" => Scheme::File,
				"glob" => Scheme::Glob,
				_ => return Err(invalid("unknown scheme")),
			};
			(scheme, path)
		},
		None => (Scheme::File, url),
	};
	if path.is_empty() {
		return Err(invalid("empty path"));
	}

	let path = Path::new(path);
	let paths = match (path.is_absolute(), root) {
		(true, _) => match scheme {
			Scheme::File => vec![path.to_path_buf()],
			Scheme::Glob => self::glob_files(path.to_string_lossy().as_ref())?,
		},
		(false, Some(root)) => match scheme {
			Scheme::File => vec![root.join(path)],
			Scheme::Glob => {
				let root = glob::Pattern::escape(root.to_string_lossy().as_ref());
				let pattern = Path::new(&root).join("**").join(path);
				self::glob_files(pattern.to_string_lossy().as_ref())?
			},
		},
		(false, None) => return Err(invalid("relative path without a root")),
	};

	match paths.iter().all(|path| path.is_absolute()) {
		true => Ok(paths),
		false => Err(invalid("resolved path isn't absolute")),
	}
}

/// Returns all files matching a glob pattern
fn glob_files(pattern: &str) -> Result<Vec<PathBuf>, Error> {
	let paths = glob::glob(pattern).map_err(|source| Error::InvalidGlob {
		pattern: pattern.to_owned(),
		source,
	})?;

	let paths = paths
		.filter_map(|path| match path {
			Ok(path) => path.is_file().then_some(path),
			Err(err) => {
				tracing::warn!(?pattern, "Unable to read glob entry: {err}");
				None
			},
		})
		.collect();

	Ok(paths)
}
