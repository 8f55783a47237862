//! Playlist entry filters

// Imports
use {
	crate::Error,
	std::{
		cmp::Reverse,
		fs,
		path::{Path, PathBuf},
		time::SystemTime,
	},
};

/// Filter
///
/// Applied to the paths resolved from a single playlist entry.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Filter {
	/// Keeps the `count` most recently modified paths, newest first
	Newest { count: usize },
}

impl Filter {
	/// Creates a filter from it's name and arguments
	pub fn from_name(name: &str, args: serde_yaml::Value) -> Result<Self, Error> {
		let invalid_args = |source| Error::InvalidFilterArgs {
			name: name.to_owned(),
			source,
		};

		match name {
			"newest" => {
				let count = serde_yaml::from_value::<usize>(args).map_err(invalid_args)?;
				Ok(Self::Newest { count })
			},
			_ => Err(Error::UnknownFilter { name: name.to_owned() }),
		}
	}

	/// Returns this filter's name
	#[must_use]
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Newest { .. } => "newest",
		}
	}

	/// Applies this filter.
	///
	/// Blocks while accessing the filesystem.
	pub fn apply(&self, paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, Error> {
		match *self {
			Self::Newest { count } => {
				let mut paths = paths
					.into_iter()
					.map(|path| self::modified_time(&path).map(|modified| (Reverse(modified), path)))
					.collect::<Result<Vec<_>, Error>>()?;
				paths.sort_by_key(|&(modified, _)| modified);
				paths.truncate(count);

				Ok(paths.into_iter().map(|(_, path)| path).collect())
			},
		}
	}
}

/// Returns the modification time of `path`
fn modified_time(path: &Path) -> Result<SystemTime, Error> {
	fs::metadata(path)
		.and_then(|metadata| metadata.modified())
		.map_err(Error::io(path))
}

#[cfg(test)]
mod test {
	use {
		super::*,
		std::{fs::File, time::Duration},
	};

	#[test]
	fn from_name() {
		let filter = Filter::from_name("newest", serde_yaml::Value::from(20)).expect("Unable to create filter");
		assert_eq!(filter, Filter::Newest { count: 20 });
		assert_eq!(filter.name(), "newest");
	}

	#[test]
	fn unknown() {
		assert!(matches!(
			Filter::from_name("oldest", serde_yaml::Value::from(1)),
			Err(Error::UnknownFilter { name }) if name == "oldest"
		));
	}

	#[test]
	fn invalid_args() {
		assert!(matches!(
			Filter::from_name("newest", serde_yaml::Value::from("many")),
			Err(Error::InvalidFilterArgs { .. })
		));
	}

	#[test]
	fn newest() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let paths = (0..5)
			.map(|idx| {
				let path = dir.path().join(format!("{idx}.png"));
				let file = File::create(&path).expect("Unable to create file");
				file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1000 + idx))
					.expect("Unable to set modification time");
				path
			})
			.collect::<Vec<_>>();

		let filter = Filter::Newest { count: 3 };
		let filtered = filter.apply(paths.clone()).expect("Unable to apply filter");
		assert_eq!(filtered, [paths[4].clone(), paths[3].clone(), paths[2].clone()]);

		let filter = Filter::Newest { count: 10 };
		let filtered = filter.apply(paths.clone()).expect("Unable to apply filter");
		assert_eq!(filtered.len(), paths.len());
	}

	#[test]
	fn newest_missing() {
		let dir = tempfile::tempdir().expect("Unable to create temporary directory");
		let present = dir.path().join("a.png");
		_ = File::create(&present).expect("Unable to create file");
		let missing = dir.path().join("b.png");

		let filter = Filter::Newest { count: 1 };
		assert!(matches!(
			filter.apply(vec![present, missing.clone()]),
			Err(Error::Io { path, .. }) if path == missing
		));
	}
}
