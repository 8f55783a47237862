//! Duration display

// Imports
use std::{fmt, str::FromStr, time::Duration};

/// Duration parse error
#[derive(Debug, thiserror::Error)]
#[error("Invalid duration {duration:?}")]
pub struct DurationParseError {
	/// Duration we tried to parse
	duration: String,

	/// Source
	#[source]
	source: humantime::DurationError,
}

/// Duration
///
/// Parsed from / displayed as a sequence of `<integer><unit>`, e.g. `1h 30m`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde_with::SerializeDisplay)]
#[derive(serde_with::DeserializeFromStr)]
pub struct DurationDisplay(pub Duration);

impl FromStr for DurationDisplay {
	type Err = DurationParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		humantime::parse_duration(s.trim())
			.map(Self)
			.map_err(|source| DurationParseError {
				duration: s.to_owned(),
				source,
			})
	}
}

impl fmt::Display for DurationDisplay {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(&humantime::format_duration(self.0).to_string())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn parse(s: &str) -> Duration {
		s.parse::<DurationDisplay>().expect("Unable to parse duration").0
	}

	#[test]
	fn units() {
		assert_eq!(parse("1s"), Duration::from_secs(1));
		assert_eq!(parse("1m"), Duration::from_secs(60));
		assert_eq!(parse("1h"), Duration::from_secs(60 * 60));
		assert_eq!(parse("1d"), Duration::from_secs(24 * 60 * 60));
		assert_eq!(parse("250ms"), Duration::from_millis(250));
		assert_eq!(parse("10 seconds"), Duration::from_secs(10));
	}

	#[test]
	fn combined() {
		assert_eq!(parse("1h30m"), Duration::from_secs(90 * 60));
		assert_eq!(parse("1s 500ms"), Duration::from_millis(1500));
	}

	#[test]
	fn errors() {
		for s in ["", "s", "5", "3x"] {
			assert!(s.parse::<DurationDisplay>().is_err(), "Parsed invalid duration {s:?}");
		}
	}

	#[test]
	fn display() {
		assert_eq!(DurationDisplay(Duration::ZERO).to_string(), "0s");
		assert_eq!(DurationDisplay(Duration::from_secs(90 * 60)).to_string(), "1h 30m");
		assert_eq!(DurationDisplay(Duration::from_millis(1500)).to_string(), "1s 500ms");
	}

	#[test]
	fn serde() {
		let duration = serde_yaml::from_str::<DurationDisplay>("1m10s").expect("Unable to deserialize");
		assert_eq!(duration.0, Duration::from_secs(70));

		let yaml = serde_yaml::to_string(&duration).expect("Unable to serialize");
		assert_eq!(yaml.trim(), "1m 10s");
	}
}
