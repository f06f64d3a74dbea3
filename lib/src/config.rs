use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Result, Chainable};

/// Factory-wide settings.
///
/// ```toml
/// timezone = "+02:00"
/// now = "2024-03-01T12:00:00+02:00"
/// delimiter = " · "
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The default zone: `UTC`, `Z`, `GMT` or an offset like `+02:00`.
    pub timezone: String,
    /// Freezes the clock used by the time plugin.
    pub now: Option<DateTime<FixedOffset>>,
    /// Default delimiter between inline list items.
    pub delimiter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: "UTC".into(),
            now: None,
            delimiter: ", ".into(),
        }
    }
}

impl Config {
    pub fn from_toml(string: &str) -> Result<Config> {
        let config: Config = toml::from_str(string)
            .chain(error!(InvalidArgument: "failed to parse configuration"))?;

        config.zone()?;
        Ok(config)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let string = fs::read_to_string(path).chain(error! {
            "failed to read configuration file",
            "file path" => path.display()
        })?;

        Config::from_toml(&string).chain_with(|| error! {
            "invalid configuration file",
            "file path" => path.display()
        })
    }

    /// The default zone as a fixed offset.
    pub fn zone(&self) -> Result<FixedOffset> {
        parse_offset(&self.timezone)
    }
}

/// Parses `UTC`, `Z`, `GMT`, `±HH`, `±HHMM` or `±HH:MM`.
///
/// ```rust
/// use tagged::config::parse_offset;
///
/// assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19800);
/// assert_eq!(parse_offset("utc").unwrap().local_minus_utc(), 0);
/// assert!(parse_offset("Mars/Olympus").is_err());
/// ```
pub fn parse_offset(zone: &str) -> Result<FixedOffset> {
    let zone = zone.trim();
    let invalid = || error!(InvalidArgument: "invalid time zone", "zone" => zone);
    if ["utc", "z", "gmt"].iter().any(|z| zone.eq_ignore_ascii_case(z)) {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match zone.as_bytes().first() {
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        _ => return Err(invalid()),
    };

    let digits = rest.replacen(':', "", 1);
    if !matches!(digits.len(), 2 | 4) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits.get(2..).filter(|m| !m.is_empty()).map_or(Ok(0), str::parse)
        .map_err(|_| invalid())?;

    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.zone().unwrap().local_minus_utc(), 0);
        assert_eq!(config.delimiter, ", ");
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(r#"
            timezone = "-03:30"
            now = "2024-03-01T12:00:00-03:30"
            delimiter = " / "
        "#).unwrap();

        assert_eq!(config.zone().unwrap().local_minus_utc(), -(3 * 3600 + 1800));
        assert_eq!(config.now.unwrap().to_rfc3339(), "2024-03-01T12:00:00-03:30");
        assert_eq!(config.delimiter, " / ");
    }

    #[test]
    fn test_invalid() {
        let e = Config::from_toml(r#"timezone = "Europe/Nowhere""#).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);

        let e = Config::from_toml(r#"delimeter = ",""#).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);

        for zone in ["+1", "+123", "+24:00:00", "+02:60", "02:00", "+ab:cd"] {
            assert!(parse_offset(zone).is_err(), "{zone}");
        }
    }

    #[test]
    fn test_read_missing_file() {
        let e = Config::read("/definitely/not/here.toml").unwrap_err();
        assert!(e.to_string().contains("failed to read configuration file"));
    }
}
