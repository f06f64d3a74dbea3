use chrono::Duration;

use crate::error::Result;

/// Which way an interval is read: time elapsed since a date, or time left
/// until it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Since,
    Until,
}

/// The polarity classes of a `since`/`until` interval.
///
/// | direction | date   | classes              |
/// |-----------|--------|----------------------|
/// | since     | past   | `P`                  |
/// | since     | future | `N pending`          |
/// | until     | future | `P`                  |
/// | until     | past   | `N`                  |
///
/// `P` is `positive` and `N` is `negative` when `positive` is `true`, and
/// the other way around when it is `false`.
pub fn polarity_classes(direction: Direction, future: bool, positive: bool) -> &'static str {
    use Direction::*;

    match (direction, future, positive) {
        (Since, false, true) => "positive",
        (Since, false, false) => "negative",
        (Since, true, true) => "negative pending",
        (Since, true, false) => "positive pending",
        (Until, true, true) => "positive",
        (Until, true, false) => "negative",
        (Until, false, true) => "negative",
        (Until, false, false) => "positive",
    }
}

/// Whether the interval runs against `direction`: a `since` in the future
/// or an `until` in the past. Such intervals are signed with `-` when
/// written in absolute syntax.
pub fn is_inverted(direction: Direction, future: bool) -> bool {
    matches!((direction, future), (Direction::Since, true) | (Direction::Until, false))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Syntax {
    /// `3 hours`.
    Absolute,
    /// `3 hours ago`, `3 hours from now`.
    Relative { future: bool },
}

const UNITS: &[(u64, &str, &str)] = &[
    (365 * 86400, "year", "yr"),
    (30 * 86400, "month", "mo"),
    (7 * 86400, "week", "w"),
    (86400, "day", "d"),
    (3600, "hour", "h"),
    (60, "minute", "m"),
    (1, "second", "s"),
];

/// Writes durations in words.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Humanizer {
    short: bool,
    parts: Option<usize>,
}

impl Humanizer {
    /// `parts` caps the number of units written, largest first; `None`
    /// writes all of them. Fails when the `intervals` feature is disabled.
    pub fn new(short: bool, parts: Option<usize>) -> Result<Humanizer> {
        if !cfg!(feature = "intervals") {
            return err! {
                ComponentUnavailable: "interval formatting is not available",
                "required feature" => "intervals",
            };
        }

        Ok(Humanizer { short, parts })
    }

    /// ```rust
    /// use chrono::Duration;
    /// use tagged::plugins::{Humanizer, Syntax};
    ///
    /// let humanizer = Humanizer::new(false, Some(2)).unwrap();
    /// let delta = Duration::hours(26) + Duration::minutes(5);
    /// assert_eq!(humanizer.humanize(delta, Syntax::Absolute), "1 day and 2 hours");
    /// ```
    pub fn humanize(&self, delta: Duration, syntax: Syntax) -> String {
        let limit = self.parts.unwrap_or(usize::MAX).max(1);
        let mut seconds = delta.num_seconds().unsigned_abs();
        let mut parts = vec![];
        for &(size, long, short) in UNITS {
            if parts.len() == limit {
                break;
            }

            let count = seconds / size;
            seconds %= size;
            match (count, self.short) {
                (0, _) => continue,
                (n, true) => parts.push(format!("{n}{short}")),
                (1, false) => parts.push(format!("1 {long}")),
                (n, false) => parts.push(format!("{n} {long}s")),
            }
        }

        match syntax {
            Syntax::Relative { .. } if parts.is_empty() => "just now".into(),
            Syntax::Relative { future } if !self.short && parts == ["1 day"] => {
                (if future { "tomorrow" } else { "yesterday" }).into()
            }
            Syntax::Relative { future: true } => format!("{} from now", join(&parts)),
            Syntax::Relative { future: false } => format!("{} ago", join(&parts)),
            Syntax::Absolute if parts.is_empty() && self.short => "0s".into(),
            Syntax::Absolute if parts.is_empty() => "0 seconds".into(),
            Syntax::Absolute => join(&parts),
        }
    }
}

fn join(parts: &[String]) -> String {
    match parts.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_table() {
        use Direction::*;

        let cases = [
            (Since, false, true, "positive"),
            (Since, false, false, "negative"),
            (Since, true, true, "negative pending"),
            (Since, true, false, "positive pending"),
            (Until, true, true, "positive"),
            (Until, true, false, "negative"),
            (Until, false, true, "negative"),
            (Until, false, false, "positive"),
        ];

        for (direction, future, positive, classes) in cases {
            assert_eq!(polarity_classes(direction, future, positive), classes);
        }

        assert!(is_inverted(Since, true));
        assert!(is_inverted(Until, false));
        assert!(!is_inverted(Since, false));
        assert!(!is_inverted(Until, true));
    }

    #[test]
    #[cfg(feature = "intervals")]
    fn test_humanize() {
        let delta = Duration::days(1) + Duration::hours(3) + Duration::minutes(5);
        let all = Humanizer::new(false, None).unwrap();
        let two = Humanizer::new(false, Some(2)).unwrap();
        let one = Humanizer::new(false, Some(1)).unwrap();
        let short = Humanizer::new(true, None).unwrap();

        assert_eq!(all.humanize(delta, Syntax::Absolute), "1 day, 3 hours and 5 minutes");
        assert_eq!(two.humanize(delta, Syntax::Relative { future: false }), "1 day and 3 hours ago");
        assert_eq!(two.humanize(-delta, Syntax::Relative { future: true }), "1 day and 3 hours from now");
        assert_eq!(one.humanize(delta, Syntax::Relative { future: false }), "yesterday");
        assert_eq!(one.humanize(delta, Syntax::Relative { future: true }), "tomorrow");
        assert_eq!(short.humanize(delta, Syntax::Absolute), "1d, 3h and 5m");
        assert_eq!(short.humanize(delta, Syntax::Relative { future: false }), "1d, 3h and 5m ago");

        let years = Duration::days(800);
        assert_eq!(one.humanize(years, Syntax::Absolute), "2 years");
        assert_eq!(Humanizer::new(true, Some(0)).unwrap().humanize(years, Syntax::Absolute), "2yr");
    }

    #[test]
    #[cfg(feature = "intervals")]
    fn test_humanize_zero() {
        let humanizer = Humanizer::new(false, Some(1)).unwrap();
        let zero = Duration::zero();
        assert_eq!(humanizer.humanize(zero, Syntax::Relative { future: false }), "just now");
        assert_eq!(humanizer.humanize(zero, Syntax::Absolute), "0 seconds");
        assert_eq!(Humanizer::new(true, None).unwrap().humanize(zero, Syntax::Absolute), "0s");
    }

    #[test]
    #[cfg(not(feature = "intervals"))]
    fn test_unavailable() {
        let e = Humanizer::new(false, None).unwrap_err();
        assert_eq!(e.kind(), crate::error::ErrorKind::ComponentUnavailable);
    }
}
