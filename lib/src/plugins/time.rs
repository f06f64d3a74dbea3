use std::fmt::Write;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono::format::{Item, StrftimeItems};

use crate::attrs;
use crate::config::{Config, parse_offset};
use crate::error::{Error, Result, Chainable};
use crate::markup::Element;
use crate::plugins::{Direction, Humanizer, Syntax, is_inverted, polarity_classes};

const W3C: &str = "%Y-%m-%dT%H:%M:%S%:z";
const W3C_DATE: &str = "%Y-%m-%d";
const W3C_TIME: &str = "%H:%M:%S";

/// Anything the time formatter accepts as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// No date: formatting yields no element.
    Absent,
    Now,
    DateTime(DateTime<FixedOffset>),
    /// A wall-clock time in the configured zone.
    Local(NaiveDateTime),
    /// Midnight in the configured zone.
    Date(NaiveDate),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// `now`, a timestamp, RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
    Text(String),
    /// An offset from now.
    Offset(Duration),
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(date: DateTime<FixedOffset>) -> Self {
        DateInput::DateTime(date)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(date: DateTime<Utc>) -> Self {
        DateInput::DateTime(date.into())
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(date: NaiveDateTime) -> Self {
        DateInput::Local(date)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<i64> for DateInput {
    fn from(timestamp: i64) -> Self {
        DateInput::Timestamp(timestamp)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.into())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<Duration> for DateInput {
    fn from(offset: Duration) -> Self {
        DateInput::Offset(offset)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(date: Option<T>) -> Self {
        date.map(T::into).unwrap_or(DateInput::Absent)
    }
}

/// The zone a date is shown in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Zone {
    /// The configured zone.
    #[default]
    Default,
    /// The date's own zone. Times are not shown by the locale formats and
    /// the `datetime` attribute holds only the date.
    Skip,
    Fixed(FixedOffset),
}

impl From<bool> for Zone {
    fn from(convert: bool) -> Self {
        match convert {
            true => Zone::Default,
            false => Zone::Skip,
        }
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(zone: &str) -> Result<Self, Self::Err> {
        parse_offset(zone).map(Zone::Fixed)
    }
}

/// The size of a locale date or time format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormatSize {
    Omit,
    Full,
    Long,
    Medium,
    Short,
}

impl FormatSize {
    fn date_pattern(self) -> Option<&'static str> {
        match self {
            FormatSize::Omit => None,
            FormatSize::Full => Some("%A, %B %-d, %Y"),
            FormatSize::Long => Some("%B %-d, %Y"),
            FormatSize::Medium => Some("%b %-d, %Y"),
            FormatSize::Short => Some("%-m/%-d/%y"),
        }
    }

    fn time_pattern(self) -> Option<&'static str> {
        match self {
            FormatSize::Omit => None,
            FormatSize::Full | FormatSize::Long => Some("%-I:%M:%S %p GMT%:z"),
            FormatSize::Medium => Some("%-I:%M:%S %p"),
            FormatSize::Short => Some("%-I:%M %p"),
        }
    }
}

/// `true` is [`FormatSize::Long`], `false` is [`FormatSize::Omit`].
impl From<bool> for FormatSize {
    fn from(show: bool) -> Self {
        match show {
            true => FormatSize::Long,
            false => FormatSize::Omit,
        }
    }
}

impl FromStr for FormatSize {
    type Err = Error;

    fn from_str(size: &str) -> Result<Self, Self::Err> {
        match size {
            "none" => Ok(FormatSize::Omit),
            "full" => Ok(FormatSize::Full),
            "long" => Ok(FormatSize::Long),
            "medium" => Ok(FormatSize::Medium),
            "short" => Ok(FormatSize::Short),
            _ => err!(InvalidArgument: "invalid locale format size", "size" => size),
        }
    }
}

fn strftime(pattern: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<_> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return err!(InvalidArgument: "invalid date format", "format" => pattern);
    }

    Ok(items)
}

fn render(date: &DateTime<FixedOffset>, pattern: &str) -> Result<String> {
    let items = strftime(pattern)?;
    let mut out = String::new();
    write!(out, "{}", date.format_with_items(items.iter()))
        .map_err(|_| error! {
            InvalidArgument: "date cannot be written in this format",
            "format" => pattern,
            "date" => date.to_rfc3339(),
        })?;

    Ok(out)
}

/// Formats dates into `<time>` elements.
///
/// Every operation returns `Ok(None)` for an absent date.
///
/// ```rust
/// use tagged::{Factory, Markup, config::Config};
///
/// let config = Config::from_toml(r#"now = "2024-03-01T12:00:00Z""#).unwrap();
/// let html = Factory::with_config(config).unwrap();
/// let mut el = html.time().unwrap().date("now", true).unwrap().unwrap();
/// assert_eq!(el.render().unwrap(), r#"<time datetime="2024-03-01">Mar 1, 2024</time>"#);
/// ```
#[derive(Debug, Clone)]
pub struct Time {
    zone: FixedOffset,
    now: Option<DateTime<FixedOffset>>,
}

macro_rules! locale_formats {
    ($($name:ident => ($date:ident, $time:ident)),* $(,)?) => {
        $(
            pub fn $name<D, Z>(&self, date: D, zone: Z) -> Result<Option<Element>>
                where D: Into<DateInput>, Z: Into<Zone>
            {
                self.locale(date, FormatSize::$date, FormatSize::$time, zone)
            }
        )*
    };
}

macro_rules! interval_formats {
    ($($name:ident => ($direction:ident, short: $short:expr, absolute: $absolute:expr)),* $(,)?) => {
        $(
            pub fn $name<D>(&self, date: D, positive: Option<bool>, parts: Option<usize>)
                -> Result<Option<Element>>
                where D: Into<DateInput>
            {
                let humanizer = Humanizer::new($short, parts)?;
                self.interval(date.into(), Direction::$direction, humanizer, $absolute, positive)
            }
        )*
    };
}

impl Time {
    pub fn new(config: &Config) -> Result<Time> {
        Ok(Time { zone: config.zone()?, now: config.now })
    }

    /// The configured zone.
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// The current time in the configured zone, unless the clock is frozen.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now.unwrap_or_else(|| Utc::now().with_timezone(&self.zone))
    }

    /// Resolves `date` to an instant.
    pub fn normalize<D: Into<DateInput>>(&self, date: D) -> Result<Option<DateTime<FixedOffset>>> {
        let date = match date.into() {
            DateInput::Absent => return Ok(None),
            DateInput::Now => self.now(),
            DateInput::DateTime(date) => date,
            DateInput::Local(date) => self.localize(date)?,
            DateInput::Date(date) => self.localize(date.and_time(NaiveTime::MIN))?,
            DateInput::Timestamp(timestamp) => self.from_timestamp(timestamp)?,
            DateInput::Text(text) => self.parse(&text)?,
            DateInput::Offset(offset) => self.now().checked_add_signed(offset)
                .ok_or_else(|| error!(InvalidArgument: "date offset out of range", "offset" => offset))?,
        };

        Ok(Some(date))
    }

    fn localize(&self, date: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        self.zone.from_local_datetime(&date)
            .single()
            .ok_or_else(|| error!(InvalidArgument: "ambiguous local date", "date" => date))
    }

    fn from_timestamp(&self, timestamp: i64) -> Result<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map(|date| date.with_timezone(&self.zone))
            .ok_or_else(|| error!(InvalidArgument: "timestamp out of range", "timestamp" => timestamp))
    }

    fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("now") {
            return Ok(self.now());
        }

        if let Ok(timestamp) = text.parse::<i64>() {
            return self.from_timestamp(timestamp);
        }

        if let Ok(date) = DateTime::parse_from_rfc3339(text) {
            return Ok(date);
        }

        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
                return self.localize(date);
            }
        }

        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .chain(error!(InvalidArgument: "unrecognised date", "date" => text))?;

        self.localize(date.and_time(NaiveTime::MIN))
    }

    fn prepare<D: Into<DateInput>>(&self, date: D, zone: Zone) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(date) = self.normalize(date)? else {
            return Ok(None);
        };

        Ok(Some(match zone {
            Zone::Default => date.with_timezone(&self.zone),
            Zone::Skip => date,
            Zone::Fixed(offset) => date.with_timezone(&offset),
        }))
    }

    fn wrap(&self, datetime: String, text: String, title: Option<String>) -> Result<Element> {
        let mut time = Element::create("time", text, attrs! { "datetime" => datetime })?;
        if let Some(title) = title {
            time.set_title(title);
        }

        Ok(time)
    }

    /// Formats `date` with a `strftime` pattern.
    pub fn format<D, Z>(&self, date: D, pattern: &str, zone: Z) -> Result<Option<Element>>
        where D: Into<DateInput>, Z: Into<Zone>
    {
        let zone = zone.into();
        strftime(pattern)?;
        let Some(date) = self.prepare(date, zone)? else {
            return Ok(None);
        };

        let datetime = render(&date, if zone == Zone::Skip { W3C_DATE } else { W3C })?;
        self.wrap(datetime, render(&date, pattern)?, None).map(Some)
    }

    /// Formats `date`, in its own zone, with a `strftime` pattern.
    pub fn format_date<D: Into<DateInput>>(&self, date: D, pattern: &str) -> Result<Option<Element>> {
        strftime(pattern)?;
        let Some(date) = self.prepare(date, Zone::Skip)? else {
            return Ok(None);
        };

        self.wrap(render(&date, W3C_DATE)?, render(&date, pattern)?, None).map(Some)
    }

    /// Formats `date` with the English locale formats of the given sizes.
    /// Yields no element when neither a date nor a time is to be shown.
    ///
    /// ```rust
    /// use tagged::{Factory, Markup, plugins::FormatSize};
    ///
    /// let html = Factory::new();
    /// let time = html.time().unwrap();
    /// let size: FormatSize = "full".parse().unwrap();
    /// let mut el = time.locale("2024-03-01", size, false, true).unwrap().unwrap();
    /// assert_eq!(el.render().unwrap(), r#"<time datetime="2024-03-01">Friday, March 1, 2024</time>"#);
    /// assert!(time.locale("2024-03-01", false, false, true).unwrap().is_none());
    /// ```
    pub fn locale<D, S, T, Z>(&self, date: D, date_size: S, time_size: T, zone: Z) -> Result<Option<Element>>
        where D: Into<DateInput>, S: Into<FormatSize>, T: Into<FormatSize>, Z: Into<Zone>
    {
        let (date_size, zone) = (date_size.into(), zone.into());
        let time_size = match zone {
            Zone::Skip => FormatSize::Omit,
            _ => time_size.into(),
        };

        let datetime = match (date_size != FormatSize::Omit, time_size != FormatSize::Omit) {
            (true, true) => W3C,
            (true, false) => W3C_DATE,
            (false, true) => W3C_TIME,
            (false, false) => return Ok(None),
        };

        let Some(date) = self.prepare(date, zone)? else {
            return Ok(None);
        };

        let text = locale_text(&date, date_size, time_size)?;
        self.wrap(render(&date, datetime)?, text, None).map(Some)
    }

    locale_formats! {
        full_date_time => (Full, Full),
        full_date => (Full, Omit),
        full_time => (Omit, Full),
        long_date_time => (Long, Long),
        long_date => (Long, Omit),
        long_time => (Omit, Long),
        medium_date_time => (Medium, Medium),
        medium_date => (Medium, Omit),
        medium_time => (Omit, Medium),
        short_date_time => (Short, Short),
        short_date => (Short, Omit),
        short_time => (Omit, Short),
        date_time => (Medium, Medium),
        date => (Medium, Omit),
        time => (Omit, Short),
    }

    interval_formats! {
        since => (Since, short: false, absolute: false),
        since_abs => (Since, short: false, absolute: true),
        since_abbr => (Since, short: true, absolute: true),
        until => (Until, short: false, absolute: false),
        until_abs => (Until, short: false, absolute: true),
        until_abbr => (Until, short: true, absolute: true),
    }

    fn interval(
        &self,
        date: DateInput,
        direction: Direction,
        humanizer: Humanizer,
        absolute: bool,
        positive: Option<bool>,
    ) -> Result<Option<Element>> {
        let Some(date) = self.normalize(date)? else {
            return Ok(None);
        };

        let now = self.now();
        let future = date > now;
        let absolute = absolute || (direction == Direction::Until && future);
        let syntax = match absolute {
            true => Syntax::Absolute,
            false => Syntax::Relative { future },
        };

        let sign = if absolute && is_inverted(direction, future) { "-" } else { "" };
        let text = format!("{sign}{}", humanizer.humanize(date - now, syntax));
        let title = locale_text(&date, FormatSize::Long, FormatSize::Long)?;

        let mut time = self.wrap(render(&date, W3C)?, text, Some(title))?;
        time.add_class(if future { "future" } else { "past" });
        if let Some(positive) = positive {
            time.add_class(polarity_classes(direction, future, positive));
        }

        Ok(Some(time))
    }

    /// The signed span from `from` to `to` as a `span.interval`, classed
    /// `negative` when `to` precedes `from` and `positive` otherwise.
    pub fn between<A, B>(&self, from: A, to: B, parts: Option<usize>) -> Result<Option<Element>>
        where A: Into<DateInput>, B: Into<DateInput>
    {
        self.span(from.into(), to.into(), Humanizer::new(false, parts)?)
    }

    /// Like [`Time::between()`] with abbreviated units.
    pub fn between_abbr<A, B>(&self, from: A, to: B, parts: Option<usize>) -> Result<Option<Element>>
        where A: Into<DateInput>, B: Into<DateInput>
    {
        self.span(from.into(), to.into(), Humanizer::new(true, parts)?)
    }

    fn span(&self, from: DateInput, to: DateInput, humanizer: Humanizer) -> Result<Option<Element>> {
        let Some(from) = self.normalize(from)? else {
            return Ok(None);
        };

        let Some(to) = self.normalize(to)? else {
            return Ok(None);
        };

        let negative = to < from;
        let sign = if negative { "-" } else { "" };
        let text = format!("{sign}{}", humanizer.humanize(to - from, Syntax::Absolute));
        let mut span = Element::new("span.interval", text)?;
        span.add_class(if negative { "negative" } else { "positive" });
        Ok(Some(span))
    }
}

fn locale_text(date: &DateTime<FixedOffset>, date_size: FormatSize, time_size: FormatSize) -> Result<String> {
    let pattern = match (date_size.date_pattern(), time_size.time_pattern()) {
        (Some(date), Some(time)) => match date_size {
            FormatSize::Full | FormatSize::Long => format!("{date} at {time}"),
            _ => format!("{date}, {time}"),
        },
        (Some(pattern), None) | (None, Some(pattern)) => pattern.to_string(),
        (None, None) => String::new(),
    };

    render(date, &pattern)
}
