//! Locale-aware formatting helpers.
//!
//! Everything here is formatted through ICU4X and never fails on a bad
//! language tag: list formatting falls back to a comma-separated join,
//! durations and relative times to a compact notation (`1h 30m`, `in 2mo`),
//! and display names to the code itself.

use chrono::{DateTime, Datelike, Months, Utc};
use fixed_decimal::Decimal;
use icu_experimental::displaynames::DisplayNamesOptions;
use icu_experimental::displaynames::multi::LocaleDisplayNamesFormatter;
use icu_experimental::duration::options::{BaseStyle, DurationFormatterOptions};
use icu_experimental::duration::{Duration, DurationFormatter, ValidatedDurationFormatterOptions};
use icu_experimental::relativetime::options::Numeric;
use icu_experimental::relativetime::{RelativeTimeFormatter, RelativeTimeFormatterOptions};
use icu_list::ListFormatter;
use icu_list::options::{ListFormatterOptions, ListLength};
use icu_locale::Locale;
use tracing::debug;
use writeable::Writeable;

use crate::error::{I18nError, I18nResult};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

fn parse_locale(language: &str) -> I18nResult<Locale> {
    language
        .parse()
        .map_err(|e| I18nError::Format(format!("Failed to parse locale '{}': {}", language, e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    /// "A, B, and C"
    #[default]
    Conjunction,
    /// "A, B, or C"
    Disjunction,
    /// "A, B, C"
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// "A, B, and C"
    #[default]
    Long,
    /// "A, B, & C"
    Short,
    /// "A, B, C"
    Narrow,
}

/// Join `items` the way `language` writes lists.
///
/// # Example
///
/// ```
/// use trellis_i18n::intl::{ListStyle, ListType, format_list};
///
/// let fruit = ["apple", "banana", "cherry"];
/// assert_eq!(
///     format_list(&fruit, "en-US", ListType::Conjunction, ListStyle::Long),
///     "apple, banana, and cherry"
/// );
/// ```
pub fn format_list<S: AsRef<str>>(
    items: &[S],
    language: &str,
    list_type: ListType,
    style: ListStyle,
) -> String {
    match list_formatter(language, list_type, style) {
        Ok(formatter) => formatter
            .format(items.iter().map(|item| item.as_ref()))
            .to_string(),
        Err(e) => {
            debug!(language, error = %e, "list formatting unavailable, joining with commas");
            items
                .iter()
                .map(|item| item.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

fn list_formatter(language: &str, list_type: ListType, style: ListStyle) -> I18nResult<ListFormatter> {
    let locale = parse_locale(language)?;

    let length = match style {
        ListStyle::Long => ListLength::Wide,
        ListStyle::Short => ListLength::Short,
        ListStyle::Narrow => ListLength::Narrow,
    };
    let options = ListFormatterOptions::default().with_length(length);

    let formatter = match list_type {
        ListType::Conjunction => ListFormatter::try_new_and(locale.into(), options),
        ListType::Disjunction => ListFormatter::try_new_or(locale.into(), options),
        ListType::Unit => ListFormatter::try_new_unit(locale.into(), options),
    };

    formatter.map_err(|e| {
        I18nError::Format(format!(
            "Failed to create ListFormatter for locale '{}': {}",
            language, e
        ))
    })
}

/// The name of `language` written in `to_language`: `zh-Hans` in `en-US`
/// is "Chinese (Simplified)". Returns `language` unchanged when either tag
/// is malformed or no name is available.
///
/// # Example
///
/// ```
/// use trellis_i18n::intl::language_display_name;
///
/// assert_eq!(language_display_name("fr", "en"), "French");
/// assert_eq!(language_display_name("!!", "en"), "!!");
/// ```
pub fn language_display_name(language: &str, to_language: &str) -> String {
    match display_name(language, to_language) {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => language.to_string(),
        Err(e) => {
            debug!(language, to_language, error = %e, "display name unavailable");
            language.to_string()
        }
    }
}

fn display_name(language: &str, to_language: &str) -> I18nResult<String> {
    let target = parse_locale(language)?;
    let display = parse_locale(to_language)?;

    let formatter = LocaleDisplayNamesFormatter::try_new(display.into(), DisplayNamesOptions::default())
        .map_err(|e| {
            I18nError::Format(format!(
                "Failed to create display names for locale '{}': {:?}",
                to_language, e
            ))
        })?;

    Ok(formatter.of(&target).to_string())
}

/// The components of a duration. Zero components are omitted when
/// formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
    pub microseconds: u64,
    pub nanoseconds: u64,
}

impl DurationParts {
    fn units(&self) -> [(u64, &'static str); 10] {
        [
            (self.years, "y"),
            (self.months, "mo"),
            (self.weeks, "w"),
            (self.days, "d"),
            (self.hours, "h"),
            (self.minutes, "m"),
            (self.seconds, "s"),
            (self.milliseconds, "ms"),
            (self.microseconds, "µs"),
            (self.nanoseconds, "ns"),
        ]
    }

    /// Sub-second units with whole seconds moved into `seconds`, so at most
    /// 999 ms, 999 µs and 999 ns remain.
    pub fn carry_seconds(&self) -> DurationParts {
        let fraction = self
            .milliseconds
            .saturating_mul(1_000_000)
            .saturating_add(self.microseconds.saturating_mul(1_000))
            .saturating_add(self.nanoseconds);

        DurationParts {
            seconds: self.seconds.saturating_add(fraction / NANOS_PER_SECOND),
            milliseconds: fraction % NANOS_PER_SECOND / 1_000_000,
            microseconds: fraction % 1_000_000 / 1_000,
            nanoseconds: fraction % 1_000,
            ..*self
        }
    }

    fn to_icu(self) -> Duration {
        Duration {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            milliseconds: self.milliseconds,
            microseconds: self.microseconds,
            nanoseconds: self.nanoseconds,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationStyle {
    /// `1h 5m 9s`
    #[default]
    Narrow,
    /// `1:05:09`
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationOptions {
    pub style: DurationStyle,
    /// Pad minutes and seconds to two digits in the narrow style. Padded
    /// output always uses the compact notation.
    pub pad_zero: bool,
}

/// Format a duration the way `language` writes it.
///
/// Digital output carries sub-second units into the seconds field first,
/// so 1500 ms is `0:00:01.5`.
///
/// # Example
///
/// ```
/// use trellis_i18n::intl::{DurationOptions, DurationParts, DurationStyle, format_duration};
///
/// let duration = DurationParts { hours: 1, minutes: 5, seconds: 9, ..Default::default() };
/// assert_eq!(format_duration(&duration, "en", &DurationOptions::default()), "1h 5m 9s");
///
/// let digital = DurationOptions { style: DurationStyle::Digital, ..Default::default() };
/// assert_eq!(format_duration(&duration, "en", &digital), "1:05:09");
/// ```
pub fn format_duration(duration: &DurationParts, language: &str, options: &DurationOptions) -> String {
    let duration = match options.style {
        DurationStyle::Narrow => *duration,
        DurationStyle::Digital => duration.carry_seconds(),
    };

    if !(options.pad_zero && options.style == DurationStyle::Narrow) {
        match duration_formatter(language, options.style) {
            Ok(formatter) => {
                let formatted = formatter.format(&duration.to_icu()).write_to_string().into_owned();
                if !formatted.is_empty() {
                    return formatted;
                }
            }
            Err(e) => debug!(language, error = %e, "duration formatting unavailable"),
        }
    }

    format_compact(&duration, options)
}

fn duration_formatter(language: &str, style: DurationStyle) -> I18nResult<DurationFormatter> {
    let locale = parse_locale(language)?;

    let mut options = DurationFormatterOptions::default();
    options.base = match style {
        DurationStyle::Narrow => BaseStyle::Narrow,
        DurationStyle::Digital => BaseStyle::Digital,
    };
    let options = ValidatedDurationFormatterOptions::validate(options)
        .map_err(|e| I18nError::Format(format!("Invalid duration options: {:?}", e)))?;

    DurationFormatter::try_new(locale.into(), options).map_err(|e| {
        I18nError::Format(format!(
            "Failed to create DurationFormatter for locale '{}': {:?}",
            language, e
        ))
    })
}

fn format_compact(duration: &DurationParts, options: &DurationOptions) -> String {
    match options.style {
        DurationStyle::Narrow => format_narrow(&duration.units(), options.pad_zero),
        DurationStyle::Digital => format_digital(&duration.carry_seconds()),
    }
}

fn format_narrow(units: &[(u64, &'static str)], pad_zero: bool) -> String {
    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| {
            if pad_zero && (*unit == "m" || *unit == "s") {
                format!("{:02}{}", value, unit)
            } else {
                format!("{}{}", value, unit)
            }
        })
        .collect();

    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}

// Expects sub-second units already carried into seconds.
fn format_digital(duration: &DurationParts) -> String {
    let units = duration.units();
    let mut result = String::new();

    // Calendar units keep the narrow form in front of the clock.
    let calendar: Vec<String> = units[..4]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();
    if !calendar.is_empty() {
        result.push_str(&calendar.join(" "));
        result.push(' ');
    }

    result.push_str(&format!(
        "{}:{:02}:{:02}",
        duration.hours, duration.minutes, duration.seconds
    ));

    let fraction = duration.milliseconds * 1_000_000 + duration.microseconds * 1_000 + duration.nanoseconds;
    if fraction > 0 {
        let digits = format!("{:09}", fraction);
        result.push('.');
        result.push_str(digits.trim_end_matches('0'));
    }

    result
}

/// A point in time given either as an RFC 3339 string or epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Iso(&'a str),
    EpochMillis(i64),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        DateInput::Iso(value)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(value: i64) -> Self {
        DateInput::EpochMillis(value)
    }
}

impl DateInput<'_> {
    pub fn to_utc(self) -> I18nResult<DateTime<Utc>> {
        match self {
            DateInput::Iso(value) => DateTime::parse_from_rfc3339(value)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|e| I18nError::Format(format!("Invalid date '{}': {}", value, e))),
            DateInput::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| I18nError::Format(format!("Timestamp out of range: {}", millis))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl RelativeUnit {
    fn suffix(self) -> &'static str {
        match self {
            RelativeUnit::Year => "y",
            RelativeUnit::Month => "mo",
            RelativeUnit::Day => "d",
            RelativeUnit::Hour => "h",
            RelativeUnit::Minute => "m",
            RelativeUnit::Second => "s",
        }
    }
}

/// A signed distance in its largest non-zero calendar unit. Positive values
/// are in the future.
///
/// `Display` gives the compact notation used when a language has no
/// relative time data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTime {
    pub value: i64,
    pub unit: RelativeUnit,
}

impl RelativeTime {
    /// Format in `language` with narrow units, using words such as
    /// "tomorrow" where the language has them.
    pub fn format(&self, language: &str) -> String {
        match relative_time_formatter(language, self.unit) {
            Ok(formatter) => formatter
                .format(Decimal::from(self.value))
                .write_to_string()
                .into_owned(),
            Err(e) => {
                debug!(language, error = %e, "relative time formatting unavailable");
                self.to_string()
            }
        }
    }
}

impl std::fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.value, self.unit) {
            (0, _) => write!(f, "now"),
            (1, RelativeUnit::Day) => write!(f, "tomorrow"),
            (-1, RelativeUnit::Day) => write!(f, "yesterday"),
            (value, unit) if value > 0 => write!(f, "in {}{}", value, unit.suffix()),
            (value, unit) => write!(f, "{}{} ago", value.unsigned_abs(), unit.suffix()),
        }
    }
}

fn relative_time_formatter(language: &str, unit: RelativeUnit) -> I18nResult<RelativeTimeFormatter> {
    let locale = parse_locale(language)?;

    let mut options = RelativeTimeFormatterOptions::default();
    options.numeric = Numeric::Auto;

    let formatter = match unit {
        RelativeUnit::Year => RelativeTimeFormatter::try_new_narrow_year(locale.into(), options),
        RelativeUnit::Month => RelativeTimeFormatter::try_new_narrow_month(locale.into(), options),
        RelativeUnit::Day => RelativeTimeFormatter::try_new_narrow_day(locale.into(), options),
        RelativeUnit::Hour => RelativeTimeFormatter::try_new_narrow_hour(locale.into(), options),
        RelativeUnit::Minute => RelativeTimeFormatter::try_new_narrow_minute(locale.into(), options),
        RelativeUnit::Second => RelativeTimeFormatter::try_new_narrow_second(locale.into(), options),
    };

    formatter.map_err(|e| {
        I18nError::Format(format!(
            "Failed to create RelativeTimeFormatter for locale '{}': {}",
            language, e
        ))
    })
}

/// The distance from `now` to `date`, in the largest calendar unit that is
/// not zero (years, months, days, hours, minutes, then seconds).
pub fn relative_time<'a>(date: impl Into<DateInput<'a>>, now: DateTime<Utc>) -> I18nResult<RelativeTime> {
    let date = date.into().to_utc()?;

    let (start, end, sign) = if date >= now {
        (now, date, 1)
    } else {
        (date, now, -1)
    };

    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    let anchor = loop {
        match shift_months(start, months) {
            Some(anchor) if anchor <= end => break anchor,
            _ if months > 0 => months -= 1,
            _ => break start,
        }
    };

    let rest = end - anchor;
    let components = [
        (months / 12, RelativeUnit::Year),
        (months % 12, RelativeUnit::Month),
        (rest.num_days(), RelativeUnit::Day),
        (rest.num_hours() % 24, RelativeUnit::Hour),
        (rest.num_minutes() % 60, RelativeUnit::Minute),
        (rest.num_seconds() % 60, RelativeUnit::Second),
    ];

    let (value, unit) = components
        .into_iter()
        .find(|(value, _)| *value != 0)
        .unwrap_or((0, RelativeUnit::Second));

    Ok(RelativeTime {
        value: sign * value,
        unit,
    })
}

fn shift_months(start: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let months = u32::try_from(months).ok()?;
    start.checked_add_months(Months::new(months))
}

/// Describe `date` relative to `now` in `language`.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use trellis_i18n::intl::format_relative_time;
///
/// let now: DateTime<Utc> = "2026-01-10T00:00:00Z".parse().unwrap();
/// assert_eq!(format_relative_time("2026-03-10T00:00:00Z", now, "en").unwrap(), "in 2mo");
/// ```
pub fn format_relative_time<'a>(
    date: impl Into<DateInput<'a>>,
    now: DateTime<Utc>,
    language: &str,
) -> I18nResult<String> {
    relative_time(date, now).map(|relative| relative.format(language))
}
