//! Text transforms available to templates
//!
//! The pure transforms are registered as minijinja filters
//! (`{{ price|currency }}`, `{{ when|date("MMMM YYYY") }}`). The ones that
//! need the request (translation, base URL, submitted values) are reached
//! through [`MixinScope::lambda`](crate::MixinScope::lambda), which also
//! renders the argument as a template first.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::config::LambdaSettings;
use crate::error::MixinError;

/// Output of the `date` transform for unparsable input
pub const INVALID_DATE: &str = "Invalid date";

/// Named text transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lambda {
    /// Format a number as money
    Currency,
    /// Like [`Lambda::Currency`] but zero translates `free`
    CurrencyOrFree,
    /// Format an ISO date with a moment-style pattern
    Date,
    /// Humanise times in a sentence
    Time,
    /// Lowercase and join words with `-`
    Hyphenate,
    /// Uppercase
    Uppercase,
    /// Lowercase
    Lowercase,
    /// Uppercase the first character
    Capscase,
    /// Translate a key
    Translate,
    /// Resolve a path against the request base URL
    Url,
    /// ` checked="checked"` when a submitted value matches
    Selected,
}

impl Lambda {
    /// Every transform
    pub const ALL: [Self; 11] = [
        Self::Currency,
        Self::CurrencyOrFree,
        Self::Date,
        Self::Time,
        Self::Hyphenate,
        Self::Uppercase,
        Self::Lowercase,
        Self::Capscase,
        Self::Translate,
        Self::Url,
        Self::Selected,
    ];

    /// Name the transform is invoked by
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::CurrencyOrFree => "currencyOrFree",
            Self::Date => "date",
            Self::Time => "time",
            Self::Hyphenate => "hyphenate",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Capscase => "capscase",
            Self::Translate => "t",
            Self::Url => "url",
            Self::Selected => "selected",
        }
    }
}

impl FromStr for Lambda {
    type Err = MixinError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lambda| lambda.name() == name)
            .ok_or_else(|| MixinError::UnknownLambda(name.to_string()))
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register the context-free transforms as template filters
pub fn register_filters(env: &mut Environment<'static>, settings: &LambdaSettings) {
    let symbol = settings.currency_symbol.clone();
    env.add_filter("currency", move |value: Value| currency(&value.to_string(), &symbol));

    let default_pattern = settings.date_format.clone();
    env.add_filter("date", move |value: Value, pattern: Option<String>| {
        format_date(
            &value.to_string(),
            pattern.as_deref().unwrap_or(&default_pattern),
        )
    });

    let default_options = settings.time_options.clone();
    env.add_filter("time", move |value: Value, options: Option<String>| {
        time(
            &value.to_string(),
            options.as_deref().unwrap_or(&default_options),
        )
    });

    env.add_filter("hyphenate", |value: Value| hyphenate(&value.to_string()));
    env.add_filter("uppercase", |value: Value| value.to_string().to_uppercase());
    env.add_filter("lowercase", |value: Value| value.to_string().to_lowercase());
    env.add_filter("capscase", |value: Value| capscase(&value.to_string()));
}

/// Split `"value|option"` into its value and non-empty option
#[must_use]
pub fn split_argument(text: &str) -> (&str, Option<&str>) {
    let mut parts = text.split('|');
    let value = parts.next().unwrap_or_default();
    let option = parts.next().filter(|option| !option.is_empty());
    (value, option)
}

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
        .expect("Invalid regex")
});

/// Leading decimal number of `text`, ignoring trailing garbage
#[must_use]
pub fn parse_leading_float(text: &str) -> Option<f64> {
    FLOAT_PREFIX
        .find(text)
        .and_then(|number| number.as_str().trim().parse().ok())
}

/// Whether `text` starts with a number equal to zero
#[must_use]
pub fn is_zero(text: &str) -> bool {
    parse_leading_float(text).is_some_and(|value| value == 0.0)
}

/// Format money: whole amounts without decimals, others to two places
///
/// Text that does not start with a number is returned unchanged.
#[must_use]
pub fn currency(text: &str, symbol: &str) -> String {
    match parse_leading_float(text) {
        None => text.to_string(),
        Some(value) if value.fract() == 0.0 => format!("{symbol}{value}"),
        Some(value) => format!("{symbol}{value:.2}"),
    }
}

/// Lowercase, trim and join whitespace separated words with `-`
#[must_use]
pub fn hyphenate(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase the first character only
#[must_use]
pub fn capscase(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

static MIDNIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)12:00am").expect("Invalid regex"));
static LEADING_MIDNIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^midnight").expect("Invalid regex"));
static MIDDAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)12:00pm").expect("Invalid regex"));
static LEADING_MIDDAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^midday").expect("Invalid regex"));
static ON_THE_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i):00(am|pm)").expect("Invalid regex"));
static OPTION_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").expect("Invalid regex"));

/// Humanise times inside a sentence
///
/// `options` is a comma separated subset of `short`, `midnight` and
/// `midday`.
#[must_use]
pub fn time(text: &str, options: &str) -> String {
    let options: HashSet<&str> = OPTION_SEPARATOR.split(options).collect();
    let mut value = text.to_string();

    if options.contains("midnight") {
        value = MIDNIGHT.replace_all(&value, "midnight").into_owned();
        value = LEADING_MIDNIGHT.replace(&value, "Midnight").into_owned();
    }
    if options.contains("midday") {
        value = MIDDAY.replace_all(&value, "midday").into_owned();
        value = LEADING_MIDDAY.replace(&value, "Midday").into_owned();
    }
    if options.contains("short") {
        value = ON_THE_HOUR.replace_all(&value, "${1}").into_owned();
    }
    value
}

/// Resolve `url` against `base` with POSIX path rules
///
/// Without a base the URL is returned unchanged.
#[must_use]
pub fn resolve_url(base: Option<&str>, url: &str) -> String {
    let Some(base) = base.filter(|base| !base.is_empty()) else {
        return url.to_string();
    };
    let joined = if url.starts_with('/') {
        url.to_string()
    } else {
        format!("{base}/{url}")
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let path = segments.join("/");
    if joined.starts_with('/') {
        format!("/{path}")
    } else {
        path
    }
}

static PARTIAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{1,2}))?$").expect("Invalid regex"));

/// Parse a full or partial ISO 8601 date or datetime
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    let captures = PARTIAL_DATE.captures(value)?;
    let year = captures[1].parse().ok()?;
    let month = captures.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

/// Format a date string with a moment-style pattern
///
/// Supported tokens: `YYYY YY MMMM MMM MM M DD Do D dddd ddd HH H hh h mm m
/// ss s A a`; text in `[brackets]` is copied literally.
#[must_use]
pub fn format_date(value: &str, pattern: &str) -> String {
    parse_date(value).map_or_else(|| INVALID_DATE.to_string(), |dt| format_moment(&dt, pattern))
}

const TOKENS: [&str; 21] = [
    "YYYY", "YY", "MMMM", "MMM", "MM", "M", "DD", "Do", "D", "dddd", "ddd", "HH", "H", "hh", "h",
    "mm", "m", "ss", "s", "A", "a",
];

fn format_moment(dt: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        if let Some(token) = TOKENS.iter().find(|token| rest.starts_with(**token)) {
            out.push_str(&token_value(dt, token));
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn token_value(dt: &NaiveDateTime, token: &str) -> String {
    let (pm, hour12) = dt.hour12();
    match token {
        "YYYY" => format!("{:04}", dt.year()),
        "YY" => format!("{:02}", dt.year().rem_euclid(100)),
        "MMMM" => dt.format("%B").to_string(),
        "MMM" => dt.format("%b").to_string(),
        "MM" => format!("{:02}", dt.month()),
        "M" => dt.month().to_string(),
        "DD" => format!("{:02}", dt.day()),
        "Do" => ordinal(dt.day()),
        "D" => dt.day().to_string(),
        "dddd" => dt.format("%A").to_string(),
        "ddd" => dt.format("%a").to_string(),
        "HH" => format!("{:02}", dt.hour()),
        "H" => dt.hour().to_string(),
        "hh" => format!("{hour12:02}"),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", dt.minute()),
        "m" => dt.minute().to_string(),
        "ss" => format!("{:02}", dt.second()),
        "s" => dt.second().to_string(),
        "A" => (if pm { "PM" } else { "AM" }).to_string(),
        "a" => (if pm { "pm" } else { "am" }).to_string(),
        other => other.to_string(),
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambda_names_round_trip() {
        for lambda in Lambda::ALL {
            assert_eq!(lambda.name().parse::<Lambda>().unwrap(), lambda);
        }
        assert!(matches!("nope".parse::<Lambda>(), Err(MixinError::UnknownLambda(_))));
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency("3.00", "£"), "£3");
        assert_eq!(currency("3.50", "£"), "£3.50");
        assert_eq!(currency("3.567", "£"), "£3.57");
        assert_eq!(currency("4.5678", "£"), "£4.57");
        assert_eq!(currency("abc", "£"), "abc");
        assert_eq!(currency("", "£"), "");
        assert_eq!(currency("3.00", "$"), "$3");
    }

    #[test]
    fn test_currency_reads_leading_number() {
        assert_eq!(currency("12.5 per month", "£"), "£12.50");
        assert_eq!(parse_leading_float("  .5"), Some(0.5));
        assert_eq!(parse_leading_float("£3"), None);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero("0"));
        assert!(is_zero("0.00"));
        assert!(!is_zero("0.01"));
        assert!(!is_zero("free"));
    }

    #[test]
    fn test_hyphenate() {
        assert_eq!(hyphenate("apple blackberry"), "apple-blackberry");
        assert_eq!(hyphenate(" Apple  Blackberry   Cherry "), "apple-blackberry-cherry");
    }

    #[test]
    fn test_capscase() {
        assert_eq!(capscase("abc def"), "Abc def");
        assert_eq!(capscase("abc DEF"), "Abc DEF");
        assert_eq!(capscase(""), "");
    }

    #[test]
    fn test_time() {
        let all = "short,midnight,midday";
        assert_eq!(time("26 March 2015 12:00am", all), "26 March 2015 midnight");
        assert_eq!(time("26 March 2015 12:00pm", all), "26 March 2015 midday");
        assert_eq!(time("12:00am 26 March 2015", all), "Midnight 26 March 2015");
        assert_eq!(time("12:00pm 26 March 2015", all), "Midday 26 March 2015");
        assert_eq!(time("26 March 2015 4:00pm", all), "26 March 2015 4pm");
        assert_eq!(time("6:30am 26 March 2015", all), "6:30am 26 March 2015");
    }

    #[test]
    fn test_time_options() {
        assert_eq!(time("26 March 2015 12:00pm", "short"), "26 March 2015 12pm");
        assert_eq!(time("26 March 2015 12:00am", "short, midday"), "26 March 2015 12am");
        assert_eq!(time("26 March 2015 12:00pm", "none"), "26 March 2015 12:00pm");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2015-03-26", "D MMMM YYYY"), "26 March 2015");
        assert_eq!(format_date("2015-03", "MMMM YYYY"), "March 2015");
        assert_eq!(format_date("2015", "D MMM YY"), "1 Jan 15");
        assert_eq!(format_date("2015-03-26T14:05:09Z", "DD/MM/YYYY HH:mm:ss"), "26/03/2015 14:05:09");
        assert_eq!(format_date("2015-03-26T14:05", "h:mma"), "2:05pm");
        assert_eq!(format_date("2015-03-01", "dddd Do [of] MMMM"), "Sunday 1st of March");
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(format_date("", "D MMMM YYYY"), INVALID_DATE);
        assert_eq!(format_date("not a date", "D MMMM YYYY"), INVALID_DATE);
        assert_eq!(format_date("2015-02-30", "D MMMM YYYY"), INVALID_DATE);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url(Some("/base"), "./path"), "/base/path");
        assert_eq!(resolve_url(Some("/base"), "path"), "/base/path");
        assert_eq!(resolve_url(Some("/base"), "/path"), "/path");
        assert_eq!(resolve_url(Some("/base/sub"), "../path"), "/base/path");
        assert_eq!(resolve_url(None, "./path"), "./path");
    }

    #[test]
    fn test_split_argument() {
        assert_eq!(split_argument("2015-03|MMMM YYYY"), ("2015-03", Some("MMMM YYYY")));
        assert_eq!(split_argument("2015-03"), ("2015-03", None));
        assert_eq!(split_argument("2015-03|"), ("2015-03", None));
    }

    #[test]
    fn test_filters_render_in_templates() {
        let mut env = Environment::new();
        register_filters(&mut env, &LambdaSettings::default());
        let out = env
            .render_str(
                "{{ price|currency }} {{ when|date('MMMM YYYY') }} {{ name|capscase }}",
                minijinja::context! { price => "3.00", when => "2015-03-26", name => "ada" },
            )
            .unwrap();
        assert_eq!(out, "£3 March 2015 Ada");
    }
}
