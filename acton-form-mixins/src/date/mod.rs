//! Date fields split into day, month and year inputs
//!
//! A field whose validators include `date` is submitted as three part fields
//! (`<key>-day`, `<key>-month`, `<key>-year`). [`DateController`] configures
//! those parts, joins them into a `YYYY-MM-DD` value, reports errors on the
//! whole date and splits stored values back into parts for redisplay.
//!
//! ```rust
//! use acton_form_mixins::date::DateController;
//! use acton_form_mixins::fields::{FieldConfig, FieldConfigs};
//! use acton_form_mixins::mixins::FormValues;
//! use serde_json::json;
//!
//! let mut fields = FieldConfigs::new();
//! fields.insert("dob".into(), FieldConfig::from_value(json!({ "validate": ["required", "date"] })).unwrap());
//! let dates = DateController::configure(&mut fields);
//!
//! let mut values: FormValues = [("dob-day", "7"), ("dob-month", "3"), ("dob-year", "1984")]
//!     .into_iter()
//!     .collect();
//! dates.process(&mut values, 2026);
//! assert_eq!(values.text("dob").as_deref(), Some("1984-03-07"));
//! ```

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{ClassNames, FieldConfig, FieldConfigs, Validator};
use crate::mixins::FormValues;
use crate::validation::{ErrorEntry, ErrorMap};

/// Date parts in validation order
pub const DATE_PARTS: [&str; 3] = ["year", "month", "day"];

static SINGLE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("Invalid regex"));
static TWO_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}$").expect("Invalid regex"));

/// One configured date field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    /// Key of the composite value
    pub key: String,
    /// Month and year only
    pub inexact: bool,
    /// Shift of the two-digit year century split
    pub offset: i32,
}

impl DateField {
    /// Key of one part, e.g. `dob-month`
    #[must_use]
    pub fn part_key(&self, part: &str) -> String {
        format!("{}-{part}", self.key)
    }

    fn raw_key(&self, part: &str) -> String {
        format!("{}-{part}-raw", self.key)
    }
}

/// Processes the date fields of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateController {
    fields: Vec<DateField>,
}

impl DateController {
    /// Find the date fields and configure their part fields
    ///
    /// Existing part configuration is kept; part validators are prefixed
    /// with `numeric`, `date-<part>` and, for required dates, `required`.
    pub fn configure(fields: &mut FieldConfigs) -> Self {
        let dates: Vec<DateField> = fields
            .iter()
            .filter(|(_, config)| config.has_validator("date"))
            .map(|(key, config)| DateField {
                key: key.clone(),
                inexact: config.inexact == Some(true),
                offset: config.offset.unwrap_or_default(),
            })
            .collect();

        for date in &dates {
            let required = fields
                .get(&date.key)
                .is_some_and(|config| config.has_validator("required"));
            for part in DATE_PARTS {
                let key = date.part_key(part);
                let existing = fields.remove(&key).unwrap_or_default();
                fields.insert(key, part_config(&date.key, part, required, existing));
            }
            tracing::debug!(key = %date.key, inexact = date.inexact, "configured date field");
        }

        Self { fields: dates }
    }

    /// Configured date fields
    #[must_use]
    pub fn fields(&self) -> &[DateField] {
        &self.fields
    }

    /// Split stored `YYYY-MM-DD` values into their parts
    ///
    /// Raw part values saved by [`DateController::process`] win, so a
    /// rejected submission is shown as typed.
    pub fn split_values(&self, values: &mut FormValues) {
        for date in &self.fields {
            let Some(stored) = values.text(&date.key).filter(|v| !v.is_empty()) else {
                continue;
            };
            let mut pieces = stored.split('-');
            let year = pieces.next().unwrap_or_default().to_string();
            let month = pieces.next().unwrap_or_default().to_string();
            let day = pieces.next().unwrap_or_default().to_string();

            for (part, piece) in [("day", day), ("month", month), ("year", year)] {
                let value = values
                    .text(&date.raw_key(part))
                    .filter(|raw| !raw.is_empty())
                    .unwrap_or(piece);
                values.insert(date.part_key(part), value);
            }
        }
    }

    /// Join submitted parts into each date's `YYYY-MM-DD` value
    ///
    /// Raw parts are kept under `<part key>-raw`. Two-digit years below or
    /// at `current_year - 2000 + offset` are read as 20xx, others as 19xx.
    pub fn process(&self, values: &mut FormValues, current_year: i32) {
        for date in &self.fields {
            let day_key = date.part_key("day");
            let month_key = date.part_key("month");
            let year_key = date.part_key("year");

            let day = values.text(&day_key).unwrap_or_default();
            let month = values.text(&month_key).unwrap_or_default();
            let year = values.text(&year_key).unwrap_or_default();

            values.insert(date.raw_key("day"), day.clone());
            values.insert(date.raw_key("month"), month.clone());
            values.insert(date.raw_key("year"), year.clone());

            let day = if date.inexact {
                "01".to_string()
            } else {
                pad_day_month(&day)
            };
            let month = pad_day_month(&month);
            let year = pad_year(&year, current_year - 2000 + date.offset);

            let composite = format!("{year}-{month}-{day}");
            let empty = composite == "--" || (date.inexact && composite == "--01");

            values.insert(day_key, day);
            values.insert(month_key, month);
            values.insert(year_key, year);
            values.insert(
                date.key.clone(),
                if empty { String::new() } else { composite },
            );
            tracing::trace!(key = %date.key, "processed date value");
        }
    }

    /// [`DateController::process`] against today's year
    pub fn process_now(&self, values: &mut FormValues) {
        self.process(values, chrono::Local::now().year());
    }

    /// Add whole-date errors
    ///
    /// When every error in a date's group is `numeric` a single
    /// `date-numeric[-year][-month][-day]` error replaces them on the date.
    /// Otherwise an impossible date is reported on the date and on the part
    /// that makes it impossible.
    pub fn validate(&self, values: &FormValues, errors: &mut ErrorMap) {
        for date in &self.fields {
            let Some(value) = values.text(&date.key).filter(|v| !v.is_empty()) else {
                continue;
            };

            let group: Vec<&ErrorEntry> = errors
                .values()
                .filter(|error| error.error_group.as_deref() == Some(date.key.as_str()))
                .collect();
            if !group.is_empty() && group.iter().all(|error| error.kind == "numeric") {
                let mut kind = String::from("date-numeric");
                for part in DATE_PARTS {
                    if errors.contains_key(&date.part_key(part)) {
                        kind.push('-');
                        kind.push_str(part);
                    }
                }
                errors.insert(
                    date.key.clone(),
                    ErrorEntry::new(&date.key, kind).in_group(&date.key),
                );
                continue;
            }

            if let Some(part) = invalid_part(&value) {
                let kind = format!("date-{part}");
                let part_key = date.part_key(part);
                tracing::debug!(key = %date.key, part, "invalid date");
                errors.insert(
                    date.key.clone(),
                    ErrorEntry::new(&date.key, &kind).in_group(&date.key),
                );
                errors.insert(
                    part_key.clone(),
                    ErrorEntry::new(part_key, kind).in_group(&date.key),
                );
            }
        }
    }

    /// Remove part and raw part values
    pub fn clear_parts(&self, values: &mut FormValues) {
        for date in &self.fields {
            for part in DATE_PARTS {
                values.remove(&date.part_key(part));
                values.remove(&date.raw_key(part));
            }
        }
    }
}

fn part_config(date_key: &str, part: &str, required: bool, existing: FieldConfig) -> FieldConfig {
    let defaults = FieldConfig {
        error_group: Some(date_key.to_string()),
        label_class_name: Some(ClassNames::from("form-label")),
        formatter: Some(vec!["removehyphens".to_string()]),
        ..FieldConfig::default()
    };
    let mut config = defaults.overlaid(existing);

    let mut validate: Vec<Validator> = Vec::new();
    if required {
        validate.push(Validator::from("required"));
    }
    validate.push(Validator::from("numeric"));
    validate.push(Validator::Named(format!("date-{part}")));
    validate.extend(config.validate.take().unwrap_or_default());
    config.validate = Some(validate);
    config
}

fn pad_day_month(value: &str) -> String {
    if SINGLE_DIGIT.is_match(value) {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

fn pad_year(value: &str, century_split: i32) -> String {
    if !TWO_DIGITS.is_match(value) {
        return value.to_string();
    }
    let year: i32 = value.parse().unwrap_or_default();
    let prefix = if year <= century_split { "20" } else { "19" };
    format!("{prefix}{value}")
}

/// First part of a `YYYY-MM-DD` value that makes it impossible
fn invalid_part(value: &str) -> Option<&'static str> {
    let mut pieces = value.split('-');
    let Some(year) = pieces.next().and_then(|y| y.parse::<i32>().ok()) else {
        return Some("year");
    };
    let Some(month) = pieces
        .next()
        .and_then(|m| m.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
    else {
        return Some("month");
    };
    let day_valid = pieces
        .next()
        .and_then(|d| d.parse::<u32>().ok())
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
        .is_some();
    if day_valid {
        None
    } else {
        Some("day")
    }
}
