//! Add-entry form validation.
//!
//! [`validate`] is a pure function from [`FormValues`] to [`FormErrors`]. Rules run in a fixed
//! order and a later rule may replace the message an earlier rule left on the same field:
//!
//! 1. `date`, `specialist` and `description` are required and `date` must be a calendar date;
//!    `type` must be one of the three entry tags.
//! 2. Without a known `type` validation stops there.
//! 3. `HealthCheck`: `healthCheckRating` is required and must be 0, 1, 2 or 3.
//! 4. `Hospital`: `discharge.date` (a calendar date) and `discharge.criteria` are required.
//! 5. `OccupationalHealthcare`: `employerName` is required; the sick leave dates are optional,
//!    and each one given must be a calendar date on its own.
//!
//! Discharge is always required while sick leave is optional; the two groups are checked
//! differently on purpose.

use crate::constants::{
    CHOOSE_TYPE_MESSAGE, INVALID_DATE_MESSAGE, INVALID_RATING_MESSAGE, REQUIRED_MESSAGE,
};
use crate::form::{FormField, FormValues};
use crate::model::{EntryType, HealthCheckRating};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

/// Parse free text into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 timestamps and `YYYY-MM-DDTHH:MM[:SS]`. The date
/// must exist, so `2023-02-30` is rejected.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ts.date());
        }
    }

    None
}

pub fn is_date(input: &str) -> bool {
    parse_calendar_date(input).is_some()
}

/// Field errors keyed by form field.
///
/// Serialises to a JSON object in which `discharge.*` and `sickLeave.*` errors are nested, e.g.
/// `{"discharge": {"date": "This field is required."}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message, replacing any earlier message for the same field.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    /// True when no field has an error, i.e. the form is valid.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl serde::Serialize for FormErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut top: BTreeMap<&str, serde_json::Value> = BTreeMap::new();
        for (field, message) in self.iter() {
            match field.segments() {
                (None, leaf) => {
                    top.insert(leaf, serde_json::Value::String(message.to_string()));
                }
                (Some(group), leaf) => {
                    let nested = top
                        .entry(group)
                        .or_insert_with(|| serde_json::Value::Object(Default::default()));
                    if let serde_json::Value::Object(map) = nested {
                        map.insert(
                            leaf.to_string(),
                            serde_json::Value::String(message.to_string()),
                        );
                    }
                }
            }
        }

        let mut map = serializer.serialize_map(Some(top.len()))?;
        for (key, value) in &top {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Validate raw form values.
pub fn validate(values: &FormValues) -> FormErrors {
    let mut errors = FormErrors::new();

    check_date(&mut errors, FormField::Date, &values.date);
    require(&mut errors, FormField::Specialist, &values.specialist);
    require(&mut errors, FormField::Description, &values.description);

    let Some(entry_type) = EntryType::from_tag(&values.entry_type) else {
        errors.insert(FormField::Type, CHOOSE_TYPE_MESSAGE);
        return errors;
    };

    match entry_type {
        EntryType::HealthCheck => {
            if values.health_check_rating.is_empty() {
                errors.insert(FormField::HealthCheckRating, REQUIRED_MESSAGE);
            } else if parse_rating(&values.health_check_rating).is_none() {
                errors.insert(FormField::HealthCheckRating, INVALID_RATING_MESSAGE);
            }
        }
        EntryType::Hospital => {
            check_date(&mut errors, FormField::DischargeDate, &values.discharge.date);
            require(
                &mut errors,
                FormField::DischargeCriteria,
                &values.discharge.criteria,
            );
        }
        EntryType::OccupationalHealthcare => {
            require(&mut errors, FormField::EmployerName, &values.employer_name);

            check_optional_date(
                &mut errors,
                FormField::SickLeaveStartDate,
                &values.sick_leave.start_date,
            );
            check_optional_date(
                &mut errors,
                FormField::SickLeaveEndDate,
                &values.sick_leave.end_date,
            );
        }
    }

    errors
}

/// Parse the raw rating text into a rating.
pub fn parse_rating(raw: &str) -> Option<HealthCheckRating> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(|v| HealthCheckRating::try_from(v).ok())
}

fn require(errors: &mut FormErrors, field: FormField, value: &str) {
    if value.is_empty() {
        errors.insert(field, REQUIRED_MESSAGE);
    }
}

fn check_date(errors: &mut FormErrors, field: FormField, value: &str) {
    require(errors, field, value);
    check_optional_date(errors, field, value);
}

fn check_optional_date(errors: &mut FormErrors, field: FormField, value: &str) {
    if !value.is_empty() && !is_date(value) {
        errors.insert(field, INVALID_DATE_MESSAGE);
    }
}
