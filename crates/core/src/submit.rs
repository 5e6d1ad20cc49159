//! Narrowing of form values into a typed entry payload.
//!
//! The form carries the fields of every variant at once. [`to_backend`] keeps only the fields of
//! the selected variant, so a rating typed before the user switched to `Hospital` (or any other
//! stale value) never reaches the server.

use crate::constants::{INVALID_RATING_MESSAGE, INVALID_SUBMISSION_STATUS};
use crate::form::{FormField, FormValues};
use crate::model::{Discharge, EntryKind, EntryType, NewEntry, SickLeave};
use crate::validation::{parse_rating, validate, FormErrors};

/// Returned instead of a payload when the form does not validate.
///
/// User-facing messages come from the inline field errors; this is the guard that keeps an
/// invalid form from being narrowed at all.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SubmitRejected {
    pub status: String,
    pub errors: FormErrors,
}

impl std::fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} field error(s)", self.status, self.errors.len())
    }
}

impl std::error::Error for SubmitRejected {}

/// Validate `values` and narrow them into the payload of the selected entry type.
///
/// # Errors
///
/// Returns [`SubmitRejected`] carrying the field errors when validation fails or no known type
/// is selected.
pub fn to_backend(values: &FormValues) -> Result<NewEntry, SubmitRejected> {
    let errors = validate(values);
    let entry_type = match EntryType::from_tag(&values.entry_type) {
        Some(entry_type) if errors.is_empty() => entry_type,
        _ => return Err(rejected(errors)),
    };

    let kind = match entry_type {
        EntryType::HealthCheck => {
            let Some(health_check_rating) = parse_rating(&values.health_check_rating) else {
                let mut errors = FormErrors::new();
                errors.insert(FormField::HealthCheckRating, INVALID_RATING_MESSAGE);
                return Err(rejected(errors));
            };
            EntryKind::HealthCheck {
                health_check_rating,
            }
        }
        EntryType::Hospital => EntryKind::Hospital {
            discharge: Discharge {
                date: values.discharge.date.clone(),
                criteria: values.discharge.criteria.clone(),
            },
            diagnosis_codes: selected_codes(values),
        },
        EntryType::OccupationalHealthcare => EntryKind::OccupationalHealthcare {
            employer_name: values.employer_name.clone(),
            sick_leave: sick_leave(values),
            diagnosis_codes: selected_codes(values),
        },
    };

    Ok(NewEntry {
        date: values.date.clone(),
        specialist: values.specialist.clone(),
        description: values.description.clone(),
        kind,
    })
}

fn rejected(errors: FormErrors) -> SubmitRejected {
    SubmitRejected {
        status: INVALID_SUBMISSION_STATUS.to_string(),
        errors,
    }
}

/// An empty selection is omitted rather than sent as an empty list.
fn selected_codes(values: &FormValues) -> Option<Vec<String>> {
    if values.diagnosis_codes.is_empty() {
        None
    } else {
        Some(values.diagnosis_codes.clone())
    }
}

fn sick_leave(values: &FormValues) -> Option<SickLeave> {
    let leave = &values.sick_leave;
    if leave.start_date.is_empty() || leave.end_date.is_empty() {
        return None;
    }
    Some(SickLeave {
        start_date: leave.start_date.clone(),
        end_date: leave.end_date.clone(),
    })
}
