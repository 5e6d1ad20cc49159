//! Flat form values for the add-entry form.
//!
//! The form shows the fields of all three entry variants at once and keeps them in a single
//! [`FormValues`] record while the user edits. Which sub-fields matter is decided by the `type`
//! tag only when the form is validated and narrowed; switching the tag never clears values that
//! belong to another variant.

use crate::model::{EntryKind, NewEntry};
use crate::PatientorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw, unvalidated values of the add-entry form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    /// Entry type tag; empty until the user picks a visit type.
    #[serde(rename = "type")]
    pub entry_type: String,
    pub date: String,
    pub specialist: String,
    pub description: String,
    /// Raw text of the rating input.
    pub health_check_rating: String,
    pub discharge: DischargeValues,
    pub employer_name: String,
    pub sick_leave: SickLeaveValues,
    pub diagnosis_codes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeValues {
    pub date: String,
    pub criteria: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeaveValues {
    pub start_date: String,
    pub end_date: String,
}

impl FormValues {
    /// Values shown when the form opens: today's date pre-filled, everything else empty.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Set a single text field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Type => self.entry_type = value,
            FormField::Date => self.date = value,
            FormField::Specialist => self.specialist = value,
            FormField::Description => self.description = value,
            FormField::HealthCheckRating => self.health_check_rating = value,
            FormField::DischargeDate => self.discharge.date = value,
            FormField::DischargeCriteria => self.discharge.criteria = value,
            FormField::EmployerName => self.employer_name = value,
            FormField::SickLeaveStartDate => self.sick_leave.start_date = value,
            FormField::SickLeaveEndDate => self.sick_leave.end_date = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Type => &self.entry_type,
            FormField::Date => &self.date,
            FormField::Specialist => &self.specialist,
            FormField::Description => &self.description,
            FormField::HealthCheckRating => &self.health_check_rating,
            FormField::DischargeDate => &self.discharge.date,
            FormField::DischargeCriteria => &self.discharge.criteria,
            FormField::EmployerName => &self.employer_name,
            FormField::SickLeaveStartDate => &self.sick_leave.start_date,
            FormField::SickLeaveEndDate => &self.sick_leave.end_date,
        }
    }

    /// Add a diagnosis code to the selection, keeping selection order and ignoring repeats.
    pub fn select_diagnosis(&mut self, code: impl Into<String>) {
        let code = code.into();
        if !self.diagnosis_codes.contains(&code) {
            self.diagnosis_codes.push(code);
        }
    }

    pub fn clear_diagnoses(&mut self) {
        self.diagnosis_codes.clear();
    }
}

impl From<&NewEntry> for FormValues {
    /// Widen a narrowed payload back into form values.
    fn from(entry: &NewEntry) -> Self {
        let mut values = FormValues {
            entry_type: entry.kind.entry_type().tag().to_string(),
            date: entry.date.clone(),
            specialist: entry.specialist.clone(),
            description: entry.description.clone(),
            ..FormValues::default()
        };

        match &entry.kind {
            EntryKind::HealthCheck {
                health_check_rating,
            } => {
                values.health_check_rating = health_check_rating.value().to_string();
            }
            EntryKind::Hospital {
                discharge,
                diagnosis_codes,
            } => {
                values.discharge = DischargeValues {
                    date: discharge.date.clone(),
                    criteria: discharge.criteria.clone(),
                };
                values.diagnosis_codes = diagnosis_codes.clone().unwrap_or_default();
            }
            EntryKind::OccupationalHealthcare {
                employer_name,
                sick_leave,
                diagnosis_codes,
            } => {
                values.employer_name = employer_name.clone();
                if let Some(leave) = sick_leave {
                    values.sick_leave = SickLeaveValues {
                        start_date: leave.start_date.clone(),
                        end_date: leave.end_date.clone(),
                    };
                }
                values.diagnosis_codes = diagnosis_codes.clone().unwrap_or_default();
            }
        }

        values
    }
}

/// Address of an editable form field.
///
/// Paths are the camelCase wire names, with `.` separating the nested `discharge` and
/// `sickLeave` groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Type,
    Date,
    Specialist,
    Description,
    HealthCheckRating,
    DischargeDate,
    DischargeCriteria,
    EmployerName,
    SickLeaveStartDate,
    SickLeaveEndDate,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Type,
        FormField::Date,
        FormField::Specialist,
        FormField::Description,
        FormField::HealthCheckRating,
        FormField::DischargeDate,
        FormField::DischargeCriteria,
        FormField::EmployerName,
        FormField::SickLeaveStartDate,
        FormField::SickLeaveEndDate,
    ];

    pub fn path(self) -> &'static str {
        match self {
            FormField::Type => "type",
            FormField::Date => "date",
            FormField::Specialist => "specialist",
            FormField::Description => "description",
            FormField::HealthCheckRating => "healthCheckRating",
            FormField::DischargeDate => "discharge.date",
            FormField::DischargeCriteria => "discharge.criteria",
            FormField::EmployerName => "employerName",
            FormField::SickLeaveStartDate => "sickLeave.startDate",
            FormField::SickLeaveEndDate => "sickLeave.endDate",
        }
    }

    /// Split a path into its group and leaf key, e.g. `("discharge", "date")`.
    pub fn segments(self) -> (Option<&'static str>, &'static str) {
        match self.path().split_once('.') {
            Some((group, leaf)) => (Some(group), leaf),
            None => (None, self.path()),
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Type => "Visit type",
            FormField::Date => "Date",
            FormField::Specialist => "Specialist",
            FormField::Description => "Description",
            FormField::HealthCheckRating => "Health check rating",
            FormField::DischargeDate => "Discharge date",
            FormField::DischargeCriteria => "Discharge criteria",
            FormField::EmployerName => "Employer name",
            FormField::SickLeaveStartDate => "Sick leave start date",
            FormField::SickLeaveEndDate => "Sick leave end date",
        }
    }
}

impl FromStr for FormField {
    type Err = PatientorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.path() == s)
            .ok_or_else(|| PatientorError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
