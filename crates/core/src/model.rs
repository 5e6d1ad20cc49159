//! Patient, diagnosis and entry types exchanged with the Patientor API.
//!
//! The wire format is camelCase JSON. Entries are a closed sum type tagged by `type`: a response
//! carrying any other tag fails to deserialise, so every consumer matches exhaustively over
//! [`EntryKind`] instead of guarding against unknown variants at runtime.

use serde::{Deserialize, Serialize};

// ============================================================================
// Diagnoses
// ============================================================================

/// A diagnosis code with its human-readable name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

// ============================================================================
// Patients
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient record.
///
/// The list endpoint returns summaries without `ssn` and `entries`; the detail endpoint returns
/// the full record. Both deserialise into this type, with the missing fields left as `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub occupation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

impl Patient {
    /// Entries known for this patient, empty for a summary record.
    pub fn entries(&self) -> &[Entry] {
        self.entries.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Health check outcome, serialised as the bare integer 0..=3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human description shown next to a health check entry.
    pub fn description(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "The patient is in great shape",
            HealthCheckRating::LowRisk => "The patient has a low risk of getting sick",
            HealthCheckRating::HighRisk => "The patient has a high risk of getting sick",
            HealthCheckRating::CriticalRisk => "The patient has a diagnosed condition",
        }
    }
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HealthCheckRating::ALL
            .into_iter()
            .find(|r| r.value() == value)
            .ok_or(value)
    }
}

impl serde::Serialize for HealthCheckRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> serde::Deserialize<'de> for HealthCheckRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        HealthCheckRating::try_from(raw).map_err(|v| {
            serde::de::Error::custom(format!("health check rating must be 0..=3, got {v}"))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

/// Variant-specific part of an entry, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryKind {
    #[serde(rename_all = "camelCase")]
    HealthCheck {
        health_check_rating: HealthCheckRating,
    },
    #[serde(rename_all = "camelCase")]
    Hospital {
        discharge: Discharge,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        diagnosis_codes: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    OccupationalHealthcare {
        employer_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        diagnosis_codes: Option<Vec<String>>,
    },
}

impl EntryKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryKind::HealthCheck { .. } => EntryType::HealthCheck,
            EntryKind::Hospital { .. } => EntryType::Hospital,
            EntryKind::OccupationalHealthcare { .. } => EntryType::OccupationalHealthcare,
        }
    }

    /// Diagnosis codes attached to the entry, empty when none were recorded.
    pub fn diagnosis_codes(&self) -> &[String] {
        match self {
            EntryKind::HealthCheck { .. } => &[],
            EntryKind::Hospital {
                diagnosis_codes, ..
            }
            | EntryKind::OccupationalHealthcare {
                diagnosis_codes, ..
            } => diagnosis_codes.as_deref().unwrap_or_default(),
        }
    }
}

/// An entry as submitted to the API: everything but the server-assigned `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: String,
    pub specialist: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

/// An entry stored on a patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(flatten)]
    pub entry: NewEntry,
}

impl std::ops::Deref for Entry {
    type Target = NewEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

/// The discriminant of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryType {
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [
        EntryType::HealthCheck,
        EntryType::Hospital,
        EntryType::OccupationalHealthcare,
    ];

    /// The tag used on the wire and in form values.
    pub fn tag(self) -> &'static str {
        match self {
            EntryType::HealthCheck => "HealthCheck",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }

    /// Parse a wire tag; anything but the three exact tags is `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        EntryType::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_summary_patient_without_entries() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "d2773336-f723-11e9-8f0b-362b9e155667",
            "name": "John McClane",
            "gender": "male",
            "occupation": "New york city cop",
            "dateOfBirth": "1986-07-09"
        }))
        .expect("parse summary");

        assert!(patient.ssn.is_none());
        assert!(patient.entries.is_none());
        assert!(patient.entries().is_empty());
        assert_eq!(patient.date_of_birth.as_deref(), Some("1986-07-09"));
    }

    #[test]
    fn parses_every_entry_variant() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "p1",
            "name": "Hans Gruber",
            "gender": "other",
            "occupation": "Technician",
            "ssn": "090786-122X",
            "entries": [
                {
                    "id": "e1",
                    "type": "HealthCheck",
                    "date": "2019-10-20",
                    "specialist": "MD House",
                    "description": "Yearly control visit.",
                    "healthCheckRating": 1
                },
                {
                    "id": "e2",
                    "type": "Hospital",
                    "date": "2015-01-02",
                    "specialist": "MD House",
                    "description": "Healing time appr. 2 weeks.",
                    "diagnosisCodes": ["S62.5"],
                    "discharge": { "date": "2015-01-16", "criteria": "Thumb has healed." }
                },
                {
                    "id": "e3",
                    "type": "OccupationalHealthcare",
                    "date": "2019-08-05",
                    "specialist": "MD House",
                    "description": "Patient mistakenly found himself in a nuclear plant waste site.",
                    "employerName": "HyPD",
                    "sickLeave": { "startDate": "2019-08-05", "endDate": "2019-08-28" }
                }
            ]
        }))
        .expect("parse full patient");

        let kinds: Vec<EntryType> = patient
            .entries()
            .iter()
            .map(|e| e.kind.entry_type())
            .collect();
        assert_eq!(
            kinds,
            vec![
                EntryType::HealthCheck,
                EntryType::Hospital,
                EntryType::OccupationalHealthcare
            ]
        );
        assert_eq!(patient.entries()[1].kind.diagnosis_codes(), ["S62.5"]);
        assert_eq!(
            patient.entries()[0].kind,
            EntryKind::HealthCheck {
                health_check_rating: HealthCheckRating::LowRisk
            }
        );
    }

    #[test]
    fn rejects_unknown_entry_type() {
        let result = serde_json::from_value::<Entry>(json!({
            "id": "e9",
            "type": "Dental",
            "date": "2020-01-01",
            "specialist": "Dr. Tooth",
            "description": "Cleaning"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let result = serde_json::from_value::<NewEntry>(json!({
            "type": "HealthCheck",
            "date": "2020-01-01",
            "specialist": "Dr. Who",
            "description": "Control",
            "healthCheckRating": 4
        }));
        let err = result.expect_err("rating 4 should fail");
        assert!(err.to_string().contains("0..=3"));
    }

    #[test]
    fn serialises_new_entry_with_type_tag() {
        let entry = NewEntry {
            date: "2020-01-01".into(),
            specialist: "Dr. Who".into(),
            description: "Control".into(),
            kind: EntryKind::Hospital {
                discharge: Discharge {
                    date: "2020-01-05".into(),
                    criteria: "Recovered".into(),
                },
                diagnosis_codes: None,
            },
        };

        let value = serde_json::to_value(&entry).expect("serialise");
        assert_eq!(
            value,
            json!({
                "type": "Hospital",
                "date": "2020-01-01",
                "specialist": "Dr. Who",
                "description": "Control",
                "discharge": { "date": "2020-01-05", "criteria": "Recovered" }
            })
        );
    }

    #[test]
    fn entry_type_tags_are_exact() {
        assert_eq!(EntryType::from_tag("Hospital"), Some(EntryType::Hospital));
        assert_eq!(EntryType::from_tag("hospital"), None);
        assert_eq!(EntryType::from_tag(""), None);
        for t in EntryType::ALL {
            assert_eq!(EntryType::from_tag(t.tag()), Some(t));
        }
    }
}
