//! Plain-text rendering of patients and entries.

use crate::model::{Entry, EntryKind, Gender, Patient};
use crate::store::PatientStore;

const LOADING: &str = "loading...";

fn gender_symbol(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "♂",
        Gender::Female => "♀",
        Gender::Other => "⚲",
    }
}

/// One line per patient: id, name, gender and occupation.
pub fn render_patient_list(store: &PatientStore) -> String {
    let mut out = String::new();
    for patient in store.patients() {
        out.push_str(&format!(
            "{}  {} ({})  {}\n",
            patient.id, patient.name, patient.gender, patient.occupation
        ));
    }
    out
}

/// Render the detail page of a patient with all known entries.
pub fn render_patient(patient: &Patient, store: &PatientStore) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", patient.name, gender_symbol(patient.gender)));
    out.push_str(&format!(
        "ssn: {}\n",
        patient.ssn.as_deref().unwrap_or(LOADING)
    ));
    out.push_str(&format!("occupation: {}\n", patient.occupation));
    if let Some(dob) = &patient.date_of_birth {
        out.push_str(&format!("date of birth: {dob}\n"));
    }

    if patient.entries().is_empty() {
        return out;
    }

    out.push_str("\nentries\n");
    for entry in patient.entries() {
        out.push_str(&render_entry(entry, store));
        out.push_str("\n---\n");
    }
    out
}

/// Render a diagnosis code list as `CODE (name), ...`.
///
/// Codes whose diagnosis is not loaded yet are shown bare.
pub fn render_diagnoses(codes: &[String], store: &PatientStore) -> String {
    codes
        .iter()
        .map(|code| match store.diagnosis(code) {
            Some(d) => format!("{code} ({})", d.name),
            None => code.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a single entry.
pub fn render_entry(entry: &Entry, store: &PatientStore) -> String {
    let mut out = String::new();
    match &entry.kind {
        EntryKind::HealthCheck {
            health_check_rating,
        } => {
            out.push_str(&format!(
                "{} Health check at {}\n",
                entry.date, entry.specialist
            ));
            out.push_str(&format!("Description: {}\n", entry.description));
            out.push_str(&format!(
                "Rating: {} ({})",
                health_check_rating.value(),
                health_check_rating.description()
            ));
        }
        EntryKind::Hospital {
            discharge,
            diagnosis_codes,
        } => {
            out.push_str(&format!("{} Hospital at {}\n", entry.date, entry.specialist));
            if let Some(codes) = diagnosis_codes {
                out.push_str(&format!("Diagnoses: {}\n", render_diagnoses(codes, store)));
            }
            out.push_str(&format!("Description: {}\n", entry.description));
            out.push_str(&format!(
                "Discharged at {}: {}",
                discharge.date, discharge.criteria
            ));
        }
        EntryKind::OccupationalHealthcare {
            employer_name,
            sick_leave,
            diagnosis_codes,
        } => {
            out.push_str(&format!(
                "{} Occupational healthcare at {}\n",
                entry.date, entry.specialist
            ));
            if let Some(codes) = diagnosis_codes {
                out.push_str(&format!("Diagnoses: {}\n", render_diagnoses(codes, store)));
            }
            out.push_str(&format!("Description: {}", entry.description));
            if let Some(leave) = sick_leave {
                out.push_str(&format!(
                    " On sick leave from {} to {}.",
                    leave.start_date, leave.end_date
                ));
            }
            out.push_str(&format!("\nEmployer: {employer_name}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagnosis, Discharge, HealthCheckRating, NewEntry, SickLeave};

    fn entry(kind: EntryKind) -> Entry {
        Entry {
            id: "e1".into(),
            entry: NewEntry {
                date: "2019-08-05".into(),
                specialist: "MD House".into(),
                description: "Checked".into(),
                kind,
            },
        }
    }

    fn store_with_diagnosis() -> PatientStore {
        let mut store = PatientStore::new();
        store.replace_diagnoses(vec![Diagnosis {
            code: "S62.5".into(),
            name: "Fracture of thumb".into(),
            latin: Some("Fractura [ossis] pollicis".into()),
        }]);
        store
    }

    #[test]
    fn renders_health_check_rating_text() {
        let text = render_entry(
            &entry(EntryKind::HealthCheck {
                health_check_rating: HealthCheckRating::HighRisk,
            }),
            &PatientStore::new(),
        );
        assert!(text.starts_with("2019-08-05 Health check at MD House"));
        assert!(text.contains("The patient has a high risk of getting sick"));
    }

    #[test]
    fn renders_hospital_with_known_and_unknown_diagnoses() {
        let text = render_entry(
            &entry(EntryKind::Hospital {
                discharge: Discharge {
                    date: "2019-08-10".into(),
                    criteria: "Healed".into(),
                },
                diagnosis_codes: Some(vec!["S62.5".into(), "J10.1".into()]),
            }),
            &store_with_diagnosis(),
        );
        assert!(text.contains("Diagnoses: S62.5 (Fracture of thumb), J10.1"));
        assert!(text.contains("Discharged at 2019-08-10: Healed"));
    }

    #[test]
    fn renders_occupational_sick_leave() {
        let text = render_entry(
            &entry(EntryKind::OccupationalHealthcare {
                employer_name: "HyPD".into(),
                sick_leave: Some(SickLeave {
                    start_date: "2019-08-05".into(),
                    end_date: "2019-08-28".into(),
                }),
                diagnosis_codes: None,
            }),
            &PatientStore::new(),
        );
        assert!(text.contains("On sick leave from 2019-08-05 to 2019-08-28."));
        assert!(text.contains("Employer: HyPD"));
        assert!(!text.contains("Diagnoses"));
    }

    #[test]
    fn summary_patient_shows_loading_ssn() {
        let patient = Patient {
            id: "p1".into(),
            name: "John McClane".into(),
            gender: Gender::Male,
            occupation: "Cop".into(),
            ssn: None,
            date_of_birth: None,
            entries: None,
        };
        let text = render_patient(&patient, &PatientStore::new());
        assert!(text.contains("ssn: loading..."));
        assert!(!text.contains("entries"));
    }
}
