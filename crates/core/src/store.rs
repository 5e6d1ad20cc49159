//! Client-side cache of patients and diagnoses.
//!
//! The store is the only place patient and diagnosis data is mutated. It has two kinds of update:
//! replace-all (the startup list fetches) and upsert-one (a detail fetch, or an appended entry).
//! Both are idempotent, so a late response can only overwrite data with an equal or older copy.

use crate::model::{Diagnosis, Entry, Patient};
use crate::{PatientorError, PatientorResult};
use std::collections::HashMap;

/// An update applied to the store.
#[derive(Clone, Debug)]
pub enum StoreAction {
    SetPatientList(Vec<Patient>),
    SetDiagnosisList(Vec<Diagnosis>),
    UpsertPatient(Patient),
    AddEntry { patient_id: String, entry: Entry },
}

#[derive(Clone, Debug, Default)]
pub struct PatientStore {
    patients: HashMap<String, Patient>,
    diagnoses: HashMap<String, Diagnosis>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: StoreAction) -> PatientorResult<()> {
        match action {
            StoreAction::SetPatientList(patients) => self.replace_patients(patients),
            StoreAction::SetDiagnosisList(diagnoses) => self.replace_diagnoses(diagnoses),
            StoreAction::UpsertPatient(patient) => self.upsert_patient(patient),
            StoreAction::AddEntry { patient_id, entry } => {
                return self.append_entry(&patient_id, entry);
            }
        }
        Ok(())
    }

    /// Replace every known patient. Later duplicates of an id win.
    pub fn replace_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients.into_iter().map(|p| (p.id.clone(), p)).collect();
        tracing::debug!("patient list replaced ({} patients)", self.patients.len());
    }

    /// Replace every known diagnosis. Later duplicates of a code win.
    pub fn replace_diagnoses(&mut self, diagnoses: Vec<Diagnosis>) {
        self.diagnoses = diagnoses
            .into_iter()
            .map(|d| (d.code.clone(), d))
            .collect();
        tracing::debug!("diagnosis list replaced ({} codes)", self.diagnoses.len());
    }

    /// Insert a patient, or merge it into the known record.
    ///
    /// Fields present on `incoming` win; optional fields it lacks keep their known value, so a
    /// summary arriving after a detail fetch does not discard `ssn` or `entries`.
    pub fn upsert_patient(&mut self, incoming: Patient) {
        match self.patients.get_mut(&incoming.id) {
            Some(known) => {
                let Patient {
                    id: _,
                    name,
                    gender,
                    occupation,
                    ssn,
                    date_of_birth,
                    entries,
                } = incoming;
                known.name = name;
                known.gender = gender;
                known.occupation = occupation;
                if ssn.is_some() {
                    known.ssn = ssn;
                }
                if date_of_birth.is_some() {
                    known.date_of_birth = date_of_birth;
                }
                if entries.is_some() {
                    known.entries = entries;
                }
            }
            None => {
                tracing::debug!("new patient {} added to store", incoming.id);
                self.patients.insert(incoming.id.clone(), incoming);
            }
        }
    }

    /// Append a created entry to its patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::UnknownPatient` if the patient is not in the store.
    pub fn append_entry(&mut self, patient_id: &str, entry: Entry) -> PatientorResult<()> {
        let patient = self
            .patients
            .get_mut(patient_id)
            .ok_or_else(|| PatientorError::UnknownPatient(patient_id.to_string()))?;
        patient.entries.get_or_insert_with(Vec::new).push(entry);
        Ok(())
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get(id)
    }

    /// All patients ordered by name, then id.
    pub fn patients(&self) -> Vec<&Patient> {
        let mut patients: Vec<&Patient> = self.patients.values().collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        patients
    }

    pub fn diagnosis(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.get(code)
    }

    /// All diagnoses ordered by code.
    pub fn diagnoses(&self) -> Vec<&Diagnosis> {
        let mut diagnoses: Vec<&Diagnosis> = self.diagnoses.values().collect();
        diagnoses.sort_by(|a, b| a.code.cmp(&b.code));
        diagnoses
    }

    /// Whether the full record still has to be fetched.
    ///
    /// Summaries carry no `ssn`; a patient the store does not know yet also needs fetching.
    pub fn needs_details(&self, id: &str) -> bool {
        self.patient(id).map_or(true, |p| p.ssn.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, Gender, HealthCheckRating, NewEntry};

    fn summary(id: &str, name: &str) -> Patient {
        Patient {
            id: id.into(),
            name: name.into(),
            gender: Gender::Female,
            occupation: "Engineer".into(),
            ssn: None,
            date_of_birth: Some("1970-01-01".into()),
            entries: None,
        }
    }

    fn health_check(id: &str) -> Entry {
        Entry {
            id: id.into(),
            entry: NewEntry {
                date: "2024-01-01".into(),
                specialist: "Dr. Who".into(),
                description: "Control".into(),
                kind: EntryKind::HealthCheck {
                    health_check_rating: HealthCheckRating::Healthy,
                },
            },
        }
    }

    #[test]
    fn replace_all_discards_previous_patients() {
        let mut store = PatientStore::new();
        store.replace_patients(vec![summary("a", "Ann"), summary("b", "Bob")]);
        store.replace_patients(vec![summary("c", "Cy")]);

        assert!(store.patient("a").is_none());
        assert_eq!(store.patients().len(), 1);
    }

    #[test]
    fn patients_are_sorted_by_name() {
        let mut store = PatientStore::new();
        store.replace_patients(vec![summary("2", "Zed"), summary("1", "Amy")]);
        let names: Vec<&str> = store.patients().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[test]
    fn detail_upsert_fills_in_missing_fields() {
        let mut store = PatientStore::new();
        store.replace_patients(vec![summary("a", "Ann")]);
        assert!(store.needs_details("a"));

        let mut full = summary("a", "Ann Smith");
        full.ssn = Some("123".into());
        full.entries = Some(vec![health_check("e1")]);
        store.upsert_patient(full);

        let patient = store.patient("a").expect("known");
        assert_eq!(patient.name, "Ann Smith");
        assert_eq!(patient.entries().len(), 1);
        assert!(!store.needs_details("a"));
    }

    #[test]
    fn stale_summary_does_not_discard_known_details() {
        let mut store = PatientStore::new();
        let mut full = summary("a", "Ann");
        full.ssn = Some("123".into());
        full.entries = Some(vec![health_check("e1")]);
        store.upsert_patient(full);

        store.upsert_patient(summary("a", "Ann"));

        let patient = store.patient("a").expect("known");
        assert_eq!(patient.ssn.as_deref(), Some("123"));
        assert_eq!(patient.entries().len(), 1);
    }

    #[test]
    fn append_entry_extends_patient_entries() {
        let mut store = PatientStore::new();
        store.replace_patients(vec![summary("a", "Ann")]);
        store
            .apply(StoreAction::AddEntry {
                patient_id: "a".into(),
                entry: health_check("e1"),
            })
            .expect("known patient");
        store.append_entry("a", health_check("e2")).expect("known patient");

        let ids: Vec<&str> = store
            .patient("a")
            .expect("known")
            .entries()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[test]
    fn append_entry_to_unknown_patient_fails() {
        let mut store = PatientStore::new();
        let err = store
            .append_entry("ghost", health_check("e1"))
            .expect_err("unknown patient");
        assert!(matches!(err, PatientorError::UnknownPatient(id) if id == "ghost"));
    }

    #[test]
    fn diagnoses_are_keyed_by_code() {
        let mut store = PatientStore::new();
        store
            .apply(StoreAction::SetDiagnosisList(vec![
                Diagnosis {
                    code: "Z57.1".into(),
                    name: "Occupational exposure to radiation".into(),
                    latin: None,
                },
                Diagnosis {
                    code: "M24.2".into(),
                    name: "Disorder of ligament".into(),
                    latin: None,
                },
            ]))
            .expect("apply");

        assert_eq!(
            store.diagnosis("M24.2").map(|d| d.name.as_str()),
            Some("Disorder of ligament")
        );
        assert!(store.diagnosis("X00").is_none());
        let codes: Vec<&str> = store.diagnoses().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["M24.2", "Z57.1"]);
    }
}
