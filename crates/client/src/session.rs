//! Flows connecting API calls to the store and the add-entry modal.
//!
//! Each flow is triggered by one lifecycle event or user action and runs to completion on the
//! caller's task. Nothing is cancelled: a response that arrives late is still applied, which is
//! harmless because every store update is a replace-all or an upsert by id.

use crate::{ApiClient, ClientResult};
use chrono::NaiveDate;
use patientor_core::{Entry, EntryModal, FormErrors, PatientStore};

/// What the startup fetches managed to load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub ping_ok: bool,
    /// Number of patients loaded, `None` if the fetch failed.
    pub patients: Option<usize>,
    /// Number of diagnoses loaded, `None` if the fetch failed.
    pub diagnoses: Option<usize>,
}

/// Populate the store at application start.
///
/// Pings the API, then fetches the patient list and the diagnosis list concurrently. A failed
/// fetch is logged and leaves that part of the store as it was; the two lists may arrive in any
/// order.
pub async fn bootstrap(client: &ApiClient, store: &mut PatientStore) -> BootstrapReport {
    let ping_ok = match client.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("ping failed: {}", e);
            false
        }
    };

    let (patients, diagnoses) = tokio::join!(client.list_patients(), client.list_diagnoses());

    let patients = match patients {
        Ok(patients) => {
            let count = patients.len();
            store.replace_patients(patients);
            tracing::info!("loaded {} patients", count);
            Some(count)
        }
        Err(e) => {
            tracing::error!("failed to fetch patient list: {}", e);
            None
        }
    };

    let diagnoses = match diagnoses {
        Ok(diagnoses) => {
            let count = diagnoses.len();
            store.replace_diagnoses(diagnoses);
            tracing::info!("loaded {} diagnoses", count);
            Some(count)
        }
        Err(e) => {
            tracing::error!("failed to fetch diagnosis list: {}", e);
            None
        }
    };

    BootstrapReport {
        ping_ok,
        patients,
        diagnoses,
    }
}

/// Fetch and merge the full record of a patient whose details are not known yet.
///
/// Returns `true` if the store was updated. A failed fetch is logged and leaves the store as it
/// was.
pub async fn load_patient_details(client: &ApiClient, store: &mut PatientStore, id: &str) -> bool {
    if !store.needs_details(id) {
        return false;
    }

    match client.get_patient(id).await {
        Ok(patient) => {
            store.upsert_patient(patient);
            true
        }
        Err(e) => {
            tracing::error!("failed to fetch patient {}: {}", id, e);
            false
        }
    }
}

/// Result of a submit attempt from the add-entry modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form did not validate; errors are shown inline and nothing was sent.
    Invalid(FormErrors),
    /// The server refused the entry; the modal stays open with this message.
    Failed(String),
    /// The entry was created, appended to the patient and the modal closed.
    Created(Entry),
}

/// Submit the modal's form for `patient_id`.
///
/// # Errors
///
/// Returns an error if the modal is closed. Server-side refusals are not errors; they are
/// reported as [`SubmitOutcome::Failed`]. Once the server has created the entry the modal is
/// closed even if the patient is missing from the store, so the entry cannot be sent twice.
pub async fn submit_entry(
    client: &ApiClient,
    store: &mut PatientStore,
    modal: &mut EntryModal,
    patient_id: &str,
    today: NaiveDate,
) -> ClientResult<SubmitOutcome> {
    let Some(payload) = modal.try_submit()? else {
        return Ok(SubmitOutcome::Invalid(modal.errors().clone()));
    };

    match client.add_entry(patient_id, &payload).await {
        Ok(entry) => {
            tracing::info!("added entry {} to patient {}", entry.id, patient_id);
            modal.submit_succeeded(today);
            if let Err(e) = store.append_entry(patient_id, entry.clone()) {
                tracing::warn!("entry {} created but not stored: {}", entry.id, e);
            }
            Ok(SubmitOutcome::Created(entry))
        }
        Err(e) => {
            tracing::error!("failed to add entry to patient {}: {}", patient_id, e);
            let message = e.user_message();
            modal.submit_failed(message.clone());
            Ok(SubmitOutcome::Failed(message))
        }
    }
}
