//! # Patientor Core
//!
//! Domain logic for the Patientor patient-record client.
//!
//! This crate contains pure data operations only:
//! - Patient, diagnosis and entry types as exchanged with the API
//! - The add-entry form: flat values, validation, narrowing into a typed payload
//! - The add-entry modal lifecycle
//! - The client-side store of patients and diagnoses
//! - Plain-text rendering of patients and entries
//!
//! **No transport concerns**: HTTP calls and the flows that feed their results into the store
//! belong in `patientor-client`.

pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod modal;
pub mod model;
pub mod render;
pub mod store;
pub mod submit;
pub mod validation;

pub use config::{ApiConfig, Environment};
pub use error::{PatientorError, PatientorResult};
pub use form::{DischargeValues, FormField, FormValues, SickLeaveValues};
pub use modal::{EntryModal, ModalState};
pub use model::{
    Diagnosis, Discharge, Entry, EntryKind, EntryType, Gender, HealthCheckRating, NewEntry,
    Patient, SickLeave,
};
pub use store::{PatientStore, StoreAction};
pub use submit::{to_backend, SubmitRejected};
pub use validation::{validate, FormErrors};
