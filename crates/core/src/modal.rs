//! Add-entry modal lifecycle.
//!
//! `Closed -> Open` when the user opens the form, `Open -> Open` while fields are edited (errors
//! are only recomputed on a submit attempt), and `Open -> Closed` on a successful submit or an
//! explicit cancel. A failed submission leaves the modal open with the server's message shown and
//! every entered value kept.

use crate::form::{FormField, FormValues};
use crate::model::NewEntry;
use crate::submit::to_backend;
use crate::validation::FormErrors;
use crate::{PatientorError, PatientorResult};
use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// State of one add-entry form instance.
#[derive(Clone, Debug, Default)]
pub struct EntryModal {
    state: ModalState,
    values: FormValues,
    errors: FormErrors,
    submit_error: Option<String>,
}

impl EntryModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Field errors from the last submit attempt.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Message from the last failed submission, if any.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Open the form with fresh initial values. Opening an open form keeps its values.
    pub fn open(&mut self, today: NaiveDate) {
        if self.is_open() {
            return;
        }
        self.reset(today);
        self.state = ModalState::Open;
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> PatientorResult<()> {
        self.ensure_open()?;
        self.values.set(field, value);
        Ok(())
    }

    pub fn select_diagnosis(&mut self, code: impl Into<String>) -> PatientorResult<()> {
        self.ensure_open()?;
        self.values.select_diagnosis(code);
        Ok(())
    }

    pub fn clear_diagnoses(&mut self) -> PatientorResult<()> {
        self.ensure_open()?;
        self.values.clear_diagnoses();
        Ok(())
    }

    /// Validate and narrow the current values.
    ///
    /// Returns the payload to send when the form is valid. Otherwise the field errors are kept
    /// for inline display and `None` is returned; the modal stays open either way.
    pub fn try_submit(&mut self) -> PatientorResult<Option<NewEntry>> {
        self.ensure_open()?;
        match to_backend(&self.values) {
            Ok(entry) => {
                self.errors = FormErrors::new();
                Ok(Some(entry))
            }
            Err(rejected) => {
                self.errors = rejected.errors;
                Ok(None)
            }
        }
    }

    /// The payload was accepted by the server: close and reset.
    pub fn submit_succeeded(&mut self, today: NaiveDate) {
        self.state = ModalState::Closed;
        self.reset(today);
    }

    /// The server refused the payload: stay open, keep the values, show the message.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.submit_error = Some(message.into());
    }

    pub fn cancel(&mut self, today: NaiveDate) {
        self.state = ModalState::Closed;
        self.reset(today);
    }

    fn reset(&mut self, today: NaiveDate) {
        self.values = FormValues::initial(today);
        self.errors = FormErrors::new();
        self.submit_error = None;
    }

    fn ensure_open(&self) -> PatientorResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(PatientorError::ModalClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REQUIRED_MESSAGE;
    use crate::model::EntryType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date")
    }

    fn fill_health_check(modal: &mut EntryModal) {
        modal.set(FormField::Type, "HealthCheck").expect("open");
        modal.set(FormField::Specialist, "Dr. Strange").expect("open");
        modal.set(FormField::Description, "Annual").expect("open");
        modal.set(FormField::HealthCheckRating, "0").expect("open");
    }

    #[test]
    fn edits_require_an_open_modal() {
        let mut modal = EntryModal::new();
        assert_eq!(modal.state(), ModalState::Closed);
        let err = modal.set(FormField::Date, "2024-01-01").expect_err("closed");
        assert!(matches!(err, PatientorError::ModalClosed));
        assert!(modal.try_submit().is_err());
    }

    #[test]
    fn invalid_submit_keeps_modal_open_with_errors() {
        let mut modal = EntryModal::new();
        modal.open(today());
        assert_eq!(modal.values().date, "2024-02-29");

        modal.set(FormField::Type, "Hospital").expect("open");
        let payload = modal.try_submit().expect("open");
        assert!(payload.is_none());
        assert!(modal.is_open());
        assert_eq!(
            modal.errors().get(FormField::Specialist),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(
            modal.errors().get(FormField::DischargeDate),
            Some(REQUIRED_MESSAGE)
        );
    }

    #[test]
    fn failed_submission_preserves_values() {
        let mut modal = EntryModal::new();
        modal.open(today());
        fill_health_check(&mut modal);

        let payload = modal.try_submit().expect("open").expect("valid");
        assert_eq!(payload.kind.entry_type(), EntryType::HealthCheck);

        modal.submit_failed("Malformatted entry");
        assert!(modal.is_open());
        assert_eq!(modal.submit_error(), Some("Malformatted entry"));
        assert_eq!(modal.values().specialist, "Dr. Strange");
        assert!(modal.errors().is_empty());
    }

    #[test]
    fn success_and_cancel_close_and_reset() {
        let mut modal = EntryModal::new();
        modal.open(today());
        fill_health_check(&mut modal);
        modal.submit_failed("boom");
        modal.submit_succeeded(today());
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(modal.submit_error().is_none());
        assert!(modal.values().specialist.is_empty());

        modal.open(today());
        fill_health_check(&mut modal);
        modal.cancel(today());
        assert!(!modal.is_open());
        modal.open(today());
        assert!(modal.values().entry_type.is_empty());
    }

    #[test]
    fn reopening_an_open_modal_keeps_values() {
        let mut modal = EntryModal::new();
        modal.open(today());
        modal.set(FormField::Specialist, "Dr. House").expect("open");
        modal.open(today());
        assert_eq!(modal.values().specialist, "Dr. House");
    }
}
