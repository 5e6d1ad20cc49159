#[derive(Debug, thiserror::Error)]
pub enum PatientorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown patient: {0}")]
    UnknownPatient(String),
    #[error("unknown form field: {0}")]
    UnknownField(String),
    #[error("the entry form is closed")]
    ModalClosed,
}

pub type PatientorResult<T> = std::result::Result<T, PatientorError>;
