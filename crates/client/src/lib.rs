//! # Patientor Client
//!
//! HTTP access to the Patientor API and the flows that feed its responses into the core store
//! and the add-entry modal.
//!
//! Handles:
//! - JSON requests against the configured base URL with `reqwest`
//! - Extraction of the server's `{ "error": ... }` message on failed requests
//! - Startup bootstrap, patient detail loading and entry submission (`session`)

#![warn(rust_2018_idioms)]

pub mod api;
pub mod session;

pub use api::ApiClient;
pub use session::{bootstrap, load_patient_details, submit_entry, BootstrapReport, SubmitOutcome};

/// Errors returned by the Patientor API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Core(#[from] patientor_core::PatientorError),
}

impl ClientError {
    /// Message suitable for showing to the user in the add-entry modal.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Type alias for Results that can fail with a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;
