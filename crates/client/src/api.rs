//! Typed wrapper over the Patientor REST endpoints.

use crate::{ClientError, ClientResult};
use patientor_core::{ApiConfig, Diagnosis, Entry, NewEntry, Patient};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Body of a failed API request.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// HTTP client for the Patientor API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the configured base URL.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /ping`. The response body is ignored.
    pub async fn ping(&self) -> ClientResult<()> {
        let url = self.config.endpoint("/ping");
        let response = self.send(self.http.get(&url), &url).await?;
        check_status(response).await?;
        Ok(())
    }

    /// `GET /patients`: patient summaries.
    pub async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        self.get_json("/patients").await
    }

    /// `GET /diagnoses`.
    pub async fn list_diagnoses(&self) -> ClientResult<Vec<Diagnosis>> {
        self.get_json("/diagnoses").await
    }

    /// `GET /patients/{id}`: the full patient record.
    pub async fn get_patient(&self, id: &str) -> ClientResult<Patient> {
        self.get_json(&format!("/patients/{id}")).await
    }

    /// `POST /patients/{id}/entries`: returns the created entry with its server-assigned id.
    pub async fn add_entry(&self, patient_id: &str, entry: &NewEntry) -> ClientResult<Entry> {
        let url = self
            .config
            .endpoint(&format!("/patients/{patient_id}/entries"));
        tracing::debug!("posting {} entry to {}", entry.kind.entry_type(), url);
        let response = self.send(self.http.post(&url).json(entry), &url).await?;
        decode(check_status(response).await?, &url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        let response = self.send(self.http.get(&url), &url).await?;
        decode(check_status(response).await?, &url).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> ClientResult<Response> {
        request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> ClientResult<T> {
    response.json::<T>().await.map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Turn a non-success response into `ClientError::Api`.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// The `error` field of a JSON body, else the raw body, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(
                StatusCode::BAD_REQUEST,
                r#"{"error":"Incorrect or missing date"}"#
            ),
            "Incorrect or missing date"
        );
    }

    #[test]
    fn error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, "  malformatted id "),
            "malformatted id"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, ""),
            "Not Found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"message":"upstream"}"#),
            r#"{"message":"upstream"}"#
        );
    }
}
