//! Constants used throughout the Patientor core crate.
//!
//! Base URLs, environment variable names and the user-facing validation messages live here so
//! that the validator, the binaries and the tests agree on the exact strings.

/// API base URL used during local development.
pub const DEV_API_BASE_URL: &str = "http://localhost:3001/api";

/// API base URL of the deployed backend.
pub const PROD_API_BASE_URL: &str = "https://ahojukka5-patientor-backend.eu-gb.mybluemix.net/api";

/// Environment variable selecting development or production.
pub const ENVIRONMENT_VAR: &str = "PATIENTOR_ENV";

/// Environment variable overriding the API base URL.
pub const API_BASE_URL_VAR: &str = "PATIENTOR_API_BASE_URL";

/// Message for a missing required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a date that does not resolve to a calendar date.
pub const INVALID_DATE_MESSAGE: &str = "Date is incorrect.";

/// Message for a missing or unknown entry type.
pub const CHOOSE_TYPE_MESSAGE: &str = "Choose one of the options";

/// Message for a health check rating outside 0..=3.
pub const INVALID_RATING_MESSAGE: &str = "Rating must be one of 0, 1, 2 or 3.";

/// Status reported by the submitter when the form cannot be narrowed.
pub const INVALID_SUBMISSION_STATUS: &str = "invalid";
