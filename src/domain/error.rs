use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// The `code` Iterable puts in the envelope of a successful call.
pub const SUCCESS_CODE: &str = "Success";

/// Result envelope returned by the Iterable API.
///
/// Iterable answers failed calls with this shape on a non-2xx status, and
/// mutating endpoints answer every call with it, signalling some failures
/// in-band with a 2xx status and a `code` other than `"Success"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("Iterable API error: {code} - {message}")]
pub struct ApiError {
    pub code: String,
    #[serde(rename = "msg", default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
}

impl ApiError {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Turns an in-band failure into an error.
    pub fn into_result(self) -> Result<(), IterableError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(IterableError::Api(self))
        }
    }
}

/// Everything that can go wrong between parsing the command line and
/// printing a result.
#[derive(Debug, Error)]
pub enum IterableError {
    /// Missing or contradictory arguments, detected before any network call.
    #[error("{0}")]
    Usage(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP transport failed: {0}")]
    Transport(String),

    #[error("failed to parse {payload}")]
    Decode {
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("API request failed with status {status}")]
    Status {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IterableError {
    pub fn usage(message: impl Into<String>) -> Self {
        IterableError::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, IterableError::Usage(_))
    }
}
