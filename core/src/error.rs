//! Error types for the veterinary admin API client.
//!
//! # Design
//! The backend reports failures in several shapes: a validation list
//! (`{"errors":[{"path","msg"}]}`), a message object (`{"message"}`), or a
//! bare body. `ApiError::from_response` folds all of them into one tagged
//! enum so callers branch on the variant, never on JSON shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpResponse;

/// A single server- or client-side validation failure bound to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(alias = "param")]
    pub path: String,
    pub msg: String,
}

/// Field name to message, one message per field (the first one reported).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `msg` for `path` unless the field already has a message.
    pub fn insert(&mut self, path: impl Into<String>, msg: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| msg.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_vec(&self) -> Vec<FieldError> {
        self.iter()
            .map(|(path, msg)| FieldError {
                path: path.to_string(),
                msg: msg.to_string(),
            })
            .collect()
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for e in iter {
            errors.insert(e.path, e.msg);
        }
        errors
    }
}

/// Which endpoint family produced a response. Login rejections are ordinary
/// banner errors; everywhere else a 401/403 means the session is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    Session,
    Login,
}

/// Errors returned by every client parse method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server rejected one or more fields.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// 401/403 outside login. The session has been cleared.
    #[error("session expired or forbidden (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 404 from the server.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<Vec<FieldError>>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Normalize a non-2xx response.
    pub fn from_response(response: &HttpResponse, policy: AuthPolicy) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(&response.body).ok();
        let (field_errors, message) = match parsed {
            Some(body) => (body.errors, body.message),
            None => (None, None),
        };

        if let Some(errors) = field_errors.filter(|e| !e.is_empty()) {
            return ApiError::Validation(errors.into_iter().collect());
        }

        let message = message
            .or_else(|| {
                let raw = response.body.trim();
                (!raw.is_empty() && !raw.starts_with('{')).then(|| raw.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        match (response.status, policy) {
            (401 | 403, AuthPolicy::Session) => ApiError::Unauthorized {
                status: response.status,
                message,
            },
            (404, _) => ApiError::NotFound(message),
            (status, _) => ApiError::Api { status, message },
        }
    }

    /// Server field errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text for a page- or modal-level banner.
    pub fn banner(&self) -> String {
        match self {
            ApiError::Validation(errors) => match errors.iter().next() {
                Some((_, msg)) if errors.len() == 1 => msg.to_string(),
                _ => "Please correct the highlighted fields".to_string(),
            },
            ApiError::Unauthorized { .. } => "Your session has expired, please sign in again".to_string(),
            other => other.to_string(),
        }
    }
}
