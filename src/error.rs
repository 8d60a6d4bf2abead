//! Typed failures raised while talking to the developer portal.
//!
//! Readers and writers return these unchanged; only the dispatcher turns them
//! into envelope text.
use crate::vocab::EnumAxis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("authentication failed for {username}: {reason}")]
    Authentication { username: String, reason: String },

    #[error("unrecognized {axis} value {value:?}")]
    UnrecognizedEnumValue { axis: EnumAxis, value: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("portal request failed: {message}{}", detail_suffix(.detail))]
    Transport {
        message: String,
        detail: Option<String>,
    },

    #[error("unexpected portal response: {0}")]
    UnexpectedResponse(String),

    #[error("a {kind} profile named {name:?} already exists (id {existing_id})")]
    ProfileNameConflict {
        kind: &'static str,
        name: String,
        existing_id: String,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(" ({text})"),
        _ => String::new(),
    }
}

/// A device the portal refused to register.
#[derive(Debug, Error)]
#[error("failed to register device {name:?} (udid {udid})")]
pub struct RegistrationFailure {
    pub udid: String,
    pub name: String,
    #[source]
    pub source: PortalError,
}
