//! Normalized records returned to callers, and the response envelope.
//!
//! Records are built fresh from portal objects on every request.
use crate::vocab::{DeviceClass, DevicePlatform, DeviceStatus, ProfilePlatform, ProfileStatus};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub id: String,
    /// Base64 of the downloaded certificate bytes.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub status: ProfileStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub expiry: OffsetDateTime,
    pub platform: ProfilePlatform,
    pub content: String,
    pub app_id: String,
    pub bundle_id: String,
    /// Certificate ids only; profiles never embed certificate records.
    pub certificates: BTreeSet<String>,
    pub devices: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub id: String,
    pub udid: String,
    pub name: String,
    pub model: String,
    pub status: DeviceStatus,
    pub platform: DevicePlatform,
    #[serde(rename = "class")]
    pub device_class: DeviceClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    pub id: String,
    #[serde(rename = "bundleID")]
    pub bundle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<BTreeSet<String>>,
}

/// The single output shape of every dispatch: exactly one of `data` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Data(Value),
    Error(String),
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
