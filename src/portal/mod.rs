//! Narrow interface to the remote developer portal.
//!
//! Objects here carry the portal's raw vocabulary; translation into records
//! happens in `resources`. The HTTP transport lives in [`http`].
use crate::error::PortalError;
use crate::vocab::ProfileKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod http;

#[cfg(test)]
pub mod fake;

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateKind {
    Development,
    Production,
}

impl CertificateKind {
    pub fn as_portal_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortalCertificate {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalProfile {
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub status: String,
    pub expires: String,
    pub platform: String,
    pub app_id: String,
    pub bundle_id: String,
    #[serde(default)]
    pub certificate_ids: Vec<String>,
    #[serde(default)]
    pub device_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalDevice {
    pub id: String,
    pub udid: String,
    pub name: String,
    #[serde(default)]
    pub model: String,
    pub status: String,
    pub platform: String,
    pub device_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalApp {
    pub app_id: String,
    pub bundle_id: String,
    /// Portal feature switches attached to the app id.
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl PortalApp {
    pub fn enabled_features(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }
}

/// Reference to a portal certificate by id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRef {
    pub id: String,
}

impl CertificateRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Reference to a portal profile by id alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRef {
    pub id: String,
}

impl ProfileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The default lists iOS profiles, excluding Xcode-managed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub mac: bool,
    pub xcode: bool,
}

/// The default lists enabled, non-mac devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub mac: bool,
    pub include_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub name: String,
    pub bundle_id: String,
    pub certificates: Vec<CertificateRef>,
}

/// Operations the portal exposes to the orchestration layer.
///
/// Implementations are blocking; callers issue one request at a time.
pub trait Portal {
    fn list_certificates(&self, kind: CertificateKind) -> PortalResult<Vec<PortalCertificate>>;
    fn download_certificate(&self, certificate: &PortalCertificate) -> PortalResult<Vec<u8>>;

    fn list_profiles(
        &self,
        kind: ProfileKind,
        filter: ProfileFilter,
    ) -> PortalResult<Vec<PortalProfile>>;
    fn download_profile(&self, profile: &PortalProfile) -> PortalResult<Vec<u8>>;
    fn create_profile(&self, kind: ProfileKind, profile: &NewProfile)
        -> PortalResult<PortalProfile>;
    fn delete_profile(&self, profile: &ProfileRef) -> PortalResult<()>;

    fn list_devices(&self, filter: DeviceFilter) -> PortalResult<Vec<PortalDevice>>;
    fn create_device(&self, udid: &str, name: &str) -> PortalResult<PortalDevice>;

    fn find_app(&self, bundle_id: &str) -> PortalResult<Option<PortalApp>>;
}
