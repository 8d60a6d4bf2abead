//! Translation between the portal's internal vocabulary and the stable
//! external one.
//!
//! Every translator is a closed table: values outside it fail with
//! [`PortalError::UnrecognizedEnumValue`] instead of passing through.
use crate::error::PortalError;
use serde::Serialize;
use std::fmt;

/// Which vocabulary a value belongs to, used in translation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumAxis {
    DeviceStatus,
    DevicePlatform,
    DeviceClass,
    ProfileStatus,
    ProfilePlatform,
    DistributionType,
}

impl fmt::Display for EnumAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DeviceStatus => "device status",
            Self::DevicePlatform => "device platform",
            Self::DeviceClass => "device class",
            Self::ProfileStatus => "profile status",
            Self::ProfilePlatform => "profile platform",
            Self::DistributionType => "distribution type",
        };
        f.write_str(label)
    }
}

fn unrecognized(axis: EnumAxis, value: &str) -> PortalError {
    PortalError::UnrecognizedEnumValue {
        axis,
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Enabled,
    Disabled,
}

impl DeviceStatus {
    pub fn from_portal(value: &str) -> Result<Self, PortalError> {
        match value {
            "c" => Ok(Self::Enabled),
            "r" => Ok(Self::Disabled),
            other => Err(unrecognized(EnumAxis::DeviceStatus, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevicePlatform {
    Ios,
    MacOs,
}

impl DevicePlatform {
    pub fn from_portal(value: &str) -> Result<Self, PortalError> {
        match value {
            "ios" => Ok(Self::Ios),
            "mac" => Ok(Self::MacOs),
            other => Err(unrecognized(EnumAxis::DevicePlatform, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceClass {
    Iphone,
    AppleWatch,
    AppleTv,
    Ipad,
    Ipod,
}

impl DeviceClass {
    pub fn from_portal(value: &str) -> Result<Self, PortalError> {
        match value {
            "iphone" => Ok(Self::Iphone),
            "watch" => Ok(Self::AppleWatch),
            "tvOS" => Ok(Self::AppleTv),
            "ipad" => Ok(Self::Ipad),
            "ipod" => Ok(Self::Ipod),
            other => Err(unrecognized(EnumAxis::DeviceClass, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
    Active,
    Expired,
    Invalid,
}

impl ProfileStatus {
    pub fn from_portal(value: &str) -> Result<Self, PortalError> {
        match value {
            "Active" => Ok(Self::Active),
            "Expired" => Ok(Self::Expired),
            "Invalid" => Ok(Self::Invalid),
            other => Err(unrecognized(EnumAxis::ProfileStatus, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfilePlatform {
    Ios,
}

impl ProfilePlatform {
    pub fn from_portal(value: &str) -> Result<Self, PortalError> {
        match value {
            "ios" => Ok(Self::Ios),
            other => Err(unrecognized(EnumAxis::ProfilePlatform, other)),
        }
    }
}

/// Distribution type as callers name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionType {
    IosAppDevelopment,
    IosAppStore,
    IosAppAdhoc,
    IosAppInhouse,
}

impl DistributionType {
    pub fn from_external(value: &str) -> Result<Self, PortalError> {
        match value {
            "IOS_APP_DEVELOPMENT" => Ok(Self::IosAppDevelopment),
            "IOS_APP_STORE" => Ok(Self::IosAppStore),
            "IOS_APP_ADHOC" => Ok(Self::IosAppAdhoc),
            "IOS_APP_INHOUSE" => Ok(Self::IosAppInhouse),
            other => Err(unrecognized(EnumAxis::DistributionType, other)),
        }
    }

    pub fn profile_kind(self) -> ProfileKind {
        match self {
            Self::IosAppDevelopment => ProfileKind::Development,
            Self::IosAppStore => ProfileKind::AppStore,
            Self::IosAppAdhoc => ProfileKind::AdHoc,
            Self::IosAppInhouse => ProfileKind::InHouse,
        }
    }
}

/// Portal endpoint family a profile lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Development,
    AppStore,
    AdHoc,
    InHouse,
}

impl ProfileKind {
    pub fn as_portal_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::AppStore => "app_store",
            Self::AdHoc => "ad_hoc",
            Self::InHouse => "in_house",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_portal_str())
    }
}
