//! Request dispatch: one subcommand in, one envelope out.
//!
//! The dispatcher is the only place failures are caught. It never inspects
//! the error kind; it renders the message chain and any captured backtrace
//! into the `error` branch.
use crate::logging::LogSettings;
use crate::model::Envelope;
use crate::portal::Portal;
use crate::resources::devices::NewDevice;
use crate::resources::profiles::ProfileCreateRequest;
use crate::resources::{apps, certificates, devices, profiles};
use crate::vocab::DistributionType;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::backtrace::BacktraceStatus;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    ListDevCerts,
    ListDistCerts,
    ListProfiles,
    GetApp,
    DeleteProfile,
    CreateProfile,
    ListDevices,
    RegisterDevices,
    CheckAppEntitlements,
}

impl Subcommand {
    pub const ALL: [Subcommand; 9] = [
        Self::ListDevCerts,
        Self::ListDistCerts,
        Self::ListProfiles,
        Self::GetApp,
        Self::DeleteProfile,
        Self::CreateProfile,
        Self::ListDevices,
        Self::RegisterDevices,
        Self::CheckAppEntitlements,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ListDevCerts => "list_dev_certs",
            Self::ListDistCerts => "list_dist_certs",
            Self::ListProfiles => "list_profiles",
            Self::GetApp => "get_app",
            Self::DeleteProfile => "delete_profile",
            Self::CreateProfile => "create_profile",
            Self::ListDevices => "list_devices",
            Self::RegisterDevices => "register_devices",
            Self::CheckAppEntitlements => "check_app_entitlements",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subcommand {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.name() == value)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|s| s.name()).collect();
                anyhow!(
                    "unknown subcommand {value:?} (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

/// Named string parameters of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub bundle_id: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub certificate: Option<String>,
    pub profile_name: Option<String>,
    pub profile_type: Option<String>,
    /// `UDID=NAME` pairs for `register_devices`.
    pub devices: Vec<String>,
    pub entitlements: Vec<String>,
    pub with_entitlements: bool,
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("--{flag} is required"))
}

impl Params {
    fn distribution_type(&self) -> Result<DistributionType> {
        let raw = required(&self.profile_type, "profile-type")?;
        Ok(DistributionType::from_external(raw)?)
    }

    fn new_devices(&self) -> Result<Vec<NewDevice>> {
        if self.devices.is_empty() {
            return Err(anyhow!("--device UDID=NAME is required at least once"));
        }
        self.devices
            .iter()
            .map(|pair| {
                let (udid, name) = pair
                    .split_once('=')
                    .filter(|(udid, name)| !udid.trim().is_empty() && !name.trim().is_empty())
                    .ok_or_else(|| anyhow!("--device expects UDID=NAME (got {pair:?})"))?;
                Ok(NewDevice {
                    udid: udid.trim().to_string(),
                    name: name.trim().to_string(),
                })
            })
            .collect()
    }
}

pub struct Dispatcher<'a> {
    portal: &'a dyn Portal,
    logging: LogSettings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(portal: &'a dyn Portal, logging: LogSettings) -> Self {
        Self { portal, logging }
    }

    pub fn dispatch(&self, subcommand: &str, params: &Params) -> Envelope {
        match self.run(subcommand, params) {
            Ok(data) => Envelope::Data(data),
            Err(err) => {
                tracing::debug!(subcommand, "dispatch failed");
                Envelope::Error(render_error(&err))
            }
        }
    }

    fn run(&self, subcommand: &str, params: &Params) -> Result<Value> {
        let subcommand: Subcommand = subcommand.parse()?;
        tracing::info!(%subcommand, "dispatching");
        let portal = self.portal;
        let verbose = self.logging.verbose;

        match subcommand {
            Subcommand::ListDevCerts => to_data(
                certificates::list_development(portal, verbose)
                    .context("list development certificates")?,
            ),
            Subcommand::ListDistCerts => to_data(
                certificates::list_production(portal, verbose)
                    .context("list distribution certificates")?,
            ),
            Subcommand::ListProfiles => {
                let distribution = params.distribution_type()?;
                let name = required(&params.name, "name")?;
                to_data(
                    profiles::list_by_type_and_name(portal, distribution, name, verbose)
                        .with_context(|| format!("list profiles named {name:?}"))?,
                )
            }
            Subcommand::GetApp => {
                let bundle_id = required(&params.bundle_id, "bundle_id")?;
                to_data(
                    apps::find(portal, bundle_id, params.with_entitlements)
                        .with_context(|| format!("find app {bundle_id}"))?,
                )
            }
            Subcommand::DeleteProfile => {
                let id = required(&params.id, "id")?;
                profiles::delete(portal, id).with_context(|| format!("delete profile {id}"))?;
                Ok(json!({ "status": "OK" }))
            }
            Subcommand::CreateProfile => {
                let request = ProfileCreateRequest {
                    distribution: params.distribution_type()?,
                    bundle_id: required(&params.bundle_id, "bundle_id")?.to_string(),
                    certificate_id: required(&params.certificate, "certificate")?.to_string(),
                    profile_name: required(&params.profile_name, "profile_name")?.to_string(),
                };
                to_data(
                    profiles::create(portal, &request)
                        .with_context(|| format!("create profile {:?}", request.profile_name))?,
                )
            }
            Subcommand::ListDevices => {
                to_data(devices::list_all(portal).context("list devices")?)
            }
            Subcommand::RegisterDevices => {
                let wanted = params.new_devices()?;
                to_data(devices::register_missing(portal, &wanted).context("register devices")?)
            }
            Subcommand::CheckAppEntitlements => {
                let bundle_id = required(&params.bundle_id, "bundle_id")?;
                to_data(
                    apps::check_bundle_id_entitlements(portal, bundle_id, &params.entitlements)
                        .with_context(|| format!("check entitlements of {bundle_id}"))?,
                )
            }
        }
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("serialize response data")
}

/// Message chain plus the origin's backtrace, as one string.
///
/// Capture is opt-in: `anyhow` records a backtrace only when
/// `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set, and only then does the
/// text gain a `, stacktrace: ...` suffix. A trace taken here would point at
/// this function rather than where the failure happened.
pub fn render_error(err: &anyhow::Error) -> String {
    let message = format!("{err:#}");
    let backtrace = err.backtrace();
    match backtrace.status() {
        BacktraceStatus::Captured => format!("{message}, stacktrace: {backtrace}"),
        _ => message,
    }
}
