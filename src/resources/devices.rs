//! Device listing and registration.
use crate::error::{PortalError, RegistrationFailure};
use crate::model::DeviceRecord;
use crate::portal::{DeviceFilter, Portal, PortalDevice, PortalResult};
use crate::vocab::{DeviceClass, DevicePlatform, DeviceStatus};

/// A device a caller wants present on the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub udid: String,
    pub name: String,
}

/// All enabled, non-mac devices. One unrecognized value fails the whole list.
pub fn list_all(portal: &dyn Portal) -> PortalResult<Vec<DeviceRecord>> {
    portal
        .list_devices(DeviceFilter::default())?
        .iter()
        .map(project)
        .collect()
}

pub fn register(
    portal: &dyn Portal,
    device: &NewDevice,
) -> Result<DeviceRecord, RegistrationFailure> {
    let failure = |source: PortalError| RegistrationFailure {
        udid: device.udid.clone(),
        name: device.name.clone(),
        source,
    };
    let created = portal
        .create_device(&device.udid, &device.name)
        .map_err(failure)?;
    project(&created).map_err(failure)
}

/// Register every device the portal does not know yet.
///
/// Output follows input order. Already-registered devices yield their existing
/// record; a failed registration, or an existing device this crate cannot
/// project, is logged and yields `None` so the rest of the batch still runs.
pub fn register_missing(
    portal: &dyn Portal,
    devices: &[NewDevice],
) -> PortalResult<Vec<Option<DeviceRecord>>> {
    let known = portal.list_devices(DeviceFilter::default())?;
    let mut results = Vec::with_capacity(devices.len());
    for device in devices {
        if let Some(existing) = known.iter().find(|k| same_udid(&k.udid, &device.udid)) {
            tracing::info!(udid = %device.udid, id = %existing.id, "device already registered");
            match project(existing) {
                Ok(record) => results.push(Some(record)),
                Err(err) => {
                    tracing::warn!(
                        udid = %existing.udid,
                        id = %existing.id,
                        error = %err,
                        "registered device has unrecognized portal values"
                    );
                    results.push(None);
                }
            }
            continue;
        }
        match register(portal, device) {
            Ok(record) => {
                tracing::info!(udid = %record.udid, id = %record.id, "registered device");
                results.push(Some(record));
            }
            Err(failure) => {
                tracing::warn!(
                    udid = %failure.udid,
                    name = %failure.name,
                    error = %failure.source,
                    "failed to register device"
                );
                results.push(None);
            }
        }
    }
    Ok(results)
}

fn same_udid(left: &str, right: &str) -> bool {
    normalize_udid(left) == normalize_udid(right)
}

fn normalize_udid(udid: &str) -> String {
    udid.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn project(device: &PortalDevice) -> PortalResult<DeviceRecord> {
    Ok(DeviceRecord {
        id: device.id.clone(),
        udid: device.udid.clone(),
        name: device.name.clone(),
        model: device.model.clone(),
        status: DeviceStatus::from_portal(&device.status)?,
        platform: DevicePlatform::from_portal(&device.platform)?,
        device_class: DeviceClass::from_portal(&device.device_type)?,
    })
}
