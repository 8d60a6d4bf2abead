//! In-memory portal used by unit tests.
use super::{
    CertificateKind, DeviceFilter, NewProfile, Portal, PortalApp, PortalCertificate, PortalDevice,
    PortalProfile, PortalResult, ProfileFilter, ProfileRef,
};
use crate::error::PortalError;
use crate::vocab::ProfileKind;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

#[derive(Default)]
pub struct FakePortal {
    pub development_certificates: Vec<PortalCertificate>,
    pub production_certificates: Vec<PortalCertificate>,
    pub profiles: RefCell<Vec<(ProfileKind, PortalProfile)>>,
    pub devices: RefCell<Vec<PortalDevice>>,
    pub apps: Vec<PortalApp>,
    /// Ids whose download fails.
    pub broken_downloads: HashSet<String>,
    /// UDIDs the portal refuses to register.
    pub rejected_udids: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        format!("{prefix}-{next}")
    }

    fn download(&self, id: &str) -> PortalResult<Vec<u8>> {
        if self.broken_downloads.contains(id) {
            return Err(PortalError::Transport {
                message: format!("download {id} failed"),
                detail: None,
            });
        }
        Ok(format!("bytes-of-{id}").into_bytes())
    }
}

pub fn certificate(id: &str) -> PortalCertificate {
    PortalCertificate {
        id: id.to_string(),
        name: format!("Apple Development: {id}"),
    }
}

pub fn profile(id: &str, name: &str) -> PortalProfile {
    PortalProfile {
        id: id.to_string(),
        uuid: format!("uuid-{id}"),
        name: name.to_string(),
        status: "Active".to_string(),
        expires: "2027-03-01T12:00:00Z".to_string(),
        platform: "ios".to_string(),
        app_id: "APP1".to_string(),
        bundle_id: "io.example.app".to_string(),
        certificate_ids: vec!["C1".to_string()],
        device_ids: vec!["D2".to_string(), "D1".to_string()],
    }
}

pub fn device(id: &str, udid: &str, device_type: &str) -> PortalDevice {
    PortalDevice {
        id: id.to_string(),
        udid: udid.to_string(),
        name: format!("device {id}"),
        model: "iPhone 15".to_string(),
        status: "c".to_string(),
        platform: "ios".to_string(),
        device_type: device_type.to_string(),
    }
}

pub fn app(bundle_id: &str, features: &[(&str, bool)]) -> PortalApp {
    PortalApp {
        app_id: format!("app-{bundle_id}"),
        bundle_id: bundle_id.to_string(),
        features: features
            .iter()
            .map(|(name, enabled)| (name.to_string(), *enabled))
            .collect::<BTreeMap<_, _>>(),
    }
}

impl Portal for FakePortal {
    fn list_certificates(&self, kind: CertificateKind) -> PortalResult<Vec<PortalCertificate>> {
        self.record(format!("list_certificates {}", kind.as_portal_str()));
        Ok(match kind {
            CertificateKind::Development => self.development_certificates.clone(),
            CertificateKind::Production => self.production_certificates.clone(),
        })
    }

    fn download_certificate(&self, certificate: &PortalCertificate) -> PortalResult<Vec<u8>> {
        self.record(format!("download_certificate {}", certificate.id));
        self.download(&certificate.id)
    }

    fn list_profiles(
        &self,
        kind: ProfileKind,
        filter: ProfileFilter,
    ) -> PortalResult<Vec<PortalProfile>> {
        self.record(format!(
            "list_profiles {kind} mac={} xcode={}",
            filter.mac, filter.xcode
        ));
        Ok(self
            .profiles
            .borrow()
            .iter()
            .filter(|(profile_kind, _)| *profile_kind == kind)
            .map(|(_, profile)| profile.clone())
            .collect())
    }

    fn download_profile(&self, profile: &PortalProfile) -> PortalResult<Vec<u8>> {
        self.record(format!("download_profile {}", profile.id));
        self.download(&profile.id)
    }

    fn create_profile(
        &self,
        kind: ProfileKind,
        request: &NewProfile,
    ) -> PortalResult<PortalProfile> {
        let certificate_ids: Vec<String> =
            request.certificates.iter().map(|c| c.id.clone()).collect();
        self.record(format!(
            "create_profile {kind} {} certs={}",
            request.name,
            certificate_ids.join(",")
        ));
        let id = self.allocate_id("P");
        let created = PortalProfile {
            bundle_id: request.bundle_id.clone(),
            certificate_ids,
            device_ids: Vec::new(),
            ..profile(&id, &request.name)
        };
        self.profiles.borrow_mut().push((kind, created.clone()));
        Ok(created)
    }

    fn delete_profile(&self, target: &ProfileRef) -> PortalResult<()> {
        self.record(format!("delete_profile {}", target.id));
        let mut profiles = self.profiles.borrow_mut();
        let before = profiles.len();
        profiles.retain(|(_, profile)| profile.id != target.id);
        if profiles.len() == before {
            return Err(PortalError::Transport {
                message: format!("DELETE /profiles/{} returned 404", target.id),
                detail: Some("profile not found".to_string()),
            });
        }
        Ok(())
    }

    fn list_devices(&self, filter: DeviceFilter) -> PortalResult<Vec<PortalDevice>> {
        self.record(format!(
            "list_devices mac={} include_disabled={}",
            filter.mac, filter.include_disabled
        ));
        Ok(self
            .devices
            .borrow()
            .iter()
            .filter(|device| filter.mac || device.platform != "mac")
            .filter(|device| filter.include_disabled || device.status != "r")
            .cloned()
            .collect())
    }

    fn create_device(&self, udid: &str, name: &str) -> PortalResult<PortalDevice> {
        self.record(format!("create_device {udid}"));
        if self.rejected_udids.contains(udid) {
            return Err(PortalError::UnexpectedResponse(format!(
                "device {udid} is not a valid UDID"
            )));
        }
        let id = self.allocate_id("D");
        let created = PortalDevice {
            name: name.to_string(),
            ..device(&id, udid, "iphone")
        };
        self.devices.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn find_app(&self, bundle_id: &str) -> PortalResult<Option<PortalApp>> {
        self.record(format!("find_app {bundle_id}"));
        Ok(self
            .apps
            .iter()
            .find(|app| app.bundle_id == bundle_id)
            .cloned())
    }
}
