//! Blocking HTTP transport for the developer portal's JSON API.
//!
//! The only way to obtain an [`HttpPortal`] is [`HttpPortal::login`], so every
//! value of this type carries an authenticated session.
use super::{
    CertificateKind, DeviceFilter, NewProfile, Portal, PortalApp, PortalCertificate, PortalDevice,
    PortalProfile, PortalResult, ProfileFilter, ProfileRef,
};
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::vocab::ProfileKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use ureq::http::Response;
use ureq::{Agent, Body};
use url::Url;

pub const SESSION_HEADER: &str = "X-Portal-Session";

pub struct HttpPortal {
    agent: Agent,
    base_url: Url,
    session: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    account_name: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    session: String,
}

#[derive(Deserialize)]
struct CertificateList {
    certificates: Vec<PortalCertificate>,
}

#[derive(Deserialize)]
struct ProfileList {
    profiles: Vec<PortalProfile>,
}

#[derive(Deserialize)]
struct DeviceList {
    devices: Vec<PortalDevice>,
}

#[derive(Deserialize)]
struct AppList {
    apps: Vec<PortalApp>,
}

#[derive(Serialize)]
struct CreateProfileRequest<'a> {
    kind: &'static str,
    #[serde(flatten)]
    profile: &'a NewProfile,
}

#[derive(Serialize)]
struct CreateDeviceRequest<'a> {
    udid: &'a str,
    name: &'a str,
}

impl HttpPortal {
    /// Open a portal session with the configured credentials.
    pub fn login(config: &PortalConfig) -> PortalResult<Self> {
        // Status codes are inspected here so error bodies reach the message.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let base_url = Url::parse(&config.base_url).map_err(|err| PortalError::Transport {
            message: format!("invalid portal url {}", config.base_url),
            detail: Some(err.to_string()),
        })?;
        let start = Instant::now();
        let mut response = agent
            .post(endpoint(&base_url, &["session"])?.as_str())
            .send_json(LoginRequest {
                account_name: &config.username,
                password: &config.password,
            })
            .map_err(|err| transport_failure("POST", "/session", err))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(PortalError::Authentication {
                username: config.username.clone(),
                reason: format!("portal returned {status}: {}", body.trim()),
            });
        }
        let mut response = check_status(response, "POST", "/session")?;
        let login: LoginResponse = read_json(&mut response, "POST", "/session")?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            username = %config.username,
            "portal session established"
        );

        Ok(Self {
            agent,
            base_url,
            session: login.session,
        })
    }

    fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> PortalResult<Response<Body>> {
        let path = label(segments);
        let mut request = self
            .agent
            .get(endpoint(&self.base_url, segments)?.as_str())
            .header(SESSION_HEADER, &self.session);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let response = request.call().map_err(|err| transport_failure("GET", &path, err))?;
        check_status(response, "GET", &path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> PortalResult<T> {
        let mut response = self.get(segments, query)?;
        read_json(&mut response, "GET", &label(segments))
    }

    fn get_bytes(&self, segments: &[&str]) -> PortalResult<Vec<u8>> {
        let mut response = self.get(segments, &[])?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|err| transport_failure("GET", &label(segments), err))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> PortalResult<T> {
        let path = label(segments);
        let response = self
            .agent
            .post(endpoint(&self.base_url, segments)?.as_str())
            .header(SESSION_HEADER, &self.session)
            .send_json(body)
            .map_err(|err| transport_failure("POST", &path, err))?;
        let mut response = check_status(response, "POST", &path)?;
        read_json(&mut response, "POST", &path)
    }
}

/// Append `segments` to the base path, percent-encoding each one so an id
/// can never spill into the query, fragment or a sibling path.
fn endpoint(base: &Url, segments: &[&str]) -> PortalResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| PortalError::Transport {
            message: format!("portal url {base} cannot carry a path"),
            detail: None,
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Unencoded request path used in error messages.
fn label(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn transport_failure(method: &str, path: &str, err: ureq::Error) -> PortalError {
    PortalError::Transport {
        message: format!("{method} {path} failed"),
        detail: Some(err.to_string()),
    }
}

fn check_status(
    mut response: Response<Body>,
    method: &str,
    path: &str,
) -> PortalResult<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(PortalError::Transport {
        message: format!("{method} {path} returned {}", status.as_u16()),
        detail: Some(body),
    })
}

fn read_json<T: DeserializeOwned>(
    response: &mut Response<Body>,
    method: &str,
    path: &str,
) -> PortalResult<T> {
    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|err| transport_failure(method, path, err))?;
    serde_json::from_str(&text)
        .map_err(|err| PortalError::UnexpectedResponse(format!("{method} {path}: {err}")))
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl Portal for HttpPortal {
    fn list_certificates(&self, kind: CertificateKind) -> PortalResult<Vec<PortalCertificate>> {
        let list: CertificateList =
            self.get_json(&["certificates"], &[("kind", kind.as_portal_str())])?;
        Ok(list.certificates)
    }

    fn download_certificate(&self, certificate: &PortalCertificate) -> PortalResult<Vec<u8>> {
        self.get_bytes(&["certificates", certificate.id.as_str(), "download"])
    }

    fn list_profiles(
        &self,
        kind: ProfileKind,
        filter: ProfileFilter,
    ) -> PortalResult<Vec<PortalProfile>> {
        let list: ProfileList = self.get_json(
            &["profiles"],
            &[
                ("kind", kind.as_portal_str()),
                ("mac", flag(filter.mac)),
                ("xcode", flag(filter.xcode)),
            ],
        )?;
        Ok(list.profiles)
    }

    fn download_profile(&self, profile: &PortalProfile) -> PortalResult<Vec<u8>> {
        self.get_bytes(&["profiles", profile.id.as_str(), "download"])
    }

    fn create_profile(
        &self,
        kind: ProfileKind,
        profile: &NewProfile,
    ) -> PortalResult<PortalProfile> {
        self.post_json(
            &["profiles"],
            &CreateProfileRequest {
                kind: kind.as_portal_str(),
                profile,
            },
        )
    }

    fn delete_profile(&self, profile: &ProfileRef) -> PortalResult<()> {
        let segments = ["profiles", profile.id.as_str()];
        let path = label(&segments);
        let response = self
            .agent
            .delete(endpoint(&self.base_url, &segments)?.as_str())
            .header(SESSION_HEADER, &self.session)
            .call()
            .map_err(|err| transport_failure("DELETE", &path, err))?;
        check_status(response, "DELETE", &path)?;
        Ok(())
    }

    fn list_devices(&self, filter: DeviceFilter) -> PortalResult<Vec<PortalDevice>> {
        let list: DeviceList = self.get_json(
            &["devices"],
            &[
                ("mac", flag(filter.mac)),
                ("include_disabled", flag(filter.include_disabled)),
            ],
        )?;
        Ok(list.devices)
    }

    fn create_device(&self, udid: &str, name: &str) -> PortalResult<PortalDevice> {
        self.post_json(&["devices"], &CreateDeviceRequest { udid, name })
    }

    fn find_app(&self, bundle_id: &str) -> PortalResult<Option<PortalApp>> {
        let list: AppList = self.get_json(&["apps"], &[("bundle_id", bundle_id)])?;
        Ok(list.apps.into_iter().find(|app| app.bundle_id == bundle_id))
    }
}
