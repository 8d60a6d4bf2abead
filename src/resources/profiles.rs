//! Provisioning profile reads and writes.
use super::encode_content;
use crate::error::PortalError;
use crate::model::ProfileRecord;
use crate::portal::{
    CertificateRef, NewProfile, Portal, PortalProfile, PortalResult, ProfileFilter, ProfileRef,
};
use crate::vocab::{DistributionType, ProfileKind, ProfilePlatform, ProfileStatus};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCreateRequest {
    pub distribution: DistributionType,
    pub bundle_id: String,
    pub certificate_id: String,
    pub profile_name: String,
}

/// Profiles of the given distribution type whose name equals `name` exactly.
pub fn list_by_type_and_name(
    portal: &dyn Portal,
    distribution: DistributionType,
    name: &str,
    verbose: bool,
) -> PortalResult<Vec<ProfileRecord>> {
    let matches = matching_profiles(portal, distribution.profile_kind(), name)?;
    matches
        .iter()
        .map(|profile| {
            let content = portal.download_profile(profile)?;
            if verbose {
                tracing::debug!(
                    id = %profile.id,
                    name = %profile.name,
                    bytes = content.len(),
                    "downloaded profile"
                );
            }
            project(profile, &content)
        })
        .collect()
}

/// Create a profile, refusing when one with the same name already exists.
pub fn create(portal: &dyn Portal, request: &ProfileCreateRequest) -> PortalResult<ProfileRecord> {
    let kind = request.distribution.profile_kind();
    let existing = matching_profiles(portal, kind, &request.profile_name)?;
    if let Some(conflict) = existing.first() {
        return Err(PortalError::ProfileNameConflict {
            kind: kind.as_portal_str(),
            name: request.profile_name.clone(),
            existing_id: conflict.id.clone(),
        });
    }

    let created = portal.create_profile(
        kind,
        &NewProfile {
            name: request.profile_name.clone(),
            bundle_id: request.bundle_id.clone(),
            certificates: vec![CertificateRef::new(&request.certificate_id)],
        },
    )?;
    tracing::info!(id = %created.id, kind = %kind, name = %created.name, "created profile");

    let content = portal.download_profile(&created)?;
    project(&created, &content)
}

/// Delete by id; the portal's failure is returned as-is.
pub fn delete(portal: &dyn Portal, id: &str) -> PortalResult<()> {
    portal.delete_profile(&ProfileRef::new(id))?;
    tracing::info!(id, "deleted profile");
    Ok(())
}

fn matching_profiles(
    portal: &dyn Portal,
    kind: ProfileKind,
    name: &str,
) -> PortalResult<Vec<PortalProfile>> {
    let profiles = portal.list_profiles(kind, ProfileFilter::default())?;
    let total = profiles.len();
    let matches: Vec<PortalProfile> = profiles
        .into_iter()
        .filter(|profile| profile.name == name)
        .collect();
    tracing::debug!(kind = %kind, total, matched = matches.len(), "filtered profiles by name");
    Ok(matches)
}

fn project(profile: &PortalProfile, content: &[u8]) -> PortalResult<ProfileRecord> {
    let expiry = OffsetDateTime::parse(&profile.expires, &Rfc3339).map_err(|err| {
        PortalError::UnexpectedResponse(format!(
            "profile {} has unparsable expiry {:?}: {err}",
            profile.id, profile.expires
        ))
    })?;
    Ok(ProfileRecord {
        id: profile.id.clone(),
        uuid: profile.uuid.clone(),
        name: profile.name.clone(),
        status: ProfileStatus::from_portal(&profile.status)?,
        expiry,
        platform: ProfilePlatform::from_portal(&profile.platform)?,
        content: encode_content(content),
        app_id: profile.app_id.clone(),
        bundle_id: profile.bundle_id.clone(),
        certificates: profile.certificate_ids.iter().cloned().collect(),
        devices: profile.device_ids.iter().cloned().collect(),
    })
}
