//! App id lookup by bundle identifier.
use crate::error::PortalError;
use crate::model::AppRecord;
use crate::portal::{Portal, PortalApp, PortalResult};
use std::collections::BTreeSet;

/// Exact lookup; `with_entitlements` adds the enabled portal features.
pub fn find(
    portal: &dyn Portal,
    bundle_id: &str,
    with_entitlements: bool,
) -> PortalResult<AppRecord> {
    let app = lookup(portal, bundle_id)?;
    let entitlements = with_entitlements.then(|| enabled_features(&app));
    Ok(AppRecord {
        id: app.app_id,
        bundle_id: app.bundle_id,
        entitlements,
    })
}

/// True only when every required entitlement is enabled on the app.
pub fn check_bundle_id_entitlements(
    portal: &dyn Portal,
    bundle_id: &str,
    required: &[String],
) -> PortalResult<bool> {
    let app = lookup(portal, bundle_id)?;
    let enabled = enabled_features(&app);
    let missing: Vec<&str> = required
        .iter()
        .map(String::as_str)
        .filter(|name| !enabled.contains(*name))
        .collect();
    if !missing.is_empty() {
        tracing::info!(bundle_id, missing = ?missing, "app lacks entitlements");
    }
    Ok(missing.is_empty())
}

fn lookup(portal: &dyn Portal, bundle_id: &str) -> PortalResult<PortalApp> {
    portal
        .find_app(bundle_id)?
        .ok_or_else(|| PortalError::NotFound {
            resource: "app",
            id: bundle_id.to_string(),
        })
}

fn enabled_features(app: &PortalApp) -> BTreeSet<String> {
    app.enabled_features().map(str::to_string).collect()
}
