//! Certificate listing.
//!
//! Every certificate is downloaded individually after the listing call, in
//! the order the portal returned them.
use super::encode_content;
use crate::model::CertificateRecord;
use crate::portal::{CertificateKind, Portal, PortalResult};

pub fn list_development(
    portal: &dyn Portal,
    verbose: bool,
) -> PortalResult<Vec<CertificateRecord>> {
    list(portal, CertificateKind::Development, verbose)
}

pub fn list_production(portal: &dyn Portal, verbose: bool) -> PortalResult<Vec<CertificateRecord>> {
    list(portal, CertificateKind::Production, verbose)
}

fn list(
    portal: &dyn Portal,
    kind: CertificateKind,
    verbose: bool,
) -> PortalResult<Vec<CertificateRecord>> {
    let certificates = portal.list_certificates(kind)?;
    tracing::info!(
        kind = kind.as_portal_str(),
        count = certificates.len(),
        "listed portal certificates"
    );

    let mut records = Vec::with_capacity(certificates.len());
    for certificate in &certificates {
        let bytes = portal.download_certificate(certificate)?;
        if verbose {
            tracing::debug!(
                id = %certificate.id,
                name = %certificate.name,
                bytes = bytes.len(),
                "downloaded certificate"
            );
        }
        records.push(CertificateRecord {
            id: certificate.id.clone(),
            content: encode_content(&bytes),
        });
    }
    Ok(records)
}
