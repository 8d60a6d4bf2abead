//! Readers and writers for each portal resource.
//!
//! Readers project portal objects into records through `vocab`; writers apply
//! their pre-check policy before mutating the portal.
use base64::Engine;

pub mod apps;
pub mod certificates;
pub mod devices;
pub mod profiles;

/// Base64-wrap downloaded certificate or profile bytes.
pub(crate) fn encode_content(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
