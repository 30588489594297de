//! Capability URLs: `{prefix}/{host}/{key}/{file}`.
//!
//! Possession of the URL is the only proof of authorization, so key checks
//! run in constant time and every failure looks the same to the client.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Artifact name under which a host's bundle is served.
pub const CONFIG_ARCHIVE_NAME: &str = "config.tar";

/// Build the capability URL for `file_name` on a host.
///
/// No normalization is applied; callers pass valid path segments.
pub fn capability_url(prefix: &str, host_name: &str, capability_key: &str, file_name: &str) -> String {
    format!("{}/{}/{}/{}", prefix, host_name, capability_key, file_name)
}

/// Compare a presented key with the expected one in constant time.
///
/// Both keys are hashed first so the comparison always covers 32 bytes and
/// the expected key's length does not show in the timing.
pub fn keys_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    bool::from(presented.as_slice().ct_eq(expected.as_slice()))
}

/// The three segments of a capability request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityPath<'a> {
    pub host: &'a str,
    pub key: &'a str,
    pub file: &'a str,
}

impl<'a> CapabilityPath<'a> {
    /// Parse a request target into `(host, key, file)`.
    ///
    /// The query string is ignored and surrounding slashes are trimmed. The
    /// file segment keeps any further slashes. Returns `None` unless all three
    /// segments are present and non-empty.
    pub fn parse(target: &'a str) -> Option<Self> {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        let mut segments = path.trim_matches('/').splitn(3, '/');

        let host = segments.next().filter(|s| !s.is_empty())?;
        let key = segments.next().filter(|s| !s.is_empty())?;
        let file = segments.next().filter(|s| !s.is_empty())?;

        Some(Self { host, key, file })
    }
}
