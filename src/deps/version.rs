//! Version string normalization
//!
//! Module versions come in two shapes: plain tags (`v1.2.3`, `v1.2.3-rc.1`)
//! and pseudo-versions that embed a commit (`v0.0.0-20200101000000-abcdef123456`).
//! [`normalize`] reduces both to the string shown in release notes and reports
//! whether that string is a commit hash.

const INCOMPATIBLE: &str = "+incompatible";

/// Result of normalizing a version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    /// Tag, ref or commit hash.
    pub value: String,
    /// True when `value` is the commit of a pseudo-version.
    pub is_commit: bool,
}

/// Normalizes a raw version token.
///
/// Returns `None` when the token has more than three dash-separated fields or
/// nothing is left after normalization.
pub fn normalize(raw: &str) -> Option<NormalizedVersion> {
    let fields: Vec<&str> = raw.split('-').filter(|f| !f.is_empty()).collect();

    let (mut value, is_commit) = match fields.len() {
        0 => return None,
        1 | 2 => (raw, false),
        3 => (fields[2], true),
        _ => return None,
    };

    if let Some(idx) = value.find(INCOMPATIBLE)
        && idx > 0
    {
        value = &value[..idx];
    }

    Some(NormalizedVersion {
        value: value.to_string(),
        is_commit,
    })
}
