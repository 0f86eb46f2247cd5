use crate::types::{ToolVersion, VersionStatus};

/// Select the version a slug resolves to.
///
/// Among `active` versions the one with the latest `created_at` wins; equal
/// timestamps fall back to the most recent insertion (highest `seq`). Returns
/// `None` when no version is active. Depends only on its input.
pub fn select_active_version(versions: &[ToolVersion]) -> Option<&ToolVersion> {
    versions
        .iter()
        .filter(|v| v.status == VersionStatus::Active)
        .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq)))
}
