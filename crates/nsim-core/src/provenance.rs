//! Schema and provenance descriptors attached to generated artefacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version of a serialized payload's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented for breaking changes.
    pub major: u32,
    /// Incremented for additive changes.
    pub minor: u32,
    /// Incremented for fixes that leave the layout untouched.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// True when a reader built for `self` can consume a payload written as `other`.
    pub fn reads(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Where a generated artefact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the artefact itself.
    pub schema_version: SchemaVersion,
    /// Fingerprint of the experiment record the artefact was derived from.
    pub record_fingerprint: String,
    /// Manifold the artefact describes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifold_id: Option<String>,
    /// Master seed used for all randomness.
    pub seed: u64,
    /// Versions of the tools involved.
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}
