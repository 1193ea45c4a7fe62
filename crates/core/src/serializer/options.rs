use serde::{Deserialize, Serialize};

/// Default bound on nested inlined objects.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Policy switches for a serialize call.
///
/// Deserializable so front ends can load it from a config table; every
/// field falls back to its default when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// A materialized resource under a relationship property may be written
    /// as its reference text instead of failing.
    pub convert_resources_to_relationships: bool,
    /// A materialized resource under a relationship property is inlined as a
    /// full object, guarded by the seen-set.
    pub permit_resources_for_relationships: bool,
    /// Omit the separator before a back-reference that directly follows a
    /// back-reference or an inlined object in a relationship array. Produces
    /// invalid JSON; matches output recorded by older fixtures.
    pub legacy_cycle_separators: bool,
    /// Maximum number of nested inlined objects, the root included.
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            convert_resources_to_relationships: false,
            permit_resources_for_relationships: false,
            legacy_cycle_separators: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SerializeOptions {
    /// Options that inline every reachable resource once.
    pub fn inline_all() -> Self {
        SerializeOptions {
            permit_resources_for_relationships: true,
            ..SerializeOptions::default()
        }
    }
}
