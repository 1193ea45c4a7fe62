//! `graphtext.toml` configuration.
//!
//! # Example
//!
//! ```toml
//! [serialize]
//! permit_resources_for_relationships = true
//! convert_resources_to_relationships = false
//! legacy_cycle_separators = false
//! max_depth = 256
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::Path;

use graphtext_core::SerializeOptions;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphtextConfig {
    #[serde(default)]
    pub serialize: SerializeOptions,
}

/// Option values given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionOverrides {
    pub permit_resources: bool,
    pub convert_resources: bool,
    pub legacy_separators: bool,
    pub max_depth: Option<usize>,
}

impl OptionOverrides {
    /// Flags only switch policies on; they never turn off a policy the file enables.
    pub fn apply(&self, mut options: SerializeOptions) -> SerializeOptions {
        options.permit_resources_for_relationships |= self.permit_resources;
        options.convert_resources_to_relationships |= self.convert_resources;
        options.legacy_cycle_separators |= self.legacy_separators;
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        options
    }
}

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_config(path: &Path) -> Result<GraphtextConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Resolve the options for one run: file (if any), then flags.
pub fn resolve_options(
    config: Option<&Path>,
    overrides: &OptionOverrides,
) -> Result<SerializeOptions, String> {
    let base = match config {
        Some(path) => read_config(path)?.serialize,
        None => SerializeOptions::default(),
    };
    Ok(overrides.apply(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphtext_core::serializer::DEFAULT_MAX_DEPTH;

    #[test]
    fn parses_serialize_table() {
        let config: GraphtextConfig = toml::from_str(
            r#"
            [serialize]
            permit_resources_for_relationships = true
            max_depth = 16
            "#,
        )
        .unwrap();
        assert!(config.serialize.permit_resources_for_relationships);
        assert!(!config.serialize.convert_resources_to_relationships);
        assert_eq!(config.serialize.max_depth, 16);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config: GraphtextConfig = toml::from_str("").unwrap();
        assert_eq!(config.serialize, SerializeOptions::default());
        assert_eq!(config.serialize.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(toml::from_str::<GraphtextConfig>("[deploy]\norg_id = \"x\"\n").is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = SerializeOptions {
            convert_resources_to_relationships: true,
            max_depth: 8,
            ..SerializeOptions::default()
        };
        let overrides = OptionOverrides {
            permit_resources: true,
            max_depth: Some(4),
            ..OptionOverrides::default()
        };
        let resolved = overrides.apply(file);
        assert!(resolved.permit_resources_for_relationships);
        assert!(resolved.convert_resources_to_relationships);
        assert!(!resolved.legacy_cycle_separators);
        assert_eq!(resolved.max_depth, 4);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = resolve_options(
            Some(Path::new("/nonexistent/graphtext.toml")),
            &OptionOverrides::default(),
        )
        .unwrap_err();
        assert!(err.contains("could not read"), "{}", err);
    }
}
