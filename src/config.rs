//! Extraction configuration (§6): the six flags set once at construction.

use serde::{Deserialize, Serialize};

/// Configuration options, loadable from a TOML file via [`ExtractorConfig::from_toml`]
/// or built programmatically. All flags default to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Deduplicate derivations by their flat yield string.
    pub unique_nbest: bool,
    /// Emit labeled parse trees rather than flat yields.
    pub extract_tree: bool,
    /// Append `{i-j}` span annotations to each tree label.
    pub include_alignment: bool,
    /// Append the combined-cost field.
    pub add_combined_score: bool,
    /// Use source-side symbols of rules instead of target-side.
    pub monolingual: bool,
    /// Enforce the cost-reconstruction sanity check.
    pub sanity_check: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            unique_nbest: false,
            extract_tree: false,
            include_alignment: false,
            add_combined_score: false,
            monolingual: false,
            sanity_check: false,
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
