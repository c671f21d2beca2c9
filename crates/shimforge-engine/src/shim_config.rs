//! Suite configuration: which shim groups to install and how.
//!
//! Plain serde data. Everything defaults to on; unknown fields are rejected
//! so a misspelled group name fails loudly instead of being ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute_policy::AttributeOverrides;
use crate::installer::InstallOptions;

// ---------------------------------------------------------------------------
// SuiteConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SuiteConfigError {
    #[error("invalid shim suite configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// ShimSuiteConfig
// ---------------------------------------------------------------------------

/// Capability groups of the global and DOM bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShimSuiteConfig {
    /// `Object.values` / `Object.entries`.
    pub object_views: bool,
    pub object_assign: bool,
    /// `Number.EPSILON`, `MAX_SAFE_INTEGER`, `MIN_SAFE_INTEGER`.
    pub number_constants: bool,
    pub number_is_nan: bool,
    pub array_from: bool,
    /// `Array.prototype.findIndex` / `find`.
    pub array_search: bool,
    /// `includes` on String and Array prototypes.
    pub includes: bool,
    /// `String.prototype.startsWith` / `endsWith`.
    pub string_affixes: bool,

    pub node_list_for_each: bool,
    pub matches: bool,
    pub closest: bool,
    /// `append` / `prepend`.
    pub parent_node_insertion: bool,
    /// `before` / `after` / `remove` / `replaceWith`.
    pub child_node_mutation: bool,

    /// Replace conforming members too.
    pub force: bool,
    /// Extra attribute overrides layered onto every group.
    pub overrides: AttributeOverrides,
    pub trace_id: String,
}

impl Default for ShimSuiteConfig {
    fn default() -> Self {
        Self {
            object_views: true,
            object_assign: true,
            number_constants: true,
            number_is_nan: true,
            array_from: true,
            array_search: true,
            includes: true,
            string_affixes: true,
            node_list_for_each: true,
            matches: true,
            closest: true,
            parent_node_insertion: true,
            child_node_mutation: true,
            force: false,
            overrides: AttributeOverrides::default(),
            trace_id: "shim-suite".to_string(),
        }
    }
}

impl ShimSuiteConfig {
    pub fn from_json(input: &str) -> Result<Self, SuiteConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Every group switched off; callers enable what they need.
    pub fn none() -> Self {
        Self {
            object_views: false,
            object_assign: false,
            number_constants: false,
            number_is_nan: false,
            array_from: false,
            array_search: false,
            includes: false,
            string_affixes: false,
            node_list_for_each: false,
            matches: false,
            closest: false,
            parent_node_insertion: false,
            child_node_mutation: false,
            ..Self::default()
        }
    }

    /// Installer options for an ordinary (default-policy) group.
    pub fn install_options(&self) -> InstallOptions {
        InstallOptions::new()
            .with_overrides(self.overrides)
            .forced(self.force)
            .with_trace_id(self.trace_id.clone())
    }

    /// Installer options for a read-only group; suite overrides still apply
    /// on top of the locked policy.
    pub fn locked_options(&self) -> InstallOptions {
        InstallOptions::locked()
            .with_overrides(self.overrides)
            .forced(self.force)
            .with_trace_id(self.trace_id.clone())
    }
}
