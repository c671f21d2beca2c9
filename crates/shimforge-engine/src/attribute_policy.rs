//! Property attribute policies applied to installed capabilities.
//!
//! Two canonical policies exist:
//! - [`DEFAULT_POLICY`]: configurable, non-enumerable, writable (the shape
//!   of a built-in method).
//! - [`LOCKED_POLICY`]: a partial override pinning `configurable` and
//!   `writable` to `false`; `enumerable` comes from whatever it is merged
//!   onto.
//!
//! Both are `const`, so nothing can mutate the shared defaults.

use serde::{Deserialize, Serialize};

use crate::object_model::{JsValue, PropertyDescriptor};

/// Complete attribute triple controlling how a member is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSet {
    pub configurable: bool,
    pub enumerable: bool,
    pub writable: bool,
}

/// Caller-supplied overrides; absent fields fall back to the base set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

pub const DEFAULT_POLICY: AttributeSet = AttributeSet {
    configurable: true,
    enumerable: false,
    writable: true,
};

pub const LOCKED_POLICY: AttributeOverrides = AttributeOverrides {
    configurable: Some(false),
    enumerable: None,
    writable: Some(false),
};

impl Default for AttributeSet {
    fn default() -> Self {
        DEFAULT_POLICY
    }
}

impl AttributeSet {
    /// Apply `overrides` on top of `self`; each present override wins.
    pub fn merge(self, overrides: &AttributeOverrides) -> Self {
        Self {
            configurable: overrides.configurable.unwrap_or(self.configurable),
            enumerable: overrides.enumerable.unwrap_or(self.enumerable),
            writable: overrides.writable.unwrap_or(self.writable),
        }
    }

    /// Data descriptor carrying `value` with these attributes.
    pub fn descriptor(self, value: JsValue) -> PropertyDescriptor {
        PropertyDescriptor::Data {
            value,
            writable: self.writable,
            enumerable: self.enumerable,
            configurable: self.configurable,
        }
    }

    /// Does `desc` carry exactly these attributes?
    pub fn matches(self, desc: &PropertyDescriptor) -> bool {
        desc.is_data()
            && desc.is_configurable() == self.configurable
            && desc.is_enumerable() == self.enumerable
            && desc.is_writable() == self.writable
    }
}

impl AttributeOverrides {
    pub fn is_empty(&self) -> bool {
        self.configurable.is_none() && self.enumerable.is_none() && self.writable.is_none()
    }

    /// Layer `later` over `self`, later fields winning.
    pub fn then(self, later: &AttributeOverrides) -> Self {
        Self {
            configurable: later.configurable.or(self.configurable),
            enumerable: later.enumerable.or(self.enumerable),
            writable: later.writable.or(self.writable),
        }
    }
}
