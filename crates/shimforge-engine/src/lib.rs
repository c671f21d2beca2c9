#![forbid(unsafe_code)]

//! Conditional capability installation over a JS-style object model.
//!
//! A [`Realm`] hosts ordinary objects, native functions and the well-known
//! intrinsics. The [`installer`] binds named capabilities onto targets only
//! when the present member is missing or of a different `typeof`, and the
//! [`global_shims`] bundle uses it to add the ES2015 library members a
//! legacy realm lacks.

pub mod algorithms;
pub mod attribute_policy;
pub mod coercion;
pub mod global_shims;
pub mod installer;
pub mod intrinsics;
pub mod object_model;
pub mod realm;
pub mod shim_config;

pub use attribute_policy::{AttributeOverrides, AttributeSet, DEFAULT_POLICY, LOCKED_POLICY};
pub use global_shims::install_global_shims;
pub use installer::{
    CapabilityHost, CapabilitySet, InstallEvent, InstallOptions, InstallReport, PairOutcome,
    PairReport, install_on, install_on_each,
};
pub use object_model::{JsType, JsValue, ObjectError, ObjectHandle, PropertyDescriptor, PropertyKey};
pub use realm::{NativeFn, Realm};
pub use shim_config::{ShimSuiteConfig, SuiteConfigError};
