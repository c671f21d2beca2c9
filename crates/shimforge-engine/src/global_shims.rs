//! The built-in library shim bundle.
//!
//! Groups are installed in a fixed order through [`install_on`] /
//! [`install_on_each`], so a host that already ships a conforming member
//! keeps it. The report of every group is merged into one.

use crate::algorithms;
use crate::coercion::{EPSILON, MAX_SAFE_INTEGER};
use crate::installer::{CapabilitySet, InstallReport, install_on, install_on_each};
use crate::object_model::{JsValue, ObjectError};
use crate::realm::Realm;
use crate::shim_config::ShimSuiteConfig;

type Algorithm = fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError>;

fn functions(realm: &mut Realm, specs: &[(&str, u32, Algorithm)]) -> CapabilitySet<JsValue> {
    let entries: Vec<(String, JsValue)> = specs
        .iter()
        .map(|&(name, length, body)| {
            (name.to_string(), JsValue::Object(realm.create_function(name, length, body)))
        })
        .collect();
    CapabilitySet::mapping(entries)
}

/// Install every enabled global group onto `realm`'s intrinsics.
pub fn install_global_shims(realm: &mut Realm, config: &ShimSuiteConfig) -> InstallReport {
    let i = realm.intrinsics();
    let options = config.install_options();
    let mut report = InstallReport::default();

    if config.object_views {
        let caps = functions(
            realm,
            &[
                ("values", 1, algorithms::object_values),
                ("entries", 1, algorithms::object_entries),
            ],
        );
        report.absorb(install_on(realm, i.object_ctor, &caps, &options));
    }
    if config.object_assign {
        let caps = functions(realm, &[("assign", 2, algorithms::object_assign)]);
        report.absorb(install_on(realm, i.object_ctor, &caps, &options));
    }

    if config.number_constants {
        let caps = CapabilitySet::mapping([
            ("EPSILON", JsValue::Number(EPSILON)),
            ("MAX_SAFE_INTEGER", JsValue::Number(MAX_SAFE_INTEGER)),
            ("MIN_SAFE_INTEGER", JsValue::Number(-MAX_SAFE_INTEGER)),
        ]);
        report.absorb(install_on(realm, i.number_ctor, &caps, &config.locked_options()));
    }

    if config.array_from {
        let caps = functions(realm, &[("from", 1, algorithms::array_from)]);
        report.absorb(install_on(realm, i.array_ctor, &caps, &options));
    }

    if config.includes {
        let caps = functions(realm, &[("includes", 1, algorithms::includes)]);
        report.absorb(install_on_each(
            realm,
            &[i.string_prototype, i.array_prototype],
            &caps,
            &options,
        ));
    }

    if config.string_affixes {
        let caps = functions(
            realm,
            &[
                ("startsWith", 1, algorithms::starts_with),
                ("endsWith", 1, algorithms::ends_with),
            ],
        );
        report.absorb(install_on(realm, i.string_prototype, &caps, &options));
    }

    if config.number_is_nan {
        let caps = functions(realm, &[("isNaN", 1, algorithms::number_is_nan)]);
        report.absorb(install_on(realm, i.number_ctor, &caps, &options));
    }

    if config.array_search {
        let caps = functions(
            realm,
            &[
                ("findIndex", 1, algorithms::find_index),
                ("find", 1, algorithms::find),
            ],
        );
        report.absorb(install_on(realm, i.array_prototype, &caps, &options));
    }

    report
}
