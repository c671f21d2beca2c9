//! Integration tests for the global shim bundle driven by
//! [`ShimSuiteConfig`].

#![forbid(unsafe_code)]

use shimforge_engine::{
    JsType, JsValue, PairOutcome, PropertyDescriptor, Realm, ShimSuiteConfig,
    install_global_shims,
};

fn own(realm: &Realm, target: shimforge_engine::ObjectHandle, name: &str) -> Option<PropertyDescriptor> {
    realm.heap().get_own_property_descriptor(target, &name.into()).unwrap()
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn json_config_selects_groups() {
    let mut realm = Realm::legacy();
    let config = ShimSuiteConfig::from_json(
        r#"{"object_views":false,"object_assign":false,"number_constants":false,
            "number_is_nan":false,"array_from":false,"array_search":false,
            "includes":false,"string_affixes":true,"trace_id":"boot-1"}"#,
    )
    .unwrap();
    let report = install_global_shims(&mut realm, &config);
    let names: Vec<&str> = report.pairs.iter().map(|p| p.capability.as_str()).collect();
    assert_eq!(names, vec!["startsWith", "endsWith"]);
    assert!(report.events.iter().all(|e| e.trace_id == "boot-1"));
}

#[test]
fn none_installs_nothing() {
    let mut realm = Realm::legacy();
    let before = realm.heap().len();
    let report = install_global_shims(&mut realm, &ShimSuiteConfig::none());
    assert!(report.pairs.is_empty());
    assert_eq!(realm.heap().len(), before);
}

#[test]
fn enumerable_override_applies_to_methods_and_constants() {
    let mut realm = Realm::legacy();
    let config = ShimSuiteConfig::from_json(r#"{"overrides":{"enumerable":true}}"#).unwrap();
    install_global_shims(&mut realm, &config);
    let i = realm.intrinsics();
    let from = own(&realm, i.array_ctor, "from").unwrap();
    assert!(from.is_enumerable());
    assert!(from.is_writable());
    let max = own(&realm, i.number_ctor, "MAX_SAFE_INTEGER").unwrap();
    assert!(max.is_enumerable());
    assert!(!max.is_writable());
}

// ---------------------------------------------------------------------------
// Coexistence with host members
// ---------------------------------------------------------------------------

#[test]
fn host_method_is_kept() {
    let mut realm = Realm::legacy();
    let proto = realm.intrinsics().string_prototype;
    let native = realm.create_function("startsWith", 1, |_, _, _| Ok(JsValue::from("native")));
    realm.set(proto, "startsWith", JsValue::Object(native)).unwrap();

    let report = install_global_shims(&mut realm, &ShimSuiteConfig::default());
    assert_eq!(
        report.outcome_of("startsWith"),
        Some(&PairOutcome::Skipped {
            existing: JsType::Function
        })
    );
    assert_eq!(
        realm.invoke(&JsValue::from("abc"), "startsWith", &["a".into()]).unwrap(),
        JsValue::from("native")
    );
}

#[test]
fn forced_suite_replaces_host_method() {
    let mut realm = Realm::legacy();
    let proto = realm.intrinsics().string_prototype;
    let native = realm.create_function("startsWith", 1, |_, _, _| Ok(JsValue::from("native")));
    realm.set(proto, "startsWith", JsValue::Object(native)).unwrap();

    let config = ShimSuiteConfig {
        force: true,
        ..ShimSuiteConfig::default()
    };
    let report = install_global_shims(&mut realm, &config);
    assert_eq!(report.outcome_of("startsWith"), Some(&PairOutcome::Installed));
    assert_eq!(
        realm.invoke(&JsValue::from("abc"), "startsWith", &["a".into()]).unwrap(),
        JsValue::Bool(true)
    );
}

#[test]
fn non_function_placeholder_is_replaced() {
    let mut realm = Realm::legacy();
    let number = realm.intrinsics().number_ctor;
    realm.set(number, "isNaN", JsValue::Bool(false)).unwrap();
    let report = install_global_shims(&mut realm, &ShimSuiteConfig::default());
    assert_eq!(report.outcome_of("isNaN"), Some(&PairOutcome::Installed));
    let is_nan = realm.get(&JsValue::Object(number), "isNaN").unwrap();
    assert_eq!(realm.type_of(&is_nan), JsType::Function);
}

#[test]
fn locked_host_constant_is_rejected_without_stopping_the_suite() {
    let mut realm = Realm::legacy();
    let number = realm.intrinsics().number_ctor;
    realm
        .heap_mut()
        .define_property(
            number,
            "EPSILON".into(),
            PropertyDescriptor::data_frozen(JsValue::from("frozen")),
        )
        .unwrap();
    let report = install_global_shims(&mut realm, &ShimSuiteConfig::default());
    let rejected = report.rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].capability, "EPSILON");
    assert_eq!(report.outcome_of("MAX_SAFE_INTEGER"), Some(&PairOutcome::Installed));
    assert_eq!(report.outcome_of("find"), Some(&PairOutcome::Installed));
}

// ---------------------------------------------------------------------------
// Behavior after installation
// ---------------------------------------------------------------------------

#[test]
fn installed_members_work_together() {
    let mut realm = Realm::legacy();
    install_global_shims(&mut realm, &ShimSuiteConfig::default());
    let i = realm.intrinsics();
    let object = JsValue::Object(i.object_ctor);
    let array = JsValue::Object(i.array_ctor);

    let src = realm.create_object();
    realm.set(src, "a", JsValue::from("x")).unwrap();
    realm.set(src, "b", JsValue::from("y")).unwrap();
    let target = JsValue::Object(realm.create_object());
    let merged = realm
        .invoke(&object, "assign", &[target.clone(), JsValue::Object(src)])
        .unwrap();
    assert_eq!(merged, target);

    let values = realm.invoke(&object, "values", &[merged]).unwrap();
    let copy = realm.invoke(&array, "from", &[values]).unwrap();
    assert_eq!(realm.invoke(&copy, "includes", &["y".into()]).unwrap(), JsValue::Bool(true));
    let is_x = realm.create_function("isX", 1, |_, _, args| {
        Ok(JsValue::Bool(args.first() == Some(&JsValue::from("x"))))
    });
    assert_eq!(
        realm.invoke(&copy, "findIndex", &[JsValue::Object(is_x)]).unwrap(),
        JsValue::Number(0.0)
    );
}

#[test]
fn installed_function_reports_name_and_length() {
    let mut realm = Realm::legacy();
    install_global_shims(&mut realm, &ShimSuiteConfig::default());
    let array = JsValue::Object(realm.intrinsics().array_ctor);
    let from = realm.get(&array, "from").unwrap();
    assert_eq!(realm.get(&from, "name").unwrap(), JsValue::from("from"));
    assert_eq!(realm.get(&from, "length").unwrap(), JsValue::Number(1.0));
}
