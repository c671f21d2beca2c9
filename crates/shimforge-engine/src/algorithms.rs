//! Native bodies of the ES2015 library shims.
//!
//! Each function has the [`NativeFn`](crate::realm::NativeFn) shape
//! `(realm, this, args)` so it can be wrapped in a function object and
//! handed to the installer. Invalid arguments surface as `TypeError` before
//! any object is created or written.

use crate::coercion::{clamp_position, number_to_js_string, to_number};
use crate::intrinsics::{own_enumerable_keys, this_string, truthy};
use crate::object_model::{JsValue, ObjectError};
use crate::realm::{Realm, arg, code_units};

/// `Object.prototype.toString` tag of a value, e.g. `[object Undefined]`.
pub fn object_to_string_tag(realm: &Realm, value: &JsValue) -> String {
    let tag = match value {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Bool(_) => "Boolean",
        JsValue::Number(_) => "Number",
        JsValue::Str(_) => "String",
        JsValue::Symbol(_) => "Symbol",
        JsValue::Object(_) if realm.is_callable(value) => "Function",
        JsValue::Object(_) if realm.is_array(value) => "Array",
        JsValue::Object(_) => "Object",
    };
    format!("[object {tag}]")
}

// ---------------------------------------------------------------------------
// Array.from
// ---------------------------------------------------------------------------

/// `Array.from(arrayLike, mapFn?, thisArg?)`.
///
/// When `this` is callable the result is built with `new this(length)`;
/// otherwise a plain array is allocated. `length` is always written last.
pub fn array_from(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let items = arg(args, 0);
    if items.is_nullish() {
        return Err(ObjectError::type_error(
            "Array.from requires an array-like object - not null or undefined",
        ));
    }

    let map = arg(args, 1);
    let map_context = arg(args, 2);
    let mapping = !map.is_undefined();
    if mapping && !realm.is_callable(&map) {
        return Err(ObjectError::type_error(
            "Array.from: when provided, the second argument must be a function",
        ));
    }

    let length = realm.length_of_array_like(&items)?;
    let target = if realm.is_callable(this) {
        realm.construct(this, &[JsValue::Number(length)])?
    } else {
        let ctor = JsValue::Object(realm.intrinsics().array_ctor);
        realm.construct(&ctor, &[JsValue::Number(length)])?
    };
    let Some(target_handle) = target.as_object() else {
        return Err(ObjectError::type_error(format!(
            "Array.from: constructor returned non-object {}",
            realm.describe(&target)
        )));
    };

    let mut i = 0.0;
    while i < length {
        let key = number_to_js_string(i);
        let item = realm.get(&items, key.as_str())?;
        let value = if mapping {
            realm.call(&map, &map_context, &[item, JsValue::Number(i)])?
        } else {
            item
        };
        realm.set(target_handle, key, value)?;
        i += 1.0;
    }

    realm.set(target_handle, "length", JsValue::Number(length))?;
    Ok(target)
}

// ---------------------------------------------------------------------------
// findIndex / find
// ---------------------------------------------------------------------------

/// Left-to-right scan calling `predicate(element, index, source)` with
/// `context` as `this`; returns the first index whose result is truthy, or
/// `-1`. Every index below the length is visited, holes included.
pub fn find_index_in(
    realm: &mut Realm,
    source: &JsValue,
    predicate: &JsValue,
    context: &JsValue,
) -> Result<f64, ObjectError> {
    let source = realm
        .require_object_coercible(source, "Array.prototype.findIndex")?
        .clone();
    if !realm.is_callable(predicate) {
        return Err(ObjectError::type_error(format!(
            "{} is not a function",
            object_to_string_tag(realm, predicate)
        )));
    }
    let length = realm.length_of_array_like(&source)?;
    let mut i = 0.0;
    while i < length {
        let element = realm.get(&source, number_to_js_string(i).as_str())?;
        let hit = realm.call(
            predicate,
            context,
            &[element, JsValue::Number(i), source.clone()],
        )?;
        if truthy(&hit) {
            return Ok(i);
        }
        i += 1.0;
    }
    Ok(-1.0)
}

/// `Array.prototype.findIndex(predicate, thisArg?)`.
pub fn find_index(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    find_index_in(realm, this, &arg(args, 0), &arg(args, 1)).map(JsValue::Number)
}

/// `Array.prototype.find(predicate, thisArg?)`: reads `this[index]`, so a
/// miss reads the key `"-1"`.
pub fn find(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let index = find_index_in(realm, this, &arg(args, 0), &arg(args, 1))?;
    realm.get(this, number_to_js_string(index))
}

// ---------------------------------------------------------------------------
// includes
// ---------------------------------------------------------------------------

/// `includes(search, position?)` for strings and arrays alike: delegates to
/// the receiver's own `indexOf` with the same arguments.
pub fn includes(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let receiver = realm.require_object_coercible(this, "includes")?.clone();
    let index = realm.invoke(&receiver, "indexOf", args)?;
    Ok(JsValue::Bool(to_number(&index) > -1.0))
}

// ---------------------------------------------------------------------------
// startsWith / endsWith
// ---------------------------------------------------------------------------

/// `String.prototype.startsWith(search, position = 0)`.
pub fn starts_with(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let s = code_units(&this_string(realm, this, "String.prototype.startsWith")?);
    let search = code_units(&realm.to_js_string(&arg(args, 0))?);
    let start = clamp_position(&arg(args, 1), s.len());
    Ok(JsValue::Bool(s[start..].starts_with(&search)))
}

/// `String.prototype.endsWith(search, endPosition = length)`; an end beyond
/// the string clamps to its length.
pub fn ends_with(realm: &mut Realm, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let s = code_units(&this_string(realm, this, "String.prototype.endsWith")?);
    let search = code_units(&realm.to_js_string(&arg(args, 0))?);
    let end = match arg(args, 1) {
        JsValue::Undefined => s.len(),
        position => clamp_position(&position, s.len()),
    };
    let Some(start) = end.checked_sub(search.len()) else {
        return Ok(JsValue::Bool(false));
    };
    Ok(JsValue::Bool(s[start..end] == search[..]))
}

// ---------------------------------------------------------------------------
// Number.isNaN
// ---------------------------------------------------------------------------

/// `Number.isNaN(value)`: true only for the number NaN, no coercion.
pub fn number_is_nan(_realm: &mut Realm, _this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let value = arg(args, 0);
    Ok(JsValue::Bool(!value.strict_equals(&value)))
}

// ---------------------------------------------------------------------------
// Object views and merge
// ---------------------------------------------------------------------------

fn enumerable_pairs(realm: &mut Realm, value: &JsValue) -> Result<Vec<(String, JsValue)>, ObjectError> {
    let keys = own_enumerable_keys(realm, value)?;
    keys.into_iter()
        .map(|k| {
            let v = realm.get(value, k.as_str())?;
            Ok((k, v))
        })
        .collect()
}

/// `Object.values(object)`.
pub fn object_values(realm: &mut Realm, _this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let values = enumerable_pairs(realm, &arg(args, 0))?
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    Ok(JsValue::Object(realm.create_array(values)?))
}

/// `Object.entries(object)`: an array of `[key, value]` arrays.
pub fn object_entries(realm: &mut Realm, _this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let pairs = enumerable_pairs(realm, &arg(args, 0))?;
    let mut entries = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        entries.push(JsValue::Object(realm.create_array(vec![JsValue::Str(k), v])?));
    }
    Ok(JsValue::Object(realm.create_array(entries)?))
}

/// `Object.assign(target, ...sources)`: copies enumerable own properties of
/// each non-nullish source by assignment and returns `ToObject(target)`.
pub fn object_assign(realm: &mut Realm, _this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let target = realm.to_object(&arg(args, 0), "Object.assign")?;
    for source in args.iter().skip(1).filter(|s| !s.is_nullish()) {
        for (k, v) in enumerable_pairs(realm, source)? {
            realm.set(target, k, v)?;
        }
    }
    Ok(JsValue::Object(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> JsValue {
        JsValue::Number(n)
    }

    fn array_like(realm: &mut Realm, items: &[(&str, JsValue)]) -> JsValue {
        let o = realm.create_object();
        for (k, v) in items {
            realm.set(o, *k, v.clone()).unwrap();
        }
        JsValue::Object(o)
    }

    fn array_ctor(realm: &Realm) -> JsValue {
        JsValue::Object(realm.intrinsics().array_ctor)
    }

    fn values(realm: &mut Realm, v: &JsValue) -> Vec<JsValue> {
        realm.array_like_to_vec(v).unwrap()
    }

    // -----------------------------------------------------------------------
    // 1. Array.from
    // -----------------------------------------------------------------------

    #[test]
    fn from_dense_array_like() {
        let mut realm = Realm::legacy();
        let src = array_like(
            &mut realm,
            &[("0", "a".into()), ("1", "b".into()), ("length", num(2.0))],
        );
        let ctor = array_ctor(&realm);
        let out = array_from(&mut realm, &ctor, &[src]).unwrap();
        assert!(realm.is_array(&out));
        assert_eq!(values(&mut realm, &out), vec![JsValue::from("a"), JsValue::from("b")]);
    }

    #[test]
    fn from_sparse_length_only() {
        let mut realm = Realm::legacy();
        let src = array_like(&mut realm, &[("length", num(3.0))]);
        let ctor = array_ctor(&realm);
        let out = array_from(&mut realm, &ctor, &[src.clone()]).unwrap();
        assert_eq!(values(&mut realm, &out), vec![JsValue::Undefined; 3]);
        // Elements are materialized, not left as holes.
        assert!(realm.has_property(&out, 2usize).unwrap());

        let index = realm.create_function("index", 2, |_, _, args| Ok(arg(args, 1)));
        let out = array_from(&mut realm, &ctor, &[src, JsValue::Object(index)]).unwrap();
        assert_eq!(values(&mut realm, &out), vec![num(0.0), num(1.0), num(2.0)]);
    }

    #[test]
    fn from_string_source() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let out = array_from(&mut realm, &ctor, &[JsValue::from("hi")]).unwrap();
        assert_eq!(values(&mut realm, &out), vec![JsValue::from("h"), JsValue::from("i")]);
    }

    #[test]
    fn from_map_receives_this_arg() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let src = array_like(&mut realm, &[("length", num(1.0))]);
        let ctx = realm.create_object();
        let echo_this = realm.create_function("echo", 0, |_, this, _| Ok(this.clone()));
        let out = array_from(
            &mut realm,
            &ctor,
            &[src, JsValue::Object(echo_this), JsValue::Object(ctx)],
        )
        .unwrap();
        assert_eq!(values(&mut realm, &out), vec![JsValue::Object(ctx)]);
    }

    #[test]
    fn from_rejects_nullish_source_before_allocating() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let before = realm.heap().len();
        for source in [JsValue::Null, JsValue::Undefined] {
            let err = array_from(&mut realm, &ctor, &[source]).unwrap_err();
            assert!(err.is_type_error());
        }
        assert_eq!(realm.heap().len(), before);
    }

    #[test]
    fn from_rejects_non_callable_map() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let src = array_like(&mut realm, &[("length", num(1.0))]);
        let err = array_from(&mut realm, &ctor, &[src.clone(), num(5.0)]).unwrap_err();
        assert_eq!(
            err,
            ObjectError::type_error(
                "Array.from: when provided, the second argument must be a function"
            )
        );
        // Explicit undefined means "no map".
        assert!(array_from(&mut realm, &ctor, &[src, JsValue::Undefined]).is_ok());
    }

    #[test]
    fn from_uses_callable_receiver_as_constructor() {
        let mut realm = Realm::legacy();
        let made = realm.create_object();
        let ctor = realm.create_constructor(
            "Custom",
            1,
            |_, _, _| Ok(JsValue::Undefined),
            move |realm, _this, args| {
                realm.set(made, "requested", arg(args, 0))?;
                Ok(JsValue::Object(made))
            },
        );
        let src = array_like(&mut realm, &[("0", num(9.0)), ("length", num(1.0))]);
        let out = array_from(&mut realm, &JsValue::Object(ctor), &[src]).unwrap();
        assert_eq!(out, JsValue::Object(made));
        assert_eq!(realm.get(&out, "requested").unwrap(), num(1.0));
        assert_eq!(realm.get(&out, "0").unwrap(), num(9.0));
        assert_eq!(realm.get(&out, "length").unwrap(), num(1.0));
    }

    #[test]
    fn from_with_non_callable_receiver_builds_plain_array() {
        let mut realm = Realm::legacy();
        let src = array_like(&mut realm, &[("length", num(2.0))]);
        let out = array_from(&mut realm, &JsValue::Undefined, &[src]).unwrap();
        assert!(realm.is_array(&out));
    }

    #[test]
    fn from_callable_non_constructor_is_type_error() {
        let mut realm = Realm::legacy();
        let plain = realm.create_function("plain", 0, |_, _, _| Ok(JsValue::Undefined));
        let src = array_like(&mut realm, &[("length", num(0.0))]);
        let err = array_from(&mut realm, &JsValue::Object(plain), &[src]).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn from_clamps_negative_and_fractional_lengths() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let neg = array_like(&mut realm, &[("length", num(-4.0))]);
        let out = array_from(&mut realm, &ctor, &[neg]).unwrap();
        assert_eq!(realm.get(&out, "length").unwrap(), num(0.0));
        let frac = array_like(&mut realm, &[("length", JsValue::from("2.9"))]);
        let out = array_from(&mut realm, &ctor, &[frac]).unwrap();
        assert_eq!(realm.get(&out, "length").unwrap(), num(2.0));
    }

    // -----------------------------------------------------------------------
    // 2. findIndex / find
    // -----------------------------------------------------------------------

    fn greater_than_two(realm: &mut Realm) -> JsValue {
        JsValue::Object(realm.create_function("gt2", 1, |_, _, args| {
            Ok(JsValue::Bool(to_number(&arg(args, 0)) > 2.0))
        }))
    }

    #[test]
    fn find_index_and_find_first_match() {
        let mut realm = Realm::legacy();
        let arr = JsValue::Object(
            realm
                .create_array(vec![num(1.0), num(2.0), num(3.0), num(4.0)])
                .unwrap(),
        );
        let pred = greater_than_two(&mut realm);
        assert_eq!(find_index(&mut realm, &arr, &[pred.clone()]).unwrap(), num(2.0));
        assert_eq!(find(&mut realm, &arr, &[pred]).unwrap(), num(3.0));
    }

    #[test]
    fn find_stops_at_first_match() {
        let mut realm = Realm::legacy();
        let arr = JsValue::Object(realm.create_array(vec![num(5.0), num(6.0)]).unwrap());
        let calls = realm.create_array(vec![]).unwrap();
        let pred = realm.create_function("count", 1, move |realm, _, args| {
            let n = realm.length_of_array_like(&JsValue::Object(calls))?;
            realm.set(calls, n as usize, arg(args, 1))?;
            Ok(JsValue::Bool(true))
        });
        find_index(&mut realm, &arr, &[JsValue::Object(pred)]).unwrap();
        assert_eq!(values(&mut realm, &JsValue::Object(calls)), vec![num(0.0)]);
    }

    #[test]
    fn find_miss_reads_minus_one_key() {
        let mut realm = Realm::legacy();
        let arr = realm.create_array(vec![num(1.0)]).unwrap();
        let pred = greater_than_two(&mut realm);
        let arr_v = JsValue::Object(arr);
        assert_eq!(find_index(&mut realm, &arr_v, &[pred.clone()]).unwrap(), num(-1.0));
        assert_eq!(find(&mut realm, &arr_v, &[pred.clone()]).unwrap(), JsValue::Undefined);
        realm.set(arr, "-1", JsValue::from("sentinel")).unwrap();
        assert_eq!(find(&mut realm, &arr_v, &[pred]).unwrap(), JsValue::from("sentinel"));
    }

    #[test]
    fn find_index_visits_holes() {
        let mut realm = Realm::legacy();
        let ctor = array_ctor(&realm);
        let holes = realm.construct(&ctor, &[num(2.0)]).unwrap();
        let is_undefined = realm.create_function("u", 1, |_, _, args| {
            Ok(JsValue::Bool(arg(args, 0).is_undefined()))
        });
        assert_eq!(
            find_index(&mut realm, &holes, &[JsValue::Object(is_undefined)]).unwrap(),
            num(0.0)
        );
    }

    #[test]
    fn find_index_passes_source_and_context() {
        let mut realm = Realm::legacy();
        let arr = JsValue::Object(realm.create_array(vec![num(1.0)]).unwrap());
        let ctx = JsValue::Object(realm.create_object());
        let expected = (arr.clone(), ctx.clone());
        let pred = realm.create_function("check", 3, move |_, this, args| {
            Ok(JsValue::Bool(arg(args, 2) == expected.0 && *this == expected.1))
        });
        assert_eq!(
            find_index(&mut realm, &arr, &[JsValue::Object(pred), ctx]).unwrap(),
            num(0.0)
        );
    }

    #[test]
    fn find_index_non_callable_predicate_is_type_error() {
        let mut realm = Realm::legacy();
        let arr = JsValue::Object(realm.create_array(vec![num(1.0)]).unwrap());
        let err = find_index(&mut realm, &arr, &[]).unwrap_err();
        assert_eq!(err, ObjectError::type_error("[object Undefined] is not a function"));
        let err = find(&mut realm, &arr, &[JsValue::from("x")]).unwrap_err();
        assert_eq!(err, ObjectError::type_error("[object String] is not a function"));
    }

    // -----------------------------------------------------------------------
    // 3. includes
    // -----------------------------------------------------------------------

    #[test]
    fn includes_delegates_to_index_of() {
        let mut realm = Realm::legacy();
        let s = JsValue::from("hello");
        assert_eq!(includes(&mut realm, &s, &["ell".into()]).unwrap(), JsValue::Bool(true));
        assert_eq!(
            includes(&mut realm, &s, &["h".into(), num(1.0)]).unwrap(),
            JsValue::Bool(false)
        );
        let arr = JsValue::Object(realm.create_array(vec![num(1.0), num(f64::NAN)]).unwrap());
        assert_eq!(includes(&mut realm, &arr, &[num(1.0)]).unwrap(), JsValue::Bool(true));
        // indexOf uses strict equality, so NaN is never found.
        assert_eq!(includes(&mut realm, &arr, &[num(f64::NAN)]).unwrap(), JsValue::Bool(false));
    }

    #[test]
    fn includes_without_index_of_is_type_error() {
        let mut realm = Realm::legacy();
        let o = JsValue::Object(realm.create_object());
        assert!(includes(&mut realm, &o, &[num(1.0)]).unwrap_err().is_type_error());
    }

    // -----------------------------------------------------------------------
    // 4. startsWith / endsWith
    // -----------------------------------------------------------------------

    fn call_str(
        realm: &mut Realm,
        f: fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError>,
        s: &str,
        args: &[JsValue],
    ) -> bool {
        f(realm, &JsValue::from(s), args).unwrap() == JsValue::Bool(true)
    }

    #[test]
    fn prefix_test() {
        let mut realm = Realm::legacy();
        assert!(call_str(&mut realm, starts_with, "hello world", &["hello".into()]));
        assert!(!call_str(&mut realm, starts_with, "hello world", &["world".into()]));
        assert!(call_str(&mut realm, starts_with, "hello world", &["world".into(), num(6.0)]));
        assert!(call_str(&mut realm, starts_with, "abc", &["abc".into(), num(-5.0)]));
        assert!(call_str(&mut realm, starts_with, "abc", &["".into(), num(99.0)]));
        assert!(!call_str(&mut realm, starts_with, "abc", &["c".into(), num(f64::INFINITY)]));
        assert!(call_str(&mut realm, starts_with, "abc", &["a".into(), num(f64::NAN)]));
    }

    #[test]
    fn suffix_test() {
        let mut realm = Realm::legacy();
        assert!(call_str(&mut realm, ends_with, "hello world", &["world".into()]));
        assert!(!call_str(&mut realm, ends_with, "hello", &["hello".into(), num(3.0)]));
        assert!(call_str(&mut realm, ends_with, "hello", &["hel".into(), num(3.0)]));
        assert!(call_str(&mut realm, ends_with, "hello", &["hello".into(), num(50.0)]));
        assert!(!call_str(&mut realm, ends_with, "abc", &["a".into(), num(-1.0)]));
        assert!(call_str(&mut realm, ends_with, "abc", &["".into(), num(0.0)]));
    }

    #[test]
    fn affix_tests_reject_nullish_receiver() {
        let mut realm = Realm::legacy();
        assert!(starts_with(&mut realm, &JsValue::Null, &[]).unwrap_err().is_type_error());
        assert!(ends_with(&mut realm, &JsValue::Undefined, &[]).unwrap_err().is_type_error());
    }

    #[test]
    fn affix_tests_coerce_receiver_and_search() {
        let mut realm = Realm::legacy();
        assert_eq!(
            starts_with(&mut realm, &num(123.0), &[num(12.0)]).unwrap(),
            JsValue::Bool(true)
        );
        assert_eq!(
            ends_with(&mut realm, &JsValue::Bool(true), &["ue".into()]).unwrap(),
            JsValue::Bool(true)
        );
    }

    // -----------------------------------------------------------------------
    // 5. Number.isNaN, object views
    // -----------------------------------------------------------------------

    #[test]
    fn is_nan_does_not_coerce() {
        let mut realm = Realm::legacy();
        let u = JsValue::Undefined;
        assert_eq!(number_is_nan(&mut realm, &u, &[num(f64::NAN)]).unwrap(), JsValue::Bool(true));
        assert_eq!(number_is_nan(&mut realm, &u, &["NaN".into()]).unwrap(), JsValue::Bool(false));
        assert_eq!(number_is_nan(&mut realm, &u, &[]).unwrap(), JsValue::Bool(false));
    }

    #[test]
    fn values_and_entries_follow_key_order() {
        let mut realm = Realm::legacy();
        let o = array_like(&mut realm, &[("b", num(1.0)), ("a", num(2.0)), ("0", num(3.0))]);
        let u = JsValue::Undefined;
        let v = object_values(&mut realm, &u, &[o.clone()]).unwrap();
        assert_eq!(values(&mut realm, &v), vec![num(3.0), num(1.0), num(2.0)]);
        let e = object_entries(&mut realm, &u, &[o]).unwrap();
        let first = realm.get(&e, 0usize).unwrap();
        assert_eq!(values(&mut realm, &first), vec![JsValue::from("0"), num(3.0)]);
        assert!(object_values(&mut realm, &u, &[JsValue::Null]).unwrap_err().is_type_error());
    }

    #[test]
    fn assign_copies_and_skips_nullish_sources() {
        let mut realm = Realm::legacy();
        let target = array_like(&mut realm, &[("keep", num(1.0))]);
        let src = array_like(&mut realm, &[("x", num(2.0)), ("keep", num(3.0))]);
        let u = JsValue::Undefined;
        let out = object_assign(&mut realm, &u, &[target.clone(), JsValue::Null, src, "ab".into()])
            .unwrap();
        assert_eq!(out, target);
        assert_eq!(realm.get(&target, "keep").unwrap(), num(3.0));
        assert_eq!(realm.get(&target, "x").unwrap(), num(2.0));
        assert_eq!(realm.get(&target, "1").unwrap(), JsValue::from("b"));
        assert!(object_assign(&mut realm, &u, &[JsValue::Undefined]).unwrap_err().is_type_error());
    }

    #[test]
    fn assign_wraps_primitive_target() {
        let mut realm = Realm::legacy();
        let src = array_like(&mut realm, &[("extra", num(1.0))]);
        let out = object_assign(&mut realm, &JsValue::Undefined, &["ab".into(), src]).unwrap();
        assert!(out.is_object());
        assert_eq!(realm.get(&out, "0").unwrap(), JsValue::from("a"));
        assert_eq!(realm.get(&out, "extra").unwrap(), num(1.0));
        assert_eq!(realm.get(&out, "length").unwrap(), num(2.0));
    }

    #[test]
    fn assign_to_frozen_target_is_type_error() {
        let mut realm = Realm::legacy();
        let target = realm.create_object();
        realm.heap_mut().freeze(target).unwrap();
        let src = array_like(&mut realm, &[("x", num(1.0))]);
        let err = object_assign(&mut realm, &JsValue::Undefined, &[JsValue::Object(target), src])
            .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn string_tags() {
        let mut realm = Realm::legacy();
        let arr = JsValue::Object(realm.create_array(vec![]).unwrap());
        assert_eq!(object_to_string_tag(&realm, &arr), "[object Array]");
        assert_eq!(object_to_string_tag(&realm, &JsValue::Null), "[object Null]");
        let plain = JsValue::Object(realm.create_object());
        assert_eq!(object_to_string_tag(&realm, &plain), "[object Object]");
    }
}
