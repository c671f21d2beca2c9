//! ES5-era baseline built-ins.
//!
//! [`Realm::legacy`] models an environment that predates the ES2015 library
//! additions: it has `Object.keys`, `Array.prototype.{indexOf, forEach,
//! every}` and `String.prototype.{indexOf, substring}`, but none of the
//! members the shim bundles install.

use std::rc::Rc;

use crate::coercion::{clamp_position, integer_from_number, to_integer, to_number};
use crate::object_model::{JsValue, ObjectError};
use crate::realm::{NativeFn, Realm, arg, code_units, index_of_code_units};

impl Realm {
    /// A realm with the ES5 baseline built-ins.
    pub fn legacy() -> Self {
        let mut realm = Self::bare();
        let installed = install_legacy_builtins(&mut realm);
        debug_assert_eq!(installed, Ok(()));
        realm
    }
}

fn install_legacy_builtins(realm: &mut Realm) -> Result<(), ObjectError> {
    install_object(realm)?;
    install_array(realm)?;
    install_string(realm)?;
    install_number(realm)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

fn install_object(realm: &mut Realm) -> Result<(), ObjectError> {
    let i = realm.intrinsics();
    let object_call: NativeFn =
        Rc::new(|realm: &mut Realm, _this: &JsValue, args: &[JsValue]| {
            let value = arg(args, 0);
            if value.is_nullish() {
                Ok(JsValue::Object(realm.create_object()))
            } else {
                Ok(value)
            }
        });
    realm.set_native_behavior(i.object_ctor, object_call.clone(), Some(object_call))?;

    realm.define_method(i.object_ctor, "keys", 1, |realm, _this, args| {
        let keys = own_enumerable_keys(realm, &arg(args, 0))?;
        let values = keys.into_iter().map(JsValue::Str).collect();
        Ok(JsValue::Object(realm.create_array(values)?))
    })?;
    Ok(())
}

/// `Object.keys` ordering for any object-coercible value.
pub fn own_enumerable_keys(realm: &Realm, value: &JsValue) -> Result<Vec<String>, ObjectError> {
    match realm.require_object_coercible(value, "Object.keys")? {
        JsValue::Object(h) => realm.heap().keys(*h),
        JsValue::Str(s) => Ok((0..code_units(s).len()).map(|i| i.to_string()).collect()),
        _ => Ok(Vec::new()),
    }
}

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

/// `new Array(len)` / `new Array(...items)`.
fn array_from_arguments(realm: &mut Realm, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let proto = realm.intrinsics().array_prototype;
    if let [JsValue::Number(len)] = args {
        let len = *len;
        if len < 0.0 || integer_from_number(len) != len || len > f64::from(u32::MAX) {
            return Err(ObjectError::RangeError("invalid array length".to_string()));
        }
        return Ok(JsValue::Object(
            realm.heap_mut().alloc_array(Some(proto), len as u32),
        ));
    }
    Ok(JsValue::Object(realm.create_array(args.to_vec())?))
}

fn install_array(realm: &mut Realm) -> Result<(), ObjectError> {
    let i = realm.intrinsics();
    let ctor: NativeFn =
        Rc::new(|realm: &mut Realm, _this: &JsValue, args: &[JsValue]| array_from_arguments(realm, args));
    realm.set_native_behavior(i.array_ctor, ctor.clone(), Some(ctor))?;

    let proto = i.array_prototype;
    realm.define_method(proto, "indexOf", 1, |realm, this, args| {
        let this = realm.require_object_coercible(this, "Array.prototype.indexOf")?.clone();
        let len = realm.length_of_array_like(&this)?;
        let search = arg(args, 0);
        let mut k = to_integer(&arg(args, 1));
        if k < 0.0 {
            k = (len + k).max(0.0);
        }
        while k < len {
            if realm.has_property(&this, k as usize)?
                && realm.get(&this, k as usize)?.strict_equals(&search)
            {
                return Ok(JsValue::Number(k));
            }
            k += 1.0;
        }
        Ok(JsValue::Number(-1.0))
    })?;

    realm.define_method(proto, "forEach", 1, |realm, this, args| {
        visit_present_elements(realm, this, args, "Array.prototype.forEach", |_| true)?;
        Ok(JsValue::Undefined)
    })?;

    realm.define_method(proto, "every", 1, |realm, this, args| {
        let completed =
            visit_present_elements(realm, this, args, "Array.prototype.every", |keep| keep)?;
        Ok(JsValue::Bool(completed))
    })?;
    Ok(())
}

/// Shared loop of `forEach`/`every`: visits present indices only, calling
/// `callback(element, index, object)` with `thisArg`, and stops as soon as
/// `proceed(truthy(result))` is false. Returns whether the loop ran to the end.
fn visit_present_elements(
    realm: &mut Realm,
    this: &JsValue,
    args: &[JsValue],
    context: &str,
    proceed: impl Fn(bool) -> bool,
) -> Result<bool, ObjectError> {
    let object = realm.require_object_coercible(this, context)?.clone();
    let len = realm.length_of_array_like(&object)? as usize;
    let callback = arg(args, 0);
    if !realm.is_callable(&callback) {
        return Err(ObjectError::type_error(format!(
            "{} is not a function",
            realm.describe(&callback)
        )));
    }
    let this_arg = arg(args, 1);
    for k in 0..len {
        if !realm.has_property(&object, k)? {
            continue;
        }
        let element = realm.get(&object, k)?;
        let result = realm.call(
            &callback,
            &this_arg,
            &[element, JsValue::Number(k as f64), object.clone()],
        )?;
        if !proceed(truthy(&result)) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// `ToBoolean`.
pub fn truthy(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Bool(b) => *b,
        JsValue::Number(n) => !(n.is_nan() || *n == 0.0),
        JsValue::Str(s) => !s.is_empty(),
        JsValue::Symbol(_) | JsValue::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

/// `ToString(RequireObjectCoercible(this))`.
pub fn this_string(realm: &mut Realm, this: &JsValue, context: &str) -> Result<String, ObjectError> {
    let value = realm.require_object_coercible(this, context)?.clone();
    realm.to_js_string(&value)
}

fn install_string(realm: &mut Realm) -> Result<(), ObjectError> {
    let i = realm.intrinsics();
    let ctor: NativeFn =
        Rc::new(|realm: &mut Realm, _this: &JsValue, args: &[JsValue]| match args.first() {
            None => Ok(JsValue::from("")),
            Some(v) => Ok(JsValue::Str(realm.to_js_string(v)?)),
        });
    realm.set_native_behavior(i.string_ctor, ctor, None)?;

    let proto = i.string_prototype;
    realm.define_method(proto, "indexOf", 1, |realm, this, args| {
        let s = code_units(&this_string(realm, this, "String.prototype.indexOf")?);
        let search = code_units(&realm.to_js_string(&arg(args, 0))?);
        let start = clamp_position(&arg(args, 1), s.len());
        Ok(JsValue::Number(
            index_of_code_units(&s, &search, start).map_or(-1.0, |i| i as f64),
        ))
    })?;

    realm.define_method(proto, "substring", 2, |realm, this, args| {
        let s = code_units(&this_string(realm, this, "String.prototype.substring")?);
        let start = clamp_position(&arg(args, 0), s.len());
        let end = match arg(args, 1) {
            JsValue::Undefined => s.len(),
            v => clamp_position(&v, s.len()),
        };
        let (from, to) = (start.min(end), start.max(end));
        Ok(JsValue::Str(String::from_utf16_lossy(&s[from..to])))
    })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

fn install_number(realm: &mut Realm) -> Result<(), ObjectError> {
    let ctor: NativeFn =
        Rc::new(|_realm: &mut Realm, _this: &JsValue, args: &[JsValue]| {
            Ok(JsValue::Number(args.first().map_or(0.0, to_number)))
        });
    let number_ctor = realm.intrinsics().number_ctor;
    realm.set_native_behavior(number_ctor, ctor, None)
}
