//! Realm: an object heap plus its native function table and intrinsics.
//!
//! The realm is the concrete host the installer binds capabilities onto.
//! Native functions are reference-counted closures so embedders (the DOM
//! bindings, tests) can capture their own state.

use std::fmt;
use std::rc::Rc;

use crate::attribute_policy::AttributeSet;
use crate::coercion::{number_to_js_string, to_length};
use crate::installer::CapabilityHost;
use crate::object_model::{
    FunctionId, JsType, JsValue, ObjectError, ObjectHandle, ObjectHeap, OrdinaryObject,
    PropertyDescriptor, PropertyKey,
};

/// Native function body: `(realm, this, args)`. Constructors receive the
/// constructor itself as `this`.
pub type NativeFn = Rc<dyn Fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError>>;

/// Handles of the built-in objects every realm starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intrinsics {
    pub object_prototype: ObjectHandle,
    pub function_prototype: ObjectHandle,
    pub object_ctor: ObjectHandle,
    pub array_prototype: ObjectHandle,
    pub array_ctor: ObjectHandle,
    pub string_prototype: ObjectHandle,
    pub string_ctor: ObjectHandle,
    pub number_prototype: ObjectHandle,
    pub number_ctor: ObjectHandle,
    pub boolean_prototype: ObjectHandle,
}

pub struct Realm {
    heap: ObjectHeap,
    functions: Vec<NativeFn>,
    intrinsics: Intrinsics,
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realm")
            .field("objects", &self.heap.len())
            .field("functions", &self.functions.len())
            .field("intrinsics", &self.intrinsics)
            .finish()
    }
}

/// Argument `i`, or `undefined` when absent.
pub fn arg(args: &[JsValue], i: usize) -> JsValue {
    args.get(i).cloned().unwrap_or(JsValue::Undefined)
}

/// UTF-16 code units of `s`; string indices are code-unit indices.
pub fn code_units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// First index `>= from` where `needle` occurs in `haystack`.
pub fn index_of_code_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    if needle.is_empty() {
        return Some(from);
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

impl Realm {
    /// A realm holding only the bare intrinsic objects: constructors are
    /// callable and linked to their prototypes, but carry no members.
    pub fn bare() -> Self {
        let mut heap = ObjectHeap::new();
        let object_prototype = heap.alloc(None);
        let function_prototype = heap.alloc(Some(object_prototype));
        let array_prototype = heap.alloc(Some(object_prototype));
        let string_prototype = heap.alloc(Some(object_prototype));
        let number_prototype = heap.alloc(Some(object_prototype));
        let boolean_prototype = heap.alloc(Some(object_prototype));
        let placeholder = ObjectHandle(0);

        let mut realm = Self {
            heap,
            functions: Vec::new(),
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                object_ctor: placeholder,
                array_prototype,
                array_ctor: placeholder,
                string_prototype,
                string_ctor: placeholder,
                number_prototype,
                number_ctor: placeholder,
                boolean_prototype,
            },
        };

        realm.intrinsics.object_ctor = realm.create_intrinsic_ctor("Object", object_prototype);
        realm.intrinsics.array_ctor = realm.create_intrinsic_ctor("Array", array_prototype);
        realm.intrinsics.string_ctor = realm.create_intrinsic_ctor("String", string_prototype);
        realm.intrinsics.number_ctor = realm.create_intrinsic_ctor("Number", number_prototype);
        realm
    }

    fn create_intrinsic_ctor(&mut self, name: &str, prototype: ObjectHandle) -> ObjectHandle {
        let ctor = self.create_function(name, 1, |_, _, _| Ok(JsValue::Undefined));
        self.link_prototype(ctor, prototype);
        ctor
    }

    /// Wire `ctor.prototype` and `prototype.constructor`.
    pub fn link_prototype(&mut self, ctor: ObjectHandle, prototype: ObjectHandle) {
        let ctor_link = self.heap.define_property(
            ctor,
            "prototype".into(),
            PropertyDescriptor::Data {
                value: JsValue::Object(prototype),
                writable: false,
                enumerable: false,
                configurable: false,
            },
        );
        let proto_link = self.heap.define_property(
            prototype,
            "constructor".into(),
            PropertyDescriptor::builtin(JsValue::Object(ctor)),
        );
        debug_assert_eq!(ctor_link, Ok(true));
        debug_assert_eq!(proto_link, Ok(true));
    }

    pub fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut self.heap
    }

    pub fn intrinsics(&self) -> Intrinsics {
        self.intrinsics
    }

    // -- function creation --------------------------------------------------

    pub fn register_native(&mut self, f: NativeFn) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(f);
        id
    }

    fn alloc_function(
        &mut self,
        name: &str,
        length: u32,
        call: FunctionId,
        construct: Option<FunctionId>,
    ) -> ObjectHandle {
        let mut function = OrdinaryObject::with_prototype(Some(self.intrinsics.function_prototype));
        function.class_tag = Some("Function".to_string());
        function.call = Some(call);
        function.construct = construct;
        let h = self.heap.alloc_object(function);
        let attrs = |value| PropertyDescriptor::Data {
            value,
            writable: false,
            enumerable: false,
            configurable: true,
        };
        let name_defined = self.heap.define_property(h, "name".into(), attrs(JsValue::from(name)));
        let length_defined = self.heap.define_property(
            h,
            "length".into(),
            attrs(JsValue::Number(f64::from(length))),
        );
        debug_assert_eq!(name_defined, Ok(true));
        debug_assert_eq!(length_defined, Ok(true));
        h
    }

    /// A callable, non-constructor function object.
    pub fn create_function<F>(&mut self, name: &str, length: u32, f: F) -> ObjectHandle
    where
        F: Fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError> + 'static,
    {
        let call = self.register_native(Rc::new(f));
        self.alloc_function(name, length, call, None)
    }

    /// A function object with separate `[[Call]]` and `[[Construct]]` bodies.
    pub fn create_constructor<C, K>(
        &mut self,
        name: &str,
        length: u32,
        call: C,
        construct: K,
    ) -> ObjectHandle
    where
        C: Fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError> + 'static,
        K: Fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError> + 'static,
    {
        let call = self.register_native(Rc::new(call));
        let construct = self.register_native(Rc::new(construct));
        self.alloc_function(name, length, call, Some(construct))
    }

    /// Install `[[Call]]`/`[[Construct]]` bodies on an existing function
    /// object (used to give the bare intrinsic constructors behavior).
    pub fn set_native_behavior(
        &mut self,
        target: ObjectHandle,
        call: NativeFn,
        construct: Option<NativeFn>,
    ) -> Result<(), ObjectError> {
        let call = self.register_native(call);
        let construct = construct.map(|k| self.register_native(k));
        let obj = self.heap.get_mut(target)?;
        obj.call = Some(call);
        obj.construct = construct;
        Ok(())
    }

    /// A plain object inheriting from `Object.prototype`.
    pub fn create_object(&mut self) -> ObjectHandle {
        self.heap.alloc(Some(self.intrinsics.object_prototype))
    }

    /// A dense array holding `values`.
    pub fn create_array(&mut self, values: Vec<JsValue>) -> Result<ObjectHandle, ObjectError> {
        let arr = self
            .heap
            .alloc_array(Some(self.intrinsics.array_prototype), 0);
        for (i, value) in values.into_iter().enumerate() {
            self.heap.set_property(arr, i.into(), value)?;
        }
        Ok(arr)
    }

    // -- type queries -------------------------------------------------------

    /// The `typeof` operator.
    pub fn type_of(&self, value: &JsValue) -> JsType {
        match value {
            JsValue::Undefined => JsType::Undefined,
            JsValue::Null => JsType::Object,
            JsValue::Bool(_) => JsType::Boolean,
            JsValue::Number(_) => JsType::Number,
            JsValue::Str(_) => JsType::String,
            JsValue::Symbol(_) => JsType::Symbol,
            JsValue::Object(_) if self.is_callable(value) => JsType::Function,
            JsValue::Object(_) => JsType::Object,
        }
    }

    pub fn is_callable(&self, value: &JsValue) -> bool {
        value
            .as_object()
            .and_then(|h| self.heap.get(h).ok())
            .is_some_and(OrdinaryObject::is_callable)
    }

    pub fn is_constructor(&self, value: &JsValue) -> bool {
        value
            .as_object()
            .and_then(|h| self.heap.get(h).ok())
            .is_some_and(|o| o.construct.is_some())
    }

    pub fn is_array(&self, value: &JsValue) -> bool {
        value
            .as_object()
            .and_then(|h| self.heap.get(h).ok())
            .is_some_and(OrdinaryObject::is_array)
    }

    pub fn host_slot(&self, value: &JsValue) -> Option<u64> {
        self.heap.get(value.as_object()?).ok()?.host_slot
    }

    // -- invocation ---------------------------------------------------------

    fn native(&self, id: FunctionId) -> Result<NativeFn, ObjectError> {
        self.functions
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| ObjectError::type_error(format!("native function {} missing", id.0)))
    }

    /// `Call(F, V, args)`.
    pub fn call(
        &mut self,
        f: &JsValue,
        this: &JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, ObjectError> {
        let id = f
            .as_object()
            .and_then(|h| self.heap.get(h).ok())
            .and_then(|o| o.call)
            .ok_or_else(|| ObjectError::type_error(format!("{} is not a function", self.describe(f))))?;
        let body = self.native(id)?;
        body(self, this, args)
    }

    /// `Construct(F, args)`.
    pub fn construct(&mut self, f: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
        let id = f
            .as_object()
            .and_then(|h| self.heap.get(h).ok())
            .and_then(|o| o.construct)
            .ok_or_else(|| {
                ObjectError::type_error(format!("{} is not a constructor", self.describe(f)))
            })?;
        let body = self.native(id)?;
        body(self, f, args)
    }

    /// Call the member `name` of `receiver` with `receiver` as `this`.
    pub fn invoke(
        &mut self,
        receiver: &JsValue,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, ObjectError> {
        let f = self.get(receiver, name)?;
        self.call(&f, receiver, args)
    }

    /// Short label for error messages: functions by name, objects by class.
    pub fn describe(&self, value: &JsValue) -> String {
        match value {
            JsValue::Object(h) => match self.heap.get(*h) {
                Ok(o) if o.is_callable() => {
                    let name = self
                        .heap
                        .get_property(*h, &"name".into())
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default();
                    format!("function {name}")
                }
                Ok(o) => format!("[object {}]", o.class_tag.as_deref().unwrap_or("Object")),
                Err(_) => h.to_string(),
            },
            JsValue::Str(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }

    // -- property access ----------------------------------------------------

    fn prototype_for_primitive(&self, value: &JsValue) -> Option<ObjectHandle> {
        match value {
            JsValue::Str(_) => Some(self.intrinsics.string_prototype),
            JsValue::Number(_) => Some(self.intrinsics.number_prototype),
            JsValue::Bool(_) => Some(self.intrinsics.boolean_prototype),
            _ => None,
        }
    }

    /// `GetV(V, P)`: property read on any value. Strings expose `length`
    /// and code-unit indices; accessors are invoked with `receiver` as `this`.
    pub fn get(
        &mut self,
        receiver: &JsValue,
        key: impl Into<PropertyKey>,
    ) -> Result<JsValue, ObjectError> {
        let key = key.into();
        let holder = match receiver {
            JsValue::Undefined | JsValue::Null => {
                return Err(ObjectError::type_error(format!(
                    "cannot read property '{key}' of {receiver}"
                )));
            }
            JsValue::Object(h) => *h,
            JsValue::Str(s) => {
                if let Some(v) = string_own_property(s, &key) {
                    return Ok(v);
                }
                self.intrinsics.string_prototype
            }
            JsValue::Symbol(_) => return Ok(JsValue::Undefined),
            primitive => match self.prototype_for_primitive(primitive) {
                Some(p) => p,
                None => return Ok(JsValue::Undefined),
            },
        };
        match self.heap.find_property(holder, &key)? {
            Some((_, PropertyDescriptor::Data { value, .. })) => Ok(value),
            Some((_, PropertyDescriptor::Accessor { get: Some(g), .. })) => {
                self.call(&JsValue::Object(g), receiver, &[])
            }
            _ => Ok(JsValue::Undefined),
        }
    }

    /// `HasProperty` on any value (strings report their indices).
    pub fn has_property(
        &self,
        receiver: &JsValue,
        key: impl Into<PropertyKey>,
    ) -> Result<bool, ObjectError> {
        let key = key.into();
        match receiver {
            JsValue::Object(h) => self.heap.has_property(*h, &key),
            JsValue::Str(s) if string_own_property(s, &key).is_some() => Ok(true),
            other => match self.prototype_for_primitive(other) {
                Some(p) => self.heap.has_property(p, &key),
                None => Ok(false),
            },
        }
    }

    /// `Set(O, P, V, true)`: a refused write is a TypeError.
    pub fn set(
        &mut self,
        target: ObjectHandle,
        key: impl Into<PropertyKey>,
        value: JsValue,
    ) -> Result<(), ObjectError> {
        let key = key.into();
        if let Some((_, PropertyDescriptor::Accessor { set, .. })) =
            self.heap.find_property(target, &key)?
        {
            return match set {
                Some(s) => self
                    .call(&JsValue::Object(s), &JsValue::Object(target), &[value])
                    .map(|_| ()),
                None => Err(ObjectError::type_error(format!(
                    "cannot set property '{key}' which has only a getter"
                ))),
            };
        }
        if self.heap.set_property(target, key.clone(), value)? {
            Ok(())
        } else {
            Err(ObjectError::type_error(format!(
                "cannot assign to read only property '{key}' of {}",
                self.describe(&JsValue::Object(target))
            )))
        }
    }

    /// Define a built-in style member (writable, non-enumerable, configurable).
    pub fn define_builtin(
        &mut self,
        target: ObjectHandle,
        name: &str,
        value: JsValue,
    ) -> Result<bool, ObjectError> {
        self.heap
            .define_property(target, name.into(), PropertyDescriptor::builtin(value))
    }

    /// Create a native function and bind it as a built-in member of `target`.
    pub fn define_method<F>(
        &mut self,
        target: ObjectHandle,
        name: &str,
        length: u32,
        f: F,
    ) -> Result<ObjectHandle, ObjectError>
    where
        F: Fn(&mut Realm, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError> + 'static,
    {
        let func = self.create_function(name, length, f);
        self.define_builtin(target, name, JsValue::Object(func))?;
        Ok(func)
    }

    // -- conversions --------------------------------------------------------

    /// `RequireObjectCoercible(V)`.
    pub fn require_object_coercible<'v>(
        &self,
        value: &'v JsValue,
        context: &str,
    ) -> Result<&'v JsValue, ObjectError> {
        if value.is_nullish() {
            return Err(ObjectError::type_error(format!(
                "{context} called on null or undefined"
            )));
        }
        Ok(value)
    }

    /// `ToObject(V)`. Primitives get a fresh wrapper inheriting from their
    /// prototype; string wrappers carry read-only index properties.
    pub fn to_object(&mut self, value: &JsValue, context: &str) -> Result<ObjectHandle, ObjectError> {
        let value = self.require_object_coercible(value, context)?;
        if let JsValue::Object(h) = value {
            return Ok(*h);
        }
        let proto = self
            .prototype_for_primitive(value)
            .unwrap_or(self.intrinsics.object_prototype);
        let wrapper = self.heap.alloc(Some(proto));
        if let JsValue::Str(s) = value {
            let units = code_units(s);
            for (i, unit) in units.iter().enumerate() {
                let ch = JsValue::Str(String::from_utf16_lossy(&[*unit]));
                let desc = PropertyDescriptor::Data {
                    value: ch,
                    writable: false,
                    enumerable: true,
                    configurable: false,
                };
                self.heap.define_property(wrapper, i.into(), desc)?;
            }
            self.heap.define_property(
                wrapper,
                "length".into(),
                PropertyDescriptor::data_frozen(JsValue::Number(units.len() as f64)),
            )?;
        }
        Ok(wrapper)
    }

    /// `ToString(V)`.
    pub fn to_js_string(&mut self, value: &JsValue) -> Result<String, ObjectError> {
        let mut visiting = Vec::new();
        self.to_js_string_inner(value, &mut visiting)
    }

    fn to_js_string_inner(
        &mut self,
        value: &JsValue,
        visiting: &mut Vec<ObjectHandle>,
    ) -> Result<String, ObjectError> {
        match value {
            JsValue::Undefined => Ok("undefined".to_string()),
            JsValue::Null => Ok("null".to_string()),
            JsValue::Bool(b) => Ok(b.to_string()),
            JsValue::Number(n) => Ok(number_to_js_string(*n)),
            JsValue::Str(s) => Ok(s.clone()),
            JsValue::Symbol(_) => Err(ObjectError::type_error(
                "cannot convert a Symbol value to a string",
            )),
            JsValue::Object(h) => {
                if self.is_callable(value) {
                    return Ok(format!("{} () {{ [native code] }}", self.describe(value)));
                }
                if !self.is_array(value) {
                    return Ok(format!(
                        "[object {}]",
                        self.heap.get(*h)?.class_tag.as_deref().unwrap_or("Object")
                    ));
                }
                // Array.prototype.join(","); cyclic references render empty.
                if visiting.contains(h) {
                    return Ok(String::new());
                }
                visiting.push(*h);
                let mut parts = Vec::new();
                for element in self.array_like_to_vec(value)? {
                    if element.is_nullish() {
                        parts.push(String::new());
                    } else {
                        parts.push(self.to_js_string_inner(&element, visiting)?);
                    }
                }
                visiting.pop();
                Ok(parts.join(","))
            }
        }
    }

    /// `LengthOfArrayLike(O)`.
    pub fn length_of_array_like(&mut self, value: &JsValue) -> Result<f64, ObjectError> {
        let len = self.get(value, "length")?;
        Ok(to_length(&len))
    }

    /// Read elements `0..length` of an array-like value.
    pub fn array_like_to_vec(&mut self, value: &JsValue) -> Result<Vec<JsValue>, ObjectError> {
        let len = self.length_of_array_like(value)? as usize;
        (0..len).map(|i| self.get(value, i)).collect()
    }
}

/// Own properties a primitive string exposes: `length` and code-unit indices.
fn string_own_property(s: &str, key: &PropertyKey) -> Option<JsValue> {
    let units = code_units(s);
    if *key == PropertyKey::from("length") {
        return Some(JsValue::Number(units.len() as f64));
    }
    let index = key.array_index()? as usize;
    units
        .get(index)
        .map(|u| JsValue::Str(String::from_utf16_lossy(&[*u])))
}

impl CapabilityHost for Realm {
    type Target = ObjectHandle;
    type Value = JsValue;
    type Error = ObjectError;

    /// Getters run with `target` as `this`; a throwing getter is an error.
    fn member_type(&mut self, target: ObjectHandle, name: &str) -> Result<JsType, ObjectError> {
        let member = self.get(&JsValue::Object(target), name)?;
        Ok(self.type_of(&member))
    }

    fn value_type(&self, value: &JsValue) -> JsType {
        self.type_of(value)
    }

    fn define_member(
        &mut self,
        target: ObjectHandle,
        name: &str,
        value: JsValue,
        attributes: AttributeSet,
    ) -> Result<bool, ObjectError> {
        self.heap
            .define_property(target, name.into(), attributes.descriptor(value))
    }

    fn describe_target(&self, target: ObjectHandle) -> String {
        self.describe(&JsValue::Object(target))
    }
}
