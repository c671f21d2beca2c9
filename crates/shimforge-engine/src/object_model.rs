//! Values, property descriptors and the object heap capabilities are
//! installed onto.
//!
//! Objects live in an arena ([`ObjectHeap`]) and are referred to by
//! [`ObjectHandle`]. Each object keeps its own properties in a map for
//! lookup plus an insertion-order list, so own keys enumerate the way
//! `[[OwnPropertyKeys]]` requires: array indices ascending, then strings,
//! then symbols. Accessor invocation lives in the realm; the heap only
//! stores getter and setter handles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coercion::number_to_js_string;

// ---------------------------------------------------------------------------
// Keys and handles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Property name: a string or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    String(String),
    Symbol(SymbolId),
}

impl PropertyKey {
    /// The index this key names when it is a canonical array index: `"7"`
    /// is, `"07"`, `"-1"` and `"4294967295"` are not.
    pub fn array_index(&self) -> Option<u32> {
        let Self::String(s) = self else {
            return None;
        };
        if !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0')) {
            return None;
        }
        s.parse::<u32>().ok().filter(|n| *n < u32::MAX)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Symbol(SymbolId(id)) => write!(f, "Symbol({id})"),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<usize> for PropertyKey {
    fn from(index: usize) -> Self {
        Self::String(index.to_string())
    }
}

/// Arena index of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Slot in the realm's native function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

// ---------------------------------------------------------------------------
// JsValue
// ---------------------------------------------------------------------------

/// Script value. Numbers are IEEE doubles so NaN, `-0` and the infinities
/// round-trip through every coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Symbol(SymbolId),
    Object(ObjectHandle),
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_object(&self) -> Option<ObjectHandle> {
        if let Self::Object(h) = self { Some(*h) } else { None }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Self::Number(n) = self { Some(*n) } else { None }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::Str(s) = self { Some(s) } else { None }
    }

    /// `SameValue`: NaN equals itself, `+0` and `-0` differ.
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                (a.is_nan() && b.is_nan()) || (a == b && a.signum() == b.signum())
            }
            _ => self == other,
        }
    }

    /// `SameValueZero`: NaN equals itself, `+0` equals `-0`.
    pub fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) if a.is_nan() => b.is_nan(),
            _ => self.strict_equals(other),
        }
    }

    /// `===`.
    pub fn strict_equals(&self, other: &Self) -> bool {
        // Derived `PartialEq` on f64 already gives NaN != NaN and 0 == -0.
        self == other
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<ObjectHandle> for JsValue {
    fn from(h: ObjectHandle) -> Self {
        Self::Object(h)
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&number_to_js_string(*n)),
            Self::Str(s) => f.write_str(s),
            Self::Symbol(SymbolId(id)) => write!(f, "Symbol({id})"),
            Self::Object(h) => write!(f, "[{h}]"),
        }
    }
}

/// `typeof` result. `null` is `Object`; callable objects are `Function`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsType {
    Undefined,
    Object,
    Boolean,
    Number,
    String,
    Symbol,
    Function,
}

impl JsType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for JsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropertyDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyDescriptor {
    Data {
        value: JsValue,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<ObjectHandle>,
        set: Option<ObjectHandle>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyDescriptor {
    /// What plain assignment creates: every attribute on.
    pub fn data(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Every attribute off.
    pub fn data_frozen(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Shape of built-in methods: hidden from enumeration, otherwise open.
    pub fn builtin(value: JsValue) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    fn configurable_mut(&mut self) -> &mut bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => configurable,
        }
    }

    pub fn is_configurable(&self) -> bool {
        matches!(
            self,
            Self::Data { configurable: true, .. } | Self::Accessor { configurable: true, .. }
        )
    }

    pub fn is_enumerable(&self) -> bool {
        matches!(
            self,
            Self::Data { enumerable: true, .. } | Self::Accessor { enumerable: true, .. }
        )
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    pub fn value(&self) -> Option<&JsValue> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Accessors are never writable.
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Data { writable: true, .. })
    }

    pub fn set_non_configurable(&mut self) {
        *self.configurable_mut() = false;
    }

    /// No-op for accessors.
    pub fn set_non_writable(&mut self) {
        if let Self::Data { writable, .. } = self {
            *writable = false;
        }
    }

    /// May `self` (the current, non-configurable property) be replaced by
    /// `next`? Only changes that keep the property locked are allowed.
    fn permits_locked_redefinition(&self, next: &Self) -> bool {
        if next.is_configurable() || next.is_enumerable() != self.is_enumerable() {
            return false;
        }
        match (self, next) {
            (Self::Data { writable: true, .. }, Self::Data { .. }) => true,
            (
                Self::Data { value: old, writable: false, .. },
                Self::Data { value: new, writable, .. },
            ) => !*writable && old.same_value(new),
            (
                Self::Accessor { get: old_get, set: old_set, .. },
                Self::Accessor { get, set, .. },
            ) => old_get == get && old_set == set,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectError
// ---------------------------------------------------------------------------

/// Failures raised by the heap, the realm and the shim algorithms. The
/// first two variants are the script-visible exception types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ObjectError {
    #[error("TypeError: {0}")]
    TypeError(String),
    #[error("RangeError: {0}")]
    RangeError(String),
    /// Dangling handle.
    #[error("{0} not found")]
    ObjectNotFound(ObjectHandle),
    #[error("TypeError: prototype chain cycle detected")]
    PrototypeCycleDetected,
    #[error("TypeError: prototype chain depth {depth} exceeds max {max}")]
    PrototypeChainTooDeep { depth: u32, max: u32 },
}

impl ObjectError {
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::TypeError(_) | Self::PrototypeCycleDetected | Self::PrototypeChainTooDeep { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// OrdinaryObject
// ---------------------------------------------------------------------------

const MAX_PROTOTYPE_CHAIN_DEPTH: u32 = 1024;

/// `class_tag` of array objects.
pub const ARRAY_CLASS: &str = "Array";

fn length_key() -> PropertyKey {
    PropertyKey::from("length")
}

/// JSON maps need string keys, so the property table is written as a list
/// of `[key, descriptor]` pairs.
mod property_pairs {
    use super::{BTreeMap, PropertyDescriptor, PropertyKey};
    use serde::{Deserialize, Deserializer, Serializer};

    type Table = BTreeMap<PropertyKey, PropertyDescriptor>;

    pub fn serialize<S: Serializer>(table: &Table, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(table.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Table, D::Error> {
        Vec::<(PropertyKey, PropertyDescriptor)>::deserialize(deserializer)
            .map(|pairs| pairs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdinaryObject {
    /// `None` ends the chain.
    pub prototype: Option<ObjectHandle>,
    pub extensible: bool,
    #[serde(with = "property_pairs")]
    properties: BTreeMap<PropertyKey, PropertyDescriptor>,
    insertion_order: Vec<PropertyKey>,
    /// `Array`, `Function`, `NodeList`, ...
    pub class_tag: Option<String>,
    pub call: Option<FunctionId>,
    pub construct: Option<FunctionId>,
    /// Embedder data, e.g. the id of the DOM node this object wraps.
    pub host_slot: Option<u64>,
}

impl Default for OrdinaryObject {
    fn default() -> Self {
        Self::with_prototype(None)
    }
}

impl OrdinaryObject {
    pub fn with_prototype(prototype: Option<ObjectHandle>) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: BTreeMap::new(),
            insertion_order: Vec::new(),
            class_tag: None,
            call: None,
            construct: None,
            host_slot: None,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.call.is_some()
    }

    pub fn is_array(&self) -> bool {
        self.class_tag.as_deref() == Some(ARRAY_CLASS)
    }

    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    fn put(&mut self, key: PropertyKey, desc: PropertyDescriptor) {
        if let Some(slot) = self.properties.get_mut(&key) {
            *slot = desc;
        } else {
            self.insertion_order.push(key.clone());
            self.properties.insert(key, desc);
        }
    }

    fn take(&mut self, key: &PropertyKey) {
        if self.properties.remove(key).is_some() {
            self.insertion_order.retain(|k| k != key);
        }
    }

    /// `[[DefineOwnProperty]]`. A refused definition (new key on a
    /// non-extensible object, incompatible change to a non-configurable
    /// property) is `Ok(false)`, not an error.
    pub fn define_own_property(
        &mut self,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool, ObjectError> {
        let allowed = match self.properties.get(&key) {
            None => self.extensible,
            Some(current) if current.is_configurable() => true,
            Some(current) => current.permits_locked_redefinition(&desc),
        };
        if allowed {
            self.put(key, desc);
        }
        Ok(allowed)
    }

    /// `[[Delete]]`: `false` only for a present, non-configurable key.
    pub fn delete(&mut self, key: &PropertyKey) -> bool {
        if self.properties.get(key).is_some_and(|d| !d.is_configurable()) {
            return false;
        }
        self.take(key);
        true
    }

    /// `[[OwnPropertyKeys]]` order.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<(u32, &PropertyKey)> = self
            .insertion_order
            .iter()
            .filter_map(|k| k.array_index().map(|i| (i, k)))
            .collect();
        indices.sort_unstable_by_key(|(i, _)| *i);

        let strings = self
            .insertion_order
            .iter()
            .filter(|k| matches!(k, PropertyKey::String(_)) && k.array_index().is_none());
        let symbols = self
            .insertion_order
            .iter()
            .filter(|k| matches!(k, PropertyKey::Symbol(_)));

        indices
            .into_iter()
            .map(|(_, k)| k)
            .chain(strings)
            .chain(symbols)
            .cloned()
            .collect()
    }

    /// What `Object.keys` returns.
    pub fn enumerable_string_keys(&self) -> Vec<String> {
        self.own_property_keys()
            .into_iter()
            .filter_map(|k| match (self.properties.get(&k), k) {
                (Some(d), PropertyKey::String(s)) if d.is_enumerable() => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    fn lock(&mut self, read_only: bool) {
        self.extensible = false;
        for desc in self.properties.values_mut() {
            desc.set_non_configurable();
            if read_only {
                desc.set_non_writable();
            }
        }
    }

    /// `Object.freeze`.
    pub fn freeze(&mut self) {
        self.lock(true);
    }

    /// `Object.seal`.
    pub fn seal(&mut self) {
        self.lock(false);
    }

    pub fn is_frozen(&self) -> bool {
        self.is_sealed() && self.properties.values().all(|d| !d.is_writable())
    }

    pub fn is_sealed(&self) -> bool {
        !self.extensible && self.properties.values().all(|d| !d.is_configurable())
    }

    fn array_length(&self) -> Option<u32> {
        let n = self.properties.get(&length_key())?.value()?.as_number()?;
        Some(n as u32)
    }

    fn store_length(&mut self, len: u32) {
        if let Some(PropertyDescriptor::Data { value, .. }) = self.properties.get_mut(&length_key())
        {
            *value = JsValue::Number(f64::from(len));
        }
    }

    /// Array `length` assignment: validates, drops elements at or above the
    /// new length, then stores it.
    fn truncate_to(&mut self, requested: &JsValue) -> Result<(), ObjectError> {
        let n = requested.as_number().unwrap_or(f64::NAN);
        if !(0.0..=f64::from(u32::MAX)).contains(&n) || n.trunc() != n {
            return Err(ObjectError::RangeError("invalid array length".to_string()));
        }
        let new_len = n as u32;
        let doomed: Vec<PropertyKey> = self
            .insertion_order
            .iter()
            .filter(|k| k.array_index().is_some_and(|i| i >= new_len))
            .cloned()
            .collect();
        for key in &doomed {
            self.take(key);
        }
        self.store_length(new_len);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ObjectHeap
// ---------------------------------------------------------------------------

/// Arena of objects. Handles index into it and are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectHeap {
    objects: Vec<OrdinaryObject>,
}

impl ObjectHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, proto: Option<ObjectHandle>) -> ObjectHandle {
        self.alloc_object(OrdinaryObject::with_prototype(proto))
    }

    /// Null-prototype object.
    pub fn alloc_plain(&mut self) -> ObjectHandle {
        self.alloc(None)
    }

    pub fn alloc_object(&mut self, object: OrdinaryObject) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle((self.objects.len() - 1) as u32)
    }

    /// An `Array` whose `length` is `length` and which has no elements.
    pub fn alloc_array(&mut self, proto: Option<ObjectHandle>, length: u32) -> ObjectHandle {
        let mut array = OrdinaryObject::with_prototype(proto);
        array.class_tag = Some(ARRAY_CLASS.to_string());
        array.put(
            length_key(),
            PropertyDescriptor::Data {
                value: JsValue::Number(f64::from(length)),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        self.alloc_object(array)
    }

    pub fn get(&self, handle: ObjectHandle) -> Result<&OrdinaryObject, ObjectError> {
        self.objects
            .get(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Result<&mut OrdinaryObject, ObjectError> {
        self.objects
            .get_mut(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound(handle))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The owner and descriptor of the first `key` along the prototype
    /// chain starting at `handle` itself.
    pub fn find_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Option<(ObjectHandle, PropertyDescriptor)>, ObjectError> {
        let mut seen = BTreeSet::new();
        let mut cursor = Some(handle);
        while let Some(h) = cursor {
            let depth = seen.len() as u32;
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !seen.insert(h) {
                return Err(ObjectError::PrototypeCycleDetected);
            }
            let object = self.get(h)?;
            if let Some(desc) = object.get_own_property(key) {
                return Ok(Some((h, desc.clone())));
            }
            cursor = object.prototype;
        }
        Ok(None)
    }

    /// Data-only `[[Get]]`: accessors read as `undefined` here, the realm
    /// is what calls getters.
    pub fn get_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<JsValue, ObjectError> {
        let found = self.find_property(handle, key)?;
        Ok(found
            .and_then(|(_, desc)| desc.value().cloned())
            .unwrap_or(JsValue::Undefined))
    }

    pub fn has_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<bool, ObjectError> {
        self.find_property(handle, key).map(|found| found.is_some())
    }

    /// Data-only `[[Set]]`. `Ok(false)` when the write is refused: a
    /// read-only or accessor property anywhere on the chain, or a new key on
    /// a non-extensible object. Index writes past the end grow an array's
    /// `length`; `length` writes truncate it.
    pub fn set_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: JsValue,
    ) -> Result<bool, ObjectError> {
        let inherited = match self.find_property(handle, &key)? {
            Some((_, desc)) if !desc.is_writable() => return Ok(false),
            Some((owner, _)) => owner != handle,
            None => true,
        };

        let object = self.get_mut(handle)?;
        if !inherited {
            if object.is_array() && key == length_key() {
                object.truncate_to(&value)?;
            } else if let Some(PropertyDescriptor::Data { value: slot, .. }) =
                object.properties.get_mut(&key)
            {
                *slot = value;
            }
            return Ok(true);
        }

        if !object.extensible {
            return Ok(false);
        }
        let index = key.array_index();
        object.put(key, PropertyDescriptor::data(value));
        if let (Some(i), Some(len)) = (index, object.array_length())
            && object.is_array()
            && i >= len
        {
            object.store_length(i + 1);
        }
        Ok(true)
    }

    pub fn get_prototype_of(
        &self,
        handle: ObjectHandle,
    ) -> Result<Option<ObjectHandle>, ObjectError> {
        Ok(self.get(handle)?.prototype)
    }

    /// `Object.setPrototypeOf`. A prototype that would make `handle` its
    /// own ancestor is a cycle error; a non-extensible object only accepts
    /// its current prototype.
    pub fn set_prototype_of(
        &mut self,
        handle: ObjectHandle,
        proto: Option<ObjectHandle>,
    ) -> Result<bool, ObjectError> {
        let mut seen = BTreeSet::from([handle]);
        let mut cursor = proto;
        while let Some(h) = cursor {
            if !seen.insert(h) {
                return Err(ObjectError::PrototypeCycleDetected);
            }
            cursor = self.get(h)?.prototype;
        }

        let object = self.get_mut(handle)?;
        if object.extensible {
            object.prototype = proto;
            Ok(true)
        } else {
            Ok(object.prototype == proto)
        }
    }

    /// `Object.defineProperty` with refusal reported as `Ok(false)`.
    pub fn define_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool, ObjectError> {
        self.get_mut(handle)?.define_own_property(key, desc)
    }

    pub fn get_own_property_descriptor(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Option<PropertyDescriptor>, ObjectError> {
        Ok(self.get(handle)?.get_own_property(key).cloned())
    }

    pub fn keys(&self, handle: ObjectHandle) -> Result<Vec<String>, ObjectError> {
        Ok(self.get(handle)?.enumerable_string_keys())
    }

    /// Values of [`Self::entries`].
    pub fn values(&self, handle: ObjectHandle) -> Result<Vec<JsValue>, ObjectError> {
        let entries = self.entries(handle)?;
        Ok(entries.into_iter().map(|(_, v)| v).collect())
    }

    /// Enumerable own string-keyed data properties in key order. Accessors
    /// are left out since reading them needs the realm.
    pub fn entries(&self, handle: ObjectHandle) -> Result<Vec<(String, JsValue)>, ObjectError> {
        let object = self.get(handle)?;
        let mut out = Vec::new();
        for key in object.enumerable_string_keys() {
            let value = object
                .get_own_property(&PropertyKey::from(key.as_str()))
                .and_then(PropertyDescriptor::value);
            if let Some(value) = value {
                out.push((key, value.clone()));
            }
        }
        Ok(out)
    }

    pub fn prevent_extensions(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle).map(OrdinaryObject::prevent_extensions)
    }

    pub fn freeze(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle).map(OrdinaryObject::freeze)
    }

    pub fn seal(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle).map(OrdinaryObject::seal)
    }

    pub fn is_frozen(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        self.get(handle).map(OrdinaryObject::is_frozen)
    }
}
