//! Script bindings of a [`DomTree`] into a realm.
//!
//! Every node is exposed through exactly one wrapper object whose host slot
//! holds the node id. The interface prototypes carry the pre-ES2015 DOM
//! surface (`appendChild`, `insertBefore`, `querySelectorAll`, the
//! navigation getters, ...) but none of the members the DOM shims install.
//!
//! Natives share the tree through `Rc<RefCell<_>>`. A borrow is never held
//! across a call back into the realm.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use shimforge_engine::realm::arg;
use shimforge_engine::{JsValue, ObjectError, ObjectHandle, PropertyDescriptor, Realm};

use crate::tree::{DomTree, NodeId, NodeKind};

/// Interface prototype objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomPrototypes {
    pub node: ObjectHandle,
    pub element: ObjectHandle,
    pub character_data: ObjectHandle,
    pub document_type: ObjectHandle,
    pub document: ObjectHandle,
    pub document_fragment: ObjectHandle,
    pub node_list: ObjectHandle,
}

impl DomPrototypes {
    fn for_kind(&self, kind: &NodeKind) -> ObjectHandle {
        match kind {
            NodeKind::Document => self.document,
            NodeKind::DocumentType { .. } => self.document_type,
            NodeKind::Element(_) => self.element,
            NodeKind::Text(_) | NodeKind::Comment(_) => self.character_data,
            NodeKind::DocumentFragment => self.document_fragment,
        }
    }
}

fn class_of(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Document => "Document",
        NodeKind::DocumentType { .. } => "DocumentType",
        NodeKind::Element(_) => "Element",
        NodeKind::Text(_) => "Text",
        NodeKind::Comment(_) => "Comment",
        NodeKind::DocumentFragment => "DocumentFragment",
    }
}

#[derive(Debug)]
pub(crate) struct DomState {
    pub(crate) tree: DomTree,
    wrappers: BTreeMap<NodeId, ObjectHandle>,
    pub(crate) prototypes: DomPrototypes,
}

pub(crate) type SharedDom = Rc<RefCell<DomState>>;

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

/// The wrapper of `node`, created on first use.
pub(crate) fn wrap(realm: &mut Realm, dom: &SharedDom, node: NodeId) -> Result<ObjectHandle, ObjectError> {
    let (existing, proto, class) = {
        let state = dom.borrow();
        let kind = state.tree.kind(node)?;
        (
            state.wrappers.get(&node).copied(),
            state.prototypes.for_kind(kind),
            class_of(kind),
        )
    };
    if let Some(handle) = existing {
        return Ok(handle);
    }
    let handle = realm.heap_mut().alloc(Some(proto));
    let object = realm.heap_mut().get_mut(handle)?;
    object.class_tag = Some(class.to_string());
    object.host_slot = Some(node.0 as u64);
    dom.borrow_mut().wrappers.insert(node, handle);
    Ok(handle)
}

pub(crate) fn wrap_optional(
    realm: &mut Realm,
    dom: &SharedDom,
    node: Option<NodeId>,
) -> Result<JsValue, ObjectError> {
    match node {
        Some(n) => Ok(JsValue::Object(wrap(realm, dom, n)?)),
        None => Ok(JsValue::Null),
    }
}

/// The node behind `value`, if it is one of this tree's wrappers.
pub(crate) fn node_of(realm: &Realm, dom: &SharedDom, value: &JsValue) -> Option<NodeId> {
    let handle = value.as_object()?;
    let id = NodeId(usize::try_from(realm.host_slot(value)?).ok()?);
    (dom.borrow().wrappers.get(&id) == Some(&handle)).then_some(id)
}

pub(crate) fn expect_node(
    realm: &Realm,
    dom: &SharedDom,
    value: &JsValue,
    context: &str,
) -> Result<NodeId, ObjectError> {
    node_of(realm, dom, value).ok_or_else(|| {
        ObjectError::type_error(format!(
            "{context}: {} is not a Node",
            realm.describe(value)
        ))
    })
}

/// `null`/`undefined` map to `None`; anything else must be a node.
fn optional_node(
    realm: &Realm,
    dom: &SharedDom,
    value: &JsValue,
    context: &str,
) -> Result<Option<NodeId>, ObjectError> {
    if value.is_nullish() {
        return Ok(None);
    }
    expect_node(realm, dom, value, context).map(Some)
}

/// A static, array-like `NodeList` (not an Array).
pub(crate) fn node_list(realm: &mut Realm, dom: &SharedDom, nodes: Vec<NodeId>) -> Result<JsValue, ObjectError> {
    let proto = dom.borrow().prototypes.node_list;
    let list = realm.heap_mut().alloc(Some(proto));
    let length = nodes.len();
    for (i, node) in nodes.into_iter().enumerate() {
        let wrapper = wrap(realm, dom, node)?;
        realm.heap_mut().define_property(
            list,
            i.into(),
            PropertyDescriptor::Data {
                value: JsValue::Object(wrapper),
                writable: false,
                enumerable: true,
                configurable: true,
            },
        )?;
    }
    realm.heap_mut().define_property(
        list,
        "length".into(),
        PropertyDescriptor::data_frozen(JsValue::Number(length as f64)),
    )?;
    realm.heap_mut().get_mut(list)?.class_tag = Some("NodeList".to_string());
    Ok(JsValue::Object(list))
}

// ---------------------------------------------------------------------------
// Member definition helpers
// ---------------------------------------------------------------------------

fn define_dom_method<F>(
    realm: &mut Realm,
    dom: &SharedDom,
    target: ObjectHandle,
    name: &str,
    length: u32,
    f: F,
) -> Result<(), ObjectError>
where
    F: Fn(&mut Realm, &SharedDom, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError> + 'static,
{
    let dom = Rc::clone(dom);
    realm.define_method(target, name, length, move |realm, this, args| {
        f(realm, &dom, this, args)
    })?;
    Ok(())
}

/// Enumerable, configurable accessor with a getter only; `this` must be a
/// node.
fn define_dom_getter<F>(
    realm: &mut Realm,
    dom: &SharedDom,
    target: ObjectHandle,
    name: &str,
    f: F,
) -> Result<(), ObjectError>
where
    F: Fn(&mut Realm, &SharedDom, NodeId) -> Result<JsValue, ObjectError> + 'static,
{
    let dom = Rc::clone(dom);
    let context = name.to_string();
    let getter = realm.create_function(&format!("get {name}"), 0, move |realm, this, _args| {
        let node = expect_node(realm, &dom, this, &context)?;
        f(realm, &dom, node)
    });
    realm.heap_mut().define_property(
        target,
        name.into(),
        PropertyDescriptor::Accessor {
            get: Some(getter),
            set: None,
            enumerable: true,
            configurable: true,
        },
    )?;
    Ok(())
}

fn define_relation_getter(
    realm: &mut Realm,
    dom: &SharedDom,
    target: ObjectHandle,
    name: &str,
    relation: fn(&DomTree, NodeId) -> Option<NodeId>,
) -> Result<(), ObjectError> {
    define_dom_getter(realm, dom, target, name, move |realm, dom, node| {
        let related = relation(&dom.borrow().tree, node);
        wrap_optional(realm, dom, related)
    })
}

// ---------------------------------------------------------------------------
// Baseline interface members
// ---------------------------------------------------------------------------

fn install_node(realm: &mut Realm, dom: &SharedDom, proto: ObjectHandle) -> Result<(), ObjectError> {
    define_dom_method(realm, dom, proto, "appendChild", 1, |realm, dom, this, args| {
        let parent = expect_node(realm, dom, this, "appendChild")?;
        let child = expect_node(realm, dom, &arg(args, 0), "appendChild")?;
        dom.borrow_mut().tree.append_child(parent, child)?;
        Ok(arg(args, 0))
    })?;

    define_dom_method(realm, dom, proto, "insertBefore", 2, |realm, dom, this, args| {
        let parent = expect_node(realm, dom, this, "insertBefore")?;
        let child = expect_node(realm, dom, &arg(args, 0), "insertBefore")?;
        let reference = optional_node(realm, dom, &arg(args, 1), "insertBefore")?;
        dom.borrow_mut().tree.insert_before(parent, child, reference)?;
        Ok(arg(args, 0))
    })?;

    define_dom_method(realm, dom, proto, "removeChild", 1, |realm, dom, this, args| {
        let parent = expect_node(realm, dom, this, "removeChild")?;
        let child = expect_node(realm, dom, &arg(args, 0), "removeChild")?;
        dom.borrow_mut().tree.remove_child(parent, child)?;
        Ok(arg(args, 0))
    })?;

    define_dom_method(realm, dom, proto, "contains", 1, |realm, dom, this, args| {
        let node = expect_node(realm, dom, this, "contains")?;
        let other = optional_node(realm, dom, &arg(args, 0), "contains")?;
        Ok(JsValue::Bool(
            other.is_some_and(|o| dom.borrow().tree.contains(node, o)),
        ))
    })?;

    define_relation_getter(realm, dom, proto, "parentNode", DomTree::parent)?;
    define_relation_getter(realm, dom, proto, "parentElement", DomTree::parent_element)?;
    define_relation_getter(realm, dom, proto, "firstChild", DomTree::first_child)?;
    define_relation_getter(realm, dom, proto, "lastChild", |tree, n| {
        tree.children(n).last().copied()
    })?;
    define_relation_getter(realm, dom, proto, "nextSibling", DomTree::next_sibling)?;
    define_relation_getter(realm, dom, proto, "previousSibling", DomTree::previous_sibling)?;
    define_relation_getter(realm, dom, proto, "ownerDocument", |tree, n| {
        (n != tree.document()).then(|| tree.document())
    })?;

    define_dom_getter(realm, dom, proto, "childNodes", |realm, dom, node| {
        let children = dom.borrow().tree.children(node).to_vec();
        node_list(realm, dom, children)
    })?;
    define_dom_getter(realm, dom, proto, "nodeType", |_realm, dom, node| {
        Ok(JsValue::Number(f64::from(dom.borrow().tree.kind(node)?.node_type())))
    })?;
    define_dom_getter(realm, dom, proto, "nodeName", |_realm, dom, node| {
        Ok(JsValue::Str(dom.borrow().tree.kind(node)?.node_name()))
    })?;
    define_dom_getter(realm, dom, proto, "textContent", |_realm, dom, node| {
        Ok(JsValue::Str(dom.borrow().tree.text_content(node)))
    })?;
    Ok(())
}

fn install_query(realm: &mut Realm, dom: &SharedDom, proto: ObjectHandle) -> Result<(), ObjectError> {
    define_dom_method(realm, dom, proto, "querySelectorAll", 1, |realm, dom, this, args| {
        let scope = expect_node(realm, dom, this, "querySelectorAll")?;
        let selector = realm.to_js_string(&arg(args, 0))?;
        let found = dom.borrow().tree.query_selector_all(scope, &selector)?;
        node_list(realm, dom, found)
    })
}

fn install_element(realm: &mut Realm, dom: &SharedDom, proto: ObjectHandle) -> Result<(), ObjectError> {
    install_query(realm, dom, proto)?;

    define_dom_method(realm, dom, proto, "getAttribute", 1, |realm, dom, this, args| {
        let node = expect_node(realm, dom, this, "getAttribute")?;
        let name = realm.to_js_string(&arg(args, 0))?;
        Ok(dom
            .borrow()
            .tree
            .get_attribute(node, &name)
            .map_or(JsValue::Null, JsValue::from))
    })?;

    define_dom_method(realm, dom, proto, "setAttribute", 2, |realm, dom, this, args| {
        let node = expect_node(realm, dom, this, "setAttribute")?;
        let name = realm.to_js_string(&arg(args, 0))?;
        let value = realm.to_js_string(&arg(args, 1))?;
        dom.borrow_mut().tree.set_attribute(node, &name, &value)?;
        Ok(JsValue::Undefined)
    })?;

    define_dom_getter(realm, dom, proto, "tagName", |_realm, dom, node| {
        Ok(JsValue::Str(dom.borrow().tree.kind(node)?.node_name()))
    })
}

fn install_document(realm: &mut Realm, dom: &SharedDom, proto: ObjectHandle) -> Result<(), ObjectError> {
    install_query(realm, dom, proto)?;

    define_dom_method(realm, dom, proto, "createElement", 1, |realm, dom, _this, args| {
        let tag = realm.to_js_string(&arg(args, 0))?;
        let node = dom.borrow_mut().tree.create_element(&tag);
        Ok(JsValue::Object(wrap(realm, dom, node)?))
    })?;

    define_dom_method(realm, dom, proto, "createTextNode", 1, |realm, dom, _this, args| {
        let data = realm.to_js_string(&arg(args, 0))?;
        let node = dom.borrow_mut().tree.create_text(data);
        Ok(JsValue::Object(wrap(realm, dom, node)?))
    })?;

    define_dom_method(realm, dom, proto, "createComment", 1, |realm, dom, _this, args| {
        let data = realm.to_js_string(&arg(args, 0))?;
        let node = dom.borrow_mut().tree.create_comment(data);
        Ok(JsValue::Object(wrap(realm, dom, node)?))
    })?;

    define_dom_method(realm, dom, proto, "createDocumentFragment", 0, |realm, dom, _this, _args| {
        let node = dom.borrow_mut().tree.create_fragment();
        Ok(JsValue::Object(wrap(realm, dom, node)?))
    })?;

    define_relation_getter(realm, dom, proto, "documentElement", |tree, _| {
        tree.document_element()
    })
}

fn install_character_data(
    realm: &mut Realm,
    dom: &SharedDom,
    proto: ObjectHandle,
) -> Result<(), ObjectError> {
    define_dom_getter(realm, dom, proto, "data", |_realm, dom, node| {
        Ok(JsValue::Str(dom.borrow().tree.text_content(node)))
    })
}

// ---------------------------------------------------------------------------
// DomRealm
// ---------------------------------------------------------------------------

/// A realm hosting one document.
#[derive(Debug)]
pub struct DomRealm {
    realm: Realm,
    dom: SharedDom,
}

impl DomRealm {
    /// A legacy realm with an empty document bound into it.
    pub fn new() -> Result<Self, ObjectError> {
        Self::with_realm(Realm::legacy())
    }

    /// Bind a fresh document into `realm`.
    pub fn with_realm(mut realm: Realm) -> Result<Self, ObjectError> {
        let object_prototype = realm.intrinsics().object_prototype;
        let heap = realm.heap_mut();
        let node = heap.alloc(Some(object_prototype));
        let prototypes = DomPrototypes {
            node,
            element: heap.alloc(Some(node)),
            character_data: heap.alloc(Some(node)),
            document_type: heap.alloc(Some(node)),
            document: heap.alloc(Some(node)),
            document_fragment: heap.alloc(Some(node)),
            node_list: heap.alloc(Some(object_prototype)),
        };
        let dom = Rc::new(RefCell::new(DomState {
            tree: DomTree::new(),
            wrappers: BTreeMap::new(),
            prototypes,
        }));

        install_node(&mut realm, &dom, prototypes.node)?;
        install_element(&mut realm, &dom, prototypes.element)?;
        install_document(&mut realm, &dom, prototypes.document)?;
        install_query(&mut realm, &dom, prototypes.document_fragment)?;
        install_character_data(&mut realm, &dom, prototypes.character_data)?;
        Ok(Self { realm, dom })
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    pub fn prototypes(&self) -> DomPrototypes {
        self.dom.borrow().prototypes
    }

    pub(crate) fn shared(&self) -> SharedDom {
        Rc::clone(&self.dom)
    }

    /// Read access to the tree. Do not hold across realm calls.
    pub fn tree(&self) -> Ref<'_, DomTree> {
        Ref::map(self.dom.borrow(), |s| &s.tree)
    }

    /// Write access to the tree. Do not hold across realm calls.
    pub fn tree_mut(&self) -> RefMut<'_, DomTree> {
        RefMut::map(self.dom.borrow_mut(), |s| &mut s.tree)
    }

    pub fn wrap(&mut self, node: NodeId) -> Result<JsValue, ObjectError> {
        Ok(JsValue::Object(wrap(&mut self.realm, &self.dom, node)?))
    }

    /// The `document` object.
    pub fn document(&mut self) -> Result<JsValue, ObjectError> {
        let document = self.tree().document();
        self.wrap(document)
    }

    pub fn node_of(&self, value: &JsValue) -> Option<NodeId> {
        node_of(&self.realm, &self.dom, value)
    }

    /// `scope.querySelectorAll(selector)` as a `NodeList`.
    pub fn query_selector_all(&mut self, scope: NodeId, selector: &str) -> Result<JsValue, ObjectError> {
        let found = self.tree().query_selector_all(scope, selector)?;
        node_list(&mut self.realm, &self.dom, found)
    }

    /// Method call through the realm, `receiver.name(...args)`.
    pub fn invoke(&mut self, receiver: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, ObjectError> {
        self.realm.invoke(receiver, name, args)
    }

    pub fn get(&mut self, receiver: &JsValue, name: &str) -> Result<JsValue, ObjectError> {
        self.realm.get(receiver, name)
    }
}
