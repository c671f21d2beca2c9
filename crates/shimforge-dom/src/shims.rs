//! DOM capability shims, installed through the engine's installer.
//!
//! The members compose the baseline interface methods (`appendChild`,
//! `insertBefore`, `removeChild`, `querySelectorAll`) and each other
//! (`closest` calls the receiver's `matches`, `replaceWith` calls `before`
//! then `remove`), always through realm property lookup so a host's own
//! implementation is honored.

use std::collections::BTreeSet;

use shimforge_engine::intrinsics::truthy;
use shimforge_engine::realm::arg;
use shimforge_engine::{
    CapabilitySet, InstallReport, JsValue, ObjectError, ObjectHandle, Realm, ShimSuiteConfig,
    install_on, install_on_each,
};

use crate::bindings::{DomRealm, SharedDom, expect_node, node_of, wrap, wrap_optional};
use crate::tree::NodeId;

/// Vendor-prefixed `matches` implementations, in preference order.
pub const MATCHES_ALIASES: [&str; 5] = [
    "matchesSelector",
    "msMatchesSelector",
    "webkitMatchesSelector",
    "mozMatchesSelector",
    "oMatchesSelector",
];

// ---------------------------------------------------------------------------
// Argument conversion
// ---------------------------------------------------------------------------

/// Gather `args` into a new fragment: nodes move in as-is, anything else
/// becomes a text node of its string conversion.
fn fragment_of(realm: &mut Realm, dom: &SharedDom, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let fragment = dom.borrow_mut().tree.create_fragment();
    for value in args {
        let node = match node_of(realm, dom, value) {
            Some(node) => node,
            None => {
                let text = realm.to_js_string(value)?;
                dom.borrow_mut().tree.create_text(text)
            }
        };
        dom.borrow_mut().tree.append_child(fragment, node)?;
    }
    Ok(JsValue::Object(wrap(realm, dom, fragment)?))
}

fn nodes_among(realm: &Realm, dom: &SharedDom, args: &[JsValue]) -> BTreeSet<NodeId> {
    args.iter().filter_map(|a| node_of(realm, dom, a)).collect()
}

fn method(
    realm: &mut Realm,
    dom: &SharedDom,
    name: &str,
    length: u32,
    body: fn(&mut Realm, &SharedDom, &JsValue, &[JsValue]) -> Result<JsValue, ObjectError>,
) -> (String, JsValue) {
    let dom = SharedDom::clone(dom);
    let f = realm.create_function(name, length, move |realm, this, args| {
        body(realm, &dom, this, args)
    });
    (name.to_string(), JsValue::Object(f))
}

// ---------------------------------------------------------------------------
// NodeList.prototype.forEach
// ---------------------------------------------------------------------------

fn node_list_for_each(realm: &mut Realm, _dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let array_prototype = JsValue::Object(realm.intrinsics().array_prototype);
    let for_each = realm.get(&array_prototype, "forEach")?;
    realm.call(&for_each, this, args)?;
    Ok(JsValue::Undefined)
}

// ---------------------------------------------------------------------------
// Element.prototype.matches / closest
// ---------------------------------------------------------------------------

/// Membership of `this` in its owner document's `querySelectorAll`.
fn matches_by_query(realm: &mut Realm, _dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let mut document = realm.get(this, "document")?;
    if !truthy(&document) {
        document = realm.get(this, "ownerDocument")?;
    }
    let found = realm.invoke(&document, "querySelectorAll", &[arg(args, 0)])?;
    let found = realm.array_like_to_vec(&found)?;
    Ok(JsValue::Bool(found.iter().any(|e| e.strict_equals(this))))
}

/// The first truthy vendor alias on `element_prototype`, else the
/// query-based fallback. An alias whose getter throws counts as absent.
fn matches_capability(realm: &mut Realm, dom: &SharedDom, element_prototype: ObjectHandle) -> JsValue {
    let proto = JsValue::Object(element_prototype);
    for alias in MATCHES_ALIASES {
        if let Ok(candidate) = realm.get(&proto, alias)
            && truthy(&candidate)
        {
            return candidate;
        }
    }
    method(realm, dom, "matches", 1, matches_by_query).1
}

/// Walks self then element ancestors; `null` for nodes outside the
/// document element.
fn closest(realm: &mut Realm, dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let node = expect_node(realm, dom, this, "closest")?;
    let connected = {
        let state = dom.borrow();
        state
            .tree
            .document_element()
            .is_some_and(|root| state.tree.contains(root, node))
    };
    if !connected {
        return Ok(JsValue::Null);
    }
    let selector = arg(args, 0);
    let mut element = this.clone();
    while !element.is_nullish() {
        let hit = realm.invoke(&element, "matches", std::slice::from_ref(&selector))?;
        if truthy(&hit) {
            return Ok(element);
        }
        element = realm.get(&element, "parentElement")?;
    }
    Ok(JsValue::Null)
}

// ---------------------------------------------------------------------------
// ParentNode.append / prepend
// ---------------------------------------------------------------------------

fn append(realm: &mut Realm, dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let fragment = fragment_of(realm, dom, args)?;
    realm.invoke(this, "appendChild", &[fragment])?;
    Ok(JsValue::Undefined)
}

fn prepend(realm: &mut Realm, dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let fragment = fragment_of(realm, dom, args)?;
    let first = realm.get(this, "firstChild")?;
    realm.invoke(this, "insertBefore", &[fragment, first])?;
    Ok(JsValue::Undefined)
}

// ---------------------------------------------------------------------------
// ChildNode.before / after / remove / replaceWith
// ---------------------------------------------------------------------------

/// Nearest sibling (following when `forward`) that is not one of the nodes
/// being inserted.
fn viable_sibling(
    dom: &SharedDom,
    node: NodeId,
    excluded: &BTreeSet<NodeId>,
    forward: bool,
) -> Option<NodeId> {
    let state = dom.borrow();
    let step = |n| {
        if forward {
            state.tree.next_sibling(n)
        } else {
            state.tree.previous_sibling(n)
        }
    };
    let mut cursor = step(node);
    while let Some(sibling) = cursor {
        if !excluded.contains(&sibling) {
            return Some(sibling);
        }
        cursor = step(sibling);
    }
    None
}

fn before(realm: &mut Realm, dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let node = expect_node(realm, dom, this, "before")?;
    let parent = realm.get(this, "parentNode")?;
    if parent.is_nullish() {
        return Ok(JsValue::Undefined);
    }
    let previous = viable_sibling(dom, node, &nodes_among(realm, dom, args), false);
    let fragment = fragment_of(realm, dom, args)?;
    let reference = {
        let state = dom.borrow();
        match previous {
            Some(p) => state.tree.next_sibling(p),
            None => expect_node(realm, dom, &parent, "before")
                .ok()
                .and_then(|p| state.tree.first_child(p)),
        }
    };
    let reference = wrap_optional(realm, dom, reference)?;
    realm.invoke(&parent, "insertBefore", &[fragment, reference])?;
    Ok(JsValue::Undefined)
}

fn after(realm: &mut Realm, dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let node = expect_node(realm, dom, this, "after")?;
    let parent = realm.get(this, "parentNode")?;
    if parent.is_nullish() {
        return Ok(JsValue::Undefined);
    }
    let next = viable_sibling(dom, node, &nodes_among(realm, dom, args), true);
    let fragment = fragment_of(realm, dom, args)?;
    let reference = wrap_optional(realm, dom, next)?;
    realm.invoke(&parent, "insertBefore", &[fragment, reference])?;
    Ok(JsValue::Undefined)
}

fn remove(realm: &mut Realm, _dom: &SharedDom, this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ObjectError> {
    let parent = realm.get(this, "parentNode")?;
    if !parent.is_nullish() {
        realm.invoke(&parent, "removeChild", std::slice::from_ref(this))?;
    }
    Ok(JsValue::Undefined)
}

fn replace_with(realm: &mut Realm, _dom: &SharedDom, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ObjectError> {
    realm.invoke(this, "before", args)?;
    realm.invoke(this, "remove", &[])?;
    Ok(JsValue::Undefined)
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Install every enabled DOM group onto the interface prototypes.
pub fn install_dom_shims(dom_realm: &mut DomRealm, config: &ShimSuiteConfig) -> InstallReport {
    let dom = dom_realm.shared();
    let protos = dom_realm.prototypes();
    let realm = dom_realm.realm_mut();
    let options = config.install_options();
    let mut report = InstallReport::default();

    if config.node_list_for_each {
        let caps = CapabilitySet::mapping([method(realm, &dom, "forEach", 1, node_list_for_each)]);
        report.absorb(install_on(realm, protos.node_list, &caps, &options));
    }

    if config.matches {
        let value = matches_capability(realm, &dom, protos.element);
        let caps = CapabilitySet::single("matches", value);
        report.absorb(install_on(realm, protos.element, &caps, &options));
    }

    if config.parent_node_insertion {
        let caps = CapabilitySet::mapping([
            method(realm, &dom, "append", 0, append),
            method(realm, &dom, "prepend", 0, prepend),
        ]);
        report.absorb(install_on_each(
            realm,
            &[protos.element, protos.document, protos.document_fragment],
            &caps,
            &options,
        ));
    }

    if config.closest {
        let caps = CapabilitySet::mapping([method(realm, &dom, "closest", 1, closest)]);
        report.absorb(install_on(realm, protos.element, &caps, &options));
    }

    if config.child_node_mutation {
        let caps = CapabilitySet::mapping([
            method(realm, &dom, "before", 0, before),
            method(realm, &dom, "after", 0, after),
            method(realm, &dom, "remove", 0, remove),
            method(realm, &dom, "replaceWith", 0, replace_with),
        ]);
        report.absorb(install_on_each(
            realm,
            &[protos.element, protos.character_data, protos.document_type],
            &caps,
            &options,
        ));
    }

    report
}
