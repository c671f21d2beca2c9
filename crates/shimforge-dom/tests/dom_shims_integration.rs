//! Integration tests for the DOM shim bundle on a small document:
//! `ParentNode` insertion, `ChildNode` mutation, `closest`, `matches` and
//! `NodeList.prototype.forEach`.

#![forbid(unsafe_code)]

use shimforge_dom::{DomRealm, NodeId, NodeKind, install_dom_shims};
use shimforge_engine::realm::arg;
use shimforge_engine::{JsValue, PairOutcome, ShimSuiteConfig};

/// `<html><body><div id="a" class="item"><span></span></div><p></p><em></em></body></html>`
struct Page {
    dom: DomRealm,
    body: NodeId,
    div: NodeId,
    span: NodeId,
    p: NodeId,
    em: NodeId,
}

impl Page {
    fn new() -> Self {
        let mut dom = DomRealm::new().unwrap();
        let (body, div, span, p, em) = {
            let mut tree = dom.tree_mut();
            let doc = tree.document();
            let html = tree.create_element("html");
            let body = tree.create_element("body");
            let div = tree.create_element("div");
            let span = tree.create_element("span");
            let p = tree.create_element("p");
            let em = tree.create_element("em");
            tree.append_child(doc, html).unwrap();
            tree.append_child(html, body).unwrap();
            for child in [div, p, em] {
                tree.append_child(body, child).unwrap();
            }
            tree.append_child(div, span).unwrap();
            tree.set_attribute(div, "id", "a").unwrap();
            tree.set_attribute(div, "class", "item").unwrap();
            (body, div, span, p, em)
        };
        install_dom_shims(&mut dom, &ShimSuiteConfig::default());
        Self {
            dom,
            body,
            div,
            span,
            p,
            em,
        }
    }

    fn js(&mut self, node: NodeId) -> JsValue {
        self.dom.wrap(node).unwrap()
    }

    fn call(&mut self, node: NodeId, name: &str, args: &[JsValue]) -> JsValue {
        let receiver = self.js(node);
        self.dom.invoke(&receiver, name, args).unwrap()
    }

    /// Child labels: tag names for elements, `"text"` data for text nodes.
    fn children(&self, node: NodeId) -> Vec<String> {
        let tree = self.dom.tree();
        tree.children(node)
            .iter()
            .map(|c| match tree.kind(*c).unwrap() {
                NodeKind::Element(e) => e.tag_name.clone(),
                NodeKind::Text(t) => format!("\"{t}\""),
                other => other.node_name(),
            })
            .collect()
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// ParentNode.append / prepend
// ---------------------------------------------------------------------------

#[test]
fn append_mixes_nodes_and_text() {
    let mut page = Page::new();
    let p = page.js(page.p);
    page.call(page.body, "append", &[JsValue::from("tail"), p, JsValue::Number(1.0)]);
    assert_eq!(page.children(page.body), labels(&["div", "em", "\"tail\"", "p", "\"1\""]));
}

#[test]
fn prepend_inserts_before_first_child() {
    let mut page = Page::new();
    let em = page.js(page.em);
    page.call(page.body, "prepend", &[em, JsValue::from("head")]);
    assert_eq!(page.children(page.body), labels(&["em", "\"head\"", "div", "p"]));
}

#[test]
fn prepend_into_empty_element() {
    let mut page = Page::new();
    page.call(page.p, "prepend", &[JsValue::from("only")]);
    let p = page.js(page.p);
    assert_eq!(page.dom.get(&p, "textContent").unwrap(), JsValue::from("only"));
}

#[test]
fn append_without_arguments_changes_nothing() {
    let mut page = Page::new();
    page.call(page.body, "append", &[]);
    assert_eq!(page.children(page.body), labels(&["div", "p", "em"]));
}

#[test]
fn fragment_append_then_insert() {
    let mut page = Page::new();
    let doc = page.dom.document().unwrap();
    let fragment = page.dom.invoke(&doc, "createDocumentFragment", &[]).unwrap();
    page.dom
        .invoke(&fragment, "append", &[JsValue::from("x"), JsValue::from("y")])
        .unwrap();
    let em = page.js(page.em);
    page.dom.invoke(&em, "append", &[fragment.clone()]).unwrap();
    assert_eq!(page.children(page.em), labels(&["\"x\"", "\"y\""]));
    // The fragment is emptied by the move.
    let fragment_node = page.dom.node_of(&fragment).unwrap();
    assert!(page.children(fragment_node).is_empty());
}

#[test]
fn append_ancestor_is_hierarchy_error() {
    let mut page = Page::new();
    let span = page.js(page.span);
    let body = page.js(page.body);
    let err = page.dom.invoke(&span, "append", &[body]).unwrap_err();
    assert!(err.to_string().contains("HierarchyRequestError"));
    assert_eq!(page.children(page.body), labels(&["div", "p", "em"]));
}

// ---------------------------------------------------------------------------
// ChildNode.before / after / remove / replaceWith
// ---------------------------------------------------------------------------

#[test]
fn before_and_after_place_around_receiver() {
    let mut page = Page::new();
    page.call(page.p, "before", &[JsValue::from("b")]);
    page.call(page.p, "after", &[JsValue::from("a")]);
    assert_eq!(page.children(page.body), labels(&["div", "\"b\"", "p", "\"a\"", "em"]));
}

#[test]
fn after_with_next_sibling_as_argument() {
    let mut page = Page::new();
    let p = page.js(page.p);
    page.call(page.div, "after", &[p, JsValue::from("t")]);
    assert_eq!(page.children(page.body), labels(&["div", "p", "\"t\"", "em"]));
}

#[test]
fn before_with_previous_sibling_as_argument() {
    let mut page = Page::new();
    let div = page.js(page.div);
    page.call(page.em, "before", &[div]);
    assert_eq!(page.children(page.body), labels(&["p", "div", "em"]));
}

#[test]
fn before_when_every_previous_sibling_moves() {
    let mut page = Page::new();
    let div = page.js(page.div);
    let p = page.js(page.p);
    page.call(page.em, "before", &[p, div]);
    assert_eq!(page.children(page.body), labels(&["p", "div", "em"]));
}

#[test]
fn remove_detaches_receiver() {
    let mut page = Page::new();
    page.call(page.p, "remove", &[]);
    assert_eq!(page.children(page.body), labels(&["div", "em"]));
    let p = page.js(page.p);
    assert_eq!(page.dom.get(&p, "parentNode").unwrap(), JsValue::Null);
    // A second remove is a no-op.
    page.call(page.p, "remove", &[]);
}

#[test]
fn replace_with_text_and_node() {
    let mut page = Page::new();
    let em = page.js(page.em);
    page.call(page.p, "replaceWith", &[JsValue::from("x"), em]);
    assert_eq!(page.children(page.body), labels(&["div", "\"x\"", "em"]));
    assert!(page.dom.tree().parent(page.p).is_none());
}

#[test]
fn replace_with_nothing_removes() {
    let mut page = Page::new();
    page.call(page.div, "replaceWith", &[]);
    assert_eq!(page.children(page.body), labels(&["p", "em"]));
}

#[test]
fn text_nodes_have_child_node_members() {
    let mut page = Page::new();
    let text = page.dom.tree_mut().create_text("mid");
    page.dom.tree_mut().insert_before(page.body, text, Some(page.p)).unwrap();
    page.call(text, "after", &[JsValue::from("!")]);
    assert_eq!(page.children(page.body), labels(&["div", "\"mid\"", "\"!\"", "p", "em"]));
    page.call(text, "remove", &[]);
    assert_eq!(page.children(page.body), labels(&["div", "\"!\"", "p", "em"]));
}

#[test]
fn doctype_has_child_node_members() {
    let mut page = Page::new();
    let doctype = {
        let mut tree = page.dom.tree_mut();
        let doctype = tree.create_doctype("html");
        let doc = tree.document();
        let html = tree.document_element().unwrap();
        tree.insert_before(doc, doctype, Some(html)).unwrap();
        doctype
    };
    page.call(doctype, "remove", &[]);
    let doc = page.dom.tree().document();
    assert_eq!(page.children(doc), labels(&["html"]));
}

// ---------------------------------------------------------------------------
// closest / matches
// ---------------------------------------------------------------------------

#[test]
fn closest_walks_inclusive_ancestors() {
    let mut page = Page::new();
    let div = page.js(page.div);
    let body = page.js(page.body);
    let span = page.js(page.span);
    assert_eq!(page.call(page.span, "closest", &[".item".into()]), div);
    assert_eq!(page.call(page.span, "closest", &["body > div".into()]), div);
    assert_eq!(page.call(page.span, "closest", &["body".into()]), body);
    assert_eq!(page.call(page.span, "closest", &["span".into()]), span);
    assert_eq!(page.call(page.span, "closest", &["section".into()]), JsValue::Null);
}

#[test]
fn closest_on_detached_element_is_null() {
    let mut page = Page::new();
    let doc = page.dom.document().unwrap();
    let orphan = page.dom.invoke(&doc, "createElement", &["section".into()]).unwrap();
    assert_eq!(
        page.dom.invoke(&orphan, "closest", &["section".into()]).unwrap(),
        JsValue::Null
    );
}

#[test]
fn fallback_matches_attribute_and_id() {
    let mut page = Page::new();
    assert_eq!(page.call(page.div, "matches", &["#a".into()]), JsValue::Bool(true));
    assert_eq!(page.call(page.div, "matches", &["[class=item]".into()]), JsValue::Bool(true));
    assert_eq!(page.call(page.div, "matches", &["div p".into()]), JsValue::Bool(false));
    assert_eq!(page.call(page.p, "matches", &["div + p".into()]), JsValue::Bool(true));
}

#[test]
fn malformed_selector_is_an_error() {
    let mut page = Page::new();
    let div = page.js(page.div);
    assert!(page.dom.invoke(&div, "matches", &["div[".into()]).is_err());
}

// ---------------------------------------------------------------------------
// NodeList.prototype.forEach
// ---------------------------------------------------------------------------

#[test]
fn node_list_for_each_visits_in_document_order() {
    let mut page = Page::new();
    let list = page.dom.query_selector_all(page.body, "*").unwrap();
    let seen = page.dom.realm_mut().create_array(vec![]).unwrap();
    let record = page.dom.realm_mut().create_function("record", 3, move |realm, _, args| {
        let n = realm.length_of_array_like(&JsValue::Object(seen))?;
        let name = realm.get(&arg(args, 0), "tagName")?;
        realm.set(seen, n as usize, name)?;
        Ok(JsValue::Undefined)
    });
    let result = page.dom.invoke(&list, "forEach", &[JsValue::Object(record)]).unwrap();
    assert_eq!(result, JsValue::Undefined);
    let seen = page.dom.realm_mut().array_like_to_vec(&JsValue::Object(seen)).unwrap();
    let names: Vec<JsValue> = ["DIV", "SPAN", "P", "EM"].into_iter().map(JsValue::from).collect();
    assert_eq!(seen, names);
}

#[test]
fn child_nodes_list_has_for_each() {
    let mut page = Page::new();
    let body = page.js(page.body);
    let list = page.dom.get(&body, "childNodes").unwrap();
    let for_each = page.dom.get(&list, "forEach").unwrap();
    assert!(page.dom.realm().is_callable(&for_each));
    let not_callable = page.dom.invoke(&list, "forEach", &[JsValue::Null]);
    assert!(not_callable.is_err());
}

// ---------------------------------------------------------------------------
// Installation
// ---------------------------------------------------------------------------

#[test]
fn second_install_skips_everything() {
    let mut page = Page::new();
    let report = install_dom_shims(&mut page.dom, &ShimSuiteConfig::default());
    assert_eq!(report.installed_count(), 0);
    assert!(
        report
            .pairs
            .iter()
            .all(|p| matches!(p.outcome, PairOutcome::Skipped { .. }))
    );
}

#[test]
fn disabled_groups_are_absent() {
    let mut dom = DomRealm::new().unwrap();
    let config = ShimSuiteConfig {
        closest: false,
        child_node_mutation: false,
        ..ShimSuiteConfig::default()
    };
    let report = install_dom_shims(&mut dom, &config);
    assert!(report.outcome_of("closest").is_none());
    assert!(report.outcome_of("replaceWith").is_none());
    let element = JsValue::Object(dom.prototypes().element);
    assert_eq!(dom.get(&element, "before").unwrap(), JsValue::Undefined);
    let append = dom.get(&element, "append").unwrap();
    assert!(dom.realm().is_callable(&append));
}

#[test]
fn forced_install_replaces_host_append() {
    let mut dom = DomRealm::new().unwrap();
    let element = dom.prototypes().element;
    let host = dom
        .realm_mut()
        .create_function("append", 0, |_, _, _| Ok(JsValue::from("host")));
    dom.realm_mut()
        .define_builtin(element, "append", JsValue::Object(host))
        .unwrap();
    let config = ShimSuiteConfig {
        force: true,
        parent_node_insertion: true,
        ..ShimSuiteConfig::none()
    };
    let report = install_dom_shims(&mut dom, &config);
    assert_eq!(report.installed_count(), 6);
    let proto = JsValue::Object(element);
    assert_ne!(dom.get(&proto, "append").unwrap(), JsValue::Object(host));
}

#[test]
fn report_events_serialize() {
    let mut dom = DomRealm::new().unwrap();
    let config = ShimSuiteConfig {
        closest: true,
        trace_id: "dom-boot".to_string(),
        ..ShimSuiteConfig::none()
    };
    let report = install_dom_shims(&mut dom, &config);
    let json = serde_json::to_value(&report.events).unwrap();
    assert_eq!(json[0]["trace_id"], "dom-boot");
    assert_eq!(json[0]["capability"], "closest");
    assert_eq!(json[0]["outcome"], "installed");
    assert_eq!(json[0]["component"], "capability_installer");
}
