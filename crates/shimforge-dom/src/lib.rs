#![forbid(unsafe_code)]

//! DOM capability shims for shimforge realms.
//!
//! [`DomTree`] is a plain node arena with a small selector engine;
//! [`DomRealm`] exposes it to a realm through one wrapper object per node;
//! [`install_dom_shims`] adds the `ParentNode` / `ChildNode` / `matches` /
//! `closest` / `NodeList.forEach` members through the engine's installer.

pub mod bindings;
pub mod error;
pub mod selector;
pub mod shims;
pub mod tree;

pub use bindings::{DomPrototypes, DomRealm};
pub use error::DomError;
pub use selector::Selector;
pub use shims::{MATCHES_ALIASES, install_dom_shims};
pub use tree::{DomTree, ElementData, NodeId, NodeKind};
