//! Conditional capability installer.
//!
//! Binds named capabilities onto targets only when the target's current
//! member is missing or has a different `typeof` than the replacement (or
//! when forced). Every binding goes through the host's define-with-attributes
//! primitive; plain assignment is never used.
//!
//! Each (target, name) pair is isolated: a host that refuses one definition
//! does not stop the remaining pairs. Outcomes are reported per pair together
//! with a structured event stream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute_policy::{AttributeOverrides, AttributeSet, DEFAULT_POLICY, LOCKED_POLICY};
use crate::object_model::JsType;

/// Component name stamped on every installer event.
pub const INSTALLER_COMPONENT: &str = "capability_installer";
/// Host refused the definition (e.g. existing non-configurable member).
pub const ERROR_CODE_DEFINE_REJECTED: &str = "FE-SHIM-0001";
/// Host failed while reading or defining the member.
pub const ERROR_CODE_HOST_FAILURE: &str = "FE-SHIM-0002";

// ---------------------------------------------------------------------------
// CapabilityHost: the minimal surface the installer needs
// ---------------------------------------------------------------------------

/// Host environment a capability can be installed into.
pub trait CapabilityHost {
    type Target: Copy + fmt::Debug;
    type Value: Clone;
    type Error: fmt::Display;

    /// `typeof target[name]`, following inheritance.
    fn member_type(&mut self, target: Self::Target, name: &str) -> Result<JsType, Self::Error>;

    /// `typeof value`.
    fn value_type(&self, value: &Self::Value) -> JsType;

    /// Define `name` on `target` with exactly `attributes`. `Ok(false)` means
    /// the target refused the definition.
    fn define_member(
        &mut self,
        target: Self::Target,
        name: &str,
        value: Self::Value,
        attributes: AttributeSet,
    ) -> Result<bool, Self::Error>;

    /// Label used in reports.
    fn describe_target(&self, target: Self::Target) -> String {
        format!("{target:?}")
    }
}

// ---------------------------------------------------------------------------
// CapabilitySet: single name or ordered mapping
// ---------------------------------------------------------------------------

/// What to install: one named capability or several, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilitySet<V> {
    Single { name: String, value: V },
    Mapping { entries: Vec<(String, V)> },
}

impl<V> CapabilitySet<V> {
    pub fn single(name: impl Into<String>, value: V) -> Self {
        Self::Single {
            name: name.into(),
            value,
        }
    }

    pub fn mapping<N: Into<String>>(entries: impl IntoIterator<Item = (N, V)>) -> Self {
        Self::Mapping {
            entries: entries.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    /// Entries in processing order.
    pub fn entries(&self) -> Vec<(&str, &V)> {
        match self {
            Self::Single { name, value } => vec![(name.as_str(), value)],
            Self::Mapping { entries } => entries.iter().map(|(n, v)| (n.as_str(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Mapping { entries } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// InstallOptions
// ---------------------------------------------------------------------------

/// Per-call attribute overrides and force flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    #[serde(default)]
    pub overrides: AttributeOverrides,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub trace_id: String,
}

impl InstallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only installation ([`LOCKED_POLICY`]).
    pub fn locked() -> Self {
        Self::new().with_overrides(LOCKED_POLICY)
    }

    pub fn with_overrides(mut self, overrides: AttributeOverrides) -> Self {
        self.overrides = self.overrides.then(&overrides);
        self
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Attributes every binding of this call receives.
    pub fn attributes(&self) -> AttributeSet {
        DEFAULT_POLICY.merge(&self.overrides)
    }
}

/// Install unless a member of the same `typeof` is already present.
pub fn installation_required(force: bool, existing: JsType, replacement: JsType) -> bool {
    force || existing != replacement
}

// ---------------------------------------------------------------------------
// Reports and events
// ---------------------------------------------------------------------------

/// What happened to one (target, name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairOutcome {
    Installed,
    /// A conforming member was already present.
    Skipped { existing: JsType },
    /// The host refused or failed; other pairs were still attempted.
    Rejected { reason: String },
}

impl PairOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Skipped { .. } => "skipped",
            Self::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub target: String,
    pub capability: String,
    pub outcome: PairOutcome,
}

/// Structured event emitted once per processed pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallEvent {
    pub trace_id: String,
    pub component: String,
    pub event: String,
    pub target: String,
    pub capability: String,
    pub outcome: String,
    pub error_code: Option<String>,
}

/// Result of one or more installer calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub pairs: Vec<PairReport>,
    pub events: Vec<InstallEvent>,
}

impl InstallReport {
    fn record(
        &mut self,
        trace_id: &str,
        target: String,
        capability: &str,
        outcome: PairOutcome,
        error_code: Option<&str>,
    ) {
        self.events.push(InstallEvent {
            trace_id: trace_id.to_string(),
            component: INSTALLER_COMPONENT.to_string(),
            event: "install_pair".to_string(),
            target: target.clone(),
            capability: capability.to_string(),
            outcome: outcome.label().to_string(),
            error_code: error_code.map(str::to_string),
        });
        self.pairs.push(PairReport {
            target,
            capability: capability.to_string(),
            outcome,
        });
    }

    /// Append another report's pairs and events.
    pub fn absorb(&mut self, other: InstallReport) {
        self.pairs.extend(other.pairs);
        self.events.extend(other.events);
    }

    pub fn installed_count(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Installed))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Skipped { .. }))
    }

    pub fn rejected(&self) -> Vec<&PairReport> {
        self.pairs
            .iter()
            .filter(|p| matches!(p.outcome, PairOutcome::Rejected { .. }))
            .collect()
    }

    /// Outcome recorded for `capability`, first match.
    pub fn outcome_of(&self, capability: &str) -> Option<&PairOutcome> {
        self.pairs
            .iter()
            .find(|p| p.capability == capability)
            .map(|p| &p.outcome)
    }

    fn count(&self, pred: impl Fn(&PairOutcome) -> bool) -> usize {
        self.pairs.iter().filter(|p| pred(&p.outcome)).count()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Install `capabilities` onto a single target.
pub fn install_on<H: CapabilityHost>(
    host: &mut H,
    target: H::Target,
    capabilities: &CapabilitySet<H::Value>,
    options: &InstallOptions,
) -> InstallReport {
    install_on_each(host, &[target], capabilities, options)
}

/// Install `capabilities` onto every target, in order. Targets are processed
/// as given; no target is ever reinterpreted as a list of targets.
pub fn install_on_each<H: CapabilityHost>(
    host: &mut H,
    targets: &[H::Target],
    capabilities: &CapabilitySet<H::Value>,
    options: &InstallOptions,
) -> InstallReport {
    let attributes = options.attributes();
    let mut report = InstallReport::default();
    for &target in targets {
        let label = host.describe_target(target);
        for (name, value) in capabilities.entries() {
            let (outcome, code) = install_pair(host, target, name, value, attributes, options.force);
            report.record(&options.trace_id, label.clone(), name, outcome, code);
        }
    }
    report
}

fn install_pair<H: CapabilityHost>(
    host: &mut H,
    target: H::Target,
    name: &str,
    value: &H::Value,
    attributes: AttributeSet,
    force: bool,
) -> (PairOutcome, Option<&'static str>) {
    let existing = match host.member_type(target, name) {
        Ok(t) => t,
        Err(e) => {
            return (
                PairOutcome::Rejected {
                    reason: e.to_string(),
                },
                Some(ERROR_CODE_HOST_FAILURE),
            );
        }
    };
    if !installation_required(force, existing, host.value_type(value)) {
        return (PairOutcome::Skipped { existing }, None);
    }
    match host.define_member(target, name, value.clone(), attributes) {
        Ok(true) => (PairOutcome::Installed, None),
        Ok(false) => (
            PairOutcome::Rejected {
                reason: format!("target refused to redefine '{name}'"),
            },
            Some(ERROR_CODE_DEFINE_REJECTED),
        ),
        Err(e) => (
            PairOutcome::Rejected {
                reason: e.to_string(),
            },
            Some(ERROR_CODE_HOST_FAILURE),
        ),
    }
}
