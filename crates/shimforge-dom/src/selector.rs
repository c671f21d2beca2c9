//! A small CSS selector engine: comma groups of compound steps joined by
//! descendant, `>`, `+` and `~` combinators. Steps support a tag or `*`,
//! `#id`, `.class`, `[attr]` and `[attr=value]`.

use crate::error::DomError;
use crate::tree::{DomTree, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Step {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    step: Step,
    /// Relation to the part on the left.
    combinator: Option<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Vec<Part>>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let groups = split_groups(selector)?
            .iter()
            .map(|g| parse_chain(g))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups })
    }

    /// Does element `node` match any group?
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node).is_some() && self.groups.iter().any(|g| matches_chain(tree, node, g))
    }
}

fn unsupported(selector: &str) -> DomError {
    DomError::UnsupportedSelector(selector.to_string())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split on top-level commas, tracking bracket depth.
fn split_groups(selector: &str) -> Result<Vec<String>, DomError> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in selector.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.checked_sub(1).ok_or_else(|| unsupported(selector))?;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(unsupported(selector));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let trimmed = current.trim();
    if depth != 0 || trimmed.is_empty() {
        return Err(unsupported(selector));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

/// Compound tokens and combinator tokens; whitespace inside brackets is kept.
fn tokenize(selector: &str) -> Result<Vec<String>, DomError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.trim().is_empty() {
            tokens.push(current.trim().to_string());
        }
        current.clear();
    };
    for ch in selector.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.checked_sub(1).ok_or_else(|| unsupported(selector))?;
                current.push(ch);
            }
            '>' | '+' | '~' if depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(ch.to_string());
            }
            c if c.is_ascii_whitespace() && depth == 0 => flush(&mut current, &mut tokens),
            _ => current.push(ch),
        }
    }
    if depth != 0 {
        return Err(unsupported(selector));
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse_chain(selector: &str) -> Result<Vec<Part>, DomError> {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending: Option<Combinator> = None;
    for token in tokenize(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(Combinator::Child),
            "+" => Some(Combinator::AdjacentSibling),
            "~" => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(c) = combinator {
            if pending.is_some() || parts.is_empty() {
                return Err(unsupported(selector));
            }
            pending = Some(c);
            continue;
        }
        let step = parse_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part { step, combinator });
    }
    if parts.is_empty() || pending.is_some() {
        return Err(unsupported(selector));
    }
    Ok(parts)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let len = bytes[start..].iter().take_while(|b| is_ident_char(**b)).count();
    if len == 0 {
        return None;
    }
    Some((src.get(start..start + len)?.to_string(), start + len))
}

fn parse_step(part: &str) -> Result<Step, DomError> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = Step::default();
    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() || i != 0 {
                    return Err(unsupported(part));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(|| unsupported(part))?;
                if step.id.replace(id).is_some() {
                    return Err(unsupported(part));
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_ident(part, i + 1).ok_or_else(|| unsupported(part))?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_attr(part, i)?;
                step.attrs.push(cond);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(unsupported(part));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| unsupported(part))?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }
    Ok(step)
}

/// `[name]` or `[name=value]` with an optionally quoted value.
fn parse_attr(src: &str, open: usize) -> Result<(AttrCondition, usize), DomError> {
    let close = src[open..]
        .find(']')
        .map(|off| open + off)
        .ok_or_else(|| unsupported(src))?;
    let body = src[open + 1..close].trim();
    let next = close + 1;
    let Some((key, value)) = body.split_once('=') else {
        if body.is_empty() || !body.bytes().all(is_ident_char) {
            return Err(unsupported(src));
        }
        return Ok((
            AttrCondition::Exists {
                key: body.to_ascii_lowercase(),
            },
            next,
        ));
    };
    let key = key.trim();
    if key.is_empty() || !key.bytes().all(is_ident_char) {
        return Err(unsupported(src));
    }
    let value = value.trim();
    let value = match value.as_bytes().first() {
        Some(q @ (b'"' | b'\'')) => value
            .strip_prefix(*q as char)
            .and_then(|v| v.strip_suffix(*q as char))
            .ok_or_else(|| unsupported(src))?,
        _ => value,
    };
    Ok((
        AttrCondition::Eq {
            key: key.to_ascii_lowercase(),
            value: value.to_string(),
        },
        next,
    ))
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

fn matches_step(tree: &DomTree, node: NodeId, step: &Step) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    if let Some(tag) = &step.tag
        && element.tag_name != *tag
    {
        return false;
    }
    if let Some(id) = &step.id
        && element.attrs.get("id") != Some(id)
    {
        return false;
    }
    if step.classes.iter().any(|c| !element.has_class(c)) {
        return false;
    }
    step.attrs.iter().all(|cond| match cond {
        AttrCondition::Exists { key } => element.attrs.contains_key(key),
        AttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
    })
}

/// Right-to-left match of one group, anchored at `node`.
fn matches_chain(tree: &DomTree, node: NodeId, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_step(tree, node, &last.step) {
        return false;
    }
    let mut current = node;
    let mut combinator = last.combinator;
    for part in rest.iter().rev() {
        let step = &part.step;
        let found = match combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Child => tree
                .parent(current)
                .filter(|p| matches_step(tree, *p, step)),
            Combinator::Descendant => {
                let mut cursor = tree.parent(current);
                loop {
                    match cursor {
                        Some(p) if matches_step(tree, p, step) => break Some(p),
                        Some(p) => cursor = tree.parent(p),
                        None => break None,
                    }
                }
            }
            Combinator::AdjacentSibling => tree
                .previous_element_sibling(current)
                .filter(|s| matches_step(tree, *s, step)),
            Combinator::GeneralSibling => {
                let mut cursor = tree.previous_element_sibling(current);
                loop {
                    match cursor {
                        Some(s) if matches_step(tree, s, step) => break Some(s),
                        Some(s) => cursor = tree.previous_element_sibling(s),
                        None => break None,
                    }
                }
            }
        };
        let Some(next) = found else {
            return false;
        };
        current = next;
        combinator = part.combinator;
    }
    true
}

impl DomTree {
    /// `Element.matches` against this tree; non-elements never match.
    pub fn matches_selector(&self, node: NodeId, selector: &str) -> Result<bool, DomError> {
        Ok(Selector::parse(selector)?.matches(self, node))
    }

    /// `scope.querySelectorAll`: matching element descendants of `scope` in
    /// document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        self.kind(scope)?;
        Ok(self
            .descendant_elements(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect())
    }
}
