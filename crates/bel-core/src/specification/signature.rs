//! Enhanced function signatures.
//!
//! A [`Signature`] groups its argument slots by how the validator is allowed
//! to fill them. Each [`ArgSlot`] lists what it accepts per argument kind.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

/// How an argument slot participates in signature matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotClass {
    /// Must be present, at a fixed position.
    Required,
    /// May be present; positional slots fill in declaration order.
    Positional,
    /// May be present at most once, anywhere after the positional slots.
    Optional,
    /// May absorb any number of arguments.
    Repeatable,
}

impl SlotClass {
    /// Returns `true` for every class except [`SlotClass::Required`].
    pub fn is_optional(&self) -> bool {
        !matches!(self, SlotClass::Required)
    }
}

/// Literal values a StrArg slot accepts.
#[derive(Debug, Clone, Default)]
pub struct LiteralSet {
    /// Literal → semantic types it belongs to.
    values: BTreeMap<String, BTreeSet<String>>,
    pattern: Option<Regex>,
}

impl LiteralSet {
    pub(crate) fn new(values: BTreeMap<String, BTreeSet<String>>, pattern: Option<Regex>) -> Self {
        Self { values, pattern }
    }

    /// A set with neither listed values nor a pattern accepts every literal.
    pub fn accepts_any(&self) -> bool {
        self.values.is_empty() && self.pattern.is_none()
    }

    /// Match a literal, returning the semantic types it resolved to.
    ///
    /// Returns `None` when the literal is rejected. Literals accepted through
    /// the pattern, or by an unconstrained set, resolve to no types.
    pub fn match_literal(&self, literal: &str) -> Option<BTreeSet<String>> {
        if let Some(types) = self.values.get(literal) {
            return Some(types.clone());
        }
        if self.accepts_any() {
            return Some(BTreeSet::new());
        }
        match &self.pattern {
            Some(pattern) if pattern.is_match(literal) => Some(BTreeSet::new()),
            _ => None,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}

/// A single argument slot of a signature.
#[derive(Debug, Clone, Default)]
pub struct ArgSlot {
    /// Canonical long names of functions accepted here.
    functions: BTreeSet<String>,
    /// Entity types accepted for an NSArg; `None` rejects NSArgs and an
    /// empty set accepts any entity type.
    entity_types: Option<BTreeSet<String>>,
    /// Literals accepted for a StrArg; `None` rejects StrArgs.
    literals: Option<LiteralSet>,
}

impl ArgSlot {
    pub(crate) fn new(
        functions: BTreeSet<String>,
        entity_types: Option<BTreeSet<String>>,
        literals: Option<LiteralSet>,
    ) -> Self {
        Self {
            functions,
            entity_types,
            literals,
        }
    }

    pub fn accepts_function(&self, long_name: &str) -> bool {
        self.functions.contains(long_name)
    }

    pub fn functions(&self) -> &BTreeSet<String> {
        &self.functions
    }

    pub fn entity_types(&self) -> Option<&BTreeSet<String>> {
        self.entity_types.as_ref()
    }

    pub fn literals(&self) -> Option<&LiteralSet> {
        self.literals.as_ref()
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.functions.is_empty() {
            let names: Vec<&str> = self.functions.iter().map(String::as_str).collect();
            parts.push(format!("function ({})", names.join("|")));
        }
        match &self.entity_types {
            Some(types) if types.is_empty() => parts.push("namespace term".to_string()),
            Some(types) => {
                let names: Vec<&str> = types.iter().map(String::as_str).collect();
                parts.push(format!("namespace term ({})", names.join("|")));
            }
            None => {}
        }
        if self.literals.is_some() {
            parts.push("string".to_string());
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(" or ")
        }
    }
}

/// One alternative argument layout for a function.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    /// Long names of primary functions this signature is restricted to.
    parents: BTreeSet<String>,
    required: Vec<ArgSlot>,
    positional: Vec<ArgSlot>,
    optional: Vec<ArgSlot>,
    repeatable: Vec<ArgSlot>,
}

impl Signature {
    pub(crate) fn new(
        parents: BTreeSet<String>,
        required: Vec<ArgSlot>,
        positional: Vec<ArgSlot>,
        optional: Vec<ArgSlot>,
        repeatable: Vec<ArgSlot>,
    ) -> Self {
        Self {
            parents,
            required,
            positional,
            optional,
            repeatable,
        }
    }

    /// Whether this signature applies under the given closest primary
    /// ancestor (its canonical long name).
    pub fn applies_to(&self, primary_ancestor: Option<&str>) -> bool {
        if self.parents.is_empty() {
            return true;
        }
        primary_ancestor.is_some_and(|name| self.parents.contains(name))
    }

    pub fn parents(&self) -> &BTreeSet<String> {
        &self.parents
    }

    pub fn required(&self) -> &[ArgSlot] {
        &self.required
    }

    pub fn positional(&self) -> &[ArgSlot] {
        &self.positional
    }

    pub fn optional(&self) -> &[ArgSlot] {
        &self.optional
    }

    pub fn repeatable(&self) -> &[ArgSlot] {
        &self.repeatable
    }
}
