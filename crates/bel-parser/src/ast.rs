//! The typed statement tree.
//!
//! Nodes live in an arena owned by the [`Statement`] and refer to each other
//! by [`NodeId`]. Parent and sibling links are plain indices, so the tree
//! can be walked in any direction and mutated in place by the validator and
//! the namespace resolver without reference cycles.

use std::collections::BTreeSet;

use bel_core::{
    TermId,
    specification::{FunctionKind, NodeKind, SlotClass},
};

use crate::{
    error::{Diagnostic, ErrorLevel},
    span::{Span, Spanned},
};

/// Index of a node in its statement's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct FunctionNode {
    written: Spanned<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    kind: Option<FunctionKind>,
    args: Vec<NodeId>,
    signature: Option<usize>,
}

impl FunctionNode {
    pub(crate) fn new(
        written: Spanned<String>,
        resolved: Option<(String, String, FunctionKind)>,
    ) -> Self {
        let (long_name, short_name, kind) = match resolved {
            Some((long, short, kind)) => (Some(long), Some(short), Some(kind)),
            None => (None, None, None),
        };
        Self {
            written,
            long_name,
            short_name,
            kind,
            args: Vec::new(),
            signature: None,
        }
    }

    /// The name as it appeared in the text.
    pub fn written_name(&self) -> &Spanned<String> {
        &self.written
    }

    /// Canonical long name, or the written name for unknown functions.
    pub fn name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.written)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    /// `None` when the function is not in the specification.
    pub fn kind(&self) -> Option<FunctionKind> {
        self.kind
    }

    pub fn is_known(&self) -> bool {
        self.kind.is_some()
    }

    pub fn is_primary(&self) -> bool {
        self.kind == Some(FunctionKind::Primary)
    }

    pub fn args(&self) -> &[NodeId] {
        &self.args
    }

    /// Index of the signature the arguments matched, once validated.
    pub fn signature(&self) -> Option<usize> {
        self.signature
    }

    pub(crate) fn set_args(&mut self, args: Vec<NodeId>) {
        self.args = args;
    }

    pub(crate) fn set_signature(&mut self, signature: Option<usize>) {
        self.signature = signature;
    }
}

#[derive(Debug, Clone)]
pub struct NsArgNode {
    namespace: String,
    value: String,
    original: TermId,
    entity_types: Option<BTreeSet<String>>,
}

impl NsArgNode {
    pub(crate) fn new(namespace: String, value: String) -> Self {
        let original = TermId::new(namespace.clone(), value.clone());
        Self {
            namespace,
            value,
            original,
            entity_types: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The unquoted value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn term(&self) -> TermId {
        TermId::new(self.namespace.clone(), self.value.clone())
    }

    /// The term as parsed, before any rewrite.
    pub fn original(&self) -> &TermId {
        &self.original
    }

    pub fn is_rewritten(&self) -> bool {
        self.namespace != self.original.namespace() || self.value != self.original.value()
    }

    /// Entity types from the last validation, `None` when unknown.
    pub fn entity_types(&self) -> Option<&BTreeSet<String>> {
        self.entity_types.as_ref()
    }

    /// Rewrite the term in place.
    ///
    /// The entity types described the old term and are cleared.
    pub fn set_term(&mut self, term: &TermId) {
        self.namespace = term.namespace().to_string();
        self.value = term.value().to_string();
        self.entity_types = None;
    }

    pub(crate) fn set_entity_types(&mut self, entity_types: Option<BTreeSet<String>>) {
        self.entity_types = entity_types;
    }
}

#[derive(Debug, Clone)]
pub struct StrArgNode {
    value: String,
    value_types: BTreeSet<String>,
}

impl StrArgNode {
    pub(crate) fn new(value: String) -> Self {
        Self {
            value,
            value_types: BTreeSet::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Semantic types of the literal, e.g. `AminoAcid` for `Ser`.
    pub fn value_types(&self) -> &BTreeSet<String> {
        &self.value_types
    }

    pub(crate) fn set_value_types(&mut self, value_types: BTreeSet<String>) {
        self.value_types = value_types;
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Function(FunctionNode),
    NsArg(NsArgNode),
    StrArg(StrArgNode),
}

#[derive(Debug, Clone)]
pub struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    siblings: Vec<NodeId>,
    span: Span,
    slot: Option<SlotClass>,
}

impl Node {
    pub(crate) fn new(data: NodeData, parent: Option<NodeId>, span: Span) -> Self {
        Self {
            data,
            parent,
            siblings: Vec::new(),
            span,
            slot: None,
        }
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    /// The enclosing function; `None` for subject and object roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// All other arguments of the same parent, in argument order.
    pub fn siblings(&self) -> &[NodeId] {
        &self.siblings
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The slot class this argument matched, once validated.
    pub fn slot(&self) -> Option<SlotClass> {
        self.slot
    }

    /// Whether the argument matched any slot other than a required one.
    pub fn is_optional(&self) -> bool {
        self.slot.is_some_and(|slot| slot.is_optional())
    }

    pub fn as_function(&self) -> Option<&FunctionNode> {
        match &self.data {
            NodeData::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_ns_arg(&self) -> Option<&NsArgNode> {
        match &self.data {
            NodeData::NsArg(ns_arg) => Some(ns_arg),
            _ => None,
        }
    }

    pub fn as_str_arg(&self) -> Option<&StrArgNode> {
        match &self.data {
            NodeData::StrArg(str_arg) => Some(str_arg),
            _ => None,
        }
    }

    /// The category computed-edge rules trigger on. Unknown functions count
    /// as primary.
    pub fn kind(&self) -> NodeKind {
        match &self.data {
            NodeData::Function(function) if function.kind == Some(FunctionKind::Modifier) => {
                NodeKind::Modifier
            }
            NodeData::Function(_) => NodeKind::Function,
            NodeData::NsArg(_) => NodeKind::NsArg,
            NodeData::StrArg(_) => NodeKind::StrArg,
        }
    }

    pub(crate) fn set_siblings(&mut self, siblings: Vec<NodeId>) {
        self.siblings = siblings;
    }

    pub(crate) fn set_slot(&mut self, slot: Option<SlotClass>) {
        self.slot = slot;
    }
}

#[derive(Debug, Clone)]
pub struct Relation {
    written: Spanned<String>,
    long_name: Option<String>,
    short_name: Option<String>,
}

impl Relation {
    pub(crate) fn new(written: Spanned<String>, resolved: Option<(String, String)>) -> Self {
        let (long_name, short_name) = resolved.unzip();
        Self {
            written,
            long_name,
            short_name,
        }
    }

    pub fn written_name(&self) -> &Spanned<String> {
        &self.written
    }

    /// Canonical long name, or the written name for unknown relations.
    pub fn name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.written)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn is_known(&self) -> bool {
        self.long_name.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Function(NodeId),
    /// A parenthesised statement.
    Statement(Box<Triple>),
}

/// `subject relation object`; relation and object are both present or both
/// absent.
#[derive(Debug, Clone)]
pub struct Triple {
    subject: NodeId,
    relation: Option<Relation>,
    object: Option<Object>,
}

impl Triple {
    pub(crate) fn new(subject: NodeId, edge: Option<(Relation, Object)>) -> Self {
        let (relation, object) = edge.unzip();
        Self {
            subject,
            relation,
            object,
        }
    }

    pub fn subject(&self) -> NodeId {
        self.subject
    }

    pub fn relation(&self) -> Option<&Relation> {
        self.relation.as_ref()
    }

    pub fn object(&self) -> Option<&Object> {
        self.object.as_ref()
    }
}

/// A parsed statement: the node arena, the statement shape and every
/// diagnostic attached by later phases.
#[derive(Debug, Clone)]
pub struct Statement {
    source: String,
    nodes: Vec<Node>,
    triple: Triple,
    diagnostics: Vec<Diagnostic>,
}

impl Statement {
    pub(crate) fn new(
        source: String,
        nodes: Vec<Node>,
        triple: Triple,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            source,
            nodes,
            triple,
            diagnostics,
        }
    }

    /// The text the statement was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to another statement and is out of range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    pub fn subject(&self) -> NodeId {
        self.triple.subject
    }

    pub fn relation(&self) -> Option<&Relation> {
        self.triple.relation()
    }

    pub fn object(&self) -> Option<&Object> {
        self.triple.object()
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionNode> {
        self.node(id).as_function()
    }

    pub fn ns_arg(&self, id: NodeId) -> Option<&NsArgNode> {
        self.node(id).as_ns_arg()
    }

    pub fn ns_arg_mut(&mut self, id: NodeId) -> Option<&mut NsArgNode> {
        match self.node_mut(id).data_mut() {
            NodeData::NsArg(ns_arg) => Some(ns_arg),
            _ => None,
        }
    }

    /// Arguments of a function node; empty for other nodes.
    pub fn args(&self, id: NodeId) -> &[NodeId] {
        match self.function(id) {
            Some(function) => function.args(),
            None => &[],
        }
    }

    /// The closest enclosing primary function, excluding `id` itself.
    pub fn closest_primary_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            if self.function(ancestor).is_some_and(FunctionNode::is_primary) {
                return Some(ancestor);
            }
            current = self.node(ancestor).parent;
        }
        None
    }

    /// Every node in pre-order: the subject tree, then the relation's
    /// object tree (recursing into a nested statement).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.walk_triple(&self.triple, &mut order);
        order
    }

    /// Namespace-term nodes in pre-order.
    pub fn ns_args(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.ns_arg(id).is_some())
            .collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics selected by an error level.
    pub fn diagnostics_at(&self, level: ErrorLevel) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diag| level.includes(diag.severity()))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity().is_error())
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Drop everything a previous validation left behind: its diagnostics,
    /// matched signatures, slot classes, entity types and value types.
    pub(crate) fn reset_validation(&mut self) {
        self.diagnostics
            .retain(|diag| !diag.code().is_some_and(|code| code.is_validation()));
        for node in &mut self.nodes {
            node.slot = None;
            match &mut node.data {
                NodeData::Function(function) => function.signature = None,
                NodeData::NsArg(ns_arg) => ns_arg.entity_types = None,
                NodeData::StrArg(str_arg) => str_arg.value_types.clear(),
            }
        }
    }

    /// Compare two trees by canonical names, argument kinds and values,
    /// relation and object shape. Spans, annotations and diagnostics are
    /// ignored.
    pub fn same_structure(&self, other: &Statement) -> bool {
        self.same_triple(&self.triple, other, &other.triple)
    }

    fn walk_triple(&self, triple: &Triple, order: &mut Vec<NodeId>) {
        self.walk_node(triple.subject, order);
        match &triple.object {
            Some(Object::Function(id)) => self.walk_node(*id, order),
            Some(Object::Statement(nested)) => self.walk_triple(nested, order),
            None => {}
        }
    }

    fn walk_node(&self, id: NodeId, order: &mut Vec<NodeId>) {
        order.push(id);
        for &arg in self.args(id) {
            self.walk_node(arg, order);
        }
    }

    fn same_triple(&self, triple: &Triple, other: &Statement, other_triple: &Triple) -> bool {
        if !self.same_node(triple.subject, other, other_triple.subject) {
            return false;
        }
        let same_relation = match (&triple.relation, &other_triple.relation) {
            (Some(a), Some(b)) => a.name() == b.name(),
            (None, None) => true,
            _ => false,
        };
        same_relation
            && match (&triple.object, &other_triple.object) {
                (Some(Object::Function(a)), Some(Object::Function(b))) => {
                    self.same_node(*a, other, *b)
                }
                (Some(Object::Statement(a)), Some(Object::Statement(b))) => {
                    self.same_triple(a, other, b)
                }
                (None, None) => true,
                _ => false,
            }
    }

    fn same_node(&self, id: NodeId, other: &Statement, other_id: NodeId) -> bool {
        match (&self.node(id).data, &other.node(other_id).data) {
            (NodeData::Function(a), NodeData::Function(b)) => {
                a.name() == b.name()
                    && a.args.len() == b.args.len()
                    && a
                        .args
                        .iter()
                        .zip(&b.args)
                        .all(|(&x, &y)| self.same_node(x, other, y))
            }
            (NodeData::NsArg(a), NodeData::NsArg(b)) => {
                a.namespace == b.namespace && a.value == b.value
            }
            (NodeData::StrArg(a), NodeData::StrArg(b)) => a.value == b.value,
            _ => false,
        }
    }
}
