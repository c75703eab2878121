//! Computed-edge rules.

use std::{collections::BTreeSet, fmt, str::FromStr};

/// Node categories a computed-edge rule can trigger on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A primary function.
    Function,
    /// A modifier function.
    Modifier,
    NsArg,
    StrArg,
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Function" | "Primary" => Ok(NodeKind::Function),
            "Modifier" => Ok(NodeKind::Modifier),
            "NSArg" => Ok(NodeKind::NsArg),
            "StrArg" => Ok(NodeKind::StrArg),
            other => Err(format!("unknown node kind `{other}`")),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Function => "Function",
            NodeKind::Modifier => "Modifier",
            NodeKind::NsArg => "NSArg",
            NodeKind::StrArg => "StrArg",
        };
        write!(f, "{name}")
    }
}

/// Where a rule takes the object of each emitted edge from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectMode {
    /// One edge per argument of the triggering node.
    Args,
    /// One edge to the triggering node's parent function.
    Parent,
}

impl FromStr for ObjectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "args" => Ok(ObjectMode::Args),
            "parent_function" | "parent" => Ok(ObjectMode::Parent),
            other => Err(format!("unsupported object template `{other}`")),
        }
    }
}

/// A declarative rule deriving edges from a statement tree.
///
/// The subject of every emitted edge is the triggering node itself.
#[derive(Debug, Clone)]
pub struct ComputedEdgeRule {
    name: String,
    trigger_functions: BTreeSet<String>,
    trigger_kinds: BTreeSet<NodeKind>,
    relation: String,
    object_mode: ObjectMode,
}

impl ComputedEdgeRule {
    pub(crate) fn new(
        name: String,
        trigger_functions: BTreeSet<String>,
        trigger_kinds: BTreeSet<NodeKind>,
        relation: String,
        object_mode: ObjectMode,
    ) -> Self {
        Self {
            name,
            trigger_functions,
            trigger_kinds,
            relation,
            object_mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical long name of the emitted relation.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn object_mode(&self) -> ObjectMode {
        self.object_mode
    }

    pub fn trigger_functions(&self) -> &BTreeSet<String> {
        &self.trigger_functions
    }

    pub fn trigger_kinds(&self) -> &BTreeSet<NodeKind> {
        &self.trigger_kinds
    }

    /// Whether a node with the given canonical function name (if it is a
    /// function) and kind fires this rule.
    pub fn triggers(&self, function: Option<&str>, kind: NodeKind) -> bool {
        function.is_some_and(|name| self.trigger_functions.contains(name))
            || self.trigger_kinds.contains(&kind)
    }
}
