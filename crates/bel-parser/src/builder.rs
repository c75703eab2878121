//! Statement building: token tree to typed arena tree.
//!
//! Function and relation names are resolved against the specification.
//! Unknown names do not stop the build; the node keeps the name as written
//! and an error is attached to the statement.

use log::{debug, trace};

use bel_core::Specification;

use crate::{
    ast::{
        FunctionNode, Node, NodeData, NodeId, NsArgNode, Object, Relation, Statement, StrArgNode,
        Triple,
    },
    error::{Diagnostic, ErrorCode, ParseError},
    span::Spanned,
    tokens::{ArgToken, FunctionToken, ObjectToken, StatementToken},
};

pub(crate) struct Builder<'a> {
    spec: &'a Specification,
    nodes: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Builder<'a> {
    pub fn new(spec: &'a Specification) -> Self {
        Self {
            spec,
            nodes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    /// Build a statement from a token tree without structural errors.
    pub fn build(
        mut self,
        source: &str,
        token: StatementToken,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<Statement, ParseError> {
        debug!(source; "Building statement");
        let triple = self.triple(token).map_err(|diag| {
            diagnostics.push(diag);
            ParseError::new(std::mem::take(&mut diagnostics))
        })?;

        diagnostics.append(&mut self.diagnostics);
        trace!(nodes = self.nodes.len(), diagnostics = diagnostics.len(); "Statement built");
        Ok(Statement::new(
            source.to_string(),
            self.nodes,
            triple,
            diagnostics,
        ))
    }

    // ============================================================================
    // Statement Shape
    // ============================================================================

    fn triple(&mut self, token: StatementToken) -> Result<Triple, Diagnostic> {
        let subject = token.subject.ok_or_else(|| {
            Diagnostic::error("statement must start with a function").with_code(ErrorCode::E102)
        })?;
        let subject = self.function(subject, None);

        let edge = match (token.relation, token.object) {
            (Some(relation), Some(object)) => {
                let relation = self.relation(relation);
                let object = match object {
                    ObjectToken::Function(function) => Object::Function(self.function(function, None)),
                    ObjectToken::Statement(nested, span) => {
                        let nested = self.triple(*nested).map_err(|diag| {
                            diag.with_label(span, "in this nested statement")
                        })?;
                        if nested.relation().is_none() {
                            return Err(Diagnostic::error(
                                "nested statement needs a relation and an object",
                            )
                            .with_code(ErrorCode::E101)
                            .with_label(span, "incomplete nested statement"));
                        }
                        Object::Statement(Box::new(nested))
                    }
                };
                Some((relation, object))
            }
            (None, None) => None,
            (Some(relation), None) => {
                return Err(Diagnostic::error(format!(
                    "missing object after relation `{}`",
                    relation
                ))
                .with_code(ErrorCode::E101)
                .with_label(relation.span(), "relation without an object"));
            }
            (None, Some(_)) => {
                return Err(
                    Diagnostic::error("missing relation before the object").with_code(ErrorCode::E101)
                );
            }
        };

        Ok(Triple::new(subject, edge))
    }

    fn relation(&mut self, written: Spanned<String>) -> Relation {
        let resolved = self
            .spec
            .relation(written.inner())
            .map(|relation| (relation.name().to_string(), relation.abbreviation().to_string()));
        if resolved.is_none() {
            self.diagnostics.push(
                Diagnostic::error(format!("unknown BEL relation `{}`", written))
                    .with_code(ErrorCode::E201)
                    .with_label(written.span(), "not in the specification"),
            );
        }
        Relation::new(written, resolved)
    }

    // ============================================================================
    // Nodes
    // ============================================================================

    fn function(&mut self, token: FunctionToken, parent: Option<NodeId>) -> NodeId {
        let resolved = self.spec.function(token.name.inner()).map(|function| {
            (
                function.name().to_string(),
                function.abbreviation().to_string(),
                function.kind(),
            )
        });
        if resolved.is_none() {
            self.diagnostics.push(
                Diagnostic::error(format!("unknown BEL function `{}`", token.name))
                    .with_code(ErrorCode::E200)
                    .with_label(token.name.span(), "not in the specification"),
            );
        }

        let id = self.push(Node::new(
            NodeData::Function(FunctionNode::new(token.name, resolved)),
            parent,
            token.span,
        ));

        let args: Vec<NodeId> = token
            .args
            .into_iter()
            .map(|arg| self.argument(arg, id))
            .collect();

        for &arg in &args {
            let siblings = args.iter().copied().filter(|&other| other != arg).collect();
            self.nodes[arg.index()].set_siblings(siblings);
        }
        if let NodeData::Function(function) = self.nodes[id.index()].data_mut() {
            function.set_args(args);
        }

        id
    }

    fn argument(&mut self, token: ArgToken, parent: NodeId) -> NodeId {
        match token {
            ArgToken::Function(function) => self.function(function, Some(parent)),
            ArgToken::NsArg(ns_arg) => self.push(Node::new(
                NodeData::NsArg(NsArgNode::new(
                    ns_arg.namespace.into_inner(),
                    ns_arg.value.into_inner(),
                )),
                Some(parent),
                ns_arg.span,
            )),
            ArgToken::StrArg(str_arg) => self.push(Node::new(
                NodeData::StrArg(StrArgNode::new(str_arg.value)),
                Some(parent),
                str_arg.span,
            )),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId::new(self.nodes.len() - 1)
    }
}
