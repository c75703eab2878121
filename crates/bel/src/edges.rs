//! Computed edges.
//!
//! Rules from the specification are applied over the statement tree in
//! pre-order. At each node every selected rule whose trigger matches emits
//! edges with the node as subject: one per argument for `args` rules, one
//! to the enclosing function for `parent` rules. Output order is pre-order,
//! then rule declaration order, then argument order.

use std::fmt;

use log::{debug, warn};

use bel_core::{
    Specification,
    specification::{ComputedEdgeRule, ObjectMode},
};
use bel_parser::{Format, NodeId, Statement};

/// An edge implied by a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedEdge {
    rule: String,
    subject_node: NodeId,
    object_node: NodeId,
    subject: String,
    relation: String,
    object: String,
}

impl ComputedEdge {
    /// Name of the rule that produced the edge.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn subject_node(&self) -> NodeId {
        self.subject_node
    }

    pub fn object_node(&self) -> NodeId {
        self.object_node
    }

    /// The rendered subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// The rendered object.
    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for ComputedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.relation, self.object)
    }
}

/// Apply computed-edge rules to a statement.
///
/// `rules` restricts evaluation to the named rules, kept in declaration
/// order; unknown names are ignored with a warning.
pub fn compute_edges(
    statement: &Statement,
    spec: &Specification,
    rules: Option<&[String]>,
    format: Format,
) -> Vec<ComputedEdge> {
    let selected = select_rules(spec, rules);

    let mut edges = Vec::new();
    for id in statement.preorder() {
        let node = statement.node(id);
        let function = statement.function(id).map(|function| function.name());
        for rule in &selected {
            if !rule.triggers(function, node.kind()) {
                continue;
            }
            let relation = relation_label(spec, rule.relation(), format);
            match rule.object_mode() {
                ObjectMode::Args => {
                    for &arg in statement.args(id) {
                        edges.push(edge(statement, rule, id, &relation, arg, format));
                    }
                }
                ObjectMode::Parent => {
                    if let Some(parent) = node.parent() {
                        edges.push(edge(statement, rule, id, &relation, parent, format));
                    }
                }
            }
        }
    }

    debug!(rules = selected.len(), edges = edges.len(); "Computed edges");
    edges
}

fn select_rules<'a>(spec: &'a Specification, names: Option<&[String]>) -> Vec<&'a ComputedEdgeRule> {
    let Some(names) = names else {
        return spec.computed_edge_rules().iter().collect();
    };
    for name in names {
        if spec.computed_edge_rule(name).is_none() {
            warn!(rule = name.as_str(); "Unknown computed-edge rule, ignoring");
        }
    }
    spec.computed_edge_rules()
        .iter()
        .filter(|rule| names.iter().any(|name| name == rule.name()))
        .collect()
}

/// Relation name in the requested format; names missing from the
/// specification are used as given.
fn relation_label(spec: &Specification, name: &str, format: Format) -> String {
    match (spec.relation(name), format) {
        (Some(relation), Format::Short) => relation.abbreviation().to_string(),
        (Some(relation), Format::Medium | Format::Long) => relation.name().to_string(),
        (None, _) => name.to_string(),
    }
}

fn edge(
    statement: &Statement,
    rule: &ComputedEdgeRule,
    subject: NodeId,
    relation: &str,
    object: NodeId,
    format: Format,
) -> ComputedEdge {
    ComputedEdge {
        rule: rule.name().to_string(),
        subject_node: subject,
        object_node: object,
        subject: statement.render_node(subject, format),
        relation: relation.to_string(),
        object: statement.render_node(object, format),
    }
}

#[cfg(test)]
mod tests {
    use bel_parser::parse;

    use super::*;
    use crate::test_utils::fixture;

    fn rendered(text: &str, rules: Option<&[String]>, format: Format) -> Vec<String> {
        let spec = fixture();
        let statement = parse(text, &spec).unwrap();
        compute_edges(&statement, &spec, rules, format)
            .iter()
            .map(ComputedEdge::to_string)
            .collect()
    }

    #[test]
    fn test_args_rule_in_argument_order() {
        let edges = rendered("complex(p(HGNC:A), p(HGNC:B))", None, Format::Medium);

        assert_eq!(
            edges,
            [
                "complex(p(HGNC:A), p(HGNC:B)) hasComponent p(HGNC:A)",
                "complex(p(HGNC:A), p(HGNC:B)) hasComponent p(HGNC:B)",
            ]
        );
    }

    #[test]
    fn test_parent_rule() {
        let edges = rendered("p(HGNC:AKT1, pmod(Ph))", None, Format::Short);

        assert_eq!(edges, ["pmod(Ph) modifies p(HGNC:AKT1,pmod(Ph))"]);
    }

    #[test]
    fn test_preorder_across_subject_and_object() {
        let spec = fixture();
        let statement = parse(
            "complex(p(HGNC:A, pmod(Ph)), p(HGNC:B)) increases complex(p(HGNC:C))",
            &spec,
        )
        .unwrap();

        let edges = compute_edges(&statement, &spec, None, Format::Short);
        let rules: Vec<&str> = edges.iter().map(ComputedEdge::rule).collect();
        assert_eq!(
            rules,
            ["hasComponent", "hasComponent", "modifies", "hasComponent"]
        );
        assert_eq!(edges[3].object(), "p(HGNC:C)");
        assert_eq!(edges[2].object_node(), statement.args(statement.subject())[0]);
    }

    #[test]
    fn test_rule_filter() {
        let only = ["modifies".to_string(), "noSuchRule".to_string()];
        let edges = rendered("complex(p(HGNC:A, pmod(Ph)))", Some(&only[..]), Format::Short);

        assert_eq!(edges, ["pmod(Ph) modifies p(HGNC:A,pmod(Ph))"]);
    }

    #[test]
    fn test_no_rules_selected() {
        let edges = rendered("complex(p(HGNC:A))", Some(Vec::new().as_slice()), Format::Short);

        assert!(edges.is_empty());
    }

    #[test]
    fn test_top_level_modifier_has_no_parent_edge() {
        let edges = rendered("pmod(Ph)", None, Format::Short);

        assert!(edges.is_empty());
    }
}
