//! Raw specification documents.
//!
//! These types mirror the declarative specification exactly as a collaborator
//! hands it over (usually decoded from JSON). They carry no derived data; see
//! [`Specification::enhance`](super::Specification::enhance) for the step that
//! turns them into lookup structures.

use indexmap::IndexMap;
use serde::Deserialize;

/// A complete, versioned specification document.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecificationDocument {
    /// Version string, `major.minor.patch`.
    pub version: String,

    /// Functions keyed by long name.
    #[serde(default)]
    pub functions: IndexMap<String, FunctionDocument>,

    /// Relations keyed by long name.
    #[serde(default)]
    pub relations: IndexMap<String, RelationDocument>,

    /// Literal enumerations keyed by semantic type (e.g. `AminoAcid`).
    #[serde(default)]
    pub default_namespaces: IndexMap<String, Vec<EnumerationValue>>,

    /// Computed-edge rules keyed by rule name, in application order.
    #[serde(default)]
    pub computed_edges: IndexMap<String, ComputedEdgeDocument>,
}

/// Whether a function denotes an entity/process or modifies its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Primary,
    Modifier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDocument {
    pub abbreviation: String,
    pub kind: FunctionKind,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub signatures: Vec<SignatureDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureDocument {
    /// Function names or categories the closest primary ancestor must belong
    /// to for this signature to apply. Empty means unrestricted.
    #[serde(default)]
    pub parents: Vec<String>,

    #[serde(default)]
    pub arguments: Vec<ArgumentDocument>,
}

/// Argument type tags as written in specification documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ArgumentType {
    Function,
    Modifier,
    #[serde(rename = "NSArg")]
    NsArg,
    StrArg,
    /// Either an NSArg or a StrArg.
    #[serde(rename = "StrArgNSArg")]
    StrArgNsArg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentDocument {
    #[serde(rename = "type")]
    pub types: Vec<ArgumentType>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub multiple: bool,
    /// Regex a StrArg may satisfy instead of matching a listed literal.
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationDocument {
    pub abbreviation: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumerationValue {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComputedEdgeDocument {
    #[serde(default)]
    pub trigger_function: Vec<String>,
    #[serde(default)]
    pub trigger_type: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    pub relation: String,
    pub object: String,
}

fn default_subject() -> String {
    "trigger_value".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_document() {
        let json = r#"{
            "version": "2.0.0",
            "functions": {
                "proteinAbundance": {
                    "abbreviation": "p",
                    "kind": "primary",
                    "categories": ["abundance"],
                    "signatures": [
                        {"arguments": [{"type": ["NSArg"], "values": ["Protein"]}]}
                    ]
                }
            },
            "relations": {"increases": {"abbreviation": "->"}}
        }"#;

        let doc: SpecificationDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.version, "2.0.0");
        let function = &doc.functions["proteinAbundance"];
        assert_eq!(function.kind, FunctionKind::Primary);
        assert_eq!(function.signatures[0].arguments[0].types, vec![ArgumentType::NsArg]);
        assert!(!function.signatures[0].arguments[0].optional);
        assert!(doc.default_namespaces.is_empty());
    }

    #[test]
    fn test_decode_computed_edge_default_subject() {
        let json = r#"{"trigger_function": ["complex"], "relation": "hasComponent", "object": "args"}"#;

        let rule: ComputedEdgeDocument = serde_json::from_str(json).unwrap();

        assert_eq!(rule.subject, "trigger_value");
        assert!(rule.trigger_type.is_empty());
    }

    #[test]
    fn test_decode_mixed_argument_type() {
        let json = r#"{"type": ["StrArgNSArg"], "values": ["ProteinModification"], "position": 1}"#;

        let arg: ArgumentDocument = serde_json::from_str(json).unwrap();

        assert_eq!(arg.types, vec![ArgumentType::StrArgNsArg]);
        assert_eq!(arg.position, Some(1));
    }
}
