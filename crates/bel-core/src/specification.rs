//! The versioned BEL specification model.
//!
//! A [`SpecificationDocument`] is the raw declarative input. [`Specification::enhance`]
//! turns one into an immutable [`Specification`] with everything the parser,
//! validator and computed-edge engine need precomputed:
//!
//! - name ⇄ abbreviation maps for functions and relations
//! - function categories expanded into canonical function names
//! - signature argument slots classified as required, positional,
//!   optional or repeatable
//! - default-namespace enumerations flattened into literal sets
//! - computed-edge rules with canonical trigger and relation names
//!
//! Enhancement is a pure function of the document, so any number of versions
//! can be loaded side by side and shared across threads.

mod catalog;
mod document;
mod rules;
mod signature;

pub use catalog::SpecificationCatalog;
pub use document::{
    ArgumentDocument, ArgumentType, ComputedEdgeDocument, EnumerationValue, FunctionDocument,
    FunctionKind, RelationDocument, SignatureDocument, SpecificationDocument,
};
pub use rules::{ComputedEdgeRule, NodeKind, ObjectMode};
pub use signature::{ArgSlot, LiteralSet, Signature, SlotClass};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use indexmap::IndexMap;
use log::{debug, info, trace};
use regex::Regex;

use crate::{error::ConfigurationError, version::Version};

/// A function definition with its enhanced signatures.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    name: String,
    abbreviation: String,
    kind: FunctionKind,
    categories: Vec<String>,
    signatures: Vec<Signature>,
}

impl FunctionSpec {
    /// Canonical long name, e.g. `proteinAbundance`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical short name, e.g. `p`.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn is_primary(&self) -> bool {
        self.kind == FunctionKind::Primary
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }
}

#[derive(Debug, Clone)]
pub struct RelationSpec {
    name: String,
    abbreviation: String,
    categories: Vec<String>,
}

impl RelationSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// An enhanced, immutable specification.
#[derive(Debug, Clone)]
pub struct Specification {
    version: Version,
    functions: IndexMap<String, FunctionSpec>,
    /// Long name or abbreviation → long name.
    function_names: HashMap<String, String>,
    relations: IndexMap<String, RelationSpec>,
    relation_names: HashMap<String, String>,
    /// Category → long names of the functions in it.
    categories: BTreeMap<String, BTreeSet<String>>,
    default_namespaces: IndexMap<String, Vec<EnumerationValue>>,
    computed_edges: Vec<ComputedEdgeRule>,
}

impl Specification {
    /// Enhance a raw document into a query-ready specification.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the document is internally
    /// inconsistent: an unparsable version, clashing names, signatures or
    /// rules referring to unknown functions/relations, or invalid patterns.
    pub fn enhance(document: &SpecificationDocument) -> Result<Self, ConfigurationError> {
        let version: Version = document.version.parse()?;
        debug!(version:% = version; "Enhancing specification");

        let function_names = name_map(
            "function",
            document
                .functions
                .iter()
                .map(|(name, f)| (name.as_str(), f.abbreviation.as_str())),
        )?;
        let relation_names = name_map(
            "relation",
            document
                .relations
                .iter()
                .map(|(name, r)| (name.as_str(), r.abbreviation.as_str())),
        )?;

        let mut categories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, function) in &document.functions {
            for category in &function.categories {
                categories
                    .entry(category.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }

        let resolver = SlotBuilder {
            function_names: &function_names,
            categories: &categories,
            default_namespaces: &document.default_namespaces,
        };

        let mut functions = IndexMap::with_capacity(document.functions.len());
        for (name, function) in &document.functions {
            let signatures = function
                .signatures
                .iter()
                .enumerate()
                .map(|(index, signature)| resolver.signature(name, index, signature))
                .collect::<Result<Vec<_>, _>>()?;
            trace!(function = name.as_str(), signatures = signatures.len(); "Enhanced function");

            functions.insert(
                name.clone(),
                FunctionSpec {
                    name: name.clone(),
                    abbreviation: function.abbreviation.clone(),
                    kind: function.kind,
                    categories: function.categories.clone(),
                    signatures,
                },
            );
        }

        let relations = document
            .relations
            .iter()
            .map(|(name, relation)| {
                let spec = RelationSpec {
                    name: name.clone(),
                    abbreviation: relation.abbreviation.clone(),
                    categories: relation.categories.clone(),
                };
                (name.clone(), spec)
            })
            .collect();

        let computed_edges = document
            .computed_edges
            .iter()
            .map(|(name, rule)| {
                computed_edge_rule(name, rule, &function_names, &categories, &relation_names)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            version:% = version,
            functions = document.functions.len(),
            relations = document.relations.len(),
            rules = computed_edges.len();
            "Specification enhanced"
        );

        Ok(Self {
            version,
            functions,
            function_names,
            relations,
            relation_names,
            categories,
            default_namespaces: document.default_namespaces.clone(),
            computed_edges,
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Look up a function by long name or abbreviation.
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.function_names
            .get(name)
            .and_then(|long| self.functions.get(long))
    }

    /// All functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.values()
    }

    /// Look up a relation by long name or abbreviation.
    pub fn relation(&self, name: &str) -> Option<&RelationSpec> {
        self.relation_names
            .get(name)
            .and_then(|long| self.relations.get(long))
    }

    /// All relations in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &RelationSpec> {
        self.relations.values()
    }

    /// Long names of the functions in a category.
    pub fn functions_in_category(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    /// Enumerated values of a default namespace (semantic type).
    pub fn default_namespace(&self, semantic_type: &str) -> Option<&[EnumerationValue]> {
        self.default_namespaces
            .get(semantic_type)
            .map(Vec::as_slice)
    }

    /// Computed-edge rules in declaration order.
    pub fn computed_edge_rules(&self) -> &[ComputedEdgeRule] {
        &self.computed_edges
    }

    pub fn computed_edge_rule(&self, name: &str) -> Option<&ComputedEdgeRule> {
        self.computed_edges.iter().find(|rule| rule.name() == name)
    }
}

/// Build a name-or-abbreviation → long-name map, rejecting collisions.
fn name_map<'a>(
    kind: &'static str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<HashMap<String, String>, ConfigurationError> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (name, abbreviation) in entries {
        for key in [name, abbreviation] {
            match map.get(key) {
                Some(existing) if existing != name => {
                    return Err(ConfigurationError::DuplicateName {
                        kind,
                        name: key.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    map.insert(key.to_string(), name.to_string());
                }
            }
        }
    }
    Ok(map)
}

/// Resolves the raw values of signature arguments against the document.
struct SlotBuilder<'a> {
    function_names: &'a HashMap<String, String>,
    categories: &'a BTreeMap<String, BTreeSet<String>>,
    default_namespaces: &'a IndexMap<String, Vec<EnumerationValue>>,
}

impl SlotBuilder<'_> {
    /// Expand a function name, abbreviation or category to long names.
    fn expand_function(&self, value: &str) -> Option<BTreeSet<String>> {
        if let Some(long) = self.function_names.get(value) {
            return Some(BTreeSet::from([long.clone()]));
        }
        self.categories.get(value).cloned()
    }

    fn signature(
        &self,
        function: &str,
        index: usize,
        document: &SignatureDocument,
    ) -> Result<Signature, ConfigurationError> {
        let unknown = |name: &str| ConfigurationError::UnknownSignatureFunction {
            function: function.to_string(),
            index,
            name: name.to_string(),
        };

        let mut parents = BTreeSet::new();
        for parent in &document.parents {
            parents.extend(self.expand_function(parent).ok_or_else(|| unknown(parent))?);
        }

        let mut required = Vec::new();
        let mut positional = Vec::new();
        let mut optional = Vec::new();
        let mut repeatable = Vec::new();

        for argument in &document.arguments {
            let slot = self.slot(function, index, argument)?;
            let position = argument.position.unwrap_or(u32::MAX);
            if argument.multiple {
                repeatable.push(slot);
            } else if argument.optional && argument.position.is_some() {
                positional.push((position, slot));
            } else if argument.optional {
                optional.push(slot);
            } else {
                required.push((position, slot));
            }
        }

        required.sort_by_key(|(position, _)| *position);
        positional.sort_by_key(|(position, _)| *position);

        Ok(Signature::new(
            parents,
            required.into_iter().map(|(_, slot)| slot).collect(),
            positional.into_iter().map(|(_, slot)| slot).collect(),
            optional,
            repeatable,
        ))
    }

    fn slot(
        &self,
        function: &str,
        index: usize,
        argument: &ArgumentDocument,
    ) -> Result<ArgSlot, ConfigurationError> {
        let has = |ty: ArgumentType| argument.types.contains(&ty);
        let takes_function = has(ArgumentType::Function) || has(ArgumentType::Modifier);
        let takes_ns = has(ArgumentType::NsArg) || has(ArgumentType::StrArgNsArg);
        let takes_str = has(ArgumentType::StrArg) || has(ArgumentType::StrArgNsArg);
        let mixed = takes_ns || takes_str;

        let mut functions = BTreeSet::new();
        let mut rest: Vec<&str> = Vec::new();
        for value in &argument.values {
            match takes_function.then(|| self.expand_function(value)).flatten() {
                Some(names) => functions.extend(names),
                None if takes_function && !mixed => {
                    return Err(ConfigurationError::UnknownSignatureFunction {
                        function: function.to_string(),
                        index,
                        name: value.clone(),
                    });
                }
                None => rest.push(value),
            }
        }

        let entity_types =
            takes_ns.then(|| rest.iter().map(|value| value.to_string()).collect());

        let literals = if takes_str {
            let pattern = argument
                .pattern
                .as_deref()
                .map(Regex::new)
                .transpose()
                .map_err(|source| ConfigurationError::InvalidPattern {
                    function: function.to_string(),
                    index,
                    source,
                })?;
            Some(LiteralSet::new(self.literals(&rest, takes_ns), pattern))
        } else {
            None
        };

        Ok(ArgSlot::new(functions, entity_types, literals))
    }

    /// Flatten default-namespace enumerations into literal → types.
    ///
    /// Values naming no default namespace are literals themselves, unless the
    /// slot also takes NSArgs, in which case they are entity types only.
    fn literals(&self, values: &[&str], shared_with_ns: bool) -> BTreeMap<String, BTreeSet<String>> {
        let mut literals: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for value in values {
            match self.default_namespaces.get(*value) {
                Some(enumeration) => {
                    for entry in enumeration {
                        let names = std::iter::once(&entry.name).chain(entry.abbreviation.as_ref());
                        for name in names {
                            literals
                                .entry(name.clone())
                                .or_default()
                                .insert(value.to_string());
                        }
                    }
                }
                None if !shared_with_ns => {
                    literals.entry(value.to_string()).or_default();
                }
                None => {}
            }
        }
        literals
    }
}

fn computed_edge_rule(
    name: &str,
    document: &ComputedEdgeDocument,
    function_names: &HashMap<String, String>,
    categories: &BTreeMap<String, BTreeSet<String>>,
    relation_names: &HashMap<String, String>,
) -> Result<ComputedEdgeRule, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidRule {
        rule: name.to_string(),
        reason,
    };

    if document.subject != "trigger_value" {
        return Err(invalid(format!(
            "unsupported subject template `{}`",
            document.subject
        )));
    }

    let object_mode: ObjectMode = document.object.parse().map_err(invalid)?;

    let relation = relation_names
        .get(&document.relation)
        .cloned()
        .ok_or_else(|| invalid(format!("unknown relation `{}`", document.relation)))?;

    let mut trigger_functions = BTreeSet::new();
    for trigger in &document.trigger_function {
        if let Some(long) = function_names.get(trigger) {
            trigger_functions.insert(long.clone());
        } else if let Some(members) = categories.get(trigger) {
            trigger_functions.extend(members.iter().cloned());
        } else {
            return Err(invalid(format!("unknown trigger function `{trigger}`")));
        }
    }

    let trigger_kinds = document
        .trigger_type
        .iter()
        .map(|kind| kind.parse::<NodeKind>())
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(invalid)?;

    Ok(ComputedEdgeRule::new(
        name.to_string(),
        trigger_functions,
        trigger_kinds,
        relation,
        object_mode,
    ))
}
