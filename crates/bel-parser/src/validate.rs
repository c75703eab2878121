//! Semantic validation against the specification's signatures.
//!
//! Validation runs in two phases. First the entity types of every namespace
//! term are looked up in one batch. Then each known function is matched
//! against its candidate signatures:
//!
//! 1. required slots, positionally
//! 2. positional-optional slots, in order, until an argument does not fit
//! 3. arguments fitting a repeatable slot are absorbed by it
//! 4. the rest are assigned to distinct optional slots by maximum bipartite
//!    matching
//!
//! The first signature that places every argument and fills every required
//! slot wins. Otherwise the failure that got furthest through the argument
//! list is reported. Nothing here fails on bad statements: findings are
//! attached to the statement as diagnostics.

use std::{
    collections::BTreeSet,
    sync::Arc,
};

use indexmap::IndexMap;
use log::{debug, trace};

use bel_core::{
    LookupError, Specification, TermId,
    specification::{ArgSlot, Signature, SlotClass},
    terms::{EntityTypeLookup, LookupOptions, lookup_all},
};

use crate::{
    ast::{NodeData, NodeId, Statement},
    error::{Diagnostic, ErrorCode},
};

/// Options for [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    lookup: LookupOptions,
    strict_entity_types: bool,
}

impl ValidationOptions {
    pub fn new(lookup: LookupOptions, strict_entity_types: bool) -> Self {
        Self {
            lookup,
            strict_entity_types,
        }
    }

    pub fn lookup(&self) -> &LookupOptions {
        &self.lookup
    }

    /// Whether terms with unknown entity types are rejected by every
    /// namespace slot instead of accepted.
    pub fn strict_entity_types(&self) -> bool {
        self.strict_entity_types
    }
}

/// Validate a statement in place.
///
/// Annotates namespace terms with their entity types, string arguments with
/// their value types, every argument with the slot class it matched and
/// every function with the index of its matching signature. Problems are
/// appended to the statement's diagnostics.
///
/// # Errors
///
/// Only collaborator failures outside the miss/timeout contract are
/// returned.
pub fn validate(
    statement: &mut Statement,
    spec: &Specification,
    entity_types: &Arc<dyn EntityTypeLookup>,
    options: &ValidationOptions,
) -> Result<(), LookupError> {
    statement.reset_validation();
    resolve_entity_types(statement, entity_types, options.lookup())?;

    let functions: Vec<NodeId> = statement
        .preorder()
        .into_iter()
        .filter(|&id| statement.function(id).is_some_and(|f| f.is_known()))
        .collect();

    let outcomes: Vec<(NodeId, Outcome)> = {
        let matcher = Matcher {
            statement: &*statement,
            spec,
            strict: options.strict_entity_types(),
        };
        functions
            .into_iter()
            .map(|id| (id, matcher.function(id)))
            .collect()
    };

    for (id, outcome) in outcomes {
        match outcome {
            Outcome::Unconstrained => {}
            Outcome::Matched {
                signature,
                assignments,
            } => {
                if let NodeData::Function(function) = statement.node_mut(id).data_mut() {
                    function.set_signature(Some(signature));
                }
                for assignment in assignments {
                    let node = statement.node_mut(assignment.arg);
                    node.set_slot(Some(assignment.class));
                    if let NodeData::StrArg(str_arg) = node.data_mut() {
                        str_arg.set_value_types(assignment.value_types);
                    }
                }
            }
            Outcome::Failed(diagnostic) => {
                if let NodeData::Function(function) = statement.node_mut(id).data_mut() {
                    function.set_signature(None);
                }
                statement.push_diagnostic(diagnostic);
            }
        }
    }

    Ok(())
}

/// Look up entity types for every distinct term, once.
fn resolve_entity_types(
    statement: &mut Statement,
    lookup: &Arc<dyn EntityTypeLookup>,
    options: &LookupOptions,
) -> Result<(), LookupError> {
    let mut terms: IndexMap<TermId, Vec<NodeId>> = IndexMap::new();
    for id in statement.ns_args() {
        if let Some(ns_arg) = statement.ns_arg(id) {
            terms.entry(ns_arg.term()).or_default().push(id);
        }
    }
    if terms.is_empty() {
        return Ok(());
    }

    let keys: Vec<TermId> = terms.keys().cloned().collect();
    let collaborator = Arc::clone(lookup);
    let results = lookup_all(&keys, options, move |term| {
        collaborator.lookup_entity_types(term)
    })?;
    debug!(terms = keys.len(); "Resolved entity types");

    for ((term, ids), result) in terms.into_iter().zip(results) {
        let types = result.filter(|types| !types.is_empty());
        for id in ids {
            if types.is_none() {
                let span = statement.node(id).span();
                statement.push_diagnostic(
                    Diagnostic::warning(format!("unable to resolve entity types for `{term}`"))
                        .with_code(ErrorCode::W402)
                        .with_label(span, "unknown term"),
                );
            }
            if let Some(ns_arg) = statement.ns_arg_mut(id) {
                ns_arg.set_entity_types(types.clone());
            }
        }
    }
    Ok(())
}

enum Outcome {
    /// The function declares no signatures.
    Unconstrained,
    Matched {
        signature: usize,
        assignments: Vec<Assignment>,
    },
    Failed(Diagnostic),
}

struct Assignment {
    arg: NodeId,
    class: SlotClass,
    value_types: BTreeSet<String>,
}

struct Failure {
    /// How far through the argument list matching got.
    progress: usize,
    diagnostic: Diagnostic,
}

struct Matcher<'a> {
    statement: &'a Statement,
    spec: &'a Specification,
    strict: bool,
}

impl Matcher<'_> {
    // ============================================================================
    // Signature Selection
    // ============================================================================

    fn function(&self, id: NodeId) -> Outcome {
        let Some(function) = self.statement.function(id) else {
            return Outcome::Unconstrained;
        };
        let Some(spec_function) = self.spec.function(function.name()) else {
            return Outcome::Unconstrained;
        };
        if spec_function.signatures().is_empty() {
            trace!(function = function.name(); "No signatures declared");
            return Outcome::Unconstrained;
        }

        let ancestor = self
            .statement
            .closest_primary_ancestor(id)
            .and_then(|ancestor| self.statement.function(ancestor))
            .map(|ancestor| ancestor.name());

        debug!(function = function.name(), ancestor:? = ancestor; "Matching signatures");

        let mut best: Option<Failure> = None;
        for (index, signature) in spec_function.signatures().iter().enumerate() {
            if !signature.applies_to(ancestor) {
                continue;
            }
            match self.match_signature(id, signature) {
                Ok(assignments) => {
                    trace!(function = function.name(), signature = index; "Signature matched");
                    return Outcome::Matched {
                        signature: index,
                        assignments,
                    };
                }
                Err(failure) => {
                    trace!(
                        function = function.name(),
                        signature = index,
                        progress = failure.progress;
                        "Signature rejected"
                    );
                    if best.as_ref().is_none_or(|b| failure.progress > b.progress) {
                        best = Some(failure);
                    }
                }
            }
        }

        match best {
            Some(failure) => Outcome::Failed(failure.diagnostic),
            None => {
                let place = match ancestor {
                    Some(name) => format!("inside `{name}`"),
                    None => "outside a primary function".to_string(),
                };
                Outcome::Failed(
                    Diagnostic::error(format!("`{}` is not allowed {place}", function.name()))
                        .with_code(ErrorCode::E306)
                        .with_label(self.statement.node(id).span(), "not allowed here"),
                )
            }
        }
    }

    fn match_signature(&self, id: NodeId, signature: &Signature) -> Result<Vec<Assignment>, Failure> {
        let args = self.statement.args(id);
        let mut assignments = Vec::with_capacity(args.len());

        for (i, slot) in signature.required().iter().enumerate() {
            let Some(&arg) = args.get(i) else {
                return Err(Failure {
                    progress: args.len(),
                    diagnostic: self.missing_required(id, slot),
                });
            };
            match self.fits(slot, arg) {
                Some(value_types) => assignments.push(Assignment {
                    arg,
                    class: SlotClass::Required,
                    value_types,
                }),
                None => {
                    return Err(Failure {
                        progress: i,
                        diagnostic: self.mismatch(id, arg, slot),
                    });
                }
            }
        }

        let mut next = signature.required().len();
        for slot in signature.positional() {
            let Some(&arg) = args.get(next) else {
                break;
            };
            let Some(value_types) = self.fits(slot, arg) else {
                break;
            };
            assignments.push(Assignment {
                arg,
                class: SlotClass::Positional,
                value_types,
            });
            next += 1;
        }

        let mut leftovers: Vec<(usize, NodeId)> = Vec::new();
        for (index, &arg) in args.iter().enumerate().skip(next) {
            let absorbed = signature
                .repeatable()
                .iter()
                .find_map(|slot| self.fits(slot, arg));
            match absorbed {
                Some(value_types) => assignments.push(Assignment {
                    arg,
                    class: SlotClass::Repeatable,
                    value_types,
                }),
                None => leftovers.push((index, arg)),
            }
        }

        let compatible: Vec<Vec<(usize, BTreeSet<String>)>> = leftovers
            .iter()
            .map(|&(_, arg)| {
                signature
                    .optional()
                    .iter()
                    .enumerate()
                    .filter_map(|(slot_index, slot)| {
                        self.fits(slot, arg).map(|types| (slot_index, types))
                    })
                    .collect()
            })
            .collect();
        let edges: Vec<Vec<usize>> = compatible
            .iter()
            .map(|slots| slots.iter().map(|(slot, _)| *slot).collect())
            .collect();
        let matching = max_matching(&edges, signature.optional().len());

        for ((&(index, arg), slot), mut options) in leftovers.iter().zip(matching).zip(compatible) {
            let Some(slot) = slot else {
                return Err(Failure {
                    progress: index,
                    diagnostic: self.extra(id, arg, signature),
                });
            };
            let position = options.iter().position(|(s, _)| *s == slot);
            let value_types = position
                .map(|p| options.swap_remove(p).1)
                .unwrap_or_default();
            assignments.push(Assignment {
                arg,
                class: SlotClass::Optional,
                value_types,
            });
        }

        Ok(assignments)
    }

    // ============================================================================
    // Argument Fitting
    // ============================================================================

    /// Whether `arg` fits `slot`, with the value types a string argument
    /// resolves to.
    fn fits(&self, slot: &ArgSlot, arg: NodeId) -> Option<BTreeSet<String>> {
        match self.statement.node(arg).data() {
            NodeData::Function(function) => {
                let accepted = !slot.functions().is_empty()
                    && (!function.is_known() || slot.accepts_function(function.name()));
                accepted.then(BTreeSet::new)
            }
            NodeData::NsArg(ns_arg) => {
                let accepted = slot.entity_types()?;
                match ns_arg.entity_types() {
                    None if self.strict => None,
                    None => Some(BTreeSet::new()),
                    Some(_) if accepted.is_empty() => Some(BTreeSet::new()),
                    Some(types) => (!types.is_disjoint(accepted)).then(BTreeSet::new),
                }
            }
            NodeData::StrArg(str_arg) => slot.literals()?.match_literal(str_arg.value()),
        }
    }

    /// Whether a slot takes arguments of the same kind as `arg` at all.
    fn same_kind(&self, slot: &ArgSlot, arg: NodeId) -> bool {
        match self.statement.node(arg).data() {
            NodeData::Function(_) => !slot.functions().is_empty(),
            NodeData::NsArg(_) => slot.entity_types().is_some(),
            NodeData::StrArg(_) => slot.literals().is_some(),
        }
    }

    // ============================================================================
    // Diagnostics
    // ============================================================================

    fn function_name(&self, id: NodeId) -> &str {
        self.statement
            .function(id)
            .map_or("function", |function| function.name())
    }

    fn describe_arg(&self, arg: NodeId) -> String {
        match self.statement.node(arg).data() {
            NodeData::Function(function) => format!("function `{}`", function.name()),
            NodeData::NsArg(ns_arg) => format!("namespace term `{}`", ns_arg.term()),
            NodeData::StrArg(str_arg) => format!("string `{}`", str_arg.value()),
        }
    }

    fn missing_required(&self, id: NodeId, slot: &ArgSlot) -> Diagnostic {
        Diagnostic::error(format!(
            "missing required argument for `{}`: expected {}",
            self.function_name(id),
            slot.describe()
        ))
        .with_code(ErrorCode::E300)
        .with_label(self.statement.node(id).span(), "argument missing")
    }

    /// An argument that does not fit the slot it was compared against.
    fn mismatch(&self, id: NodeId, arg: NodeId, slot: &ArgSlot) -> Diagnostic {
        let name = self.function_name(id);
        let span = self.statement.node(arg).span();

        let diagnostic = match self.statement.node(arg).data() {
            NodeData::NsArg(ns_arg) => match (slot.entity_types(), ns_arg.entity_types()) {
                (Some(_), None) => {
                    Diagnostic::error(format!("unable to resolve entity types for `{}`", ns_arg.term()))
                        .with_code(ErrorCode::E305)
                        .with_label(span, "unknown term")
                        .with_help("strict validation requires known entity types")
                }
                (Some(accepted), Some(types)) => Diagnostic::error(format!(
                    "`{}` has entity types {} but `{name}` accepts {}",
                    ns_arg.term(),
                    join(types),
                    join(accepted)
                ))
                .with_code(ErrorCode::E303)
                .with_label(span, "wrong entity type"),
                (None, _) => self.wrong_argument(name, arg, slot),
            },
            NodeData::StrArg(str_arg) if slot.literals().is_some() => {
                let mut diagnostic = Diagnostic::error(format!(
                    "`{}` is not a valid value for `{name}`",
                    str_arg.value()
                ))
                .with_code(ErrorCode::E304)
                .with_label(span, "unresolved value");
                if let Some(literals) = slot.literals() {
                    let values: Vec<&str> = literals.values().collect();
                    if !values.is_empty() {
                        diagnostic = diagnostic.with_help(format!("expected one of: {}", values.join(", ")));
                    } else if let Some(pattern) = literals.pattern() {
                        diagnostic = diagnostic.with_help(format!("expected a value matching `{}`", pattern));
                    }
                }
                diagnostic
            }
            _ => self.wrong_argument(name, arg, slot),
        };

        diagnostic.with_secondary_label(self.statement.node(id).span(), format!("in `{name}`"))
    }

    fn wrong_argument(&self, name: &str, arg: NodeId, slot: &ArgSlot) -> Diagnostic {
        Diagnostic::error(format!(
            "wrong argument for `{name}`: expected {}, found {}",
            slot.describe(),
            self.describe_arg(arg)
        ))
        .with_code(ErrorCode::E302)
        .with_label(self.statement.node(arg).span(), "wrong argument")
    }

    /// An argument left over after every slot was considered.
    fn extra(&self, id: NodeId, arg: NodeId, signature: &Signature) -> Diagnostic {
        let slots = || {
            signature
                .positional()
                .iter()
                .chain(signature.optional())
                .chain(signature.repeatable())
        };

        if slots().any(|slot| self.fits(slot, arg).is_some()) {
            let name = self.function_name(id);
            return Diagnostic::error(format!(
                "unexpected argument for `{name}`: {} is not allowed here",
                self.describe_arg(arg)
            ))
            .with_code(ErrorCode::E301)
            .with_label(self.statement.node(arg).span(), "not allowed here")
            .with_help("this kind of argument may appear only once, after the positional arguments")
            .with_secondary_label(self.statement.node(id).span(), format!("in `{name}`"));
        }

        match slots().find(|slot| self.same_kind(slot, arg)) {
            Some(slot) => self.mismatch(id, arg, slot),
            None => {
                let name = self.function_name(id);
                Diagnostic::error(format!(
                    "unexpected argument for `{name}`: {}",
                    self.describe_arg(arg)
                ))
                .with_code(ErrorCode::E301)
                .with_label(self.statement.node(arg).span(), "not allowed here")
                .with_secondary_label(self.statement.node(id).span(), format!("in `{name}`"))
            }
        }
    }
}

fn join(values: &BTreeSet<String>) -> String {
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    format!("({})", values.join("|"))
}

/// Maximum bipartite matching of arguments to slots (Kuhn's algorithm).
///
/// `edges[arg]` lists the slots an argument may take. Returns the slot of
/// each argument, `None` for arguments left unmatched.
fn max_matching(edges: &[Vec<usize>], slots: usize) -> Vec<Option<usize>> {
    let mut owner: Vec<Option<usize>> = vec![None; slots];
    for arg in 0..edges.len() {
        let mut seen = vec![false; slots];
        augment(arg, edges, &mut seen, &mut owner);
    }

    let mut assignment = vec![None; edges.len()];
    for (slot, arg) in owner.iter().enumerate() {
        if let Some(arg) = arg {
            assignment[*arg] = Some(slot);
        }
    }
    assignment
}

fn augment(arg: usize, edges: &[Vec<usize>], seen: &mut [bool], owner: &mut [Option<usize>]) -> bool {
    for &slot in &edges[arg] {
        if seen[slot] {
            continue;
        }
        seen[slot] = true;
        let free = match owner[slot] {
            None => true,
            Some(other) => augment(other, edges, seen, owner),
        };
        if free {
            owner[slot] = Some(arg);
            return true;
        }
    }
    false
}
