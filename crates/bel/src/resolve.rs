//! Namespace term rewrites.
//!
//! All three rewrites walk the statement's namespace terms in pre-order,
//! look them up in one batch per round and rewrite matches in place.
//! Rewritten terms lose their entity-type annotation.

use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use indexmap::IndexMap;
use log::{debug, info, trace};

use bel_core::{
    LookupError, TermId,
    terms::{EquivalenceLookup, LookupOptions, OrthologLookup, lookup_all},
};
use bel_parser::{Diagnostic, ErrorCode, NodeId, Statement};

use crate::config::NamespaceTargets;

/// Rewrite terms to their best-ranked equivalent in the target namespaces
/// configured for their namespace.
///
/// A rewritten term is looked up again when its new namespace has targets
/// of its own, until no term changes. A term never returns to a namespace
/// it already had. Misses leave the term unchanged and add no diagnostic.
///
/// Returns the number of rewrites.
///
/// # Errors
///
/// Only collaborator failures outside the miss/timeout contract are
/// returned.
pub fn rewrite_equivalents(
    statement: &mut Statement,
    targets: &NamespaceTargets,
    lookup: &Arc<dyn EquivalenceLookup>,
    options: &LookupOptions,
) -> Result<usize, LookupError> {
    let mut pending: Vec<(NodeId, HashSet<String>)> = statement
        .ns_args()
        .into_iter()
        .filter_map(|id| {
            let namespace = statement.ns_arg(id)?.namespace();
            (!targets.targets(namespace).is_empty())
                .then(|| (id, HashSet::from([namespace.to_string()])))
        })
        .collect();

    let mut rewrites = 0;
    let mut round = 0;
    while !pending.is_empty() {
        round += 1;

        let mut terms: IndexMap<TermId, Vec<usize>> = IndexMap::new();
        for (index, (id, _)) in pending.iter().enumerate() {
            if let Some(ns_arg) = statement.ns_arg(*id) {
                terms.entry(ns_arg.term()).or_default().push(index);
            }
        }
        let keys: Vec<TermId> = terms.keys().cloned().collect();
        let collaborator = Arc::clone(lookup);
        let round_targets = targets.clone();
        let results = lookup_all(&keys, options, move |term| {
            collaborator.lookup_equivalent(term, round_targets.targets(term.namespace()))
        })?;
        trace!(round, terms = keys.len(); "Equivalence lookups done");

        let mut next = Vec::new();
        for ((term, indices), result) in terms.into_iter().zip(results) {
            let Some(equivalent) = result.flatten().filter(|equivalent| *equivalent != term) else {
                trace!(term:% = term; "No equivalent");
                continue;
            };
            for index in indices {
                let (id, mut visited) = pending[index].clone();
                if !visited.insert(equivalent.namespace().to_string()) {
                    debug!(term:% = term, equivalent:% = equivalent; "Namespace already visited, stopping");
                    continue;
                }
                if let Some(ns_arg) = statement.ns_arg_mut(id) {
                    ns_arg.set_term(&equivalent);
                    rewrites += 1;
                }
                if !targets.targets(equivalent.namespace()).is_empty() {
                    next.push((id, visited));
                }
            }
        }
        pending = next;
    }

    debug!(rewrites, rounds = round; "Equivalence rewrites done");
    Ok(rewrites)
}

/// Rewrite gene, RNA and protein terms to their ortholog in `species`.
///
/// The first candidate the collaborator returns wins. Terms whose entity
/// types are known and outside `eligible` are skipped; unvalidated terms are
/// attempted. Misses add a warning per term. Without a species nothing is
/// rewritten and a single warning is added.
///
/// Returns the number of rewrites.
///
/// # Errors
///
/// Only collaborator failures outside the miss/timeout contract are
/// returned.
pub fn orthologize(
    statement: &mut Statement,
    species: Option<&str>,
    eligible: &BTreeSet<String>,
    lookup: &Arc<dyn OrthologLookup>,
    options: &LookupOptions,
) -> Result<usize, LookupError> {
    let Some(species) = species else {
        statement.push_diagnostic(
            Diagnostic::warning("no target species given, statement not orthologized")
                .with_code(ErrorCode::W401),
        );
        return Ok(0);
    };

    let mut terms: IndexMap<TermId, Vec<NodeId>> = IndexMap::new();
    for id in statement.ns_args() {
        let Some(ns_arg) = statement.ns_arg(id) else {
            continue;
        };
        let orthologizable = ns_arg
            .entity_types()
            .is_none_or(|types| !types.is_disjoint(eligible));
        if orthologizable {
            terms.entry(ns_arg.term()).or_default().push(id);
        } else {
            trace!(term:% = ns_arg.term(); "Not an orthologizable entity type");
        }
    }
    if terms.is_empty() {
        return Ok(0);
    }

    let keys: Vec<TermId> = terms.keys().cloned().collect();
    let collaborator = Arc::clone(lookup);
    let target = species.to_string();
    let results = lookup_all(&keys, options, move |term| {
        collaborator.lookup_orthologs(term, &target)
    })?;

    let mut rewrites = 0;
    for ((term, ids), result) in terms.into_iter().zip(results) {
        match result.and_then(|candidates| candidates.into_iter().next()) {
            Some(ortholog) => {
                if ortholog == term {
                    continue;
                }
                for id in ids {
                    if let Some(ns_arg) = statement.ns_arg_mut(id) {
                        ns_arg.set_term(&ortholog);
                        rewrites += 1;
                    }
                }
            }
            None => {
                for id in ids {
                    let span = statement.node(id).span();
                    statement.push_diagnostic(
                        Diagnostic::warning(format!("no ortholog found for `{term}` in {species}"))
                            .with_code(ErrorCode::W400)
                            .with_label(span, "kept as written"),
                    );
                }
            }
        }
    }

    info!(species, rewrites; "Statement orthologized");
    Ok(rewrites)
}
