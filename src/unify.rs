//! Phase E: specification collapse and LIFO equality closure.
//!
//! `solve_equal_queue` is the eager union-find-without-path-compression core:
//! no chain ever forms because every existing `subs` value and every
//! existing `types` term is rewritten in place the moment a replacement is
//! chosen. Phase G's SCC collapse (`src/generic.rs`) reuses this exact
//! routine rather than reimplementing equality solving.

use rustc_hash::FxHashMap;

use crate::error::InferenceError;
use crate::rules::Rules;
use crate::term::{NodeId, Term};

/// `subs: id -> id`, one hop only (no id is ever both a key and a value).
pub type Subs = FxHashMap<NodeId, NodeId>;
/// `types: id -> term`.
pub type Types = FxHashMap<NodeId, Term>;

/// Merge two optional type terms.
///
/// Absent/absent yields absent; absent/present yields the present side with
/// no new constraints; present/present requires `left` and `right` to be
/// compatible (same constructor, same arity) and yields `left` plus a
/// positional equality for every pair of argument ids.
pub(crate) fn merge_types(
    left: Option<Term>,
    right: Option<Term>,
) -> Result<(Option<Term>, Vec<(NodeId, NodeId)>), InferenceError> {
    match (left, right) {
        (None, None) => Ok((None, Vec::new())),
        (Some(l), None) => Ok((Some(l), Vec::new())),
        (None, Some(r)) => Ok((Some(r), Vec::new())),
        (Some(l), Some(r)) => {
            if !l.compatible(&r) {
                return Err(InferenceError::IncompatibleTypes { left: l, right: r });
            }
            let new_rules = l.args().iter().cloned().zip(r.args().iter().cloned()).collect();
            Ok((Some(l), new_rules))
        }
    }
}

fn canonical(subs: &Subs, id: &NodeId) -> NodeId {
    subs.get(id).cloned().unwrap_or_else(|| id.clone())
}

/// Solve a LIFO queue of equality pairs against `types`/`subs`, mutating
/// both in place. Shared between Phase E's own equality queue and Phase G's
/// SCC-collapse equalities.
pub(crate) fn solve_equal_queue(
    types: &mut Types,
    subs: &mut Subs,
    queue: &mut Vec<(NodeId, NodeId)>,
) -> Result<(), InferenceError> {
    while let Some((t1, t2)) = queue.pop() {
        let t1p = canonical(subs, &t1);
        let t2p = canonical(subs, &t2);
        if t1p == t2p {
            continue;
        }

        let type1 = types.get(&t1p).cloned();
        let type2 = types.get(&t2p).cloned();

        // Tie-break: prefer the side that already carries information as
        // the surviving canonical, so the output is a little more
        // predictable. Doesn't affect correctness either way.
        let (replacement, replaced) = if type1.is_none() && type2.is_some() {
            (t2p.clone(), t1p.clone())
        } else {
            (t1p.clone(), t2p.clone())
        };

        let (merged, new_rules) = merge_types(type1, type2)?;
        queue.extend(new_rules);

        subs.insert(replaced.clone(), replacement.clone());
        for value in subs.values_mut() {
            if *value == replaced {
                *value = replacement.clone();
            }
        }

        types.remove(&replaced);
        match merged {
            Some(term) => {
                types.insert(replacement.clone(), term);
            }
            None => {
                types.remove(&replacement);
            }
        }

        for term in types.values_mut() {
            term.replace_id(&replaced, &replacement);
        }
    }
    Ok(())
}

/// Run Phase E to completion: collapse `specified_types` into the equality
/// queue, then solve the combined queue. Returns the resulting `types`/
/// `subs`, ready for Phase G.
pub(crate) fn solve_phase_e(rules: &Rules) -> Result<(Types, Subs), InferenceError> {
    let mut types: Types = Types::default();
    let mut subs: Subs = Subs::default();

    let mut step1_emitted: Vec<(NodeId, NodeId)> = Vec::new();
    for (var, given) in rules.specified_types() {
        let existing = types.get(var).cloned();
        let (merged, new_rules) = merge_types(Some(given.clone()), existing)?;
        step1_emitted.extend(new_rules);
        match merged {
            Some(term) => {
                types.insert(var.clone(), term);
            }
            None => {
                types.remove(var);
            }
        }
    }

    let mut queue: Vec<(NodeId, NodeId)> = Vec::new();
    queue.extend(rules.equal_rules().iter().cloned());
    queue.extend(step1_emitted);

    solve_equal_queue(&mut types, &mut subs, &mut queue)?;
    Ok((types, subs))
}
