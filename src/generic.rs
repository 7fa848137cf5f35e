//! Phase G: generic propagation.
//!
//! Rewrites `instance_of` edges through Phase E's substitution, collapses
//! cyclic generic relations (mutual recursion) via Tarjan SCC, then pushes
//! general types down into their instances.

use crate::error::InferenceError;
use crate::graph::Graph;
use crate::rules::Rules;
#[cfg(test)]
use crate::term::Term;
use crate::term::NodeId;
use crate::unify::{self, Subs, Types};

fn canonical(subs: &Subs, id: &NodeId) -> NodeId {
    subs.get(id).cloned().unwrap_or_else(|| id.clone())
}

/// Run Phase G to completion, given Phase E's `types`/`subs`.
pub(crate) fn solve_phase_g(
    rules: &Rules,
    mut types: Types,
    mut subs: Subs,
) -> Result<(Types, Subs), InferenceError> {
    // Step 1: rewrite instance_of edges through the Phase E substitution.
    let edges: Vec<(NodeId, NodeId)> = rules
        .generic_relations()
        .iter()
        .map(|(instance, general)| (canonical(&subs, instance), canonical(&subs, general)))
        .collect();

    // Step 2: build the instance -> general graph (the glossary: "the
    // target generalizes the source") and find its SCCs.
    let mut graph = Graph::new();
    for (instance, general) in &edges {
        graph.add_edge(instance.clone(), general.clone());
    }
    let sccs = graph.strongly_connected_components();

    // Step 3: collapse each multi-vertex SCC into one equality class, using
    // the same eager equality solver Phase E uses.
    for scc in &sccs {
        if scc.len() >= 2 {
            let representative = scc[0].clone();
            let mut eq_queue: Vec<(NodeId, NodeId)> = scc[1..]
                .iter()
                .map(|v| (representative.clone(), v.clone()))
                .collect();
            unify::solve_equal_queue(&mut types, &mut subs, &mut eq_queue)?;
        }
    }

    // Step 4: for each vertex v in every SCC, its "children" (the
    // instances that generalize to v) are v's children in the *inverted*
    // graph — general -> instance. Pairs are recorded and processed as
    // (instance, general), matching instance_of(i, g)'s argument order.
    let inverted = graph.invert();
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::new();
    for scc in &sccs {
        for v in scc {
            for instance in inverted.get_children(v) {
                let general_c = canonical(&subs, v);
                let instance_c = canonical(&subs, instance);
                pairs.push((instance_c, general_c));
            }
        }
    }

    // Step 5: propagate types down the (instance, general) stack.
    propagate(&mut types, &mut subs, pairs)?;

    Ok((types, subs))
}

fn propagate(types: &mut Types, subs: &Subs, mut pairs: Vec<(NodeId, NodeId)>) -> Result<(), InferenceError> {
    while let Some((instance, general)) = pairs.pop() {
        let itype = types.get(&instance).cloned();
        let gtype = types.get(&general).cloned();

        let gtype = match gtype {
            None => continue, // the general has no info to push down yet
            Some(g) => g,
        };

        match itype {
            None => {
                // Substitution-free propagation: the instance adopts the
                // general's term outright, sharing its component ids.
                types.insert(instance, gtype);
            }
            Some(itype) => {
                if !itype.compatible(&gtype) {
                    return Err(InferenceError::IncompatibleGeneric {
                        instance: itype,
                        general: gtype,
                    });
                }
                for (i_arg, g_arg) in itype.args().iter().zip(gtype.args().iter()) {
                    pairs.push((canonical(subs, i_arg), canonical(subs, g_arg)));
                }
                // itype is left exactly as it was.
            }
        }
    }
    Ok(())
}
