//! The result of a solved constraint store: the final `types`/`subs` maps
//! plus two ways to query them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::term::{NodeId, Term};
use crate::unify::{Subs, Types};

/// The output of [`crate::rules::Rules::infer`].
///
/// `types` and `subs` are exposed directly (read-only in spirit, but the type
/// below draws no sharp line between the store and its result) so that
/// callers who need the raw maps — snapshotting, debugging, a caller that
/// wants to walk every inferred binding rather than one id at a time — don't
/// have to go through an id-by-id accessor. Derives `Serialize`/`Deserialize`
/// so a caller can persist or ship a solved result as JSON without writing
/// its own encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferResult {
    pub types: FxHashMap<NodeId, Term>,
    pub subs: FxHashMap<NodeId, NodeId>,
}

impl InferResult {
    pub(crate) fn new(types: Types, subs: Subs) -> InferResult {
        InferResult { types, subs }
    }

    fn canonical(&self, id: &NodeId) -> NodeId {
        self.subs.get(id).cloned().unwrap_or_else(|| id.clone())
    }

    /// The term stored for `id`'s canonical, shallow — argument ids are
    /// returned as-is, not themselves resolved. `None` means `id` was never
    /// specified, directly or by generic propagation: it's a free type
    /// variable.
    pub fn get_type_by_id(&self, id: &NodeId) -> Option<&Term> {
        self.types.get(&self.canonical(id))
    }

    /// The closed, fully-expanded type at `id`: every argument id in the
    /// term is itself resolved recursively, and any id that never resolves
    /// to a stored term (a genuine free variable) is rendered as `a0`, `a1`,
    /// ... in first-encountered order, consistently across the whole call.
    ///
    /// Guards against cycles with a visited set — this function guards
    /// against cycles the core solver doesn't check for, so a pathological
    /// store can produce a term that refers back to its own id. That's not
    /// this function's problem to fix, only to not hang on.
    pub fn get_full_type_by_id(&self, id: &NodeId) -> String {
        let mut namer = FreeVarNamer::default();
        let mut visited = Vec::new();
        self.render(&self.canonical(id), &mut visited, &mut namer)
    }

    fn render(&self, id: &NodeId, visited: &mut Vec<NodeId>, namer: &mut FreeVarNamer) -> String {
        let canonical = self.canonical(id);
        if visited.contains(&canonical) {
            return namer.name_for(&canonical);
        }
        match self.types.get(&canonical) {
            None => namer.name_for(&canonical),
            Some(Term::Ground(name)) => name.clone(),
            Some(Term::Compound(name, args)) => {
                visited.push(canonical.clone());
                let rendered: Vec<String> = args.iter().map(|a| self.render(a, visited, namer)).collect();
                visited.pop();
                format!("({name} {})", rendered.join(" "))
            }
        }
    }
}

#[derive(Default)]
struct FreeVarNamer {
    seen: Vec<NodeId>,
}

impl FreeVarNamer {
    fn name_for(&mut self, id: &NodeId) -> String {
        let index = match self.seen.iter().position(|seen| seen == id) {
            Some(index) => index,
            None => {
                self.seen.push(id.clone());
                self.seen.len() - 1
            }
        };
        format!("a{index}")
    }
}
