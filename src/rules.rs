//! The constraint store: three append-only buffers with a fluent builder.
//!
//! No deduplication and no validation happen at insertion time — constraints
//! are just recorded in arrival order. All validation happens in
//! [`Rules::infer`].

use crate::error::InferenceError;
use crate::generic;
use crate::result::InferResult;
use crate::term::{NodeId, Term};
use crate::unify;

/// An append-only constraint set: equalities, specified types, and
/// instance-of (generic) relations.
#[derive(Debug, Default, Clone)]
pub struct Rules {
    equal_rules: Vec<(NodeId, NodeId)>,
    specified_types: Vec<(NodeId, Term)>,
    generic_relations: Vec<(NodeId, NodeId)>,
}

impl Rules {
    /// An empty constraint store.
    pub fn new() -> Rules {
        Rules::default()
    }

    /// Assert `type(a) ≡ type(b)`.
    pub fn equal(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> &mut Self {
        self.equal_rules.push((a.into(), b.into()));
        self
    }

    /// Assert `type(a) = term`.
    pub fn specify(&mut self, a: impl Into<NodeId>, term: Term) -> &mut Self {
        self.specified_types.push((a.into(), term));
        self
    }

    /// Assert that `type(instance)` is a more concrete instantiation of
    /// `type(general)`.
    pub fn instance_of(&mut self, instance: impl Into<NodeId>, general: impl Into<NodeId>) -> &mut Self {
        self.generic_relations.push((instance.into(), general.into()));
        self
    }

    pub(crate) fn equal_rules(&self) -> &[(NodeId, NodeId)] {
        &self.equal_rules
    }

    pub(crate) fn specified_types(&self) -> &[(NodeId, Term)] {
        &self.specified_types
    }

    pub(crate) fn generic_relations(&self) -> &[(NodeId, NodeId)] {
        &self.generic_relations
    }

    /// Solve the constraint store: Phase E (equality closure) followed by
    /// Phase G (generic propagation). Terminal on the first incompatibility;
    /// nothing is retried or partially reported.
    pub fn infer(&self) -> Result<InferResult, InferenceError> {
        let (types, subs) = unify::solve_phase_e(self)?;
        let (types, subs) = generic::solve_phase_g(self, types, subs)?;
        Ok(InferResult::new(types, subs))
    }
}
