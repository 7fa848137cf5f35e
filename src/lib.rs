//! A Hindley-Milner constraint solver: a unifier over first-order type terms
//! combined with a generic-instantiation engine that gives let-bindings
//! rank-1 polymorphism without resorting to second-order types.
//!
//! The crate has three layers, built leaves-first:
//!
//! 1. [`term`] and [`graph`] — the type term model and the directed-graph
//!    utility (Tarjan SCC) the generic solver is built on.
//! 2. [`registry`] and [`rules`] — the identifier registry (fresh ids,
//!    lexical scoping) and the append-only constraint store.
//! 3. [`ast`] and [`result`] — the expression walker that lowers a tree into
//!    constraints, and the query surface over a solved store.
//!
//! `unify` (Phase E, equality closure) and `generic` (Phase G, generic
//! propagation) are the two halves of [`rules::Rules::infer`] and are not
//! part of the public surface — callers only ever see their combined effect
//! through [`result::InferResult`].

pub mod ast;
pub mod error;
mod generic;
pub mod graph;
pub mod registry;
pub mod result;
pub mod rules;
pub mod term;
mod unify;

pub use ast::{add_to_rules, Expr, LiteralValue};
pub use error::InferenceError;
pub use graph::Graph;
pub use registry::{ExprHandle, Registry, Scope};
pub use result::InferResult;
pub use rules::Rules;
pub use term::{NodeId, Term};
