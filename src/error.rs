//! Inference error types.
//!
//! All four error kinds are terminal: `infer()` (or the AST walker's
//! `add_to_rules`) aborts on the first one encountered. Nothing is retried or
//! partially reported.

use std::fmt;

use crate::term::{NodeId, Term};

/// An error raised while building or solving a constraint set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Two type terms unified at the same id have differing constructor
    /// names or arities.
    IncompatibleTypes { left: Term, right: Term },
    /// An instance's term cannot be an instantiation of its general term —
    /// differing constructor name or arity at some (possibly nested,
    /// structurally-descended) position.
    IncompatibleGeneric { instance: Term, general: Term },
    /// A `Variable(name)` was walked outside any scope that binds `name`.
    UnboundVariable { name: String },
    /// An id or expression handle was registered twice with conflicting
    /// bindings. Internal/bug class, not a user-facing type error.
    DuplicateRegistration { id: NodeId },
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::IncompatibleTypes { left, right } => {
                write!(f, "incompatible types: {left} and {right}")
            }
            InferenceError::IncompatibleGeneric { instance, general } => {
                write!(
                    f,
                    "{instance} is not a valid instantiation of generic type {general}"
                )
            }
            InferenceError::UnboundVariable { name } => {
                write!(f, "variable `{name}` is not defined in this scope")
            }
            InferenceError::DuplicateRegistration { id } => {
                write!(f, "id `{id}` is already registered (bug)")
            }
        }
    }
}

impl std::error::Error for InferenceError {}
