//! The type term model: node ids and type terms.
//!
//! A [`NodeId`] is an opaque handle for a position whose type is being
//! inferred. A [`Term`] is either a ground constructor (`Int`) or a compound
//! constructor applied to argument ids (`Pair(11, 12)`). Function types are
//! plain compound terms named `Fn_<k>`; there is no dedicated variant for
//! them, since the constructor name plus arity already determines the kind.

use std::fmt;

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque identifier for a position whose type is being inferred.
///
/// Drawn from one of three disjoint namespaces: a fresh integer minted by
/// the registry, a `var_<name>_<n>` name minted per lexical binding, or a
/// `gen_<n>.<parent-var-id>` name minted per generic instantiation site. All
/// three are handled uniformly here; only their generation sites differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    /// A fresh integer allocated by the registry.
    Fresh(u64),
    /// A `var_*` or `gen_*` name minted by the AST walker.
    Named(String),
}

/// Serialized as a plain string (`#5` for a fresh id, the bare name for a
/// named one) rather than the default externally-tagged enum encoding, so a
/// `NodeId` can be used as a JSON object key — `serde_json` rejects
/// non-string map keys, and `types`/`subs` are keyed by `NodeId`.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeId::Fresh(n) => serializer.serialize_str(&format!("#{n}")),
            NodeId::Named(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<NodeId, D::Error> {
        struct NodeIdVisitor;
        impl Visitor<'_> for NodeIdVisitor {
            type Value = NodeId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node id, either `#<integer>` or a bare name")
            }

            fn visit_str<E: DeError>(self, s: &str) -> Result<NodeId, E> {
                match s.strip_prefix('#') {
                    Some(digits) => digits
                        .parse()
                        .map(NodeId::Fresh)
                        .map_err(|_| E::custom(format!("invalid fresh id `{s}`"))),
                    None => Ok(NodeId::Named(s.to_string())),
                }
            }
        }
        deserializer.deserialize_str(NodeIdVisitor)
    }
}

impl NodeId {
    /// Construct a fresh-integer id directly. Mainly used by tests that
    /// write constraints by hand with literal integer ids
    /// (`specify(1, 'Int')`).
    pub fn int(n: u64) -> NodeId {
        NodeId::Fresh(n)
    }

    /// Construct a named id directly (`var_x_3`, `gen_4.var_x_3`, ...).
    pub fn named(name: impl Into<String>) -> NodeId {
        NodeId::Named(name.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Fresh(n) => write!(f, "{n}"),
            NodeId::Named(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> NodeId {
        NodeId::Fresh(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> NodeId {
        NodeId::Named(s.to_string())
    }
}

/// A type term: a ground name, or a named constructor applied to argument
/// ids.
///
/// `(Fn_k, a1, ..., ak, r)` is the function type with `k` argument slots and
/// a result slot at position `k+1` — an ordinary compound term, not a
/// distinct case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// An atomic constructor with no arguments, e.g. `Int`, `Bool`.
    Ground(String),
    /// A constructor applied to argument ids, e.g. `Pair(11, 12)`.
    Compound(String, Vec<NodeId>),
}

impl Term {
    /// A ground term for the given constructor name.
    pub fn ground(name: impl Into<String>) -> Term {
        Term::Ground(name.into())
    }

    /// A compound term for the given constructor name and argument ids.
    pub fn compound(name: impl Into<String>, args: Vec<NodeId>) -> Term {
        Term::Compound(name.into(), args)
    }

    /// The `Fn_<k>` term for a function of `k` arguments: argument ids
    /// followed by the result id.
    pub fn function(arg_ids: &[NodeId], result_id: NodeId) -> Term {
        let mut args = Vec::with_capacity(arg_ids.len() + 1);
        args.extend_from_slice(arg_ids);
        args.push(result_id);
        Term::Compound(format!("Fn_{}", arg_ids.len()), args)
    }

    /// The constructor name, ignoring arity.
    pub fn name(&self) -> &str {
        match self {
            Term::Ground(name) => name,
            Term::Compound(name, _) => name,
        }
    }

    /// The argument ids, empty for a ground term.
    pub fn args(&self) -> &[NodeId] {
        match self {
            Term::Ground(_) => &[],
            Term::Compound(_, args) => args,
        }
    }

    /// Two terms are compatible iff their constructor names and arities
    /// match. Constructor name plus arity is the only notion of "kind" a
    /// term carries.
    pub fn compatible(&self, other: &Term) -> bool {
        self.name() == other.name() && self.args().len() == other.args().len()
    }

    /// Replace every top-level argument id equal to `old` with `new`, in
    /// place. Used by the equality solver to keep every stored term's
    /// component ids pointing at current canonicals.
    pub fn replace_id(&mut self, old: &NodeId, new: &NodeId) {
        if let Term::Compound(_, args) = self {
            for arg in args.iter_mut() {
                if arg == old {
                    *arg = new.clone();
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Ground(name) => write!(f, "{name}"),
            Term::Compound(name, args) => {
                write!(f, "({name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
