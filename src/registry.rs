//! The identifier registry: fresh id allocation, a bidirectional id/handle
//! map, and the lexical scope stack.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::Expr;
use crate::error::InferenceError;
use crate::term::NodeId;

/// A reference to an AST node, compared by pointer identity rather than
/// structural equality — two syntactically identical expressions are
/// distinct handles unless they are the same `Rc` allocation.
#[derive(Clone, Debug)]
pub struct ExprHandle(pub Rc<Expr>);

impl PartialEq for ExprHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ExprHandle {}

impl Hash for ExprHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl From<&Rc<Expr>> for ExprHandle {
    fn from(expr: &Rc<Expr>) -> ExprHandle {
        ExprHandle(Rc::clone(expr))
    }
}

/// A single lexical scope: surface name to `(scoped id, is_generic)`.
pub type Scope = FxHashMap<String, (NodeId, bool)>;

/// Bidirectional id/handle map plus the scope stack, threaded through the
/// AST walk.
#[derive(Default)]
pub struct Registry {
    next_id: u64,
    next_var_suffix: u64,
    next_gen_suffix: u64,
    id_to_handle: FxHashMap<NodeId, ExprHandle>,
    handle_to_id: FxHashMap<ExprHandle, NodeId>,
    scopes: Vec<Scope>,
}

impl Registry {
    /// An empty registry with no scopes and the fresh-id counter at 1.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// A strictly monotonic fresh integer id, starting at 1.
    pub fn generate_new_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::int(self.next_id)
    }

    /// A fresh `var_<name>_<n>` id for a new lexical binding of `name`.
    pub fn fresh_var_id(&mut self, name: &str) -> NodeId {
        self.next_var_suffix += 1;
        NodeId::named(format!("var_{name}_{}", self.next_var_suffix))
    }

    /// A fresh `gen_<n>.<parent>` id for a new generic instantiation site.
    pub fn fresh_gen_id(&mut self, parent: &NodeId) -> NodeId {
        self.next_gen_suffix += 1;
        NodeId::named(format!("gen_{}.{}", self.next_gen_suffix, parent))
    }

    /// Allocate a fresh integer id and bind it to `handle` in both
    /// directions. Fails if `handle` is already registered to any id — in a
    /// well-formed walk, each AST node calls this at most once.
    pub fn add_to_registry(&mut self, handle: ExprHandle) -> Result<NodeId, InferenceError> {
        if self.handle_to_id.contains_key(&handle) {
            return Err(InferenceError::DuplicateRegistration {
                id: self.handle_to_id[&handle].clone(),
            });
        }
        let id = self.generate_new_id();
        self.id_to_handle.insert(id.clone(), handle.clone());
        self.handle_to_id.insert(handle, id.clone());
        Ok(id)
    }

    /// Bind an externally-chosen id (e.g. a `gen_*` id) to `handle`.
    ///
    /// Fails only if `id` is already bound to a *different* handle — the
    /// id-uniqueness guard is an internal-bug signal, not a user error. The
    /// same handle may be registered under more than one id: a `Variable`
    /// AST node that is generalized and then used at two call sites (e.g.
    /// `(id id)`) is walked twice and mints two distinct `gen_*` ids against
    /// the same node. See DESIGN.md's Open Question entry for this.
    pub fn register_for_id(&mut self, id: NodeId, handle: ExprHandle) -> Result<(), InferenceError> {
        if let Some(existing) = self.id_to_handle.get(&id) {
            if *existing != handle {
                return Err(InferenceError::DuplicateRegistration { id });
            }
        }
        self.id_to_handle.insert(id.clone(), handle.clone());
        self.handle_to_id.insert(handle, id);
        Ok(())
    }

    /// Like [`Registry::register_for_id`], but a no-op if `id` is already
    /// registered to exactly this handle.
    pub fn ensure_registered_as(&mut self, id: NodeId, handle: ExprHandle) -> Result<(), InferenceError> {
        if self.id_to_handle.get(&id) == Some(&handle) {
            return Ok(());
        }
        self.register_for_id(id, handle)
    }

    /// The id a handle is registered under, if any. When a handle has been
    /// registered under multiple ids (see `register_for_id`), this returns
    /// the most recent one.
    pub fn get_id_for(&self, handle: &ExprHandle) -> Option<&NodeId> {
        self.handle_to_id.get(handle)
    }

    /// The full forward map from id to handle.
    pub fn get_registered(&self) -> &FxHashMap<NodeId, ExprHandle> {
        &self.id_to_handle
    }

    /// Push a new innermost scope.
    pub fn push_new_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Pop the innermost scope.
    pub fn pop_current_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// Look up `name`, walking the scope stack from innermost to outermost.
    /// Free (unbound) names return `None` — there is no implicit global
    /// scope.
    pub fn lookup_var_in_scope(&self, name: &str) -> Option<(NodeId, bool)> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }
}
