//! The expression tree and the walk that lowers it into constraints.
//!
//! `Expr` stands in for an already-parsed, already-scoped AST: surface
//! syntax, parsing, and pretty-printing are all external collaborators.
//! Nodes are held behind `Rc` so the same node can be shared by more than
//! one parent — `(id id)` applies the same `Variable` node as both the
//! function and the argument — and the registry tracks identity by pointer,
//! not by structure.

use std::rc::Rc;

use crate::error::InferenceError;
use crate::registry::{ExprHandle, Registry, Scope};
use crate::rules::Rules;
use crate::term::{NodeId, Term};

/// The payload of a `Literal` node. Carried for completeness — the solver
/// only ever looks at the literal's declared type term, never at the value.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// One node of the expression tree.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal { type_term: Term, value: LiteralValue },
    TypedExpression { type_term: Term, inner: Rc<Expr> },
    Variable { name: String },
    Application { function: Rc<Expr>, args: Vec<Rc<Expr>> },
    Let { bindings: Vec<(String, Rc<Expr>)>, body: Rc<Expr> },
    Lambda { params: Vec<String>, body: Rc<Expr> },
    If { test: Rc<Expr>, then_branch: Rc<Expr>, else_branch: Rc<Expr> },
}

impl Expr {
    pub fn literal(type_term: Term, value: LiteralValue) -> Expr {
        Expr::Literal { type_term, value }
    }

    pub fn literal_int(v: i64) -> Expr {
        Expr::literal(Term::ground("Int"), LiteralValue::Int(v))
    }

    pub fn literal_float(v: f64) -> Expr {
        Expr::literal(Term::ground("Float"), LiteralValue::Float(v))
    }

    pub fn literal_bool(v: bool) -> Expr {
        Expr::literal(Term::ground("Bool"), LiteralValue::Bool(v))
    }

    pub fn literal_str(v: impl Into<String>) -> Expr {
        Expr::literal(Term::ground("String"), LiteralValue::Str(v.into()))
    }

    pub fn typed(type_term: Term, inner: Rc<Expr>) -> Expr {
        Expr::TypedExpression { type_term, inner }
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Variable { name: name.into() }
    }

    pub fn apply(function: Rc<Expr>, args: Vec<Rc<Expr>>) -> Expr {
        Expr::Application { function, args }
    }

    pub fn let_in(bindings: Vec<(String, Rc<Expr>)>, body: Rc<Expr>) -> Expr {
        Expr::Let { bindings, body }
    }

    pub fn lambda(params: Vec<String>, body: Rc<Expr>) -> Expr {
        Expr::Lambda { params, body }
    }

    pub fn if_then_else(test: Rc<Expr>, then_branch: Rc<Expr>, else_branch: Rc<Expr>) -> Expr {
        Expr::If { test, then_branch, else_branch }
    }
}

/// Walk `expr`, registering every node and emitting every AST variant's
/// documented constraints, and return the id standing for `expr`'s own type.
///
/// Recursive by construction — there is no explicit work stack — since a
/// well-formed expression tree has depth bounded by program nesting, not by
/// input size the way a token stream would.
pub fn add_to_rules(expr: &Rc<Expr>, rules: &mut Rules, registry: &mut Registry) -> Result<NodeId, InferenceError> {
    match expr.as_ref() {
        Expr::Literal { type_term, .. } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;
            rules.specify(self_id.clone(), type_term.clone());
            Ok(self_id)
        }

        Expr::TypedExpression { type_term, inner } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;
            rules.specify(self_id.clone(), type_term.clone());
            let inner_id = add_to_rules(inner, rules, registry)?;
            rules.equal(self_id.clone(), inner_id);
            Ok(self_id)
        }

        Expr::Variable { name } => {
            let (scoped_id, is_generic) = registry
                .lookup_var_in_scope(name)
                .ok_or_else(|| InferenceError::UnboundVariable { name: name.clone() })?;
            if !is_generic {
                // No fresh id: every occurrence of a non-generalized (e.g.
                // lambda-bound) variable is literally the same position.
                return Ok(scoped_id);
            }
            let gen_id = registry.fresh_gen_id(&scoped_id);
            registry.register_for_id(gen_id.clone(), ExprHandle::from(expr))?;
            rules.instance_of(gen_id.clone(), scoped_id);
            Ok(gen_id)
        }

        Expr::Application { function, args } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;
            let fn_id = add_to_rules(function, rules, registry)?;
            let arg_ids = args
                .iter()
                .map(|arg| add_to_rules(arg, rules, registry))
                .collect::<Result<Vec<NodeId>, InferenceError>>()?;
            rules.specify(fn_id, Term::function(&arg_ids, self_id.clone()));
            Ok(self_id)
        }

        Expr::Let { bindings, body } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;

            // All bound names go into one scope before any right-hand side
            // is walked, so a binding's own body can refer to its sibling
            // bindings — mutual recursion within the let.
            let mut scope = Scope::default();
            let mut scoped_ids = Vec::with_capacity(bindings.len());
            for (name, _) in bindings {
                let scoped_id = registry.fresh_var_id(name);
                scope.insert(name.clone(), (scoped_id.clone(), true));
                scoped_ids.push(scoped_id);
            }
            registry.push_new_scope(scope);

            for ((_, binding_expr), scoped_id) in bindings.iter().zip(scoped_ids.into_iter()) {
                let expr_id = add_to_rules(binding_expr, rules, registry)?;
                rules.equal(scoped_id, expr_id);
            }
            let body_id = add_to_rules(body, rules, registry)?;
            rules.equal(self_id.clone(), body_id);

            registry.pop_current_scope();
            Ok(self_id)
        }

        Expr::Lambda { params, body } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;

            let mut scope = Scope::default();
            let mut arg_ids = Vec::with_capacity(params.len());
            for name in params {
                let scoped_id = registry.fresh_var_id(name);
                scope.insert(name.clone(), (scoped_id.clone(), false));
                arg_ids.push(scoped_id);
            }
            registry.push_new_scope(scope);
            let body_id = add_to_rules(body, rules, registry)?;
            registry.pop_current_scope();

            rules.specify(self_id.clone(), Term::function(&arg_ids, body_id));
            Ok(self_id)
        }

        Expr::If { test, then_branch, else_branch } => {
            let self_id = registry.add_to_registry(ExprHandle::from(expr))?;
            let test_id = add_to_rules(test, rules, registry)?;
            let then_id = add_to_rules(then_branch, rules, registry)?;
            let else_id = add_to_rules(else_branch, rules, registry)?;
            rules.specify(test_id, Term::ground("Bool"));
            rules.equal(then_id.clone(), else_id);
            rules.equal(self_id.clone(), then_id);
            Ok(self_id)
        }
    }
}
