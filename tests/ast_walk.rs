//! Black-box tests of the AST walker: build an expression tree, walk it,
//! and check the resulting inference.

use std::rc::Rc;

use hm_solve::{add_to_rules, Expr, InferenceError, Registry, Rules, Term};

fn infer(expr: &Rc<Expr>) -> Result<(hm_solve::NodeId, hm_solve::InferResult), InferenceError> {
    let mut rules = Rules::new();
    let mut registry = Registry::new();
    let id = add_to_rules(expr, &mut rules, &mut registry)?;
    let result = rules.infer()?;
    Ok((id, result))
}

#[test]
fn literal_int_infers_int() {
    let (id, result) = infer(&Rc::new(Expr::literal_int(42))).unwrap();
    assert_eq!(result.get_type_by_id(&id), Some(&Term::ground("Int")));
}

#[test]
fn typed_expression_matching_its_declared_type_succeeds() {
    let expr = Rc::new(Expr::typed(Term::ground("Bool"), Rc::new(Expr::literal_bool(false))));
    let (id, result) = infer(&expr).unwrap();
    assert_eq!(result.get_type_by_id(&id), Some(&Term::ground("Bool")));
}

#[test]
fn typed_expression_mismatching_its_declared_type_fails() {
    let expr = Rc::new(Expr::typed(Term::ground("String"), Rc::new(Expr::literal_int(1))));
    let mut rules = Rules::new();
    let mut registry = Registry::new();
    add_to_rules(&expr, &mut rules, &mut registry).unwrap();
    assert!(matches!(
        rules.infer(),
        Err(InferenceError::IncompatibleTypes { .. })
    ));
}

#[test]
fn application_of_identity_lambda_infers_argument_type() {
    let identity = Rc::new(Expr::lambda(vec!["x".to_string()], Rc::new(Expr::var("x"))));
    let app = Rc::new(Expr::apply(identity, vec![Rc::new(Expr::literal_bool(true))]));
    let (id, result) = infer(&app).unwrap();
    assert_eq!(result.get_type_by_id(&id), Some(&Term::ground("Bool")));
}

#[test]
fn lambda_of_identity_has_the_same_id_at_both_fn_positions() {
    // \x -> x should infer to Fn_1(a, a) for the same free id `a`.
    let lambda = Rc::new(Expr::lambda(vec!["x".to_string()], Rc::new(Expr::var("x"))));
    let (id, result) = infer(&lambda).unwrap();
    match result.get_type_by_id(&id).unwrap() {
        Term::Compound(name, args) => {
            assert_eq!(name, "Fn_1");
            assert_eq!(args.len(), 2);
            assert_eq!(args[0], args[1]);
        }
        other => panic!("expected a Fn_1 term, got {other:?}"),
    }
}

#[test]
fn let_with_lambda_body_infers_through_the_binding() {
    // let f = \x -> x in f
    let lambda = Rc::new(Expr::lambda(vec!["x".to_string()], Rc::new(Expr::var("x"))));
    let let_expr = Rc::new(Expr::let_in(
        vec![("f".to_string(), lambda)],
        Rc::new(Expr::var("f")),
    ));
    let (id, result) = infer(&let_expr).unwrap();
    match result.get_type_by_id(&id).unwrap() {
        Term::Compound(name, _) => assert_eq!(name, "Fn_1"),
        other => panic!("expected a Fn_1 term, got {other:?}"),
    }
}

#[test]
fn let_polymorphism_self_application_resolves_to_int() {
    // let id = \x -> x in (id id) 123
    let id_lambda = Rc::new(Expr::lambda(vec!["x".to_string()], Rc::new(Expr::var("x"))));
    let id_var = Rc::new(Expr::var("id"));
    let self_applied = Rc::new(Expr::apply(Rc::clone(&id_var), vec![Rc::clone(&id_var)]));
    let body = Rc::new(Expr::apply(self_applied, vec![Rc::new(Expr::literal_int(123))]));
    let let_expr = Rc::new(Expr::let_in(vec![("id".to_string(), id_lambda)], body));

    let (id, result) = infer(&let_expr).unwrap();
    assert_eq!(result.get_type_by_id(&id), Some(&Term::ground("Int")));
}

#[test]
fn mutual_recursion_between_two_zero_argument_let_bindings() {
    // let f = if True then 123 else g() ; g = f() in f
    let f_body = Rc::new(Expr::if_then_else(
        Rc::new(Expr::literal_bool(true)),
        Rc::new(Expr::literal_int(123)),
        Rc::new(Expr::apply(Rc::new(Expr::var("g")), vec![])),
    ));
    let f_lambda = Rc::new(Expr::lambda(vec![], f_body));
    let g_body = Rc::new(Expr::apply(Rc::new(Expr::var("f")), vec![]));
    let g_lambda = Rc::new(Expr::lambda(vec![], g_body));
    let let_expr = Rc::new(Expr::let_in(
        vec![("f".to_string(), f_lambda), ("g".to_string(), g_lambda)],
        Rc::new(Expr::var("f")),
    ));

    let (id, result) = infer(&let_expr).unwrap();
    assert_eq!(result.get_full_type_by_id(&id), "(Fn_0 Int)");
}

#[test]
fn if_branches_must_agree_or_inference_fails() {
    let expr = Rc::new(Expr::if_then_else(
        Rc::new(Expr::literal_bool(true)),
        Rc::new(Expr::literal_int(123)),
        Rc::new(Expr::literal_str("x")),
    ));
    let mut rules = Rules::new();
    let mut registry = Registry::new();
    add_to_rules(&expr, &mut rules, &mut registry).unwrap();
    assert!(matches!(
        rules.infer(),
        Err(InferenceError::IncompatibleTypes { .. })
    ));
}

#[test]
fn if_test_must_be_bool() {
    let expr = Rc::new(Expr::if_then_else(
        Rc::new(Expr::literal_int(1)),
        Rc::new(Expr::literal_int(1)),
        Rc::new(Expr::literal_int(2)),
    ));
    let mut rules = Rules::new();
    let mut registry = Registry::new();
    add_to_rules(&expr, &mut rules, &mut registry).unwrap();
    assert!(matches!(
        rules.infer(),
        Err(InferenceError::IncompatibleTypes { .. })
    ));
}

#[test]
fn variable_occurring_outside_any_binding_scope_is_unbound() {
    let expr = Rc::new(Expr::var("ghost"));
    let mut rules = Rules::new();
    let mut registry = Registry::new();
    assert!(matches!(
        add_to_rules(&expr, &mut rules, &mut registry),
        Err(InferenceError::UnboundVariable { name }) if name == "ghost"
    ));
}
