//! Integration tests for the machine core loop:
//! - lambda application and de Bruijn resolution
//! - delay/force discipline
//! - explicit errors and malformed terms
//! - step ceilings on non-terminating terms
//! - trace log ordering

use uplx_machine::{CostModel, Machine, MachineError, Value};
use uplx_term::{BuiltinFun, Constant, Term};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Evaluate budget-free and unwrap to a constant.
fn eval_constant(term: &Term) -> Constant {
    match Machine::eval_simple(term) {
        Ok(Value::Constant(c)) => c,
        Ok(other) => panic!("expected a constant, got {other}"),
        Err(e) => panic!("evaluation failed: {e}"),
    }
}

fn eval_err(term: &Term) -> MachineError {
    Machine::eval_simple(term).expect_err("expected evaluation to fail")
}

fn builtin2(fun: BuiltinFun, a: Term, b: Term) -> Term {
    Term::apply_many(Term::builtin(fun), [a, b])
}

fn if_then_else(cond: Term, then: Term, otherwise: Term) -> Term {
    Term::apply_many(Term::builtin(BuiltinFun::IfThenElse), [cond, then, otherwise])
}

// ══════════════════════════════════════════════════════════════════════════════
// Lambda application & variables
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn identity_application() {
    let term = Term::apply(Term::lambda(Term::var(0)), Term::constant(5));
    assert_eq!(eval_constant(&term), Constant::integer(5));
}

#[test]
fn nested_lambdas_resolve_by_distance() {
    // (\x -> \y -> x) 1 2  ==>  1
    let term = Term::apply_many(
        Term::lambda(Term::lambda(Term::var(1))),
        [Term::constant(1), Term::constant(2)],
    );
    assert_eq!(eval_constant(&term), Constant::integer(1));
}

#[test]
fn lambda_with_no_argument_is_a_value() {
    let value = Machine::eval_simple(&Term::lambda(Term::var(0))).expect("lambda is a value");
    assert!(matches!(value, Value::Lambda { .. }));
}

#[test]
fn unbound_variable_is_a_caller_bug() {
    assert_eq!(eval_err(&Term::var(0)), MachineError::UnboundVariable(0));
    // Index past the single binding in scope.
    let term = Term::apply(Term::lambda(Term::var(3)), Term::constant(1));
    assert_eq!(eval_err(&term), MachineError::UnboundVariable(3));
}

#[test]
fn argument_closure_recomputes_per_occurrence() {
    // (\x -> x + x) (3 + 4)  ==>  14; the bound term is recomputed at each
    // occurrence rather than memoized.
    let body = builtin2(BuiltinFun::AddInteger, Term::var(0), Term::var(0));
    let term = Term::apply(
        Term::lambda(body),
        builtin2(BuiltinFun::AddInteger, Term::constant(3), Term::constant(4)),
    );
    assert_eq!(eval_constant(&term), Constant::integer(14));
}

// ══════════════════════════════════════════════════════════════════════════════
// Delay & force
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn force_of_delay_resumes() {
    let term = Term::force(Term::delay(Term::constant(5)));
    assert_eq!(eval_constant(&term), Constant::integer(5));
}

#[test]
fn delay_suspends_errors() {
    let value = Machine::eval_simple(&Term::delay(Term::error())).expect("delay is a value");
    assert!(matches!(value, Value::Delay { .. }));
}

#[test]
fn force_of_non_delay_always_fails() {
    // Never returns 5.
    let err = eval_err(&Term::force(Term::constant(5)));
    assert!(matches!(err, MachineError::ForceNonDelay(_)), "got {err}");
}

#[test]
fn force_of_lambda_fails() {
    let err = eval_err(&Term::force(Term::lambda(Term::var(0))));
    assert!(matches!(err, MachineError::ForceNonDelay(_)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditional selection
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn select_true_picks_the_first_branch() {
    let term = if_then_else(Term::constant(true), Term::constant(1), Term::constant(2));
    assert_eq!(eval_constant(&term), Constant::integer(1));
}

#[test]
fn select_false_picks_the_second_branch() {
    let term = if_then_else(Term::constant(false), Term::constant(1), Term::constant(2));
    assert_eq!(eval_constant(&term), Constant::integer(2));
}

#[test]
fn delayed_branches_force_only_the_selected_one() {
    // By convention branches arrive delayed; the unselected branch is an
    // error that must never run.
    let make = |cond: bool| {
        Term::force(if_then_else(
            Term::constant(cond),
            Term::delay(Term::constant(1)),
            Term::delay(Term::error()),
        ))
    };
    assert_eq!(eval_constant(&make(true)), Constant::integer(1));
    let err = eval_err(&make(false));
    assert!(matches!(err, MachineError::ExplicitError(_)));
}

#[test]
fn forcing_an_undelayed_selected_branch_fails() {
    // Only the delayed branch survives a force of the selection result.
    let make = |cond: bool| {
        Term::force(if_then_else(
            Term::constant(cond),
            Term::constant(1),
            Term::delay(Term::constant(2)),
        ))
    };
    assert_eq!(eval_constant(&make(false)), Constant::integer(2));
    let err = eval_err(&make(true));
    assert!(matches!(err, MachineError::ForceNonDelay(_)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors & malformed terms
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn explicit_error_stops_reduction() {
    let err = eval_err(&Term::error_with("boom"));
    assert_eq!(err, MachineError::ExplicitError(Some("boom".into())));
}

#[test]
fn applying_a_constant_is_a_type_mismatch() {
    let term = Term::apply(Term::constant(1), Term::constant(2));
    assert!(matches!(eval_err(&term), MachineError::TypeMismatch(_)));
}

#[test]
fn over_applying_a_builtin_result_is_a_type_mismatch() {
    // (addInteger 3 4) evaluates to the constant 7; one more argument
    // lands on a non-callable value.
    let term = Term::apply(
        builtin2(BuiltinFun::AddInteger, Term::constant(3), Term::constant(4)),
        Term::constant(5),
    );
    assert!(matches!(eval_err(&term), MachineError::TypeMismatch(_)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Step ceiling
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn step_ceiling_bounds_divergent_terms() {
    // omega = (\x -> x x) (\x -> x x) loops forever without a ceiling.
    let self_apply = Term::lambda(Term::apply(Term::var(0), Term::var(0)));
    let omega = Term::apply(self_apply.clone(), self_apply);

    let report = Machine::new(CostModel::v1())
        .with_step_limit(10_000)
        .run(&omega);
    assert!(matches!(
        report.result,
        Err(MachineError::BudgetExceeded(_))
    ));
}

#[test]
fn step_ceiling_leaves_terminating_terms_alone() {
    let term = builtin2(BuiltinFun::AddInteger, Term::constant(3), Term::constant(4));
    let report = Machine::new(CostModel::v1())
        .with_step_limit(10_000)
        .run(&term);
    let value = report.result.expect("well within the ceiling");
    assert_eq!(value.to_term(), Term::constant(7));
}

// ══════════════════════════════════════════════════════════════════════════════
// Trace logs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn logs_follow_reduction_order_not_program_order() {
    // trace "outer" (trace "inner" 42): the inner trace reduces first.
    let inner = builtin2(BuiltinFun::Trace, Term::constant("inner"), Term::constant(42));
    let term = builtin2(BuiltinFun::Trace, Term::constant("outer"), inner);

    let report = Machine::new(CostModel::v1()).run(&term);
    let value = report.result.expect("traced evaluation succeeds");
    assert_eq!(value.to_term(), Term::constant(42));
    assert_eq!(report.logs, vec!["inner".to_string(), "outer".to_string()]);
}

#[test]
fn logs_survive_a_failing_evaluation() {
    let term = Term::force(builtin2(
        BuiltinFun::Trace,
        Term::constant("reached"),
        Term::delay(Term::error()),
    ));
    let report = Machine::new(CostModel::v1()).run(&term);
    assert!(matches!(
        report.result,
        Err(MachineError::ExplicitError(None))
    ));
    assert_eq!(report.logs, vec!["reached".to_string()]);
    assert!(report.budget.cpu > 0, "trace application was charged");
}
