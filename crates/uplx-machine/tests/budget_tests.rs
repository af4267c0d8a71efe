//! Integration tests for budget accounting:
//! - determinism of result, budget, and logs
//! - additivity of per-application charges
//! - partial application costs the same as direct application
//! - budget ceilings
//! - version coverage and serde round-trips

use uplx_machine::{CostModel, CostModelVersion, EvalReport, ExBudget, Machine, MachineError};
use uplx_term::{BuiltinFun, Term};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn run_v1(term: &Term) -> EvalReport {
    Machine::new(CostModel::v1()).run(term)
}

fn add(a: Term, b: Term) -> Term {
    Term::apply_many(Term::builtin(BuiltinFun::AddInteger), [a, b])
}

/// `n` nested additions over one-word integers.
fn nested_additions(n: usize) -> Term {
    let mut term = Term::constant(1);
    for _ in 0..n {
        term = add(Term::constant(1), term);
    }
    term
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn repeated_runs_agree_on_result_budget_and_logs() {
    let term = Term::apply_many(
        Term::builtin(BuiltinFun::Trace),
        [Term::constant("step"), add(Term::constant(3), Term::constant(4))],
    );

    let first = run_v1(&term);
    let second = run_v1(&term);

    let a = first.result.expect("first run succeeds");
    let b = second.result.expect("second run succeeds");
    assert_eq!(a.to_term(), b.to_term());
    assert_eq!(first.budget, second.budget);
    assert_eq!(first.logs, second.logs);
}

// ══════════════════════════════════════════════════════════════════════════════
// Additivity
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn fixed_size_additions_cost_linearly() {
    // Only builtin applications are charged; machine steps are free. With
    // every operand one word wide, a chain of n additions must cost
    // exactly n times one addition.
    let single = run_v1(&nested_additions(1));
    single.result.as_ref().expect("single addition succeeds");
    assert!(single.budget.cpu > 0);

    for n in [2u64, 3, 7] {
        let chained = run_v1(&nested_additions(n as usize));
        chained.result.as_ref().expect("chain succeeds");
        assert_eq!(
            chained.budget,
            ExBudget::new(single.budget.mem * n, single.budget.cpu * n),
            "cost of {n} additions"
        );
    }
}

#[test]
fn structural_reduction_is_free() {
    // Lambdas, variables, delays, and forces carry no charge of their own.
    let term = Term::force(Term::delay(Term::apply(
        Term::lambda(Term::var(0)),
        Term::constant(5),
    )));
    let report = run_v1(&term);
    report.result.expect("evaluation succeeds");
    assert_eq!(report.budget, ExBudget::ZERO);
}

// ══════════════════════════════════════════════════════════════════════════════
// Partial application
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn partial_application_costs_the_same_as_direct() {
    // Routing the partially applied builtin through an identity lambda
    // changes the reduction path, not the charge: only the saturating
    // application is costed.
    let direct = add(Term::constant(3), Term::constant(4));
    let routed = Term::apply(
        Term::apply(
            Term::lambda(Term::var(0)),
            Term::apply(Term::builtin(BuiltinFun::AddInteger), Term::constant(3)),
        ),
        Term::constant(4),
    );

    let direct_report = run_v1(&direct);
    let routed_report = run_v1(&routed);

    let direct_value = direct_report.result.expect("direct application succeeds");
    let routed_value = routed_report.result.expect("routed application succeeds");
    assert_eq!(direct_value.to_term(), Term::constant(7));
    assert_eq!(routed_value.to_term(), Term::constant(7));
    assert_eq!(direct_report.budget, routed_report.budget);
}

// ══════════════════════════════════════════════════════════════════════════════
// Ceilings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn budget_ceiling_stops_evaluation() {
    let report = Machine::new(CostModel::v1())
        .with_budget_limit(ExBudget::ZERO)
        .run(&nested_additions(1));
    assert!(matches!(
        report.result,
        Err(MachineError::BudgetExceeded(_))
    ));
}

#[test]
fn budget_under_the_ceiling_passes() {
    let generous = ExBudget::new(u64::MAX, u64::MAX);
    let report = Machine::new(CostModel::v1())
        .with_budget_limit(generous)
        .run(&nested_additions(3));
    report.result.expect("well under the ceiling");
}

#[test]
fn ceiling_failure_reports_spend_so_far() {
    // The first addition is charged before the ceiling trips; the report
    // still carries that spend.
    let single = run_v1(&nested_additions(1)).budget;
    let report = Machine::new(CostModel::v1())
        .with_budget_limit(single)
        .run(&nested_additions(2));
    assert!(matches!(
        report.result,
        Err(MachineError::BudgetExceeded(_))
    ));
    assert_eq!(report.budget, ExBudget::new(single.mem * 2, single.cpu * 2));
}

// ══════════════════════════════════════════════════════════════════════════════
// Version coverage
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn v1_rejects_secp_verifiers_before_any_work() {
    // The offending builtin sits in an unreached position; coverage is
    // checked structurally before reduction, so nothing is charged.
    let term = Term::apply(
        Term::lambda(Term::constant(1)),
        Term::builtin(BuiltinFun::VerifyEcdsaSecp256k1Signature),
    );

    let report = run_v1(&term);
    assert_eq!(
        report.result.expect_err("V1 has no entry for the verifier"),
        MachineError::UnsupportedBuiltin {
            fun: BuiltinFun::VerifyEcdsaSecp256k1Signature,
            version: CostModelVersion::V1,
        }
    );
    assert_eq!(report.budget, ExBudget::ZERO);

    let report = Machine::new(CostModel::v2()).run(&term);
    let value = report.result.expect("V2 covers the verifier");
    assert_eq!(value.to_term(), Term::constant(1));
}

// ══════════════════════════════════════════════════════════════════════════════
// Serde
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn budget_serializes_as_mem_and_cpu() {
    let budget = ExBudget::new(12, 345);
    let json = serde_json::to_value(budget).expect("serialize budget");
    assert_eq!(json, serde_json::json!({ "mem": 12, "cpu": 345 }));

    let back: ExBudget = serde_json::from_value(json).expect("deserialize budget");
    assert_eq!(back, budget);
}

#[test]
fn cost_models_round_trip_through_json() {
    for model in [CostModel::v1(), CostModel::v2()] {
        let json = serde_json::to_string(&model).expect("serialize model");
        let back: CostModel = serde_json::from_str(&json).expect("deserialize model");
        assert_eq!(back, model);
    }
}
