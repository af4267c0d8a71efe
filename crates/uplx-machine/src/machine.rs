//! The CEK machine: an iterative compute/return loop over an explicit
//! frame stack.
//!
//! Native call recursion is replaced by a heap-allocated `Vec` of pending
//! frames, so evaluation depth is bounded by memory rather than the host
//! call stack, and an optional step ceiling can bound work on adversarial
//! input.

use crate::budget::ExBudget;
use crate::cost::CostModel;
use crate::env::{Closure, Env};
use crate::error::{EvalResult, MachineError};
use crate::value::{PartialBuiltin, Value};
use std::rc::Rc;
use uplx_term::{BuiltinFun, Term};

/// A pending continuation on the frame stack.
#[derive(Debug)]
enum Frame {
    /// The function position of an application is being computed; the
    /// argument term waits with the environment it must be computed in.
    AwaitFunction { argument: Rc<Term>, env: Env },
    /// The argument position is being computed. The closure is what a
    /// lambda binds — the argument term with its environment, so each
    /// variable occurrence recomputes the referenced subterm.
    AwaitArgument { function: Value, argument: Closure },
    /// The forced term is being computed.
    AwaitForce,
}

/// The machine's current logical step.
#[derive(Debug)]
enum State {
    Compute { term: Rc<Term>, env: Env },
    Return(Value),
}

/// The terminal outcome of one evaluation call.
///
/// On failure the budget and logs accumulated up to the failure point are
/// retained for diagnostics.
#[derive(Debug)]
pub struct EvalReport {
    pub result: Result<Value, MachineError>,
    pub budget: ExBudget,
    pub logs: Vec<String>,
}

/// One evaluation call's worth of machine state.
///
/// A machine is constructed per evaluation and holds no cross-call state;
/// the cost model it borrows nothing from and may be shared freely across
/// concurrently running evaluations.
pub struct Machine {
    frames: Vec<Frame>,
    spent: ExBudget,
    budget_limit: Option<ExBudget>,
    step_limit: Option<u64>,
    steps: u64,
    pub(crate) logs: Vec<String>,
    costs: Option<CostModel>,
}

impl Machine {
    /// A metered machine charging builtin applications against `costs`.
    pub fn new(costs: CostModel) -> Self {
        Machine {
            frames: Vec::new(),
            spent: ExBudget::ZERO,
            budget_limit: None,
            step_limit: None,
            steps: 0,
            logs: Vec::new(),
            costs: Some(costs),
        }
    }

    fn unmetered() -> Self {
        Machine {
            frames: Vec::new(),
            spent: ExBudget::ZERO,
            budget_limit: None,
            step_limit: None,
            steps: 0,
            logs: Vec::new(),
            costs: None,
        }
    }

    /// Fail with [`MachineError::BudgetExceeded`] once spent units pass the
    /// ceiling.
    pub fn with_budget_limit(mut self, ceiling: ExBudget) -> Self {
        self.budget_limit = Some(ceiling);
        self
    }

    /// Fail with [`MachineError::BudgetExceeded`] after `limit` machine
    /// steps, bounding work on non-terminating terms.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Budget-free structural reduction.
    ///
    /// Used for constant folding by an external compiler: no cost model,
    /// no builtin-coverage pre-scan, no ceilings. Trace output is
    /// discarded.
    pub fn eval_simple(term: &Term) -> EvalResult<Value> {
        Machine::unmetered().evaluate(term)
    }

    /// Full metered evaluation. Never panics; all failures are carried in
    /// the report.
    pub fn run(mut self, term: &Term) -> EvalReport {
        let result = self.evaluate(term);
        EvalReport {
            result,
            budget: self.spent,
            logs: self.logs,
        }
    }

    fn evaluate(&mut self, term: &Term) -> EvalResult<Value> {
        if let Some(costs) = &self.costs {
            check_builtin_coverage(term, costs)?;
        }

        // Term variants hold Rc children, so this clone is a shallow copy
        // of the top node.
        let mut state = State::Compute {
            term: Rc::new(term.clone()),
            env: Env::new(),
        };

        loop {
            self.tick()?;
            state = match state {
                State::Compute { term, env } => self.compute(term, env)?,
                State::Return(value) => match self.frames.pop() {
                    None => return Ok(value),
                    Some(frame) => self.ret(frame, value)?,
                },
            };
        }
    }

    fn compute(&mut self, term: Rc<Term>, env: Env) -> EvalResult<State> {
        Ok(match &*term {
            Term::Var(index) => {
                // Re-enter the bound closure rather than short-circuiting
                // to Return: the referenced subterm's evaluation order (and
                // charges) must be observed at every occurrence.
                let closure = env.lookup(*index)?.clone();
                State::Compute {
                    term: closure.term,
                    env: closure.env,
                }
            }
            Term::Lambda(body) => State::Return(Value::Lambda {
                body: Rc::clone(body),
                env,
            }),
            Term::Apply { function, argument } => {
                self.frames.push(Frame::AwaitFunction {
                    argument: Rc::clone(argument),
                    env: env.clone(),
                });
                State::Compute {
                    term: Rc::clone(function),
                    env,
                }
            }
            Term::Constant(c) => State::Return(Value::Constant(c.clone())),
            Term::Builtin(fun) => State::Return(Value::Builtin(PartialBuiltin::new(*fun))),
            Term::Delay(body) => State::Return(Value::Delay {
                body: Rc::clone(body),
                env,
            }),
            Term::Force(inner) => {
                self.frames.push(Frame::AwaitForce);
                State::Compute {
                    term: Rc::clone(inner),
                    env,
                }
            }
            Term::Error(message) => return Err(MachineError::ExplicitError(message.clone())),
            // Sharing is transparent to evaluation: each occurrence is
            // computed independently.
            Term::Shared(node) => State::Compute {
                term: Rc::clone(&node.term),
                env,
            },
        })
    }

    fn ret(&mut self, frame: Frame, value: Value) -> EvalResult<State> {
        match frame {
            Frame::AwaitFunction { argument, env } => {
                self.frames.push(Frame::AwaitArgument {
                    function: value,
                    argument: Closure::new(Rc::clone(&argument), env.clone()),
                });
                Ok(State::Compute {
                    term: argument,
                    env,
                })
            }
            Frame::AwaitArgument { function, argument } => self.apply(function, value, argument),
            Frame::AwaitForce => match value {
                Value::Delay { body, env } => Ok(State::Compute { term: body, env }),
                other => Err(MachineError::ForceNonDelay(format!(
                    "expected a delayed term, got {}",
                    other.kind_name()
                ))),
            },
        }
    }

    /// Apply a function value to a computed argument.
    ///
    /// Lambdas bind the argument *closure* (term + captured environment);
    /// builtins accumulate the argument *value* and evaluate once
    /// saturated.
    fn apply(
        &mut self,
        function: Value,
        arg_value: Value,
        arg_closure: Closure,
    ) -> EvalResult<State> {
        match function {
            Value::Lambda { body, env } => Ok(State::Compute {
                term: body,
                env: env.extend(arg_closure),
            }),
            Value::Builtin(mut partial) => {
                partial.push_arg(arg_value)?;
                if partial.saturated() {
                    let sizes: Vec<u64> = partial.args.iter().map(Value::mem_size).collect();
                    let result = self.eval_builtin(partial.fun, &partial.args)?;
                    self.charge_builtin(partial.fun, &sizes)?;
                    Ok(State::Return(result))
                } else {
                    Ok(State::Return(Value::Builtin(partial)))
                }
            }
            other => Err(MachineError::TypeMismatch(format!(
                "cannot apply an argument to a {}",
                other.kind_name()
            ))),
        }
    }

    /// Charge one successful builtin application against the cost model.
    fn charge_builtin(&mut self, fun: BuiltinFun, sizes: &[u64]) -> EvalResult<()> {
        let Some(costs) = &self.costs else {
            return Ok(());
        };
        // Coverage was checked before evaluation started.
        let cost = costs
            .cost_of(fun)
            .ok_or_else(|| MachineError::UnsupportedBuiltin {
                fun,
                version: costs.version(),
            })?;
        self.spent += cost.charge(sizes);
        if let Some(ceiling) = &self.budget_limit {
            if self.spent.exceeds(ceiling) {
                return Err(MachineError::BudgetExceeded(format!(
                    "spent {} over ceiling {ceiling}",
                    self.spent
                )));
            }
        }
        Ok(())
    }

    /// Count one machine step. Fails once the optional step ceiling is
    /// passed.
    fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(MachineError::BudgetExceeded(format!(
                "step ceiling {limit} exceeded"
            ))),
            _ => Ok(()),
        }
    }
}

/// Reject terms that reference a builtin the selected cost model does not
/// cover, before any reduction happens.
fn check_builtin_coverage(term: &Term, costs: &CostModel) -> EvalResult<()> {
    let mut pending = vec![term];
    while let Some(t) = pending.pop() {
        match t {
            Term::Builtin(fun) => {
                if !costs.supports(*fun) {
                    return Err(MachineError::UnsupportedBuiltin {
                        fun: *fun,
                        version: costs.version(),
                    });
                }
            }
            Term::Lambda(body) | Term::Delay(body) | Term::Force(body) => pending.push(body),
            Term::Apply { function, argument } => {
                pending.push(function);
                pending.push(argument);
            }
            Term::Shared(node) => pending.push(&node.term),
            Term::Var(_) | Term::Constant(_) | Term::Error(_) => {}
        }
    }
    Ok(())
}
