//! CEK evaluation machine for UPLC terms.
//!
//! Executes a fully elaborated term graph and reports the result value,
//! the execution units spent, and the ordered trace log. Evaluation is
//! synchronous, single-threaded, and deterministic: the same term with the
//! same cost model yields an identical result, budget, and log sequence on
//! every run.
//!
//! Two entry points exist: [`Machine::eval_simple`] performs budget-free
//! structural reduction (used for constant folding by an external compiler);
//! [`Machine::run`] meters every builtin application against a versioned
//! [`CostModel`] and enforces optional budget and step ceilings.

mod budget;
mod builtins;
mod cost;
mod env;
mod error;
mod machine;
mod value;

pub use budget::ExBudget;
pub use cost::{BuiltinCost, CostModel, CostModelVersion, CostingFun};
pub use env::{Closure, Env};
pub use error::{EvalResult, MachineError};
pub use machine::{EvalReport, Machine};
pub use value::{PartialBuiltin, Value};
