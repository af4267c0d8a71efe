//! Terminal machine failures.

use thiserror::Error;
use uplx_term::BuiltinFun;

use crate::cost::CostModelVersion;

/// A terminal evaluation failure.
///
/// Every variant stops reduction; nothing here escapes as a panic. Callers
/// distinguish "the script intentionally failed" ([`MachineError::ExplicitError`],
/// [`MachineError::BuiltinFailure`]) from "the input term is malformed"
/// ([`MachineError::UnboundVariable`] and friends) by the variant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MachineError {
    /// Function position is not callable, or a builtin argument has the
    /// wrong constant kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An argument was applied to an already-saturated builtin.
    #[error("arity violation: {0}")]
    ArityViolation(String),

    /// `force` reached a value that is not a delayed computation.
    #[error("force of a non-delayed value: {0}")]
    ForceNonDelay(String),

    /// A variable index exceeded the environment depth. This indicates a
    /// malformed input term, not a runtime condition.
    #[error("unbound variable at de Bruijn index {0}")]
    UnboundVariable(usize),

    /// An `(error)` term was reached during reduction.
    #[error("explicit error: {}", .0.as_deref().unwrap_or("no message"))]
    ExplicitError(Option<String>),

    /// A builtin received arguments of the right kind but outside its
    /// domain (division by zero, head of an empty list, invalid UTF-8, ...).
    #[error("builtin {fun} failed: {message}")]
    BuiltinFailure { fun: BuiltinFun, message: String },

    /// The input term uses a builtin the selected cost model does not
    /// cover. Surfaced before evaluation starts.
    #[error("builtin {fun} is not costed by cost model {version}")]
    UnsupportedBuiltin {
        fun: BuiltinFun,
        version: CostModelVersion,
    },

    /// The budget or step ceiling was exceeded.
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),
}

/// Result alias for machine operations.
pub type EvalResult<T> = Result<T, MachineError>;
