//! Machine values — the results of completed compute steps.

use crate::env::Env;
use crate::error::{EvalResult, MachineError};
use std::fmt;
use std::rc::Rc;
use uplx_term::{BuiltinFun, Constant, Term};

/// The result of a completed compute step.
#[derive(Debug, Clone)]
pub enum Value {
    Constant(Constant),
    /// A lambda together with its captured environment. No reduction
    /// happens under the binder.
    Lambda { body: Rc<Term>, env: Env },
    /// A delayed term together with its captured environment.
    Delay { body: Rc<Term>, env: Env },
    /// A builtin applied to fewer arguments than its arity.
    Builtin(PartialBuiltin),
}

impl Value {
    pub fn unit() -> Self {
        Value::Constant(Constant::Unit)
    }

    pub fn bool(b: bool) -> Self {
        Value::Constant(Constant::Bool(b))
    }

    pub fn integer(n: impl Into<num_bigint::BigInt>) -> Self {
        Value::Constant(Constant::integer(n))
    }

    /// Short description of the value's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Constant(c) => c.kind_name(),
            Value::Lambda { .. } => "lambda",
            Value::Delay { .. } => "delayed term",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Abstract size in 64-bit words, the measure cost formulas take.
    /// Non-constant values occupy a single word.
    pub fn mem_size(&self) -> u64 {
        match self {
            Value::Constant(c) => c.mem_size(),
            Value::Lambda { .. } | Value::Delay { .. } | Value::Builtin(_) => 1,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Discharge the value back to a term.
    ///
    /// Constants and builtin accumulations discharge exactly; lambda and
    /// delay closures discharge to their captured bodies (free variables in
    /// the body still refer to the captured environment, which a term
    /// cannot carry — callers use this for constant folding and
    /// diagnostics, where the result is a constant or a closed term).
    pub fn to_term(&self) -> Term {
        match self {
            Value::Constant(c) => Term::Constant(c.clone()),
            Value::Lambda { body, .. } => Term::Lambda(Rc::clone(body)),
            Value::Delay { body, .. } => Term::Delay(Rc::clone(body)),
            Value::Builtin(partial) => partial
                .args
                .iter()
                .fold(Term::Builtin(partial.fun), |f, arg| {
                    Term::apply(f, arg.to_term())
                }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(c) => write!(f, "(con {c})"),
            Value::Lambda { body, .. } => write!(f, "(lam {body})"),
            Value::Delay { body, .. } => write!(f, "(delay {body})"),
            Value::Builtin(partial) => {
                write!(f, "(builtin {}", partial.fun)?;
                for arg in &partial.args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A builtin with its accumulated arguments and explicit arity bookkeeping.
#[derive(Debug, Clone)]
pub struct PartialBuiltin {
    pub fun: BuiltinFun,
    pub args: Vec<Value>,
}

impl PartialBuiltin {
    /// A builtin reference with no arguments applied yet.
    pub fn new(fun: BuiltinFun) -> Self {
        PartialBuiltin {
            fun,
            args: Vec::new(),
        }
    }

    /// Arguments still needed before the builtin evaluates.
    pub fn remaining(&self) -> usize {
        self.fun.arity().saturating_sub(self.args.len())
    }

    /// `true` once every declared argument has been collected.
    pub fn saturated(&self) -> bool {
        self.remaining() == 0
    }

    /// Accumulate one argument. Accumulating past the declared arity is a
    /// contract violation, never a silent truncation.
    pub fn push_arg(&mut self, arg: Value) -> EvalResult<()> {
        if self.saturated() {
            return Err(MachineError::ArityViolation(format!(
                "{} takes {} arguments, got one more",
                self.fun,
                self.fun.arity()
            )));
        }
        self.args.push(arg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_up_to_arity() {
        let mut partial = PartialBuiltin::new(BuiltinFun::AddInteger);
        assert_eq!(partial.remaining(), 2);
        partial.push_arg(Value::integer(1)).expect("first arg");
        partial.push_arg(Value::integer(2)).expect("second arg");
        assert!(partial.saturated());
    }

    #[test]
    fn one_past_arity_is_a_violation() {
        let mut partial = PartialBuiltin::new(BuiltinFun::LengthOfByteString);
        partial
            .push_arg(Value::Constant(Constant::byte_string(vec![1])))
            .expect("only arg");
        let err = partial.push_arg(Value::integer(0)).unwrap_err();
        assert!(matches!(err, MachineError::ArityViolation(_)));
    }

    #[test]
    fn discharge_of_partial_builtin_reapplies_args() {
        let mut partial = PartialBuiltin::new(BuiltinFun::AddInteger);
        partial.push_arg(Value::integer(3)).expect("arg");
        let term = Value::Builtin(partial).to_term();
        assert_eq!(
            term,
            Term::apply(Term::builtin(BuiltinFun::AddInteger), Term::constant(3))
        );
    }
}
