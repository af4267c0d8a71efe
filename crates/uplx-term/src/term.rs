//! UPLC term AST.
//!
//! Terms are immutable once built. Recursive positions hold [`Rc`] so that
//! subterms can be referenced from several use sites without copying; the
//! [`Term::Shared`] wrapper additionally gives such a node a stable identity
//! (see [`crate::SharedTerm`]).

use crate::{BuiltinFun, Constant, ShareId, SharedTerm};
use std::fmt;
use std::rc::Rc;

/// A UPLC term.
///
/// Variable references are positional (de Bruijn): `Var(0)` refers to the
/// binding introduced by the nearest enclosing lambda, `Var(1)` to the next
/// one out, and so on.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// De Bruijn variable reference (0-based).
    Var(usize),
    /// `(lam body)` — a single-parameter abstraction.
    Lambda(Rc<Term>),
    /// `[function argument]`.
    Apply {
        function: Rc<Term>,
        argument: Rc<Term>,
    },
    /// A typed literal.
    Constant(Constant),
    /// A reference to one of the fixed builtin operations.
    Builtin(BuiltinFun),
    /// `(delay t)` — suspend evaluation of `t`.
    Delay(Rc<Term>),
    /// `(force t)` — resume a delayed term.
    Force(Rc<Term>),
    /// Explicit failure, with an optional diagnostic message.
    Error(Option<String>),
    /// A subterm with a stable sharing identity.
    ///
    /// Sharing affects how a term graph is materialized (one logical node,
    /// many use sites); it does not memoize evaluation.
    Shared(Rc<SharedTerm>),
}

impl Term {
    pub fn var(index: usize) -> Self {
        Term::Var(index)
    }

    pub fn lambda(body: Term) -> Self {
        Term::Lambda(Rc::new(body))
    }

    pub fn apply(function: Term, argument: Term) -> Self {
        Term::Apply {
            function: Rc::new(function),
            argument: Rc::new(argument),
        }
    }

    /// Apply `function` to each argument in order.
    pub fn apply_many<I: IntoIterator<Item = Term>>(function: Term, arguments: I) -> Self {
        arguments
            .into_iter()
            .fold(function, |f, a| Term::apply(f, a))
    }

    pub fn constant(value: impl Into<Constant>) -> Self {
        Term::Constant(value.into())
    }

    pub fn builtin(fun: BuiltinFun) -> Self {
        Term::Builtin(fun)
    }

    pub fn delay(term: Term) -> Self {
        Term::Delay(Rc::new(term))
    }

    pub fn force(term: Term) -> Self {
        Term::Force(Rc::new(term))
    }

    pub fn error() -> Self {
        Term::Error(None)
    }

    pub fn error_with(message: impl Into<String>) -> Self {
        Term::Error(Some(message.into()))
    }

    /// Wrap a term with a sharing identity.
    ///
    /// Idempotent: re-wrapping a term already shared under `id` returns a
    /// cheap handle to the existing node rather than a nested wrapper.
    pub fn shared(id: ShareId, term: Rc<Term>) -> Self {
        if let Term::Shared(existing) = &*term {
            if existing.id == id {
                return Term::Shared(Rc::clone(existing));
            }
        }
        Term::Shared(Rc::new(SharedTerm { id, term }))
    }
}

impl fmt::Display for Term {
    /// Renders the conventional UPLC surface syntax. Diagnostic only —
    /// this crate defines no wire format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(i) => write!(f, "(var {i})"),
            Term::Lambda(body) => write!(f, "(lam {body})"),
            Term::Apply { function, argument } => write!(f, "[{function} {argument}]"),
            Term::Constant(c) => write!(f, "(con {c})"),
            Term::Builtin(fun) => write!(f, "(builtin {fun})"),
            Term::Delay(t) => write!(f, "(delay {t})"),
            Term::Force(t) => write!(f, "(force {t})"),
            Term::Error(_) => write!(f, "(error)"),
            Term::Shared(s) => write!(f, "{}", s.term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_many_associates_left() {
        let t = Term::apply_many(
            Term::builtin(BuiltinFun::AddInteger),
            [Term::constant(1), Term::constant(2)],
        );
        let expected = Term::apply(
            Term::apply(Term::builtin(BuiltinFun::AddInteger), Term::constant(1)),
            Term::constant(2),
        );
        assert_eq!(t, expected);
    }

    #[test]
    fn display_round_structure() {
        let t = Term::force(Term::delay(Term::constant(5)));
        assert_eq!(t.to_string(), "(force (delay (con integer 5)))");
    }
}
