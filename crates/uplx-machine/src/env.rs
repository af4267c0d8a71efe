//! Environments and closures.
//!
//! The environment is a persistent chain: each lambda application extends
//! the parent by one frame, sharing the tail structurally. Extension is
//! O(1); lookup walks the chain by positional distance.

use crate::error::{EvalResult, MachineError};
use std::rc::Rc;
use uplx_term::Term;

/// A suspended computation: a term paired with the environment it was
/// captured in.
#[derive(Debug, Clone)]
pub struct Closure {
    pub term: Rc<Term>,
    pub env: Env,
}

impl Closure {
    pub fn new(term: Rc<Term>, env: Env) -> Self {
        Closure { term, env }
    }
}

#[derive(Debug)]
struct EnvNode {
    closure: Closure,
    parent: Option<Rc<EnvNode>>,
}

/// A chain of variable bindings resolved by de Bruijn distance.
///
/// Cloning is cheap (one `Rc` bump); the parent chain is never mutated.
#[derive(Debug, Clone, Default)]
pub struct Env {
    head: Option<Rc<EnvNode>>,
}

impl Env {
    /// The empty environment, for closed top-level terms.
    pub fn new() -> Self {
        Env { head: None }
    }

    /// Extend with one new innermost binding, leaving `self` untouched.
    pub fn extend(&self, closure: Closure) -> Env {
        Env {
            head: Some(Rc::new(EnvNode {
                closure,
                parent: self.head.clone(),
            })),
        }
    }

    /// Resolve the binding at `distance` (0 = innermost).
    pub fn lookup(&self, distance: usize) -> EvalResult<&Closure> {
        let mut node = self.head.as_deref();
        for _ in 0..distance {
            node = node.and_then(|n| n.parent.as_deref());
        }
        node.map(|n| &n.closure)
            .ok_or(MachineError::UnboundVariable(distance))
    }

    /// Number of bindings in scope. O(depth); diagnostics only.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        depth
    }
}
