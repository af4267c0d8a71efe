//! Stable sharing identities for term graphs.

use crate::Term;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SHARE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a shared term node.
///
/// Minted once when a term graph is built; copies of the id are cheap
/// handles to the same logical node, never re-walked subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareId(u64);

impl ShareId {
    /// Mint a fresh, process-unique identity.
    pub fn fresh() -> Self {
        ShareId(NEXT_SHARE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A term node tagged with a sharing identity.
///
/// Multiple use sites hold `Rc` clones of one `SharedTerm`, so the wrapped
/// subtree is materialized once per graph. Evaluation is unaffected: the
/// machine computes each occurrence independently.
#[derive(Debug, PartialEq)]
pub struct SharedTerm {
    pub id: ShareId,
    pub term: Rc<Term>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(ShareId::fresh(), ShareId::fresh());
    }

    #[test]
    fn rewrap_same_id_reuses_the_node() {
        let id = ShareId::fresh();
        let shared = Term::shared(id, Rc::new(Term::constant(1)));
        let inner = match &shared {
            Term::Shared(node) => Rc::clone(node),
            other => panic!("expected shared node, got {other}"),
        };
        let rewrapped = Term::shared(id, Rc::new(shared.clone()));
        match rewrapped {
            Term::Shared(node) => assert!(Rc::ptr_eq(&node, &inner)),
            other => panic!("expected shared node, got {other}"),
        }
    }

    #[test]
    fn rewrap_different_id_nests() {
        let a = ShareId::fresh();
        let b = ShareId::fresh();
        let shared = Term::shared(a, Rc::new(Term::constant(1)));
        match Term::shared(b, Rc::new(shared)) {
            Term::Shared(node) => assert_eq!(node.id, b),
            other => panic!("expected shared node, got {other}"),
        }
    }
}
