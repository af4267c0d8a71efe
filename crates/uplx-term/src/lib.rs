//! Shared term layer for UPLX.
//!
//! This crate defines the UPLC term AST, typed constants, the structured
//! `Data` value used by on-chain contracts, the closed builtin tag set,
//! and the sharing wrapper used to deduplicate term graphs.

mod builtin;
mod constant;
mod data;
mod share;
mod term;

pub use builtin::BuiltinFun;
pub use constant::Constant;
pub use data::Data;
pub use share::{ShareId, SharedTerm};
pub use term::Term;
