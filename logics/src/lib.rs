//! Proof representation and proof search for propositional logics.
//!
//! This crate provides:
//!
//! * formulas over configurable languages, with schematic matching and substitution,
//! * natural deduction derivations with a checker and a solver,
//! * tableaux for classical, many-valued and metainferential logics,
//!   again with a checker and a solver, and
//! * sequent calculi with a checker and a cut-free reducer.
#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod error;
mod formula;
mod indexed;
mod inference;
mod language;
mod matching;
pub mod nd;
mod rewind;
pub mod sequent;
mod subst;
mod symbol;
pub mod tableaux;
pub mod tree;

pub use error::{CorrectionError, ErrorCode, ErrorKind, Location, SolveError};
pub use formula::Formula;
pub use indexed::Indexed;
pub use inference::{Inference, Statement};
pub use language::Language;
pub use rewind::Rewind;
pub use subst::{Ptr, Subst};
pub use symbol::Symbol;
pub use tree::Node;

use alloc::vec::Vec;

/// Return all orderings of the given elements, starting with the original one.
///
/// ~~~
/// let perms = logics::permutations(&[1, 2, 3]);
/// assert_eq!(perms.len(), 6);
/// assert_eq!(perms[0], vec![1, 2, 3]);
/// assert!(perms.contains(&vec![3, 1, 2]));
/// ~~~
pub fn permutations<T: Clone>(xs: &[T]) -> Vec<Vec<T>> {
    if xs.is_empty() {
        return Vec::from([Vec::new()]);
    }
    let mut result = Vec::new();
    for i in 0..xs.len() {
        let mut rest = xs.to_vec();
        let x = rest.remove(i);
        for mut perm in permutations(&rest) {
            perm.insert(0, x.clone());
            result.push(perm)
        }
    }
    result
}
