//! Tableaux.
//!
//! A tableau is a tree whose nodes carry labels,
//! such as formulas with an optional index.
//! It starts from the premises of a goal and (depending on the system)
//! the negated or indexed conclusions,
//! and grows by rule applications, which append the expansion of a rule
//! to all open branches below the node the rule was applied to.
//!
//! The checker and the solver are shared by all systems implementing [`Tableaux`].

mod check;
mod instances;
pub mod meta;
mod rules;
mod solve;
mod system;

pub use meta::{MetaSystem, Standard};
pub use rules::Rules;
pub use system::{Closure, Start, System};

use crate::error::CorrectionError;
use crate::tree::{Node, Path};
use crate::{Formula, Indexed, SolveError, Subst, Symbol};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;

/// Formula with an optional index, as found in tableaux nodes.
pub type Entry = Indexed<Formula, Option<u8>>;

/// Label of a tableau node that can be matched against schematic labels.
pub trait Label: Clone + PartialEq + Display {
    /// Substitution for the variables in schematic labels.
    type Sub: Clone + Default;

    /// Match the label against a schema, extending the substitution.
    fn match_with(&self, pattern: &Self, sub: &mut Self::Sub) -> bool;

    /// Replace variables in a schematic label.
    fn instantiate(&self, sub: &Self::Sub) -> Result<Self, Symbol>;
}

/// A pattern without index matches entries with any index.
impl Label for Entry {
    type Sub = Subst;

    fn match_with(&self, pattern: &Self, sub: &mut Subst) -> bool {
        let index = pattern.1.is_none() || pattern.1 == self.1;
        index && self.0.match_with(&pattern.0, sub)
    }

    fn instantiate(&self, sub: &Subst) -> Result<Self, Symbol> {
        Ok(Indexed(self.0.instantiate(sub)?, self.1))
    }
}

/// Part of a goal that a tableau starts from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Premise,
    Conclusion,
}

/// Initial node of a tableau, stemming from the `index`-th premise or conclusion of a goal.
#[derive(Clone, Debug)]
pub struct Initial<L> {
    pub role: Role,
    pub index: usize,
    pub label: L,
}

/// Solver options.
#[derive(Copy, Clone, Debug)]
pub struct Opt {
    /// maximal length of a branch
    pub max_depth: usize,
}

impl Default for Opt {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Tableau system.
///
/// Branches are given as the labels from the root to some node.
pub trait Tableaux {
    type Label: Label;
    type Goal: Display;

    /// Names of the rules, in the order in which the solver tries them.
    fn rule_names(&self) -> Vec<Symbol>;

    /// If the rule is applicable to the last node of the branch,
    /// return the instantiated expansion.
    ///
    /// The root of the returned tree is the node the rule is applied to,
    /// and its descendants are the nodes the rule adds.
    fn application(&self, rule: &str, branch: &[&Self::Label]) -> Option<Node<Self::Label>>;

    fn branch_is_closed(&self, branch: &[&Self::Label]) -> bool;

    /// Return the nodes a tableau for the goal starts with.
    fn initial(&self, goal: &Self::Goal) -> Result<Vec<Initial<Self::Label>>, String>;

    /// Verify that a label is well-formed.
    fn check_label(&self, label: &Self::Label) -> Result<(), String>;

    fn rule_is_applicable(&self, tree: &Node<Self::Label>, path: &[usize], rule: &str) -> bool {
        match labels(tree, path) {
            Some(branch) => self.application(rule, &branch).is_some(),
            None => false,
        }
    }

    /// Return true if all branches of the tree are closed.
    fn tree_is_closed(&self, tree: &Node<Self::Label>) -> bool {
        let leaves = tree.leaves();
        let closed = |(path, _): (Path, _)| labels(tree, &path).map_or(false, |b| self.branch_is_closed(&b));
        leaves.into_iter().all(closed)
    }

    /// Check whether a tree is a correct tableau,
    /// optionally verifying that it starts from a given goal.
    fn is_correct_tree(
        &self,
        tree: &Node<Self::Label>,
        goal: Option<&Self::Goal>,
        exit_on_first_error: bool,
    ) -> Result<(), Vec<CorrectionError>> {
        check::is_correct_tree(self, tree, goal, exit_on_first_error)
    }

    /// Build a tableau for the goal.
    ///
    /// The result may have open branches if the goal is invalid.
    fn solve_tree(&self, goal: &Self::Goal, opt: Opt) -> Result<Node<Self::Label>, SolveError> {
        solve::solve_tree(self, goal, opt)
    }

    /// Return true if the solved tableau for the goal is closed.
    fn is_valid(&self, goal: &Self::Goal) -> Result<bool, SolveError> {
        Ok(self.tree_is_closed(&self.solve_tree(goal, Opt::default())?))
    }
}

/// Return the labels from the root to the node at the path.
pub(crate) fn labels<'a, L>(tree: &'a Node<L>, path: &[usize]) -> Option<Vec<&'a L>> {
    let branch = tree.branch(path)?;
    Some(branch.into_iter().map(|n| &n.content).collect())
}
