//! Sequent calculi.
//!
//! A sequent consists of sides (usually two, the antecedent and the succedent),
//! each being a sequence of formulas and context variables.
//! A context variable stands for any sequence of formulas and context variables.
//!
//! Rules are trees whose root is the conclusion and whose children are the premises.
//! Proofs are trees of the same shape, whose leaves are axioms or premises.

mod calculus;
mod instances;
mod matching;
mod reduce;

pub use calculus::{inference_to_sequent, SequentCalculus, PREMISE};
pub use reduce::Opt;

use crate::{Formula, Language, Subst, Symbol};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Element of a sequent side.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Item {
    Formula(Formula),
    Context(Symbol),
}

impl Item {
    pub fn context(c: impl Into<Symbol>) -> Self {
        Self::Context(c.into())
    }

    pub fn formula(&self) -> Option<&Formula> {
        match self {
            Self::Formula(fm) => Some(fm),
            Self::Context(_) => None,
        }
    }
}

impl From<Formula> for Item {
    fn from(fm: Formula) -> Self {
        Self::Formula(fm)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formula(fm) => fm.fmt(f),
            Self::Context(c) => c.fmt(f),
        }
    }
}

/// Sequence of sides.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Sequent(pub Vec<Vec<Item>>);

impl Sequent {
    /// Create a two-sided sequent.
    pub fn new(antecedent: impl IntoIterator<Item = Item>, succedent: impl IntoIterator<Item = Item>) -> Self {
        Self(Vec::from([antecedent.into_iter().collect(), succedent.into_iter().collect()]))
    }

    pub fn sides(&self) -> usize {
        self.0.len()
    }

    pub fn antecedent(&self) -> &[Item] {
        self.0.first().map_or(&[], |side| &side[..])
    }

    pub fn succedent(&self) -> &[Item] {
        self.0.last().map_or(&[], |side| &side[..])
    }

    /// Return the metavariables and context variables occurring in the sequent.
    pub fn variables(&self) -> Vec<&Symbol> {
        let mut vars = Vec::new();
        for item in self.0.iter().flatten() {
            match item {
                Item::Formula(fm) => vars.extend(fm.metavariables()),
                Item::Context(c) => vars.push(c),
            }
        }
        vars
    }

    /// Replace metavariables and context variables by what they are bound to.
    ///
    /// Fail with the first unbound variable.
    ///
    /// ~~~
    /// # use logics::{Formula, Subst, Symbol};
    /// # use logics::sequent::{Item, Sequent};
    /// let (a, p) = (Formula::meta("A"), Formula::atom("p"));
    /// let (g, d) = (Item::context("Γ"), Item::context("Δ"));
    /// let schema = Sequent::new([g.clone(), a.clone().into()], [d.clone()]);
    /// let mut sub = Subst::new();
    /// assert!(sub.bind(&Symbol::from("A"), &-p.clone()));
    /// assert!(sub.bind_context(&Symbol::from("Γ"), &[d.clone(), p.clone().into()]));
    /// assert_eq!(schema.instantiate(&sub), Err(Symbol::from("Δ")));
    /// assert!(sub.bind_context(&Symbol::from("Δ"), &[]));
    /// let seq = schema.instantiate(&sub).unwrap();
    /// assert_eq!(seq.to_string(), "Δ, p, ~p ⇒");
    /// ~~~
    pub fn instantiate(&self, sub: &Subst) -> Result<Self, Symbol> {
        let mut sides = Vec::with_capacity(self.0.len());
        for side in &self.0 {
            let mut items = Vec::new();
            for item in side {
                match item {
                    Item::Formula(fm) => items.push(Item::Formula(fm.instantiate(sub)?)),
                    Item::Context(c) => items.extend_from_slice(sub.get_context(c).ok_or_else(|| c.clone())?),
                }
            }
            sides.push(items)
        }
        Ok(Self(sides))
    }

    /// Return why the sequent is not well-formed in the language.
    pub fn check(&self, language: &Language) -> Result<(), String> {
        for item in self.0.iter().flatten() {
            match item {
                Item::Formula(fm) => language.check(fm)?,
                Item::Context(c) if language.is_context_variable(c) => (),
                Item::Context(c) => return Err(format!("{} is not a context variable of the language", c)),
            }
        }
        Ok(())
    }

    /// Return the largest number of times an item occurs in a side.
    pub fn max_apparitions(&self) -> usize {
        let count = |side: &Vec<Item>| side.iter().map(|x| side.iter().filter(|y| x == *y).count()).max();
        self.0.iter().filter_map(count).max().unwrap_or(0)
    }
}

/// Two sides are separated by `⇒`, more sides by `|`.
impl Display for Sequent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.0.len() == 2 { "⇒" } else { "|" };
        let mut written = false;
        for (i, side) in self.0.iter().enumerate() {
            if i > 0 {
                let before = if written { " " } else { "" };
                let after = if side.is_empty() { "" } else { " " };
                write!(f, "{}{}{}", before, sep, after)?;
                written = true
            }
            for (j, item) in side.iter().enumerate() {
                write!(f, "{}{}", if j > 0 { ", " } else { "" }, item)?;
                written = true
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let seq = Sequent::new([Item::context("Γ"), (p.clone() | q.clone()).into()], [q.clone().into()]);
        assert_eq!(seq.to_string(), "Γ, (p ∨ q) ⇒ q");
        assert_eq!(Sequent::new([], [p.clone().into()]).to_string(), "⇒ p");
        let three = Sequent(Vec::from([Vec::from([p.into()]), Vec::new(), Vec::from([q.into()])]));
        assert_eq!(three.to_string(), "p | | q");
    }

    #[test]
    fn check() {
        let lang = Language::classical();
        let p = Formula::atom("p");
        assert!(Sequent::new([Item::context("Γ")], [p.clone().into()]).check(&lang).is_ok());
        assert!(Sequent::new([Item::context("X")], [p.clone().into()]).check(&lang).is_err());
        assert!(Sequent::new([], [Formula::atom("x").into()]).check(&lang).is_err());
    }

    #[test]
    fn apparitions() {
        let p: Item = Formula::atom("p").into();
        let seq = Sequent::new([p.clone(), Item::context("Γ"), p.clone()], [p.clone()]);
        assert_eq!(seq.max_apparitions(), 2);
        assert_eq!(Sequent::new([], []).max_apparitions(), 0);
    }
}
