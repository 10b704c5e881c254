use crate::Symbol;
use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display};
use core::ops::Neg;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const NEG: &str = "~";
pub const AND: &str = "∧";
pub const OR: &str = "∨";
pub const IMP: &str = "→";
pub const IFF: &str = "↔";
pub const FALSUM: &str = "⊥";
pub const VERUM: &str = "⊤";

/// Propositional formula, possibly containing metavariables.
///
/// Sentential constants such as `⊥` are represented as atoms;
/// whether a symbol is an atomic or a sentential constant is
/// determined by the [`Language`](crate::Language).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Formula {
    /// atomic formula or sentential constant
    Atom(Symbol),
    /// placeholder for an arbitrary formula
    Meta(Symbol),
    /// constant applied to arguments
    App(Symbol, Vec<Formula>),
}

impl Formula {
    pub fn atom(a: impl Into<Symbol>) -> Self {
        Self::Atom(a.into())
    }

    pub fn meta(m: impl Into<Symbol>) -> Self {
        Self::Meta(m.into())
    }

    pub fn app(c: impl Into<Symbol>, args: impl IntoIterator<Item = Self>) -> Self {
        Self::App(c.into(), args.into_iter().collect())
    }

    pub fn bin(l: Self, c: &str, r: Self) -> Self {
        Self::app(c, [l, r])
    }

    pub fn imp(l: Self, r: Self) -> Self {
        Self::bin(l, IMP, r)
    }

    pub fn iff(l: Self, r: Self) -> Self {
        Self::bin(l, IFF, r)
    }

    pub fn falsum() -> Self {
        Self::atom(FALSUM)
    }

    pub fn verum() -> Self {
        Self::atom(VERUM)
    }

    /// Return the symbol at the root of the formula.
    pub fn main_symbol(&self) -> &Symbol {
        match self {
            Self::Atom(s) | Self::Meta(s) | Self::App(s, _) => s,
        }
    }

    /// Return the arguments if the formula is an application of the given constant.
    pub fn app_of(&self, c: &str) -> Option<&[Self]> {
        match self {
            Self::App(c2, args) if c2.as_str() == c => Some(args),
            _ => None,
        }
    }

    /// Return the negated formula if the formula is a negation.
    pub fn negated(&self) -> Option<&Self> {
        match self.app_of(NEG) {
            Some([fm]) => Some(fm),
            _ => None,
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Atom(_))
    }

    /// Return the longest distance from the root to a leaf.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// assert_eq!(p.depth(), 0);
    /// assert_eq!((-(p.clone() & q) | p).depth(), 3);
    /// ~~~
    pub fn depth(&self) -> usize {
        match self {
            Self::Atom(_) | Self::Meta(_) => 0,
            Self::App(_, args) => 1 + args.iter().map(|a| a.depth()).max().unwrap_or(0),
        }
    }

    /// Return all subformulas (including the formula itself) in pre-order.
    pub fn subformulas(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        use core::iter::once;
        match self {
            Self::Atom(_) | Self::Meta(_) => Box::new(once(self)),
            Self::App(_, args) => {
                Box::new(once(self).chain(args.iter().flat_map(|a| a.subformulas())))
            }
        }
    }

    /// Return the atoms occurring in the formula, possibly with repetitions.
    pub fn atomics(&self) -> impl Iterator<Item = &Symbol> {
        self.subformulas().filter_map(|fm| match fm {
            Self::Atom(a) => Some(a),
            _ => None,
        })
    }

    /// Return the metavariables occurring in the formula, possibly with repetitions.
    pub fn metavariables(&self) -> impl Iterator<Item = &Symbol> {
        self.subformulas().filter_map(|fm| match fm {
            Self::Meta(m) => Some(m),
            _ => None,
        })
    }

    /// Return true if the formula contains a metavariable.
    pub fn is_schematic(&self) -> bool {
        self.metavariables().next().is_some()
    }

    /// Replace every occurrence of `old` by `new`.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// let (p, q, r) = (Formula::atom("p"), Formula::atom("q"), Formula::atom("r"));
    /// let fm = (p.clone() & q.clone()) | -(p.clone() & q.clone());
    /// assert_eq!(fm.substitute(&(p & q), &r), r.clone() | -r);
    /// ~~~
    pub fn substitute(&self, old: &Self, new: &Self) -> Self {
        if self == old {
            return new.clone();
        }
        match self {
            Self::Atom(_) | Self::Meta(_) => self.clone(),
            Self::App(c, args) => {
                let args = args.iter().map(|a| a.substitute(old, new));
                Self::App(c.clone(), args.collect())
            }
        }
    }
}

impl Neg for Formula {
    type Output = Self;
    fn neg(self) -> Self {
        Self::app(NEG, [self])
    }
}

impl core::ops::BitAnd for Formula {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self::bin(self, AND, rhs)
    }
}

impl core::ops::BitOr for Formula {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self::bin(self, OR, rhs)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(s) | Self::Meta(s) => s.fmt(f),
            Self::App(c, args) => match &args[..] {
                [] => c.fmt(f),
                [a] => write!(f, "{}{}", c, a),
                [l, r] => write!(f, "({} {} {})", l, c, r),
                [head, tail @ ..] => {
                    write!(f, "{}({}", c, head)?;
                    tail.iter().try_for_each(|a| write!(f, ", {}", a))?;
                    write!(f, ")")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        assert_eq!((-(p.clone() & q.clone())).to_string(), "~(p ∧ q)");
        let fm = Formula::imp(-(-p.clone()), Formula::iff(q, Formula::meta("A")));
        assert_eq!(fm.to_string(), "(~~p → (q ↔ A))");
        assert_eq!(Formula::app("f", [p.clone(), p.clone(), p]).to_string(), "f(p, p, p)");
    }

    #[test]
    fn collections() {
        let (a, p) = (Formula::meta("A"), Formula::atom("p"));
        let fm = (a.clone() & p.clone()) | -a.clone();
        assert_eq!(fm.subformulas().count(), 6);
        assert_eq!(fm.atomics().count(), 1);
        assert_eq!(fm.metavariables().count(), 2);
        assert!(fm.is_schematic());
        assert!(!p.is_schematic());
        assert_eq!(fm.main_symbol().as_str(), OR);
        assert_eq!((-p.clone()).negated(), Some(&p));
        assert_eq!(p.negated(), None);
    }
}
