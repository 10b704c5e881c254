use crate::sequent::Item;
use crate::{Formula, Rewind, Symbol};
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::iter::FromIterator;
use hashbrown::HashMap;

/// Assignment of formulas to metavariables and
/// of sequences of formulas and context variables to context variables.
///
/// Bindings are recorded in the order they are made,
/// so that a substitution can be restored to an earlier state
/// via [`Ptr`].
#[derive(Clone, Debug, Default)]
pub struct Subst {
    formulas: HashMap<Symbol, Formula>,
    contexts: HashMap<Symbol, Vec<Item>>,
    /// variables in the order in which they were bound
    trail: Vec<Symbol>,
}

/// Number of bindings of a substitution at some point.
#[derive(Copy, Clone, Debug)]
pub struct Ptr(usize);

impl Subst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of bound variables.
    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn get(&self, m: &str) -> Option<&Formula> {
        self.formulas.get(m)
    }

    pub fn get_context(&self, c: &str) -> Option<&[Item]> {
        self.contexts.get(c).map(|items| &items[..])
    }

    /// Bind a metavariable, failing if it is already bound to a different formula.
    pub fn bind(&mut self, m: &Symbol, fm: &Formula) -> bool {
        match self.formulas.get(m) {
            Some(old) => old == fm,
            None => {
                self.formulas.insert(m.clone(), fm.clone());
                self.trail.push(m.clone());
                true
            }
        }
    }

    /// Bind a context variable, failing if it is already bound to a different sequence.
    pub fn bind_context(&mut self, c: &Symbol, items: &[Item]) -> bool {
        match self.contexts.get(c) {
            Some(old) => old[..] == *items,
            None => {
                self.contexts.insert(c.clone(), items.to_vec());
                self.trail.push(c.clone());
                true
            }
        }
    }
}

impl PartialEq for Subst {
    fn eq(&self, other: &Self) -> bool {
        self.formulas == other.formulas && self.contexts == other.contexts
    }
}

impl Eq for Subst {}

impl FromIterator<(Symbol, Formula)> for Subst {
    fn from_iter<I: IntoIterator<Item = (Symbol, Formula)>>(iter: I) -> Self {
        let mut sub = Self::new();
        for (m, fm) in iter {
            sub.bind(&m, &fm);
        }
        sub
    }
}

impl Display for Subst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "{".fmt(f)?;
        for (i, v) in self.trail.iter().enumerate() {
            if i > 0 {
                ", ".fmt(f)?;
            }
            if let Some(fm) = self.formulas.get(v) {
                write!(f, "{} ↦ {}", v, fm)?;
            } else if let Some(items) = self.contexts.get(v) {
                write!(f, "{} ↦ [", v)?;
                for (j, item) in items.iter().enumerate() {
                    write!(f, "{}{}", if j > 0 { ", " } else { "" }, item)?;
                }
                "]".fmt(f)?;
            }
        }
        "}".fmt(f)
    }
}

impl From<&Subst> for Ptr {
    fn from(sub: &Subst) -> Self {
        Self(sub.len())
    }
}

impl Rewind<Ptr> for Subst {
    fn rewind(&mut self, ptr: Ptr) {
        for v in self.trail.drain(ptr.0..) {
            if self.formulas.remove(&v).is_none() {
                self.contexts.remove(&v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn bind_rewind() {
        let (a, b, g) = (Symbol::from("A"), Symbol::from("B"), Symbol::from("Γ"));
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let mut sub = Subst::new();
        assert!(sub.bind(&a, &p));
        assert!(sub.bind(&a, &p));
        assert!(!sub.bind(&a, &q));
        let ptr = Ptr::from(&sub);
        assert!(sub.bind(&b, &-q.clone()));
        assert!(sub.bind_context(&g, &[p.clone().into(), q.clone().into()]));
        assert_eq!(sub.to_string(), "{A ↦ p, B ↦ ~q, Γ ↦ [p, q]}");
        sub.rewind(ptr);
        assert_eq!(sub.to_string(), "{A ↦ p}");
        assert_eq!(sub.get_context("Γ"), None);
        assert!(sub.bind(&b, &q));
    }
}
