//! Matching formulas against schemas and instantiating schemas.

use crate::subst::Ptr;
use crate::{Formula, Rewind, Subst, Symbol};
use alloc::vec::Vec;

impl Formula {
    /// Match the formula against a schema, extending the substitution.
    ///
    /// Every occurrence of a metavariable in the schema must match
    /// the same subformula.
    /// On failure, the substitution is left as it was before the call.
    pub fn match_with(&self, pattern: &Self, sub: &mut Subst) -> bool {
        let ptr = Ptr::from(&*sub);
        let matched = self.match_rec(pattern, sub);
        if !matched {
            sub.rewind(ptr)
        }
        matched
    }

    fn match_rec(&self, pattern: &Self, sub: &mut Subst) -> bool {
        match (self, pattern) {
            (_, Self::Meta(m)) => sub.bind(m, self),
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::App(c, args), Self::App(d, pargs)) if c == d && args.len() == pargs.len() => {
                let mut zipped = args.iter().zip(pargs.iter());
                zipped.all(|(a, p)| a.match_rec(p, sub))
            }
            _ => false,
        }
    }

    /// Return the substitution that makes the schema equal to the formula, if any.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// let (a, b) = (Formula::meta("A"), Formula::meta("B"));
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let sub = (p.clone() & -q.clone()).instance_of(&(a.clone() & b)).unwrap();
    /// assert_eq!(sub.get("B"), Some(&-q.clone()));
    /// assert!((p.clone() & q.clone()).instance_of(&(a.clone() & a)).is_none());
    /// ~~~
    pub fn instance_of(&self, pattern: &Self) -> Option<Subst> {
        let mut sub = Subst::new();
        self.match_with(pattern, &mut sub).then(|| sub)
    }

    pub fn is_instance_of(&self, pattern: &Self) -> bool {
        self.instance_of(pattern).is_some()
    }

    /// Replace metavariables by the formulas they are bound to.
    ///
    /// Fail with the first unbound metavariable.
    pub fn instantiate(&self, sub: &Subst) -> Result<Self, Symbol> {
        match self {
            Self::Meta(m) => sub.get(m).cloned().ok_or_else(|| m.clone()),
            Self::Atom(_) => Ok(self.clone()),
            Self::App(c, args) => {
                let args = args.iter().map(|a| a.instantiate(sub));
                Ok(Self::App(c.clone(), args.collect::<Result<_, _>>()?))
            }
        }
    }

    /// Replace every instance of `pattern` by the corresponding instance of `replacement`.
    ///
    /// Instances are replaced outermost first.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// let (a, p, q) = (Formula::meta("A"), Formula::atom("p"), Formula::atom("q"));
    /// let fm = -(-p.clone()) & -(-(-(-q.clone())));
    /// let simplified = fm.schematic_substitute(&-(-a.clone()), &a).unwrap();
    /// assert_eq!(simplified, p & -(-q));
    /// ~~~
    pub fn schematic_substitute(&self, pattern: &Self, replacement: &Self) -> Result<Self, Symbol> {
        if let Some(sub) = self.instance_of(pattern) {
            return replacement.instantiate(&sub);
        }
        match self {
            Self::Atom(_) | Self::Meta(_) => Ok(self.clone()),
            Self::App(c, args) => {
                let args = args
                    .iter()
                    .map(|a| a.schematic_substitute(pattern, replacement));
                Ok(Self::App(c.clone(), args.collect::<Result<Vec<_>, _>>()?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab() -> (Formula, Formula) {
        (Formula::meta("A"), Formula::meta("B"))
    }

    #[test]
    fn consistency() {
        let (a, b) = ab();
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let pattern = Formula::imp(a.clone(), b.clone()) & a.clone();
        assert!((Formula::imp(p.clone(), q.clone()) & p.clone()).is_instance_of(&pattern));
        assert!(!(Formula::imp(p.clone(), q.clone()) & q.clone()).is_instance_of(&pattern));
        // metavariables in the concrete formula are not special
        assert!(a.is_instance_of(&b));
        assert!(!a.is_instance_of(&p));
    }

    #[test]
    fn rewind_on_failure() {
        let (a, b) = ab();
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let mut sub = Subst::new();
        assert!(q.match_with(&b, &mut sub));
        assert!(!(p.clone() & q.clone()).match_with(&(a.clone() & a.clone()), &mut sub));
        assert_eq!(sub.len(), 1);
        assert!((p.clone() & q.clone()).match_with(&(a & b), &mut sub));
        assert_eq!(sub.get("A"), Some(&p));
    }

    #[test]
    fn instantiate_unbound() {
        let (a, b) = ab();
        let sub: Subst = core::iter::once((Symbol::from("A"), Formula::atom("p"))).collect();
        assert_eq!((a.clone() | a.clone()).instantiate(&sub), Ok(Formula::atom("p") | Formula::atom("p")));
        assert_eq!((a | b).instantiate(&sub), Err(Symbol::from("B")));
    }
}
