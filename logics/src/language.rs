use crate::formula::{AND, FALSUM, IFF, IMP, NEG, OR, VERUM};
use crate::{Formula, Symbol};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

/// Vocabulary over which formulas are built.
///
/// In an *infinite* language, every declared atomic, metavariable or
/// context variable followed by decimal digits is also a member of its class,
/// such that `p1`, `p2`, ... are atomics when `p` is.
///
/// ~~~
/// # use logics::{Formula, Language};
/// let lang = Language::classical();
/// let p = Formula::atom("p1");
/// assert!(lang.is_well_formed(&(p.clone() & -p)));
/// assert!(!lang.is_well_formed(&Formula::atom("x")));
/// ~~~
#[derive(Clone, Debug, Default)]
pub struct Language {
    atomics: HashSet<Symbol>,
    constants: HashMap<Symbol, usize>,
    sentential_constants: HashSet<Symbol>,
    metavariables: HashSet<Symbol>,
    context_variables: HashSet<Symbol>,
    infinite: bool,
}

fn symbols<'a, I: IntoIterator<Item = &'a str>>(iter: I) -> core::iter::Map<I::IntoIter, fn(&'a str) -> Symbol> {
    iter.into_iter().map(Symbol::from as fn(&'a str) -> Symbol)
}

impl Language {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atomics<'a>(mut self, iter: impl IntoIterator<Item = &'a str>) -> Self {
        self.atomics.extend(symbols(iter));
        self
    }

    pub fn constant(mut self, c: &str, arity: usize) -> Self {
        self.constants.insert(Symbol::from(c), arity);
        self
    }

    pub fn sentential_constants<'a>(mut self, iter: impl IntoIterator<Item = &'a str>) -> Self {
        self.sentential_constants.extend(symbols(iter));
        self
    }

    pub fn metavariables<'a>(mut self, iter: impl IntoIterator<Item = &'a str>) -> Self {
        self.metavariables.extend(symbols(iter));
        self
    }

    pub fn context_variables<'a>(mut self, iter: impl IntoIterator<Item = &'a str>) -> Self {
        self.context_variables.extend(symbols(iter));
        self
    }

    /// Accept numbered copies of atomics and variables.
    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    /// Infinite language with the classical connectives and sentential constants.
    pub fn classical() -> Self {
        Self::classical_no_conditional()
            .constant(IMP, 2)
            .constant(IFF, 2)
            .sentential_constants([FALSUM, VERUM])
    }

    /// Infinite language with negation, conjunction and disjunction only.
    pub fn classical_no_conditional() -> Self {
        Self::new()
            .atomics(["p", "q", "r", "s", "t"])
            .metavariables(["A", "B", "C", "D", "E"])
            .context_variables(["Γ", "Δ", "Σ", "Λ", "Π", "Θ"])
            .constant(NEG, 1)
            .constant(AND, 2)
            .constant(OR, 2)
            .infinite()
    }

    fn member(&self, set: &HashSet<Symbol>, s: &str) -> bool {
        if set.contains(s) {
            return true;
        }
        let prefix = s.trim_end_matches(|c: char| c.is_ascii_digit());
        self.infinite && prefix.len() < s.len() && set.contains(prefix)
    }

    pub fn is_atomic(&self, s: &str) -> bool {
        self.member(&self.atomics, s)
    }

    pub fn is_sentential_constant(&self, s: &str) -> bool {
        self.sentential_constants.contains(s)
    }

    pub fn is_metavariable(&self, s: &str) -> bool {
        self.member(&self.metavariables, s)
    }

    pub fn is_context_variable(&self, s: &str) -> bool {
        self.member(&self.context_variables, s)
    }

    /// Return the arity of a constant, if it belongs to the language.
    pub fn arity(&self, c: &str) -> Option<usize> {
        self.constants.get(c).copied()
    }

    /// Constants of the language, sorted by name.
    pub fn constants(&self) -> Vec<(&Symbol, usize)> {
        let mut constants: Vec<_> = self.constants.iter().map(|(c, a)| (c, *a)).collect();
        constants.sort();
        constants
    }

    /// Verify that no symbol is declared in two different classes.
    pub fn disjoint(&self) -> Result<(), Symbol> {
        let sets = [
            &self.atomics,
            &self.sentential_constants,
            &self.metavariables,
            &self.context_variables,
        ];
        let constants = self.constants.keys();
        let mut seen = HashSet::new();
        for s in sets.iter().copied().flatten().chain(constants) {
            if !seen.insert(s) {
                return Err(s.clone());
            }
        }
        Ok(())
    }

    /// Return why a formula is not well-formed in this language.
    pub fn check(&self, fm: &Formula) -> Result<(), String> {
        match fm {
            Formula::Atom(a) if self.is_atomic(a) || self.is_sentential_constant(a) => Ok(()),
            Formula::Atom(a) => Err(format!("{} is not an atomic of the language", a)),
            Formula::Meta(m) if self.is_metavariable(m) => Ok(()),
            Formula::Meta(m) => Err(format!("{} is not a metavariable of the language", m)),
            Formula::App(c, args) => match self.arity(c) {
                None => Err(format!("{} is not a constant of the language", c)),
                Some(arity) if arity != args.len() => Err(format!(
                    "{} has arity {}, but was applied to {} arguments",
                    c,
                    arity,
                    args.len()
                )),
                Some(_) => args.iter().try_for_each(|arg| self.check(arg)),
            },
        }
    }

    pub fn is_well_formed(&self, fm: &Formula) -> bool {
        self.check(fm).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite() {
        let lang = Language::classical();
        assert!(lang.is_atomic("p"));
        assert!(lang.is_atomic("q17"));
        assert!(!lang.is_atomic("p1a"));
        assert!(lang.is_metavariable("A2"));
        assert!(lang.is_context_variable("Γ1"));
        assert!(!Language::new().atomics(["p"]).is_atomic("p1"));
    }

    #[test]
    fn disjoint() {
        assert_eq!(Language::classical().disjoint(), Ok(()));
        let lang = Language::classical().metavariables(["p"]);
        assert_eq!(lang.disjoint(), Err(Symbol::from("p")));
    }

    #[test]
    fn check() {
        let lang = Language::classical_no_conditional();
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        assert!(lang.check(&(p.clone() | -q.clone())).is_ok());
        assert!(lang.check(&Formula::imp(p.clone(), q)).is_err());
        assert!(lang.check(&Formula::app(NEG, [p.clone(), p])).is_err());
        assert!(lang.check(&Formula::falsum()).is_err());
        assert!(Language::classical().check(&Formula::falsum()).is_ok());
    }
}
