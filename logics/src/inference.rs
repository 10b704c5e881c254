use crate::subst::Ptr;
use crate::{Formula, Language, Rewind, Subst, Symbol};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Premise or conclusion of an inference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    Formula(Formula),
    Inference(Inference),
}

/// Inference from premises to conclusions.
///
/// An inference of level 1 has formulas as premises and conclusions,
/// an inference of level `n + 1` (a metainference) has inferences of level `n`.
///
/// ~~~
/// # use logics::{Formula, Inference};
/// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
/// let inf = Inference::new([p.clone(), Formula::imp(p.clone(), q.clone())], [q.clone()]);
/// assert_eq!(inf.level(), 1);
/// assert_eq!(inf.to_string(), "p, (p → q) / q");
/// let meta = Inference::meta([inf], [Inference::new([], [q])]);
/// assert_eq!(meta.level(), 2);
/// assert_eq!(meta.to_string(), "(p, (p → q) / q) // (/ q)");
/// ~~~
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inference {
    pub premises: Vec<Statement>,
    pub conclusions: Vec<Statement>,
    level: usize,
}

impl Statement {
    /// Return 0 for formulas and the level of inferences.
    pub fn level(&self) -> usize {
        match self {
            Self::Formula(_) => 0,
            Self::Inference(inf) => inf.level,
        }
    }

    pub fn formula(&self) -> Option<&Formula> {
        match self {
            Self::Formula(fm) => Some(fm),
            Self::Inference(_) => None,
        }
    }

    pub fn inference(&self) -> Option<&Inference> {
        match self {
            Self::Formula(_) => None,
            Self::Inference(inf) => Some(inf),
        }
    }

    pub fn check(&self, lang: &Language) -> Result<(), String> {
        match self {
            Self::Formula(fm) => lang.check(fm),
            Self::Inference(inf) => inf.check(lang),
        }
    }

    /// Match the statement against a schema; see [`Formula::match_with`].
    pub fn match_with(&self, pattern: &Self, sub: &mut Subst) -> bool {
        match (self, pattern) {
            (Self::Formula(fm), Self::Formula(p)) => fm.match_with(p, sub),
            (Self::Inference(inf), Self::Inference(p)) => inf.match_with(p, sub),
            _ => false,
        }
    }

    pub fn instantiate(&self, sub: &Subst) -> Result<Self, Symbol> {
        Ok(match self {
            Self::Formula(fm) => Self::Formula(fm.instantiate(sub)?),
            Self::Inference(inf) => Self::Inference(inf.instantiate(sub)?),
        })
    }
}

impl From<Formula> for Statement {
    fn from(fm: Formula) -> Self {
        Self::Formula(fm)
    }
}

impl From<Inference> for Statement {
    fn from(inf: Inference) -> Self {
        Self::Inference(inf)
    }
}

fn level(stmts: &[Statement]) -> Option<usize> {
    stmts.iter().map(|s| s.level()).max()
}

impl Inference {
    /// Create an inference between formulas.
    pub fn new(
        premises: impl IntoIterator<Item = Formula>,
        conclusions: impl IntoIterator<Item = Formula>,
    ) -> Self {
        Self {
            premises: premises.into_iter().map(Statement::Formula).collect(),
            conclusions: conclusions.into_iter().map(Statement::Formula).collect(),
            level: 1,
        }
    }

    /// Create a metainference between inferences.
    ///
    /// If no inferences are given, the result has level 2.
    pub fn meta(
        premises: impl IntoIterator<Item = Inference>,
        conclusions: impl IntoIterator<Item = Inference>,
    ) -> Self {
        let premises: Vec<_> = premises.into_iter().map(Statement::Inference).collect();
        let conclusions: Vec<_> = conclusions.into_iter().map(Statement::Inference).collect();
        let level = level(&premises).max(level(&conclusions)).unwrap_or(1) + 1;
        Self {
            premises,
            conclusions,
            level,
        }
    }

    /// Create an inference without premises and conclusions.
    pub fn empty(level: usize) -> Self {
        Self {
            premises: Vec::new(),
            conclusions: Vec::new(),
            level,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Return the premises that are formulas.
    pub fn premise_formulas(&self) -> impl Iterator<Item = &Formula> {
        self.premises.iter().filter_map(|s| s.formula())
    }

    /// Return the conclusions that are formulas.
    pub fn conclusion_formulas(&self) -> impl Iterator<Item = &Formula> {
        self.conclusions.iter().filter_map(|s| s.formula())
    }

    /// Verify that all statements are well-formed and one level below the inference.
    pub fn check(&self, lang: &Language) -> Result<(), String> {
        for s in self.premises.iter().chain(self.conclusions.iter()) {
            if s.level() + 1 != self.level {
                let level = self.level;
                return Err(format!("{} does not have level {}", s, level - 1));
            }
            s.check(lang)?
        }
        Ok(())
    }

    pub fn is_well_formed(&self, lang: &Language) -> bool {
        self.check(lang).is_ok()
    }

    /// Match premises and conclusions in order against those of a schema.
    pub fn match_with(&self, pattern: &Self, sub: &mut Subst) -> bool {
        let ptr = Ptr::from(&*sub);
        let matches = |l: &[Statement], r: &[Statement], sub: &mut Subst| {
            l.len() == r.len() && l.iter().zip(r).all(|(s, p)| s.match_with(p, sub))
        };
        let matched = self.level == pattern.level
            && matches(&self.premises, &pattern.premises, sub)
            && matches(&self.conclusions, &pattern.conclusions, sub);
        if !matched {
            sub.rewind(ptr)
        }
        matched
    }

    pub fn is_instance_of(&self, pattern: &Self) -> bool {
        self.match_with(pattern, &mut Subst::new())
    }

    pub fn instantiate(&self, sub: &Subst) -> Result<Self, Symbol> {
        let inst = |stmts: &[Statement]| stmts.iter().map(|s| s.instantiate(sub)).collect::<Result<Vec<_>, _>>();
        Ok(Self {
            premises: inst(&self.premises)?,
            conclusions: inst(&self.conclusions)?,
            level: self.level,
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formula(fm) => fm.fmt(f),
            Self::Inference(inf) => write!(f, "({})", inf),
        }
    }
}

fn fmt_list(stmts: &[Statement], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, s) in stmts.iter().enumerate() {
        if i > 0 {
            ", ".fmt(f)?;
        }
        s.fmt(f)?;
    }
    Ok(())
}

impl Display for Inference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(&self.premises, f)?;
        if !self.premises.is_empty() {
            " ".fmt(f)?;
        }
        for _ in 0..self.level {
            "/".fmt(f)?;
        }
        if !self.conclusions.is_empty() {
            " ".fmt(f)?;
        }
        fmt_list(&self.conclusions, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn levels() {
        let p = Formula::atom("p");
        let inf = Inference::new([p.clone()], []);
        assert_eq!(inf.to_string(), "p /");
        assert_eq!(Inference::empty(1).to_string(), "/");
        assert_eq!(Inference::meta([], []).level(), 2);
        let meta = Inference::meta([inf.clone()], [Inference::meta([inf], [])]);
        assert_eq!(meta.level(), 3);
        assert!(!meta.is_well_formed(&Language::classical()));
    }

    #[test]
    fn matching() {
        let (a, b) = (Formula::meta("A"), Formula::meta("B"));
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let pattern = Inference::new([Formula::imp(a.clone(), b.clone()), a], [b]);
        let inf = Inference::new([Formula::imp(p.clone(), q.clone()), p.clone()], [q.clone()]);
        assert!(inf.is_instance_of(&pattern));
        let inf = Inference::new([Formula::imp(p.clone(), q.clone()), q], [p]);
        assert!(!inf.is_instance_of(&pattern));
    }
}
