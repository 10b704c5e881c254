//! Natural deduction derivations.
//!
//! A derivation is a sequence of steps, each justified as a premise,
//! a supposition, or by a rule applied to earlier steps.
//! Every step records the suppositions whose scope it lies in.

mod check;
mod instances;
pub mod solve;

pub use solve::{Heuristic, Opt, Solver};

use crate::{Formula, Language, Rewind, Symbol};
use alloc::vec::Vec;
use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Symbol", into = "Symbol")
)]
pub enum Justification {
    Premise,
    Supposition,
    Rule(Symbol),
}

impl From<Symbol> for Justification {
    fn from(s: Symbol) -> Self {
        match s.as_str() {
            "premise" => Self::Premise,
            "supposition" => Self::Supposition,
            _ => Self::Rule(s),
        }
    }
}

impl From<&str> for Justification {
    fn from(s: &str) -> Self {
        Self::from(Symbol::from(s))
    }
}

impl From<Justification> for Symbol {
    fn from(j: Justification) -> Self {
        match j {
            Justification::Premise => Symbol::from("premise"),
            Justification::Supposition => Symbol::from("supposition"),
            Justification::Rule(r) => r,
        }
    }
}

impl Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Premise => "premise".fmt(f),
            Self::Supposition => "supposition".fmt(f),
            Self::Rule(r) => r.fmt(f),
        }
    }
}

/// Line of a derivation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    pub content: Formula,
    pub justification: Justification,
    /// steps the rule was applied to
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_steps: Vec<usize>,
    /// supposition steps whose scope this step is in, outermost first
    #[cfg_attr(feature = "serde", serde(default))]
    pub open_suppositions: Vec<usize>,
}

impl Step {
    pub fn new(content: Formula, justification: impl Into<Justification>) -> Self {
        Self {
            content,
            justification: justification.into(),
            on_steps: Vec::new(),
            open_suppositions: Vec::new(),
        }
    }

    pub fn on(mut self, on_steps: impl IntoIterator<Item = usize>) -> Self {
        self.on_steps = on_steps.into_iter().collect();
        self
    }

    pub fn open(mut self, open_suppositions: impl IntoIterator<Item = usize>) -> Self {
        self.open_suppositions = open_suppositions.into_iter().collect();
        self
    }

    /// Return true if the step lies in the scope of the given suppositions only.
    pub fn is_accessible_from(&self, open_suppositions: &[usize]) -> bool {
        let open = |s| open_suppositions.contains(s);
        self.open_suppositions.iter().all(open)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; {}; {:?}; {:?}",
            self.content, self.justification, self.on_steps, self.open_suppositions
        )
    }
}

/// Sequence of steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Derivation(pub Vec<Step>);

impl Derivation {
    /// Return the suppositions open at the last step.
    pub fn open_suppositions(&self) -> &[usize] {
        match self.0.last() {
            Some(step) => &step.open_suppositions,
            None => &[],
        }
    }

    /// Return the first step with the given content that is accessible at the end.
    pub fn accessible(&self, fm: &Formula) -> Option<usize> {
        let open = self.open_suppositions();
        let mut steps = self.0.iter();
        steps.position(|step| &step.content == fm && step.is_accessible_from(open))
    }
}

impl core::ops::Deref for Derivation {
    type Target = Vec<Step>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::ops::DerefMut for Derivation {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl core::iter::FromIterator<Step> for Derivation {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Rewind<usize> for Derivation {
    fn rewind(&mut self, len: usize) {
        self.0.truncate(len)
    }
}

/// Steps inside suppositions are indented with one bar per open supposition.
impl Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            for _ in &step.open_suppositions {
                "|  ".fmt(f)?;
            }
            writeln!(f, "{}. {}", i, step)?;
        }
        Ok(())
    }
}

/// Premise of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Premise {
    pub content: Formula,
    /// the premise has to be a supposition step
    pub supposition: bool,
    /// suppositions of the rule (numbered by premise) whose scope the premise is in
    pub open_suppositions: Vec<usize>,
}

/// Conclusion of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conclusion {
    pub content: Formula,
    /// premise numbers in the order in which they have to be cited
    pub on_steps: Vec<usize>,
    /// suppositions of the rule that stay open in the conclusion
    pub open_suppositions: Vec<usize>,
}

/// Natural deduction rule.
///
/// A rule is a sequence of premises that may be separated by gaps,
/// followed by a conclusion.
/// A gap stands for any number of steps;
/// a premise that is not preceded by a gap has to follow
/// immediately the previous premise (or to be the first step),
/// and the conclusion has to follow the last premise immediately
/// unless a gap precedes it.
///
/// ~~~
/// # use logics::Formula;
/// # use logics::nd::Rule;
/// let (a, b) = (Formula::meta("A"), Formula::meta("B"));
/// let intro = Rule::build()
///     .gap()
///     .supposition(a.clone(), [0])
///     .gap()
///     .premise(b.clone(), [0])
///     .conclusion(Formula::imp(a, b), [0, 1], []);
/// assert_eq!(intro.premise_count(), 2);
/// ~~~
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// premises, where `None` stands for a gap
    pub premises: Vec<Option<Premise>>,
    pub conclusion: Conclusion,
}

pub struct RuleBuilder(Vec<Option<Premise>>);

impl Rule {
    pub fn build() -> RuleBuilder {
        RuleBuilder(Vec::new())
    }

    pub fn premise_count(&self) -> usize {
        self.premises.iter().flatten().count()
    }
}

impl RuleBuilder {
    pub fn gap(mut self) -> Self {
        self.0.push(None);
        self
    }

    fn push(mut self, content: Formula, supposition: bool, open: &[usize]) -> Self {
        let open_suppositions = open.to_vec();
        self.0.push(Some(Premise {
            content,
            supposition,
            open_suppositions,
        }));
        self
    }

    pub fn premise<const N: usize>(self, content: Formula, open: [usize; N]) -> Self {
        self.push(content, false, &open)
    }

    pub fn supposition<const N: usize>(self, content: Formula, open: [usize; N]) -> Self {
        self.push(content, true, &open)
    }

    pub fn conclusion<const N: usize, const M: usize>(
        self,
        content: Formula,
        on_steps: [usize; N],
        open: [usize; M],
    ) -> Rule {
        let conclusion = Conclusion {
            content,
            on_steps: on_steps.to_vec(),
            open_suppositions: open.to_vec(),
        };
        Rule {
            premises: self.0,
            conclusion,
        }
    }
}

/// Natural deduction system: a language and named rules.
#[derive(Clone, Debug)]
pub struct System {
    pub language: Language,
    rules: Vec<(Symbol, Rule)>,
    /// if false, the steps a rule is applied to may be cited in any order
    pub order_sensitive: bool,
}

impl System {
    pub fn new(language: Language, rules: impl IntoIterator<Item = (Symbol, Rule)>) -> Self {
        Self {
            language,
            rules: rules.into_iter().collect(),
            order_sensitive: true,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = (&Symbol, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name, rule))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        let mut rules = self.rules.iter();
        rules.find(|(n, _)| n.as_str() == name).map(|(_, r)| r)
    }

    /// Return the rules a justification may refer to.
    ///
    /// A justification `R` refers to the rule `R` if it exists,
    /// otherwise to the numbered variants `R1`, `R2`, ... of `R`.
    pub fn variants(&self, name: &str) -> Vec<&Rule> {
        if let Some(rule) = self.get(name) {
            return Vec::from([rule]);
        }
        (1..)
            .map(|i| self.get(&alloc::format!("{}{}", name, i)))
            .take_while(|r| r.is_some())
            .flatten()
            .collect()
    }
}
