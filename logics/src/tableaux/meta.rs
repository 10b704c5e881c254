//! Metainferential tableaux.
//!
//! Nodes assert that a statement (a formula or an inference of some level)
//! satisfies or fails a standard.
//! A formula satisfies a set of truth values if its value is in the set,
//! and an inference satisfies a pair of standards `[X, Y]` if
//! some premise does not satisfy `X` or some conclusion satisfies `Y`.
//! A barred standard is satisfied iff the standard is not.
//!
//! ~~~
//! # use logics::{Formula, Inference, Indexed, Statement};
//! # use logics::tableaux::{MetaSystem, Standard, Tableaux};
//! let p = Formula::atom("p");
//! let sys = MetaSystem::sk();
//! let (s, t) = (Standard::set(["1"]), Standard::set(["1", "i"]));
//! let lem = Statement::from(Inference::new([], [p.clone() | -p.clone()]));
//! assert_eq!(sys.is_valid(&Indexed(lem.clone(), Standard::pair(s.clone(), t))), Ok(true));
//! assert_eq!(sys.is_valid(&Indexed(lem, Standard::pair(s.clone(), s))), Ok(false));
//! ~~~

use super::{Initial, Label, Role, Rules, Tableaux};
use crate::formula::{AND, IMP, OR};
use crate::subst::Ptr;
use crate::tree::Node;
use crate::{Formula, Indexed, Inference, Language, Rewind, Statement, Subst, Symbol};
use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::ops::Neg;
use hashbrown::HashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Content {
    /// set of truth values, for formulas
    Set(BTreeSet<Symbol>),
    /// standards for premises and conclusions, for inferences
    Pair(Box<Standard>, Box<Standard>),
    /// placeholder for an arbitrary standard
    Var(Symbol),
}

/// Standard that a statement may satisfy, possibly barred.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Standard {
    pub content: Content,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bar: bool,
}

impl Standard {
    pub fn set<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Content::Set(values.into_iter().map(Symbol::from).collect()).into()
    }

    pub fn pair(premises: Self, conclusions: Self) -> Self {
        Content::Pair(Box::new(premises), Box::new(conclusions)).into()
    }

    pub fn var(v: impl Into<Symbol>) -> Self {
        Content::Var(v.into()).into()
    }

    /// Return 0 for sets and variables and `n + 1` for pairs of standards of level `n`.
    pub fn level(&self) -> usize {
        match &self.content {
            Content::Set(_) | Content::Var(_) => 0,
            Content::Pair(x, y) => 1 + x.level().max(y.level()),
        }
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Symbol> + '_> {
        match &self.content {
            Content::Set(s) => Box::new(s.iter()),
            Content::Pair(x, y) => Box::new(x.values().chain(y.values())),
            Content::Var(_) => Box::new(core::iter::empty()),
        }
    }

    fn is_empty_set(&self) -> bool {
        matches!(&self.content, Content::Set(s) if s.is_empty())
    }

    fn match_with(&self, pattern: &Self, sub: &mut HashMap<Symbol, Content>) -> bool {
        if self.bar != pattern.bar {
            return false;
        }
        match (&self.content, &pattern.content) {
            (_, Content::Var(v)) => match sub.get(v) {
                Some(c) => c == &self.content,
                None => {
                    sub.insert(v.clone(), self.content.clone());
                    true
                }
            },
            (Content::Pair(x1, y1), Content::Pair(x2, y2)) => x1.match_with(x2, sub) && y1.match_with(y2, sub),
            (Content::Set(s1), Content::Set(s2)) => s1 == s2,
            _ => false,
        }
    }

    fn instantiate(&self, sub: &HashMap<Symbol, Content>) -> Result<Self, Symbol> {
        let content = match &self.content {
            Content::Var(v) => sub.get(v).cloned().ok_or_else(|| v.clone())?,
            Content::Pair(x, y) => Content::Pair(Box::new(x.instantiate(sub)?), Box::new(y.instantiate(sub)?)),
            Content::Set(s) => Content::Set(s.clone()),
        };
        let bar = self.bar;
        Ok(Self { content, bar })
    }
}

impl From<Content> for Standard {
    fn from(content: Content) -> Self {
        Self { content, bar: false }
    }
}

/// Bar a standard.
impl Neg for Standard {
    type Output = Self;
    fn neg(mut self) -> Self {
        self.bar = !self.bar;
        self
    }
}

impl Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bar {
            "-".fmt(f)?;
        }
        match &self.content {
            Content::Set(s) => {
                "{".fmt(f)?;
                for (i, v) in s.iter().enumerate() {
                    write!(f, "{}{}", if i > 0 { ", " } else { "" }, v)?;
                }
                "}".fmt(f)
            }
            Content::Pair(x, y) => write!(f, "[{}, {}]", x, y),
            Content::Var(v) => v.fmt(f),
        }
    }
}

/// Statement asserted to satisfy a standard.
pub type MetaLabel = Indexed<Statement, Standard>;

impl Display for Indexed<Statement, Standard> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0, self.1)
    }
}

impl Label for MetaLabel {
    type Sub = (Subst, HashMap<Symbol, Content>);

    fn match_with(&self, pattern: &Self, sub: &mut Self::Sub) -> bool {
        let (ptr, stds) = (Ptr::from(&sub.0), sub.1.clone());
        let matched = self.0.match_with(&pattern.0, &mut sub.0) && self.1.match_with(&pattern.1, &mut sub.1);
        if !matched {
            sub.0.rewind(ptr);
            sub.1 = stds;
        }
        matched
    }

    fn instantiate(&self, (sub, stds): &Self::Sub) -> Result<Self, Symbol> {
        Ok(Indexed(self.0.instantiate(sub)?, self.1.instantiate(stds)?))
    }
}

/// Rules that are not given by schemas, in the order in which the solver tries them.
const PROCEDURAL: [&str; 5] = ["inf0", "inf1", "complement", "intersection", "singleton"];

/// Metainferential tableau system over a set of truth values.
#[derive(Clone, Debug)]
pub struct MetaSystem {
    pub language: Language,
    pub values: BTreeSet<Symbol>,
    rules: Rules<MetaLabel>,
}

impl MetaSystem {
    pub fn new<'a>(language: Language, values: impl IntoIterator<Item = &'a str>, rules: Rules<MetaLabel>) -> Self {
        let values = values.into_iter().map(Symbol::from).collect();
        Self {
            language,
            values,
            rules,
        }
    }

    /// Connective rules, without the rules for inferences and sets of values.
    pub fn rules(&self) -> &Rules<MetaLabel> {
        &self.rules
    }

    /// Strong Kleene scheme over the values 1, i and 0.
    pub fn sk() -> Self {
        let rules = Rules::new(kleene(false));
        Self::new(Language::classical(), ["1", "i", "0"], rules)
    }

    /// Weak Kleene scheme over the values 1, i and 0.
    pub fn wk() -> Self {
        let rules = Rules::new(kleene(true));
        Self::new(Language::classical(), ["1", "i", "0"], rules)
    }

    /// Chain the premises of an inference at a barred pair `[X, Y]` at `X`,
    /// followed by its conclusions at the barred `Y`.
    fn inf0(&self, label: &MetaLabel) -> Option<Node<MetaLabel>> {
        let (inf, x, y) = inference_at_pair(label, true)?;
        let premises = inf.premises.iter().map(|p| Indexed(p.clone(), x.clone()));
        let conclusions = inf.conclusions.iter().map(|c| Indexed(c.clone(), -y.clone()));
        let nodes = premises.chain(conclusions).map(|l| Node::justified(l, "inf0"));
        Some(Node::new(label.clone()).children(Node::chain(nodes)))
    }

    /// Branch for every premise of an inference at the barred `X`
    /// and for every conclusion at `Y`.
    fn inf1(&self, label: &MetaLabel) -> Option<Node<MetaLabel>> {
        let (inf, x, y) = inference_at_pair(label, false)?;
        let premises = inf.premises.iter().map(|p| Indexed(p.clone(), -x.clone()));
        let conclusions = inf.conclusions.iter().map(|c| Indexed(c.clone(), y.clone()));
        let branches: Vec<_> = premises.chain(conclusions).map(|l| Node::justified(l, "inf1")).collect();
        if branches.is_empty() {
            return None;
        }
        Some(Node::new(label.clone()).children(branches))
    }

    fn complement(&self, label: &MetaLabel) -> Option<Node<MetaLabel>> {
        let set = formula_at_set(label, true)?;
        let rest = Content::Set(self.values.difference(set).cloned().collect());
        let child = Node::justified(Indexed(label.0.clone(), rest.into()), "complement");
        Some(Node::new(label.clone()).child(child))
    }

    /// Intersect the set of the last node with the set of an earlier node of the same formula,
    /// provided that neither set includes the other.
    fn intersection(&self, branch: &[&MetaLabel]) -> Option<Node<MetaLabel>> {
        let (label, above) = branch.split_last()?;
        let set = formula_at_set(label, false)?;
        let other = above.iter().rev().find_map(|l| {
            let other = formula_at_set(l, false).filter(|_| l.0 == label.0)?;
            let incomparable = !set.is_subset(other) && !other.is_subset(set);
            incomparable.then(|| other)
        })?;
        let meet = Content::Set(set.intersection(other).cloned().collect());
        let child = Node::justified(Indexed(label.0.clone(), meet.into()), "intersection");
        Some(Node::new((*label).clone()).child(child))
    }

    /// Branch for every value of a set with more than one value.
    fn singleton(&self, label: &MetaLabel) -> Option<Node<MetaLabel>> {
        let set = formula_at_set(label, false).filter(|s| s.len() > 1)?;
        let singleton = |v: &Symbol| Standard::from(Content::Set(core::iter::once(v.clone()).collect()));
        let branches = set.iter().map(|v| Node::justified(Indexed(label.0.clone(), singleton(v)), "singleton"));
        Some(Node::new(label.clone()).children(branches))
    }

    fn check_standard(&self, std: &Standard) -> Result<(), String> {
        if let Content::Var(v) = &std.content {
            return Err(format!("standard variable {} is only allowed in rules", v));
        }
        if let Content::Pair(x, y) = &std.content {
            self.check_standard(x)?;
            self.check_standard(y)?;
        }
        match std.values().find(|v| !self.values.contains(*v)) {
            Some(v) => Err(format!("{} is not a truth value of the system", v)),
            None => Ok(()),
        }
    }

    /// Read an assignment of truth values to atomic formulas
    /// from the first open branch of a tree.
    ///
    /// Return `None` if all branches are closed.
    pub fn counterexample(&self, tree: &Node<MetaLabel>) -> Option<BTreeMap<Symbol, Symbol>> {
        let leaves = tree.leaves();
        let mut open = leaves.iter().filter_map(|(path, _)| {
            let branch = super::labels(tree, path)?;
            (!self.branch_is_closed(&branch)).then(|| branch)
        });
        let branch = open.next()?;
        let atomic = branch.into_iter().filter_map(|l| match (&l.0, &l.1.content) {
            (Statement::Formula(Formula::Atom(a)), Content::Set(s)) if !l.1.bar && s.len() == 1 => {
                Some((a.clone(), s.iter().next()?.clone()))
            }
            _ => None,
        });
        Some(atomic.collect())
    }
}

/// If the label is an inference at a pair with the given bar, return the inference and the pair.
fn inference_at_pair(label: &MetaLabel, bar: bool) -> Option<(&Inference, &Standard, &Standard)> {
    match (&label.0, &label.1.content) {
        (Statement::Inference(inf), Content::Pair(x, y)) if label.1.bar == bar => {
            let empty = inf.premises.is_empty() && inf.conclusions.is_empty();
            (!empty).then(|| (inf, &**x, &**y))
        }
        _ => None,
    }
}

/// If the label is a formula at a set with the given bar, return the set.
fn formula_at_set(label: &MetaLabel, bar: bool) -> Option<&BTreeSet<Symbol>> {
    match (&label.0, &label.1.content) {
        (Statement::Formula(_), Content::Set(s)) if label.1.bar == bar => Some(s),
        _ => None,
    }
}

fn rule(name: &str, fm: Formula, std: Standard, branches: Vec<Vec<(&Formula, Standard)>>) -> (Symbol, Node<MetaLabel>) {
    let node = |(fm, std): (&Formula, Standard)| Node::justified(Indexed(fm.clone().into(), std), name);
    let children = branches.into_iter().filter_map(|b| Node::chain(b.into_iter().map(node)));
    (Symbol::from(name), Node::new(Indexed(fm.into(), std)).children(children))
}

/// Connective rules for the Kleene schemes, the weak one if `weak` is set.
fn kleene(weak: bool) -> Vec<(Symbol, Node<MetaLabel>)> {
    let (a, b) = (Formula::meta("A"), Formula::meta("B"));
    let s = || Standard::set(["1"]);
    let i = || Standard::set(["i"]);
    let f = || Standard::set(["0"]);
    let t = || Standard::set(["1", "i"]);
    let n = || Standard::set(["i", "0"]);
    let d = || Standard::set(["1", "0"]);
    let and = Formula::bin(a.clone(), AND, b.clone());
    let or = Formula::bin(a.clone(), OR, b.clone());
    let imp = Formula::bin(a.clone(), IMP, b.clone());

    let mut rules = Vec::from([
        rule("R~1", -a.clone(), s(), vec![vec![(&a, f())]]),
        rule("R~i", -a.clone(), i(), vec![vec![(&a, i())]]),
        rule("R~0", -a.clone(), f(), vec![vec![(&a, s())]]),
        rule("R∧1", and.clone(), s(), vec![vec![(&a, s()), (&b, s())]]),
        rule("R∧i", and.clone(), i(), vec![vec![(&a, t()), (&b, i())], vec![(&a, i()), (&b, t())]]),
        rule("R∧0", and.clone(), f(), vec![vec![(&a, f())], vec![(&b, f())]]),
        rule("R∨1", or.clone(), s(), vec![vec![(&a, s())], vec![(&b, s())]]),
        rule("R∨i", or.clone(), i(), vec![vec![(&a, n()), (&b, i())], vec![(&a, i()), (&b, n())]]),
        rule("R∨0", or.clone(), f(), vec![vec![(&a, f()), (&b, f())]]),
        rule("R→1", imp.clone(), s(), vec![vec![(&a, f())], vec![(&b, s())]]),
        rule("R→i", imp.clone(), i(), vec![vec![(&a, i()), (&b, n())], vec![(&a, t()), (&b, i())]]),
        rule("R→0", imp.clone(), f(), vec![vec![(&a, s()), (&b, f())]]),
    ]);
    if weak {
        // an intermediate component makes the whole formula intermediate
        let overrides = Vec::from([
            rule("R∧i", and.clone(), i(), vec![vec![(&a, i())], vec![(&b, i())]]),
            rule("R∧0", and, f(), vec![vec![(&a, f()), (&b, d())], vec![(&b, f()), (&a, d())]]),
            rule("R∨i", or.clone(), i(), vec![vec![(&a, i())], vec![(&b, i())]]),
            rule("R∨1", or, s(), vec![vec![(&a, s()), (&b, d())], vec![(&b, s()), (&a, d())]]),
            rule("R→i", imp.clone(), i(), vec![vec![(&a, i())], vec![(&b, i())]]),
            rule("R→1", imp, s(), vec![vec![(&a, f()), (&b, d())], vec![(&b, s()), (&a, d())]]),
        ]);
        for (name, rule) in overrides {
            if let Some(r) = rules.iter_mut().find(|(n, _)| *n == name) {
                r.1 = rule
            }
        }
    }
    rules
}

impl Tableaux for MetaSystem {
    type Label = MetaLabel;
    type Goal = MetaLabel;

    fn rule_names(&self) -> Vec<Symbol> {
        let procedural = PROCEDURAL.iter().map(|r| Symbol::from(*r));
        procedural.chain(self.rules.names().cloned()).collect()
    }

    fn application(&self, rule: &str, branch: &[&MetaLabel]) -> Option<Node<MetaLabel>> {
        let label = branch.last()?;
        match rule {
            "inf0" => self.inf0(label),
            "inf1" => self.inf1(label),
            "complement" => self.complement(label),
            "intersection" => self.intersection(branch),
            "singleton" => self.singleton(label),
            _ => self.rules.application(rule, branch),
        }
    }

    /// A branch is closed if it contains a formula at the empty set
    /// or an inference without premises and conclusions at an unbarred standard.
    fn branch_is_closed(&self, branch: &[&MetaLabel]) -> bool {
        branch.iter().any(|l| match &l.0 {
            Statement::Formula(_) => !l.1.bar && l.1.is_empty_set(),
            Statement::Inference(inf) => !l.1.bar && inf.premises.is_empty() && inf.conclusions.is_empty(),
        })
    }

    /// Start from the statement at the barred standard,
    /// that means, search for a situation where the statement does not satisfy the standard.
    fn initial(&self, goal: &MetaLabel) -> Result<Vec<Initial<MetaLabel>>, String> {
        self.check_label(goal)?;
        let label = Indexed(goal.0.clone(), -goal.1.clone());
        let (role, index) = (Role::Conclusion, 0);
        Ok(Vec::from([Initial { role, index, label }]))
    }

    fn check_label(&self, label: &MetaLabel) -> Result<(), String> {
        label.0.check(&self.language)?;
        self.check_standard(&label.1)?;
        let (sl, il) = (label.1.level(), label.0.level());
        if sl != il {
            return Err(format!("{} has level {}, but {} has level {}", label.1, sl, label.0, il));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn s() -> Standard {
        Standard::set(["1"])
    }

    #[test]
    fn standards() {
        let ts = Standard::pair(Standard::set(["1", "i"]), s());
        assert_eq!(ts.level(), 1);
        assert_eq!((-ts.clone()).to_string(), "-[{1, i}, {1}]");
        assert_eq!(Standard::pair(ts.clone(), -ts).level(), 2);

        let mut sub = HashMap::new();
        let pattern = Standard::pair(Standard::var("X"), Standard::var("X"));
        assert!(Standard::pair(s(), s()).match_with(&pattern, &mut sub));
        assert_eq!(pattern.instantiate(&sub), Ok(Standard::pair(s(), s())));
        let mut sub = HashMap::new();
        assert!(!Standard::pair(s(), Standard::set(["0"])).match_with(&pattern, &mut sub));
        assert!(!(-s()).match_with(&Standard::var("X"), &mut HashMap::new()));
    }

    #[test]
    fn procedural_rules() {
        let sys = MetaSystem::sk();
        let p = Statement::from(Formula::atom("p"));
        let barred = Indexed(p.clone(), -s());
        let comp = sys.application("complement", &[&barred]).unwrap();
        assert_eq!(comp.children[0].content, Indexed(p.clone(), Standard::set(["i", "0"])));

        let t = Indexed(p.clone(), Standard::set(["1", "i"]));
        let n = Indexed(p.clone(), Standard::set(["i", "0"]));
        let meet = sys.application("intersection", &[&t, &n]).unwrap();
        assert_eq!(meet.children[0].content, Indexed(p.clone(), Standard::set(["i"])));
        assert!(sys.application("intersection", &[&t, &Indexed(p.clone(), s())]).is_none());

        let split = sys.application("singleton", &[&t]).unwrap();
        assert_eq!(split.children.len(), 2);
        assert!(sys.application("singleton", &[&Indexed(p, s())]).is_none());
    }

    #[test]
    fn counterexample() {
        let sys = MetaSystem::sk();
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let inf = Statement::from(Inference::new([p], [q]));
        let tree = sys.solve_tree(&Indexed(inf, Standard::pair(s(), s())), Default::default()).unwrap();
        assert!(!sys.tree_is_closed(&tree));
        let cex = sys.counterexample(&tree).unwrap();
        assert_eq!(cex.get("p").map(|v| v.as_str()), Some("1"));
        assert_eq!(cex.get("q").map(|v| v.as_str()), Some("0"));
    }

    #[test]
    fn level_mismatch() {
        let sys = MetaSystem::wk();
        let p = Statement::from(Formula::atom("p"));
        assert!(sys.initial(&Indexed(p, Standard::pair(s(), s()))).is_err());
    }
}
