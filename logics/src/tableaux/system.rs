use super::{Entry, Initial, Label, Role, Rules, Tableaux};
use crate::tree::Node;
use crate::{Indexed, Inference, Language, Statement, Subst, Symbol};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Condition under which a branch is closed.
#[derive(Clone, Debug)]
pub enum Closure {
    /// `A` and `~A` occur with the same index
    Negation,
    /// `A, 1` and `A, 0` occur
    Index,
    /// both members of some pair occur under a common substitution
    Pairs(Vec<(Entry, Entry)>),
    /// the last node is a well-formed atomic formula
    Atomic,
}

/// Nodes that a tableau for an inference starts with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Start {
    /// premises and negated conclusions
    Negated,
    /// premises at index 1 and conclusions at index 0
    Indexed,
    /// premises and conclusions as they are, possibly not well-formed
    Plain,
}

/// Tableau system over formulas with optional indices.
#[derive(Clone, Debug)]
pub struct System {
    pub language: Language,
    pub(crate) rules: Rules<Entry>,
    pub(crate) closure: Closure,
    pub(crate) start: Start,
}

impl System {
    pub fn new(language: Language, rules: Rules<Entry>, closure: Closure, start: Start) -> Self {
        Self {
            language,
            rules,
            closure,
            start,
        }
    }

    pub fn rules(&self) -> &Rules<Entry> {
        &self.rules
    }

    /// Return a system where every order of branches and nodes in rules is permitted.
    ///
    /// ~~~
    /// # use logics::tableaux::System;
    /// let inv = System::classical().invertible();
    /// assert!(inv.rules().get("R∧_2").is_some());
    /// assert!(inv.rules().get("R~~").is_some());
    /// ~~~
    pub fn invertible(&self) -> Self {
        Self {
            rules: self.rules.invertible(),
            ..self.clone()
        }
    }

    fn entry_is_closed(&self, entry: &Entry, branch: &[&Entry]) -> bool {
        match &self.closure {
            Closure::Negation => match entry.0.negated() {
                Some(fm) => branch.iter().any(|e| &e.0 == fm && e.1 == entry.1),
                None => false,
            },
            Closure::Index => {
                let opposite = |e: &&Entry| e.0 == entry.0 && e.1 == Some(0);
                entry.1 == Some(1) && branch.iter().any(opposite)
            }
            Closure::Pairs(pairs) => pairs.iter().any(|(first, second)| {
                let mut sub = Subst::new();
                entry.match_with(first, &mut sub) && branch.iter().any(|e| e.match_with(second, &mut sub.clone()))
            }),
            Closure::Atomic => false,
        }
    }
}

impl Tableaux for System {
    type Label = Entry;
    type Goal = Inference;

    fn rule_names(&self) -> Vec<Symbol> {
        self.rules.names().cloned().collect()
    }

    fn application(&self, rule: &str, branch: &[&Entry]) -> Option<Node<Entry>> {
        self.rules.application(rule, branch)
    }

    /// Determine whether a branch is closed.
    ///
    /// ~~~
    /// # use logics::{Formula, Indexed};
    /// # use logics::tableaux::{System, Tableaux};
    /// let p = Formula::atom("p");
    /// let (pos, neg) = (Indexed::from(p.clone()), Indexed::from(-p.clone()));
    /// let sys = System::classical();
    /// assert!(sys.branch_is_closed(&[&neg, &pos]));
    /// assert!(!sys.branch_is_closed(&[&pos]));
    /// ~~~
    fn branch_is_closed(&self, branch: &[&Entry]) -> bool {
        if let Closure::Atomic = self.closure {
            return match branch.last() {
                Some(e) => e.0.is_atomic() && self.language.is_well_formed(&e.0),
                None => false,
            };
        }
        branch.iter().any(|e| self.entry_is_closed(e, branch))
    }

    fn initial(&self, goal: &Inference) -> Result<Vec<Initial<Entry>>, String> {
        if goal.level() != 1 {
            return Err(format!("{} is not an inference between formulas", goal));
        }
        if self.start != Start::Plain {
            goal.check(&self.language)?;
        }
        let formula = |s: &Statement| s.formula().cloned().ok_or_else(|| format!("{} is not a formula", s));
        let mut result = Vec::new();
        for (index, premise) in goal.premises.iter().enumerate() {
            let label = match self.start {
                Start::Negated | Start::Plain => Indexed(formula(premise)?, None),
                Start::Indexed => Indexed(formula(premise)?, Some(1)),
            };
            let role = Role::Premise;
            result.push(Initial { role, index, label })
        }
        for (index, conclusion) in goal.conclusions.iter().enumerate() {
            let label = match self.start {
                Start::Negated => Indexed(-formula(conclusion)?, None),
                Start::Indexed => Indexed(formula(conclusion)?, Some(0)),
                Start::Plain => Indexed(formula(conclusion)?, None),
            };
            let role = Role::Conclusion;
            result.push(Initial { role, index, label })
        }
        Ok(result)
    }

    fn check_label(&self, label: &Entry) -> Result<(), String> {
        match self.start {
            Start::Plain => Ok(()),
            _ => self.language.check(&label.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Formula;

    #[test]
    fn closure_pairs() {
        let p = Formula::atom("p");
        let (p1, p0) = (Indexed(p.clone(), Some(1)), Indexed(p.clone(), Some(0)));
        let np1 = Indexed(-p.clone(), Some(1));
        let (fde, k3) = (System::fde(), System::k3());
        assert!(fde.branch_is_closed(&[&p0, &p1]));
        assert!(!fde.branch_is_closed(&[&p1, &np1]));
        assert!(k3.branch_is_closed(&[&p1, &np1]));
        assert!(!System::lp().branch_is_closed(&[&p1, &np1]));
    }

    #[test]
    fn index_closure() {
        let p = Formula::atom("p");
        let sys = System::classical_indexed();
        let (p1, p0) = (Indexed(p.clone(), Some(1)), Indexed(p, Some(0)));
        assert!(sys.branch_is_closed(&[&p0, &p1]));
        assert!(!sys.branch_is_closed(&[&p1, &p1]));
    }

    #[test]
    fn initial() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let inf = Inference::new([p.clone()], [q.clone()]);
        let labels = |sys: &System| -> Vec<Entry> {
            let init = sys.initial(&inf).unwrap();
            init.into_iter().map(|i| i.label).collect()
        };
        let classical = Vec::from([Indexed(p.clone(), None), Indexed(-q.clone(), None)]);
        assert_eq!(labels(&System::classical()), classical);
        let indexed = Vec::from([Indexed(p.clone(), Some(1)), Indexed(q.clone(), Some(0))]);
        assert_eq!(labels(&System::fde()), indexed);

        let malformed = Inference::new([Formula::atom("x")], []);
        assert!(System::classical().initial(&malformed).is_err());
    }
}
