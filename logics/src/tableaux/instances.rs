use super::{Closure, Entry, Rules, Start, System};
use crate::tree::Node;
use crate::{Formula, Indexed, Language, Symbol};
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

type E = (Formula, Option<u8>);

/// Build a rule that expands a premise into branches of chained nodes.
fn rule(name: &str, (fm, i): E, branches: Vec<Vec<E>>) -> (Symbol, Node<Entry>) {
    let branch = |b: Vec<E>| Node::chain(b.into_iter().map(|(fm, i)| Node::justified(Indexed(fm, i), name)));
    let children = branches.into_iter().filter_map(branch);
    (Symbol::from(name), Node::new(Indexed(fm, i)).children(children))
}

fn metas() -> (Formula, Formula) {
    (Formula::meta("A"), Formula::meta("B"))
}

fn and(a: &Formula, b: &Formula) -> Formula {
    a.clone() & b.clone()
}

fn or(a: &Formula, b: &Formula) -> Formula {
    a.clone() | b.clone()
}

const N: Option<u8> = None;
const T: Option<u8> = Some(1);
const F: Option<u8> = Some(0);

impl System {
    /// Classical tableaux with negated conclusions.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference};
    /// # use logics::tableaux::{System, Tableaux};
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let sys = System::classical();
    /// let dm = Inference::new([-(p.clone() & q.clone())], [-p.clone() | -q.clone()]);
    /// assert_eq!(sys.is_valid(&dm), Ok(true));
    /// let converse = Inference::new([p.clone() | q.clone()], [p & q]);
    /// assert_eq!(sys.is_valid(&converse), Ok(false));
    /// ~~~
    pub fn classical() -> Self {
        let (a, b) = metas();
        let (na, nb) = (-a.clone(), -b.clone());
        let rules = Vec::from([
            rule("R~~", (-na.clone(), N), vec![vec![(a.clone(), N)]]),
            rule("R∧", (and(&a, &b), N), vec![vec![(a.clone(), N), (b.clone(), N)]]),
            rule("R~∧", (-and(&a, &b), N), vec![vec![(na.clone(), N)], vec![(nb.clone(), N)]]),
            rule("R∨", (or(&a, &b), N), vec![vec![(a.clone(), N)], vec![(b.clone(), N)]]),
            rule("R~∨", (-or(&a, &b), N), vec![vec![(na.clone(), N), (nb.clone(), N)]]),
            rule("R→", (Formula::imp(a.clone(), b.clone()), N), vec![vec![(na.clone(), N)], vec![(b.clone(), N)]]),
            rule("R~→", (-Formula::imp(a.clone(), b.clone()), N), vec![vec![(a.clone(), N), (nb.clone(), N)]]),
            rule(
                "R↔",
                (Formula::iff(a.clone(), b.clone()), N),
                vec![vec![(a.clone(), N), (b.clone(), N)], vec![(na.clone(), N), (nb.clone(), N)]],
            ),
            rule(
                "R~↔",
                (-Formula::iff(a.clone(), b.clone()), N),
                vec![vec![(na, N), (b.clone(), N)], vec![(a, N), (nb, N)]],
            ),
        ]);
        Self::new(Language::classical(), Rules::new(rules), Closure::Negation, Start::Negated)
    }

    /// Classical tableaux where formulas are indexed with truth values.
    pub fn classical_indexed() -> Self {
        let (a, b) = metas();
        let imp = Formula::imp(a.clone(), b.clone());
        let iff = Formula::iff(a.clone(), b.clone());
        let rules = Vec::from([
            rule("R~1", (-a.clone(), T), vec![vec![(a.clone(), F)]]),
            rule("R~0", (-a.clone(), F), vec![vec![(a.clone(), T)]]),
            rule("R∧1", (and(&a, &b), T), vec![vec![(a.clone(), T), (b.clone(), T)]]),
            rule("R∧0", (and(&a, &b), F), vec![vec![(a.clone(), F)], vec![(b.clone(), F)]]),
            rule("R∨1", (or(&a, &b), T), vec![vec![(a.clone(), T)], vec![(b.clone(), T)]]),
            rule("R∨0", (or(&a, &b), F), vec![vec![(a.clone(), F), (b.clone(), F)]]),
            rule("R→1", (imp.clone(), T), vec![vec![(a.clone(), F)], vec![(b.clone(), T)]]),
            rule("R→0", (imp, F), vec![vec![(a.clone(), T), (b.clone(), F)]]),
            rule(
                "R↔1",
                (iff.clone(), T),
                vec![vec![(a.clone(), T), (b.clone(), T)], vec![(a.clone(), F), (b.clone(), F)]],
            ),
            rule("R↔0", (iff, F), vec![vec![(a.clone(), T), (b.clone(), F)], vec![(a, F), (b, T)]]),
        ]);
        Self::new(Language::classical(), Rules::new(rules), Closure::Index, Start::Indexed)
    }

    /// First degree entailment, with closure when a formula is both true and not true.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference};
    /// # use logics::tableaux::{System, Tableaux};
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let explosion = Inference::new([p.clone(), -p.clone()], [q.clone()]);
    /// let lem = Inference::new([], [p.clone() | -p.clone()]);
    /// assert_eq!(System::fde().is_valid(&explosion), Ok(false));
    /// assert_eq!(System::k3().is_valid(&explosion), Ok(true));
    /// assert_eq!(System::k3().is_valid(&lem), Ok(false));
    /// assert_eq!(System::lp().is_valid(&lem), Ok(true));
    /// ~~~
    pub fn fde() -> Self {
        let (a, b) = metas();
        let (na, nb) = (-a.clone(), -b.clone());
        let rules = Vec::from([
            rule("R~~1", (-na.clone(), T), vec![vec![(a.clone(), T)]]),
            rule("R~~0", (-na.clone(), F), vec![vec![(a.clone(), F)]]),
            rule("R∧1", (and(&a, &b), T), vec![vec![(a.clone(), T), (b.clone(), T)]]),
            rule("R∧0", (and(&a, &b), F), vec![vec![(a.clone(), F)], vec![(b.clone(), F)]]),
            rule("R~∧1", (-and(&a, &b), T), vec![vec![(or(&na, &nb), T)]]),
            rule("R~∧0", (-and(&a, &b), F), vec![vec![(or(&na, &nb), F)]]),
            rule("R∨1", (or(&a, &b), T), vec![vec![(a.clone(), T)], vec![(b.clone(), T)]]),
            rule("R∨0", (or(&a, &b), F), vec![vec![(a.clone(), F), (b.clone(), F)]]),
            rule("R~∨1", (-or(&a, &b), T), vec![vec![(and(&na, &nb), T)]]),
            rule("R~∨0", (-or(&a, &b), F), vec![vec![(and(&na, &nb), F)]]),
        ]);
        let closure = Vec::from([(Indexed(a.clone(), F), Indexed(a, T))]);
        let language = Language::classical_no_conditional();
        Self::new(language, Rules::new(rules), Closure::Pairs(closure), Start::Indexed)
    }

    /// Strong Kleene logic, where additionally `A` and `~A` cannot both be true.
    pub fn k3() -> Self {
        let a = Formula::meta("A");
        Self::fde().with_closure_pair(Indexed(a.clone(), T), Indexed(-a, T))
    }

    /// Logic of paradox, where additionally `A` and `~A` cannot both be untrue.
    pub fn lp() -> Self {
        let a = Formula::meta("A");
        Self::fde().with_closure_pair(Indexed(a.clone(), F), Indexed(-a, F))
    }

    fn with_closure_pair(mut self, first: Entry, second: Entry) -> Self {
        if let Closure::Pairs(pairs) = &mut self.closure {
            pairs.push((first, second))
        }
        self
    }

    /// Trees that decompose a formula into its atomic parts.
    ///
    /// A formula is well-formed iff its constructive tree has only closed branches,
    /// that means that all its leaves are well-formed atomic formulas.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference, Language};
    /// # use logics::tableaux::{System, Tableaux};
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let sys = System::constructive(Language::classical());
    /// assert_eq!(sys.is_valid(&Inference::new([], [-p.clone() | q])), Ok(true));
    /// assert_eq!(sys.is_valid(&Inference::new([], [-p & Formula::atom("x")])), Ok(false));
    /// ~~~
    pub fn constructive(language: Language) -> Self {
        let mut rules = Rules::default();
        for (c, arity) in language.constants() {
            let args: Vec<_> = (1..=arity).map(|i| Formula::meta(format!("A{}", i))).collect();
            let name = format!("R{}", c);
            let branches = args.iter().map(|arg| vec![(arg.clone(), N)]).collect();
            let (name, node) = rule(&name, (Formula::app(c.clone(), args), N), branches);
            rules.push(name, node)
        }
        Self::new(language, rules, Closure::Atomic, Start::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableaux::Tableaux;

    #[test]
    fn rule_shapes() {
        let sys = System::classical();
        let r = sys.rules().get("R↔").unwrap();
        assert_eq!(r.children.len(), 2);
        assert_eq!(r.height(), 2);
        assert_eq!(r.children[1].justification, Some(Symbol::from("R↔")));

        let names: Vec<_> = System::fde().rule_names();
        assert_eq!(names.len(), 10);
        assert!(!System::fde().language.is_well_formed(&Formula::imp(Formula::atom("p"), Formula::atom("q"))));
    }

    #[test]
    fn constructive_rules() {
        let sys = System::constructive(Language::classical());
        let names: Vec<_> = sys.rule_names();
        let expected = ["R~", "R↔", "R→", "R∧", "R∨"].map(Symbol::from);
        assert_eq!(names.len(), expected.len());
        assert!(expected.iter().all(|e| names.contains(e)));
        assert_eq!(sys.rules().get("R∧").unwrap().children.len(), 2);
        assert_eq!(sys.rules().get("R~").unwrap().children.len(), 1);
    }
}
