use super::solve::heuristics::*;
use super::{Derivation, Rule, Solver, Step, System};
use crate::{Formula, Inference, Language, Symbol};
use alloc::vec::Vec;

fn metas() -> (Formula, Formula, Formula) {
    (Formula::meta("A"), Formula::meta("B"), Formula::meta("C"))
}

fn named(rules: Vec<(&str, Rule)>) -> impl Iterator<Item = (Symbol, Rule)> + '_ {
    rules.into_iter().map(|(name, rule)| (Symbol::from(name), rule))
}

impl System {
    /// Classical propositional logic with introduction and elimination rules.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// # use logics::nd::{Derivation, Step, System};
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let der: Derivation = vec![
    ///     Step::new(p.clone() & q.clone(), "premise"),
    ///     Step::new(q.clone(), "E∧2").on([0]),
    ///     Step::new(p.clone(), "E∧1").on([0]),
    ///     Step::new(q & p, "I∧").on([1, 2]),
    /// ].into_iter().collect();
    /// assert!(System::classical().is_correct_derivation(&der, None, false).is_ok());
    /// ~~~
    pub fn classical() -> Self {
        let (a, b, c) = metas();
        let falsum = Formula::falsum();
        let rules = Vec::from([
            (
                "I~",
                Rule::build()
                    .gap()
                    .supposition(a.clone(), [0])
                    .gap()
                    .premise(falsum.clone(), [0])
                    .conclusion(-a.clone(), [0, 1], []),
            ),
            (
                "E~",
                Rule::build()
                    .gap()
                    .premise(-a.clone(), [])
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .conclusion(falsum.clone(), [0, 1], []),
            ),
            (
                "~~",
                Rule::build()
                    .gap()
                    .premise(-(-a.clone()), [])
                    .gap()
                    .conclusion(a.clone(), [0], []),
            ),
            (
                "I→",
                Rule::build()
                    .gap()
                    .supposition(a.clone(), [0])
                    .gap()
                    .premise(b.clone(), [0])
                    .conclusion(Formula::imp(a.clone(), b.clone()), [0, 1], []),
            ),
            (
                "E→",
                Rule::build()
                    .gap()
                    .premise(Formula::imp(a.clone(), b.clone()), [])
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .conclusion(b.clone(), [0, 1], []),
            ),
            (
                "I∧",
                Rule::build()
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .premise(b.clone(), [])
                    .gap()
                    .conclusion(a.clone() & b.clone(), [0, 1], []),
            ),
            (
                "E∧1",
                Rule::build()
                    .gap()
                    .premise(a.clone() & b.clone(), [])
                    .gap()
                    .conclusion(a.clone(), [0], []),
            ),
            (
                "E∧2",
                Rule::build()
                    .gap()
                    .premise(a.clone() & b.clone(), [])
                    .gap()
                    .conclusion(b.clone(), [0], []),
            ),
            (
                "I∨1",
                Rule::build()
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .conclusion(a.clone() | b.clone(), [0], []),
            ),
            (
                "I∨2",
                Rule::build()
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .conclusion(b.clone() | a.clone(), [0], []),
            ),
            (
                "E∨",
                Rule::build()
                    .gap()
                    .premise(a.clone() | b.clone(), [])
                    .gap()
                    .premise(Formula::imp(a.clone(), c.clone()), [])
                    .gap()
                    .premise(Formula::imp(b, c.clone()), [])
                    .gap()
                    .conclusion(c, [0, 1, 2], []),
            ),
            (
                "repetition",
                Rule::build()
                    .gap()
                    .premise(a.clone(), [])
                    .gap()
                    .conclusion(a.clone(), [0], []),
            ),
            (
                "EFSQ",
                Rule::build()
                    .gap()
                    .premise(falsum, [])
                    .gap()
                    .conclusion(a, [0], []),
            ),
        ]);
        Self::new(Language::classical(), named(rules))
    }

    /// Classical logic where negation is introduced by deriving `B ∧ ~B`
    /// and eliminated by double negation.
    pub fn classical_alt() -> Self {
        let (a, b, _) = metas();
        let classical = Self::classical();
        let kept = ["I→", "E→", "I∧", "E∧1", "E∧2", "I∨1", "I∨2", "E∨", "EFSQ"];
        let kept = classical.rules().filter(|(name, _)| kept.contains(&name.as_str()));
        let mut rules: Vec<_> = kept.map(|(name, rule)| (name.clone(), rule.clone())).collect();
        let intro = Rule::build()
            .gap()
            .supposition(a.clone(), [0])
            .gap()
            .premise(b.clone() & -b, [0])
            .conclusion(-a.clone(), [0, 1], []);
        let elim = Rule::build()
            .gap()
            .premise(-(-a.clone()), [])
            .gap()
            .conclusion(a, [0], []);
        rules.push((Symbol::from("I~"), intro));
        rules.push((Symbol::from("E~"), elim));
        Self::new(Language::classical(), rules)
    }
}

fn premises<'a>(fms: impl IntoIterator<Item = &'a Formula>) -> Vec<Step> {
    fms.into_iter().map(|fm| Step::new(fm.clone(), "premise")).collect()
}

fn derivation(premise_steps: Vec<Step>, steps: Vec<Step>) -> Derivation {
    premise_steps.into_iter().chain(steps).collect()
}

impl Solver {
    /// Solver for [`System::classical`].
    ///
    /// Besides the elimination rules, it simplifies with
    /// modus tollens, De Morgan, negated conditional and
    /// disjunctive syllogism, which it expands to primitive rules.
    pub fn classical() -> Self {
        let (a, b, c) = metas();
        let falsum = Formula::falsum();
        let imp = Formula::imp;
        let inf = |ps: Vec<Formula>, c: Formula| Inference::new(ps, core::iter::once(c));

        let mt_a = derivation(
            premises(&[imp(a.clone(), b.clone()), -b.clone()]),
            Vec::from([
                Step::new(a.clone(), "supposition").open([2]),
                Step::new(b.clone(), "E→").on([0, 2]).open([2]),
                Step::new(falsum.clone(), "E~").on([1, 3]).open([2]),
                Step::new(-a.clone(), "I~").on([2, 4]),
            ]),
        );
        let mt_b = derivation(
            premises(&[imp(a.clone(), -b.clone()), b.clone()]),
            Vec::from([
                Step::new(a.clone(), "supposition").open([2]),
                Step::new(-b.clone(), "E→").on([0, 2]).open([2]),
                Step::new(falsum.clone(), "E~").on([3, 1]).open([2]),
                Step::new(-a.clone(), "I~").on([2, 4]),
            ]),
        );
        let dm_a = derivation(
            premises(&[-(a.clone() | b.clone())]),
            Vec::from([
                Step::new(a.clone(), "supposition").open([1]),
                Step::new(a.clone() | b.clone(), "I∨1").on([1]).open([1]),
                Step::new(falsum.clone(), "E~").on([0, 2]).open([1]),
                Step::new(-a.clone(), "I~").on([1, 3]),
            ]),
        );
        let dm_b = derivation(
            premises(&[-(a.clone() | b.clone())]),
            Vec::from([
                Step::new(b.clone(), "supposition").open([1]),
                Step::new(a.clone() | b.clone(), "I∨2").on([1]).open([1]),
                Step::new(falsum.clone(), "E~").on([0, 2]).open([1]),
                Step::new(-b.clone(), "I~").on([1, 3]),
            ]),
        );
        let neg_cond_a = derivation(
            premises(&[-imp(a.clone(), b.clone())]),
            Vec::from([
                Step::new(-a.clone(), "supposition").open([1]),
                Step::new(a.clone(), "supposition").open([1, 2]),
                Step::new(falsum.clone(), "E~").on([1, 2]).open([1, 2]),
                Step::new(b.clone(), "EFSQ").on([3]).open([1, 2]),
                Step::new(imp(a.clone(), b.clone()), "I→").on([2, 4]).open([1]),
                Step::new(falsum.clone(), "E~").on([0, 5]).open([1]),
                Step::new(-(-a.clone()), "I~").on([1, 6]),
                Step::new(a.clone(), "~~").on([7]),
            ]),
        );
        let neg_cond_b = derivation(
            premises(&[-imp(a.clone(), b.clone())]),
            Vec::from([
                Step::new(b.clone(), "supposition").open([1]),
                Step::new(a.clone(), "supposition").open([1, 2]),
                Step::new(b.clone(), "repetition").on([1]).open([1, 2]),
                Step::new(imp(a.clone(), b.clone()), "I→").on([2, 3]).open([1]),
                Step::new(falsum.clone(), "E~").on([0, 4]).open([1]),
                Step::new(-b.clone(), "I~").on([1, 5]),
            ]),
        );
        let sd_a = derivation(
            premises(&[a.clone() | b.clone(), -a.clone()]),
            Vec::from([
                Step::new(a.clone(), "supposition").open([2]),
                Step::new(falsum.clone(), "E~").on([1, 2]).open([2]),
                Step::new(b.clone(), "EFSQ").on([3]).open([2]),
                Step::new(imp(a.clone(), b.clone()), "I→").on([2, 4]),
                Step::new(b.clone(), "supposition").open([6]),
                Step::new(b.clone(), "repetition").on([6]).open([6]),
                Step::new(imp(b.clone(), b.clone()), "I→").on([6, 7]),
                Step::new(b.clone(), "E∨").on([0, 5, 8]),
            ]),
        );
        let sd_b = derivation(
            premises(&[a.clone() | b.clone(), -b.clone()]),
            Vec::from([
                Step::new(a.clone(), "supposition").open([2]),
                Step::new(a.clone(), "repetition").on([2]).open([2]),
                Step::new(imp(a.clone(), a.clone()), "I→").on([2, 3]),
                Step::new(b.clone(), "supposition").open([5]),
                Step::new(falsum.clone(), "E~").on([1, 5]).open([5]),
                Step::new(a.clone(), "EFSQ").on([6]).open([5]),
                Step::new(imp(b.clone(), a.clone()), "I→").on([5, 7]),
                Step::new(a.clone(), "E∨").on([0, 4, 8]),
            ]),
        );

        Self::new(System::classical())
            .simplify_with("E∧1", inf(Vec::from([a.clone() & b.clone()]), a.clone()))
            .simplify_with("E∧2", inf(Vec::from([a.clone() & b.clone()]), b.clone()))
            .simplify_with("~~", inf(Vec::from([-(-a.clone())]), a.clone()))
            .simplify_with("E→", inf(Vec::from([imp(a.clone(), b.clone()), a.clone()]), b.clone()))
            .simplify_with("E~", inf(Vec::from([-a.clone(), a.clone()]), falsum))
            .simplify_with(
                "E∨",
                inf(Vec::from([a.clone() | b.clone(), imp(a.clone(), c.clone()), imp(b, c.clone())]), c),
            )
            .derived("MTa", mt_a)
            .derived("MTb", mt_b)
            .derived("DMa", dm_a)
            .derived("DMb", dm_b)
            .derived("NegConda", neg_cond_a)
            .derived("NegCondb", neg_cond_b)
            .derived("SDa", sd_a)
            .derived("SDb", sd_b)
            .heuristic(Efsq)
            .heuristic(Conjunction)
            .heuristic(Conditional)
            .heuristic(Disjunction)
            .heuristic(Negation)
            .heuristic(Reductio)
            .heuristic(Contradiction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants() {
        let system = System::classical();
        assert_eq!(system.variants("E∧").len(), 2);
        assert_eq!(system.variants("I~").len(), 1);
        assert!(system.variants("MP").is_empty());
    }

    #[test]
    fn derived_rules() {
        let solver = Solver::classical();
        for (name, d) in &solver.derived {
            let result = solver.system.is_correct_derivation(d, None, false);
            assert_eq!(result, Ok(()), "{}", name);
        }
    }
}
