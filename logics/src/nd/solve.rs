//! Proof search for natural deduction.
//!
//! The solver works forward from the premises by applying elimination rules
//! (and derived rules) until no new formula is obtained,
//! then backward from the goal by heuristics that introduce
//! the main connective of the goal or argue by contradiction.
//! Derived rules are replaced by their derivations in the final result.

use super::{Derivation, Justification, Step, System};
use crate::{Formula, Inference, Rewind, SolveError, Subst, Symbol};
use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use log::{debug, info, trace};

/// Search options.
#[derive(Copy, Clone, Debug)]
pub struct Opt {
    /// maximal number of nested goals
    pub depth: usize,
    /// maximal number of steps added during the whole search
    pub steps: usize,
}

impl Default for Opt {
    fn default() -> Self {
        Self {
            depth: 16,
            steps: 100_000,
        }
    }
}

/// Reason why a goal could not be established.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fail {
    /// all alternatives failed
    NoProof,
    /// the step budget is spent, so the whole search stops
    Budget,
}

/// Backward strategy to establish a goal.
pub trait Heuristic {
    fn is_applicable(&self, goal: &Formula) -> bool;

    /// Add steps to the derivation that conclude the goal,
    /// returning the index of the concluding step.
    ///
    /// On failure, the search rewinds the derivation.
    fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail>;
}

/// Natural deduction solver.
pub struct Solver {
    pub system: System,
    /// rules applied forward, given as inferences between schemas
    simplification: Vec<(Symbol, Inference)>,
    /// derivations of derived rules from their premises
    pub(crate) derived: Vec<(Symbol, Derivation)>,
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Solver {
    pub fn new(system: System) -> Self {
        Self {
            system,
            simplification: Vec::new(),
            derived: Vec::new(),
            heuristics: Vec::new(),
        }
    }

    /// Add a primitive rule of the system to the forward rules.
    pub fn simplify_with(mut self, name: &str, rule: Inference) -> Self {
        self.simplification.push((Symbol::from(name), rule));
        self
    }

    /// Add a derived rule to the forward rules.
    ///
    /// The rule has the premise steps of the derivation as premises
    /// and its final step as conclusion.
    pub fn derived(mut self, name: &str, derivation: Derivation) -> Self {
        let premises = derivation.iter().filter(|s| s.justification == Justification::Premise);
        let premises: Vec<_> = premises.map(|s| s.content.clone()).collect();
        let conclusion = derivation.last().map(|s| s.content.clone());
        let rule = Inference::new(premises, conclusion);
        self.simplification.push((Symbol::from(name), rule));
        self.derived.push((Symbol::from(name), derivation));
        self
    }

    pub fn heuristic(mut self, h: impl Heuristic + 'static) -> Self {
        self.heuristics.push(Box::new(h));
        self
    }

    /// Search for a derivation of an inference.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference};
    /// # use logics::nd::{Opt, Solver};
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let solver = Solver::classical();
    /// let inf = Inference::new([Formula::imp(p.clone(), q.clone()), -q], [-p]);
    /// let der = solver.solve(&inf, Opt::default()).unwrap();
    /// assert!(solver.system.is_correct_derivation(&der, Some(&inf), false).is_ok());
    /// ~~~
    pub fn solve(&self, inference: &Inference, opt: Opt) -> Result<Derivation, SolveError> {
        let goal = self.system.goal(inference).map_err(SolveError::Malformed)?;
        let premises = inference.premise_formulas();
        let derivation = premises.map(|p| Step::new(p.clone(), Justification::Premise)).collect();
        let mut search = Search::new(self, derivation, opt);
        match search.establish(goal) {
            Ok(i) => {
                info!("found derivation after {} steps", search.steps);
                let derivation = clean(search.derivation, i);
                self.expand(&derivation).map_err(|m| {
                    SolveError::Inappropriate(format!("derived rule leaves {} unbound", m))
                })
            }
            Err(Fail::Budget) => {
                let e = format!("Step limit of {} exceeded", opt.steps);
                Err(SolveError::Exhausted(e))
            }
            Err(Fail::NoProof) if search.exhausted => {
                let e = format!("Depth limit of {} exceeded", opt.depth);
                Err(SolveError::Exhausted(e))
            }
            Err(Fail::NoProof) => Err(SolveError::Unprovable(format!("{}", inference))),
        }
    }

    /// Replace steps justified by derived rules by their derivations.
    fn expand(&self, derivation: &Derivation) -> Result<Derivation, Symbol> {
        let mut result = Derivation::default();
        // new index of every old step
        let mut map: Vec<usize> = Vec::new();
        for (i, step) in derivation.iter().enumerate() {
            let renumber = |j: &usize| if *j == i { map.len() } else { map[*j] };
            let renumber = |js: &[usize]| js.iter().map(renumber).collect::<Vec<_>>();
            let on_steps = renumber(&step.on_steps);
            let open = renumber(&step.open_suppositions);

            let derived = match &step.justification {
                Justification::Rule(r) => self.derived.iter().find(|(name, _)| name == r),
                _ => None,
            };
            match derived {
                None => {
                    let step = Step::new(step.content.clone(), step.justification.clone());
                    result.push(step.on(on_steps).open(open))
                }
                Some((name, d)) => {
                    debug!("expand {} at step {}", name, i);
                    let cited = step.on_steps.iter().map(|j| &derivation[*j].content);
                    let cited: Vec<_> = cited.collect();
                    let rule = (&cited[..], &step.content);
                    let len = result.len();
                    result.extend(expansion(d, rule, &on_steps, &open, len)?)
                }
            }
            map.push(result.len() - 1);
        }
        Ok(result)
    }
}

/// Instantiate the derivation of a derived rule.
///
/// The premises of the derivation are identified with the cited steps,
/// and its remaining steps are placed starting from `base`,
/// inside the suppositions `open`.
fn expansion(
    d: &Derivation,
    (premises, conclusion): (&[&Formula], &Formula),
    on_steps: &[usize],
    open: &[usize],
    base: usize,
) -> Result<Vec<Step>, Symbol> {
    let k = d.iter().take_while(|s| s.justification == Justification::Premise).count();
    let mut sub = Subst::new();
    for (step, fm) in d.iter().zip(premises) {
        fm.match_with(&step.content, &mut sub);
    }
    if let Some(last) = d.last() {
        conclusion.match_with(&last.content, &mut sub);
    }

    let map = |j: &usize| if *j < k { on_steps[*j] } else { base + j - k };
    let steps = d[k..].iter().map(|step| {
        let content = step.content.instantiate(&sub)?;
        let on = step.on_steps.iter().map(map);
        let inner = step.open_suppositions.iter().map(map);
        let step = Step::new(content, step.justification.clone()).on(on);
        Ok::<_, Symbol>(step.open(open.iter().copied().chain(inner)))
    });
    steps.collect()
}

/// Keep only the steps that the step `goal` depends on, and drop all steps after it.
fn clean(derivation: Derivation, goal: usize) -> Derivation {
    let mut used = HashSet::new();
    let mut todo = Vec::from([goal]);
    while let Some(i) = todo.pop() {
        if used.insert(i) {
            let step = &derivation[i];
            todo.extend(step.on_steps.iter().chain(&step.open_suppositions))
        }
    }
    let premise = |s: &Step| s.justification == Justification::Premise;
    let keep = |(i, s): &(usize, &Step)| used.contains(i) || premise(s);
    let kept: Vec<_> = derivation.iter().enumerate().take(goal + 1).filter(keep).collect();

    let map = kept.iter().enumerate().map(|(new, (old, _))| (*old, new));
    let map: HashMap<usize, usize> = map.collect();
    let renumber = |js: &[usize]| js.iter().map(|j| map[j]).collect::<Vec<_>>();
    let mut result: Derivation = kept
        .iter()
        .map(|(_, s)| {
            let step = Step::new(s.content.clone(), s.justification.clone());
            step.on(renumber(&s.on_steps)).open(renumber(&s.open_suppositions))
        })
        .collect();
    // the goal may be a premise that is followed by other premises
    if map[&goal] + 1 != result.len() {
        let step = Step::new(derivation[goal].content.clone(), "repetition");
        result.push(step.on([map[&goal]]))
    }
    result
}

/// State of a search for a derivation.
pub struct Search<'a> {
    solver: &'a Solver,
    opt: Opt,
    derivation: Derivation,
    /// number of steps added so far, including those that were rewound
    steps: usize,
    /// goals being established, with the formulas accessible when they were posed
    goals: Vec<(Formula, HashSet<Formula>)>,
    /// whether a goal was abandoned for being too deep
    exhausted: bool,
}

impl<'a> Search<'a> {
    fn new(solver: &'a Solver, derivation: Derivation, opt: Opt) -> Self {
        Self {
            solver,
            opt,
            derivation,
            steps: 0,
            goals: Vec::new(),
            exhausted: false,
        }
    }

    pub fn derivation(&self) -> &Derivation {
        &self.derivation
    }

    /// Return the suppositions open at the end of the derivation.
    pub fn open(&self) -> Vec<usize> {
        self.derivation.open_suppositions().to_vec()
    }

    /// Return a step with the given content that is accessible at the end of the derivation.
    pub fn accessible(&self, fm: &Formula) -> Option<usize> {
        self.derivation.accessible(fm)
    }

    fn accessible_steps(&self) -> impl Iterator<Item = (usize, &Step)> {
        let open = self.derivation.open_suppositions();
        let steps = self.derivation.iter().enumerate();
        steps.filter(move |(_, s)| s.is_accessible_from(open))
    }

    /// Return the accessible steps whose content is a negation.
    pub fn accessible_negations(&self) -> Vec<(usize, Formula)> {
        let negated = |(i, s): (usize, &Step)| s.content.negated().map(|n| (i, n.clone()));
        self.accessible_steps().filter_map(negated).collect()
    }

    /// Append a step and return its index.
    pub fn push(&mut self, step: Step) -> Result<usize, Fail> {
        if self.steps >= self.opt.steps {
            debug!("step limit reached");
            return Err(Fail::Budget);
        }
        self.steps += 1;
        trace!("{}. {}", self.derivation.len(), step);
        self.derivation.push(step);
        Ok(self.derivation.len() - 1)
    }

    /// Open a new supposition.
    pub fn suppose(&mut self, fm: Formula) -> Result<usize, Fail> {
        let mut open = self.open();
        open.push(self.derivation.len());
        self.push(Step::new(fm, Justification::Supposition).open(open))
    }

    /// Apply a rule inside the current suppositions.
    pub fn apply<const N: usize>(&mut self, fm: Formula, rule: &str, on: [usize; N]) -> Result<usize, Fail> {
        let open = self.open();
        self.push(Step::new(fm, rule).on(on).open(open))
    }

    /// Apply a rule that closes the innermost supposition,
    /// repeating the last premise if it is not the last step inside the supposition.
    pub fn discharge(&mut self, fm: Formula, rule: &str, sup: usize, last: usize) -> Result<usize, Fail> {
        let mut open = self.open();
        let inside = self.derivation[last].open_suppositions.contains(&sup);
        let last = if last + 1 != self.derivation.len() || !inside {
            let content = self.derivation[last].content.clone();
            self.apply(content, "repetition", [last])?
        } else {
            last
        };
        // close everything up to the supposition
        open.retain(|s| *s < sup);
        self.push(Step::new(fm, rule).on([sup, last]).open(open))
    }

    /// Add steps to the derivation that conclude the goal,
    /// and return the index of the concluding step.
    ///
    /// The concluding step is accessible at the end of the derivation.
    pub fn establish(&mut self, goal: &Formula) -> Result<usize, Fail> {
        if let Some(i) = self.accessible(goal) {
            return Ok(i);
        }
        if self.goals.len() >= self.opt.depth {
            debug!("depth limit reached for {}", goal);
            self.exhausted = true;
            return Err(Fail::NoProof);
        }
        let context: HashSet<Formula> = self.accessible_steps().map(|(_, s)| s.content.clone()).collect();
        let key = (goal.clone(), context);
        if self.goals.contains(&key) {
            debug!("loop on {}", goal);
            return Err(Fail::NoProof);
        }
        self.goals.push(key);
        let result = self.establish_new(goal);
        self.goals.pop();
        result
    }

    fn establish_new(&mut self, goal: &Formula) -> Result<usize, Fail> {
        debug!("establish {} (depth {})", goal, self.goals.len());
        let len = self.derivation.len();
        if let Some(i) = self.simplify(goal)? {
            return Ok(i);
        }
        let simplified = self.derivation.len();
        let solver = self.solver;
        for h in solver.heuristics.iter().filter(|h| h.is_applicable(goal)) {
            match h.apply(self, goal) {
                Ok(i) => return Ok(i),
                Err(Fail::Budget) => return Err(Fail::Budget),
                Err(Fail::NoProof) => self.derivation.rewind(simplified),
            }
        }
        debug!("failed to establish {}", goal);
        self.derivation.rewind(len);
        Err(Fail::NoProof)
    }

    /// Apply forward rules until no new formula is obtained.
    ///
    /// Stop early when the goal or a contradiction is obtained.
    fn simplify(&mut self, goal: &Formula) -> Result<Option<usize>, Fail> {
        let falsum = Formula::falsum();
        let solver = self.solver;
        loop {
            let mut changed = false;
            for (name, rule) in &solver.simplification {
                while let Some((content, on)) = self.forward(rule) {
                    let i = self.apply_with(content, name, on)?;
                    changed = true;
                    if &self.derivation[i].content == goal {
                        return Ok(Some(i));
                    } else if self.derivation[i].content == falsum {
                        return Ok(None);
                    }
                }
            }
            if !changed {
                return Ok(None);
            }
        }
    }

    fn apply_with(&mut self, fm: Formula, rule: &Symbol, on: Vec<usize>) -> Result<usize, Fail> {
        let open = self.open();
        self.push(Step::new(fm, rule.clone()).on(on).open(open))
    }

    /// Find an application of a forward rule to accessible steps
    /// whose conclusion is not yet accessible.
    fn forward(&self, rule: &Inference) -> Option<(Formula, Vec<usize>)> {
        let premises: Vec<_> = rule.premise_formulas().collect();
        let conclusion = rule.conclusion_formulas().next()?;
        let steps: Vec<_> = self.accessible_steps().collect();
        let mut found = None;
        let mut on = Vec::new();
        let mut sub = Subst::new();
        self.premise_matches(&premises, &steps, &mut sub, &mut on, &mut |sub, on| {
            match conclusion.instantiate(sub) {
                Ok(c) if self.accessible(&c).is_none() => {
                    found = Some((c, on.to_vec()));
                    true
                }
                _ => false,
            }
        });
        found
    }

    /// Enumerate the accessible steps matching a sequence of premises,
    /// until `f` returns true.
    fn premise_matches(
        &self,
        premises: &[&Formula],
        steps: &[(usize, &Step)],
        sub: &mut Subst,
        on: &mut Vec<usize>,
        f: &mut impl FnMut(&Subst, &[usize]) -> bool,
    ) -> bool {
        let (premise, rest) = match premises.split_first() {
            Some(split) => split,
            None => return f(sub, on),
        };
        for (i, step) in steps {
            let ptr = crate::Ptr::from(&*sub);
            if step.content.match_with(premise, sub) {
                on.push(*i);
                if self.premise_matches(rest, steps, sub, on, f) {
                    return true;
                }
                on.pop();
                sub.rewind(ptr);
            }
        }
        false
    }
}

impl Rewind<usize> for Search<'_> {
    fn rewind(&mut self, len: usize) {
        self.derivation.rewind(len)
    }
}

pub mod heuristics {
    //! Heuristics for the classical rules.

    use super::{Fail, Heuristic, Search};
    use crate::formula::{AND, IMP, OR};
    use crate::{Formula, Rewind};

    /// Conclude anything from a contradiction.
    pub struct Efsq;

    impl Heuristic for Efsq {
        fn is_applicable(&self, goal: &Formula) -> bool {
            *goal != Formula::falsum()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let falsum = search.accessible(&Formula::falsum()).ok_or(Fail::NoProof)?;
            search.apply(goal.clone(), "EFSQ", [falsum])
        }
    }

    pub struct Conjunction;

    impl Heuristic for Conjunction {
        fn is_applicable(&self, goal: &Formula) -> bool {
            goal.app_of(AND).is_some()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let (l, r) = binary(goal, AND)?;
            let l = search.establish(l)?;
            let r = search.establish(r)?;
            search.apply(goal.clone(), "I∧", [l, r])
        }
    }

    pub struct Conditional;

    impl Heuristic for Conditional {
        fn is_applicable(&self, goal: &Formula) -> bool {
            goal.app_of(IMP).is_some()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let (l, r) = binary(goal, IMP)?;
            let sup = search.suppose(l.clone())?;
            let last = search.establish(r)?;
            search.discharge(goal.clone(), "I→", sup, last)
        }
    }

    pub struct Disjunction;

    impl Heuristic for Disjunction {
        fn is_applicable(&self, goal: &Formula) -> bool {
            goal.app_of(OR).is_some()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let (l, r) = binary(goal, OR)?;
            let len = search.derivation().len();
            match search.establish(l) {
                Ok(i) => return search.apply(goal.clone(), "I∨1", [i]),
                Err(Fail::Budget) => return Err(Fail::Budget),
                Err(Fail::NoProof) => search.rewind(len),
            }
            let i = search.establish(r)?;
            search.apply(goal.clone(), "I∨2", [i])
        }
    }

    /// Prove a negation by deriving a contradiction from the negated formula.
    pub struct Negation;

    impl Heuristic for Negation {
        fn is_applicable(&self, goal: &Formula) -> bool {
            goal.negated().is_some()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let fm = goal.negated().ok_or(Fail::NoProof)?;
            let sup = search.suppose(fm.clone())?;
            let falsum = search.establish(&Formula::falsum())?;
            search.discharge(goal.clone(), "I~", sup, falsum)
        }
    }

    /// Suppose the negation of the goal and derive a contradiction.
    pub struct Reductio;

    impl Heuristic for Reductio {
        fn is_applicable(&self, goal: &Formula) -> bool {
            *goal != Formula::falsum()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let sup = search.suppose(-goal.clone())?;
            let falsum = search.establish(&Formula::falsum())?;
            let nn = search.discharge(-(-goal.clone()), "I~", sup, falsum)?;
            search.apply(goal.clone(), "~~", [nn])
        }
    }

    /// Derive a contradiction by establishing the negand of an accessible negation.
    pub struct Contradiction;

    impl Heuristic for Contradiction {
        fn is_applicable(&self, goal: &Formula) -> bool {
            *goal == Formula::falsum()
        }

        fn apply(&self, search: &mut Search, goal: &Formula) -> Result<usize, Fail> {
            let len = search.derivation().len();
            for (neg, fm) in search.accessible_negations() {
                match search.establish(&fm) {
                    Ok(i) => return search.apply(goal.clone(), "E~", [neg, i]),
                    Err(Fail::Budget) => return Err(Fail::Budget),
                    Err(Fail::NoProof) => search.rewind(len),
                }
            }
            Err(Fail::NoProof)
        }
    }

    fn binary<'f>(fm: &'f Formula, c: &str) -> Result<(&'f Formula, &'f Formula), Fail> {
        match fm.app_of(c) {
            Some([l, r]) => Ok((l, r)),
            _ => Err(Fail::NoProof),
        }
    }
}
