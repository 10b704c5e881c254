use super::{Derivation, Justification, Rule, Step, System};
use crate::error::{CorrectionError, ErrorCode, Errors, Location};
use crate::{Formula, Inference, Subst};
use alloc::string::String;
use alloc::format;
use alloc::vec::Vec;
use hashbrown::HashMap;
use log::debug;

type Check = Result<(), CorrectionError>;

fn err(code: ErrorCode, step: usize, description: impl Into<String>) -> Check {
    Err(CorrectionError::new(code, Location::Step(step), description))
}

impl System {
    /// Return the conclusion of an inference that natural deduction can derive.
    pub(crate) fn goal<'a>(&self, inference: &'a Inference) -> Result<&'a Formula, String> {
        inference.check(&self.language)?;
        let mut conclusions = inference.conclusion_formulas();
        match (inference.level(), conclusions.next(), conclusions.next()) {
            (1, Some(conclusion), None) => Ok(conclusion),
            _ => Err(format!("{} must be an inference with exactly one conclusion", inference)),
        }
    }

    /// Check whether a derivation is correct,
    /// optionally verifying that it derives a given inference.
    ///
    /// If steps are not well-formed, checking stops after reporting them.
    /// Otherwise, all errors are reported unless `exit_on_first_error` is set.
    pub fn is_correct_derivation(
        &self,
        derivation: &Derivation,
        inference: Option<&Inference>,
        exit_on_first_error: bool,
    ) -> Result<(), Vec<CorrectionError>> {
        let mut errors = Errors::new(exit_on_first_error);
        // errors have already been recorded when this fails
        let _ = self.check_derivation(derivation, inference, &mut errors);
        errors.finish()
    }

    fn check_derivation(
        &self,
        derivation: &Derivation,
        inference: Option<&Inference>,
        errors: &mut Errors,
    ) -> Result<(), ()> {
        for (i, step) in derivation.iter().enumerate() {
            if let Err(e) = self.language.check(&step.content) {
                let e = CorrectionError::new(ErrorCode::MalformedFormula, Location::Step(i), e);
                errors.push(e)?
            }
        }
        let conclusion = match inference {
            Some(inf) => match self.goal(inf) {
                Ok(conclusion) => Some((inf, conclusion)),
                Err(e) => {
                    let e = CorrectionError::new(ErrorCode::MalformedInference, Location::Goal, e);
                    errors.push(e)?;
                    None
                }
            },
            None => None,
        };
        if !errors.is_empty() {
            return Err(());
        }

        for (i, step) in derivation.iter().enumerate() {
            let prev_open = match i.checked_sub(1) {
                Some(prev) => &derivation[prev].open_suppositions[..],
                None => &[],
            };
            let result = match &step.justification {
                Justification::Premise => {
                    self.check_premise(step, i, prev_open, inference, errors)?;
                    continue;
                }
                Justification::Supposition => match step.open_suppositions.split_last() {
                    Some((last, init)) if init == prev_open && *last == i => Ok(()),
                    _ => err(
                        ErrorCode::NdIncorrectSupposition,
                        i,
                        "Incorrect supposition handling",
                    ),
                },
                Justification::Rule(name) => self.check_rule_step(derivation, i, name),
            };
            if let Err(e) = result {
                errors.push(e)?
            }
        }

        if let Some((inf, conclusion)) = conclusion {
            let last = derivation.len().saturating_sub(1);
            match derivation.last() {
                Some(step) if &step.content == conclusion => {
                    if !step.open_suppositions.is_empty() {
                        let e = "Derivation ends with open suppositions";
                        errors.push(CorrectionError::new(
                            ErrorCode::NdIncorrectSupposition,
                            Location::Step(last),
                            e,
                        ))?
                    }
                }
                _ => {
                    debug!("conclusion of {} not reached", inf);
                    let e = "Final step of the derivation is not the conclusion of the inference";
                    let e = CorrectionError::new(ErrorCode::NdIncorrectConclusion, Location::Step(last), e);
                    errors.push(e)?
                }
            }
        }
        Ok(())
    }

    /// Record the errors of a premise step,
    /// which can be both an incorrect premise and incorrect supposition handling.
    fn check_premise(
        &self,
        step: &Step,
        i: usize,
        prev_open: &[usize],
        inference: Option<&Inference>,
        errors: &mut Errors,
    ) -> Result<(), ()> {
        if let Some(inf) = inference {
            if !inf.premise_formulas().any(|p| p == &step.content) {
                let e = "Step was marked as 'premise', but is not a premise of the inference given";
                errors.push(CorrectionError::new(ErrorCode::NdIncorrectPremise, Location::Step(i), e))?
            }
        }
        if step.open_suppositions != prev_open {
            let e = if i == 0 {
                "Incorrect supposition handling. Premise steps do not open suppositions"
            } else {
                "Incorrect supposition handling"
            };
            errors.push(CorrectionError::new(ErrorCode::NdIncorrectSupposition, Location::Step(i), e))?
        }
        Ok(())
    }

    /// Check a step justified by a rule name, trying all variants of the rule.
    ///
    /// If all variants fail with the same error, that error is returned,
    /// otherwise a generic error.
    fn check_rule_step(&self, derivation: &Derivation, i: usize, name: &str) -> Check {
        let variants = self.variants(name);
        if variants.is_empty() {
            let e = "Justification is incorrect, must be either 'premise', 'supposition', \
                     or the name of a specific axiom or rule";
            return err(ErrorCode::NdIncorrectJustification, i, e);
        }

        let on_steps = &derivation[i].on_steps;
        let orders = if self.order_sensitive {
            Vec::from([on_steps.clone()])
        } else {
            crate::permutations(on_steps)
        };

        let mut failures: Vec<CorrectionError> = Vec::new();
        for rule in variants {
            for on_steps in &orders {
                match self.check_application(&derivation[..=i], on_steps, rule) {
                    Ok(()) => return Ok(()),
                    Err(e) if failures.contains(&e) => (),
                    Err(e) => failures.push(e),
                }
            }
        }
        match &failures[..] {
            [e] => Err(e.clone()),
            _ => err(
                ErrorCode::NdRuleIncorrectlyApplied,
                i,
                "Incorrect application of rule",
            ),
        }
    }

    /// Check whether the last step of a derivation is a correct application of a rule,
    /// citing the given steps.
    pub fn is_correct_application(&self, derivation: &[Step], rule: &Rule) -> Check {
        match derivation.last() {
            Some(step) => self.check_application(derivation, &step.on_steps, rule),
            None => Ok(()),
        }
    }

    fn check_application(&self, derivation: &[Step], on_steps: &[usize], rule: &Rule) -> Check {
        use ErrorCode::{NdClosedSupposition, NdIncorrectOnSteps, NdIncorrectSupposition};
        use ErrorCode::NdRuleIncorrectlyApplied as Mismatch;

        let i = derivation.len() - 1;
        let step = &derivation[i];
        if on_steps.len() != rule.premise_count() {
            let e = "Number of on steps given are not equal to the number of rule premises";
            return err(NdIncorrectOnSteps, i, e);
        }
        if let Some(n) = on_steps.iter().find(|n| **n >= i) {
            let e = format!("On step {} is greater or equal than the current step, must be lower", n);
            return err(NdIncorrectOnSteps, i, e);
        }

        let mut sub = Subst::new();
        if !step.content.match_with(&rule.conclusion.content, &mut sub) {
            let e = format!("Step {} is not an instance of the conclusion of the rule given", i);
            return err(Mismatch, i, e);
        }

        // derivation step corresponding to each premise number of the rule
        let order = rule.conclusion.on_steps.iter().zip(on_steps.iter());
        let correspondence: HashMap<usize, usize> = order.map(|(k, n)| (*k, *n)).collect();
        // derivation steps corresponding to the suppositions of the rule
        let mut relevant: Vec<(usize, usize)> = Vec::new();
        let is_relevant = |relevant: &[(usize, usize)], s: &usize| relevant.iter().any(|(_, r)| r == s);

        // index that the next step has to have, unless preceded by a gap
        let mut next = Some(0);
        let premises = rule.premises.iter().scan(0, |k, premise| {
            // number premises, skipping gaps
            Some(premise.as_ref().map(|p| {
                *k += 1;
                (*k - 1, p)
            }))
        });
        for premise in premises {
            let (k, premise) = match premise {
                Some(kp) => kp,
                None => {
                    next = None;
                    continue;
                }
            };
            let n = match correspondence.get(&k) {
                Some(n) => *n,
                None => return err(NdIncorrectOnSteps, i, format!("Rule premise {} is not cited", k)),
            };
            if next.map_or(false, |next| next != n) {
                let e = format!(
                    "On step {} does not immediately follow the previous on step, as the rule requires",
                    n
                );
                return err(Mismatch, i, e);
            }
            let on = &derivation[n];
            if premise.supposition && on.justification != Justification::Supposition {
                let e = format!(
                    "Justification for on step {} does not coincide with the justification in rule premise {}",
                    n, k
                );
                return err(Mismatch, i, e);
            }
            if !on.content.match_with(&premise.content, &mut sub) {
                let e = format!("On step {} is not an instance of rule premise number {}", n, k);
                return err(Mismatch, i, e);
            }
            next = Some(n + 1);

            if premise.supposition {
                if let Some(id) = premise.open_suppositions.last() {
                    relevant.push((*id, n))
                }
            }
            for (id, s) in &relevant {
                if premise.open_suppositions.contains(id) != on.open_suppositions.contains(s) {
                    let e = format!("Incorrect use of suppositions in 'on step' {}", n);
                    return err(Mismatch, i, e);
                }
            }
            let closed = |s: &&usize| !is_relevant(&relevant, s) && !step.open_suppositions.contains(s);
            if on.open_suppositions.iter().any(|s| closed(&s)) {
                let e = format!("Step {} is in a closed supposition", n);
                return err(NdClosedSupposition, i, e);
            }
        }

        if next.map_or(false, |next| next != i) {
            let e = format!(
                "On step {} does not immediately follow the previous on step, as the rule requires",
                i
            );
            return err(Mismatch, i, e);
        }

        let handling = "Incorrect supposition handling";
        for (id, s) in &relevant {
            if rule.conclusion.open_suppositions.contains(id) != step.open_suppositions.contains(s) {
                return err(NdIncorrectSupposition, i, handling);
            }
        }
        let prev_open = match i.checked_sub(1) {
            Some(prev) => &derivation[prev].open_suppositions[..],
            None => &[],
        };
        let outside = |open: &[usize]| -> Vec<usize> {
            let open = open.iter().filter(|s| !is_relevant(&relevant, s));
            open.copied().collect()
        };
        if outside(prev_open) != outside(&step.open_suppositions) {
            return err(NdIncorrectSupposition, i, handling);
        }
        if !prev_open.starts_with(&step.open_suppositions) {
            let e = "Only the innermost open supposition can be closed";
            return err(NdIncorrectSupposition, i, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Language, Symbol};

    fn atoms() -> (Formula, Formula, Formula) {
        (Formula::atom("p"), Formula::atom("q"), Formula::atom("r"))
    }

    fn errors(result: Result<(), Vec<CorrectionError>>) -> Vec<(ErrorCode, Location)> {
        let errors = result.err().unwrap_or_default();
        errors.into_iter().map(|e| (e.code, e.location)).collect()
    }

    fn check(steps: Vec<Step>, inference: Option<&Inference>) -> Vec<(ErrorCode, Location)> {
        let derivation: Derivation = steps.into_iter().collect();
        errors(System::classical().is_correct_derivation(&derivation, inference, false))
    }

    use crate::error::ErrorCode::*;
    use crate::error::Location::Step as At;

    #[test]
    fn supposition_opens_itself() {
        let (p, q, _) = atoms();
        let steps = Vec::from([
            Step::new(Formula::imp(p.clone(), q), "premise"),
            Step::new(p, "supposition").open([0]),
        ]);
        assert_eq!(check(steps, None), [(NdIncorrectSupposition, At(1))]);
    }

    #[test]
    fn open_supposition_at_end() {
        let (p, q, _) = atoms();
        let inf = Inference::new([p.clone()], [p.clone()]);
        let steps = Vec::from([
            Step::new(p.clone(), "premise"),
            Step::new(q, "supposition").open([1]),
            Step::new(p, "repetition").on([0]).open([1]),
        ]);
        assert_eq!(check(steps, Some(&inf)), [(NdIncorrectSupposition, At(2))]);
    }

    #[test]
    fn closed_supposition() {
        let (p, _, _) = atoms();
        let steps = Vec::from([
            Step::new(p.clone(), "supposition").open([0]),
            Step::new(p.clone(), "repetition").on([0]).open([0]),
            Step::new(Formula::imp(p.clone(), p.clone()), "I→").on([0, 1]),
            Step::new(p, "repetition").on([0]),
        ]);
        assert_eq!(check(steps, None), [(NdClosedSupposition, At(3))]);
    }

    #[test]
    fn unknown_justification() {
        let (p, _, _) = atoms();
        let steps = Vec::from([Step::new(p.clone(), "premise"), Step::new(p, "MP").on([0])]);
        assert_eq!(check(steps, None), [(NdIncorrectJustification, At(1))]);
    }

    #[test]
    fn premise_errors() {
        let (p, q, _) = atoms();
        let inf = Inference::new([p.clone()], [p.clone()]);
        let steps = |open: Vec<usize>| {
            Vec::from([
                Step::new(p.clone(), "premise"),
                Step::new(q.clone(), "premise").open(open),
                Step::new(p.clone(), "repetition").on([0]),
            ])
        };
        assert_eq!(check(steps(Vec::new()), Some(&inf)), [(NdIncorrectPremise, At(1))]);

        // step 2 leaves the scope that step 1 wrongly opened
        let expected = [
            (NdIncorrectPremise, At(1)),
            (NdIncorrectSupposition, At(1)),
            (NdIncorrectSupposition, At(2)),
        ];
        assert_eq!(check(steps(Vec::from([1])), Some(&inf)), expected);
    }

    #[test]
    fn identical_variant_errors() {
        let (p, q, r) = atoms();
        let premise = Step::new(p.clone() & q.clone(), "premise");
        let steps = |fm: Formula| Vec::from([premise.clone(), Step::new(fm, "E∧").on([0])]);
        assert!(check(steps(q.clone()), None).is_empty());

        let derivation: Derivation = steps(r).into_iter().collect();
        let errs = System::classical().is_correct_derivation(&derivation, None, false);
        let errs = errs.unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!((errs[0].code, errs[0].location.clone()), (NdRuleIncorrectlyApplied, At(1)));
        assert_eq!(errs[0].description, "On step 0 is not an instance of rule premise number 0");
    }

    #[test]
    fn different_variant_errors() {
        let (a, b) = (Formula::meta("A"), Formula::meta("B"));
        let (p, q, _) = atoms();
        let elim = Rule::build()
            .gap()
            .premise(a.clone() & b.clone(), [])
            .gap()
            .conclusion(a.clone(), [0], []);
        let intro = Rule::build()
            .gap()
            .premise(a.clone(), [])
            .gap()
            .premise(b.clone(), [])
            .gap()
            .conclusion(a & b, [0, 1], []);
        let rules = [(Symbol::from("R1"), elim), (Symbol::from("R2"), intro)];
        let system = System::new(Language::classical(), rules);

        let derivation = [Step::new(p.clone() | q, "premise"), Step::new(p, "R").on([0])];
        let derivation: Derivation = derivation.iter().cloned().collect();
        let errs = system.is_correct_derivation(&derivation, None, false).unwrap_err();
        let expected = CorrectionError::new(NdRuleIncorrectlyApplied, At(1), "Incorrect application of rule");
        assert_eq!(errs, [expected]);
    }

    #[test]
    fn order_insensitive() {
        let (p, q, _) = atoms();
        let derivation: Derivation = Vec::from([
            Step::new(Formula::imp(p.clone(), q.clone()), "premise"),
            Step::new(p, "premise"),
            Step::new(q, "E→").on([1, 0]),
        ])
        .into_iter()
        .collect();
        let mut system = System::classical();
        let result = system.is_correct_derivation(&derivation, None, false);
        assert_eq!(errors(result), [(NdRuleIncorrectlyApplied, At(2))]);
        system.order_sensitive = false;
        assert_eq!(system.is_correct_derivation(&derivation, None, false), Ok(()));
    }

    #[test]
    fn exit_on_first_error() {
        let (p, q, _) = atoms();
        let derivation: Derivation = Vec::from([
            Step::new(p, "premise"),
            Step::new(q.clone(), "MP").on([0]),
            Step::new(q, "MP").on([0]),
        ])
        .into_iter()
        .collect();
        let system = System::classical();
        let all = system.is_correct_derivation(&derivation, None, false);
        let first = system.is_correct_derivation(&derivation, None, true);
        let unknown = NdIncorrectJustification;
        assert_eq!(errors(all), [(unknown, At(1)), (unknown, At(2))]);
        assert_eq!(errors(first), [(unknown, At(1))]);
    }
}
