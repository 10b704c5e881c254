//! Cut-free proof search for sequent calculi.
//!
//! The reducer works backwards from a sequent:
//! it closes the sequent if it is a premise or an axiom,
//! and otherwise applies the rules of the calculus in reverse,
//! trying all ways in which the sequent is an instance of a rule conclusion.
//! Only rules whose premises contain no variables missing in their conclusion
//! can be used, which excludes cut.

use super::{Item, Sequent, SequentCalculus, PREMISE};
use crate::tree::Node;
use crate::SolveError;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use log::{debug, trace};

/// Reducer options.
#[derive(Copy, Clone, Debug)]
pub struct Opt {
    /// maximal height of a reduction tree
    pub max_depth: usize,
    /// maximal number of occurrences of an item in a side of a sequent
    pub max_apparitions: Option<usize>,
    /// derive sequents containing a premise or an identity by weakening
    pub smart_weakening: bool,
}

impl Default for Opt {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_apparitions: None,
            smart_weakening: false,
        }
    }
}

/// Return true if all elements of `sub` occur in `seq` in the same order.
fn is_subsequence(sub: &[Item], seq: &[Item]) -> bool {
    let mut seq = seq.iter();
    sub.iter().all(|x| seq.any(|y| y == x))
}

struct Reducer<'a> {
    calculus: &'a SequentCalculus,
    premises: &'a [Sequent],
    /// sequents from the root to the currently reduced sequent
    path: Vec<Sequent>,
    failed: HashSet<Sequent>,
    /// the depth bound was hit at least once
    exhausted: bool,
}

impl<'a> Reducer<'a> {
    fn refuse(&self, sequent: &Sequent, premise: &Sequent) -> bool {
        let too_many = |max| premise.max_apparitions() > max;
        premise == sequent
            || self.path.contains(premise)
            || self.failed.contains(premise)
            || self.calculus.opt.max_apparitions.map_or(false, too_many)
    }

    fn reduce(&mut self, sequent: &Sequent, depth: usize) -> Option<Node<Sequent>> {
        let calculus = self.calculus;
        if depth == 0 {
            self.exhausted = true;
            return None;
        }
        if self.premises.contains(sequent) {
            return Some(Node::justified(sequent.clone(), PREMISE));
        }
        if let Some(axiom) = calculus.axiom_of(sequent) {
            return Some(Node::justified(sequent.clone(), axiom.clone()));
        }
        if calculus.opt.smart_weakening {
            let mut premises = self.premises.iter();
            let weakened = premises.find_map(|p| calculus.weaken_premise(p, sequent));
            if let Some(tree) = weakened.or_else(|| calculus.weaken_identity(sequent)) {
                return Some(tree);
            }
        }
        trace!("reduce {}", sequent);

        for name in calculus.order() {
            let rule = match calculus.get(name) {
                Some(rule) => rule,
                None => continue,
            };
            // different substitutions may yield the same premises
            let mut candidates: Vec<Vec<Sequent>> = Vec::new();
            for sub in sequent.substitutions(&rule.content) {
                let premises = rule.children.iter().map(|p| p.content.instantiate(&sub));
                let premises = match premises.collect::<Result<Vec<_>, _>>() {
                    Ok(premises) => premises,
                    Err(_) => continue,
                };
                if !premises.iter().any(|p| self.refuse(sequent, p)) && !candidates.contains(&premises) {
                    candidates.push(premises)
                }
            }

            for premises in candidates {
                self.path.push(sequent.clone());
                let children = self.reduce_all(&premises, depth - 1);
                self.path.pop();
                if let Some(children) = children {
                    debug!("{} reduced by {}", sequent, name);
                    return Some(Node::justified(sequent.clone(), name.clone()).children(children));
                }
            }
        }
        None
    }

    fn reduce_all(&mut self, premises: &[Sequent], depth: usize) -> Option<Vec<Node<Sequent>>> {
        let mut children = Vec::with_capacity(premises.len());
        for premise in premises {
            if self.failed.contains(premise) {
                return None;
            }
            match self.reduce(premise, depth) {
                Some(child) => children.push(child),
                None => {
                    self.failed.insert(premise.clone());
                    return None;
                }
            }
        }
        Some(children)
    }
}

impl SequentCalculus {
    /// Build a derivation of the sequent from axioms and the given premises.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// # use logics::sequent::{Item, Sequent, SequentCalculus};
    /// let (a, b) = (Formula::meta("A"), Formula::meta("B"));
    /// let ea = SequentCalculus::lk_min_ea();
    /// let seq = Sequent::new([a.clone().into(), (-b.clone()).into()], []);
    /// let premise = Sequent::new([a.into()], [b.into()]);
    /// let tree = ea.reduce(&seq, &[premise.clone()]).unwrap();
    /// assert_eq!(tree.justification.as_deref(), Some("~L"));
    /// assert_eq!(tree.children[0].content, premise);
    /// assert_eq!(ea.is_correct_tree(&tree, &[premise], false), Ok(()));
    /// ~~~
    pub fn reduce(&self, sequent: &Sequent, premises: &[Sequent]) -> Result<Node<Sequent>, SolveError> {
        for seq in core::iter::once(sequent).chain(premises) {
            seq.check(&self.language).map_err(SolveError::Malformed)?;
        }
        for name in self.order() {
            let rule = self.get(name);
            let rule = rule.ok_or_else(|| SolveError::Inappropriate(format!("{} is not a rule of the system", name)))?;
            let vars = rule.content.variables();
            let mut premise_vars = rule.children.iter().flat_map(|p| p.content.variables());
            if let Some(v) = premise_vars.find(|v| !vars.contains(v)) {
                let e = format!("{} introduces {} in its premises, so it cannot be used for reduction", name, v);
                return Err(SolveError::Inappropriate(e));
            }
        }

        let mut reducer = Reducer {
            calculus: self,
            premises,
            path: Vec::new(),
            failed: HashSet::new(),
            exhausted: false,
        };
        match reducer.reduce(sequent, self.opt.max_depth) {
            Some(tree) => Ok(tree),
            None if reducer.exhausted => {
                let e = format!("Could not find reduction for {}. Maximum depth exceeded", sequent);
                Err(SolveError::Exhausted(e))
            }
            None => Err(SolveError::Unprovable(format!("Could not find reduction for {}", sequent))),
        }
    }

    /// If every side of the premise is contained in the corresponding side of the sequent,
    /// derive the sequent from the premise by weakening.
    fn weaken_premise(&self, premise: &Sequent, target: &Sequent) -> Option<Node<Sequent>> {
        let sides = target.sides();
        if premise.sides() != sides || self.weakening().len() != sides {
            return None;
        }
        let mut zipped = premise.0.iter().zip(target.0.iter());
        if !zipped.all(|(p, t)| is_subsequence(p, t)) {
            return None;
        }
        let mut node = Node::justified(premise.clone(), PREMISE);
        for (i, (side, rule)) in target.0.iter().zip(self.weakening()).enumerate() {
            let mut next = premise.0[i].iter().peekable();
            for (pos, item) in side.iter().enumerate() {
                if next.peek() == Some(&item) {
                    next.next();
                    continue;
                }
                let mut content = node.content.clone();
                content.0[i].insert(pos, item.clone());
                node = Node::justified(content, rule.clone()).child(node)
            }
        }
        Some(node)
    }

    /// If a formula of the first side occurs in all sides of the sequent,
    /// derive the sequent from the identity with that formula by weakening.
    fn weaken_identity(&self, target: &Sequent) -> Option<Node<Sequent>> {
        if self.weakening().len() != target.sides() {
            return None;
        }
        let (first, rest) = target.0.split_first()?;
        let in_all = |item: &&Item| item.formula().is_some() && rest.iter().all(|side| side.contains(*item));
        let item = first.iter().find(in_all)?;
        let identity = Sequent(vec![vec![item.clone()]; target.sides()]);
        let axiom = self.axiom_of(&identity)?.clone();

        let mut node = Node::justified(identity, axiom);
        for (i, (side, rule)) in target.0.iter().zip(self.weakening()).enumerate() {
            let k = side.iter().position(|x| x == item)?;
            for x in side[..k].iter().rev() {
                let mut content = node.content.clone();
                content.0[i].insert(0, x.clone());
                node = Node::justified(content, rule.clone()).child(node)
            }
            for x in &side[k + 1..] {
                let mut content = node.content.clone();
                content.0[i].push(x.clone());
                node = Node::justified(content, rule.clone()).child(node)
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Formula, Inference};

    fn fm(fm: Formula) -> Item {
        Item::Formula(fm)
    }

    #[test]
    fn subsequence() {
        let [p, q, r] = ["p", "q", "r"].map(|a| fm(Formula::atom(a)));
        let pqr = [p.clone(), q.clone(), r.clone()];
        assert!(is_subsequence(&[p.clone(), r.clone()], &pqr));
        assert!(!is_subsequence(&[r, p.clone()], &pqr));
        assert!(is_subsequence(&[], &[p]));
    }

    #[test]
    fn excluded_middle() {
        let a = Formula::meta("A");
        let lem = a.clone() | -a.clone();
        let seq = Sequent::new([Item::context("Γ")], [Item::context("Δ"), fm(lem)]);
        let ea = SequentCalculus::lk_min_ea();
        let tree = ea.reduce(&seq, &[]).unwrap();
        assert_eq!(tree.justification.as_deref(), Some("∨R1"));
        assert!(ea.tree_is_closed(&tree));
        assert_eq!(ea.is_correct_tree(&tree, &[], false), Ok(()));

        let contradiction = Sequent::new([Item::context("Γ")], [Item::context("Δ"), fm(a.clone() & -a)]);
        assert!(matches!(ea.reduce(&contradiction, &[]), Err(SolveError::Unprovable(_))));
    }

    #[test]
    fn weakening_from_premise() {
        let [p, q, r] = ["p", "q", "r"].map(|a| fm(Formula::atom(a)));
        let premise = Sequent::new([q.clone()], [r.clone()]);
        let seq = Sequent::new([p.clone(), q, p], [r, Item::context("Δ")]);
        let ea = SequentCalculus::lk_min_ea();
        let tree = ea.reduce(&seq, &[premise.clone()]).unwrap();
        assert_eq!(tree.content, seq);
        assert_eq!(tree.height(), 3);
        assert_eq!(ea.is_correct_tree(&tree, &[premise], false), Ok(()));
    }

    #[test]
    fn lk_min() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let lk = SequentCalculus::lk_min();
        let tree = lk.reduce(&Sequent::new([fm(p.clone())], [fm(p.clone() | q.clone())]), &[]).unwrap();
        assert_eq!(tree.justification.as_deref(), Some("∨R1"));
        assert_eq!(lk.is_correct_tree(&tree, &[], false), Ok(()));
        let dn = Inference::new([-(-p.clone())], [p]);
        assert_eq!(lk.is_valid(&dn), Ok(true));
    }

    #[test]
    fn cut_is_not_reducible() {
        let p = Formula::atom("p");
        let seq = Sequent::new([fm(p.clone())], [fm(p)]);
        let lk = SequentCalculus::lk();
        assert!(matches!(lk.reduce(&seq, &[]), Err(SolveError::Inappropriate(_))));
    }

    #[test]
    fn malformed() {
        let seq = Sequent::new([fm(Formula::atom("x"))], []);
        let ea = SequentCalculus::lk_min_ea();
        assert!(matches!(ea.reduce(&seq, &[]), Err(SolveError::Malformed(_))));
    }

    #[test]
    fn depth() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let seq = Sequent::new([], [fm(-(-(p.clone() | q)) | -p)]);
        let opt = Opt {
            max_depth: 2,
            ..SequentCalculus::lk_min_ea().opt
        };
        let ea = SequentCalculus::lk_min_ea().with_opt(opt);
        assert!(matches!(ea.reduce(&seq, &[]), Err(SolveError::Exhausted(_))));
    }
}
