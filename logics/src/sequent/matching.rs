//! Matching sequents against schemas.
//!
//! Since context variables may stand for sequences of any length,
//! a sequent can be an instance of a schema in several ways.
//! Matching therefore enumerates all substitutions,
//! binding context variables to shorter sequences first.

use super::{Item, Sequent};
use crate::subst::Ptr;
use crate::{Rewind, Subst};
use alloc::vec::Vec;

type Found<'a> = &'a mut dyn FnMut(&mut Subst);

/// Call `found` with every extension of `sub` under which the items are an instance of the pattern.
///
/// The substitution is restored after every call.
fn side(items: &[Item], pattern: &[Item], sub: &mut Subst, found: Found) {
    let (first, rest) = match pattern.split_first() {
        Some(split) => split,
        None => {
            if items.is_empty() {
                found(sub)
            }
            return;
        }
    };
    let ptr = Ptr::from(&*sub);
    match first {
        Item::Formula(pfm) => {
            if let Some((Item::Formula(fm), items)) = items.split_first() {
                if fm.match_with(pfm, sub) {
                    side(items, rest, sub, found)
                }
            }
        }
        Item::Context(c) => match sub.get_context(c).map(|bound| bound.len()) {
            Some(len) => {
                if items.get(..len) == sub.get_context(c) {
                    side(&items[len..], rest, sub, found)
                }
            }
            None => {
                for len in 0..=items.len() {
                    if sub.bind_context(c, &items[..len]) {
                        side(&items[len..], rest, sub, found)
                    }
                    sub.rewind(ptr)
                }
            }
        },
    }
    sub.rewind(ptr)
}

fn sides(items: &[Vec<Item>], pattern: &[Vec<Item>], sub: &mut Subst, found: Found) {
    match (items.split_first(), pattern.split_first()) {
        (Some((i, is)), Some((p, ps))) => side(i, p, sub, &mut |sub| sides(is, ps, sub, &mut *found)),
        _ => found(sub),
    }
}

impl Sequent {
    /// Return all extensions of the substitution under which the sequent is an instance of the schema.
    ///
    /// Every context variable of the schema must be bound to the same sequence
    /// at all its occurrences, and metavariables must be bound consistently.
    ///
    /// ~~~
    /// # use logics::{Formula, Subst};
    /// # use logics::sequent::{Item, Sequent};
    /// let (a, p, q) = (Formula::meta("A"), Formula::atom("p"), Formula::atom("q"));
    /// let (g, d) = (Item::context("Γ"), Item::context("Δ"));
    /// let schema = Sequent::new([g.clone(), a.clone().into(), d.clone()], []);
    /// let seq = Sequent::new([p.clone().into(), q.clone().into()], []);
    /// let subs = seq.match_all(&schema, &Subst::new());
    /// assert_eq!(subs.len(), 2);
    /// assert_eq!(subs[0].get("A"), Some(&p));
    /// assert_eq!(subs[1].get_context("Γ"), Some(&[Item::from(p)][..]));
    /// ~~~
    pub fn match_all(&self, pattern: &Self, sub: &Subst) -> Vec<Subst> {
        let mut result = Vec::new();
        if self.sides() == pattern.sides() {
            let mut sub = sub.clone();
            sides(&self.0, &pattern.0, &mut sub, &mut |sub| result.push(sub.clone()));
        }
        result
    }

    pub fn substitutions(&self, pattern: &Self) -> Vec<Subst> {
        self.match_all(pattern, &Subst::new())
    }

    pub fn is_instance_of(&self, pattern: &Self) -> bool {
        let mut found = false;
        if self.sides() == pattern.sides() {
            sides(&self.0, &pattern.0, &mut Subst::new(), &mut |_| found = true);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Formula;

    fn ctx(c: &str) -> Item {
        Item::context(c)
    }

    #[test]
    fn contexts() {
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let (pi, qi): (Item, Item) = (p.clone().into(), q.clone().into());
        let schema = Sequent::new([ctx("Γ"), ctx("Δ")], [ctx("Γ")]);
        let seq = Sequent::new([pi.clone(), qi.clone()], [pi.clone()]);
        let subs = seq.substitutions(&schema);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].get_context("Δ"), Some(&[qi.clone()][..]));

        // concrete sequents may contain context variables
        let seq = Sequent::new([ctx("Σ"), pi.clone()], [pi.clone()]);
        assert_eq!(seq.substitutions(&schema).len(), 0);
        let schema = Sequent::new([ctx("Γ"), Formula::meta("A").into()], [ctx("Δ")]);
        let subs = seq.substitutions(&schema);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].get_context("Γ"), Some(&[ctx("Σ")][..]));
        assert_eq!(subs[0].get("A"), Some(&p));
    }

    #[test]
    fn formulas_do_not_match_contexts() {
        let a = Formula::meta("A");
        let schema = Sequent::new([a.clone().into()], [a.into()]);
        assert!(!Sequent::new([ctx("Γ")], [ctx("Γ")]).is_instance_of(&schema));
        let p = Formula::atom("p");
        assert!(Sequent::new([p.clone().into()], [p.into()]).is_instance_of(&schema));
    }

    #[test]
    fn all_splits() {
        let items: Vec<Item> = ["p", "q", "r"].iter().map(|a| Formula::atom(*a).into()).collect();
        let schema = Sequent::new([ctx("Γ"), ctx("Δ")], []);
        let seq = Sequent::new(items, []);
        let subs = seq.substitutions(&schema);
        assert_eq!(subs.len(), 4);
        let lens: Vec<_> = subs.iter().map(|s| s.get_context("Γ").map(|g| g.len())).collect();
        assert_eq!(lens, [Some(0), Some(1), Some(2), Some(3)].to_vec());
    }

    #[test]
    fn sides_must_agree() {
        let p: Item = Formula::atom("p").into();
        let three = Sequent(Vec::from([Vec::new(), Vec::new(), Vec::from([p.clone()])]));
        assert!(!three.is_instance_of(&Sequent::new([], [p])));
    }
}
