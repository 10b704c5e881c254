use super::{Item, Opt, Sequent, SequentCalculus};
use crate::tree::Node;
use crate::{Formula, Language, Symbol};
use alloc::vec::Vec;

fn s<const N: usize, const M: usize>(antecedent: [&Item; N], succedent: [&Item; M]) -> Sequent {
    Sequent::new(antecedent.map(Item::clone), succedent.map(Item::clone))
}

fn rule<const N: usize>(name: &str, conclusion: Sequent, premises: [Sequent; N]) -> (Symbol, Node<Sequent>) {
    let premises = Vec::from(premises).into_iter().map(Node::new);
    (Symbol::from(name), Node::new(conclusion).children(premises))
}

fn identity() -> (Symbol, Sequent) {
    let a = Item::from(Formula::meta("A"));
    (Symbol::from("identity"), s([&a], [&a]))
}

struct Schemas {
    ctx: [Item; 5],
    a: Item,
    b: Item,
    na: Item,
    and: Item,
    or: Item,
}

/// Context variables `Γ, Δ, Σ, Λ, Π` and formula schemas.
fn schemas() -> Schemas {
    let (a, b) = (Formula::meta("A"), Formula::meta("B"));
    Schemas {
        ctx: ["Γ", "Δ", "Σ", "Λ", "Π"].map(Item::context),
        na: Item::from(-a.clone()),
        and: Item::from(a.clone() & b.clone()),
        or: Item::from(a.clone() | b.clone()),
        a: Item::from(a),
        b: Item::from(b),
    }
}

const LK_MIN_ORDER: [&str; 14] = [
    "~L", "~R", "∧L1", "∧L2", "∧R", "∨L", "∨R1", "∨R2", "WL", "WR", "CL", "CR", "EL", "ER",
];

const LK_MIN_EA_ORDER: [&str; 8] = ["~L", "~R", "∧L1", "∧L2", "∧R", "∨L", "∨R1", "∨R2"];

impl SequentCalculus {
    /// Gentzen's LK with exchange, weakening, contraction and cut.
    ///
    /// Structural rules act on context variables, so that for example
    /// contraction merges two copies of a whole sequence.
    pub fn lk() -> Self {
        Self::new(Language::classical(), [identity()], lk_rules(true))
    }

    /// LK without cut, reduced by trying logical rules before structural ones,
    /// with at most three occurrences of an item per side.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference};
    /// # use logics::sequent::SequentCalculus;
    /// let p = Formula::atom("p");
    /// let lk = SequentCalculus::lk_min();
    /// assert_eq!(lk.is_valid(&Inference::new([], [p.clone() | -p])), Ok(true));
    /// ~~~
    pub fn lk_min() -> Self {
        let opt = Opt {
            max_apparitions: Some(3),
            ..Opt::default()
        };
        Self::new(Language::classical(), [identity()], lk_rules(false))
            .with_order(LK_MIN_ORDER)
            .with_weakening(["WL", "WR"])
            .with_opt(opt)
    }

    /// Cut-free LK where principal formulas may occur anywhere in a side,
    /// with generalised weakening and contraction.
    ///
    /// Only logical rules are used for reduction,
    /// while weakening is applied when a premise or an identity
    /// is contained in the reduced sequent.
    pub fn lk_min_ea() -> Self {
        let Schemas { ctx, a, b, na, and, or } = schemas();
        let [g, d, sg, l, p] = &ctx;
        let rules = Vec::from([
            rule("WL", s([g, l, d], [sg]), [s([g, d], [sg])]),
            rule("WR", s([g], [p, l, sg]), [s([g], [p, sg])]),
            rule("CL1", s([g, l, d, p], [sg]), [s([g, l, d, l, p], [sg])]),
            rule("CL2", s([g, d, l, p], [sg]), [s([g, l, d, l, p], [sg])]),
            rule("CR1", s([g], [d, l, p, sg]), [s([g], [d, l, p, l, sg])]),
            rule("CR2", s([g], [d, p, l, sg]), [s([g], [d, l, p, l, sg])]),
            rule("~L", s([g, &na, d], [p, sg]), [s([g, d], [p, &a, sg])]),
            rule("~R", s([g, d], [p, &na, sg]), [s([g, &a, d], [p, sg])]),
            rule("∧L1", s([g, &and, d, p], [sg]), [s([g, &a, d, &b, p], [sg])]),
            rule("∧L2", s([g, d, &and, p], [sg]), [s([g, &a, d, &b, p], [sg])]),
            rule("∧R", s([g], [d, &and, p]), [s([g], [d, &a, p]), s([g], [d, &b, p])]),
            rule("∨L", s([g, &or, d], [p]), [s([g, &a, d], [p]), s([g, &b, d], [p])]),
            rule("∨R1", s([g], [d, &or, p, sg]), [s([g], [d, &a, p, &b, sg])]),
            rule("∨R2", s([g], [d, p, &or, sg]), [s([g], [d, &a, p, &b, sg])]),
        ]);
        let opt = Opt {
            smart_weakening: true,
            ..Opt::default()
        };
        Self::new(Language::classical_no_conditional(), [identity()], rules)
            .with_order(LK_MIN_EA_ORDER)
            .with_weakening(["WL", "WR"])
            .with_opt(opt)
    }
}

fn lk_rules(cut: bool) -> Vec<(Symbol, Node<Sequent>)> {
    let Schemas { ctx, a, b, na, and, or } = schemas();
    let [g, d, sg, l, p] = &ctx;
    let imp = Item::from(Formula::imp(Formula::meta("A"), Formula::meta("B")));
    let mut rules = Vec::from([
        rule("EL", s([g, l, sg, d], [p]), [s([g, sg, l, d], [p])]),
        rule("ER", s([g], [d, l, sg, p]), [s([g], [d, sg, l, p])]),
        rule("WL", s([p, g], [d]), [s([g], [d])]),
        rule("WR", s([g], [d, p]), [s([g], [d])]),
        rule("CL", s([p, g], [d]), [s([p, p, g], [d])]),
        rule("CR", s([g], [d, p]), [s([g], [d, p, p])]),
    ]);
    if cut {
        rules.push(rule("Cut", s([g, p], [d, sg]), [s([g], [d, &a]), s([&a, p], [sg])]))
    }
    rules.extend(Vec::from([
        rule("~L", s([&na, g], [d]), [s([g], [d, &a])]),
        rule("~R", s([g], [d, &na]), [s([&a, g], [d])]),
        rule("∧L1", s([&and, g], [d]), [s([&a, g], [d])]),
        rule("∧L2", s([&and, g], [d]), [s([&b, g], [d])]),
        rule("∧R", s([g], [d, &and]), [s([g], [d, &a]), s([g], [d, &b])]),
        rule("∨L", s([&or, g], [d]), [s([&a, g], [d]), s([&b, g], [d])]),
        rule("∨R1", s([g], [d, &or]), [s([g], [d, &a])]),
        rule("∨R2", s([g], [d, &or]), [s([g], [d, &b])]),
        rule("→L", s([&imp, g, p], [d, sg]), [s([g], [d, &a]), s([&b, p], [sg])]),
        rule("→R", s([g], [d, &imp]), [s([&a, g], [d, &b])]),
    ]));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_sets() {
        let lk = SequentCalculus::lk();
        assert_eq!(lk.rules().count(), 17);
        assert_eq!(lk.get("Cut").map(|r| r.children.len()), Some(2));
        let min = SequentCalculus::lk_min();
        assert_eq!(min.rules().count(), 16);
        assert!(min.get("Cut").is_none());
        let ea = SequentCalculus::lk_min_ea();
        assert_eq!(ea.rules().count(), 14);
        assert_eq!(ea.order().len(), 8);
        assert!(ea.opt.smart_weakening);
    }

    #[test]
    fn rules_are_well_formed() {
        for calc in [SequentCalculus::lk(), SequentCalculus::lk_min_ea()].iter() {
            for (_, rule) in calc.rules() {
                for (_, node) in rule.pre_order() {
                    assert_eq!(node.content.check(&calc.language), Ok(()));
                }
            }
        }
    }
}
