use logics::tableaux::{System, Tableaux};
use logics::{Formula, Inference, Subst, Symbol};
use proptest::prelude::*;

const ATOMS: [&str; 3] = ["p", "q", "r"];
const METAS: [&str; 2] = ["A", "B"];

/// Formula over the given leaves with negation, conjunction, disjunction and implication.
fn arb_formula(leaves: BoxedStrategy<Formula>, depth: u32) -> BoxedStrategy<Formula> {
    leaves
        .prop_recursive(depth, 16, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|a| -a),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a & b),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a | b),
                (inner.clone(), inner).prop_map(|(a, b)| Formula::imp(a, b)),
            ]
        })
        .boxed()
}

fn arb_ground(depth: u32) -> BoxedStrategy<Formula> {
    arb_formula((0..ATOMS.len()).prop_map(|i| Formula::atom(ATOMS[i])).boxed(), depth)
}

fn arb_schema(depth: u32) -> BoxedStrategy<Formula> {
    let leaves = prop_oneof![
        (0..ATOMS.len()).prop_map(|i| Formula::atom(ATOMS[i])),
        (0..METAS.len()).prop_map(|i| Formula::meta(METAS[i])),
    ];
    arb_formula(leaves.boxed(), depth)
}

/// Truth value of a formula under the valuation given by the set bits.
fn eval(fm: &Formula, bits: u8) -> bool {
    match fm {
        Formula::Atom(a) => ATOMS.iter().position(|x| *x == a.as_str()).map_or(false, |i| bits & (1 << i) != 0),
        Formula::Meta(_) => false,
        Formula::App(c, args) => match (c.as_str(), &args[..]) {
            ("~", [a]) => !eval(a, bits),
            ("∧", [a, b]) => eval(a, bits) && eval(b, bits),
            ("∨", [a, b]) => eval(a, bits) || eval(b, bits),
            ("→", [a, b]) => !eval(a, bits) || eval(b, bits),
            _ => false,
        },
    }
}

fn tautology(fm: &Formula) -> bool {
    (0..1u8 << ATOMS.len()).all(|bits| eval(fm, bits))
}

proptest! {
    #[test]
    fn match_reflexive(fm in arb_ground(3)) {
        let mut sub = Subst::new();
        prop_assert!(fm.match_with(&fm, &mut sub));
        prop_assert!(sub.is_empty());
    }

    #[test]
    fn instantiate_then_match(schema in arb_schema(3), a in arb_ground(2), b in arb_ground(2)) {
        let sub: Subst = Vec::from([(Symbol::from("A"), a), (Symbol::from("B"), b)]).into_iter().collect();
        let instance = schema.instantiate(&sub).unwrap();
        let mut found = Subst::new();
        prop_assert!(instance.match_with(&schema, &mut found));
        prop_assert_eq!(schema.instantiate(&found), Ok(instance));
    }

    #[test]
    fn solved_tableaux_are_correct(fm in arb_ground(3)) {
        let sys = System::classical();
        let inf = Inference::new([], [fm.clone()]);
        let tree = sys.solve_tree(&inf, Default::default()).unwrap();
        prop_assert_eq!(sys.is_correct_tree(&tree, Some(&inf), false), Ok(()));
        prop_assert_eq!(sys.tree_is_closed(&tree), tautology(&fm));
    }
}
