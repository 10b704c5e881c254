use logics::nd::{self, Derivation, Solver, Step, System as NdSystem};
use logics::sequent::{inference_to_sequent, Item, Sequent, SequentCalculus};
use logics::tableaux::{MetaSystem, Standard, System, Tableaux};
use logics::{ErrorCode, Formula, Indexed, Inference, Location, Node, SolveError, Statement};

fn at(name: &str) -> Formula {
    Formula::atom(name)
}

fn pq() -> (Formula, Formula) {
    (at("p"), at("q"))
}

fn item(fm: &Formula) -> Item {
    Item::from(fm.clone())
}

fn modus_tollens(elim: [usize; 2], contra: [usize; 2]) -> Derivation {
    let (p, q) = pq();
    Vec::from([
        Step::new(Formula::imp(p.clone(), q.clone()), "premise"),
        Step::new(-q.clone(), "premise"),
        Step::new(p.clone(), "supposition").open([2]),
        Step::new(q, "E→").on(elim).open([2]),
        Step::new(Formula::falsum(), "E~").on(contra).open([2]),
        Step::new(-p, "I~").on([2, 4]),
    ])
    .into_iter()
    .collect()
}

#[test]
fn nd_modus_tollens() {
    let (p, q) = pq();
    let inf = Inference::new([Formula::imp(p.clone(), q.clone()), -q], [-p]);
    let sys = NdSystem::classical();
    let check = |der: Derivation| {
        let result = sys.is_correct_derivation(&der, Some(&inf), false);
        let errs = result.err().unwrap_or_default();
        errs.into_iter().map(|e| (e.code, e.location)).collect::<Vec<_>>()
    };
    assert!(check(modus_tollens([0, 2], [1, 3])).is_empty());
    let wrong_order = ErrorCode::NdRuleIncorrectlyApplied;
    assert_eq!(check(modus_tollens([2, 0], [1, 3])), [(wrong_order, Location::Step(3))]);
    assert_eq!(check(modus_tollens([0, 2], [3, 1])), [(wrong_order, Location::Step(4))]);
}

#[test]
fn checking_is_repeatable() {
    let (p, q) = pq();
    let inf = Inference::new([Formula::imp(p.clone(), q.clone()), -q.clone()], [-p.clone()]);
    let der = modus_tollens([2, 0], [3, 1]);
    let nd = NdSystem::classical();
    let first = nd.is_correct_derivation(&der, Some(&inf), false);
    assert!(first.is_err());
    assert_eq!(first, nd.is_correct_derivation(&der, Some(&inf), false));

    let tbl = System::classical();
    let inf = Inference::new([p.clone()], [q.clone()]);
    let tree = Node::new(Indexed::from(p.clone())).child(Node::new(Indexed::from(q.clone())));
    let first = tbl.is_correct_tree(&tree, Some(&inf), false);
    assert!(first.is_err());
    assert_eq!(first, tbl.is_correct_tree(&tree, Some(&inf), false));

    let lk = SequentCalculus::lk_min();
    let sequent = |c: &Formula| inference_to_sequent(&Inference::new([p.clone() & q.clone()], [c.clone()]), 2, 1);
    let mut tree = lk.reduce(&sequent(&p).unwrap(), &[]).unwrap();
    // the reduction of p ∧ q ⇒ p does not prove p ∧ q ⇒ q
    tree.content = sequent(&q).unwrap();
    let first = lk.is_correct_tree(&tree, &[], false);
    assert!(first.is_err());
    assert_eq!(first, lk.is_correct_tree(&tree, &[], false));
}

#[test]
fn nd_solve() {
    let (p, q) = pq();
    let solver = Solver::classical();
    let dm = Inference::new([-(p.clone() | q.clone())], [-p.clone() & -q.clone()]);
    let der = solver.solve(&dm, nd::Opt::default()).unwrap();
    assert_eq!(solver.system.is_correct_derivation(&der, Some(&dm), false), Ok(()));

    assert!(solver.solve(&Inference::new([p], [q]), nd::Opt::default()).is_err());
}

#[test]
fn tableau_closure() {
    let p = at("p");
    let sys = System::classical();
    let contra = Node::new(Indexed::from(p.clone() & -p.clone()))
        .child(Node::justified(Indexed::from(p.clone()), "R∧").child(Node::justified(Indexed::from(-p.clone()), "R∧")));
    assert!(sys.tree_is_closed(&contra));
    let inf = Inference::new([p.clone() & -p.clone()], []);
    assert_eq!(sys.is_correct_tree(&contra, Some(&inf), false), Ok(()));
    assert!(!sys.tree_is_closed(&Node::new(Indexed::from(p))));
}

#[test]
fn tableau_de_morgan() {
    let (p, q) = pq();
    let sys = System::classical();
    let dm = Inference::new([-(p.clone() & q.clone())], [-p.clone() | -q.clone()]);
    let tree = sys.solve_tree(&dm, Default::default()).unwrap();
    assert!(sys.tree_is_closed(&tree));
    assert_eq!(sys.is_correct_tree(&tree, Some(&dm), false), Ok(()));

    let converse = Inference::new([-p.clone() | -q.clone()], [-p & -q]);
    let tree = sys.solve_tree(&converse, Default::default()).unwrap();
    assert!(!sys.tree_is_closed(&tree));
}

#[test]
fn tableau_incorrect_premise() {
    let (p, q) = pq();
    let sys = System::classical();
    let inf = Inference::new([p.clone()], [q.clone()]);
    let tree = Node::new(Indexed::from(p)).child(Node::new(Indexed::from(q)));
    let errs = sys.is_correct_tree(&tree, Some(&inf), false).unwrap_err();
    let codes: Vec<_> = errs.iter().map(|e| (e.code, e.location.clone())).collect();
    assert_eq!(
        codes,
        [
            (ErrorCode::TblConclusionNotPresent, Location::Path(Vec::new())),
            (ErrorCode::TblIncorrectPremise, Location::Path(Vec::from([0]))),
        ]
    );
}

#[test]
fn many_valued() {
    let (p, q) = pq();
    let lem = Inference::new([], [p.clone() | -p.clone()]);
    let explosion = Inference::new([p.clone(), -p.clone()], [q]);
    assert_eq!(System::fde().is_valid(&lem), Ok(false));
    assert_eq!(System::k3().is_valid(&lem), Ok(false));
    assert_eq!(System::lp().is_valid(&lem), Ok(true));
    assert_eq!(System::k3().is_valid(&explosion), Ok(true));
    assert_eq!(System::lp().is_valid(&explosion), Ok(false));
    assert_eq!(System::classical_indexed().is_valid(&explosion), Ok(true));
}

#[test]
fn strong_and_weak_kleene() {
    let (p, q) = pq();
    let addition = Statement::from(Inference::new([p.clone()], [p | q]));
    let ss = Standard::pair(Standard::set(["1"]), Standard::set(["1"]));
    let st = Standard::pair(Standard::set(["1"]), Standard::set(["1", "i"]));
    let (sk, wk) = (MetaSystem::sk(), MetaSystem::wk());
    assert_eq!(sk.is_valid(&Indexed(addition.clone(), ss.clone())), Ok(true));
    assert_eq!(wk.is_valid(&Indexed(addition.clone(), ss)), Ok(false));
    assert_eq!(wk.is_valid(&Indexed(addition, st)), Ok(true));
}

#[test]
fn lk_axioms() {
    let (p, q) = pq();
    let lk = SequentCalculus::lk();
    let or = p.clone() | q.clone();
    assert!(lk.sequent_is_axiom(&Sequent::new([item(&or)], [item(&or)])));
    assert!(!lk.sequent_is_axiom(&Sequent::new([item(&p)], [item(&q)])));
}

#[test]
fn lk_reduce() {
    let (p, q) = pq();
    let lk = SequentCalculus::lk_min();
    let inf = Inference::new([p.clone() & q], [p]);
    let seq = inference_to_sequent(&inf, 2, 1).unwrap();
    let tree = lk.reduce(&seq, &[]).unwrap();
    assert_eq!(tree.justification.as_ref().map(|j| j.as_str()), Some("∧L1"));
    assert_eq!(tree.height(), 1);
    assert!(lk.tree_is_closed(&tree));
    assert_eq!(lk.is_correct_tree(&tree, &[], false), Ok(()));
}

#[test]
fn lk_ea_validity() {
    let (p, q) = pq();
    let ea = SequentCalculus::lk_min_ea();
    let valid = Inference::new([p.clone() | q.clone(), -p.clone()], [q.clone()]);
    assert_eq!(ea.is_valid(&valid), Ok(true));
    let invalid = Inference::new([p.clone() | q.clone()], [p]);
    assert_eq!(ea.is_valid(&invalid), Ok(false));
    let conditional = Inference::new([], [Formula::imp(q.clone(), q)]);
    assert!(matches!(ea.is_valid(&conditional), Err(SolveError::Malformed(_))));
}
