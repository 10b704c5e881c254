use super::{Item, Opt, Sequent};
use crate::error::{CorrectionError, ErrorCode, Errors, Location};
use crate::tree::Node;
use crate::{Formula, Inference, Language, SolveError, Statement, Subst, Symbol};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Justification of leaves that are premises.
pub const PREMISE: &str = "premise";

/// Sequent calculus: a language, axioms and rules.
///
/// ~~~
/// # use logics::Formula;
/// # use logics::sequent::{Item, Sequent, SequentCalculus};
/// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
/// let lk = SequentCalculus::lk();
/// let pq: Item = (p.clone() | q.clone()).into();
/// assert!(lk.sequent_is_axiom(&Sequent::new([pq.clone()], [pq])));
/// assert!(!lk.sequent_is_axiom(&Sequent::new([p.into()], [q.into()])));
/// ~~~
#[derive(Clone, Debug)]
pub struct SequentCalculus {
    pub language: Language,
    axioms: Vec<(Symbol, Sequent)>,
    /// trees whose root is the conclusion and whose children are the premises
    rules: Vec<(Symbol, Node<Sequent>)>,
    /// rules tried by the reducer, in this order
    order: Vec<Symbol>,
    /// for every side, the rule that adds an item to it
    weakening: Vec<Symbol>,
    /// all axioms have the shape `A ⇒ ... ⇒ A`
    identity: bool,
    pub opt: Opt,
}

/// Return true if every side consists of the same single metavariable.
fn is_identity_schema(seq: &Sequent) -> bool {
    match seq.0.first().map(|side| &side[..]) {
        Some([Item::Formula(Formula::Meta(m))]) => seq.0.iter().all(|side| match &side[..] {
            [Item::Formula(Formula::Meta(n))] => n == m,
            _ => false,
        }),
        _ => false,
    }
}

/// Return true if every side consists of the same single formula.
fn is_identity(seq: &Sequent) -> bool {
    match seq.0.first().map(|side| &side[..]) {
        Some([item @ Item::Formula(_)]) => seq.0.iter().all(|side| side.len() == 1 && &side[0] == item),
        _ => false,
    }
}

impl SequentCalculus {
    /// Create a calculus whose reducer tries all rules in the given order.
    pub fn new(
        language: Language,
        axioms: impl IntoIterator<Item = (Symbol, Sequent)>,
        rules: impl IntoIterator<Item = (Symbol, Node<Sequent>)>,
    ) -> Self {
        let axioms: Vec<_> = axioms.into_iter().collect();
        let rules: Vec<_> = rules.into_iter().collect();
        let identity = axioms.iter().all(|(_, ax)| is_identity_schema(ax));
        Self {
            language,
            order: rules.iter().map(|(name, _)| name.clone()).collect(),
            axioms,
            rules,
            weakening: Vec::new(),
            identity,
            opt: Opt::default(),
        }
    }

    /// Set the rules that the reducer tries.
    pub fn with_order<'a>(mut self, order: impl IntoIterator<Item = &'a str>) -> Self {
        self.order = order.into_iter().map(Symbol::from).collect();
        self
    }

    /// Set the weakening rules for all sides, used by smart weakening.
    pub fn with_weakening<'a>(mut self, rules: impl IntoIterator<Item = &'a str>) -> Self {
        self.weakening = rules.into_iter().map(Symbol::from).collect();
        self
    }

    pub fn with_opt(mut self, opt: Opt) -> Self {
        self.opt = opt;
        self
    }

    pub fn axioms(&self) -> impl Iterator<Item = (&Symbol, &Sequent)> {
        self.axioms.iter().map(|(name, ax)| (name, ax))
    }

    pub fn rules(&self) -> impl Iterator<Item = (&Symbol, &Node<Sequent>)> {
        self.rules.iter().map(|(name, rule)| (name, rule))
    }

    pub fn get(&self, name: &str) -> Option<&Node<Sequent>> {
        let mut rules = self.rules.iter();
        rules.find(|(n, _)| n.as_str() == name).map(|(_, r)| r)
    }

    fn axiom(&self, name: &str) -> Option<&Sequent> {
        let mut axioms = self.axioms.iter();
        axioms.find(|(n, _)| n.as_str() == name).map(|(_, ax)| ax)
    }

    pub(crate) fn order(&self) -> &[Symbol] {
        &self.order
    }

    pub(crate) fn weakening(&self) -> &[Symbol] {
        &self.weakening
    }

    /// Number of sides of the sequents of the calculus.
    pub fn sides(&self) -> usize {
        self.axioms.first().map_or(2, |(_, ax)| ax.sides())
    }

    /// Return the name of an axiom that the sequent is an instance of.
    pub fn axiom_of(&self, sequent: &Sequent) -> Option<&Symbol> {
        if self.identity {
            let first = self.axioms.iter().find(|(_, ax)| ax.sides() == sequent.sides());
            return first.filter(|_| is_identity(sequent)).map(|(name, _)| name);
        }
        let mut axioms = self.axioms.iter();
        axioms.find(|(_, ax)| sequent.is_instance_of(ax)).map(|(name, _)| name)
    }

    pub fn sequent_is_axiom(&self, sequent: &Sequent) -> bool {
        self.axiom_of(sequent).is_some()
    }

    fn is_axiom(&self, sequent: &Sequent, name: &str) -> bool {
        match self.axiom(name) {
            Some(ax) if self.identity => ax.sides() == sequent.sides() && is_identity(sequent),
            Some(ax) => sequent.is_instance_of(ax),
            None => false,
        }
    }

    /// Return true if all leaves of the tree are axioms.
    pub fn tree_is_closed(&self, tree: &Node<Sequent>) -> bool {
        tree.leaves().into_iter().all(|(_, leaf)| self.sequent_is_axiom(&leaf.content))
    }

    /// Check whether a node and its children are an instance of a rule,
    /// returning the substitutions that make them so.
    ///
    /// ~~~
    /// # use logics::Formula;
    /// # use logics::tree::Node;
    /// # use logics::sequent::{Item, Sequent, SequentCalculus};
    /// let a: Item = Formula::meta("A").into();
    /// let axiom = Node::justified(Sequent::new([a.clone()], [a.clone()]), "identity");
    /// let weakened = Sequent::new([a.clone()], [a, Item::context("Δ")]);
    /// let node = Node::justified(weakened, "WR").child(axiom);
    /// let lk = SequentCalculus::lk();
    /// assert_eq!(lk.is_correctly_applied(&node, "WR").map(|subs| subs.len()), Ok(1));
    /// assert!(lk.is_correctly_applied(&node, "WL").is_err());
    /// ~~~
    pub fn is_correctly_applied(&self, node: &Node<Sequent>, rule: &str) -> Result<Vec<Subst>, String> {
        if node.justification.as_deref() != Some(rule) {
            return Err(format!("Node {} is not justified by {}", node.content, rule));
        }
        let schema = self.get(rule).ok_or_else(|| format!("{} is not a rule of the system", rule))?;
        if node.children.len() != schema.children.len() {
            return Err(format!("Incorrect number of premises for node {}", node.content));
        }
        let mut subs = node.content.substitutions(&schema.content);
        if subs.is_empty() {
            let e = format!("Node {} is not an instance of the conclusion of {}", node.content, rule);
            return Err(e);
        }
        for (premise, pattern) in node.children.iter().zip(schema.children.iter()) {
            subs = subs.iter().flat_map(|sub| premise.content.match_all(&pattern.content, sub)).collect();
            if subs.is_empty() {
                let e = format!(
                    "Node {} is incorrectly derived, premise {} is not an instance of rule premise {}",
                    node.content, premise.content, pattern.content
                );
                return Err(e);
            }
        }
        Ok(subs)
    }

    /// Check whether a tree is a correct derivation from the given premises.
    ///
    /// Every leaf must be one of the premises or an axiom,
    /// and every other node must be obtained from its children
    /// by the rule it is justified with.
    pub fn is_correct_tree(
        &self,
        tree: &Node<Sequent>,
        premises: &[Sequent],
        exit_on_first_error: bool,
    ) -> Result<(), Vec<CorrectionError>> {
        let mut errors = Errors::new(exit_on_first_error);
        // errors have already been recorded when this fails
        let _ = self.check_tree(tree, premises, &mut errors);
        errors.finish()
    }

    fn check_tree(&self, tree: &Node<Sequent>, premises: &[Sequent], errors: &mut Errors) -> Result<(), ()> {
        use ErrorCode::*;
        let nodes = tree.post_order();

        for (path, node) in &nodes {
            if let Err(e) = node.content.check(&self.language) {
                let e = format!("{}: {}", node.content, e);
                errors.push(CorrectionError::new(MalformedFormula, Location::Path(path.clone()), e))?
            }
        }
        if !errors.is_empty() {
            return Err(());
        }

        for (path, node) in &nodes {
            let error = |code, e: String| CorrectionError::new(code, Location::Path(path.clone()), e);
            let content = &node.content;
            let justification = node.justification.as_deref();
            if node.is_leaf() && premises.contains(content) {
                if !matches!(justification, None | Some(PREMISE)) {
                    let e = format!("Premise node {} must be justified as {}", content, PREMISE);
                    errors.push(error(SeqIncorrectPremise, e))?
                }
                continue;
            }
            match justification {
                None if node.is_leaf() => {
                    let e = format!("Node {} is neither a premise nor justified as an axiom", content);
                    errors.push(error(SeqIncorrectAxiom, e))?
                }
                None => {
                    let e = format!("Node {} has no justification", content);
                    errors.push(error(SeqIncorrectJustification, e))?
                }
                Some(PREMISE) => {
                    let e = if node.is_leaf() {
                        format!("Node {} is not among the premises", content)
                    } else {
                        format!("Premise node {} must not have children", content)
                    };
                    errors.push(error(SeqIncorrectPremise, e))?
                }
                Some(name) if self.axiom(name).is_some() => {
                    if !node.is_leaf() {
                        let e = format!("Axiom node {} must not have children", content);
                        errors.push(error(SeqRuleIncorrectlyApplied, e))?
                    } else if !self.is_axiom(content, name) {
                        let e = format!("Node {} is not an instance of axiom {}", content, name);
                        errors.push(error(SeqIncorrectAxiom, e))?
                    }
                }
                Some(name) if self.get(name).is_some() => {
                    if let Err(e) = self.is_correctly_applied(node, name) {
                        errors.push(error(SeqRuleIncorrectlyApplied, e))?
                    }
                }
                Some(name) => {
                    let e = format!("Node {}: {} is neither an axiom nor a rule of the system", content, name);
                    errors.push(error(SeqIncorrectJustification, e))?
                }
            }
        }
        Ok(())
    }

    /// Return true if the reducer finds a derivation of the sequent for the inference.
    ///
    /// ~~~
    /// # use logics::{Formula, Inference};
    /// # use logics::sequent::SequentCalculus;
    /// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
    /// let ea = SequentCalculus::lk_min_ea();
    /// let ds = Inference::new([p.clone() | q.clone(), -p.clone()], [q.clone()]);
    /// assert_eq!(ea.is_valid(&ds), Ok(true));
    /// assert_eq!(ea.is_valid(&Inference::new([p.clone() | q], [p])), Ok(false));
    /// ~~~
    pub fn is_valid(&self, inference: &Inference) -> Result<bool, SolveError> {
        let sequent = inference_to_sequent(inference, self.sides(), 1).map_err(SolveError::Malformed)?;
        match self.reduce(&sequent, &[]) {
            Ok(_) => Ok(true),
            Err(SolveError::Unprovable(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Convert an inference between formulas to a sequent,
/// where the sides before `separator` contain the premises
/// and the others contain the conclusions.
///
/// ~~~
/// # use logics::{Formula, Inference};
/// # use logics::sequent::inference_to_sequent;
/// let (p, q) = (Formula::atom("p"), Formula::atom("q"));
/// let inf = Inference::new([p.clone() | q.clone(), -p], [q]);
/// assert_eq!(inference_to_sequent(&inf, 2, 1).unwrap().to_string(), "(p ∨ q), ~p ⇒ q");
/// assert_eq!(inference_to_sequent(&inf, 3, 1).unwrap().to_string(), "(p ∨ q), ~p | q | q");
/// assert_eq!(inference_to_sequent(&inf, 3, 2).unwrap().to_string(), "(p ∨ q), ~p | (p ∨ q), ~p | q");
/// ~~~
pub fn inference_to_sequent(inference: &Inference, sides: usize, separator: usize) -> Result<Sequent, String> {
    if inference.level() != 1 {
        return Err(format!("{} is not an inference between formulas", inference));
    }
    let items = |stmts: &[Statement]| -> Result<Vec<Item>, String> {
        let item = |s: &Statement| s.formula().cloned().map(Item::Formula);
        stmts.iter().map(|s| item(s).ok_or_else(|| format!("{} is not a formula", s))).collect()
    };
    let (premises, conclusions) = (items(&inference.premises)?, items(&inference.conclusions)?);
    let side = |i| if i < separator { premises.clone() } else { conclusions.clone() };
    Ok(Sequent((0..sides).map(side).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(fm: Formula) -> Item {
        Item::Formula(fm)
    }

    /// `Γ, A ⇒ A, Δ` obtained from the identity by weakening
    fn weakened(a: &Formula) -> Node<Sequent> {
        let n1 = Node::justified(Sequent::new([fm(a.clone())], [fm(a.clone())]), "identity");
        let n2 = Sequent::new([fm(a.clone())], [fm(a.clone()), Item::context("Δ")]);
        let n2 = Node::justified(n2, "WR").child(n1);
        let n3 = Sequent::new([Item::context("Γ"), fm(a.clone())], [fm(a.clone()), Item::context("Δ")]);
        Node::justified(n3, "WL").child(n2)
    }

    #[test]
    fn axioms() {
        let lk = SequentCalculus::lk();
        let p = Formula::atom("p");
        assert!(lk.sequent_is_axiom(&Sequent::new([fm(p.clone())], [fm(p.clone())])));
        let ctx = Sequent::new([fm(p.clone()), Item::context("Γ")], [Item::context("Δ"), fm(p)]);
        assert!(!lk.sequent_is_axiom(&ctx));
        assert_eq!(lk.sides(), 2);
    }

    #[test]
    fn correct_tree() {
        let lk = SequentCalculus::lk();
        let tree = weakened(&Formula::meta("A"));
        assert_eq!(lk.is_correct_tree(&tree, &[], false), Ok(()));
        assert!(lk.tree_is_closed(&tree));
    }

    #[test]
    fn premises() {
        let lk = SequentCalculus::lk();
        let (p, q) = (Formula::atom("p"), Formula::atom("q"));
        let premise = Sequent::new([fm(p.clone())], [fm(q.clone())]);
        let mut tree = weakened(&p);
        tree.content = Sequent::new([Item::context("Γ"), fm(p.clone())], [fm(q.clone()), Item::context("Δ")]);
        tree.children[0].content = Sequent::new([fm(p)], [fm(q), Item::context("Δ")]);
        tree.children[0].children[0] = Node::new(premise.clone());

        let errors = lk.is_correct_tree(&tree, &[], false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::SeqIncorrectAxiom);
        assert_eq!(errors[0].location, Location::Path(Vec::from([0, 0])));
        assert_eq!(lk.is_correct_tree(&tree, &[premise.clone()], false), Ok(()));
        assert!(!lk.tree_is_closed(&tree));

        tree.children[0].children[0].justification = Some(Symbol::from("identity"));
        let errors = lk.is_correct_tree(&tree, &[premise], true).unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::SeqIncorrectPremise);
    }

    #[test]
    fn incorrect_tree() {
        let lk = SequentCalculus::lk();
        let mut tree = weakened(&Formula::meta("A"));
        tree.justification = Some(Symbol::from("WR"));
        tree.children[0].justification = Some(Symbol::from("XR"));
        let errors = lk.is_correct_tree(&tree, &[], false).unwrap_err();
        let codes: Vec<_> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, [ErrorCode::SeqIncorrectJustification, ErrorCode::SeqRuleIncorrectlyApplied]);

        tree.content.0[0].push(fm(Formula::atom("x")));
        let errors = lk.is_correct_tree(&tree, &[], false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::MalformedFormula);
    }

    #[test]
    fn metainferences_are_not_sequents() {
        let p = Formula::atom("p");
        let inf = Inference::new([p.clone()], [p]);
        assert!(inference_to_sequent(&Inference::meta([inf], []), 2, 1).is_err());
    }
}
