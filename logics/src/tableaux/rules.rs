use super::Label;
use crate::tree::Node;
use crate::Symbol;
use alloc::format;
use alloc::vec::Vec;
use log::trace;

/// Named schematic tableau rules.
///
/// A rule is a tree: its unjustified nodes are the premises,
/// in pre-order, and the justified descendants of the last premise
/// are the expansion.
/// The last premise is the node the rule is applied to;
/// the other premises have to occur above it in the branch.
#[derive(Clone, Debug)]
pub struct Rules<L>(Vec<(Symbol, Node<L>)>);

impl<L> Default for Rules<L> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<L> Rules<L> {
    pub fn new(rules: impl IntoIterator<Item = (Symbol, Node<L>)>) -> Self {
        Self(rules.into_iter().collect())
    }

    pub fn push(&mut self, name: impl Into<Symbol>, rule: Node<L>) {
        self.0.push((name.into(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter().map(|(name, _)| name)
    }

    pub fn get(&self, name: &str) -> Option<&Node<L>> {
        let mut rules = self.0.iter();
        rules.find(|(n, _)| n.as_str() == name).map(|(_, r)| r)
    }
}

impl<L: Label> Rules<L> {
    /// If the rule is applicable to the last node of the branch,
    /// return its instantiated expansion.
    pub fn application(&self, name: &str, branch: &[&L]) -> Option<Node<L>> {
        let rule = self.get(name)?;
        let mut premises: Vec<_> = rule.pre_order();
        premises.retain(|(_, n)| n.justification.is_none());
        let ((_, last), rest) = premises.split_last()?;
        let rest: Vec<&L> = rest.iter().map(|(_, n)| &n.content).collect();

        let (node, above) = branch.split_last()?;
        let mut sub = L::Sub::default();
        if !node.match_with(&last.content, &mut sub) || !match_above(above, &rest, &mut sub) {
            return None;
        }
        match instantiate(last, &sub) {
            Ok(expansion) => Some(expansion),
            Err(m) => {
                trace!("rule {} leaves {} unbound", name, m);
                None
            }
        }
    }
}

/// Match the premises against distinct labels of the branch,
/// in the same order, trying the innermost labels first.
fn match_above<L: Label>(branch: &[&L], premises: &[&L], sub: &mut L::Sub) -> bool {
    let (premise, rest) = match premises.split_last() {
        Some(split) => split,
        None => return true,
    };
    for (i, label) in branch.iter().enumerate().rev() {
        let old = sub.clone();
        if label.match_with(premise, sub) && match_above(&branch[..i], rest, sub) {
            return true;
        }
        *sub = old;
    }
    false
}

fn instantiate<L: Label>(node: &Node<L>, sub: &L::Sub) -> Result<Node<L>, Symbol> {
    let children = node.children.iter().map(|c| instantiate(c, sub));
    Ok(Node {
        content: node.content.instantiate(sub)?,
        justification: node.justification.clone(),
        children: children.collect::<Result<_, _>>()?,
    })
}

impl<L: Clone> Rules<L> {
    /// Add variants of every rule for every order of its branches
    /// and of the nodes inside each branch.
    ///
    /// The variants of a rule `R` are named `R_1`, `R_2`, ...,
    /// where `R_1` is the original rule.
    /// Rules that add a single node are kept as they are.
    /// The nodes of the variants keep the justification of the original rule.
    pub fn invertible(&self) -> Self {
        let mut result = Self::default();
        for (name, rule) in &self.0 {
            let variants = variants(rule);
            if variants.len() == 1 {
                result.push(name.clone(), rule.clone());
                continue;
            }
            for (i, variant) in variants.into_iter().enumerate() {
                result.push(format!("{}_{}", name, i + 1), variant)
            }
        }
        result
    }
}

/// Return the node with all possible orders of its branches,
/// where every branch is a chain of nodes.
fn variants<L: Clone>(node: &Node<L>) -> Vec<Node<L>> {
    if !node.is_leaf() && node.children.iter().all(is_chain) {
        let branches: Vec<Vec<Node<L>>> = node.children.iter().map(chain).collect();
        let mut result = Vec::new();
        for order in crate::permutations(&branches) {
            for inner in product(&order) {
                let children = inner.into_iter().filter_map(Node::chain);
                result.push(Node {
                    content: node.content.clone(),
                    justification: node.justification.clone(),
                    children: children.collect(),
                })
            }
        }
        result
    } else if let [child] = &node.children[..] {
        // the expansion lies further below, after other premises
        let variants = variants(child).into_iter().map(|child| Node {
            content: node.content.clone(),
            justification: node.justification.clone(),
            children: Vec::from([child]),
        });
        variants.collect()
    } else {
        Vec::from([node.clone()])
    }
}

/// Return true if every node in the tree has at most one child, and all of them are justified.
fn is_chain<L>(node: &Node<L>) -> bool {
    node.justification.is_some() && node.children.len() <= 1 && node.children.iter().all(is_chain)
}

fn chain<L: Clone>(node: &Node<L>) -> Vec<Node<L>> {
    let mut result = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        result.push(Node {
            content: n.content.clone(),
            justification: n.justification.clone(),
            children: Vec::new(),
        });
        current = n.children.first();
    }
    result
}

/// Return all combinations of orders of the branches,
/// varying the first branch fastest.
fn product<L: Clone>(branches: &[Vec<Node<L>>]) -> Vec<Vec<Vec<Node<L>>>> {
    let (first, rest) = match branches.split_first() {
        Some(split) => split,
        None => return Vec::from([Vec::new()]),
    };
    let mut result = Vec::new();
    for tail in product(rest) {
        for perm in crate::permutations(first) {
            let mut combination = Vec::from([perm]);
            combination.extend(tail.iter().cloned());
            result.push(combination)
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableaux::Entry;
    use crate::{Formula, Indexed};

    fn entry(fm: Formula) -> Entry {
        Indexed(fm, None)
    }

    #[test]
    fn biconditional_variants() {
        let (a, b) = (Formula::meta("A"), Formula::meta("B"));
        let left = Node::justified(entry(a.clone()), "R↔").child(Node::justified(entry(b.clone()), "R↔"));
        let right = Node::justified(entry(-a.clone()), "R↔").child(Node::justified(entry(-b.clone()), "R↔"));
        let rule = Node::new(entry(Formula::iff(a.clone(), b))).children([left, right]);
        let rules = Rules::new(core::iter::once((Symbol::from("R↔"), rule.clone())));
        let inv = rules.invertible();
        let names: Vec<_> = inv.names().map(|n| n.as_str()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "R↔_1");
        assert_eq!(inv.get("R↔_1"), Some(&rule));
        // swapping the left branch
        let swapped = inv.get("R↔_2").unwrap();
        assert_eq!(swapped.children[0].content, entry(Formula::meta("B")));
        assert_eq!(swapped.children[0].children[0].content, entry(a));
    }

    #[test]
    fn premises_above_backtrack() {
        let (a, b) = (Formula::meta("A"), Formula::meta("B"));
        let (p, q, r) = (Formula::atom("p"), Formula::atom("q"), Formula::atom("r"));
        let expansion = Node::justified(entry(b.clone()), "R");
        let applied = Node::new(entry(a.clone())).child(expansion);
        let rule = Node::new(entry(b.clone())).child(Node::new(entry(Formula::imp(a, b))).child(applied));
        let rules = Rules::new(core::iter::once((Symbol::from("R"), rule)));

        // the nearest conditional binds B to r, which is not above it
        let labels = [
            entry(q.clone()),
            entry(Formula::imp(p.clone(), q.clone())),
            entry(Formula::imp(p.clone(), r)),
            entry(p.clone()),
        ];
        let branch: Vec<_> = labels.iter().collect();
        let app = rules.application("R", &branch).unwrap();
        assert_eq!(app.content, entry(p));
        assert_eq!(app.children[0].content, entry(q));

        assert!(rules.application("R", &branch[1..]).is_none());
    }

    #[test]
    fn single_node_rules_are_kept() {
        let a = Formula::meta("A");
        let rule = Node::new(entry(-(-a.clone()))).child(Node::justified(entry(a), "R~~"));
        let rules = Rules::new(core::iter::once((Symbol::from("R~~"), rule)));
        let inv = rules.invertible();
        assert_eq!(inv.names().collect::<Vec<_>>(), Vec::from([&Symbol::from("R~~")]));
    }
}
