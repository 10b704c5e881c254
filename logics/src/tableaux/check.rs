use super::{labels, Role, Tableaux};
use crate::error::{CorrectionError, ErrorCode, Errors, Location};
use crate::tree::{Node, Path};
use crate::{Rewind, Symbol};
use alloc::format;
use alloc::vec::Vec;
use hashbrown::HashSet;
use log::debug;

/// Name under which the nodes added by a rule application are justified.
///
/// Rule variants obtained by reordering share this name.
pub(crate) fn group<L>(rule: &Symbol, app: &Node<L>) -> Symbol {
    let first = app.pre_order().into_iter().find_map(|(_, n)| n.justification.clone());
    first.unwrap_or_else(|| rule.clone())
}

/// Return true if the expansion of a rule application was appended
/// to all open branches below the node at the given path.
///
/// The paths of the nodes accounted for by the application are pushed to `acc`.
fn correctly_applied<T: Tableaux + ?Sized>(
    sys: &T,
    tree: &Node<T::Label>,
    path: &Path,
    rule: &Node<T::Label>,
    derived: &HashSet<Path>,
    acc: &mut Vec<Path>,
) -> bool {
    if rule.is_leaf() {
        return true;
    }
    let node = match tree.get(path) {
        Some(node) => node,
        None => return false,
    };
    if node.is_leaf() {
        // no need to apply rules to closed branches
        return labels(tree, path).map_or(false, |b| sys.branch_is_closed(&b));
    }

    let child = |i| {
        let mut child = path.clone();
        child.push(i);
        child
    };
    let mut pairs = node.children.iter().zip(rule.children.iter()).enumerate();
    let instance = node.children.len() == rule.children.len()
        && pairs.all(|(i, (n, r))| {
            !derived.contains(&child(i)) && n.content == r.content && n.justification == r.justification
        });

    let len = acc.len();
    let correct = if instance {
        let mut children = rule.children.iter().enumerate();
        let correct = children.all(|(i, r)| correctly_applied(sys, tree, &child(i), r, derived, acc));
        acc.extend((0..node.children.len()).map(child));
        correct
    } else {
        // the rule must have been applied further below
        let mut children = 0..node.children.len();
        children.all(|i| correctly_applied(sys, tree, &child(i), rule, derived, acc))
    };
    if !correct {
        acc.rewind(len)
    }
    correct
}

pub(crate) fn is_correct_tree<T: Tableaux + ?Sized>(
    sys: &T,
    tree: &Node<T::Label>,
    goal: Option<&T::Goal>,
    exit_on_first_error: bool,
) -> Result<(), Vec<CorrectionError>> {
    let mut errors = Errors::new(exit_on_first_error);
    // errors have already been recorded when this fails
    let _ = check_tree(sys, tree, goal, &mut errors);
    errors.sort_by_key(|e| match &e.location {
        Location::Path(path) => (path.len(), path.clone()),
        _ => (0, Vec::new()),
    });
    errors.finish()
}

fn check_tree<T: Tableaux + ?Sized>(
    sys: &T,
    tree: &Node<T::Label>,
    goal: Option<&T::Goal>,
    errors: &mut Errors,
) -> Result<(), ()> {
    let nodes = tree.level_order();

    for (path, node) in &nodes {
        if let Err(e) = sys.check_label(&node.content) {
            let e = format!("{}: {}", node.content, e);
            errors.push(CorrectionError::new(ErrorCode::MalformedFormula, Location::Path(path.clone()), e))?
        }
    }
    let initial = match goal.map(|goal| sys.initial(goal)).transpose() {
        Ok(initial) => initial,
        Err(e) => {
            errors.push(CorrectionError::new(ErrorCode::MalformedInference, Location::Goal, e))?;
            None
        }
    };
    if !errors.is_empty() {
        return Err(());
    }

    let mut derived: HashSet<Path> = HashSet::new();
    let mut present = HashSet::new();
    let mut traversing_premises = true;
    let rules = sys.rule_names();

    for (path, node) in &nodes {
        let location = || Location::Path(path.clone());
        if node.justification.is_some() {
            traversing_premises = false
        } else {
            if !traversing_premises {
                let e = "Premise nodes must be at the beginning of the tableaux, \
                         before applying any rule and before opening any new branch";
                errors.push(CorrectionError::new(ErrorCode::TblPremiseNotBeginning, location(), e))?
            }
            if let Some(initial) = &initial {
                let mut matching = initial.iter().filter(|i| i.label == node.content).peekable();
                if matching.peek().is_none() {
                    let e = format!("Node {} is an incorrect premise node", node.content);
                    errors.push(CorrectionError::new(ErrorCode::TblIncorrectPremise, location(), e))?
                }
                present.extend(matching.map(|i| (i.role, i.index)));
            }
        }
        if node.children.len() > 1 {
            traversing_premises = false
        }

        let branch = match labels(tree, path) {
            Some(branch) => branch,
            None => continue,
        };
        // applications of variants of the same rule, in the order of the rules
        let mut groups: Vec<(Symbol, Vec<Node<T::Label>>)> = Vec::new();
        for rule in &rules {
            if let Some(app) = sys.application(rule, &branch) {
                let name = group(rule, &app);
                match groups.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, apps)) => apps.push(app),
                    None => groups.push((name, Vec::from([app]))),
                }
            }
        }
        for (name, apps) in groups {
            let mut acc = Vec::new();
            let applied = apps.iter().any(|app| correctly_applied(sys, tree, path, app, &derived, &mut acc));
            if applied {
                debug!("{} correctly applied to {}", name, node.content);
                derived.extend(acc)
            } else {
                let e = format!("Rule {} was not applied to node {}", name, node.content);
                errors.push(CorrectionError::new(ErrorCode::TblRuleNotApplied, location(), e))?
            }
        }
    }

    if let (Some(goal), Some(initial)) = (goal, &initial) {
        for i in initial {
            if !present.contains(&(i.role, i.index)) {
                let (what, code) = match i.role {
                    Role::Premise => ("Premise", ErrorCode::TblPremiseNotPresent),
                    Role::Conclusion => ("Conclusion", ErrorCode::TblConclusionNotPresent),
                };
                let e = format!("{} {} of {} is not present in the tree", what, i.label, goal);
                errors.push(CorrectionError::new(code, Location::Path(Vec::new()), e))?
            }
        }
    }

    for (path, node) in &nodes {
        if node.justification.is_some() && !derived.contains(path) {
            let e = format!("Rule incorrectly applied to node {}", node.content);
            errors.push(CorrectionError::new(ErrorCode::TblRuleIncorrectlyApplied, Location::Path(path.clone()), e))?
        }
    }
    Ok(())
}
