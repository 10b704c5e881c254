use super::check::group;
use super::{labels, Opt, Tableaux};
use crate::tree::{Node, Path};
use crate::{SolveError, Symbol};
use alloc::collections::VecDeque;
use alloc::format;
use alloc::vec::Vec;
use log::{debug, trace};

pub(crate) fn solve_tree<T: Tableaux + ?Sized>(
    sys: &T,
    goal: &T::Goal,
    opt: Opt,
) -> Result<Node<T::Label>, SolveError> {
    let initial = sys.initial(goal).map_err(SolveError::Malformed)?;
    let nodes = initial.into_iter().map(|i| Node::new(i.label));
    let empty = || SolveError::Malformed(format!("{} has no premises or conclusions", goal));
    let mut tree = Node::chain(nodes).ok_or_else(empty)?;

    let rules = sys.rule_names();
    // applications made so far, with the rule, its group and the node it was applied to
    let mut applied: Vec<(Symbol, Symbol, Node<T::Label>, Path)> = Vec::new();
    let mut queue: VecDeque<Path> = VecDeque::from([Vec::new()]);

    while let Some(path) = queue.pop_front() {
        if sys.tree_is_closed(&tree) {
            return Ok(tree);
        }
        for rule in &rules {
            let app = match labels(&tree, &path).and_then(|b| sys.application(rule, &b)) {
                Some(app) => app,
                None => continue,
            };
            let name = group(rule, &app);
            // skip applications whose expansion is already in all branches through the node,
            // also when a different variant of the rule was used
            let done = applied.iter().any(|(r, g, a, p)| {
                let same = (r == rule && a == &app) || (r != rule && g == &name && a.content == app.content);
                same && path.starts_with(p)
            });
            if done {
                continue;
            }
            trace!("apply {} to {}", rule, app.content);

            let node = match tree.get(&path) {
                Some(node) => node,
                None => continue,
            };
            let mut leaves: Vec<Path> = node.leaves().into_iter().map(|(p, _)| p).collect();
            for leaf in &mut leaves {
                let mut full = path.clone();
                full.append(leaf);
                *leaf = full;
            }
            for leaf in leaves {
                if leaf.len() >= opt.max_depth {
                    debug!("maximal depth {} reached", opt.max_depth);
                    let e = "Could not solve the tree. Maximum depth exceeded";
                    return Err(SolveError::Exhausted(e.into()));
                }
                let closed = labels(&tree, &leaf).map_or(false, |b| sys.branch_is_closed(&b));
                if let (false, Some(node)) = (closed, tree.get_mut(&leaf)) {
                    node.children.extend(app.children.iter().cloned())
                }
            }
            applied.push((rule.clone(), name, app, path.clone()));

            if sys.tree_is_closed(&tree) {
                return Ok(tree);
            }
        }
        if let Some(node) = tree.get(&path) {
            queue.extend((0..node.children.len()).map(|i| {
                let mut child = path.clone();
                child.push(i);
                child
            }))
        }
    }
    Ok(tree)
}
