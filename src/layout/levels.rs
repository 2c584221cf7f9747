use std::collections::VecDeque;

use crate::forest::{NodeIx, Tree, UNASSIGNED_LEVEL};

/// Parent/child structure chosen by breadth-first discovery from the root.
/// Links outside it are cross-connections: drawn, never laid out.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    pub root: NodeIx,
    /// Breadth-first visiting order, root first.
    pub order: Vec<NodeIx>,
    pub parent: Vec<Option<NodeIx>>,
    pub children: Vec<Vec<NodeIx>>,
}

impl SpanningTree {
    pub fn children(&self, ix: NodeIx) -> &[NodeIx] {
        &self.children[ix]
    }

    /// Re-orders every child list by ascending `sort_pos`, ties broken by
    /// the tree's global order.
    pub fn order_children(&mut self, tree: &Tree) {
        let ranks = tree.order_ranks();
        for list in &mut self.children {
            list.sort_by_key(|ix| (tree.node(*ix).sort_pos, ranks[*ix]));
        }
    }
}

/// Labels every reachable node with its BFS depth from the root. Only the
/// first parent to discover a node sets its level, which reduces a cyclic
/// graph to a spanning tree. Returns `None` for an empty or rootless tree.
pub fn assign_levels(tree: &mut Tree) -> Option<SpanningTree> {
    let root = tree.root()?;
    let len = tree.len();
    let mut spanning = SpanningTree {
        root,
        order: Vec::with_capacity(len),
        parent: vec![None; len],
        children: vec![Vec::new(); len],
    };

    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        spanning.order.push(current);
        let level = tree.node(current).level;
        for next in tree.neighbors(current) {
            if tree.node(next).level != UNASSIGNED_LEVEL {
                continue;
            }
            tree.node_mut(next).level = level + 1;
            spanning.parent[next] = Some(current);
            spanning.children[current].push(next);
            queue.push_back(next);
        }
    }
    Some(spanning)
}
