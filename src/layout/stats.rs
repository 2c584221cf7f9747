use crate::forest::Tree;

use super::levels::SpanningTree;

/// Fills `child_count`, `descendant_count` and `generation_depth` for every
/// node on the spanning tree. Walking the BFS order backwards visits every
/// child before its parent.
pub fn compute_stats(tree: &mut Tree, spanning: &SpanningTree) {
    for &ix in spanning.order.iter().rev() {
        let children = spanning.children(ix);
        let mut descendants = children.len();
        let mut generations = 0;
        for &child in children {
            let node = tree.node(child);
            descendants += node.descendant_count;
            generations = generations.max(node.generation_depth + 1);
        }
        let node = tree.node_mut(ix);
        node.child_count = children.len();
        node.descendant_count = descendants;
        node.generation_depth = generations;
    }
}
