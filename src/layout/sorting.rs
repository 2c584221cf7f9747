use std::cmp::Ordering;

use crate::config::{SortKey, SortOrder, SortStat};
use crate::forest::{Node, NodeIx, Tree};

fn stat_value(node: &Node, stat: SortStat) -> usize {
    match stat {
        SortStat::Descendants => node.descendant_count,
        SortStat::Children => node.child_count,
        SortStat::Generations => node.generation_depth,
    }
}

pub fn compare_nodes(key: SortKey, a: &Node, b: &Node) -> Ordering {
    let ordering = stat_value(a, key.stat).cmp(&stat_value(b, key.stat));
    match key.order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Applies each key in turn to the runs of nodes that are still tied on
/// `sort_pos`. Inside a sorted run, a node that sorts strictly after its
/// predecessor gets `run_start + k`, an equal one shares its predecessor's
/// position, so later keys only refine the remaining ties.
pub fn sort_tree(tree: &mut Tree, keys: &[SortKey]) {
    if keys.is_empty() || tree.len() < 2 {
        return;
    }
    for &key in keys {
        let mut order = std::mem::take(tree.order_mut());
        let mut start = 0;
        while start < order.len() {
            let run_pos = tree.node(order[start]).sort_pos;
            let mut end = start + 1;
            while end < order.len() && tree.node(order[end]).sort_pos == run_pos {
                end += 1;
            }
            if end - start > 1 {
                sort_run(tree, &mut order[start..end], key);
            }
            start = end;
        }
        *tree.order_mut() = order;
    }
}

fn sort_run(tree: &mut Tree, run: &mut [NodeIx], key: SortKey) {
    run.sort_by(|a, b| compare_nodes(key, tree.node(*a), tree.node(*b)));
    let mut next = tree.node(run[0]).sort_pos + 1;
    for k in 1..run.len() {
        let prev = tree.node(run[k - 1]);
        let sort_pos = if compare_nodes(key, prev, tree.node(run[k])) == Ordering::Less {
            next
        } else {
            prev.sort_pos
        };
        tree.node_mut(run[k]).sort_pos = sort_pos;
        next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(stats: &[(usize, usize, usize)]) -> Tree {
        let mut tree = Tree::new();
        for (i, (children, descendants, generations)) in stats.iter().enumerate() {
            let mut node = Node::new(i as u32 + 1);
            node.child_count = *children;
            node.descendant_count = *descendants;
            node.generation_depth = *generations;
            tree.add_node(node);
        }
        tree
    }

    fn ordered_ids(tree: &Tree) -> Vec<u32> {
        tree.order().iter().map(|ix| tree.node(*ix).id).collect()
    }

    #[test]
    fn single_key_orders_runs_monotonically() {
        let mut tree = tree_of(&[(1, 1, 1), (3, 5, 2), (0, 0, 0), (2, 5, 1)]);
        sort_tree(&mut tree, &[SortKey::DESCENDANTS_DESC]);

        let values: Vec<usize> = tree
            .order()
            .iter()
            .map(|ix| tree.node(*ix).descendant_count)
            .collect();
        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(ordered_ids(&tree), vec![2, 4, 1, 3]);

        let positions: Vec<i32> = tree.order().iter().map(|ix| tree.node(*ix).sort_pos).collect();
        assert_eq!(positions, vec![0, 0, 2, 3]);
    }

    #[test]
    fn later_keys_refine_only_ties() {
        let mut tree = tree_of(&[(1, 1, 1), (3, 5, 2), (0, 0, 0), (2, 5, 1)]);
        sort_tree(&mut tree, &[SortKey::DESCENDANTS_DESC, SortKey::CHILDREN]);
        assert_eq!(ordered_ids(&tree), vec![4, 2, 1, 3]);

        let positions: Vec<i32> = tree.order().iter().map(|ix| tree.node(*ix).sort_pos).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let mut tree = tree_of(&[(1, 2, 1), (1, 2, 1), (1, 2, 1)]);
        sort_tree(&mut tree, &[SortKey::GENERATIONS]);
        assert_eq!(ordered_ids(&tree), vec![1, 2, 3]);
        assert!(tree.nodes().iter().all(|node| node.sort_pos == 0));
    }

    #[test]
    fn no_keys_is_a_no_op() {
        let mut tree = tree_of(&[(0, 0, 0), (2, 2, 1)]);
        sort_tree(&mut tree, &[]);
        assert_eq!(ordered_ids(&tree), vec![1, 2]);
    }
}
