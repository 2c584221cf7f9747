use crate::forest::Tree;

use super::levels::SpanningTree;

/// Turns parent-relative offsets into tree coordinates in node units:
/// `pos_x` accumulates offsets from the root, `pos_y` is the level. The tree
/// is then shifted so the leftmost node sits at x = 0.
pub fn assign_positions(tree: &mut Tree, spanning: &SpanningTree) {
    let mut positioned = vec![false; tree.len()];
    for &ix in &spanning.order {
        if positioned[ix] {
            continue;
        }
        let base = spanning.parent[ix].map_or(0.0, |parent| tree.node(parent).pos_x);
        let node = tree.node_mut(ix);
        node.pos_x = base + node.offset_to_parent;
        node.pos_y = f64::from(node.level);
        positioned[ix] = true;
    }

    let min_x = tree
        .nodes()
        .iter()
        .map(|node| node.pos_x)
        .fold(0.0_f64, f64::min);
    if min_x != 0.0 {
        for node in tree.nodes_mut() {
            node.pos_x -= min_x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Node;
    use crate::layout::levels::assign_levels;
    use crate::layout::stats::compute_stats;
    use crate::layout::tidy::compute_offsets;

    fn positioned(ids: &[u32], links: &[(u32, u32)]) -> Tree {
        let mut tree = Tree::new();
        for id in ids {
            tree.add_node(Node::new(*id));
        }
        for (a, b) in links {
            tree.link(*a, *b);
        }
        tree.set_root(0);
        let mut spanning = assign_levels(&mut tree).expect("rooted");
        compute_stats(&mut tree, &spanning);
        spanning.order_children(&tree);
        compute_offsets(&mut tree, &spanning).expect("offsets");
        assign_positions(&mut tree, &spanning);
        tree
    }

    fn position_of(tree: &Tree, id: u32) -> (f64, f64) {
        tree.node_by_id(id)
            .map(|node| (node.pos_x, node.pos_y))
            .unwrap_or((f64::NAN, f64::NAN))
    }

    #[test]
    fn shifts_leftmost_node_to_zero() {
        let tree = positioned(&[2, 1, 3], &[(2, 1), (2, 3)]);
        assert_eq!(position_of(&tree, 1), (0.0, 1.0));
        assert_eq!(position_of(&tree, 2), (0.5, 0.0));
        assert_eq!(position_of(&tree, 3), (1.0, 1.0));
    }

    #[test]
    fn nodes_on_a_level_never_overlap() {
        let tree = positioned(
            &[1, 2, 3, 4, 5, 6, 7, 8, 9],
            &[(1, 2), (1, 3), (1, 4), (2, 5), (2, 6), (4, 7), (4, 8), (3, 9)],
        );
        let min_x = tree.nodes().iter().map(|node| node.pos_x).fold(f64::INFINITY, f64::min);
        assert_eq!(min_x, 0.0);

        let max_level = tree.max_level().unwrap_or(0);
        for level in 0..=max_level {
            let mut xs: Vec<f64> = tree
                .nodes()
                .iter()
                .filter(|node| node.level == level)
                .map(|node| node.pos_x)
                .collect();
            xs.sort_by(f64::total_cmp);
            assert!(xs.windows(2).all(|pair| pair[1] - pair[0] >= 1.0 - 1e-9));
        }
    }

    #[test]
    fn cyclic_graph_positions_each_node_once() {
        let tree = positioned(&[1, 2, 3, 4], &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert_eq!(position_of(&tree, 4), (0.0, 2.0));
        assert_eq!(position_of(&tree, 1), (0.5, 0.0));
    }
}
