//! Reingold–Tilford offsets generalised to m-ary trees.
//!
//! Children are placed pairwise from left to right. Every child already
//! placed joins the left "clump"; the next child is compared against the
//! clump depth by depth, threading right to left through the clump to the
//! nearest sibling whose subtree reaches that depth.

use crate::forest::{NodeIx, Tree};

use super::error::LayoutError;
use super::levels::SpanningTree;

/// Minimum horizontal gap between neighbouring subtrees, in node units.
pub const MIN_SEPARATION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Sets `offset_to_parent` on every non-root node. Parents are handled
/// deepest first so each child's own subtree is final before it is compared
/// with its siblings.
pub fn compute_offsets(tree: &mut Tree, spanning: &SpanningTree) -> Result<(), LayoutError> {
    let mut placed = vec![false; tree.len()];
    placed[spanning.root] = true;
    for &parent in spanning.order.iter().rev() {
        // A child placed under another parent keeps that placement.
        let children: Vec<NodeIx> = spanning
            .children(parent)
            .iter()
            .copied()
            .filter(|child| !placed[*child])
            .collect();
        place_children(tree, spanning, &children)?;
        for child in children {
            placed[child] = true;
        }
    }
    Ok(())
}

fn place_children(
    tree: &mut Tree,
    spanning: &SpanningTree,
    children: &[NodeIx],
) -> Result<(), LayoutError> {
    match children {
        [] => return Ok(()),
        [only] => {
            tree.node_mut(*only).offset_to_parent = 0.0;
            return Ok(());
        }
        _ => {}
    }

    let generations: Vec<usize> = children
        .iter()
        .map(|child| tree.node(*child).generation_depth)
        .collect();
    let mut gaps = vec![0.0_f64; children.len() - 1];
    let mut clump_depth = 0;

    for i in 0..gaps.len() {
        let right = children[i + 1];
        clump_depth = clump_depth.max(generations[i]);
        let depth_limit = clump_depth.min(generations[i + 1]);
        let mut gap = 0.0_f64;

        for depth in 0..=depth_limit {
            let candidate = (0..=i)
                .rev()
                .find(|x| generations[*x] >= depth)
                .ok_or(LayoutError::MissingClumpCandidate {
                    node: tree.node(right).id,
                    depth,
                })?;
            // Gaps already fixed between the candidate and the left neighbour.
            let interval: f64 = gaps[candidate..i].iter().sum();
            let separation = cumulative_offset(tree, spanning, right, depth, Side::Left)?
                - cumulative_offset(tree, spanning, children[candidate], depth, Side::Right)?;
            gap = gap.max(MIN_SEPARATION - separation - interval);
        }
        gaps[i] = gap;
    }

    let total: f64 = gaps.iter().sum();
    let mut offset = -total / 2.0;
    tree.node_mut(children[0]).offset_to_parent = offset;
    for (child, gap) in children[1..].iter().zip(&gaps) {
        offset += gap;
        tree.node_mut(*child).offset_to_parent = offset;
    }
    Ok(())
}

/// Accumulated offset from `node` down its left or right contour to the
/// side-most descendant exactly `depth` levels below it. At depth 0 this is
/// the node's own `offset_to_parent`.
pub fn cumulative_offset(
    tree: &Tree,
    spanning: &SpanningTree,
    node: NodeIx,
    depth: usize,
    side: Side,
) -> Result<f64, LayoutError> {
    let mut total = tree.node(node).offset_to_parent;
    let mut current = node;
    for remaining in (1..=depth).rev() {
        let children = spanning.children(current);
        let deep_enough = |child: &&NodeIx| tree.node(**child).generation_depth + 1 >= remaining;
        let next = match side {
            Side::Left => children.iter().find(deep_enough),
            Side::Right => children.iter().rev().find(deep_enough),
        };
        let Some(&next) = next else {
            return Err(LayoutError::MissingContour {
                node: tree.node(node).id,
                depth,
            });
        };
        total += tree.node(next).offset_to_parent;
        current = next;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Node;
    use crate::layout::levels::assign_levels;
    use crate::layout::stats::compute_stats;

    fn laid_out(ids: &[u32], links: &[(u32, u32)]) -> (Tree, SpanningTree) {
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
        (tree, spanning)
    }

    fn offset_of(tree: &Tree, id: u32) -> f64 {
        tree.node_by_id(id).map(|node| node.offset_to_parent).unwrap_or(f64::NAN)
    }

    #[test]
    fn two_leaves_straddle_their_parent() {
        let (tree, _) = laid_out(&[2, 1, 3], &[(2, 1), (2, 3)]);
        assert_eq!(offset_of(&tree, 1), -0.5);
        assert_eq!(offset_of(&tree, 3), 0.5);
        assert_eq!(offset_of(&tree, 2), 0.0);
    }

    #[test]
    fn lone_child_sits_under_parent() {
        let (tree, _) = laid_out(&[1, 2, 3], &[(1, 2), (2, 3)]);
        assert_eq!(offset_of(&tree, 2), 0.0);
        assert_eq!(offset_of(&tree, 3), 0.0);
    }

    #[test]
    fn leaves_are_spaced_one_unit_apart() {
        let (tree, _) = laid_out(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (1, 4), (1, 5)]);
        let offsets: Vec<f64> = [2, 3, 4, 5].iter().map(|id| offset_of(&tree, *id)).collect();
        assert_eq!(offsets, vec![-1.5, -0.5, 0.5, 1.5]);
    }

    #[test]
    fn threads_past_a_shallow_middle_sibling() {
        // Root 1 has children 2, 3 and 4. Node 3 is a leaf; 2 and 4 each have
        // three leaves whose contours must clear each other across node 3.
        let (tree, _) = laid_out(
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            &[
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 5),
                (2, 6),
                (2, 7),
                (4, 8),
                (4, 9),
                (4, 10),
            ],
        );
        assert_eq!(offset_of(&tree, 2), -1.5);
        assert_eq!(offset_of(&tree, 3), -0.5);
        assert_eq!(offset_of(&tree, 4), 1.5);
        assert_eq!(offset_of(&tree, 5), -1.0);
        assert_eq!(offset_of(&tree, 7), 1.0);

        let right_of_left_subtree = offset_of(&tree, 2) + offset_of(&tree, 7);
        let left_of_right_subtree = offset_of(&tree, 4) + offset_of(&tree, 8);
        assert!(left_of_right_subtree - right_of_left_subtree >= MIN_SEPARATION);
    }

    #[test]
    fn contour_follows_the_requested_side() {
        let (tree, spanning) = laid_out(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (2, 4), (3, 5)]);
        let root = spanning.root;
        assert_eq!(cumulative_offset(&tree, &spanning, root, 0, Side::Left), Ok(0.0));
        assert_eq!(cumulative_offset(&tree, &spanning, root, 2, Side::Left), Ok(-0.5));
        assert_eq!(cumulative_offset(&tree, &spanning, root, 2, Side::Right), Ok(0.5));
    }

    #[test]
    fn contour_below_a_leaf_is_an_error() {
        let (tree, spanning) = laid_out(&[1, 2], &[(1, 2)]);
        let leaf = tree.index_of(2).expect("leaf");
        assert_eq!(
            cumulative_offset(&tree, &spanning, leaf, 1, Side::Right),
            Err(LayoutError::MissingContour { node: 2, depth: 1 })
        );
    }
}
