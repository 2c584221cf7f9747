use crate::config::Padding;
use crate::forest::Tree;

/// Converts unit coordinates to canvas units. Each axis is scaled by the
/// spacing plus the node's own extent on that axis.
pub fn scale_tree(tree: &mut Tree, spacing_x: f64, spacing_y: f64) {
    for node in tree.nodes_mut() {
        node.pos_x *= spacing_x + node.width;
        node.pos_y *= spacing_y + node.height;
    }
}

/// Shifts nodes by the top/left padding and sets the tree's width and height
/// to the node bounding box grown by the padding on all four sides.
pub fn size_tree(tree: &mut Tree, padding: &Padding) {
    if tree.is_empty() {
        return;
    }
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for node in tree.nodes_mut() {
        node.pos_x += padding.left;
        node.pos_y += padding.top;
        min_x = min_x.min(node.pos_x);
        min_y = min_y.min(node.pos_y);
        max_x = max_x.max(node.pos_x + node.width);
        max_y = max_y.max(node.pos_y + node.height);
    }
    tree.width = max_x - min_x + padding.left + padding.right;
    tree.height = max_y - min_y + padding.top + padding.bottom;
}
