use tracing::debug;

use crate::forest::Forest;

use super::error::LayoutError;

/// A tree's bounding box during packing; `id` is the tree's index in the
/// forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub id: usize,
    pub w: f64,
    pub h: f64,
    pub x: f64,
    pub y: f64,
}

impl Rect {
    pub fn new(id: usize, w: f64, h: f64) -> Self {
        Self { id, w, h, x: 0.0, y: 0.0 }
    }
}

/// Strip width for a set of rectangles: the side of a square of equal area,
/// widened to the widest rectangle if that is larger.
pub fn strip_width(rects: &[Rect]) -> f64 {
    let area: f64 = rects.iter().map(|rect| rect.w * rect.h).sum();
    let widest = rects.iter().map(|rect| rect.w).fold(0.0_f64, f64::max);
    area.sqrt().max(widest)
}

/// First-fit decreasing-height shelf packing. Rectangles are stably sorted by
/// descending height; the tallest unplaced one opens each shelf and every
/// later one that still fits joins it.
pub fn ffdh(rects: &mut [Rect], width: f64) {
    rects.sort_by(|a, b| b.h.total_cmp(&a.h));
    let mut placed = vec![false; rects.len()];
    let mut remaining = rects.len();
    let mut y = 0.0;
    while remaining > 0 {
        let mut x = 0.0;
        let mut shelf_height = None;
        for (i, rect) in rects.iter_mut().enumerate() {
            if placed[i] {
                continue;
            }
            // The tallest unplaced rectangle opens the shelf even when it is
            // wider than the strip.
            let opening = shelf_height.is_none();
            shelf_height.get_or_insert(rect.h);
            if opening || width - x >= rect.w {
                rect.x = x;
                rect.y = y;
                x += rect.w;
                placed[i] = true;
                remaining -= 1;
            }
        }
        y += shelf_height.unwrap_or(0.0);
    }
}

/// Packs every tree's bounding box into one canvas and writes the resulting
/// origin back to each tree.
pub fn pack_forest(forest: &mut Forest) -> Result<(), LayoutError> {
    if forest.is_empty() {
        return Ok(());
    }
    let mut rects: Vec<Rect> = forest
        .trees
        .iter()
        .enumerate()
        .map(|(id, tree)| Rect::new(id, tree.width, tree.height))
        .collect();
    let width = strip_width(&rects);
    if width == 0.0 {
        return Err(LayoutError::ZeroPackingWidth);
    }
    debug!(trees = rects.len(), width, "packing forest");
    ffdh(&mut rects, width);
    for rect in &rects {
        if let Some(tree) = forest.trees.get_mut(rect.id) {
            tree.pos_x = rect.x;
            tree.pos_y = rect.y;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{Node, Tree};

    fn rects(sizes: &[(f64, f64)]) -> Vec<Rect> {
        sizes
            .iter()
            .enumerate()
            .map(|(id, (w, h))| Rect::new(id, *w, *h))
            .collect()
    }

    fn sized_tree(width: f64, height: f64) -> Tree {
        let mut tree = Tree::new();
        tree.add_node(Node::new(1));
        tree.width = width;
        tree.height = height;
        tree
    }

    #[test]
    fn strip_is_at_least_the_widest_rect() {
        assert_eq!(strip_width(&rects(&[(2.0, 2.0), (2.0, 2.0)])), 8.0_f64.sqrt());
        assert_eq!(strip_width(&rects(&[(10.0, 1.0), (1.0, 1.0)])), 10.0);
    }

    #[test]
    fn shelves_hold_first_fitting_rects() {
        let mut packed = rects(&[(3.0, 1.0), (4.0, 3.0), (3.0, 2.0), (2.0, 2.0)]);
        ffdh(&mut packed, 7.0);
        let by_id = |id: usize| packed.iter().find(|rect| rect.id == id).copied();
        assert_eq!(by_id(1).map(|rect| (rect.x, rect.y)), Some((0.0, 0.0)));
        assert_eq!(by_id(2).map(|rect| (rect.x, rect.y)), Some((4.0, 0.0)));
        assert_eq!(by_id(3).map(|rect| (rect.x, rect.y)), Some((0.0, 3.0)));
        assert_eq!(by_id(0).map(|rect| (rect.x, rect.y)), Some((2.0, 3.0)));
    }

    #[test]
    fn shelves_never_overlap_or_overflow() {
        let sizes: Vec<(f64, f64)> = (1..=12)
            .map(|i| (f64::from(i % 5 + 1), f64::from(i % 4 + 1)))
            .collect();
        let mut packed = rects(&sizes);
        let width = strip_width(&packed);
        ffdh(&mut packed, width);

        let mut shelves: Vec<f64> = packed.iter().map(|rect| rect.y).collect();
        shelves.sort_by(f64::total_cmp);
        shelves.dedup();
        for y in shelves {
            let mut row: Vec<Rect> = packed.iter().copied().filter(|rect| rect.y == y).collect();
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            assert!(row.windows(2).all(|pair| pair[0].x + pair[0].w <= pair[1].x));
            let used: f64 = row.iter().map(|rect| rect.w).sum();
            assert!(used <= width + 1e-9);
        }
    }

    #[test]
    fn writes_origins_back_to_trees() {
        let mut forest = Forest::new();
        forest.add_tree(sized_tree(200.0, 200.0));
        forest.add_tree(sized_tree(300.0, 500.0));
        pack_forest(&mut forest).expect("packed");
        assert_eq!((forest.trees[1].pos_x, forest.trees[1].pos_y), (0.0, 0.0));
        // sqrt(190000) leaves too little room beside the taller tree.
        assert_eq!((forest.trees[0].pos_x, forest.trees[0].pos_y), (0.0, 500.0));
    }

    #[test]
    fn zero_width_forest_is_rejected() {
        let mut forest = Forest::new();
        forest.add_tree(sized_tree(0.0, 0.0));
        assert_eq!(pack_forest(&mut forest), Err(LayoutError::ZeroPackingWidth));
    }

    #[test]
    fn empty_forest_packs_trivially() {
        let mut forest = Forest::new();
        assert_eq!(pack_forest(&mut forest), Ok(()));
    }
}
