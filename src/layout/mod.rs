mod error;
pub mod levels;
pub mod packing;
pub mod position;
pub mod sizing;
pub mod sorting;
pub mod stats;
pub mod tidy;
mod types;
pub use error::*;
pub use types::*;

use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::forest::{Forest, Tree};
use crate::ir::Device;
use crate::topology;

/// Runs the per-tree stages: levels, statistics, sorting, offsets, positions,
/// scaling and sizing. Returns `Ok(false)` when the tree has no root and was
/// left untouched.
pub fn layout_tree(tree: &mut Tree, config: &LayoutConfig) -> Result<bool, LayoutError> {
    let Some(mut spanning) = levels::assign_levels(tree) else {
        return Ok(false);
    };
    stats::compute_stats(tree, &spanning);
    sorting::sort_tree(tree, &config.sort_keys);
    spanning.order_children(tree);
    tidy::compute_offsets(tree, &spanning)?;
    position::assign_positions(tree, &spanning);
    sizing::scale_tree(tree, config.node_spacing_x, config.node_spacing_y);
    sizing::size_tree(tree, &config.padding);
    Ok(true)
}

/// Lays out every tree, then packs the trees into one canvas.
pub fn layout_forest(
    forest: &mut Forest,
    config: &LayoutConfig,
) -> Result<Vec<LayoutWarning>, LayoutError> {
    let mut warnings = Vec::new();
    for (idx, tree) in forest.trees.iter_mut().enumerate() {
        if tree.is_empty() {
            continue;
        }
        if !layout_tree(tree, config)? {
            warn!(tree = idx, "tree has no root; skipping layout");
            warnings.push(LayoutWarning::MissingRoot { tree: idx });
        }
    }
    packing::pack_forest(forest)?;
    Ok(warnings)
}

/// Full pipeline from discovered devices to absolute canvas coordinates.
pub fn compute_map_layout(
    devices: Vec<Device>,
    config: &LayoutConfig,
) -> Result<MapLayout, LayoutError> {
    let (reduced, mut warnings) = topology::reduce(devices);
    let mut forest = topology::build_forest(&reduced, (config.node_width, config.node_height));
    warnings.extend(layout_forest(&mut forest, config)?);

    let mut width = 0.0_f64;
    let mut height = 0.0_f64;
    for tree in &forest.trees {
        width = width.max(tree.pos_x + tree.width);
        height = height.max(tree.pos_y + tree.height);
    }

    let mut devices = Vec::with_capacity(reduced.devices.len());
    for device in &reduced.devices {
        let Some((tree_idx, ix)) = forest.locate(device.id) else {
            continue;
        };
        let tree = &forest.trees[tree_idx];
        let node = tree.node(ix);
        let mut placed = PlacedDevice::from_device(device, tree_idx);
        placed.level = node.level;
        placed.x = tree.pos_x + node.pos_x;
        placed.y = tree.pos_y + node.pos_y;
        placed.width = node.width;
        placed.height = node.height;
        devices.push(placed);
    }
    debug!(
        devices = devices.len(),
        trees = forest.len(),
        width,
        height,
        "map layout complete"
    );

    Ok(MapLayout {
        devices,
        links: reduced.links,
        width,
        height,
        forest,
        warnings,
    })
}
