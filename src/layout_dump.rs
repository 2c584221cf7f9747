use crate::forest::{Forest, Node, NodeIx, Tree};
use crate::layout::MapLayout;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub trees: Vec<TreeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDump {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<[u32; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: u32,
    pub level: i32,
    pub sort_pos: i32,
    pub offset: f64,
    pub x: f64,
    pub y: f64,
    pub children: usize,
    pub descendants: usize,
    pub generations: usize,
}

impl NodeDump {
    fn from_node(node: &Node) -> Self {
        Self {
            id: node.id,
            level: node.level,
            sort_pos: node.sort_pos,
            offset: node.offset_to_parent,
            x: node.pos_x,
            y: node.pos_y,
            children: node.child_count,
            descendants: node.descendant_count,
            generations: node.generation_depth,
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &MapLayout) -> Self {
        let trees = layout
            .forest
            .trees
            .iter()
            .enumerate()
            .map(|(index, tree)| TreeDump {
                index,
                x: tree.pos_x,
                y: tree.pos_y,
                width: tree.width,
                height: tree.height,
                nodes: tree.nodes().iter().map(NodeDump::from_node).collect(),
                links: tree.links().iter().map(|link| [link.id1, link.id2]).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            trees,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &MapLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

/// Counts recomputed straight from the links, treating every neighbour one
/// level down as a child. Cross-links show up here but not in the layout
/// statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Recount {
    children: usize,
    descendants: usize,
    generations: usize,
}

fn level_children(tree: &Tree, ix: NodeIx) -> Vec<NodeIx> {
    let level = tree.node(ix).level;
    tree.neighbors(ix)
        .into_iter()
        .filter(|next| tree.node(*next).level == level + 1)
        .collect()
}

fn recount(tree: &Tree, ix: NodeIx) -> Recount {
    let children = level_children(tree, ix).len();
    let mut seen = vec![false; tree.len()];
    seen[ix] = true;
    let mut descendants = 0;
    let mut generations = 0;
    let mut queue = VecDeque::from([(ix, 0)]);
    while let Some((current, depth)) = queue.pop_front() {
        generations = generations.max(depth);
        for next in level_children(tree, current) {
            if !seen[next] {
                seen[next] = true;
                descendants += 1;
                queue.push_back((next, depth + 1));
            }
        }
    }
    Recount {
        children,
        descendants,
        generations,
    }
}

/// Human-readable report of every tree: one row per node with the layout
/// fields, an on-demand recount of the statistics and an `OK`/`ERROR!`
/// consistency check, followed by node counts per depth and the tree size.
pub fn render_report(forest: &Forest) -> String {
    let mut out = String::new();
    for (index, tree) in forest.trees.iter().enumerate() {
        out.push_str(&format!("Tree {index}\n"));
        render_tree(&mut out, tree);
        out.push('\n');
    }
    out
}

fn render_tree(out: &mut String, tree: &Tree) {
    if tree.is_empty() {
        out.push_str("No nodes found in tree\n");
        return;
    }

    out.push_str(&format!(
        "{:<10}{:<10}{:<12}{:<10}{:<10}{:<10}{:<11}{:<13}{:<14}{:<11}{:<13}{:<14}{}\n",
        "Node ID",
        "Level",
        "SortPos",
        "offset",
        "posX",
        "posY",
        "Children",
        "Descendants",
        "Generations",
        "Children",
        "Descendants",
        "Generations",
        "Check"
    ));
    out.push_str(&format!(
        "{:<62}{:<11}{:<13}{:<14}{:<11}{:<13}{:<14}\n",
        "", "(demand)", "(demand)", "(demand)", "(stats)", "(stats)", "(stats)"
    ));

    for (ix, node) in tree.nodes().iter().enumerate() {
        let counted = recount(tree, ix);
        let stored = Recount {
            children: node.child_count,
            descendants: node.descendant_count,
            generations: node.generation_depth,
        };
        let check = if counted == stored { "OK" } else { "ERROR!" };
        out.push_str(&format!(
            "{:<10}{:<10}{:<12}{:<10.2}{:<10.2}{:<10.2}{:<11}{:<13}{:<14}{:<11}{:<13}{:<14}{}\n",
            node.id,
            node.level,
            node.sort_pos,
            node.offset_to_parent,
            node.pos_x,
            node.pos_y,
            counted.children,
            counted.descendants,
            counted.generations,
            stored.children,
            stored.descendants,
            stored.generations,
            check
        ));
    }
    out.push('\n');

    let levels = tree.nodes().iter().map(|node| node.level);
    if let (Some(min), Some(max)) = (levels.clone().min(), levels.max()) {
        for depth in min..=max {
            let count = tree.nodes().iter().filter(|node| node.level == depth).count();
            out.push_str(&format!("Nodes at depth {depth}: {count}\n"));
        }
    }
    out.push_str(&format!(
        "tree width: {:.2} and height: {:.2}\n",
        tree.width, tree.height
    ));
}
