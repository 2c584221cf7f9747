use std::collections::HashMap;

use serde::Serialize;

pub type NodeId = u32;

/// Index of a node inside its tree's arena. Stable for the life of the tree.
pub type NodeIx = usize;

pub const UNASSIGNED_LEVEL: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub level: i32,
    pub sort_pos: i32,
    pub offset_to_parent: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub width: f64,
    pub height: f64,
    pub child_count: usize,
    pub descendant_count: usize,
    pub generation_depth: usize,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            level: UNASSIGNED_LEVEL,
            sort_pos: 0,
            offset_to_parent: 0.0,
            pos_x: 0.0,
            pos_y: 0.0,
            width: 1.0,
            height: 1.0,
            child_count: 0,
            descendant_count: 0,
            generation_depth: 0,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id1: NodeId,
    pub id2: NodeId,
}

impl Link {
    pub fn new(id1: NodeId, id2: NodeId) -> Self {
        Self { id1, id2 }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.id1 == id || self.id2 == id
    }

    /// The far end of the link as seen from `id`.
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.id1 == id {
            Some(self.id2)
        } else if self.id2 == id {
            Some(self.id1)
        } else {
            None
        }
    }

    pub fn same_pair(&self, other: &Link) -> bool {
        (self.id1 == other.id1 && self.id2 == other.id2)
            || (self.id1 == other.id2 && self.id2 == other.id1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    links: Vec<Link>,
    index: HashMap<NodeId, NodeIx>,
    /// Global node order maintained by the sorter.
    order: Vec<NodeIx>,
    pub width: f64,
    pub height: f64,
    pub pos_x: f64,
    pub pos_y: f64,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the index of the existing node with that id.
    pub fn add_node(&mut self, node: Node) -> NodeIx {
        if let Some(ix) = self.index.get(&node.id) {
            return *ix;
        }
        let ix = self.nodes.len();
        self.index.insert(node.id, ix);
        self.nodes.push(node);
        self.order.push(ix);
        ix
    }

    /// Links two nodes by id. Duplicate pairs and self-links are ignored.
    pub fn link(&mut self, id1: NodeId, id2: NodeId) -> bool {
        if id1 == id2 {
            return false;
        }
        let link = Link::new(id1, id2);
        if self.links.iter().any(|existing| existing.same_pair(&link)) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn node(&self, ix: NodeIx) -> &Node {
        &self.nodes[ix]
    }

    pub fn node_mut(&mut self, ix: NodeIx) -> &mut Node {
        &mut self.nodes[ix]
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIx> {
        self.index.get(&id).copied()
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|ix| &self.nodes[ix])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn root(&self) -> Option<NodeIx> {
        self.nodes.iter().position(Node::is_root)
    }

    pub fn set_root(&mut self, ix: NodeIx) {
        self.nodes[ix].level = 0;
    }

    /// Neighbour indices of `ix` in link order, one entry per link.
    pub fn neighbors(&self, ix: NodeIx) -> Vec<NodeIx> {
        let id = self.nodes[ix].id;
        self.links
            .iter()
            .filter_map(|link| link.other(id))
            .filter_map(|other| self.index_of(other))
            .collect()
    }

    pub fn degree(&self, ix: NodeIx) -> usize {
        let id = self.nodes[ix].id;
        self.links.iter().filter(|link| link.touches(id)).count()
    }

    pub fn order(&self) -> &[NodeIx] {
        &self.order
    }

    pub(crate) fn order_mut(&mut self) -> &mut Vec<NodeIx> {
        &mut self.order
    }

    /// Rank of each node in the global order, indexed by `NodeIx`.
    pub fn order_ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0; self.nodes.len()];
        for (rank, ix) in self.order.iter().enumerate() {
            ranks[*ix] = rank;
        }
        ranks
    }

    pub fn max_level(&self) -> Option<i32> {
        self.nodes
            .iter()
            .map(|node| node.level)
            .filter(|level| *level >= 0)
            .max()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tree(&mut self, tree: Tree) -> usize {
        self.trees.push(tree);
        self.trees.len() - 1
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(Tree::len).sum()
    }

    /// Finds the tree holding `id` and the node's index within it.
    pub fn locate(&self, id: NodeId) -> Option<(usize, NodeIx)> {
        self.trees
            .iter()
            .enumerate()
            .find_map(|(tree_idx, tree)| tree.index_of(id).map(|ix| (tree_idx, ix)))
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.locate(id)
            .map(|(tree_idx, ix)| self.trees[tree_idx].node(ix))
    }
}
