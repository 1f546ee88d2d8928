use crate::error::{WadError, WadResult};
use crate::types::{BBox, WadNode, WadVertex};

/// Bit 15 of a child reference marks it as a subsector rather than a node
pub const IS_SSECTOR_MASK: u16 = 0x8000;

/// Deepest root to leaf path accepted. Real maps stay well under 100.
pub const MAX_TREE_DEPTH: usize = 1024;

/// The BSP tree built from the NODES lump. The raw flagged child references
/// are resolved here, once, and never carried further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BspNode {
    /// A splitting line with a child on each side
    Internal(Partition),
    /// A subsector, index in to the SSECTORS array
    Leaf { subsector: u16 },
}

/// The internal node data. Each node exclusively owns both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Where the line used for splitting the map starts
    pub split_start: WadVertex,
    /// Direction of the splitting line, start + delta is its end
    pub split_delta: WadVertex,
    /// Box enclosing everything under `right`
    pub right_box:   BBox,
    /// Box enclosing everything under `left`
    pub left_box:    BBox,
    pub right:       Box<BspNode>,
    pub left:        Box<BspNode>,
}

impl BspNode {
    pub const fn is_leaf(&self) -> bool {
        matches!(self, BspNode::Leaf { .. })
    }

    pub fn internal_count(&self) -> usize {
        match self {
            BspNode::Internal(p) => 1 + p.right.internal_count() + p.left.internal_count(),
            BspNode::Leaf { .. } => 0,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BspNode::Internal(p) => p.right.leaf_count() + p.left.leaf_count(),
            BspNode::Leaf { .. } => 1,
        }
    }

    /// Number of nodes on the longest root to leaf path, a lone leaf is 1
    pub fn depth(&self) -> usize {
        match self {
            BspNode::Internal(p) => 1 + p.right.depth().max(p.left.depth()),
            BspNode::Leaf { .. } => 1,
        }
    }

    /// Every subsector referenced by a leaf, right subtree before left
    pub fn subsectors(&self) -> Vec<u16> {
        fn collect(node: &BspNode, out: &mut Vec<u16>) {
            match node {
                BspNode::Internal(p) => {
                    collect(&p.right, out);
                    collect(&p.left, out);
                }
                BspNode::Leaf { subsector } => out.push(*subsector),
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }
}

/// Build the tree from the node records in file order. The last record is the
/// root. An empty lump is a map with a single subsector, which becomes a lone
/// leaf.
pub fn build_tree(raw: &[WadNode]) -> WadResult<BspNode> {
    if raw.is_empty() {
        return Ok(BspNode::Leaf { subsector: 0 });
    }
    make_internal(raw.len() - 1, raw, 0)
}

fn make_node(child_ref: u16, raw: &[WadNode], depth: usize) -> WadResult<BspNode> {
    if child_ref & IS_SSECTOR_MASK != 0 {
        return Ok(BspNode::Leaf {
            subsector: child_ref & !IS_SSECTOR_MASK,
        });
    }
    make_internal(child_ref as usize, raw, depth)
}

fn make_internal(index: usize, raw: &[WadNode], depth: usize) -> WadResult<BspNode> {
    // A path longer than the record count must revisit a record
    if depth >= raw.len() || depth >= MAX_TREE_DEPTH {
        return Err(WadError::MalformedTree {
            index,
            len: raw.len(),
        });
    }
    let record = raw.get(index).ok_or(WadError::MalformedTree {
        index,
        len: raw.len(),
    })?;

    let left = make_node(record.left_child, raw, depth + 1)?;
    let right = make_node(record.right_child, raw, depth + 1)?;
    Ok(BspNode::Internal(Partition {
        split_start: WadVertex::new(record.x, record.y),
        split_delta: WadVertex::new(record.dx, record.dy),
        right_box:   record.right_box,
        left_box:    record.left_box,
        right:       Box::new(right),
        left:        Box::new(left),
    }))
}
