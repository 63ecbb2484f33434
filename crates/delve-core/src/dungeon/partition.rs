//! Binary space partitioning for room placement
//!
//! The grid rectangle is split breadth-first into disjoint regions. Each
//! leaf hosts at most one room, placed strictly inside the leaf with a
//! wall margin, so rooms (and their borders) can never overlap.
//!
//! The tree lives in an arena and is dropped once rooms are placed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rect::Rect;
use super::room::Room;
use crate::config::GenerationParams;
use crate::consts::{ROOM_MARGIN, SPLIT_RATIO_MAX, SPLIT_RATIO_MIN};
use crate::rng::GameRng;

/// Direction of a split line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Cut along a column, producing left and right halves
    Vertical,
    /// Cut along a row, producing top and bottom halves
    Horizontal,
}

impl Axis {
    pub const fn flip(self) -> Axis {
        match self {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }
}

/// A region of the partition tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionNode {
    /// Region covered by this node
    pub rect: Rect,
    /// Distance from the root
    pub depth: usize,
    /// Axis of the split that produced this node (None for the root)
    pub axis: Option<Axis>,
    /// Arena indices of the two halves, if split
    pub children: Option<(usize, usize)>,
}

impl PartitionNode {
    fn new(rect: Rect, depth: usize, axis: Option<Axis>) -> Self {
        Self {
            rect,
            depth,
            axis,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena of partition nodes; index 0 is the root
#[derive(Debug, Clone)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Split `root` according to the room bounds in `params`
    pub fn build(root: Rect, params: &GenerationParams, rng: &mut GameRng) -> Self {
        let min_leaf = params.min_leaf();
        let min_split_area = 2 * min_leaf.0 * min_leaf.1;
        let depth_limit = params.depth_limit();

        let mut nodes = vec![PartitionNode::new(root, 0, None)];
        let mut leaves = 1;
        let mut queue = VecDeque::from([0usize]);

        while let Some(idx) = queue.pop_front() {
            if leaves >= params.max_rooms {
                break;
            }
            let node = nodes[idx].clone();
            if node.depth >= depth_limit || node.rect.area() < min_split_area {
                continue;
            }

            let preferred = match node.axis {
                Some(axis) => axis.flip(),
                None if node.rect.width >= node.rect.height => Axis::Vertical,
                None => Axis::Horizontal,
            };

            let split = split_rect(&node.rect, preferred, min_leaf, rng)
                .map(|halves| (preferred, halves))
                .or_else(|| {
                    split_rect(&node.rect, preferred.flip(), min_leaf, rng)
                        .map(|halves| (preferred.flip(), halves))
                });

            let Some((axis, (a, b))) = split else {
                trace!(rect = ?node.rect, "region too small to split");
                continue;
            };

            let first = nodes.len();
            nodes.push(PartitionNode::new(a, node.depth + 1, Some(axis)));
            nodes.push(PartitionNode::new(b, node.depth + 1, Some(axis)));
            nodes[idx].children = Some((first, first + 1));
            leaves += 1;
            queue.push_back(first);
            queue.push_back(first + 1);
        }

        debug!(nodes = nodes.len(), leaves, "partitioned grid");
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    /// Leaf regions in depth-first, first-half-first order
    ///
    /// Neighbouring leaves in this order come from the same parent or a
    /// nearby branch, so the order already follows spatial proximity.
    pub fn leaves(&self) -> Vec<Rect> {
        let mut leaves = Vec::new();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            match node.children {
                Some((a, b)) => {
                    stack.push(b);
                    stack.push(a);
                }
                None => leaves.push(node.rect),
            }
        }
        leaves
    }

    /// Place at most one room per leaf, in traversal order
    pub fn place_rooms(&self, params: &GenerationParams, rng: &mut GameRng) -> Vec<Room> {
        let rooms: Vec<Room> = self
            .leaves()
            .iter()
            .filter_map(|leaf| place_room(leaf, params, rng))
            .take(params.max_rooms)
            .collect();
        debug!(rooms = rooms.len(), "placed rooms");
        rooms
    }
}

/// Split a rectangle in two along `axis`
///
/// The cut lands inside the split ratio band when possible; both halves
/// always keep at least `min_leaf` cells along the cut axis.
fn split_rect(
    rect: &Rect,
    axis: Axis,
    min_leaf: (usize, usize),
    rng: &mut GameRng,
) -> Option<(Rect, Rect)> {
    let (extent, min) = match axis {
        Axis::Vertical => (rect.width, min_leaf.0),
        Axis::Horizontal => (rect.height, min_leaf.1),
    };
    if extent < 2 * min {
        return None;
    }

    let ratio_lo = (extent as f64 * SPLIT_RATIO_MIN).ceil() as usize;
    let ratio_hi = (extent as f64 * SPLIT_RATIO_MAX).floor() as usize;
    let mut lo = ratio_lo.max(min);
    let mut hi = ratio_hi.min(extent - min);
    if lo > hi {
        lo = min;
        hi = extent - min;
    }
    let cut = rng.range(lo, hi);

    Some(match axis {
        Axis::Vertical => (
            Rect::new(rect.x, rect.y, cut, rect.height),
            Rect::new(rect.x + cut, rect.y, rect.width - cut, rect.height),
        ),
        Axis::Horizontal => (
            Rect::new(rect.x, rect.y, rect.width, cut),
            Rect::new(rect.x, rect.y + cut, rect.width, rect.height - cut),
        ),
    })
}

/// Place a random room strictly inside a leaf, or None if it cannot fit
fn place_room(leaf: &Rect, params: &GenerationParams, rng: &mut GameRng) -> Option<Room> {
    let avail_w = leaf.width.checked_sub(2 * ROOM_MARGIN)?;
    let avail_h = leaf.height.checked_sub(2 * ROOM_MARGIN)?;
    if avail_w < params.min_room_width || avail_h < params.min_room_height {
        trace!(?leaf, "leaf too small for a room");
        return None;
    }

    let width = rng.range(params.min_room_width, params.max_room_width.min(avail_w));
    let height = rng.range(params.min_room_height, params.max_room_height.min(avail_h));
    let x = leaf.x + ROOM_MARGIN + rng.range(0, avail_w - width);
    let y = leaf.y + ROOM_MARGIN + rng.range(0, avail_h - height);

    Some(Room::new(x, y, width, height))
}
