//! Tidy tree layout for concept maps.
//!
//! Places every concept on two axes: the depth axis grows with tree depth,
//! the sibling axis spreads siblings and their subtrees apart. Subtrees are
//! laid out bottom-up by merging per-level contours (Reingold-Tilford), each
//! parent is centered over its first and last child, and the result is
//! normalised into a band derived from the viewport.

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::ConceptArena;
use crate::domain::error::DomainError;
use crate::domain::scene::Point;

/// Separation between adjacent siblings, in layout units.
const SIBLING_SEPARATION: f64 = 1.0;
/// Separation between adjacent nodes with different parents.
const COUSIN_SEPARATION: f64 = 2.0;

/// Scaling of the layout relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Sibling-axis band as a multiple of the viewport height
    pub band_factor: f64,
    /// Depth-axis extent as a fraction of the viewport width (rest is label margin)
    pub depth_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            band_factor: 1.5,
            depth_factor: 0.8,
        }
    }
}

/// Target drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(DomainError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Computed position of one concept.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Identity of the concept in its [`ConceptArena`]
    pub node: Index,
    pub depth: usize,
    /// Position along the depth axis (root at 0)
    pub depth_pos: f64,
    /// Position along the sibling axis, within `[0, band]`
    pub sibling_pos: f64,
    /// Slot of the parent in [`LayoutTree::nodes`]
    pub parent: Option<usize>,
    /// Slots of the children, in input order
    pub children: Vec<usize>,
}

impl LayoutNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Drawing position: depth runs left to right, siblings top to bottom.
    pub fn point(&self) -> Point {
        Point::new(self.depth_pos, self.sibling_pos)
    }
}

/// Layout result: one [`LayoutNode`] per concept, stored in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    band: f64,
    depth_extent: f64,
}

impl LayoutTree {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    pub fn get(&self, slot: usize) -> Option<&LayoutNode> {
        self.nodes.get(slot)
    }

    /// Every parent-child pair as `(parent, child)`.
    pub fn links(&self) -> impl Iterator<Item = (&LayoutNode, &LayoutNode)> + '_ {
        self.nodes.iter().filter_map(move |child| {
            child
                .parent
                .and_then(|slot| self.nodes.get(slot))
                .map(|parent| (parent, child))
        })
    }

    /// Extent of the sibling axis.
    pub fn band(&self) -> f64 {
        self.band
    }

    /// Extent of the depth axis.
    pub fn depth_extent(&self) -> f64 {
        self.depth_extent
    }
}

/// Per-level outline of a laid-out subtree, relative to the subtree root.
#[derive(Debug, Clone)]
struct Contour {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Contour {
    fn leaf() -> Self {
        Self {
            left: vec![0.0],
            right: vec![0.0],
        }
    }

    /// Smallest offset at which `next` can sit to the right of `self`
    /// without any level coming closer than the required separation.
    fn offset_for(&self, next: &Contour) -> f64 {
        self.right
            .iter()
            .zip(&next.left)
            .enumerate()
            .map(|(level, (right, left))| right + separation_at(level) - left)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Absorb `next` placed at `offset`.
    fn merge(&mut self, next: &Contour, offset: f64) {
        for level in 0..next.right.len() {
            if level < self.right.len() {
                self.right[level] = offset + next.right[level];
            } else {
                self.left.push(offset + next.left[level]);
                self.right.push(offset + next.right[level]);
            }
        }
    }

    /// Contour of a parent sitting at `center` above this (children) contour.
    fn under_parent(&self, center: f64) -> Contour {
        let shift = |side: &[f64]| -> Vec<f64> {
            std::iter::once(0.0)
                .chain(side.iter().map(|x| x - center))
                .collect()
        };
        Contour {
            left: shift(&self.left),
            right: shift(&self.right),
        }
    }
}

/// Level 0 of a children contour holds the siblings themselves, deeper
/// levels hold nodes from different subtrees.
fn separation_at(level: usize) -> f64 {
    if level == 0 {
        SIBLING_SEPARATION
    } else {
        COUSIN_SEPARATION
    }
}

/// Tidy tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TidyTreeLayout {
    config: LayoutConfig,
}

impl TidyTreeLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `arena` for a viewport.
    ///
    /// Pure: the same tree shape and viewport always produce the same
    /// positions. The deepest level lands at `depth_factor * width`, the
    /// sibling axis spans `band_factor * height`.
    #[instrument(level = "debug", skip(self, arena), fields(nodes = arena.len()))]
    pub fn compute(
        &self,
        arena: &ConceptArena,
        viewport: Viewport,
    ) -> Result<LayoutTree, DomainError> {
        viewport.validate()?;
        arena.root().ok_or(DomainError::EmptyTree)?;

        let offsets = relative_offsets(arena);

        // Top-down: absolute sibling-axis coordinates in layout units
        let mut nodes: Vec<LayoutNode> = Vec::with_capacity(arena.len());
        let mut slots: HashMap<Index, usize> = HashMap::with_capacity(arena.len());
        let mut raw: Vec<f64> = Vec::with_capacity(arena.len());

        for (idx, node) in arena.iter() {
            let parent_slot = node.parent.and_then(|p| slots.get(&p).copied());
            let x = match parent_slot {
                Some(p) => raw[p] + offsets.get(&idx).copied().unwrap_or(0.0),
                None => 0.0,
            };
            let slot = nodes.len();
            if let Some(p) = parent_slot {
                nodes[p].children.push(slot);
            }
            nodes.push(LayoutNode {
                node: idx,
                depth: node.data.depth,
                depth_pos: 0.0,
                sibling_pos: 0.0,
                parent: parent_slot,
                children: Vec::new(),
            });
            slots.insert(idx, slot);
            raw.push(x);
        }

        // Extremes in pre-order; ties keep the first node seen
        let (mut left, mut right, mut bottom) = (0usize, 0usize, 0usize);
        for slot in 1..nodes.len() {
            if raw[slot] < raw[left] {
                left = slot;
            }
            if raw[slot] > raw[right] {
                right = slot;
            }
            if nodes[slot].depth > nodes[bottom].depth {
                bottom = slot;
            }
        }

        let padding = if left == right {
            1.0
        } else if nodes[left].parent == nodes[right].parent {
            SIBLING_SEPARATION / 2.0
        } else {
            COUSIN_SEPARATION / 2.0
        };
        let band = self.config.band_factor * viewport.height;
        let depth_extent = self.config.depth_factor * viewport.width;
        let tx = padding - raw[left];
        let kx = band / (raw[right] + padding + tx);
        let ky = depth_extent / nodes[bottom].depth.max(1) as f64;

        for (node, x) in nodes.iter_mut().zip(&raw) {
            node.sibling_pos = (x + tx) * kx;
            node.depth_pos = node.depth as f64 * ky;
        }

        debug!(
            "layout: {} nodes, {} levels, band={:.1}, depth_extent={:.1}",
            nodes.len(),
            nodes[bottom].depth + 1,
            band,
            depth_extent
        );
        Ok(LayoutTree {
            nodes,
            band,
            depth_extent,
        })
    }
}

/// Bottom-up pass: offset of every non-root node relative to its parent.
fn relative_offsets(arena: &ConceptArena) -> HashMap<Index, f64> {
    let mut contours: HashMap<Index, Contour> = HashMap::with_capacity(arena.len());
    let mut offsets: HashMap<Index, f64> = HashMap::with_capacity(arena.len());

    for (idx, node) in arena.iter_postorder() {
        let mut placed: Vec<f64> = Vec::with_capacity(node.children.len());
        let mut merged: Option<Contour> = None;

        for child in &node.children {
            let contour = contours.remove(child).unwrap_or_else(Contour::leaf);
            match merged.as_mut() {
                None => {
                    placed.push(0.0);
                    merged = Some(contour);
                }
                Some(acc) => {
                    let offset = acc.offset_for(&contour);
                    acc.merge(&contour, offset);
                    placed.push(offset);
                }
            }
        }

        let contour = match (merged, placed.first(), placed.last()) {
            (Some(children), Some(first), Some(last)) => {
                let center = (first + last) / 2.0;
                for (child, offset) in node.children.iter().zip(&placed) {
                    offsets.insert(*child, offset - center);
                }
                children.under_parent(center)
            }
            _ => Contour::leaf(),
        };
        contours.insert(idx, contour);
    }
    offsets
}
