// Copyright © 2018 Cormac O'Brien
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software
// and associated documentation files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or
// substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! Quake 2 BSP collision model.
//!
//! # Data Structure
//!
//! Collision queries walk the same binary space partitioning tree used for rendering. Each node
//! holds a splitting plane and two children, one for each side of the plane. Children are either
//! further nodes or leaves. Every leaf records the combined contents of the space it covers, the
//! vis cluster and area it belongs to, and a list of the convex brushes that intersect it.
//!
//! Brushes are the actual collision geometry: each is the intersection of the half-spaces behind
//! its side planes. Traces walk the tree to find the leaves a moving box passes through and then
//! clip the box against the brushes in those leaves.
//!
//! # File Format
//!
//! The file begins with the 4-byte identifier `IBSP` and an `i32` version number (38, or 69 for
//! the extended Q2W format). This is followed by 19 lumps, each consisting of a 32-bit offset into
//! the file and a 32-bit size in bytes. All values are little-endian.
//!
//! Only the lumps relevant to collision and visibility are decoded: entities, planes,
//! visibility, nodes, texinfo, leaves, leaf brushes, models, brushes, brush sides, areas and area
//! portals.
//!
//! ## Visibility
//!
//! The visibility lump begins with an `i32` cluster count followed by a pair of `i32` offsets per
//! cluster, one for the potentially visible set and one for the potentially hearable set. Each
//! offset points to a run-length encoded bit string with one bit per cluster: a nonzero byte is
//! copied as-is, while a zero byte is followed by a count of zero bytes to emit.
//!
//! ## Nodes
//!
//! Nodes are stored with a 32-bit integer plane ID followed by two 32-bit integer child IDs. A
//! negative child ID `c` refers to leaf `-1 - c`; otherwise it refers to another node.
//!
//! # Box hull
//!
//! Six extra nodes, twelve planes, six brush sides, one brush and one leaf are appended after the
//! level data when it is loaded. Together they describe an axis-aligned box whose plane distances
//! are supplied per query, which lets entities with only a bounding box be traced through the
//! same code as level geometry. See [`BspData::headnode_for_box`].

// returns early with the given error kind unless the condition holds
macro_rules! check {
    ($cond:expr, $kind:expr) => {
        if !$cond {
            return Err(crate::bsp::BspError::from($kind));
        }
    };
}

mod area;
mod classify;
mod error;
mod hull;
mod load;
#[cfg(test)]
mod testdata;
mod trace;
mod vis;

use std::{
    borrow::Cow,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{config::Config, math::Plane, parse};

use cgmath::Vector3;

pub use self::{
    classify::LeafList,
    error::{BspError, BspErrorKind},
    hull::{BoxHull, BOX_PLANE_COUNT},
    load::{load, load_file, BspLumpId},
    trace::Trace,
    vis::decompress_vis,
};

use self::{area::AreaState, hull::BoxLayout, vis::BspVisibility};

bitflags! {
    pub struct Contents: i32 {
        const SOLID = 0x1;
        const WINDOW = 0x2;
        const AUX = 0x4;
        const LAVA = 0x8;
        const SLIME = 0x10;
        const WATER = 0x20;
        const MIST = 0x40;
        const AREAPORTAL = 0x8000;
        const PLAYERCLIP = 0x10000;
        const MONSTERCLIP = 0x20000;
        const CURRENT_0 = 0x40000;
        const CURRENT_90 = 0x80000;
        const CURRENT_180 = 0x100000;
        const CURRENT_270 = 0x200000;
        const CURRENT_UP = 0x400000;
        const CURRENT_DOWN = 0x800000;
        const ORIGIN = 0x1000000;
        const MONSTER = 0x2000000;
        const DEADMONSTER = 0x4000000;
        const DETAIL = 0x8000000;
        const TRANSLUCENT = 0x10000000;
        const LADDER = 0x20000000;

        const MASK_SOLID = Self::SOLID.bits | Self::WINDOW.bits;
        const MASK_PLAYERSOLID = Self::SOLID.bits
            | Self::PLAYERCLIP.bits
            | Self::WINDOW.bits
            | Self::MONSTER.bits;
        const MASK_MONSTERSOLID = Self::SOLID.bits
            | Self::MONSTERCLIP.bits
            | Self::WINDOW.bits
            | Self::MONSTER.bits;
        const MASK_WATER = Self::WATER.bits | Self::LAVA.bits | Self::SLIME.bits;
        const MASK_SHOT = Self::SOLID.bits
            | Self::MONSTER.bits
            | Self::WINDOW.bits
            | Self::DEADMONSTER.bits;
    }
}

/// A reference to a child of a BSP node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BspNodeChild {
    Node(usize),
    Leaf(usize),
}

impl BspNodeChild {
    /// Decodes a child ID as stored on disk.
    pub fn from_raw(raw: i32) -> BspNodeChild {
        if raw < 0 {
            BspNodeChild::Leaf((-1 - raw) as usize)
        } else {
            BspNodeChild::Node(raw as usize)
        }
    }
}

#[derive(Clone, Debug)]
pub struct BspNode {
    pub plane_id: usize,
    pub children: [BspNodeChild; 2],
}

#[derive(Clone, Debug)]
pub struct BspLeaf {
    pub contents: Contents,
    pub cluster: Option<usize>,
    pub area: usize,
    pub leaf_brush_id: usize,
    pub leaf_brush_count: usize,
}

#[derive(Clone, Debug)]
pub struct BspBrush {
    pub contents: Contents,
    pub side_id: usize,
    pub side_count: usize,
}

#[derive(Clone, Debug)]
pub struct BspBrushSide {
    pub plane_id: usize,
    pub surface_id: Option<usize>,
}

/// Surface properties of a brush side, taken from the level's texinfo.
#[derive(Clone, Debug, PartialEq)]
pub struct BspSurface {
    pub name: String,
    pub flags: i32,
    pub value: i32,
}

#[derive(Clone, Debug)]
pub struct BspArea {
    pub portal_id: usize,
    pub portal_count: usize,
}

#[derive(Clone, Debug)]
pub struct BspAreaPortal {
    pub portal_num: usize,
    pub other_area: usize,
}

/// A world or inline (brush entity) model.
#[derive(Clone, Debug)]
pub struct BspModel {
    pub(crate) min: Vector3<f32>,
    pub(crate) max: Vector3<f32>,
    pub(crate) origin: Vector3<f32>,
    pub(crate) head_node: BspNodeChild,
}

impl BspModel {
    /// Returns the minimum extent of this model.
    pub fn min(&self) -> Vector3<f32> {
        self.min
    }

    /// Returns the maximum extent of this model.
    pub fn max(&self) -> Vector3<f32> {
        self.max
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn origin(&self) -> Vector3<f32> {
        self.origin
    }

    pub fn head_node(&self) -> BspNodeChild {
        self.head_node
    }

    /// Returns a head node for queries against this model.
    pub fn head(&self) -> HeadNode {
        HeadNode::Tree(self.head_node)
    }
}

/// The root of a subtree to run a query against.
#[derive(Clone, Debug)]
pub enum HeadNode {
    /// A subtree of the loaded level, usually the head node of a model.
    Tree(BspNodeChild),

    /// The synthesized box hull with per-query bounds.
    Box(BoxHull),
}

impl From<BspNodeChild> for HeadNode {
    fn from(child: BspNodeChild) -> Self {
        HeadNode::Tree(child)
    }
}

impl From<BoxHull> for HeadNode {
    fn from(hull: BoxHull) -> Self {
        HeadNode::Box(hull)
    }
}

impl HeadNode {
    pub fn is_box(&self) -> bool {
        match *self {
            HeadNode::Box(_) => true,
            _ => false,
        }
    }
}

/// Query counters, shared by all callers of a level.
#[derive(Debug, Default)]
pub struct BspStats {
    point_contents: AtomicUsize,
    traces: AtomicUsize,
    brush_traces: AtomicUsize,
}

impl BspStats {
    pub fn point_contents(&self) -> usize {
        self.point_contents.load(Ordering::Relaxed)
    }

    pub fn traces(&self) -> usize {
        self.traces.load(Ordering::Relaxed)
    }

    /// Number of brushes clipped against by traces.
    pub fn brush_traces(&self) -> usize {
        self.brush_traces.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.point_contents.store(0, Ordering::Relaxed);
        self.traces.store(0, Ordering::Relaxed);
        self.brush_traces.store(0, Ordering::Relaxed);
    }

    fn count_point_contents(&self) {
        self.point_contents.fetch_add(1, Ordering::Relaxed);
    }

    fn count_trace(&self) {
        self.traces.fetch_add(1, Ordering::Relaxed);
    }

    fn count_brush_trace(&self) {
        self.brush_traces.fetch_add(1, Ordering::Relaxed);
    }
}

/// A loaded collision model.
#[derive(Debug)]
pub struct BspData {
    pub(crate) planes: Box<[Plane]>,
    pub(crate) nodes: Box<[BspNode]>,
    pub(crate) leaves: Box<[BspLeaf]>,
    pub(crate) leaf_brushes: Box<[usize]>,
    pub(crate) brushes: Box<[BspBrush]>,
    pub(crate) brush_sides: Box<[BspBrushSide]>,
    pub(crate) surfaces: Box<[BspSurface]>,
    pub(crate) models: Box<[BspModel]>,
    pub(crate) areas: Box<[BspArea]>,
    pub(crate) area_portals: Box<[BspAreaPortal]>,
    pub(crate) visibility: Option<BspVisibility>,
    pub(crate) cluster_count: usize,
    pub(crate) entities: Box<[u8]>,
    pub(crate) box_layout: BoxLayout,
    pub(crate) empty_leaf: usize,
    pub(crate) area_state: AreaState,
    pub(crate) config: Config,
    pub(crate) stats: BspStats,
    pub(crate) file_size: usize,
}

/// A read-only view of the tree below a head node.
///
/// Plane lookups in the box hull's range are redirected to the hull's own planes.
#[derive(Clone, Copy)]
pub(crate) struct Tree<'a> {
    pub bsp: &'a BspData,
    pub root: BspNodeChild,
    box_planes: Option<&'a [Plane; BOX_PLANE_COUNT]>,
}

impl<'a> Tree<'a> {
    pub fn plane(&self, plane_id: usize) -> &'a Plane {
        if let Some(planes) = self.box_planes {
            if let Some(i) = plane_id.checked_sub(self.bsp.box_layout.first_plane) {
                if i < BOX_PLANE_COUNT {
                    return &planes[i];
                }
            }
        }

        &self.bsp.planes[plane_id]
    }

    pub fn node(&self, node_id: usize) -> &'a BspNode {
        &self.bsp.nodes[node_id]
    }

    pub fn leaf(&self, leaf_id: usize) -> &'a BspLeaf {
        &self.bsp.leaves[leaf_id]
    }
}

impl BspData {
    pub(crate) fn tree<'a>(&'a self, head: &'a HeadNode) -> Tree<'a> {
        match *head {
            HeadNode::Box(ref hull) => Tree {
                bsp: self,
                root: BspNodeChild::Node(hull.head_node()),
                box_planes: Some(hull.planes()),
            },

            // nothing to walk without a level
            HeadNode::Tree(_) if self.is_empty() => Tree {
                bsp: self,
                root: BspNodeChild::Leaf(0),
                box_planes: None,
            },

            HeadNode::Tree(root) => Tree {
                bsp: self,
                root,
                box_planes: None,
            },
        }
    }

    /// Returns `true` if no level geometry is loaded.
    pub fn is_empty(&self) -> bool {
        self.box_layout.first_plane == 0
    }

    /// Returns the size in bytes of the file this model was loaded from.
    pub fn file_size(&self) -> usize {
        self.file_size
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the runtime options and reflows area connectivity under the new settings.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.flood_area_connections();
    }

    pub fn stats(&self) -> &BspStats {
        &self.stats
    }

    /// Returns the level's planes, excluding the box hull.
    pub fn planes(&self) -> &[Plane] {
        &self.planes[..self.box_layout.first_plane]
    }

    /// Returns the level's nodes, excluding the box hull.
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes[..self.box_layout.head_node]
    }

    /// Returns the level's leaves, excluding the box hull.
    pub fn leaves(&self) -> &[BspLeaf] {
        &self.leaves[..self.box_layout.leaf]
    }

    pub fn leaf_brushes(&self) -> &[usize] {
        &self.leaf_brushes[..self.box_layout.leaf_brush]
    }

    pub fn brushes(&self) -> &[BspBrush] {
        &self.brushes[..self.box_layout.brush]
    }

    pub fn brush_sides(&self) -> &[BspBrushSide] {
        &self.brush_sides[..self.box_layout.first_side]
    }

    pub fn surfaces(&self) -> &[BspSurface] {
        &self.surfaces
    }

    pub fn surface(&self, surface_id: usize) -> Option<&BspSurface> {
        self.surfaces.get(surface_id)
    }

    pub fn models(&self) -> &[BspModel] {
        &self.models
    }

    pub fn model(&self, model_id: usize) -> Option<&BspModel> {
        self.models.get(model_id)
    }

    pub fn world_model(&self) -> &BspModel {
        &self.models[0]
    }

    /// Returns a head node for queries against the whole level.
    pub fn world_head(&self) -> HeadNode {
        self.world_model().head()
    }

    /// Resolves an inline model name of the form `*N`.
    ///
    /// Model 0 is the world and cannot be referenced this way.
    pub fn inline_model<S>(&self, name: S) -> Result<&BspModel, BspError>
    where
        S: AsRef<str>,
    {
        let name = name.as_ref();
        let bad_name = || BspErrorKind::BadModelName {
            name: name.to_owned(),
        };

        if !name.starts_with('*') {
            return Err(bad_name().into());
        }

        let model_id: usize = name[1..].parse().map_err(|_| bad_name())?;
        if model_id < 1 || model_id >= self.models.len() {
            return Err(bad_name().into());
        }

        Ok(&self.models[model_id])
    }

    pub fn leaf_count(&self) -> usize {
        self.box_layout.leaf
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn area_portal_count(&self) -> usize {
        self.area_portals.len()
    }

    fn check_leaf(&self, leaf_id: usize) {
        if leaf_id >= self.leaf_count() {
            panic!("Bad leaf number {} (count {})", leaf_id, self.leaf_count());
        }
    }

    pub fn leaf_contents(&self, leaf_id: usize) -> Contents {
        self.check_leaf(leaf_id);
        self.leaves[leaf_id].contents
    }

    pub fn leaf_cluster(&self, leaf_id: usize) -> Option<usize> {
        self.check_leaf(leaf_id);
        self.leaves[leaf_id].cluster
    }

    pub fn leaf_area(&self, leaf_id: usize) -> usize {
        self.check_leaf(leaf_id);
        self.leaves[leaf_id].area
    }

    /// Returns the entity string, up to its terminating NUL.
    pub fn entity_string(&self) -> Cow<str> {
        let len = self
            .entities
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.entities.len());
        String::from_utf8_lossy(&self.entities[..len])
    }

    /// Looks up `key` on the worldspawn entity.
    pub fn worldspawn_value<S>(&self, key: S) -> Option<String>
    where
        S: AsRef<str>,
    {
        parse::worldspawn_value(&self.entity_string(), key.as_ref())
    }
}
