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


use crate::{
    bsp::{
        load::{
            Lumps, MAX_MAP_BRUSHES, MAX_MAP_BRUSHSIDES, MAX_MAP_LEAFBRUSHES, MAX_MAP_LEAFS,
            MAX_MAP_NODES, MAX_MAP_PLANES,
        },
        BspBrush, BspBrushSide, BspData, BspError, BspErrorKind, BspLeaf,
        BspNode, BspNodeChild, Contents,
    },
    math::{Axis, Plane},
};

use cgmath::Vector3;

pub const BOX_PLANE_COUNT: usize = 12;
const BOX_SIDE_COUNT: usize = 6;

/// Where the box hull was placed in the level's arrays.
///
/// Every field is also the number of level records of that kind, since the hull is appended last.
#[derive(Clone, Debug, Default)]
pub(crate) struct BoxLayout {
    pub head_node: usize,
    pub first_plane: usize,
    pub first_side: usize,
    pub brush: usize,
    pub leaf: usize,
    pub leaf_brush: usize,
}

/// A box hull with concrete bounds, usable as a query head node.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxHull {
    head_node: usize,
    mins: Vector3<f32>,
    maxs: Vector3<f32>,
    planes: [Plane; BOX_PLANE_COUNT],
}

impl BoxHull {
    pub(crate) fn head_node(&self) -> usize {
        self.head_node
    }

    pub fn mins(&self) -> Vector3<f32> {
        self.mins
    }

    pub fn maxs(&self) -> Vector3<f32> {
        self.maxs
    }

    pub(crate) fn planes(&self) -> &[Plane; BOX_PLANE_COUNT] {
        &self.planes
    }
}

// each side gets an outward and an inward facing plane
fn template_planes() -> [Plane; BOX_PLANE_COUNT] {
    let mut planes = [Plane::zero(); BOX_PLANE_COUNT];
    for side in 0..BOX_SIDE_COUNT {
        let plane = Plane::axial(Axis::from_index(side >> 1), 0.0);
        planes[side * 2] = plane;
        planes[side * 2 + 1] = -plane;
    }
    planes
}

/// Fails if appending the box hull would exceed the level limits.
pub(crate) fn check_box_hull_room(lumps: &Lumps) -> Result<(), BspError> {
    check!(
        lumps.nodes.len() + BOX_SIDE_COUNT <= MAX_MAP_NODES
            && lumps.planes.len() + BOX_PLANE_COUNT <= MAX_MAP_PLANES
            && lumps.brush_sides.len() + BOX_SIDE_COUNT <= MAX_MAP_BRUSHSIDES
            && lumps.brushes.len() < MAX_MAP_BRUSHES
            && lumps.leaves.len() < MAX_MAP_LEAFS
            && lumps.leaf_brushes.len() < MAX_MAP_LEAFBRUSHES,
        BspErrorKind::NoBoxHullRoom
    );

    Ok(())
}

/// Appends the box hull's nodes, planes, brush sides, brush and leaf to the level data.
///
/// The hull's outside children all point at `empty_leaf`.
pub(crate) fn append_box_hull(lumps: &mut Lumps, empty_leaf: usize) -> BoxLayout {
    let layout = BoxLayout {
        head_node: lumps.nodes.len(),
        first_plane: lumps.planes.len(),
        first_side: lumps.brush_sides.len(),
        brush: lumps.brushes.len(),
        leaf: lumps.leaves.len(),
        leaf_brush: lumps.leaf_brushes.len(),
    };

    lumps.brushes.push(BspBrush {
        contents: Contents::MONSTER,
        side_id: layout.first_side,
        side_count: BOX_SIDE_COUNT,
    });

    lumps.leaves.push(BspLeaf {
        contents: Contents::MONSTER,
        cluster: None,
        area: 0,
        leaf_brush_id: layout.leaf_brush,
        leaf_brush_count: 1,
    });

    lumps.leaf_brushes.push(layout.brush);

    lumps.planes.extend_from_slice(&template_planes());

    for i in 0..BOX_SIDE_COUNT {
        let side = i & 1;

        lumps.brush_sides.push(BspBrushSide {
            plane_id: layout.first_plane + i * 2 + side,
            surface_id: None,
        });

        let inside = if i == BOX_SIDE_COUNT - 1 {
            BspNodeChild::Leaf(layout.leaf)
        } else {
            BspNodeChild::Node(layout.head_node + i + 1)
        };

        let mut children = [inside; 2];
        children[side] = BspNodeChild::Leaf(empty_leaf);

        lumps.nodes.push(BspNode {
            plane_id: layout.first_plane + i * 2,
            children,
        });
    }

    layout
}

impl BspData {
    /// Returns a box hull with the given bounds.
    ///
    /// The hull can be passed as a head node to any query. Its single brush has contents
    /// `MONSTER`.
    pub fn headnode_for_box(&self, mins: Vector3<f32>, maxs: Vector3<f32>) -> BoxHull {
        let mut planes = template_planes();

        for a in 0..3 {
            planes[a * 4].set_dist(maxs[a]);
            planes[a * 4 + 1].set_dist(-maxs[a]);
            planes[a * 4 + 2].set_dist(mins[a]);
            planes[a * 4 + 3].set_dist(-mins[a]);
        }

        BoxHull {
            head_node: self.box_layout.head_node,
            mins,
            maxs,
            planes,
        }
    }
}
