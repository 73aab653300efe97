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
    bsp::{BspData, BspNodeChild, Contents, HeadNode, Tree},
    math::{Angles, BoxSide},
};

use cgmath::Vector3;

/// The leaves touched by a box.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafList {
    leafs: Vec<usize>,
    top_node: Option<usize>,
}

impl LeafList {
    /// Returns the touched leaves in traversal order.
    pub fn leafs(&self) -> &[usize] {
        &self.leafs
    }

    /// Returns the first node whose plane split the box, if any.
    pub fn top_node(&self) -> Option<usize> {
        self.top_node
    }

    pub fn len(&self) -> usize {
        self.leafs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leafs.is_empty()
    }
}

struct LeafCollector {
    mins: Vector3<f32>,
    maxs: Vector3<f32>,
    max_count: usize,
    list: LeafList,
}

impl<'a> Tree<'a> {
    pub fn point_leaf(&self, point: Vector3<f32>) -> usize {
        let mut child = self.root;
        loop {
            match child {
                BspNodeChild::Leaf(leaf_id) => return leaf_id,
                BspNodeChild::Node(node_id) => {
                    let node = self.node(node_id);
                    let plane = self.plane(node.plane_id);
                    child = node.children[plane.point_side(point) as usize];
                }
            }
        }
    }

    fn box_leafs_r(&self, mut child: BspNodeChild, collector: &mut LeafCollector) {
        loop {
            let node_id = match child {
                BspNodeChild::Leaf(leaf_id) => {
                    if collector.list.leafs.len() < collector.max_count {
                        collector.list.leafs.push(leaf_id);
                    }
                    return;
                }
                BspNodeChild::Node(n) => n,
            };

            let node = self.node(node_id);
            let plane = self.plane(node.plane_id);
            child = match plane.box_side(collector.mins, collector.maxs) {
                BoxSide::Front => node.children[0],
                BoxSide::Back => node.children[1],
                BoxSide::Both => {
                    if collector.list.top_node.is_none() {
                        collector.list.top_node = Some(node_id);
                    }
                    self.box_leafs_r(node.children[0], collector);
                    node.children[1]
                }
            };
        }
    }

    pub fn box_leafs(&self, mins: Vector3<f32>, maxs: Vector3<f32>, max_count: usize) -> LeafList {
        let mut collector = LeafCollector {
            mins,
            maxs,
            max_count,
            list: LeafList {
                leafs: Vec::new(),
                top_node: None,
            },
        };

        self.box_leafs_r(self.root, &mut collector);
        collector.list
    }
}

impl BspData {
    /// Returns the leaf containing `point` in the tree below `head`.
    ///
    /// Points exactly on a splitting plane belong to its front side.
    pub fn point_leaf(&self, point: Vector3<f32>, head: &HeadNode) -> usize {
        self.tree(head).point_leaf(point)
    }

    /// Collects up to `max_count` leaves touched by the box spanned by `mins` and `maxs`.
    pub fn box_leafs(
        &self,
        mins: Vector3<f32>,
        maxs: Vector3<f32>,
        head: &HeadNode,
        max_count: usize,
    ) -> LeafList {
        self.tree(head).box_leafs(mins, maxs, max_count)
    }

    /// Returns the contents of the leaf containing `point`.
    pub fn point_contents(&self, point: Vector3<f32>, head: &HeadNode) -> Contents {
        self.stats.count_point_contents();
        let tree = self.tree(head);
        tree.leaf(tree.point_leaf(point)).contents
    }

    /// Returns the contents at `point` for a model placed at `origin` with orientation `angles`.
    ///
    /// Box hulls are never rotated.
    pub fn transformed_point_contents(
        &self,
        point: Vector3<f32>,
        head: &HeadNode,
        origin: Vector3<f32>,
        angles: Angles,
    ) -> Contents {
        let mut local = point - origin;
        if !head.is_box() && !angles.is_zero() {
            local = angles.rotate(local);
        }

        self.point_contents(local, head)
    }
}
