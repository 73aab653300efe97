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
    math::{Angles, Plane},
};

use cgmath::{InnerSpace, Vector3, Zero};

/// Distance kept between a trace's end point and the surface it hit.
pub const DIST_EPSILON: f32 = 0.03125;

// brushes are cached by the low bits of their index
const BRUSH_CACHE_SIZE: usize = 16;

/// The result of sweeping a box through a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    all_solid: bool,
    start_solid: bool,
    fraction: f32,
    end: Vector3<f32>,
    plane: Option<Plane>,
    surface: Option<usize>,
    contents: Contents,
    leaf: Option<usize>,
}

impl Trace {
    fn unobstructed(end: Vector3<f32>) -> Trace {
        Trace {
            all_solid: false,
            start_solid: false,
            fraction: 1.0,
            end,
            plane: None,
            surface: None,
            contents: Contents::empty(),
            leaf: None,
        }
    }

    /// Returns `true` if the whole trace was inside a brush.
    pub fn all_solid(&self) -> bool {
        self.all_solid
    }

    /// Returns `true` if the trace started inside a brush.
    pub fn start_solid(&self) -> bool {
        self.start_solid
    }

    /// Returns the fraction of the segment travelled before hitting something, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Returns `true` if the trace was stopped before reaching its end point.
    pub fn is_obstructed(&self) -> bool {
        self.fraction < 1.0
    }

    pub fn end_point(&self) -> Vector3<f32> {
        self.end
    }

    /// Returns the plane of the surface that was hit, if any.
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// Returns the ID of the surface that was hit, if the brush side had one.
    pub fn surface(&self) -> Option<usize> {
        self.surface
    }

    /// Returns the contents of the brush that was hit.
    pub fn contents(&self) -> Contents {
        self.contents
    }

    /// Returns the leaf in which the trace hit or started inside a brush.
    pub fn leaf(&self) -> Option<usize> {
        self.leaf
    }
}

struct TraceWork<'a> {
    tree: Tree<'a>,
    start: Vector3<f32>,
    end: Vector3<f32>,
    mins: Vector3<f32>,
    maxs: Vector3<f32>,
    extents: Vector3<f32>,
    mask: Contents,
    is_point: bool,
    trace: Trace,
    brush_cache: [Option<usize>; BRUSH_CACHE_SIZE],
}

impl<'a> TraceWork<'a> {
    /// Records `brush_id` as tested, returning `true` if it already was.
    fn brush_tested(&mut self, brush_id: usize) -> bool {
        let slot = &mut self.brush_cache[brush_id % BRUSH_CACHE_SIZE];
        let tested = *slot == Some(brush_id);
        *slot = Some(brush_id);
        tested
    }

    /// Returns the distance from the origin to `plane` pushed out to touch the box.
    fn box_plane_dist(&self, plane: &Plane) -> f32 {
        let normal = plane.normal();
        let mut corner = Vector3::zero();
        for i in 0..3 {
            corner[i] = if normal[i] < 0.0 {
                self.maxs[i]
            } else {
                self.mins[i]
            };
        }

        plane.dist() - corner.dot(normal)
    }

    fn clip_to_brush(&mut self, brush_id: usize, leaf_id: usize) {
        let bsp = self.tree.bsp;
        let brush = &bsp.brushes[brush_id];
        if brush.side_count == 0 {
            return;
        }

        bsp.stats.count_brush_trace();

        let mut enter_fraction = -1.0;
        let mut leave_fraction = 1.0;
        let mut lead: Option<(&Plane, Option<usize>)> = None;
        let mut start_outside = false;
        let mut end_outside = false;

        for side in bsp.brush_sides[brush.side_id..brush.side_id + brush.side_count].iter() {
            let plane = self.tree.plane(side.plane_id);
            let dist = if self.is_point {
                plane.dist()
            } else {
                self.box_plane_dist(plane)
            };

            let d1 = self.start.dot(plane.normal()) - dist;
            let d2 = self.end.dot(plane.normal()) - dist;

            if d2 > 0.0 {
                end_outside = true;
            }
            if d1 > 0.0 {
                start_outside = true;
            }

            // entirely in front of this side
            if d1 > 0.0 && d2 >= d1 {
                return;
            }

            // entirely behind this side
            if d1 <= 0.0 && d2 <= 0.0 {
                continue;
            }

            if d1 > d2 {
                let f = (d1 - DIST_EPSILON) / (d1 - d2);
                if f > enter_fraction {
                    enter_fraction = f;
                    lead = Some((plane, side.surface_id));
                }
            } else {
                let f = (d1 + DIST_EPSILON) / (d1 - d2);
                if f < leave_fraction {
                    leave_fraction = f;
                }
            }
        }

        if !start_outside {
            self.trace.start_solid = true;
            if !end_outside {
                self.trace.all_solid = true;
            }
            self.trace.leaf = Some(leaf_id);
        }

        if enter_fraction < leave_fraction && enter_fraction > -1.0 {
            if let Some((plane, surface)) = lead {
                if enter_fraction < self.trace.fraction {
                    self.trace.fraction = enter_fraction.max(0.0);
                    self.trace.plane = Some(*plane);
                    self.trace.surface = surface;
                    self.trace.contents = brush.contents;
                    self.trace.leaf = Some(leaf_id);
                }
            }
        }
    }

    fn test_in_brush(&mut self, brush_id: usize, leaf_id: usize) {
        let bsp = self.tree.bsp;
        let brush = &bsp.brushes[brush_id];
        if brush.side_count == 0 {
            return;
        }

        for side in bsp.brush_sides[brush.side_id..brush.side_id + brush.side_count].iter() {
            let plane = self.tree.plane(side.plane_id);
            let dist = self.box_plane_dist(plane);

            // in front of any side means outside the brush
            if self.start.dot(plane.normal()) - dist > 0.0 {
                return;
            }
        }

        self.trace.start_solid = true;
        self.trace.all_solid = true;
        self.trace.fraction = 0.0;
        self.trace.contents = brush.contents;
        self.trace.leaf = Some(leaf_id);
    }

    fn leaf_brushes(&self, leaf_id: usize) -> Option<&'a [usize]> {
        let bsp = self.tree.bsp;
        let leaf = self.tree.leaf(leaf_id);
        if (leaf.contents & self.mask).is_empty() {
            return None;
        }

        let first = leaf.leaf_brush_id;
        Some(&bsp.leaf_brushes[first..first + leaf.leaf_brush_count])
    }

    fn wants_brush(&mut self, brush_id: usize) -> bool {
        // a brush reachable from several leaves only needs clipping once
        if self.brush_tested(brush_id) {
            return false;
        }

        self.tree.bsp.brushes[brush_id].contents.intersects(self.mask)
    }

    fn trace_to_leaf(&mut self, leaf_id: usize) {
        let brush_ids = match self.leaf_brushes(leaf_id) {
            Some(b) => b,
            None => return,
        };

        for &brush_id in brush_ids.iter() {
            if !self.wants_brush(brush_id) {
                continue;
            }

            self.clip_to_brush(brush_id, leaf_id);
            if self.trace.all_solid {
                return;
            }
        }
    }

    fn test_in_leaf(&mut self, leaf_id: usize) {
        let brush_ids = match self.leaf_brushes(leaf_id) {
            Some(b) => b,
            None => return,
        };

        for &brush_id in brush_ids.iter() {
            if !self.wants_brush(brush_id) {
                continue;
            }

            self.test_in_brush(brush_id, leaf_id);
            if self.trace.all_solid {
                return;
            }
        }
    }

    /// Walks the part of the segment between fractions `p1f` and `p2f` through the tree.
    fn hull_check(
        &mut self,
        child: BspNodeChild,
        p1f: f32,
        p2f: f32,
        p1: Vector3<f32>,
        p2: Vector3<f32>,
    ) {
        // already hit something nearer
        if self.trace.fraction <= p1f {
            return;
        }

        let node_id = match child {
            BspNodeChild::Leaf(leaf_id) => {
                self.trace_to_leaf(leaf_id);
                return;
            }
            BspNodeChild::Node(n) => n,
        };

        let node = self.tree.node(node_id);
        let plane = self.tree.plane(node.plane_id);

        let t1 = plane.point_dist(p1);
        let t2 = plane.point_dist(p2);
        let offset = match plane.kind().axis() {
            Some(a) => self.extents[a],
            None if self.is_point => 0.0,
            None => {
                let normal = plane.normal();
                (self.extents.x * normal.x).abs()
                    + (self.extents.y * normal.y).abs()
                    + (self.extents.z * normal.z).abs()
            }
        };

        if t1 >= offset && t2 >= offset {
            return self.hull_check(node.children[0], p1f, p2f, p1, p2);
        }

        if t1 <= -offset && t2 <= -offset {
            return self.hull_check(node.children[1], p1f, p2f, p1, p2);
        }

        // put the crossing point DIST_EPSILON units on the near side
        let (side, frac, frac2) = if t1 < t2 {
            let idist = 1.0 / (t1 - t2);
            (
                1,
                (t1 - offset + DIST_EPSILON) * idist,
                (t1 + offset + DIST_EPSILON) * idist,
            )
        } else if t1 > t2 {
            let idist = 1.0 / (t1 - t2);
            (
                0,
                (t1 + offset + DIST_EPSILON) * idist,
                (t1 - offset - DIST_EPSILON) * idist,
            )
        } else {
            (0, 1.0, 0.0)
        };

        // move up to the node
        let frac = frac.max(0.0).min(1.0);
        let midf = p1f + (p2f - p1f) * frac;
        let mid = p1 + (p2 - p1) * frac;
        self.hull_check(node.children[side], p1f, midf, p1, mid);

        // go past the node
        let frac2 = frac2.max(0.0).min(1.0);
        let midf = p1f + (p2f - p1f) * frac2;
        let mid = p1 + (p2 - p1) * frac2;
        self.hull_check(node.children[side ^ 1], midf, p2f, mid, p2);
    }
}

impl BspData {
    /// Sweeps the box spanned by `mins` and `maxs` from `start` to `end` through the tree below
    /// `head`, stopping at the first brush whose contents intersect `mask`.
    ///
    /// If `start` equals `end` only a position test is performed. A box with zero extents is
    /// traced as a point.
    pub fn box_trace(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        mins: Vector3<f32>,
        maxs: Vector3<f32>,
        head: &HeadNode,
        mask: Contents,
    ) -> Trace {
        self.stats.count_trace();

        let tree = self.tree(head);
        let mut work = TraceWork {
            tree,
            start,
            end,
            mins,
            maxs,
            extents: Vector3::zero(),
            mask,
            is_point: false,
            trace: Trace::unobstructed(end),
            brush_cache: [None; BRUSH_CACHE_SIZE],
        };

        // position test
        if start == end {
            let spread = Vector3::new(1.0, 1.0, 1.0);
            let list = tree.box_leafs(
                start + mins - spread,
                start + maxs + spread,
                self.config.max_touched_leafs,
            );

            for &leaf_id in list.leafs().iter() {
                work.test_in_leaf(leaf_id);
                if work.trace.all_solid {
                    break;
                }
            }

            work.trace.end = start;
            return work.trace;
        }

        if mins == Vector3::zero() && maxs == Vector3::zero() {
            work.is_point = true;
        } else {
            for i in 0..3 {
                work.extents[i] = (-mins[i]).max(maxs[i]);
            }
        }

        work.hull_check(tree.root, 0.0, 1.0, start, end);

        if work.trace.fraction < 1.0 {
            work.trace.end = start + (end - start) * work.trace.fraction;
        }

        debug!(
            "trace {:?} -> {:?}: fraction {} start_solid {} all_solid {}",
            start, end, work.trace.fraction, work.trace.start_solid, work.trace.all_solid
        );

        work.trace
    }

    /// Like [`box_trace`](BspData::box_trace), for a model placed at `origin` and rotated by
    /// `angles`.
    ///
    /// The returned end point and plane normal are in world space. Box hulls are never rotated.
    pub fn transformed_box_trace(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        mins: Vector3<f32>,
        maxs: Vector3<f32>,
        head: &HeadNode,
        mask: Contents,
        origin: Vector3<f32>,
        angles: Angles,
    ) -> Trace {
        let mut start_l = start - origin;
        let mut end_l = end - origin;

        let rotated = !head.is_box() && !angles.is_zero();
        if rotated {
            start_l = angles.rotate(start_l);
            end_l = angles.rotate(end_l);
        }

        let mut trace = self.box_trace(start_l, end_l, mins, maxs, head, mask);

        if rotated && trace.fraction != 1.0 {
            let inverse = -angles;
            trace.plane = trace
                .plane
                .map(|p| p.with_normal(inverse.rotate(p.normal())));
        }

        trace.end = start + (end - start) * trace.fraction;
        trace
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::bsp::testdata::LevelBuilder;

    fn zero() -> Vector3<f32> {
        Vector3::zero()
    }

    fn assert_close(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() < eps, "{} != {}", a, b);
    }

    #[test]
    fn test_point_trace_hits_cube() {
        let _ = env_logger::try_init();
        let bsp = LevelBuilder::two_cubes().load();
        let trace = bsp.box_trace(
            Vector3::new(-1.0, 0.5, 0.5),
            Vector3::new(20.0, 0.5, 0.5),
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );

        assert!(trace.is_obstructed());
        assert!(!trace.start_solid());
        assert!(!trace.all_solid());
        assert_close(trace.fraction(), (1.0 - DIST_EPSILON) / 21.0, 1e-5);
        assert_close(trace.fraction(), 1.0 / 21.0, 0.01);
        assert_eq!(trace.plane().unwrap().normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(trace.contents(), Contents::SOLID);
        assert_eq!(trace.surface(), Some(0));
        assert_eq!(trace.leaf(), Some(2));
        assert_close(trace.end_point().x, -DIST_EPSILON, 1e-4);
    }

    #[test]
    fn test_trace_unobstructed() {
        let bsp = LevelBuilder::two_cubes().load();
        let end = Vector3::new(9.0, 0.5, 0.5);
        let trace = bsp.box_trace(
            Vector3::new(2.0, 0.5, 0.5),
            end,
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );

        assert_eq!(trace.fraction(), 1.0);
        assert_eq!(trace.end_point(), end);
        assert_eq!(trace.plane(), None);
        assert_eq!(trace.contents(), Contents::empty());
    }

    #[test]
    fn test_trace_mask_excludes_brush() {
        let bsp = LevelBuilder::two_cubes().load();
        let trace = bsp.box_trace(
            Vector3::new(-1.0, 0.5, 0.5),
            Vector3::new(20.0, 0.5, 0.5),
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_WATER,
        );

        assert_eq!(trace.fraction(), 1.0);
    }

    #[test]
    fn test_box_trace_hits_cube() {
        let bsp = LevelBuilder::two_cubes().load();
        let half = Vector3::new(0.25, 0.25, 0.25);
        let trace = bsp.box_trace(
            Vector3::new(-2.0, 0.5, 0.5),
            Vector3::new(5.0, 0.5, 0.5),
            -half,
            half,
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );

        assert_close(trace.fraction(), (1.75 - DIST_EPSILON) / 7.0, 1e-5);
        assert_close(trace.end_point().x, -0.25 - DIST_EPSILON, 1e-4);
        assert_eq!(trace.leaf(), Some(2));
    }

    #[test]
    fn test_trace_from_rest_does_not_tunnel() {
        let bsp = LevelBuilder::two_cubes().load();
        let world = bsp.world_head();
        let end = Vector3::new(20.0, 0.5, 0.5);
        let first = bsp.box_trace(
            Vector3::new(-1.0, 0.5, 0.5),
            end,
            zero(),
            zero(),
            &world,
            Contents::MASK_SOLID,
        );

        // tracing again from where the first trace stopped makes no progress
        let second = bsp.box_trace(
            first.end_point(),
            end,
            zero(),
            zero(),
            &world,
            Contents::MASK_SOLID,
        );
        assert!(second.fraction() < 1e-4);
        assert!(!second.start_solid());

        // and is stable across repeated queries
        for _ in 0..4 {
            let again = bsp.box_trace(
                first.end_point(),
                end,
                zero(),
                zero(),
                &world,
                Contents::MASK_SOLID,
            );
            assert_eq!(again, second);
        }
    }

    #[test]
    fn test_trace_start_solid() {
        let bsp = LevelBuilder::two_cubes().load();
        let trace = bsp.box_trace(
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(5.0, 0.5, 0.5),
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );

        assert!(trace.start_solid());
        assert!(!trace.all_solid());
        assert_eq!(trace.leaf(), Some(2));
    }

    #[test]
    fn test_trace_all_solid() {
        let bsp = LevelBuilder::two_cubes().load();
        let trace = bsp.box_trace(
            Vector3::new(0.25, 0.5, 0.5),
            Vector3::new(0.75, 0.5, 0.5),
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );

        assert!(trace.start_solid());
        assert!(trace.all_solid());
    }

    #[test]
    fn test_position_test() {
        let bsp = LevelBuilder::two_cubes().load();
        let world = bsp.world_head();
        let inside = Vector3::new(0.5, 0.5, 0.5);
        let trace = bsp.box_trace(inside, inside, zero(), zero(), &world, Contents::MASK_SOLID);

        assert!(trace.start_solid());
        assert!(trace.all_solid());
        assert_eq!(trace.fraction(), 0.0);
        assert_eq!(trace.contents(), Contents::SOLID);
        assert_eq!(trace.end_point(), inside);

        let outside = Vector3::new(5.0, 0.5, 0.5);
        let trace = bsp.box_trace(outside, outside, zero(), zero(), &world, Contents::MASK_SOLID);
        assert!(!trace.start_solid());
        assert!(!trace.all_solid());
        assert_eq!(trace.fraction(), 1.0);
        assert_eq!(trace.end_point(), outside);

        // a box overlapping the cube's corner
        let half = Vector3::new(0.5, 0.5, 0.5);
        let near = Vector3::new(1.25, 1.25, 1.25);
        let trace = bsp.box_trace(near, near, -half, half, &world, Contents::MASK_SOLID);
        assert!(trace.all_solid());
    }

    #[test]
    fn test_trace_box_hull() {
        let bsp = LevelBuilder::two_cubes().load();
        let one = Vector3::new(1.0, 1.0, 1.0);
        let head = HeadNode::from(
            bsp.headnode_for_box(Vector3::new(20.0, -1.0, -1.0), Vector3::new(22.0, 1.0, 1.0)),
        );

        let trace = bsp.box_trace(
            Vector3::new(15.0, 0.0, 0.0),
            Vector3::new(30.0, 0.0, 0.0),
            zero(),
            zero(),
            &head,
            Contents::MASK_SHOT,
        );
        assert_close(trace.fraction(), (5.0 - DIST_EPSILON) / 15.0, 1e-5);
        assert_eq!(trace.contents(), Contents::MONSTER);
        assert_eq!(trace.plane().unwrap().normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(trace.surface(), None);

        // the box hull only blocks masks that include monsters
        let trace = bsp.box_trace(
            Vector3::new(15.0, 0.0, 0.0),
            Vector3::new(30.0, 0.0, 0.0),
            -one,
            one,
            &head,
            Contents::MASK_SOLID,
        );
        assert_eq!(trace.fraction(), 1.0);
    }

    #[test]
    fn test_trace_empty_model() {
        let bsp = BspData::empty();
        let end = Vector3::new(100.0, 0.0, 0.0);
        let trace = bsp.box_trace(
            Vector3::new(-100.0, 0.0, 0.0),
            end,
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::all(),
        );
        assert_eq!(trace.fraction(), 1.0);
        assert_eq!(trace.end_point(), end);
    }

    #[test]
    fn test_transformed_box_trace() {
        let bsp = LevelBuilder::two_cubes().load();
        let door = bsp.inline_model("*1").unwrap().head();
        let start = Vector3::new(-0.5, 5.0, 0.5);
        let end = Vector3::new(-0.5, -5.0, 0.5);

        let trace = bsp.transformed_box_trace(
            start,
            end,
            zero(),
            zero(),
            &door,
            Contents::MASK_SOLID,
            zero(),
            Angles::new(0.0, 90.0, 0.0),
        );

        assert_close(trace.fraction(), (4.0 - DIST_EPSILON) / 10.0, 1e-4);
        let normal = trace.plane().unwrap().normal();
        assert_close(normal.x, 0.0, 1e-4);
        assert_close(normal.y, 1.0, 1e-4);
        assert_close(normal.z, 0.0, 1e-4);
        assert_close(trace.end_point().x, -0.5, 1e-4);
        assert_close(trace.end_point().y, 1.0 + DIST_EPSILON, 1e-3);
    }

    #[test]
    fn test_transformed_box_trace_translated() {
        let bsp = LevelBuilder::two_cubes().load();
        let door = bsp.inline_model("*1").unwrap().head();
        let origin = Vector3::new(0.0, 0.0, 10.0);

        let trace = bsp.transformed_box_trace(
            Vector3::new(-1.0, 0.5, 10.5),
            Vector3::new(3.0, 0.5, 10.5),
            zero(),
            zero(),
            &door,
            Contents::MASK_SOLID,
            origin,
            Angles::zero(),
        );

        assert_close(trace.fraction(), (1.0 - DIST_EPSILON) / 4.0, 1e-5);
        assert_close(trace.end_point().z, 10.5, 1e-5);
    }

    #[test]
    fn test_brush_cache() {
        let bsp = LevelBuilder::two_cubes().load();
        let head = bsp.world_head();
        let mut work = TraceWork {
            tree: bsp.tree(&head),
            start: zero(),
            end: zero(),
            mins: zero(),
            maxs: zero(),
            extents: zero(),
            mask: Contents::all(),
            is_point: true,
            trace: Trace::unobstructed(zero()),
            brush_cache: [None; BRUSH_CACHE_SIZE],
        };

        assert!(!work.brush_tested(3));
        assert!(work.brush_tested(3));

        // a colliding brush evicts the first, which is then retested
        assert!(!work.brush_tested(19));
        assert!(!work.brush_tested(3));
        assert!(!work.brush_tested(4));
    }

    #[test]
    fn test_trace_stats() {
        let bsp = LevelBuilder::two_cubes().load();
        bsp.stats().reset();
        bsp.box_trace(
            Vector3::new(-1.0, 0.5, 0.5),
            Vector3::new(20.0, 0.5, 0.5),
            zero(),
            zero(),
            &bsp.world_head(),
            Contents::MASK_SOLID,
        );
        assert_eq!(bsp.stats().traces(), 1);
        assert_eq!(bsp.stats().brush_traces(), 1);
    }
}
