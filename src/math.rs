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


use std::ops::Neg;

use cgmath::{Angle, Deg, InnerSpace, Vector3, Zero};

/// Slack used when classifying a box against a plane.
pub const SIDE_EPSILON: f32 = 0.001;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Indices past 2 map to `Z`.
    pub fn from_index(index: usize) -> Axis {
        match index {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }
}

/// Classification of a plane's normal.
///
/// The three axial kinds have a normal of exactly +1 along one axis and allow the classification
/// routines to skip the dot product. The `Any*` kinds record the dominant axis of a non-axial
/// normal; `Any` is used when the compiler did not record one.
#[derive(Copy, Clone, Debug, Eq, FromPrimitive, PartialEq)]
pub enum PlaneKind {
    X = 0,
    Y = 1,
    Z = 2,
    AnyX = 3,
    AnyY = 4,
    AnyZ = 5,
    Any = 6,
}

impl PlaneKind {
    pub fn axial(axis: Axis) -> PlaneKind {
        match axis {
            Axis::X => PlaneKind::X,
            Axis::Y => PlaneKind::Y,
            Axis::Z => PlaneKind::Z,
        }
    }

    pub fn dominant(axis: Axis) -> PlaneKind {
        match axis {
            Axis::X => PlaneKind::AnyX,
            Axis::Y => PlaneKind::AnyY,
            Axis::Z => PlaneKind::AnyZ,
        }
    }

    /// Returns the axis of an axial plane, or `None` if the plane requires a full dot product.
    pub fn axis(&self) -> Option<usize> {
        match *self {
            PlaneKind::X => Some(0),
            PlaneKind::Y => Some(1),
            PlaneKind::Z => Some(2),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlaneSide {
    Front = 0,
    Back = 1,
}

impl PlaneSide {
    /// Points exactly on the plane are considered to be in front of it.
    pub fn from_dist(dist: f32) -> PlaneSide {
        if dist >= 0.0 {
            PlaneSide::Front
        } else {
            PlaneSide::Back
        }
    }
}

/// Which side(s) of a plane an axis-aligned box occupies.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BoxSide {
    Front,
    Back,
    Both,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    normal: Vector3<f32>,
    dist: f32,
    kind: PlaneKind,
    sign_bits: u8,
}

impl Neg for Plane {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let kind = match self.kind.axis() {
            Some(a) => PlaneKind::dominant(Axis::from_index(a)),
            None => self.kind,
        };

        Plane::new(-self.normal, -self.dist, kind)
    }
}

impl Plane {
    /// Creates a plane with the given normal and kind, `dist` units from the origin.
    ///
    /// The sign bits are derived from the normal.
    pub fn new(normal: Vector3<f32>, dist: f32, kind: PlaneKind) -> Plane {
        Plane {
            normal,
            dist,
            kind,
            sign_bits: sign_bits(normal),
        }
    }

    /// Creates a plane with a normal of +1 along `axis`.
    pub fn axial(axis: Axis, dist: f32) -> Plane {
        let mut normal = Vector3::zero();
        normal[axis as usize] = 1.0;
        Plane::new(normal, dist, PlaneKind::axial(axis))
    }

    /// A degenerate plane with a zero normal, used where no plane was hit.
    pub fn zero() -> Plane {
        Plane::new(Vector3::zero(), 0.0, PlaneKind::X)
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    pub fn dist(&self) -> f32 {
        self.dist
    }

    pub fn kind(&self) -> PlaneKind {
        self.kind
    }

    /// Bit `i` is set if component `i` of the normal is negative.
    pub fn sign_bits(&self) -> u8 {
        self.sign_bits
    }

    pub(crate) fn set_dist(&mut self, dist: f32) {
        self.dist = dist;
    }

    /// Returns a copy of this plane with its normal replaced.
    pub(crate) fn with_normal(&self, normal: Vector3<f32>) -> Plane {
        Plane {
            normal,
            ..*self
        }
    }

    /// Calculates the signed distance between this plane and the given point.
    pub fn point_dist(&self, point: Vector3<f32>) -> f32 {
        match self.kind.axis() {
            Some(a) => point[a] - self.dist,
            None => point.dot(self.normal) - self.dist,
        }
    }

    /// Calculates which side of this plane the given point belongs to.
    pub fn point_side(&self, point: Vector3<f32>) -> PlaneSide {
        PlaneSide::from_dist(self.point_dist(point))
    }

    /// Classifies the box spanned by `mins` and `maxs` against this plane.
    pub fn box_side(&self, mins: Vector3<f32>, maxs: Vector3<f32>) -> BoxSide {
        if let Some(a) = self.kind.axis() {
            if self.dist - SIDE_EPSILON <= mins[a] {
                return BoxSide::Front;
            }
            if self.dist + SIDE_EPSILON >= maxs[a] {
                return BoxSide::Back;
            }
            return BoxSide::Both;
        }

        // pick the corners nearest to and farthest from the plane along the normal
        let mut near = Vector3::zero();
        let mut far = Vector3::zero();
        for i in 0..3 {
            if self.sign_bits & (1 << i) != 0 {
                near[i] = maxs[i];
                far[i] = mins[i];
            } else {
                near[i] = mins[i];
                far[i] = maxs[i];
            }
        }

        let front = far.dot(self.normal) >= self.dist;
        let back = near.dot(self.normal) < self.dist;
        match (front, back) {
            (true, false) => BoxSide::Front,
            (false, true) => BoxSide::Back,
            // a degenerate normal can leave the box on neither side
            _ => BoxSide::Both,
        }
    }
}

fn sign_bits(normal: Vector3<f32>) -> u8 {
    let mut bits = 0;
    for i in 0..3 {
        if normal[i] < 0.0 {
            bits |= 1 << i;
        }
    }
    bits
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Angles {
    pub pitch: Deg<f32>,
    pub roll: Deg<f32>,
    pub yaw: Deg<f32>,
}

impl Angles {
    pub fn zero() -> Angles {
        Angles {
            pitch: Deg(0.0),
            roll: Deg(0.0),
            yaw: Deg(0.0),
        }
    }

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Angles {
        Angles {
            pitch: Deg(pitch),
            roll: Deg(roll),
            yaw: Deg(yaw),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.pitch == Deg(0.0) && self.roll == Deg(0.0) && self.yaw == Deg(0.0)
    }

    /// Returns the forward, right and up vectors for this orientation.
    pub fn vectors(&self) -> [Vector3<f32>; 3] {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let (sr, cr) = self.roll.sin_cos();

        [
            Vector3::new(cp * cy, cp * sy, -sp),
            Vector3::new(
                -sr * sp * cy + cr * sy,
                -sr * sp * sy - cr * cy,
                -sr * cp,
            ),
            Vector3::new(cr * sp * cy + sr * sy, cr * sp * sy - sr * cy, cr * cp),
        ]
    }

    /// Expresses a world-space vector in the frame described by this orientation.
    pub fn rotate(&self, v: Vector3<f32>) -> Vector3<f32> {
        let [forward, right, up] = self.vectors();
        Vector3::new(v.dot(forward), -v.dot(right), v.dot(up))
    }
}

impl Neg for Angles {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Angles {
            pitch: -self.pitch,
            roll: -self.roll,
            yaw: -self.yaw,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_plane_side_x() {
        let plane = Plane::axial(Axis::X, 1.0);
        assert_eq!(plane.point_side(Vector3::unit_x() * 2.0), PlaneSide::Front);
        assert_eq!(plane.point_side(Vector3::unit_x() * -2.0), PlaneSide::Back);
    }

    #[test]
    fn test_plane_side_on_plane() {
        let plane = Plane::axial(Axis::Z, 1.0);
        assert_eq!(plane.point_side(Vector3::unit_z()), PlaneSide::Front);
    }

    #[test]
    fn test_plane_point_dist_axial_matches_dot() {
        let axial = Plane::axial(Axis::Y, 4.0);
        let general = Plane::new(Vector3::unit_y(), 4.0, PlaneKind::Any);
        let p = Vector3::new(3.0, -7.5, 2.0);
        assert_eq!(axial.point_dist(p), general.point_dist(p));
        assert_eq!(axial.point_dist(p), -11.5);
    }

    #[test]
    fn test_plane_sign_bits() {
        let plane = Plane::new(Vector3::new(-1.0, 0.0, -1.0).normalize(), 0.0, PlaneKind::Any);
        assert_eq!(plane.sign_bits(), 0b101);
        assert_eq!(Plane::axial(Axis::X, 3.0).sign_bits(), 0);
    }

    #[test]
    fn test_plane_neg() {
        let plane = -Plane::axial(Axis::X, 3.0);
        assert_eq!(plane.normal(), -Vector3::unit_x());
        assert_eq!(plane.dist(), -3.0);
        assert_eq!(plane.kind(), PlaneKind::AnyX);
        assert_eq!(plane.point_dist(Vector3::new(5.0, 0.0, 0.0)), -2.0);
    }

    #[test]
    fn test_box_side_axial() {
        let plane = Plane::axial(Axis::X, 0.0);
        let one = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(plane.box_side(one, one * 2.0), BoxSide::Front);
        assert_eq!(plane.box_side(-one * 2.0, -one), BoxSide::Back);
        assert_eq!(plane.box_side(-one, one), BoxSide::Both);
    }

    #[test]
    fn test_box_side_axial_epsilon() {
        // a box resting exactly on the plane belongs to one side only
        let plane = Plane::axial(Axis::Z, 0.0);
        let mins = Vector3::new(-1.0, -1.0, 0.0);
        let maxs = Vector3::new(1.0, 1.0, 2.0);
        assert_eq!(plane.box_side(mins, maxs), BoxSide::Front);
        assert_eq!(plane.box_side(-maxs, -mins), BoxSide::Back);
    }

    #[test]
    fn test_box_side_general() {
        for &normal in [
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(-1.0, 1.0, 1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, -1.0, -1.0),
        ]
        .iter()
        {
            let plane = Plane::new(normal.normalize(), 0.0, PlaneKind::Any);
            let half = Vector3::new(0.5, 0.5, 0.5);
            let front = normal.normalize() * 4.0;
            assert_eq!(plane.box_side(front - half, front + half), BoxSide::Front);
            assert_eq!(plane.box_side(-front - half, -front + half), BoxSide::Back);
            assert_eq!(plane.box_side(-half, half), BoxSide::Both);
        }
    }

    #[test]
    fn test_angle_vectors_identity() {
        let [forward, right, up] = Angles::zero().vectors();
        assert_vec_eq(forward, Vector3::unit_x());
        assert_vec_eq(right, -Vector3::unit_y());
        assert_vec_eq(up, Vector3::unit_z());
    }

    #[test]
    fn test_angle_vectors_yaw() {
        let [forward, right, up] = Angles::new(0.0, 90.0, 0.0).vectors();
        assert_vec_eq(forward, Vector3::unit_y());
        assert_vec_eq(right, Vector3::unit_x());
        assert_vec_eq(up, Vector3::unit_z());
    }

    #[test]
    fn test_rotate_round_trip() {
        let angles = Angles::new(0.0, 35.0, 0.0);
        let v = Vector3::new(3.0, -2.0, 5.0);
        assert_vec_eq((-angles).rotate(angles.rotate(v)), v);
        assert_vec_eq(Angles::zero().rotate(v), v);
    }
}
