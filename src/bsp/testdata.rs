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


//! Hand-built levels for unit tests.
//!
//! `two_cubes` is a strip along the x axis with a unit cube at the origin, a second unit cube
//! spanning x = 10..11 and open space on either side. Leaf layout:
//!
//! - leaf 0: solid, the usual placeholder
//! - leaf 1: empty, cluster 0, area 1 (everything outside the cubes with x < 11)
//! - leaf 2: solid, inside cube 0 (brush 0)
//! - leaf 3: solid, inside cube 1 (brush 1)
//! - leaf 4: empty, cluster 1, area 2 (x > 11)
//!
//! Model 1 is a door sharing the geometry of cube 0.

use crate::bsp::{BspData, BspLumpId, Contents};

use byteorder::{LittleEndian, WriteBytesExt};

const HEADER_SIZE: usize = 8 + BspLumpId::Count as usize * 8;

pub struct RawTexInfo {
    pub name: String,
    pub flags: i32,
    pub value: i32,
}

pub struct RawLeaf {
    pub contents: i32,
    pub cluster: i16,
    pub area: i16,
    pub first_brush: u16,
    pub brush_count: u16,
}

pub struct RawPlane {
    pub normal: [f32; 3],
    pub dist: f32,
    pub kind: i32,
}

pub struct RawBrush {
    pub first_side: i32,
    pub side_count: i32,
    pub contents: i32,
}

pub struct RawBrushSide {
    pub plane: u16,
    pub surface: i16,
}

pub struct RawModel {
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub origin: [f32; 3],
    pub head: i32,
}

pub struct RawNode {
    pub plane: i32,
    pub children: [i32; 2],
}

pub struct RawArea {
    pub portal_count: i32,
    pub first_portal: i32,
}

pub struct RawAreaPortal {
    pub portal_num: i32,
    pub other_area: i32,
}

pub struct LevelBuilder {
    pub version: i32,
    /// Extra zero bytes appended to a lump.
    pub padding: Vec<(BspLumpId, usize)>,
    pub texinfo: Vec<RawTexInfo>,
    pub leaves: Vec<RawLeaf>,
    pub leaf_brushes: Vec<u16>,
    pub planes: Vec<RawPlane>,
    pub brushes: Vec<RawBrush>,
    pub brush_sides: Vec<RawBrushSide>,
    pub models: Vec<RawModel>,
    pub nodes: Vec<RawNode>,
    pub areas: Vec<RawArea>,
    pub area_portals: Vec<RawAreaPortal>,
    pub visibility: Vec<u8>,
    pub entities: String,
}

fn leaf(contents: Contents, cluster: i16, area: i16, first_brush: u16, brush_count: u16) -> RawLeaf {
    RawLeaf {
        contents: contents.bits(),
        cluster,
        area,
        first_brush,
        brush_count,
    }
}

fn plane(normal: [f32; 3], dist: f32, kind: i32) -> RawPlane {
    RawPlane { normal, dist, kind }
}

fn node(plane: i32, front: i32, back: i32) -> RawNode {
    RawNode {
        plane,
        children: [front, back],
    }
}

fn leaf_child(leaf_id: i32) -> i32 {
    -1 - leaf_id
}

fn brush_sides(planes: &[u16], surface: i16) -> Vec<RawBrushSide> {
    planes
        .iter()
        .map(|&plane| RawBrushSide { plane, surface })
        .collect()
}

fn write_vector3(out: &mut Vec<u8>, v: [f32; 3]) {
    for c in v.iter() {
        out.write_f32::<LittleEndian>(*c).unwrap();
    }
}

impl LevelBuilder {
    pub fn two_cubes() -> LevelBuilder {
        let solid = Contents::SOLID;
        let empty = Contents::empty();
        let l = leaf_child;

        let mut sides = brush_sides(&[2, 1, 5, 4, 8, 7], 0);
        sides.extend(brush_sides(&[11, 10, 5, 4, 8, 7], 1));

        let mut visibility = Vec::new();
        visibility.write_i32::<LittleEndian>(2).unwrap();
        for &ofs in [20, 21, 22, 24].iter() {
            visibility.write_i32::<LittleEndian>(ofs).unwrap();
        }
        // cluster 0 pvs, cluster 0 phs, cluster 1 pvs (one zero byte), cluster 1 phs
        visibility.extend_from_slice(&[0x01, 0x03, 0x00, 0x01, 0x03]);

        LevelBuilder {
            version: 38,
            padding: Vec::new(),
            texinfo: vec![
                RawTexInfo {
                    name: "e1u1/metal1".to_owned(),
                    flags: 0,
                    value: 0,
                },
                RawTexInfo {
                    name: "e1u1/crate".to_owned(),
                    flags: 1,
                    value: 100,
                },
            ],
            leaves: vec![
                leaf(solid, -1, 0, 0, 0),
                leaf(empty, 0, 1, 0, 0),
                leaf(solid, -1, 0, 0, 1),
                leaf(solid, -1, 0, 1, 1),
                leaf(empty, 1, 2, 0, 0),
            ],
            leaf_brushes: vec![0, 1],
            planes: vec![
                plane([1.0, 0.0, 0.0], 0.0, 0),
                plane([-1.0, 0.0, 0.0], 0.0, 3),
                plane([1.0, 0.0, 0.0], 1.0, 0),
                plane([0.0, 1.0, 0.0], 0.0, 1),
                plane([0.0, -1.0, 0.0], 0.0, 4),
                plane([0.0, 1.0, 0.0], 1.0, 1),
                plane([0.0, 0.0, 1.0], 0.0, 2),
                plane([0.0, 0.0, -1.0], 0.0, 5),
                plane([0.0, 0.0, 1.0], 1.0, 2),
                plane([1.0, 0.0, 0.0], 10.0, 0),
                plane([-1.0, 0.0, 0.0], -10.0, 3),
                plane([1.0, 0.0, 0.0], 11.0, 0),
            ],
            brushes: vec![
                RawBrush {
                    first_side: 0,
                    side_count: 6,
                    contents: solid.bits(),
                },
                RawBrush {
                    first_side: 6,
                    side_count: 6,
                    contents: solid.bits(),
                },
            ],
            brush_sides: sides,
            models: vec![
                RawModel {
                    mins: [0.0, 0.0, 0.0],
                    maxs: [11.0, 1.0, 1.0],
                    origin: [0.0, 0.0, 0.0],
                    head: 0,
                },
                RawModel {
                    mins: [0.0, 0.0, 0.0],
                    maxs: [1.0, 1.0, 1.0],
                    origin: [0.0, 0.0, 0.0],
                    head: 12,
                },
            ],
            nodes: vec![
                node(0, 1, l(1)),
                node(2, 2, 3),
                node(9, 7, l(1)),
                // cube 0
                node(3, 4, l(1)),
                node(5, l(1), 5),
                node(6, 6, l(1)),
                node(8, l(1), l(2)),
                // cube 1
                node(11, l(4), 8),
                node(3, 9, l(1)),
                node(5, l(1), 10),
                node(6, 11, l(1)),
                node(8, l(1), l(3)),
                // door
                node(0, 13, l(1)),
                node(2, l(1), 3),
            ],
            areas: vec![
                RawArea {
                    portal_count: 0,
                    first_portal: 0,
                },
                RawArea {
                    portal_count: 1,
                    first_portal: 0,
                },
                RawArea {
                    portal_count: 1,
                    first_portal: 1,
                },
            ],
            area_portals: vec![
                RawAreaPortal {
                    portal_num: 1,
                    other_area: 2,
                },
                RawAreaPortal {
                    portal_num: 1,
                    other_area: 1,
                },
            ],
            visibility,
            entities: concat!(
                "{\n",
                "\"classname\" \"worldspawn\"\n",
                "\"message\" \"Two Cubes\"\n",
                "\"sky\" \"unit1_\"\n",
                "}\n",
                "{\n",
                "\"classname\" \"info_player_start\"\n",
                "\"origin\" \"-32 0 24\"\n",
                "}\n",
            )
            .to_owned(),
        }
    }

    fn lump_data(&self) -> Vec<Vec<u8>> {
        let mut lumps = vec![Vec::new(); BspLumpId::Count as usize];

        let out = &mut lumps[BspLumpId::Entities as usize];
        out.extend_from_slice(self.entities.as_bytes());
        out.push(0);

        let out = &mut lumps[BspLumpId::Planes as usize];
        for p in self.planes.iter() {
            write_vector3(out, p.normal);
            out.write_f32::<LittleEndian>(p.dist).unwrap();
            out.write_i32::<LittleEndian>(p.kind).unwrap();
        }

        lumps[BspLumpId::Visibility as usize].extend_from_slice(&self.visibility);

        let out = &mut lumps[BspLumpId::Nodes as usize];
        for n in self.nodes.iter() {
            out.write_i32::<LittleEndian>(n.plane).unwrap();
            out.write_i32::<LittleEndian>(n.children[0]).unwrap();
            out.write_i32::<LittleEndian>(n.children[1]).unwrap();
            // bounds and face list
            out.extend_from_slice(&[0; 16]);
        }

        let out = &mut lumps[BspLumpId::TexInfo as usize];
        for t in self.texinfo.iter() {
            out.extend_from_slice(&[0; 32]);
            out.write_i32::<LittleEndian>(t.flags).unwrap();
            out.write_i32::<LittleEndian>(t.value).unwrap();
            let mut name = [0; 32];
            name[..t.name.len()].copy_from_slice(t.name.as_bytes());
            out.extend_from_slice(&name);
            out.write_i32::<LittleEndian>(-1).unwrap();
        }

        let out = &mut lumps[BspLumpId::Leaves as usize];
        for l in self.leaves.iter() {
            out.write_i32::<LittleEndian>(l.contents).unwrap();
            out.write_i16::<LittleEndian>(l.cluster).unwrap();
            out.write_i16::<LittleEndian>(l.area).unwrap();
            // bounds and face list
            out.extend_from_slice(&[0; 16]);
            out.write_u16::<LittleEndian>(l.first_brush).unwrap();
            out.write_u16::<LittleEndian>(l.brush_count).unwrap();
        }

        let out = &mut lumps[BspLumpId::LeafBrushes as usize];
        for &b in self.leaf_brushes.iter() {
            out.write_u16::<LittleEndian>(b).unwrap();
        }

        let out = &mut lumps[BspLumpId::Models as usize];
        for m in self.models.iter() {
            write_vector3(out, m.mins);
            write_vector3(out, m.maxs);
            write_vector3(out, m.origin);
            out.write_i32::<LittleEndian>(m.head).unwrap();
            out.extend_from_slice(&[0; 8]);
        }

        let out = &mut lumps[BspLumpId::Brushes as usize];
        for b in self.brushes.iter() {
            out.write_i32::<LittleEndian>(b.first_side).unwrap();
            out.write_i32::<LittleEndian>(b.side_count).unwrap();
            out.write_i32::<LittleEndian>(b.contents).unwrap();
        }

        let out = &mut lumps[BspLumpId::BrushSides as usize];
        for s in self.brush_sides.iter() {
            out.write_u16::<LittleEndian>(s.plane).unwrap();
            out.write_i16::<LittleEndian>(s.surface).unwrap();
        }

        let out = &mut lumps[BspLumpId::Areas as usize];
        for a in self.areas.iter() {
            out.write_i32::<LittleEndian>(a.portal_count).unwrap();
            out.write_i32::<LittleEndian>(a.first_portal).unwrap();
        }

        let out = &mut lumps[BspLumpId::AreaPortals as usize];
        for p in self.area_portals.iter() {
            out.write_i32::<LittleEndian>(p.portal_num).unwrap();
            out.write_i32::<LittleEndian>(p.other_area).unwrap();
        }

        for &(id, len) in self.padding.iter() {
            let out = &mut lumps[id as usize];
            let new_len = out.len() + len;
            out.resize(new_len, 0);
        }

        lumps
    }

    /// Serializes the level as a BSP file.
    pub fn build(&self) -> Vec<u8> {
        let lumps = self.lump_data();

        let mut out = Vec::new();
        out.extend_from_slice(b"IBSP");
        out.write_i32::<LittleEndian>(self.version).unwrap();

        let mut offset = HEADER_SIZE;
        for lump in lumps.iter() {
            out.write_i32::<LittleEndian>(offset as i32).unwrap();
            out.write_i32::<LittleEndian>(lump.len() as i32).unwrap();
            offset += lump.len();
        }

        for lump in lumps.iter() {
            out.extend_from_slice(lump);
        }

        out
    }

    pub fn load(&self) -> BspData {
        crate::bsp::load(&self.build()).unwrap()
    }
}
