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


use std::{
    fs,
    io::{Cursor, Read, Seek, SeekFrom},
    path::Path,
};

use crate::{
    bsp::{
        area::AreaState,
        hull::{append_box_hull, check_box_hull_room},
        vis::BspVisibility,
        BspArea, BspAreaPortal, BspBrush, BspBrushSide, BspData, BspError, BspErrorKind,
        BspLeaf, BspModel, BspNode, BspNodeChild, BspStats, BspSurface, Contents,
    },
    config::Config,
    math::{Plane, PlaneKind},
};

use byteorder::{LittleEndian, ReadBytesExt};
use cgmath::Vector3;
use failure::ResultExt;
use num::FromPrimitive;

const IDENT: i32 = 0x5053_4249; // "IBSP"
const VERSION: i32 = 38;
const VERSION_Q2W: i32 = 69;

pub(crate) const MAX_MAP_MODELS: usize = 1024;
pub(crate) const MAX_MAP_BRUSHES: usize = 8192;
pub(crate) const MAX_MAP_ENTSTRING: usize = 0x40000;
pub(crate) const MAX_MAP_TEXINFO: usize = 8192;
pub(crate) const MAX_MAP_AREAS: usize = 256;
pub(crate) const MAX_MAP_AREAPORTALS: usize = 1024;
pub(crate) const MAX_MAP_PLANES: usize = 65536;
pub(crate) const MAX_MAP_NODES: usize = 65536;
pub(crate) const MAX_MAP_BRUSHSIDES: usize = 65536;
pub(crate) const MAX_MAP_LEAFS: usize = 65536;
pub(crate) const MAX_MAP_LEAFBRUSHES: usize = 65536;
pub(crate) const MAX_MAP_VISIBILITY: usize = 0x100000;

const TEXTURE_NAME_SIZE: usize = 32;

const HEADER_SIZE: usize = 8 + BspLumpId::Count as usize * 8;
const TEXINFO_SIZE: usize = 8 * 4 + 2 * 4 + TEXTURE_NAME_SIZE + 4;
const LEAF_SIZE: usize = 4 + 2 * 2 + 6 * 2 + 4 * 2;
const LEAF_BRUSH_SIZE: usize = 2;
const PLANE_SIZE: usize = 4 * 4 + 4;
const BRUSH_SIZE: usize = 3 * 4;
const BRUSH_SIDE_SIZE: usize = 2 + 2;
const MODEL_SIZE: usize = 9 * 4 + 3 * 4;
const NODE_SIZE: usize = 3 * 4 + 6 * 2 + 2 * 2;
const AREA_SIZE: usize = 2 * 4;
const AREA_PORTAL_SIZE: usize = 2 * 4;

#[derive(Copy, Clone, Debug, Eq, FromPrimitive, PartialEq)]
pub enum BspLumpId {
    Entities = 0,
    Planes = 1,
    Vertices = 2,
    Visibility = 3,
    Nodes = 4,
    TexInfo = 5,
    Faces = 6,
    Lighting = 7,
    Leaves = 8,
    LeafFaces = 9,
    LeafBrushes = 10,
    Edges = 11,
    SurfEdges = 12,
    Models = 13,
    Brushes = 14,
    BrushSides = 15,
    Pop = 16,
    Areas = 17,
    AreaPortals = 18,
    Count = 19,
}

#[derive(Debug)]
struct BspLump {
    offset: usize,
    size: usize,
}

impl BspLump {
    fn from_i32s(
        id: BspLumpId,
        offset: i32,
        size: i32,
        file_size: usize,
    ) -> Result<BspLump, BspError> {
        let out_of_bounds = BspErrorKind::LumpOutOfBounds {
            lump: id,
            offset,
            size,
            file_size,
        };

        check!(offset >= 0 && size >= 0, out_of_bounds);
        check!(
            offset as usize + size as usize <= file_size,
            out_of_bounds
        );

        Ok(BspLump {
            offset: offset as usize,
            size: size as usize,
        })
    }
}

/// Level records decoded from the file, before the box hull is appended.
#[derive(Debug, Default)]
pub(crate) struct Lumps {
    pub surfaces: Vec<BspSurface>,
    pub leaves: Vec<BspLeaf>,
    pub leaf_brushes: Vec<usize>,
    pub planes: Vec<Plane>,
    pub brushes: Vec<BspBrush>,
    pub brush_sides: Vec<BspBrushSide>,
    pub models: Vec<BspModel>,
    pub nodes: Vec<BspNode>,
    pub areas: Vec<BspArea>,
    pub area_portals: Vec<BspAreaPortal>,
    pub visibility: Option<BspVisibility>,
    pub cluster_count: usize,
    pub entities: Vec<u8>,
}

struct LumpTable<'a> {
    data: &'a [u8],
    lumps: Vec<BspLump>,
}

impl<'a> LumpTable<'a> {
    fn bytes(&self, id: BspLumpId) -> &'a [u8] {
        let lump = &self.lumps[id as usize];
        &self.data[lump.offset..lump.offset + lump.size]
    }

    fn reader(&self, id: BspLumpId) -> Cursor<&'a [u8]> {
        Cursor::new(self.bytes(id))
    }

    /// Returns the number of records in a lump, checking it against the record size and limit.
    fn count(
        &self,
        id: BspLumpId,
        record_size: usize,
        max: usize,
        what: &'static str,
    ) -> Result<usize, BspError> {
        let size = self.lumps[id as usize].size;
        check!(
            size % record_size == 0,
            BspErrorKind::BadLumpSize {
                lump: id,
                size,
                record_size,
            }
        );

        let count = size / record_size;
        check!(count <= max, BspErrorKind::TooMany { what, count, max });

        debug!("{:?}: {} {}", id, count, what);
        Ok(count)
    }
}

fn bad_index(what: &'static str, index: i64, count: usize) -> BspErrorKind {
    BspErrorKind::BadIndex { what, index, count }
}

fn load_contents(raw: i32) -> Contents {
    let contents = Contents::from_bits_truncate(raw);
    if contents.bits() != raw {
        warn!("Ignoring unknown content bits {:#x}", raw & !contents.bits());
    }
    contents
}

fn load_vector3<R>(reader: &mut R) -> Result<Vector3<f32>, BspError>
where
    R: ReadBytesExt,
{
    Ok(Vector3::new(
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ))
}

fn skip<R>(reader: &mut R, len: usize) -> Result<(), BspError>
where
    R: Seek,
{
    reader.seek(SeekFrom::Current(len as i64))?;
    Ok(())
}

fn load_surface<R>(reader: &mut R) -> Result<BspSurface, BspError>
where
    R: ReadBytesExt + Seek,
{
    // texture axes are only used by the renderer
    skip(reader, 8 * 4)?;

    let flags = reader.read_i32::<LittleEndian>()?;
    let value = reader.read_i32::<LittleEndian>()?;

    let mut name_bytes = [0; TEXTURE_NAME_SIZE];
    reader.read_exact(&mut name_bytes)?;
    let len = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(TEXTURE_NAME_SIZE);
    let name = String::from_utf8_lossy(&name_bytes[..len]).into_owned();

    // animation chain
    reader.read_i32::<LittleEndian>()?;

    Ok(BspSurface { name, flags, value })
}

fn load_leaf<R>(reader: &mut R) -> Result<BspLeaf, BspError>
where
    R: ReadBytesExt + Seek,
{
    let contents = load_contents(reader.read_i32::<LittleEndian>()?);

    let cluster = match reader.read_i16::<LittleEndian>()? {
        -1 => None,
        c if c < 0 => return Err(bad_index("leaf cluster", c as i64, 0).into()),
        c => Some(c as usize),
    };

    let area = match reader.read_i16::<LittleEndian>()? {
        a if a < 0 => return Err(bad_index("leaf area", a as i64, 0).into()),
        a => a as usize,
    };

    // bounds and face list
    skip(reader, 6 * 2 + 2 * 2)?;

    let leaf_brush_id = reader.read_u16::<LittleEndian>()? as usize;
    let leaf_brush_count = reader.read_u16::<LittleEndian>()? as usize;

    Ok(BspLeaf {
        contents,
        cluster,
        area,
        leaf_brush_id,
        leaf_brush_count,
    })
}

fn load_plane<R>(reader: &mut R, plane_id: usize) -> Result<Plane, BspError>
where
    R: ReadBytesExt,
{
    let normal = load_vector3(reader)?;
    let dist = reader.read_f32::<LittleEndian>()?;
    let kind_id = reader.read_i32::<LittleEndian>()?;
    let kind = match PlaneKind::from_i32(kind_id) {
        Some(k) => k,
        None => Err(BspErrorKind::BadPlaneType {
            plane: plane_id,
            kind: kind_id,
        })?,
    };

    Ok(Plane::new(normal, dist, kind))
}

fn load_brush<R>(reader: &mut R) -> Result<BspBrush, BspError>
where
    R: ReadBytesExt,
{
    let side_id = reader.read_i32::<LittleEndian>()?;
    let side_count = reader.read_i32::<LittleEndian>()?;
    let contents = load_contents(reader.read_i32::<LittleEndian>()?);

    check!(side_id >= 0, bad_index("brush side", side_id as i64, 0));
    check!(side_count >= 0, bad_index("brush side", side_count as i64, 0));

    Ok(BspBrush {
        contents,
        side_id: side_id as usize,
        side_count: side_count as usize,
    })
}

fn load_brush_side<R>(reader: &mut R, surface_count: usize) -> Result<BspBrushSide, BspError>
where
    R: ReadBytesExt,
{
    let plane_id = reader.read_u16::<LittleEndian>()? as usize;
    let surface_id = match reader.read_i16::<LittleEndian>()? {
        s if s < 0 => None,
        s if s as usize >= surface_count => {
            Err(bad_index("brush side surface", s as i64, surface_count))?
        }
        s => Some(s as usize),
    };

    Ok(BspBrushSide {
        plane_id,
        surface_id,
    })
}

fn load_model<R>(reader: &mut R) -> Result<BspModel, BspError>
where
    R: ReadBytesExt + Seek,
{
    // spread the bounds to cover rounding in the compiler
    let spread = Vector3::new(1.0, 1.0, 1.0);
    let min = load_vector3(reader)? - spread;
    let max = load_vector3(reader)? + spread;
    let origin = load_vector3(reader)?;
    let head_node = BspNodeChild::from_raw(reader.read_i32::<LittleEndian>()?);

    // face list
    skip(reader, 2 * 4)?;

    Ok(BspModel {
        min,
        max,
        origin,
        head_node,
    })
}

fn load_node<R>(reader: &mut R) -> Result<BspNode, BspError>
where
    R: ReadBytesExt + Seek,
{
    let plane_id = reader.read_i32::<LittleEndian>()?;
    check!(plane_id >= 0, bad_index("node plane", plane_id as i64, 0));

    let front = BspNodeChild::from_raw(reader.read_i32::<LittleEndian>()?);
    let back = BspNodeChild::from_raw(reader.read_i32::<LittleEndian>()?);

    // bounds and face list
    skip(reader, 6 * 2 + 2 * 2)?;

    Ok(BspNode {
        plane_id: plane_id as usize,
        children: [front, back],
    })
}

fn load_area<R>(reader: &mut R) -> Result<BspArea, BspError>
where
    R: ReadBytesExt,
{
    let portal_count = reader.read_i32::<LittleEndian>()?;
    let portal_id = reader.read_i32::<LittleEndian>()?;

    check!(portal_id >= 0, bad_index("area portal", portal_id as i64, 0));
    check!(portal_count >= 0, bad_index("area portal", portal_count as i64, 0));

    Ok(BspArea {
        portal_id: portal_id as usize,
        portal_count: portal_count as usize,
    })
}

fn load_area_portal<R>(reader: &mut R) -> Result<BspAreaPortal, BspError>
where
    R: ReadBytesExt,
{
    let portal_num = reader.read_i32::<LittleEndian>()?;
    let other_area = reader.read_i32::<LittleEndian>()?;

    check!(portal_num >= 0, bad_index("portal number", portal_num as i64, 0));
    check!(other_area >= 0, bad_index("area", other_area as i64, 0));

    Ok(BspAreaPortal {
        portal_num: portal_num as usize,
        other_area: other_area as usize,
    })
}

fn check_child(child: BspNodeChild, lumps: &Lumps) -> Result<(), BspError> {
    match child {
        BspNodeChild::Node(n) => check!(
            n < lumps.nodes.len(),
            bad_index("node", n as i64, lumps.nodes.len())
        ),
        BspNodeChild::Leaf(l) => check!(
            l < lumps.leaves.len(),
            bad_index("leaf", l as i64, lumps.leaves.len())
        ),
    }

    Ok(())
}

fn check_range(
    what: &'static str,
    first: usize,
    count: usize,
    len: usize,
) -> Result<(), BspError> {
    check!(
        first + count <= len,
        bad_index(what, (first + count) as i64, len)
    );
    Ok(())
}

/// Checks every cross-reference between the decoded lumps.
fn validate(lumps: &Lumps) -> Result<(), BspError> {
    for leaf in lumps.leaves.iter() {
        check_range(
            "leaf brush",
            leaf.leaf_brush_id,
            leaf.leaf_brush_count,
            lumps.leaf_brushes.len(),
        )?;

        if let Some(c) = leaf.cluster {
            check!(
                c < lumps.cluster_count,
                bad_index("cluster", c as i64, lumps.cluster_count)
            );
        }

        check!(
            leaf.area < lumps.areas.len(),
            bad_index("area", leaf.area as i64, lumps.areas.len())
        );
    }

    for &brush_id in lumps.leaf_brushes.iter() {
        check!(
            brush_id < lumps.brushes.len(),
            bad_index("brush", brush_id as i64, lumps.brushes.len())
        );
    }

    for brush in lumps.brushes.iter() {
        check_range(
            "brush side",
            brush.side_id,
            brush.side_count,
            lumps.brush_sides.len(),
        )?;
    }

    for side in lumps.brush_sides.iter() {
        check!(
            side.plane_id < lumps.planes.len(),
            bad_index("plane", side.plane_id as i64, lumps.planes.len())
        );
    }

    for model in lumps.models.iter() {
        check_child(model.head_node, lumps)?;
    }

    for node in lumps.nodes.iter() {
        check!(
            node.plane_id < lumps.planes.len(),
            bad_index("plane", node.plane_id as i64, lumps.planes.len())
        );
        for &child in node.children.iter() {
            check_child(child, lumps)?;
        }
    }

    for area in lumps.areas.iter() {
        check_range(
            "area portal",
            area.portal_id,
            area.portal_count,
            lumps.area_portals.len(),
        )?;
    }

    for portal in lumps.area_portals.iter() {
        check!(
            portal.portal_num <= lumps.area_portals.len(),
            bad_index(
                "portal number",
                portal.portal_num as i64,
                lumps.area_portals.len()
            )
        );
        check!(
            portal.other_area < lumps.areas.len(),
            bad_index("area", portal.other_area as i64, lumps.areas.len())
        );
    }

    Ok(())
}

/// Loads a collision model from the contents of a BSP file.
pub fn load(data: &[u8]) -> Result<BspData, BspError> {
    let mut reader = Cursor::new(data);

    check!(
        data.len() >= HEADER_SIZE,
        BspErrorKind::LumpOutOfBounds {
            lump: BspLumpId::Entities,
            offset: 0,
            size: HEADER_SIZE as i32,
            file_size: data.len(),
        }
    );

    let ident = reader.read_i32::<LittleEndian>()?;
    check!(ident == IDENT, BspErrorKind::BadMagic { ident });

    let version = reader.read_i32::<LittleEndian>()?;
    check!(
        version == VERSION || version == VERSION_Q2W,
        BspErrorKind::UnsupportedVersion { version }
    );

    let mut lumps = Vec::with_capacity(BspLumpId::Count as usize);
    for l in 0..BspLumpId::Count as usize {
        let id = match BspLumpId::from_usize(l) {
            Some(id) => id,
            None => unreachable!(),
        };

        let offset = reader.read_i32::<LittleEndian>()?;
        let size = reader.read_i32::<LittleEndian>()?;
        lumps.push(BspLump::from_i32s(id, offset, size, data.len())?);
    }

    let table = LumpTable { data, lumps };
    let mut out = Lumps::default();

    let surface_count = table.count(BspLumpId::TexInfo, TEXINFO_SIZE, MAX_MAP_TEXINFO, "surfaces")?;
    check!(surface_count > 0, BspErrorKind::Missing { what: "surfaces" });
    let mut reader = table.reader(BspLumpId::TexInfo);
    for _ in 0..surface_count {
        out.surfaces.push(load_surface(&mut reader)?);
    }

    let leaf_count = table.count(BspLumpId::Leaves, LEAF_SIZE, MAX_MAP_LEAFS, "leaves")?;
    check!(leaf_count > 0, BspErrorKind::Missing { what: "leaves" });
    let mut reader = table.reader(BspLumpId::Leaves);
    for _ in 0..leaf_count {
        out.leaves.push(load_leaf(&mut reader)?);
    }

    let leaf_brush_count = table.count(
        BspLumpId::LeafBrushes,
        LEAF_BRUSH_SIZE,
        MAX_MAP_LEAFBRUSHES,
        "leaf brushes",
    )?;
    check!(
        leaf_brush_count > 0,
        BspErrorKind::Missing {
            what: "leaf brushes"
        }
    );
    let mut reader = table.reader(BspLumpId::LeafBrushes);
    for _ in 0..leaf_brush_count {
        out.leaf_brushes
            .push(reader.read_u16::<LittleEndian>()? as usize);
    }

    let plane_count = table.count(BspLumpId::Planes, PLANE_SIZE, MAX_MAP_PLANES, "planes")?;
    check!(plane_count > 0, BspErrorKind::Missing { what: "planes" });
    let mut reader = table.reader(BspLumpId::Planes);
    for plane_id in 0..plane_count {
        out.planes.push(load_plane(&mut reader, plane_id)?);
    }

    let brush_count = table.count(BspLumpId::Brushes, BRUSH_SIZE, MAX_MAP_BRUSHES, "brushes")?;
    let mut reader = table.reader(BspLumpId::Brushes);
    for _ in 0..brush_count {
        out.brushes.push(load_brush(&mut reader)?);
    }

    let brush_side_count = table.count(
        BspLumpId::BrushSides,
        BRUSH_SIDE_SIZE,
        MAX_MAP_BRUSHSIDES,
        "brush sides",
    )?;
    let mut reader = table.reader(BspLumpId::BrushSides);
    for _ in 0..brush_side_count {
        out.brush_sides
            .push(load_brush_side(&mut reader, out.surfaces.len())?);
    }

    let model_count = table.count(BspLumpId::Models, MODEL_SIZE, MAX_MAP_MODELS, "models")?;
    check!(model_count > 0, BspErrorKind::Missing { what: "models" });
    let mut reader = table.reader(BspLumpId::Models);
    for model_id in 0..model_count {
        let model = load_model(&mut reader)?;
        debug!(
            "Model {}: mins {:?}, maxs {:?}, head {:?}",
            model_id, model.min, model.max, model.head_node
        );
        out.models.push(model);
    }

    let node_count = table.count(BspLumpId::Nodes, NODE_SIZE, MAX_MAP_NODES, "nodes")?;
    check!(node_count > 0, BspErrorKind::Missing { what: "nodes" });
    let mut reader = table.reader(BspLumpId::Nodes);
    for _ in 0..node_count {
        out.nodes.push(load_node(&mut reader)?);
    }

    let area_count = table.count(BspLumpId::Areas, AREA_SIZE, MAX_MAP_AREAS, "areas")?;
    let mut reader = table.reader(BspLumpId::Areas);
    for _ in 0..area_count {
        out.areas.push(load_area(&mut reader)?);
    }
    if out.areas.is_empty() {
        debug!("No areas, using a single area");
        out.areas.push(BspArea {
            portal_id: 0,
            portal_count: 0,
        });
    }

    let area_portal_count = table.count(
        BspLumpId::AreaPortals,
        AREA_PORTAL_SIZE,
        MAX_MAP_AREAPORTALS,
        "area portals",
    )?;
    let mut reader = table.reader(BspLumpId::AreaPortals);
    for _ in 0..area_portal_count {
        out.area_portals.push(load_area_portal(&mut reader)?);
    }

    let vis_data = table.bytes(BspLumpId::Visibility);
    check!(
        vis_data.len() <= MAX_MAP_VISIBILITY,
        BspErrorKind::TooMany {
            what: "visibility bytes",
            count: vis_data.len(),
            max: MAX_MAP_VISIBILITY,
        }
    );
    if vis_data.is_empty() {
        // size rows as if every leaf were its own cluster
        debug!("No visibility data");
        out.cluster_count = out.leaves.len();
    } else {
        let vis = BspVisibility::load(vis_data)?;
        out.cluster_count = vis.cluster_count();
        out.visibility = Some(vis);
    }

    let ent_data = table.bytes(BspLumpId::Entities);
    check!(
        ent_data.len() <= MAX_MAP_ENTSTRING,
        BspErrorKind::TooMany {
            what: "entity string bytes",
            count: ent_data.len(),
            max: MAX_MAP_ENTSTRING,
        }
    );
    out.entities = ent_data.to_vec();

    validate(&out)?;

    check!(
        out.leaves[0].contents == Contents::SOLID,
        BspErrorKind::BadLeafZero
    );

    let empty_leaf = match out.leaves.iter().skip(1).position(|l| l.contents.is_empty()) {
        Some(i) => i + 1,
        None => Err(BspErrorKind::NoEmptyLeaf)?,
    };

    check_box_hull_room(&out)?;

    let bsp = BspData::from_lumps(out, empty_leaf, data.len());
    info!(
        "Loaded BSP: {} planes, {} nodes, {} leaves, {} brushes, {} models, {} clusters, {} areas",
        bsp.planes().len(),
        bsp.nodes().len(),
        bsp.leaves().len(),
        bsp.brushes().len(),
        bsp.models().len(),
        bsp.cluster_count(),
        bsp.area_count(),
    );

    Ok(bsp)
}

/// Loads a collision model from a BSP file on disk.
pub fn load_file<P>(path: P) -> Result<BspData, BspError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("Loading {}", path.display());
    let data = fs::read(path).context(BspErrorKind::Io)?;
    load(&data)
}

impl BspData {
    fn from_lumps(mut lumps: Lumps, empty_leaf: usize, file_size: usize) -> BspData {
        let box_layout = append_box_hull(&mut lumps, empty_leaf);
        let area_state = AreaState::new(lumps.areas.len(), lumps.area_portals.len());

        let mut bsp = BspData {
            planes: lumps.planes.into_boxed_slice(),
            nodes: lumps.nodes.into_boxed_slice(),
            leaves: lumps.leaves.into_boxed_slice(),
            leaf_brushes: lumps.leaf_brushes.into_boxed_slice(),
            brushes: lumps.brushes.into_boxed_slice(),
            brush_sides: lumps.brush_sides.into_boxed_slice(),
            surfaces: lumps.surfaces.into_boxed_slice(),
            models: lumps.models.into_boxed_slice(),
            areas: lumps.areas.into_boxed_slice(),
            area_portals: lumps.area_portals.into_boxed_slice(),
            visibility: lumps.visibility,
            cluster_count: lumps.cluster_count,
            entities: lumps.entities.into_boxed_slice(),
            box_layout,
            empty_leaf,
            area_state,
            config: Config::default(),
            stats: BspStats::default(),
            file_size,
        };

        bsp.flood_area_connections();
        bsp
    }

    /// Returns a model with no level loaded, as used for demo playback.
    ///
    /// It has a single empty leaf in cluster 0 and area 0 with no visibility data. The box hull
    /// is still available.
    pub fn empty() -> BspData {
        let mut lumps = Lumps::default();
        lumps.leaves.push(BspLeaf {
            contents: Contents::empty(),
            cluster: Some(0),
            area: 0,
            leaf_brush_id: 0,
            leaf_brush_count: 0,
        });
        lumps.areas.push(BspArea {
            portal_id: 0,
            portal_count: 0,
        });
        lumps.models.push(BspModel {
            min: Vector3::new(0.0, 0.0, 0.0),
            max: Vector3::new(0.0, 0.0, 0.0),
            origin: Vector3::new(0.0, 0.0, 0.0),
            head_node: BspNodeChild::Leaf(0),
        });
        lumps.cluster_count = 1;

        BspData::from_lumps(lumps, 0, 0)
    }
}
