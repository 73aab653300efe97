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


use std::io::Cursor;

use crate::bsp::{BspData, BspError, BspErrorKind, BspNodeChild, HeadNode, Tree};

use byteorder::{LittleEndian, ReadBytesExt};
use cgmath::Vector3;

#[derive(Copy, Clone, Debug)]
enum VisKind {
    Pvs = 0,
    Phs = 1,
}

/// Compressed cluster visibility rows.
#[derive(Debug)]
pub(crate) struct BspVisibility {
    data: Box<[u8]>,
    offsets: Box<[[usize; 2]]>,
}

fn bad_vis(reason: String) -> BspErrorKind {
    BspErrorKind::BadVisibility { reason }
}

impl BspVisibility {
    pub fn load(data: &[u8]) -> Result<BspVisibility, BspError> {
        check!(
            data.len() >= 4,
            bad_vis(format!("lump too small ({} bytes)", data.len()))
        );

        let mut reader = Cursor::new(data);
        let cluster_count = reader.read_i32::<LittleEndian>()?;
        check!(
            cluster_count >= 0,
            bad_vis(format!("negative cluster count {}", cluster_count))
        );

        let cluster_count = cluster_count as usize;
        check!(
            4 + cluster_count * 8 <= data.len(),
            bad_vis(format!(
                "{} clusters do not fit in {} bytes",
                cluster_count,
                data.len()
            ))
        );

        let mut offsets = Vec::with_capacity(cluster_count);
        for cluster in 0..cluster_count {
            let mut pair = [0; 2];
            for ofs in pair.iter_mut() {
                let raw = reader.read_i32::<LittleEndian>()?;
                check!(
                    raw >= 0 && (raw as usize) < data.len(),
                    bad_vis(format!("cluster {} offset {} out of range", cluster, raw))
                );
                *ofs = raw as usize;
            }
            offsets.push(pair);
        }

        debug!("Visibility: {} clusters", cluster_count);

        Ok(BspVisibility {
            data: data.to_vec().into_boxed_slice(),
            offsets: offsets.into_boxed_slice(),
        })
    }

    pub fn cluster_count(&self) -> usize {
        self.offsets.len()
    }

    fn compressed(&self, cluster: usize, kind: VisKind) -> &[u8] {
        &self.data[self.offsets[cluster][kind as usize]..]
    }
}

/// Expands a run-length encoded visibility row to `row_len` bytes.
///
/// A nonzero byte is copied as-is; a zero byte is followed by a count of zero bytes to emit. Runs
/// that would overflow the row are truncated.
pub fn decompress_vis(compressed: &[u8], row_len: usize) -> Vec<u8> {
    let mut row = Vec::with_capacity(row_len);
    let mut input = compressed.iter();

    while row.len() < row_len {
        let byte = match input.next() {
            Some(&b) => b,
            None => {
                warn!("Visibility row ends early");
                break;
            }
        };

        if byte != 0 {
            row.push(byte);
            continue;
        }

        let mut count = match input.next() {
            Some(&c) => c as usize,
            None => {
                warn!("Visibility row ends early");
                break;
            }
        };

        if row.len() + count > row_len {
            warn!("Visibility decompression overrun");
            count = row_len - row.len();
        }

        row.resize(row.len() + count, 0);
    }

    row.resize(row_len, 0);
    row
}

impl<'a> Tree<'a> {
    fn child_visible(&self, child: BspNodeChild, vis: &[u8]) -> bool {
        match child {
            BspNodeChild::Leaf(l) => match self.leaf(l).cluster {
                Some(c) => vis.get(c >> 3).map_or(false, |b| b & (1 << (c & 7)) != 0),
                None => false,
            },

            BspNodeChild::Node(n) => {
                let node = self.node(n);
                self.child_visible(node.children[0], vis)
                    || self.child_visible(node.children[1], vis)
            }
        }
    }
}

impl BspData {
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the length in bytes of a visibility row.
    pub fn vis_row_len(&self) -> usize {
        (self.cluster_count + 7) >> 3
    }

    fn cluster_vis(&self, cluster: Option<usize>, kind: VisKind) -> Vec<u8> {
        let row_len = self.vis_row_len();

        let cluster = match cluster {
            Some(c) => c,
            None => return vec![0; row_len],
        };

        if cluster >= self.cluster_count {
            panic!(
                "Bad cluster {} (count {})",
                cluster, self.cluster_count
            );
        }

        match self.visibility {
            None => vec![0xff; row_len],
            Some(ref vis) => {
                let mut row = decompress_vis(vis.compressed(cluster, kind), row_len);

                // a cluster can always see itself
                row[cluster >> 3] |= 1 << (cluster & 7);
                row
            }
        }
    }

    /// Returns the potentially visible set of a cluster as a bit row.
    ///
    /// Without visibility data every cluster is visible. A leaf outside any cluster sees nothing.
    pub fn cluster_pvs(&self, cluster: Option<usize>) -> Vec<u8> {
        self.cluster_vis(cluster, VisKind::Pvs)
    }

    /// Returns the potentially hearable set of a cluster as a bit row.
    pub fn cluster_phs(&self, cluster: Option<usize>) -> Vec<u8> {
        self.cluster_vis(cluster, VisKind::Phs)
    }

    /// Returns the union of the visible sets of all clusters within `radius` of `origin`.
    ///
    /// Used to avoid dropping entities from view when the viewpoint sits close to a cluster
    /// boundary.
    pub fn fat_pvs(&self, origin: Vector3<f32>, radius: f32) -> Vec<u8> {
        let extent = Vector3::new(radius, radius, radius);
        let list = self.box_leafs(
            origin - extent,
            origin + extent,
            &self.world_head(),
            self.config.max_fat_pvs_leafs,
        );

        let mut seen = Vec::new();
        let mut row = vec![0; self.vis_row_len()];
        for &leaf_id in list.leafs().iter() {
            let cluster = self.leaf_cluster(leaf_id);
            if seen.contains(&cluster) {
                continue;
            }
            seen.push(cluster);

            for (dst, src) in row.iter_mut().zip(self.cluster_pvs(cluster)) {
                *dst |= src;
            }
        }

        row
    }

    /// Returns the distinct clusters touched by a box, or `None` if it touches more than
    /// `max_clusters` of them or more leaves than a position test would gather.
    pub fn box_clusters(
        &self,
        mins: Vector3<f32>,
        maxs: Vector3<f32>,
        max_clusters: usize,
    ) -> Option<Vec<usize>> {
        let max_leafs = self.config.max_touched_leafs;
        let list = self.box_leafs(mins, maxs, &self.world_head(), max_leafs);
        if list.leafs().len() >= max_leafs {
            return None;
        }

        let mut clusters = Vec::new();
        for &leaf_id in list.leafs().iter() {
            if let Some(c) = self.leaf_cluster(leaf_id) {
                if !clusters.contains(&c) {
                    if clusters.len() == max_clusters {
                        return None;
                    }
                    clusters.push(c);
                }
            }
        }

        Some(clusters)
    }

    /// Returns `true` if any leaf below `head` is in a cluster set in the bit row `vis`.
    pub fn headnode_visible(&self, head: &HeadNode, vis: &[u8]) -> bool {
        let tree = self.tree(head);
        tree.child_visible(tree.root, vis)
    }
}
