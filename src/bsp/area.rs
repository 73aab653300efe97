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


use crate::bsp::{BspArea, BspAreaPortal, BspData};

#[derive(Clone, Copy, Debug, Default)]
struct AreaFlood {
    flood_num: u32,
    flood_valid: u32,
}

/// Portal open state and the connected-component labelling derived from it.
#[derive(Debug)]
pub(crate) struct AreaState {
    portal_open: Box<[bool]>,
    floods: Box<[AreaFlood]>,
    flood_valid: u32,
}

impl AreaState {
    pub fn new(area_count: usize, portal_count: usize) -> AreaState {
        AreaState {
            // portal numbers are 1-based
            portal_open: vec![false; portal_count + 1].into_boxed_slice(),
            floods: vec![AreaFlood::default(); area_count].into_boxed_slice(),
            flood_valid: 0,
        }
    }

    fn flood_area(
        &mut self,
        areas: &[BspArea],
        portals: &[BspAreaPortal],
        area_id: usize,
        flood_num: u32,
    ) {
        let flood = &mut self.floods[area_id];
        if flood.flood_valid == self.flood_valid {
            if flood.flood_num == flood_num {
                return;
            }
            panic!(
                "Area {} reflooded (flood {} over {})",
                area_id, flood_num, flood.flood_num
            );
        }

        flood.flood_num = flood_num;
        flood.flood_valid = self.flood_valid;

        let area = &areas[area_id];
        for portal in portals[area.portal_id..area.portal_id + area.portal_count].iter() {
            if self.portal_open[portal.portal_num] {
                self.flood_area(areas, portals, portal.other_area, flood_num);
            }
        }
    }
}

impl BspData {
    /// Relabels every area by the set of areas reachable from it through open portals.
    ///
    /// Area 0 is never flooded.
    pub(crate) fn flood_area_connections(&mut self) {
        let state = &mut self.area_state;
        state.flood_valid = state.flood_valid.wrapping_add(1);

        let mut flood_num = 0;
        for area_id in 1..self.areas.len() {
            if state.floods[area_id].flood_valid == state.flood_valid {
                continue;
            }

            flood_num += 1;
            state.flood_area(&self.areas, &self.area_portals, area_id, flood_num);
        }

        debug!("Flooded {} area groups", flood_num);
    }

    /// Opens or closes an area portal and recomputes area connectivity.
    ///
    /// Panics if `portal_num` exceeds the number of area portals in the level.
    pub fn set_area_portal_state(&mut self, portal_num: usize, open: bool) {
        self.check_portal(portal_num);
        self.area_state.portal_open[portal_num] = open;
        self.flood_area_connections();
    }

    /// Panics if `portal_num` exceeds the number of area portals in the level.
    pub fn area_portal_open(&self, portal_num: usize) -> bool {
        self.check_portal(portal_num);
        self.area_state.portal_open[portal_num]
    }

    fn check_portal(&self, portal_num: usize) {
        if portal_num > self.area_portals.len() {
            panic!(
                "Bad area portal {} (count {})",
                portal_num,
                self.area_portals.len()
            );
        }
    }

    fn check_area(&self, area_id: usize) {
        if area_id >= self.areas.len() {
            panic!("Bad area {} (count {})", area_id, self.areas.len());
        }
    }

    /// Returns `true` if the two areas are joined through open portals.
    pub fn areas_connected(&self, area1: usize, area2: usize) -> bool {
        if self.config.no_areas {
            return true;
        }

        self.check_area(area1);
        self.check_area(area2);

        let floods = &self.area_state.floods;
        floods[area1].flood_num == floods[area2].flood_num
    }

    /// Returns a bit row with a bit set for every area connected to `area_id`.
    ///
    /// Area 0 is treated as connected to everything.
    pub fn write_area_bits(&self, area_id: usize) -> Vec<u8> {
        let area_count = self.areas.len();
        let mut bits = vec![0; (area_count + 7) >> 3];

        if self.config.no_areas {
            for b in bits.iter_mut() {
                *b = 0xff;
            }
            return bits;
        }

        self.check_area(area_id);

        let floods = &self.area_state.floods;
        let flood_num = floods[area_id].flood_num;
        for i in 0..area_count {
            if area_id == 0 || floods[i].flood_num == flood_num {
                bits[i >> 3] |= 1 << (i & 7);
            }
        }

        bits
    }
}
