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


/// Runtime options for collision queries.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Treat every pair of areas as connected, ignoring portal state.
    pub no_areas: bool,

    /// Maximum number of leaves gathered for a position test.
    pub max_touched_leafs: usize,

    /// Maximum number of leaves gathered when building a fat PVS.
    pub max_fat_pvs_leafs: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            no_areas: false,
            max_touched_leafs: 1024,
            max_fat_pvs_leafs: 64,
        }
    }
}

impl Config {
    pub fn no_areas(mut self, no_areas: bool) -> Config {
        self.no_areas = no_areas;
        self
    }
}
