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
    fmt::{self, Display},
    io,
};

use crate::bsp::load::BspLumpId;

use failure::{Backtrace, Context, Fail};

#[derive(Debug)]
pub struct BspError {
    inner: Context<BspErrorKind>,
}

impl BspError {
    pub fn kind(&self) -> BspErrorKind {
        self.inner.get_context().clone()
    }
}

impl From<BspErrorKind> for BspError {
    fn from(kind: BspErrorKind) -> Self {
        BspError {
            inner: Context::new(kind),
        }
    }
}

impl From<Context<BspErrorKind>> for BspError {
    fn from(inner: Context<BspErrorKind>) -> Self {
        BspError { inner }
    }
}

impl From<io::Error> for BspError {
    fn from(e: io::Error) -> Self {
        BspError {
            inner: e.context(BspErrorKind::Io),
        }
    }
}

impl Fail for BspError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl Display for BspError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum BspErrorKind {
    #[fail(display = "I/O error")]
    Io,
    #[fail(display = "Bad file identifier: {:#010x}", ident)]
    BadMagic { ident: i32 },
    #[fail(display = "Unsupported BSP version: {}", version)]
    UnsupportedVersion { version: i32 },
    #[fail(
        display = "{:?} lump out of bounds (offset {}, size {}, file size {})",
        lump, offset, size, file_size
    )]
    LumpOutOfBounds {
        lump: BspLumpId,
        offset: i32,
        size: i32,
        file_size: usize,
    },
    #[fail(
        display = "{:?} lump size {} is not a multiple of record size {}",
        lump, size, record_size
    )]
    BadLumpSize {
        lump: BspLumpId,
        size: usize,
        record_size: usize,
    },
    #[fail(display = "Too many {}: {} (max {})", what, count, max)]
    TooMany {
        what: &'static str,
        count: usize,
        max: usize,
    },
    #[fail(display = "Map with no {}", what)]
    Missing { what: &'static str },
    #[fail(display = "Bad {} index {} (count {})", what, index, count)]
    BadIndex {
        what: &'static str,
        index: i64,
        count: usize,
    },
    #[fail(display = "Plane {} has unknown type {}", plane, kind)]
    BadPlaneType { plane: usize, kind: i32 },
    #[fail(display = "Leaf 0 is not CONTENTS_SOLID")]
    BadLeafZero,
    #[fail(display = "Map does not have an empty leaf")]
    NoEmptyLeaf,
    #[fail(display = "Not enough room for box tree")]
    NoBoxHullRoom,
    #[fail(display = "Bad visibility data: {}", reason)]
    BadVisibility { reason: String },
    #[fail(display = "Bad inline model name: {}", name)]
    BadModelName { name: String },
}
