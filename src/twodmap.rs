// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A two-dimensional grid of plain values.
//!
//! Used for everything that is not an image: the energy map, the
//! dynamic-programming cost table, and the column-index map that
//! tracks where each scratch pixel lived in the original image while
//! seams are being discovered for insertion.

use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of `P`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    pub width: u32,
    pub height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// A new map filled with `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wraps an existing row-major vector.  Returns `None` if the
    /// vector is the wrong length for the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<P>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Builds a map by evaluating `f(x, y)` at every address.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        TwoDimensionalMap {
            width,
            height,
            data,
        }
    }

    // Keep the index math in one place and never, ever mess with it.
    // Same layout as image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The raw row-major samples.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// One row as a slice.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Swaps the axes: `(x, y)` in the result is `(y, x)` here.
    pub fn transpose(&self) -> Self {
        TwoDimensionalMap::from_fn(self.height, self.width, |x, y| self[(y, x)])
    }

    /// A copy of this map, one column narrower, with the cell at
    /// `(seam[y], y)` dropped from every row.
    pub fn without_vertical_seam(&self, seam: &[u32]) -> Self {
        let mut data = Vec::with_capacity(self.data.len() - self.height as usize);
        for y in 0..self.height {
            let skip = seam[y as usize] as usize;
            data.extend(
                self.row(y)
                    .iter()
                    .enumerate()
                    .filter(|(x, _)| *x != skip)
                    .map(|(_, p)| *p),
            );
        }
        TwoDimensionalMap {
            width: self.width - 1,
            height: self.height,
            data,
        }
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// One cell of the seam digraph: the accumulated cost of the cheapest
/// path reaching this pixel, and the column it came from in the row
/// above.
#[derive(Default, Debug, Copy, Clone)]
pub(crate) struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: u32,
}
