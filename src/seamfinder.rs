// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through an energy map
//!
//! The classic dynamic program: every pixel's cost is its own energy
//! plus the cheapest of the (up to) three pixels above it that could
//! lead to it.  The cheapest cell in the last row is the end of the
//! seam; the back pointers lead home.
//!
//! Only the vertical search is written out.  A horizontal seam is a
//! vertical seam through the flipped image.

use crate::energy::{calculate_energy, EnergyMap};
use crate::flipper::Flipper;
use crate::mask::Masks;
use crate::twodmap::{EnergyAndBackPointer, TwoDimensionalMap};
use image::{GenericImageView, Pixel, Primitive};
use std::cmp::Ordering;

/// This trait defines how we will return seams from an image.  It's a
/// primitive interface, just enough to make room for alternative
/// energy functions behind the same carving loop.
pub trait SeamFinder {
    /// One x-coordinate per row, top to bottom.
    fn find_vertical_seam(&self) -> Vec<u32>;

    /// One y-coordinate per column, left to right.
    fn find_horizontal_seam(&self) -> Vec<u32>;
}

/// Given an energy map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for
/// each pixel in the cheapest 8-connected top-to-bottom seam.
///
/// Ties are settled the same way every time: straight down beats
/// down-left beats down-right, and among equally cheap seam ends the
/// leftmost wins.
pub fn energy_to_vertical_seam(energy: &EnergyMap) -> Vec<u32> {
    let (width, height) = energy.dimensions();
    let mut target: TwoDimensionalMap<EnergyAndBackPointer<f64>> =
        TwoDimensionalMap::new(width, height);

    // Populate the first row with their native energies.
    for x in 0..width {
        target[(x, 0)] = EnergyAndBackPointer {
            energy: energy[(x, 0)],
            parent: x,
        };
    }

    let maxwidth = width - 1;
    for y in 1..height {
        for x in 0..width {
            let mut parent = x;
            let mut cheapest = target[(x, y - 1)].energy;
            if x > 0 && target[(x - 1, y - 1)].energy < cheapest {
                parent = x - 1;
                cheapest = target[(parent, y - 1)].energy;
            }
            if x < maxwidth && target[(x + 1, y - 1)].energy < cheapest {
                parent = x + 1;
                cheapest = target[(parent, y - 1)].energy;
            }
            target[(x, y)] = EnergyAndBackPointer {
                energy: energy[(x, y)] + cheapest,
                parent,
            };
        }
    }

    // min_by keeps the first of several equal minima.
    let mut seam_col = (0..width)
        .min_by(|a, b| {
            target[(*a, height - 1)]
                .energy
                .partial_cmp(&target[(*b, height - 1)].energy)
                .unwrap_or(Ordering::Equal)
        })
        .unwrap_or(0);

    // Working backwards, generate a vec of x coordinates that map to
    // the seam, reverse and return.
    (0..height)
        .rev()
        .fold(Vec::<u32>::with_capacity(height as usize), |mut acc, y| {
            acc.push(seam_col);
            seam_col = target[(seam_col, y)].parent;
            acc
        })
        .into_iter()
        .rev()
        .collect()
}

/// Given an energy map, return the list of y-coordinates, one per
/// column, of the cheapest left-to-right seam.
pub fn energy_to_horizontal_seam(energy: &EnergyMap) -> Vec<u32> {
    energy_to_vertical_seam(&energy.transpose())
}

/// The gradient seam engine: a borrowed image and its masks.  Every
/// request recomputes the energy from whatever the image holds now.
pub struct GradientSeams<'a, I: GenericImageView> {
    pub image: &'a I,
    pub masks: &'a Masks,
}

impl<'a, I: GenericImageView> GradientSeams<'a, I> {
    pub fn new(image: &'a I, masks: &'a Masks) -> Self {
        GradientSeams { image, masks }
    }
}

impl<'a, I, P, S> SeamFinder for GradientSeams<'a, I>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    fn find_vertical_seam(&self) -> Vec<u32> {
        energy_to_vertical_seam(&calculate_energy(self.image, self.masks))
    }

    // The image is only viewed through the flipper; the masks are
    // flipped into scratch copies.  Nothing borrowed is touched.
    fn find_horizontal_seam(&self) -> Vec<u32> {
        let masks = self.masks.transpose();
        energy_to_vertical_seam(&calculate_energy(&Flipper::new(self.image), &masks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::MAX_ENERGY;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    const ENERGY_DATA: [f64; 20] = [
        9., 9., 0., 9., 9., 9., 1., 9., 8., 9., 9., 9., 9., 9., 0., 9., 9., 9., 0., 9.,
    ];

    fn energies() -> EnergyMap {
        TwoDimensionalMap::from_raw(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    // Deterministic noise, good enough to shake out connectivity bugs.
    fn noise(width: u32, height: u32, seed: u64) -> EnergyMap {
        let mut state = seed;
        TwoDimensionalMap::from_fn(width, height, |_, _| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 256) as f64
        })
    }

    fn assert_legal(seam: &[u32], width: u32, height: u32) {
        assert_eq!(seam.len(), height as usize);
        assert!(seam.iter().all(|&x| x < width));
        assert!(seam
            .windows(2)
            .all(|w| (i64::from(w[0]) - i64::from(w[1])).abs() <= 1));
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        assert_eq!(energy_to_vertical_seam(&energies()), [2, 3, 4, 3]);
    }

    #[test]
    fn energy_grid_to_horizontal_seam() {
        assert_eq!(energy_to_horizontal_seam(&energies()), [1, 1, 0, 1, 2]);
    }

    #[test]
    fn flat_map_gives_leftmost_straight_seam() {
        let flat = EnergyMap::new(10, 10);
        assert_eq!(energy_to_vertical_seam(&flat), vec![0; 10]);
    }

    #[test]
    fn straight_down_wins_ties() {
        // Every column costs the same, but the cheapest end is in
        // column 2, so the seam must stay there.
        let mut map = EnergyMap::new(5, 4);
        map[(2, 3)] = -1.0;
        assert_eq!(energy_to_vertical_seam(&map), [2, 2, 2, 2]);
    }

    #[test]
    fn down_left_beats_down_right() {
        let mut map = EnergyMap::from_fn(3, 2, |_, _| 5.0);
        map[(0, 0)] = 1.0;
        map[(2, 0)] = 1.0;
        map[(1, 1)] = 0.0;
        assert_eq!(energy_to_vertical_seam(&map), [0, 1]);
    }

    #[test]
    fn degenerate_maps_give_trivial_seams() {
        assert_eq!(energy_to_vertical_seam(&EnergyMap::new(1, 4)), [0, 0, 0, 0]);
        let mut row = EnergyMap::from_fn(4, 1, |x, _| f64::from(4 - x));
        row[(0, 0)] = 7.0;
        assert_eq!(energy_to_vertical_seam(&row), [3]);
    }

    #[test]
    fn seams_are_always_connected_and_in_bounds() {
        for (i, (width, height)) in [(1, 9), (2, 2), (9, 1), (17, 11), (40, 30)]
            .iter()
            .enumerate()
        {
            let map = noise(*width, *height, i as u64 + 7);
            assert_legal(&energy_to_vertical_seam(&map), *width, *height);
            assert_legal(&energy_to_horizontal_seam(&map), *height, *width);
        }
    }

    #[test]
    fn seams_route_around_protected_pixels() {
        let mut map = EnergyMap::new(4, 4);
        for y in 0..4 {
            map[(0, y)] = MAX_ENERGY;
        }
        let seam = energy_to_vertical_seam(&map);
        assert!(seam.iter().all(|&x| x != 0));
    }

    #[test]
    fn gradient_seams_follow_the_remove_mask() {
        let image = RgbImage::from_pixel(6, 5, Rgb([40, 40, 40]));
        let mut remove = GrayImage::new(6, 5);
        for y in 0..5 {
            remove.put_pixel(4, y, Luma([255]));
        }
        let masks = Masks::new(None, Some(remove));
        let finder = GradientSeams::new(&image, &masks);
        assert_eq!(finder.find_vertical_seam(), vec![4; 5]);
    }

    #[test]
    fn horizontal_search_leaves_its_inputs_alone() {
        let image = RgbImage::from_fn(6, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 0]));
        let mut protect = GrayImage::new(6, 4);
        protect.put_pixel(2, 1, Luma([255]));
        let masks = Masks::new(Some(protect), None);
        let (image_before, masks_before) = (image.clone(), masks.clone());

        let finder = GradientSeams::new(&image, &masks);
        let seam = finder.find_horizontal_seam();
        assert_legal(&seam, 4, 6);
        assert_ne!(seam[2], 1);
        assert_eq!(image, image_before);
        assert_eq!(masks, masks_before);
    }
}
