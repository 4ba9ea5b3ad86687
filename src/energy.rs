// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given an image, calculate the energy map: the gradient magnitude of
//! the image's luminance under a 5x5 Sobel operator, stretched so the
//! weakest gradient in the frame is 0 and the strongest is 255.  The
//! protect and remove masks are then stamped on top, pinning their
//! pixels to energies no real gradient can reach.

use crate::cq;
use crate::mask::Masks;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, GrayImage, Luma, Pixel, Primitive};
use num_traits::ToPrimitive;

/// Per-pixel importance, the same size as the image it came from.
pub type EnergyMap = TwoDimensionalMap<f64>;

/// Energy of a protected pixel.  No seam will pay this.
pub const MAX_ENERGY: f64 = 1e9;

/// Energy of a pixel marked for removal.  Seams go out of their way
/// for this.
pub const MIN_ENERGY: f64 = -1e9;

/// Top of the normalized gradient range.
pub const ENERGY_CEILING: f64 = 255.0;

// The 5-tap Sobel pair: binomial smoothing across the gradient,
// central difference along it.
const SMOOTH: [f64; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
const DERIVE: [f64; 5] = [-1.0, -2.0, 0.0, 2.0, 1.0];

// Mirror an out-of-range index back into 0..n without repeating the
// edge sample (…, 2, 1, | 0, 1, 2, …).  A single-sample axis has
// nothing to mirror against.
fn reflect(i: i64, n: u32) -> u32 {
    let n = i64::from(n);
    if n <= 1 {
        return 0;
    }
    let mut i = i;
    while i < 0 || i >= n {
        i = cq!(i < 0, -i, 2 * n - 2 - i);
    }
    i as u32
}

fn luminance<P, S>(pixel: &P) -> f64
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    pixel.to_luma().channels()[0].to_f64().unwrap_or(0.0)
}

fn correlate_rows(map: &EnergyMap, kernel: &[f64; 5]) -> EnergyMap {
    let width = map.width;
    EnergyMap::from_fn(map.width, map.height, |x, y| {
        kernel
            .iter()
            .zip(-2i64..=2)
            .map(|(k, dx)| k * map[(reflect(i64::from(x) + dx, width), y)])
            .sum()
    })
}

fn correlate_columns(map: &EnergyMap, kernel: &[f64; 5]) -> EnergyMap {
    let height = map.height;
    EnergyMap::from_fn(map.width, map.height, |x, y| {
        kernel
            .iter()
            .zip(-2i64..=2)
            .map(|(k, dy)| k * map[(x, reflect(i64::from(y) + dy, height))])
            .sum()
    })
}

// Linear stretch onto 0..=ENERGY_CEILING.  A frame with no contrast
// at all flattens to zero.
fn normalize(map: &mut EnergyMap) {
    let (low, high) = map
        .as_slice()
        .iter()
        .fold((std::f64::INFINITY, std::f64::NEG_INFINITY), |(lo, hi), &e| {
            (lo.min(e), hi.max(e))
        });
    let range = high - low;
    let scale = cq!(range > std::f64::EPSILON, ENERGY_CEILING / range, 0.0);
    for y in 0..map.height {
        for x in 0..map.width {
            map[(x, y)] = (map[(x, y)] - low) * scale;
        }
    }
}

/// The unbiased energy of every pixel in an image: normalized Sobel
/// gradient magnitude of the luminance channel.  Generic on the image
/// type, so a `Flipper` view gets the energy of the transposed image
/// without copying it.
pub fn gradient_energy<I, P, S>(image: &I) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let luma = EnergyMap::from_fn(width, height, |x, y| luminance(&image.get_pixel(x, y)));

    let gx = correlate_columns(&correlate_rows(&luma, &DERIVE), &SMOOTH);
    let gy = correlate_columns(&correlate_rows(&luma, &SMOOTH), &DERIVE);

    let mut emap = EnergyMap::from_fn(width, height, |x, y| {
        let (dx, dy) = (gx[(x, y)], gy[(x, y)]);
        (dx * dx + dy * dy).sqrt()
    });
    normalize(&mut emap);
    emap
}

/// Stamp the masks onto an energy map.  Protection goes down first
/// and removal second, so a pixel marked in both ends up at
/// `MIN_ENERGY`: removal wins.
pub fn apply_masks(emap: &mut EnergyMap, masks: &Masks) {
    if masks.protect.is_some() {
        for y in 0..emap.height {
            for x in 0..emap.width {
                if masks.is_protected(x, y) {
                    emap[(x, y)] = MAX_ENERGY;
                }
            }
        }
    }
    if masks.remove.is_some() {
        for y in 0..emap.height {
            for x in 0..emap.width {
                if masks.is_removed(x, y) {
                    emap[(x, y)] = MIN_ENERGY;
                }
            }
        }
    }
}

/// Compute the energy of every pixel in an image, biased by whatever
/// masks are attached.  The masks must be the same size as the image.
pub fn calculate_energy<I, P, S>(image: &I, masks: &Masks) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let mut emap = gradient_energy(image);
    apply_masks(&mut emap, masks);
    emap
}

/// Render an energy map as a greyscale image.  Mask sentinels clamp
/// to black and white.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    GrayImage::from_fn(energy.width, energy.height, |x, y| {
        Luma([energy[(x, y)].max(0.0).min(ENERGY_CEILING).round() as u8])
    })
}
