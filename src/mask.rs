// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Protect and remove masks
//!
//! A mask is a single-channel image the same size as the image being
//! carved.  Any non-zero sample is "on", whatever its magnitude.  The
//! two masks ride along with the image through every seam edit so
//! that they keep describing the same pixels.

use crate::error::SeamError;
use crate::flipper::transpose;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use itertools::iproduct;
use std::str::FromStr;

/// Is the mask sample at `(x, y)` switched on?
#[inline]
pub fn is_active(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y)[0] != 0
}

/// The optional pair of masks attached to a carving session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Masks {
    pub protect: Option<GrayImage>,
    pub remove: Option<GrayImage>,
}

impl Masks {
    pub fn new(protect: Option<GrayImage>, remove: Option<GrayImage>) -> Self {
        Masks { protect, remove }
    }

    /// No bias at all.
    pub fn none() -> Self {
        Masks::default()
    }

    pub fn is_protected(&self, x: u32, y: u32) -> bool {
        self.protect
            .as_ref()
            .map_or(false, |mask| is_active(mask, x, y))
    }

    pub fn is_removed(&self, x: u32, y: u32) -> bool {
        self.remove
            .as_ref()
            .map_or(false, |mask| is_active(mask, x, y))
    }

    /// Apply the same edit to every mask that is present.
    pub fn map<F>(&self, mut edit: F) -> Masks
    where
        F: FnMut(&GrayImage) -> GrayImage,
    {
        Masks {
            protect: self.protect.as_ref().map(|mask| edit(mask)),
            remove: self.remove.as_ref().map(|mask| edit(mask)),
        }
    }

    pub fn transpose(&self) -> Masks {
        self.map(|mask| transpose(mask))
    }
}

/// Resample a mask to `width`x`height` if it isn't already that size.
/// Bilinear, so the edges of the masked area go soft; anything that
/// isn't exactly zero afterwards still counts as on.
pub fn fit_mask(mask: GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.dimensions() == (width, height) {
        return mask;
    }
    imageops::resize(&mask, width, height, FilterType::Triangle)
}

/// An axis-aligned rectangle, as produced by an external region
/// (face, object) detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow by a fifth of the rectangle's size on every side, then
    /// clip to a `bound_width`x`bound_height` image.
    pub fn expanded(&self, bound_width: u32, bound_height: u32) -> Region {
        let grow_x = (f64::from(self.width) * 0.2) as u32;
        let grow_y = (f64::from(self.height) * 0.2) as u32;
        let x = self.x.saturating_sub(grow_x);
        let y = self.y.saturating_sub(grow_y);
        Region {
            x,
            y,
            width: (self.width + 2 * grow_x).min(bound_width.saturating_sub(x)),
            height: (self.height + 2 * grow_y).min(bound_height.saturating_sub(y)),
        }
    }
}

impl FromStr for Region {
    type Err = SeamError;

    /// Parses `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(',')
            .map(|f| f.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SeamError::BadRegion(s.to_string()))?;
        match fields.as_slice() {
            [x, y, width, height] => Ok(Region::new(*x, *y, *width, *height)),
            _ => Err(SeamError::BadRegion(s.to_string())),
        }
    }
}

/// Paint every region, expanded and clipped, white onto a black
/// `width`x`height` mask.
pub fn region_mask(width: u32, height: u32, regions: &[Region]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for region in regions {
        let r = region.expanded(width, height);
        if r.x >= width || r.y >= height {
            continue;
        }
        for (y, x) in iproduct!(r.y..r.y + r.height, r.x..r.x + r.width) {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// A mask that is on wherever either input is on.  Both masks must
/// be the same size.
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        Luma([a.get_pixel(x, y)[0].max(b.get_pixel(x, y)[0])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_nonzero_sample_is_active() {
        let mut mask = GrayImage::new(3, 1);
        mask.put_pixel(1, 0, Luma([1]));
        mask.put_pixel(2, 0, Luma([255]));
        assert!(!is_active(&mask, 0, 0));
        assert!(is_active(&mask, 1, 0));
        assert!(is_active(&mask, 2, 0));
    }

    #[test]
    fn absent_masks_bias_nothing() {
        let masks = Masks::none();
        assert!(!masks.is_protected(0, 0));
        assert!(!masks.is_removed(0, 0));
    }

    #[test]
    fn fit_mask_resamples_only_on_mismatch() {
        let mask = GrayImage::from_pixel(4, 4, Luma([255]));
        let same = fit_mask(mask.clone(), 4, 4);
        assert_eq!(same, mask);
        let resized = fit_mask(mask, 8, 6);
        assert_eq!(resized.dimensions(), (8, 6));
        assert!(resized.pixels().all(|p| p[0] > 0));
    }

    #[test]
    fn region_parses_from_four_fields() {
        assert_eq!("1,2,3,4".parse::<Region>().unwrap(), Region::new(1, 2, 3, 4));
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("1,2,x,4".parse::<Region>().is_err());
    }

    #[test]
    fn regions_grow_twenty_percent_and_clip() {
        let r = Region::new(10, 10, 10, 5).expanded(100, 100);
        assert_eq!(r, Region::new(8, 9, 14, 7));
        let edge = Region::new(1, 0, 10, 10).expanded(12, 12);
        assert_eq!(edge, Region::new(0, 0, 12, 12));
    }

    #[test]
    fn union_keeps_both_masks() {
        let left = region_mask(10, 10, &[Region::new(0, 0, 2, 2)]);
        let right = region_mask(10, 10, &[Region::new(7, 7, 2, 2)]);
        let both = union(&left, &right);
        assert!(is_active(&both, 0, 0));
        assert!(is_active(&both, 8, 8));
        assert!(!is_active(&both, 5, 5));
    }

    #[test]
    fn region_mask_fills_expanded_rectangles() {
        let mask = region_mask(20, 20, &[Region::new(5, 5, 5, 5)]);
        assert!(is_active(&mask, 4, 4));
        assert!(is_active(&mask, 10, 10));
        assert!(!is_active(&mask, 3, 3));
        assert!(!is_active(&mask, 11, 11));
    }
}
