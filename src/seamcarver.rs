// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! Width first, then height.  Shrinking an axis by n is n rounds of
//! find-the-cheapest-seam-and-cut-it, each against the image as the
//! previous round left it.  Growing an axis by n finds n seams on the
//! unmodified image and inserts them all at once, so the new content
//! is spread across the image instead of piling up in one valley.
//!
//! Each round is a plain function from (image, masks) to a new
//! (image, masks); a whole axis is a fold over those rounds.

use crate::cq;
use crate::error::{Result, SeamError};
use crate::mask::{fit_mask, Masks};
use crate::seameditor::{
    blank_horizontal_seams, blank_vertical_seams, discover_horizontal_seams,
    discover_vertical_seams, insert_horizontal_seams, insert_vertical_seams,
    remove_horizontal_seam, remove_vertical_seam,
};
use crate::seamfinder::{GradientSeams, SeamFinder};
use image::{ImageBuffer, Pixel, Primitive};
use log::{debug, info};
use std::convert::TryFrom;

/// Which dimension a round of carving changes.  Width is changed by
/// vertical seams, height by horizontal ones.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Carve {
    Width,
    Height,
}

impl Carve {
    fn extent<P, S>(self, image: &ImageBuffer<P, Vec<S>>) -> u32
    where
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        cq!(self == Carve::Width, image.width(), image.height())
    }

    fn name(self) -> &'static str {
        cq!(self == Carve::Width, "width", "height")
    }
}

/// The outcome of a carve: the new image, its masks, and how many
/// seams went through each axis.
#[derive(Debug)]
pub struct Carved<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    pub image: ImageBuffer<P, Vec<S>>,
    pub masks: Masks,
    pub vertical_seams: u32,
    pub horizontal_seams: u32,
}

type Session<P, S> = (ImageBuffer<P, Vec<S>>, Masks);

// Find and cut one seam.
fn carve_once<P, S>((image, masks): Session<P, S>, direction: Carve) -> Session<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let finder = GradientSeams::new(&image, &masks);
    match direction {
        Carve::Width => {
            let seam = finder.find_vertical_seam();
            debug!("removing vertical seam ending at column {:?}", seam.last());
            let masks = masks.map(|mask| remove_vertical_seam(mask, &seam));
            (remove_vertical_seam(&image, &seam), masks)
        }
        Carve::Height => {
            let seam = finder.find_horizontal_seam();
            debug!("removing horizontal seam ending at row {:?}", seam.last());
            let masks = masks.map(|mask| remove_horizontal_seam(mask, &seam));
            (remove_horizontal_seam(&image, &seam), masks)
        }
    }
}

// Find `count` seams on the current image and insert them together.
// Discovery can't find more seams than the axis has pixels, so a
// large request goes in rounds, each at most as big as the axis is
// at the start of that round.
fn grow<P, S>(session: Session<P, S>, direction: Carve, count: u32) -> Session<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (mut image, mut masks) = session;
    let mut remaining = count;
    while remaining > 0 {
        let batch = remaining.min(direction.extent(&image));
        debug!("inserting {} seams along the {}", batch, direction.name());
        let (grown, grown_masks) = match direction {
            Carve::Width => {
                let seams = discover_vertical_seams(&image, &masks, batch);
                let masks = masks.map(|mask| blank_vertical_seams(mask, &seams));
                (insert_vertical_seams(&image, &seams), masks)
            }
            Carve::Height => {
                let seams = discover_horizontal_seams(&image, &masks, batch);
                let masks = masks.map(|mask| blank_horizontal_seams(mask, &seams));
                (insert_horizontal_seams(&image, &seams), masks)
            }
        };
        image = grown;
        masks = grown_masks;
        remaining -= batch;
    }
    (image, masks)
}

// Bring one axis to `target`.
fn carve_axis<P, S>(session: Session<P, S>, direction: Carve, target: u32) -> (Session<P, S>, u32)
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let current = direction.extent(&session.0);
    if target < current {
        let count = current - target;
        info!("Reducing {} by {} pixels...", direction.name(), count);
        let session = (0..count).fold(session, |session, _| carve_once(session, direction));
        (session, count)
    } else if target > current {
        let count = target - current;
        info!("Expanding {} by {} pixels...", direction.name(), count);
        (grow(session, direction, count), count)
    } else {
        (session, 0)
    }
}

/// A carving session: the image, and the masks that follow it
/// through every edit.
pub struct SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: ImageBuffer<P, Vec<S>>,
    masks: Masks,
}

impl<P, S> SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Creates a new SeamCarver with an image to be carved.  Any mask
    /// that isn't the image's size is resampled until it is.
    pub fn new(image: ImageBuffer<P, Vec<S>>, masks: Masks) -> Self {
        let (width, height) = image.dimensions();
        let masks = Masks {
            protect: masks.protect.map(|mask| fit_mask(mask, width, height)),
            remove: masks.remove.map(|mask| fit_mask(mask, width, height)),
        };
        SeamCarver { image, masks }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    /// Carve or grow the image to `new_width`x`new_height`, width
    /// first.  Both targets must be at least 1.  Asking for the
    /// current size does nothing and hands the image straight back.
    pub fn carve(self, new_width: i64, new_height: i64) -> Result<Carved<P, S>> {
        let invalid = || SeamError::InvalidTargetSize {
            width: new_width,
            height: new_height,
        };
        let target_width = u32::try_from(new_width).map_err(|_| invalid())?;
        let target_height = u32::try_from(new_height).map_err(|_| invalid())?;
        if target_width == 0 || target_height == 0 {
            return Err(invalid());
        }
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(SeamError::EmptyImage { width, height });
        }

        let session = (self.image, self.masks);
        let (session, vertical_seams) = carve_axis(session, Carve::Width, target_width);
        let (session, horizontal_seams) = carve_axis(session, Carve::Height, target_height);
        let (image, masks) = session;

        info!(
            "Resize complete. New dimensions: {}x{}",
            image.width(),
            image.height()
        );
        Ok(Carved {
            image,
            masks,
            vertical_seams,
            horizontal_seams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 23 % 256) as u8, (y * 41 % 256) as u8, ((x + y) * 7 % 256) as u8])
        })
    }

    #[test]
    fn negative_and_zero_targets_are_rejected() {
        for &(w, h) in &[(-1, 5), (5, -3), (0, 5), (5, 0)] {
            let carver = SeamCarver::new(gradient(5, 5), Masks::none());
            match carver.carve(w, h) {
                Err(SeamError::InvalidTargetSize { width, height }) => {
                    assert_eq!((width, height), (w, h))
                }
                other => panic!("expected InvalidTargetSize, got {:?}", other.map(|c| c.image.dimensions())),
            }
        }
    }

    #[test]
    fn same_size_is_a_no_op() {
        let image = gradient(7, 6);
        let carved = SeamCarver::new(image.clone(), Masks::none())
            .carve(7, 6)
            .unwrap();
        assert_eq!(carved.image, image);
        assert_eq!((carved.vertical_seams, carved.horizontal_seams), (0, 0));
    }

    #[test]
    fn shrinking_moves_masks_in_lockstep() {
        let protect = GrayImage::from_fn(9, 8, |x, _| Luma([cq!(x == 4, 255, 0)]));
        let remove = GrayImage::from_fn(9, 8, |_, y| Luma([cq!(y == 2, 255, 0)]));
        let carver = SeamCarver::new(gradient(9, 8), Masks::new(Some(protect), Some(remove)));
        let carved = carver.carve(6, 5).unwrap();
        assert_eq!(carved.image.dimensions(), (6, 5));
        assert_eq!(carved.masks.protect.as_ref().unwrap().dimensions(), (6, 5));
        assert_eq!(carved.masks.remove.as_ref().unwrap().dimensions(), (6, 5));
        assert_eq!((carved.vertical_seams, carved.horizontal_seams), (3, 3));
    }

    #[test]
    fn growing_keeps_masks_aligned_and_blank() {
        let protect = GrayImage::from_pixel(4, 4, Luma([255]));
        let carver = SeamCarver::new(gradient(4, 4), Masks::new(Some(protect), None));
        let carved = carver.carve(6, 5).unwrap();
        assert_eq!(carved.image.dimensions(), (6, 5));
        let protect = carved.masks.protect.unwrap();
        assert_eq!(protect.dimensions(), (6, 5));
        // Two inserted columns and one inserted row, all blank.
        let blank = protect.pixels().filter(|p| p[0] == 0).count();
        assert_eq!(blank, 6 * 5 - 4 * 4);
    }

    #[test]
    fn growing_past_the_current_size_goes_in_rounds() {
        let carved = SeamCarver::new(gradient(3, 2), Masks::none())
            .carve(10, 7)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (10, 7));
        assert_eq!((carved.vertical_seams, carved.horizontal_seams), (7, 5));
    }

    #[test]
    fn single_pixel_images_can_be_carved_and_grown() {
        let carved = SeamCarver::new(gradient(1, 1), Masks::none())
            .carve(3, 2)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (3, 2));
        let carved = SeamCarver::new(gradient(5, 1), Masks::none())
            .carve(1, 1)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (1, 1));
    }

    #[test]
    fn mismatched_masks_are_resampled() {
        let protect = GrayImage::from_pixel(3, 3, Luma([255]));
        let carver = SeamCarver::new(gradient(6, 6), Masks::new(Some(protect), None));
        assert_eq!(carver.dimensions(), (6, 6));
        assert_eq!(carver.masks().protect.as_ref().unwrap().dimensions(), (6, 6));
    }
}
