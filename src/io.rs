// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Getting images in and out
//!
//! A missing or broken input image stops everything.  A missing or
//! broken mask only costs the mask: it is reported and the carve goes
//! ahead without it.  A mask of the wrong size is stretched to fit.

use crate::error::{Result, SeamError};
use crate::mask::fit_mask;
use image::{GrayImage, ImageBuffer, Pixel, RgbImage};
use log::{info, warn};
use std::path::Path;

/// Decode a colour image.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)
        .map_err(|err| SeamError::Load {
            path: path.display().to_string(),
            err,
        })?
        .to_rgb8();
    info!("Image loaded: {}x{}", image.width(), image.height());
    Ok(image)
}

/// Decode a mask as greyscale, as-is.
pub fn read_mask(path: &Path) -> Result<GrayImage> {
    image::open(path)
        .map(|mask| mask.to_luma8())
        .map_err(|err| SeamError::MaskLoad {
            path: path.display().to_string(),
            err,
        })
}

/// Decode a mask for a `width`x`height` image.  Failure is logged and
/// yields `None`.  `kind` names the mask in the log.
pub fn load_mask(path: &Path, kind: &str, width: u32, height: u32) -> Option<GrayImage> {
    match read_mask(path) {
        Ok(mask) => {
            if mask.dimensions() != (width, height) {
                warn!(
                    "{} mask is {}x{} but the image is {}x{}; resizing mask",
                    kind,
                    mask.width(),
                    mask.height(),
                    width,
                    height
                );
            }
            Some(fit_mask(mask, width, height))
        }
        Err(err) => {
            warn!("{}; carrying on without a {} mask", err, kind);
            None
        }
    }
}

/// Encode an 8-bit image; the format follows the file extension.
pub fn save_image<P>(image: &ImageBuffer<P, Vec<u8>>, path: &Path) -> Result<()>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    image.save(path).map_err(|err| SeamError::Save {
        path: path.display().to_string(),
        err,
    })?;
    info!("Image saved successfully to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};
    use tempfile::tempdir;

    #[test]
    fn missing_image_is_a_load_error() {
        let dir = tempdir().unwrap();
        match load_image(&dir.path().join("nope.png")) {
            Err(SeamError::Load { .. }) => (),
            other => panic!("expected a load error, got {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn missing_mask_is_skipped() {
        let dir = tempdir().unwrap();
        assert!(load_mask(&dir.path().join("nope.png"), "protect", 4, 4).is_none());
        assert!(read_mask(&dir.path().join("nope.png")).is_err());
    }

    #[test]
    fn images_round_trip_through_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
        save_image(&image, &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), image);
    }

    #[test]
    fn masks_load_at_the_image_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mask.png");
        save_image(&GrayImage::from_pixel(2, 2, Luma([255])), &path).unwrap();
        let mask = load_mask(&path, "remove", 8, 4).unwrap();
        assert_eq!(mask.dimensions(), (8, 4));
    }

    #[test]
    fn unwritable_path_is_a_save_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.png");
        match save_image(&RgbImage::new(2, 2), &path) {
            Err(SeamError::Save { .. }) => (),
            other => panic!("expected a save error, got {:?}", other),
        }
    }
}
