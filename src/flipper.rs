// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image dimensional flipper
//!
//! A proxy for the ImageRS `GenericImageView` trait that maps the
//! width to the original height, and vice versa, as well as every x
//! to y and vice versa.
//!
//! Every horizontal-seam operation in this crate is a vertical-seam
//! operation on a flipped image.  The seam finder and editor are only
//! ever written once, for columns; rows come along for free by
//! flipping on the way in and flipping again on the way out.

use image::{GenericImageView, ImageBuffer, Pixel, Primitive};

pub struct Flipper<'a, I: GenericImageView> {
    pub image: &'a I,
}

impl<'a, I: GenericImageView> Flipper<'a, I> {
    pub fn new(image: &'a I) -> Self {
        Flipper { image }
    }
}

impl<'a, I: GenericImageView> GenericImageView for Flipper<'a, I> {
    type Pixel = I::Pixel;
    type InnerImageView = I;

    fn dimensions(&self) -> (u32, u32) {
        let (x, y) = self.image.dimensions();
        (y, x)
    }

    fn width(&self) -> u32 {
        self.image.height()
    }

    fn height(&self) -> u32 {
        self.image.width()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        self.image.get_pixel(y, x)
    }

    fn inner(&self) -> &Self::InnerImageView {
        self.image
    }

    fn bounds(&self) -> (u32, u32, u32, u32) {
        let (x1, y1, x2, y2) = self.image.bounds();
        (y1, x1, y2, x2)
    }
}

/// Materialize the flipped view into a fresh buffer.  Applying this
/// twice yields a buffer equal to the original.
pub fn transpose<I, P, S>(image: &I) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let flipped = Flipper::new(image);
    let (width, height) = flipped.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| flipped.get_pixel(x, y))
}
