// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam removal and insertion
//!
//! Every edit builds a fresh buffer; nothing is shifted in place.  The
//! functions are generic on the pixel type, so the same seam goes
//! through the colour image and through each greyscale mask and the
//! three stay aligned.
//!
//! The horizontal variants flip, do the vertical thing, and flip back.

use crate::cq;
use crate::flipper::{transpose, Flipper};
use crate::mask::Masks;
use crate::seamfinder::{GradientSeams, SeamFinder};
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, GrayImage, ImageBuffer, Luma, Pixel, Primitive};
use log::trace;
use num_traits::{NumCast, ToPrimitive};

/// A copy of the image one column narrower: in row `y` the pixel at
/// `seam[y]` is gone and everything to its right moves over.
pub fn remove_vertical_seam<I, P, S>(image: &I, seam: &[u32]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    ImageBuffer::from_fn(width - 1, height, |x, y| {
        let skip = seam[y as usize];
        image.get_pixel(cq!(x < skip, x, x + 1), y)
    })
}

/// A copy of the image one row shorter: in column `x` the pixel at
/// `seam[x]` is gone and everything below it moves up.
pub fn remove_horizontal_seam<I, P, S>(image: &I, seam: &[u32]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    transpose(&remove_vertical_seam(&Flipper::new(image), seam))
}

// The rounded channel-by-channel mean of two pixels.
fn blend<P, S>(left: &P, right: &P) -> P
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    left.map2(right, |a, b| {
        let mean = (a.to_f64().unwrap_or(0.0) + b.to_f64().unwrap_or(0.0)) / 2.0;
        <S as NumCast>::from(mean.round()).unwrap_or(a)
    })
}

// Walk each row left to right, copying the original pixels.  Right
// after a pixel whose column appears in one of the seams, emit one
// synthesized pixel per occurrence.  `synthesize` gets the seam pixel
// and its right-hand neighbour, if there is one.
fn insert_vertical_seams_with<I, P, S, F>(
    image: &I,
    seams: &[Vec<u32>],
    mut synthesize: F,
) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
    F: FnMut(&P, Option<&P>) -> P,
{
    let (width, height) = image.dimensions();
    let mut imgbuf = ImageBuffer::new(width + seams.len() as u32, height);
    for y in 0..height {
        let mut columns: Vec<u32> = seams.iter().map(|seam| seam[y as usize]).collect();
        columns.sort_unstable();
        let mut pending = columns.into_iter().peekable();
        let mut out = 0;
        for x in 0..width {
            let pixel = image.get_pixel(x, y);
            imgbuf.put_pixel(out, y, pixel);
            out += 1;
            while pending.peek() == Some(&x) {
                pending.next();
                let right = cq!(x + 1 < width, Some(image.get_pixel(x + 1, y)), None);
                imgbuf.put_pixel(out, y, synthesize(&pixel, right.as_ref()));
                out += 1;
            }
        }
    }
    imgbuf
}

/// Widen the image by one column per seam.  The seams must all be in
/// the coordinates of `image`, as `discover_vertical_seams` returns
/// them.  Each new pixel is the mean of the seam pixel and its right
/// neighbour, or a copy of the seam pixel at the right edge.
pub fn insert_vertical_seams<I, P, S>(image: &I, seams: &[Vec<u32>]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    insert_vertical_seams_with(image, seams, |pixel, right| match right {
        Some(right) => blend(pixel, right),
        None => *pixel,
    })
}

/// Heighten the image by one row per seam, each seam being one
/// y-coordinate per column.
pub fn insert_horizontal_seams<I, P, S>(image: &I, seams: &[Vec<u32>]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    transpose(&insert_vertical_seams(&Flipper::new(image), seams))
}

/// Widen a mask the way `insert_vertical_seams` widens its image.
/// Inserted columns carry no mask information: they are always off.
pub fn blank_vertical_seams(mask: &GrayImage, seams: &[Vec<u32>]) -> GrayImage {
    insert_vertical_seams_with(mask, seams, |_, _| Luma([0]))
}

/// Heighten a mask the way `insert_horizontal_seams` heightens its
/// image, with blank rows.
pub fn blank_horizontal_seams(mask: &GrayImage, seams: &[Vec<u32>]) -> GrayImage {
    transpose(&blank_vertical_seams(&transpose(mask), seams))
}

/// Find `count` vertical seams to insert, all in the coordinates of
/// `image` and pairwise distinct in every row.
///
/// Works on a disposable copy: find the cheapest seam, record where
/// its pixels were in the original, carve it out of the copy, repeat.
/// Carving exposes the next-best seam instead of finding the same
/// one again.  `image` and `masks` are untouched.  `count` may not
/// exceed the image's width.
pub fn discover_vertical_seams<P, S>(
    image: &ImageBuffer<P, Vec<S>>,
    masks: &Masks,
    count: u32,
) -> Vec<Vec<u32>>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut scratch = image.clone();
    let mut scratch_masks = masks.clone();
    // Where each scratch pixel lives in the original.
    let mut origin = TwoDimensionalMap::from_fn(width, height, |x, _| x);
    let mut seams = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let seam = GradientSeams::new(&scratch, &scratch_masks).find_vertical_seam();
        let original: Vec<u32> = seam
            .iter()
            .enumerate()
            .map(|(y, &x)| origin[(x, y as u32)])
            .collect();
        trace!("discovered seam {:?}", original);
        seams.push(original);

        scratch = remove_vertical_seam(&scratch, &seam);
        scratch_masks = scratch_masks.map(|mask| remove_vertical_seam(mask, &seam));
        origin = origin.without_vertical_seam(&seam);
    }
    seams
}

/// Find `count` horizontal seams to insert, in the coordinates of
/// `image`.  `count` may not exceed the image's height.
pub fn discover_horizontal_seams<P, S>(
    image: &ImageBuffer<P, Vec<S>>,
    masks: &Masks,
    count: u32,
) -> Vec<Vec<u32>>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    discover_vertical_seams(&transpose(image), &masks.transpose(), count)
}
