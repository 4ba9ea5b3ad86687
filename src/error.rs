// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong around a carve.
//!
//! The carve itself cannot fail once it has a legal image and a
//! legal target; every variant here belongs either to the loading
//! stage, the saving stage, or request validation.  `MaskLoad` is
//! produced by the loader but is never fatal: the caller logs it and
//! carries on without that mask.

use failure::Fail;
use image::ImageError;

#[derive(Debug, Fail)]
pub enum SeamError {
    #[fail(display = "could not load image {}: {}", path, err)]
    Load {
        path: String,
        #[fail(cause)]
        err: ImageError,
    },

    #[fail(display = "could not load mask {}: {}", path, err)]
    MaskLoad {
        path: String,
        #[fail(cause)]
        err: ImageError,
    },

    #[fail(
        display = "target size {}x{} is invalid: both dimensions must be at least 1",
        width, height
    )]
    InvalidTargetSize { width: i64, height: i64 },

    #[fail(display = "cannot carve an empty {}x{} image", width, height)]
    EmptyImage { width: u32, height: u32 },

    #[fail(display = "could not save image to {}: {}", path, err)]
    Save {
        path: String,
        #[fail(cause)]
        err: ImageError,
    },

    #[fail(display = "bad region {:?}: expected x,y,width,height", _0)]
    BadRegion(String),
}

pub type Result<T> = std::result::Result<T, SeamError>;
