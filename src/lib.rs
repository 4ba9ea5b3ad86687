// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing.
//!
//! Shrinks or grows an image by removing or inserting its
//! lowest-energy seams, optionally steered by a protect mask (never
//! carve here) and a remove mask (carve here first).
//!
//! ```no_run
//! use seamcarver::{load_image, save_image, Masks, SeamCarver};
//! use std::path::Path;
//!
//! let image = load_image(Path::new("in.png")).unwrap();
//! let carved = SeamCarver::new(image, Masks::none()).carve(300, 200).unwrap();
//! save_image(&carved.image, Path::new("out.png")).unwrap();
//! ```

// #![deny(missing_docs)]

extern crate image;

mod ternary;

pub mod energy;
pub mod error;
pub mod flipper;
pub mod io;
pub mod mask;
pub mod seamcarver;
pub mod seameditor;
pub mod seamfinder;
pub mod twodmap;

pub use energy::{calculate_energy, energy_to_image, EnergyMap, MAX_ENERGY, MIN_ENERGY};
pub use error::SeamError;
pub use io::{load_image, load_mask, save_image};
pub use mask::{region_mask, Masks, Region};
pub use seamcarver::{Carve, Carved, SeamCarver};
pub use seamfinder::{energy_to_horizontal_seam, energy_to_vertical_seam, GradientSeams, SeamFinder};
