// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use seamcarver::error::Result;
use seamcarver::mask::union;
use seamcarver::{
    calculate_energy, energy_to_image, load_image, load_mask, region_mask, save_image, Masks,
    Region, SeamCarver,
};
use std::path::Path;
use std::process;

extern crate clap;

use clap::{value_t, App, Arg, ArgMatches};
use log::warn;

fn build_cli() -> App<'static, 'static> {
    App::new("seamcarver")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image resizing by seam carving")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("FILE")
                .help("The image to resize")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Where to write the result; the format follows the extension")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .value_name("PIXELS")
                .help("Target width (-1 keeps the current width)")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1"),
        )
        .arg(
            Arg::with_name("height")
                .short("h")
                .long("height")
                .value_name("PIXELS")
                .help("Target height (-1 keeps the current height)")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1"),
        )
        .arg(
            Arg::with_name("protect")
                .short("p")
                .long("protect")
                .value_name("FILE")
                .help("Mask of pixels that must not be carved")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("protect-region")
                .long("protect-region")
                .value_name("X,Y,W,H")
                .help("Rectangle to protect, grown by 20% per side (repeatable)")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("remove")
                .short("r")
                .long("remove")
                .value_name("FILE")
                .help("Mask of pixels to carve away first")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("energy")
                .short("e")
                .long("energy")
                .value_name("FILE")
                .help("Also write the energy map of the result")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("show")
                .short("s")
                .long("show")
                .help("Show the result in a window (not available in this build)"),
        )
}

// -1 means "leave this dimension alone"; any other value, negative or
// not, goes to the carver as asked.
fn target(requested: i64, current: u32) -> i64 {
    if requested == -1 {
        i64::from(current)
    } else {
        requested
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let requested_width = value_t!(matches, "width", i64).unwrap_or_else(|e| e.exit());
    let requested_height = value_t!(matches, "height", i64).unwrap_or_else(|e| e.exit());
    let regions = match matches.values_of("protect-region") {
        Some(values) => values.map(str::parse::<Region>).collect::<Result<Vec<Region>>>()?,
        None => Vec::new(),
    };

    let input = Path::new(matches.value_of("input").unwrap_or_default());
    let output = Path::new(matches.value_of("output").unwrap_or_default());

    let image = load_image(input)?;
    let (width, height) = image.dimensions();

    let protect = matches
        .value_of("protect")
        .and_then(|path| load_mask(Path::new(path), "protection", width, height));
    let protect = match (protect, regions.is_empty()) {
        (protect, true) => protect,
        (None, false) => Some(region_mask(width, height, &regions)),
        (Some(mask), false) => Some(union(&mask, &region_mask(width, height, &regions))),
    };
    let remove = matches
        .value_of("remove")
        .and_then(|path| load_mask(Path::new(path), "removal", width, height));

    let carver = SeamCarver::new(image, Masks::new(protect, remove));
    let carved = carver.carve(
        target(requested_width, width),
        target(requested_height, height),
    )?;
    save_image(&carved.image, output)?;

    if let Some(path) = matches.value_of("energy") {
        let energy = calculate_energy(&carved.image, &carved.masks);
        save_image(&energy_to_image(&energy), Path::new(path))?;
    }

    if matches.is_present("show") {
        warn!(
            "no display available; the result is in {}",
            output.display()
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("An error occurred: {}", err);
        process::exit(1);
    }
}
