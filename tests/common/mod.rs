//! Synthetic resistor photographs for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use resistor_reader::ColorCode;

pub const PAPER: [u8; 3] = [250, 250, 250];
pub const BODY: [u8; 3] = [222, 196, 152];
pub const LEAD: [u8; 3] = [150, 150, 150];

pub const WIDTH: u32 = 300;
pub const HEIGHT: u32 = 100;

/// Body spans columns 30..270; band slots leave a wider gap before the last band
pub const FOUR_BAND_SLOTS: [(u32, u32); 4] = [(60, 80), (95, 115), (130, 150), (200, 220)];
pub const THREE_BAND_SLOTS: [(u32, u32); 3] = [(60, 80), (95, 115), (130, 150)];
pub const FIVE_BAND_SLOTS: [(u32, u32); 5] = [(55, 70), (82, 97), (109, 124), (136, 151), (205, 220)];

/// Horizontal resistor on paper with bands at the given column ranges
pub fn resistor_image(bands: &[(ColorCode, (u32, u32))]) -> RgbImage {
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        if (25..75).contains(&y) && (30..270).contains(&x) {
            bands
                .iter()
                .find(|(_, (start, end))| (*start..*end).contains(&x))
                .and_then(|(code, _)| code.reference_rgb())
                .map(Rgb)
                .unwrap_or(Rgb(BODY))
        } else if (48..52).contains(&y) {
            Rgb(LEAD)
        } else {
            Rgb(PAPER)
        }
    })
}

pub fn with_slots(codes: &[ColorCode], slots: &[(u32, u32)]) -> RgbImage {
    let bands: Vec<_> = codes.iter().copied().zip(slots.iter().copied()).collect();
    resistor_image(&bands)
}

pub fn four_band(codes: [ColorCode; 4]) -> RgbImage {
    with_slots(&codes, &FOUR_BAND_SLOTS)
}

/// Save as PNG inside `dir` and return the path
pub fn save_png(image: &RgbImage, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("failed to write test image");
    path
}
