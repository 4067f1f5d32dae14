//! Default thresholds and reference values for resistor reading
//!
//! Everything here is a starting point for [`crate::PipelineConfig`]; the
//! numeric thresholds were tuned on synthetic and photographed resistors
//! and are meant to be overridden from a configuration file.

/// Color sampling along the resistor body
pub mod sampling {
    /// Fraction of the perpendicular extent averaged for each slice
    pub const CORE_FRACTION: f32 = 0.5;

    /// Distance between consecutive slices, in pixels
    pub const SLICE_STEP: u32 = 1;

    /// ΔE76 above which a pixel no longer matches the background
    pub const BACKGROUND_DELTA_E: f32 = 12.0;

    /// HSV value at or above which a pixel may be bright paper
    pub const BACKGROUND_MIN_VALUE: f32 = 0.9;

    /// HSV saturation at or below which a bright pixel is paper
    pub const BACKGROUND_MAX_SATURATION: f32 = 0.12;

    /// Foreground share a slice needs to count as resistor body
    pub const MIN_COVERAGE: f32 = 0.6;

    /// Fewer valid slices than this means the crop holds no resistor
    pub const MIN_VALID_SLICES: usize = 10;
}

/// Band segmentation
pub mod segmentation {
    /// ΔE76 under which two colors belong to the same band
    pub const MERGE_DELTA_E: f32 = 12.0;

    /// Consecutive dissimilar points needed before a boundary is committed
    pub const BOUNDARY_RUN: usize = 3;

    /// Absolute minimum band width in pixels
    pub const MIN_BAND_WIDTH: u32 = 2;

    /// Minimum band width as a fraction of the scanned axis length
    pub const MIN_BAND_WIDTH_FRACTION: f32 = 0.015;

    /// A color repeated at least this often is the resistor body
    pub const MIN_BODY_SEGMENTS: usize = 3;

    /// Percentile trimming applied to a band's colors before aggregation
    pub const PERCENTILE_LOW: f32 = 15.0;
    pub const PERCENTILE_HIGH: f32 = 85.0;

    /// Band counts used by real resistors
    pub const MIN_BANDS: usize = 3;
    pub const MAX_BANDS: usize = 6;
}

/// Band classification
pub mod classification {
    /// ΔE76 at which confidence drops to one half
    pub const CONFIDENCE_SCALE_DELTA_E: f32 = 10.0;

    /// Bands classified below this confidence are reported
    pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.3;
}

/// Value decoding
pub mod decoding {
    /// Smallest resistance accepted as a plausible reading
    pub const MIN_OHMS: f64 = 0.1;

    /// Largest resistance accepted as a plausible reading
    pub const MAX_OHMS: f64 = 1.0e9;

    /// Relative difference beyond which two orientations really disagree
    pub const AMBIGUITY_RELATIVE_DIFFERENCE: f64 = 0.01;

    /// Leading vs trailing body margin ratio that counts as an orientation hint
    pub const MARGIN_HINT_RATIO: f32 = 1.25;
}

/// Preferred number series (IEC 60063), as two or three significant digits
pub mod series {
    pub const E12: [u16; 12] = [10, 12, 15, 18, 22, 27, 33, 39, 47, 56, 68, 82];

    pub const E24: [u16; 24] = [
        10, 11, 12, 13, 15, 16, 18, 20, 22, 24, 27, 30, 33, 36, 39, 43, 47, 51, 56, 62, 68, 75,
        82, 91,
    ];

    pub const E96: [u16; 96] = [
        100, 102, 105, 107, 110, 113, 115, 118, 121, 124, 127, 130, 133, 137, 140, 143, 147, 150,
        154, 158, 162, 165, 169, 174, 178, 182, 187, 191, 196, 200, 205, 210, 215, 221, 226, 232,
        237, 243, 249, 255, 261, 267, 274, 280, 287, 294, 301, 309, 316, 324, 332, 340, 348, 357,
        365, 374, 383, 392, 402, 412, 422, 432, 442, 453, 464, 475, 487, 499, 511, 523, 536, 549,
        562, 576, 590, 604, 619, 634, 649, 665, 681, 698, 715, 732, 750, 768, 787, 806, 825, 845,
        866, 887, 909, 931, 953, 976,
    ];
}

/// Brightness and contrast normalization defaults
pub mod exposure {
    /// Target mean brightness window
    pub const BRIGHTNESS_LOW: f32 = 150.0;
    pub const BRIGHTNESS_HIGH: f32 = 180.0;

    /// Contrast stretch strength
    pub const CONTRAST: f32 = 75.0;

    /// Safety bound on the number of ±1 brightness shifts
    pub const MAX_SHIFT_STEPS: u32 = 255;
}

/// Performance targets and limits
pub mod performance {
    /// Images above this size are downscaled before sampling
    pub const MAX_PROCESSING_PIXELS: u32 = 2_000_000;

    /// Downscale target for large images
    pub const DOWNSCALE_TARGET_PIXELS: u32 = 1_000_000;
}
