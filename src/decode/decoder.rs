//! Color-code arithmetic and orientation resolution
//!
//! A band sequence can be read from either end. Each direction is decoded
//! into a candidate reading on its own, invalid candidates are dropped and
//! the survivors are compared by a lexicographic score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{ClassifiedBand, ColorCode, Tolerance};
use crate::config::DecodingConfig;
use crate::constants::segmentation::{MAX_BANDS, MIN_BANDS};
use crate::decode::reading::ResistorReading;
use crate::decode::series::PreferredSeries;
use crate::detection::Band;
use crate::error::{ReaderError, Result};

/// Direction a reading was taken in, relative to the scan axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// First band at the start of the scan axis
    AsRead,
    Reversed,
}

/// Geometric evidence for which end of the body carries the first band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationHint {
    Forward,
    Reverse,
    Neutral,
}

impl OrientationHint {
    /// Compare the body margin before the first band with the one after the
    /// last band. The first band sits closer to its end of the body.
    pub fn from_margins(leading: u32, trailing: u32, ratio: f32) -> Self {
        let (leading, trailing) = (leading as f32, trailing as f32);
        if trailing > leading && trailing >= leading * ratio {
            OrientationHint::Forward
        } else if leading > trailing && leading >= trailing * ratio {
            OrientationHint::Reverse
        } else {
            OrientationHint::Neutral
        }
    }

    /// Hint from band positions inside the sampled body span `[start, end)`
    pub fn from_body(bands: &[Band], body_span: Option<(u32, u32)>, ratio: f32) -> Self {
        let (Some(first), Some(last), Some((start, end))) = (bands.first(), bands.last(), body_span)
        else {
            return OrientationHint::Neutral;
        };
        Self::from_margins(
            first.start.saturating_sub(start),
            end.saturating_sub(last.end),
            ratio,
        )
    }

    fn agrees_with(&self, orientation: Orientation) -> bool {
        matches!(
            (self, orientation),
            (OrientationHint::Forward, Orientation::AsRead)
                | (OrientationHint::Reverse, Orientation::Reversed)
        )
    }
}

/// A reading together with the direction it was decoded in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedReading {
    pub reading: ResistorReading,
    pub orientation: Orientation,
}

/// Ranking of a valid candidate; fields compare in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
    standard_tolerance: bool,
    hint_agrees: bool,
    series: Option<PreferredSeries>,
}

#[derive(Debug, Clone)]
struct Candidate {
    reading: ResistorReading,
    orientation: Orientation,
    significand: u32,
}

/// Value decoder
#[derive(Debug, Clone)]
pub struct ValueDecoder {
    config: DecodingConfig,
}

impl Default for ValueDecoder {
    fn default() -> Self {
        Self::new(DecodingConfig::default())
    }
}

impl ValueDecoder {
    pub fn new(config: DecodingConfig) -> Self {
        Self { config }
    }

    /// Decode a plain color sequence
    ///
    /// Confidence of the result is 1.0 and no geometric hint is used.
    pub fn decode_codes(&self, codes: &[ColorCode]) -> Result<ResistorReading> {
        self.resolve(codes, 1.0, OrientationHint::Neutral)
            .map(|decoded| decoded.reading)
    }

    /// Decode classified bands in scan order
    ///
    /// The reading's confidence is the lowest band confidence.
    pub fn decode_bands(
        &self,
        bands: &[ClassifiedBand],
        hint: OrientationHint,
    ) -> Result<DecodedReading> {
        let codes: Vec<ColorCode> = bands.iter().map(|band| band.code).collect();
        let confidence = bands
            .iter()
            .map(|band| band.confidence)
            .fold(1.0f32, f32::min);
        let hint = if self.config.use_margin_hint {
            hint
        } else {
            OrientationHint::Neutral
        };
        self.resolve(&codes, confidence, hint)
    }

    fn resolve(
        &self,
        codes: &[ColorCode],
        confidence: f32,
        hint: OrientationHint,
    ) -> Result<DecodedReading> {
        if !(MIN_BANDS..=MAX_BANDS).contains(&codes.len()) {
            return Err(ReaderError::InsufficientBands { found: codes.len() });
        }

        let forward = self.candidate(codes, Orientation::AsRead, confidence);

        if tolerance_marks_end(codes) {
            debug!(bands = ?codes, "Tolerance band fixes orientation");
            return forward.map(Candidate::into_decoded).ok_or_else(|| {
                ReaderError::UnreadableBands {
                    bands: codes.to_vec(),
                }
            });
        }

        let reversed_codes: Vec<ColorCode> = codes.iter().rev().copied().collect();
        let reverse = self.candidate(&reversed_codes, Orientation::Reversed, confidence);

        let (forward, reverse) = match (forward, reverse) {
            (Some(forward), Some(reverse)) => (forward, reverse),
            (Some(only), None) | (None, Some(only)) => return Ok(only.into_decoded()),
            (None, None) => {
                return Err(ReaderError::UnreadableBands {
                    bands: codes.to_vec(),
                })
            }
        };

        let forward_score = forward.score(hint);
        let reverse_score = reverse.score(hint);
        debug!(
            forward = %forward.reading,
            reverse = %reverse.reading,
            ?forward_score,
            ?reverse_score,
            "Comparing orientations"
        );

        if reverse_score > forward_score {
            return Ok(reverse.into_decoded());
        }
        if forward_score > reverse_score {
            return Ok(forward.into_decoded());
        }

        if forward.reading.relative_difference(&reverse.reading) > self.config.ambiguity_threshold {
            return Err(ReaderError::AmbiguousOrientation {
                forward: Box::new(forward.reading),
                reverse: Box::new(reverse.reading),
            });
        }
        Ok(forward.into_decoded())
    }

    /// Decode one direction, `None` when the sequence is not a valid code
    fn candidate(
        &self,
        codes: &[ColorCode],
        orientation: Orientation,
        confidence: f32,
    ) -> Option<Candidate> {
        let digit_count = if codes.len() >= 5 { 3 } else { 2 };
        let (digits, rest) = codes.split_at(digit_count);

        let significand = digits
            .iter()
            .try_fold(0u32, |value, code| Some(value * 10 + code.digit()? as u32))?;
        let exponent = rest.first()?.multiplier_exponent()?;

        let tolerance = match rest.get(1) {
            Some(code) => code.tolerance_marking()?,
            None => Tolerance::Twenty,
        };
        let tempco_ppm = match rest.get(2) {
            Some(code) => Some(code.tempco_ppm()?),
            None => None,
        };

        let resistance_ohms = scale(significand, exponent);
        if resistance_ohms < self.config.min_ohms || resistance_ohms > self.config.max_ohms {
            return None;
        }

        Some(Candidate {
            reading: ResistorReading {
                resistance_ohms,
                tolerance,
                band_count: codes.len() as u8,
                tempco_ppm,
                bands: codes.to_vec(),
                confidence,
            },
            orientation,
            significand,
        })
    }
}

impl Candidate {
    fn score(&self, hint: OrientationHint) -> Score {
        Score {
            standard_tolerance: self.reading.tolerance.is_known(),
            hint_agrees: hint.agrees_with(self.orientation),
            series: PreferredSeries::of_significand(self.significand),
        }
    }

    fn into_decoded(self) -> DecodedReading {
        DecodedReading {
            reading: self.reading,
            orientation: self.orientation,
        }
    }
}

/// Last band is a standard tolerance color and the first is not
fn tolerance_marks_end(codes: &[ColorCode]) -> bool {
    match (codes.first(), codes.last()) {
        (Some(first), Some(last)) => last.tolerance().is_some() && first.tolerance().is_none(),
        _ => false,
    }
}

/// `significand × 10^exponent`, dividing for negative exponents
pub(crate) fn scale(significand: u32, exponent: i8) -> f64 {
    let base = significand as f64;
    let power = 10f64.powi(exponent.unsigned_abs() as i32);
    if exponent >= 0 {
        base * power
    } else {
        base / power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Lab;
    use ColorCode::{Black, Blue, Brown, Gold, Green, Orange, Red, Silver, Violet, Yellow};

    fn decoder() -> ValueDecoder {
        ValueDecoder::default()
    }

    fn classified(codes: &[ColorCode], starts: &[u32]) -> Vec<ClassifiedBand> {
        codes
            .iter()
            .zip(starts)
            .enumerate()
            .map(|(index, (code, start))| ClassifiedBand {
                band: Band {
                    index,
                    start: *start,
                    end: start + 10,
                    color: Lab::new(50.0, 0.0, 0.0),
                    spread: 0.0,
                    samples: 10,
                },
                code: *code,
                distance: 2.0,
                confidence: 0.8 - index as f32 * 0.1,
            })
            .collect()
    }

    #[test]
    fn test_four_band_brown_black_red_gold() {
        let reading = decoder().decode_codes(&[Brown, Black, Red, Gold]).unwrap();
        assert_eq!(reading.resistance_ohms, 1000.0);
        assert_eq!(reading.tolerance, Tolerance::Five);
        assert_eq!(reading.band_count, 4);
        assert_eq!(reading.to_string(), "1000 Ω ±5%");
    }

    #[test]
    fn test_four_band_yellow_violet_orange_gold() {
        let reading = decoder().decode_codes(&[Yellow, Violet, Orange, Gold]).unwrap();
        assert_eq!(reading.resistance_ohms, 47000.0);
        assert_eq!(reading.tolerance, Tolerance::Five);
        assert_eq!(reading.compact(), "47 kΩ ±5%");
    }

    #[test]
    fn test_five_band_readings() {
        let reading = decoder().decode_codes(&[Green, Blue, Black, Black, Brown]).unwrap();
        assert_eq!(reading.resistance_ohms, 560.0);
        assert_eq!(reading.tolerance, Tolerance::One);

        // Brown in the multiplier position scales by ten
        let reading = decoder().decode_codes(&[Green, Blue, Black, Brown, Brown]).unwrap();
        assert_eq!(reading.resistance_ohms, 5600.0);
        assert_eq!(reading.tolerance, Tolerance::One);
        assert_eq!(reading.band_count, 5);
    }

    #[test]
    fn test_three_band_defaults_to_twenty_percent() {
        let reading = decoder().decode_codes(&[Brown, Black, Red]).unwrap();
        assert_eq!(reading.resistance_ohms, 1000.0);
        assert_eq!(reading.tolerance, Tolerance::Twenty);
        assert_eq!(reading.band_count, 3);
    }

    #[test]
    fn test_six_band_temperature_coefficient() {
        let reading = decoder()
            .decode_codes(&[Red, Red, Black, Brown, Red, Brown])
            .unwrap();
        assert_eq!(reading.resistance_ohms, 2200.0);
        assert_eq!(reading.tolerance, Tolerance::Two);
        assert_eq!(reading.tempco_ppm, Some(100));
    }

    #[test]
    fn test_fractional_multipliers() {
        let reading = decoder().decode_codes(&[Yellow, Violet, Gold, Gold]).unwrap();
        assert!((reading.resistance_ohms - 4.7).abs() < 1e-12);
        let reading = decoder().decode_codes(&[Red, Red, Silver, Silver]).unwrap();
        assert!((reading.resistance_ohms - 0.22).abs() < 1e-12);
        assert_eq!(reading.tolerance, Tolerance::Ten);
    }

    #[test]
    fn test_precision_tolerance_is_unknown() {
        let reading = decoder()
            .decode_codes(&[Orange, Orange, Black, Brown, Violet])
            .unwrap();
        assert_eq!(reading.resistance_ohms, 3300.0);
        assert_eq!(reading.tolerance, Tolerance::Unknown);
    }

    #[test]
    fn test_band_count_limits() {
        let err = decoder().decode_codes(&[Brown, Black]).unwrap_err();
        assert!(matches!(err, ReaderError::InsufficientBands { found: 2 }));
        let err = decoder().decode_codes(&[Brown; 7]).unwrap_err();
        assert!(matches!(err, ReaderError::InsufficientBands { found: 7 }));
    }

    #[test]
    fn test_reversed_sequence_is_flipped() {
        let reading = decoder().decode_codes(&[Gold, Red, Black, Brown]).unwrap();
        assert_eq!(reading.resistance_ohms, 1000.0);
        assert_eq!(reading.bands, vec![Brown, Black, Red, Gold]);

        let reading = decoder().decode_codes(&[Gold, Orange, Violet, Yellow]).unwrap();
        assert_eq!(reading.resistance_ohms, 47000.0);
        assert_eq!(reading.tolerance, Tolerance::Five);
    }

    #[test]
    fn test_tolerance_at_one_end_picks_that_end_last() {
        // Blue marks only a precision grade, so it cannot fix the direction
        let decoded = decoder()
            .decode_bands(&classified(&[Gold, Orange, Orange, Blue], &[0, 20, 40, 60]), OrientationHint::Neutral)
            .unwrap();
        assert_eq!(decoded.orientation, Orientation::Reversed);
        assert_eq!(decoded.reading.bands, vec![Blue, Orange, Orange, Gold]);
        assert_eq!(decoded.reading.resistance_ohms, 63000.0);
    }

    #[test]
    fn test_as_read_order_is_kept_when_last_band_is_tolerance() {
        // Reversed this would be 1 MΩ with a precision tolerance
        let decoded = decoder()
            .decode_bands(&classified(&[Violet, Green, Black, Brown], &[0, 20, 40, 60]), OrientationHint::Reverse)
            .unwrap();
        assert_eq!(decoded.orientation, Orientation::AsRead);
        assert_eq!(decoded.reading.resistance_ohms, 75.0);
    }

    #[test]
    fn test_standard_tolerance_beats_precision_tolerance() {
        // Forward is 12 kΩ with a green (precision) tolerance
        let reading = decoder().decode_codes(&[Brown, Red, Orange, Green]).unwrap();
        assert_eq!(reading.resistance_ohms, 5300.0);
        assert_eq!(reading.tolerance, Tolerance::One);
    }

    #[test]
    fn test_preferred_series_breaks_ties() {
        // 10 × 100 (E12) against 20 × 10 (E24 only)
        let reading = decoder().decode_codes(&[Brown, Black, Red]).unwrap();
        assert_eq!(reading.resistance_ohms, 1000.0);
    }

    #[test]
    fn test_equal_scores_are_ambiguous() {
        let err = decoder().decode_codes(&[Brown, Black, Red, Red]).unwrap_err();
        match err {
            ReaderError::AmbiguousOrientation { forward, reverse } => {
                assert_eq!(forward.resistance_ohms, 1000.0);
                assert_eq!(forward.tolerance, Tolerance::Two);
                assert_eq!(reverse.resistance_ohms, 22.0);
                assert_eq!(reverse.tolerance, Tolerance::One);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_margin_hint_resolves_ambiguity() {
        let bands = classified(&[Brown, Black, Red, Red], &[10, 30, 50, 70]);

        let decoded = decoder().decode_bands(&bands, OrientationHint::Forward).unwrap();
        assert_eq!(decoded.reading.resistance_ohms, 1000.0);
        assert_eq!(decoded.orientation, Orientation::AsRead);

        let decoded = decoder().decode_bands(&bands, OrientationHint::Reverse).unwrap();
        assert_eq!(decoded.reading.resistance_ohms, 22.0);
        assert_eq!(decoded.orientation, Orientation::Reversed);
    }

    #[test]
    fn test_margin_hint_can_be_disabled() {
        let decoder = ValueDecoder::new(DecodingConfig {
            use_margin_hint: false,
            ..DecodingConfig::default()
        });
        let bands = classified(&[Brown, Black, Red, Red], &[10, 30, 50, 70]);
        let err = decoder.decode_bands(&bands, OrientationHint::Forward).unwrap_err();
        assert!(matches!(err, ReaderError::AmbiguousOrientation { .. }));
    }

    #[test]
    fn test_palindrome_reads_forward() {
        let decoded = decoder()
            .decode_bands(&classified(&[Red, Red, Red], &[0, 20, 40]), OrientationHint::Neutral)
            .unwrap();
        assert_eq!(decoded.orientation, Orientation::AsRead);
        assert_eq!(decoded.reading.resistance_ohms, 2200.0);
    }

    #[test]
    fn test_confidence_is_lowest_band_confidence() {
        let decoded = decoder()
            .decode_bands(&classified(&[Brown, Black, Red, Gold], &[0, 20, 40, 60]), OrientationHint::Neutral)
            .unwrap();
        assert!((decoded.reading.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_orientation_is_dropped() {
        let decoder = ValueDecoder::new(DecodingConfig {
            max_ohms: 10_000.0,
            ..DecodingConfig::default()
        });
        // Forward would be 10 MΩ
        let reading = decoder.decode_codes(&[Brown, Black, Blue, Red]).unwrap();
        assert_eq!(reading.resistance_ohms, 26.0);
    }

    #[test]
    fn test_no_valid_orientation() {
        let err = decoder().decode_codes(&[Gold, Silver, Gold]).unwrap_err();
        assert!(matches!(err, ReaderError::UnreadableBands { .. }));

        let err = decoder().decode_codes(&[Orange, Gold, Red, Gold]).unwrap_err();
        assert!(matches!(err, ReaderError::UnreadableBands { .. }));
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let codes = [Yellow, Violet, Orange, Gold];
        let first = decoder().decode_codes(&codes).unwrap();
        let second = decoder().decode_codes(&codes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_margin_hint() {
        assert_eq!(OrientationHint::from_margins(10, 30, 1.25), OrientationHint::Forward);
        assert_eq!(OrientationHint::from_margins(30, 10, 1.25), OrientationHint::Reverse);
        assert_eq!(OrientationHint::from_margins(20, 22, 1.25), OrientationHint::Neutral);
        assert_eq!(OrientationHint::from_margins(0, 0, 1.25), OrientationHint::Neutral);
        assert_eq!(OrientationHint::from_margins(0, 5, 1.25), OrientationHint::Forward);
    }

    #[test]
    fn test_margin_hint_from_body() {
        let bands: Vec<Band> = classified(&[Brown, Black, Red, Gold], &[20, 40, 60, 100])
            .into_iter()
            .map(|band| band.band)
            .collect();
        assert_eq!(
            OrientationHint::from_body(&bands, Some((10, 150)), 1.25),
            OrientationHint::Forward
        );
        assert_eq!(OrientationHint::from_body(&bands, None, 1.25), OrientationHint::Neutral);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(47, 3), 47000.0);
        assert_eq!(scale(47, -1), 4.7);
        assert_eq!(scale(0, 2), 0.0);
    }
}
