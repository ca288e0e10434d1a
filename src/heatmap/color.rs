//! Heatmap color mapping
//!
//! Maps raw intensities onto a cool-to-warm HSL ramp. The ramp runs from
//! hue 210 (blue, lightness 80%) at the minimum of the batch down to hue 0
//! (red, lightness 50%) at the maximum. Values that cannot be placed on the
//! ramp get a fixed light gray.

use serde::{Deserialize, Serialize};

/// Hue at ratio 0 (coolest)
const COOL_HUE: f64 = 210.0;

/// Lightness at ratio 0
const COOL_LIGHTNESS: f64 = 80.0;

/// Lightness drop between ratio 0 and ratio 1
const LIGHTNESS_SPAN: f64 = 30.0;

/// Saturation used for every ramp color
const RAMP_SATURATION: f64 = 70.0;

/// An HSL color. Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Color for non-finite values and constant batches
pub const NEUTRAL: Hsl = Hsl {
    hue: 210.0,
    saturation: 20.0,
    lightness: 90.0,
};

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS notation, e.g. `hsl(105, 70%, 65%)`
    pub fn css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }

    /// Convert to 8-bit RGB, rounding each channel to the nearest integer.
    pub fn to_rgb(&self) -> Rgb {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let sector = h / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Rgb {
            r: channel(r1),
            g: channel(g1),
            b: channel(b1),
        }
    }

    /// Whether this color is light enough that dark text reads better on it
    pub fn prefers_dark_text(&self) -> bool {
        self.lightness >= 50.0
    }
}

/// Range of the finite values in one batch.
///
/// Non-finite entries never take part, so a single NaN or infinity in a batch
/// leaves the scale of every other value intact.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Compute the range of `values`. Empty or all-non-finite input gives 0..0.
    pub fn of(values: &[f64]) -> Self {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());

        match finite.next() {
            Some(first) => {
                let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
                Self { min, max }
            }
            None => Self::default(),
        }
    }

    /// True when every value maps to the same point (min == max)
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Position of `value` within the range, clamped to [0, 1].
    ///
    /// Returns `None` for non-finite values and degenerate ranges.
    pub fn ratio(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || self.is_degenerate() {
            return None;
        }
        let width = self.max - self.min;
        let ratio = if width.is_finite() {
            (value - self.min) / width
        } else {
            // Width overflowed f64; halved operands keep every term finite.
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        let ratio = ratio.clamp(0.0, 1.0);
        ratio.is_finite().then_some(ratio)
    }
}

/// Color of a ramp position in [0, 1].
pub fn ramp(ratio: f64) -> Hsl {
    Hsl {
        hue: COOL_HUE - ratio * COOL_HUE,
        saturation: RAMP_SATURATION,
        lightness: COOL_LIGHTNESS - ratio * LIGHTNESS_SPAN,
    }
}

/// Color of a single value within `range`.
pub fn color_of(value: f64, range: ValueRange) -> Hsl {
    match range.ratio(value) {
        Some(ratio) => ramp(ratio),
        None => NEUTRAL,
    }
}

/// Colors for a whole batch, using the batch's own range.
pub fn color_scale(values: &[f64]) -> Vec<Hsl> {
    let range = ValueRange::of(values);
    values.iter().map(|&v| color_of(v, range)).collect()
}
