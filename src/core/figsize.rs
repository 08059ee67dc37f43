//! Figure dimensions derived from the LaTeX article layout.
//!
//! Reference sizes:
//! * article `\textwidth` 16.50746cm, `\textheight` 22.85675cm
//! * beamer paper 12.80cm x 9.60cm
//! * pgfplots default axis 240pt x 207pt

use serde::Serialize;
use std::fmt;

pub const TEXTWIDTH_CM: f64 = 16.50746;
pub const FIG_WIDTH_CM: f64 = TEXTWIDTH_CM / 2.0;
/// (sqrt(5) - 1) / 2
pub const GOLDEN_MEAN: f64 = 0.618_033_988_749_894_9;
pub const FIG_HEIGHT_CM: f64 = FIG_WIDTH_CM * GOLDEN_MEAN;

const UNIT: &str = "cm";

/// A length in centimetres. `Display` appends the unit, `value()` is the bare number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Length(f64);

impl Length {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, UNIT)
    }
}

impl From<Length> for f64 {
    fn from(length: Length) -> f64 {
        length.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArticleSize {
    fig_width: f64,
    fig_height: f64,
}

impl Default for ArticleSize {
    fn default() -> Self {
        Self {
            fig_width: FIG_WIDTH_CM,
            fig_height: FIG_HEIGHT_CM,
        }
    }
}

impl ArticleSize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom base width; the height keeps the golden ratio.
    pub fn with_width(width_cm: f64) -> Self {
        Self {
            fig_width: width_cm,
            fig_height: width_cm * GOLDEN_MEAN,
        }
    }

    /// Sizes for a document with the given `\textwidth`; figures take half of it.
    pub fn from_textwidth(textwidth_cm: f64) -> Self {
        Self::with_width(textwidth_cm / 2.0)
    }

    /// Width scaled by `scale`; `None` and `Some(0.0)` both mean unscaled.
    pub fn w(&self, scale: Option<f64>) -> Length {
        Length(apply_scale(self.fig_width, scale))
    }

    pub fn h(&self, scale: Option<f64>) -> Length {
        Length(apply_scale(self.fig_height, scale))
    }
}

fn apply_scale(base: f64, scale: Option<f64>) -> f64 {
    match scale {
        None => base,
        Some(s) if s == 0.0 => base,
        Some(s) => base * s,
    }
}
