// Deferred weight formulas written into the Weight column.
use once_cell::sync::Lazy;
use regex::Regex;

/// Plates come in 5 unit increments, so prescribed weights round down to it.
pub const WEIGHT_STEP: f64 = 5.0;

static FLOOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^=\s*FLOOR\(\s*(-?[0-9]+(?:\.[0-9]+)?)\s*\*\s*([0-9]+(?:\.[0-9]+)?)\s*,\s*([0-9]+(?:\.[0-9]+)?)\s*\)\s*$")
        .unwrap()
});

/// Round `value` toward zero to a multiple of `step`.
///
/// A tiny tolerance absorbs binary representation error so that
/// `200 * 0.85` lands on 170 instead of 165.
pub fn floor_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    let units = value / step;
    let units = if units >= 0.0 {
        (units + 1e-9).trunc()
    } else {
        (units - 1e-9).trunc()
    };
    units * step
}

/// `FLOOR(max * percent, step)` kept unevaluated so the sheet shows where a
/// weight came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightFormula {
    pub reference_max: f64,
    pub percent: f64,
    pub step: f64,
}

impl WeightFormula {
    pub fn new(reference_max: f64, percent: f64) -> Self {
        Self {
            reference_max,
            percent,
            step: WEIGHT_STEP,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let caps = FLOOR_RE.captures(text.trim())?;
        Some(Self {
            reference_max: caps[1].parse().ok()?,
            percent: caps[2].parse().ok()?,
            step: caps[3].parse().ok()?,
        })
    }

    pub fn evaluate(&self) -> f64 {
        floor_to_step(self.reference_max * self.percent, self.step)
    }

    /// Spreadsheet text, e.g. `=FLOOR(200*0.65, 5)`.
    pub fn render(&self) -> String {
        format!(
            "=FLOOR({}*{}, {})",
            self.reference_max, self.percent, self.step
        )
    }
}
