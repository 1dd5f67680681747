// Horizontal Slider - range attributes and value quantization

use serde::{Deserialize, Serialize};

/// Bounds and step of an `<input type="range">`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderRange {
    /// Attribute defaults used when the control omits them.
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 5.0,
            step: 0.5,
        }
    }
}

impl SliderRange {
    /// Builds a range from raw attribute values, falling back to defaults for
    /// missing or unparsable attributes.
    pub fn from_attributes(min: Option<&str>, max: Option<&str>, step: Option<&str>) -> Self {
        let defaults = Self::default();
        let parse = |raw: Option<&str>, fallback: f64| {
            raw.and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };
        Self {
            min: parse(min, defaults.min),
            max: parse(max, defaults.max),
            step: parse(step, defaults.step),
        }
    }

    /// Clamps `value` to `[min, max]` and rounds it to the nearest step.
    ///
    /// A non-positive or non-finite step clamps only.
    pub fn quantize(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if !(self.step.is_finite() && self.step > 0.0) {
            return clamped;
        }
        let snapped = round_to(
            (clamped / self.step).round() * self.step,
            decimals(self.step),
        );
        // rounding can step past a bound that is not itself a step multiple
        snapped.clamp(self.min, self.max)
    }
}

/// Digits after the decimal point in the shortest rendering of `step`.
fn decimals(step: f64) -> i32 {
    let rendered = step.to_string();
    let digits = rendered.split_once('.').map_or(0, |(_, frac)| frac.len());
    i32::try_from(digits).unwrap_or(MAX_DECIMALS).min(MAX_DECIMALS)
}

const MAX_DECIMALS: i32 = 12;

/// Drops the binary residue left by multiplying a count of steps.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Sets the control value and fires the events the page listens for.
pub(crate) const SET_VALUE_SCRIPT: &str = "(el, value) => { \
    el.value = value; \
    el.dispatchEvent(new Event('input', { bubbles: true })); \
    el.dispatchEvent(new Event('change', { bubbles: true })); \
    return el.value; \
}";
