use crate::DecoyBounds;

pub const DEFAULT_DECOY_MIN_PCT: f64 = -90.0;
pub const DEFAULT_DECOY_MAX_PCT: f64 = 90.0;
pub const DEFAULT_DECOY_STEP_PCT: f64 = 20.0;

/// Precision used when an input variable has no `decimalPlaces`.
pub const DEFAULT_INPUT_DECIMAL_PLACES: u8 = 3;

impl Default for DecoyBounds {
    fn default() -> Self {
        Self {
            min_pct: DEFAULT_DECOY_MIN_PCT,
            max_pct: DEFAULT_DECOY_MAX_PCT,
            step_pct: DEFAULT_DECOY_STEP_PCT,
        }
    }
}

pub(crate) fn decoy_bounds_from_parts(
    min_pct: Option<f64>,
    max_pct: Option<f64>,
    step_pct: Option<f64>,
) -> DecoyBounds {
    let fallback = DecoyBounds::default();
    DecoyBounds {
        min_pct: min_pct.unwrap_or(fallback.min_pct),
        max_pct: max_pct.unwrap_or(fallback.max_pct),
        step_pct: step_pct.unwrap_or(fallback.step_pct),
    }
}
