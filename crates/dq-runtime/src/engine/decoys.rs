use dq_compiler::DecoyBounds;
use dq_core::{percent_label, round_to, DynQuizError};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const MAX_DEVIATIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoyCandidate {
    /// Fraction, so `-0.3` means 30% below the correct value.
    pub deviation: f64,
    pub value: f64,
}

/// Unique wrong values for one final answer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoyPool {
    pub variable: String,
    pub value: f64,
    pub percentages: Vec<String>,
    pub candidates: Vec<DecoyCandidate>,
}

/// Deviation fractions from `min_pct` to `max_pct` by `step_pct`, zero left out.
pub fn deviation_range(bounds: &DecoyBounds) -> Result<Vec<f64>, DynQuizError> {
    if !(bounds.step_pct.is_finite() && bounds.step_pct > 0.0) {
        return Err(DynQuizError::configuration(
            "CONFIG_DECOY_STEP_INVALID",
            format!("Decoy step must be positive, got {}.", bounds.step_pct),
        ));
    }
    if bounds.min_pct > bounds.max_pct {
        return Err(DynQuizError::configuration(
            "CONFIG_DECOY_BOUNDS_INVERTED",
            format!(
                "Decoy range [{}, {}] is inverted.",
                bounds.min_pct, bounds.max_pct
            ),
        ));
    }

    let span = (bounds.max_pct - bounds.min_pct) / bounds.step_pct;
    if !span.is_finite() || span >= MAX_DEVIATIONS as f64 {
        return Err(DynQuizError::configuration(
            "CONFIG_DECOY_RANGE_TOO_LARGE",
            format!(
                "Decoy range [{}, {}] with step {} produces more than {} deviations.",
                bounds.min_pct, bounds.max_pct, bounds.step_pct, MAX_DEVIATIONS
            ),
        ));
    }

    let steps = (span + 1e-9).floor() as usize;
    Ok((0..=steps)
        .map(|index| round_to(bounds.min_pct + index as f64 * bounds.step_pct, 9) / 100.0)
        .filter(|deviation| deviation.abs() > 1e-12)
        .collect())
}

/// Builds the candidate pool for `value` (already rounded to `decimal_places`),
/// failing when fewer than `required` distinct wrong values exist.
pub fn build_decoy_pool(
    variable: &str,
    value: f64,
    decimal_places: u8,
    bounds: &DecoyBounds,
    required: usize,
) -> Result<DecoyPool, DynQuizError> {
    let deviations = deviation_range(bounds)?;
    let percentages = deviations
        .iter()
        .map(|deviation| percent_label(*deviation))
        .collect::<Vec<_>>();

    let mut candidates: Vec<DecoyCandidate> = Vec::with_capacity(deviations.len());
    for deviation in deviations {
        let candidate = round_to(value * (1.0 + deviation), decimal_places);
        if candidate == value || candidates.iter().any(|seen| seen.value == candidate) {
            continue;
        }
        candidates.push(DecoyCandidate {
            deviation,
            value: candidate,
        });
    }

    debug!(
        variable,
        value,
        candidates = candidates.len(),
        "built decoy pool"
    );
    if candidates.len() < required {
        return Err(DynQuizError::insufficient_decoys(variable, percentages));
    }

    Ok(DecoyPool {
        variable: variable.to_string(),
        value,
        percentages,
        candidates,
    })
}

/// Draws `count` incorrect rows; row `r` holds one candidate per pool.
/// Each pool is shuffled once and consumed without replacement, so no
/// candidate repeats within a column.
pub fn draw_decoy_rows<R: Rng>(
    pools: &[DecoyPool],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Vec<DecoyCandidate>>, DynQuizError> {
    let mut columns = Vec::with_capacity(pools.len());
    for pool in pools {
        if pool.candidates.len() < count {
            return Err(DynQuizError::insufficient_decoys(
                pool.variable.clone(),
                pool.percentages.clone(),
            ));
        }
        let mut shuffled = pool.candidates.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        columns.push(shuffled);
    }

    Ok((0..count)
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect())
}
