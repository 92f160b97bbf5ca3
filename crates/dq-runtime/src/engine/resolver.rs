use dq_compiler::{
    random_range_too_wide, sanitize_expression, CompiledQuestion, CompiledVariable, RandomRange,
    VariableRole,
};
use dq_core::{round_to, DynQuizError, NumberOrExpr};
use rand::Rng;
use rhai::Engine;
use tracing::debug;

use crate::engine::{Encoding, EvaluationContext};
use crate::helpers::rhai_bridge::evaluate_number;

/// Binds every input variable; final answers are left for the method steps.
pub fn resolve_inputs<R: Rng>(
    question: &CompiledQuestion,
    encoding: &Encoding,
    math: &Engine,
    randomize: bool,
    rng: &mut R,
) -> Result<EvaluationContext, DynQuizError> {
    let mut inputs = question.inputs().collect::<Vec<_>>();
    inputs.sort_by(|left, right| left.name.cmp(&right.name));

    let mut context = EvaluationContext::default();
    for variable in inputs {
        let value = resolve_input(variable, math, randomize, rng)?;
        let token = encoding.token(&variable.name).ok_or_else(|| {
            DynQuizError::configuration(
                "CONFIG_NAME_NOT_ENCODED",
                format!("Variable \"{}\" has no internal token.", variable.name),
            )
        })?;
        debug!(variable = %variable.name, value, "resolved input variable");
        context.bind(token, value).map_err(|_| {
            DynQuizError::configuration(
                "CONFIG_DUPLICATE_NAME",
                format!("Variable name \"{}\" is declared more than once.", variable.name),
            )
        })?;
    }
    Ok(context)
}

fn resolve_input<R: Rng>(
    variable: &CompiledVariable,
    math: &Engine,
    randomize: bool,
    rng: &mut R,
) -> Result<f64, DynQuizError> {
    let VariableRole::Input { default, random } = &variable.role else {
        return Err(DynQuizError::configuration(
            "CONFIG_FINAL_ANSWER_AS_INPUT",
            format!(
                "Final answer \"{}\" cannot be resolved as an input.",
                variable.name
            ),
        ));
    };

    if randomize {
        if let Some(range) = random {
            return draw_random(&variable.name, range, rng);
        }
    }

    match default {
        None => Err(DynQuizError::configuration(
            "CONFIG_DEFAULT_MISSING",
            format!("Variable \"{}\" needs a default value.", variable.name),
        )),
        Some(NumberOrExpr::Number(value)) if value.is_finite() => Ok(*value),
        Some(NumberOrExpr::Number(_)) => Err(default_not_numeric(&variable.name)),
        Some(NumberOrExpr::Expr(text)) => {
            evaluate_number(math, &sanitize_expression(text), &EvaluationContext::default())
                .map_err(|_| default_not_numeric(&variable.name))
        }
    }
}

fn default_not_numeric(name: &str) -> DynQuizError {
    DynQuizError::configuration(
        "CONFIG_DEFAULT_NOT_NUMERIC",
        format!(
            "Default value of \"{}\" must be a number or a valid math expression.",
            name
        ),
    )
}

/// Uniform continuous draw in `[min, max]`, rounded to the variable's precision.
pub fn draw_random<R: Rng>(
    name: &str,
    range: &RandomRange,
    rng: &mut R,
) -> Result<f64, DynQuizError> {
    if !range.is_drawable() {
        return Err(random_range_too_wide(name, range.min, range.max));
    }
    let (lowest, highest) = representable_bounds(range).ok_or_else(|| {
        DynQuizError::configuration(
            "CONFIG_RANDOM_BOUNDS_UNREPRESENTABLE",
            format!(
                "No value with {} decimal places lies in [{}, {}] for \"{}\".",
                range.decimal_places, range.min, range.max, name
            ),
        )
    })?;

    let raw = if range.min < range.max {
        rng.gen_range(range.min..=range.max)
    } else {
        range.min
    };
    Ok(round_to(raw, range.decimal_places).clamp(lowest, highest))
}

fn representable_bounds(range: &RandomRange) -> Option<(f64, f64)> {
    let unit = 10f64.powi(-i32::from(range.decimal_places));
    let tolerance = 1e-9;

    let mut lowest = round_to(range.min, range.decimal_places);
    if lowest < range.min - tolerance {
        lowest = round_to(lowest + unit, range.decimal_places);
    }
    let mut highest = round_to(range.max, range.decimal_places);
    if highest > range.max + tolerance {
        highest = round_to(highest - unit, range.decimal_places);
    }

    (lowest <= highest).then_some((lowest, highest))
}
