use dq_compiler::{sanitize_expression, CompiledQuestion, CompiledStep};
use dq_core::{DynQuizError, ExpressionDiagnostics};
use rand::Rng;
use rhai::Engine;
use tracing::debug;

use crate::engine::{Encoding, EvaluationContext};
use crate::helpers::rhai_bridge::{
    evaluate_number, identifier_regex, EvalFailure, CONSTANT_NAMES, FUNCTION_NAMES,
};

/// Runs the method steps in author order, binding each left-hand side once.
pub fn evaluate_steps<R: Rng>(
    question: &CompiledQuestion,
    encoding: &mut Encoding,
    context: &mut EvaluationContext,
    math: &Engine,
    rng: &mut R,
) -> Result<(), DynQuizError> {
    for step in &question.steps {
        let value = evaluate_step(question, step, encoding, context, math, rng)?;
        debug!(step = step.index, expr = %step.raw, value, "evaluated method step");
    }
    Ok(())
}

fn evaluate_step<R: Rng>(
    question: &CompiledQuestion,
    step: &CompiledStep,
    encoding: &mut Encoding,
    context: &mut EvaluationContext,
    math: &Engine,
    rng: &mut R,
) -> Result<f64, DynQuizError> {
    let fail = |code: &str, message: String, encoding: &Encoding| {
        DynQuizError::expression(code, message, diagnostics(step, Some(encoding)))
    };

    let lhs_token = match question.variable(&step.lhs) {
        Some(variable) if variable.is_final_answer() => encoding
            .token(&variable.name)
            .map(str::to_string)
            .ok_or_else(|| {
                fail(
                    "EXPR_UNDEFINED_SYMBOL",
                    format!("Final answer \"{}\" has no internal token.", variable.name),
                    encoding,
                )
            })?,
        Some(variable) => {
            return Err(fail(
                "EXPR_INPUT_REASSIGNED",
                format!(
                    "Method {} assigns to input variable \"{}\"; only new names or final answers can be assigned.",
                    step.index, variable.name
                ),
                encoding,
            ));
        }
        None => match encoding.token(&step.lhs) {
            Some(existing) => existing.to_string(),
            None => encoding.assign_fresh(&step.lhs, rng)?,
        },
    };

    if context.contains(&lhs_token) {
        return Err(fail(
            "EXPR_LHS_REBOUND",
            format!(
                "\"{}\" is already assigned by an earlier method and cannot be reassigned.",
                step.lhs
            ),
            encoding,
        ));
    }

    let rhs = sanitize_expression(&encoding.substitute(&step.rhs));
    debug!(step = step.index, encoded = %rhs, "encoded method step");
    check_symbols(&rhs, encoding, context)
        .and_then(|()| evaluate_number(math, &rhs, context))
        .map_err(|failure| fail(failure.code, failure.message, encoding))
        .and_then(|value| {
            context
                .bind(lhs_token, value)
                .map(|()| value)
                .map_err(|_| {
                    fail(
                        "EXPR_LHS_REBOUND",
                        format!("\"{}\" is already assigned.", step.lhs),
                        encoding,
                    )
                })
        })
}

/// Catches unknown functions and unbound names before handing the text to rhai,
/// so the message can use the author's name instead of a token.
fn check_symbols(
    expr: &str,
    encoding: &Encoding,
    context: &EvaluationContext,
) -> Result<(), EvalFailure> {
    for found in identifier_regex().find_iter(expr) {
        let before = expr[..found.start()].chars().next_back();
        if before.is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.') {
            continue;
        }
        let identifier = found.as_str();
        if expr[found.end()..].trim_start().starts_with('(') {
            if !FUNCTION_NAMES.contains(&identifier) {
                return Err(EvalFailure::new(
                    "EXPR_UNKNOWN_FUNCTION",
                    format!("Function \"{}\" is not supported.", identifier),
                ));
            }
            continue;
        }
        if CONSTANT_NAMES.contains(&identifier) || context.contains(identifier) {
            continue;
        }
        let message = match encoding.name(identifier) {
            Some(name) => format!("\"{}\" is used before it is defined.", name),
            None => format!("\"{}\" is not a known variable.", identifier),
        };
        return Err(EvalFailure::new("EXPR_UNDEFINED_SYMBOL", message));
    }
    Ok(())
}

fn diagnostics(step: &CompiledStep, encoding: Option<&Encoding>) -> ExpressionDiagnostics {
    ExpressionDiagnostics {
        index: step.index,
        expr: step.raw.clone(),
        sanitized: sanitize_expression(&step.raw),
        encoded: encoding.map(|encoding| sanitize_expression(&encoding.substitute(&step.raw))),
    }
}
