use dq_core::{DynQuizError, ExpressionDiagnostics, MethodDefinition};

use crate::sanitize::sanitize_expression;
use crate::CompiledStep;

pub(crate) fn parse_method_steps(
    methods: &[MethodDefinition],
) -> Result<Vec<CompiledStep>, DynQuizError> {
    let mut steps = Vec::with_capacity(methods.len());
    for (offset, method) in methods.iter().enumerate() {
        steps.push(parse_method_step(offset + 1, method)?);
    }
    Ok(steps)
}

pub(crate) fn parse_method_step(
    index: usize,
    method: &MethodDefinition,
) -> Result<CompiledStep, DynQuizError> {
    let raw = method.expr.trim();
    if raw.is_empty() {
        return Err(DynQuizError::configuration(
            "CONFIG_EMPTY_METHOD",
            format!("Method {} cannot be empty.", index),
        ));
    }

    let sanitized = sanitize_expression(raw);
    let invalid = || {
        DynQuizError::expression(
            "EXPR_INVALID_EQUATION",
            "Invalid expression",
            ExpressionDiagnostics {
                index,
                expr: raw.to_string(),
                sanitized: sanitized.clone(),
                encoded: None,
            },
        )
    };

    let mut parts = raw.split('=');
    let (Some(lhs), Some(rhs), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let lhs = lhs.trim();
    let rhs = rhs.trim();
    if lhs.is_empty() || rhs.is_empty() {
        return Err(invalid());
    }

    Ok(CompiledStep {
        index,
        raw: raw.to_string(),
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
        explanation: method.explanation.clone(),
    })
}
