use dq_compiler::{CompiledQuestion, DecoyBounds, VariableRole, DEFAULT_INPUT_DECIMAL_PLACES};
use dq_core::{
    format_fixed, format_trimmed, round_to, AnswerOption, DynQuizError, GeneratedVariable,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::engine::{DecoyCandidate, Encoding, EvaluationContext};

/// A final answer's computed value, rounded to its precision.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalValue {
    pub name: String,
    pub unit: Option<String>,
    pub decimal_places: u8,
    pub decoys: DecoyBounds,
    pub value: f64,
}

/// Reads every final answer out of the context, in declaration order.
pub fn final_values(
    question: &CompiledQuestion,
    encoding: &Encoding,
    context: &EvaluationContext,
) -> Result<Vec<FinalValue>, DynQuizError> {
    let mut finals = Vec::new();
    for variable in question.final_answers() {
        let VariableRole::FinalAnswer {
            decimal_places,
            decoys,
        } = &variable.role
        else {
            continue;
        };
        let raw = encoding
            .token(&variable.name)
            .and_then(|token| context.get(token))
            .ok_or_else(|| DynQuizError::result_not_a_number(&variable.name))?;
        let value = round_to(raw, *decimal_places);
        if !value.is_finite() {
            return Err(DynQuizError::result_not_a_number(&variable.name));
        }
        finals.push(FinalValue {
            name: variable.name.clone(),
            unit: variable.unit.clone(),
            decimal_places: *decimal_places,
            decoys: *decoys,
            value,
        });
    }
    Ok(finals)
}

/// Input variables with their resolved values, for display next to the question.
/// Without `decimalPlaces` a value shows at most the precision it was drawn at.
pub fn input_variables(
    question: &CompiledQuestion,
    encoding: &Encoding,
    context: &EvaluationContext,
) -> Vec<GeneratedVariable> {
    question
        .inputs()
        .filter_map(|variable| {
            let raw = encoding
                .token(&variable.name)
                .and_then(|token| context.get(token))?;
            let (value, display) = match variable.decimal_places {
                Some(decimal_places) => (
                    round_to(raw, decimal_places),
                    format_fixed(raw, decimal_places),
                ),
                None => (
                    round_to(raw, DEFAULT_INPUT_DECIMAL_PLACES),
                    format_trimmed(raw, DEFAULT_INPUT_DECIMAL_PLACES),
                ),
            };
            Some(GeneratedVariable {
                name: variable.name.clone(),
                unit: variable.unit.clone(),
                value,
                display,
            })
        })
        .collect()
}

pub fn answer_part(name: &str, unit: Option<&str>, value: f64, decimal_places: u8) -> String {
    let value = format_fixed(value, decimal_places);
    match unit {
        Some(unit) => format!("{} ({}) = {}", name, unit, value),
        None => format!("{} = {}", name, value),
    }
}

fn answer_row(finals: &[FinalValue], values: impl Iterator<Item = f64>) -> String {
    finals
        .iter()
        .zip(values)
        .map(|(answer, value)| {
            answer_part(
                &answer.name,
                answer.unit.as_deref(),
                value,
                answer.decimal_places,
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// One correct row plus one row per decoy draw, shuffled together.
pub fn assemble_answers<R: Rng>(
    finals: &[FinalValue],
    decoy_rows: &[Vec<DecoyCandidate>],
    rng: &mut R,
) -> Vec<AnswerOption> {
    let mut answers = Vec::with_capacity(decoy_rows.len() + 1);
    answers.push(AnswerOption {
        content: answer_row(finals, finals.iter().map(|answer| answer.value)),
        is_correct: true,
        is_latex: true,
    });
    for row in decoy_rows {
        answers.push(AnswerOption {
            content: answer_row(finals, row.iter().map(|candidate| candidate.value)),
            is_correct: false,
            is_latex: true,
        });
    }
    answers.shuffle(rng);
    debug!(
        answers = ?answers.iter().map(|answer| answer.content.as_str()).collect::<Vec<_>>(),
        "assembled answer options"
    );
    answers
}
