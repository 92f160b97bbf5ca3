use dq_compiler::CompiledQuestion;
use dq_core::{DynQuizError, EditorPreview, FinalAnswerPreview, GeneratedInstance};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{
    assemble_answers, build_decoy_pool, draw_decoy_rows, encode, evaluate_steps, final_values,
    input_variables, resolve_inputs, TokenPolicy,
};
use crate::helpers::rhai_bridge::build_math_engine;

pub const DEFAULT_INCORRECT_OPTION_COUNT: usize = 3;
pub const DEFAULT_TOKEN_LENGTH: usize = 8;
pub const DEFAULT_MAX_TOKEN_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Number of wrong rows next to the correct one.
    pub incorrect_option_count: usize,
    pub token_length: usize,
    pub max_token_attempts: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            incorrect_option_count: DEFAULT_INCORRECT_OPTION_COUNT,
            token_length: DEFAULT_TOKEN_LENGTH,
            max_token_attempts: DEFAULT_MAX_TOKEN_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionEngine {
    options: EngineOptions,
}

impl QuestionEngine {
    pub fn new(options: EngineOptions) -> Result<Self, DynQuizError> {
        if options.incorrect_option_count == 0 {
            return Err(DynQuizError::configuration(
                "CONFIG_ENGINE_OPTIONS",
                "incorrectOptionCount must be at least 1.",
            ));
        }
        if options.token_length == 0 || options.max_token_attempts == 0 {
            return Err(DynQuizError::configuration(
                "CONFIG_ENGINE_OPTIONS",
                "tokenLength and maxTokenAttempts must be at least 1.",
            ));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn generate<R: Rng>(
        &self,
        question: &CompiledQuestion,
        randomize: bool,
        rng: &mut R,
    ) -> Result<GeneratedInstance, DynQuizError> {
        self.preview(question, randomize, rng)
            .map(|preview| preview.instance)
    }

    /// Same pipeline as [`QuestionEngine::generate`], also reporting how each
    /// final answer's decoys were produced.
    pub fn preview<R: Rng>(
        &self,
        question: &CompiledQuestion,
        randomize: bool,
        rng: &mut R,
    ) -> Result<EditorPreview, DynQuizError> {
        let math = build_math_engine();
        let mut encoding = encode(
            question
                .variables
                .iter()
                .map(|variable| variable.name.as_str()),
            TokenPolicy {
                length: self.options.token_length,
                max_attempts: self.options.max_token_attempts,
            },
            rng,
        )?;
        debug!(names = encoding.len(), "encoded variable names");

        let mut context = resolve_inputs(question, &encoding, &math, randomize, rng)?;
        evaluate_steps(question, &mut encoding, &mut context, &math, rng)?;

        let count = self.options.incorrect_option_count;
        let finals = final_values(question, &encoding, &context)?;
        let pools = finals
            .iter()
            .map(|answer| {
                build_decoy_pool(
                    &answer.name,
                    answer.value,
                    answer.decimal_places,
                    &answer.decoys,
                    count,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rows = draw_decoy_rows(&pools, count, rng)?;

        let variables = input_variables(question, &encoding, &context);
        let answers = assemble_answers(&finals, &rows, rng);

        let final_answers = finals
            .iter()
            .zip(pools)
            .enumerate()
            .map(|(column, (answer, pool))| FinalAnswerPreview {
                name: answer.name.clone(),
                unit: answer.unit.clone(),
                value: answer.value,
                display: dq_core::format_fixed(answer.value, answer.decimal_places),
                percentages: pool.percentages,
                incorrect_values: rows.iter().map(|row| row[column].value).collect(),
            })
            .collect();

        Ok(EditorPreview {
            final_answers,
            instance: GeneratedInstance { variables, answers },
        })
    }
}
