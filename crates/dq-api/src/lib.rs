use dq_compiler::{compile_question, CompiledQuestion};
use dq_core::{
    DynQuizError, EditorPreview, ErrorKind, GeneratedInstance, QuestionDefinition, QuestionSource,
};
use dq_runtime::{EngineOptions, QuestionEngine};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seed used by [`validate_definition`] so that a check is repeatable.
pub const VALIDATION_SEED: u64 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInstanceOptions {
    pub definition: QuestionDefinition,
    #[serde(default = "default_randomize")]
    pub randomize: bool,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub engine_options: EngineOptions,
}

fn default_randomize() -> bool {
    true
}

pub fn parse_definition_json(json: &str) -> Result<QuestionDefinition, DynQuizError> {
    serde_json::from_str(json).map_err(|error| {
        DynQuizError::new(
            ErrorKind::Configuration,
            "API_DEFINITION_INVALID",
            format!("Question definition is not valid JSON: {}", error),
        )
    })
}

pub fn generate_instance(
    options: GenerateInstanceOptions,
) -> Result<GeneratedInstance, DynQuizError> {
    let question = compile_question(&options.definition)?;
    let engine = QuestionEngine::new(options.engine_options)?;
    let mut rng = rng_from_seed(options.random_seed);
    engine.generate(&question, options.randomize, &mut rng)
}

pub fn generate_instance_from_json(
    json: &str,
    randomize: bool,
    random_seed: Option<u64>,
) -> Result<GeneratedInstance, DynQuizError> {
    generate_instance(GenerateInstanceOptions {
        definition: parse_definition_json(json)?,
        randomize,
        random_seed,
        engine_options: EngineOptions::default(),
    })
}

/// Produces the variation a learner sees: dynamic questions are generated
/// with randomization on, static ones keep their answers in a new order.
pub fn instantiate_question(
    source: QuestionSource,
    random_seed: Option<u64>,
) -> Result<GeneratedInstance, DynQuizError> {
    match source {
        QuestionSource::Dynamic { definition } => generate_instance(GenerateInstanceOptions {
            definition,
            randomize: true,
            random_seed,
            engine_options: EngineOptions::default(),
        }),
        QuestionSource::Static { mut answers } => {
            if answers.is_empty() {
                return Err(DynQuizError::configuration(
                    "API_STATIC_ANSWERS_EMPTY",
                    "Static questions need at least one answer.",
                ));
            }
            if !answers.iter().any(|answer| answer.is_correct) {
                return Err(DynQuizError::configuration(
                    "API_STATIC_NO_CORRECT_ANSWER",
                    "Static questions need a correct answer.",
                ));
            }
            let mut rng = rng_from_seed(random_seed);
            answers.shuffle(&mut rng);
            debug!(answers = answers.len(), "shuffled static answers");
            Ok(GeneratedInstance {
                variables: Vec::new(),
                answers,
            })
        }
    }
}

pub fn preview_definition(
    definition: &QuestionDefinition,
    randomize: bool,
    random_seed: Option<u64>,
) -> Result<EditorPreview, DynQuizError> {
    let question = compile_question(definition)?;
    let engine = QuestionEngine::new(EngineOptions::default())?;
    let mut rng = rng_from_seed(random_seed);
    engine.preview(&question, randomize, &mut rng)
}

/// Compiles the definition and runs it once with a fixed seed.
pub fn validate_definition(
    definition: &QuestionDefinition,
) -> Result<CompiledQuestion, DynQuizError> {
    let question = compile_question(definition)?;
    let engine = QuestionEngine::new(EngineOptions::default())?;
    let mut rng = StdRng::seed_from_u64(VALIDATION_SEED);
    engine.generate(&question, true, &mut rng)?;
    Ok(question)
}

fn rng_from_seed(random_seed: Option<u64>) -> StdRng {
    match random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
