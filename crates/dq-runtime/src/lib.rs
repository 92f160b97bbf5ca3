mod engine;
mod helpers;

pub use engine::{
    answer_part, assemble_answers, build_decoy_pool, deviation_range, draw_decoy_rows, draw_random,
    encode, evaluate_steps, final_values, input_variables, resolve_inputs, AlreadyBound,
    DecoyCandidate, DecoyPool, Encoding, EngineOptions, EvaluationContext, FinalValue,
    QuestionEngine, TokenPolicy, DEFAULT_INCORRECT_OPTION_COUNT, DEFAULT_MAX_TOKEN_ATTEMPTS,
    DEFAULT_TOKEN_LENGTH,
};

