mod assembler;
mod context;
mod decoys;
mod encoder;
mod evaluator;
mod lifecycle;
mod resolver;

pub use assembler::{answer_part, assemble_answers, final_values, input_variables, FinalValue};
pub use context::{AlreadyBound, EvaluationContext};
pub use decoys::{build_decoy_pool, deviation_range, draw_decoy_rows, DecoyCandidate, DecoyPool};
pub use encoder::{encode, Encoding, TokenPolicy};
pub use evaluator::evaluate_steps;
pub use lifecycle::{
    EngineOptions, QuestionEngine, DEFAULT_INCORRECT_OPTION_COUNT, DEFAULT_MAX_TOKEN_ATTEMPTS,
    DEFAULT_TOKEN_LENGTH,
};
pub use resolver::{draw_random, resolve_inputs};
