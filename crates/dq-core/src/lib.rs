pub mod error;
pub mod types;
pub mod value;

pub use error::{DynQuizError, ErrorDetail, ErrorKind, ExpressionDiagnostics};
pub use types::*;
pub use value::*;
