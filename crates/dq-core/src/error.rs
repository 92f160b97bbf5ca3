use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Configuration,
    Expression,
    InsufficientDecoys,
    ResultNotANumber,
}

/// Everything an author needs to locate a failing method step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionDiagnostics {
    /// 1-based, as numbered in the editor.
    pub index: usize,
    pub expr: String,
    pub sanitized: String,
    pub encoded: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ErrorDetail {
    Expression(ExpressionDiagnostics),
    Decoys {
        variable: String,
        percentages: Vec<String>,
    },
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct DynQuizError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub detail: Option<ErrorDetail>,
}

impl DynQuizError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn configuration(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, code, message)
    }

    pub fn expression(
        code: impl Into<String>,
        message: impl Into<String>,
        diagnostics: ExpressionDiagnostics,
    ) -> Self {
        Self {
            detail: Some(ErrorDetail::Expression(diagnostics)),
            ..Self::new(ErrorKind::Expression, code, message)
        }
    }

    pub fn insufficient_decoys(variable: impl Into<String>, percentages: Vec<String>) -> Self {
        let variable = variable.into();
        let message = format!(
            "Not enough wrong answers for variable {}. Try increasing the decimal places, step size or range. Your settings generated: [{}]",
            variable,
            percentages.join(",")
        );
        Self {
            detail: Some(ErrorDetail::Decoys {
                variable,
                percentages,
            }),
            ..Self::new(ErrorKind::InsufficientDecoys, "DECOY_INSUFFICIENT", message)
        }
    }

    pub fn result_not_a_number(variable: &str) -> Self {
        Self::new(
            ErrorKind::ResultNotANumber,
            "RESULT_NOT_A_NUMBER",
            format!(
                "Final answer \"{}\" is not a number, please check that it is used in your methods correctly.",
                variable
            ),
        )
    }

    pub fn diagnostics(&self) -> Option<&ExpressionDiagnostics> {
        match &self.detail {
            Some(ErrorDetail::Expression(diagnostics)) => Some(diagnostics),
            _ => None,
        }
    }
}
