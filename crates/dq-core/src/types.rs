use serde::{Deserialize, Serialize};

use crate::value::NumberOrExpr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded: Option<String>,
    #[serde(default)]
    pub is_final_answer: bool,
    #[serde(default)]
    pub randomize: bool,
    #[serde(default)]
    pub default: Option<NumberOrExpr>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub decimal_places: Option<u8>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Final answers only; older definitions keep these in `min`/`max`/`step`.
    #[serde(default)]
    pub decoy_min_pct: Option<f64>,
    #[serde(default)]
    pub decoy_max_pct: Option<f64>,
    #[serde(default, alias = "step")]
    pub decoy_step_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDefinition {
    pub expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDefinition {
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVariable {
    pub name: String,
    pub unit: Option<String>,
    pub value: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub content: String,
    pub is_correct: bool,
    #[serde(default = "default_is_latex")]
    pub is_latex: bool,
}

fn default_is_latex() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInstance {
    pub variables: Vec<GeneratedVariable>,
    pub answers: Vec<AnswerOption>,
}

impl GeneratedInstance {
    pub fn correct_answer(&self) -> Option<&AnswerOption> {
        self.answers.iter().find(|answer| answer.is_correct)
    }
}

/// Per final answer breakdown shown in the question editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAnswerPreview {
    pub name: String,
    pub unit: Option<String>,
    pub value: f64,
    pub display: String,
    pub percentages: Vec<String>,
    pub incorrect_values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPreview {
    pub final_answers: Vec<FinalAnswerPreview>,
    pub instance: GeneratedInstance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuestionSource {
    Dynamic { definition: QuestionDefinition },
    Static { answers: Vec<AnswerOption> },
}
