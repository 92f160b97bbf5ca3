use std::collections::BTreeSet;

use dq_core::{DynQuizError, NumberOrExpr, QuestionDefinition, VariableDefinition};
use serde::{Deserialize, Serialize};

pub mod defaults;
mod method_parse;
mod sanitize;

pub use defaults::DEFAULT_INPUT_DECIMAL_PLACES;
pub use sanitize::sanitize_expression;

/// Deviation bounds for decoys, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoyBounds {
    pub min_pct: f64,
    pub max_pct: f64,
    pub step_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomRange {
    pub min: f64,
    pub max: f64,
    pub decimal_places: u8,
}

impl RandomRange {
    /// Uniform sampling needs a width well inside `f64`.
    pub fn is_drawable(&self) -> bool {
        let width = self.max - self.min;
        width.is_finite() && width < f64::MAX / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VariableRole {
    Input {
        default: Option<NumberOrExpr>,
        random: Option<RandomRange>,
    },
    FinalAnswer {
        decimal_places: u8,
        decoys: DecoyBounds,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledVariable {
    pub name: String,
    pub unit: Option<String>,
    pub decimal_places: Option<u8>,
    pub role: VariableRole,
}

impl CompiledVariable {
    pub fn is_final_answer(&self) -> bool {
        matches!(self.role, VariableRole::FinalAnswer { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledStep {
    /// 1-based position in the author's method list.
    pub index: usize,
    pub raw: String,
    pub lhs: String,
    pub rhs: String,
    pub explanation: Option<String>,
}

/// A definition that passed ingestion checks; evaluation never re-validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuestion {
    pub variables: Vec<CompiledVariable>,
    pub steps: Vec<CompiledStep>,
}

impl CompiledQuestion {
    pub fn variable(&self, name: &str) -> Option<&CompiledVariable> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &CompiledVariable> {
        self.variables
            .iter()
            .filter(|variable| !variable.is_final_answer())
    }

    pub fn final_answers(&self) -> impl Iterator<Item = &CompiledVariable> {
        self.variables
            .iter()
            .filter(|variable| variable.is_final_answer())
    }
}

pub fn compile_question(definition: &QuestionDefinition) -> Result<CompiledQuestion, DynQuizError> {
    if definition.variables.is_empty() || definition.methods.is_empty() {
        return Err(DynQuizError::configuration(
            "CONFIG_EMPTY_DEFINITION",
            "Please add at least 1 variable and 1 method for dynamic questions.",
        ));
    }

    let mut seen = BTreeSet::new();
    let mut variables = Vec::with_capacity(definition.variables.len());
    for variable in &definition.variables {
        let compiled = compile_variable(variable)?;
        if !seen.insert(compiled.name.clone()) {
            return Err(DynQuizError::configuration(
                "CONFIG_DUPLICATE_NAME",
                format!("Variable name \"{}\" is declared more than once.", compiled.name),
            ));
        }
        variables.push(compiled);
    }

    if !variables.iter().any(CompiledVariable::is_final_answer) {
        return Err(DynQuizError::configuration(
            "CONFIG_NO_FINAL_ANSWER",
            "No final answers specified.",
        ));
    }

    let steps = method_parse::parse_method_steps(&definition.methods)?;
    Ok(CompiledQuestion { variables, steps })
}

fn compile_variable(variable: &VariableDefinition) -> Result<CompiledVariable, DynQuizError> {
    let name = variable.name.trim().to_string();
    if name.is_empty() {
        return Err(DynQuizError::configuration(
            "CONFIG_EMPTY_NAME",
            "Variable names cannot be empty.",
        ));
    }

    let unit = variable
        .unit
        .as_ref()
        .map(|unit| unit.trim().to_string())
        .filter(|unit| !unit.is_empty());

    let role = if variable.is_final_answer {
        compile_final_answer(&name, variable)?
    } else {
        compile_input(&name, variable)?
    };

    Ok(CompiledVariable {
        name,
        unit,
        decimal_places: variable.decimal_places,
        role,
    })
}

fn compile_final_answer(
    name: &str,
    variable: &VariableDefinition,
) -> Result<VariableRole, DynQuizError> {
    if variable.randomize {
        return Err(DynQuizError::configuration(
            "CONFIG_RANDOMIZED_FINAL_ANSWER",
            format!(
                "Final answer \"{}\" is derived from methods and cannot be randomized.",
                name
            ),
        ));
    }
    let decimal_places = variable.decimal_places.ok_or_else(|| {
        DynQuizError::configuration(
            "CONFIG_DECIMAL_PLACES_MISSING",
            format!("Invalid name or decimal places for \"{}\".", name),
        )
    })?;

    let decoys = defaults::decoy_bounds_from_parts(
        variable.decoy_min_pct.or(variable.min),
        variable.decoy_max_pct.or(variable.max),
        variable.decoy_step_pct,
    );
    if !(decoys.min_pct.is_finite() && decoys.max_pct.is_finite() && decoys.step_pct.is_finite())
        || decoys.step_pct <= 0.0
    {
        return Err(DynQuizError::configuration(
            "CONFIG_DECOY_STEP_INVALID",
            format!("Step size must be a positive number for \"{}\".", name),
        ));
    }
    if decoys.min_pct > decoys.max_pct {
        return Err(DynQuizError::configuration(
            "CONFIG_DECOY_BOUNDS_INVERTED",
            format!(
                "Wrong answer range for \"{}\" starts above its end ({}% > {}%).",
                name, decoys.min_pct, decoys.max_pct
            ),
        ));
    }

    Ok(VariableRole::FinalAnswer {
        decimal_places,
        decoys,
    })
}

fn compile_input(name: &str, variable: &VariableDefinition) -> Result<VariableRole, DynQuizError> {
    let default = variable
        .default
        .clone()
        .filter(|default| !default.is_blank());

    let random = if variable.randomize {
        let (Some(min), Some(max)) = (variable.min, variable.max) else {
            return Err(DynQuizError::configuration(
                "CONFIG_RANDOM_BOUNDS_MISSING",
                format!("Randomized variable \"{}\" needs both min and max.", name),
            ));
        };
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(DynQuizError::configuration(
                "CONFIG_RANDOM_BOUNDS_INVERTED",
                format!(
                    "Randomized variable \"{}\" has an invalid range [{}, {}].",
                    name, min, max
                ),
            ));
        }
        let range = RandomRange {
            min,
            max,
            decimal_places: variable
                .decimal_places
                .unwrap_or(DEFAULT_INPUT_DECIMAL_PLACES),
        };
        if !range.is_drawable() {
            return Err(random_range_too_wide(name, min, max));
        }
        Some(range)
    } else {
        None
    };

    Ok(VariableRole::Input { default, random })
}

pub fn random_range_too_wide(name: &str, min: f64, max: f64) -> DynQuizError {
    DynQuizError::configuration(
        "CONFIG_RANDOM_BOUNDS_TOO_WIDE",
        format!(
            "Randomized variable \"{}\" has a range [{}, {}] too wide to draw from.",
            name, min, max
        ),
    )
}

#[cfg(test)]
mod tests;
