use super::*;
use dq_core::{ErrorKind, MethodDefinition};

fn input(name: &str, default: f64) -> VariableDefinition {
    VariableDefinition {
        name: name.to_string(),
        default: Some(NumberOrExpr::Number(default)),
        ..VariableDefinition::default()
    }
}

fn final_answer(name: &str, decimal_places: u8) -> VariableDefinition {
    VariableDefinition {
        name: name.to_string(),
        is_final_answer: true,
        decimal_places: Some(decimal_places),
        ..VariableDefinition::default()
    }
}

fn methods(exprs: &[&str]) -> Vec<MethodDefinition> {
    exprs
        .iter()
        .map(|expr| MethodDefinition {
            expr: (*expr).to_string(),
            explanation: None,
        })
        .collect()
}

fn definition(variables: Vec<VariableDefinition>, exprs: &[&str]) -> QuestionDefinition {
    QuestionDefinition {
        variables,
        methods: methods(exprs),
    }
}

#[test]
fn compile_question_tags_inputs_and_final_answers() {
    let compiled = compile_question(&definition(
        vec![input(" V ", 12.0), input("R", 4.0), final_answer("I", 2)],
        &["I = V / R"],
    ))
    .expect("definition should compile");

    assert_eq!(compiled.inputs().count(), 2);
    let final_answers = compiled.final_answers().collect::<Vec<_>>();
    assert_eq!(final_answers.len(), 1);
    assert_eq!(
        final_answers[0].role,
        VariableRole::FinalAnswer {
            decimal_places: 2,
            decoys: DecoyBounds::default(),
        }
    );
    assert!(compiled.variable("V").is_some(), "names are trimmed");
    assert_eq!(compiled.steps.len(), 1);
    assert_eq!(compiled.steps[0].lhs, "I");
}

#[test]
fn compile_question_rejects_empty_sets() {
    let error = compile_question(&definition(vec![final_answer("I", 1)], &[]))
        .expect_err("methods are required");
    assert_eq!(error.code, "CONFIG_EMPTY_DEFINITION");
    assert_eq!(error.kind, ErrorKind::Configuration);

    let error = compile_question(&definition(Vec::new(), &["I = 1"]))
        .expect_err("variables are required");
    assert_eq!(error.code, "CONFIG_EMPTY_DEFINITION");
}

#[test]
fn compile_question_rejects_blank_and_duplicate_names() {
    let error = compile_question(&definition(
        vec![input("   ", 1.0), final_answer("I", 1)],
        &["I = 1"],
    ))
    .expect_err("blank name should fail");
    assert_eq!(error.code, "CONFIG_EMPTY_NAME");

    let error = compile_question(&definition(
        vec![input("R", 1.0), input("R ", 2.0), final_answer("I", 1)],
        &["I = R"],
    ))
    .expect_err("duplicate name should fail");
    assert_eq!(error.code, "CONFIG_DUPLICATE_NAME");
}

#[test]
fn compile_question_rejects_randomized_final_answer() {
    let mut answer = final_answer("I", 1);
    answer.randomize = true;
    let error = compile_question(&definition(vec![answer], &["I = 1"]))
        .expect_err("randomized final answer should fail");
    assert_eq!(error.code, "CONFIG_RANDOMIZED_FINAL_ANSWER");
}

#[test]
fn compile_question_requires_final_answer_decimal_places() {
    let mut answer = final_answer("I", 1);
    answer.decimal_places = None;
    let error = compile_question(&definition(vec![answer], &["I = 1"]))
        .expect_err("decimal places are required");
    assert_eq!(error.code, "CONFIG_DECIMAL_PLACES_MISSING");
    assert!(error.message.contains("\"I\""));
}

#[test]
fn compile_question_requires_a_final_answer() {
    let error = compile_question(&definition(vec![input("V", 1.0)], &["W = V"]))
        .expect_err("final answer required");
    assert_eq!(error.code, "CONFIG_NO_FINAL_ANSWER");
}

#[test]
fn compile_question_checks_random_bounds() {
    let mut variable = input("V", 1.0);
    variable.randomize = true;
    variable.min = Some(1.0);
    let error = compile_question(&definition(
        vec![variable.clone(), final_answer("I", 1)],
        &["I = V"],
    ))
    .expect_err("max is required");
    assert_eq!(error.code, "CONFIG_RANDOM_BOUNDS_MISSING");
    assert!(error.message.contains("\"V\""));

    variable.max = Some(0.5);
    let error = compile_question(&definition(
        vec![variable.clone(), final_answer("I", 1)],
        &["I = V"],
    ))
    .expect_err("inverted range should fail");
    assert_eq!(error.code, "CONFIG_RANDOM_BOUNDS_INVERTED");

    let mut wide = variable.clone();
    wide.min = Some(-1e308);
    wide.max = Some(1e308);
    let error = compile_question(&definition(vec![wide, final_answer("I", 1)], &["I = V"]))
        .expect_err("width overflows f64");
    assert_eq!(error.code, "CONFIG_RANDOM_BOUNDS_TOO_WIDE");
    assert!(error.message.contains("\"V\""));

    variable.max = Some(5.0);
    let compiled = compile_question(&definition(vec![variable, final_answer("I", 1)], &["I = V"]))
        .expect("range should compile");
    let role = &compiled.variable("V").expect("V").role;
    assert_eq!(
        role,
        &VariableRole::Input {
            default: Some(NumberOrExpr::Number(1.0)),
            random: Some(RandomRange {
                min: 1.0,
                max: 5.0,
                decimal_places: DEFAULT_INPUT_DECIMAL_PLACES,
            }),
        }
    );
}

#[test]
fn compile_question_reads_decoy_bounds_from_legacy_fields() {
    let mut answer = final_answer("I", 2);
    answer.min = Some(-40.0);
    answer.max = Some(40.0);
    answer.decoy_step_pct = Some(5.0);
    let compiled = compile_question(&definition(vec![answer], &["I = 2"])).expect("compile");
    let role = &compiled.variable("I").expect("I").role;
    assert_eq!(
        role,
        &VariableRole::FinalAnswer {
            decimal_places: 2,
            decoys: DecoyBounds {
                min_pct: -40.0,
                max_pct: 40.0,
                step_pct: 5.0,
            },
        }
    );
}

#[test]
fn compile_question_rejects_bad_decoy_settings() {
    let mut answer = final_answer("I", 2);
    answer.decoy_step_pct = Some(0.0);
    let error = compile_question(&definition(vec![answer.clone()], &["I = 2"]))
        .expect_err("zero step should fail");
    assert_eq!(error.code, "CONFIG_DECOY_STEP_INVALID");

    answer.decoy_step_pct = Some(10.0);
    answer.decoy_min_pct = Some(50.0);
    answer.decoy_max_pct = Some(-50.0);
    let error = compile_question(&definition(vec![answer], &["I = 2"]))
        .expect_err("inverted decoy range should fail");
    assert_eq!(error.code, "CONFIG_DECOY_BOUNDS_INVERTED");
}

#[test]
fn compile_question_rejects_malformed_method_before_evaluation() {
    let error = compile_question(&definition(
        vec![input("b", 1.0), final_answer("a", 1)],
        &["a = b", "a = b = c"],
    ))
    .expect_err("two equals should fail");
    assert_eq!(error.kind, ErrorKind::Expression);
    assert_eq!(error.code, "EXPR_INVALID_EQUATION");
    assert_eq!(error.diagnostics().map(|d| d.index), Some(2));
}

#[test]
fn compile_question_treats_blank_default_as_missing() {
    let mut variable = input("V", 0.0);
    variable.default = Some(NumberOrExpr::Expr("  ".to_string()));
    let compiled = compile_question(&definition(vec![variable, final_answer("I", 1)], &["I = V"]))
        .expect("compile");
    assert_eq!(
        compiled.variable("V").map(|variable| &variable.role),
        Some(&VariableRole::Input {
            default: None,
            random: None,
        })
    );
}

#[test]
fn compiled_question_serializes_roles_with_kind_tag() {
    let compiled = compile_question(&definition(
        vec![input("V", 12.0), final_answer("I", 1)],
        &["I = V"],
    ))
    .expect("compile");
    let json = serde_json::to_value(&compiled).expect("serialize");
    assert_eq!(json["variables"][0]["role"]["kind"], "input");
    assert_eq!(json["variables"][1]["role"]["kind"], "finalAnswer");
}
