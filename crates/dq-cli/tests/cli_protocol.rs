use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const RESISTOR_CIRCUIT: &str = r#"{
    "variables": [
        {"name": "R_1", "unit": "\\Omega", "default": 4},
        {"name": "R_2", "unit": "\\Omega", "default": 10},
        {"name": "R_3", "unit": "\\Omega", "default": 8},
        {"name": "V", "unit": "V", "default": 12},
        {"name": "I_3", "unit": "A", "isFinalAnswer": true, "decimalPlaces": 2},
        {"name": "I_final", "unit": "A", "isFinalAnswer": true, "decimalPlaces": 1}
    ],
    "methods": [
        {"expr": "I_1 = V/R_1"},
        {"expr": "I_3 = V/R_3"},
        {"expr": "I_2 = V/R_2"},
        {"expr": "I_final = I_1 + I_2 + I_3"}
    ]
}"#;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("dynquiz-cli-{}-{}.question.json", name, nanos));
    fs::write(&path, content).expect("file should be written");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dynquiz"))
        .args(args)
        .output()
        .expect("cli should execute")
}

fn payload(stdout: &str, label: &str) -> Value {
    let prefix = format!("{}:", label);
    let line = stdout
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .unwrap_or_else(|| panic!("missing {} in:\n{}", label, stdout));
    serde_json::from_str(line).expect("payload should be json")
}

#[test]
fn generate_prints_instance_json() {
    let path = temp_file("generate", RESISTOR_CIRCUIT);
    let output = run(&[
        "generate",
        "--definition",
        path.to_str().expect("path should be utf-8"),
        "--seed",
        "5",
        "--no-randomize",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().next(), Some("RESULT:OK"));

    let instance = payload(&stdout, "INSTANCE_JSON");
    let answers = instance["answers"].as_array().expect("answers");
    assert_eq!(answers.len(), 4);
    let correct = answers
        .iter()
        .filter(|answer| answer["isCorrect"] == Value::Bool(true))
        .collect::<Vec<_>>();
    assert_eq!(correct.len(), 1);
    assert_eq!(correct[0]["content"], "I_3 (A) = 1.50,I_final (A) = 5.7");
    assert_eq!(instance["variables"][0]["name"], "R_1");
}

#[test]
fn generate_is_repeatable_for_a_seed() {
    let path = temp_file("repeatable", RESISTOR_CIRCUIT);
    let path = path.to_str().expect("path should be utf-8");
    let first = run(&["generate", "--definition", path, "--seed", "77"]);
    let second = run(&["generate", "--definition", path, "--seed", "77"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn preview_prints_final_answer_breakdown() {
    let path = temp_file("preview", RESISTOR_CIRCUIT);
    let output = run(&[
        "preview",
        "--definition",
        path.to_str().expect("path should be utf-8"),
        "--seed",
        "1",
    ]);
    assert!(output.status.success());
    let preview = payload(&String::from_utf8_lossy(&output.stdout), "PREVIEW_JSON");
    let finals = preview["finalAnswers"].as_array().expect("final answers");
    assert_eq!(finals.len(), 2);
    assert_eq!(finals[0]["display"], "1.50");
    assert_eq!(finals[0]["incorrectValues"].as_array().map(Vec::len), Some(3));
}

#[test]
fn invalid_equation_uses_error_protocol() {
    let path = temp_file(
        "invalid",
        &RESISTOR_CIRCUIT.replace("I_2 = V/R_2", "I_2 = V = R_2"),
    );
    let output = run(&[
        "generate",
        "--definition",
        path.to_str().expect("path should be utf-8"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.first(), Some(&"RESULT:ERROR"));
    assert_eq!(lines.get(1), Some(&"ERROR_CODE:EXPR_INVALID_EQUATION"));
    assert!(lines
        .iter()
        .any(|line| line.starts_with("ERROR_MSG_JSON:\"")));

    let detail = payload(&stdout, "ERROR_DETAIL_JSON");
    assert_eq!(detail["index"], 3);
    assert_eq!(detail["expr"], "I_2 = V = R_2");
}

#[test]
fn missing_definition_file_is_reported() {
    let output = run(&["generate", "--definition", "/definitely/not/here.question.json"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ERROR_CODE:CLI_SOURCE_NOT_FOUND"));
}
