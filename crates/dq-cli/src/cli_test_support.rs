use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) const OHM_DEFINITION: &str = r#"{
    "variables": [
        {"name": "V", "unit": "V", "default": 12, "randomize": true, "min": 6, "max": 24, "decimalPlaces": 1},
        {"name": "R", "unit": "\\Omega", "default": 4},
        {"name": "I", "unit": "A", "isFinalAnswer": true, "decimalPlaces": 2}
    ],
    "methods": [
        {"expr": "I = V / R", "explanation": "Ohm's law."}
    ]
}"#;

pub(crate) fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("dynquiz-rs-{}-{}", name, nanos))
}

pub(crate) fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}
