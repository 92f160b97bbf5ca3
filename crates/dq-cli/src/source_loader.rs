use std::fs;
use std::path::{Path, PathBuf};

use dq_api::parse_definition_json;
use dq_core::{DynQuizError, QuestionDefinition};
use tracing::warn;
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan};

pub(crate) const DEFINITION_SUFFIX: &str = ".question.json";

/// A definition file found under a `check` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefinitionFile {
    pub(crate) relative: String,
    pub(crate) path: PathBuf,
}

pub(crate) fn resolve_path(raw: &str) -> Result<PathBuf, DynQuizError> {
    let path = PathBuf::from(raw);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(DynQuizError::configuration(
            "CLI_SOURCE_NOT_FOUND",
            format!("path does not exist: {}", absolute.display()),
        ));
    }
    Ok(absolute)
}

pub(crate) fn load_definition(raw: &str) -> Result<QuestionDefinition, DynQuizError> {
    let path = resolve_path(raw)?;
    if !path.is_file() {
        return Err(DynQuizError::configuration(
            "CLI_SOURCE_NOT_FILE",
            format!("definition is not a file: {}", path.display()),
        ));
    }
    read_definition(&path)
}

pub(crate) fn read_definition(path: &Path) -> Result<QuestionDefinition, DynQuizError> {
    let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
    parse_definition_json(&content)
}

pub(crate) fn resolve_definitions_dir(raw: &str) -> Result<PathBuf, DynQuizError> {
    let path = resolve_path(raw)?;
    if !path.is_dir() {
        return Err(DynQuizError::configuration(
            "CLI_SOURCE_NOT_DIR",
            format!("dir is not a directory: {}", path.display()),
        ));
    }
    Ok(path)
}

/// Every `*.question.json` under `root`, sorted by relative path.
pub(crate) fn collect_definition_files(root: &Path) -> Result<Vec<DefinitionFile>, DynQuizError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(DEFINITION_SUFFIX) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");
        files.push(DefinitionFile {
            relative,
            path: path.to_path_buf(),
        });
    }

    if files.is_empty() {
        return Err(DynQuizError::configuration(
            "CLI_SOURCE_EMPTY",
            format!("No {} files under {}", DEFINITION_SUFFIX, root.display()),
        ));
    }

    files.sort_by(|left, right| left.relative.cmp(&right.relative));
    Ok(files)
}
