//! Plan coercion for AI-generated quest lists
//!
//! The chat collaborator returns free-form text that should contain a JSON
//! task list somewhere inside it, usually wrapped in a markdown code fence
//! and surrounded by prose. This module digs the document out and coerces
//! the loose shapes models actually produce into [`DraftTask`]s. Talking to
//! the model is someone else's job; this only ever sees text.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("No JSON document found in plan text")]
    NoJson,

    #[error("Plan JSON is not a task list")]
    NotAList,

    #[error("Plan entry {0} has no usable title")]
    MissingTitle(usize),
}

/// A proposed task, not yet in the store
///
/// `deps` are zero-based references to other entries of the same plan;
/// importing rewrites them to store ids.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftTask {
    pub title: String,
    pub deps: Vec<usize>,
}

/// Extracts and coerces a task list from collaborator text.
///
/// Accepted shapes: a top-level array, or an object wrapping the array under
/// a `tasks` or `plan` key. Entries may be bare strings (title only) or
/// objects with a `title`/`name`/`task` key and optional
/// `deps`/`dependencies`/`dependsOn` index list. Non-numeric, out-of-range
/// and self-referential indexes are dropped; a blank title is an error.
pub fn parse_plan(text: &str) -> Result<Vec<DraftTask>, PlanError> {
    let document = extract_json(text).ok_or(PlanError::NoJson)?;

    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("tasks").or_else(|| map.remove("plan")) {
            Some(Value::Array(entries)) => entries,
            _ => return Err(PlanError::NotAList),
        },
        _ => return Err(PlanError::NotAList),
    };

    let count = entries.len();
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| coerce_entry(index, entry, count))
        .collect()
}

/// Finds the first parseable JSON array or object in the text.
///
/// Tries every `[`/`{` position so fences and prose braces before the
/// document don't matter; trailing prose is ignored by stream parsing.
fn extract_json(text: &str) -> Option<Value> {
    for (pos, ch) in text.char_indices() {
        if ch != '[' && ch != '{' {
            continue;
        }
        let mut stream = serde_json::Deserializer::from_str(&text[pos..]).into_iter::<Value>();
        if let Some(Ok(value)) = stream.next() {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Some(value);
            }
        }
    }
    None
}

fn coerce_entry(index: usize, entry: &Value, count: usize) -> Result<DraftTask, PlanError> {
    match entry {
        Value::String(title) => {
            let title = title.trim();
            if title.is_empty() {
                return Err(PlanError::MissingTitle(index));
            }
            Ok(DraftTask {
                title: title.to_string(),
                deps: Vec::new(),
            })
        }
        Value::Object(map) => {
            let title = ["title", "name", "task"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or(PlanError::MissingTitle(index))?;

            let deps = ["deps", "dependencies", "dependsOn"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_array)
                .map(|refs| coerce_deps(index, refs, count))
                .unwrap_or_default();

            Ok(DraftTask {
                title: title.to_string(),
                deps,
            })
        }
        _ => Err(PlanError::MissingTitle(index)),
    }
}

/// Keeps numeric, in-range, non-self references, first occurrence only
fn coerce_deps(index: usize, refs: &[Value], count: usize) -> Vec<usize> {
    let mut deps = Vec::new();
    for reference in refs {
        let Some(target) = reference.as_u64().map(|n| n as usize) else {
            continue;
        };
        if target >= count || target == index || deps.contains(&target) {
            continue;
        }
        deps.push(target);
    }
    deps
}
