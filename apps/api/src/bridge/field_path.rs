//! Dotted-path edits of the résumé record (`personalInfo.fullName`,
//! `experiences.0.title`, `skills.2`).
//!
//! The record is walked as JSON: intermediate mappings are created on demand,
//! numeric segments index sequences, and the result must still deserialize as
//! a `ResumeRecord`. A failed edit leaves the record untouched.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::record::ResumeRecord;

#[derive(Debug, Error, PartialEq)]
pub enum FieldPathError {
    #[error("Field path is empty")]
    Empty,

    #[error("Field path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("'{segment}' in field path '{path}' is not a mapping")]
    NotAMapping { path: String, segment: String },

    #[error("Index {index} in field path '{path}' is out of range")]
    IndexOutOfRange { path: String, index: usize },

    #[error("Field path '{path}' cannot hold this value: {reason}")]
    Incompatible { path: String, reason: String },
}

/// Writes `value` at `path` inside `record`.
pub fn apply_field_edit(
    record: &mut ResumeRecord,
    path: &str,
    value: &str,
) -> Result<(), FieldPathError> {
    let segments = split_path(path)?;

    let incompatible = |e: serde_json::Error| FieldPathError::Incompatible {
        path: path.to_string(),
        reason: e.to_string(),
    };

    let mut root = serde_json::to_value(&*record).map_err(incompatible)?;
    set_nested_value(&mut root, &segments, path, Value::String(value.to_string()))?;
    *record = serde_json::from_value(root).map_err(incompatible)?;
    Ok(())
}

fn split_path(path: &str) -> Result<Vec<&str>, FieldPathError> {
    if path.trim().is_empty() {
        return Err(FieldPathError::Empty);
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(FieldPathError::EmptySegment(path.to_string()));
    }
    Ok(segments)
}

fn set_nested_value(
    root: &mut Value,
    segments: &[&str],
    path: &str,
    value: Value,
) -> Result<(), FieldPathError> {
    let (leaf, parents) = segments.split_last().ok_or(FieldPathError::Empty)?;

    let mut current = root;
    for segment in parents {
        current = child_or_create(current, segment, path)?;
    }

    match current {
        Value::Object(map) => {
            map.insert((*leaf).to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(leaf, path)?;
            if index < items.len() {
                items[index] = value;
                Ok(())
            } else if index == items.len() {
                items.push(value);
                Ok(())
            } else {
                Err(FieldPathError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                })
            }
        }
        _ => Err(FieldPathError::NotAMapping {
            path: path.to_string(),
            segment: (*leaf).to_string(),
        }),
    }
}

/// Steps one level down, creating an empty mapping where nothing exists yet.
fn child_or_create<'a>(
    current: &'a mut Value,
    segment: &str,
    path: &str,
) -> Result<&'a mut Value, FieldPathError> {
    match current {
        Value::Object(map) => {
            let slot = map.entry(segment.to_string()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            Ok(slot)
        }
        Value::Array(items) => {
            let index = parse_index(segment, path)?;
            if index == items.len() {
                items.push(Value::Object(Map::new()));
            }
            items.get_mut(index).ok_or(FieldPathError::IndexOutOfRange {
                path: path.to_string(),
                index,
            })
        }
        _ => Err(FieldPathError::NotAMapping {
            path: path.to_string(),
            segment: segment.to_string(),
        }),
    }
}

fn parse_index(segment: &str, path: &str) -> Result<usize, FieldPathError> {
    segment
        .parse::<usize>()
        .map_err(|_| FieldPathError::NotAMapping {
            path: path.to_string(),
            segment: segment.to_string(),
        })
}
