//! Path addressing over nested JSON trees.
//!
//! Paths use dot-separated names and `[index]` integer subscripts, e.g.
//! `"children[0].name"`. Parsing happens once at this boundary; everything
//! downstream operates on [`PathSegment`] lists. Absence of a path in a
//! tree is a first-class, non-erroneous result; malformed path *syntax* is
//! an error, since paths come from schema authors, not end users.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// One step of a parsed path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Malformed path syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("unclosed '[' in path '{path}'")]
    UnclosedBracket { path: String },

    #[error("invalid array index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("cannot traverse non-container while setting path '{path}'")]
    Traversal { path: String },
}

/// Parses `"a.b[2].c.d"` into `[Key(a), Key(b), Index(2), Key(c), Key(d)]`.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }
                let mut index = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    index.push(c);
                }
                if !closed {
                    return Err(PathError::UnclosedBracket {
                        path: path.to_string(),
                    });
                }
                let parsed = index.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                    path: path.to_string(),
                    index,
                })?;
                segments.push(PathSegment::Index(parsed));
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        segments.push(PathSegment::Key(current));
    }

    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(segments)
}

/// Resolves a path against a tree.
///
/// `Ok(None)` means the path does not exist: a missing key, an
/// out-of-range index, or a non-container encountered mid-path.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Result<Option<&'a Value>, PathError> {
    let segments = parse_path(path)?;
    Ok(resolve_segments(data, &segments))
}

/// Segment-wise walk; `None` as soon as a step cannot be taken.
pub(crate) fn resolve_segments<'a>(data: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    let mut current = data;
    for segment in segments {
        current = match segment {
            PathSegment::Key(key) => current.as_object()?.get(key)?,
            PathSegment::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}

/// Sets a value at a path, creating intermediate containers as needed.
///
/// Whether an intermediate is an array or an object is decided by the
/// *next* segment. Arrays are extended up to the required index: padded
/// with empty containers for intermediate segments, and with `null` for
/// the final one. Encountering an existing non-container along the way is
/// a [`PathError::Traversal`].
pub fn set_path(target: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = parse_path(path)?;
    let traversal = || PathError::Traversal {
        path: path.to_string(),
    };

    let mut current = target;
    for i in 0..segments.len() - 1 {
        let next_is_index = matches!(segments[i + 1], PathSegment::Index(_));
        let empty_container = || {
            if next_is_index {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            }
        };
        current = match (&segments[i], current) {
            (PathSegment::Key(key), Value::Object(map)) => {
                map.entry(key.clone()).or_insert_with(empty_container)
            }
            (PathSegment::Index(index), Value::Array(array)) => {
                while array.len() <= *index {
                    array.push(empty_container());
                }
                &mut array[*index]
            }
            _ => return Err(traversal()),
        };
    }

    match (segments.last().ok_or(PathError::Empty)?, current) {
        (PathSegment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
        }
        (PathSegment::Index(index), Value::Array(array)) => {
            while array.len() <= *index {
                array.push(Value::Null);
            }
            array[*index] = value;
        }
        _ => return Err(traversal()),
    }
    Ok(())
}

/// Expands a flat `path -> value` mapping into one nested tree.
///
/// Later entries may extend containers created by earlier ones.
pub fn expand_bindings(flat: &Map<String, Value>) -> Result<Value, PathError> {
    let mut result = Value::Object(Map::new());
    for (path, value) in flat {
        set_path(&mut result, path, value.clone())?;
    }
    Ok(result)
}

/// Deep-merges `updates` into `base`, returning a new tree.
///
/// Keys where both sides are objects merge recursively; everything else is
/// replaced by the update, arrays included (wholesale, never element-wise).
pub fn deep_merge(base: &Value, updates: &Value) -> Value {
    match (base, updates) {
        (Value::Object(base_map), Value::Object(update_map)) => {
            let mut result = base_map.clone();
            for (key, update_value) in update_map {
                let merged = match result.get(key) {
                    Some(base_value) if base_value.is_object() && update_value.is_object() => {
                        deep_merge(base_value, update_value)
                    }
                    _ => update_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        _ => updates.clone(),
    }
}
