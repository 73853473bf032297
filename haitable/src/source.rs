//! Row sources and row identity.
//!
//! Rows are opaque JSON records. A table receives them either directly or as a
//! dotted path into a larger payload (`rowsRef` + `extraData`).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataResolutionError;

// =============================================================================
// Row identity
// =============================================================================

/// Stable identifier of a row within one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

/// One application record plus its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Stable identifier.
    pub id: RowId,
    /// Position in the source dataset.
    pub index: usize,
    /// The record itself.
    pub data: Arc<Value>,
}

impl Row {
    /// Read the value at a (possibly dotted) accessor key.
    pub fn value(&self, accessor_key: &str) -> Option<&Value> {
        lookup_path(&self.data, accessor_key)
    }
}

/// Assign ids to raw records.
///
/// With `id_field` set, a record's id is the string form of that field when
/// it holds a string or number. Every other record falls back to its index.
/// Ids are unique: a repeated field value falls back to the index too, with a
/// warning.
pub fn build_rows(values: Vec<Value>, id_field: Option<&str>) -> Vec<Row> {
    let mut seen: HashSet<RowId> = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .enumerate()
        .map(|(index, data)| {
            let explicit = id_field
                .and_then(|field| lookup_path(&data, field))
                .and_then(|value| match value {
                    Value::String(s) => Some(RowId::new(s.clone())),
                    Value::Number(n) => Some(RowId::new(n.to_string())),
                    _ => None,
                });
            let id = match explicit {
                Some(id) if !seen.contains(&id) => id,
                Some(id) => {
                    let fallback = unused_index_id(index, &seen);
                    log::warn!(
                        "Duplicate row id '{}' at index {}, using '{}'",
                        id,
                        index,
                        fallback
                    );
                    fallback
                }
                None => unused_index_id(index, &seen),
            };
            seen.insert(id.clone());
            Row {
                id,
                index,
                data: Arc::new(data),
            }
        })
        .collect()
}

/// The index as an id, suffixed when an explicit id already took it.
fn unused_index_id(index: usize, seen: &HashSet<RowId>) -> RowId {
    let id = RowId::from(index);
    if !seen.contains(&id) {
        return id;
    }
    (1..)
        .map(|n| RowId::new(format!("{}~{}", index, n)))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or(id)
}

// =============================================================================
// Nested lookup
// =============================================================================

/// Look up a `.`-separated path inside a JSON value.
///
/// Object segments are keys, numeric segments index into arrays. A key that
/// exists verbatim (dots included) wins over the nested interpretation.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    if let Value::Object(map) = value
        && let Some(direct) = map.get(path)
    {
        return Some(direct);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

// =============================================================================
// RowSource
// =============================================================================

/// Where a table's rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSource {
    /// Rows supplied directly.
    Rows(Vec<Value>),
    /// A dotted path into a larger payload.
    Ref { path: String, extra_data: Value },
}

impl Default for RowSource {
    fn default() -> Self {
        RowSource::Rows(Vec::new())
    }
}

impl RowSource {
    /// Creates a reference source.
    pub fn reference(path: impl Into<String>, extra_data: Value) -> Self {
        RowSource::Ref {
            path: path.into(),
            extra_data,
        }
    }

    /// Resolve the record list.
    pub fn resolve(&self) -> Result<Vec<Value>, DataResolutionError> {
        match self {
            RowSource::Rows(rows) => Ok(rows.clone()),
            RowSource::Ref { path, extra_data } => {
                if path.trim().is_empty() {
                    return Err(DataResolutionError::EmptyPath);
                }
                match lookup_path(extra_data, path) {
                    Some(Value::Array(items)) => Ok(items.clone()),
                    Some(_) => Err(DataResolutionError::NotAnArray { path: path.clone() }),
                    None => Err(DataResolutionError::not_found(path.as_str())),
                }
            }
        }
    }

    /// Resolve the records, degrading to an empty set on failure.
    pub fn resolve_or_empty(&self) -> Vec<Value> {
        match self.resolve() {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Rendering empty table: {}", e);
                Vec::new()
            }
        }
    }
}
