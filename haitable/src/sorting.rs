//! Sort keys and the row comparator.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::Column;
use crate::source::Row;

/// One entry of the sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Column id.
    pub id: String,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Direction of a sorted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Next sort order after a header click on `column_id`.
///
/// A column cycles unsorted -> ascending -> descending -> unsorted. Without
/// `multi` the result only ever holds the clicked column; with `multi` other
/// keys are kept and a new column is appended.
pub fn cycle_sort(sorting: &[SortKey], column_id: &str, multi: bool) -> Vec<SortKey> {
    let current = sorting.iter().find(|k| k.id == column_id);
    let next = match current {
        None => Some(SortKey::asc(column_id)),
        Some(key) if !key.desc => Some(SortKey::desc(column_id)),
        Some(_) => None,
    };

    if !multi {
        return next.into_iter().collect();
    }

    let mut sorting = sorting.to_vec();
    match (sorting.iter().position(|k| k.id == column_id), next) {
        (Some(pos), Some(key)) => sorting[pos] = key,
        (Some(pos), None) => {
            sorting.remove(pos);
        }
        (None, Some(key)) => sorting.push(key),
        (None, None) => {}
    }
    sorting
}

// =============================================================================
// Comparator
// =============================================================================

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Bool(_) => 1,
        Value::String(_) => 2,
        _ => 3,
    }
}

/// Compare two present cell values.
///
/// Numbers compare numerically, booleans false before true, strings with a
/// case-insensitive natural order. Mixed kinds order number < bool < string.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => natural_cmp(x, y),
        _ => match kind_rank(a).cmp(&kind_rank(b)) {
            Ordering::Equal => a.to_string().cmp(&b.to_string()),
            other => other,
        },
    }
}

/// Case-insensitive comparison treating digit runs as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let da = take_digits(&mut ai);
                let db = take_digits(&mut bi);
                let ta = da.trim_start_matches('0');
                let tb = db.trim_start_matches('0');
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Compare two rows under a sort order.
///
/// Missing and null values sort last in either direction.
pub fn compare_rows(a: &Row, b: &Row, columns: &[Column], sorting: &[SortKey]) -> Ordering {
    for key in sorting {
        let Some(column) = columns.iter().find(|c| c.id == key.id) else {
            continue;
        };
        let ord = match (present(column.value(a)), present(column.value(b))) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                if key.desc { ord.reverse() } else { ord }
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
