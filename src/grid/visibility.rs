//! Column Visibility - OR-reduction of cell conditions per column.
//!
//! A column stays rendered if at least one of its cells is visible. Cells
//! without [`Capabilities::CONDITIONAL`] always count as visible.
//!
//! The returned `changed` flag compares whole maps by value. It is the guard
//! that stops re-entrant condition checks from rebuilding on every pass.

use std::collections::BTreeMap;

use serde_json::Value;

use super::rows::RowMatrix;
use crate::config::ColumnSchema;
use crate::types::Capabilities;

/// Column key -> visible. Keys match the column set exactly.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Result of one visibility pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCheck {
    pub visibility: VisibilityMap,
    /// Map differs from the previous one; a structural rebuild is due.
    pub changed: bool,
    /// At least one column is visible.
    pub show: bool,
}

/// Every column visible.
pub fn all_visible(columns: &[ColumnSchema]) -> VisibilityMap {
    columns.iter().map(|c| (c.key.clone(), true)).collect()
}

/// Recompute per-column visibility for `data`.
///
/// With no rows there is nothing to evaluate: the previous map is kept and the
/// grid still shows (header and add button remain available).
pub fn evaluate(
    columns: &[ColumnSchema],
    matrix: &mut RowMatrix,
    data: &Value,
    previous: &VisibilityMap,
) -> ColumnCheck {
    if matrix.is_empty() {
        return ColumnCheck {
            visibility: previous.clone(),
            changed: false,
            show: true,
        };
    }

    let mut visibility: VisibilityMap = columns.iter().map(|c| (c.key.clone(), false)).collect();

    for record in matrix.iter_mut() {
        for (key, child) in record.cells_mut() {
            let Some(visible) = visibility.get_mut(key) else {
                continue;
            };
            // One visible cell is enough for the column
            if *visible {
                continue;
            }
            *visible = !child.capabilities().contains(Capabilities::CONDITIONAL)
                || child.check_conditions(data);
        }
    }

    let changed = visibility != *previous;
    let show = visibility.values().any(|v| *v);

    ColumnCheck {
        visibility,
        changed,
        show,
    }
}
