//! Core types for spark-datagrid.
//!
//! These types are shared by every layer of the grid: the value shapes that
//! flow through binding, the flags handed to children, and the immutable row
//! context given to the component factory.

use serde::Serialize;
use serde_json::{Map, Value};

// =============================================================================
// Value Shapes
// =============================================================================

/// One element of the grid value: column key -> value.
pub type RowData = Map<String, Value>;

/// The array-of-objects value the grid manages.
pub type FormValue = Vec<RowData>;

/// Convert a form value back into a plain JSON array.
pub fn form_value_to_json(value: &FormValue) -> Value {
    Value::Array(value.iter().cloned().map(Value::Object).collect())
}

// =============================================================================
// Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Flags passed through `set_value` to every child.
    ///
    /// The grid never interprets these itself; they are forwarded untouched.
    /// Combine with bitwise OR: `ValueFlags::NO_VALIDATE | ValueFlags::FROM_SUBMISSION`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ValueFlags: u8 {
        const NONE = 0;
        const NO_UPDATE_EVENT = 1 << 0;
        const NO_VALIDATE = 1 << 1;
        const FROM_SUBMISSION = 1 << 2;
        const RESET_VALUE = 1 << 3;
        const NO_DEFAULT = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Optional behaviours a child component supports.
    ///
    /// Evaluators consult these instead of inspecting concrete types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Child evaluates its own visibility condition.
        const CONDITIONAL = 1 << 0;
        /// Child owns a whole row object rather than one field.
        const NESTED_GROUP = 1 << 1;
    }
}

// =============================================================================
// Row Context
// =============================================================================

/// Immutable per-cell context handed to the component factory.
///
/// Built fresh for every (row, column) pair at row creation time. It is never
/// updated afterwards: when an earlier row is removed, later records keep the
/// context they were created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowContext {
    /// Key of the owning grid.
    pub grid_key: String,
    /// Row index at creation time.
    pub row_index: usize,
    /// Column position within the grid's column list.
    pub column_index: usize,
    /// Form name of the row, e.g. `data[items][2]`.
    pub name: String,
    /// Cell is a member of a grid (collaborators suppress per-field chrome).
    pub in_grid: bool,
}

impl RowContext {
    /// Build the context for one cell.
    pub fn new(grid_key: &str, base_name: &str, row_index: usize, column_index: usize) -> Self {
        Self {
            grid_key: grid_key.to_string(),
            row_index,
            column_index,
            name: format!("{}[{}]", base_name, row_index),
            in_grid: true,
        }
    }

    /// Row/column identifier in `row-column` form.
    pub fn cell_id(&self) -> String {
        format!("{}-{}", self.row_index, self.column_index)
    }
}
