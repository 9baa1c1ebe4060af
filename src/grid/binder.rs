//! Value Binder - Moves values between the grid and its cells.
//!
//! Downward (`set_value`): normalize the input, diff against the stored value,
//! reconcile rows, then hand each cell its slice of the row.
//!
//! Upward (`value`): ask every cell for its value and assemble rows, honouring
//! dotted column keys.
//!
//! Input shapes are never rejected:
//! - `null` → `min_rows` empty rows
//! - object → one-row value
//! - array → rows (non-object elements become `{}`)
//! - anything else → one empty row

use serde_json::Value;
use tracing::{debug, warn};

use super::{DataGrid, RowRecord};
use crate::error::{GridError, Result};
use crate::path::get_row_path;
use crate::types::{Capabilities, FormValue, RowData, ValueFlags, form_value_to_json};

// =============================================================================
// Normalization
// =============================================================================

fn to_row(value: &Value) -> RowData {
    match value {
        Value::Object(map) => map.clone(),
        other => {
            warn!(element = %other, "non-object row replaced with empty row");
            RowData::new()
        }
    }
}

/// Normalize an incoming value. `None` means "no value" (`null`).
pub fn normalize(input: &Value) -> Option<FormValue> {
    match input {
        Value::Null => None,
        Value::Array(items) => Some(items.iter().map(to_row).collect()),
        Value::Object(map) => Some(vec![map.clone()]),
        other => {
            warn!(input = %other, "scalar grid value replaced with one empty row");
            Some(vec![RowData::new()])
        }
    }
}

/// Normalize a configured default: arrays kept, objects wrapped, else `[{}]`.
pub fn normalize_default(default: Option<&Value>) -> FormValue {
    match default {
        Some(Value::Array(items)) => items.iter().map(to_row).collect(),
        Some(Value::Object(map)) => vec![map.clone()],
        _ => vec![RowData::new()],
    }
}

// =============================================================================
// Binding
// =============================================================================

impl DataGrid {
    /// Set the grid value. Returns true if it differs from the stored value.
    ///
    /// A redraw is requested only on change. `null` resets the stored value to
    /// the minimum number of empty rows and always returns false; surviving
    /// cells are not touched.
    pub fn set_value(&mut self, input: &Value, flags: ValueFlags) -> bool {
        let Some(value) = normalize(input) else {
            self.value = vec![RowData::new(); self.config.min_rows()];
            self.reconcile_rows();
            debug!(grid = %self.config.key, rows = self.value.len(), "value cleared");
            return false;
        };

        // Diff against the value as it was before this call
        let changed = value != self.value;

        self.value = value;
        self.reconcile_rows();
        self.propagate(flags);

        debug!(grid = %self.config.key, rows = self.value.len(), changed, "value set");

        if changed {
            self.redraw();
        }
        changed
    }

    /// Push each row's data down to its cells.
    fn propagate(&mut self, flags: ValueFlags) {
        for (row_index, record) in self.rows.iter_mut().enumerate() {
            let Some(row) = self.value.get(row_index) else {
                break;
            };
            for (key, child) in record.cells_mut() {
                if child.capabilities().contains(Capabilities::NESTED_GROUP) {
                    child.set_value(Value::Object(row.clone()), flags);
                    continue;
                }
                child.bind_row(row);
                // Dotted keys may arrive flat or already nested
                let value = match row.get(key).or_else(|| get_row_path(row, key)) {
                    Some(value) => value.clone(),
                    None => child.default_value(),
                };
                child.set_value(value, flags);
            }
        }
    }

    /// Current value assembled from the cells.
    ///
    /// In view-only mode the stored value is returned and cells are not read.
    pub fn value(&self) -> FormValue {
        if self.options.view_only {
            return self.value.clone();
        }

        self.rows.iter().map(RowRecord::current_row).collect()
    }

    /// [`DataGrid::value`] as a JSON array.
    pub fn value_json(&self) -> Value {
        form_value_to_json(&self.value())
    }

    // =========================================================================
    // Row operations
    // =========================================================================

    /// Append an empty row and build its cells. Always requests a redraw.
    pub fn add_row(&mut self) {
        self.value.push(RowData::new());
        let index = self.rows.len();
        if let Some(row) = self.value.get(index) {
            let record = super::RowBuilder {
                columns: &self.config.components,
                factory: self.factory.as_ref(),
                grid_key: &self.config.key,
                base_name: &self.base_name,
            }
            .build(index, row);
            self.rows.push(record);
        }

        debug!(grid = %self.config.key, index, rows = self.value.len(), "row added");
        self.redraw();
    }

    /// Remove the row at `index`. Always requests a redraw.
    ///
    /// Later rows shift down by one and keep their cells: the record that was
    /// at `index + 1` now stands for the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<RowData> {
        let len = self.value.len();
        if index >= len {
            return Err(GridError::RowOutOfBounds { index, len });
        }

        let removed = self.value.remove(index);
        if index < self.rows.len() {
            self.rows.remove(index);
        }

        debug!(grid = %self.config.key, index, rows = self.value.len(), "row removed");
        self.redraw();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ChildComponent, FieldComponent};
    use crate::config::{ColumnSchema, GridConfig, GridOptions, ValidateConfig};
    use crate::types::RowContext;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn grid(min: usize, max: Option<usize>) -> DataGrid {
        let config = GridConfig {
            key: "items".into(),
            components: vec![
                ColumnSchema::new("a"),
                ColumnSchema::new("b").with_default(json!("dflt")),
            ],
            validate: ValidateConfig {
                min_length: Some(min),
                max_length: max,
            },
            ..Default::default()
        };
        DataGrid::with_schema_factory(config, GridOptions::default()).unwrap()
    }

    fn address(child: &dyn ChildComponent) -> *const () {
        child as *const _ as *const ()
    }

    #[test]
    fn test_normalize_shapes() {
        assert_eq!(normalize(&Value::Null), None);
        assert_eq!(normalize(&json!({"a": 1})).unwrap().len(), 1);
        assert_eq!(normalize(&json!(5)), Some(vec![RowData::new()]));
        assert_eq!(normalize(&json!("x")), Some(vec![RowData::new()]));
        assert_eq!(normalize(&json!([1, {"a": 1}])).unwrap()[0], RowData::new());
        assert_eq!(normalize(&json!([])), Some(vec![]));
    }

    #[test]
    fn test_normalize_default() {
        assert_eq!(normalize_default(None), vec![RowData::new()]);
        assert_eq!(normalize_default(Some(&json!(3))), vec![RowData::new()]);
        assert_eq!(normalize_default(Some(&json!([]))), vec![]);
        assert_eq!(normalize_default(Some(&json!({"a": 1}))).len(), 1);
    }

    #[test]
    fn test_set_value_resizes_rows() {
        let mut g = grid(0, None);
        assert!(g.set_value(&json!([{"a": 1}, {"a": 2}, {"a": 3}]), ValueFlags::NONE));
        assert_eq!(g.len(), 3);
        assert_eq!(g.rows().len(), 3);

        assert!(g.set_value(&json!([{"a": 1}]), ValueFlags::NONE));
        assert_eq!(g.len(), 1);
        assert_eq!(g.rows().len(), 1);
    }

    #[test]
    fn test_set_null_resets_to_min_rows() {
        let mut g = grid(2, None);
        g.set_value(&json!([{"a": 1}, {"a": 2}, {"a": 3}]), ValueFlags::NONE);
        let redraws = g.requests().redraw_count();

        assert!(!g.set_value(&Value::Null, ValueFlags::NONE));
        assert_eq!(g.data_value(), &vec![RowData::new(); 2]);
        assert_eq!(g.rows().len(), 2);
        assert_eq!(g.requests().redraw_count(), redraws, "null never redraws");
        assert_eq!(
            g.value_json(),
            json!([{"a": 1, "b": "dflt"}, {"a": 2, "b": "dflt"}]),
            "surviving cells keep their values"
        );
    }

    #[test]
    fn test_set_null_keeps_cell_edits() {
        let mut g = grid(1, None);
        g.set_value(&json!([{"a": 1}]), ValueFlags::NONE);
        g.rows_mut()[0]
            .get_mut("a")
            .expect("column a")
            .set_value(json!("edited"), ValueFlags::NONE);

        assert!(!g.set_value(&Value::Null, ValueFlags::NONE));
        assert_eq!(g.value_json(), json!([{"a": "edited", "b": "dflt"}]));
    }

    #[test]
    fn test_set_null_builds_missing_rows_with_defaults() {
        let mut g = grid(3, None);
        g.set_value(&json!([{"a": 1}]), ValueFlags::NONE);

        g.set_value(&Value::Null, ValueFlags::NONE);
        assert_eq!(g.rows().len(), 3);
        assert_eq!(
            g.value_json(),
            json!([{"a": 1, "b": "dflt"}, {"a": null, "b": "dflt"}, {"a": null, "b": "dflt"}])
        );
    }

    #[test]
    fn test_set_scalar_becomes_one_empty_row() {
        let mut g = grid(0, None);
        g.set_value(&json!([{"a": 1, "b": 2}, {"a": 3}]), ValueFlags::NONE);

        assert!(g.set_value(&json!(5), ValueFlags::NONE));
        assert_eq!(g.data_value(), &vec![RowData::new()]);
        assert_eq!(g.rows().len(), 1);
        assert_eq!(g.value_json(), json!([{"a": null, "b": "dflt"}]));

        assert!(!g.set_value(&json!("text"), ValueFlags::NONE), "same normalized value");
    }

    #[test]
    fn test_set_object_wraps_in_one_row() {
        let mut g = grid(0, None);
        g.set_value(&json!({"a": 1}), ValueFlags::NONE);
        assert_eq!(form_value_to_json(g.data_value()), json!([{"a": 1}]));
    }

    #[test]
    fn test_unchanged_value_does_not_redraw() {
        let mut g = grid(0, None);
        assert!(g.set_value(&json!([{"a": 1}]), ValueFlags::NONE));
        let redraws = g.requests().redraw_count();

        assert!(!g.set_value(&json!([{"a": 1}]), ValueFlags::NONE));
        assert_eq!(g.requests().redraw_count(), redraws);
    }

    #[test]
    fn test_set_value_reuses_existing_cells() {
        let mut g = grid(0, None);
        g.set_value(&json!([{"a": 1}, {"a": 2}]), ValueFlags::NONE);
        let before = address(g.rows()[1].get("a").unwrap());

        g.set_value(&json!([{"a": 10}, {"a": 20}, {"a": 30}]), ValueFlags::NONE);

        assert_eq!(before, address(g.rows()[1].get("a").unwrap()));
        assert_eq!(g.rows()[1].get("a").unwrap().value(), json!(20));
    }

    #[test]
    fn test_missing_keys_get_child_default() {
        let mut g = grid(0, None);
        g.set_value(&json!([{"a": 1, "b": 2}, {"a": 3}]), ValueFlags::NONE);
        assert_eq!(g.value_json(), json!([{"a": 1, "b": 2}, {"a": 3, "b": "dflt"}]));
    }

    #[test]
    fn test_flags_forwarded_to_children() {
        let seen: Rc<RefCell<Vec<ValueFlags>>> = Rc::new(RefCell::new(Vec::new()));

        struct Recorder {
            inner: FieldComponent,
            seen: Rc<RefCell<Vec<ValueFlags>>>,
        }
        impl ChildComponent for Recorder {
            fn value(&self) -> Value {
                self.inner.value()
            }
            fn set_value(&mut self, value: Value, flags: ValueFlags) -> bool {
                self.seen.borrow_mut().push(flags);
                self.inner.set_value(value, flags)
            }
            fn default_value(&self) -> Value {
                self.inner.default_value()
            }
        }

        let seen_factory = seen.clone();
        let factory = move |column: &ColumnSchema, ctx: &RowContext, row: &RowData| {
            Box::new(Recorder {
                inner: FieldComponent::new(column, ctx.clone(), row),
                seen: seen_factory.clone(),
            }) as Box<dyn ChildComponent>
        };
        let config = GridConfig {
            components: vec![ColumnSchema::new("a")],
            ..Default::default()
        };
        let mut g = DataGrid::new(config, GridOptions::default(), factory).unwrap();

        let flags = ValueFlags::NO_VALIDATE | ValueFlags::FROM_SUBMISSION;
        g.set_value(&json!([{"a": 1}]), flags);
        assert_eq!(seen.borrow().as_slice(), &[flags]);
    }

    #[test]
    fn test_group_child_receives_whole_row() {
        let config = GridConfig {
            components: vec![
                ColumnSchema::new("a"),
                ColumnSchema::new("inner").with_kind("container"),
            ],
            ..Default::default()
        };
        let mut g = DataGrid::with_schema_factory(config, GridOptions::default()).unwrap();
        g.set_value(&json!([{"a": 1, "inner": {"x": 2}}]), ValueFlags::NONE);
        assert_eq!(g.value_json(), json!([{"a": 1, "inner": {"x": 2}}]));
    }

    #[test]
    fn test_value_writes_dotted_keys_nested() {
        let config = GridConfig {
            components: vec![ColumnSchema::new("addr.city"), ColumnSchema::new("addr.zip")],
            ..Default::default()
        };
        let mut g = DataGrid::with_schema_factory(config, GridOptions::default()).unwrap();
        g.set_value(&json!([{"addr.city": "Oslo", "addr.zip": "0150"}]), ValueFlags::NONE);
        assert_eq!(g.value_json(), json!([{"addr": {"city": "Oslo", "zip": "0150"}}]));

        let nested = g.value_json();
        g.set_value(&nested, ValueFlags::NONE);
        assert_eq!(g.value_json(), nested, "nested input binds back to dotted columns");
    }

    #[test]
    fn test_view_only_returns_stored_value() {
        let config = GridConfig {
            components: vec![ColumnSchema::new("a")],
            ..Default::default()
        };
        let options = GridOptions {
            view_only: true,
            ..Default::default()
        };
        let mut g = DataGrid::with_schema_factory(config, options).unwrap();
        g.set_value(&json!([{"z": 1}]), ValueFlags::NONE);
        assert_eq!(g.value_json(), json!([{"z": 1}]), "cells are not consulted");
    }

    #[test]
    fn test_add_row_builds_single_record() {
        let mut g = grid(0, None);
        g.set_value(&json!([{"a": 1}]), ValueFlags::NONE);
        let first = address(g.rows()[0].get("a").unwrap());
        let redraws = g.requests().redraw_count();

        g.add_row();

        assert_eq!(g.len(), 2);
        assert_eq!(g.rows().len(), 2);
        assert_eq!(g.data_value()[1], RowData::new());
        assert_eq!(g.rows()[1].created_at(), 1);
        assert_eq!(first, address(g.rows()[0].get("a").unwrap()));
        assert_eq!(g.requests().redraw_count(), redraws + 1);
    }

    #[test]
    fn test_remove_row_shifts_records_without_rebuild() {
        let mut g = grid(0, None);
        g.set_value(&json!([{"a": 0}, {"a": 1}, {"a": 2}]), ValueFlags::NONE);
        let third = address(g.rows()[2].get("a").unwrap());

        let removed = g.remove_row(1).unwrap();

        assert_eq!(Value::Object(removed), json!({"a": 1}));
        assert_eq!(form_value_to_json(g.data_value()), json!([{"a": 0}, {"a": 2}]));
        assert_eq!(g.rows().len(), 2);
        assert_eq!(third, address(g.rows()[1].get("a").unwrap()), "record slid down");
        assert_eq!(g.rows()[1].created_at(), 2, "context keeps creation index");
    }

    #[test]
    fn test_remove_row_out_of_bounds() {
        let mut g = grid(0, None);
        let redraws = g.requests().redraw_count();
        let err = g.remove_row(5).unwrap_err();
        assert!(matches!(err, GridError::RowOutOfBounds { index: 5, len: 1 }));
        assert_eq!(g.len(), 1);
        assert_eq!(g.requests().redraw_count(), redraws);
    }
}
