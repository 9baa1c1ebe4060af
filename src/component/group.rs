//! Nested group child.
//!
//! A group is bound to the entire row object and exposes the sub-object stored
//! under its own key, so `{inner: {...}}` survives a read/write cycle intact.

use serde_json::{Map, Value};

use super::ChildComponent;
use crate::config::ColumnSchema;
use crate::types::{Capabilities, RowContext, RowData, ValueFlags};

#[derive(Debug, Clone)]
pub struct GroupComponent {
    key: String,
    row: RowData,
    context: RowContext,
}

impl GroupComponent {
    pub fn new(column: &ColumnSchema, context: RowContext, row: &RowData) -> Self {
        Self {
            key: column.key.clone(),
            row: row.clone(),
            context,
        }
    }
}

impl ChildComponent for GroupComponent {
    fn value(&self) -> Value {
        self.row
            .get(&self.key)
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    fn set_value(&mut self, value: Value, _flags: ValueFlags) -> bool {
        let row = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if self.row == row {
            return false;
        }
        self.row = row;
        true
    }

    fn default_value(&self) -> Value {
        Value::Object(Map::new())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NESTED_GROUP
    }

    fn bind_row(&mut self, row: &RowData) {
        self.row = row.clone();
    }

    fn context(&self) -> Option<&RowContext> {
        Some(&self.context)
    }
}
