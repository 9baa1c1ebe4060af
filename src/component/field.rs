//! Leaf child holding a single value.

use serde_json::Value;

use super::ChildComponent;
use crate::config::{ColumnSchema, Conditional};
use crate::types::{Capabilities, RowContext, RowData, ValueFlags};

/// Single-field cell with an optional simple conditional.
#[derive(Debug, Clone)]
pub struct FieldComponent {
    key: String,
    value: Value,
    default: Value,
    conditional: Option<Conditional>,
    context: RowContext,
    row: RowData,
}

impl FieldComponent {
    /// Create a cell for `column`, seeded from the row's entry or the default.
    pub fn new(column: &ColumnSchema, context: RowContext, row: &RowData) -> Self {
        let default = column.default_value.clone().unwrap_or(Value::Null);
        let value = row.get(&column.key).cloned().unwrap_or_else(|| default.clone());
        Self {
            key: column.key.clone(),
            value,
            default,
            conditional: column.conditional.clone(),
            context,
            row: row.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Row object last bound to this cell.
    pub fn row(&self) -> &RowData {
        &self.row
    }
}

impl ChildComponent for FieldComponent {
    fn value(&self) -> Value {
        self.value.clone()
    }

    fn set_value(&mut self, value: Value, _flags: ValueFlags) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    fn default_value(&self) -> Value {
        self.default.clone()
    }

    fn capabilities(&self) -> Capabilities {
        if self.conditional.is_some() {
            Capabilities::CONDITIONAL
        } else {
            Capabilities::empty()
        }
    }

    fn check_conditions(&mut self, data: &Value) -> bool {
        self.conditional
            .as_ref()
            .is_none_or(|cond| cond.evaluate(Some(&self.row), data))
    }

    fn bind_row(&mut self, row: &RowData) {
        self.row = row.clone();
    }

    fn context(&self) -> Option<&RowContext> {
        Some(&self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RowContext {
        RowContext::new("g", "data[g]", 0, 0)
    }

    #[test]
    fn test_seeds_from_row_then_default() {
        let column = ColumnSchema::new("a").with_default(json!("d"));
        let mut row = RowData::new();

        let field = FieldComponent::new(&column, ctx(), &row);
        assert_eq!(field.value(), json!("d"));

        row.insert("a".into(), json!(7));
        let field = FieldComponent::new(&column, ctx(), &row);
        assert_eq!(field.value(), json!(7));
    }

    #[test]
    fn test_set_value_reports_change() {
        let mut field = FieldComponent::new(&ColumnSchema::new("a"), ctx(), &RowData::new());
        assert!(field.set_value(json!(1), ValueFlags::NONE));
        assert!(!field.set_value(json!(1), ValueFlags::NONE));
    }

    #[test]
    fn test_unconditional_field_has_no_capability() {
        let field = FieldComponent::new(&ColumnSchema::new("a"), ctx(), &RowData::new());
        assert_eq!(field.capabilities(), Capabilities::empty());
    }

    #[test]
    fn test_conditions_read_bound_row() {
        let column = ColumnSchema::new("b").with_conditional(Conditional {
            show: Some(true),
            when: Some("a".into()),
            eq: json!("yes"),
        });
        let mut field = FieldComponent::new(&column, ctx(), &RowData::new());
        assert!(field.capabilities().contains(Capabilities::CONDITIONAL));
        assert!(!field.check_conditions(&json!({})));

        let mut row = RowData::new();
        row.insert("a".into(), json!("yes"));
        field.bind_row(&row);
        assert!(field.check_conditions(&json!({})));
    }

    #[test]
    fn test_bind_row_replaces_snapshot_only() {
        let mut field = FieldComponent::new(&ColumnSchema::new("a"), ctx(), &RowData::new());
        assert_eq!(field.key(), "a");
        assert!(field.row().is_empty());

        let mut row = RowData::new();
        row.insert("a".into(), json!(5));
        row.insert("b".into(), json!("x"));
        field.bind_row(&row);

        assert_eq!(field.row(), &row);
        assert_eq!(field.value(), Value::Null, "binding does not assign the value");
    }
}
