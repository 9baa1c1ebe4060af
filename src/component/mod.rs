//! Child Components - The cells a grid is made of.
//!
//! The grid treats every cell as an opaque [`ChildComponent`]. Optional
//! behaviour is advertised through [`Capabilities`] so the grid never has to
//! inspect concrete types:
//! - `CONDITIONAL` - the child answers [`ChildComponent::check_conditions`]
//! - `NESTED_GROUP` - the child owns the whole row object, not one field
//!
//! Cells are created by a [`ComponentFactory`], once per (row, column) pair
//! when a row slot is first filled. Existing rows never go back to the factory.
//!
//! Two reference children ship with the crate:
//! - [`FieldComponent`] - a leaf holding one value
//! - [`GroupComponent`] - a nested group holding a whole row object

mod field;
mod group;

pub use field::FieldComponent;
pub use group::GroupComponent;

use serde_json::Value;

use crate::config::ColumnSchema;
use crate::types::{Capabilities, RowContext, RowData, ValueFlags};

// =============================================================================
// ChildComponent
// =============================================================================

/// Contract every grid cell satisfies.
pub trait ChildComponent {
    /// Current value.
    fn value(&self) -> Value;

    /// Replace the value. Returns true if it changed.
    fn set_value(&mut self, value: Value, flags: ValueFlags) -> bool;

    /// Value used when a row has no entry for this column.
    fn default_value(&self) -> Value;

    /// Optional behaviours this child supports.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Evaluate this child's own visibility condition.
    ///
    /// Only consulted when [`Capabilities::CONDITIONAL`] is advertised.
    fn check_conditions(&mut self, _data: &Value) -> bool {
        true
    }

    /// Bind the row object this cell lives in (read by its conditions).
    fn bind_row(&mut self, _row: &RowData) {}

    /// Row context the cell was created with, if it keeps one.
    fn context(&self) -> Option<&RowContext> {
        None
    }
}

impl std::fmt::Debug for dyn ChildComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildComponent")
            .field("value", &self.value())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds a child for one cell.
pub trait ComponentFactory {
    fn create(
        &self,
        column: &ColumnSchema,
        context: &RowContext,
        row: &RowData,
    ) -> Box<dyn ChildComponent>;
}

impl<F> ComponentFactory for F
where
    F: Fn(&ColumnSchema, &RowContext, &RowData) -> Box<dyn ChildComponent>,
{
    fn create(
        &self,
        column: &ColumnSchema,
        context: &RowContext,
        row: &RowData,
    ) -> Box<dyn ChildComponent> {
        self(column, context, row)
    }
}

/// Factory driven by the column's `type`.
///
/// `components` and `container` columns become [`GroupComponent`]s; anything
/// else becomes a [`FieldComponent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaFactory;

impl SchemaFactory {
    const GROUP_KINDS: [&'static str; 2] = ["components", "container"];
}

impl ComponentFactory for SchemaFactory {
    fn create(
        &self,
        column: &ColumnSchema,
        context: &RowContext,
        row: &RowData,
    ) -> Box<dyn ChildComponent> {
        let is_group = column
            .kind
            .as_deref()
            .is_some_and(|kind| Self::GROUP_KINDS.contains(&kind));

        if is_group {
            Box::new(GroupComponent::new(column, context.clone(), row))
        } else {
            Box::new(FieldComponent::new(column, context.clone(), row))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_factory_picks_group_for_components() {
        let ctx = RowContext::new("g", "data[g]", 0, 0);
        let row = RowData::new();

        let group = SchemaFactory.create(&ColumnSchema::new("inner").with_kind("components"), &ctx, &row);
        assert!(group.capabilities().contains(Capabilities::NESTED_GROUP));

        let leaf = SchemaFactory.create(&ColumnSchema::new("a").with_kind("textfield"), &ctx, &row);
        assert!(!leaf.capabilities().contains(Capabilities::NESTED_GROUP));
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = |column: &ColumnSchema, ctx: &RowContext, row: &RowData| {
            Box::new(FieldComponent::new(column, ctx.clone(), row)) as Box<dyn ChildComponent>
        };
        let ctx = RowContext::new("g", "data[g]", 3, 1);
        let child = factory.create(&ColumnSchema::new("a"), &ctx, &RowData::new());
        assert_eq!(child.context().map(|c| c.row_index), Some(3));
    }
}
