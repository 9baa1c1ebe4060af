//! Row Reconciler - Shapes the row matrix to the value's length.
//!
//! Rows are identified by position only:
//! - Missing index: build a new record (factory called once per column)
//! - Existing index: left untouched (NO recreation, no re-binding here)
//! - Indices past the value's length: dropped with their children
//!
//! Nothing is ever reordered or matched by content. When the caller splices
//! the value, records after the splice point keep their instances and simply
//! stand for different rows.

use serde_json::Value;
use tracing::trace;

use crate::component::{ChildComponent, ComponentFactory};
use crate::config::ColumnSchema;
use crate::path::set_path;
use crate::types::{FormValue, RowContext, RowData};

// =============================================================================
// RowRecord
// =============================================================================

/// Live children for one row, in column order.
#[derive(Debug)]
pub struct RowRecord {
    created_at: usize,
    cells: Vec<(String, Box<dyn ChildComponent>)>,
}

impl RowRecord {
    /// Row index this record was created for.
    ///
    /// Not updated when earlier rows are removed.
    pub fn created_at(&self) -> usize {
        self.created_at
    }

    pub fn get(&self, key: &str) -> Option<&dyn ChildComponent> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child.as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn ChildComponent + 'static)> {
        self.cells
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child.as_mut())
    }

    /// Iterate (column key, child) in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &(dyn ChildComponent + 'static))> {
        self.cells.iter().map(|(k, child)| (k.as_str(), child.as_ref()))
    }

    pub(crate) fn cells_mut(
        &mut self,
    ) -> impl Iterator<Item = (&str, &mut Box<dyn ChildComponent>)> {
        self.cells.iter_mut().map(|(k, child)| (k.as_str(), child))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row object assembled from the cells, dotted keys written nested.
    pub fn current_row(&self) -> RowData {
        let mut row = RowData::new();
        for (key, child) in &self.cells {
            set_path(&mut row, key, child.value());
        }
        row
    }

    /// Current cell values as a JSON object keyed by column (flat keys).
    pub fn values(&self) -> Value {
        Value::Object(
            self.cells
                .iter()
                .map(|(k, child)| (k.clone(), child.value()))
                .collect(),
        )
    }
}

/// Ordered records, one per value row.
pub type RowMatrix = Vec<RowRecord>;

// =============================================================================
// RowBuilder
// =============================================================================

/// Everything needed to build a record for a given row.
pub struct RowBuilder<'a> {
    pub columns: &'a [ColumnSchema],
    pub factory: &'a dyn ComponentFactory,
    pub grid_key: &'a str,
    pub base_name: &'a str,
}

impl RowBuilder<'_> {
    /// Build one record. Each cell gets a fresh immutable context.
    pub fn build(&self, row_index: usize, row: &RowData) -> RowRecord {
        let cells = self
            .columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| {
                let context = RowContext::new(self.grid_key, self.base_name, row_index, column_index);
                (column.key.clone(), self.factory.create(column, &context, row))
            })
            .collect();

        RowRecord {
            created_at: row_index,
            cells,
        }
    }
}

// =============================================================================
// reconcile()
// =============================================================================

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub dropped: usize,
}

/// Grow or truncate `matrix` so it has exactly one record per value row.
pub fn reconcile(value: &FormValue, matrix: &mut RowMatrix, builder: &RowBuilder<'_>) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    for (index, row) in value.iter().enumerate().skip(matrix.len()) {
        matrix.push(builder.build(index, row));
        stats.created += 1;
    }

    if matrix.len() > value.len() {
        stats.dropped = matrix.len() - value.len();
        matrix.truncate(value.len());
    }

    if stats != ReconcileStats::default() {
        trace!(
            grid = builder.grid_key,
            created = stats.created,
            dropped = stats.dropped,
            rows = matrix.len(),
            "reconciled rows"
        );
    }

    stats
}

// =============================================================================
// Tests
// =============================================================================
