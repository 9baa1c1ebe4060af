//! Data Grid - Rows of child components bound to an array-of-objects value.
//!
//! The grid keeps three things consistent:
//! - the value (one [`RowData`] per row)
//! - the live [`RowMatrix`] (one [`RowRecord`] per row, one child per column)
//! - the [`VisibilityMap`] (one flag per column, OR-reduced over rows)
//!
//! # Flow
//!
//! ```text
//! set_value → normalize → diff → reconcile → propagate → redraw?
//! check_conditions → own condition → column visibility → rebuild?
//! ```
//!
//! Redraw and rebuild decisions go out through [`RenderRequests`].
//!
//! # Row Identity
//!
//! Rows are positional. `remove_row(1)` on three rows drops record 1 and
//! record 2 slides into slot 1 with its children intact; nothing is rebuilt.
//! Any per-child UI state therefore follows the slot, not the data.

mod binder;
mod policy;
mod requests;
mod rows;
mod view;
mod visibility;

pub use binder::{normalize, normalize_default};
pub use policy::CountPolicy;
pub use requests::RenderRequests;
pub use rows::{ReconcileStats, RowBuilder, RowMatrix, RowRecord, reconcile};
pub use view::{CellView, GridView, HeaderView};
pub use visibility::{ColumnCheck, VisibilityMap, all_visible, evaluate};

use serde_json::Value;
use tracing::debug;

use crate::component::{ComponentFactory, SchemaFactory};
use crate::config::{GridConfig, GridOptions};
use crate::error::Result;
use crate::types::{Capabilities, FormValue, RowData, form_value_to_json};

// =============================================================================
// DataGrid
// =============================================================================

pub struct DataGrid {
    config: GridConfig,
    options: GridOptions,
    factory: Box<dyn ComponentFactory>,
    base_name: String,
    value: FormValue,
    rows: RowMatrix,
    visible_columns: VisibilityMap,
    requests: RenderRequests,
}

impl DataGrid {
    /// Build a grid from its definition.
    ///
    /// The value starts from the configured default, padded with empty rows up
    /// to `minLength`. Rows are created and column visibility is evaluated once
    /// against that value.
    pub fn new(
        config: GridConfig,
        options: GridOptions,
        factory: impl ComponentFactory + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let base_name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("data[{}]", config.key));

        let mut value = normalize_default(config.default_value.as_ref());
        if value.len() < config.min_rows() {
            value.resize(config.min_rows(), RowData::new());
        }

        let visible_columns = all_visible(&config.components);
        let mut grid = Self {
            config,
            options,
            factory: Box::new(factory),
            base_name,
            value,
            rows: RowMatrix::new(),
            visible_columns,
            requests: RenderRequests::new(GridView::default()),
        };

        grid.reconcile_rows();
        let data = form_value_to_json(&grid.value);
        grid.visible_columns = grid.column_check(&data).visibility;
        grid.requests.publish(grid.view());

        debug!(
            grid = %grid.config.key,
            rows = grid.rows.len(),
            columns = grid.config.components.len(),
            "data grid created"
        );

        Ok(grid)
    }

    /// Build a grid whose cells come from [`SchemaFactory`].
    pub fn with_schema_factory(config: GridConfig, options: GridOptions) -> Result<Self> {
        Self::new(config, options, SchemaFactory)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Renderer ref key, `datagrid-{key}`.
    pub fn grid_key(&self) -> String {
        format!("datagrid-{}", self.config.key)
    }

    /// Stored value, as last set (children not consulted).
    pub fn data_value(&self) -> &FormValue {
        &self.value
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [RowRecord] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn visible_columns(&self) -> &VisibilityMap {
        &self.visible_columns
    }

    pub fn requests(&self) -> &RenderRequests {
        &self.requests
    }

    /// Add/remove predicates for the current row count.
    pub fn policy(&self) -> CountPolicy<'_> {
        CountPolicy::new(&self.config, &self.options, self.value.len())
    }

    pub fn can_add(&self) -> bool {
        self.policy().can_add()
    }

    pub fn can_remove(&self) -> bool {
        self.policy().can_remove()
    }

    /// The configured default value, normalized to rows.
    pub fn default_value(&self) -> FormValue {
        normalize_default(self.config.default_value.as_ref())
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    /// Evaluate visibility for `data`; returns whether the grid shows.
    ///
    /// The grid's own condition is checked first. If it hides the grid, no
    /// column is evaluated. A changed column map requests a rebuild.
    pub fn check_conditions(&mut self, data: &Value) -> bool {
        if !self.check_own_conditions(data) {
            return false;
        }

        self.bind_current_rows();
        let check = self.column_check(data);
        self.visible_columns = check.visibility;

        if check.changed {
            debug!(
                grid = %self.config.key,
                visible = ?self.visible_columns,
                "column visibility changed, rebuilding"
            );
            self.requests.request_rebuild(self.view());
        }

        check.show
    }

    /// The grid's inherited condition: hidden flag plus its simple conditional.
    pub fn check_own_conditions(&self, data: &Value) -> bool {
        !self.config.hidden
            && self
                .config
                .conditional
                .as_ref()
                .is_none_or(|cond| cond.evaluate(None, data))
    }

    /// Hand every cell its row as the cells currently hold it, so row-scoped
    /// conditions see edits made directly on children.
    fn bind_current_rows(&mut self) {
        for record in self.rows.iter_mut() {
            let row = record.current_row();
            for (_, child) in record.cells_mut() {
                if !child.capabilities().contains(Capabilities::NESTED_GROUP) {
                    child.bind_row(&row);
                }
            }
        }
    }

    fn column_check(&mut self, data: &Value) -> ColumnCheck {
        evaluate(
            &self.config.components,
            &mut self.rows,
            data,
            &self.visible_columns,
        )
    }

    // =========================================================================
    // Internals shared with the binder
    // =========================================================================

    fn reconcile_rows(&mut self) -> ReconcileStats {
        let builder = RowBuilder {
            columns: &self.config.components,
            factory: self.factory.as_ref(),
            grid_key: &self.config.key,
            base_name: &self.base_name,
        };
        reconcile(&self.value, &mut self.rows, &builder)
    }

    fn redraw(&self) {
        self.requests.request_redraw(self.view());
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("key", &self.config.key)
            .field("value", &self.value)
            .field("rows", &self.rows.len())
            .field("visible_columns", &self.visible_columns)
            .finish()
    }
}
