//! Grid View - Projection handed to a renderer.
//!
//! Everything here is derived from grid state; no decisions are made.

use serde::Serialize;
use serde_json::Value;

use super::DataGrid;
use super::visibility::VisibilityMap;

/// Header cell for a visible column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderView {
    pub key: String,
    /// Label (or title); `None` when the column hides it.
    pub label: Option<String>,
}

/// One rendered cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellView {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    /// Ref key for the renderer, `datagrid-{key}`.
    pub grid_key: String,
    pub headers: Vec<HeaderView>,
    /// Per row: cells of visible columns, in column order.
    pub rows: Vec<Vec<CellView>>,
    pub visible_columns: VisibilityMap,
    pub has_header: bool,
    pub has_extra_column: bool,
    pub has_add_button: bool,
    pub has_remove_buttons: bool,
    pub has_top_add: bool,
    pub has_bottom_add: bool,
    /// Visible columns plus the extra column, if any.
    pub num_columns: usize,
    pub builder: bool,
}

impl DataGrid {
    fn is_column_visible(&self, key: &str) -> bool {
        self.visible_columns.get(key).copied().unwrap_or(false)
    }

    /// Project current state into a [`GridView`].
    pub fn view(&self) -> GridView {
        let policy = self.policy();
        let columns = &self.config.components;

        let headers = columns
            .iter()
            .filter(|c| self.is_column_visible(&c.key))
            .map(|c| HeaderView {
                key: c.key.clone(),
                label: if c.hide_label {
                    None
                } else {
                    c.label.clone().or_else(|| c.title.clone())
                },
            })
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|record| {
                record
                    .cells()
                    .filter(|(key, _)| self.is_column_visible(key))
                    .map(|(key, child)| CellView {
                        key: key.to_string(),
                        value: child.value(),
                    })
                    .collect()
            })
            .collect();

        let visible = self.visible_columns.values().filter(|v| **v).count();
        let has_extra_column = policy.has_extra_column();

        GridView {
            grid_key: self.grid_key(),
            headers,
            rows,
            visible_columns: self.visible_columns.clone(),
            has_header: self.config.has_header(),
            has_extra_column,
            has_add_button: policy.can_add(),
            has_remove_buttons: policy.can_remove(),
            has_top_add: policy.has_top_add(),
            has_bottom_add: policy.has_bottom_add(),
            num_columns: visible + usize::from(has_extra_column),
            builder: self.options.is_builder(),
        }
    }
}
