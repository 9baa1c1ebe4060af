//! Grid configuration.
//!
//! The grid reads the same JSON shape a form definition carries for a data
//! grid component (`components`, `validate.minLength`, `addAnotherPosition`,
//! ...). Render-time options that are not part of the stored definition live
//! in [`GridOptions`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, Result};
use crate::path::{get_path, get_row_path};
use crate::types::RowData;

// =============================================================================
// Enums
// =============================================================================

/// Where the "add row" button is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddPosition {
    Top,
    #[default]
    Bottom,
    Both,
}

impl AddPosition {
    pub const fn includes_top(&self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }

    pub const fn includes_bottom(&self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }
}

/// How the grid is attached to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachMode {
    /// Interactive form.
    #[default]
    Full,
    /// Form builder preview.
    Builder,
    /// Any other non-interactive attachment.
    ReadOnly,
}

// =============================================================================
// Simple Conditional
// =============================================================================

/// `{show, when, eq}` visibility rule.
///
/// When `when` names a key whose value equals `eq`, the component is shown
/// if `show` is true (hidden otherwise); a mismatch inverts that. A rule
/// without `show` or `when` always passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    #[serde(default)]
    pub show: Option<bool>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub eq: Value,
}

impl Conditional {
    /// Evaluate against the owning row first, then the full form data.
    pub fn evaluate(&self, row: Option<&RowData>, data: &Value) -> bool {
        let (Some(show), Some(when)) = (self.show, self.when.as_deref()) else {
            return true;
        };
        if when.is_empty() {
            return true;
        }

        let found = row
            .and_then(|r| get_row_path(r, when))
            .or_else(|| get_path(data, when));

        let matches = match found {
            Some(Value::Array(items)) => items.iter().any(|v| loose_eq(v, &self.eq)),
            Some(v) => loose_eq(v, &self.eq),
            None => loose_eq(&Value::Null, &self.eq),
        };

        if matches { show } else { !show }
    }
}

/// String-insensitive equality: `1 == "1"`, `true == "true"`.
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::String(s), other) | (other, Value::String(s)) => {
            !other.is_object() && !other.is_array() && *s == other.to_string()
        }
        _ => false,
    }
}

// =============================================================================
// Column Schema
// =============================================================================

/// One column definition, shared by every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Output key; dots denote nested placement.
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub hide_label: bool,
    /// Component type understood by the factory.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub conditional: Option<Conditional>,
    /// Remaining schema properties, passed through to the factory.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnSchema {
    /// Minimal column with only a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            title: None,
            hide_label: false,
            kind: None,
            default_value: None,
            conditional: None,
            extra: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_conditional(mut self, conditional: Conditional) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// Column contributes a header cell (has a label or title that is not hidden).
    pub fn shows_header(&self) -> bool {
        let titled = [&self.label, &self.title]
            .into_iter()
            .any(|t| t.as_deref().is_some_and(|s| !s.is_empty()));
        titled && !self.hide_label
    }
}

// =============================================================================
// Grid Configuration
// =============================================================================

/// Row count bounds from `validate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateConfig {
    #[serde(default, deserialize_with = "lenient_length")]
    pub min_length: Option<usize>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub max_length: Option<usize>,
}

/// Builders store untouched length inputs as `""`; treat those like absent.
/// Numeric strings are accepted as well.
fn lenient_length<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| D::Error::custom(format!("invalid length {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid length {s:?}"))),
        other => Err(D::Error::custom(format!("invalid length {other}"))),
    }
}

/// Stored definition of a data grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Ordered column definitions.
    #[serde(default)]
    pub components: Vec<ColumnSchema>,
    #[serde(default)]
    pub validate: ValidateConfig,
    #[serde(default)]
    pub disable_adding_removing_rows: bool,
    #[serde(default)]
    pub add_another_position: AddPosition,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub conditional: Option<Conditional>,
}

fn default_key() -> String {
    "dataGrid".to_string()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            label: Some("Data Grid".to_string()),
            components: Vec::new(),
            validate: ValidateConfig::default(),
            disable_adding_removing_rows: false,
            add_another_position: AddPosition::default(),
            default_value: None,
            disabled: false,
            hidden: false,
            conditional: None,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON definition.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check column keys and row bounds.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, column) in self.components.iter().enumerate() {
            if column.key.is_empty() {
                return Err(GridError::EmptyColumnKey { index });
            }
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::DuplicateColumn(column.key.clone()));
            }
        }
        if let (min, Some(max)) = (self.min_rows(), self.max_rows()) {
            if min > max {
                return Err(GridError::InvertedBounds { min, max });
            }
        }
        Ok(())
    }

    pub fn min_rows(&self) -> usize {
        self.validate.min_length.unwrap_or(0)
    }

    /// Upper bound, if any. A zero maximum means unbounded.
    pub fn max_rows(&self) -> Option<usize> {
        self.validate.max_length.filter(|max| *max > 0)
    }

    /// Any column shows a header cell.
    pub fn has_header(&self) -> bool {
        self.components.iter().any(ColumnSchema::shows_header)
    }
}

/// Render-time options supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    #[serde(default)]
    pub attach_mode: AttachMode,
    #[serde(default)]
    pub preview: bool,
    /// Read-only projection; values come from storage, not children.
    #[serde(default)]
    pub view_only: bool,
    /// Base form name; defaults to `data[{key}]`.
    #[serde(default)]
    pub name: Option<String>,
}

impl GridOptions {
    pub fn is_interactive(&self) -> bool {
        self.attach_mode == AttachMode::Full
    }

    pub fn is_builder(&self) -> bool {
        self.attach_mode == AttachMode::Builder
    }
}
