//! # spark-datagrid
//!
//! Repeating composite form control for Rust.
//!
//! A configured set of columns is applied to every element of a
//! variable-length list, producing a matrix of child components bound to an
//! array-of-objects value. Redraw decisions are published through
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals).
//!
//! ## Architecture
//!
//! ```text
//! value ──► normalize ──► diff ──► reconcile rows ──► propagate ──► redraw?
//! data  ──► own condition ──► column visibility (OR over rows) ──► rebuild?
//! ```
//!
//! Rows are identified by position. An existing row slot is never rebuilt on
//! a value change; only its cells receive new values.
//!
//! ## Modules
//!
//! - [`types`] - Value shapes, flags, row context
//! - [`config`] - Grid definition and render options
//! - [`component`] - Child component contract, factory, reference children
//! - [`grid`] - Reconciliation, visibility, binding, view projection
//! - [`path`] - Dotted-path helpers

pub mod component;
pub mod config;
pub mod error;
pub mod grid;
pub mod path;
pub mod types;

pub use types::*;

pub use error::{GridError, Result};

pub use config::{
    AddPosition, AttachMode, ColumnSchema, Conditional, GridConfig, GridOptions, ValidateConfig,
};

pub use component::{
    ChildComponent, ComponentFactory, FieldComponent, GroupComponent, SchemaFactory,
};

pub use grid::{
    CellView, ColumnCheck, CountPolicy, DataGrid, GridView, HeaderView, RenderRequests,
    RowMatrix, RowRecord, VisibilityMap,
};
