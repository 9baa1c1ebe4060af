//! Count Policy - Whether rows may be added or removed.
//!
//! Pure predicates over configuration, render options and the current row
//! count. The grid's own `add_row`/`remove_row` do not consult these; they
//! decide which buttons a renderer offers.

use crate::config::{GridConfig, GridOptions};

#[derive(Debug, Clone, Copy)]
pub struct CountPolicy<'a> {
    config: &'a GridConfig,
    options: &'a GridOptions,
    len: usize,
}

impl<'a> CountPolicy<'a> {
    pub fn new(config: &'a GridConfig, options: &'a GridOptions, len: usize) -> Self {
        Self { config, options, len }
    }

    fn editable(&self) -> bool {
        !self.config.disable_adding_removing_rows
            && !self.config.disabled
            && self.options.is_interactive()
    }

    /// A new row may be appended.
    pub fn can_add(&self) -> bool {
        self.editable()
            && !self.options.preview
            && self.config.max_rows().is_none_or(|max| self.len < max)
    }

    /// A row may be removed.
    pub fn can_remove(&self) -> bool {
        self.editable() && self.len > self.config.min_rows()
    }

    /// Renderer reserves a trailing column (remove buttons or builder chrome).
    pub fn has_extra_column(&self) -> bool {
        self.can_remove() || self.options.is_builder()
    }

    pub fn has_top_add(&self) -> bool {
        self.can_add() && self.config.add_another_position.includes_top()
    }

    pub fn has_bottom_add(&self) -> bool {
        self.can_add() && self.config.add_another_position.includes_bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AddPosition, AttachMode, ValidateConfig};

    fn bounded(min: usize, max: usize) -> GridConfig {
        GridConfig {
            validate: ValidateConfig {
                min_length: Some(min),
                max_length: Some(max),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_can_add_respects_max() {
        let config = bounded(1, 3);
        let options = GridOptions::default();
        assert!(CountPolicy::new(&config, &options, 2).can_add());
        assert!(!CountPolicy::new(&config, &options, 3).can_add());
        assert!(!CountPolicy::new(&config, &options, 4).can_add());
    }

    #[test]
    fn test_can_add_unbounded() {
        let config = GridConfig::default();
        let options = GridOptions::default();
        assert!(CountPolicy::new(&config, &options, 10_000).can_add());
    }

    #[test]
    fn test_can_remove_respects_min() {
        let config = bounded(1, 3);
        let options = GridOptions::default();
        assert!(!CountPolicy::new(&config, &options, 1).can_remove());
        assert!(CountPolicy::new(&config, &options, 2).can_remove());
        assert!(!CountPolicy::new(&config, &options, 0).can_remove());
    }

    #[test]
    fn test_disabled_blocks_both() {
        let config = GridConfig {
            disable_adding_removing_rows: true,
            ..Default::default()
        };
        let options = GridOptions::default();
        let policy = CountPolicy::new(&config, &options, 2);
        assert!(!policy.can_add());
        assert!(!policy.can_remove());

        let config = GridConfig {
            disabled: true,
            ..Default::default()
        };
        let policy = CountPolicy::new(&config, &options, 2);
        assert!(!policy.can_add());
        assert!(!policy.can_remove());
    }

    #[test]
    fn test_preview_blocks_add_only() {
        let config = GridConfig::default();
        let options = GridOptions {
            preview: true,
            ..Default::default()
        };
        let policy = CountPolicy::new(&config, &options, 2);
        assert!(!policy.can_add());
        assert!(policy.can_remove());
    }

    #[test]
    fn test_builder_mode() {
        let config = GridConfig::default();
        let options = GridOptions {
            attach_mode: AttachMode::Builder,
            ..Default::default()
        };
        let policy = CountPolicy::new(&config, &options, 2);
        assert!(!policy.can_add());
        assert!(!policy.can_remove());
        assert!(policy.has_extra_column(), "builder always reserves a column");
    }

    #[test]
    fn test_add_button_placement() {
        let options = GridOptions::default();
        let top = GridConfig {
            add_another_position: AddPosition::Top,
            ..Default::default()
        };
        let policy = CountPolicy::new(&top, &options, 0);
        assert!(policy.has_top_add());
        assert!(!policy.has_bottom_add());

        let both = GridConfig {
            add_another_position: AddPosition::Both,
            ..Default::default()
        };
        let policy = CountPolicy::new(&both, &options, 0);
        assert!(policy.has_top_add() && policy.has_bottom_add());

        let bottom = GridConfig::default();
        let policy = CountPolicy::new(&bottom, &options, 0);
        assert!(!policy.has_top_add());
        assert!(policy.has_bottom_add());
    }
}
