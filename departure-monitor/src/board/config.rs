//! Board configuration: what gets selected and how lines are labelled.

use crate::wienerlinien::NormalizeOptions;

use super::selection::SelectionMode;

/// Configuration parameters for turning a monitor response into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Which ranked departure(s) to expose.
    pub selection: SelectionMode,

    /// Append an accessibility glyph to line names.
    pub accessibility_suffix: bool,
}

impl BoardConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(selection: SelectionMode, accessibility_suffix: bool) -> Self {
        Self {
            selection,
            accessibility_suffix,
        }
    }

    /// Options passed to the converter.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            accessibility_suffix: self.accessibility_suffix,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMode::FirstAndNext,
            accessibility_suffix: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BoardConfig::default();

        assert_eq!(config.selection, SelectionMode::FirstAndNext);
        assert!(config.accessibility_suffix);
        assert!(config.normalize_options().accessibility_suffix);
    }

    #[test]
    fn custom_config() {
        let config = BoardConfig::new(SelectionMode::Next, false);

        assert_eq!(config.selection, SelectionMode::Next);
        assert!(!config.normalize_options().accessibility_suffix);
    }
}
