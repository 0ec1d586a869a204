use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule configuration as supplied by a front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRuleConfig {
    /// Base name for the sequential template; empty disables numbering
    pub base_name: String,

    /// First number handed out by the template
    pub start_index: u32,

    /// Minimum digit count of the zero-padded number
    pub width: usize,

    /// Text (or pattern) to search for; empty disables find/replace
    pub find_text: String,

    /// Replacement text
    pub replace_text: String,

    /// Treat `find_text` as a regular expression
    pub use_regex: bool,

    /// Whether an item whose replace step failed still uses up a number
    pub error_consumes_index: bool,
}

impl Default for NameRuleConfig {
    fn default() -> Self {
        Self {
            base_name: String::new(),
            start_index: 1,
            width: 3,
            find_text: String::new(),
            replace_text: String::new(),
            use_regex: false,
            error_consumes_index: false,
        }
    }
}

/// Errors produced while computing a single new name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Resulting name is empty")]
    EmptyName,

    #[error("Resulting name is not a plain file name: {0}")]
    InvalidName(String),

    #[error("Source name is not valid UTF-8")]
    NonUtf8Name,
}

/// Problems with a rule configuration as a whole
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Width must be at least 1")]
    ZeroWidth,

    #[error("Base name must not contain path separators: {0}")]
    BaseNameHasSeparator(String),
}

impl NameRuleConfig {
    /// Base name with surrounding whitespace removed
    pub fn trimmed_base(&self) -> &str {
        self.base_name.trim()
    }

    pub fn has_template(&self) -> bool {
        !self.trimmed_base().is_empty()
    }

    pub fn has_replace(&self) -> bool {
        !self.find_text.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }

        let base = self.trimmed_base();
        if base.contains(['/', '\\', '\0']) {
            return Err(ConfigError::BaseNameHasSeparator(base.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NameRuleConfig::default();

        assert_eq!(config.start_index, 1);
        assert_eq!(config.width, 3);
        assert!(!config.has_template());
        assert!(!config.has_replace());
        assert!(!config.error_consumes_index);
    }

    #[test]
    fn test_trimmed_base() {
        let config = NameRuleConfig {
            base_name: "  img  ".to_string(),
            ..Default::default()
        };

        assert_eq!(config.trimmed_base(), "img");
        assert!(config.has_template());

        let blank = NameRuleConfig {
            base_name: "   ".to_string(),
            ..Default::default()
        };
        assert!(!blank.has_template());
    }

    #[test]
    fn test_validate_zero_width() {
        let config = NameRuleConfig {
            width: 0,
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::ZeroWidth));
    }

    #[test]
    fn test_validate_base_with_separator() {
        let config = NameRuleConfig {
            base_name: "sub/img".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::BaseNameHasSeparator(_))
        ));
    }
}
