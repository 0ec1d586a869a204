mod types;

pub use types::*;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

// Anything that would turn a file name into a path
static PATH_CHARS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\\x00]").unwrap());

// Group references in a replacement string: `$$`, `${name}`, `$name`
static GROUP_REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:\$|\{([^}]*)\}|([_0-9A-Za-z]+))").unwrap());

#[derive(Debug, Clone)]
enum Replacer {
    Disabled,
    Literal { find: String, replace: String },
    Pattern {
        regex: Regex,
        replace: String,
        /// Replacement refers to a group the pattern does not define
        missing_group: Option<String>,
    },
    /// Pattern failed to compile; every item routed through it reports the error
    Invalid(String),
}

#[derive(Debug, Clone)]
struct Template {
    base: String,
    width: usize,
}

/// Compiled naming rule: optional find/replace followed by an optional
/// `<base>_<number><ext>` template that overrides the replace result.
#[derive(Debug, Clone)]
pub struct NameRule {
    replacer: Replacer,
    template: Option<Template>,
    error_consumes_index: bool,
}

impl NameRule {
    pub fn new(config: &NameRuleConfig) -> Self {
        let replacer = if !config.has_replace() {
            Replacer::Disabled
        } else if config.use_regex {
            match Regex::new(&config.find_text) {
                Ok(regex) => Replacer::Pattern {
                    missing_group: find_missing_group(&regex, &config.replace_text),
                    regex,
                    replace: config.replace_text.clone(),
                },
                Err(e) => {
                    debug!(pattern = %config.find_text, error = %e, "Invalid find pattern");
                    Replacer::Invalid(e.to_string())
                }
            }
        } else {
            Replacer::Literal {
                find: config.find_text.clone(),
                replace: config.replace_text.clone(),
            }
        };

        let template = config.has_template().then(|| Template {
            base: config.trimmed_base().to_string(),
            width: config.width.max(1),
        });

        Self {
            replacer,
            template,
            error_consumes_index: config.error_consumes_index,
        }
    }

    /// Compute the new file name for `name` (full file name, extension
    /// included). `ext` carries the leading dot or is empty.
    pub fn apply(&self, name: &str, ext: &str, index: u64) -> Result<String, RuleError> {
        let replaced = match &self.replacer {
            Replacer::Disabled => name.to_string(),
            Replacer::Literal { find, replace } => name.replace(find.as_str(), replace),
            Replacer::Pattern {
                regex,
                replace,
                missing_group,
            } => {
                // Bad group references only fail once there is something to substitute
                if let Some(group) = missing_group {
                    if regex.is_match(name) {
                        return Err(RuleError::InvalidPattern(format!(
                            "invalid group reference '{}'",
                            group
                        )));
                    }
                }
                regex.replace_all(name, replace.as_str()).into_owned()
            }
            Replacer::Invalid(message) => return Err(RuleError::InvalidPattern(message.clone())),
        };

        let new_name = match &self.template {
            Some(template) => format_numbered(&template.base, index, template.width, ext),
            None => replaced,
        };

        trace!(from = %name, to = %new_name, index, "Applied rule");

        validate_file_name(new_name)
    }

    /// Whether items reaching the template step consume a number
    pub fn uses_index(&self) -> bool {
        self.template.is_some()
    }

    pub fn error_consumes_index(&self) -> bool {
        self.error_consumes_index
    }
}

/// `<base>_<index zero-padded to width><ext>`; wider numbers are never truncated
pub fn format_numbered(base: &str, index: u64, width: usize, ext: &str) -> String {
    format!("{}_{:0width$}{}", base, index, ext, width = width)
}

fn find_missing_group(regex: &Regex, replace: &str) -> Option<String> {
    GROUP_REF_REGEX.captures_iter(replace).find_map(|caps| {
        let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let known = match name.parse::<usize>() {
            Ok(number) => number < regex.captures_len(),
            Err(_) => regex.capture_names().flatten().any(|n| n == name),
        };
        (!known).then(|| name.to_string())
    })
}

fn validate_file_name(name: String) -> Result<String, RuleError> {
    if name.is_empty() {
        return Err(RuleError::EmptyName);
    }

    if name == "." || name == ".." || PATH_CHARS_REGEX.is_match(&name) {
        return Err(RuleError::InvalidName(name));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(config: NameRuleConfig) -> NameRule {
        NameRule::new(&config)
    }

    #[test]
    fn test_no_rule_keeps_name() {
        let r = rule(NameRuleConfig::default());
        assert_eq!(r.apply("photo.jpg", ".jpg", 1).unwrap(), "photo.jpg");
        assert!(!r.uses_index());
    }

    #[test]
    fn test_template_numbering() {
        let r = rule(NameRuleConfig {
            base_name: "img".to_string(),
            width: 3,
            ..Default::default()
        });

        assert_eq!(r.apply("a.png", ".png", 1).unwrap(), "img_001.png");
        assert_eq!(r.apply("b.png", ".png", 42).unwrap(), "img_042.png");
        assert!(r.uses_index());
    }

    #[test]
    fn test_template_number_wider_than_width() {
        let r = rule(NameRuleConfig {
            base_name: "img".to_string(),
            width: 2,
            ..Default::default()
        });

        assert_eq!(r.apply("a.png", ".png", 1234).unwrap(), "img_1234.png");
    }

    #[test]
    fn test_template_without_extension() {
        let r = rule(NameRuleConfig {
            base_name: "doc".to_string(),
            width: 1,
            ..Default::default()
        });

        assert_eq!(r.apply("README", "", 7).unwrap(), "doc_7");
    }

    #[test]
    fn test_literal_replace() {
        let r = rule(NameRuleConfig {
            find_text: "IMG".to_string(),
            replace_text: "photo".to_string(),
            ..Default::default()
        });

        assert_eq!(r.apply("IMG_IMG.jpg", ".jpg", 1).unwrap(), "photo_photo.jpg");
        assert_eq!(r.apply("other.jpg", ".jpg", 1).unwrap(), "other.jpg");
    }

    #[test]
    fn test_literal_replace_treats_pattern_chars_literally() {
        let r = rule(NameRuleConfig {
            find_text: "(1)".to_string(),
            replace_text: "".to_string(),
            ..Default::default()
        });

        assert_eq!(r.apply("scan(1).pdf", ".pdf", 1).unwrap(), "scan.pdf");
    }

    #[test]
    fn test_regex_replace_with_groups() {
        let r = rule(NameRuleConfig {
            find_text: r"(\d{4})-(\d{2})".to_string(),
            replace_text: "${2}_$1".to_string(),
            use_regex: true,
            ..Default::default()
        });

        assert_eq!(
            r.apply("report 2024-03.txt", ".txt", 1).unwrap(),
            "report 03_2024.txt"
        );
    }

    #[test]
    fn test_invalid_regex_reports_error() {
        let r = rule(NameRuleConfig {
            find_text: "([unclosed".to_string(),
            use_regex: true,
            ..Default::default()
        });

        let err = r.apply("a.txt", ".txt", 1).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern(_)));
    }

    #[test]
    fn test_missing_group_fails_only_on_match() {
        let r = rule(NameRuleConfig {
            find_text: "(a)".to_string(),
            replace_text: "$2".to_string(),
            use_regex: true,
            ..Default::default()
        });

        assert!(matches!(
            r.apply("a.txt", ".txt", 1),
            Err(RuleError::InvalidPattern(_))
        ));
        assert_eq!(r.apply("b.txt", ".txt", 1).unwrap(), "b.txt");
    }

    #[test]
    fn test_named_and_escaped_references() {
        let r = rule(NameRuleConfig {
            find_text: r"(?P<num>\d+)".to_string(),
            replace_text: "$$${num}".to_string(),
            use_regex: true,
            ..Default::default()
        });

        assert_eq!(r.apply("v12.txt", ".txt", 1).unwrap(), "v$12.txt");
    }

    #[test]
    fn test_invalid_pattern_ignored_in_literal_mode() {
        let r = rule(NameRuleConfig {
            find_text: "([".to_string(),
            replace_text: "x".to_string(),
            ..Default::default()
        });

        assert_eq!(r.apply("a([b.txt", ".txt", 1).unwrap(), "axb.txt");
    }

    #[test]
    fn test_template_overrides_replace() {
        let r = rule(NameRuleConfig {
            base_name: "img".to_string(),
            find_text: "a".to_string(),
            replace_text: "zzz".to_string(),
            ..Default::default()
        });

        assert_eq!(r.apply("a.png", ".png", 3).unwrap(), "img_003.png");
    }

    #[test]
    fn test_invalid_pattern_fails_even_with_template() {
        let r = rule(NameRuleConfig {
            base_name: "img".to_string(),
            find_text: "*".to_string(),
            use_regex: true,
            ..Default::default()
        });

        assert!(matches!(
            r.apply("a.png", ".png", 1),
            Err(RuleError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_replace_to_empty_name() {
        let r = rule(NameRuleConfig {
            find_text: "a.txt".to_string(),
            ..Default::default()
        });

        assert_eq!(r.apply("a.txt", ".txt", 1), Err(RuleError::EmptyName));
    }

    #[test]
    fn test_replace_introducing_separator() {
        let r = rule(NameRuleConfig {
            find_text: "_".to_string(),
            replace_text: "/".to_string(),
            ..Default::default()
        });

        assert!(matches!(
            r.apply("a_b.txt", ".txt", 1),
            Err(RuleError::InvalidName(_))
        ));
    }

    #[test]
    fn test_format_numbered() {
        assert_eq!(format_numbered("x", 5, 4, ".md"), "x_0005.md");
        assert_eq!(format_numbered("x", 0, 1, ""), "x_0");
    }
}
