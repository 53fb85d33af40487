// Fri Oct 16 2026 - Alex

use crate::filter::rules::{
    PatternGroup, RuleSet, DATA_EXCLUDE_PATTERNS, EXCLUDE_PATTERNS, INCLUDE_PATTERNS, PRE_INCLUDE_PATTERNS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rule overrides read from a JSON file. Any group left out keeps the
/// built-in patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curated_symbols: Option<Vec<String>>,
}

impl RulesFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules written out in full, as a starting point for edits.
    pub fn builtin() -> Self {
        let owned = |patterns: &[&str]| -> Option<Vec<String>> { Some(patterns.iter().map(|p| p.to_string()).collect()) };
        Self {
            pre_include: owned(PRE_INCLUDE_PATTERNS),
            exclude: owned(EXCLUDE_PATTERNS),
            include: owned(INCLUDE_PATTERNS),
            data_exclude: owned(DATA_EXCLUDE_PATTERNS),
            curated_symbols: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        fs::write(path, contents)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for symbol in self.curated_symbols.iter().flatten() {
            if symbol.is_empty() || symbol.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "curated symbol {:?} must be a single decorated name",
                    symbol
                )));
            }
        }

        self.rule_set().map(|_| ())
    }

    /// Compiles the effective rule set, falling back to built-in groups.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let defaults = RuleSet::default();

        let group = |name: &str, patterns: &Option<Vec<String>>, fallback: PatternGroup| match patterns {
            Some(patterns) => PatternGroup::new(patterns.as_slice())
                .map_err(|e| ConfigError::InvalidPattern(name.to_string(), e.to_string())),
            None => Ok(fallback),
        };

        Ok(RuleSet {
            pre_include: group("pre_include", &self.pre_include, defaults.pre_include)?,
            exclude: group("exclude", &self.exclude, defaults.exclude)?,
            include: group("include", &self.include, defaults.include)?,
            data_exclude: group("data_exclude", &self.data_exclude, defaults.data_exclude)?,
        })
    }
}

#[derive(Debug, Clone)]
pub enum ConfigError {
    NotFound(PathBuf),
    IoError(String),
    ParseError(String),
    SerializeError(String),
    UnsupportedFormat(String),
    InvalidPattern(String, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Rules file not found: {:?}", path),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::UnsupportedFormat(fmt) => write!(f, "Unsupported format: {}", fmt),
            ConfigError::InvalidPattern(group, e) => write!(f, "Invalid pattern in {}: {}", group, e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<RulesFile, ConfigError> {
    let rules = RulesFile::load(path)?;
    rules.validate()?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let rules: RulesFile = serde_json::from_str(r#"{ "include": ["^mylib::"] }"#).unwrap();
        let set = rules.rule_set().unwrap();

        assert!(set.classify("mylib::Widget::Widget(void)").is_kept());
        assert!(!set.classify("tensorflow::Baz").is_kept());
        assert!(set.exclude.is_match("::internal::"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_json::from_str::<RulesFile>(r#"{ "includes": [] }"#).is_err());
    }

    #[test]
    fn test_invalid_pattern_reported_with_group() {
        let rules = RulesFile {
            exclude: Some(vec!["[".to_string()]),
            ..RulesFile::default()
        };
        match rules.validate() {
            Err(ConfigError::InvalidPattern(group, _)) => assert_eq!(group, "exclude"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.json");

        let rules = RulesFile::builtin();
        rules.save(&path).unwrap();
        assert_eq!(load_rules(&path).unwrap(), rules);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RulesFile::load(dir.path().join("missing.json")),
            Err(ConfigError::NotFound(_))
        ));

        let toml = dir.path().join("rules.toml");
        fs::write(&toml, "").unwrap();
        assert!(matches!(RulesFile::load(&toml), Err(ConfigError::UnsupportedFormat(_))));
    }
}
