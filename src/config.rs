//! Configuration system
//!
//! Reads configuration from:
//! - `.flowlintrc.yaml` / `.flowlintrc.json` (project-level)
//! - `~/.flowlintrc.yaml` (user-level)
//!
//! Configuration is an explicit value handed to the [`Engine`](crate::engine::Engine);
//! nothing here is global.

use crate::catalog::ActivityKind;
use crate::diagnostic::Severity;
use crate::rule::RuleCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inspect workflows in parallel
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Snapshot file discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.flow.json".to_string(),
                "**/*.flow.yaml".to_string(),
                "**/*.flow.yml".to_string(),
            ],
            exclude: vec![
                "**/.local/**".to_string(),
                "**/.screenshots/**".to_string(),
                "**/target/**".to_string(),
            ],
        }
    }
}

impl FilesConfig {
    /// Whether a path is excluded by one of the exclude globs
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.exclude.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher().is_match(path.as_ref()),
            Err(_) => false,
        })
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Select rules by prefix (e.g., "workflow-" selects all workflow-* rules)
    pub extend: Vec<String>,

    /// Ignore rules by prefix
    pub ignore: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,

    /// Parameter overrides (rule_id -> key -> value)
    pub parameters: HashMap<String, HashMap<String, String>>,

    /// Per-workflow rule ignores (glob over workflow names -> rule IDs)
    pub per_workflow: HashMap<String, Vec<String>>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    #[serde(default)]
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Snapshot file discovery
    pub files: FilesConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Rule categories to enable (empty = all)
    #[serde(default)]
    pub categories: Vec<RuleCategory>,

    /// Extra activity kinds for default display name lookup
    #[serde(default)]
    pub catalog: Vec<ActivityKind>,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::preset_recommended()),
            "strict" => Some(Self::preset_strict()),
            "minimal" => Some(Self::preset_minimal()),
            _ => None,
        }
    }

    /// Recommended preset - every rule at its default severity
    fn preset_recommended() -> Self {
        Self::default()
    }

    /// Strict preset - naming and typing violations are errors
    fn preset_strict() -> Self {
        let mut config = Self::default();
        for id in [
            "project-naming",
            "variable-naming",
            "argument-direction-prefix",
            "variable-type-explicit",
            "argument-type-explicit",
        ] {
            config.rules.severity.insert(id.to_string(), Severity::Error);
        }
        config
    }

    /// Minimal preset - security and type usage only
    fn preset_minimal() -> Self {
        Self {
            categories: vec![RuleCategory::Security, RuleCategory::Usage],
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = match Self::preset(extend) {
                    Some(preset) => preset,
                    None => {
                        let extend_path = if Path::new(extend).is_absolute() {
                            PathBuf::from(extend)
                        } else {
                            base_dir.join(extend)
                        };
                        Self::load_with_depth(&extend_path, depth + 1)?
                    }
                };
                base_config.merge(extended);
            }

            base_config.merge(config);
            config = base_config;
        }

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        // Extends are not inherited

        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }
        self.output.statistics = other.output.statistics;

        self.files.include.extend(other.files.include);
        self.files.exclude.extend(other.files.exclude);
        self.files.include.dedup();
        self.files.exclude.dedup();

        self.rules.disabled.extend(other.rules.disabled);
        if !other.rules.enabled.is_empty() {
            self.rules.enabled = other.rules.enabled;
        }
        self.rules.extend.extend(other.rules.extend);
        self.rules.ignore.extend(other.rules.ignore);
        self.rules.severity.extend(other.rules.severity);
        for (rule_id, params) in other.rules.parameters {
            self.rules.parameters.entry(rule_id).or_default().extend(params);
        }
        for (pattern, rules) in other.rules.per_workflow {
            self.rules.per_workflow.entry(pattern).or_default().extend(rules);
        }

        if !other.categories.is_empty() {
            self.categories = other.categories;
        }
        self.catalog.extend(other.catalog);
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".flowlintrc.yaml",
            ".flowlintrc.yml",
            ".flowlintrc.json",
            "flowlint.yaml",
            "flowlint.yml",
            "flowlint.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
    }

    /// Add prefixes to extend (select rules by prefix)
    pub fn add_extend_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.extend.extend(prefixes);
    }

    /// Add prefixes to ignore
    pub fn add_ignore_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.ignore.extend(prefixes);
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|r| r == rule_id) {
            return false;
        }

        if self.matches_ignore_prefix(rule_id) {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|r| r == rule_id);
        }

        self.matches_extend_prefix(rule_id)
    }

    /// Check if a rule's category is selected
    pub fn is_category_enabled(&self, category: RuleCategory) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }

    /// Check if a rule matches any prefix in the extend list
    pub fn matches_extend_prefix(&self, rule_id: &str) -> bool {
        if self.rules.extend.is_empty() {
            return true;
        }
        let rule_lower = rule_id.to_lowercase();
        self.rules
            .extend
            .iter()
            .any(|prefix| rule_lower.starts_with(&prefix.to_lowercase()))
    }

    /// Check if a rule matches any prefix in the ignore list
    pub fn matches_ignore_prefix(&self, rule_id: &str) -> bool {
        let rule_lower = rule_id.to_lowercase();
        self.rules
            .ignore
            .iter()
            .any(|prefix| rule_lower.starts_with(&prefix.to_lowercase()))
    }

    /// Check if a rule should be skipped for a workflow
    pub fn should_ignore_rule_for_workflow(&self, rule_id: &str, workflow: &str) -> bool {
        for (pattern, rules) in &self.rules.per_workflow {
            let Ok(glob) = globset::Glob::new(pattern) else {
                log::debug!("ignoring invalid per-workflow pattern '{}'", pattern);
                continue;
            };
            if glob.compile_matcher().is_match(workflow)
                && rules.iter().any(|r| r == "all" || r == rule_id)
            {
                return true;
            }
        }
        false
    }
}
