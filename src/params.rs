//! Rule parameters
//!
//! Every configurable rule carries a [`ParameterStore`]. Blank or missing
//! values are a normal state: checks read them through `resolve*` and treat
//! `None` as "rule not configured, nothing to report".

use serde::{Deserialize, Serialize};

/// A named configuration value with a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Lookup key
    pub key: String,

    /// Value used when nothing is configured
    pub default_value: String,

    /// Label shown to users
    pub label: String,

    /// Configured value, if any
    #[serde(default)]
    pub value: Option<String>,
}

impl Parameter {
    pub fn new(key: &str, default_value: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            default_value: default_value.to_string(),
            label: label.to_string(),
            value: None,
        }
    }

    /// Configured value, falling back to the default
    pub fn resolved(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.default_value)
    }
}

/// Ordered, keyed collection of parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterStore {
    params: Vec<Parameter>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing one with the same key in place
    pub fn insert(&mut self, param: Parameter) {
        match self.params.iter_mut().find(|p| p.key == param.key) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    /// Configure the value of an existing parameter
    ///
    /// Returns `false` when no parameter has that key.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.params.iter_mut().find(|p| p.key == key) {
            Some(param) => {
                param.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Resolved value, or `None` when missing or blank
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let value = self.get(key)?.resolved();
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Resolved `|`-delimited list, trimmed, empty entries dropped
    pub fn resolve_list(&self, key: &str) -> Option<Vec<String>> {
        let items: Vec<String> = split_list(self.resolve(key)?);
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }

    /// Resolved non-negative integer
    ///
    /// A value that does not parse is treated like a missing one.
    pub fn resolve_count(&self, key: &str) -> Option<usize> {
        let raw = self.resolve(key)?;
        match raw.trim().parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::debug!("parameter '{}' is not a count: '{}'", key, raw);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Split a `|`-delimited list
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
