//! Rule registry
//!
//! Populated once at startup, then shared read-only. Registration is where
//! integrity problems surface: a duplicate id or a rule declared for a scope
//! its check cannot inspect is rejected before anything runs.

use crate::builtin::builtin_rules;
use crate::rule::{Rule, ScopeKind};
use std::collections::HashMap;
use thiserror::Error;

/// Registry integrity error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    #[error("Rule {id} is declared for {declared} scope but its check inspects {required} scope")]
    ScopeMismatch {
        id: String,
        declared: ScopeKind,
        required: ScopeKind,
    },

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Rule {rule} has no parameter '{key}'")]
    UnknownParameter { rule: String, key: String },
}

/// Rules keyed by id, in registration order
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every rule in order, stopping at the first bad one
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Registry holding the built-in rule set
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_rules(builtin_rules())
    }

    /// Add a rule
    pub fn register(&mut self, rule: Rule) -> Result<(), RegistryError> {
        if self.index.contains_key(&rule.id) {
            return Err(RegistryError::DuplicateRule(rule.id));
        }

        let required = rule.check.scope();
        if rule.scope != required {
            return Err(RegistryError::ScopeMismatch {
                id: rule.id,
                declared: rule.scope,
                required,
            });
        }

        log::debug!("registered rule {} ({} scope)", rule.id, rule.scope);
        self.index.insert(rule.id.clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Look a rule up by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Rule> {
        match self.index.get(id) {
            Some(&i) => self.rules.get_mut(i),
            None => None,
        }
    }

    /// Rules bound to a scope, in registration order
    pub fn rules_for(&self, scope: ScopeKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.scope == scope)
    }

    /// All rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
