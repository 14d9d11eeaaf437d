//! Normalized variable and argument type names
//!
//! Process definitions store types as free-form strings such as
//! `System.String`, `x:Int32` or
//! `System.Collections.Generic.List`1[[System.String, mscorlib]], mscorlib`.
//! [`TypeName`] classifies them once so checks compare a normalized form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*([.+][A-Za-z_][A-Za-z0-9_]*)*(`\d+)?(\[.*\]|<.*>)?$")
        .expect("valid type name pattern")
});

/// Types that resolve to a primitive value, by simple name
const PRIMITIVES: &[&str] = &[
    "String", "Int16", "Int32", "Int64", "UInt16", "UInt32", "UInt64", "Byte", "SByte",
    "Boolean", "Char", "Double", "Single", "Decimal", "DateTime", "TimeSpan",
];

/// A classified type name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// A well-known primitive, stored fully qualified (`System.String`)
    Primitive(String),
    /// Any other syntactically valid type, qualified name without assembly
    Complex(String),
    /// Could not be classified; the raw string is kept as-is
    Unresolved(String),
}

impl TypeName {
    /// Classify a raw type string
    pub fn parse(raw: &str) -> Self {
        let qualified = strip_xaml_prefix(top_level_head(raw).trim());

        if qualified.is_empty() || !QUALIFIED_NAME.is_match(qualified) {
            return TypeName::Unresolved(raw.to_string());
        }

        match bare_type_name(qualified) {
            Some(simple) if PRIMITIVES.contains(&simple) && is_system_or_bare(qualified) => {
                TypeName::Primitive(format!("System.{}", simple))
            }
            Some(_) => TypeName::Complex(qualified.to_string()),
            None => TypeName::Unresolved(raw.to_string()),
        }
    }

    /// The segment before the first comma
    ///
    /// This deliberately cuts generic argument lists short, so
    /// `List`1[[System.Object, mscorlib]]` yields `List`1[[System.Object`.
    pub fn leading_segment(&self) -> &str {
        let s = match self {
            TypeName::Primitive(s) | TypeName::Complex(s) | TypeName::Unresolved(s) => s,
        };
        s.split(',').next().unwrap_or("").trim()
    }

    /// Simple type name without namespace or generic arguments
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeName::Primitive(s) | TypeName::Complex(s) => bare_type_name(s),
            TypeName::Unresolved(_) => None,
        }
    }

    /// Whether the type could be classified
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TypeName::Unresolved(_))
    }

    /// Check the simple name against an expected type name
    pub fn is(&self, simple_name: &str) -> bool {
        self.simple_name() == Some(simple_name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Primitive(s) | TypeName::Complex(s) | TypeName::Unresolved(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extract the simple type name from a type identifier
///
/// Drops the assembly qualifier, generic arity and arguments, the namespace,
/// nesting and any XAML prefix: `UiPath.Core.Activities.LogMessage, UiPath`
/// gives `LogMessage`, `System.Activities.Statements.ForEach`1[[...]]` gives
/// `ForEach`.
pub fn bare_type_name(type_id: &str) -> Option<&str> {
    let end = type_id
        .find(['`', '[', '<', ','])
        .unwrap_or(type_id.len());
    let head = type_id[..end].trim();
    let name = head.rsplit(['.', '+', ':']).next()?;

    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

/// Portion of a type string before the first comma outside brackets
fn top_level_head(raw: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in raw.char_indices() {
        match c {
            '[' | '<' => depth += 1,
            ']' | '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &raw[..i],
            _ => {}
        }
    }
    raw
}

fn strip_xaml_prefix(s: &str) -> &str {
    match s.split_once(':') {
        Some((prefix, rest)) if !prefix.contains(['.', '[', '<']) => rest,
        _ => s,
    }
}

fn is_system_or_bare(qualified: &str) -> bool {
    !qualified.contains('.') || qualified.starts_with("System.") && qualified.matches('.').count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_forms() {
        assert_eq!(TypeName::parse("System.String"), TypeName::Primitive("System.String".into()));
        assert_eq!(TypeName::parse("x:String"), TypeName::Primitive("System.String".into()));
        assert_eq!(
            TypeName::parse("System.Int32, mscorlib, Version=4.0.0.0"),
            TypeName::Primitive("System.Int32".into())
        );
        assert_eq!(TypeName::parse("Boolean"), TypeName::Primitive("System.Boolean".into()));
    }

    #[test]
    fn test_complex_forms() {
        let secure = TypeName::parse("System.Security.SecureString, mscorlib");
        assert_eq!(secure, TypeName::Complex("System.Security.SecureString".into()));
        assert!(secure.is("SecureString"));

        let list = TypeName::parse(
            "System.Collections.Generic.List`1[[System.String, mscorlib]], mscorlib",
        );
        assert_eq!(list.simple_name(), Some("List"));
        assert!(list.is_resolved());

        // a nested namespace named like a primitive is not a primitive
        let custom = TypeName::parse("Acme.Types.String");
        assert_eq!(custom, TypeName::Complex("Acme.Types.String".into()));
    }

    #[test]
    fn test_unresolved() {
        assert!(!TypeName::parse("").is_resolved());
        assert!(!TypeName::parse("   ").is_resolved());
        assert!(!TypeName::parse("not a type").is_resolved());
        assert_eq!(TypeName::parse("9Lives").simple_name(), None);
    }

    #[test]
    fn test_leading_segment_cuts_at_first_comma() {
        let t = TypeName::parse(
            "System.Collections.Generic.List`1[[System.Object, mscorlib]], mscorlib",
        );
        assert_eq!(t.leading_segment(), "System.Collections.Generic.List`1[[System.Object");

        let u = TypeName::Unresolved("Weird Type, Asm".into());
        assert_eq!(u.leading_segment(), "Weird Type");
    }

    #[test]
    fn test_bare_type_name() {
        assert_eq!(
            bare_type_name("UiPath.Core.Activities.LogMessage, UiPath.System.Activities"),
            Some("LogMessage")
        );
        assert_eq!(
            bare_type_name("System.Activities.Statements.ForEach`1[[System.String, mscorlib]]"),
            Some("ForEach")
        );
        assert_eq!(bare_type_name("ui:InputDialog"), Some("InputDialog"));
        assert_eq!(bare_type_name("Outer+Inner"), Some("Inner"));
        assert_eq!(bare_type_name(""), None);
        assert_eq!(bare_type_name("Bad Name"), None);
    }
}
