//! Host Descriptions
//!
//! Lightweight handles the host runner keys its notifications by. A suite
//! description lists its child tests; equality and hashing go by display
//! name only, which is how hosts correlate start/finish/failure events.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A host-facing description of a spec, feature, or iteration.
#[derive(Debug, Clone)]
pub struct Description {
    display_name: String,
    children: Vec<Description>,
}

impl Description {
    /// A leaf test description, displayed as `name(container)`.
    pub fn test(container: &str, name: &str) -> Self {
        Self {
            display_name: format!("{}({})", name, container),
            children: Vec::new(),
        }
    }

    /// A suite description with child tests.
    pub fn suite(name: &str, children: Vec<Description>) -> Self {
        Self {
            display_name: name.to_string(),
            children,
        }
    }

    /// Display name shown by the host.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Child descriptions; empty for leaf tests.
    pub fn children(&self) -> &[Description] {
        &self.children
    }
}

impl PartialEq for Description {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
    }
}

impl Eq for Description {}

impl Hash for Description {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_name.hash(state);
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_display_format() {
        let description = Description::test("CalcSpec", "adds numbers");
        assert_eq!(description.display_name(), "adds numbers(CalcSpec)");
        assert!(description.children().is_empty());
    }

    #[test]
    fn test_equality_is_by_display_name() {
        let a = Description::test("CalcSpec", "adds numbers");
        let b = Description::test("CalcSpec", "adds numbers");
        let c = Description::suite("adds numbers(CalcSpec)", vec![a.clone()]);
        assert_eq!(a, b);
        // Children do not participate; hosts match on the name alone.
        assert_eq!(a, c);
    }

    #[test]
    fn test_suite_lists_children() {
        let children = vec![
            Description::test("CalcSpec", "adds"),
            Description::test("CalcSpec", "subtracts"),
        ];
        let suite = Description::suite("CalcSpec", children);
        assert_eq!(suite.children().len(), 2);
        assert_eq!(suite.display_name(), "CalcSpec");
    }
}
