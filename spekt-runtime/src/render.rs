//! Object Rendering
//!
//! When an equality failure is converted into a comparison, its operands
//! must be rendered to text the host can diff. The renderer is injectable;
//! the default prints strings bare and everything else as pretty JSON.

use spekt_model::DataValue;

/// Renders operand values for failure messages and diffs.
pub trait ObjectRenderer {
    /// Render `value` to display text.
    fn render(&self, value: &DataValue) -> String;
}

/// JSON-based rendering: strings bare, other values pretty-printed so
/// nested structures diff line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    max_len: usize,
}

impl JsonRenderer {
    /// Renderer without truncation.
    pub fn new() -> Self {
        Self { max_len: 0 }
    }

    /// Renderer truncating output beyond `max_len` characters; zero means
    /// unlimited.
    pub fn truncated(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl ObjectRenderer for JsonRenderer {
    fn render(&self, value: &DataValue) -> String {
        let rendered = match value {
            DataValue::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
        if self.max_len > 0 && rendered.chars().count() > self.max_len {
            let prefix: String = rendered.chars().take(self.max_len).collect();
            format!("{}...", prefix)
        } else {
            rendered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strings_render_bare() {
        assert_eq!(JsonRenderer::new().render(&json!("hello")), "hello");
    }

    #[test]
    fn test_structures_render_pretty() {
        let rendered = JsonRenderer::new().render(&json!({ "a": 1 }));
        assert!(rendered.contains('\n'));
        assert!(rendered.contains("\"a\": 1"));
    }

    #[test]
    fn test_truncation_appends_ellipsis() {
        let renderer = JsonRenderer::truncated(4);
        assert_eq!(renderer.render(&json!("abcdefgh")), "abcd...");
        // At or under the limit, nothing is cut.
        assert_eq!(renderer.render(&json!("abcd")), "abcd");
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let long = "x".repeat(500);
        assert_eq!(JsonRenderer::new().render(&json!(long)).len(), 500);
    }
}
