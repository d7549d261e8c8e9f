//! Unrolled Feature Names
//!
//! When a feature is unrolled, every iteration is reported to the host as a
//! distinctly named test. The name comes from a template: `#token`
//! placeholders are replaced with the iteration's data values, bound
//! positionally through the feature's parameter names.

use regex::Regex;
use spekt_model::DataValue;
use std::sync::OnceLock;

/// Template applied when an unroll directive carries none of its own.
pub const DEFAULT_UNROLL_TEMPLATE: &str = "#feature_name[#iteration_count]";

fn token_pattern() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    // Safety: this regex literal is guaranteed to compile
    TOKEN_RE.get_or_init(|| Regex::new(r"#([A-Za-z_][A-Za-z0-9_]*)").unwrap())
}

/// Renders one data value for inline use in a name: strings bare,
/// everything else as compact JSON.
fn render_plain(value: &DataValue) -> String {
    match value {
        DataValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Generates one display name per iteration from a `#token` template.
///
/// Two tokens are always available: `#feature_name` (the feature's display
/// name) and `#iteration_count` (zero-based, counted per generator). Every
/// other token is looked up among the feature's parameter names and bound
/// to the matching position of the iteration's data row. Tokens that
/// resolve to nothing stay in the name verbatim, which makes template
/// typos visible instead of silently swallowed.
#[derive(Debug)]
pub struct UnrolledNameGenerator {
    feature_name: String,
    parameter_names: Vec<String>,
    template: String,
    iteration_index: u32,
}

impl UnrolledNameGenerator {
    /// Generator for a feature, binding `parameter_names` positionally.
    pub fn new(
        feature_name: impl Into<String>,
        parameter_names: Vec<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            feature_name: feature_name.into(),
            parameter_names,
            template: template.into(),
            iteration_index: 0,
        }
    }

    /// Instantiate the template for the next iteration's data row.
    pub fn name_for(&mut self, data_values: &[DataValue]) -> String {
        let index = self.iteration_index;
        self.iteration_index += 1;
        token_pattern()
            .replace_all(&self.template, |captures: &regex::Captures<'_>| {
                let token = &captures[1];
                if token == "feature_name" {
                    return self.feature_name.clone();
                }
                if token == "iteration_count" {
                    return index.to_string();
                }
                match self
                    .parameter_names
                    .iter()
                    .position(|name| name == token)
                    .and_then(|position| data_values.get(position))
                {
                    Some(value) => render_plain(value),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }
}
