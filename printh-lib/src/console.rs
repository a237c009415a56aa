//! Flattening spans into arguments for a `%c`-styled console call.

use crate::style::spans::Span;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// The directive that applies the next style argument to the text after it.
pub const PLACEHOLDER: &str = "%c";

/// A format string with one [`PLACEHOLDER`] per span, followed by one style
/// per placeholder.
///
/// Serializes as the flat array `[format, style…]`, the shape
/// `console.log(...args)` expects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsoleArgs {
    pub format: String,
    pub styles: Vec<String>,
}

impl ConsoleArgs {
    pub fn from_spans(spans: &[Span]) -> Self {
        let mut format = String::new();
        let mut styles = Vec::with_capacity(spans.len());
        for span in spans {
            format.push_str(PLACEHOLDER);
            format.push_str(&span.text);
            styles.push(span.style.clone());
        }
        ConsoleArgs { format, styles }
    }

    /// Number of placeholders emitted, one per span.
    pub fn placeholder_count(&self) -> usize {
        self.styles.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.styles.len() + 1);
        args.push(self.format);
        args.extend(self.styles);
        args
    }

    /// Render a JavaScript statement calling `callee` with these arguments,
    /// e.g. `console.log("%cHi", "font-style:italic");`.
    pub fn to_js_call(&self, callee: &str) -> String {
        let args = std::iter::once(&self.format)
            .chain(&self.styles)
            .map(|arg| js_string(arg))
            .collect::<Vec<_>>();
        format!("{}({});", callee, args.join(", "))
    }
}

// JSON string literals are valid JavaScript string literals.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

impl From<ConsoleArgs> for Vec<String> {
    fn from(args: ConsoleArgs) -> Self {
        args.into_vec()
    }
}

impl Serialize for ConsoleArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.styles.len() + 1))?;
        seq.serialize_element(&self.format)?;
        for style in &self.styles {
            seq.serialize_element(style)?;
        }
        seq.end()
    }
}
