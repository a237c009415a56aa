//! Tag name → CSS declaration mapping.

use crate::error::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Key whose declarations apply underneath every element.
pub const WILDCARD: &str = "*";

const BOLD: &str = "font-weight:bolder";
const ITALIC: &str = "font-style:italic";
const STRUCK: &str = "text-decoration:line-through";
const UNDERLINE: &str = "text-decoration:underline";
const MONO: &str = "font-family:monospace";

static BUILTIN: Lazy<Stylesheet> = Lazy::new(|| {
    Stylesheet::new()
        .with("EM", ITALIC)
        .with("I", ITALIC)
        .with("CITE", ITALIC)
        .with("DFN", ITALIC)
        .with("STRONG", BOLD)
        .with("B", BOLD)
        .with("CODE", format!("{MONO};color:#080;background:#efefef;outline:1px solid #aaa"))
        .with("SAMP", format!("{MONO};background:black;color:white"))
        .with(
            "KBD",
            concat!(
                "border:1px solid black;background:#ddd;color:#000;",
                "border-radius:2px;font-size:.9em;padding:0 2px;",
                "box-shadow:0 -2px 0 0 #aaa inset;",
            ),
        )
        .with("MARK", "background:yellow;color:black")
        .with("INS", UNDERLINE)
        .with("DEL", STRUCK)
        .with("U", UNDERLINE)
        .with("S", STRUCK)
        .with("HR", "display:block;border-bottom:1px solid currentcolor")
        .with("SUB", "font-size:0.85em;vertical-align:sub;")
        .with("SUP", "font-size:0.85em;vertical-align:super;")
});

/// CSS declarations keyed by uppercase tag name, plus an optional
/// [`WILDCARD`] entry.
///
/// Keys are uppercased on the way in, so `"kbd"` and `"KBD"` name the same
/// rule. [`Stylesheet::default`] is the built-in sheet; [`Stylesheet::new`]
/// is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct Stylesheet {
    rules: HashMap<String, String>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Stylesheet {
            rules: HashMap::new(),
        }
    }

    /// The stylesheet used when a template does not bring its own.
    pub fn builtin() -> &'static Stylesheet {
        &BUILTIN
    }

    /// Parse a JSON object of `"TAG": "declarations"` pairs.
    ///
    /// ```
    /// use printh_lib::Stylesheet;
    ///
    /// let sheet = Stylesheet::from_json(r#"{"k": "color:red", "*": "font-size:12px"}"#).unwrap();
    /// assert_eq!(sheet.get("K"), Some("color:red"));
    /// assert_eq!(sheet.wildcard(), Some("font-size:12px"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Add or replace the declarations for `tag`, returning the old ones.
    pub fn insert(&mut self, tag: &str, css: impl Into<String>) -> Option<String> {
        self.rules.insert(normalize_key(tag), css.into())
    }

    /// Builder form of [`Stylesheet::insert`].
    pub fn with(mut self, tag: &str, css: impl Into<String>) -> Self {
        self.insert(tag, css);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.rules.get(tag).map(String::as_str)
    }

    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD)
    }

    /// Declarations an element contributes: its stylesheet rule followed by
    /// its own `style` attribute, joined with no separator. Missing parts
    /// contribute nothing.
    pub fn element_style(&self, tag: &str, inline: Option<&str>) -> String {
        let mut styles = String::new();
        if let Some(css) = self.get(tag) {
            styles.push_str(css);
        }
        if let Some(css) = inline {
            styles.push_str(css);
        }
        styles
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Stylesheet::builtin().clone()
    }
}

fn normalize_key(tag: &str) -> String {
    tag.to_ascii_uppercase()
}

impl From<HashMap<String, String>> for Stylesheet {
    fn from(rules: HashMap<String, String>) -> Self {
        rules.into_iter().collect()
    }
}

impl From<Stylesheet> for HashMap<String, String> {
    fn from(sheet: Stylesheet) -> Self {
        sheet.rules
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Stylesheet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sheet = Stylesheet::new();
        for (tag, css) in iter {
            sheet.insert(tag.as_ref(), css);
        }
        sheet
    }
}
