//! Templates: literal markup fragments with values spliced between them.

use crate::escape::escape;
use crate::style::stylesheet::Stylesheet;
use std::borrow::Cow;
use std::fmt::Display;

/// First fragment that turns the first value into the stylesheet.
pub const STYLESHEET_DIRECTIVE: &str = "%s";

/// Placeholder [`Template::parse`] splits patterns at.
pub const VALUE_PLACEHOLDER: &str = "{}";

/// A value interpolated into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Escaped before it is spliced into the markup.
    Text(String),
    /// Only meaningful right after the `%s` directive.
    Stylesheet(Stylesheet),
}

impl Value {
    /// Stringify anything printable.
    pub fn display<T: Display + ?Sized>(value: &T) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Stylesheet> for Value {
    fn from(sheet: Stylesheet) -> Self {
        Value::Stylesheet(sheet)
    }
}

impl From<&Stylesheet> for Value {
    fn from(sheet: &Stylesheet) -> Self {
        Value::Stylesheet(sheet.clone())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

macro_rules! value_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

value_from_display!(char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Literal fragments and the values between them, the shape a tagged
/// template literal has: `parts.len() == values.len() + 1`.
///
/// Fragments are markup and are never escaped; text values always are.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    parts: Vec<String>,
    values: Vec<Value>,
}

impl Template {
    pub fn new<P, V>(parts: P, values: V) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        Template {
            parts: parts.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Split `pattern` at every `{}`; values are added with [`Template::value`].
    ///
    /// ```
    /// use printh_lib::Template;
    ///
    /// let template = Template::parse("Hello, <em>{}</em>!").value("<you>");
    /// assert_eq!(template.markup(), "Hello, <em>&lt;you&gt;</em>!");
    /// ```
    pub fn parse(pattern: &str) -> Self {
        Template {
            parts: pattern.split(VALUE_PLACEHOLDER).map(str::to_string).collect(),
            values: Vec::new(),
        }
    }

    /// Append the next interpolated value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Prefix the template with the stylesheet directive so `sheet` replaces
    /// the built-in stylesheet.
    pub fn with_stylesheet(mut self, sheet: Stylesheet) -> Self {
        self.parts.insert(0, STYLESHEET_DIRECTIVE.to_string());
        self.values.insert(0, Value::Stylesheet(sheet));
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// True when the first fragment is exactly the `%s` directive.
    pub fn has_stylesheet_directive(&self) -> bool {
        self.parts.first().map(String::as_str) == Some(STYLESHEET_DIRECTIVE)
    }

    /// The stylesheet this template renders with: the one following the
    /// directive, or the built-in one.
    pub fn stylesheet(&self) -> Cow<'_, Stylesheet> {
        if !self.has_stylesheet_directive() {
            return Cow::Borrowed(Stylesheet::builtin());
        }
        match self.values.first() {
            Some(Value::Stylesheet(sheet)) => Cow::Borrowed(sheet),
            Some(Value::Text(json)) => match Stylesheet::from_json(json) {
                Ok(sheet) => Cow::Owned(sheet),
                Err(err) => {
                    log::warn!("ignoring stylesheet directive: {}", err);
                    Cow::Borrowed(Stylesheet::builtin())
                }
            },
            None => {
                log::warn!("stylesheet directive without a stylesheet value");
                Cow::Borrowed(Stylesheet::builtin())
            }
        }
    }

    /// Splice the escaped values between the fragments, leaving out the
    /// directive and its stylesheet.
    ///
    /// Missing values splice as nothing and surplus values are dropped.
    pub fn markup(&self) -> String {
        let skip = usize::from(self.has_stylesheet_directive());
        let parts = self.parts.iter().skip(skip);
        let mut values = self.values.iter().skip(skip);

        let mut markup = String::new();
        let mut parts = parts.peekable();
        while let Some(part) = parts.next() {
            markup.push_str(part);
            if parts.peek().is_none() {
                break;
            }
            match values.next() {
                Some(Value::Text(text)) => markup.push_str(&escape(text)),
                Some(Value::Stylesheet(_)) => {
                    log::warn!("stylesheet interpolated outside the directive position");
                }
                None => {}
            }
        }
        markup
    }

    /// The markup and the stylesheet it is rendered with.
    pub fn resolve(&self) -> (String, Cow<'_, Stylesheet>) {
        (self.markup(), self.stylesheet())
    }
}

/// Build a [`Template`] from a `{}` pattern and the values for it.
///
/// ```
/// let template = printh_lib::template!("<b>{}</b> of {}", "3", 4);
/// assert_eq!(template.markup(), "<b>3</b> of 4");
/// ```
#[macro_export]
macro_rules! template {
    ($pattern:expr $(, $value:expr)* $(,)?) => {
        $crate::Template::parse($pattern)$(.value($value))*
    };
}
