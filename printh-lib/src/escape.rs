//! Escaping of interpolated values before they are spliced into markup.

use std::fmt::Display;

/// Escape the characters that would otherwise be read as markup.
///
/// `&`, `<`, `>`, `"` and `'` become `&amp;`, `&lt;`, `&gt;`, `&quot;` and
/// `&#039;`. Everything else passes through untouched.
///
/// # Examples
///
/// ```
/// use printh_lib::escape;
///
/// assert_eq!(escape("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
/// assert_eq!(escape(""), "");
/// ```
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

/// Stringify any value, then [`escape`] it.
pub fn escape_display<T: Display + ?Sized>(value: &T) -> String {
    escape(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_special_character() {
        assert_eq!(escape("&"), "&amp;");
        assert_eq!(escape("<"), "&lt;");
        assert_eq!(escape(">"), "&gt;");
        assert_eq!(escape("\""), "&quot;");
        assert_eq!(escape("'"), "&#039;");
    }

    #[test]
    fn test_ampersand_is_not_escaped_twice() {
        // The `&` introduced for `<` must not itself be rewritten.
        assert_eq!(escape("<&>"), "&lt;&amp;&gt;");
    }

    #[test]
    fn test_existing_entities_are_escaped_again() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(escape("héllo wörld"), "héllo wörld");
    }

    #[test]
    fn test_display_values() {
        assert_eq!(escape_display(&42), "42");
        assert_eq!(escape_display(&1.5), "1.5");
        assert_eq!(escape_display("it's"), "it&#039;s");
    }
}
