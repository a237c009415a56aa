use crate::console::ConsoleArgs;
use crate::parser::html;
use crate::style::spans;
use crate::template::{Template, Value};

pub mod printh {
    use super::*;

    /// Template → escaped markup → node tree → spans → console arguments.
    pub fn generate(template: &Template) -> ConsoleArgs {
        let (markup, stylesheet) = template.resolve();
        log::debug!("rendering {} bytes of markup", markup.len());
        let fragment = html::parse_fragment(&markup);
        let spans = spans::fragment_to_spans(&fragment, &stylesheet);
        ConsoleArgs::from_spans(&spans)
    }

    /// [`generate`] for a template given as fragments and values, returning
    /// the flat `[format, style…]` list.
    pub fn console_args<P, V>(parts: P, values: V) -> Vec<String>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        generate(&Template::new(parts, values)).into_vec()
    }
}
