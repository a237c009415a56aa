use crate::dom::dom_tree::{ElementNode, Fragment, Handle, Node};
use crate::style::stylesheet::Stylesheet;
use serde::Serialize;

/// One run of text together with every declaration inherited from the
/// elements around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: String,
}

impl Span {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            style: style.into(),
        }
    }
}

/// Declarations contributed by each open element, outermost first.
///
/// Entries are concatenated, not cascaded: an empty entry still adds a `;`
/// when the stack is joined.
#[derive(Debug, Default, Clone)]
pub struct StyleStack {
    entries: Vec<String>,
}

impl StyleStack {
    pub fn new() -> Self {
        StyleStack::default()
    }

    /// Starts the stack with the stylesheet's wildcard entry, if it has one.
    pub fn for_stylesheet(stylesheet: &Stylesheet) -> Self {
        let mut stack = StyleStack::new();
        if let Some(base) = stylesheet.wildcard() {
            stack.push(base.to_string());
        }
        stack
    }

    pub fn push(&mut self, style: String) {
        self.entries.push(style);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn resolved(&self) -> String {
        self.entries.join(";")
    }
}

/// Walk `fragment` in document order and emit one span per text node.
///
/// The walk keeps its own stack of open elements, so nesting depth is
/// bounded by memory rather than by the thread's call stack.
pub fn fragment_to_spans(fragment: &Fragment, stylesheet: &Stylesheet) -> Vec<Span> {
    let mut stack = StyleStack::for_stylesheet(stylesheet);
    let mut spans = Vec::new();
    for child in &fragment.children {
        collect_spans(child, stylesheet, &mut stack, &mut spans);
    }
    log::debug!("collected {} spans", spans.len());
    spans
}

fn collect_spans(root: &Handle, stylesheet: &Stylesheet, stack: &mut StyleStack, spans: &mut Vec<Span>) {
    // Open elements and the index of the next child to visit. Every frame
    // owns exactly one style stack entry.
    let mut open: Vec<(Handle, usize)> = Vec::new();
    visit(root, stylesheet, stack, spans, &mut open);

    while let Some((elem, next)) = open.last_mut() {
        let child = child_at(elem, *next);
        *next += 1;
        match child {
            Some(child) => visit(&child, stylesheet, stack, spans, &mut open),
            None => {
                open.pop();
                stack.pop();
            }
        }
    }
}

fn visit(
    node_handle: &Handle,
    stylesheet: &Stylesheet,
    stack: &mut StyleStack,
    spans: &mut Vec<Span>,
    open: &mut Vec<(Handle, usize)>,
) {
    match &*node_handle.borrow() {
        Node::Text(text) => {
            spans.push(Span::new(text.as_str(), stack.resolved()));
        }
        Node::Element(elem) => {
            let style = element_style(elem, stylesheet);
            log::trace!("<{}> at depth {} adds {:?}", elem.tag, stack.depth(), style);
            stack.push(style);
            open.push((node_handle.clone(), 0));
        }
        Node::Comment(_) | Node::DocumentRoot(_) => {}
    }
}

fn child_at(node_handle: &Handle, index: usize) -> Option<Handle> {
    let node = node_handle.borrow();
    node.children().and_then(|children| children.get(index).cloned())
}

/// SVG and MathML elements take part in nesting but contribute no style.
fn element_style(elem: &ElementNode, stylesheet: &Stylesheet) -> String {
    if !elem.is_html() {
        return String::new();
    }
    stylesheet.element_style(&elem.tag_name(), elem.attribute("style"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::parse_fragment;
    use pretty_assertions::assert_eq;

    fn spans(markup: &str, stylesheet: &Stylesheet) -> Vec<Span> {
        fragment_to_spans(&parse_fragment(markup), stylesheet)
    }

    #[test]
    fn test_nesting_preserves_order() {
        let result = spans("<em>a<strong>b</strong>c</em>", Stylesheet::builtin());
        assert_eq!(
            result,
            vec![
                Span::new("a", "font-style:italic"),
                Span::new("b", "font-style:italic;font-weight:bolder"),
                Span::new("c", "font-style:italic"),
            ]
        );
    }

    #[test]
    fn test_top_level_text_is_unstyled() {
        let result = spans("plain", Stylesheet::builtin());
        assert_eq!(result, vec![Span::new("plain", "")]);
    }

    #[test]
    fn test_wildcard_is_the_base_entry() {
        let sheet = Stylesheet::new().with("*", "color:gray").with("B", "font-weight:bold");
        let result = spans("x<b>y</b><span>z</span>", &sheet);
        assert_eq!(
            result,
            vec![
                Span::new("x", "color:gray"),
                Span::new("y", "color:gray;font-weight:bold"),
                Span::new("z", "color:gray;"),
            ]
        );
    }

    #[test]
    fn test_inline_style_on_unmapped_tag() {
        let result = spans(r#"<span style="color:blue">x</span>"#, Stylesheet::builtin());
        assert_eq!(result, vec![Span::new("x", "color:blue")]);
    }

    #[test]
    fn test_inline_style_follows_stylesheet_rule() {
        let result = spans(r#"<b style="color:red">x</b>"#, Stylesheet::builtin());
        assert_eq!(result, vec![Span::new("x", "font-weight:boldercolor:red")]);
    }

    #[test]
    fn test_unstyled_elements_still_add_a_separator() {
        let result = spans("<em><span><b>x</b></span></em>", Stylesheet::builtin());
        assert_eq!(
            result,
            vec![Span::new("x", "font-style:italic;;font-weight:bolder")]
        );
    }

    #[test]
    fn test_void_and_comment_nodes_emit_nothing() {
        let result = spans("a<br><!-- c --><hr>b", Stylesheet::builtin());
        assert_eq!(result, vec![Span::new("a", ""), Span::new("b", "")]);
    }

    #[test]
    fn test_svg_contributes_no_style() {
        let sheet = Stylesheet::new().with("SVG", "color:red").with("TEXT", "color:blue");
        let result = spans("<svg><text>t</text></svg>", &sheet);
        assert_eq!(result, vec![Span::new("t", ";")]);
    }

    #[test]
    fn test_deep_nesting_is_walked_without_recursion() {
        let depth = 50_000;
        let markup = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        let result = spans(&markup, Stylesheet::builtin());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "x");
        assert_eq!(result[0].style, ";".repeat(depth - 1));
    }

    #[test]
    fn test_style_is_popped_when_an_element_closes() {
        let sheet = Stylesheet::new().with("I", "a").with("B", "b");
        let result = spans("<i><b>x</b>y</i>z", &sheet);
        assert_eq!(
            result,
            vec![Span::new("x", "a;b"), Span::new("y", "a"), Span::new("z", "")]
        );
    }

    #[test]
    fn test_style_stack_depth() {
        let sheet = Stylesheet::new().with("*", "x");
        let mut stack = StyleStack::for_stylesheet(&sheet);
        assert_eq!(stack.depth(), 1);
        stack.push(String::new());
        assert_eq!(stack.resolved(), "x;");
        assert_eq!(stack.pop(), Some(String::new()));
        assert_eq!(StyleStack::for_stylesheet(&Stylesheet::new()).depth(), 0);
    }
}
