//! Parsing of markup into the crate's own node tree.
//!
//! html5ever does the tokenizing and all of the error recovery; the
//! [`PrinthTreeSink`] below only builds `crate::dom::dom_tree` nodes as the
//! tree builder asks for them.

use crate::dom::dom_tree::{self, DocumentRootNode, ElementNode, Fragment, Handle, Node};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Parses `markup` as the content of a `<body>` and returns its nodes,
/// detached from the document they were built in.
///
/// Never fails: malformed markup is repaired the way a browser would.
pub fn parse_fragment(markup: &str) -> Fragment {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{markup}</body></html>");
    let document = create_dom_tree(&wrapped);
    Fragment {
        children: take_body_children(&document),
    }
}

/// Creates a DOM tree from a complete HTML document.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = PrinthTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content)
}

fn take_body_children(document: &dom_tree::Document) -> Vec<Handle> {
    let body = find_child_element(&document.root, "html")
        .and_then(|html| find_child_element(&html, "body"));
    let Some(body) = body else {
        return Vec::new();
    };
    let mut node = body.borrow_mut();
    node.children_mut().map(std::mem::take).unwrap_or_default()
}

fn find_child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    let node = parent.borrow();
    node.children()?
        .iter()
        .find(|child| matches!(&*child.borrow(), Node::Element(elem) if elem.tag == tag))
        .cloned()
}

/// Finds the node holding `target` as a direct child, and its index there.
fn locate(root: &Handle, target: &Handle) -> Option<(Handle, usize)> {
    let mut pending = vec![root.clone()];
    while let Some(handle) = pending.pop() {
        let node = handle.borrow();
        if let Some(children) = node.children() {
            if let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, target)) {
                return Some((handle.clone(), index));
            }
            pending.extend(children.iter().cloned());
        }
        if let Node::Element(elem) = &*node {
            pending.extend(elem.template_contents.clone());
        }
    }
    None
}

fn new_text(text: &str) -> Handle {
    Rc::new(RefCell::new(Node::Text(text.to_string())))
}

/// Appends to `children`, merging character data into a trailing text node.
fn push_child(children: &mut Vec<Handle>, child: NodeOrText<Handle>) {
    match child {
        NodeOrText::AppendText(text) => {
            if let Some(last) = children.last() {
                if let Node::Text(existing) = &mut *last.borrow_mut() {
                    existing.push_str(&text);
                    return;
                }
            }
            children.push(new_text(&text));
        }
        NodeOrText::AppendNode(node) => children.push(node),
    }
}

fn insert_child(children: &mut Vec<Handle>, index: usize, child: NodeOrText<Handle>) {
    match child {
        NodeOrText::AppendText(text) => {
            if index > 0 {
                if let Node::Text(existing) = &mut *children[index - 1].borrow_mut() {
                    existing.push_str(&text);
                    return;
                }
            }
            children.insert(index, new_text(&text));
        }
        NodeOrText::AppendNode(node) => children.insert(index, node),
    }
}

/// A TreeSink building the `dom_tree` used by the span walker.
pub struct PrinthTreeSink {
    document: dom_tree::Document,
}

impl PrinthTreeSink {
    /// Creates a sink holding an empty document.
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
        }
    }

    fn find_parent(&self, target: &Handle) -> Option<(Handle, usize)> {
        locate(&self.document.root, target)
    }
}

impl Default for PrinthTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct PrinthElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PrinthElemName {
    /// Returns the local name of the element.
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    /// Returns the namespace of the element.
    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for PrinthTreeSink {
    type Handle = Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = PrinthElemName
    where
        Self: 'a;

    /// Hands back the finished document.
    fn finish(self) -> Self::Output {
        self.document
    }

    /// Parse errors are already repaired by html5ever; they are only logged.
    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!("markup parse error: {}", msg);
    }

    /// Returns the handle to the document's root node.
    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name for the given handle; non-elements get an empty name.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &*target.borrow() {
            Node::Element(elem) => PrinthElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            _ => PrinthElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    /// Creates an element node with its attributes. Templates also get a
    /// separate contents node.
    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> Self::Handle {
        let mut element = ElementNode::new(name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        if flags.template {
            element.template_contents = Some(Rc::new(RefCell::new(Node::DocumentRoot(
                DocumentRootNode::new(),
            ))));
        }
        Rc::new(RefCell::new(Node::Element(element)))
    }

    /// Creates a comment node.
    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(Node::Comment(text.to_string())))
    }

    /// Processing instructions are kept as comments.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(Node::Comment(format!("{} {}", target, data))))
    }

    /// Appends a node or text to `parent`, merging adjacent text.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut parent_node = parent.borrow_mut();
        match parent_node.children_mut() {
            Some(children) => push_child(children, child),
            // Text and comment nodes cannot have children.
            None => log::debug!("dropping child appended to a leaf node"),
        }
    }

    /// Inserts before `element` when it is attached, otherwise appends to
    /// `prev_element`. Used for foster parenting.
    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.find_parent(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    /// The doctype is only logged.
    fn append_doctype_to_document(&self, name: StrTendril, _public_id: StrTendril, _system_id: StrTendril) {
        log::trace!("doctype {}", name);
    }

    /// Scripts are never run.
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Nothing to do when an element is closed.
    fn pop(&self, _node: &Self::Handle) {}

    /// Returns the contents node of a template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        if let Node::Element(elem) = &*target.borrow() {
            if let Some(contents) = &elem.template_contents {
                return contents.clone();
            }
        }
        target.clone()
    }

    /// Determines if two handles refer to the same node.
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    /// Quirks mode does not affect the tree built here; it is only logged.
    fn set_quirks_mode(&self, mode: QuirksMode) {
        log::trace!("quirks mode {:?}", mode);
    }

    /// Inserts a node or text right before `sibling`, detaching the node
    /// from its old parent first.
    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if let NodeOrText::AppendNode(node) = &child {
            self.remove_from_parent(node);
        }
        let Some((parent, index)) = self.find_parent(sibling) else {
            log::debug!("sibling is detached, dropping inserted node");
            return;
        };
        let mut parent_node = parent.borrow_mut();
        if let Some(children) = parent_node.children_mut() {
            insert_child(children, index, child);
        }
    }

    /// Adds attributes to the target element if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Node::Element(elem) = &mut *target.borrow_mut() {
            for attr in attrs {
                elem.attributes
                    .entry(attr.name.local.to_string())
                    .or_insert_with(|| attr.value.to_string());
            }
        }
    }

    /// Detaches `target` from its parent, if it has one.
    fn remove_from_parent(&self, target: &Self::Handle) {
        if let Some((parent, index)) = self.find_parent(target) {
            let mut parent_node = parent.borrow_mut();
            if let Some(children) = parent_node.children_mut() {
                children.remove(index);
            }
        }
    }

    /// Moves every child of `node` to the end of `new_parent`.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let moved = node
            .borrow_mut()
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = new_parent.borrow_mut().children_mut() {
            children.extend(moved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect_structure(fragment: &Fragment) -> String {
        let mut output = String::new();
        for child in &fragment.children {
            traverse_node(child, 0, &mut output);
        }
        output
    }

    fn traverse_node(node: &Handle, depth: usize, output: &mut String) {
        match &*node.borrow() {
            Node::Element(elem) => {
                *output += &format!("{}<{}>\n", "  ".repeat(depth), elem.tag);
                for child in &elem.children {
                    traverse_node(child, depth + 1, output);
                }
            }
            Node::Text(text) => {
                *output += &format!("{}{:?}\n", "  ".repeat(depth), text);
            }
            Node::Comment(_) | Node::DocumentRoot(_) => {}
        }
    }

    #[test]
    fn test_mixed_content() {
        let fragment = parse_fragment("This is <strong>bold</strong> and <em>italic</em>.");
        let expected = r#"
"This is "
<strong>
  "bold"
" and "
<em>
  "italic"
"."
"#;
        assert_eq!(collect_structure(&fragment).trim(), expected.trim());
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let fragment = parse_fragment("  <k>x</k>");
        let expected = "\"  \"\n<k>\n  \"x\"\n";
        assert_eq!(collect_structure(&fragment), expected);
    }

    #[test]
    fn test_entities_are_decoded_into_one_text_node() {
        let fragment = parse_fragment("a &lt;b&gt; &amp; c");
        assert_eq!(fragment.children.len(), 1);
        assert_eq!(fragment.text_content(), "a <b> & c");
    }

    #[test]
    fn test_attributes() {
        let fragment = parse_fragment(r#"<span style="color:blue" data-x="1">x</span>"#);
        let first = fragment.children[0].borrow();
        let Node::Element(elem) = &*first else {
            panic!("expected an element");
        };
        assert_eq!(elem.attribute("style"), Some("color:blue"));
        assert_eq!(elem.attribute("data-x"), Some("1"));
        assert_eq!(elem.tag_name(), "SPAN");
    }

    #[test]
    fn test_unclosed_tags_are_recovered() {
        let fragment = parse_fragment("<em>open <b>bold");
        let expected = r#"
<em>
  "open "
  <b>
    "bold"
"#;
        assert_eq!(collect_structure(&fragment).trim(), expected.trim());
    }

    #[test]
    fn test_misnested_formatting_is_reparented() {
        let fragment = parse_fragment("<b>1<i>2</b>3</i>");
        let expected = r#"
<b>
  "1"
  <i>
    "2"
<i>
  "3"
"#;
        assert_eq!(collect_structure(&fragment).trim(), expected.trim());
    }

    #[test]
    fn test_template_contents_stay_out_of_children() {
        let fragment = parse_fragment("a<template>hidden</template>b");
        assert_eq!(fragment.text_content(), "ab");
    }

    #[test]
    fn test_comments_are_kept_as_comments() {
        let fragment = parse_fragment("a<!-- note -->b");
        assert_eq!(fragment.children.len(), 3);
        assert!(matches!(&*fragment.children[1].borrow(), Node::Comment(c) if c == " note "));
    }

    #[test]
    fn test_empty_markup() {
        assert!(parse_fragment("").is_empty());
    }

    #[test]
    fn test_deeply_nested_trees_are_dropped_iteratively() {
        let markup = "<span>".repeat(50_000) + "x";
        let fragment = parse_fragment(&markup);
        assert_eq!(fragment.children.len(), 1);
        assert_eq!(fragment.text_content(), "x");
        drop(fragment);

        let document = create_dom_tree(&format!("<body>{}</body>", "<span>".repeat(50_000)));
        drop(document);
    }

    #[test]
    fn test_shared_nodes_survive_fragment_drop() {
        let fragment = parse_fragment("<b><i>x</i></b>");
        let bold = fragment.children[0].clone();
        drop(fragment);
        let node = bold.borrow();
        let Node::Element(elem) = &*node else {
            panic!("expected an element");
        };
        assert_eq!(elem.children.len(), 1);
    }

    #[test]
    fn test_svg_keeps_local_name() {
        let fragment = parse_fragment("<svg><foreignObject>x</foreignObject></svg>");
        let svg = fragment.children[0].borrow();
        let Node::Element(svg) = &*svg else {
            panic!("expected svg element");
        };
        assert!(!svg.is_html());
        let inner = svg.children[0].borrow();
        let Node::Element(inner) = &*inner else {
            panic!("expected foreignObject element");
        };
        assert_eq!(inner.tag_name(), "foreignObject");
    }
}
