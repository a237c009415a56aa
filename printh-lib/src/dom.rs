use html5ever::QualName;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node while the parser is still building the tree.
    pub type Handle = Rc<RefCell<Node>>;

    const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
        Comment(String),
    }

    #[derive(Debug, Clone, Default)]
    pub struct DocumentRootNode {
        pub children: Vec<Handle>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: HashMap<String, String>,
        pub children: Vec<Handle>,
        /// Contents of a `<template>` element, kept out of `children`.
        pub template_contents: Option<Handle>,
    }

    /// Markup parsed on its own, detached from any document.
    #[derive(Debug, Default)]
    pub struct Fragment {
        pub children: Vec<Handle>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl ElementNode {
        pub fn new(qual_name: QualName) -> Self {
            ElementNode {
                tag: qual_name.local.to_string(),
                qual_name,
                attributes: HashMap::new(),
                children: Vec::new(),
                template_contents: None,
            }
        }

        pub fn is_html(&self) -> bool {
            &*self.qual_name.ns == HTML_NAMESPACE
        }

        /// The tag name as a DOM reports it: uppercase for HTML elements,
        /// the local name untouched for SVG and MathML.
        pub fn tag_name(&self) -> String {
            if self.is_html() {
                self.tag.to_ascii_uppercase()
            } else {
                self.tag.clone()
            }
        }

        pub fn attribute(&self, name: &str) -> Option<&str> {
            self.attributes.get(name).map(String::as_str)
        }
    }

    impl Node {
        pub fn children(&self) -> Option<&Vec<Handle>> {
            match self {
                Node::DocumentRoot(root) => Some(&root.children),
                Node::Element(elem) => Some(&elem.children),
                Node::Text(_) | Node::Comment(_) => None,
            }
        }

        pub fn children_mut(&mut self) -> Option<&mut Vec<Handle>> {
            match self {
                Node::DocumentRoot(root) => Some(&mut root.children),
                Node::Element(elem) => Some(&mut elem.children),
                Node::Text(_) | Node::Comment(_) => None,
            }
        }
    }

    #[cfg(test)]
    impl Fragment {
        pub fn is_empty(&self) -> bool {
            self.children.is_empty()
        }

        /// Concatenated text of every node, comments excluded.
        pub fn text_content(&self) -> String {
            let mut out = String::new();
            let mut pending: Vec<Handle> = self.children.iter().rev().cloned().collect();
            while let Some(handle) = pending.pop() {
                let node = handle.borrow();
                match &*node {
                    Node::Text(text) => out.push_str(text),
                    Node::Comment(_) => {}
                    other => {
                        if let Some(children) = other.children() {
                            pending.extend(children.iter().rev().cloned());
                        }
                    }
                }
            }
            out
        }
    }

    /// Tears a tree down one level at a time so deep nesting cannot
    /// overflow the stack through recursive `Drop`. Nodes still shared
    /// elsewhere keep their children.
    fn release(mut nodes: Vec<Handle>) {
        while let Some(node) = nodes.pop() {
            if Rc::strong_count(&node) > 1 {
                continue;
            }
            let Ok(mut cell) = node.try_borrow_mut() else {
                continue;
            };
            if let Some(children) = cell.children_mut() {
                nodes.append(children);
            }
            if let Node::Element(elem) = &mut *cell {
                nodes.extend(elem.template_contents.take());
            }
        }
    }

    impl Drop for Fragment {
        fn drop(&mut self) {
            release(std::mem::take(&mut self.children));
        }
    }

    impl Drop for Document {
        fn drop(&mut self) {
            if Rc::strong_count(&self.root) > 1 {
                return;
            }
            if let Ok(mut root) = self.root.try_borrow_mut() {
                if let Some(children) = root.children_mut() {
                    release(std::mem::take(children));
                }
            }
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
        }
    }
}
