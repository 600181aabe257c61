//! Structural clean-up of imported editor trees.
//!
//! Import sources nest things freely: text directly inside a list, a
//! paragraph inside a link, a list inside a blockquote. The importer maps tags
//! one to one and leaves the result to this pass, which rewrites it into a
//! tree the nesting rules accept.
//!
//! # The Algorithm
//!
//! 1. **Block containers** (root, blockquote, listItem): runs of inline nodes
//!    are wrapped in a paragraph, or dropped when they are only whitespace.
//!    A `listItem` found outside a list is wrapped in one, joining the list
//!    right before it when there is one. Lists inside a blockquote are
//!    flattened into their content.
//!
//! 2. **Lists**: keep their items. A list nested directly in a list is
//!    attached to the preceding item; any other content is wrapped in a new
//!    item.
//!
//! 3. **Inline containers** (paragraph, heading, link): the inline content of
//!    nested blocks is hoisted in place of the block. Links inside links and
//!    void nodes inside inline containers are dropped, keeping link text.
//!
//! 4. **Whitespace** (optional): leading and trailing spaces of an inline
//!    container are trimmed, and a space starting a leaf that follows a leaf
//!    ending in a space is removed.
//!
//! Empty containers end up with a placeholder: an empty paragraph for block
//! containers, an empty leaf for everything else.

use crate::editor::{EditorNode, Element, ElementKind, Leaf};
use crate::vocabulary::{ListStyle, NodeType};
use std::mem;

pub(crate) struct Normalizer {
    pub(crate) trim_whitespace: bool,
}

impl Normalizer {
    /// Normalises the top-level sequence of a document.
    pub(crate) fn root(&self, nodes: Vec<EditorNode>) -> Vec<EditorNode> {
        self.container(nodes, NodeType::Root)
    }

    fn container(&self, nodes: Vec<EditorNode>, container: NodeType) -> Vec<EditorNode> {
        let blocks = self.blocks(nodes, container);
        if blocks.is_empty() {
            vec![Element::paragraph(Vec::new()).into()]
        } else {
            blocks
        }
    }

    fn blocks(&self, nodes: Vec<EditorNode>, container: NodeType) -> Vec<EditorNode> {
        let mut out = Vec::new();
        let mut run = Vec::new();
        for node in nodes {
            match node {
                EditorNode::Text(_) => run.push(node),
                EditorNode::Element(element) => {
                    self.block(element, container, &mut run, &mut out)
                }
            }
        }
        self.flush_run(&mut run, &mut out);
        out
    }

    fn block(
        &self,
        element: Element,
        container: NodeType,
        run: &mut Vec<EditorNode>,
        out: &mut Vec<EditorNode>,
    ) {
        let Element { kind, children } = element;
        if let ElementKind::Link { .. } = kind {
            run.push(Element { kind, children }.into());
            return;
        }
        self.flush_run(run, out);

        match kind {
            ElementKind::Paragraph { .. } | ElementKind::Heading { .. } => {
                out.push(Element::new(kind, self.inline(children)).into());
            }
            ElementKind::Blockquote { .. } => {
                let inner = self.container(children, NodeType::Blockquote);
                out.push(Element::new(kind, inner).into());
            }
            ElementKind::List { .. } | ElementKind::ListItem
                if container == NodeType::Blockquote =>
            {
                out.extend(self.blocks(children, container));
            }
            ElementKind::List { .. } => {
                out.push(Element::new(kind, self.list_items(children)).into());
            }
            ElementKind::ListItem => {
                let item = EditorNode::from(self.list_item(children));
                match out.last_mut() {
                    Some(EditorNode::Element(Element {
                        kind: ElementKind::List { .. },
                        children: items,
                    })) => items.push(item),
                    _ => out.push(Element::list(ListStyle::Bulleted, vec![item]).into()),
                }
            }
            ElementKind::ThematicBreak | ElementKind::Code { .. } | ElementKind::Block(_) => {
                out.push(Element::new(kind, Vec::new()).into());
            }
            ElementKind::Link { .. } => {}
        }
    }

    fn flush_run(&self, run: &mut Vec<EditorNode>, out: &mut Vec<EditorNode>) {
        let run = mem::take(run);
        if run.iter().all(EditorNode::is_blank_text) {
            return;
        }
        out.push(Element::paragraph(self.inline(run)).into());
    }

    fn list_items(&self, nodes: Vec<EditorNode>) -> Vec<EditorNode> {
        let mut items: Vec<Element> = Vec::new();
        let mut loose = Vec::new();

        for node in nodes {
            match node {
                EditorNode::Element(Element {
                    kind: ElementKind::ListItem,
                    children,
                }) => {
                    self.flush_loose(&mut loose, &mut items);
                    items.push(self.list_item(children));
                }
                EditorNode::Element(Element {
                    kind: kind @ ElementKind::List { .. },
                    children,
                }) => {
                    self.flush_loose(&mut loose, &mut items);
                    let nested = EditorNode::from(Element::new(kind, self.list_items(children)));
                    match items.last_mut() {
                        Some(item) => item.children.push(nested),
                        None => items.push(Element::list_item(vec![nested])),
                    }
                }
                node if node.is_blank_text() => {}
                node => loose.push(node),
            }
        }
        self.flush_loose(&mut loose, &mut items);

        if items.is_empty() {
            items.push(self.list_item(Vec::new()));
        }
        items.into_iter().map(EditorNode::from).collect()
    }

    fn flush_loose(&self, loose: &mut Vec<EditorNode>, items: &mut Vec<Element>) {
        if !loose.is_empty() {
            items.push(self.list_item(mem::take(loose)));
        }
    }

    fn list_item(&self, children: Vec<EditorNode>) -> Element {
        Element::list_item(self.container(children, NodeType::ListItem))
    }

    /// Content of a paragraph or heading.
    fn inline(&self, nodes: Vec<EditorNode>) -> Vec<EditorNode> {
        let mut out = Vec::new();
        self.hoist(nodes, &mut out, false);
        if self.trim_whitespace {
            trim_edges(&mut out);
        }
        out
    }

    fn hoist(&self, nodes: Vec<EditorNode>, out: &mut Vec<EditorNode>, in_link: bool) {
        for node in nodes {
            match node {
                EditorNode::Text(leaf) => self.push_leaf(leaf, out),
                EditorNode::Element(Element {
                    kind: kind @ ElementKind::Link { .. },
                    children,
                }) if !in_link => {
                    let mut inner = Vec::new();
                    self.hoist(children, &mut inner, true);
                    out.push(Element::new(kind, inner).into());
                }
                EditorNode::Element(element) if element.node_type().is_void() => {
                    tracing::trace!(
                        node = element.node_type().wire_name(),
                        "dropping void node inside inline content"
                    );
                }
                EditorNode::Element(Element { children, .. }) => self.hoist(children, out, in_link),
            }
        }
    }

    fn push_leaf(&self, mut leaf: Leaf, out: &mut Vec<EditorNode>) {
        if self.trim_whitespace && leaf.text.starts_with(' ') {
            if let Some(EditorNode::Text(previous)) = out.last() {
                if previous.text.ends_with(' ') {
                    leaf.text = leaf.text.trim_start_matches(' ').to_string();
                }
            }
        }
        if !leaf.text.is_empty() {
            out.push(EditorNode::Text(leaf));
        }
    }
}

fn trim_edges(nodes: &mut Vec<EditorNode>) {
    if let Some(EditorNode::Text(leaf)) = nodes.first_mut() {
        leaf.text = leaf.text.trim_start_matches(' ').to_string();
    }
    if let Some(EditorNode::Text(leaf)) = nodes.last_mut() {
        leaf.text = leaf.text.trim_end_matches(' ').to_string();
    }
    nodes.retain(|node| !matches!(node, EditorNode::Text(leaf) if leaf.text.is_empty()));
}
