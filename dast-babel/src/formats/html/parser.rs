//! HTML parsing (HTML → editor import)
//!
//! Pipeline: HTML string → html5ever DOM → tag table walk → normalisation →
//! editor value.
//!
//! The walk is lenient on purpose. Import sources are word-processor exports
//! and pasted markup, so tags outside [`TAG_TABLE`] are unwrapped (their
//! children take their place) instead of failing the import. Only the tags in
//! [`DROPPED_TAGS`] lose their content. Elements nested deeper than
//! [`MAX_DEPTH`] are unwrapped as well, which keeps the walk's recursion
//! bounded for any input.

use crate::common::normalize::Normalizer;
use crate::editor::{EditorNode, Element, Leaf};
use crate::error::FormatError;
use crate::vocabulary::{HeadingLevel, ListStyle, Mark};
use crate::walk::{walk, TreeNode, Walked};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use url::Url;

/// Options for the HTML import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Collapse whitespace runs to one space and trim paragraph edges.
    pub collapse_whitespace: bool,
    /// Turn inline `style` declarations (bold weight, italics, decorations)
    /// into marks.
    pub style_marks: bool,
    /// Base for resolving relative link targets.
    pub base_url: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            style_marks: true,
            base_url: None,
        }
    }
}

/// What a recognised tag turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    Mark(Mark),
    Heading(u8),
    List(ListStyle),
    ListItem,
    Blockquote,
    Paragraph,
    ThematicBreak,
    LineBreak,
    Link,
    CodeBlock,
}

/// Tag name → editor construct. Names are matched in lowercase.
pub const TAG_TABLE: &[(&str, TagRule)] = &[
    ("strong", TagRule::Mark(Mark::Strong)),
    ("b", TagRule::Mark(Mark::Strong)),
    ("em", TagRule::Mark(Mark::Emphasis)),
    ("i", TagRule::Mark(Mark::Emphasis)),
    ("u", TagRule::Mark(Mark::Underline)),
    ("ins", TagRule::Mark(Mark::Underline)),
    ("s", TagRule::Mark(Mark::Strikethrough)),
    ("strike", TagRule::Mark(Mark::Strikethrough)),
    ("del", TagRule::Mark(Mark::Strikethrough)),
    ("mark", TagRule::Mark(Mark::Highlight)),
    ("code", TagRule::Mark(Mark::Code)),
    ("h1", TagRule::Heading(1)),
    ("h2", TagRule::Heading(2)),
    ("h3", TagRule::Heading(3)),
    ("h4", TagRule::Heading(4)),
    ("h5", TagRule::Heading(5)),
    ("h6", TagRule::Heading(6)),
    ("ol", TagRule::List(ListStyle::Numbered)),
    ("ul", TagRule::List(ListStyle::Bulleted)),
    ("li", TagRule::ListItem),
    ("blockquote", TagRule::Blockquote),
    ("p", TagRule::Paragraph),
    ("hr", TagRule::ThematicBreak),
    ("br", TagRule::LineBreak),
    ("a", TagRule::Link),
    ("pre", TagRule::CodeBlock),
];

/// Tags removed together with everything inside them.
pub const DROPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "head", "title", "meta", "template",
];

/// Nesting depth past which elements are unwrapped into their text.
pub const MAX_DEPTH: usize = 512;

pub fn tag_rule(tag: &str) -> Option<TagRule> {
    TAG_TABLE
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, rule)| *rule)
}

/// Imports an HTML document or fragment as an editor value.
pub fn import_html(source: &str, options: &ImportOptions) -> Result<Vec<EditorNode>, FormatError> {
    // Step 1: Parse HTML to a DOM
    let dom = parse_document(RcDom::default(), Default::default()).one(source);

    // Step 2: Map tags to editor nodes
    let importer = Importer::new(options)?;
    let root = DomNode::root(dom.document.clone());
    let raw = walk(&root, &mut |node: &DomNode, children: Vec<EditorNode>| {
        importer.visit(node, children)
    })?
    .into_vec();

    // Step 3: Rewrite into a well-nested tree
    let normalizer = Normalizer {
        trim_whitespace: options.collapse_whitespace,
    };
    let value = normalizer.root(raw);

    tracing::debug!(nodes = value.len(), "imported html");
    Ok(value)
}

/// A DOM handle the tree walker can traverse, with its nesting depth.
///
/// The walk stops descending at [`MAX_DEPTH`]: a node at that depth gets the
/// text and line breaks of its whole subtree as flat children, so everything
/// nested deeper is unwrapped.
#[derive(Clone)]
struct DomNode {
    handle: Handle,
    depth: usize,
}

impl DomNode {
    fn root(handle: Handle) -> Self {
        Self { handle, depth: 0 }
    }

    fn child(&self, handle: Handle) -> Self {
        Self {
            handle,
            depth: self.depth + 1,
        }
    }
}

impl TreeNode for DomNode {
    fn child_nodes(&self) -> Cow<'_, [Self]> {
        match self.depth.cmp(&MAX_DEPTH) {
            Ordering::Less => Cow::Owned(
                self.handle
                    .children
                    .borrow()
                    .iter()
                    .map(|child| self.child(child.clone()))
                    .collect(),
            ),
            Ordering::Equal => {
                tracing::debug!(depth = MAX_DEPTH, "flattening deeply nested markup");
                Cow::Owned(
                    flat_text(&self.handle)
                        .into_iter()
                        .map(|child| self.child(child))
                        .collect(),
                )
            }
            Ordering::Greater => Cow::Borrowed(&[]),
        }
    }
}

/// Text nodes and `br` elements below `handle`, in document order. Content of
/// [`DROPPED_TAGS`] is skipped.
fn flat_text(handle: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = handle.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        let (keep, descend) = match &node.data {
            NodeData::Text { .. } => (true, false),
            NodeData::Element { name, .. } if &*name.local == "br" => (true, false),
            NodeData::Element { name, .. } => (false, !DROPPED_TAGS.contains(&&*name.local)),
            _ => (false, false),
        };
        if descend {
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
        if keep {
            out.push(node);
        }
    }
    out
}

struct Importer<'a> {
    options: &'a ImportOptions,
    base: Option<Url>,
}

impl<'a> Importer<'a> {
    fn new(options: &'a ImportOptions) -> Result<Self, FormatError> {
        let base = match options.base_url.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(Url::parse(raw).map_err(|e| {
                FormatError::ParseError(format!("Invalid base URL '{raw}': {e}"))
            })?),
        };
        Ok(Self { options, base })
    }

    fn visit(
        &self,
        node: &DomNode,
        children: Vec<EditorNode>,
    ) -> Result<Walked<EditorNode>, FormatError> {
        match &node.handle.data {
            NodeData::Document => Ok(Walked::Splice(children)),
            NodeData::Text { contents } => {
                let text = contents.borrow();
                let text = if self.options.collapse_whitespace {
                    collapse_whitespace(&text)
                } else {
                    text.to_string()
                };
                Ok(Walked::One(EditorNode::text(text)))
            }
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                let attrs = attrs.borrow();
                let attr = |key: &str| {
                    attrs
                        .iter()
                        .find(|a| &*a.name.local == key)
                        .map(|a| a.value.to_string())
                };
                self.element(node, tag, &attr, children)
            }
            NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => Ok(Walked::Drop),
        }
    }

    fn element(
        &self,
        node: &DomNode,
        tag: &str,
        attr: &dyn Fn(&str) -> Option<String>,
        mut children: Vec<EditorNode>,
    ) -> Result<Walked<EditorNode>, FormatError> {
        if DROPPED_TAGS.contains(&tag) {
            tracing::trace!(tag, "dropping tag with its content");
            return Ok(Walked::Drop);
        }

        let style = attr("style").map(|s| InlineStyle::parse(&s)).unwrap_or_default();
        if self.options.style_marks {
            add_marks(&mut children, &style.marks);
        }

        let element = match tag_rule(tag) {
            Some(TagRule::Mark(Mark::Strong)) if style.normal_weight => {
                tracing::trace!(tag, "unwrapping normal-weight bold wrapper");
                return Ok(Walked::Splice(children));
            }
            Some(TagRule::Mark(mark)) => {
                add_marks(&mut children, &BTreeSet::from([mark]));
                return Ok(Walked::Splice(children));
            }
            Some(TagRule::LineBreak) => return Ok(Walked::One(EditorNode::text("\n"))),
            Some(TagRule::Heading(level)) => Element::heading(HeadingLevel::new(level)?, children),
            Some(TagRule::List(style)) => Element::list(style, children),
            Some(TagRule::ListItem) => Element::list_item(children),
            Some(TagRule::Blockquote) => Element::blockquote(children),
            Some(TagRule::Paragraph) => Element::paragraph(children),
            Some(TagRule::ThematicBreak) => Element::thematic_break(),
            Some(TagRule::CodeBlock) => code_block(node),
            Some(TagRule::Link) => match attr("href") {
                Some(href) => Element::link(self.resolve(&href), children),
                None => return Ok(Walked::Splice(children)),
            },
            None => {
                tracing::trace!(tag, "unwrapping unknown tag");
                return Ok(Walked::Splice(children));
            }
        };
        Ok(Walked::One(element.into()))
    }

    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        match &self.base {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

/// Builds a code block from the raw text below a `pre`.
fn code_block(node: &DomNode) -> Element {
    let mut code = String::new();
    raw_text(&node.handle, &mut code);
    if code.ends_with('\n') {
        code.pop();
    }
    Element::code(code, code_language(&node.handle))
}

fn raw_text(handle: &Handle, out: &mut String) {
    let mut stack: Vec<Handle> = handle.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } if &*name.local == "br" => out.push('\n'),
            _ => stack.extend(node.children.borrow().iter().rev().cloned()),
        }
    }
}

/// Language from a `language-*` or `lang-*` class on the `pre` or on the
/// `code` elements directly inside it.
fn code_language(pre: &Handle) -> Option<String> {
    let mut current = pre.clone();
    loop {
        if let Some(language) = class_language(&current) {
            return Some(language);
        }
        let next = current
            .children
            .borrow()
            .iter()
            .find(|child| {
                matches!(&child.data, NodeData::Element { name, .. } if &*name.local == "code")
            })
            .cloned();
        current = next?;
    }
}

fn class_language(handle: &Handle) -> Option<String> {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return None;
    };
    let attrs = attrs.borrow();
    let language = attrs
        .iter()
        .filter(|a| &*a.name.local == "class")
        .flat_map(|a| a.value.split_whitespace())
        .filter_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .find(|language| !language.is_empty())
        .map(str::to_string);
    language
}

/// Adds `marks` to every non-empty leaf below `nodes`, void elements excluded.
fn add_marks(nodes: &mut [EditorNode], marks: &BTreeSet<Mark>) {
    if marks.is_empty() {
        return;
    }
    for node in nodes {
        match node {
            EditorNode::Text(Leaf { text, marks: own }) if !text.is_empty() => {
                own.extend(marks.iter().copied());
            }
            EditorNode::Text(_) => {}
            EditorNode::Element(element) if element.node_type().is_void() => {}
            EditorNode::Element(element) => add_marks(&mut element.children, marks),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// The mark-relevant part of an inline `style` attribute.
#[derive(Debug, Default, PartialEq, Eq)]
struct InlineStyle {
    marks: BTreeSet<Mark>,
    /// `font-weight` explicitly set to a normal weight.
    normal_weight: bool,
}

impl InlineStyle {
    fn parse(style: &str) -> Self {
        let mut parsed = InlineStyle::default();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();

            match property.as_str() {
                "font-weight" => match value.as_str() {
                    "bold" | "bolder" => {
                        parsed.marks.insert(Mark::Strong);
                    }
                    "normal" | "lighter" => parsed.normal_weight = true,
                    number => match number.parse::<u16>() {
                        Ok(weight) if weight >= 600 => {
                            parsed.marks.insert(Mark::Strong);
                        }
                        Ok(_) => parsed.normal_weight = true,
                        Err(_) => {}
                    },
                },
                "font-style" if value == "italic" || value == "oblique" => {
                    parsed.marks.insert(Mark::Emphasis);
                }
                "text-decoration" | "text-decoration-line" => {
                    if value.contains("underline") {
                        parsed.marks.insert(Mark::Underline);
                    }
                    if value.contains("line-through") {
                        parsed.marks.insert(Mark::Strikethrough);
                    }
                }
                _ => {}
            }
        }
        parsed
    }
}
