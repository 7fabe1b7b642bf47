//! Component tree and its render contract

use crate::components::attributes::{Attribute, Attributes};
use crate::error::NodeError;
use std::borrow::Cow;
use std::fmt;

/// Default tag for container nodes
pub const CONTAINER_TAG: &str = "div";
/// Default tag for text nodes
pub const TEXT_TAG: &str = "span";

/// Fields shared by every node variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
    pub attributes: Attributes,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            attributes: Attributes::new(),
        }
    }
}

/// A node of the UI tree.
///
/// `Container` renders its children; `Text` and `Heading` render their literal
/// `content` and never consult `children`, even when populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Container(Element),
    Text { element: Element, content: String },
    Heading {
        element: Element,
        content: String,
        level: u8,
    },
}

/// Discriminant of a [`Node`], mostly for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Text,
    Heading,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Text => "text",
            NodeKind::Heading => "heading",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Escape attribute values and text content.
    ///
    /// Turning this off emits author strings verbatim, so any untrusted input
    /// in the tree becomes injectable markup.
    pub escape: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { escape: true }
    }
}

impl RenderOptions {
    pub fn verbatim() -> Self {
        Self { escape: false }
    }

    fn attribute<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.escape {
            html_escape::encode_double_quoted_attribute(value)
        } else {
            value.into()
        }
    }

    fn text<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.escape {
            html_escape::encode_text(value)
        } else {
            value.into()
        }
    }
}

fn heading_tag(level: u8) -> String {
    format!("h{}", level)
}

/// Whether `tag` is safe to emit as an element name: an ASCII letter
/// followed by letters, digits or hyphens
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl Node {
    /// Container node with an explicit tag
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Container(Element::new(tag))
    }

    /// Container node with the default `div` tag
    pub fn container() -> Self {
        Self::element(CONTAINER_TAG)
    }

    /// Text node with the default `span` tag
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            element: Element::new(TEXT_TAG),
            content: content.into(),
        }
    }

    /// Heading node; `level` is clamped into 1..=6
    pub fn heading(content: impl Into<String>, level: u8) -> Self {
        let level = level.clamp(1, 6);
        Node::Heading {
            element: Element::new(heading_tag(level)),
            content: content.into(),
            level,
        }
    }

    /// Heading node that rejects levels outside 1..=6
    pub fn try_heading(content: impl Into<String>, level: i64) -> Result<Self, NodeError> {
        match u8::try_from(level) {
            Ok(level @ 1..=6) => Ok(Self::heading(content, level)),
            _ => Err(NodeError::InvalidHeadingLevel(level)),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Container(_) => NodeKind::Container,
            Node::Text { .. } => NodeKind::Text,
            Node::Heading { .. } => NodeKind::Heading,
        }
    }

    fn element_ref(&self) -> &Element {
        match self {
            Node::Container(element)
            | Node::Text { element, .. }
            | Node::Heading { element, .. } => element,
        }
    }

    fn element_mut(&mut self) -> &mut Element {
        match self {
            Node::Container(element)
            | Node::Text { element, .. }
            | Node::Heading { element, .. } => element,
        }
    }

    /// Tag emitted in markup. Headings always use `h{level}`.
    pub fn tag_name(&self) -> Cow<'_, str> {
        match self {
            Node::Heading { level, .. } => Cow::Owned(heading_tag(*level)),
            _ => Cow::Borrowed(&self.element_ref().tag),
        }
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.element_ref().children
    }

    pub fn attributes(&self) -> &Attributes {
        &self.element_ref().attributes
    }

    /// Literal content of text and heading nodes
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Container(_) => None,
            Node::Text { content, .. } | Node::Heading { content, .. } => Some(content),
        }
    }

    pub fn level(&self) -> Option<u8> {
        match self {
            Node::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Replace the tag. Headings keep `h{level}`.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        if let Node::Heading { .. } = self {
            return self;
        }
        self.element_mut().tag = tag.into();
        self
    }

    pub fn class_name(self, class: impl Into<String>) -> Self {
        self.attr("class_name", class)
    }

    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute(Attribute::new(name, Some(value.into())))
    }

    /// Attribute that is omitted from output when `value` is `None`
    pub fn attr_opt(self, name: impl Into<String>, value: Option<String>) -> Self {
        self.attribute(Attribute::new(name, value))
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.element_mut().attributes.set(attribute);
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.element_mut().children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.element_mut().children.extend(children);
        self
    }

    /// Render with escaping enabled
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        let mut output = String::new();
        self.render_into(&mut output, options);
        output
    }

    fn render_into(&self, output: &mut String, options: &RenderOptions) {
        let element = self.element_ref();
        let tag = self.tag_name();

        output.push('<');
        output.push_str(&tag);
        for (name, value) in element.attributes.set_pairs() {
            output.push(' ');
            output.push_str(name);
            output.push_str("=\"");
            output.push_str(&options.attribute(value));
            output.push('"');
        }
        output.push('>');

        match self {
            Node::Container(element) => {
                for child in &element.children {
                    child.render_into(output, options);
                }
            }
            Node::Text { content, .. } | Node::Heading { content, .. } => {
                output.push_str(&options.text(content));
            }
        }

        output.push_str("</");
        output.push_str(&tag);
        output.push('>');
    }

    /// Number of nodes in the subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(Node::node_count)
            .sum::<usize>()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
