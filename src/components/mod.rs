//! Component tree: nodes, attributes and rendering
//!
//! The free functions below are the short constructors used when building a
//! page in Rust:
//!
//! ```
//! use ihjs::components::{div, heading, text};
//!
//! let page = div()
//!     .class_name("card")
//!     .children(vec![heading("Welcome", 1), text("hello")]);
//!
//! assert_eq!(
//!     page.render(),
//!     r#"<div class="card"><h1>Welcome</h1><span>hello</span></div>"#
//! );
//! ```

pub mod attributes;
pub mod node;

pub use attributes::{attribute_name_error, wire_name, Attribute, Attributes};
pub use node::{is_valid_tag_name, Element, Node, NodeKind, RenderOptions};

/// `div` container
pub fn div() -> Node {
    Node::container()
}

/// `span` text node
pub fn text(content: impl Into<String>) -> Node {
    Node::text(content)
}

/// `h{level}` heading, level clamped into 1..=6
pub fn heading(content: impl Into<String>, level: u8) -> Node {
    Node::heading(content, level)
}
