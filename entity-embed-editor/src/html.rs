//! Fragment parsing into a [`Document`] and serialization back to markup.

use crate::document::{Document, NodeId, NodeKind};
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{Html, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parses `html` as a body fragment and appends the result under `parent`.
/// Returns the top-level nodes created. Attributes keep their source order.
/// Comments are dropped.
pub fn parse_fragment(doc: &mut Document, parent: NodeId, html: &str) -> Vec<NodeId> {
    let fragment = Html::parse_fragment(html);
    let mut top_level = Vec::new();
    let mut stack: Vec<_> = fragment
        .root_element()
        .children()
        .rev()
        .map(|child| (child, parent))
        .collect();

    while let Some((node, target)) = stack.pop() {
        let created = match node.value() {
            Node::Element(element) => {
                let attributes = element
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()));
                doc.create_element(element.name(), attributes)
            }
            Node::Text(text) => doc.create_text(&**text),
            _ => continue,
        };
        doc.append_child(target, created);
        if target == parent {
            top_level.push(created);
        }
        stack.extend(node.children().rev().map(|child| (child, created)));
    }
    top_level
}

/// Serializes the children of `id`. Elements for which `downcast` returns
/// true are written as bare shells: no `id` attribute and no content.
pub(crate) fn inner_html(doc: &Document, id: NodeId, downcast: &dyn Fn(NodeId) -> bool) -> String {
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, downcast, &mut out);
    }
    out
}

/// Serializes `id` itself.
pub(crate) fn outer_html(doc: &Document, id: NodeId, downcast: &dyn Fn(NodeId) -> bool) -> String {
    let mut out = String::new();
    write_node(doc, id, downcast, &mut out);
    out
}

pub(crate) fn write_element<'a>(
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a String, &'a String)>,
    content: &str,
    out: &mut String,
) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
    if is_void_element(tag) {
        return;
    }
    out.push_str(content);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_node(doc: &Document, id: NodeId, downcast: &dyn Fn(NodeId) -> bool, out: &mut String) {
    match doc.kind(id) {
        Some(NodeKind::Root) => out.push_str(&inner_html(doc, id, downcast)),
        Some(NodeKind::Text(text)) => out.push_str(&encode_text(text)),
        Some(NodeKind::Html(html)) => out.push_str(html),
        Some(NodeKind::Element(element)) if downcast(id) => {
            let attributes = element.attributes.iter().filter(|(name, _)| *name != "id");
            write_element(&element.tag, attributes, "", out);
        }
        Some(NodeKind::Element(element)) => {
            let content = inner_html(doc, id, downcast);
            write_element(&element.tag, &element.attributes, &content, out);
        }
        None => {}
    }
}
