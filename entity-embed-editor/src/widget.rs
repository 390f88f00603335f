use crate::document::NodeId;
use crate::html::write_element;
use entity_embed_model::{AttributeMap, EmbedAttributes};

/// Preview lifecycle of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// Fetch issued, no answer yet. The marker shows no content.
    Pending,
    /// The response body has been spliced in.
    Rendered,
    /// The fetch failed or could not start.
    Empty,
}

/// A recognized marker.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInstance {
    pub node: NodeId,
    /// Transient id written to the element's `id` attribute.
    pub preview_id: String,
    pub attributes: EmbedAttributes,
    pub state: PreviewState,
}

impl WidgetInstance {
    pub fn is_editable(&self) -> bool {
        self.attributes.is_editable()
    }
}

/// The persisted form of a marker: tag and attributes, no generated id and
/// no rendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementShell {
    pub tag: String,
    pub attributes: AttributeMap,
}

impl ElementShell {
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_element(&self.tag, &self.attributes, "", &mut out);
        out
    }
}
