//! Arena-backed element tree the controller edits.
//!
//! Nodes are never freed: removing a node detaches it from its parent and
//! leaves it in the arena, so stale [`NodeId`]s stay valid to query but
//! report [`Document::is_attached`] as false.

use indexmap::IndexMap;

/// Attributes of an element, in source order.
pub type ElementAttributes = IndexMap<String, String>;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: ElementAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(ElementData),
    Text(String),
    /// Markup kept as an opaque string (rendered previews).
    Html(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Insertion point: before the child at `index` of `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub parent: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    selection: Option<NodeId>,
    cursor: Option<Cursor>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            selection: None,
            cursor: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    // ── Queries ──────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The nearest node, starting at `id` and walking up, that matches.
    pub fn closest(&self, id: NodeId, mut matches: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if matches(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// All nodes below `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    // ── Construction ─────────────────────────────────────────────

    /// Creates a detached element. Attributes keep the order given.
    pub fn create_element(
        &mut self,
        tag: impl Into<String>,
        attributes: impl IntoIterator<Item = (String, String)>,
    ) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.into(),
            attributes: attributes.into_iter().collect(),
        }))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Sets an attribute. An existing attribute keeps its position; a new
    /// one goes last.
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.insert(name.into(), value.into());
        }
    }

    // ── Tree mutation ────────────────────────────────────────────

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` of `parent`, moving it from any previous
    /// position. Out-of-range indices append.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if child == self.root() || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // No cycles.
        if self.closest(parent, |n| n == child).is_some() {
            return;
        }
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        if let Some(cursor) = &mut self.cursor {
            if cursor.parent == parent && cursor.index > index {
                cursor.index += 1;
            }
        }
    }

    /// Removes `id` from its parent. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let children = &mut self.nodes[parent.0].children;
        let Some(index) = children.iter().position(|&c| c == id) else {
            return;
        };
        children.remove(index);
        self.nodes[id.0].parent = None;

        if let Some(cursor) = &mut self.cursor {
            if cursor.parent == parent && cursor.index > index {
                cursor.index -= 1;
            }
        }
        if self.selection.is_some_and(|s| self.closest(s, |n| n == id).is_some()) {
            self.selection = None;
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.detach(child);
        }
    }

    /// Replaces the content of `id` with an opaque markup string.
    pub fn set_inner_html(&mut self, id: NodeId, html: impl Into<String>) {
        self.clear_children(id);
        let html = html.into();
        if !html.is_empty() {
            let node = self.push(NodeKind::Html(html));
            self.append_child(id, node);
        }
    }

    // ── Selection ────────────────────────────────────────────────

    /// Selects `id` and places the cursor just before it.
    pub fn select(&mut self, id: NodeId) {
        self.selection = Some(id);
        if let Some(parent) = self.parent(id) {
            let index = self.children(parent).iter().position(|&c| c == id).unwrap_or(0);
            self.cursor = Some(Cursor { parent, index });
        }
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// The insertion point; the end of the document when unset or when it
    /// points into a detached subtree.
    pub fn cursor(&self) -> Cursor {
        match self.cursor {
            Some(cursor) if self.is_attached(cursor.parent) => cursor,
            _ => Cursor {
                parent: self.root(),
                index: self.children(self.root()).len(),
            },
        }
    }

    /// Inserts `node` at the cursor and moves the cursor after it.
    pub fn insert_at_cursor(&mut self, node: NodeId) {
        let cursor = self.cursor();
        self.insert_child(cursor.parent, cursor.index, node);
        let index = self
            .children(cursor.parent)
            .iter()
            .position(|&c| c == node)
            .map_or(cursor.index, |i| i + 1);
        self.cursor = Some(Cursor {
            parent: cursor.parent,
            index,
        });
    }
}
