//! The embed widget controller.

use crate::behaviors::{EmbedBehaviors, NoopBehaviors};
use crate::config::{EditorConfig, EmbedButton};
use crate::dialog::{DialogOutcome, DialogRequest, DialogService, DialogSettings, DialogValues};
use crate::document::{Document, ElementData, NodeId};
use crate::error::EditorError;
use crate::html;
use crate::preview::{PreviewCompletion, PreviewEndpoint, PreviewRequest};
use crate::preview_id::PreviewIdGenerator;
use crate::widget::{ElementShell, PreviewState, WidgetInstance};
use entity_embed_model::{
    ATTR_EMBED_BUTTON, ATTR_ENTITY_LABEL, AttributeMap, EmbedAttributes, MARKER_TAG,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Name of the create/edit command.
pub const EDIT_COMMAND: &str = "editdrupalentity";

const ID_ATTRIBUTE: &str = "id";
const CONTEXT_MENU_LABEL: &str = "Edit Entity";
const DIALOG_CLASS: &str = "entity-select-dialog";
const DIALOG_MIN_WIDTH: u32 = 800;

/// Attributes of `element` as persisted: everything but the preview id.
fn persisted_attributes(element: &ElementData) -> AttributeMap {
    element
        .attributes
        .iter()
        .filter(|(name, _)| *name != ID_ATTRIBUTE)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Context menu entry offered for an editable marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuItem {
    pub label: String,
    pub command: String,
    pub target: NodeId,
}

/// Recognizes, previews and edits embed markers in one editing session.
pub struct EmbedEditor {
    config: EditorConfig,
    document: Document,
    ids: PreviewIdGenerator,
    widgets: BTreeMap<NodeId, WidgetInstance>,
    fetches: HashMap<NodeId, JoinHandle<()>>,
    endpoint: Arc<dyn PreviewEndpoint>,
    dialogs: Arc<dyn DialogService>,
    behaviors: Arc<dyn EmbedBehaviors>,
    completions_tx: UnboundedSender<PreviewCompletion>,
    completions_rx: UnboundedReceiver<PreviewCompletion>,
}

impl EmbedEditor {
    pub fn new(
        config: EditorConfig,
        endpoint: Arc<dyn PreviewEndpoint>,
        dialogs: Arc<dyn DialogService>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            config,
            document: Document::new(),
            ids: PreviewIdGenerator::new(),
            widgets: BTreeMap::new(),
            fetches: HashMap::new(),
            endpoint,
            dialogs,
            behaviors: Arc::new(NoopBehaviors),
            completions_tx,
            completions_rx,
        }
    }

    #[must_use]
    pub fn with_behaviors(mut self, behaviors: Arc<dyn EmbedBehaviors>) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.widgets.contains_key(&node) && self.document.is_attached(node)
    }

    /// The widget of `node`, while its element is in the document.
    pub fn widget(&self, node: NodeId) -> Option<&WidgetInstance> {
        self.widgets
            .get(&node)
            .filter(|_| self.document.is_attached(node))
    }

    /// Widgets whose elements are in the document.
    pub fn widgets(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.widgets
            .values()
            .filter(|w| self.document.is_attached(w.node))
    }

    /// The innermost widget containing `node`, if any.
    pub fn widget_at(&self, node: NodeId) -> Option<NodeId> {
        self.document.closest(node, |n| self.is_live(n))
    }

    /// Destroys widgets whose elements have left the document: their
    /// behaviors are detached and pending fetches cancelled. Returns how
    /// many were destroyed.
    pub fn prune_detached(&mut self) -> usize {
        let stale: Vec<NodeId> = self
            .widgets
            .keys()
            .copied()
            .filter(|&node| !self.document.is_attached(node))
            .collect();
        for &node in &stale {
            self.release(node);
        }
        stale.len()
    }

    fn release(&mut self, node: NodeId) -> Option<WidgetInstance> {
        let widget = self.widgets.remove(&node)?;
        self.behaviors.detach(&widget.preview_id);
        if let Some(handle) = self.fetches.remove(&node) {
            handle.abort();
        }
        debug!(preview_id = %widget.preview_id, "Widget destroyed");
        Some(widget)
    }

    fn selected_widget(&self) -> Option<NodeId> {
        self.document.selection().and_then(|s| self.widget_at(s))
    }

    // ── Recognition and preview ──────────────────────────────────

    /// Claims `node` as a widget if it is an unclaimed `drupal-entity`
    /// element with the required attributes, and assigns its preview id.
    pub fn recognize(&mut self, node: NodeId) -> Option<&WidgetInstance> {
        if self.widgets.contains_key(&node) {
            return None;
        }
        let element = self.document.element(node)?;
        if element.tag != MARKER_TAG {
            return None;
        }
        let raw = persisted_attributes(element);
        if !EmbedAttributes::is_marker(&raw) {
            trace!(?node, "Element lacks marker attributes, leaving as content");
            return None;
        }
        let attributes = EmbedAttributes::from_attributes(&raw).ok()?;

        let preview_id = self.ids.next_id();
        self.document
            .set_attribute(node, ID_ATTRIBUTE, preview_id.clone());
        debug!(%preview_id, entity_type = %attributes.entity_type, "Marker recognized");
        self.widgets.insert(
            node,
            WidgetInstance {
                node,
                preview_id,
                attributes,
                state: PreviewState::Pending,
            },
        );
        self.widgets.get(&node)
    }

    /// Starts the preview fetch for a recognized widget. Returns false if
    /// `node` is no widget or no fetch could be started.
    pub fn initialize(&mut self, node: NodeId) -> bool {
        let Some(shell) = self.serialize(node) else {
            return false;
        };
        let Some(widget) = self.widgets.get_mut(&node) else {
            return false;
        };
        let request = PreviewRequest {
            format: self.config.format.clone(),
            value: shell.outer_html(),
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(
                    preview_id = %widget.preview_id,
                    error = %EditorError::NoRuntime,
                    "Preview fetch not started"
                );
                widget.state = PreviewState::Empty;
                return false;
            }
        };

        widget.state = PreviewState::Pending;
        let preview_id = widget.preview_id.clone();
        let endpoint = Arc::clone(&self.endpoint);
        let tx = self.completions_tx.clone();
        let handle = runtime.spawn(async move {
            let result = endpoint.fetch(request).await;
            // The editor may have been dropped meanwhile.
            let _ = tx.send(PreviewCompletion {
                node,
                preview_id,
                result,
            });
        });
        if let Some(previous) = self.fetches.insert(node, handle) {
            previous.abort();
        }
        true
    }

    /// Applies a finished fetch. Completions for widgets that were removed,
    /// replaced, or detached from the document are dropped.
    pub fn apply_completion(&mut self, completion: PreviewCompletion) -> bool {
        let PreviewCompletion {
            node,
            preview_id,
            result,
        } = completion;

        let current = self
            .widgets
            .get(&node)
            .is_some_and(|w| w.preview_id == preview_id);
        if !current {
            debug!(%preview_id, "Discarding stale preview");
            return false;
        }
        if !self.document.is_attached(node) {
            debug!(%preview_id, "Discarding preview for removed marker");
            self.release(node);
            return false;
        }
        self.fetches.remove(&node);

        let state = match result {
            Ok(response) => {
                self.document.set_inner_html(node, response.html);
                self.behaviors.attach(&preview_id, &response.attachments);
                PreviewState::Rendered
            }
            Err(error) => {
                warn!(%preview_id, %error, "Preview fetch failed");
                self.document.clear_children(node);
                PreviewState::Empty
            }
        };
        if let Some(widget) = self.widgets.get_mut(&node) {
            widget.state = state;
        }
        true
    }

    /// Waits for the next fetch to finish and applies it.
    pub async fn next_completion(&mut self) -> Option<bool> {
        let completion = self.completions_rx.recv().await?;
        self.prune_detached();
        Some(self.apply_completion(completion))
    }

    /// Applies every completion already waiting. Returns how many changed
    /// the document.
    pub fn pump_completions(&mut self) -> usize {
        self.prune_detached();
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    // ── Serialization ────────────────────────────────────────────

    /// The persisted form of a widget: attributes without the preview id,
    /// no rendered content.
    pub fn serialize(&self, node: NodeId) -> Option<ElementShell> {
        if !self.widgets.contains_key(&node) {
            return None;
        }
        let element = self.document.element(node)?;
        Some(ElementShell {
            tag: element.tag.clone(),
            attributes: persisted_attributes(element),
        })
    }

    /// Replaces the document with `html`, then recognizes every marker in
    /// it and starts its preview. Returns the widget nodes in document order.
    pub fn load_html(&mut self, html: &str) -> Vec<NodeId> {
        self.reset();
        let root = self.document.root();
        html::parse_fragment(&mut self.document, root, html);

        let mut recognized = Vec::new();
        for node in self.document.descendants(root) {
            if self.recognize(node).is_some() {
                self.initialize(node);
                recognized.push(node);
            }
        }
        info!(markers = recognized.len(), "Loaded document");
        recognized
    }

    /// The document as persisted HTML: markers are written as bare shells.
    pub fn get_data(&self) -> String {
        html::inner_html(&self.document, self.document.root(), &|n: NodeId| {
            self.widgets.contains_key(&n)
        })
    }

    /// Live markup of `node`, preview id and rendered content included.
    pub fn outer_html(&self, node: NodeId) -> String {
        html::outer_html(&self.document, node, &|_: NodeId| false)
    }

    fn reset(&mut self) {
        for (_, widget) in std::mem::take(&mut self.widgets) {
            self.behaviors.detach(&widget.preview_id);
        }
        for (_, handle) in self.fetches.drain() {
            handle.abort();
        }
        self.document = Document::new();
    }

    // ── Commands ─────────────────────────────────────────────────

    pub fn toolbar_buttons(&self) -> &[EmbedButton] {
        &self.config.buttons
    }

    /// Runs the create/edit command with the data of toolbar button `id`.
    pub async fn click_button(&mut self, id: &str) -> Result<Option<NodeId>, EditorError> {
        let button = self
            .config
            .button(id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownButton(id.to_string()))?;
        self.exec_create_or_edit(Some(button)).await
    }

    /// Opens the embed dialog for the selected marker, or for a new one.
    ///
    /// Button data, when given, takes precedence over the marker's own
    /// label and button id. On save a new marker is built from the returned
    /// attributes and inserted at the cursor; an edited marker is removed.
    /// Returns the new node, or `None` if the dialog was cancelled.
    pub async fn exec_create_or_edit(
        &mut self,
        button: Option<EmbedButton>,
    ) -> Result<Option<NodeId>, EditorError> {
        self.prune_detached();
        let existing = self.selected_widget();
        let initial_values = existing
            .and_then(|node| self.serialize(node))
            .map(|shell| shell.attributes)
            .unwrap_or_default();

        let label = button
            .as_ref()
            .map(|b| b.label.clone())
            .or_else(|| initial_values.get(ATTR_ENTITY_LABEL).cloned())
            .unwrap_or_default();
        let button_id = button
            .as_ref()
            .map(|b| b.id.clone())
            .or_else(|| initial_values.get(ATTR_EMBED_BUTTON).cloned())
            .ok_or(EditorError::MissingButton)?;

        let title = match existing {
            Some(_) => format!("Edit {label}"),
            None => format!("Insert {label}"),
        };
        let request = DialogRequest {
            url: format!("entity-embed/dialog/{}/{}", self.config.format, button_id),
            initial_values,
            settings: DialogSettings {
                title,
                dialog_class: DIALOG_CLASS.to_string(),
                resizable: false,
                min_width: DIALOG_MIN_WIDTH,
            },
        };

        let dialogs = Arc::clone(&self.dialogs);
        match dialogs.open(request).await {
            DialogOutcome::Saved(values) => Ok(Some(self.save(existing, values))),
            DialogOutcome::Cancelled => {
                debug!(button = %button_id, "Embed dialog cancelled");
                Ok(None)
            }
        }
    }

    fn save(&mut self, existing: Option<NodeId>, values: DialogValues) -> NodeId {
        let node = self.document.create_element(MARKER_TAG, values.attributes);
        if let Some(old) = existing {
            self.document.select(old);
        }
        self.document.insert_at_cursor(node);
        if let Some(old) = existing {
            self.remove_widget(old);
        }
        if self.recognize(node).is_some() {
            self.initialize(node);
        }
        node
    }

    /// Removes a widget and its element. Its behaviors are detached and any
    /// pending fetch is cancelled.
    pub fn remove_widget(&mut self, node: NodeId) -> bool {
        if self.release(node).is_none() {
            return false;
        }
        self.document.detach(node);
        true
    }

    fn editable_marker(&self, target: NodeId) -> Option<NodeId> {
        let marker = self
            .widget_at(target)
            .or_else(|| self.selected_widget())?;
        self.widgets
            .get(&marker)
            .is_some_and(WidgetInstance::is_editable)
            .then_some(marker)
    }

    /// Double-click at `target`. Runs the edit command only for a marker
    /// carrying `data-embed-button`; returns whether it ran.
    pub async fn on_double_click(&mut self, target: NodeId) -> Result<bool, EditorError> {
        let Some(marker) = self.editable_marker(target) else {
            return Ok(false);
        };
        self.document.select(marker);
        self.exec_create_or_edit(None).await?;
        Ok(true)
    }

    /// The context menu entry for `target`, offered only for editable
    /// markers.
    pub fn context_menu_item(&self, target: NodeId) -> Option<ContextMenuItem> {
        self.editable_marker(target).map(|marker| ContextMenuItem {
            label: CONTEXT_MENU_LABEL.to_string(),
            command: EDIT_COMMAND.to_string(),
            target: marker,
        })
    }

    /// Attributes of the marker element `node`, without the preview id.
    pub fn marker_attributes(&self, node: NodeId) -> Option<AttributeMap> {
        self.serialize(node).map(|shell| shell.attributes)
    }
}

impl Drop for EmbedEditor {
    fn drop(&mut self) {
        for (_, handle) in self.fetches.drain() {
            handle.abort();
        }
    }
}
