#![allow(dead_code)]

use async_trait::async_trait;
use entity_embed_editor::{
    DialogOutcome, DialogRequest, DialogService, DialogValues, EditorConfig, EditorError,
    EmbedBehaviors, EmbedButton, EmbedEditor, PreviewEndpoint, PreviewRequest,
};
use entity_embed_model::{AttributeMap, PreviewAttachments, PreviewResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Attributes are in name order so serialized output matches byte for byte.
pub const NODE_MARKER: &str = r#"<drupal-entity data-embed-button="node" data-entity-embed-display="entity_reference:entity_reference_label" data-entity-label="Node" data-entity-type="node" data-entity-uuid="abc"></drupal-entity>"#;

pub const PLAIN_MARKER: &str = r#"<drupal-entity data-entity-id="1" data-entity-type="node" data-view-mode="teaser"></drupal-entity>"#;

pub fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Preview endpoints ────────────────────────────────────────────

/// Answers every request with the same fragment and records requests.
#[derive(Default)]
pub struct StaticEndpoint {
    pub html: String,
    pub requests: Mutex<Vec<PreviewRequest>>,
}

impl StaticEndpoint {
    pub fn new(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: html.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<PreviewRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreviewEndpoint for StaticEndpoint {
    async fn fetch(&self, request: PreviewRequest) -> Result<PreviewResponse, EditorError> {
        self.requests.lock().unwrap().push(request);
        Ok(PreviewResponse {
            html: self.html.clone(),
            attachments: PreviewAttachments::default().with_library("entity_embed/preview"),
        })
    }
}

pub struct FailingEndpoint;

#[async_trait]
impl PreviewEndpoint for FailingEndpoint {
    async fn fetch(&self, _request: PreviewRequest) -> Result<PreviewResponse, EditorError> {
        Err(EditorError::Status {
            status: 500,
            body: "boom".into(),
        })
    }
}

/// Never answers.
pub struct PendingEndpoint;

#[async_trait]
impl PreviewEndpoint for PendingEndpoint {
    async fn fetch(&self, _request: PreviewRequest) -> Result<PreviewResponse, EditorError> {
        std::future::pending().await
    }
}

// ── Dialog ───────────────────────────────────────────────────────

/// Plays back queued outcomes; cancels once the queue is empty.
#[derive(Default)]
pub struct ScriptedDialog {
    outcomes: Mutex<VecDeque<DialogOutcome>>,
    pub requests: Mutex<Vec<DialogRequest>>,
}

impl ScriptedDialog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saving(attributes: AttributeMap) -> Arc<Self> {
        let dialog = Self::default();
        dialog
            .outcomes
            .lock()
            .unwrap()
            .push_back(DialogOutcome::Saved(DialogValues { attributes }));
        Arc::new(dialog)
    }

    pub fn requests(&self) -> Vec<DialogRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogService for ScriptedDialog {
    async fn open(&self, request: DialogRequest) -> DialogOutcome {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DialogOutcome::Cancelled)
    }
}

// ── Behaviors ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingBehaviors {
    pub attached: Mutex<Vec<(String, PreviewAttachments)>>,
    pub detached: Mutex<Vec<String>>,
}

impl EmbedBehaviors for RecordingBehaviors {
    fn attach(&self, preview_id: &str, attachments: &PreviewAttachments) {
        self.attached
            .lock()
            .unwrap()
            .push((preview_id.to_string(), attachments.clone()));
    }

    fn detach(&self, preview_id: &str) {
        self.detached.lock().unwrap().push(preview_id.to_string());
    }
}

pub fn config() -> EditorConfig {
    EditorConfig::new("full_html")
        .with_button(EmbedButton::new("node", "Node"))
        .with_button(EmbedButton::new("user", "User"))
}

pub fn editor(endpoint: Arc<dyn PreviewEndpoint>, dialog: Arc<dyn DialogService>) -> EmbedEditor {
    EmbedEditor::new(config(), endpoint, dialog)
}
