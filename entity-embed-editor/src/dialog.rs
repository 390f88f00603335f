use async_trait::async_trait;
use entity_embed_model::AttributeMap;
use serde::{Deserialize, Serialize};

/// Presentation options passed to the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSettings {
    pub title: String,
    pub dialog_class: String,
    pub resizable: bool,
    pub min_width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRequest {
    /// `entity-embed/dialog/{format}/{button}`
    pub url: String,
    /// Current marker attributes when editing, empty when inserting.
    pub initial_values: AttributeMap,
    pub settings: DialogSettings,
}

/// What the dialog hands back on confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogValues {
    pub attributes: AttributeMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Saved(DialogValues),
    Cancelled,
}

/// Opens the entity selection dialog and waits for the user.
#[async_trait]
pub trait DialogService: Send + Sync {
    async fn open(&self, request: DialogRequest) -> DialogOutcome;
}
