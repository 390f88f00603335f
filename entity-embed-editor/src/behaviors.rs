use entity_embed_model::PreviewAttachments;

/// Host hooks run when preview content enters or leaves the document.
pub trait EmbedBehaviors: Send + Sync {
    /// A preview was spliced into the widget `preview_id`.
    fn attach(&self, preview_id: &str, attachments: &PreviewAttachments);

    /// The widget `preview_id` is being superseded or removed.
    fn detach(&self, preview_id: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBehaviors;

impl EmbedBehaviors for NoopBehaviors {
    fn attach(&self, _preview_id: &str, _attachments: &PreviewAttachments) {}

    fn detach(&self, _preview_id: &str) {}
}
