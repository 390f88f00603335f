//! Editor-side controller for embedded entity markers.
//!
//! [`EmbedEditor`] owns a small element tree ([`Document`]) and turns
//! `<drupal-entity>` markers in it into widgets: each recognized marker gets a
//! session-unique preview id, a rendered preview fetched through a
//! [`PreviewEndpoint`], and create/edit handling through a [`DialogService`].
//!
//! Document mutations are synchronous. Preview fetches run as spawned tasks
//! and report back through a completion channel that the editor drains with
//! [`EmbedEditor::next_completion`] or [`EmbedEditor::pump_completions`].

mod behaviors;
mod config;
mod controller;
mod dialog;
mod document;
mod error;
mod html;
mod preview;
mod preview_id;
mod widget;

pub use behaviors::{EmbedBehaviors, NoopBehaviors};
pub use config::{EditorConfig, EmbedButton};
pub use controller::{ContextMenuItem, EDIT_COMMAND, EmbedEditor};
pub use dialog::{DialogOutcome, DialogRequest, DialogService, DialogSettings, DialogValues};
pub use document::{Cursor, Document, ElementAttributes, ElementData, NodeId, NodeKind};
pub use error::EditorError;
pub use html::{is_void_element, parse_fragment};
pub use preview::{HttpPreviewEndpoint, PreviewCompletion, PreviewEndpoint, PreviewRequest};
pub use preview_id::{PREVIEW_ID_PREFIX, PreviewIdGenerator};
pub use widget::{ElementShell, PreviewState, WidgetInstance};
