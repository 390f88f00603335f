//! Rendering endpoint for embed previews.
//!
//! [`PreviewService`] turns a serialized `<drupal-entity>` marker into
//! markup: it validates the marker, loads the referenced entity, checks that
//! the requested display plugin applies to it, and renders it. The HTTP
//! surface is built with [`build_router`].

mod api;
mod config;
mod error;
mod service;

pub use api::{PreviewQuery, build_router};
pub use config::{ServerConfig, TextFormat};
pub use error::{ConfigError, PreviewError};
pub use service::{EmbedRenderRequest, PREVIEW_LIBRARY, PreviewService};
