use serde::{Deserialize, Serialize};

/// Body of a rendering endpoint response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// Markup fragment spliced into the marker.
    pub html: String,
    #[serde(default, skip_serializing_if = "PreviewAttachments::is_empty")]
    pub attachments: PreviewAttachments,
}

impl PreviewResponse {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            attachments: PreviewAttachments::default(),
        }
    }
}

/// Out-of-band assets a rendered fragment needs (script/style libraries and
/// client settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewAttachments {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl PreviewAttachments {
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.settings.is_empty()
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.add_library(library);
        self
    }

    /// Adds a library once; later duplicates are ignored.
    pub fn add_library(&mut self, library: impl Into<String>) {
        let library = library.into();
        if !self.libraries.contains(&library) {
            self.libraries.push(library);
        }
    }

    /// Merges `other` into `self`. Settings from `other` overwrite on key
    /// collision.
    pub fn merge(&mut self, other: PreviewAttachments) {
        for library in other.libraries {
            self.add_library(library);
        }
        self.settings.extend(other.settings);
    }
}
