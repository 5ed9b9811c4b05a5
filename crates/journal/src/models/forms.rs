use serde::Deserialize;

/// Body of `POST /api/entries/{id}/tags`.
#[derive(Debug, Deserialize)]
pub struct TagForm {
    #[serde(default)]
    pub tag: String,
}
