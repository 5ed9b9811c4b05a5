use thiserror::Error;

/// Input rejected before any store call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title or content is required")]
    MissingTitleOrContent,
    #[error("Tag cannot be empty")]
    EmptyTag,
    #[error("Tag already present on this entry: {0}")]
    DuplicateTag(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Email and password are required")]
    MissingCredentials,
}
