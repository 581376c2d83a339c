/// Error types for model loading
use thiserror::Error;

/// Reasons a model load can fail. Anything not listed here (missing or
/// malformed attributes, unreadable textures) is tolerated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The external parser could not open or parse the document
    #[error("Unable to open {path} - {message}")]
    Open { path: String, message: String },

    /// The document root does not carry the expected tag
    #[error("Document does not contain root tag {expected} (found {found})")]
    MissingRoot { expected: String, found: String },

    /// The document declares a version this loader cannot read
    #[error("XMODL file is not the correct version. Version {required} required (found {found})")]
    Version { required: String, found: String },

    /// A bone names a parent that does not precede it
    #[error("Bone {bone} references parent {parent}, which does not precede it")]
    BoneOrder { bone: usize, parent: usize },
}
