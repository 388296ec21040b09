//! Error types for layout operations.

use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur in layout operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Layer not found in the document.
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    /// Invalid layer operation (e.g. a style edit on an image layer).
    #[error("Invalid operation on layer: {0}")]
    InvalidOperation(String),

    /// A measured size was negative or not finite.
    #[error("Invalid measurement for layer {id}: {width}x{height}")]
    InvalidMeasurement {
        /// Layer the measurement was reported for.
        id: String,
        /// Reported width.
        width: f32,
        /// Reported height.
        height: f32,
    },

    /// A coordinate was NaN or infinite.
    #[error("Non-finite position ({x}, {y})")]
    NonFinitePosition {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },

    /// The document failed save-time validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a document cannot be saved. Shown to the user as a blocking message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The document name is empty or whitespace.
    #[error("Document name is required")]
    EmptyName,

    /// No category was selected.
    #[error("A category must be selected")]
    MissingCategory,

    /// The selected category is not part of the available set.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
