//! Error types for object tree operations.

use crate::obj::ObjId;
use std::fmt;

/// Errors that can occur while building or mutating the object tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// The object arena is full. Nothing was created.
    AllocationExhausted {
        /// Configured object limit.
        capacity: usize,
    },

    /// The handle refers to an object that was destroyed.
    InvalidHandle {
        /// The stale handle.
        id: ObjId,
    },

    /// The operation needs a different object kind.
    WrongKind {
        /// The object the operation was applied to.
        id: ObjId,
        /// Kind the operation expects.
        expected: &'static str,
    },

    /// A pixel table failed validation.
    InvalidImage {
        /// What was wrong with it.
        reason: String,
    },

    /// The layout engine rejected an operation.
    Layout {
        /// Layout engine message.
        message: String,
    },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::AllocationExhausted { capacity } => {
                write!(f, "Object storage exhausted ({} objects)", capacity)
            }
            UiError::InvalidHandle { id } => {
                write!(f, "Invalid object handle: {}", id)
            }
            UiError::WrongKind { id, expected } => {
                write!(f, "Object {} is not a {}", id, expected)
            }
            UiError::InvalidImage { reason } => {
                write!(f, "Invalid image data: {}", reason)
            }
            UiError::Layout { message } => {
                write!(f, "Layout error: {}", message)
            }
        }
    }
}

impl std::error::Error for UiError {}

impl From<taffy::TaffyError> for UiError {
    fn from(err: taffy::TaffyError) -> Self {
        UiError::Layout {
            message: err.to_string(),
        }
    }
}

/// Result type alias for object tree operations.
pub type UiResult<T> = Result<T, UiError>;

/// Failure of [`Ui::render`](crate::Ui::render).
#[derive(Debug)]
pub enum RenderError<E> {
    /// Layout could not be brought up to date.
    Layout(UiError),
    /// The draw target reported an error.
    Draw(E),
}

impl<E: fmt::Debug> fmt::Display for RenderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Layout(err) => write!(f, "Render failed: {}", err),
            RenderError::Draw(err) => write!(f, "Draw target error: {:?}", err),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for RenderError<E> {}

impl<E> From<UiError> for RenderError<E> {
    fn from(err: UiError) -> Self {
        RenderError::Layout(err)
    }
}
