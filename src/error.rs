use crate::class::ClassId;
use thiserror::Error;

/// Errors that can occur when recovering a typed value from an [`Any`](crate::Any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnyError {
    /// The requested family is not the family that was stored
    #[error("Type mismatch: requested {requested}, stored {stored}")]
    TypeMismatch {
        /// Family the caller asked for
        requested: ClassId,
        /// Family captured at storage time
        stored: ClassId,
    },
}
