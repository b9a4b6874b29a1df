use thiserror::Error;

use crate::entities::RecordKind;

/// Failures raised by store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{}", .0.not_found_message())]
    NotFound(RecordKind),

    /// A loan was requested for a book whose stock is exhausted.
    #[error("Libro no disponible")]
    BookUnavailable { book_id: i64 },
}
