//! In-memory entity store for the library API.
//!
//! Four ordered collections (users, books, loans, reviews) live in a single
//! [`Library`]. Handlers reach it through a cloneable [`Store`] handle that
//! serializes access, so every request observes and mutates the library as a
//! whole.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

pub mod collection;
pub mod entities;
pub mod error;
pub mod library;

pub use collection::Collection;
pub use entities::{
    Book, BookChanges, Changes, Draft, Loan, LoanChanges, NewBook, NewReview, NewUser, Record,
    RecordKind, Review, ReviewChanges, User, UserChanges,
};
pub use error::StoreError;
pub use library::{Library, NewLoan};

/// Shared handle to the process-wide [`Library`].
#[derive(Clone, Default)]
pub struct Store {
    library: Arc<Mutex<Library>>,
}

impl Store {
    pub fn new(library: Library) -> Self {
        Self {
            library: Arc::new(Mutex::new(library)),
        }
    }

    /// Store pre-filled with the sample catalogue.
    pub fn sample() -> Self {
        Self::new(Library::sample())
    }

    /// Lock the library for the duration of one request.
    pub async fn lock(&self) -> MutexGuard<'_, Library> {
        self.library.lock().await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
