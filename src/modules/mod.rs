pub mod books;
pub mod loans;
pub mod reviews;
pub mod users;

use biblio_http::error::{AppError, AppResult};
use biblio_kernel::ModuleRegistry;
use biblio_store::{Record, Store};
use serde::Serialize;

/// Register every resource module with the registry, all sharing `store`
pub fn register_all(registry: &mut ModuleRegistry, store: &Store) -> anyhow::Result<()> {
    registry.register(users::create_module(store.clone()))?;
    registry.register(books::create_module(store.clone()))?;
    registry.register(loans::create_module(store.clone()))?;
    registry.register(reviews::create_module(store.clone()))?;
    Ok(())
}

/// Body returned by every delete endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Deleted<T> {
    pub mensaje: &'static str,
    pub eliminado: T,
}

impl<T> Deleted<T> {
    pub fn new(record: T) -> Self {
        Self {
            mensaje: "Eliminado",
            eliminado: record,
        }
    }
}

/// Parse the id segment of a record path. A non-numeric id can match no
/// record, so it is reported as that record's not-found error.
pub fn record_id<T: Record>(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::not_found(T::KIND.not_found_message()))
}

/// Parse a foreign-key filter; `None` matches nothing.
pub fn filter_key(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// A required text field counts as missing when absent or empty.
pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// A required id counts as missing when absent or zero.
pub(crate) fn required_id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id != 0)
}
