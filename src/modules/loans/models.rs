use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use biblio_http::error::{AppError, AppResult};
use biblio_store::NewLoan;

use crate::modules::required_id;

/// Request model for lending a book.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLoan {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "id_usuario")]
    pub user_id: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "id_libro")]
    pub book_id: Option<i64>,
    /// Defaults to today when omitted
    #[serde(rename = "fecha_prestamo")]
    pub loan_date: Option<String>,
    #[serde(rename = "fecha_devolucion")]
    pub return_date: Option<String>,
}

impl CreateLoan {
    pub fn validate(self) -> AppResult<NewLoan> {
        match (required_id(self.user_id), required_id(self.book_id)) {
            (Some(user_id), Some(book_id)) => Ok(NewLoan {
                user_id,
                book_id,
                loan_date: self.loan_date,
                return_date: self.return_date,
            }),
            _ => Err(AppError::validation("id_usuario e id_libro son requeridos")),
        }
    }
}
