use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use biblio_http::error::{AppError, AppResult};
use biblio_store::NewBook;

use crate::modules::required_text;

/// Request model for creating a new book.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    /// Title of the book
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    /// Author of the book
    #[serde(rename = "autor")]
    pub author: Option<String>,
    /// Copies on the shelf, `0` when omitted
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "existencia")]
    pub stock: Option<i64>,
}

impl CreateBook {
    pub fn validate(self) -> AppResult<NewBook> {
        match (required_text(self.title), required_text(self.author)) {
            (Some(title), Some(author)) => Ok(NewBook {
                title,
                author,
                stock: self.stock.unwrap_or(0),
            }),
            _ => Err(AppError::validation("titulo y autor son requeridos")),
        }
    }
}

/// Request model for overwriting a book's stock. An explicit `null` counts
/// as missing; it never resets the stock to zero.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetStock {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "existencia")]
    pub stock: Option<i64>,
}

impl SetStock {
    pub fn validate(self) -> AppResult<i64> {
        self.stock
            .ok_or_else(|| AppError::validation("existencia es requerida"))
    }
}
