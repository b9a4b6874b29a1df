use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use biblio_http::error::{AppError, AppResult};
use biblio_store::NewReview;

use crate::modules::required_id;

/// Request model for reviewing a book.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReview {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "id_libro")]
    pub book_id: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "id_usuario")]
    pub user_id: Option<i64>,
    #[serde(rename = "puntuacion")]
    pub rating: Option<i64>,
    #[serde(rename = "comentario")]
    pub comment: Option<String>,
}

impl CreateReview {
    pub fn validate(self) -> AppResult<NewReview> {
        match (required_id(self.book_id), required_id(self.user_id)) {
            (Some(book_id), Some(user_id)) => Ok(NewReview {
                book_id,
                user_id,
                rating: self.rating,
                comment: self.comment.unwrap_or_default(),
            }),
            _ => Err(AppError::validation("id_libro e id_usuario son requeridos")),
        }
    }
}
