use serde::Deserialize;

use biblio_http::error::{AppError, AppResult};
use biblio_store::NewUser;

use crate::modules::required_text;

/// Request model for creating a new user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CreateUser {
    /// Both `nombre` and `email` are required and must be non-empty.
    pub fn validate(self) -> AppResult<NewUser> {
        match (required_text(self.name), required_text(self.email)) {
            (Some(name), Some(email)) => Ok(NewUser { name, email }),
            _ => Err(AppError::validation("nombre y email son requeridos")),
        }
    }
}
