pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use biblio_http::{error::AppResult, extract::Payload};
use biblio_kernel::{InitCtx, Module};
use biblio_store::{Store, User, UserChanges};

use crate::modules::{record_id, Deleted};
use crate::utils::openapi;

/// Users module: CRUD over the library's registered readers
pub struct UsersModule {
    store: Store,
}

impl UsersModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "usuarios"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let users = ctx.store.lock().await.users.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            users,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route(
                "/{id}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": openapi::collection_operations(
                    "Users",
                    "User",
                    "CreateUser",
                    "nombre y email son requeridos"
                ),
                "/{id}": openapi::item_operations(
                    "Users",
                    "User",
                    "UserChanges",
                    "Usuario no encontrado"
                )
            },
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "nombre": { "type": "string" },
                            "email": { "type": "string" }
                        },
                        "required": ["id", "nombre", "email"]
                    },
                    "CreateUser": {
                        "type": "object",
                        "properties": {
                            "nombre": { "type": "string" },
                            "email": { "type": "string" }
                        },
                        "required": ["nombre", "email"]
                    },
                    "UserChanges": {
                        "type": "object",
                        "properties": {
                            "nombre": { "type": "string" },
                            "email": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }
}

async fn list_users(State(store): State<Store>) -> Json<Vec<User>> {
    Json(store.lock().await.users.all().to_vec())
}

async fn get_user(State(store): State<Store>, Path(id): Path<String>) -> AppResult<Json<User>> {
    let id = record_id::<User>(&id)?;
    let library = store.lock().await;
    Ok(Json(library.users.get(id)?.clone()))
}

async fn create_user(
    State(store): State<Store>,
    Payload(payload): Payload<models::CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let new_user = payload.validate()?;

    let mut library = store.lock().await;
    let user = library.users.insert(new_user).clone();
    tracing::info!(user_id = user.id, "user created");

    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(store): State<Store>,
    Path(id): Path<String>,
    Payload(changes): Payload<UserChanges>,
) -> AppResult<Json<User>> {
    let id = record_id::<User>(&id)?;

    let mut library = store.lock().await;
    let user = library.users.update(id, changes)?.clone();
    tracing::info!(user_id = id, "user updated");

    Ok(Json(user))
}

async fn delete_user(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted<User>>> {
    let id = record_id::<User>(&id)?;

    let mut library = store.lock().await;
    let user = library.users.remove(id)?;
    tracing::info!(user_id = id, "user deleted");

    Ok(Json(Deleted::new(user)))
}

/// Create a new instance of the users module
pub fn create_module(store: Store) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(store))
}
