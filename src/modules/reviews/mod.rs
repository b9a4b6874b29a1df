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
use biblio_store::{Review, ReviewChanges, Store};

use crate::modules::{filter_key, record_id, Deleted};
use crate::utils::openapi;

/// Reviews module
pub struct ReviewsModule {
    store: Store,
}

impl ReviewsModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "resenias"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_reviews).post(create_review))
            .route(
                "/{id}",
                get(get_review).put(update_review).delete(delete_review),
            )
            .route("/libro/{id_libro}", get(reviews_by_book))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": openapi::collection_operations(
                    "Reviews",
                    "Review",
                    "CreateReview",
                    "id_libro e id_usuario son requeridos"
                ),
                "/{id}": openapi::item_operations(
                    "Reviews",
                    "Review",
                    "ReviewChanges",
                    "Reseña no encontrada"
                ),
                "/libro/{id_libro}": {
                    "get": {
                        "summary": "Reviews of a book",
                        "tags": ["Reviews"],
                        "parameters": [openapi::path_param("id_libro", "Book id")],
                        "responses": {
                            "200": openapi::json_response("Matching reviews", openapi::array_of("Review"))
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "id_libro": { "type": "integer" },
                            "id_usuario": { "type": "integer" },
                            "puntuacion": { "type": ["integer", "null"] },
                            "comentario": { "type": "string" }
                        },
                        "required": ["id", "id_libro", "id_usuario", "puntuacion", "comentario"]
                    },
                    "CreateReview": {
                        "type": "object",
                        "properties": {
                            "id_libro": { "type": "integer" },
                            "id_usuario": { "type": "integer" },
                            "puntuacion": { "type": ["integer", "null"] },
                            "comentario": { "type": "string", "default": "" }
                        },
                        "required": ["id_libro", "id_usuario"]
                    },
                    "ReviewChanges": {
                        "type": "object",
                        "properties": {
                            "puntuacion": { "type": ["integer", "null"] },
                            "comentario": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }
}

async fn list_reviews(State(store): State<Store>) -> Json<Vec<Review>> {
    Json(store.lock().await.reviews.all().to_vec())
}

async fn get_review(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let id = record_id::<Review>(&id)?;
    let library = store.lock().await;
    Ok(Json(library.reviews.get(id)?.clone()))
}

async fn reviews_by_book(
    State(store): State<Store>,
    Path(book_id): Path<String>,
) -> Json<Vec<Review>> {
    let Some(book_id) = filter_key(&book_id) else {
        return Json(Vec::new());
    };
    let library = store.lock().await;
    Json(library.reviews_by_book(book_id).cloned().collect())
}

async fn create_review(
    State(store): State<Store>,
    Payload(payload): Payload<models::CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let new_review = payload.validate()?;

    let mut library = store.lock().await;
    let review = library.reviews.insert(new_review).clone();
    tracing::info!(
        review_id = review.id,
        book_id = review.book_id,
        "review created"
    );

    Ok((StatusCode::CREATED, Json(review)))
}

async fn update_review(
    State(store): State<Store>,
    Path(id): Path<String>,
    Payload(changes): Payload<ReviewChanges>,
) -> AppResult<Json<Review>> {
    let id = record_id::<Review>(&id)?;

    let mut library = store.lock().await;
    Ok(Json(library.reviews.update(id, changes)?.clone()))
}

async fn delete_review(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted<Review>>> {
    let id = record_id::<Review>(&id)?;

    let mut library = store.lock().await;
    let review = library.reviews.remove(id)?;
    tracing::info!(review_id = id, "review deleted");

    Ok(Json(Deleted::new(review)))
}

/// Create a new instance of the reviews module
pub fn create_module(store: Store) -> Arc<dyn Module> {
    Arc::new(ReviewsModule::new(store))
}
