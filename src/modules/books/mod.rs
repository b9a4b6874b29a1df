pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use biblio_http::{error::AppResult, extract::Payload};
use biblio_kernel::{InitCtx, Module};
use biblio_store::{Book, BookChanges, Store};

use crate::modules::{record_id, Deleted};
use crate::utils::openapi;

/// Books module: the catalogue and its stock counts
pub struct BooksModule {
    store: Store,
}

impl BooksModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "libros"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let library = ctx.store.lock().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = library.books.len(),
            available = library.available_books().count(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/disponibles", get(available_books))
            .route(
                "/{id}",
                get(get_book).put(update_book).delete(delete_book),
            )
            .route("/{id}/existencia", put(set_stock))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": openapi::collection_operations(
                    "Books",
                    "Book",
                    "CreateBook",
                    "titulo y autor son requeridos"
                ),
                "/disponibles": {
                    "get": {
                        "summary": "List books with stock left",
                        "tags": ["Books"],
                        "responses": {
                            "200": openapi::json_response(
                                "Books whose existencia is above zero",
                                openapi::array_of("Book")
                            )
                        }
                    }
                },
                "/{id}": openapi::item_operations(
                    "Books",
                    "Book",
                    "BookChanges",
                    "Libro no encontrado"
                ),
                "/{id}/existencia": {
                    "put": {
                        "summary": "Set the stock of a book",
                        "tags": ["Books"],
                        "parameters": [openapi::path_param("id", "Book id")],
                        "requestBody": openapi::json_request(openapi::schema_ref("SetStock")),
                        "responses": {
                            "200": openapi::json_response("Updated book", openapi::schema_ref("Book")),
                            "400": openapi::error_response("existencia es requerida"),
                            "404": openapi::error_response("Libro no encontrado")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "titulo": { "type": "string", "description": "Title of the book" },
                            "autor": { "type": "string", "description": "Author of the book" },
                            "existencia": { "type": "integer", "description": "Copies on the shelf" }
                        },
                        "required": ["id", "titulo", "autor", "existencia"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "titulo": { "type": "string" },
                            "autor": { "type": "string" },
                            "existencia": { "type": "integer", "default": 0 }
                        },
                        "required": ["titulo", "autor"]
                    },
                    "BookChanges": {
                        "type": "object",
                        "properties": {
                            "titulo": { "type": "string" },
                            "autor": { "type": "string" },
                            "existencia": { "type": "integer" }
                        }
                    },
                    "SetStock": {
                        "type": "object",
                        "properties": {
                            "existencia": { "type": "integer" }
                        },
                        "required": ["existencia"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

async fn list_books(State(store): State<Store>) -> Json<Vec<Book>> {
    Json(store.lock().await.books.all().to_vec())
}

async fn available_books(State(store): State<Store>) -> Json<Vec<Book>> {
    let library = store.lock().await;
    Json(library.available_books().cloned().collect())
}

async fn get_book(State(store): State<Store>, Path(id): Path<String>) -> AppResult<Json<Book>> {
    let id = record_id::<Book>(&id)?;
    let library = store.lock().await;
    Ok(Json(library.books.get(id)?.clone()))
}

async fn create_book(
    State(store): State<Store>,
    Payload(payload): Payload<models::CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let new_book = payload.validate()?;

    let mut library = store.lock().await;
    let book = library.books.insert(new_book).clone();
    tracing::info!(book_id = book.id, stock = book.stock, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(store): State<Store>,
    Path(id): Path<String>,
    Payload(changes): Payload<BookChanges>,
) -> AppResult<Json<Book>> {
    let id = record_id::<Book>(&id)?;

    let mut library = store.lock().await;
    let book = library.books.update(id, changes)?.clone();
    tracing::info!(book_id = id, "book updated");

    Ok(Json(book))
}

async fn set_stock(
    State(store): State<Store>,
    Path(id): Path<String>,
    Payload(payload): Payload<models::SetStock>,
) -> AppResult<Json<Book>> {
    // A missing value is reported before the book lookup.
    let stock = payload.validate()?;
    let id = record_id::<Book>(&id)?;

    let mut library = store.lock().await;
    Ok(Json(library.set_stock(id, stock)?.clone()))
}

async fn delete_book(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted<Book>>> {
    let id = record_id::<Book>(&id)?;

    let mut library = store.lock().await;
    let book = library.books.remove(id)?;
    tracing::info!(book_id = id, "book deleted");

    Ok(Json(Deleted::new(book)))
}

/// Create a new instance of the books module
pub fn create_module(store: Store) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
