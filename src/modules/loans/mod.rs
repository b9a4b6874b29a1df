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
use biblio_store::{Loan, LoanChanges, Store};

use crate::modules::{filter_key, record_id, Deleted};
use crate::utils::openapi;

/// Loans module: lending and returning copies.
///
/// Opening a loan takes a copy off the shelf, recording its return or
/// deleting it while still open puts the copy back.
pub struct LoansModule {
    store: Store,
}

impl LoansModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for LoansModule {
    fn name(&self) -> &'static str {
        "prestamos"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let library = ctx.store.lock().await;
        let open = library.loans.filter(Loan::is_open).count();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            loans = library.loans.len(),
            open,
            "loans module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_loans).post(create_loan))
            .route(
                "/{id}",
                get(get_loan).put(update_loan).delete(delete_loan),
            )
            .route("/usuario/{id_usuario}", get(loans_by_user))
            .route("/libro/{id_libro}", get(loans_by_book))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let mut create = openapi::collection_operations(
            "Loans",
            "Loan",
            "CreateLoan",
            "Missing id_usuario or id_libro, or no copies left",
        );
        create["post"]["responses"]["404"] = openapi::error_response("Libro no encontrado");

        let by_key = |param: &str, summary: &str| {
            json!({
                "get": {
                    "summary": summary,
                    "tags": ["Loans"],
                    "parameters": [openapi::path_param(param, summary)],
                    "responses": {
                        "200": openapi::json_response("Matching loans", openapi::array_of("Loan"))
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": create,
                "/{id}": openapi::item_operations(
                    "Loans",
                    "Loan",
                    "LoanChanges",
                    "Préstamo no encontrado"
                ),
                "/usuario/{id_usuario}": by_key("id_usuario", "Loans of a user"),
                "/libro/{id_libro}": by_key("id_libro", "Loans of a book")
            },
            "components": {
                "schemas": {
                    "Loan": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "id_usuario": { "type": "integer" },
                            "id_libro": { "type": "integer" },
                            "fecha_prestamo": { "type": "string", "format": "date" },
                            "fecha_devolucion": {
                                "type": ["string", "null"],
                                "format": "date",
                                "description": "Null while the copy is still out"
                            }
                        },
                        "required": ["id", "id_usuario", "id_libro", "fecha_prestamo", "fecha_devolucion"]
                    },
                    "CreateLoan": {
                        "type": "object",
                        "properties": {
                            "id_usuario": { "type": "integer" },
                            "id_libro": { "type": "integer" },
                            "fecha_prestamo": { "type": "string", "format": "date" },
                            "fecha_devolucion": { "type": ["string", "null"], "format": "date" }
                        },
                        "required": ["id_usuario", "id_libro"]
                    },
                    "LoanChanges": {
                        "type": "object",
                        "properties": {
                            "fecha_prestamo": { "type": "string", "format": "date" },
                            "fecha_devolucion": { "type": ["string", "null"], "format": "date" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let open = self.store.lock().await.loans.filter(Loan::is_open).count();
        tracing::info!(module = self.name(), open, "loans module stopped");
        Ok(())
    }
}

async fn list_loans(State(store): State<Store>) -> Json<Vec<Loan>> {
    Json(store.lock().await.loans.all().to_vec())
}

async fn get_loan(State(store): State<Store>, Path(id): Path<String>) -> AppResult<Json<Loan>> {
    let id = record_id::<Loan>(&id)?;
    let library = store.lock().await;
    Ok(Json(library.loans.get(id)?.clone()))
}

async fn loans_by_user(
    State(store): State<Store>,
    Path(user_id): Path<String>,
) -> Json<Vec<Loan>> {
    let Some(user_id) = filter_key(&user_id) else {
        return Json(Vec::new());
    };
    let library = store.lock().await;
    Json(library.loans_by_user(user_id).cloned().collect())
}

async fn loans_by_book(
    State(store): State<Store>,
    Path(book_id): Path<String>,
) -> Json<Vec<Loan>> {
    let Some(book_id) = filter_key(&book_id) else {
        return Json(Vec::new());
    };
    let library = store.lock().await;
    Json(library.loans_by_book(book_id).cloned().collect())
}

async fn create_loan(
    State(store): State<Store>,
    Payload(payload): Payload<models::CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let new_loan = payload.validate()?;

    let mut library = store.lock().await;
    let loan = library.open_loan(new_loan)?.clone();
    tracing::info!(
        loan_id = loan.id,
        user_id = loan.user_id,
        book_id = loan.book_id,
        "loan created"
    );

    Ok((StatusCode::CREATED, Json(loan)))
}

async fn update_loan(
    State(store): State<Store>,
    Path(id): Path<String>,
    Payload(changes): Payload<LoanChanges>,
) -> AppResult<Json<Loan>> {
    let id = record_id::<Loan>(&id)?;

    let mut library = store.lock().await;
    let loan = library.update_loan(id, changes)?.clone();
    tracing::info!(loan_id = id, open = loan.is_open(), "loan updated");

    Ok(Json(loan))
}

async fn delete_loan(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted<Loan>>> {
    let id = record_id::<Loan>(&id)?;

    let mut library = store.lock().await;
    let loan = library.delete_loan(id)?;
    tracing::info!(loan_id = id, was_open = loan.is_open(), "loan deleted");

    Ok(Json(Deleted::new(loan)))
}

/// Create a new instance of the loans module
pub fn create_module(store: Store) -> Arc<dyn Module> {
    Arc::new(LoansModule::new(store))
}
