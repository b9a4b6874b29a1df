//! Request extractors whose rejections use the API error format.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const MISSING_JSON_CONTENT_TYPE: &str = "Expected request with `Content-Type: application/json`";

/// JSON request body. Malformed payloads (bad syntax, wrong field types,
/// non-JSON content) are rejected as validation errors.
///
/// A blank body sent without a JSON content type reads as `{}`, so the
/// handler reports which fields are missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        let body: &[u8] = if json_content {
            &bytes
        } else if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            return Err(AppError::validation(MISSING_JSON_CONTENT_TYPE));
        };

        match Json::<T>::from_bytes(body) {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ping {
        count: i64,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let Payload(ping) = Payload::<Ping>::from_request(json_request(r#"{"count": 2}"#), &())
            .await
            .unwrap();
        assert_eq!(ping.count, 2);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let err = Payload::<Ping>::from_request(json_request(r#"{"count": "#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = Payload::<Ping>::from_request(json_request(r#"{"count": true}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[derive(Debug, Deserialize)]
    struct Stock {
        existencia: Option<i64>,
    }

    #[tokio::test]
    async fn blank_body_without_content_type_reads_as_empty_object() {
        let request = Request::builder()
            .method("PUT")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let Payload(stock) = Payload::<Stock>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(stock.existencia, None);
    }

    #[tokio::test]
    async fn vendor_json_content_type_is_accepted() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/vnd.api+json; charset=utf-8")
            .body(Body::from(r#"{"count": 5}"#))
            .unwrap();
        let Payload(ping) = Payload::<Ping>::from_request(request, &()).await.unwrap();
        assert_eq!(ping.count, 5);
    }

    #[tokio::test]
    async fn missing_content_type_is_a_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"count": 2}"#))
            .unwrap();
        let err = Payload::<Ping>::from_request(request, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
