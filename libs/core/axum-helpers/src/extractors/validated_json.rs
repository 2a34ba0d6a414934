//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Bodies that cannot be bound (bad syntax, wrong types, missing
/// `content-type`) are rejected with a 400 `JSON_EXTRACTION` error, and bodies
/// that fail `Validate` with a 400 `VALIDATION_ERROR` carrying per-field details.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::put;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Item {
///     #[validate(length(min = 1))]
///     sku: String,
/// }
///
/// async fn put_item(ValidatedJson(item): ValidatedJson<Item>) -> String {
///     item.sku
/// }
///
/// let app = Router::new().route("/items", put(put_item));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.name
    }

    async fn send(body: &'static str) -> (StatusCode, serde_json::Value) {
        send_request(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    async fn send_request(request: Request) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/", post(handler));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let (status, _) = send(r#"{"name":"widget"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_payload_reports_field() {
        let (status, body) = send(r#"{"name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["name"][0]["message"], "name is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let (status, body) = send(r#"{"name":42}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let (status, body) = send_request(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(r#"{"name":"widget"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }
}
