use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` whose rejections become `AppError::InvalidInput`, so malformed
/// bodies get the same `{"error": ...}` response as every other failure
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        Ok(AppJson(value))
    }
}

/// JSON body that may be absent; an empty body yields `T::default()`.
///
/// The content type is not checked.
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::InvalidInput(format!("Failed to parse the request body as JSON: {}", e))
        })?;
        Ok(OptionalJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Payload {
        uid: Option<String>,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_app_json_accepts_valid_body() {
        let request = json_request(r#"{"uid":"u"}"#);
        let AppJson(payload) = AppJson::<Payload>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(payload.uid.as_deref(), Some("u"));
    }

    #[tokio::test]
    async fn test_app_json_rejects_malformed_body_as_invalid_input() {
        let result = AppJson::<Payload>::from_request(json_request("{not json"), &()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_app_json_rejects_missing_content_type_as_invalid_input() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"uid":"u"}"#))
            .unwrap();
        let result = AppJson::<Payload>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_optional_json_defaults_empty_body() {
        let request = Request::builder().method("PUT").body(Body::empty()).unwrap();
        let OptionalJson(payload) = OptionalJson::<Payload>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(payload, Payload::default());
    }

    #[tokio::test]
    async fn test_optional_json_rejects_malformed_body() {
        let result = OptionalJson::<Payload>::from_request(json_request("[1,"), &()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
