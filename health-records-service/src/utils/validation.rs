use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has passed `validator` rules. Malformed JSON and rule
/// violations are both answered with 400.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e.body_text()))
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Question {
        #[validate(length(min = 1, message = "question is required"))]
        question: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_bodies() {
        let body = r#"{"question":"Is physio covered?"}"#;
        let ValidatedJson(q) = ValidatedJson::<Question>::from_request(request(body), &())
            .await
            .unwrap_or_else(|e| panic!("unexpected rejection: {}", e));
        assert_eq!(q.question, "Is physio covered?");
    }

    #[tokio::test]
    async fn rule_violations_are_bad_requests() {
        let err = ValidatedJson::<Question>::from_request(request(r#"{"question":""}"#), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let err = ValidatedJson::<Question>::from_request(request("{"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
