//! Validated JSON extractor - Combines deserialization with validation.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::types::{response, ApiResponse};

/// Validated JSON extractor that automatically validates requests.
///
/// Rejects with the validation envelope: 422 when a field fails validation,
/// and the JSON rejection's own status (400, 415, 422) under the `body` key
/// when the payload cannot be parsed.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUserRequest {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUserRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let fields = BTreeMap::from([("body".to_string(), vec![rejection.body_text()])]);
                response::validation_error(fields).with_status(rejection.status())
            })?;

        value
            .validate()
            .map_err(|e| response::validation_error(field_messages(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Collect messages per field, falling back to the validator code.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' validation", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let req = json_request(r#"{"email":"a@example.com","name":"Ada"}"#);
        let ValidatedJson(signup) = ValidatedJson::<Signup>::from_request(req, &()).await.ok().unwrap();
        assert_eq!(signup.name, "Ada");
    }

    #[tokio::test]
    async fn test_invalid_fields_are_reported() {
        let req = json_request(r#"{"email":"nope","name":"Al"}"#);
        let rejection = ValidatedJson::<Signup>::from_request(req, &()).await.err().unwrap();

        assert_eq!(rejection.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let errors = rejection.errors.clone().unwrap();
        assert!(errors.contains(&"email: Invalid email format".to_string()));
        assert!(errors.contains(&"name: failed 'length' validation".to_string()));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let req = json_request("{not json");
        let rejection = ValidatedJson::<Signup>::from_request(req, &()).await.err().unwrap();

        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rejection.message, "Validation failed");
    }
}
