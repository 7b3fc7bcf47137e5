use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, rejection::JsonRejection},
    http::{StatusCode, header},
};
use schoolhub_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::uploads::ImageUpload;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    // Struct level and nested errors carry no field entry of their own.
    if messages.is_empty() {
        messages.push(errors.to_string());
    }
    messages.join(", ")
}

fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(|errors| {
        AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!("{}", format_errors(&errors)),
        )
    })
}

/// Turns a deserialization message into the client facing 400.
fn body_error(error_msg: &str) -> AppError {
    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::new(StatusCode::BAD_REQUEST, anyhow!("{} is required", field));
    }

    if error_msg.contains("invalid type") || error_msg.contains("unknown variant") {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Invalid field type in request"),
        );
    }

    AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }
                body_error(&rejection.body_text())
            })?;

        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Body of endpoints that create or update a principal with an optional profile image.
///
/// Accepts plain JSON, or `multipart/form-data` with the JSON document in a
/// `data` part and the image in an `image` part. Image size and type are
/// checked when the image is stored.
#[derive(Debug)]
pub struct ProvisionForm<T> {
    pub data: T,
    pub image: Option<ImageUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

impl<T, S> FromRequest<S> for ProvisionForm<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let ValidatedJson(data) = ValidatedJson::<T>::from_request(req, state).await?;
            return Ok(Self { data, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?;

        let mut data = None;
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("data") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request(anyhow!("Invalid request body")))?;
                    let value: T =
                        serde_json::from_str(&text).map_err(|e| body_error(&e.to_string()))?;
                    data = Some(value);
                }
                Some("image") => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(anyhow!("Invalid image upload: {}", e)))?;
                    if !bytes.is_empty() {
                        image = Some(ImageUpload {
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        let data = data.ok_or_else(|| AppError::bad_request(anyhow!("data is required")))?;
        validate(&data)?;
        Ok(Self { data, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 2, message = "name is too short"))]
        name: String,
        #[allow(dead_code)]
        age: u8,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"name":"ab"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "age is required");
    }

    #[tokio::test]
    async fn wrong_type_is_a_bad_request() {
        let err = ValidatedJson::<Probe>::from_request(
            json_request(r#"{"name":"ab","age":"old"}"#),
            &(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.public_message(), "Invalid field type in request");
    }

    #[tokio::test]
    async fn constraint_failure_is_unprocessable() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"name":"a","age":3}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "name is too short");
    }

    #[tokio::test]
    async fn multipart_reads_data_and_image() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{{\"name\":\"Ada\",\"age\":30}}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let form = ProvisionForm::<Probe>::from_request(req, &()).await.unwrap();
        assert_eq!(form.data.name, "Ada");
        let image = form.image.unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, b"PNGDATA");
    }
}
