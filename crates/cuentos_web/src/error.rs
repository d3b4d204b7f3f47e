use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cuentos_core::Error;
use serde_json::json;
use tracing::error;

/// Maps pipeline errors onto HTTP responses with an `{error}` body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::MissingField { .. } | Error::NotFound(_) | Error::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Fetch { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!("Request failed with {}: {}", status, self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::missing_field("heroes", "villano"), StatusCode::BAD_REQUEST),
            (Error::NotFound("document".to_string()), StatusCode::BAD_REQUEST),
            (
                Error::Fetch {
                    url: "https://elpais.com/x".to_string(),
                    details: "timeout".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (Error::malformed("story", "generated_text"), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Inference("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).status(), status);
        }
    }
}
