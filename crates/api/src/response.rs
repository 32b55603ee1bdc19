//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard success envelope: `{ "success": true, ...payload }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Empty payload for responses that carry only the success flag.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct MessageBody {
        message: String,
    }

    #[test]
    fn test_payload_is_flattened_next_to_the_success_flag() {
        let response = ApiResponse::ok(MessageBody {
            message: "Review added successfully".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Review added successfully");
    }

    #[test]
    fn test_empty_payload_serializes_to_just_the_flag() {
        let json = serde_json::to_value(ApiResponse::ok(Empty {})).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }
}
