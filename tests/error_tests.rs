// SPDX-License-Identifier: MIT

//! Error-to-response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use podium_api::error::AppError;

fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_auth_errors_map_to_401() {
    assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(AppError::InvalidToken), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_not_found_is_benign_404() {
    assert_eq!(
        status_of(AppError::NotFound("Video v1 not found".to_string())),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_creator_only_actions_map_to_403() {
    assert_eq!(
        status_of(AppError::Forbidden("Only the creator can delete".to_string())),
        StatusCode::FORBIDDEN
    );
}

#[test]
fn test_store_failures_map_to_server_errors() {
    assert_eq!(
        status_of(AppError::Database("read rejected".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(AppError::Storage("upload rejected".to_string())),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn test_validation_failures_map_to_400() {
    assert_eq!(
        status_of(AppError::BadRequest("title is required".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_of(AppError::Conflict("email exists".to_string())),
        StatusCode::CONFLICT
    );
}
