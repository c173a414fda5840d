// SPDX-License-Identifier: MIT

//! Email/password authentication routes.
//!
//! Sign-up creates a profile plus a credentials document and issues a JWT
//! session; sign-in verifies the password and re-issues one. The token is
//! returned in the body and also set as a cookie so both mobile clients
//! (Authorization header) and browser clients work.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{User, UserCredentials};
use crate::services::password;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "too long"))]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Session response: the JWT plus the signed-in user.
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Serialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::BadRequest(errors.to_string())
}

/// Create a new account and start a session.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    payload.validate().map_err(validation_error)?;

    let email = payload.email.trim().to_lowercase();

    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user = User {
        uid: Uuid::new_v4().to_string(),
        email,
        display_name: payload.display_name.filter(|n| !n.trim().is_empty()),
        created_at: now_rfc3339(),
    };

    let password_hash = password::hash_password(&payload.password)?;

    state.db.upsert_user(&user).await?;
    state
        .db
        .set_credentials(&user.uid, &UserCredentials { password_hash })
        .await?;

    let token = create_jwt(&user.uid, &state.config.jwt_signing_key)?;

    tracing::info!(uid = %user.uid, "User signed up");

    let jar = jar.add(session_cookie(&token));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionResponse {
            token,
            user: SessionUser {
                uid: user.uid,
                email: user.email,
                display_name: user.display_name,
            },
        }),
    ))
}

/// Verify a password and start a session.
///
/// Every failure (unknown email, missing credentials, bad password) is the
/// same uniform `unauthorized` so accounts cannot be enumerated.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    payload.validate().map_err(validation_error)?;

    let email = payload.email.trim().to_lowercase();

    let user = state
        .db
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let credentials = state
        .db
        .get_credentials(&user.uid)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify_password(&payload.password, &credentials.password_hash) {
        tracing::warn!(uid = %user.uid, "Sign-in with wrong password");
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(&user.uid, &state.config.jwt_signing_key)?;

    tracing::info!(uid = %user.uid, "User signed in");

    let jar = jar.add(session_cookie(&token));
    Ok((
        jar,
        Json(SessionResponse {
            token,
            user: SessionUser {
                uid: user.uid,
                email: user.email,
                display_name: user.display_name,
            },
        }),
    ))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// End the session by clearing the cookie. Bearer clients just drop the token.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Json(LogoutResponse { success: true }))
}
