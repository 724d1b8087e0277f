//! Bearer-token authentication and the `/auth` endpoints.

use axum::{
    extract::{Path, Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{FieldError, Failure};
use crate::store::{Collection, Record};
use crate::AppState;

const MIN_PASSWORD: usize = 8;

#[derive(Deserialize)]
pub struct Login {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

#[derive(Deserialize)]
pub struct ForgotPassword {
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
pub struct ResetPassword {
    #[serde(default)]
    password: String,
}

/// Rejects requests without a live bearer token and records the caller.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, Failure> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or(Failure::Unauthorized("missing token"))?;
    let user_id = state
        .user_for_token(&token)
        .await
        .ok_or(Failure::Unauthorized("invalid token"))?;
    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

pub async fn login(State(state): State<AppState>, Json(input): Json<Login>) -> Result<Json<Value>, Failure> {
    let mut errors = Vec::new();
    if input.username.trim().is_empty() {
        errors.push(FieldError::new("username", "required"));
    }
    if input.password.is_empty() {
        errors.push(FieldError::new("password", "required"));
    }
    if !errors.is_empty() {
        return Err(Failure::Validation(errors));
    }

    let user = {
        let store = state.store.read().await;
        store.find_by(Collection::Users, "username", input.username.trim()).cloned()
    };
    let user_id = user.as_ref().and_then(record_id);
    let (Some(user), Some(user_id)) = (user, user_id) else {
        tracing::info!(username = %input.username, "rejected login: unknown user");
        return Err(Failure::Unauthorized("Invalid credentials"));
    };
    if !state.password_matches(user_id, &input.password).await {
        tracing::info!(username = %input.username, "rejected login: wrong password");
        return Err(Failure::Unauthorized("Invalid credentials"));
    }
    let token = state.issue_token(user_id).await;
    tracing::info!(username = %input.username, "login");
    Ok(Json(json!({ "token": token, "user": user })))
}

pub async fn current_user(
    State(state): State<AppState>,
    axum::Extension(CurrentUser(id)): axum::Extension<CurrentUser>,
) -> Result<Json<Record>, Failure> {
    state
        .store
        .read()
        .await
        .get(Collection::Users, id)
        .map(Json)
        .ok_or_else(|| Failure::NotFound("User not found".to_string()))
}

pub async fn change_password(
    State(state): State<AppState>,
    axum::Extension(CurrentUser(id)): axum::Extension<CurrentUser>,
    Json(input): Json<ChangePassword>,
) -> Result<Json<Value>, Failure> {
    if input.new_password.chars().count() < MIN_PASSWORD {
        return Err(Failure::Validation(vec![FieldError::new(
            "newPassword",
            "must be at least 8 characters",
        )]));
    }
    if !state.password_matches(id, &input.current_password).await {
        return Err(Failure::BadRequest("Current password is incorrect".to_string()));
    }
    state.passwords.write().await.insert(id, input.new_password);
    Ok(Json(json!({ "message": "Password updated" })))
}

/// Always acknowledges, whether or not the address is known.
pub async fn forgot_password(State(state): State<AppState>, Json(input): Json<ForgotPassword>) -> Result<Json<Value>, Failure> {
    if input.email.trim().is_empty() {
        return Err(Failure::Validation(vec![FieldError::new("email", "required")]));
    }
    let user_id = {
        let store = state.store.read().await;
        store.find_by(Collection::Users, "email", input.email.trim()).and_then(record_id)
    };
    if let Some(user_id) = user_id {
        let token = Uuid::new_v4().simple().to_string();
        state.reset_tokens.write().await.insert(token, user_id);
        tracing::info!(email = %input.email, "reset token issued");
    }
    Ok(Json(json!({ "message": "If the address is registered, a reset link has been sent" })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ResetPassword>,
) -> Result<Json<Value>, Failure> {
    if input.password.chars().count() < MIN_PASSWORD {
        return Err(Failure::Validation(vec![FieldError::new(
            "password",
            "must be at least 8 characters",
        )]));
    }
    let user_id = state
        .reset_tokens
        .write()
        .await
        .remove(&token)
        .ok_or_else(|| Failure::BadRequest("Reset link is invalid or has expired".to_string()))?;
    state.passwords.write().await.insert(user_id, input.password);
    Ok(Json(json!({ "message": "Password has been reset" })))
}

pub fn record_id(record: &Record) -> Option<Uuid> {
    record.get("id").and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok())
}
