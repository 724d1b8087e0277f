//! Generic collection endpoints shared by every entity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::record_id;
use crate::error::{FieldError, Failure};
use crate::store::{Collection, Record, Store};
use crate::AppState;

fn collection(path: &str) -> Result<Collection, Failure> {
    Collection::from_path(path).ok_or_else(|| Failure::NotFound(format!("Cannot find /{path}")))
}

fn parse_id(collection: Collection, id: &str) -> Result<Uuid, Failure> {
    Uuid::parse_str(id).map_err(|_| not_found(collection))
}

fn not_found(collection: Collection) -> Failure {
    Failure::NotFound(format!("{} not found", collection.label()))
}

pub async fn list(State(state): State<AppState>, Path(path): Path<String>) -> Result<Json<Vec<Record>>, Failure> {
    let collection = collection(&path)?;
    Ok(Json(state.store.read().await.list(collection)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path((path, id)): Path<(String, String)>,
) -> Result<Json<Record>, Failure> {
    let collection = collection(&path)?;
    let id = parse_id(collection, &id)?;
    state
        .store
        .read()
        .await
        .get(collection, id)
        .map(Json)
        .ok_or_else(|| not_found(collection))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Record>), Failure> {
    let collection = collection(&path)?;
    if collection == Collection::Users {
        return create_user(&state, &body).await;
    }
    let record = state
        .store
        .write()
        .await
        .insert(collection, &body)
        .map_err(Failure::Validation)?;
    tracing::info!(collection = collection.path(), id = ?record.get("id"), "created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn create_user(state: &AppState, body: &Value) -> Result<(StatusCode, Json<Record>), Failure> {
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default().to_string();
    let mut store = state.store.write().await;
    let mut errors = store.check_fields(Collection::Users, body);
    if password.is_empty() {
        errors.push(FieldError::new("password", "required"));
    } else if password.chars().count() < 8 {
        errors.push(FieldError::new("password", "must be at least 8 characters"));
    }
    if let Some(username) = body.get("username").and_then(Value::as_str) {
        if store.find_by(Collection::Users, "username", username.trim()).is_some() {
            errors.push(FieldError::new("username", "already taken"));
        }
    }
    if !errors.is_empty() {
        return Err(Failure::Validation(errors));
    }
    let user = store.insert(Collection::Users, body).map_err(Failure::Validation)?;
    if let Some(id) = record_id(&user) {
        state.passwords.write().await.insert(id, password);
    }
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, Failure> {
    let collection = collection(&path)?;
    let id = parse_id(collection, &id)?;
    let updated = state
        .store
        .write()
        .await
        .replace(collection, id, &body)
        .map_err(Failure::Validation)?
        .ok_or_else(|| not_found(collection))?;
    if collection == Collection::Users {
        if let Some(password) = body.get("password").and_then(Value::as_str).filter(|p| !p.is_empty()) {
            state.passwords.write().await.insert(id, password.to_string());
        }
    }
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path, id)): Path<(String, String)>,
) -> Result<StatusCode, Failure> {
    let collection = collection(&path)?;
    let id = parse_id(collection, &id)?;
    let mut store = state.store.write().await;
    if store.find(collection, id).is_none() {
        return Err(not_found(collection));
    }
    if store.is_referenced(collection, id) {
        return Err(Failure::Conflict(format!("{} is still in use", collection.label())));
    }
    store.remove(collection, id);
    tracing::info!(collection = collection.path(), %id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /services/:id/status`, `PATCH /medicines/:id/estado` and
/// `PATCH /specimens/:id/move`.
pub async fn action(
    State(state): State<AppState>,
    Path((path, id, action)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, Failure> {
    let collection = collection(&path)?;
    let id = parse_id(collection, &id)?;
    let mut store = state.store.write().await;
    if store.find(collection, id).is_none() {
        return Err(not_found(collection));
    }
    if collection == Collection::Specimens && action == "move" {
        return move_specimen(&mut store, id, &body).map(Json);
    }
    let field = collection
        .status_action(&action)
        .ok_or_else(|| Failure::NotFound(format!("Cannot find /{path}/{id}/{action}")))?;
    let value = body.get(field).cloned().unwrap_or(Value::Null);
    store
        .check_value(collection, field, &value)
        .map_err(|msg| Failure::Validation(vec![FieldError::new(field, msg)]))?;
    store.modify(collection, id, |record| {
        record.insert(field.to_string(), value);
    });
    store.get(collection, id).map(Json).ok_or_else(|| not_found(collection))
}

fn move_specimen(store: &mut Store, id: Uuid, body: &Value) -> Result<Record, Failure> {
    let mut errors = Vec::new();
    let mut changes = Vec::new();
    for (field, target) in [("categoryId", Collection::Categories), ("sedeId", Collection::Sedes)] {
        match body.get(field) {
            None | Some(Value::Null) => changes.push((field, Value::Null)),
            Some(value) => match store.check_ref(target, value) {
                Ok(()) => changes.push((field, value.clone())),
                Err(msg) => errors.push(FieldError::new(field, msg)),
            },
        }
    }
    if !errors.is_empty() {
        return Err(Failure::Validation(errors));
    }
    store.modify(Collection::Specimens, id, |record| {
        for (field, value) in changes {
            record.insert(field.to_string(), value);
        }
    });
    tracing::info!(%id, "specimen moved");
    store
        .get(Collection::Specimens, id)
        .ok_or_else(|| not_found(Collection::Specimens))
}
