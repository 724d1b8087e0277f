//! In-memory stand-in for the boarding REST backend.
//!
//! Serves every collection the client knows about under the same paths,
//! with bearer-token auth, `{errors:[{path,msg}]}` validation failures and
//! `{message}` for everything else. State lives only as long as the process.

pub mod auth;
pub mod error;
pub mod routes;
pub mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use crate::auth::record_id;
use crate::store::{Collection, Store};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_EMAIL: &str = "admin@vet.test";

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub passwords: Arc<RwLock<HashMap<Uuid, String>>>,
    tokens: Arc<RwLock<HashMap<String, Uuid>>>,
    pub reset_tokens: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl AppState {
    /// Fresh state with a single admin account.
    pub fn new() -> Self {
        let mut store = Store::default();
        let mut passwords = HashMap::new();
        let admin = store.insert(
            Collection::Users,
            &json!({
                "username": ADMIN_USERNAME,
                "email": ADMIN_EMAIL,
                "nombreCompleto": "Administrador",
                "role": "admin",
            }),
        );
        if let Some(id) = admin.ok().as_ref().and_then(record_id) {
            passwords.insert(id, ADMIN_PASSWORD.to_string());
        }
        Self {
            store: Arc::new(RwLock::new(store)),
            passwords: Arc::new(RwLock::new(passwords)),
            ..Self::default()
        }
    }

    pub async fn issue_token(&self, user: Uuid) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.write().await.insert(token.clone(), user);
        token
    }

    pub async fn user_for_token(&self, token: &str) -> Option<Uuid> {
        self.tokens.read().await.get(token).copied()
    }

    /// Invalidate every token issued so far.
    pub async fn revoke_tokens(&self) {
        self.tokens.write().await.clear();
    }

    pub async fn password_matches(&self, user: Uuid, password: &str) -> bool {
        self.passwords.read().await.get(&user).is_some_and(|p| p == password)
    }

    /// The outstanding reset token for `email`, as the reset mail would carry.
    pub async fn reset_token_for(&self, email: &str) -> Option<String> {
        let user = {
            let store = self.store.read().await;
            store.find_by(Collection::Users, "email", email).and_then(record_id)?
        };
        self.reset_tokens
            .read()
            .await
            .iter()
            .find(|(_, id)| **id == user)
            .map(|(token, _)| token.clone())
    }
}

pub fn app() -> Router {
    router(AppState::new())
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password/{token}", post(auth::reset_password));

    let protected = Router::new()
        .route("/auth/currentuser", get(auth::current_user))
        .route("/auth/change-password", post(auth::change_password))
        .route("/{collection}", get(routes::list).post(routes::create))
        .route(
            "/{collection}/{id}",
            get(routes::get_one).put(routes::update).delete(routes::delete),
        )
        .route("/{collection}/{id}/{action}", patch(routes::action))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public.merge(protected).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AppState::new()).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock backend listening");
    }
    axum::serve(listener, router(state)).await
}
