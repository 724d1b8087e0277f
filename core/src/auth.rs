//! Authentication endpoints under `/auth`.
//!
//! Same build/parse split as the resource clients. `parse_login` and
//! `parse_current_user` also update the shared `Session`, so a successful
//! login is visible to every client built from it.

use crate::client::ApiClient;
use crate::error::{ApiError, AuthPolicy};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;
use crate::types::{ChangePassword, ForgotPassword, LoginRequest, LoginResponse, MessageResponse, ResetPassword, User};

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn build_login(&self, credentials: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.api.build_json(HttpMethod::Post, "auth/login", credentials)
    }

    /// Bad credentials come back as `ApiError::Api`; the session is only
    /// touched on success.
    pub fn parse_login(&self, response: HttpResponse) -> Result<User, ApiError> {
        let LoginResponse { token, user } = self.api.parse_with(response, AuthPolicy::Login)?;
        self.session().set(token, Some(user.clone()));
        Ok(user)
    }

    pub fn build_current_user(&self) -> HttpRequest {
        self.api.build(HttpMethod::Get, "auth/currentuser", None)
    }

    pub fn parse_current_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        let user: User = self.api.parse(response)?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    pub fn build_change_password(&self, input: &ChangePassword) -> Result<HttpRequest, ApiError> {
        self.api.build_json(HttpMethod::Post, "auth/change-password", input)
    }

    pub fn parse_change_password(&self, response: HttpResponse) -> Result<Option<String>, ApiError> {
        let body = self.api.parse_value(response, AuthPolicy::Session)?;
        Ok(message_of(body))
    }

    pub fn build_forgot_password(&self, input: &ForgotPassword) -> Result<HttpRequest, ApiError> {
        self.api.build_json(HttpMethod::Post, "auth/forgot-password", input)
    }

    pub fn parse_forgot_password(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        self.api.parse_with(response, AuthPolicy::Login)
    }

    /// The token comes from an emailed link and is encoded as a single path segment.
    pub fn build_reset_password(&self, token: &str, input: &ResetPassword) -> Result<HttpRequest, ApiError> {
        let token = urlencoding::encode(token);
        self.api
            .build_json(HttpMethod::Post, &format!("auth/reset-password/{token}"), input)
    }

    /// An expired reset link is a banner error, not a logout.
    pub fn parse_reset_password(&self, response: HttpResponse) -> Result<MessageResponse, ApiError> {
        self.api.parse_with(response, AuthPolicy::Login)
    }

    /// Client-side only; there is no logout endpoint.
    pub fn logout(&self) {
        self.session().clear();
    }
}

fn message_of(body: Option<serde_json::Value>) -> Option<String> {
    body?.get("message")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = r#"{"id":"00000000-0000-0000-0000-000000000007","username":"admin","email":"admin@vet.test","nombreCompleto":"Admin","role":"admin"}"#;

    fn auth() -> AuthClient {
        AuthClient::new(ApiClient::new("http://localhost:3000/api/", Session::in_memory()))
    }

    #[test]
    fn build_login_has_no_bearer() {
        let req = auth()
            .build_login(&LoginRequest {
                username: "admin".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/auth/login");
        assert!(req.header("authorization").is_none());
        assert_eq!(req.body.as_deref(), Some(r#"{"username":"admin","password":"secret"}"#));
    }

    #[test]
    fn parse_login_starts_session() {
        let auth = auth();
        let body = format!(r#"{{"token":"abc","user":{USER}}}"#);
        let user = auth.parse_login(HttpResponse::new(200, &body)).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(auth.session().token().as_deref(), Some("abc"));
        assert_eq!(auth.session().user().unwrap().username, "admin");

        let next = auth.build_current_user();
        assert_eq!(next.header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn rejected_login_is_banner_error() {
        let auth = auth();
        let err = auth
            .parse_login(HttpResponse::new(401, r#"{"message":"Invalid credentials"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
        assert!(!auth.session().is_authenticated());
    }

    #[test]
    fn current_user_401_clears_session() {
        let auth = auth();
        auth.session().set("stale", None);
        let err = auth
            .parse_current_user(HttpResponse::new(401, r#"{"message":"jwt expired"}"#))
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert!(!auth.session().is_authenticated());
    }

    #[test]
    fn reset_password_embeds_token() {
        let req = auth()
            .build_reset_password(
                "tok123",
                &ResetPassword {
                    password: "newsecret".to_string(),
                },
            )
            .unwrap();
        assert!(req.path.ends_with("/auth/reset-password/tok123"));
    }

    #[test]
    fn reset_token_stays_one_path_segment() {
        let req = auth()
            .build_reset_password(
                "a/b?c=d#e f",
                &ResetPassword {
                    password: "newsecret".to_string(),
                },
            )
            .unwrap();
        assert!(req.path.ends_with("/auth/reset-password/a%2Fb%3Fc%3Dd%23e%20f"));
    }

    #[test]
    fn change_password_message_is_optional() {
        let auth = auth();
        assert_eq!(auth.parse_change_password(HttpResponse::new(204, "")), Ok(None));
        assert_eq!(
            auth.parse_change_password(HttpResponse::new(200, r#"{"message":"updated"}"#)),
            Ok(Some("updated".to_string()))
        );
    }

    #[test]
    fn logout_clears_token() {
        let auth = auth();
        auth.session().set("abc", None);
        auth.logout();
        assert!(auth.session().token().is_none());
    }
}
