use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vet_mock_server::{app, router, AppState, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .unwrap(),
        None => builder.body(String::new()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn login(app: &Router) -> String {
    let resp = send(
        app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, path: &str, body: Value) -> Value {
    let resp = send(app, request("POST", path, Some(token), Some(body))).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "POST {path}");
    body_json(resp).await
}

/// A category and a sede to hang specimens on.
async fn housing(app: &Router, token: &str) -> (Value, Value) {
    let category = create(app, token, "/specimen-categories", json!({ "name": "Caninos" })).await;
    let sede = create(app, token, "/sedes", json!({ "NombreSede": "Sede Norte" })).await;
    (category, sede)
}

async fn specimen(app: &Router, token: &str, category: &Value, sede: &Value, client: Option<&Value>) -> Value {
    create(
        app,
        token,
        "/specimens",
        json!({
            "name": "Toby",
            "breed": "Labrador",
            "color": "Negro",
            "birthDate": "2018-06-01",
            "categoryId": category["id"],
            "sedeId": sede["id"],
            "clientId": client.map(|c| c["id"].clone()),
        }),
    )
    .await
}

// --- auth ---

#[tokio::test]
async fn collections_require_a_token() {
    let app = app();
    let resp = send(&app, request("GET", "/specimens", None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(resp).await["message"].is_string());

    let resp = send(&app, request("GET", "/specimens", Some("bogus"), None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = app();
    let resp = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": "nope" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_blank_fields_is_422() {
    let app = app();
    let resp = send(&app, request("POST", "/auth/login", None, Some(json!({})))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["path"], "username");
    assert_eq!(body["errors"][1]["path"], "password");
}

#[tokio::test]
async fn current_user_returns_the_caller() {
    let app = app();
    let token = login(&app).await;
    let resp = send(&app, request("GET", "/auth/currentuser", Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await;
    assert_eq!(user["username"], ADMIN_USERNAME);
    assert_eq!(user["role"], "admin");
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn change_password_checks_current() {
    let app = app();
    let token = login(&app).await;
    let resp = send(
        &app,
        request(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": "wrong", "newPassword": "longenough" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        request(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "longenough" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn forgot_and_reset_password() {
    let state = AppState::new();
    let app = router(state.clone());

    let resp = send(
        &app,
        request("POST", "/auth/forgot-password", None, Some(json!({ "email": ADMIN_EMAIL }))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await["message"].is_string());

    let reset = state.reset_token_for(ADMIN_EMAIL).await.unwrap();
    let resp = send(
        &app,
        request(
            "POST",
            &format!("/auth/reset-password/{reset}"),
            None,
            Some(json!({ "password": "brandnew99" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Tokens are single-use.
    let resp = send(
        &app,
        request(
            "POST",
            &format!("/auth/reset-password/{reset}"),
            None,
            Some(json!({ "password": "brandnew99" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": "brandnew99" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- collections ---

#[tokio::test]
async fn unknown_collection_is_404() {
    let app = app();
    let token = login(&app).await;
    let resp = send(&app, request("GET", "/animals", Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_fields_are_422_with_paths() {
    let app = app();
    let token = login(&app).await;
    let resp = send(
        &app,
        request("POST", "/specimen-categories", Some(&token), Some(json!({ "name": "" }))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(resp).await,
        json!({ "errors": [{ "path": "name", "msg": "required" }] })
    );
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = app();
    let token = login(&app).await;
    for uri in ["/clients/00000000-0000-0000-0000-000000000000", "/clients/not-a-uuid"] {
        let resp = send(&app, request("GET", uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(resp).await["message"], "Client not found");
    }
}

#[tokio::test]
async fn specimens_carry_related_names() {
    let app = app();
    let token = login(&app).await;
    let (category, sede) = housing(&app, &token).await;
    let client = create(
        &app,
        &token,
        "/clients",
        json!({ "nombre": "Laura", "documento": "CC12345", "email": "laura@example.com" }),
    )
    .await;
    let toby = specimen(&app, &token, &category, &sede, Some(&client)).await;
    assert_eq!(toby["categoryName"], "Caninos");
    assert_eq!(toby["sedeName"], "Sede Norte");
    assert_eq!(toby["clientName"], "Laura");
    assert_eq!(toby["estado"], "active");
}

#[tokio::test]
async fn move_specimen_changes_housing() {
    let app = app();
    let token = login(&app).await;
    let (category, sede) = housing(&app, &token).await;
    let other = create(&app, &token, "/sedes", json!({ "NombreSede": "Sede Sur" })).await;
    let toby = specimen(&app, &token, &category, &sede, None).await;

    let resp = send(
        &app,
        request(
            "PATCH",
            &format!("/specimens/{}/move", toby["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({ "categoryId": category["id"], "sedeId": other["id"] })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let moved = body_json(resp).await;
    assert_eq!(moved["sedeName"], "Sede Sur");
    assert_eq!(moved["categoryName"], "Caninos");
}

#[tokio::test]
async fn service_status_patch() {
    let app = app();
    let token = login(&app).await;
    let service = create(
        &app,
        &token,
        "/services",
        json!({ "nombre": "Guarderia", "descripcion": "Cuidado diario" }),
    )
    .await;
    assert_eq!(service["status"], "active");
    let uri = format!("/services/{}/status", service["id"].as_str().unwrap());

    let resp = send(&app, request("PATCH", &uri, Some(&token), Some(json!({ "status": "inactive" })))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "inactive");

    let resp = send(&app, request("PATCH", &uri, Some(&token), Some(json!({ "status": "paused" })))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn medicine_estado_patch() {
    let app = app();
    let token = login(&app).await;
    let (category, sede) = housing(&app, &token).await;
    let toby = specimen(&app, &token, &category, &sede, None).await;
    let medicine = create(
        &app,
        &token,
        "/medicines",
        json!({ "name": "Amoxicilina", "dose": "5ml", "time": "08:30", "specimenId": toby["id"] }),
    )
    .await;
    assert_eq!(medicine["estado"], "scheduled");
    assert!(medicine["createdAt"].is_string());

    let resp = send(
        &app,
        request(
            "PATCH",
            &format!("/medicines/{}/estado", medicine["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({ "estado": "administered" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["estado"], "administered");
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
    let app = app();
    let token = login(&app).await;
    let (category, sede) = housing(&app, &token).await;
    specimen(&app, &token, &category, &sede, None).await;

    let uri = format!("/specimen-categories/{}", category["id"].as_str().unwrap());
    let resp = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn users_hide_passwords_and_need_one() {
    let app = app();
    let token = login(&app).await;
    let resp = send(
        &app,
        request(
            "POST",
            "/users",
            Some(&token),
            Some(json!({ "username": "maria", "email": "maria@vet.test", "nombreCompleto": "Maria", "role": "employee" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["errors"][0]["path"], "password");

    let user = create(
        &app,
        &token,
        "/users",
        json!({
            "username": "maria",
            "email": "maria@vet.test",
            "nombreCompleto": "Maria",
            "role": "employee",
            "password": "employee1",
        }),
    )
    .await;
    assert!(user.get("password").is_none());

    let resp = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "maria", "password": "employee1" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn contract_lifecycle() {
    let app = app();
    let token = login(&app).await;
    let (category, sede) = housing(&app, &token).await;
    let client = create(
        &app,
        &token,
        "/clients",
        json!({ "nombre": "Laura", "documento": "CC12345", "email": "laura@example.com" }),
    )
    .await;
    let toby = specimen(&app, &token, &category, &sede, Some(&client)).await;
    let service = create(
        &app,
        &token,
        "/services",
        json!({ "nombre": "Guarderia", "descripcion": "Cuidado diario" }),
    )
    .await;

    // create
    let contract = create(
        &app,
        &token,
        "/contracts",
        json!({
            "clientId": client["id"],
            "specimenId": toby["id"],
            "fechaInicio": "2024-01-15",
            "precioMensual": 150000,
            "serviceIds": [service["id"]],
        }),
    )
    .await;
    assert_eq!(contract["estado"], "active");
    assert_eq!(contract["clientName"], "Laura");
    assert_eq!(contract["specimenName"], "Toby");
    let uri = format!("/contracts/{}", contract["id"].as_str().unwrap());

    // update
    let resp = send(
        &app,
        request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({
                "clientId": client["id"],
                "specimenId": toby["id"],
                "fechaInicio": "2024-01-15",
                "precioMensual": 175000,
                "estado": "finalized",
                "serviceIds": [],
            })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["estado"], "finalized");
    assert_eq!(updated["precioMensual"], 175000);

    // list
    let resp = send(&app, request("GET", "/contracts", Some(&token), None)).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

    // delete
    let resp = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
