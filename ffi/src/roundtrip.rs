//! Drives the C surface against a live mock server, executing each built
//! request over real HTTP the way a C host would.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::types::*;
use crate::*;

fn start_server() -> String {
    vet_core::logging::init_test();
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            vet_mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn text(s: *const c_char) -> String {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_string()
}

/// Execute a built request, free it, and parse the reply with `parse`.
fn exchange(req: *mut FfiHttpRequest, parse: impl FnOnce(&FfiHttpResponse) -> *mut FfiVetResult) -> *mut FfiVetResult {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let path = text(r.path);
    let headers: Vec<(String, String)> = if r.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) }
            .iter()
            .map(|h| (text(h.key), text(h.value)))
            .collect()
    };
    let body = (!r.body.is_null()).then(|| text(r.body));

    macro_rules! with_headers {
        ($builder:expr) => {{
            let mut builder = $builder;
            for (k, v) in &headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            builder
        }};
    }

    let response = match r.method {
        FfiHttpMethod::Get => with_headers!(agent.get(&path)).call(),
        FfiHttpMethod::Delete => with_headers!(agent.delete(&path)).call(),
        FfiHttpMethod::Post => with_headers!(agent.post(&path)).send(body.unwrap_or_default().as_bytes()),
        FfiHttpMethod::Put => with_headers!(agent.put(&path)).send(body.unwrap_or_default().as_bytes()),
        FfiHttpMethod::Patch => with_headers!(agent.patch(&path)).send(body.unwrap_or_default().as_bytes()),
    };
    vet_free_request(req);

    let mut response = response.unwrap();
    let status = response.status().as_u16();
    let body = CString::new(response.body_mut().read_to_string().unwrap()).unwrap();
    parse(&FfiHttpResponse {
        status,
        body: body.as_ptr(),
    })
}

fn data(result: *mut FfiVetResult) -> serde_json::Value {
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok, "unexpected error: {}", text(r.error_message));
    let value = if r.data_json.is_null() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text(r.data_json)).unwrap()
    };
    vet_free_result(result);
    value
}

#[test]
fn sign_in_create_and_move_over_http() {
    let base_url = CString::new(start_server()).unwrap();
    let client = vet_client_new(base_url.as_ptr(), std::ptr::null());

    let credentials = CString::new(format!(
        r#"{{"username":"{}","password":"{}"}}"#,
        vet_mock_server::ADMIN_USERNAME,
        vet_mock_server::ADMIN_PASSWORD
    ))
    .unwrap();
    let req = vet_build_auth(client, FfiAuthOperation::Login, std::ptr::null(), credentials.as_ptr());
    let user = data(exchange(req, |resp| vet_parse_auth(client, FfiAuthOperation::Login, resp)));
    assert_eq!(user["username"], vet_mock_server::ADMIN_USERNAME);
    assert!(vet_session_is_authenticated(client));

    let categories = CString::new("specimen-categories").unwrap();
    let sedes = CString::new("sedes").unwrap();
    let specimens = CString::new("specimens").unwrap();
    let create = |resource: &CString, body: String| {
        let body = CString::new(body).unwrap();
        let req = vet_build_request(client, resource.as_ptr(), FfiOperation::Create, std::ptr::null(), body.as_ptr());
        data(exchange(req, |resp| vet_parse_response(client, resource.as_ptr(), FfiOperation::Create, resp)))
    };

    let category = create(&categories, r#"{"name":"Felinos","estado":"active"}"#.to_string());
    let first = create(&sedes, r#"{"NombreSede":"Norte"}"#.to_string());
    let second = create(&sedes, r#"{"NombreSede":"Sur"}"#.to_string());
    let specimen = create(
        &specimens,
        format!(
            r#"{{"name":"Michi","breed":"Siames","color":"Crema","birthDate":"2020-03-01","estado":"active","categoryId":{},"sedeId":{},"clientId":null}}"#,
            category["id"], first["id"]
        ),
    );
    assert_eq!(specimen["sedeName"], "Norte");

    let id = CString::new(specimen["id"].as_str().unwrap()).unwrap();
    let target = CString::new(format!(r#"{{"categoryId":{},"sedeId":{}}}"#, category["id"], second["id"])).unwrap();
    let req = vet_build_request(client, specimens.as_ptr(), FfiOperation::Move, id.as_ptr(), target.as_ptr());
    let moved = data(exchange(req, |resp| {
        vet_parse_response(client, specimens.as_ptr(), FfiOperation::Move, resp)
    }));
    assert_eq!(moved["sedeId"], second["id"]);

    // The category is still referenced by the specimen.
    let category_id = CString::new(category["id"].as_str().unwrap()).unwrap();
    let req = vet_build_request(client, categories.as_ptr(), FfiOperation::Delete, category_id.as_ptr(), std::ptr::null());
    let result = exchange(req, |resp| vet_parse_response(client, categories.as_ptr(), FfiOperation::Delete, resp));
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Api);
    assert_eq!(r.http_status, 409);
    vet_free_result(result);

    vet_client_free(client);
}

#[test]
fn forged_token_requires_login() {
    let base_url = CString::new(start_server()).unwrap();
    let client = vet_client_new(base_url.as_ptr(), std::ptr::null());
    let token = CString::new("forged").unwrap();
    vet_session_set_token(client, token.as_ptr());

    let sedes = CString::new("sedes").unwrap();
    let req = vet_build_request(client, sedes.as_ptr(), FfiOperation::List, std::ptr::null(), std::ptr::null());
    let result = exchange(req, |resp| vet_parse_response(client, sedes.as_ptr(), FfiOperation::List, resp));
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Unauthorized);
    assert!(r.login_required);
    vet_free_result(result);
    assert!(!vet_session_is_authenticated(client));

    vet_client_free(client);
}
