//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use uuid::Uuid;
use vet_core::resource::{Medicines, Services, Specimens};
use vet_core::types::{ActiveStatus, CareStatus, MoveSpecimen, Specimen, SpecimenInput};
use vet_core::{ApiClient, ApiError, AuthPolicy, HttpMethod, HttpRequest, HttpResponse, ResourceClient, Session};

const BASE_URL: &str = "http://localhost:3000";

fn api(token: &str) -> ApiClient {
    let session = Session::in_memory();
    session.set(token, None);
    ApiClient::new(BASE_URL, session)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap())
}

fn id_of(case: &Value) -> Uuid {
    case["id"].as_str().unwrap().parse().unwrap()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
    }
}

fn assert_error(name: &str, err: &ApiError, expected: &Value) {
    let message = expected["message"].as_str();
    match expected["kind"].as_str().unwrap() {
        "Validation" => {
            let fields = err.field_errors().unwrap_or_else(|| panic!("{name}: expected Validation, got {err:?}"));
            let expected_fields = expected["fields"].as_object().unwrap();
            assert_eq!(fields.len(), expected_fields.len(), "{name}: field count");
            for (path, msg) in expected_fields {
                assert_eq!(fields.get(path), msg.as_str(), "{name}: {path}");
            }
        }
        "Unauthorized" => match err {
            ApiError::Unauthorized { status, message: m } => {
                assert_eq!(Some(*status as u64), expected["status"].as_u64(), "{name}: status");
                assert_eq!(Some(m.as_str()), message, "{name}: message");
            }
            other => panic!("{name}: expected Unauthorized, got {other:?}"),
        },
        "NotFound" => match err {
            ApiError::NotFound(m) => assert_eq!(Some(m.as_str()), message, "{name}: message"),
            other => panic!("{name}: expected NotFound, got {other:?}"),
        },
        "Api" => match err {
            ApiError::Api { status, message: m } => {
                assert_eq!(Some(*status as u64), expected["status"].as_u64(), "{name}: status");
                assert_eq!(Some(m.as_str()), message, "{name}: message");
            }
            other => panic!("{name}: expected Api, got {other:?}"),
        },
        other => panic!("{name}: unknown expected kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Specimens
// ---------------------------------------------------------------------------

#[test]
fn specimen_test_vectors() {
    let raw = include_str!("../../test-vectors/specimens.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = ResourceClient::<Specimens>::new(api(vectors["token"].as_str().unwrap()));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();

        let req = match operation {
            "list" => c.build_list(),
            "get" => c.build_get(id_of(case)),
            "create" => {
                let input: SpecimenInput = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_create(&input).unwrap()
            }
            "update" => {
                let input: SpecimenInput = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_update(id_of(case), &input).unwrap()
            }
            "move" => {
                let target: MoveSpecimen = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_move(id_of(case), &target).unwrap()
            }
            "delete" => c.build_delete(id_of(case)),
            other => panic!("{name}: unknown operation: {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);

        let response = simulated(case);
        let parsed: Result<Value, ApiError> = match operation {
            "list" => c.parse_list(response).map(|v| serde_json::to_value(v).unwrap()),
            "get" => c.parse_get(response).map(|v| serde_json::to_value(v).unwrap()),
            "create" => c.parse_create(response).map(|v| serde_json::to_value(v).unwrap()),
            "update" => c.parse_update(response).map(|v| serde_json::to_value(v).unwrap()),
            "move" => c.parse_move(response).map(|v| serde_json::to_value(v).unwrap()),
            _ => c.parse_delete(response).map(|()| Value::Null),
        };

        match case.get("expected_error") {
            Some(expected) => assert_error(name, &parsed.unwrap_err(), expected),
            None => {
                let parsed = parsed.unwrap();
                let expected = &case["expected_result"];
                if expected.is_array() {
                    let want: Vec<Specimen> = serde_json::from_value(expected.clone()).unwrap();
                    let got: Vec<Specimen> = serde_json::from_value(parsed).unwrap();
                    assert_eq!(got, want, "{name}: parsed result");
                } else if expected.is_null() {
                    assert!(parsed.is_null(), "{name}: parsed result");
                } else {
                    let want: Specimen = serde_json::from_value(expected.clone()).unwrap();
                    let got: Specimen = serde_json::from_value(parsed).unwrap();
                    assert_eq!(got, want, "{name}: parsed result");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Status actions
// ---------------------------------------------------------------------------

#[test]
fn status_test_vectors() {
    let raw = include_str!("../../test-vectors/status.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let token = vectors["token"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_str().unwrap();
        let expected_status = case["expected_status"].as_str().unwrap();

        match case["resource"].as_str().unwrap() {
            "services" => {
                let c = ResourceClient::<Services>::new(api(token));
                let status: ActiveStatus = status.parse().unwrap();
                let req = c.build_set_status(id_of(case), status).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                let service = c.parse_set_status(simulated(case)).unwrap();
                assert_eq!(service.status.as_str(), expected_status, "{name}: status");
            }
            "medicines" => {
                let c = ResourceClient::<Medicines>::new(api(token));
                let status: CareStatus = status.parse().unwrap();
                let req = c.build_set_status(id_of(case), status).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                let medicine = c.parse_set_status(simulated(case)).unwrap();
                assert_eq!(medicine.estado.as_str(), expected_status, "{name}: estado");
            }
            other => panic!("{name}: unknown resource: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = api("t0k3n");
        let policy = match case["policy"].as_str().unwrap() {
            "login" => AuthPolicy::Login,
            _ => AuthPolicy::Session,
        };
        let response = HttpResponse::new(case["status"].as_u64().unwrap() as u16, case["body"].as_str().unwrap());
        let err = c.parse_value(response, policy).unwrap_err();
        let expected = &case["expected"];
        assert_error(name, &err, expected);

        if let Some(cleared) = expected["session_cleared"].as_bool() {
            assert_eq!(!c.session().is_authenticated(), cleared, "{name}: session cleared");
        }
    }
}
