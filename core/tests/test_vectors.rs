//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse outcomes. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use restful_db_core::{
    ClientConfig, DatabaseClient, DbError, HttpMethod, HttpResponse, Record, Snapshot, Target,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> DatabaseClient {
    DatabaseClient::with_config("proj", &ClientConfig::new(BASE_URL)).unwrap()
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

fn parse_target(case: &Value) -> Target<'_> {
    let target = &case["target"];
    match (target["list"].as_str(), target["id"].as_str()) {
        (None, _) => Target::Database,
        (Some(list), None) => Target::List(list),
        (Some(list), Some(id)) => Target::Record(list, id),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error(name: &str, err: DbError, expected: &str) {
    let matched = match expected {
        "RemoteFault" => matches!(err, DbError::RemoteFault { .. }),
        "Deserialization" => matches!(err, DbError::Deserialization(_)),
        "Unknown" => matches!(err, DbError::Unknown(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[test]
fn fetch_test_vectors() {
    let raw = include_str!("../../test-vectors/fetch.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let target = parse_target(case);
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_fetch(target).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let response = simulated_response(case);
        match target {
            Target::Database => match case.get("expected_error") {
                Some(expected) => {
                    let err = c.parse_snapshot(response).unwrap_err();
                    assert_error(name, err, expected.as_str().unwrap());
                }
                None => {
                    let snapshot = c.parse_snapshot(response).unwrap();
                    let expected: Snapshot =
                        serde_json::from_value(case["expected_result"].clone()).unwrap();
                    assert_eq!(snapshot, expected, "{name}: parsed result");
                }
            },
            Target::List(_) => match case.get("expected_error") {
                Some(expected) => {
                    let err = c.parse_list(response).unwrap_err();
                    assert_error(name, err, expected.as_str().unwrap());
                }
                None => {
                    let records = c.parse_list(response).unwrap();
                    let expected: Vec<Record> =
                        serde_json::from_value(case["expected_result"].clone()).unwrap();
                    assert_eq!(records, expected, "{name}: parsed result");
                }
            },
            Target::Record(..) => {
                let record = c.parse_record(response);
                let expected: Option<Record> =
                    serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(record, expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Create / replace / update
// ---------------------------------------------------------------------------

#[test]
fn write_test_vectors() {
    let raw = include_str!("../../test-vectors/write.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let list = case["list"].as_str().unwrap();
        let id = case["id"].as_str();
        let input = &case["input"];
        let expected_req = &case["expected_request"];

        // Verify build
        let req = match case["operation"].as_str().unwrap() {
            "create" => c.build_create(list, input),
            "replace" => c.build_replace(list, id.unwrap(), input),
            "update" => c.build_update(list, id.unwrap(), input),
            other => panic!("{name}: unknown operation: {other}"),
        }
        .unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let result = c.parse_written(simulated_response(case));
        match case.get("expected_error") {
            Some(expected) => assert_error(name, result.unwrap_err(), expected.as_str().unwrap()),
            None => {
                let expected: Record =
                    serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_delete(parse_target(case)).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_delete(simulated_response(case));
        match case.get("expected_error") {
            Some(expected) => assert_error(name, result.unwrap_err(), expected.as_str().unwrap()),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
