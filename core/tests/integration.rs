//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives a
//! `RestClient` backed by the real `UreqExecutor`, so header merging, cookie
//! isolation, status classification and decoding are checked over actual
//! HTTP rather than against a scripted executor.

use rest_client::{
    ClientConfig, GlobalHeaders, HttpMethod, Ignore, Json, RequestBody, RestClient, RestError,
    Text, UreqExecutor,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Client-side view of a todo. The server also sends `revision`, which is
/// deliberately missing here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Todo {
    id: Uuid,
    title: String,
    completed: bool,
}

#[derive(Serialize)]
struct CreateTodo<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    init_tracing();
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
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn todo_lifecycle() {
    let base = start_server();
    let client = RestClient::new();
    let todos_url = format!("{base}/todos");

    // Step 1: list is empty.
    let todos = client.get::<Json<Vec<Todo>>>(&todos_url).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create. The response carries `revision`, which is ignored.
    let created = client
        .post_json::<Json<Todo>>(&todos_url, &CreateTodo { title: "Integration test" })
        .unwrap();
    assert_eq!(created.title, "Integration test");
    assert!(!created.completed);
    let todo_url = format!("{todos_url}/{}", created.id);

    // Step 3: fetch it back.
    let fetched = client.get::<Json<Todo>>(&todo_url).unwrap();
    assert_eq!(fetched, created);

    // Step 4: replace the title.
    let update = UpdateTodo {
        title: Some("Updated title".to_string()),
        completed: None,
    };
    let updated = client.put_json::<Json<Todo>>(&todo_url, &update).unwrap();
    assert_eq!(updated.title, "Updated title");

    // Step 5: patch completion, reading the raw JSON as text.
    let update = UpdateTodo {
        title: None,
        completed: Some(true),
    };
    let raw = client.patch_json::<Text>(&todo_url, &update).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["completed"], true);
    assert_eq!(value["revision"], 3);

    // Step 6: delete, then the resource is gone.
    client.delete(&todo_url).unwrap();
    let err = client.get::<Json<Todo>>(&todo_url).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.response_body(), Some(""));

    let err = client.delete(&todo_url).unwrap_err();
    assert!(matches!(err, RestError::Response { status: 404, .. }));
}

#[test]
fn get_text_body() {
    let base = start_server();
    let text = RestClient::new()
        .get::<Text>(&format!("{base}/status/200?body=someresponse"))
        .unwrap();
    assert_eq!(text, "someresponse");
}

#[test]
fn client_error_with_body() {
    let base = start_server();
    let err = RestClient::new()
        .delete(&format!("{base}/status/400?body=someresponse"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Server response [400]: someresponse");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.response_body(), Some("someresponse"));
}

#[test]
fn client_error_without_body() {
    let base = start_server();
    let err = RestClient::new()
        .delete(&format!("{base}/status/400"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Server response [400]: ");
}

#[test]
fn server_error_is_response_error() {
    let base = start_server();
    let err = RestClient::new()
        .post::<Ignore>(&format!("{base}/status/502?body=bad%20gateway"), "payload")
        .unwrap_err();
    assert!(err.is_response());
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.response_body(), Some("bad gateway"));
}

#[test]
fn no_content_response() {
    let base = start_server();
    let client = RestClient::new();
    let url = format!("{base}/empty");

    client.delete(&url).unwrap();
    assert_eq!(client.get::<Text>(&url).unwrap(), "");

    let err = client.get::<Json<Todo>>(&url).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn any_status_below_400_is_success() {
    let base = start_server();
    let text = RestClient::new()
        .get::<Text>(&format!("{base}/status/299?body=edge"))
        .unwrap();
    assert_eq!(text, "edge");
}

#[test]
fn malformed_json_is_decode_error() {
    let base = start_server();
    let err = RestClient::new()
        .get::<Json<Todo>>(&format!("{base}/status/200?body=not%20json"))
        .unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn bodies_reach_the_server_unchanged() {
    let base = start_server();
    let client = RestClient::new();
    let url = format!("{base}/echo/body");

    assert_eq!(client.post::<Text>(&url, "raw text").unwrap(), "raw text");
    assert_eq!(
        client.put::<Text>(&url, "ünïcödé".to_string()).unwrap(),
        "ünïcödé"
    );
    assert_eq!(
        client.patch::<Text>(&url, &b"bytes"[..]).unwrap(),
        "bytes"
    );
    assert_eq!(client.post::<Text>(&url, ()).unwrap(), "");
}

#[test]
fn every_verb_is_sent_as_named() {
    let base = start_server();
    let client = RestClient::new();
    let url = format!("{base}/echo/method");

    for method in [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
    ] {
        let echoed = client.send::<Text>(method, &url, RequestBody::Empty).unwrap();
        assert_eq!(echoed, method.as_str());
    }
    client.delete(&url).unwrap();
}

#[test]
fn default_headers_are_sent() {
    let base = start_server();
    let headers = RestClient::new()
        .get::<Json<BTreeMap<String, String>>>(&format!("{base}/echo/headers"))
        .unwrap();
    assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
    assert_eq!(headers.get("accept").map(String::as_str), Some("application/json"));
}

#[test]
fn constructor_headers_override_defaults() {
    let base = start_server();
    let client = RestClient::with_headers([("Accept", "text/plain"), ("X-Request-Source", "tests")]);
    let headers = client
        .get::<Json<BTreeMap<String, String>>>(&format!("{base}/echo/headers"))
        .unwrap();
    assert_eq!(headers.get("accept").map(String::as_str), Some("text/plain"));
    assert_eq!(headers.get("x-request-source").map(String::as_str), Some("tests"));
    assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
}

#[test]
fn cookies_do_not_leak_between_calls() {
    let base = start_server();
    let client = RestClient::new();

    let set = client.get::<Text>(&format!("{base}/cookies/set")).unwrap();
    assert_eq!(set, "cookie set");

    let echoed = client.get::<Text>(&format!("{base}/cookies/echo")).unwrap();
    assert_eq!(echoed, "", "cookie from a previous call was sent");
}

#[test]
fn cookie_set_during_redirect_is_sent_on_next_hop() {
    let base = start_server();
    let client = RestClient::new();

    let echoed = client.get::<Text>(&format!("{base}/cookies/login")).unwrap();
    assert_eq!(echoed, "session=abc123");

    let echoed = client.get::<Text>(&format!("{base}/cookies/echo")).unwrap();
    assert_eq!(echoed, "");
}

#[test]
fn see_other_turns_post_into_get() {
    let base = start_server();
    let method = RestClient::new()
        .post::<Text>(&format!("{base}/redirect/303?to=/echo/method"), "ignored")
        .unwrap();
    assert_eq!(method, "GET");
}

#[test]
fn temporary_redirect_keeps_method_and_body() {
    let base = start_server();
    let client = RestClient::new();

    let body = client
        .put::<Text>(&format!("{base}/redirect/307?to=/echo/body"), "payload")
        .unwrap();
    assert_eq!(body, "payload");

    let method = client
        .patch::<Text>(&format!("{base}/redirect/308?to=/echo/method"), "x")
        .unwrap();
    assert_eq!(method, "PATCH");
}

#[test]
fn redirect_loop_is_connect_error() {
    let base = start_server();
    let err = RestClient::new()
        .get::<Text>(&format!("{base}/loop"))
        .unwrap_err();
    assert!(err.is_connect(), "unexpected error: {err}");
    assert!(err.to_string().contains("too many redirects"));
}

#[test]
fn get_and_delete_send_a_supplied_body() {
    let base = start_server();
    let client = RestClient::new();
    let url = format!("{base}/echo/body");

    for method in [HttpMethod::Get, HttpMethod::Delete] {
        let echoed = client
            .send::<Text>(method, &url, RequestBody::from("query payload"))
            .unwrap();
        assert_eq!(echoed, "query payload", "{method}");
    }
    assert_eq!(client.get::<Text>(&url).unwrap(), "");
}

#[test]
fn concurrent_calls_share_one_client() {
    let base = start_server();
    let client = RestClient::new();
    let url = format!("{base}/status/200?body=ok");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..5 {
                    assert_eq!(client.get::<Text>(&url).unwrap(), "ok");
                }
            });
        }
    });
}

#[test]
fn refused_connection_is_connect_error() {
    init_tracing();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let err = RestClient::new()
        .get::<Text>(&format!("http://{addr}/"))
        .unwrap_err();
    assert!(err.is_connect(), "unexpected error: {err}");
    assert_eq!(err.status(), None);
}

#[test]
fn malformed_url_is_connect_error() {
    let err = RestClient::new().delete("not a url").unwrap_err();
    assert!(err.is_connect());
}

#[test]
fn configured_client_talks_to_server() {
    let base = start_server();
    let config: ClientConfig =
        serde_json::from_str(r#"{"headers":{"X-Api-Key":"secret"},"timeout_secs":5}"#).unwrap();
    let headers = RestClient::from_config(&config)
        .get::<Json<BTreeMap<String, String>>>(&format!("{base}/echo/headers"))
        .unwrap();
    assert_eq!(headers.get("x-api-key").map(String::as_str), Some("secret"));
}

#[test]
fn explicit_executor_and_headers() {
    let base = start_server();
    let client = RestClient::with_executor(
        UreqExecutor::default(),
        GlobalHeaders::new([("Content-Type", "text/plain")]),
    );
    let headers = client
        .get::<Json<BTreeMap<String, String>>>(&format!("{base}/echo/headers"))
        .unwrap();
    assert_eq!(headers.get("content-type").map(String::as_str), Some("text/plain"));
}
