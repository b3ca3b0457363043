use super::*;
use std::process::Output;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_endpoint(data_path: &str, payload: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains(data_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { data_path: payload }
        })))
        .mount(&server)
        .await;
    server
}

/// Run the CLI off the async runtime so the mock server keeps serving.
async fn run_records(server: &MockServer, args: &[&str]) -> Output {
    let config = config_file();
    let mut cmd = hasura_admin();
    cmd.args(["--endpoint", &server.uri()])
        .arg("--schema")
        .arg(schema_path())
        .arg("--config")
        .arg(config.path())
        .args(["--format", "json", "records"])
        .args(args);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    drop(config);
    output
}

async fn sent_variables(server: &MockServer) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    body["variables"].clone()
}

#[tokio::test]
async fn list_prints_records_and_sends_filters() {
    let server = mock_endpoint(
        "person",
        serde_json::json!([
            {"person_id": 1, "name": "Ann", "meta": {"city": "Oslo"}, "__typename": "person"}
        ]),
    )
    .await;

    let output = run_records(
        &server,
        &[
            "list",
            "person",
            "--limit",
            "5",
            "--sort-by",
            "name",
            "--direction",
            "desc",
            "--filter",
            "person_id=[1,2]",
            "--filter",
            r#"born_at={"from":"2020-01-01"}"#,
        ],
    )
    .await;
    output.clone().assert().success();

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        printed,
        serde_json::json!([
            {"id": "1", "params": {"person_id": 1, "name": "Ann", "meta.city": "Oslo"}}
        ])
    );

    let variables = sent_variables(&server).await;
    assert_eq!(variables["limit"], 5);
    assert_eq!(variables["offset"], 0);
    assert_eq!(variables["order_by"], serde_json::json!([{"name": "desc"}]));
    assert_eq!(
        variables["where"],
        serde_json::json!({
            "person_id": {"_in": [1, 2]},
            "born_at": {"_gte": "2020-01-01T00:00:00.000Z"}
        })
    );
}

#[tokio::test]
async fn count_prints_total() {
    let server = mock_endpoint(
        "person_aggregate",
        serde_json::json!({"aggregate": {"count": 3}}),
    )
    .await;

    run_records(&server, &["count", "person", "--filter", "name=Ann"])
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 3"));

    assert_eq!(
        sent_variables(&server).await,
        serde_json::json!({"where": {"name": {"_eq": "Ann"}}})
    );
}

#[tokio::test]
async fn text_filters_keep_raw_text_and_unknown_fields_are_ignored() {
    let server = mock_endpoint(
        "person_aggregate",
        serde_json::json!({"aggregate": {"count": 0}}),
    )
    .await;

    run_records(
        &server,
        &["count", "person", "--filter", "name=123", "--filter", "nickname=x"],
    )
    .await
    .assert()
    .success();

    assert_eq!(
        sent_variables(&server).await,
        serde_json::json!({"where": {"name": {"_eq": "123"}}})
    );
}

#[tokio::test]
async fn create_keeps_numeric_looking_text() {
    let server = mock_endpoint(
        "insert_person",
        serde_json::json!({"returning": [{"person_id": 8, "name": "007"}]}),
    )
    .await;

    run_records(&server, &["create", "person", "--set", "name=007"])
        .await
        .assert()
        .success();

    assert_eq!(
        sent_variables(&server).await["objects"],
        serde_json::json!([{"name": "007"}])
    );
}

#[tokio::test]
async fn read_missing_record_fails() {
    let server = mock_endpoint("person_by_pk", serde_json::Value::Null).await;

    run_records(&server, &["read", "person", "404"])
        .await
        .assert()
        .failure()
        .stderr(predicate::str::contains("No person with person_id = 404"));
}

#[tokio::test]
async fn create_sends_nested_values() {
    let server = mock_endpoint(
        "insert_person",
        serde_json::json!({"returning": [{"person_id": 7, "name": "Cy", "meta": {"city": "Rome"}}]}),
    )
    .await;

    run_records(
        &server,
        &["create", "person", "--set", "name=Cy", "--set", "meta.city=Rome"],
    )
    .await
    .assert()
    .success()
    .stdout(predicate::str::contains("\"id\": \"7\""));

    assert_eq!(
        sent_variables(&server).await["objects"],
        serde_json::json!([{"name": "Cy", "meta": {"city": "Rome"}}])
    );
}

#[tokio::test]
async fn delete_reports_deleted_id() {
    let server = mock_endpoint("delete_drink_by_pk", serde_json::json!({"id": 3})).await;

    run_records(&server, &["delete", "drink", "3"])
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\": true"));

    assert_eq!(sent_variables(&server).await, serde_json::json!({"id": 3}));
}

#[tokio::test]
async fn graphql_errors_exit_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{"message": "check constraint violated"}]
        })))
        .mount(&server)
        .await;

    run_records(&server, &["update", "person", "1", "--set", "name=X"])
        .await
        .assert()
        .failure()
        .stderr(predicate::str::contains("check constraint violated"));
}
