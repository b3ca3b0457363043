use super::*;

fn properties_json(resource: &str) -> serde_json::Value {
    let config = config_file();
    let output = hasura_admin()
        .args(["--endpoint", "http://127.0.0.1:9/v1/graphql"])
        .arg("--schema")
        .arg(schema_path())
        .arg("--config")
        .arg(config.path())
        .args(["--format", "json", "properties", resource])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn properties_list_references_before_columns() {
    let rows = properties_json("person");
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["favorite_drink_id", "born_at", "meta", "name", "person_id", "tags"]
    );

    assert_eq!(rows[0]["type"], "reference");
    assert_eq!(rows[0]["reference"], "drink");
    assert_eq!(rows[1]["type"], "datetime");
    assert_eq!(rows[2]["type"], "object");
    assert_eq!(rows[4]["required"], true);
    assert_eq!(rows[4]["editable"], false);
    assert_eq!(rows[5]["array"], true);
    assert_eq!(rows[5]["editable"], false);
}

#[test]
fn unconfigured_fields_default_to_id_key() {
    let rows = properties_json("drink");
    assert_eq!(rows[0]["name"], "id");
    assert_eq!(rows[0]["type"], "number");
    assert_eq!(rows[0]["editable"], false);
    assert_eq!(rows[1]["name"], "name");
    assert_eq!(rows[1]["sortable"], true);
}

#[test]
fn unknown_resource_is_a_schema_error() {
    hasura_admin()
        .args(["--endpoint", "http://127.0.0.1:9/v1/graphql"])
        .arg("--schema")
        .arg(schema_path())
        .args(["properties", "animal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("animal"));
}

#[test]
fn resources_lists_config_entries() {
    let config = config_file();
    hasura_admin()
        .arg("--config")
        .arg(config.path())
        .args(["--format", "human", "resources"])
        .assert()
        .success()
        .stdout(predicate::str::contains("person_id"))
        .stdout(predicate::str::contains("drink -> drink.favorite_drink_id"));
}

#[test]
fn resources_without_config_is_empty() {
    hasura_admin()
        .args(["--format", "json", "resources"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
