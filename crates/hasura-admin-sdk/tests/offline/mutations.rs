use super::*;

#[tokio::test]
async fn create_inserts_one_object_and_returns_row() {
    let (server, resource) = setup(
        "insert_person",
        serde_json::json!({"returning": [
            {"person_id": 9, "name": "Cy", "meta": {"city": "Rome"}, "__typename": "person"}
        ]}),
    )
    .await;

    let record = resource
        .create(params(serde_json::json!({"name": "Cy", "meta.city": "Rome"})))
        .await
        .unwrap();
    assert_eq!(record.id(), Some("9".to_string()));
    assert!(record.param("__typename").is_none());
    assert_eq!(
        serde_json::to_value(record.to_json()).unwrap(),
        serde_json::json!({
            "id": "9",
            "params": {"person_id": 9, "name": "Cy", "meta.city": "Rome"}
        })
    );

    let body = request_body(&server).await;
    assert_eq!(
        body["variables"]["objects"],
        serde_json::json!([{"name": "Cy", "meta": {"city": "Rome"}}])
    );
    let query = body["query"].as_str().unwrap();
    assert!(query.starts_with(
        "mutation insert_person($objects: [person_insert_input!]!) { insert_person(objects: $objects) { returning {"
    ));
}

#[tokio::test]
async fn create_without_returned_row_is_missing_data() {
    let (_server, resource) = setup("insert_person", serde_json::json!({"returning": []})).await;
    let err = resource
        .create(params(serde_json::json!({"name": "Cy"})))
        .await
        .unwrap_err();
    assert!(matches!(err, hasura_admin_sdk::HasuraError::MissingData(_)));
}

#[tokio::test]
async fn update_strips_typename_from_set() {
    let (server, resource) = setup(
        "update_person_by_pk",
        serde_json::json!({"person_id": 42, "name": "X", "__typename": "person"}),
    )
    .await;

    let record = resource
        .update(
            "42",
            params(serde_json::json!({"name": "X", "__typename": "person"})),
        )
        .await
        .unwrap();
    assert_eq!(record.param("name"), Some(&serde_json::json!("X")));
    assert!(record.param("__typename").is_none());

    let body = request_body(&server).await;
    assert_eq!(body["variables"]["_set"], serde_json::json!({"name": "X"}));
    assert_eq!(
        body["variables"]["pk_columns"],
        serde_json::json!({"person_id": "42"})
    );
    assert!(body["query"].as_str().unwrap().starts_with(
        "mutation update_person_by_pk($pk_columns: person_pk_columns_input!, $_set: person_set_input!)"
    ));
}

#[tokio::test]
async fn delete_targets_primary_key() {
    let (server, resource) = setup(
        "delete_person_by_pk",
        serde_json::json!({"person_id": 42, "name": "X"}),
    )
    .await;

    resource.delete("42").await.unwrap();

    let body = request_body(&server).await;
    assert_eq!(body["variables"], serde_json::json!({"person_id": "42"}));
    assert!(body["query"]
        .as_str()
        .unwrap()
        .starts_with("mutation delete_person_by_pk($person_id: bigint!)"));
}

#[tokio::test]
async fn int_primary_keys_are_sent_as_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"delete_drink_by_pk": {"id": 3, "name": "Tea"}}
        })))
        .mount(&server)
        .await;

    let drink = build_resource(ResourceOptions::new("drink", server.uri(), schema(), "id")).unwrap();
    assert_eq!(drink.pk_type(), "Int!");
    drink.delete("3").await.unwrap();

    let body = request_body(&server).await;
    assert_eq!(body["variables"], serde_json::json!({"id": 3}));
}
