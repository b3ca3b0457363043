use super::*;
use hasura_admin_sdk::{Filter, FindOptions, HasuraError, PropertyType, Sort, SortDirection};

// ── Properties ──────────────────────────────────────────────────────────────

#[test]
fn properties_merge_relationships_and_columns() {
    let resource = person("http://localhost:8080/v1/graphql");
    let props = resource.properties();
    let names: Vec<&str> = props.iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec!["favorite_drink_id", "born_at", "meta", "name", "person_id", "tags"]
    );

    let drink = resource.property("favorite_drink_id").unwrap();
    assert_eq!(drink.property_type(), PropertyType::Reference);
    assert_eq!(drink.reference(), Some("drink"));

    let born_at = resource.property("born_at").unwrap();
    assert_eq!(born_at.property_type(), PropertyType::Datetime);
    assert!(!born_at.is_required());

    let person_id = resource.property("person_id").unwrap();
    assert!(person_id.is_id());
    assert!(person_id.is_required());
    assert!(!person_id.is_editable());

    assert!(resource.property("tags").unwrap().is_array());
    assert_eq!(
        resource.property("meta").unwrap().property_type(),
        PropertyType::Object
    );
    assert!(resource.property("drink").is_none());
}

#[test]
fn resource_metadata() {
    let resource = person("http://localhost:8080/v1/graphql");
    assert_eq!(resource.id(), "person");
    assert_eq!(resource.name(), "person");
    assert_eq!(resource.database_name(), "Hasura");
    assert_eq!(resource.database_type(), "hasura");
    assert_eq!(resource.pk_type(), "bigint!");
}

// ── find ────────────────────────────────────────────────────────────────────

fn column_filter(resource: &Resource, path: &str, value: Value) -> Filter {
    Filter::new(path, value).with_property(resource.property(path).unwrap())
}

#[tokio::test]
async fn find_sends_pagination_sort_and_filters() {
    let (server, resource) = setup("person", serde_json::json!([])).await;
    let filters = vec![
        column_filter(&resource, "name", serde_json::json!("Ann")),
        column_filter(&resource, "person_id", serde_json::json!([1, 2])),
        column_filter(
            &resource,
            "born_at",
            serde_json::json!({"from": "2020-01-01", "to": "2020-02-01"}),
        ),
        column_filter(&resource, "meta", Value::Null),
        // Not a column of person.
        Filter::new("nickname", serde_json::json!("Bo")),
    ];
    let options = FindOptions::default()
        .limit(25)
        .offset(50)
        .sort(Sort::by("name", SortDirection::Desc));

    let records = resource.find(&filters, options).await.unwrap();
    assert!(records.is_empty());

    let body = request_body(&server).await;
    assert_eq!(body["variables"]["limit"], 25);
    assert_eq!(body["variables"]["offset"], 50);
    assert_eq!(
        body["variables"]["order_by"],
        serde_json::json!([{"name": "desc"}])
    );
    assert_eq!(
        body["variables"]["where"],
        serde_json::json!({
            "name": {"_eq": "Ann"},
            "person_id": {"_in": [1, 2]},
            "born_at": {
                "_gte": "2020-01-01T00:00:00.000Z",
                "_lte": "2020-02-01T00:00:00.000Z"
            }
        })
    );

    let query = body["query"].as_str().unwrap();
    assert!(query.starts_with(
        "query person($limit: Int, $offset: Int, $order_by: [person_order_by!], $where: person_bool_exp)"
    ));
    assert!(query.contains("{ favorite_drink_id born_at meta name person_id }"));
    assert!(!query.contains("tags"));
}

#[tokio::test]
async fn find_wraps_rows_without_typename() {
    let (_server, resource) = setup(
        "person",
        serde_json::json!([
            {"person_id": 1, "name": "Ann", "meta": {"city": "Oslo"}, "__typename": "person"},
            {"person_id": 2, "name": "Bo", "meta": null, "__typename": "person"}
        ]),
    )
    .await;

    let records = resource.find(&[], FindOptions::default()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), Some("1".to_string()));
    assert_eq!(records[0].param("meta.city"), Some(&serde_json::json!("Oslo")));
    assert!(records[0].param("__typename").is_none());
    assert_eq!(records[1].param("name"), Some(&serde_json::json!("Bo")));
    assert_eq!(records[1].resource_id(), "person");
}

#[tokio::test]
async fn find_without_options_leaves_pagination_to_backend() {
    let (server, resource) = setup("person", serde_json::json!([])).await;
    let options = FindOptions {
        limit: None,
        offset: None,
        sort: None,
    };
    resource.find(&[], options).await.unwrap();

    let body = request_body(&server).await;
    assert_eq!(body["variables"], serde_json::json!({}));
    assert!(body["query"]
        .as_str()
        .unwrap()
        .starts_with("query person { person { "));
}

// ── find_one / find_many ────────────────────────────────────────────────────

#[tokio::test]
async fn find_one_looks_up_by_primary_key() {
    let (server, resource) = setup(
        "person_by_pk",
        serde_json::json!({"person_id": 42, "name": "Ann", "__typename": "person"}),
    )
    .await;

    let record = resource.find_one("42").await.unwrap();
    assert_eq!(record.id(), Some("42".to_string()));
    assert!(record.param("__typename").is_none());

    let body = request_body(&server).await;
    assert_eq!(body["variables"], serde_json::json!({"person_id": "42"}));
    assert!(body["query"]
        .as_str()
        .unwrap()
        .starts_with("query person_by_pk($person_id: bigint!) { person_by_pk(person_id: $person_id) {"));
}

#[tokio::test]
async fn find_one_without_match_is_empty_record() {
    let (_server, resource) = setup("person_by_pk", Value::Null).await;
    let record = resource.find_one("404").await.unwrap();
    assert!(record.is_empty());
    assert_eq!(record.id(), None);
}

#[tokio::test]
async fn find_many_filters_by_id_list() {
    let (server, resource) = setup(
        "person",
        serde_json::json!([{"person_id": 3}, {"person_id": 1}]),
    )
    .await;

    let ids = vec!["1".to_string(), "3".to_string()];
    let records = resource.find_many(&ids).await.unwrap();
    // Backend order is kept.
    let got: Vec<Option<String>> = records.iter().map(|r| r.id()).collect();
    assert_eq!(got, vec![Some("3".to_string()), Some("1".to_string())]);

    let body = request_body(&server).await;
    assert_eq!(
        body["variables"]["where"],
        serde_json::json!({"person_id": {"_in": ["1", "3"]}})
    );
}

#[tokio::test]
async fn find_many_without_ids_sends_empty_in() {
    let (server, resource) = setup("person", serde_json::json!([])).await;

    let records = resource.find_many(&[]).await.unwrap();
    assert!(records.is_empty());

    let body = request_body(&server).await;
    assert_eq!(
        body["variables"]["where"],
        serde_json::json!({"person_id": {"_in": []}})
    );
}

#[tokio::test]
async fn find_many_with_unknown_ids_is_empty() {
    let (server, resource) = setup("person", serde_json::json!([])).await;

    let ids = vec!["404".to_string()];
    let records = resource.find_many(&ids).await.unwrap();
    assert!(records.is_empty());

    let body = request_body(&server).await;
    assert_eq!(
        body["variables"]["where"],
        serde_json::json!({"person_id": {"_in": ["404"]}})
    );
}

// ── count ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn count_sends_filters_only() {
    let (server, resource) = setup(
        "person_aggregate",
        serde_json::json!({"aggregate": {"count": 7}}),
    )
    .await;

    let count = resource
        .count(&[column_filter(&resource, "name", serde_json::json!("Ann"))])
        .await
        .unwrap();
    assert_eq!(count, 7);

    let body = request_body(&server).await;
    assert_eq!(
        body["variables"],
        serde_json::json!({"where": {"name": {"_eq": "Ann"}}})
    );
    assert!(body["query"]
        .as_str()
        .unwrap()
        .contains("{ aggregate { count } }"));
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn graphql_errors_propagate_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{"message": "field 'person' not found in type: 'query_root'"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resource = person(&server.uri());
    let err = resource.count(&[]).await.unwrap_err();
    assert!(err.is_transport());
    match err {
        HasuraError::GraphQL {
            errors,
            operation_name,
        } => {
            assert_eq!(errors[0].message, "field 'person' not found in type: 'query_root'");
            assert_eq!(operation_name.as_deref(), Some("person_aggregate"));
        }
        other => panic!("Expected GraphQL, got {:?}", other),
    }
}

#[tokio::test]
async fn http_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let resource = person(&server.uri());
    let err = resource.find_one("1").await.unwrap_err();
    assert!(matches!(err, HasuraError::HttpError { status: 503, .. }));
}
