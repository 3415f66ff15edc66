//! Integration tests for lazy relations and pagination.

use graycrm::resources::{Contact, Flag, Tag};
use graycrm::rest::{Filters, Resource};
use graycrm::{ApiKey, Client, GrayCrmConfig, Host};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = GrayCrmConfig::builder()
        .host(Host::new(server.uri()).unwrap())
        .api_key(ApiKey::new("gcrm_test_key").unwrap())
        .build()
        .unwrap();
    Client::new(config)
}

fn list_body(ids: &[&str], pagination: serde_json::Value) -> serde_json::Value {
    let data: Vec<_> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({"data": data, "pagination": pagination})
}

// ============================================================================
// Laziness and Memoization
// ============================================================================

#[tokio::test]
async fn test_relation_is_lazy_and_memoized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("per_page", "25"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(&["a", "b"], json!({"total": 40}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contacts = Contact::all(&client);
    assert!(server.received_requests().await.unwrap().is_empty());

    assert_eq!(contacts.items().await.unwrap().len(), 2);
    assert_eq!(contacts.count().await.unwrap(), 40);
    assert_eq!(contacts.collection().await.unwrap()[1].id().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_derived_relations_do_not_share_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["t1"], json!({}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .and(query_param("per_page", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["t1", "t2"], json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all = Tag::all(&client);
    assert_eq!(all.count().await.unwrap(), 2);

    let small = all.per(10);
    assert_eq!(small.count().await.unwrap(), 1);
    assert_eq!(all.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_failed_request_is_not_memoized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["t1"], json!({}))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tags = Tag::all(&client);
    assert!(tags.items().await.is_err());
    assert_eq!(tags.items().await.unwrap().len(), 1);
}

// ============================================================================
// Query Parameters
// ============================================================================

#[tokio::test]
async fn test_filters_are_expanded_into_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("flag_key", "vip"))
        .and(query_param("flag_value", "true"))
        .and(query_param("tag", "customer"))
        .and(query_param("q[company]", "Acme"))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[], json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let relation = Contact::filter(
        &client,
        Filters::new().flag("vip", Some("true")).tag("customer"),
    )
    .filter(Filters::new().query("company", "Acme"))
    .page(3)
    .per(50);

    assert!(relation.items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cursor_suppresses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["x"], json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    Contact::page(&client, 2).cursor("abc").items().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "page"));
}

#[tokio::test]
async fn test_first_requests_a_single_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("per_page", "1"))
        .and(query_param("q[last_name]", "Doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["d1"], json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = Contact::find_by(&client, Filters::new().query("last_name", "Doe"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id().as_deref(), Some("d1"));
}

#[tokio::test]
async fn test_first_on_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[], json!({}))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(Tag::all(&client).first().await.unwrap().is_none());
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_cursor_pages_are_walked_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            &["c", "d"],
            json!({"next_cursor": null, "has_more": false}),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            &["a", "b"],
            json!({"next_cursor": "c2", "has_more": true}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut pages = Contact::per(&client, 2).pages();

    let first = pages.next().await.unwrap().unwrap();
    assert!(first.has_more());
    assert_eq!(first.next_cursor(), Some("c2"));

    let second = pages.next().await.unwrap().unwrap();
    let ids: Vec<_> = second.iter().filter_map(Resource::id).collect();
    assert_eq!(ids, vec!["c", "d"]);
    assert!(!second.has_more());

    assert!(pages.next().await.is_none());
}

#[tokio::test]
async fn test_offset_pages_are_collected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            &["t3"],
            json!({"page": 2, "total_pages": 2, "total": 3}),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            &["t1", "t2"],
            json!({"page": 1, "total_pages": 2, "total": 3}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tags = Tag::all(&client).pages().collect_items().await.unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[2].id().as_deref(), Some("t3"));
}

#[tokio::test]
async fn test_next_page_on_last_page_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            &["t1"],
            json!({"page": 1, "total_pages": 1}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tags = Tag::all(&client);
    let page = tags.collection().await.unwrap();
    assert!(page.next_page().await.unwrap().is_none());
}

// ============================================================================
// Nested Relations
// ============================================================================

#[tokio::test]
async fn test_nested_records_carry_their_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts/abc/flags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(&["f1"], json!({"total": 1}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contact = Contact::from_value(json!({"id": "abc"}));
    let flags = contact.flags(&client).unwrap();
    assert!(flags.is_nested());

    let flag: Flag = flags.items().await.unwrap().remove(0);
    assert_eq!(flag.base_path(), Some("/contacts/abc/flags"));
    assert_eq!(flag.instance_path("reload").unwrap(), "/contacts/abc/flags/f1");
}

#[tokio::test]
async fn test_nested_create_posts_to_the_nested_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/contacts/abc/taggings"))
        .and(body_json(json!({"tag": {"name": "vip"}})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "t9", "name": "vip"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contact = Contact::from_value(json!({"id": "abc"}));
    let tag = contact
        .tags(&client)
        .unwrap()
        .create_strict(json!({"name": "vip"}))
        .await
        .unwrap();

    assert_eq!(tag.name().as_deref(), Some("vip"));
    assert_eq!(tag.base_path(), Some("/contacts/abc/taggings"));
    assert!(!tag.is_changed());
}

#[tokio::test]
async fn test_nested_relation_requires_a_saved_parent() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    assert!(Contact::new().flags(&client).is_err());
}

#[tokio::test]
async fn test_find_on_nested_relation_uses_the_canonical_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flags/f1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "f1", "key": "vip"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contacts/abc/flags/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "f1"}})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contact = Contact::from_value(json!({"id": "abc"}));
    let flag = contact.flags(&client).unwrap().find("f1").await.unwrap();

    assert_eq!(flag.key().as_deref(), Some("vip"));
    assert!(flag.base_path().is_none());
}

#[tokio::test]
async fn test_first_bypasses_the_memoized_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&["t1"], json!({}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .and(query_param("per_page", "25"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(&["t1", "t2", "t3"], json!({}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tags = Tag::all(&client);
    assert_eq!(tags.collection().await.unwrap().len(), 3);

    let first = tags.first().await.unwrap().unwrap();
    assert_eq!(first.id().as_deref(), Some("t1"));
    assert_eq!(tags.count().await.unwrap(), 3);
}
