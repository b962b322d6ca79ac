mod common;

use axum::http::{Method, StatusCode};
use ecommerce_api::config::Config;
use serde_json::json;

use common::{address_body, create_user, send, send_raw, test_app, test_app_with};

#[tokio::test]
async fn user_lifecycle_end_to_end() {
    let app = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com", "cpf": "111"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["email"], "a@x.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com", "cpf": "222"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This email is already registered."}));

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["addresses"], json!([]));
    assert_eq!(body["credit_cards"], json!([]));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(json!({"email": "b@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "b@x.com");
    assert_eq!(body["cpf"], "111");

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found."}));
}

#[tokio::test]
async fn duplicate_email_does_not_create_a_row() {
    let app = test_app();
    create_user(&app, "a@x.com", "111").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com", "cpf": "999"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, users) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_cpf_is_rejected_on_create() {
    let app = test_app();
    create_user(&app, "a@x.com", "111").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "other@x.com", "cpf": "111"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This CPF is already registered."}));
}

#[tokio::test]
async fn invalid_payload_returns_field_errors() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"email": "nope"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["email"], json!(["Enter a valid email address."]));
    assert_eq!(body["cpf"], json!(["This field is required."]));
}

#[tokio::test]
async fn numbers_are_accepted_for_text_fields() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com", "cpf": 111}))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["cpf"], "111");

    let id = body["id"].as_i64().unwrap();
    let (status, body) = send(&app, Method::PATCH, &format!("/users/{id}"), Some(json!({"phone": 11987654321_u64}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["phone"], "11987654321");
}

#[tokio::test]
async fn wrong_field_types_are_reported_per_field() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": ["a@x.com"], "cpf": {"n": 1}, "name": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "email": ["Not a valid string."],
            "cpf": ["Not a valid string."],
            "name": ["Not a valid string."],
        })
    );

    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"email": 123, "cpf": "111"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"email": ["Enter a valid email address."]}));
}

#[tokio::test]
async fn non_object_body_is_a_non_field_error() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/users", Some(json!(["a@x.com", "111"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got array."]})
    );
}

#[tokio::test]
async fn unparsable_json_is_a_bad_request() {
    let app = test_app();

    let (status, body) = send_raw(&app, Method::POST, "/users", r#"{"email": "a@x.com","#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
    assert_eq!(body.as_object().map(|o| o.len()), Some(1));

    let id = create_user(&app, "a@x.com", "111").await;
    let (status, body) = send_raw(&app, Method::PATCH, &format!("/users/{id}"), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn non_integer_ids_are_not_found() {
    let app = test_app();

    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(json!({"name": "x"}))),
        (Method::DELETE, None),
    ] {
        let (status, body) = send(&app, method.clone(), "/users/abc", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body, json!({"error": "User not found."}));
    }
}

#[tokio::test]
async fn list_is_empty_then_includes_nested_children() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let id = create_user(&app, "a@x.com", "111").await;
    let (status, _) = send(&app, Method::POST, "/addresses", Some(address_body(id))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["addresses"].as_array().unwrap().len(), 1);
    assert_eq!(users[0]["addresses"][0]["city"], "São Paulo");
}

#[tokio::test]
async fn patch_email_conflicts_only_with_other_users() {
    let app = test_app();
    let first = create_user(&app, "a@x.com", "111").await;
    create_user(&app, "b@x.com", "222").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{first}"),
        Some(json!({"email": "b@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This email is already registered."}));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{first}"),
        Some(json!({"email": "a@x.com", "name": "Ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
}

#[tokio::test]
async fn patch_cpf_conflict_is_reported_by_the_store() {
    let app = test_app();
    let first = create_user(&app, "a@x.com", "111").await;
    create_user(&app, "b@x.com", "222").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{first}"),
        Some(json!({"cpf": "222"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This CPF is already registered."}));
}

#[tokio::test]
async fn patch_and_delete_unknown_user_return_not_found() {
    let app = test_app();

    let (status, _) = send(&app, Method::PATCH, "/users/42", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_user_removes_its_addresses() {
    let app = test_app();
    let id = create_user(&app, "a@x.com", "111").await;
    let (_, address) = send(&app, Method::POST, "/addresses", Some(address_body(id))).await;
    let address_id = address["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/addresses/{address_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn routes_are_mounted_under_the_base_uri() {
    let config = Config {
        api_base_uri: "/api".to_string(),
        ..Config::default()
    };
    let app = test_app_with(config);

    let (status, _) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
