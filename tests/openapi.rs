mod common;

use axum::http::{Method, StatusCode};
use ecommerce_api::config::Config;
use serde_json::json;

use common::{send, test_app, test_app_with};

#[tokio::test]
async fn document_lists_every_route_and_status() {
    let app = test_app();

    let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));

    let expected: &[(&str, &str, &[&str])] = &[
        ("/users", "get", &["200"]),
        ("/users", "post", &["201", "400"]),
        ("/users/{id}", "get", &["200", "404"]),
        ("/users/{id}", "patch", &["200", "400", "404"]),
        ("/users/{id}", "delete", &["204", "404"]),
        ("/addresses", "get", &["200"]),
        ("/addresses", "post", &["201", "400"]),
        ("/addresses/{id}", "get", &["200", "404"]),
        ("/addresses/{id}", "patch", &["200", "400", "404"]),
        ("/addresses/{id}", "delete", &["204", "404"]),
        ("/credit-cards", "get", &["200"]),
        ("/credit-cards", "post", &["201", "400"]),
        ("/credit-cards/{id}", "get", &["200", "404"]),
        ("/credit-cards/{id}", "patch", &["200", "400", "404"]),
        ("/credit-cards/{id}", "delete", &["204", "404"]),
    ];

    for (path, method, statuses) in expected {
        let responses = &doc["paths"][path][method]["responses"];
        assert!(responses.is_object(), "{method} {path} is not documented");
        for status in *statuses {
            assert!(
                responses.get(status).is_some(),
                "{method} {path} is missing {status}"
            );
        }
    }

    let paths = doc["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 6);
}

#[tokio::test]
async fn schemas_describe_request_and_response_bodies() {
    let app = test_app();
    let (_, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    let schemas = &doc["components"]["schemas"];

    for name in [
        "CreateUserRequest",
        "UpdateUserRequest",
        "UserWithRelations",
        "CreateAddressRequest",
        "Address",
        "CreateCreditCardRequest",
        "CreditCard",
        "ErrorResponse",
    ] {
        assert!(schemas[name].is_object(), "missing schema {name}");
    }
    assert!(schemas["CreditCard"]["properties"]["number"].is_object());
}

#[tokio::test]
async fn base_uri_is_published_as_the_server() {
    let config = Config {
        api_base_uri: "/api".to_string(),
        ..Config::default()
    };
    let app = test_app_with(config);

    let (status, doc) = send(&app, Method::GET, "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["servers"], json!([{"url": "/api"}]));
    assert!(doc["paths"]["/users"].is_object());
}
