use utoipa::OpenApi;
use utoipa::openapi::{self, server::Server};

use super::{address::AddressApi, credit_card::CreditCardApi, user::UserApi};
use crate::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "E-commerce API",
        description = "Users with their delivery addresses and credit cards."
    ),
    tags(
        (name = "users", description = "Users, returned with their addresses and credit cards"),
        (name = "addresses", description = "Delivery addresses owned by a user"),
        (name = "credit-cards", description = "Credit cards owned by a user; numbers are always masked"),
    ),
    components(schemas(ErrorResponse))
)]
struct ApiDoc;

/// OpenAPI 文档；设置了 base URI 时作为唯一 server 写入
pub fn document(base_uri: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(UserApi::openapi());
    doc.merge(AddressApi::openapi());
    doc.merge(CreditCardApi::openapi());

    if !base_uri.is_empty() {
        doc.servers = Some(vec![Server::new(base_uri)]);
    }
    doc
}
