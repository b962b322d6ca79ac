mod handler;
mod model;

use utoipa::OpenApi;

use crate::models::CreditCard;

pub use handler::{
    create_credit_card, delete_credit_card, get_credit_card, list_credit_cards, update_credit_card,
};
pub use model::{CreateCreditCardRequest, UpdateCreditCardRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::create_credit_card,
        handler::list_credit_cards,
        handler::get_credit_card,
        handler::update_credit_card,
        handler::delete_credit_card,
    ),
    components(schemas(CreateCreditCardRequest, UpdateCreditCardRequest, CreditCard))
)]
pub struct CreditCardApi;
