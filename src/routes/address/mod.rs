mod handler;
mod model;

use utoipa::OpenApi;

use crate::models::Address;

pub use handler::{create_address, delete_address, get_address, list_addresses, update_address};
pub use model::{CreateAddressRequest, UpdateAddressRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::create_address,
        handler::list_addresses,
        handler::get_address,
        handler::update_address,
        handler::delete_address,
    ),
    components(schemas(CreateAddressRequest, UpdateAddressRequest, Address))
)]
pub struct AddressApi;
