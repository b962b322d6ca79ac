mod handler;
mod model;

use utoipa::OpenApi;

use crate::models::{User, UserWithRelations};

pub use handler::{create_user, delete_user, get_user, list_users, update_user};
pub use model::{CreateUserRequest, UpdateUserRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::create_user,
        handler::list_users,
        handler::get_user,
        handler::update_user,
        handler::delete_user,
    ),
    components(schemas(CreateUserRequest, UpdateUserRequest, User, UserWithRelations))
)]
pub struct UserApi;
