use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Address, CreditCard};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户及其预加载的地址、信用卡
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRelations {
    #[serde(flatten)]
    pub user: User,
    pub addresses: Vec<Address>,
    pub credit_cards: Vec<CreditCard>,
}

impl UserWithRelations {
    pub fn without_relations(user: User) -> Self {
        Self {
            user,
            addresses: Vec::new(),
            credit_cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: Option<String>,
}

/// Fields absent from a partial update keep their stored value.
/// `phone: Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<Option<String>>,
}

impl UserChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(cpf) = self.cpf {
            user.cpf = cpf;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
    }
}
