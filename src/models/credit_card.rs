use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::utils::mask_card_number;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct CreditCard {
    pub id: i64,
    pub user_id: i64,
    pub holder_name: String,
    #[serde(serialize_with = "serialize_masked")]
    #[schema(example = "**** **** **** 1111")]
    pub number: String,
    pub expiration: String,
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 卡号永远不以明文返回
fn serialize_masked<S: Serializer>(number: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&mask_card_number(number))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreditCard {
    pub user_id: i64,
    pub holder_name: String,
    pub number: String,
    pub expiration: String,
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditCardChanges {
    pub user_id: Option<i64>,
    pub holder_name: Option<String>,
    pub number: Option<String>,
    pub expiration: Option<String>,
    pub brand: Option<Option<String>>,
}

impl CreditCardChanges {
    pub fn apply_to(self, card: &mut CreditCard) {
        if let Some(user_id) = self.user_id {
            card.user_id = user_id;
        }
        if let Some(holder_name) = self.holder_name {
            card.holder_name = holder_name;
        }
        if let Some(number) = self.number {
            card.number = number;
        }
        if let Some(expiration) = self.expiration {
            card.expiration = expiration;
        }
        if let Some(brand) = self.brand {
            card.brand = brand;
        }
    }
}
