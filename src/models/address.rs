use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub user_id: i64,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub user_id: Option<i64>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<Option<String>>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl AddressChanges {
    pub fn apply_to(self, address: &mut Address) {
        if let Some(user_id) = self.user_id {
            address.user_id = user_id;
        }
        if let Some(street) = self.street {
            address.street = street;
        }
        if let Some(number) = self.number {
            address.number = number;
        }
        if let Some(complement) = self.complement {
            address.complement = complement;
        }
        if let Some(neighborhood) = self.neighborhood {
            address.neighborhood = neighborhood;
        }
        if let Some(city) = self.city {
            address.city = city;
        }
        if let Some(state) = self.state {
            address.state = state;
        }
        if let Some(zip_code) = self.zip_code {
            address.zip_code = zip_code;
        }
    }
}
