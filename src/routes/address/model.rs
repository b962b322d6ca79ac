use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{AddressChanges, NewAddress};
use crate::utils::{FieldErrors, deserialize_some, is_valid_state, is_valid_zip_code};

const STREET_MAX: usize = 200;
const NUMBER_MAX: usize = 20;
const COMPLEMENT_MAX: usize = 100;
const NEIGHBORHOOD_MAX: usize = 100;
const CITY_MAX: usize = 100;
const STATE_MAX: usize = 2;
const ZIP_CODE_MAX: usize = 9;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = i64, example = 1)]
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "Av. Paulista")]
    pub street: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "1000")]
    pub number: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub complement: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "Bela Vista")]
    pub neighborhood: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "São Paulo")]
    pub city: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "SP")]
    pub state: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "01310-100")]
    pub zip_code: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAddressRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub street: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub number: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub complement: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub neighborhood: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub city: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub state: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub zip_code: Option<Value>,
}

// UF 统一存为大写
fn check_state(errors: &mut FieldErrors, state: String) -> String {
    let state = state.to_ascii_uppercase();
    if !state.is_empty() && errors.get("state").is_none() && !is_valid_state(&state) {
        errors.add("state", "Enter a two-letter state code.");
    }
    state
}

fn check_zip_code(errors: &mut FieldErrors, zip_code: &str) {
    if !zip_code.is_empty() && errors.get("zip_code").is_none() && !is_valid_zip_code(zip_code) {
        errors.add("zip_code", "Enter a valid CEP (8 digits).");
    }
}

impl CreateAddressRequest {
    pub fn validate(self) -> Result<NewAddress, FieldErrors> {
        let mut errors = FieldErrors::new();

        let user_id = errors.required_pk("user_id", self.user_id);
        let street = errors.required_text("street", self.street, STREET_MAX);
        let number = errors.required_text("number", self.number, NUMBER_MAX);
        let complement = errors
            .nullable_text("complement", self.complement, COMPLEMENT_MAX)
            .flatten();
        let neighborhood =
            errors.required_text("neighborhood", self.neighborhood, NEIGHBORHOOD_MAX);
        let city = errors.required_text("city", self.city, CITY_MAX);
        let state = errors.required_text("state", self.state, STATE_MAX);
        let state = check_state(&mut errors, state);
        let zip_code = errors.required_text("zip_code", self.zip_code, ZIP_CODE_MAX);
        check_zip_code(&mut errors, &zip_code);

        errors.finish(NewAddress {
            user_id,
            street,
            number,
            complement,
            neighborhood,
            city,
            state,
            zip_code,
        })
    }
}

impl UpdateAddressRequest {
    pub fn validate(self) -> Result<AddressChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let user_id = errors.optional_pk("user_id", self.user_id);
        let street = errors.optional_text("street", self.street, STREET_MAX, false);
        let number = errors.optional_text("number", self.number, NUMBER_MAX, false);
        let complement = errors.nullable_text("complement", self.complement, COMPLEMENT_MAX);
        let neighborhood =
            errors.optional_text("neighborhood", self.neighborhood, NEIGHBORHOOD_MAX, false);
        let city = errors.optional_text("city", self.city, CITY_MAX, false);
        let state = errors
            .optional_text("state", self.state, STATE_MAX, false)
            .map(|v| check_state(&mut errors, v));
        let zip_code = errors.optional_text("zip_code", self.zip_code, ZIP_CODE_MAX, false);
        if let Some(zip_code) = &zip_code {
            check_zip_code(&mut errors, zip_code);
        }

        errors.finish(AddressChanges {
            user_id,
            street,
            number,
            complement,
            neighborhood,
            city,
            state,
            zip_code,
        })
    }
}
