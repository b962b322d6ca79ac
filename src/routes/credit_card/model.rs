use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{CreditCardChanges, NewCreditCard};
use crate::utils::{FieldErrors, deserialize_some, is_valid_expiration, normalize_card_number};

const HOLDER_NAME_MAX: usize = 100;
const NUMBER_MAX: usize = 23;
const EXPIRATION_MAX: usize = 5;
const BRAND_MAX: usize = 30;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCreditCardRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = i64, example = 1)]
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "MARIA SILVA")]
    pub holder_name: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "4111 1111 1111 1111")]
    pub number: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "08/29")]
    pub expiration: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCreditCardRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub holder_name: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub number: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub expiration: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Value>,
}

// 卡号只保留数字；长度或空值已报错时不再检查
fn check_number(errors: &mut FieldErrors, number: String) -> String {
    if number.is_empty() || errors.get("number").is_some() {
        return number;
    }
    normalize_card_number(&number).unwrap_or_else(|| {
        errors.add("number", "Enter a valid card number (13 to 19 digits).");
        number
    })
}

fn check_expiration(errors: &mut FieldErrors, expiration: &str) {
    if !expiration.is_empty()
        && errors.get("expiration").is_none()
        && !is_valid_expiration(expiration)
    {
        errors.add("expiration", "Enter the expiration as MM/YY.");
    }
}

impl CreateCreditCardRequest {
    pub fn validate(self) -> Result<NewCreditCard, FieldErrors> {
        let mut errors = FieldErrors::new();

        let user_id = errors.required_pk("user_id", self.user_id);
        let holder_name = errors.required_text("holder_name", self.holder_name, HOLDER_NAME_MAX);
        let number = errors.required_text("number", self.number, NUMBER_MAX);
        let number = check_number(&mut errors, number);
        let expiration = errors.required_text("expiration", self.expiration, EXPIRATION_MAX);
        check_expiration(&mut errors, &expiration);
        let brand = errors.nullable_text("brand", self.brand, BRAND_MAX).flatten();

        errors.finish(NewCreditCard {
            user_id,
            holder_name,
            number,
            expiration,
            brand,
        })
    }
}

impl UpdateCreditCardRequest {
    pub fn validate(self) -> Result<CreditCardChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let user_id = errors.optional_pk("user_id", self.user_id);
        let holder_name =
            errors.optional_text("holder_name", self.holder_name, HOLDER_NAME_MAX, false);
        let number = errors
            .optional_text("number", self.number, NUMBER_MAX, false)
            .map(|v| check_number(&mut errors, v));
        let expiration = errors.optional_text("expiration", self.expiration, EXPIRATION_MAX, false);
        if let Some(expiration) = &expiration {
            check_expiration(&mut errors, expiration);
        }
        let brand = errors.nullable_text("brand", self.brand, BRAND_MAX);

        errors.finish(CreditCardChanges {
            user_id,
            holder_name,
            number,
            expiration,
            brand,
        })
    }
}
