use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{NewUser, UserChanges};
use crate::utils::{FieldErrors, deserialize_some, is_valid_cpf, is_valid_email};

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const CPF_MAX: usize = 14;
const PHONE_MAX: usize = 20;

/// Fields stay raw JSON until `validate`, so a wrong type becomes a field
/// error instead of rejecting the whole body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, example = "Maria Silva")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "maria@example.com")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = String, example = "123.456.789-09")]
    pub cpf: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
}

/// 部分更新：缺省字段保持原值
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub cpf: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
}

// 已有长度/空值错误时不再叠加格式错误
fn check_email(errors: &mut FieldErrors, email: &str) {
    if !email.is_empty() && errors.get("email").is_none() && !is_valid_email(email) {
        errors.add("email", "Enter a valid email address.");
    }
}

fn check_cpf(errors: &mut FieldErrors, cpf: &str) {
    if !cpf.is_empty() && errors.get("cpf").is_none() && !is_valid_cpf(cpf) {
        errors.add("cpf", "Enter a valid CPF (digits, '.' and '-' only).");
    }
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors
            .optional_text("name", self.name, NAME_MAX, true)
            .unwrap_or_default();
        let email = errors.required_text("email", self.email, EMAIL_MAX);
        check_email(&mut errors, &email);
        let cpf = errors.required_text("cpf", self.cpf, CPF_MAX);
        check_cpf(&mut errors, &cpf);
        let phone = errors
            .nullable_text("phone", self.phone, PHONE_MAX)
            .flatten();

        errors.finish(NewUser {
            name,
            email,
            cpf,
            phone,
        })
    }
}

impl UpdateUserRequest {
    /// Validates only the fields present in the payload.
    pub fn validate(self) -> Result<UserChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.optional_text("name", self.name, NAME_MAX, true);
        let email = errors.optional_text("email", self.email, EMAIL_MAX, false);
        if let Some(email) = &email {
            check_email(&mut errors, email);
        }
        let cpf = errors.optional_text("cpf", self.cpf, CPF_MAX, false);
        if let Some(cpf) = &cpf {
            check_cpf(&mut errors, cpf);
        }
        let phone = errors.nullable_text("phone", self.phone, PHONE_MAX);

        errors.finish(UserChanges {
            name,
            email,
            cpf,
            phone,
        })
    }
}
