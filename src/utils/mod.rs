use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

mod extract;

pub use extract::{JsonBody, path_id};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// 字段级校验错误：字段名 -> 错误信息列表
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// 没有错误时返回 `value`
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Checks a required text field, trimming it. Missing values are recorded
    /// as errors and come back as an empty string.
    pub fn required_text(&mut self, field: &str, value: Option<Value>, max_len: usize) -> String {
        match value {
            None => {
                self.add(field, REQUIRED);
                String::new()
            }
            Some(v) => self
                .coerce_text(field, v)
                .map(|v| self.text(field, v, max_len, false))
                .unwrap_or_default(),
        }
    }

    /// 可缺省但不可为 null 的文本字段（PATCH 以及有默认值的字段）
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<Value>,
        max_len: usize,
        allow_blank: bool,
    ) -> Option<String> {
        let value = self.coerce_text(field, value?)?;
        Some(self.text(field, value, max_len, allow_blank))
    }

    /// Nullable text. The outer `Option` is presence, the inner one the
    /// stored value: `null` and blank strings both become NULL.
    pub fn nullable_text(
        &mut self,
        field: &str,
        value: Option<Value>,
        max_len: usize,
    ) -> Option<Option<String>> {
        match value? {
            Value::Null => Some(None),
            v => Some(
                self.coerce_text(field, v)
                    .map(|v| self.text(field, v, max_len, true))
                    .filter(|v| !v.is_empty()),
            ),
        }
    }

    /// Checks a supplied text value. `allow_blank` mirrors optional columns.
    pub fn text(&mut self, field: &str, value: String, max_len: usize, allow_blank: bool) -> String {
        let value = value.trim().to_string();
        if value.is_empty() && !allow_blank {
            self.add(field, BLANK);
        } else if value.chars().count() > max_len {
            self.add(
                field,
                format!("Ensure this field has no more than {max_len} characters."),
            );
        }
        value
    }

    pub fn required_pk(&mut self, field: &str, value: Option<Value>) -> i64 {
        match value {
            None => {
                self.add(field, REQUIRED);
                0
            }
            Some(v) => self.coerce_pk(field, v).unwrap_or_default(),
        }
    }

    pub fn optional_pk(&mut self, field: &str, value: Option<Value>) -> Option<i64> {
        self.coerce_pk(field, value?)
    }

    // 数字按其 JSON 文本收下，例如 `111` -> "111"
    fn coerce_text(&mut self, field: &str, value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => {
                self.add(field, NULL);
                None
            }
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                self.add(field, NOT_A_STRING);
                None
            }
        }
    }

    // 主键接受整数或纯数字字符串
    fn coerce_pk(&mut self, field: &str, value: Value) -> Option<i64> {
        let pk = match &value {
            Value::Null => {
                self.add(field, NULL);
                return None;
            }
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if pk.is_none() {
            self.add(
                field,
                format!(
                    "Incorrect type. Expected pk value, received {}.",
                    json_type_name(&value)
                ),
            );
        }
        pk
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|l| !l.is_empty() && l.chars().all(|c| c.is_alphanumeric() || c == '-'))
}

/// CPF 只允许数字以及格式化用的 `.` 和 `-`
pub fn is_valid_cpf(cpf: &str) -> bool {
    cpf.chars().any(|c| c.is_ascii_digit())
        && cpf.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

/// CEP: 8 digits, optionally written as `12345-678`.
pub fn is_valid_zip_code(zip: &str) -> bool {
    let digits: String = zip.chars().filter(|c| *c != '-').collect();
    let dash_ok = match zip.find('-') {
        None => true,
        Some(pos) => pos == 5 && zip.matches('-').count() == 1,
    };
    dash_ok && digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_state(state: &str) -> bool {
    state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic())
}

/// Strips spaces and dashes from a card number; `None` unless 13–19 digits remain.
pub fn normalize_card_number(number: &str) -> Option<String> {
    let digits: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let len_ok = (13..=19).contains(&digits.len());
    (len_ok && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// `MM/YY` with a month between 01 and 12.
pub fn is_valid_expiration(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    let digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    digits(month) && digits(year) && matches!(month.parse::<u8>(), Ok(1..=12))
}

pub fn mask_card_number(number: &str) -> String {
    let tail: String = number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("**** **** **** {tail}")
}

/// 区分 PATCH 中“字段缺省”与“显式设为 null”：
/// 缺省 -> `None`，`null` -> `Some(None)`
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
