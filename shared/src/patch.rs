//! 更新 / 创建载荷
//!
//! 每种可修改的实体都有一个显式的 patch 类型，字段集合是封闭的：
//! - 反序列化时拒绝未知字段
//! - 表单按字段名写入时，未知字段名返回 `ValidationError::UnknownField`

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{EntityId, RentalDate, ValidationError};

// =========================================================
// 可编辑字段 (Editable Fields)
// =========================================================

/// 客户 / 用户表单上可编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonField {
    Name,
    Phone,
    NationalId,
    Address,
}

impl PersonField {
    pub const ALL: [PersonField; 4] = [
        PersonField::Name,
        PersonField::Phone,
        PersonField::NationalId,
        PersonField::Address,
    ];

    /// 表单 / JSON 中使用的字段名
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonField::Name => "name",
            PersonField::Phone => "phone",
            PersonField::NationalId => "cccd",
            PersonField::Address => "address",
        }
    }
}

impl AsRef<str> for PersonField {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PersonField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(PersonField::Name),
            "phone" => Ok(PersonField::Phone),
            "cccd" | "nationalId" => Ok(PersonField::NationalId),
            "address" => Ok(PersonField::Address),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// 违章表单上可编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationField {
    Name,
    Price,
    Description,
}

impl ViolationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationField::Name => "name",
            ViolationField::Price => "price",
            ViolationField::Description => "description",
        }
    }
}

impl AsRef<str> for ViolationField {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ViolationField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ViolationField::Name),
            "price" => Ok(ViolationField::Price),
            "description" => Ok(ViolationField::Description),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

// =========================================================
// Patch 类型
// =========================================================

/// `PATCH /customers/{id}` 的请求体，只包含被修改的字段
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "cccd", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// `PATCH /users/{id}` 的请求体；角色与邮箱不可修改
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "cccd", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

macro_rules! impl_person_patch {
    ($ty:ty) => {
        impl $ty {
            pub fn set(&mut self, field: PersonField, value: String) {
                match field {
                    PersonField::Name => self.name = Some(value),
                    PersonField::Phone => self.phone = Some(value),
                    PersonField::NationalId => self.national_id = Some(value),
                    PersonField::Address => self.address = Some(value),
                }
            }

            pub fn is_empty(&self) -> bool {
                self.name.is_none()
                    && self.phone.is_none()
                    && self.national_id.is_none()
                    && self.address.is_none()
            }
        }
    };
}

impl_person_patch!(CustomerPatch);
impl_person_patch!(UserPatch);

/// `PATCH /violations/{id}` 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ViolationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ViolationPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.description.is_none()
    }
}

// =========================================================
// 创建载荷
// =========================================================

/// `POST /violations` 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewViolation {
    pub name: String,
    pub price: i64,
    pub description: String,
}

/// `POST /contracts` 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewContract {
    pub user_id: EntityId,
    pub car_id: EntityId,
    pub collateral_id: EntityId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub estimated_price: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_serializes_only_touched_fields() {
        let mut patch = CustomerPatch::default();
        assert!(patch.is_empty());
        patch.set(PersonField::NationalId, "0123".to_string());

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "cccd": "0123" }));
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let err = serde_json::from_value::<UserPatch>(json!({ "name": "A", "role": "admin" }));
        assert!(err.is_err());

        let ok = serde_json::from_value::<UserPatch>(json!({ "name": "A" })).unwrap();
        assert_eq!(ok.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_field_names_are_closed() {
        assert_eq!("cccd".parse::<PersonField>(), Ok(PersonField::NationalId));
        assert_eq!(
            "role".parse::<PersonField>(),
            Err(ValidationError::UnknownField("role".to_string()))
        );
        assert_eq!("price".parse::<ViolationField>(), Ok(ViolationField::Price));
        assert!("id".parse::<ViolationField>().is_err());
        for field in PersonField::ALL {
            assert_eq!(field.as_str().parse::<PersonField>(), Ok(field));
        }
    }

    #[test]
    fn test_new_contract_wire_format() {
        let contract = NewContract {
            user_id: "u1".into(),
            car_id: "9".into(),
            collateral_id: "2".into(),
            start_date: RentalDate::from_ymd(2025, 1, 1).unwrap(),
            end_date: RentalDate::from_ymd(2025, 1, 3).unwrap(),
            estimated_price: 1_500_000,
        };
        assert_eq!(
            serde_json::to_value(&contract).unwrap(),
            json!({
                "userId": "u1",
                "carId": "9",
                "collateralId": "2",
                "startDate": "2025-01-01",
                "endDate": "2025-01-03",
                "estimatedPrice": 1500000
            })
        );
    }
}
