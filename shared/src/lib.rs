//! 租车管理系统前后端共享的数据模型
//!
//! 所有实体与远端 REST 服务按原样交换（JSON，camelCase 字段），
//! 前端只持有当前页面的临时副本，不做任何结构转换。

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod date;
pub mod error;
pub mod patch;
pub mod pricing;
pub mod protocol;
pub mod validation;

pub use date::RentalDate;
pub use error::ValidationError;
pub use patch::{CustomerPatch, NewContract, NewViolation, UserPatch, ViolationPatch};
pub use protocol::{ListResponse, PageRequest, Resource};

// =========================================================
// 标识符 (Identifiers)
// =========================================================

/// 实体 ID
///
/// 远端服务有时以数字、有时以字符串返回 ID，这里统一保存为字符串，
/// 序列化时也总是输出字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色，只有两个平级角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 登录用户
///
/// `role` 由服务端在注册时确定，前端从不修改。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    /// 服务端可能回传密码字段；前端不保存也不回写
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub name: String,
    pub phone: String,
    /// 身份证号 (CCCD)
    #[serde(rename = "cccd")]
    pub national_id: String,
    pub address: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 客户记录，结构上与 User 相似但属于不同的资源
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    #[serde(rename = "cccd")]
    pub national_id: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 违章罚款项，`price` 为整数货币单位 (VNĐ)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Violation {
    pub id: EntityId,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 车辆（前端只读）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Car {
    pub id: EntityId,
    pub name: String,
    pub brand: String,
    pub price_per_day: i64,
    pub license_plate: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 抵押物（前端只读）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collateral {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 租车合同：创建一次，前端从不修改或删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: EntityId,
    pub user_id: EntityId,
    pub car_id: EntityId,
    pub collateral_id: EntityId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
    pub estimated_price: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<Car>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral: Option<Collateral>,
}

/// 登录 / 注册的响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
