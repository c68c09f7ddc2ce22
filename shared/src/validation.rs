//! 登录 / 注册表单校验
//!
//! 校验顺序：必填字段 -> 两次密码一致 -> 密码长度。
//! 全部通过后才会构造请求对象，失败时不会发出任何网络请求。

use crate::ValidationError;
use crate::protocol::{LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

/// 非空检查（忽略首尾空白）
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        require("email", &self.email)?;
        require("mật khẩu", &self.password)?;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// 注册表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        require("họ tên", &self.name)?;
        require("email", &self.email)?;
        require("số điện thoại", &self.phone)?;
        require("CCCD", &self.national_id)?;
        require("địa chỉ", &self.address)?;
        require("mật khẩu", &self.password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            national_id: self.national_id.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}
