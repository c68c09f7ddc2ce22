use thiserror::Error;

/// 客户端校验错误
///
/// 这些检查都在发出任何网络请求之前完成，消息直接展示在表单上。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Vui lòng nhập {0}")]
    Required(&'static str),

    #[error("Mật khẩu không khớp")]
    PasswordMismatch,

    #[error("Mật khẩu phải có ít nhất {min} ký tự")]
    PasswordTooShort { min: usize },

    #[error("Trường không hợp lệ: {0}")]
    UnknownField(String),

    #[error("{field} phải là số")]
    InvalidNumber { field: &'static str },

    #[error("{field} không được âm")]
    Negative { field: &'static str },

    #[error("Ngày không hợp lệ: {0}")]
    InvalidDate(String),

    #[error("Ngày kết thúc phải sau ngày bắt đầu")]
    InvalidDateRange,

    #[error("Biểu mẫu này không hỗ trợ tạo mới")]
    NotCreatable,
}
