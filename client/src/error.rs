use carrent_shared::ValidationError;
use carrent_shared::protocol::{Operation, Resource};
use thiserror::Error;

/// 前端统一错误类型
///
/// 网络相关的错误都带上资源名和操作名，方便定位是哪一次调用失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 服务端返回非 2xx
    #[error("Không thể {} {}: HTTP {status}", .operation.label(), .resource.label())]
    RequestFailed {
        resource: Resource,
        operation: Operation,
        status: u16,
    },

    /// 请求没有到达服务端
    #[error("Lỗi kết nối khi {} {}: {message}", .operation.label(), .resource.label())]
    Transport {
        resource: Resource,
        operation: Operation,
        message: String,
    },

    /// 响应体无法解析
    #[error("Phản hồi không hợp lệ khi {} {}: {message}", .operation.label(), .resource.label())]
    Decode {
        resource: Resource,
        operation: Operation,
        message: String,
    },

    #[error("Email hoặc mật khẩu không đúng")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 在会话上下文之外访问会话
    #[error("Phiên đăng nhập chưa được khởi tạo")]
    NotInitialized,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_names_operation() {
        let err = ClientError::RequestFailed {
            resource: Resource::Customers,
            operation: Operation::Delete,
            status: 500,
        };
        assert_eq!(err.to_string(), "Không thể xóa khách hàng: HTTP 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_network_errors_are_localized() {
        let transport = ClientError::Transport {
            resource: Resource::Violations,
            operation: Operation::List,
            message: "NetworkError".into(),
        };
        assert_eq!(
            transport.to_string(),
            "Lỗi kết nối khi tải danh sách vi phạm: NetworkError"
        );

        let decode = ClientError::Decode {
            resource: Resource::Contracts,
            operation: Operation::Create,
            message: "expected value".into(),
        };
        assert_eq!(
            decode.to_string(),
            "Phản hồi không hợp lệ khi tạo hợp đồng: expected value"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: ClientError = ValidationError::PasswordMismatch.into();
        assert_eq!(err.to_string(), "Mật khẩu không khớp");
        assert_eq!(err.status(), None);
    }
}
