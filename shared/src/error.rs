//! 客户端错误定义
//!
//! 所有失败都被归入三大类：
//! - 传输失败（网络、CORS、连接中断）
//! - 非 2xx 响应（校验或鉴权错误）
//! - 客户端校验失败（必填字段为空）
//!
//! 另有解码失败、未登录和取消三种辅助状态。错误从不跨屏幕传播，
//! 由各屏幕转换为可读消息后交给通知层。

use serde_json::Value;
use thiserror::Error;

/// 客户端统一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 网络层失败
    #[error("Network error: {0}")]
    Transport(String),
    /// 后端返回非 2xx 状态码
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },
    /// 必填字段为空
    #[error("Please fill in all fields: {}", .0.join(", "))]
    Validation(Vec<String>),
    /// 其他本地校验失败，例如两次输入的密码不一致
    #[error("{0}")]
    Invalid(String),
    /// 响应体或 Token 无法解析
    #[error("Could not read server response: {0}")]
    Decode(String),
    /// 没有有效会话
    #[error("Your session has expired. Please log in again.")]
    Unauthenticated,
    /// 请求在组件卸载后被丢弃
    #[error("Request cancelled")]
    Cancelled,
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// 根据状态码和 DRF 风格的错误响应体构造错误
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| extract_message(&v))
            .unwrap_or_else(|| {
                let text = body.trim();
                if text.is_empty() || text.starts_with('<') {
                    format!("HTTP {}", status)
                } else {
                    text.chars().take(200).collect()
                }
            });
        ClientError::Status { status, message }
    }

    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClientError::Validation(fields.into_iter().map(Into::into).collect())
    }

    /// 会话缺失或后端返回 401
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated | ClientError::Status { status: 401, .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// 本地校验失败（未发出请求）
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Invalid(_))
    }

    /// 展示给用户的消息
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// 从 DRF 错误响应中提取第一条可读消息
///
/// 优先级：`detail` > `message` > `error` > `non_field_errors`，
/// 否则拼接 `字段: 消息`。
fn extract_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(extract_message),
        Value::Object(map) => {
            for key in ["detail", "message", "error", "non_field_errors"] {
                if let Some(msg) = map.get(key).and_then(extract_message) {
                    return Some(msg);
                }
            }
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, v)| extract_message(v).map(|m| format!("{}: {}", field, m)))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_field_errors_are_preferred() {
        let body = r#"{"non_field_errors":["Unable to log in with provided credentials."]}"#;
        let err = ClientError::from_status(400, body);
        assert_eq!(
            err.user_message(),
            "Unable to log in with provided credentials."
        );
    }

    #[test]
    fn test_detail_wins_over_field_errors() {
        let body = r#"{"detail":"Given token not valid for any token type","code":"token_not_valid"}"#;
        let err = ClientError::from_status(401, body);
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Given token not valid for any token type");
    }

    #[test]
    fn test_field_errors_are_joined() {
        let body = r#"{"email":["user with this email already exists."],"salary":["A valid number is required."]}"#;
        let err = ClientError::from_status(400, body);
        assert_eq!(
            err.user_message(),
            "email: user with this email already exists.; salary: A valid number is required."
        );
    }

    #[test]
    fn test_html_body_falls_back_to_status() {
        let err = ClientError::from_status(500, "<!doctype html><h1>Server Error</h1>");
        assert_eq!(err.user_message(), "HTTP 500");
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ClientError::validation(["name", "price"]);
        assert_eq!(err.user_message(), "Please fill in all fields: name, price");
    }
}
