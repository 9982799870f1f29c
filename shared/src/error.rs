use thiserror::Error;

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误分类
///
/// - `Validation`: 客户端校验失败，请求不会发出
/// - `Network`: 没有连接或没有收到响应
/// - `Api`: 服务端返回非 2xx
/// - `Decode`: 2xx 但响应体无法解析
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// 从非 2xx 响应体构造：优先取 JSON 中的 `message` 字段
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Server error: {status}"));
        Self::api(status, message)
    }

    // --- Accessors ---

    /// 对应的 HTTP 状态码，仅 `Api` 有
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION",
            ClientError::Network(_) => "NETWORK",
            ClientError::Api { .. } => "API",
            ClientError::Decode(_) => "DECODE",
        }
    }

    /// 直接展示给用户的文案
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message)
            | ClientError::Api { message, .. }
            | ClientError::Decode(message) => message.clone(),
            ClientError::Network(_) => {
                "No response from server. Please check your connection.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(format!("Unexpected response from server ({e})"))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
