//! 错误类型
//!
//! 按照处理方式划分为四类：
//! - [`ArgumentError`]：调用方传参错误，在任何 I/O 之前同步返回，不会进入响应信封
//! - [`DecodeError`]：响应结构不符合预期（字段缺失、类型错误、未知标签等）
//! - [`ApiError`]：响应信封中携带的错误（传输、解析、取消）
//! - [`AppError`]：应用层汇总错误，供二进制入口使用

use crate::constants::{BAD_REQUEST, CLIENT_CLOSED_REQUEST, INTERNAL_ERROR, MAX_AMOUNT};
use crate::models::ResponseCode;
use thiserror::Error;

/// 参数校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// 题目数量超出 1..=50
    #[error("amount must be between 1 and {max}, got {amount}")]
    AmountOutOfRange { amount: u32, max: u32 },
}

impl ArgumentError {
    pub fn amount_out_of_range(amount: u32) -> Self {
        ArgumentError::AmountOutOfRange {
            amount,
            max: MAX_AMOUNT,
        }
    }
}

/// 响应解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 必填字段缺失
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// 字段存在但类型不符
    #[error("field `{field}` has an unexpected shape, expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// 题目类型不在已知集合内
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    /// 题目难度不在已知集合内
    #[error("unknown question difficulty: {0}")]
    UnknownDifficulty(String),

    /// base64 解码失败
    #[error("invalid base64 text: {0}")]
    Base64(#[from] base64::DecodeError),

    /// 解码后的字节不是合法 UTF-8
    #[error("decoded text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// 响应信封中的错误
///
/// `Display` 即错误消息，`source()` 即原始原因
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败或上游返回非 2xx
    #[error("Failed to get API result from URI: {uri}")]
    Request {
        uri: String,
        status: Option<u16>,
        #[source]
        source: reqwest::Error,
    },

    /// 响应体不是合法 JSON
    #[error("Failed to parse JSON response from URI: {uri}")]
    Parse {
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON 结构不符合预期
    #[error("Failed to decode API result from URI: {uri}")]
    Decode {
        uri: String,
        #[source]
        source: DecodeError,
    },

    /// HTTP 请求进行中被取消
    #[error("Request to {uri} was canceled")]
    Cancelled { uri: String },

    /// 等待限流期间被取消
    #[error("Rate limit delay was canceled")]
    ThrottleCancelled,

    /// 多分类请求的分类间等待被取消
    #[error("Inter-category delay was canceled")]
    DelayCancelled,

    /// 多分类请求未提供任何分类
    #[error("No categories provided")]
    NoCategories,
}

impl ApiError {
    pub(crate) fn request_failed(uri: &str, source: reqwest::Error) -> Self {
        ApiError::Request {
            uri: uri.to_string(),
            status: source.status().map(|s| s.as_u16()),
            source,
        }
    }

    /// 该错误对应的 HTTP 状态码
    ///
    /// 传输层给出状态码时沿用，否则传输/解析失败一律为 500，
    /// 限流或分类间等待被取消为 499
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Request { status, .. } => status.unwrap_or(INTERNAL_ERROR),
            ApiError::Parse { .. } | ApiError::Decode { .. } | ApiError::Cancelled { .. } => {
                INTERNAL_ERROR
            }
            ApiError::ThrottleCancelled | ApiError::DelayCancelled => CLIENT_CLOSED_REQUEST,
            ApiError::NoCategories => BAD_REQUEST,
        }
    }

    /// 是否由调用方取消引起（而非上游不可达）
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ApiError::Cancelled { .. } | ApiError::ThrottleCancelled | ApiError::DelayCancelled
        )
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 参数错误
    #[error("参数错误: {0}")]
    Argument(#[from] ArgumentError),

    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// HTTP 客户端构建失败
    #[error("HTTP客户端错误: {0}")]
    Http(#[from] reqwest::Error),

    /// 上游返回了业务失败码且没有任何数据
    #[error("上游返回失败 (response_code={code:?}, status={status}): {message}")]
    Upstream {
        code: ResponseCode,
        status: u16,
        message: String,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::ThrottleCancelled.status_code(), 499);
        assert_eq!(ApiError::DelayCancelled.status_code(), 499);
        assert_eq!(ApiError::NoCategories.status_code(), 400);
        assert_eq!(
            ApiError::Cancelled {
                uri: "http://localhost".to_string()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_no_categories_message() {
        assert_eq!(ApiError::NoCategories.to_string(), "No categories provided");
    }

    #[test]
    fn test_cancelled_kinds() {
        assert!(ApiError::ThrottleCancelled.is_cancelled());
        assert!(ApiError::DelayCancelled.is_cancelled());
        assert!(!ApiError::NoCategories.is_cancelled());
    }

    #[test]
    fn test_amount_out_of_range_message() {
        let err = ArgumentError::amount_out_of_range(51);
        assert_eq!(err.to_string(), "amount must be between 1 and 50, got 51");
    }
}
