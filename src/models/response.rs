//! 响应信封
//!
//! 所有对外操作都以 [`ApiResponse`] 返回结果：成功时携带数据，
//! 失败时携带 [`ApiError`]，同时保留上游业务码和 HTTP 状态码

use crate::error::ApiError;
use serde::Serialize;
use std::fmt;

/// 上游业务响应码
///
/// 数值是上游契约的一部分，不可重新编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i32)]
pub enum ResponseCode {
    /// 未知或未返回
    Unknown = -1,
    /// 成功
    Success = 0,
    /// 题库中没有足够的题目满足查询
    NoResults = 1,
    /// 参数无效
    InvalidParameter = 2,
    /// 令牌不存在
    TokenNotFound = 3,
    /// 令牌已取完所有题目，需要重置
    TokenEmpty = 4,
    /// 请求过于频繁（每个 IP 每 5 秒一次）
    RateLimit = 5,
}

impl ResponseCode {
    /// 由上游整数转换，未定义的值一律视为 `Unknown`
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            _ => ResponseCode::Unknown,
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// API 响应信封
#[derive(Debug)]
pub struct ApiResponse<T> {
    data: Option<T>,
    error: Option<ApiError>,
    response_code: ResponseCode,
    status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn new(
        data: Option<T>,
        error: Option<ApiError>,
        response_code: ResponseCode,
        status_code: u16,
    ) -> Self {
        Self {
            data,
            error,
            response_code,
            status_code,
        }
    }

    /// 没有数据的失败响应，状态码取自错误本身
    pub fn failure(error: ApiError, response_code: ResponseCode) -> Self {
        let status_code = error.status_code();
        Self::new(None, Some(error), response_code, status_code)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// 错误消息，没有错误时为 `None`
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 没有错误且上游返回成功
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.response_code == ResponseCode::Success
    }

    /// 是否因调用方取消而失败
    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(ApiError::is_cancelled)
    }

    pub(crate) fn set_response_code(&mut self, response_code: ResponseCode) {
        self.response_code = response_code;
    }

    /// 取走数据，信封中其余字段保留
    pub fn take_data(&mut self) -> Option<T> {
        self.data.take()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// 拆分为 (数据, 错误, 业务码, 状态码)
    pub fn into_parts(self) -> (Option<T>, Option<ApiError>, ResponseCode, u16) {
        (self.data, self.error, self.response_code, self.status_code)
    }

    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            data: self.data.map(f),
            error: self.error,
            response_code: self.response_code,
            status_code: self.status_code,
        }
    }
}

impl<T> fmt::Display for ApiResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(
                f,
                "失败 (response_code={:?}, status={}): {}",
                self.response_code, self.status_code, error
            ),
            None => write!(
                f,
                "完成 (response_code={:?}, status={})",
                self.response_code, self.status_code
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_values_are_fixed() {
        assert_eq!(ResponseCode::Unknown.code(), -1);
        assert_eq!(ResponseCode::Success.code(), 0);
        assert_eq!(ResponseCode::RateLimit.code(), 5);
        assert_eq!(ResponseCode::from_code(3), ResponseCode::TokenNotFound);
        assert_eq!(ResponseCode::from_code(999), ResponseCode::Unknown);
        assert_eq!(ResponseCode::from_code(-1), ResponseCode::Unknown);
    }

    #[test]
    fn test_is_success_requires_success_code_and_no_error() {
        let ok = ApiResponse::new(Some(1), None, ResponseCode::Success, 200);
        assert!(ok.is_success());
        assert_eq!(ok.error_message(), None);

        let no_results = ApiResponse::new(Some(1), None, ResponseCode::NoResults, 200);
        assert!(!no_results.is_success());

        let failed: ApiResponse<i32> =
            ApiResponse::failure(ApiError::NoCategories, ResponseCode::Success);
        assert!(!failed.is_success());
        assert_eq!(failed.status_code(), 400);
        assert_eq!(
            failed.error_message().as_deref(),
            Some("No categories provided")
        );
    }

    #[test]
    fn test_map_keeps_status() {
        let response = ApiResponse::new(Some(2), None, ResponseCode::NoResults, 200);
        let mapped = response.map(|v| v * 10);
        assert_eq!(mapped.data(), Some(&20));
        assert_eq!(mapped.response_code(), ResponseCode::NoResults);
        assert_eq!(mapped.status_code(), 200);
    }

    #[test]
    fn test_is_cancelled() {
        let response: ApiResponse<()> =
            ApiResponse::failure(ApiError::ThrottleCancelled, ResponseCode::Unknown);
        assert!(response.is_cancelled());
        assert_eq!(response.status_code(), 499);
    }
}
