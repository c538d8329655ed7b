//! 题库 API 客户端
//!
//! 封装三个上游接口（题目、分类、会话令牌）以及题目数量接口。
//! 所有运行时失败都转换为 [`ApiResponse`]，只有参数错误会同步返回 `Err`

use crate::clients::QuestionSource;
use crate::config::Config;
use crate::constants::{INTERNAL_ERROR, OK};
use crate::error::{ApiError, AppResult, ArgumentError, DecodeError};
use crate::models::{
    ApiResponse, Category, EncodingType, Question, QuestionCount, QuestionRequest, ResponseCode,
    SessionToken,
};
use crate::services::{RateThrottle, ResponseDecoder};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// 上游接口地址
#[derive(Debug, Clone)]
struct Endpoints {
    question: String,
    token: String,
    category: String,
    count: String,
}

/// 题库客户端
pub struct TriviaClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    manage_rate_limit: bool,
    decode_text: bool,
    throttle: RateThrottle,
    decoder: ResponseDecoder,
}

impl TriviaClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_http_client(http, config))
    }

    /// 使用外部提供的 HTTP 客户端
    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            endpoints: Endpoints {
                question: config.question_api_url.clone(),
                token: config.token_api_url.clone(),
                category: config.category_api_url.clone(),
                count: config.count_api_url.clone(),
            },
            manage_rate_limit: config.manage_rate_limit,
            decode_text: config.decode_text,
            throttle: RateThrottle::default(),
            decoder: ResponseDecoder::new(),
        }
    }

    pub fn decoder(&self) -> &ResponseDecoder {
        &self.decoder
    }

    /// 申请新的会话令牌
    pub async fn get_session_token(&self, cancel: &CancellationToken) -> ApiResponse<SessionToken> {
        let uri = format!("{}?command=request", self.endpoints.token);
        self.get_api_result(&uri, cancel, |doc| Ok(self.decoder.decode_session_token(doc)))
            .await
    }

    /// 重置会话令牌，清空其已出题记录
    pub async fn reset_session_token(
        &self,
        token: &SessionToken,
        cancel: &CancellationToken,
    ) -> ApiResponse<SessionToken> {
        let uri = format!(
            "{}?command=reset&token={}",
            self.endpoints.token,
            urlencoding::encode(token.value())
        );
        self.get_api_result(&uri, cancel, |doc| Ok(self.decoder.decode_session_token(doc)))
            .await
    }

    /// 获取全部分类
    ///
    /// 分类接口本身没有 `response_code`：有分类时为 `Success`，空列表为 `NoResults`
    pub async fn get_categories(&self, cancel: &CancellationToken) -> ApiResponse<Vec<Arc<Category>>> {
        let uri = self.endpoints.category.clone();
        let mut response = self
            .get_api_result(&uri, cancel, |doc| self.decoder.decode_categories(doc))
            .await;

        if let Some(categories) = response.data() {
            let code = if categories.is_empty() {
                ResponseCode::NoResults
            } else {
                ResponseCode::Success
            };
            response.set_response_code(code);
        }
        response
    }

    /// 获取某个分类下的题目数量
    pub async fn get_question_count(
        &self,
        category: &Category,
        cancel: &CancellationToken,
    ) -> ApiResponse<QuestionCount> {
        let uri = format!("{}?category={}", self.endpoints.count, category.id());
        let mut response = self
            .get_api_result(&uri, cancel, |doc| self.decoder.decode_question_count(doc))
            .await;

        if response.data().is_some() {
            response.set_response_code(ResponseCode::Success);
        }
        response
    }

    /// 获取单个分类（或不限分类）的题目
    ///
    /// # 参数
    /// - `request`: 查询参数
    /// - `cancel`: 取消信号
    ///
    /// # 返回
    /// 题目数量超出 1..=50 时同步返回 `Err`，不会发出任何请求；
    /// 其余失败（限流等待取消、传输、解析、取消）都体现在信封中
    pub async fn get_questions(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Question>>, ArgumentError> {
        request.validate()?;

        let uri = format!("{}?{}", self.endpoints.question, request.to_query());

        if self.manage_rate_limit {
            if let Err(e) = self.throttle.acquire(cancel).await {
                return Ok(ApiResponse::failure(e, ResponseCode::Unknown));
            }
        }

        let mode = self.decoding_mode(request.encoding);
        Ok(self
            .get_api_result(&uri, cancel, |doc| self.decoder.decode_questions(doc, mode))
            .await)
    }

    /// 字符串解码方式：开启解码时沿用请求的编码，未指定编码则按 HTML 实体解码
    fn decoding_mode(&self, encoding: Option<EncodingType>) -> Option<EncodingType> {
        self.decode_text
            .then(|| encoding.unwrap_or(EncodingType::Default))
    }

    /// 请求并解码，任何失败都转换为失败信封
    async fn get_api_result<T, F>(
        &self,
        uri: &str,
        cancel: &CancellationToken,
        build: F,
    ) -> ApiResponse<T>
    where
        F: FnOnce(&JsonValue) -> Result<T, DecodeError>,
    {
        let document = match self.get_json_document(uri, cancel).await {
            Ok(document) => document,
            Err(e) => {
                error!("获取 API 结果失败 ({}): {}", uri, e);
                return ApiResponse::failure(e, ResponseCode::Unknown);
            }
        };

        match build(&document) {
            Ok(data) => ApiResponse::new(
                Some(data),
                None,
                ResponseDecoder::response_code(&document),
                OK,
            ),
            Err(source) => {
                error!("解码 API 结果失败 ({}): {}", uri, source);
                ApiResponse::new(
                    None,
                    Some(ApiError::Decode {
                        uri: uri.to_string(),
                        source,
                    }),
                    ResponseCode::Unknown,
                    INTERNAL_ERROR,
                )
            }
        }
    }

    /// 发起 GET 请求并解析为 JSON，取消信号会中止进行中的请求
    async fn get_json_document(
        &self,
        uri: &str,
        cancel: &CancellationToken,
    ) -> Result<JsonValue, ApiError> {
        debug!("请求 JSON 文档: {}", uri);

        let fetch = async {
            let response = self
                .http
                .get(uri)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| ApiError::request_failed(uri, e))?;

            let body = response
                .text()
                .await
                .map_err(|e| ApiError::request_failed(uri, e))?;

            serde_json::from_str::<JsonValue>(&body).map_err(|source| ApiError::Parse {
                uri: uri.to_string(),
                source,
            })
        };

        let document = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("请求已取消: {}", uri);
                return Err(ApiError::Cancelled { uri: uri.to_string() });
            }
            result = fetch => result?,
        };

        debug!("成功解析 JSON 文档: {}", uri);
        Ok(document)
    }
}

#[async_trait]
impl QuestionSource for TriviaClient {
    async fn get_questions(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Question>>, ArgumentError> {
        TriviaClient::get_questions(self, request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(decode_text: bool) -> TriviaClient {
        let config = Config {
            decode_text,
            ..Config::default()
        };
        TriviaClient::with_http_client(reqwest::Client::new(), &config)
    }

    #[test]
    fn test_decoding_mode() {
        let client = create_test_client(true);
        assert_eq!(client.decoding_mode(None), Some(EncodingType::Default));
        assert_eq!(
            client.decoding_mode(Some(EncodingType::Base64)),
            Some(EncodingType::Base64)
        );

        let raw = create_test_client(false);
        assert_eq!(raw.decoding_mode(Some(EncodingType::Base64)), None);
    }

    #[tokio::test]
    async fn test_invalid_amount_fails_before_any_request() {
        let client = create_test_client(true);
        let cancel = CancellationToken::new();

        for amount in [0, 51, 100] {
            let result = client
                .get_questions(&QuestionRequest::new(amount), &cancel)
                .await;
            assert_eq!(
                result.unwrap_err(),
                ArgumentError::amount_out_of_range(amount)
            );
        }
    }

    /// 真实接口测试
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_live_categories -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_categories() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = create_test_client(true);
        let response = client.get_categories(&CancellationToken::new()).await;

        println!("分类接口: {}", response);
        assert!(response.is_success());
        assert!(!response.data().unwrap().is_empty());
    }
}
