//! 应用入口：按配置完成一局出题

use crate::clients::TriviaClient;
use crate::config::Config;
use crate::constants::RATE_LIMIT;
use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, Category, Question, QuestionRequest, SessionToken, TriviaGame};
use crate::orchestrator::get_questions_across_categories;
use crate::utils::logging::{log_fan_out_start, log_startup, print_game_summary};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: TriviaClient,
    cancel: CancellationToken,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let client = TriviaClient::new(&config)?;

        Ok(Self {
            config,
            client,
            cancel: CancellationToken::new(),
        })
    }

    /// 取消信号，取消后进行中的请求和等待都会尽快结束
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<TriviaGame> {
        let token = self.acquire_session_token().await;
        let request = self.build_request(token);

        let response = if self.config.category_ids.is_empty() {
            info!("\n🔍 请求不限分类的题目...");
            self.client.get_questions(&request, &self.cancel).await?
        } else {
            let categories = self.resolve_categories().await?;
            log_fan_out_start(categories.len(), RATE_LIMIT.as_secs());
            get_questions_across_categories(&self.client, &request, &categories, &self.cancel)
                .await?
        };

        let game = into_game(response)?;
        Ok(game)
    }

    /// 申请会话令牌，失败时不使用令牌继续
    async fn acquire_session_token(&self) -> Option<SessionToken> {
        if !self.config.use_session_token {
            return None;
        }

        let response = self.client.get_session_token(&self.cancel).await;
        if !response.is_success() {
            warn!("⚠️ 会话令牌申请失败，将不使用令牌: {}", response);
            return None;
        }
        let token = response.into_data();
        if let Some(token) = &token {
            info!("✓ 已获取会话令牌");
            debug!("会话令牌: {}", token);
        }
        token
    }

    /// 把配置中的分类 ID 映射为上游分类，找不到的 ID 会被忽略
    async fn resolve_categories(&self) -> AppResult<Vec<Arc<Category>>> {
        let response = self.client.get_categories(&self.cancel).await;
        if !response.is_success() {
            return Err(upstream_error(response));
        }

        let available = response.into_data().unwrap_or_default();
        let mut selected = Vec::new();
        for id in &self.config.category_ids {
            match available.iter().find(|c| c.id() == *id) {
                Some(category) => selected.push(Arc::clone(category)),
                None => warn!("⚠️ 分类 #{} 不存在，已跳过", id),
            }
        }

        info!("✓ 共 {} 个分类，选中 {} 个", available.len(), selected.len());
        Ok(selected)
    }

    fn build_request(&self, token: Option<SessionToken>) -> QuestionRequest {
        QuestionRequest {
            amount: self.config.question_amount,
            category_id: None,
            difficulty: self.config.difficulty,
            question_type: self.config.question_type,
            encoding: self.config.encoding,
            token,
        }
    }
}

/// 把题目信封转换为一局游戏
///
/// 只要拿到了题目就继续（部分分类失败只记录警告），一道题都没有时返回错误
fn into_game(mut response: ApiResponse<Vec<Question>>) -> AppResult<TriviaGame> {
    let questions = response.take_data().unwrap_or_default();
    if questions.is_empty() && !response.is_success() {
        return Err(upstream_error(response));
    }
    if !response.is_success() {
        warn!("⚠️ 部分请求失败: {}", response);
    }

    let game = TriviaGame::from_questions(questions);
    print_game_summary(&game, &response);
    Ok(game)
}

fn upstream_error<T>(response: ApiResponse<T>) -> AppError {
    let message = response
        .error_message()
        .unwrap_or_else(|| "上游未返回数据".to_string());
    let (_, error, code, status) = response.into_parts();
    match error {
        Some(e) if e.is_cancelled() => AppError::Api(e),
        _ => AppError::Upstream {
            code,
            status,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::ResponseCode;

    #[test]
    fn test_into_game_rejects_empty_failure() {
        let response = ApiResponse::new(Some(Vec::new()), None, ResponseCode::NoResults, 200);
        let result = into_game(response);
        assert!(matches!(
            result,
            Err(AppError::Upstream {
                code: ResponseCode::NoResults,
                status: 200,
                ..
            })
        ));
    }

    #[test]
    fn test_into_game_accepts_empty_success() {
        let response = ApiResponse::new(Some(Vec::new()), None, ResponseCode::Success, 200);
        let game = into_game(response).unwrap();
        assert!(game.is_empty());
    }

    #[test]
    fn test_cancellation_is_reported_as_api_error() {
        let response: ApiResponse<Vec<Question>> =
            ApiResponse::failure(ApiError::DelayCancelled, ResponseCode::Unknown);
        assert!(matches!(
            into_game(response),
            Err(AppError::Api(ApiError::DelayCancelled))
        ));
    }

    #[test]
    fn test_build_request_uses_config() {
        let config = Config {
            question_amount: 7,
            difficulty: Some(crate::models::Difficulty::Easy),
            ..Config::default()
        };
        let app = App::initialize(config).unwrap();
        let request = app.build_request(Some(SessionToken::new("abc")));
        assert_eq!(request.to_query(), "amount=7&difficulty=easy&token=abc");
    }
}
