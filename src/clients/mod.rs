pub mod trivia_client;

pub use trivia_client::TriviaClient;

use crate::error::ArgumentError;
use crate::models::{ApiResponse, Question, QuestionRequest};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 单分类取题能力
///
/// 多分类聚合基于该接口编写，[`TriviaClient`] 是其生产实现
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn get_questions(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Question>>, ArgumentError>;
}
