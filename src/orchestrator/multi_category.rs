//! 多分类取题 - 编排层
//!
//! 把一次逻辑请求拆成每个分类一次的上游请求，依次执行并合并结果。
//!
//! ## 约束
//! - 严格串行：上游按来源 IP 限流，并发请求会导致所有共享出口的调用方被限流
//! - 从第二个分类开始，每次请求前固定等待 5 秒，与客户端是否开启限流无关
//! - 返回的数据是所有子请求题目的合并，而错误、业务码、状态码取自**最后一个**子请求，
//!   前面的失败会被后面的成功覆盖，新的调用点不要依赖这一语义
//! - 子请求被取消时立即返回该子请求的结果；只有在分类间等待时被取消才是 499

use crate::clients::QuestionSource;
use crate::constants::RATE_LIMIT;
use crate::error::{ApiError, ArgumentError};
use crate::models::{ApiResponse, Category, Question, QuestionRequest, ResponseCode};
use std::sync::Arc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 跨多个分类获取题目
///
/// # 参数
/// - `source`: 单分类取题能力
/// - `request`: 查询参数，`amount` 为**每个分类**的题目数量，其中的分类会被逐个替换
/// - `categories`: 分类列表，为空时直接返回 `InvalidParameter` / 400，不发起请求
/// - `cancel`: 取消信号
///
/// # 返回
/// 题目数量超出 1..=50 时同步返回 `Err`。
/// 在分类间等待时被取消，返回已累计的题目及 499 状态码
pub async fn get_questions_across_categories<S>(
    source: &S,
    request: &QuestionRequest,
    categories: &[Arc<Category>],
    cancel: &CancellationToken,
) -> Result<ApiResponse<Vec<Question>>, ArgumentError>
where
    S: QuestionSource + ?Sized,
{
    request.validate()?;

    let mut all_questions = Vec::new();
    let mut last = ApiResponse::<Vec<Question>>::failure(
        ApiError::NoCategories,
        ResponseCode::InvalidParameter,
    );

    if categories.is_empty() {
        warn!("⚠️ 未提供任何分类");
    }

    for (index, category) in categories.iter().enumerate() {
        if index > 0 {
            debug!("分类间等待 {}s", RATE_LIMIT.as_secs());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("分类间等待已取消，已获取 {} 道题", all_questions.len());
                    let error = ApiError::DelayCancelled;
                    let status = error.status_code();
                    return Ok(ApiResponse::new(
                        Some(all_questions),
                        Some(error),
                        ResponseCode::Unknown,
                        status,
                    ));
                }
                _ = sleep(RATE_LIMIT) => {}
            }
        }

        info!(
            "📦 请求分类 {}/{}: {} (#{})",
            index + 1,
            categories.len(),
            category.name(),
            category.id()
        );

        let sub_request = request.clone().with_category(category);
        last = source.get_questions(&sub_request, cancel).await?;

        match last.take_data() {
            Some(questions) => {
                debug!("分类 #{} 返回 {} 道题", category.id(), questions.len());
                all_questions.extend(questions);
            }
            None => warn!("分类 #{} 请求失败: {}", category.id(), last),
        }

        // 子请求本身被取消时直接结束，保留该子请求的错误，不再进入分类间等待
        if last.is_cancelled() {
            warn!("分类 #{} 请求已取消，已获取 {} 道题", category.id(), all_questions.len());
            break;
        }
    }

    let (_, error, response_code, status_code) = last.into_parts();
    Ok(ApiResponse::new(
        Some(all_questions),
        error,
        response_code,
        status_code,
    ))
}
