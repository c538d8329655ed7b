/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::{ApiResponse, TriviaGame};
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📊 每个分类题目数: {}", config.question_amount);
    if config.category_ids.is_empty() {
        info!("📋 分类: 不限");
    } else {
        info!("📋 分类: {:?}", config.category_ids);
    }
    info!("⏱️ 自动限流: {}", config.manage_rate_limit);
    info!("{}", "=".repeat(60));
}

/// 记录多分类请求开始信息
///
/// # 参数
/// - `count`: 分类数量
/// - `wait_secs`: 分类间等待秒数
pub fn log_fan_out_start(count: usize, wait_secs: u64) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始依次请求 {} 个分类", count);
    if count > 1 {
        info!(
            "💡 每个分类间隔 {} 秒，至少需要 {} 秒",
            wait_secs,
            wait_secs * (count as u64 - 1)
        );
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `game`: 本局游戏
/// - `response`: 题目请求的结果信封
pub fn print_game_summary<T>(game: &TriviaGame, response: &ApiResponse<T>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出题完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("结果: {}", response);
    info!("✅ 题目: {}", game.len());
    for category in game.categories() {
        info!(
            "  · {} (#{}): {} 道",
            truncate_text(category.name(), 40),
            category.id(),
            game.questions_in(category).count()
        );
    }
    for (index, question) in game.questions().iter().enumerate() {
        info!("{:>3}. {}", index + 1, truncate_text(question.text(), 80));
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
