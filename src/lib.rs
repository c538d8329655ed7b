//! # OpenTrivia Client
//!
//! Open Trivia Database 的 Rust 客户端：获取分类、会话令牌和随机题目，
//! 并把上游 JSON 映射为强类型的领域对象
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/` - 分类、题目、令牌、题目数量、响应信封
//! - `ApiResponse` - 所有对外操作的统一返回值
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心请求流程
//! - `ResponseDecoder` - JSON 解码、字符串还原、分类驻留
//! - `RateThrottle` - 单分类请求的限流等待
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - 持有 HTTP 客户端，负责请求构建与错误转换
//! - `TriviaClient` - 题目、分类、令牌、题目数量接口
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/multi_category` - 多分类串行请求与结果合并
//! - `App` - 按配置完成一局出题
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{QuestionSource, TriviaClient};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ArgumentError, DecodeError};
pub use models::{
    ApiResponse, Category, Difficulty, EncodingType, Question, QuestionCount, QuestionRequest,
    QuestionType, ResponseCode, SessionToken, TriviaGame,
};
pub use orchestrator::get_questions_across_categories;
pub use tokio_util::sync::CancellationToken;
