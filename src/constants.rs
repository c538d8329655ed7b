//! 上游 API 常量
//!
//! 这些数值属于上游契约，不可配置

use std::time::Duration;

/// 题目接口默认地址
pub const QUESTION_API_URL: &str = "https://opentdb.com/api.php";

/// 会话令牌接口默认地址
pub const TOKEN_API_URL: &str = "https://opentdb.com/api_token.php";

/// 分类列表接口默认地址
pub const CATEGORY_API_URL: &str = "https://opentdb.com/api_category.php";

/// 分类题目数量接口默认地址
pub const COUNT_API_URL: &str = "https://opentdb.com/api_count.php";

/// 单次请求可获取的最大题目数量
pub const MAX_AMOUNT: u32 = 50;

/// 上游限流间隔：同一 IP 每 5 秒只能请求一次
pub const RATE_LIMIT: Duration = Duration::from_secs(5);

/// 客户端主动取消请求（非标准状态码）
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// 传输或解析失败时使用的状态码
pub const INTERNAL_ERROR: u16 = 500;

/// 参数错误
pub const BAD_REQUEST: u16 = 400;

pub const OK: u16 = 200;
