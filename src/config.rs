use crate::constants::{CATEGORY_API_URL, COUNT_API_URL, QUESTION_API_URL, TOKEN_API_URL};
use crate::error::ConfigError;
use crate::models::{Difficulty, EncodingType, QuestionType};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 上游接口 ---
    pub question_api_url: String,
    pub token_api_url: String,
    pub category_api_url: String,
    pub count_api_url: String,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 单分类请求是否自动遵守上游限流
    pub manage_rate_limit: bool,
    /// 是否还原题目中的编码字符串（关闭时保留上游原文）
    pub decode_text: bool,
    // --- 出题配置 ---
    /// 每个分类的题目数量
    pub question_amount: u32,
    /// 分类 ID 列表，为空表示不限分类
    pub category_ids: Vec<u32>,
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
    pub encoding: Option<EncodingType>,
    /// 是否申请会话令牌以避免重复题目
    pub use_session_token: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_api_url: QUESTION_API_URL.to_string(),
            token_api_url: TOKEN_API_URL.to_string(),
            category_api_url: CATEGORY_API_URL.to_string(),
            count_api_url: COUNT_API_URL.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            manage_rate_limit: false,
            decode_text: true,
            question_amount: 10,
            category_ids: Vec::new(),
            difficulty: None,
            question_type: None,
            encoding: None,
            use_session_token: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn with_env_overrides(self) -> Self {
        Self {
            question_api_url: env_or("OPENTRIVIA_QUESTION_URL", self.question_api_url),
            token_api_url: env_or("OPENTRIVIA_TOKEN_URL", self.token_api_url),
            category_api_url: env_or("OPENTRIVIA_CATEGORY_URL", self.category_api_url),
            count_api_url: env_or("OPENTRIVIA_COUNT_URL", self.count_api_url),
            user_agent: env_or("USER_AGENT", self.user_agent),
            manage_rate_limit: env_parse("MANAGE_RATE_LIMIT").unwrap_or(self.manage_rate_limit),
            decode_text: env_parse("DECODE_TEXT").unwrap_or(self.decode_text),
            question_amount: env_parse("QUESTION_AMOUNT").unwrap_or(self.question_amount),
            category_ids: std::env::var("CATEGORY_IDS")
                .ok()
                .and_then(|v| parse_id_list(&v))
                .unwrap_or(self.category_ids),
            difficulty: env_parse("DIFFICULTY").or(self.difficulty),
            question_type: env_parse("QUESTION_TYPE").or(self.question_type),
            encoding: env_parse("ENCODING").or(self.encoding),
            use_session_token: env_parse("USE_SESSION_TOKEN").unwrap_or(self.use_session_token),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }
}

fn env_or(key: &str, current: String) -> String {
    std::env::var(key).unwrap_or(current)
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// 解析 "9, 10,11" 形式的分类 ID 列表
fn parse_id_list(value: &str) -> Option<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.question_api_url, "https://opentdb.com/api.php");
        assert!(!config.manage_rate_limit);
        assert!(config.decode_text);
        assert_eq!(config.question_amount, 10);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            manage_rate_limit = true
            question_amount = 5
            category_ids = [9, 10]
            difficulty = "Hard"
            encoding = "Base64"
            "#,
        )
        .unwrap();

        assert!(config.manage_rate_limit);
        assert_eq!(config.question_amount, 5);
        assert_eq!(config.category_ids, vec![9, 10]);
        assert_eq!(config.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.encoding, Some(EncodingType::Base64));
        assert_eq!(config.token_api_url, "https://opentdb.com/api_token.php");
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/opentrivia.toml");
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("9, 10,11"), Some(vec![9, 10, 11]));
        assert_eq!(parse_id_list(""), Some(vec![]));
        assert_eq!(parse_id_list("9,x"), None);
    }
}
