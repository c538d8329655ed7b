use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 响应编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingType {
    /// 上游默认编码（HTML 实体）
    Default,
    /// RFC 3986 URL 编码
    Url3986,
    Base64,
}

impl EncodingType {
    /// `encode` 查询参数的取值，`Default` 不发送该参数
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            EncodingType::Default => None,
            EncodingType::Url3986 => Some("url3986"),
            EncodingType::Base64 => Some("base64"),
        }
    }
}

impl FromStr for EncodingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(EncodingType::Default),
            "url3986" => Ok(EncodingType::Url3986),
            "base64" => Ok(EncodingType::Base64),
            other => Err(format!("unknown encoding: {}", other)),
        }
    }
}
