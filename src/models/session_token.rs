use serde::Serialize;
use std::fmt;

/// 会话令牌
///
/// 上游用它避免在同一会话中返回重复题目，空字符串也是合法值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
