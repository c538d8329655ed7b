use serde::Serialize;
use std::fmt;

/// 题目分类
///
/// 构造后不可修改。相等与哈希按值比较（`id` 和 `name`）：
/// 题目批次中分配的临时 id 每批都从 1 开始，仅凭 `id` 会把不同分类视为同一个
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    id: u32,
    name: String,
}

impl Category {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_value() {
        let books = Category::new(1, "Entertainment: Books");
        assert_eq!(books, Category::new(1, "Entertainment: Books"));
        assert_ne!(books, Category::new(1, "General Knowledge"));
        assert_ne!(books, Category::new(10, "Entertainment: Books"));
    }
}
