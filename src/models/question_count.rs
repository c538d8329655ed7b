use serde::Serialize;

/// 某个分类下的题目数量统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuestionCount {
    pub total: u32,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}
