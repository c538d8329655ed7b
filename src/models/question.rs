use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// 单选题
    MultipleChoice,
    /// 判断题
    TrueFalse,
}

impl QuestionType {
    /// 查询参数中使用的标签
    pub fn as_query(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple",
            QuestionType::TrueFalse => "boolean",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple" | "multiplechoice" => Ok(QuestionType::MultipleChoice),
            "boolean" | "truefalse" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type: {}", other)),
        }
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_query(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown question difficulty: {}", other)),
        }
    }
}

/// 一道题目
///
/// 只由 [`ResponseDecoder`](crate::services::ResponseDecoder) 构造，
/// 同一批次中同名分类共享同一个 `Arc<Category>`
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    category: Arc<Category>,
    #[serde(rename = "type")]
    question_type: QuestionType,
    difficulty: Difficulty,
    text: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl Question {
    pub(crate) fn new(
        category: Arc<Category>,
        question_type: QuestionType,
        difficulty: Difficulty,
        text: String,
        correct_answer: String,
        incorrect_answers: Vec<String>,
    ) -> Self {
        Self {
            category,
            question_type,
            difficulty,
            text,
            correct_answer,
            incorrect_answers,
        }
    }

    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// 题干
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// 正确答案与错误答案合并后的全部选项（正确答案在前）
    pub fn all_answers(&self) -> Vec<&str> {
        std::iter::once(self.correct_answer.as_str())
            .chain(self.incorrect_answers.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {:?} | {:?}] {}",
            self.category, self.question_type, self.difficulty, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_tags() {
        assert_eq!(QuestionType::MultipleChoice.as_query(), "multiple");
        assert_eq!(QuestionType::TrueFalse.as_query(), "boolean");
        assert_eq!(Difficulty::Medium.as_query(), "medium");
    }

    #[test]
    fn test_parse_from_config_values() {
        assert_eq!("Boolean".parse::<QuestionType>().unwrap(), QuestionType::TrueFalse);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_all_answers_puts_correct_first() {
        let question = Question::new(
            Arc::new(Category::new(9, "General Knowledge")),
            QuestionType::MultipleChoice,
            Difficulty::Easy,
            "2 + 2 = ?".to_string(),
            "4".to_string(),
            vec!["3".to_string(), "5".to_string()],
        );
        assert_eq!(question.all_answers(), vec!["4", "3", "5"]);
    }
}
