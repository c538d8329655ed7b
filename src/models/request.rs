//! 题目查询参数

use crate::constants::MAX_AMOUNT;
use crate::error::ArgumentError;
use crate::models::{Category, Difficulty, EncodingType, QuestionType, SessionToken};

/// 一次题目请求的全部参数
///
/// 除 `amount` 外均为可选，未设置的参数不会出现在查询串中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: u32,
    pub category_id: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
    pub encoding: Option<EncodingType>,
    pub token: Option<SessionToken>,
}

impl QuestionRequest {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            category_id: None,
            difficulty: None,
            question_type: None,
            encoding: None,
            token: None,
        }
    }

    pub fn with_category(mut self, category: &Category) -> Self {
        self.category_id = Some(category.id());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingType) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_token(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    /// 校验题目数量，必须在发起任何请求之前调用
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.amount == 0 || self.amount > MAX_AMOUNT {
            return Err(ArgumentError::amount_out_of_range(self.amount));
        }
        Ok(())
    }

    /// 构建查询串
    ///
    /// 参数顺序固定：amount, category, difficulty, type, encode, token
    pub fn to_query(&self) -> String {
        let mut query = format!("amount={}", self.amount);

        if let Some(id) = self.category_id {
            query.push_str(&format!("&category={}", id));
        }
        if let Some(difficulty) = self.difficulty {
            query.push_str(&format!("&difficulty={}", difficulty.as_query()));
        }
        if let Some(question_type) = self.question_type {
            query.push_str(&format!("&type={}", question_type.as_query()));
        }
        if let Some(encode) = self.encoding.and_then(|e| e.as_query()) {
            query.push_str(&format!("&encode={}", encode));
        }
        if let Some(token) = &self.token {
            query.push_str(&format!("&token={}", urlencoding::encode(token.value())));
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_only() {
        assert_eq!(QuestionRequest::new(10).to_query(), "amount=10");
    }

    #[test]
    fn test_full_query_order() {
        let request = QuestionRequest::new(5)
            .with_token(SessionToken::new("abc123"))
            .with_encoding(EncodingType::Base64)
            .with_type(QuestionType::TrueFalse)
            .with_difficulty(Difficulty::Hard)
            .with_category(&Category::new(9, "General Knowledge"));

        assert_eq!(
            request.to_query(),
            "amount=5&category=9&difficulty=hard&type=boolean&encode=base64&token=abc123"
        );
    }

    #[test]
    fn test_default_encoding_is_not_sent() {
        let request = QuestionRequest::new(1).with_encoding(EncodingType::Default);
        assert_eq!(request.to_query(), "amount=1");

        let request = QuestionRequest::new(1).with_encoding(EncodingType::Url3986);
        assert_eq!(request.to_query(), "amount=1&encode=url3986");
    }

    #[test]
    fn test_validate_bounds() {
        assert!(QuestionRequest::new(1).validate().is_ok());
        assert!(QuestionRequest::new(50).validate().is_ok());
        assert_eq!(
            QuestionRequest::new(0).validate(),
            Err(ArgumentError::amount_out_of_range(0))
        );
        assert_eq!(
            QuestionRequest::new(51).validate(),
            Err(ArgumentError::amount_out_of_range(51))
        );
    }
}
