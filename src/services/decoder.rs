//! 响应解码器 - 业务能力层
//!
//! 把上游 JSON 转换为领域对象，只负责"解码"能力，不关心请求流程
//!
//! ## 分类驻留
//! 解码器持有一个只增不减的 `分类名 → Arc<Category>` 缓存：
//! - 分类列表接口解码时写入权威 id
//! - 题目批次解码时先查本批次，再查缓存，都没有才分配从 1 开始的临时 id

use crate::error::DecodeError;
use crate::models::{
    Category, Difficulty, EncodingType, Question, QuestionCount, QuestionType, ResponseCode,
    SessionToken,
};
use crate::services::text::decode_text;
use phf::phf_map;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// 题目类型标签，同时包含 base64 形式的字面量
// TODO: 若上游调整编码方式，这里的 base64 字面量需要与明文表同步维护
static QUESTION_TYPES: phf::Map<&'static str, QuestionType> = phf_map! {
    "multiple" => QuestionType::MultipleChoice,
    "boolean" => QuestionType::TrueFalse,
    "bXVsdGlwbGU=" => QuestionType::MultipleChoice,
    "Ym9vbGVhbg==" => QuestionType::TrueFalse,
};

/// 难度标签，同时包含 base64 形式的字面量
static DIFFICULTIES: phf::Map<&'static str, Difficulty> = phf_map! {
    "easy" => Difficulty::Easy,
    "medium" => Difficulty::Medium,
    "hard" => Difficulty::Hard,
    "ZWFzeQ==" => Difficulty::Easy,
    "bWVkaXVt" => Difficulty::Medium,
    "aGFyZA==" => Difficulty::Hard,
};

/// 响应解码器
///
/// 职责：
/// - 解析分类列表、题目列表、会话令牌、题目数量
/// - 按编码方式还原字符串
/// - 驻留分类实例
#[derive(Debug, Default)]
pub struct ResponseDecoder {
    categories: Mutex<HashMap<String, Arc<Category>>>,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取 `response_code`，缺失、非数字或未定义的值均为 `Unknown`
    pub fn response_code(document: &JsonValue) -> ResponseCode {
        document
            .get("response_code")
            .and_then(JsonValue::as_i64)
            .map(ResponseCode::from_code)
            .unwrap_or(ResponseCode::Unknown)
    }

    /// 解码会话令牌，`token` 缺失或不是字符串时为空令牌
    pub fn decode_session_token(&self, document: &JsonValue) -> SessionToken {
        let token = document
            .get("token")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        SessionToken::new(token)
    }

    /// 解码分类列表并写入驻留缓存
    ///
    /// `trivia_categories` 缺失时返回空列表；条目的 `id`/`name` 为必填
    pub fn decode_categories(&self, document: &JsonValue) -> Result<Vec<Arc<Category>>, DecodeError> {
        let Some(items) = document.get("trivia_categories").and_then(JsonValue::as_array) else {
            return Ok(Vec::new());
        };

        let mut categories = Vec::with_capacity(items.len());
        for item in items {
            let id = required_u32(item, "id")?;
            let name = required_str(item, "name")?;
            categories.push(Arc::new(Category::new(id, name)));
        }

        let mut cache = self.lock_cache();
        for category in &categories {
            cache.insert(category.name().to_string(), Arc::clone(category));
        }
        debug!("解码分类 {} 个，缓存共 {} 个", categories.len(), cache.len());

        Ok(categories)
    }

    /// 解码题目列表
    ///
    /// # 参数
    /// - `document`: 上游 JSON
    /// - `mode`: 字符串解码方式，`None` 表示原样保留
    ///
    /// # 返回
    /// `results` 缺失时返回空列表；同名分类在本批次内共享同一个实例
    pub fn decode_questions(
        &self,
        document: &JsonValue,
        mode: Option<EncodingType>,
    ) -> Result<Vec<Question>, DecodeError> {
        let Some(items) = document.get("results").and_then(JsonValue::as_array) else {
            return Ok(Vec::new());
        };

        let mut next_id = 1u32;
        let mut batch: HashMap<String, Arc<Category>> = HashMap::new();
        let mut questions = Vec::with_capacity(items.len());

        for item in items {
            let category_name = match item.get("category").and_then(JsonValue::as_str) {
                Some(raw) => decode_text(raw, mode)?,
                None => String::new(),
            };

            let category = match batch.get(&category_name) {
                Some(category) => Arc::clone(category),
                None => {
                    let category = self.intern_category(&category_name, &mut next_id);
                    batch.insert(category_name, Arc::clone(&category));
                    category
                }
            };

            let question_type = decode_tag(
                required_str(item, "type")?,
                mode,
                &QUESTION_TYPES,
                DecodeError::UnknownQuestionType,
            )?;
            let difficulty = decode_tag(
                required_str(item, "difficulty")?,
                mode,
                &DIFFICULTIES,
                DecodeError::UnknownDifficulty,
            )?;
            let text = decode_text(required_str(item, "question")?, mode)?;
            let correct_answer = decode_text(required_str(item, "correct_answer")?, mode)?;
            let incorrect_answers = required_array(item, "incorrect_answers")?
                .iter()
                .map(|answer| {
                    answer
                        .as_str()
                        .ok_or(DecodeError::InvalidField {
                            field: "incorrect_answers",
                            expected: "an array of strings",
                        })
                        .and_then(|s| decode_text(s, mode))
                })
                .collect::<Result<Vec<_>, _>>()?;

            questions.push(Question::new(
                category,
                question_type,
                difficulty,
                text,
                correct_answer,
                incorrect_answers,
            ));
        }

        Ok(questions)
    }

    /// 解码 `category_question_count`，四个计数字段均为必填
    pub fn decode_question_count(&self, document: &JsonValue) -> Result<QuestionCount, DecodeError> {
        let counts = document
            .get("category_question_count")
            .ok_or(DecodeError::MissingField {
                field: "category_question_count",
            })?;

        Ok(QuestionCount {
            total: required_u32(counts, "total_question_count")?,
            easy: required_u32(counts, "total_easy_question_count")?,
            medium: required_u32(counts, "total_medium_question_count")?,
            hard: required_u32(counts, "total_hard_question_count")?,
        })
    }

    /// 查询驻留缓存
    pub fn cached_category(&self, name: &str) -> Option<Arc<Category>> {
        self.lock_cache().get(name).cloned()
    }

    /// 取缓存中的分类，没有则分配临时 id 并写入缓存
    fn intern_category(&self, name: &str, next_id: &mut u32) -> Arc<Category> {
        let mut cache = self.lock_cache();
        if let Some(existing) = cache.get(name) {
            return Arc::clone(existing);
        }
        let category = Arc::new(Category::new(*next_id, name));
        *next_id += 1;
        cache.insert(name.to_string(), Arc::clone(&category));
        category
    }

    // 缓存只追加，不会处于半写状态，可以忽略中毒
    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Category>>> {
        self.categories.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 在封闭集合中匹配标签：先匹配原始值，再匹配解码后的值
fn decode_tag<T: Copy>(
    raw: &str,
    mode: Option<EncodingType>,
    table: &phf::Map<&'static str, T>,
    unknown: fn(String) -> DecodeError,
) -> Result<T, DecodeError> {
    if let Some(value) = table.get(raw) {
        return Ok(*value);
    }
    match decode_text(raw, mode) {
        Ok(decoded) => table
            .get(decoded.as_str())
            .copied()
            .ok_or_else(|| unknown(decoded)),
        Err(_) => Err(unknown(raw.to_string())),
    }
}

fn required<'a>(item: &'a JsonValue, field: &'static str) -> Result<&'a JsonValue, DecodeError> {
    item.get(field).ok_or(DecodeError::MissingField { field })
}

fn required_str<'a>(item: &'a JsonValue, field: &'static str) -> Result<&'a str, DecodeError> {
    required(item, field)?
        .as_str()
        .ok_or(DecodeError::InvalidField {
            field,
            expected: "a string",
        })
}

fn required_u32(item: &JsonValue, field: &'static str) -> Result<u32, DecodeError> {
    required(item, field)?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(DecodeError::InvalidField {
            field,
            expected: "a non-negative integer",
        })
}

fn required_array<'a>(
    item: &'a JsonValue,
    field: &'static str,
) -> Result<&'a Vec<JsonValue>, DecodeError> {
    required(item, field)?
        .as_array()
        .ok_or(DecodeError::InvalidField {
            field,
            expected: "an array",
        })
}
