use crate::models::{Category, Question};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// 一局游戏：题目列表及其涉及的分类，构造后只读
#[derive(Debug, Clone, Serialize)]
pub struct TriviaGame {
    questions: Vec<Question>,
    categories: Vec<Arc<Category>>,
}

impl TriviaGame {
    pub fn new(questions: Vec<Question>, categories: Vec<Arc<Category>>) -> Self {
        Self {
            questions,
            categories,
        }
    }

    /// 按题目出现顺序收集去重后的分类
    ///
    /// 以分类名去重：临时 id 在每个解码批次内都从 1 开始，不同批次的分类可能同 id
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let mut seen = HashSet::new();
        let categories = questions
            .iter()
            .filter(|q| seen.insert(q.category().name().to_string()))
            .map(|q| Arc::clone(q.category()))
            .collect();
        Self::new(questions, categories)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn categories(&self) -> &[Arc<Category>] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 某个分类下的题目
    pub fn questions_in<'a>(&'a self, category: &'a Category) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |q| q.category().name() == category.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};

    fn question(category: &Arc<Category>, text: &str) -> Question {
        Question::new(
            Arc::clone(category),
            QuestionType::TrueFalse,
            Difficulty::Easy,
            text.to_string(),
            "True".to_string(),
            vec!["False".to_string()],
        )
    }

    #[test]
    fn test_from_questions_collects_distinct_categories_in_order() {
        let books = Arc::new(Category::new(10, "Entertainment: Books"));
        let film = Arc::new(Category::new(11, "Entertainment: Film"));
        let game = TriviaGame::from_questions(vec![
            question(&film, "a"),
            question(&books, "b"),
            question(&film, "c"),
        ]);

        assert_eq!(game.len(), 3);
        let ids: Vec<u32> = game.categories().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![11, 10]);
        assert_eq!(game.questions_in(&film).count(), 2);
    }

    #[test]
    fn test_categories_with_same_synthetic_id_stay_apart() {
        let knowledge = Arc::new(Category::new(1, "General Knowledge"));
        let books = Arc::new(Category::new(1, "Entertainment: Books"));
        let game = TriviaGame::from_questions(vec![
            question(&knowledge, "a"),
            question(&books, "b"),
            question(&books, "c"),
        ]);

        let names: Vec<&str> = game.categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["General Knowledge", "Entertainment: Books"]);
        assert_eq!(game.questions_in(&knowledge).count(), 1);
        assert_eq!(game.questions_in(&books).count(), 2);
    }

    #[test]
    fn test_empty_game() {
        let game = TriviaGame::from_questions(Vec::new());
        assert!(game.is_empty());
        assert!(game.categories().is_empty());
    }
}
