pub mod category;
pub mod encoding;
pub mod game;
pub mod question;
pub mod question_count;
pub mod request;
pub mod response;
pub mod session_token;

pub use category::Category;
pub use encoding::EncodingType;
pub use game::TriviaGame;
pub use question::{Difficulty, Question, QuestionType};
pub use question_count::QuestionCount;
pub use request::QuestionRequest;
pub use response::{ApiResponse, ResponseCode};
pub use session_token::SessionToken;
