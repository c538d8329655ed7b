//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责跨分类的请求调度，只做调度与合并，不做解码或传输。
//!
//! ## 层次关系
//!
//! ```text
//! App (一局游戏)
//!     ↓
//! multi_category (处理 Vec<Category>)
//!     ↓
//! clients::QuestionSource (处理单个分类)
//!     ↓
//! services (能力层：decoder / throttle)
//! ```

pub mod multi_category;

pub use multi_category::get_questions_across_categories;
