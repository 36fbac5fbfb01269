//! API 模块
//!
//! 后端线上数据结构与载荷构建

pub mod dto;

pub use dto::{
    apply_loaded_quiz, build_publish_payload, build_save_payload, CriterionResource,
    InlineScorecard, PublishPayload, PublishQuestionPayload, QuestionContextResource,
    QuestionResource, QuizResource, SaveDraftPayload, ScorecardPayload, ScorecardResource,
};
