pub mod block;
pub mod language;
pub mod question;
pub mod scorecard;
pub mod session;

pub use block::{ContentBlock, TextRun};
pub use language::{normalize_selection, LanguageNotice};
pub use question::{
    EditorTab, InputType, QuestionConfig, QuestionRecord, QuestionType, ResponseType,
};
pub use scorecard::{Criterion, ScorecardClass, ScorecardId, ScorecardTemplate};
pub use session::QuizSession;
