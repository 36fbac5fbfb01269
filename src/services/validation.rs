//! 校验引擎 - 业务能力层
//!
//! 对题目集合做纯检查，产出第一个失败的题目 / 字段。
//! 引擎不改动会话状态，也不做任何界面动作；导航、高亮由控制器
//! 根据结果执行。

use crate::models::question::{EditorTab, QuestionRecord, QuestionType};
use crate::models::scorecard::ScorecardId;
use crate::models::session::QuizSession;
use crate::services::content_extractor;

/// 校验失败指向的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureField {
    /// 题干内容
    Content,
    /// 编程语言选择
    CodingLanguages,
    /// 标准答案
    CorrectAnswer,
    /// 评分卡整体
    Scorecard,
    /// 第 n 条评分标准的名称
    CriterionName(usize),
    /// 第 n 条评分标准的描述
    CriterionDescription(usize),
}

/// 一次校验失败
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// 失败的题目下标；整个会话层面的失败（无题目）为 None
    pub question_index: Option<usize>,
    /// 需要切换到的标签页
    pub required_tab: EditorTab,
    /// 需要高亮的字段；会话层面失败为 None
    pub field: Option<FailureField>,
    pub message: String,
}

impl ValidationFailure {
    fn session_level(message: impl Into<String>) -> Self {
        Self {
            question_index: None,
            required_tab: EditorTab::Question,
            field: None,
            message: message.into(),
        }
    }

    fn at(
        index: usize,
        tab: EditorTab,
        field: FailureField,
        message: impl Into<String>,
    ) -> Self {
        Self {
            question_index: Some(index),
            required_tab: tab,
            field: Some(field),
            message: message.into(),
        }
    }
}

/// 校验整个会话，返回第一个失败；全部通过返回 None
///
/// 检查顺序固定，按题目序列顺序逐题执行，首个失败即返回。
pub fn validate(session: &QuizSession) -> Option<ValidationFailure> {
    // 1. 至少一道题
    if session.is_empty() {
        return Some(ValidationFailure::session_level("测验至少需要一道题目"));
    }

    for (index, question) in session.questions.iter().enumerate() {
        if let Some(failure) = validate_question(index, question) {
            return Some(failure);
        }
    }

    None
}

fn validate_question(index: usize, question: &QuestionRecord) -> Option<ValidationFailure> {
    let number = index + 1;

    // 2. 题干非空：有可提取文本，或存在图片 / 音频 / 视频块
    if content_extractor::is_content_empty(&question.content) {
        return Some(ValidationFailure::at(
            index,
            EditorTab::Question,
            FailureField::Content,
            format!("第 {} 题题干为空，请填写题目内容", number),
        ));
    }

    let question_type = question.config.question_type;

    // 3. 编程题必须限定语言
    if question_type == QuestionType::Coding && question.config.coding_languages.is_empty() {
        return Some(ValidationFailure::at(
            index,
            EditorTab::Question,
            FailureField::CodingLanguages,
            format!("第 {} 题是编程题，请至少选择一种编程语言", number),
        ));
    }

    // 4. 客观题 / 编程题必须有标准答案
    if matches!(question_type, QuestionType::Objective | QuestionType::Coding)
        && content_extractor::extract_text(&question.config.correct_answer).is_empty()
    {
        return Some(ValidationFailure::at(
            index,
            EditorTab::Answer,
            FailureField::CorrectAnswer,
            format!("第 {} 题缺少标准答案", number),
        ));
    }

    // 5. 主观题必须配置评分卡
    if question_type == QuestionType::Subjective {
        let Some(scorecard) = question.config.scorecard_data.as_ref() else {
            return Some(ValidationFailure::at(
                index,
                EditorTab::Scorecard,
                FailureField::Scorecard,
                format!("第 {} 题是主观题，请配置评分卡", number),
            ));
        };

        if scorecard.criteria.is_empty() {
            return Some(ValidationFailure::at(
                index,
                EditorTab::Scorecard,
                FailureField::Scorecard,
                format!("第 {} 题的评分卡至少需要一条评分标准", number),
            ));
        }

        // 只对会话新建的评分卡做逐条严格检查；已发布 / 既有评分卡
        // 由后端保证完整性
        let is_session_new =
            matches!(scorecard.id, ScorecardId::Session(_)) && scorecard.is_new;
        if is_session_new {
            for (ci, criterion) in scorecard.criteria.iter().enumerate() {
                if criterion.name.trim().is_empty() {
                    return Some(ValidationFailure::at(
                        index,
                        EditorTab::Scorecard,
                        FailureField::CriterionName(ci),
                        format!("第 {} 题评分卡的第 {} 条标准缺少名称", number, ci + 1),
                    ));
                }
                if criterion.description.trim().is_empty() {
                    return Some(ValidationFailure::at(
                        index,
                        EditorTab::Scorecard,
                        FailureField::CriterionDescription(ci),
                        format!("第 {} 题评分卡的第 {} 条标准缺少描述", number, ci + 1),
                    ));
                }
            }
        }
    }

    None
}
