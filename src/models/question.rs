//! 题目数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::block::ContentBlock;
use crate::models::scorecard::ScorecardTemplate;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// 客观题：有标准答案
    Objective,
    /// 主观题：按评分卡评判
    Subjective,
    /// 编程题：有标准答案 + 语言限定
    Coding,
}

impl QuestionType {
    /// 由题目类型派生的作答形式
    pub fn response_type(self) -> ResponseType {
        match self {
            QuestionType::Subjective => ResponseType::Report,
            QuestionType::Objective | QuestionType::Coding => ResponseType::Chat,
        }
    }
}

/// 期望的作答输入形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Code,
    Audio,
}

/// 作答形式（派生值，随题目类型变化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Chat,
    Report,
}

/// 编辑器标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    Question,
    Answer,
    Scorecard,
    Knowledge,
}

impl EditorTab {
    /// 标签页对指定题目类型是否合法
    ///
    /// - Scorecard 只对主观题合法
    /// - Answer 只对客观题 / 编程题合法
    /// - Question / Knowledge 对所有类型合法
    pub fn is_valid_for(self, question_type: QuestionType) -> bool {
        match self {
            EditorTab::Scorecard => question_type == QuestionType::Subjective,
            EditorTab::Answer => question_type != QuestionType::Subjective,
            EditorTab::Question | EditorTab::Knowledge => true,
        }
    }
}

/// 题目的答案 / 评判配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionConfig {
    pub question_type: QuestionType,
    pub input_type: InputType,
    pub response_type: ResponseType,
    /// 标准答案（客观题 / 编程题）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correct_answer: Vec<ContentBlock>,
    /// 评分卡（主观题）。每道题持有自己的一份拷贝，共享 id 的拷贝由
    /// sync_linked 保持一致。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecard_data: Option<ScorecardTemplate>,
    /// 辅助上下文内容，不展示给答题者
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_base_blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_material_ids: Vec<String>,
    /// 编程题的语言限定
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding_languages: Vec<String>,
}

/// 一道题目：题干内容 + 评判配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 创建时生成，稳定且不复用
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub config: QuestionConfig,
}

impl QuestionRecord {
    /// 创建新题目
    pub fn new(
        question_type: QuestionType,
        input_type: InputType,
        coding_languages: Vec<String>,
        content: Vec<ContentBlock>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            config: QuestionConfig {
                question_type,
                input_type,
                response_type: question_type.response_type(),
                correct_answer: Vec::new(),
                scorecard_data: None,
                knowledge_base_blocks: Vec::new(),
                linked_material_ids: Vec::new(),
                coding_languages,
            },
        }
    }
}
