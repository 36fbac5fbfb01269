//! 后端线上数据结构与映射
//!
//! 负责加载 / 保存 / 发布三条通路的载荷形状，以及与核心模型之间的
//! 双向映射。发布载荷里评分卡按身份分流：已发布评分卡只传数字 id，
//! 会话新建 / 共享评分卡传完整对象。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::block::ContentBlock;
use crate::models::question::{InputType, QuestionRecord, QuestionType};
use crate::models::scorecard::{
    Criterion, ScorecardClass, ScorecardId, ScorecardTemplate,
};
use crate::models::session::QuizSession;
use crate::services::scorecard_registry;

// ========== 加载（读）==========

/// 任务测验资源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResource {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionResource>,
}

/// 题目的辅助上下文
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContextResource {
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub material_ids: Vec<String>,
}

/// 单道题目资源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question_type: QuestionType,
    pub input_type: InputType,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub answer: Vec<ContentBlock>,
    /// 机构评分卡的数字引用，与 inline 评分卡二选一
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecard_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<ScorecardResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<QuestionContextResource>,
    #[serde(default)]
    pub coding_languages: Vec<String>,
}

/// 机构级评分卡资源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardResource {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub criteria: Vec<CriterionResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResource {
    pub name: String,
    pub description: String,
    pub min_score: i32,
    pub max_score: i32,
}

impl From<CriterionResource> for Criterion {
    fn from(res: CriterionResource) -> Self {
        Criterion {
            name: res.name,
            description: res.description,
            min_score: res.min_score,
            max_score: res.max_score,
        }
    }
}

impl From<&Criterion> for CriterionResource {
    fn from(criterion: &Criterion) -> Self {
        CriterionResource {
            name: criterion.name.clone(),
            description: criterion.description.clone(),
            min_score: criterion.min_score,
            max_score: criterion.max_score,
        }
    }
}

impl ScorecardResource {
    /// 映射为核心模型：已持久化，既不是模板也不是会话新建
    pub fn into_template(self) -> ScorecardTemplate {
        ScorecardTemplate {
            id: ScorecardId::Published(self.id),
            name: self.title,
            criteria: self.criteria.into_iter().map(Criterion::from).collect(),
            is_template: false,
            is_new: false,
        }
    }
}

impl QuestionResource {
    /// 映射为核心模型；数字评分卡引用在已加载的机构评分卡池里解析
    pub fn into_record(self, pool: &[ScorecardTemplate]) -> QuestionRecord {
        let scorecard_data = if let Some(inline) = self.scorecard {
            Some(inline.into_template())
        } else {
            self.scorecard_id.and_then(|id| {
                pool.iter()
                    .find(|entry| entry.id == ScorecardId::Published(id))
                    .cloned()
            })
        };

        let (knowledge_base_blocks, linked_material_ids) = self
            .context
            .map(|ctx| (ctx.blocks, ctx.material_ids))
            .unwrap_or_default();

        let question_type = self.question_type;
        let mut record = QuestionRecord::new(
            question_type,
            self.input_type,
            self.coding_languages,
            self.content,
        );
        if let Some(id) = self.id {
            record.id = id;
        }
        record.config.correct_answer = self.answer;
        record.config.scorecard_data = scorecard_data;
        record.config.knowledge_base_blocks = knowledge_base_blocks;
        record.config.linked_material_ids = linked_material_ids;
        record
    }

    /// 从核心模型映射为保存载荷（草稿保存不携带评分卡）
    pub fn from_record(record: &QuestionRecord) -> Self {
        let context = if record.config.knowledge_base_blocks.is_empty()
            && record.config.linked_material_ids.is_empty()
        {
            None
        } else {
            Some(QuestionContextResource {
                blocks: record.config.knowledge_base_blocks.clone(),
                material_ids: record.config.linked_material_ids.clone(),
            })
        };

        QuestionResource {
            id: Some(record.id.clone()),
            question_type: record.config.question_type,
            input_type: record.config.input_type,
            content: record.content.clone(),
            answer: record.config.correct_answer.clone(),
            scorecard_id: None,
            scorecard: None,
            context,
            coding_languages: record.config.coding_languages.clone(),
        }
    }
}

// ========== 保存（写，草稿态）==========

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftPayload {
    pub task_id: String,
    pub title: String,
    pub questions: Vec<QuestionResource>,
}

/// 构建草稿保存载荷
pub fn build_save_payload(session: &QuizSession, task_id: &str, title: &str) -> SaveDraftPayload {
    SaveDraftPayload {
        task_id: task_id.to_string(),
        title: title.to_string(),
        questions: session
            .questions
            .iter()
            .map(QuestionResource::from_record)
            .collect(),
    }
}

// ========== 发布（写）==========

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    pub task_id: String,
    pub title: String,
    pub questions: Vec<PublishQuestionPayload>,
    /// 定时发布时间，缺省立即发布
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishQuestionPayload {
    pub id: String,
    pub question_type: QuestionType,
    pub input_type: InputType,
    pub content: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answer: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<QuestionContextResource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coding_languages: Vec<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<ScorecardPayload>,
}

/// 发布载荷里的评分卡：按身份分流
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ScorecardPayload {
    /// 已发布评分卡只传引用
    #[serde(rename_all = "camelCase")]
    ByReference { scorecard_id: i64 },
    /// 会话新建 / 共享评分卡传完整对象
    #[serde(rename_all = "camelCase")]
    Inline { scorecard: InlineScorecard },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineScorecard {
    pub id: ScorecardId,
    pub name: String,
    pub criteria: Vec<CriterionResource>,
}

impl InlineScorecard {
    fn from_template(template: &ScorecardTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            criteria: template.criteria.iter().map(CriterionResource::from).collect(),
        }
    }
}

/// 构建发布载荷
pub fn build_publish_payload(
    session: &QuizSession,
    task_id: &str,
    title: &str,
    publish_at: Option<DateTime<Utc>>,
) -> PublishPayload {
    let questions = session
        .questions
        .iter()
        .map(|record| {
            let scorecard = record.config.scorecard_data.as_ref().map(|sc| {
                match scorecard_registry::classify(session, sc) {
                    ScorecardClass::Published => match &sc.id {
                        ScorecardId::Published(id) => {
                            ScorecardPayload::ByReference { scorecard_id: *id }
                        }
                        // 分类为已发布则 id 必为数字；防御性兜底传完整对象
                        ScorecardId::Session(_) => ScorecardPayload::Inline {
                            scorecard: InlineScorecard::from_template(sc),
                        },
                    },
                    ScorecardClass::SessionOwned | ScorecardClass::SessionLinked => {
                        ScorecardPayload::Inline {
                            scorecard: InlineScorecard::from_template(sc),
                        }
                    }
                }
            });

            let context = if record.config.knowledge_base_blocks.is_empty()
                && record.config.linked_material_ids.is_empty()
            {
                None
            } else {
                Some(QuestionContextResource {
                    blocks: record.config.knowledge_base_blocks.clone(),
                    material_ids: record.config.linked_material_ids.clone(),
                })
            };

            PublishQuestionPayload {
                id: record.id.clone(),
                question_type: record.config.question_type,
                input_type: record.config.input_type,
                content: record.content.clone(),
                answer: record.config.correct_answer.clone(),
                context,
                coding_languages: record.config.coding_languages.clone(),
                scorecard,
            }
        })
        .collect();

    PublishPayload {
        task_id: task_id.to_string(),
        title: title.to_string(),
        questions,
        publish_at,
    }
}

/// 把加载结果组装进会话：先入池评分卡，再解析题目
pub fn apply_loaded_quiz(
    session: &mut QuizSession,
    quiz: QuizResource,
    org_scorecards: Vec<ScorecardResource>,
) {
    session.scorecard_pool = org_scorecards
        .into_iter()
        .map(ScorecardResource::into_template)
        .collect();
    session.questions = quiz
        .questions
        .into_iter()
        .map(|res| res.into_record(&session.scorecard_pool))
        .collect();
}
