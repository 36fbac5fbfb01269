//! 评分卡数据模型
//!
//! 评分卡是一组带分值范围的评分标准，用于主观题的评判。
//! 身份分三类（互斥，派生得出，不落库）：
//! - 已发布（published）：数字 id，已持久化在机构级评分卡库
//! - 会话共享（session-linked）：字符串 id，被 ≥2 道题引用
//! - 会话私有（session-owned）：字符串 id，本次编辑会话新建且未共享

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 评分卡 id
///
/// 已发布评分卡的 id 是后端分配的数字；会话内新建的评分卡用本地字符串 id。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScorecardId {
    Published(i64),
    Session(String),
}

impl ScorecardId {
    /// 生成一个新的会话本地 id
    pub fn fresh_session() -> Self {
        ScorecardId::Session(format!("local-{}", Uuid::new_v4()))
    }

    pub fn is_published(&self) -> bool {
        matches!(self, ScorecardId::Published(_))
    }

    /// 字符串 id 视图；数字 id 返回 None
    pub fn as_session(&self) -> Option<&str> {
        match self {
            ScorecardId::Session(id) => Some(id),
            ScorecardId::Published(_) => None,
        }
    }
}

/// 单条评分标准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    pub min_score: i32,
    pub max_score: i32,
}

impl Criterion {
    /// 空白标准，默认分值范围 [1, 5]
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            min_score: 1,
            max_score: 5,
        }
    }
}

/// 评分卡
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardTemplate {
    pub id: ScorecardId,
    pub name: String,
    pub criteria: Vec<Criterion>,
    /// 只有内置起始模板为 true，模板本身从不被原地修改
    #[serde(default)]
    pub is_template: bool,
    /// 只有本次编辑会话新建、尚未共享的评分卡为 true
    #[serde(default)]
    pub is_new: bool,
}

/// 评分卡身份分类（派生值，从当前引用计数算出，不存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorecardClass {
    Published,
    SessionLinked,
    SessionOwned,
}
