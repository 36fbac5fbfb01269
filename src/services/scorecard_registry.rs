//! 评分卡注册表 - 业务能力层
//!
//! 注册表不是独立存储，而是会话评分卡池 + 题目列表之上的视图。
//! 身份分类从实时引用计数派生：第二道题引用同一个字符串 id 的瞬间，
//! 评分卡就隐式变为"会话共享"，不存在显式的链接 / 解链事件。

use tracing::debug;

use crate::models::scorecard::{
    Criterion, ScorecardClass, ScorecardId, ScorecardTemplate,
};
use crate::models::session::QuizSession;

/// 对评分卡做身份分类
///
/// - 数字 id → 已发布
/// - 字符串 id，会话内被 ≥2 道题引用 → 会话共享
/// - 其余 → 会话私有
pub fn classify(session: &QuizSession, scorecard: &ScorecardTemplate) -> ScorecardClass {
    match &scorecard.id {
        ScorecardId::Published(_) => ScorecardClass::Published,
        ScorecardId::Session(_) => {
            if session.scorecard_ref_count(&scorecard.id) >= 2 {
                ScorecardClass::SessionLinked
            } else {
                ScorecardClass::SessionOwned
            }
        }
    }
}

/// 新建空白评分卡：本地字符串 id，一条空标准，默认分值范围 [1, 5]
pub fn create_blank() -> ScorecardTemplate {
    ScorecardTemplate {
        id: ScorecardId::fresh_session(),
        name: String::new(),
        criteria: vec![Criterion::blank()],
        is_template: false,
        is_new: true,
    }
}

/// 从来源评分卡实例化
///
/// 内置起始模板 → 生成全新本地副本（新 id，is_new = true）；
/// 其他来源（已保存的或本会话创建的）→ 引用拷贝，保留原 id，
/// is_new = false，即选择已有评分卡是链接而不是克隆。
pub fn instantiate_from_template(source: &ScorecardTemplate) -> ScorecardTemplate {
    if source.is_template {
        ScorecardTemplate {
            id: ScorecardId::fresh_session(),
            name: source.name.clone(),
            criteria: source.criteria.clone(),
            is_template: false,
            is_new: true,
        }
    } else {
        ScorecardTemplate {
            id: source.id.clone(),
            name: source.name.clone(),
            criteria: source.criteria.clone(),
            is_template: false,
            is_new: false,
        }
    }
}

/// 把名称 / 标准同步到所有共享同一字符串 id 的题目
///
/// 会话私有 / 会话共享评分卡被原地编辑后必须调用，保证共享同一 id
/// 的所有题目观察到相同的值。已发布评分卡的 id 是数字，永远匹配
/// 不上字符串 source_id，因此不会被这条路径修改。
pub fn sync_linked(
    session: &mut QuizSession,
    source_id: &str,
    new_name: Option<&str>,
    new_criteria: Option<&[Criterion]>,
) {
    let mut touched = 0usize;

    for question in &mut session.questions {
        if let Some(scorecard) = question.config.scorecard_data.as_mut() {
            if scorecard.id.as_session() == Some(source_id) {
                if let Some(name) = new_name {
                    scorecard.name = name.to_string();
                }
                if let Some(criteria) = new_criteria {
                    scorecard.criteria = criteria.to_vec();
                }
                touched += 1;
            }
        }
    }

    // 池内条目是同一份数据的索引，同样保持一致
    for entry in &mut session.scorecard_pool {
        if entry.id.as_session() == Some(source_id) {
            if let Some(name) = new_name {
                entry.name = name.to_string();
            }
            if let Some(criteria) = new_criteria {
                entry.criteria = criteria.to_vec();
            }
        }
    }

    debug!("评分卡 {} 同步完成，影响 {} 道题", source_id, touched);
}

/// 从当前题目摘除评分卡；若整个会话的引用计数归零且评分卡是会话
/// 新建的，同时从池中删除。已发布评分卡永不从池中删除。
pub fn detach_and_maybe_delete(session: &mut QuizSession) {
    let Some(question) = session.current_mut() else {
        return;
    };
    let Some(detached) = question.config.scorecard_data.take() else {
        return;
    };

    if detached.id.is_published() {
        return;
    }

    if session.scorecard_ref_count(&detached.id) == 0 {
        let was_new = session
            .pool_entry(&detached.id)
            .map(|entry| entry.is_new)
            .unwrap_or(detached.is_new);
        if was_new {
            session.scorecard_pool.retain(|entry| entry.id != detached.id);
            debug!("评分卡 {:?} 引用归零，已从池中删除", detached.id);
        }
    }
}
