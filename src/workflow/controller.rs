//! 测验编辑会话控制器 - 流程层
//!
//! 独占持有题目序列与评分卡池，维护 `{当前题目指针, 活动标签页}`
//! 状态机，编排变更、同步与保存 / 发布。
//!
//! 所有同步操作彼此原子；控制器运行在单一事件循环上，异步工作
//! （加载、保存、发布）完成后以一次原子更新落回状态。
//!
//! 防御性约定：空会话或越界下标的调用一律作为 no-op 处理，不崩溃。

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::api::dto;
use crate::clients::QuizApiClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::block::ContentBlock;
use crate::models::language::{self, LanguageNotice};
use crate::models::question::{EditorTab, InputType, QuestionRecord, QuestionType};
use crate::models::scorecard::{Criterion, ScorecardId, ScorecardTemplate};
use crate::models::session::QuizSession;
use crate::services::validation::{self, FailureField};
use crate::services::{scorecard_registry, template_synthesizer};
use crate::utils::logging;
use crate::workflow::events::EditorEvent;

/// 导航方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// 进行中的字段高亮。高亮是一次性的，超过配置的延迟后自动消失。
#[derive(Debug, Clone)]
struct ActiveHighlight {
    question_index: usize,
    field: FailureField,
    expires_at: Instant,
}

/// 测验编辑会话控制器
pub struct QuizSessionController {
    config: Config,
    session: QuizSession,
    pending_events: Vec<EditorEvent>,
    highlight: Option<ActiveHighlight>,
}

impl QuizSessionController {
    /// 创建控制器，会话从空开始
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: QuizSession::new(),
            pending_events: Vec::new(),
            highlight: None,
        }
    }

    /// 当前会话状态（只读）
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// 取走积累的事件，表现层逐帧消费
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// 当前生效的字段高亮；超过配置延迟后自动失效
    pub fn active_highlight(&self) -> Option<(usize, FailureField)> {
        self.highlight
            .as_ref()
            .filter(|h| Instant::now() < h.expires_at)
            .map(|h| (h.question_index, h.field))
    }

    fn emit(&mut self, event: EditorEvent) {
        self.pending_events.push(event);
    }

    // ========== 题目集合操作 ==========

    /// 追加一道新题
    ///
    /// 类型 / 输入形式 / 语言限定继承自最后一道题（空会话用默认值
    /// 客观题 / 文字 / 无语言），内容来自模板合成器，指针移到新题，
    /// 标签页复位到题目页。
    pub fn append(&mut self) {
        let (question_type, input_type, languages) = match self.session.questions.last() {
            Some(last) => (
                last.config.question_type,
                last.config.input_type,
                last.config.coding_languages.clone(),
            ),
            None => (QuestionType::Objective, InputType::Text, Vec::new()),
        };

        let content = template_synthesizer::synthesize_template(question_type);
        self.session
            .questions
            .push(QuestionRecord::new(question_type, input_type, languages, content));
        self.session.current_index = self.session.len() - 1;
        self.session.active_tab = EditorTab::Question;

        info!("➕ 追加第 {} 题", self.session.len());
        self.emit(EditorEvent::SessionChanged);
    }

    /// 删除指定下标的题目
    ///
    /// 只剩一道题时整个序列清空；否则删除后把指针钳制回合法范围。
    pub fn remove(&mut self, index: usize) {
        if index >= self.session.len() {
            return;
        }

        if self.session.len() == 1 {
            self.session.questions.clear();
            self.session.current_index = 0;
            self.session.active_tab = EditorTab::Question;
        } else {
            self.session.questions.remove(index);
            self.session.current_index =
                self.session.current_index.min(self.session.len() - 1);
            self.ensure_tab_valid();
        }

        self.emit(EditorEvent::SessionChanged);
    }

    /// 前后导航，钳制在边界内，不回绕
    ///
    /// 目的题型与当前标签页不兼容时复位到题目页。
    pub fn navigate(&mut self, direction: NavDirection) {
        if self.session.is_empty() {
            return;
        }

        let destination = match direction {
            NavDirection::Prev => self.session.current_index.saturating_sub(1),
            NavDirection::Next => {
                (self.session.current_index + 1).min(self.session.len() - 1)
            }
        };

        self.session.current_index = destination;
        self.ensure_tab_valid();
        self.emit(EditorEvent::SessionChanged);
    }

    fn ensure_tab_valid(&mut self) {
        if let Some(question) = self.session.current() {
            if !self
                .session
                .active_tab
                .is_valid_for(question.config.question_type)
            {
                self.session.active_tab = EditorTab::Question;
            }
        }
    }

    /// 切换活动标签页；目标标签页对当前题型不合法时忽略
    pub fn set_active_tab(&mut self, tab: EditorTab) {
        let Some(question) = self.session.current() else {
            return;
        };
        if tab.is_valid_for(question.config.question_type) {
            self.session.active_tab = tab;
        }
    }

    // ========== 当前题目编辑 ==========

    /// 修改当前题目类型
    ///
    /// 同步更新派生的作答形式；内容仍是原始模板时换成新类型的模板，
    /// 用户编辑过的内容原样保留。强制回到题目标签页。
    pub fn set_question_type(&mut self, new_type: QuestionType) {
        let Some(question) = self.session.current_mut() else {
            return;
        };

        question.config.question_type = new_type;
        question.config.response_type = new_type.response_type();
        if template_synthesizer::is_pristine(&question.content) {
            question.content = template_synthesizer::synthesize_template(new_type);
        }
        self.session.active_tab = EditorTab::Question;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 修改当前题目的作答输入形式
    pub fn set_input_type(&mut self, input_type: InputType) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        question.config.input_type = input_type;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 块编辑器回调：当前题目的题干内容被替换为新的块序列
    pub fn set_content(&mut self, blocks: Vec<ContentBlock>) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        question.content = blocks;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 更新当前题目的标准答案
    pub fn set_correct_answer(&mut self, blocks: Vec<ContentBlock>) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        question.config.correct_answer = blocks;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 更新当前题目的知识库辅助内容
    pub fn set_knowledge_blocks(&mut self, blocks: Vec<ContentBlock>) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        question.config.knowledge_base_blocks = blocks;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 更新当前题目关联的材料 id 列表
    pub fn set_linked_materials(&mut self, material_ids: Vec<String>) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        question.config.linked_material_ids = material_ids;
        self.emit(EditorEvent::SessionChanged);
    }

    /// 更新当前题目的编程语言选择，应用独占 / 依赖规则
    pub fn set_coding_languages(&mut self, selection: Vec<String>) {
        if self.session.current().is_none() {
            return;
        }

        let (normalized, notice) = language::normalize_selection(&selection);
        if let Some(question) = self.session.current_mut() {
            question.config.coding_languages = normalized;
        }

        match notice {
            Some(LanguageNotice::ExclusiveCollapsed { kept, discarded }) => {
                let message = format!(
                    "{} 代表完整运行环境，不能与 {} 同时选择，已仅保留 {}",
                    kept,
                    discarded.join("、"),
                    kept
                );
                warn!("⚠️ {}", message);
                self.emit(EditorEvent::Notice {
                    title: "语言选择已调整".to_string(),
                    message,
                });
            }
            Some(LanguageNotice::MarkupAutoAdded { styling, markup }) => {
                let message =
                    format!("{} 依赖 {}，已自动添加 {}", styling, markup, markup);
                info!("💡 {}", message);
                self.emit(EditorEvent::Notice {
                    title: "已自动补充语言".to_string(),
                    message,
                });
            }
            None => {}
        }

        self.emit(EditorEvent::SessionChanged);
    }

    // ========== 评分卡操作 ==========

    /// 为当前题目新建并挂上一张空白评分卡
    pub fn create_blank_scorecard(&mut self) {
        if self.session.current().is_none() {
            return;
        }
        let scorecard = scorecard_registry::create_blank();
        self.session.scorecard_pool.push(scorecard.clone());
        if let Some(question) = self.session.current_mut() {
            question.config.scorecard_data = Some(scorecard);
        }
        self.emit(EditorEvent::SessionChanged);
    }

    /// 把来源评分卡挂到当前题目
    ///
    /// 内置模板生成全新本地副本；已有评分卡（已发布或本会话创建）
    /// 生成引用拷贝，即链接而非克隆。
    pub fn set_scorecard(&mut self, source: &ScorecardTemplate) {
        if self.session.current().is_none() {
            return;
        }

        let attached = scorecard_registry::instantiate_from_template(source);
        // 会话本地 id 必须在池中有对应条目，分类与删除都依赖池
        if matches!(attached.id, ScorecardId::Session(_))
            && self.session.pool_entry(&attached.id).is_none()
        {
            self.session.scorecard_pool.push(attached.clone());
        }
        if let Some(question) = self.session.current_mut() {
            question.config.scorecard_data = Some(attached);
        }
        self.emit(EditorEvent::SessionChanged);
    }

    /// 原地编辑当前题目的评分卡名称 / 标准
    ///
    /// 会话评分卡（字符串 id）的修改同步到所有共享该 id 的题目；
    /// 已发布评分卡只更新当前题目的本地拷贝，后端数据不动。
    pub fn update_scorecard(
        &mut self,
        new_name: Option<&str>,
        new_criteria: Option<&[Criterion]>,
    ) {
        let Some(question) = self.session.current_mut() else {
            return;
        };
        let Some(scorecard) = question.config.scorecard_data.as_mut() else {
            return;
        };

        match scorecard.id.clone() {
            ScorecardId::Session(source_id) => {
                scorecard_registry::sync_linked(
                    &mut self.session,
                    &source_id,
                    new_name,
                    new_criteria,
                );
            }
            ScorecardId::Published(_) => {
                if let Some(name) = new_name {
                    scorecard.name = name.to_string();
                }
                if let Some(criteria) = new_criteria {
                    scorecard.criteria = criteria.to_vec();
                }
            }
        }
        self.emit(EditorEvent::SessionChanged);
    }

    /// 从当前题目摘除评分卡；孤儿化的会话评分卡同时从池中删除
    pub fn clear_scorecard(&mut self) {
        scorecard_registry::detach_and_maybe_delete(&mut self.session);
        self.emit(EditorEvent::SessionChanged);
    }

    // ========== 回退 ==========

    /// 放弃会话内全部编辑，从加载时的快照深拷贝恢复
    ///
    /// 从未捕获过快照时是 no-op。
    pub fn revert(&mut self) {
        let Some(snapshot) = self.session.original_snapshot.clone() else {
            return;
        };
        self.session.questions = snapshot;
        if !self.session.is_empty() {
            self.session.current_index =
                self.session.current_index.min(self.session.len() - 1);
        } else {
            self.session.current_index = 0;
        }
        self.ensure_tab_valid();
        info!("↩️ 已回退到上次加载的内容");
        self.emit(EditorEvent::SessionChanged);
    }

    // ========== 校验与发布 ==========

    /// 发布前校验
    ///
    /// 失败时执行导航 / 切标签页 / 高亮副作用并对外报告；
    /// 通过时返回 true 且无任何副作用。
    pub fn validate_before_publish(&mut self) -> bool {
        match validation::validate(&self.session) {
            None => true,
            Some(failure) => {
                self.apply_validation_failure(failure);
                false
            }
        }
    }

    fn apply_validation_failure(&mut self, failure: validation::ValidationFailure) {
        warn!("⚠️ 校验失败: {}", failure.message);

        if let Some(index) = failure.question_index {
            self.session.current_index = index;
            self.session.active_tab = failure.required_tab;
            if let Some(field) = failure.field {
                self.highlight = Some(ActiveHighlight {
                    question_index: index,
                    field,
                    expires_at: Instant::now()
                        + Duration::from_millis(self.config.highlight_clear_ms),
                });
                self.emit(EditorEvent::Highlight {
                    question_index: index,
                    field,
                });
            }
        }

        self.emit(EditorEvent::ValidationFailed {
            title: "暂时无法发布".to_string(),
            message: failure.message,
        });
    }

    // ========== 生命周期与异步通路 ==========

    /// 拆除会话：清空序列与池，复位守卫标志
    pub fn teardown(&mut self) {
        self.session.teardown();
        self.highlight = None;
        self.pending_events.clear();
    }

    /// 把一次加载结果原子落回会话（异步通路的唯一同步落点）
    ///
    /// 捕获回退快照、复位指针与标签页、标记加载完成。返回测验标题，
    /// 标题由外层持有，不属于会话状态。
    pub fn apply_load_result(
        &mut self,
        task_id: &str,
        quiz: dto::QuizResource,
        org_scorecards: Vec<dto::ScorecardResource>,
    ) -> String {
        let title = quiz.title.clone();
        self.session.task_id = Some(task_id.to_string());
        dto::apply_loaded_quiz(&mut self.session, quiz, org_scorecards);
        self.session.loaded = true;
        self.session.current_index = 0;
        self.session.active_tab = EditorTab::Question;
        self.session.capture_snapshot();
        info!(
            "📥 「{}」加载完成: {} 题，评分卡池 {} 张",
            logging::truncate_text(&title, 40),
            self.session.len(),
            self.session.scorecard_pool.len()
        );
        self.emit(EditorEvent::SessionChanged);
        title
    }

    /// 加载任务数据（题目 + 机构评分卡），返回测验标题
    ///
    /// 同一任务只加载一次；任务 id 变化时先拆除旧会话。加载失败不是
    /// 阻断性错误：记录诊断日志、标记加载完成（避免无限重试）、
    /// 序列保持为空。
    pub async fn load(
        &mut self,
        client: &QuizApiClient,
        task_id: &str,
    ) -> Option<String> {
        if self.session.loaded && self.session.task_id.as_deref() == Some(task_id) {
            return None;
        }
        if self.session.task_id.as_deref() != Some(task_id) {
            self.teardown();
        }
        self.session.task_id = Some(task_id.to_string());
        logging::log_session_start(task_id);

        // 给在途请求打上任务标签，完成后不匹配则丢弃
        let issued_for = task_id.to_string();
        let (quiz_result, scorecards_result) = futures::join!(
            client.fetch_task(task_id),
            client.fetch_org_scorecards(self.config.org_id)
        );

        // load 独占借用控制器贯穿 await，任务 id 在途中不可能变，
        // 这条分支按构造不可达；若外壳改成并发驱动则成为真实护栏
        if self.session.task_id.as_deref() != Some(issued_for.as_str()) {
            warn!("任务已切换，丢弃 {} 的过期加载结果", issued_for);
            return None;
        }

        match (quiz_result, scorecards_result) {
            (Ok(quiz), Ok(scorecards)) => {
                Some(self.apply_load_result(task_id, quiz, scorecards))
            }
            (quiz_result, scorecards_result) => {
                if let Err(e) = quiz_result {
                    error!("任务 {} 的测验加载失败: {}", task_id, e);
                }
                if let Err(e) = scorecards_result {
                    error!("机构评分卡加载失败: {}", e);
                }
                // 无论成败都标记加载完成，避免无限重试
                self.session.loaded = true;
                self.session.capture_snapshot();
                self.emit(EditorEvent::SessionChanged);
                None
            }
        }
    }

    /// 保存草稿。失败时向调用方返回带原因的错误，内存编辑不回滚。
    pub async fn save(&mut self, client: &QuizApiClient, title: &str) -> AppResult<()> {
        let Some(task_id) = self.session.task_id.clone() else {
            return Ok(());
        };

        let payload = dto::build_save_payload(&self.session, &task_id, title);
        match client.save_draft(&payload).await {
            Ok(()) => {
                info!("💾 草稿已保存: {} 题", payload.questions.len());
                Ok(())
            }
            Err(e) => {
                error!("草稿保存失败: {}", e);
                Err(AppError::save_failed(e.to_string()))
            }
        }
    }

    /// 发布测验
    ///
    /// 发布不可重入：进行中时重复请求被忽略。校验失败返回 false。
    /// 持久化失败会清除进行中标志以便重试，且不丢弃内存中的题目。
    pub async fn publish(
        &mut self,
        client: &QuizApiClient,
        title: &str,
        publish_at: Option<DateTime<Utc>>,
    ) -> AppResult<bool> {
        if self.session.publish_in_progress {
            warn!("发布进行中，忽略重复请求");
            return Ok(false);
        }
        if !self.validate_before_publish() {
            return Ok(false);
        }
        let Some(task_id) = self.session.task_id.clone() else {
            return Ok(false);
        };

        self.session.publish_in_progress = true;
        let payload = dto::build_publish_payload(&self.session, &task_id, title, publish_at);
        let result = client.publish(&payload).await;
        // 失败也要清除标志，允许重试
        self.session.publish_in_progress = false;

        match result {
            Ok(_) => {
                info!("✅ 测验发布成功: {}", title);
                Ok(true)
            }
            Err(e) => {
                error!("测验发布失败: {}", e);
                Err(AppError::publish_failed(e.to_string()))
            }
        }
    }
}
