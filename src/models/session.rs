//! 编辑会话聚合
//!
//! 会话独占持有题目序列和评分卡池；评分卡注册表只是同一份数据上的
//! 视图，任何身份分类都从题目列表的实时引用计数算出，不允许出现
//! 两份分歧的拷贝。

use crate::models::question::{EditorTab, QuestionRecord};
use crate::models::scorecard::{ScorecardId, ScorecardTemplate};

/// 一次测验编辑会话
#[derive(Debug, Clone)]
pub struct QuizSession {
    /// 当前会话归属的任务 id。切换任务时会话被拆除重建。
    pub task_id: Option<String>,
    /// 有序题目序列，顺序即题号与导航顺序
    pub questions: Vec<QuestionRecord>,
    /// 评分卡池：机构级已发布评分卡 + 会话内新建评分卡
    pub scorecard_pool: Vec<ScorecardTemplate>,
    /// 当前题目指针，序列非空时恒为合法下标
    pub current_index: usize,
    pub active_tab: EditorTab,
    /// 每次外部数据加载时捕获一次的深拷贝，用于取消 / 回退
    pub original_snapshot: Option<Vec<QuestionRecord>>,
    /// 同一任务只加载一次；任务 id 变化时复位
    pub loaded: bool,
    /// 发布防重入标志
    pub publish_in_progress: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// 创建空会话（草稿测验从空会话开始）
    pub fn new() -> Self {
        Self {
            task_id: None,
            questions: Vec::new(),
            scorecard_pool: Vec::new(),
            current_index: 0,
            active_tab: EditorTab::Question,
            original_snapshot: None,
            loaded: false,
            publish_in_progress: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// 当前题目；空会话返回 None
    pub fn current(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current_index)
    }

    pub fn current_mut(&mut self) -> Option<&mut QuestionRecord> {
        self.questions.get_mut(self.current_index)
    }

    /// 统计指定评分卡 id 在整个会话内的引用次数
    pub fn scorecard_ref_count(&self, id: &ScorecardId) -> usize {
        self.questions
            .iter()
            .filter_map(|q| q.config.scorecard_data.as_ref())
            .filter(|sc| &sc.id == id)
            .count()
    }

    /// 按 id 查找池内评分卡
    pub fn pool_entry(&self, id: &ScorecardId) -> Option<&ScorecardTemplate> {
        self.scorecard_pool.iter().find(|sc| &sc.id == id)
    }

    /// 捕获回退快照（深拷贝）。每次外部数据加载调用一次。
    pub fn capture_snapshot(&mut self) {
        self.original_snapshot = Some(self.questions.clone());
    }

    /// 拆除会话：清空序列与池，复位所有守卫标志
    pub fn teardown(&mut self) {
        self.task_id = None;
        self.questions.clear();
        self.scorecard_pool.clear();
        self.current_index = 0;
        self.active_tab = EditorTab::Question;
        self.original_snapshot = None;
        self.loaded = false;
        self.publish_in_progress = false;
    }
}
