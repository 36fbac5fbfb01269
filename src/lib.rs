//! # Quiz Author
//!
//! 浏览器端测验（多题考试）编辑工具的核心状态机
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 内容块、题目、评分卡、语言目录、会话聚合
//! - `QuizSession` - 独占持有题目序列与评分卡池
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 模型之上的纯函数能力
//! - `content_extractor` - 不透明内容块的纯文本提取
//! - `template_synthesizer` - 按题型合成起始内容模板
//! - `scorecard_registry` - 评分卡身份分类 / 同步 / 摘除（池上视图）
//! - `validation` - 发布门禁校验，产出首个失败的题目与字段
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 有状态的编辑会话编排
//! - `QuizSessionController` - `{当前题目, 活动标签页}` 状态机，
//!   编排变更、校验、加载与保存 / 发布
//! - `EditorEvent` - 类型化事件流，取代全局事件广播
//!
//! ### ④ 外部协作层（Api / Clients）
//! - `api/` - 线上载荷形状与模型映射
//! - `clients/` - 测验后端 HTTP 客户端
//!
//! 富文本渲染、媒体采集上传、身份会话管理、网络重试策略均不在
//! 本 crate 范围内。

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::QuizApiClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    ContentBlock, EditorTab, InputType, QuestionRecord, QuestionType, QuizSession,
    ScorecardClass, ScorecardId, ScorecardTemplate,
};
pub use services::{validate, ValidationFailure};
pub use workflow::{EditorEvent, NavDirection, QuizSessionController};
