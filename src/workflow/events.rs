//! 编辑器事件流
//!
//! 跨组件信号（提示、高亮、校验失败）不走全局事件广播，而是由
//! 控制器积累成类型化事件，表现层逐帧 drain 消费。

use crate::services::validation::FailureField;

/// 控制器对外发出的类型化事件
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// 一次性的提示信息（语言收敛、自动补充等）
    Notice { title: String, message: String },
    /// 校验失败需要对外（包含外层发布流程）展示
    ValidationFailed { title: String, message: String },
    /// 某题某字段需要高亮
    Highlight {
        question_index: usize,
        field: FailureField,
    },
    /// 会话内容发生变化，表现层需要重绘
    SessionChanged,
}
