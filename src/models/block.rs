//! 内容块数据模型
//!
//! 富文本编辑器产出的是一段有序的"内容块"序列。核心只解读三样东西：
//! 块类型（kind）、行内文本片段、直接 text 字段；其余属性原样透传。

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========== 块类型常量 ==========

pub const KIND_PARAGRAPH: &str = "paragraph";
pub const KIND_HEADING: &str = "heading";
pub const KIND_BULLET_LIST_ITEM: &str = "bulletListItem";
pub const KIND_NUMBERED_LIST_ITEM: &str = "numberedListItem";
pub const KIND_CHECK_LIST_ITEM: &str = "checkListItem";
pub const KIND_CODE_BLOCK: &str = "codeBlock";
pub const KIND_IMAGE: &str = "image";
pub const KIND_AUDIO: &str = "audio";
pub const KIND_VIDEO: &str = "video";

/// 可以提取行内文本的块类型
pub const TEXTUAL_KINDS: [&str; 6] = [
    KIND_PARAGRAPH,
    KIND_HEADING,
    KIND_BULLET_LIST_ITEM,
    KIND_NUMBERED_LIST_ITEM,
    KIND_CHECK_LIST_ITEM,
    KIND_CODE_BLOCK,
];

/// 行内文本片段
///
/// 样式信息（加粗、颜色等）核心不解读，原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub styles: serde_json::Map<String, Value>,
}

impl TextRun {
    /// 创建无样式的文本片段
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: serde_json::Map::new(),
        }
    }
}

/// 不透明内容块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// 块级 id。模板生成的块永远不带 id，编辑器编辑过的块才带。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// 行内文本片段（段落、标题、列表项、代码块）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<TextRun>,
    /// 部分块类型携带的直接文本字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 其余属性原样透传（标题级别、媒体地址、代码语言等）
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: serde_json::Map<String, Value>,
}

impl ContentBlock {
    fn textual(kind: &str, text: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.to_string(),
            content: vec![TextRun::plain(text)],
            text: None,
            props: serde_json::Map::new(),
        }
    }

    /// 创建段落块
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::textual(KIND_PARAGRAPH, text)
    }

    /// 创建标题块
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut block = Self::textual(KIND_HEADING, text);
        block.props.insert("level".to_string(), Value::from(level));
        block
    }

    /// 创建无序列表项
    pub fn bullet(text: impl Into<String>) -> Self {
        Self::textual(KIND_BULLET_LIST_ITEM, text)
    }

    /// 是否是媒体块（图片 / 音频 / 视频）
    pub fn is_media(&self) -> bool {
        matches!(
            self.kind.as_str(),
            KIND_IMAGE | KIND_AUDIO | KIND_VIDEO
        )
    }

    /// 是否是可提取行内文本的块类型
    pub fn is_textual(&self) -> bool {
        TEXTUAL_KINDS.contains(&self.kind.as_str())
    }
}
