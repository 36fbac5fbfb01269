//! 内容提取服务 - 业务能力层
//!
//! 从不透明的内容块序列中提取纯文本，只用于回答一个问题：
//! "这段内容是不是实际为空"。零可提取文本但含图片 / 音频 / 视频块的
//! 内容仍然视为非空。

use regex::Regex;

use crate::models::block::ContentBlock;

/// 提取内容块序列中的全部纯文本
///
/// 段落、标题、列表项、代码块取行内文本片段；无法识别的块类型只在
/// 暴露直接 text 字段时才有贡献。多余空白会被折叠。
pub fn extract_text(blocks: &[ContentBlock]) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for block in blocks {
        if block.is_textual() {
            for run in &block.content {
                parts.push(&run.text);
            }
        } else if let Some(text) = &block.text {
            parts.push(text);
        }
    }

    let joined = parts.join(" ");

    // 折叠空白，避免纯空格内容被误判为非空
    if let Ok(re) = Regex::new(r"\s+") {
        re.replace_all(joined.trim(), " ").into_owned()
    } else {
        joined.trim().to_string()
    }
}

/// 内容块序列中是否存在媒体块
pub fn contains_media(blocks: &[ContentBlock]) -> bool {
    blocks.iter().any(|b| b.is_media())
}

/// 内容是否实际为空：无可提取文本且无媒体块
pub fn is_content_empty(blocks: &[ContentBlock]) -> bool {
    extract_text(blocks).is_empty() && !contains_media(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::{TextRun, KIND_IMAGE};

    #[test]
    fn test_extract_text_concatenates_runs() {
        let blocks = vec![
            ContentBlock::heading("题目一", 1),
            ContentBlock::paragraph("请阅读材料"),
            ContentBlock::bullet("要点"),
        ];
        assert_eq!(extract_text(&blocks), "题目一 请阅读材料 要点");
    }

    #[test]
    fn test_unknown_kind_uses_direct_text_field_only() {
        let mut widget = ContentBlock::paragraph("");
        widget.kind = "customWidget".to_string();
        widget.content.clear();
        widget.text = Some("直接文本".to_string());

        let mut opaque = widget.clone();
        opaque.text = None;

        assert_eq!(extract_text(&[widget]), "直接文本");
        assert_eq!(extract_text(&[opaque]), "");
    }

    #[test]
    fn test_blank_runs_without_media_are_empty() {
        let mut block = ContentBlock::paragraph("");
        block.content = vec![TextRun::plain("   "), TextRun::plain("\n\t")];
        let blocks = vec![block];

        assert_eq!(extract_text(&blocks), "");
        assert!(is_content_empty(&blocks));
    }

    #[test]
    fn test_media_block_flips_emptiness() {
        let mut blocks = vec![ContentBlock::paragraph("  ")];
        assert!(is_content_empty(&blocks));

        let mut image = ContentBlock::paragraph("");
        image.kind = KIND_IMAGE.to_string();
        image.content.clear();
        blocks.push(image);

        assert!(!is_content_empty(&blocks));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let blocks = vec![
            ContentBlock::paragraph("第一段  文本"),
            ContentBlock::paragraph("  第二段"),
        ];
        assert_eq!(extract_text(&blocks), "第一段 文本 第二段");
    }
}
