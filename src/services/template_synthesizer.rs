//! 题目模板合成服务 - 业务能力层
//!
//! 为指定题目类型生成一份说明性的起始文档。纯函数，确定性输出：
//! - 编程题省略作答形式指引，附加编程语言指引
//! - "编辑标签页"说明按类型给出正确的第二个标签页名称
//!
//! 模板块永远不携带块级 id。编辑器落盘的块会带 id，因此"内容仍是
//! 原始模板"这一判定就是：没有任何块带 id。

use crate::models::block::ContentBlock;
use crate::models::question::QuestionType;

/// 指定类型的第二个编辑标签页名称
pub fn second_tab_name(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Subjective => "评分卡",
        QuestionType::Objective | QuestionType::Coding => "答案",
    }
}

fn type_name(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Objective => "客观题",
        QuestionType::Subjective => "主观题",
        QuestionType::Coding => "编程题",
    }
}

/// 为指定题目类型合成起始内容
pub fn synthesize_template(question_type: QuestionType) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::heading(format!("新建{}", type_name(question_type)), 1),
        ContentBlock::paragraph("在这里编写题干，支持富文本、图片与附件。"),
        ContentBlock::paragraph(format!(
            "编辑标签页说明：「题目」标签页编辑题干，「{}」标签页配置评判方式，「知识库」标签页可补充仅供评判使用的背景材料。",
            second_tab_name(question_type)
        )),
    ];

    match question_type {
        QuestionType::Coding => {
            blocks.push(ContentBlock::paragraph(
                "编程语言：请在题目设置中勾选允许使用的编程语言，作答环境将按所选语言准备。",
            ));
        }
        QuestionType::Objective | QuestionType::Subjective => {
            blocks.push(ContentBlock::paragraph(
                "作答形式：可以选择文字、代码或音频作答，按题目需要调整。",
            ));
        }
    }

    blocks
}

/// 内容是否仍是未经用户编辑的原始模板
///
/// 判定是结构性的：只要出现任何带块级 id 的块，就说明内容经过了
/// 编辑器，不得再被自动替换。
pub fn is_pristine(blocks: &[ContentBlock]) -> bool {
    blocks.iter().all(|b| b.id.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_extractor::extract_text;

    #[test]
    fn test_template_is_deterministic() {
        assert_eq!(
            synthesize_template(QuestionType::Objective),
            synthesize_template(QuestionType::Objective)
        );
    }

    #[test]
    fn test_second_tab_named_by_type() {
        let subjective = extract_text(&synthesize_template(QuestionType::Subjective));
        assert!(subjective.contains("评分卡"));

        let objective = extract_text(&synthesize_template(QuestionType::Objective));
        assert!(objective.contains("答案"));
        assert!(!objective.contains("评分卡"));
    }

    #[test]
    fn test_coding_template_swaps_answer_guidance_for_languages() {
        let coding = extract_text(&synthesize_template(QuestionType::Coding));
        assert!(coding.contains("编程语言"));
        assert!(!coding.contains("作答形式"));

        let objective = extract_text(&synthesize_template(QuestionType::Objective));
        assert!(objective.contains("作答形式"));
    }

    #[test]
    fn test_template_blocks_are_pristine() {
        let blocks = synthesize_template(QuestionType::Subjective);
        assert!(is_pristine(&blocks));
    }

    #[test]
    fn test_any_block_id_marks_content_edited() {
        let mut blocks = synthesize_template(QuestionType::Objective);
        blocks[1].id = Some("block-1".to_string());
        assert!(!is_pristine(&blocks));
    }
}
