//! 编程语言目录与选择归一化
//!
//! 两条规则：
//! 1. 独占语言代表一整套运行环境，不能与任何其他语言共存。
//!    混选时收敛为最近添加的那个独占语言。
//! 2. 样式语言依赖标记语言：选了 css 而没选 html 时自动补上 html。

use phf::phf_set;

/// 独占语言集合
pub static EXCLUSIVE_LANGUAGES: phf::Set<&'static str> = phf_set! {
    "react",
    "nodejs",
    "django",
};

/// 依赖标记语言的样式语言
pub const STYLING_LANGUAGE: &str = "css";
/// 被依赖的标记语言
pub const MARKUP_LANGUAGE: &str = "html";

pub fn is_exclusive(language: &str) -> bool {
    EXCLUSIVE_LANGUAGES.contains(language)
}

/// 语言归一化产生的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageNotice {
    /// 独占语言与其他语言混选，已收敛
    ExclusiveCollapsed {
        kept: String,
        discarded: Vec<String>,
    },
    /// 自动补充了被依赖的标记语言
    MarkupAutoAdded {
        styling: String,
        markup: String,
    },
}

/// 归一化语言选择
///
/// 入参按用户添加顺序排列。返回归一化后的选择和可选的提示。
pub fn normalize_selection(selection: &[String]) -> (Vec<String>, Option<LanguageNotice>) {
    // 规则 1：独占语言收敛
    if let Some(kept) = selection.iter().rev().find(|l| is_exclusive(l)) {
        if selection.len() > 1 {
            let discarded: Vec<String> = selection
                .iter()
                .filter(|l| *l != kept)
                .cloned()
                .collect();
            return (
                vec![kept.clone()],
                Some(LanguageNotice::ExclusiveCollapsed {
                    kept: kept.clone(),
                    discarded,
                }),
            );
        }
        return (selection.to_vec(), None);
    }

    // 规则 2：css 依赖 html
    let has_styling = selection.iter().any(|l| l == STYLING_LANGUAGE);
    let has_markup = selection.iter().any(|l| l == MARKUP_LANGUAGE);
    if has_styling && !has_markup {
        let mut normalized = selection.to_vec();
        normalized.push(MARKUP_LANGUAGE.to_string());
        return (
            normalized,
            Some(LanguageNotice::MarkupAutoAdded {
                styling: STYLING_LANGUAGE.to_string(),
                markup: MARKUP_LANGUAGE.to_string(),
            }),
        );
    }

    (selection.to_vec(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_selection_unchanged() {
        let (normalized, notice) = normalize_selection(&langs(&["python", "java"]));
        assert_eq!(normalized, langs(&["python", "java"]));
        assert!(notice.is_none());
    }

    #[test]
    fn test_exclusive_alone_unchanged() {
        let (normalized, notice) = normalize_selection(&langs(&["react"]));
        assert_eq!(normalized, langs(&["react"]));
        assert!(notice.is_none());
    }

    #[test]
    fn test_exclusive_mixed_collapses_to_most_recent() {
        // 最近添加的独占语言在末尾
        let (normalized, notice) = normalize_selection(&langs(&["python", "react", "nodejs"]));
        assert_eq!(normalized, langs(&["nodejs"]));
        assert_eq!(
            notice,
            Some(LanguageNotice::ExclusiveCollapsed {
                kept: "nodejs".to_string(),
                discarded: langs(&["python", "react"]),
            })
        );
    }

    #[test]
    fn test_styling_without_markup_auto_adds_markup() {
        let (normalized, notice) = normalize_selection(&langs(&["css"]));
        assert_eq!(normalized, langs(&["css", "html"]));
        assert_eq!(
            notice,
            Some(LanguageNotice::MarkupAutoAdded {
                styling: "css".to_string(),
                markup: "html".to_string(),
            })
        );
    }

    #[test]
    fn test_styling_with_markup_untouched() {
        let (normalized, notice) = normalize_selection(&langs(&["html", "css"]));
        assert_eq!(normalized, langs(&["html", "css"]));
        assert!(notice.is_none());
    }
}
