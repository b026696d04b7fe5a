//! 图片引用提取模块
//!
//! # 设计思路
//!
//! 样式表中的 `url(...)` 是唯一需要关心的语法，因此不做完整的 CSS 词法分析，
//! 只用正则近似匹配：去掉块注释、折叠空白后扫描 `url(` … `.png` … `)`。
//!
//! # 实现思路
//!
//! - 通过 `once_cell::sync::Lazy` 在首次调用时编译正则，后续零成本复用。
//! - 匹配与扩展名判断大小写不敏感；输出保留原始大小写。
//! - 使用 `HashSet` 去重，`Vec` 保持首次出现顺序。

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// `url(` + 可选引号 + 以 `.png` 结尾的路径 + 可选 query/fragment + 可选引号 + `)`
static PNG_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^'"()\s]+?\.png)(?:[?#][^'"()\s]*)?['"]?\s*\)"#)
        .expect("png url pattern is valid")
});

/// 从样式表文本中提取去重后的 PNG 引用，保持首次出现顺序。
///
/// # 示例
/// ```rust
/// use css_recolor::stylesheet::extract_references;
///
/// let css = r#".a{background:url('icon.png')} .b{background:url("icon.png?v=2")}"#;
/// assert_eq!(extract_references(css), vec!["icon.png".to_string()]);
/// ```
pub fn extract_references(css: &str) -> Vec<String> {
    let without_comments = BLOCK_COMMENT.replace_all(css, "");
    let collapsed = WHITESPACE_RUN.replace_all(&without_comments, " ");

    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for captures in PNG_URL.captures_iter(&collapsed) {
        let Some(raw) = captures.get(1) else {
            continue;
        };

        let Some(reference) = normalize_reference(raw.as_str()) else {
            continue;
        };

        if seen.insert(reference.clone()) {
            references.push(reference);
        }
    }

    log::debug!("🔎 提取到 {} 个 PNG 引用", references.len());
    references
}

/// 去掉 query / fragment 与两侧引号；结果不再以 `.png` 结尾时丢弃。
fn normalize_reference(raw: &str) -> Option<String> {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = raw[..end].trim_matches(|c| c == '\'' || c == '"');

    if path.is_empty() || !path.to_ascii_lowercase().ends_with(".png") {
        return None;
    }

    Some(path.to_string())
}
