//! 表格改写服务 - 业务能力层
//!
//! 把"内容 / 语言"两列表格改写成无障碍表格：
//! - 语言列对读屏软件隐藏（`aria-hidden`），视觉上保留
//! - 每个内容单元格带 `lang` 属性和语言 class
//!
//! 改写基于原树构建新树，输入不会被修改。

use tracing::debug;

use crate::infrastructure::{Child, ContentNode};
use crate::models::Lang;
use crate::services::block_walker::{table_rows, TableRow};
use crate::services::language_fragment::{paragraph, LanguageFragment};
use crate::services::script_classifier::detect_language;

/// 语言列的 class
pub const LANGUAGE_INDICATOR_CLASS: &str = "language-indicator-column";

/// 表头包含这些文字时视为语言列
static LANGUAGE_HEADER_PHRASES: phf::Set<&'static str> = phf::phf_set! {
    "語言",
    "语言",
    "中文還是日文",
    "中文",
    "日文",
};

/// 英文表头短语（不区分大小写）
const LANGUAGE_HEADER_PHRASES_EN: &[&str] = &["language", "chinese or japanese"];

/// 表头单元格是否是语言列
pub fn is_language_header(text: &str) -> bool {
    let lower = text.to_lowercase();
    LANGUAGE_HEADER_PHRASES
        .iter()
        .any(|phrase| text.contains(phrase))
        || LANGUAGE_HEADER_PHRASES_EN
            .iter()
            .any(|phrase| lower.contains(phrase))
}

/// 改写 `root` 中的所有表格，返回新的表格节点
pub fn rewrite_tables(root: &ContentNode) -> Vec<ContentNode> {
    root.find_all(&["table"])
        .into_iter()
        .map(rewrite_table)
        .collect()
}

/// 改写后的 HTML；没有表格时返回原容器内容
pub fn rewrite_tables_to_html(root: &ContentNode) -> String {
    let tables = rewrite_tables(root);
    if tables.is_empty() {
        return root.inner_html();
    }
    tables.iter().map(ContentNode::outer_html).collect()
}

/// 改写单个表格
pub fn rewrite_table(table: &ContentNode) -> ContentNode {
    let mut rewritten = ContentNode::new("table");
    for name in ["border", "class"] {
        if let Some(value) = table.attr(name).filter(|value| !value.is_empty()) {
            rewritten.set_attr(name, value);
        }
    }

    let rows = table_rows(table);
    let Some((header, body)) = rows.split_first() else {
        return rewritten;
    };

    rewritten.push_child(rewrite_header_row(header.row));

    let mut tagged = 0;
    for row in body {
        if !row.is_two_column() {
            rewritten.push_child(row.row.clone());
            continue;
        }
        if let Some(new_row) = rewrite_content_row(row) {
            rewritten.push_child(new_row);
            tagged += 1;
        }
    }

    debug!("表格改写: {} 行标注了语言", tagged);
    rewritten
}

fn rewrite_header_row(header: &ContentNode) -> ContentNode {
    let mut row = header.clone();
    for child in row.children.iter_mut() {
        if let Child::Element(cell) = child {
            if cell.is_any(&["th", "td"]) && is_language_header(&cell.text()) {
                cell.set_attr("aria-hidden", "true");
                cell.add_class(LANGUAGE_INDICATOR_CLASS);
            }
        }
    }
    row
}

/// 内容为空的行被丢弃
fn rewrite_content_row(row: &TableRow<'_>) -> Option<ContentNode> {
    let content = row.content_text();
    if content.trim().is_empty() {
        return None;
    }

    let label = row.label_text();
    let lang = row.label_lang().unwrap_or_else(|| detect_language(&content));

    let content_cell = ContentNode::new("td")
        .with_attr("lang", lang.code())
        .with_attr("class", lang.section_class())
        .with_text(content);

    let language_cell = ContentNode::new("td")
        .with_attr("aria-hidden", "true")
        .with_attr("class", LANGUAGE_INDICATOR_CLASS)
        .with_text(label);

    Some(
        ContentNode::new("tr")
            .with_child(content_cell)
            .with_child(language_cell),
    )
}

/// 按语言单元格拆分所有表格行（不看标记）
///
/// 每行生成 `<p class="..-section">`；语言单元格不是标签的行被忽略
pub fn split_rows_by_label(root: &ContentNode) -> (LanguageFragment, LanguageFragment) {
    let mut japanese = LanguageFragment::new(Lang::Japanese);
    let mut chinese = LanguageFragment::new(Lang::Chinese);

    for table in root.find_all(&["table"]) {
        for row in table_rows(table) {
            let Some(lang) = row.label_lang() else {
                continue;
            };
            let content = row.content_text();
            if content.trim().is_empty() {
                continue;
            }
            let item = paragraph(content.trim(), Some(lang.section_class()));
            match lang {
                Lang::Japanese => japanese.push(item),
                Lang::Chinese => chinese.push(item),
            }
        }
    }

    (japanese, chinese)
}
