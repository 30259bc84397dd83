//! 文本块遍历
//!
//! 按文档顺序找出文本块：不包含其他块级元素的元素整体作为一个文本块；
//! 包含块级元素的可选元素，其自身的直接文字（文本节点和行内子元素）按
//! 块级子元素分隔成若干段，每段作为一个同标签的文本块。这样每段文字
//! 恰好被处理一次。遍历同时记录祖先上显式的 `lang` 属性。

use std::borrow::Cow;

use crate::infrastructure::{Child, ContentNode};
use crate::models::Lang;

/// 块级元素：包含它们的元素不会整体作为文本块返回
pub const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "ul", "ol", "li", "table", "blockquote",
    "section", "article",
];

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4"];

const SKIPPED_TAGS: &[&str] = &["script", "style", "template"];

/// 遍历得到的块
#[derive(Debug, Clone)]
pub enum Block<'a> {
    /// 文本元素，附带继承到的显式语言
    ///
    /// 直接文字段是新建的节点（原元素的标签 + 该段子节点），其余为原树中的元素
    Text {
        node: Cow<'a, ContentNode>,
        lang: Option<Lang>,
    },
    /// 表格（由调用方按行处理）
    Table(&'a ContentNode),
}

/// 按文档顺序列出 `root` 下的文本块与表格
///
/// `selectable` 为可以作为文本块返回的标签；`root` 自身的直接文字不返回
pub fn walk_blocks<'a>(root: &'a ContentNode, selectable: &[&str]) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    walk_children(root, selectable, None, false, &mut blocks);
    blocks
}

fn walk_children<'a>(
    node: &'a ContentNode,
    selectable: &[&str],
    lang: Option<Lang>,
    collect_runs: bool,
    out: &mut Vec<Block<'a>>,
) {
    let mut run: Vec<Child> = Vec::new();

    for child in &node.children {
        let element = match child {
            Child::Text(_) => {
                if collect_runs {
                    run.push(child.clone());
                }
                continue;
            }
            Child::Element(element) => element,
        };

        if element.is_any(SKIPPED_TAGS) {
            continue;
        }
        if collect_runs && is_inline(element) {
            run.push(child.clone());
            continue;
        }

        flush_run(node, &mut run, lang, out);
        visit(element, selectable, lang, out);
    }

    flush_run(node, &mut run, lang, out);
}

fn visit<'a>(
    element: &'a ContentNode,
    selectable: &[&str],
    inherited: Option<Lang>,
    out: &mut Vec<Block<'a>>,
) {
    let lang = element
        .attr("lang")
        .and_then(Lang::from_code)
        .or(inherited);

    if element.is("table") {
        out.push(Block::Table(element));
        return;
    }

    let is_selectable = element.is_any(selectable);
    if is_selectable && !element.has_descendant(BLOCK_TAGS) {
        out.push(Block::Text {
            node: Cow::Borrowed(element),
            lang,
        });
        return;
    }

    walk_children(element, selectable, lang, is_selectable, out);
}

/// 不含块级元素的行内元素
fn is_inline(element: &ContentNode) -> bool {
    !element.is_any(BLOCK_TAGS) && !element.has_descendant(BLOCK_TAGS)
}

/// 把累积的直接文字作为一个文本块输出（只有空白时丢弃）
fn flush_run<'a>(
    parent: &ContentNode,
    run: &mut Vec<Child>,
    lang: Option<Lang>,
    out: &mut Vec<Block<'a>>,
) {
    if run.is_empty() {
        return;
    }
    let mut node = ContentNode::new(parent.tag.clone());
    node.children = std::mem::take(run);
    if node.text().trim().is_empty() {
        return;
    }
    out.push(Block::Text {
        node: Cow::Owned(node),
        lang,
    });
}

/// 表格中按 (内容单元格, 语言单元格) 划分的行
#[derive(Debug, Clone)]
pub struct TableRow<'a> {
    pub row: &'a ContentNode,
    pub cells: Vec<&'a ContentNode>,
}

impl<'a> TableRow<'a> {
    /// 至少两个 `td` 才符合"内容 / 语言"两列约定
    pub fn is_two_column(&self) -> bool {
        self.cells.len() >= 2
    }

    /// 内容单元格的纯文本（缺失时为空字符串）
    pub fn content_text(&self) -> String {
        self.cells.first().map(|cell| cell.text()).unwrap_or_default()
    }

    /// 语言单元格去除空白后的文本（缺失时为空字符串）
    pub fn label_text(&self) -> String {
        self.cells
            .get(1)
            .map(|cell| cell.text().trim().to_string())
            .unwrap_or_default()
    }

    /// 语言单元格恰好是语言标签时返回对应语言
    pub fn label_lang(&self) -> Option<Lang> {
        if !self.is_two_column() {
            return None;
        }
        Lang::from_label(&self.label_text())
    }
}

/// 表格中的所有行（文档顺序，包含 thead/tbody 中的行）
pub fn table_rows(table: &ContentNode) -> Vec<TableRow<'_>> {
    table
        .find_all(&["tr"])
        .into_iter()
        .map(|row| TableRow {
            row,
            cells: row.element_children().filter(|cell| cell.is("td")).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECTABLE: &[&str] = &["h1", "h2", "p", "div", "span", "li"];

    fn texts(blocks: &[Block<'_>]) -> Vec<String> {
        blocks
            .iter()
            .map(|block| match block {
                Block::Text { node, .. } => node.text(),
                Block::Table(_) => "<table>".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_innermost_blocks_only() {
        let tree = ContentNode::parse_fragment(
            "<div><p>一<span>二</span></p><p>三</p></div><ul><li>四</li></ul>",
        );
        let blocks = walk_blocks(&tree, SELECTABLE);
        assert_eq!(texts(&blocks), vec!["一二", "三", "四"]);
    }

    #[test]
    fn test_direct_text_around_nested_blocks() {
        let tree = ContentNode::parse_fragment(
            "<ul><li>這是第一項<ul><li>これはサブ項目です</li></ul>尾巴</li></ul>\
             <div>中文：你好<p>日文：こんにちは</p>  </div>",
        );
        let blocks = walk_blocks(&tree, SELECTABLE);
        assert_eq!(
            texts(&blocks),
            vec!["這是第一項", "これはサブ項目です", "尾巴", "中文：你好", "日文：こんにちは"]
        );
        match &blocks[0] {
            Block::Text { node, .. } => assert_eq!(node.outer_html(), "<li>這是第一項</li>"),
            Block::Table(_) => panic!("应为文本块"),
        }
    }

    #[test]
    fn test_inline_children_join_the_run() {
        let tree = ContentNode::parse_fragment("<div>前言<b>重點</b><p>段落</p></div>");
        let blocks = walk_blocks(&tree, SELECTABLE);
        assert_eq!(texts(&blocks), vec!["前言重點", "段落"]);
    }

    #[test]
    fn test_tables_are_reported_in_order() {
        let tree = ContentNode::parse_fragment(
            "<p>前</p><table><tr><td>甲</td><td>中文</td></tr></table><p>後</p>",
        );
        let blocks = walk_blocks(&tree, SELECTABLE);
        assert_eq!(texts(&blocks), vec!["前", "<table>", "後"]);
    }

    #[test]
    fn test_lang_attribute_is_inherited() {
        let tree = ContentNode::parse_fragment(
            r#"<div lang="ja"><p>東京</p></div><p lang="zh-TW">台北</p><p>大阪</p>"#,
        );
        let langs: Vec<Option<Lang>> = walk_blocks(&tree, SELECTABLE)
            .iter()
            .filter_map(|block| match block {
                Block::Text { lang, .. } => Some(*lang),
                Block::Table(_) => None,
            })
            .collect();
        assert_eq!(
            langs,
            vec![Some(Lang::Japanese), Some(Lang::Chinese), None]
        );
    }

    #[test]
    fn test_table_rows_and_labels() {
        let tree = ContentNode::parse_fragment(
            "<table><tr><th>內容</th><th>語言</th></tr>\
             <tr><td>これは表のテストです</td><td> 日文 </td></tr>\
             <tr><td>只有一格</td></tr></table>",
        );
        let table = tree.find_all(&["table"])[0];
        let rows = table_rows(table);
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].is_two_column());
        assert_eq!(rows[1].label_lang(), Some(Lang::Japanese));
        assert_eq!(rows[1].content_text(), "これは表のテストです");
        assert_eq!(rows[2].label_lang(), None);
        assert_eq!(rows[2].label_text(), "");
    }
}
