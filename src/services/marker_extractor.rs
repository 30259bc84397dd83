//! 标记提取服务 - 业务能力层
//!
//! 根据显式语言标记（`日文：`、`**中文**`、`[日文]` …）、"内容 / 语言"两列表格
//! 以及文字分类，把内容树分成日文和中文两个片段。

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::infrastructure::ContentNode;
use crate::models::Lang;
use crate::services::block_walker::{table_rows, walk_blocks, Block, HEADING_TAGS};
use crate::services::language_fragment::{paragraph, shallow_copy, LanguageFragment};
use crate::services::script_classifier::{
    contains_chinese_script, contains_japanese_script, has_chinese_particle, has_japanese_ending,
    has_kana, has_marker,
};

/// 两种语言的所有标记，按出现位置切分文字
static ANY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<ja>日文[:：]|\*\*日文\*\*[:：]?|\[日文\]|\(日文\))|(?P<zh>中文[:：]|\*\*中文\*\*[:：]?|\[中文\]|\(中文\))",
    )
    .expect("语言标记正则")
});

/// 参与标记提取的文本元素
const MARKED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "span", "ul", "ol", "li",
];

/// 标记提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerExtraction {
    pub japanese: LanguageFragment,
    pub chinese: LanguageFragment,
}

impl MarkerExtraction {
    fn new() -> Self {
        Self {
            japanese: LanguageFragment::new(Lang::Japanese),
            chinese: LanguageFragment::new(Lang::Chinese),
        }
    }

    pub fn fragment(&self, lang: Lang) -> &LanguageFragment {
        match lang {
            Lang::Japanese => &self.japanese,
            Lang::Chinese => &self.chinese,
        }
    }

    fn fragment_mut(&mut self, lang: Lang) -> &mut LanguageFragment {
        match lang {
            Lang::Japanese => &mut self.japanese,
            Lang::Chinese => &mut self.chinese,
        }
    }

    /// 两种语言都没有内容
    pub fn is_empty(&self) -> bool {
        !self.japanese.has_content() && !self.chinese.has_content()
    }

    pub fn japanese_html(&self) -> String {
        self.japanese.to_html()
    }

    pub fn chinese_html(&self) -> String {
        self.chinese.to_html()
    }
}

/// 标记后面的一段文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedSegment {
    pub lang: Lang,
    pub text: String,
}

/// 按标记切分文字
///
/// 每个标记的范围延伸到下一个标记（任一语言）或文字结尾；去除空白后为空的段落会被丢弃
pub fn extract_marked_segments(text: &str) -> Vec<MarkedSegment> {
    let markers: Vec<(Lang, usize, usize)> = ANY_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let (lang, m) = match (caps.name("ja"), caps.name("zh")) {
                (Some(m), _) => (Lang::Japanese, m),
                (None, Some(m)) => (Lang::Chinese, m),
                (None, None) => return None,
            };
            Some((lang, m.start(), m.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, (lang, _, end))| {
            let stop = markers.get(i + 1).map(|next| next.1).unwrap_or(text.len());
            let segment = text[*end..stop].trim();
            (!segment.is_empty()).then(|| MarkedSegment {
                lang: *lang,
                text: segment.to_string(),
            })
        })
        .collect()
}

/// 对内容树做标记提取
pub fn extract_marked_sections(root: &ContentNode) -> MarkerExtraction {
    let mut extraction = MarkerExtraction::new();

    for block in walk_blocks(root, MARKED_TAGS) {
        match block {
            Block::Table(table) => extract_table(table, &mut extraction),
            Block::Text { node, lang } => extract_text_block(&node, lang, &mut extraction),
        }
    }

    debug!(
        "标记提取完成: 日文 {} 段, 中文 {} 段",
        extraction.japanese.items().len(),
        extraction.chinese.items().len()
    );

    extraction
}

/// 解析 HTML 后做标记提取
pub fn extract_marked_sections_from_html(html: &str) -> MarkerExtraction {
    extract_marked_sections(&ContentNode::parse_fragment(html))
}

/// 两列表格：每行按语言单元格归类，不看内容单元格里的标记
fn extract_table(table: &ContentNode, extraction: &mut MarkerExtraction) {
    for row in table_rows(table) {
        let Some(lang) = row.label_lang() else {
            continue;
        };
        let content = row.content_text();
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        extraction.fragment_mut(lang).push(paragraph(content, None));
    }
}

fn extract_text_block(node: &ContentNode, inherited: Option<Lang>, extraction: &mut MarkerExtraction) {
    let text = node.text();
    if text.trim().is_empty() {
        return;
    }

    let segments = extract_marked_segments(&text);

    for lang in [Lang::Japanese, Lang::Chinese] {
        if has_marker(&text, lang) {
            for segment in segments.iter().filter(|segment| segment.lang == lang) {
                extraction
                    .fragment_mut(lang)
                    .push(paragraph(&segment.text, None));
            }
        } else if takes_whole_element(&text, lang, inherited) {
            extraction.fragment_mut(lang).push(shallow_copy(node, None));
        }
    }

    // 标题默认归入中文（不含假名时），同一段标题只加入一次
    if node.is_any(HEADING_TAGS) && inherited != Some(Lang::Japanese) && !has_kana(&text) {
        let inner = node.inner_html();
        if !inner.contains(Lang::Japanese.section_class())
            && !extraction.chinese.contains_html(&inner)
        {
            extraction.chinese.push(shallow_copy(node, None));
        }
    }
}

/// 没有该语言的标记时，是否把整个元素归入该语言
///
/// 文字分类有决定性信号时以分类为准；只剩汉字或没有 CJK 文字时，
/// 由祖先上显式的 `lang` 决定
fn takes_whole_element(text: &str, lang: Lang, inherited: Option<Lang>) -> bool {
    let Some(explicit) = inherited else {
        return match lang {
            Lang::Japanese => is_japanese_by_script(text),
            Lang::Chinese => contains_chinese_script(text) && !contains_japanese_script(text),
        };
    };

    let japanese = is_japanese_by_script(text);
    let chinese = is_chinese_by_script(text);
    match lang {
        Lang::Japanese if japanese => true,
        Lang::Chinese if chinese => true,
        _ => explicit == lang && !japanese && !chinese && !has_any_marker(text),
    }
}

/// 假名或日文句尾，且没有中文标记
fn is_japanese_by_script(text: &str) -> bool {
    contains_japanese_script(text)
        && !has_marker(text, Lang::Chinese)
        && (has_kana(text) || has_japanese_ending(text))
}

/// 不含日文，且有中文虚词（只有汉字不足以区分中日文）
fn is_chinese_by_script(text: &str) -> bool {
    contains_chinese_script(text) && !contains_japanese_script(text) && has_chinese_particle(text)
}

fn has_any_marker(text: &str) -> bool {
    has_marker(text, Lang::Japanese) || has_marker(text, Lang::Chinese)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_run_to_next_marker() {
        let segments = extract_marked_segments("中文：你好 日文：こんにちは [中文] 再见");
        assert_eq!(
            segments,
            vec![
                MarkedSegment { lang: Lang::Chinese, text: "你好".to_string() },
                MarkedSegment { lang: Lang::Japanese, text: "こんにちは".to_string() },
                MarkedSegment { lang: Lang::Chinese, text: "再见".to_string() },
            ]
        );
    }

    #[test]
    fn test_bold_marker_with_colon_and_empty_extent() {
        let segments = extract_marked_segments("**日文**：テスト (中文)");
        assert_eq!(
            segments,
            vec![MarkedSegment { lang: Lang::Japanese, text: "テスト".to_string() }]
        );
    }

    #[test]
    fn test_marked_paragraphs() {
        let extraction = extract_marked_sections_from_html(
            "<p>中文：这是中文内容测试</p><p>日文：これは日本語のテストです</p>",
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><p>これは日本語のテストです</p></div>"#
        );
        assert_eq!(
            extraction.chinese_html(),
            r#"<div lang="zh-tw"><p>这是中文内容测试</p></div>"#
        );
    }

    #[test]
    fn test_unmarked_elements_keep_tag_and_markup() {
        let extraction = extract_marked_sections_from_html(
            r#"<li class="x">これは<b>日本語</b>です</li><span>這是<i>中文</i></span>"#,
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><li>これは<b>日本語</b>です</li></div>"#
        );
        assert_eq!(
            extraction.chinese_html(),
            r#"<div lang="zh-tw"><span>這是<i>中文</i></span></div>"#
        );
    }

    #[test]
    fn test_nested_containers_do_not_duplicate() {
        let extraction = extract_marked_sections_from_html(
            "<div><p>**中文** 更多的中文内容在这里</p><p>**日文** もっと日本語のコンテントはここです</p></div>",
        );
        assert_eq!(extraction.chinese.items().len(), 1);
        assert_eq!(extraction.japanese.items().len(), 1);
        assert_eq!(extraction.chinese.items()[0].text(), "更多的中文内容在这里");
    }

    #[test]
    fn test_table_rows_follow_label_cell() {
        let extraction = extract_marked_sections_from_html(
            "<table><tr><th>内容</th><th>语言</th></tr>\
             <tr><td>中文：これは表のテストです</td><td>日文</td></tr>\
             <tr><td>这是表格测试</td><td>中文</td></tr>\
             <tr><td>没有标签</td><td>其他</td></tr></table>",
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><p>中文：これは表のテストです</p></div>"#
        );
        assert_eq!(
            extraction.chinese_html(),
            r#"<div lang="zh-tw"><p>这是表格测试</p></div>"#
        );
    }

    #[test]
    fn test_heading_defaults_to_chinese_once() {
        let extraction = extract_marked_sections_from_html("<h2>第一課</h2><h1>混合言語テスト</h1>");
        assert_eq!(
            extraction.chinese_html(),
            r#"<div lang="zh-tw"><h2>第一課</h2></div>"#
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><h1>混合言語テスト</h1></div>"#
        );
    }

    #[test]
    fn test_chinese_marker_blocks_unmarked_japanese() {
        let extraction = extract_marked_sections_from_html("<p>中文：测试 テスト</p>");
        assert!(!extraction.japanese.has_content());
        assert_eq!(extraction.chinese.items()[0].text(), "测试 テスト");
    }

    #[test]
    fn test_explicit_lang_breaks_ties_only() {
        // 只有汉字：跟随容器语言
        let extraction = extract_marked_sections_from_html(
            r#"<div lang="ja"><p>東京</p><h2>大阪</h2></div>"#,
        );
        assert!(!extraction.chinese.has_content());
        assert_eq!(extraction.japanese.items().len(), 2);

        // 有中文虚词：仍归中文
        let extraction = extract_marked_sections_from_html(
            r#"<div lang="ja"><p>这是中文</p></div>"#,
        );
        assert!(!extraction.japanese.has_content());
        assert_eq!(extraction.chinese_html(), r#"<div lang="zh-tw"><p>这是中文</p></div>"#);
    }

    #[test]
    fn test_kana_under_chinese_container_is_japanese() {
        let extraction = extract_marked_sections_from_html(
            r#"<div lang="zh-TW"><p>中文：你好</p><p>これは日本語です</p></div>"#,
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><p>これは日本語です</p></div>"#
        );
        assert_eq!(extraction.chinese_html(), r#"<div lang="zh-tw"><p>你好</p></div>"#);
    }

    #[test]
    fn test_direct_text_beside_nested_blocks() {
        let extraction = extract_marked_sections_from_html(
            "<ul><li>這是第一項<ul><li>これはサブ項目です</li></ul></li></ul>",
        );
        assert_eq!(
            extraction.chinese_html(),
            r#"<div lang="zh-tw"><li>這是第一項</li></div>"#
        );
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><li>これはサブ項目です</li></div>"#
        );

        let extraction =
            extract_marked_sections_from_html("<div>中文：你好<p>日文：こんにちは</p></div>");
        assert_eq!(extraction.chinese_html(), r#"<div lang="zh-tw"><p>你好</p></div>"#);
        assert_eq!(
            extraction.japanese_html(),
            r#"<div lang="ja"><p>こんにちは</p></div>"#
        );
    }

    #[test]
    fn test_nothing_found() {
        let extraction = extract_marked_sections_from_html("<p>Hello world</p><div>   </div>");
        assert!(extraction.is_empty());
        assert_eq!(extraction.japanese_html(), "");
        assert_eq!(extraction.chinese_html(), "");
    }
}
