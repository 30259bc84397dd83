//! 兜底提取服务 - 业务能力层
//!
//! 标记提取两种语言都没有结果时使用：每种语言独立扫描一遍，只依赖文字分类。

use tracing::debug;

use std::borrow::Cow;

use crate::infrastructure::ContentNode;
use crate::models::Lang;
use crate::services::block_walker::{walk_blocks, Block, HEADING_TAGS};
use crate::services::language_fragment::{paragraph, shallow_copy, LanguageFragment};
use crate::services::marker_extractor::extract_marked_segments;
use crate::services::script_classifier::{
    contains_chinese_script, contains_japanese_script, has_japanese_ending, has_kana, has_marker,
    is_pure_ideograph_run,
};

const FALLBACK_TAGS: &[&str] = &["li", "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6"];

/// 扫描日文片段
pub fn extract_japanese_sections(root: &ContentNode) -> LanguageFragment {
    let lang = Lang::Japanese;
    let class = Some(lang.section_class());
    let mut fragment = LanguageFragment::with_container_class(lang);

    for node in text_nodes(root) {
        let text = node.text();

        if node.is("li") {
            if contains_japanese_script(&text)
                && !has_marker(&text, Lang::Chinese)
                && !is_pure_ideograph_run(&text)
            {
                fragment.push(shallow_copy(&node, class));
            }
            continue;
        }

        // 纯汉字的元素按中文处理
        if is_pure_ideograph_run(&text) && !contains_japanese_script(&text) {
            continue;
        }

        if has_marker(&text, lang) {
            push_marked_or_whole(&mut fragment, &node, &text, contains_japanese_script(&text));
        } else if contains_japanese_script(&text)
            && !has_marker(&text, Lang::Chinese)
            && (has_kana(&text) || has_japanese_ending(&text))
        {
            fragment.push(shallow_copy(&node, class));
        }
    }

    debug!("兜底提取(日文): {} 段", fragment.items().len());
    fragment
}

/// 扫描中文片段
pub fn extract_chinese_sections(root: &ContentNode) -> LanguageFragment {
    let lang = Lang::Chinese;
    let class = Some(lang.section_class());
    let mut fragment = LanguageFragment::with_container_class(lang);

    for node in text_nodes(root) {
        let text = node.text();
        let is_chinese = contains_chinese_script(&text) && !contains_japanese_script(&text);

        if node.is("li") {
            if is_chinese {
                fragment.push(shallow_copy(&node, class));
            }
            continue;
        }

        if has_kana(&text) || has_japanese_ending(&text) {
            continue;
        }

        if has_marker(&text, lang) {
            push_marked_or_whole(&mut fragment, &node, &text, is_chinese);
        } else if is_chinese {
            fragment.push(shallow_copy(&node, class));
        }

        if node.is_any(HEADING_TAGS) && !fragment.contains_html(&node.inner_html()) {
            fragment.push(shallow_copy(&node, class));
        }
    }

    debug!("兜底提取(中文): {} 段", fragment.items().len());
    fragment
}

/// 有标记时取标记后的文字；一段都取不到时，按 `whole_fallback` 决定是否保留整个元素
fn push_marked_or_whole(
    fragment: &mut LanguageFragment,
    node: &ContentNode,
    text: &str,
    whole_fallback: bool,
) {
    let lang = fragment.lang();
    let class = Some(lang.section_class());
    let segments: Vec<_> = extract_marked_segments(text)
        .into_iter()
        .filter(|segment| segment.lang == lang)
        .collect();

    if segments.is_empty() {
        if whole_fallback {
            fragment.push(shallow_copy(node, class));
        }
        return;
    }

    for segment in segments {
        fragment.push(paragraph(&segment.text, class));
    }
}

/// 非空的文本元素（表格不参与兜底扫描）
fn text_nodes(root: &ContentNode) -> Vec<Cow<'_, ContentNode>> {
    walk_blocks(root, FALLBACK_TAGS)
        .into_iter()
        .filter_map(|block| match block {
            Block::Text { node, .. } => Some(node),
            Block::Table(_) => None,
        })
        .filter(|node| !node.text().trim().is_empty())
        .collect()
}
