//! 内容分段处理器 - 编排层
//!
//! ## 职责
//!
//! 根据文档形态选择提取策略，把一段双语 HTML 转成交给阅读器的 chunk 列表。
//!
//! ## 策略（按顺序判断）
//!
//! 1. **整表改写**：含表格且出现 `內容` 与 `語言（念中文還是日文）` 两个表头，
//!    改写整张表，输出一个不带 `lang` 的 chunk（语言标注在单元格上）
//! 2. **按行拆分**：含表格，按语言单元格把行拆成日文 / 中文两个片段
//! 3. **标记提取**：先按语言标记提取，两种语言都没有结果时做兜底扫描
//!
//! 什么都没提取到时，原内容作为一个中文 chunk 输出；内容为空或只有空白时不输出 chunk。

use tracing::{debug, info};

use crate::infrastructure::ContentNode;
use crate::models::{Chunk, Lang, ProcessedContent};
use crate::services::fallback_extractor::{extract_chinese_sections, extract_japanese_sections};
use crate::services::language_fragment::LanguageFragment;
use crate::services::marker_extractor::extract_marked_sections;
use crate::services::table_rewriter::{rewrite_tables_to_html, split_rows_by_label};

/// 双语表格的内容列表头
pub const CONTENT_HEADER_PHRASE: &str = "內容";
/// 双语表格的语言列表头
pub const LANGUAGE_HEADER_PHRASE: &str = "語言（念中文還是日文）";

/// 提取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// 整表改写，单个 chunk
    CombinedTable,
    /// 按语言单元格拆行
    TableSplit,
    /// 标记提取 + 兜底扫描
    MarkedProse,
}

impl ExtractionStrategy {
    /// 根据原始内容选择策略
    pub fn select(content: &str) -> Self {
        if !has_table(content) {
            return Self::MarkedProse;
        }
        if content.contains(CONTENT_HEADER_PHRASE) && content.contains(LANGUAGE_HEADER_PHRASE) {
            Self::CombinedTable
        } else {
            Self::TableSplit
        }
    }
}

fn has_table(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("<table") && lower.contains("</table>")
}

/// 处理一篇文档
///
/// # 参数
/// - `title`: 标题（原样输出）
/// - `content`: HTML 内容
///
/// # 返回
/// 内容非空白时至少包含一个 chunk；多语言时日文在前、中文在后
pub fn process(title: &str, content: &str) -> ProcessedContent {
    let strategy = ExtractionStrategy::select(content);
    info!("🧭 [{}] 使用策略: {:?}", title, strategy);

    let tree = ContentNode::parse_fragment(content);
    let chunks = match strategy {
        ExtractionStrategy::CombinedTable => {
            vec![Chunk::html_untagged(rewrite_tables_to_html(&tree))]
        }
        ExtractionStrategy::TableSplit => {
            let (japanese, chinese) = split_rows_by_label(&tree);
            collect_chunks([japanese, chinese])
                .unwrap_or_else(|| passthrough(content).into_iter().collect())
        }
        ExtractionStrategy::MarkedProse => process_prose(&tree)
            .unwrap_or_else(|| passthrough(content).into_iter().collect()),
    };

    debug!("[{}] 输出 {} 个 chunk", title, chunks.len());
    ProcessedContent::new(title, chunks)
}

/// 标记提取；两种语言都为空时改用兜底扫描
fn process_prose(tree: &ContentNode) -> Option<Vec<Chunk>> {
    let marked = extract_marked_sections(tree);
    if !marked.is_empty() {
        return collect_chunks([marked.japanese, marked.chinese]);
    }

    debug!("标记提取没有结果，改用兜底扫描");
    collect_chunks([extract_japanese_sections(tree), extract_chinese_sections(tree)])
}

/// 非空片段转成 chunk；全部为空时返回 None
fn collect_chunks(fragments: [LanguageFragment; 2]) -> Option<Vec<Chunk>> {
    let chunks: Vec<Chunk> = fragments
        .into_iter()
        .filter_map(LanguageFragment::into_chunk)
        .collect();
    (!chunks.is_empty()).then_some(chunks)
}

/// 原内容作为默认语言（中文）的单个 chunk；空白内容返回 None
fn passthrough(content: &str) -> Option<Chunk> {
    if content.trim().is_empty() {
        info!("⚠️ 内容为空，不输出 chunk");
        return None;
    }
    info!("⚠️ 没有识别到语言内容，原样输出");
    Some(Chunk::html(content, Lang::Chinese))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selection() {
        assert_eq!(ExtractionStrategy::select("<p>中文：测试</p>"), ExtractionStrategy::MarkedProse);
        assert_eq!(
            ExtractionStrategy::select("<TABLE><tr><td>a</td></tr></TABLE>"),
            ExtractionStrategy::TableSplit
        );
        assert_eq!(
            ExtractionStrategy::select(
                "<table><tr><th>內容</th><th>語言（念中文還是日文）</th></tr></table>"
            ),
            ExtractionStrategy::CombinedTable
        );
        // 只有表头文字、没有表格
        assert_eq!(
            ExtractionStrategy::select("<p>內容 語言（念中文還是日文）</p>"),
            ExtractionStrategy::MarkedProse
        );
    }

    #[test]
    fn test_marked_prose_two_chunks_japanese_first() {
        let result = process(
            "课文",
            "<p>中文：这是中文内容测试</p><p>日文：これは日本語のテストです</p>",
        );
        assert_eq!(result.title, "课文");
        assert_eq!(result.languages(), vec![Some(Lang::Japanese), Some(Lang::Chinese)]);
        assert_eq!(
            result.chunks[0].content,
            r#"<div lang="ja"><p>これは日本語のテストです</p></div>"#
        );
        assert_eq!(
            result.chunks[1].content,
            r#"<div lang="zh-tw"><p>这是中文内容测试</p></div>"#
        );
    }

    #[test]
    fn test_table_split() {
        let result = process(
            "表格",
            "<table><tr><td>これは表のテストです</td><td>日文</td></tr>\
             <tr><td>这是表格测试</td><td>中文</td></tr></table>",
        );
        assert_eq!(result.languages(), vec![Some(Lang::Japanese), Some(Lang::Chinese)]);
        assert_eq!(
            result.chunks[0].content,
            r#"<div lang="ja"><p class="japanese-section">これは表のテストです</p></div>"#
        );
        assert_eq!(
            result.chunks[1].content,
            r#"<div lang="zh-tw"><p class="chinese-section">这是表格测试</p></div>"#
        );
    }

    #[test]
    fn test_table_without_labels_passes_through() {
        let content = "<table><tr><td>甲</td><td>乙</td></tr></table>";
        let result = process("表格", content);
        assert_eq!(result.chunks, vec![Chunk::html(content, Lang::Chinese)]);
    }

    #[test]
    fn test_combined_table_single_untagged_chunk() {
        let content = "<table><tr><th>內容</th><th>語言（念中文還是日文）</th></tr>\
                       <tr><td>これは表のテストです</td><td>日文</td></tr></table>";
        let result = process("雙語表", content);
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].lang, None);
        assert!(result.chunks[0]
            .content
            .contains(r#"<td lang="ja" class="japanese-section">これは表のテストです</td>"#));
        assert!(result.chunks[0].content.contains(r#"aria-hidden="true""#));
    }

    #[test]
    fn test_no_cjk_passes_through() {
        let tree = ContentNode::parse_fragment("<p>Hello</p>");
        assert!(process_prose(&tree).is_none());

        let result = process("无标记", "<p>Hello world</p>");
        assert_eq!(result.chunks, vec![Chunk::html("<p>Hello world</p>", Lang::Chinese)]);
    }

    #[test]
    fn test_blank_content_has_no_chunks() {
        for content in ["", "   ", "\n\t "] {
            let result = process("空白", content);
            assert!(result.chunks.is_empty(), "{:?}", content);
        }
    }

    #[test]
    fn test_heading_only_document() {
        let result = process("标题", "<h2>Lesson 1</h2>");
        assert_eq!(result.languages(), vec![Some(Lang::Chinese)]);
        assert_eq!(result.chunks[0].content, r#"<div lang="zh-tw"><h2>Lesson 1</h2></div>"#);
    }
}
