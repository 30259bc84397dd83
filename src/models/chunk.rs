use serde::{Deserialize, Serialize};

use super::language::Lang;

/// chunk 的 MIME 类型（阅读器只接受 HTML）
pub const HTML_MIME_TYPE: &str = "text/html";

/// 交给阅读器的单个内容块
///
/// `lang` 为空时表示语言信息在 HTML 内部（逐个单元格标注）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<Lang>,
}

impl Chunk {
    /// 创建带语言的 HTML chunk
    pub fn html(content: impl Into<String>, lang: Lang) -> Self {
        Self {
            content: content.into(),
            mime_type: HTML_MIME_TYPE.to_string(),
            lang: Some(lang),
        }
    }

    /// 创建不带语言的 HTML chunk（语言由单元格的 `lang` 属性决定）
    pub fn html_untagged(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: HTML_MIME_TYPE.to_string(),
            lang: None,
        }
    }
}

/// 处理结果：标题 + 有序 chunk 列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedContent {
    pub title: String,
    pub chunks: Vec<Chunk>,
}

impl ProcessedContent {
    pub fn new(title: impl Into<String>, chunks: Vec<Chunk>) -> Self {
        Self {
            title: title.into(),
            chunks,
        }
    }

    /// 各 chunk 的语言（用于日志）
    pub fn languages(&self) -> Vec<Option<Lang>> {
        self.chunks.iter().map(|chunk| chunk.lang).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chunk_json_shape() {
        let chunk = Chunk::html("<p>テスト</p>", Lang::Japanese);
        assert_eq!(
            serde_json::to_value(&chunk).unwrap(),
            json!({"content": "<p>テスト</p>", "mimeType": "text/html", "lang": "ja"})
        );
    }

    #[test]
    fn test_untagged_chunk_omits_lang() {
        let value = serde_json::to_value(Chunk::html_untagged("<table></table>")).unwrap();
        assert!(value.get("lang").is_none());
        assert_eq!(value["mimeType"], "text/html");
    }
}
