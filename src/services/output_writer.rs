//! 结果写入服务 - 业务能力层
//!
//! 只负责"写 JSON 文件"能力，不关心流程

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::clients::TokenAndSubdomain;
use crate::error::{AppError, AppResult};
use crate::models::ProcessedContent;

/// 交给阅读器的完整负载
#[derive(Debug, Clone, Serialize)]
pub struct ReaderPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
    #[serde(flatten)]
    pub content: &'a ProcessedContent,
}

impl<'a> ReaderPayload<'a> {
    pub fn new(content: &'a ProcessedContent, credentials: Option<&'a TokenAndSubdomain>) -> Self {
        Self {
            subdomain: credentials.map(|c| c.subdomain.as_str()),
            token: credentials.map(|c| c.token.as_str()),
            content,
        }
    }
}

/// 结果写入服务
///
/// 职责：
/// - 将单个文档的处理结果写成 `{output_folder}/{stem}.json`
/// - 目录不存在时自动创建
pub struct OutputWriter {
    output_folder: PathBuf,
}

impl OutputWriter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// 写入结果，返回写入的文件路径
    pub async fn write(&self, stem: &str, payload: &ReaderPayload<'_>) -> AppResult<PathBuf> {
        let path = self.output_folder.join(format!("{}.json", stem));
        let path_str = path.display().to_string();

        tokio::fs::create_dir_all(&self.output_folder)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_folder.display().to_string(), e))?;

        let json = serde_json::to_string_pretty(payload)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| AppError::file_write_failed(path_str.clone(), e))?;

        debug!("写入结果: {} ({} 段)", path_str, payload.content.chunks.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chunk, Lang};
    use serde_json::{json, Value};

    fn sample() -> ProcessedContent {
        ProcessedContent::new("第一課", vec![Chunk::html("<p>テスト</p>", Lang::Japanese)])
    }

    #[test]
    fn test_payload_without_credentials() {
        let content = sample();
        let value = serde_json::to_value(ReaderPayload::new(&content, None)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "第一課",
                "chunks": [{"content": "<p>テスト</p>", "mimeType": "text/html", "lang": "ja"}]
            })
        );
    }

    #[tokio::test]
    async fn test_write_creates_folder() {
        let dir = std::env::temp_dir().join(format!("bilingual_out_{}", std::process::id()));
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let content = sample();
        let credentials = TokenAndSubdomain {
            token: "abc".to_string(),
            subdomain: "demo".to_string(),
        };
        let writer = OutputWriter::new(&dir);
        let path = writer
            .write("lesson1", &ReaderPayload::new(&content, Some(&credentials)))
            .await
            .unwrap();

        assert_eq!(path, dir.join("lesson1.json"));
        let written: Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["token"], "abc");
        assert_eq!(written["subdomain"], "demo");
        assert_eq!(written["chunks"][0]["lang"], "ja");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
