//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一篇文档"的完整处理流程
//!
//! 流程顺序：
//! 1. ZHTW 段落格式先标注日文句子
//! 2. 选择策略并分段
//! 3. 写出 JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::clients::TokenAndSubdomain;
use crate::config::Config;
use crate::models::{ContentDocument, DocumentFormat, ProcessedContent};
use crate::orchestrator::content_processor;
use crate::services::segment_marker::annotate_zhtw_paragraphs_with_lang;
use crate::services::{OutputWriter, ReaderPayload};
use crate::utils::logging::{log_chunks, truncate_text};

/// 文档处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub processed: ProcessedContent,
    pub output_path: PathBuf,
}

/// 文档处理流程
///
/// - 编排单篇文档的处理
/// - 不关心批量与统计
pub struct DocumentFlow {
    output_writer: OutputWriter,
    credentials: Option<TokenAndSubdomain>,
    verbose_logging: bool,
}

impl DocumentFlow {
    /// 创建新的文档处理流程
    pub fn new(config: &Config, credentials: Option<TokenAndSubdomain>) -> Self {
        Self {
            output_writer: OutputWriter::new(&config.output_folder),
            credentials,
            verbose_logging: config.verbose_logging,
        }
    }

    /// 只分段，不写文件
    pub fn chunk(&self, document: &ContentDocument) -> ProcessedContent {
        let content = match document.format {
            DocumentFormat::Html => document.content.clone(),
            DocumentFormat::ZhtwParagraphs => {
                debug!("标注 ZHTW 段落: {}", document.title);
                annotate_zhtw_paragraphs_with_lang(&document.content)
            }
        };
        content_processor::process(&document.title, &content)
    }

    pub async fn run(&self, document: &ContentDocument, index: usize) -> Result<ProcessResult> {
        if self.verbose_logging {
            info!(
                "[文档 {}] 📄 内容预览: {}",
                index,
                truncate_text(&document.content, 60)
            );
        }

        let processed = self.chunk(document);
        log_chunks(index, &document.title, &processed.languages());

        let payload = ReaderPayload::new(&processed, self.credentials.as_ref());
        let output_path = self
            .output_writer
            .write(&document.output_stem(), &payload)
            .await
            .with_context(|| format!("[文档 {}] 写入结果失败", index))?;

        Ok(ProcessResult {
            processed,
            output_path,
        })
    }
}
