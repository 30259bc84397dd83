//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行程序的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、写日志文件头、获取令牌（可选）
//! 2. **批量加载**：扫描并加载输入目录中的所有 TOML 文档
//! 3. **顺序处理**：按文件名顺序逐个交给 `DocumentFlow`
//! 4. **全局统计**：汇总成功 / 失败数量
//!
//! 令牌获取失败不会中断处理，只是输出中不带令牌。

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::clients::{TokenAndSubdomain, TokenClient};
use crate::config::Config;
use crate::models::{load_all_toml_files, ContentDocument};
use crate::utils::logging::{init_log_file, log_documents_loaded, log_startup, print_final_stats};
use crate::workflow::DocumentFlow;

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: DocumentFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config.input_folder, &config.output_folder);

        let credentials = fetch_credentials(&config).await;
        let flow = DocumentFlow::new(&config, credentials);

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有待处理的文档
        let documents = self.load_documents().await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_documents_loaded(documents.len());

        let stats = self.process_all(&documents).await;

        // 输出最终统计
        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        )?;

        Ok(stats)
    }

    /// 加载文档
    async fn load_documents(&self) -> Result<Vec<ContentDocument>> {
        info!("\n📁 正在扫描待处理的文档...");
        load_all_toml_files(&self.config.input_folder).await
    }

    /// 逐个处理文档
    async fn process_all(&self, documents: &[ContentDocument]) -> ProcessingStats {
        let mut stats = ProcessingStats {
            total: documents.len(),
            ..Default::default()
        };

        for (idx, document) in documents.iter().enumerate() {
            let index = idx + 1;
            match self.flow.run(document, index).await {
                Ok(result) => {
                    info!("[文档 {}] 💾 已写入: {}", index, result.output_path.display());
                    stats.success += 1;
                }
                Err(e) => {
                    error!("[文档 {}] ❌ 处理过程中发生错误: {:#}", index, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 配置了令牌服务时获取令牌；失败只记录警告
async fn fetch_credentials(config: &Config) -> Option<TokenAndSubdomain> {
    let client = match TokenClient::from_config(config) {
        Ok(Some(client)) => client,
        Ok(None) => {
            info!("ℹ️ 未配置令牌服务，输出中不包含令牌");
            return None;
        }
        Err(e) => {
            warn!("⚠️ 无法创建令牌客户端: {}", e);
            return None;
        }
    };

    match client.fetch_token_and_subdomain().await {
        Ok(credentials) => {
            info!("🔑 已获取令牌，子域名: {}", credentials.subdomain);
            Some(credentials)
        }
        Err(e) => {
            warn!("⚠️ 获取令牌失败，继续处理: {}", e);
            None
        }
    }
}
