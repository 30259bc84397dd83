//! # Bilingual Chunker
//!
//! 把中日双语课文 HTML 拆成按语言标注的片段，交给沉浸式阅读器朗读
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - HTML 片段解析为自有的 `ContentNode` 树，只暴露查询与序列化能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只处理一棵内容树
//! - `script_classifier` - 文字分类（假名 / 汉字 / 标记 / 句尾）
//! - `marker_extractor` - 按语言标记提取
//! - `fallback_extractor` - 兜底扫描
//! - `table_rewriter` - 双语表格改写
//! - `segment_marker` - ZHTW 段落中的日文句子标注
//! - `OutputWriter` - 写 JSON 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一篇文档"的完整处理流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/content_processor` - 策略选择，入口 [`process`]
//! - `orchestrator/batch_processor` - 批量处理命令行程序
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{TokenAndSubdomain, TokenClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ContentNode;
pub use models::{Chunk, ContentDocument, DocumentFormat, Lang, ProcessedContent};
pub use orchestrator::{process, App, ExtractionStrategy};
pub use workflow::{DocumentFlow, ProcessResult};
