//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `content_processor` - 单篇内容处理器
//! - 根据文档形态选择提取策略（整表改写 / 按行拆分 / 标记提取）
//! - 把各语言片段组装成 chunk 列表
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（配置校验、日志文件、令牌）
//! - 批量加载文档并逐个处理
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ContentDocument>)
//!     ↓
//! workflow::DocumentFlow (处理单个文档并写出结果)
//!     ↓
//! content_processor (选择策略，组装 chunk)
//!     ↓
//! services (能力层：标记提取 / 兜底扫描 / 表格改写)
//!     ↓
//! infrastructure (基础设施：ContentNode)
//! ```

pub mod batch_processor;
pub mod content_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use content_processor::{process, ExtractionStrategy};
