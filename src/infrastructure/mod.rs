//! 基础设施层
//!
//! `ContentNode`：HTML 片段解析后的自有内容树，只暴露查询与序列化能力

pub mod html_tree;

pub use html_tree::{escape_text, Child, ContentNode};
