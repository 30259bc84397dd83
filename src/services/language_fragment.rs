//! 单一语言的提取结果
//!
//! 每次提取都返回自己的 `LanguageFragment`，"是否找到内容"由返回值表达，
//! 不依赖外部共享的标志位。

use crate::infrastructure::ContentNode;
use crate::models::{Chunk, Lang};

/// 某一语言累积的 HTML 片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFragment {
    lang: Lang,
    container_class: Option<&'static str>,
    items: Vec<ContentNode>,
}

impl LanguageFragment {
    /// 容器为 `<div lang="..">`
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            container_class: None,
            items: Vec::new(),
        }
    }

    /// 容器为 `<div lang=".." class="language-..">`
    pub fn with_container_class(lang: Lang) -> Self {
        Self {
            lang,
            container_class: Some(lang.container_class()),
            items: Vec::new(),
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn push(&mut self, item: ContentNode) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ContentNode] {
        &self.items
    }

    pub fn has_content(&self) -> bool {
        !self.items.is_empty()
    }

    /// 已收集的某个片段中是否包含这段 HTML
    pub fn contains_html(&self, html: &str) -> bool {
        self.items.iter().any(|item| item.outer_html().contains(html))
    }

    /// 包裹后的容器节点；没有内容时返回 None
    pub fn to_node(&self) -> Option<ContentNode> {
        if !self.has_content() {
            return None;
        }
        let mut container = ContentNode::new("div").with_attr("lang", self.lang.code());
        if let Some(class) = self.container_class {
            container.set_attr("class", class);
        }
        for item in &self.items {
            container.push_child(item.clone());
        }
        Some(container)
    }

    /// 输出 HTML；没有内容时返回空字符串而不是空容器
    pub fn to_html(&self) -> String {
        self.to_node()
            .map(|node| node.outer_html())
            .unwrap_or_default()
    }

    pub fn into_chunk(self) -> Option<Chunk> {
        let lang = self.lang;
        self.to_node()
            .map(|node| Chunk::html(node.outer_html(), lang))
    }
}

/// 新建只带文本的段落
pub fn paragraph(text: &str, class: Option<&str>) -> ContentNode {
    let mut node = ContentNode::new("p");
    if let Some(class) = class {
        node.set_attr("class", class);
    }
    node.with_text(text)
}

/// 复制元素的标签与内容，丢弃原有属性
pub fn shallow_copy(node: &ContentNode, class: Option<&str>) -> ContentNode {
    let mut copy = ContentNode::new(node.tag.clone());
    if let Some(class) = class {
        copy.set_attr("class", class);
    }
    copy.children = node.children.clone();
    copy
}
