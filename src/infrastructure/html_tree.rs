//! HTML 内容树 - 基础设施层
//!
//! 把 `scraper`（html5ever）解析出的文档转换成自有的 `ContentNode` 树。
//! 分类器只读这棵树；改写器基于它构建新的树，从不原地修改。

use scraper::{ElementRef, Html, Node};

/// 不需要闭合标签的元素
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// 内容不做转义的元素
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// 子节点：元素或文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(ContentNode),
    Text(String),
}

/// HTML 元素节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Child>,
}

impl ContentNode {
    /// 创建空元素
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 解析 HTML 片段，返回包裹全部内容的容器节点（`div`）
    ///
    /// 容器本身不属于输入内容，遍历时只看其后代
    pub fn parse_fragment(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let mut container = ContentNode::new("div");
        container.children = convert_children(fragment.root_element());
        container
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: ContentNode) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn push_child(&mut self, child: ContentNode) {
        self.children.push(Child::Element(child));
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 设置属性（已存在则覆盖，保持原位置）
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// 追加 class（已存在则忽略）
    pub fn add_class(&mut self, class: &str) {
        let merged = match self.attr("class") {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => return,
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn is_any(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag.as_str())
    }

    /// 直接子元素
    pub fn element_children(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        })
    }

    /// 所有后代元素（文档顺序，不含自身）
    pub fn descendants(&self) -> Vec<&ContentNode> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// 标签属于 `tags` 的所有后代元素（文档顺序）
    pub fn find_all(&self, tags: &[&str]) -> Vec<&ContentNode> {
        self.descendants()
            .into_iter()
            .filter(|node| node.is_any(tags))
            .collect()
    }

    pub fn has_descendant(&self, tags: &[&str]) -> bool {
        self.element_children()
            .any(|child| child.is_any(tags) || child.has_descendant(tags))
    }

    /// 纯文本内容（等同于 DOM 的 textContent）
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_child(child, self.is_any(RAW_TEXT_ELEMENTS), &mut out);
        }
        out
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn convert_children(element: ElementRef<'_>) -> Vec<Child> {
    let mut children = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let value: &str = text;
                children.push(Child::Text(value.to_string()));
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    children.push(Child::Element(convert_element(child_element)));
                }
            }
            _ => {}
        }
    }
    children
}

fn convert_element(element: ElementRef<'_>) -> ContentNode {
    let value = element.value();
    let mut attrs: Vec<(String, String)> = value
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    // html5ever 的属性顺序不稳定，排序保证输出确定
    attrs.sort();

    ContentNode {
        tag: value.name().to_string(),
        attrs,
        children: convert_children(element),
    }
}

fn collect_descendants<'a>(node: &'a ContentNode, out: &mut Vec<&'a ContentNode>) {
    for child in node.element_children() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn collect_text(node: &ContentNode, out: &mut String) {
    for child in &node.children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(element) => collect_text(element, out),
        }
    }
}

fn write_child(child: &Child, raw: bool, out: &mut String) {
    match child {
        Child::Text(text) if raw => out.push_str(text),
        Child::Text(text) => out.push_str(&escape_text(text)),
        Child::Element(element) => write_element(element, out),
    }
}

fn write_element(node: &ContentNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if node.is_any(VOID_ELEMENTS) {
        return;
    }

    out.push_str(&node.inner_html());
    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

/// 转义文本节点
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}
