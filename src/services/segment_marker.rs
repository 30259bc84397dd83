//! 段落标注服务 - 业务能力层
//!
//! 处理 `<p class="ZHTW">` 讲稿：按标点和换行断句，含假名的句子拆成
//! `<p class="JP">`，随后删除空段落并合并相邻同类段落。

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::Lang;
use crate::services::script_classifier::has_kana;

pub const ZHTW_CLASS: &str = "ZHTW";
pub const JP_CLASS: &str = "JP";

static CLASSED_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<p class="([^"]+)">(.*?)</p>"#).expect("段落正则")
});

/// 中文标点
const ZH_PUNCTUATION: &str = "＝，。！？；：「」『』（）［］【】《》〈〉、…";
/// 英文标点（不含括号）
const EN_PUNCTUATION: &str = ",.!?;:\"'[]{}\\/<>-_+=`~@#$%^&*|";
/// 日文标点
const JP_PUNCTUATION: &str = "。、！？…";

/// 带 class 的段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassedParagraph {
    pub class: String,
    pub content: String,
}

impl ClassedParagraph {
    pub fn new(class: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            content: content.into(),
        }
    }

    pub fn to_html(&self) -> String {
        format!(r#"<p class="{}">{}</p>"#, self.class, self.content)
    }

    /// JP / ZHTW 段落额外带上 `lang` 属性
    pub fn to_lang_html(&self) -> String {
        match class_lang(&self.class) {
            Some(lang) => format!(
                r#"<p class="{}" lang="{}">{}</p>"#,
                self.class,
                lang.code(),
                self.content
            ),
            None => self.to_html(),
        }
    }
}

/// 段落 class 对应的语言
pub fn class_lang(class: &str) -> Option<Lang> {
    match class {
        JP_CLASS => Some(Lang::Japanese),
        ZHTW_CLASS => Some(Lang::Chinese),
        _ => None,
    }
}

/// 断句字符：标点与换行
pub fn is_delimiter(c: char) -> bool {
    c == '\n'
        || c == '\r'
        || ZH_PUNCTUATION.contains(c)
        || EN_PUNCTUATION.contains(c)
        || JP_PUNCTUATION.contains(c)
}

/// 断句，每句保留结尾的标点
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if is_delimiter(c) {
            let end = i + c.len_utf8();
            segments.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// 把一个中文段落拆成中文 / 日文句子（只含空白的句子被丢弃）
pub fn mark_japanese_segments(text: &str) -> Vec<ClassedParagraph> {
    split_segments(text)
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| {
            let class = if has_kana(segment) { JP_CLASS } else { ZHTW_CLASS };
            ClassedParagraph::new(class, segment)
        })
        .collect()
}

/// 删除空段落，合并相邻同类段落
pub fn merge_paragraphs(paragraphs: Vec<ClassedParagraph>) -> Vec<ClassedParagraph> {
    let mut merged: Vec<ClassedParagraph> = Vec::new();
    for paragraph in paragraphs {
        if paragraph.content.trim().is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.class == paragraph.class => last.content.push_str(&paragraph.content),
            _ => merged.push(paragraph),
        }
    }
    merged
}

/// 标注所有 ZHTW 段落中的日文句子
///
/// 其他 class 的段落原样保留；段落以外的内容会被丢弃。结果以空格连接
pub fn annotate_zhtw_paragraphs(xml: &str) -> String {
    join_paragraphs(&annotate(xml), ClassedParagraph::to_html)
}

/// 与 [`annotate_zhtw_paragraphs`] 相同，但 JP / ZHTW 段落带 `lang` 属性，
/// 供后续分段直接按语言归类
pub fn annotate_zhtw_paragraphs_with_lang(xml: &str) -> String {
    join_paragraphs(&annotate(xml), ClassedParagraph::to_lang_html)
}

fn annotate(xml: &str) -> Vec<ClassedParagraph> {
    let mut paragraphs = Vec::new();
    for caps in CLASSED_PARAGRAPH.captures_iter(xml) {
        let class = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let content = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        if class == ZHTW_CLASS {
            paragraphs.extend(mark_japanese_segments(content));
        } else {
            paragraphs.push(ClassedParagraph::new(class, content));
        }
    }

    let merged = merge_paragraphs(paragraphs);
    debug!("段落标注完成: 共 {} 段", merged.len());
    merged
}

fn join_paragraphs(paragraphs: &[ClassedParagraph], render: fn(&ClassedParagraph) -> String) -> String {
    paragraphs.iter().map(render).collect::<Vec<_>>().join(" ")
}
