//! 文字分类服务 - 业务能力层
//!
//! 只负责"这段文字是日文还是中文"的判断，不关心 HTML 结构
//!
//! ## 判断优先级
//! 1. 完全等于语言标签（`日文` / `中文`）
//! 2. 表格行：第二个单元格是语言标签
//! 3. 日文信号：日文标记、假名、日文句尾
//! 4. 中文信号：中文标记、中文虚词
//! 5. 文字范围：假名 / 汉字
//! 6. 默认中文
//!
//! 规则表 `DETECTION_RULES` 是唯一的优先级定义，按顺序短路求值。

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::models::Lang;

/// 日文标记：`日文:` `日文：` `**日文**` `[日文]` `(日文)`
static JAPANESE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"日文[:：]|\*\*日文\*\*[:：]?|\[日文\]|\(日文\)").expect("日文标记正则")
});

/// 中文标记：`中文:` `中文：` `**中文**` `[中文]` `(中文)`
static CHINESE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"中文[:：]|\*\*中文\*\*[:：]?|\[中文\]|\(中文\)").expect("中文标记正则")
});

/// 表格单元格
static TABLE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("单元格正则"));

/// 日文句尾与助词（含罗马字混排时也能识别）
const JAPANESE_ENDINGS: &[&str] = &[
    "です", "ます", "した", "ません", "でした", "ください", "だよ", "だね", "のです", "ましょう",
];

/// 中文常用虚词
const CHINESE_PARTICLES: &[&str] = &[
    "的", "了", "是", "不", "在", "有", "和", "我", "你", "他", "她", "它", "們", "们", "這", "这",
    "那", "哪", "什麼", "什么",
];

/// 单条判断规则：命中返回语言，否则交给下一条
type DetectionRule = fn(&str) -> Option<Lang>;

/// 判断规则（顺序即优先级）
///
/// 日文信号排在中文信号之前：没有假名、两种标记都出现时取日文。
/// 这是沿用的策略选择，并非语言学上的结论。
const DETECTION_RULES: &[(&str, DetectionRule)] = &[
    ("exact-label", exact_label),
    ("table-row", table_row_language),
    ("japanese-signals", japanese_signals),
    ("chinese-signals", chinese_signals),
    ("script-presence", script_presence),
];

/// 一段文字的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub has_japanese_script: bool,
    pub has_chinese_script: bool,
    pub language: Lang,
}

/// 平假名 U+3040–U+309F，片假名 U+30A0–U+30FF
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

/// CJK 统一汉字、扩展 A、兼容汉字
pub fn is_ideograph(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}'
    )
}

/// 日文里不常用的繁体字（錒–鎢）
fn is_traditional_specific(c: char) -> bool {
    ('\u{9312}'..='\u{93A2}').contains(&c)
}

pub fn has_kana(text: &str) -> bool {
    text.chars().any(is_kana)
}

/// 是否含中文常用虚词
pub fn has_chinese_particle(text: &str) -> bool {
    CHINESE_PARTICLES.iter().any(|particle| text.contains(particle))
}

pub fn has_japanese_ending(text: &str) -> bool {
    JAPANESE_ENDINGS.iter().any(|ending| text.contains(ending))
}

/// 文字中是否出现该语言的标记
pub fn has_marker(text: &str, lang: Lang) -> bool {
    marker_pattern(lang).is_match(text)
}

/// 该语言标记出现的次数
pub fn count_markers(text: &str, lang: Lang) -> usize {
    marker_pattern(lang).find_iter(text).count()
}

fn marker_pattern(lang: Lang) -> &'static Regex {
    match lang {
        Lang::Japanese => &JAPANESE_MARKER,
        Lang::Chinese => &CHINESE_MARKER,
    }
}

/// 是否只由汉字（CJK 统一汉字基本区）和空白组成
pub fn is_pure_ideograph_run(text: &str) -> bool {
    let mut has_ideograph = false;
    for c in text.chars() {
        if ('\u{4E00}'..='\u{9FFF}').contains(&c) {
            has_ideograph = true;
        } else if !c.is_whitespace() {
            return false;
        }
    }
    has_ideograph
}

/// 是否含日文
///
/// 假名、日文标记、日文句尾任一命中即可；完全等于 `日文` 也算
pub fn contains_japanese_script(text: &str) -> bool {
    if text.trim() == Lang::Japanese.label() {
        return true;
    }
    has_kana(text) || has_marker(text, Lang::Japanese) || has_japanese_ending(text)
}

/// 是否含中文
///
/// 出现假名即视为日文，直接返回 false
pub fn contains_chinese_script(text: &str) -> bool {
    if text.trim() == Lang::Chinese.label() {
        return true;
    }
    if has_kana(text) {
        return false;
    }
    text.chars()
        .any(|c| is_ideograph(c) || is_traditional_specific(c))
        || has_marker(text, Lang::Chinese)
        || has_chinese_particle(text)
}

/// 判断主要语言，无任何信号时默认中文
pub fn detect_language(text: &str) -> Lang {
    for (name, rule) in DETECTION_RULES {
        if let Some(lang) = rule(text) {
            trace!("语言判断规则 {} 命中: {}", name, lang.code());
            return lang;
        }
    }
    Lang::Chinese
}

/// 完整分类结果
pub fn classify(text: &str) -> ClassificationResult {
    ClassificationResult {
        has_japanese_script: contains_japanese_script(text),
        has_chinese_script: contains_chinese_script(text),
        language: detect_language(text),
    }
}

/// 表格行捷径：至少两个单元格，且第二个单元格恰好是语言标签
pub fn table_row_language(text: &str) -> Option<Lang> {
    let cell = TABLE_CELL.captures_iter(text).nth(1)?;
    let value = cell.get(1).map(|m| m.as_str()).unwrap_or_default();
    Lang::from_label(value)
}

// ========== 判断规则 ==========

fn exact_label(text: &str) -> Option<Lang> {
    Lang::from_label(text)
}

fn japanese_signals(text: &str) -> Option<Lang> {
    let markers = count_markers(text, Lang::Japanese);
    let kana = text.chars().filter(|c| is_kana(*c)).count();
    let endings: usize = JAPANESE_ENDINGS
        .iter()
        .map(|ending| text.matches(ending).count())
        .sum();

    (markers + kana + endings > 0).then_some(Lang::Japanese)
}

fn chinese_signals(text: &str) -> Option<Lang> {
    let markers = count_markers(text, Lang::Chinese);
    let particles: usize = CHINESE_PARTICLES
        .iter()
        .map(|particle| text.matches(particle).count())
        .sum();

    (markers + particles > 0).then_some(Lang::Chinese)
}

/// 只剩汉字可看时归为中文（假名已由日文信号处理）
fn script_presence(text: &str) -> Option<Lang> {
    text.chars()
        .any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c))
        .then_some(Lang::Chinese)
}
