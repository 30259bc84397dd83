use serde::{Deserialize, Serialize};

/// 语言标签 → 语言
static LABELS: phf::Map<&'static str, Lang> = phf::phf_map! {
    "日文" => Lang::Japanese,
    "中文" => Lang::Chinese,
};

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    /// 日文
    #[serde(rename = "ja")]
    Japanese,
    /// 中文（繁体）
    #[serde(rename = "zh-tw")]
    Chinese,
}

impl Lang {
    /// 获取语言代码（用于 `lang` 属性与 chunk）
    pub fn code(self) -> &'static str {
        match self {
            Lang::Japanese => "ja",
            Lang::Chinese => "zh-tw",
        }
    }

    /// 获取文档中使用的语言标签
    pub fn label(self) -> &'static str {
        match self {
            Lang::Japanese => "日文",
            Lang::Chinese => "中文",
        }
    }

    /// 另一种语言
    pub fn other(self) -> Self {
        match self {
            Lang::Japanese => Lang::Chinese,
            Lang::Chinese => Lang::Japanese,
        }
    }

    /// 单个片段的 class
    pub fn section_class(self) -> &'static str {
        match self {
            Lang::Japanese => "japanese-section",
            Lang::Chinese => "chinese-section",
        }
    }

    /// 语言容器的 class
    pub fn container_class(self) -> &'static str {
        match self {
            Lang::Japanese => "language-ja",
            Lang::Chinese => "language-zh",
        }
    }

    /// 从标签解析语言（要求去除空白后完全相等）
    pub fn from_label(label: &str) -> Option<Self> {
        LABELS.get(label.trim()).copied()
    }

    /// 从 HTML `lang` 属性解析语言
    ///
    /// `ja`, `ja-JP` → 日文；`zh`, `zh-tw`, `zh-Hant` … → 中文
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ja" => Some(Lang::Japanese),
            "zh" => Some(Lang::Chinese),
            _ => None,
        }
    }
}
