use serde::{Deserialize, Serialize};

/// 输入文档的格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    /// 普通 HTML（默认）
    #[default]
    Html,
    /// `<p class="ZHTW">` 段落，需要先标注其中的日文片段
    ZhtwParagraphs,
}

/// 待处理的文档（从 TOML 文件加载）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDocument {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub format: DocumentFormat,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ContentDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            format: DocumentFormat::default(),
            file_path: None,
        }
    }

    /// 输出文件名（不含扩展名）：优先使用源文件名，否则使用标题
    pub fn output_stem(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|path| std::path::Path::new(path).file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.title.clone())
    }
}
