use crate::models::document::ContentDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 ContentDocument 对象
pub async fn load_toml_to_document(toml_file_path: &Path) -> Result<ContentDocument> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut document: ContentDocument = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    document.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(document)
}

/// 从文件夹中加载所有 TOML 文件（按文件名排序）
///
/// 无法解析的文件会被跳过并记录警告
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<ContentDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let toml_files = list_toml_files(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    let mut documents = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_document(&path).await {
            Ok(document) => {
                tracing::info!(
                    "成功加载文档《{}》，内容长度: {} 字符",
                    document.title,
                    document.content.chars().count()
                );
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(documents)
}

async fn list_toml_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(folder).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }

    toml_files.sort();
    Ok(toml_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentFormat;

    fn temp_folder(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bilingual_chunker_loader_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_all_sorted_and_skip_invalid() {
        let dir = temp_folder("sorted");
        std::fs::write(
            dir.join("b.toml"),
            "title = \"乙\"\ncontent = \"<p>日文：テスト</p>\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("a.toml"),
            "title = \"甲\"\ncontent = \"<p>中文：测试</p>\"\nformat = \"zhtw-paragraphs\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("broken.toml"), "title = ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let documents = load_all_toml_files(dir.to_str().unwrap()).await.unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].title, "甲");
        assert_eq!(documents[0].format, DocumentFormat::ZhtwParagraphs);
        assert_eq!(documents[1].title, "乙");
        assert!(documents[1]
            .file_path
            .as_deref()
            .unwrap()
            .ends_with("b.toml"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_folder_is_error() {
        let result = load_all_toml_files("/definitely/not/a/folder/for/chunker").await;
        assert!(result.is_err());
    }
}
