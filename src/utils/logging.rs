use anyhow::{Context, Result};
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;

use crate::models::Lang;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n双语分段日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(input_folder: &str, output_folder: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 双语内容分段模式");
    info!("📂 输入目录: {}", input_folder);
    info!("📁 输出目录: {}", output_folder);
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_documents_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的文档", total);
    info!("💡 按文件名顺序逐个处理\n");
}

/// 记录单个文档的分段结果
pub fn log_chunks(index: usize, title: &str, languages: &[Option<Lang>]) {
    let labels: Vec<&str> = languages
        .iter()
        .map(|lang| lang.map(Lang::code).unwrap_or("混合"))
        .collect();
    info!(
        "[文档 {}] ✓ {} → {} 段 [{}]",
        index,
        truncate_text(title, 30),
        languages.len(),
        labels.join(", ")
    );
}

/// 打印最终统计信息，并追加到日志文件
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) -> Result<()> {
    let finished_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("完成时间: {}", finished_at);
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;
    writeln!(
        file,
        "完成时间: {}\n成功: {}/{}\n失败: {}",
        finished_at, success, total, failed
    )?;

    Ok(())
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
