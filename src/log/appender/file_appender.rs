use crate::log::appender::LogAppender;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// FileAppender 配置
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileAppenderConfig {
    /// 日志文件路径，不存在时自动创建（包括父目录），已存在则追加
    pub file_path: String,
}

/// 文件输出器
pub struct FileAppender {
    file: Mutex<tokio::fs::File>,
    config: FileAppenderConfig,
}

impl FileAppender {
    pub async fn new(config: FileAppenderConfig) -> Result<Self> {
        let path = PathBuf::from(&config.file_path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
            config,
        })
    }

    pub fn path(&self) -> &str {
        &self.config.file_path
    }
}

#[async_trait::async_trait]
impl LogAppender for FileAppender {
    async fn append(&self, formatted_message: &str) -> Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(formatted_message.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }
}
