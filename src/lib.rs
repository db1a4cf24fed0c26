//! ossx - S3 兼容对象存储客户端
//!
//! 面向单个存储桶的上传、下载、删除、存在性检查、列举和容量统计。
//!
//! ## 模块
//!
//! - **oss**: 对象存储客户端、连接抽象（AWS S3 / 内存）、分页与错误分类
//! - **log**: 日志模块（支持文本/JSON 格式，输出到终端和文件）
//!
//! ## 示例
//!
//! ```rust,no_run
//! use ossx::log::{Logger, LoggerConfig};
//! use ossx::oss::{ObjectStorageClient, ObjectStorageConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let logger = Arc::new(Logger::new(LoggerConfig::default()).await?);
//!     let config = ObjectStorageConfig::from_env()?;
//!     let client = ObjectStorageClient::new(config, logger.clone()).await?;
//!
//!     client.send_file("report.csv", None).await?;
//!     println!("{}", client.get_bucket_size().await);
//!
//!     logger.flush().await?;
//!     Ok(())
//! }
//! ```

pub mod log;
pub mod oss;

// 重新导出主要的公共 API
pub use log::{LogAppender, LogFormatter, LogLevel, LogRecord, Logger, LoggerConfig};

pub use oss::{
    AwsS3ConnectionFactory, Connection, ConnectionFactory, ErrorClass, MemoryConnectionFactory,
    ObjectStorageClient, ObjectStorageConfig, ObjectStoreError,
};
