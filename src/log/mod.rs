//! 日志模块
//!
//! 结构化日志记录，支持文本/JSON 格式，可同时输出到终端和文件。
//! Logger 由应用创建后显式注入，不依赖全局状态。
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use ossx::log::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config: LoggerConfig = serde_yaml::from_str(r#"
//!         level: info
//!         formatter:
//!           type: TextFormatter
//!           options:
//!             colored: false
//!         appenders:
//!           - type: ConsoleAppender
//!             options:
//!               target: stderr
//!           - type: FileAppender
//!             options:
//!               file_path: s3_client.log
//!     "#)?;
//!
//!     let logger = Logger::new(config).await?;
//!     logger.info("Application started").await?;
//!     logger.flush().await?;
//!     Ok(())
//! }
//! ```

pub mod appender;
pub mod formatter;
pub mod log_record;
pub mod logger;
mod macros;

pub use appender::{
    ConsoleAppender, ConsoleAppenderConfig, FileAppender, FileAppenderConfig, LogAppender, Target,
};
pub use formatter::{JsonFormatter, LogFormatter, TextFormatter, TextFormatterConfig};
pub use log_record::{LogLevel, LogRecord, MetadataValue};
pub use logger::{AppenderConfig, FormatterConfig, Logger, LoggerConfig};
