use crate::log::appender::{
    ConsoleAppender, ConsoleAppenderConfig, FileAppender, FileAppenderConfig, LogAppender,
};
use crate::log::formatter::{JsonFormatter, LogFormatter, TextFormatter, TextFormatterConfig};
use crate::log::{LogLevel, LogRecord, MetadataValue};
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::sync::Arc;

/// Formatter 配置，形如 `{ type: "TextFormatter", options: { colored: true } }`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", content = "options")]
pub enum FormatterConfig {
    TextFormatter(TextFormatterConfig),
    JsonFormatter,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig::TextFormatter(TextFormatterConfig::default())
    }
}

/// Appender 配置，形如 `{ type: "FileAppender", options: { file_path: "s3_client.log" } }`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", content = "options")]
pub enum AppenderConfig {
    ConsoleAppender(ConsoleAppenderConfig),
    FileAppender(FileAppenderConfig),
}

/// Logger 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// 日志器名称，写入每条记录
    #[default = "S3"]
    pub name: String,

    /// 日志级别
    #[default(LogLevel::Info)]
    pub level: LogLevel,

    pub formatter: FormatterConfig,

    /// 可同时输出到多个目标
    #[default(vec![AppenderConfig::ConsoleAppender(ConsoleAppenderConfig::default())])]
    pub appenders: Vec<AppenderConfig>,
}

/// 核心日志器
///
/// 负责日志的级别控制、格式化和输出。由应用在启动时创建一次，
/// 以 `Arc<Logger>` 的形式注入到需要记录日志的组件中
pub struct Logger {
    name: Option<String>,
    level: LogLevel,
    formatter: Arc<dyn LogFormatter>,
    appenders: Vec<Arc<dyn LogAppender>>,
}

impl Logger {
    /// 从配置创建 Logger
    pub async fn new(config: LoggerConfig) -> Result<Self> {
        let formatter: Arc<dyn LogFormatter> = match config.formatter {
            FormatterConfig::TextFormatter(options) => Arc::new(TextFormatter::new(options)),
            FormatterConfig::JsonFormatter => Arc::new(JsonFormatter),
        };

        let mut appenders: Vec<Arc<dyn LogAppender>> = Vec::with_capacity(config.appenders.len());
        for appender in config.appenders {
            match appender {
                AppenderConfig::ConsoleAppender(options) => {
                    appenders.push(Arc::new(ConsoleAppender::new(options)))
                }
                AppenderConfig::FileAppender(options) => {
                    appenders.push(Arc::new(FileAppender::new(options).await?))
                }
            }
        }

        Ok(Self::from_parts(config.level, formatter, appenders).with_name(config.name))
    }

    /// 直接由组件组装 Logger
    pub fn from_parts(
        level: LogLevel,
        formatter: Arc<dyn LogFormatter>,
        appenders: Vec<Arc<dyn LogAppender>>,
    ) -> Self {
        Self {
            name: None,
            level,
            formatter,
            appenders,
        }
    }

    /// 不输出任何内容的 Logger
    pub fn discard() -> Self {
        Self::from_parts(LogLevel::Error, Arc::new(JsonFormatter), Vec::new())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level && !self.appenders.is_empty()
    }

    /// 记录日志
    ///
    /// 单个 appender 失败不影响其他 appender，返回第一个错误
    pub async fn log(&self, mut record: LogRecord) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        if record.module.is_none() {
            record.module = self.name.clone();
        }

        let formatted = self.formatter.format(&record)?;

        let mut first_error = None;
        for appender in &self.appenders {
            if let Err(e) = appender.append(&formatted).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// 记录带 metadata 的日志
    pub async fn logm(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        metadata: impl IntoIterator<Item = (impl Into<String>, MetadataValue)>,
    ) -> Result<()> {
        let mut record = LogRecord::new(level, message.into());
        for (key, value) in metadata {
            record.metadata.push((key.into(), value));
        }
        self.log(record).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Info, message.into())).await
    }

    pub async fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Warn, message.into())).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Error, message.into())).await
    }

    /// 刷新所有 appender，进程退出前调用
    pub async fn flush(&self) -> Result<()> {
        for appender in &self.appenders {
            appender.flush().await?;
        }
        Ok(())
    }
}
