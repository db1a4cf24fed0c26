use crate::log::formatter::LogFormatter;
use crate::log::{LogLevel, LogRecord};
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Write;

/// TextFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct TextFormatterConfig {
    /// 是否启用颜色输出
    #[default = false]
    pub colored: bool,
}

/// 文本格式化器
///
/// 输出格式: `2025-01-19T12:34:56.789Z - S3 - INFO - message | key=value`
pub struct TextFormatter {
    config: TextFormatterConfig,
}

impl TextFormatter {
    pub fn new(config: TextFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut result = String::with_capacity(64 + record.message.len());

        write!(
            result,
            "{}",
            record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        )?;

        if let Some(module) = &record.module {
            write!(result, " - {}", module)?;
        }

        if self.config.colored {
            write!(result, " - {}", colored_level(record.level))?;
        } else {
            write!(result, " - {}", record.level)?;
        }

        result.push_str(" - ");
        result.push_str(&record.message);

        if !record.metadata.is_empty() {
            result.push_str(" |");
            for (key, value) in &record.metadata {
                if self.config.colored {
                    write!(result, " \x1b[36m{}\x1b[0m={}", key, value)?;
                } else {
                    write!(result, " {}={}", key, value)?;
                }
            }
        }

        if let (Some(file), Some(line)) = (&record.file, record.line) {
            write!(result, " ({}:{})", file, line)?;
        }

        Ok(result)
    }
}

fn colored_level(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "\x1b[31mERROR\x1b[0m",
        LogLevel::Warn => "\x1b[33mWARN\x1b[0m",
        LogLevel::Info => "\x1b[32mINFO\x1b[0m",
        LogLevel::Debug => "\x1b[36mDEBUG\x1b[0m",
        LogLevel::Trace => "\x1b[37;2mTRACE\x1b[0m",
    }
}
