mod json_formatter;
mod text_formatter;

pub use json_formatter::JsonFormatter;
pub use text_formatter::{TextFormatter, TextFormatterConfig};

use crate::log::LogRecord;
use anyhow::Result;

/// 日志格式化器 trait
///
/// 负责将 LogRecord 格式化为字符串
pub trait LogFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<String>;
}
