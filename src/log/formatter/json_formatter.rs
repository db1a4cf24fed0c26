use crate::log::formatter::LogFormatter;
use crate::log::LogRecord;
use anyhow::Result;

/// JSON 格式化器
///
/// 每条日志一行 JSON，复用 LogRecord 的 Serialize 实现
#[derive(Default)]
pub struct JsonFormatter;

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        Ok(serde_json::to_string(record)?)
    }
}
