use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// 元数据值
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
}

impl Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::I64(n) => serializer.serialize_i64(*n),
            MetadataValue::U64(n) => serializer.serialize_u64(*n),
            MetadataValue::F64(n) => serializer.serialize_f64(*n),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Null => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{}", s),
            MetadataValue::I64(n) => write!(f, "{}", n),
            MetadataValue::U64(n) => write!(f, "{}", n),
            MetadataValue::F64(n) => write!(f, "{}", n),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<&String> for MetadataValue {
    fn from(s: &String) -> Self {
        MetadataValue::String(s.clone())
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::I64(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        MetadataValue::I64(n as i64)
    }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self {
        MetadataValue::U64(n)
    }
}

impl From<usize> for MetadataValue {
    fn from(n: usize) -> Self {
        MetadataValue::U64(n as u64)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::F64(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl<T: Into<MetadataValue>> From<Option<T>> for MetadataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(MetadataValue::Null)
    }
}

/// 日志记录
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// 日志器名称，由 Logger 在输出前补齐
    pub module: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub timestamp: DateTime<Utc>,
    /// 自定义元数据（保留插入顺序）
    pub metadata: Vec<(String, MetadataValue)>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            message,
            module: None,
            file: None,
            line: None,
            timestamp: Utc::now(),
            metadata: Vec::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn with_location(mut self, file: String, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    pub fn with_module(mut self, module: String) -> Self {
        self.module = Some(module);
        self
    }

    /// 按 key 查找元数据
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(
            "timestamp",
            &self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        )?;
        map.serialize_entry("level", &self.level.to_string())?;
        if let Some(module) = &self.module {
            map.serialize_entry("logger", module)?;
        }
        map.serialize_entry("message", &self.message)?;
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            map.serialize_entry("location", &format!("{}:{}", file, line))?;
        }
        // 元数据平铺到顶层，便于日志系统检索
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Debug > LogLevel::Trace);
    }

    #[test]
    fn test_log_record_with_metadata() {
        let record = LogRecord::new(LogLevel::Info, "sent".to_string())
            .with_metadata("key", "a.txt")
            .with_metadata("bytes", 4096u64)
            .with_metadata("etag", None::<String>);

        assert_eq!(record.metadata.len(), 3);
        assert_eq!(record.get("key"), Some(&MetadataValue::String("a.txt".to_string())));
        assert_eq!(record.get("bytes"), Some(&MetadataValue::U64(4096)));
        assert_eq!(record.get("etag"), Some(&MetadataValue::Null));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_log_record_serialize() {
        let record = LogRecord::new(LogLevel::Warn, "check failed".to_string())
            .with_module("S3".to_string())
            .with_location("client.rs".to_string(), 7)
            .with_metadata("class", "other");

        let value: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["logger"], "S3");
        assert_eq!(value["message"], "check failed");
        assert_eq!(value["location"], "client.rs:7");
        assert_eq!(value["class"], "other");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
