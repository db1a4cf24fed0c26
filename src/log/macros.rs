/// 日志宏
///
/// 自动捕获文件和行号，并支持 `"key" => value` 形式的元数据。
/// 宏展开为 `logger.log(record).await`，返回 `anyhow::Result<()>`
///
/// ```ignore
/// info!(logger, "Sent", "key" => "a.txt", "bytes" => 4096u64);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $logger:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $logger
            .log(
                $crate::log::LogRecord::new($level, ::std::string::String::from($msg))
                    .with_location(file!().to_string(), line!())
                    $(.with_metadata($key, $value))*,
            )
            .await
    };
}

/// 记录 DEBUG 级别日志
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($crate::log::LogLevel::Debug, $logger, $($rest)+)
    };
}

/// 记录 INFO 级别日志
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($crate::log::LogLevel::Info, $logger, $($rest)+)
    };
}

/// 记录 WARN 级别日志
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($crate::log::LogLevel::Warn, $logger, $($rest)+)
    };
}

/// 记录 ERROR 级别日志
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($crate::log::LogLevel::Error, $logger, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::log::{LogAppender, LogLevel, Logger, JsonFormatter};
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct VecAppender {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl LogAppender for VecAppender {
        async fn append(&self, formatted_message: &str) -> Result<()> {
            self.lines.lock().unwrap().push(formatted_message.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_macros_attach_location_and_metadata() -> Result<()> {
        let appender = Arc::new(VecAppender::default());
        let logger = Logger::from_parts(
            LogLevel::Debug,
            Arc::new(JsonFormatter),
            vec![appender.clone() as Arc<dyn LogAppender>],
        );

        crate::info!(logger, "Sent", "key" => "a.txt", "bytes" => 100u64)?;
        crate::debug!(logger, format!("page {}", 2))?;

        let lines = appender.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0])?;
        assert_eq!(first["level"], "INFO");
        assert_eq!(first["key"], "a.txt");
        assert_eq!(first["bytes"], 100);
        assert!(first["location"].as_str().unwrap().contains("macros.rs"));

        let second: serde_json::Value = serde_json::from_str(&lines[1])?;
        assert_eq!(second["message"], "page 2");
        Ok(())
    }
}
