use crate::log::appender::LogAppender;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::io::{self, Write};

/// 输出目标
#[derive(Debug, Clone, Copy, Deserialize, SmartDefault, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Stdout,
    #[default]
    Stderr,
}

/// ConsoleAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct ConsoleAppenderConfig {
    /// 输出到 stdout 还是 stderr，默认 stderr 以免混入命令输出
    pub target: Target,
}

/// 终端输出器
pub struct ConsoleAppender {
    config: ConsoleAppenderConfig,
}

impl ConsoleAppender {
    pub fn new(config: ConsoleAppenderConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl LogAppender for ConsoleAppender {
    async fn append(&self, formatted_message: &str) -> Result<()> {
        match self.config.target {
            Target::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", formatted_message)?;
                stdout.flush()?;
            }
            Target::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{}", formatted_message)?;
            }
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        match self.config.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_appender_config_deserialize() {
        let config: ConsoleAppenderConfig = serde_json::from_str(r#"{"target": "stdout"}"#).unwrap();
        assert_eq!(config.target, Target::Stdout);

        let config: ConsoleAppenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.target, Target::Stderr);
    }

    #[tokio::test]
    async fn test_console_appender_append() {
        let appender = ConsoleAppender::new(ConsoleAppenderConfig::default());
        assert!(appender.append("Test message").await.is_ok());
        assert!(appender.flush().await.is_ok());
    }
}
