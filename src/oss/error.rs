use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use std::path::Path;
use thiserror::Error;

/// 传输层错误分类
///
/// 客户端只关心两类结果：对象不存在，以及其他所有失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 访问的对象不存在
    NotFound,
    /// 认证、网络、参数、服务端等其他错误
    Other,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::NotFound => write!(f, "not_found"),
            ErrorClass::Other => write!(f, "other"),
        }
    }
}

/// 根据 HTTP 状态码和服务端错误码对传输错误分类
///
/// `NoSuchBucket` 同样返回 404，但表示存储桶配置有误，不归为对象不存在
pub fn classify(status: Option<u16>, code: Option<&str>) -> ErrorClass {
    match code {
        Some("NoSuchBucket") => ErrorClass::Other,
        Some("NoSuchKey") | Some("NotFound") | Some("404") => ErrorClass::NotFound,
        _ if status == Some(404) => ErrorClass::NotFound,
        _ => ErrorClass::Other,
    }
}

/// 对象存储统一错误类型
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("对象不存在: {key}")]
    NotFound { key: String },

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("无效参数: {0}")]
    InvalidInput(String),

    #[error("本地文件错误 [{path}]: {source}")]
    LocalIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("传输错误 [{operation}]: {message}")]
    Transport {
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ObjectStoreError {
    /// 错误分类
    pub fn class(&self) -> ErrorClass {
        match self {
            ObjectStoreError::NotFound { .. } => ErrorClass::NotFound,
            _ => ErrorClass::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    /// 本地文件读写错误
    pub fn local_io(path: &Path, source: std::io::Error) -> Self {
        ObjectStoreError::LocalIo {
            path: path.display().to_string(),
            source,
        }
    }

    /// 包装任意传输层错误（不做分类，一律视为 Other）
    pub fn transport<E>(err: E, operation: &str) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ObjectStoreError::Transport {
            operation: operation.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// 从 S3 SDK 错误转换
    ///
    /// 原始状态码与错误码只在这里被检查，其余代码只依赖 [`ErrorClass`]
    pub fn from_sdk_error<E>(err: SdkError<E, HttpResponse>, operation: &str, key: &str) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        let status = sdk_status(&err);

        match classify(status, err.code()) {
            ErrorClass::NotFound => ObjectStoreError::NotFound {
                key: key.to_string(),
            },
            ErrorClass::Other => {
                let message = match (err.code(), err.message(), status) {
                    (Some(code), Some(msg), _) => format!("{}: {}", code, msg),
                    (Some(code), None, _) => code.to_string(),
                    (None, _, Some(status)) => format!("HTTP {}", status),
                    _ => err.to_string(),
                };
                ObjectStoreError::Transport {
                    operation: operation.to_string(),
                    message,
                    source: Some(Box::new(err)),
                }
            }
        }
    }

    /// 从列举请求的 SDK 错误转换
    ///
    /// 列举时的 404 只可能是存储桶不存在，归为 Other 并保留原始错误
    pub fn from_sdk_list_error<E>(err: SdkError<E, HttpResponse>, bucket: &str) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        match classify(sdk_status(&err), err.code()) {
            ErrorClass::NotFound => ObjectStoreError::Transport {
                operation: "list_objects".to_string(),
                message: format!("bucket not found: {}", bucket),
                source: Some(Box::new(err)),
            },
            ErrorClass::Other => Self::from_sdk_error(err, "list_objects", bucket),
        }
    }
}

fn sdk_status<E>(err: &SdkError<E, HttpResponse>) -> Option<u16> {
    match err {
        SdkError::ServiceError(se) => Some(se.raw().status().as_u16()),
        SdkError::ResponseError(re) => Some(re.raw().status().as_u16()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_status() {
        assert_eq!(classify(Some(404), None), ErrorClass::NotFound);
        assert_eq!(classify(Some(403), None), ErrorClass::Other);
        assert_eq!(classify(Some(500), None), ErrorClass::Other);
        assert_eq!(classify(None, None), ErrorClass::Other);
    }

    #[test]
    fn test_classify_by_code() {
        assert_eq!(classify(None, Some("NoSuchKey")), ErrorClass::NotFound);
        assert_eq!(classify(Some(404), Some("NotFound")), ErrorClass::NotFound);
        assert_eq!(classify(Some(403), Some("AccessDenied")), ErrorClass::Other);
        assert_eq!(classify(Some(404), Some("NoSuchBucket")), ErrorClass::Other);
    }

    #[test]
    fn test_error_class() {
        let err = ObjectStoreError::NotFound {
            key: "a.txt".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.class(), ErrorClass::NotFound);

        let err = ObjectStoreError::transport(
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
            "put_object",
        );
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "传输错误 [put_object]: timed out");
    }

    #[test]
    fn test_local_io_message() {
        let err = ObjectStoreError::local_io(
            Path::new("/tmp/missing.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.class(), ErrorClass::Other);
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }
}
