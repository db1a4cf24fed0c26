/// 对象元数据（仅在聚合遍历中使用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
}

impl ObjectMeta {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// 列举接口返回的续传令牌
///
/// 对客户端不透明，只能原样传回给服务端获取下一页
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContinuationToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ContinuationToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// 一页列举结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectMeta>,
    /// `None` 表示已经没有更多分页
    pub next: Option<ContinuationToken>,
}
