use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::oss::{
    Connection, ConnectionFactory, ContinuationToken, ObjectMeta, ObjectPage, ObjectStoreError,
};

type Buckets = HashMap<String, BTreeMap<String, Bytes>>;

/// 内存实现的连接工厂
///
/// 在进程内模拟一个 S3 兼容服务：按 key 字典序分页列举，
/// 支持注入延迟和故障，并统计连接的打开与释放次数
#[derive(Clone)]
pub struct MemoryConnectionFactory {
    buckets: Arc<RwLock<Buckets>>,
    page_size: usize,
    latency: Option<Duration>,
    fail_list_page: Option<usize>,
    fail_requests: bool,
    fail_connect: bool,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl Default for MemoryConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConnectionFactory {
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            page_size: 1000,
            latency: None,
            fail_list_page: None,
            fail_requests: false,
            fail_connect: false,
            open: Arc::new(AtomicUsize::new(0)),
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 每页最多返回的对象数
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// 每次远程调用前等待的时间
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 同一连接上第 `page` 次（从 0 开始）列举请求返回传输错误
    pub fn fail_list_page(mut self, page: usize) -> Self {
        self.fail_list_page = Some(page);
        self
    }

    /// 所有请求都返回拒绝访问错误
    pub fn fail_requests(mut self, fail: bool) -> Self {
        self.fail_requests = fail;
        self
    }

    /// 建立连接失败
    pub fn fail_connect(mut self, fail: bool) -> Self {
        self.fail_connect = fail;
        self
    }

    /// 当前未释放的连接数
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// 累计建立的连接数
    pub fn connections_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionFactory for MemoryConnectionFactory {
    async fn connect(&self) -> Result<Box<dyn Connection>, ObjectStoreError> {
        if self.fail_connect {
            return Err(ObjectStoreError::Transport {
                operation: "connect".to_string(),
                message: "connection refused".to_string(),
                source: None,
            });
        }

        self.open.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryConnection {
            factory: self.clone(),
            list_calls: AtomicUsize::new(0),
            released: false,
        }))
    }
}

/// 内存连接
pub struct MemoryConnection {
    factory: MemoryConnectionFactory,
    list_calls: AtomicUsize,
    released: bool,
}

impl MemoryConnection {
    async fn before_request(&self, operation: &str) -> Result<(), ObjectStoreError> {
        if let Some(latency) = self.factory.latency {
            tokio::time::sleep(latency).await;
        }

        if self.factory.fail_requests {
            return Err(ObjectStoreError::Transport {
                operation: operation.to_string(),
                message: "AccessDenied: access denied".to_string(),
                source: None,
            });
        }

        Ok(())
    }

    fn poisoned(operation: &str) -> ObjectStoreError {
        ObjectStoreError::Transport {
            operation: operation.to_string(),
            message: "memory store lock poisoned".to_string(),
            source: None,
        }
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ObjectStoreError> {
        self.before_request("put_object").await?;

        let mut buckets = self
            .factory
            .buckets
            .write()
            .map_err(|_| Self::poisoned("put_object"))?;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectStoreError> {
        self.before_request("get_object").await?;

        let buckets = self
            .factory
            .buckets
            .read()
            .map_err(|_| Self::poisoned("get_object"))?;
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.before_request("delete_object").await?;

        let mut buckets = self
            .factory
            .buckets
            .write()
            .map_err(|_| Self::poisoned("delete_object"))?;
        if let Some(objects) = buckets.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.before_request("head_object").await?;

        let buckets = self
            .factory
            .buckets
            .read()
            .map_err(|_| Self::poisoned("head_object"))?;
        match buckets.get(bucket).map(|objects| objects.contains_key(key)) {
            Some(true) => Ok(()),
            _ => Err(ObjectStoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ObjectPage, ObjectStoreError> {
        self.before_request("list_objects").await?;

        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.factory.fail_list_page == Some(call) {
            return Err(ObjectStoreError::Transport {
                operation: "list_objects".to_string(),
                message: format!("InternalError: page {} failed", call),
                source: None,
            });
        }

        let buckets = self
            .factory
            .buckets
            .read()
            .map_err(|_| Self::poisoned("list_objects"))?;
        let Some(objects) = buckets.get(bucket) else {
            return Ok(ObjectPage::default());
        };

        // 令牌是上一页最后一个 key，本页从它之后开始
        let lower = match token {
            Some(token) => Bound::Excluded(token.as_str().to_string()),
            None => Bound::Unbounded,
        };
        let mut range = objects.range((lower, Bound::Unbounded));

        let page: Vec<ObjectMeta> = range
            .by_ref()
            .take(self.factory.page_size)
            .map(|(key, body)| ObjectMeta::new(key.clone(), body.len() as u64))
            .collect();

        let next = match (range.next(), page.last()) {
            (Some(_), Some(last)) => Some(ContinuationToken::new(last.key.clone())),
            _ => None,
        };

        Ok(ObjectPage {
            objects: page,
            next,
        })
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.factory.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
